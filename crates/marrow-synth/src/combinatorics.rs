//! Small combinatorial helpers shared by rule matching and enumeration.

/// All tuples taking one element from each input list, in order: the first
/// list varies slowest, the last varies fastest. Any empty input list makes
/// the whole product empty; an empty slice of lists yields one empty tuple.
pub fn cartesian_product<T: Clone>(lists: &[Vec<T>]) -> Vec<Vec<T>> {
    let mut rows = vec![Vec::new()];
    for list in lists {
        let mut next = Vec::with_capacity(rows.len() * list.len());
        for prefix in &rows {
            for item in list {
                let mut row = prefix.clone();
                row.push(item.clone());
                next.push(row);
            }
        }
        rows = next;
    }
    rows
}

/// All unordered subsets of `items` with exactly `n` elements, emitted in
/// lexicographic index order.
pub fn combinations<T: Clone>(items: &[T], n: usize) -> Vec<Vec<T>> {
    let mut out = Vec::new();
    let mut accum = Vec::with_capacity(n);
    choose(items, n, 0, &mut accum, &mut out);
    out
}

fn choose<T: Clone>(
    items: &[T],
    n: usize,
    start: usize,
    accum: &mut Vec<T>,
    out: &mut Vec<Vec<T>>,
) {
    if accum.len() == n {
        out.push(accum.clone());
        return;
    }
    for i in start..items.len() {
        accum.push(items[i].clone());
        choose(items, n, i + 1, accum, out);
        accum.pop();
    }
}

/// Rearrange `items` into the next lexicographically greater permutation.
/// Returns `false` (leaving the slice sorted ascending) once the greatest
/// permutation has been passed.
pub fn next_permutation<T: Ord>(items: &mut [T]) -> bool {
    if items.len() < 2 {
        return false;
    }
    let mut i = items.len() - 1;
    while i > 0 && items[i - 1] >= items[i] {
        i -= 1;
    }
    if i == 0 {
        items.reverse();
        return false;
    }
    let mut j = items.len() - 1;
    while items[j] <= items[i - 1] {
        j -= 1;
    }
    items.swap(i - 1, j);
    items[i..].reverse();
    true
}
