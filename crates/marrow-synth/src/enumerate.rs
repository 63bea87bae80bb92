//! Combinatorial enumeration of candidate skeletons.
//!
//! Starting from a list of matched root fragments, enumeration chooses
//! subsets, composes every ordering of each subset's members into every
//! distinct hole assignment, and then fills whatever holes remain with
//! `linear` or `empty` filler. Results are deduplicated by canonical
//! rendering and returned in canonical-string order, which makes the whole
//! procedure deterministic.

use std::collections::BTreeMap;

use crate::combinatorics::{combinations, next_permutation};
use crate::fragment::{DEFAULT_LINEAR_LEN, Fragment};

/// Enumerate every candidate skeleton buildable from `roots`.
///
/// `max_size` caps the subset size considered (no cap composes subsets up to
/// the full input length); `data_blocks` is how many remaining holes receive
/// a data-producing `linear` filler instead of `empty` — pass `usize::MAX`
/// to fill every hole with data.
pub fn enumerate(
    roots: &[Fragment],
    max_size: Option<usize>,
    data_blocks: usize,
) -> Vec<Fragment> {
    if max_size == Some(0) {
        return Vec::new();
    }

    let limit = max_size.unwrap_or(roots.len()).min(roots.len());
    let mut skeletons = BTreeMap::new();
    for size in 1..=limit {
        for subset in combinations(roots, size) {
            // Any member can host the others, so every ordering of the
            // subset seeds its own composition walk.
            let mut order: Vec<usize> = (0..subset.len()).collect();
            loop {
                let rest: Vec<Fragment> =
                    order[1..].iter().map(|&i| subset[i].clone()).collect();
                compose(&mut skeletons, subset[order[0]].clone(), &rest);
                if !next_permutation(&mut order) {
                    break;
                }
            }
        }
    }

    let mut results = BTreeMap::new();
    for skeleton in skeletons.values() {
        fill_holes(&mut results, skeleton, data_blocks);
    }
    results.into_values().collect()
}

/// Insert the remaining subset members into `accum`, branching over every
/// open hole each member could occupy. Fully composed trees land in `out`;
/// a subset with more members than open holes contributes nothing.
fn compose(out: &mut BTreeMap<String, Fragment>, accum: Fragment, rest: &[Fragment]) {
    let Some((next, tail)) = rest.split_first() else {
        out.insert(accum.canonical(), accum);
        return;
    };
    for hole in 0..accum.hole_count() {
        let mut branch = accum.clone();
        if branch.add_child(next.clone(), hole).is_ok() {
            compose(out, branch, tail);
        }
    }
}

/// Fillers are ordered so that the initial `[Data.., Empty..]` list is the
/// lexicographic minimum for the permutation walk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Filler {
    Data,
    Blank,
}

impl Filler {
    fn fragment(self) -> Fragment {
        match self {
            Filler::Data => Fragment::linear(DEFAULT_LINEAR_LEN),
            Filler::Blank => Fragment::Empty,
        }
    }
}

fn fill_holes(out: &mut BTreeMap<String, Fragment>, skeleton: &Fragment, data_blocks: usize) {
    let holes = skeleton.hole_count();
    if holes == 0 {
        out.insert(skeleton.canonical(), skeleton.clone());
        return;
    }

    let data = holes.min(data_blocks);
    let mut fillers: Vec<Filler> = (0..holes)
        .map(|i| if i < data { Filler::Data } else { Filler::Blank })
        .collect();

    loop {
        let mut candidate = skeleton.clone();
        for filler in &fillers {
            // Filling the first hole each time walks left to right, since a
            // filled hole no longer counts.
            if candidate.add_child(filler.fragment(), 0).is_err() {
                break;
            }
        }
        out.insert(candidate.canonical(), candidate);
        if !next_permutation(&mut fillers) {
            break;
        }
    }
}
