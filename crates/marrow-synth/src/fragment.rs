//! Program-skeleton fragments.
//!
//! A fragment is a node in a candidate skeleton tree. Composite fragments
//! declare three child slots (*before*, *body*, *after*); an unfilled slot
//! is a hole. Trees are value-semantic: cloning clones every filled subtree,
//! so enumeration branches never alias mutable state.
//!
//! Equality and hashing are defined over the canonical textual rendering,
//! not tree identity: two differently built trees that render identically
//! count as the same candidate.

use std::fmt;
use std::hash::{Hash, Hasher};

use marrow_props::Value;
use serde::{Deserialize, Serialize};

/// Instruction count used for filler `linear` fragments when no explicit
/// length is given.
pub const DEFAULT_LINEAR_LEN: usize = 2;

/// An optionally filled child slot.
pub type Slot = Option<Box<Fragment>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Fragment {
    /// Generates no behavior; identity under composition.
    Empty,
    /// A straight-line region of `length` generated operations whose results
    /// become seeds.
    Linear { length: usize },
    /// A counting loop from zero up to (exclusive) a bound argument.
    LoopToN {
        bound: Value,
        before: Slot,
        body: Slot,
        after: Slot,
    },
    /// A loop over `size` elements of one to three pointer arguments. In
    /// output mode (single pointer) the per-iteration element address is an
    /// output location; otherwise each element is loaded as a seed.
    RegularLoop {
        size: Value,
        pointers: Vec<Value>,
        output: bool,
        before: Slot,
        body: Slot,
        after: Slot,
    },
}

impl Fragment {
    pub fn linear(length: usize) -> Self {
        Fragment::Linear { length }
    }

    pub fn loop_to_n(bound: Value) -> Self {
        Fragment::LoopToN {
            bound,
            before: None,
            body: None,
            after: None,
        }
    }

    pub fn regular_loop(size: Value, pointers: Vec<Value>) -> Self {
        Fragment::RegularLoop {
            size,
            pointers,
            output: false,
            before: None,
            body: None,
            after: None,
        }
    }

    pub fn output_loop(size: Value, pointer: Value) -> Self {
        Fragment::RegularLoop {
            size,
            pointers: vec![pointer],
            output: true,
            before: None,
            body: None,
            after: None,
        }
    }

    /// Number of unfilled holes in this subtree: an empty slot counts one,
    /// a filled slot counts its child's holes, leaves count zero.
    pub fn hole_count(&self) -> usize {
        match self {
            Fragment::Empty | Fragment::Linear { .. } => 0,
            Fragment::LoopToN {
                before, body, after, ..
            }
            | Fragment::RegularLoop {
                before, body, after, ..
            } => slot_holes(before) + slot_holes(body) + slot_holes(after),
        }
    }

    /// Fill the `index`-th empty hole of this subtree with `child`.
    ///
    /// Holes are numbered by a pre-order, left-to-right walk: each composite
    /// visits *before*, *body*, *after* in that order, descending into
    /// filled slots as it goes. Index 0 is therefore the "first empty hole".
    ///
    /// If no such hole exists the tree is left unchanged and ownership of
    /// the rejected child is handed back through `Err`.
    pub fn add_child(&mut self, child: Fragment, index: usize) -> Result<(), Fragment> {
        let mut remaining = index;
        self.fill_nth(child, &mut remaining)
    }

    fn fill_nth(&mut self, child: Fragment, remaining: &mut usize) -> Result<(), Fragment> {
        match self {
            Fragment::Empty | Fragment::Linear { .. } => Err(child),
            Fragment::LoopToN {
                before, body, after, ..
            }
            | Fragment::RegularLoop {
                before, body, after, ..
            } => {
                let mut child = child;
                for slot in [before, body, after] {
                    match slot {
                        None => {
                            if *remaining == 0 {
                                *slot = Some(Box::new(child));
                                return Ok(());
                            }
                            *remaining -= 1;
                        }
                        Some(sub) => match sub.fill_nth(child, remaining) {
                            Ok(()) => return Ok(()),
                            Err(rejected) => child = rejected,
                        },
                    }
                }
                Err(child)
            }
        }
    }

    /// Pretty-printed form at the given indent level. Unfilled holes render
    /// as `hole`.
    pub fn render(&self, indent: usize) -> String {
        let ind = Indent(indent);
        match self {
            Fragment::Empty => format!("{ind}empty"),
            Fragment::Linear { length } => format!("{ind}linear({length})"),
            Fragment::LoopToN {
                bound,
                before,
                body,
                after,
            } => format!(
                "{}\n{ind}loopToN({bound}) {{\n{}\n{ind}}}\n{}",
                render_slot(before, indent),
                render_slot(body, indent + 1),
                render_slot(after, indent),
            ),
            Fragment::RegularLoop {
                size,
                pointers,
                output,
                before,
                body,
                after,
            } => {
                let name = if *output { "outputLoop" } else { "regularLoop" };
                let ptrs = pointers
                    .iter()
                    .map(Value::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "{}\n{ind}{name}({size}, {ptrs}) {{\n{}\n{ind}}}\n{}",
                    render_slot(before, indent),
                    render_slot(body, indent + 1),
                    render_slot(after, indent),
                )
            }
        }
    }

    /// The rendering used as this tree's equality and deduplication key.
    pub fn canonical(&self) -> String {
        self.render(0)
    }
}

fn slot_holes(slot: &Slot) -> usize {
    match slot {
        None => 1,
        Some(child) => child.hole_count(),
    }
}

fn render_slot(slot: &Slot, indent: usize) -> String {
    match slot {
        None => format!("{}hole", Indent(indent)),
        Some(child) => child.render(indent),
    }
}

struct Indent(usize);

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.0 {
            f.write_str("  ")?;
        }
        Ok(())
    }
}

impl PartialEq for Fragment {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Fragment {}

impl Hash for Fragment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}
