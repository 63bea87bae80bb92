//! The end-to-end synthesis driver.
//!
//! A [`Synthesizer`] is built from a target signature and a property set.
//! Construction runs the whole front half of the pipeline: every builtin
//! rule is matched against the properties, the resulting skeleton roots are
//! enumerated into complete candidates, and the candidates are held in
//! canonical order. Callers then pull compiled candidates one at a time.

use marrow_cranelift::{compile_candidate, CompilationResult, CompiledCandidate};
use marrow_props::{PropertySet, Signature};
use marrow_synth::{
    builtin_rules, enumerate, Fragment, FragmentRegistry, SynthResult, DEFAULT_LINEAR_LEN,
};

/// Knobs for the enumeration stage.
#[derive(Debug, Clone)]
pub struct SynthOptions {
    /// Cap on how many skeleton roots one candidate may combine. `None`
    /// allows compositions over the whole root set.
    pub max_fragments: Option<usize>,
    /// How many data regions each candidate should carry.
    pub data_blocks: usize,
}

impl Default for SynthOptions {
    fn default() -> Self {
        SynthOptions {
            max_fragments: None,
            data_blocks: 1,
        }
    }
}

#[derive(Debug)]
pub struct Synthesizer {
    signature: Signature,
    candidates: Vec<Fragment>,
    next: usize,
}

impl Synthesizer {
    /// Match, enumerate, and hold the candidate set for a property set.
    ///
    /// When no rule matches the properties, a single default linear
    /// skeleton stands in so synthesis always has something to offer.
    pub fn new(properties: &PropertySet, options: &SynthOptions) -> SynthResult<Self> {
        let registry = FragmentRegistry::with_builtins();
        let mut roots = Vec::new();
        for rule in builtin_rules() {
            roots.extend(rule.match_against(properties, &registry)?);
        }
        if roots.is_empty() {
            roots.push(Fragment::linear(DEFAULT_LINEAR_LEN));
        }

        let candidates = enumerate(&roots, options.max_fragments, options.data_blocks);
        Ok(Synthesizer {
            signature: properties.signature.clone(),
            candidates,
            next: 0,
        })
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn candidates(&self) -> &[Fragment] {
        &self.candidates
    }

    /// Canonical renderings of all candidates, in enumeration order.
    pub fn renderings(&self) -> Vec<String> {
        self.candidates.iter().map(Fragment::canonical).collect()
    }

    /// Compile the next candidate, cycling back to the first after the
    /// last. Returns `None` only when the candidate set is empty.
    pub fn compile_next(&mut self) -> CompilationResult<Option<CompiledCandidate>> {
        if self.candidates.is_empty() {
            return Ok(None);
        }
        let fragment = &self.candidates[self.next];
        self.next = (self.next + 1) % self.candidates.len();
        compile_candidate(fragment, &self.signature).map(Some)
    }
}
