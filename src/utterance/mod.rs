//! Utterances
//!
//! An `Utterance` is one authored line of sample phrasing. Parsing delegates
//! to the grammar node scanner in [`node`], then runs the trim pass so the
//! stored tree has no trivial single-child nesting.

pub mod node;

use crate::context::ParserContext;
use crate::intent::Intent;
use crate::model::Model;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

pub use node::{Part, SlotUsage};

/// One authored utterance line, expandable into concrete strings.
#[derive(Debug, Clone)]
pub struct Utterance {
    root: Part,
    source: String,
}

impl Utterance {
    /// Parse a line of template text into an utterance.
    pub fn parse(pc: &mut ParserContext, line: &str) -> Self {
        let root = Part::parse_sequence(pc, line).trim();
        Self {
            root,
            source: line.to_string(),
        }
    }

    /// The original template text this utterance was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Part {
        &self.root
    }

    /// Number of concrete variations this utterance expands to.
    pub fn alternate_count(&self) -> usize {
        self.root.alternate_count()
    }

    /// Expand every variation, with slots rendered as `{name}` placeholders.
    pub fn generate_all(&self) -> Vec<String> {
        self.root
            .generate_all(vec![Vec::new()])
            .into_iter()
            .map(|words| words.join(" "))
            .collect()
    }

    /// Expand every variation with concrete slot values substituted.
    pub fn generate_samples<R: Rng>(
        &self,
        intent: &Intent,
        model: &Model,
        rng: &mut R,
    ) -> Vec<String> {
        self.root
            .generate_samples(vec![Vec::new()], intent, model, rng)
            .into_iter()
            .map(|words| words.join(" "))
            .collect()
    }

    /// Render one randomly chosen variation.
    pub fn pick_random<R: Rng>(&self, rng: &mut R) -> String {
        self.root.pick_random(rng)
    }

    pub fn summary(&self) -> String {
        self.root.summary()
    }

    /// Count slot occurrences by name.
    pub fn collect_slot_names(&self, names: &mut BTreeMap<String, usize>) {
        self.root.collect_slot_names(names);
    }

    /// Every slot usage in this utterance, with source lines.
    pub fn slot_usages(&self) -> Vec<SlotUsage> {
        let mut usages = Vec::new();
        self.root.collect_slot_usages(&mut usages);
        usages
    }

    /// Display lines for the model summary: the canonical rendering, the
    /// variation count when above one, and up to five shuffled samples.
    pub fn summary_lines<R: Rng>(
        &self,
        intent: &Intent,
        model: &Model,
        rng: &mut R,
    ) -> Vec<String> {
        let count = self.alternate_count();
        let mut out = Vec::new();
        if count > 1 {
            out.push(format!("  {} (x {})", self.summary(), count));
            let mut samples = self.generate_samples(intent, model, rng);
            samples.shuffle(rng);
            for sample in samples.iter().take(5) {
                out.push(format!("    e.g. {}", sample));
            }
        } else {
            out.push(format!("  {}", self.summary()));
        }
        out
    }
}
