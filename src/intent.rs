//! Intents
//!
//! An `Intent` is one unit of recognition: an ordered list of sample
//! utterances plus bindings from local slot names to slot types. Indented
//! lines under an `INTENT` declaration become utterances; `+` command lines
//! adjust bindings and settings.

use crate::context::ParserContext;
use crate::interaction::{IntentDef, IntentSlotDef};
use crate::model::{Model, BUILTIN_PREFIX, FALLBACK_INTENT};
use crate::utterance::Utterance;
use once_cell::sync::Lazy;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use regex_lite::Regex;

/// Default cap on generated sample utterances per intent.
pub const DEFAULT_UTTERANCE_LIMIT: usize = 2000;

static SLOT_BINDING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\w+)\s+as\s+([\w.]+)").unwrap());
static FALLBACK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"fallback\s+sensitivity\s+(\w+)").unwrap());
static LIMIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"utterance\s+limit\s+(\d+)").unwrap());

/// How aggressively the platform's fallback intent should trigger.
///
/// Only meaningful on the built-in fallback intent itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackSensitivity {
    Low,
    #[default]
    Medium,
    High,
}

impl FallbackSensitivity {
    /// Parse a case-insensitive sensitivity keyword.
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// A local slot name bound to a slot type within one intent.
///
/// `references` records the lines of `{name}` usages across the intent's
/// utterances; it is filled during validation and only feeds the
/// unused-binding warning.
#[derive(Debug, Clone)]
pub struct IntentSlotInfo {
    pub name: String,
    pub type_name: String,
    pub line_number: usize,
    pub references: Vec<usize>,
}

impl IntentSlotInfo {
    pub fn new(pc: &ParserContext, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            line_number: pc.line_number,
            references: Vec::new(),
        }
    }

    pub fn to_interaction(&self) -> IntentSlotDef {
        IntentSlotDef {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
        }
    }
}

/// One recognizable intent: name, utterances, slot bindings and settings.
#[derive(Debug, Clone)]
pub struct Intent {
    pub name: String,
    pub utterances: Vec<Utterance>,
    pub slots: Vec<IntentSlotInfo>,
    pub fallback_sensitivity: FallbackSensitivity,
    pub utterance_limit: usize,
    pub line_number: usize,
}

impl Intent {
    pub fn new(pc: &ParserContext, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            utterances: Vec::new(),
            slots: Vec::new(),
            fallback_sensitivity: FallbackSensitivity::default(),
            utterance_limit: DEFAULT_UTTERANCE_LIMIT,
            line_number: pc.line_number,
        }
    }

    /// Parse one indented content line as a new utterance.
    pub fn add_utterance(&mut self, pc: &mut ParserContext, line: &str) {
        self.utterances.push(Utterance::parse(pc, line));
    }

    pub fn slot(&self, name: &str) -> Option<&IntentSlotInfo> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Total variation count across all utterances, saturating.
    pub fn count_all_utterance_variations(&self) -> usize {
        self.utterances
            .iter()
            .fold(0usize, |acc, u| acc.saturating_add(u.alternate_count()))
    }

    /// Handle a `+` command line.
    ///
    /// Three forms are recognized: `name as Type`, `fallback sensitivity x`
    /// and `utterance limit n`. Anything else is an unknown-command error.
    /// The statement's effect is simply not applied on error.
    pub fn process_command(&mut self, pc: &mut ParserContext, line: &str) {
        if let Some(caps) = SLOT_BINDING_RE.captures(line) {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let type_name = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            if self.slot(name).is_some() {
                pc.error(format!(
                    "duplicate slot type definition {} for intent {}",
                    name, self.name
                ));
                return;
            }
            self.slots.push(IntentSlotInfo::new(pc, name, type_name));
            return;
        }

        if let Some(caps) = FALLBACK_RE.captures(line) {
            if self.name != FALLBACK_INTENT {
                pc.error(format!(
                    "fallback sensitivity only applies to {}",
                    FALLBACK_INTENT
                ));
                return;
            }
            let keyword = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            match FallbackSensitivity::parse(keyword) {
                Some(sensitivity) => self.fallback_sensitivity = sensitivity,
                None => pc.error(format!(
                    "unknown fallback sensitivity {}, must be LOW, MEDIUM or HIGH",
                    keyword.to_uppercase()
                )),
            }
            return;
        }

        if let Some(caps) = LIMIT_RE.captures(line) {
            let digits = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            match digits.parse::<usize>() {
                Ok(limit) => self.utterance_limit = limit,
                Err(_) => pc.error("invalid number encountered in utterance limit statement"),
            }
            return;
        }

        pc.error(format!("unknown command {}", line));
    }

    /// Validate utterances and slot bindings.
    ///
    /// Registers every `{name}` usage against its binding (recording an error
    /// for undeclared names), warns on bindings with zero usages and on
    /// non-built-in intents with no utterances at all. Returns the list of
    /// (bound type name, declaration line) pairs for the model to
    /// cross-check, since type resolution lives above the intent.
    pub fn validate(&mut self, pc: &mut ParserContext) -> Vec<(String, usize)> {
        if self.utterances.is_empty() && !self.name.contains(BUILTIN_PREFIX) {
            // built-in intents get their utterances from the platform
            pc.warn_at(
                self.line_number,
                format!("intent {} has no utterances", self.name),
            );
        }

        for utterance in &self.utterances {
            for usage in utterance.slot_usages() {
                match self.slots.iter_mut().find(|s| s.name == usage.name) {
                    Some(slot) => slot.references.push(usage.line_number),
                    None => pc.error_at(
                        usage.line_number,
                        format!("slot {} is not defined in the intent", usage.name),
                    ),
                }
            }
        }

        for slot in &self.slots {
            if slot.references.is_empty() {
                // could be an indicator of a typo
                pc.warn_at(
                    slot.line_number,
                    format!("unused slot definition {}", slot.name),
                );
            }
        }

        self.slots
            .iter()
            .map(|s| (s.type_name.clone(), s.line_number))
            .collect()
    }

    /// Resolve a local slot name to a concrete random value via its bound
    /// type. Unbound names yield a literal `BADSLOT` marker.
    pub fn random_slot_value<R: Rng>(&self, model: &Model, slot_name: &str, rng: &mut R) -> String {
        match self.slot(slot_name) {
            Some(slot) => model.random_slot_value(&slot.type_name, rng),
            None => "BADSLOT".to_string(),
        }
    }

    /// Expand all utterances, enforcing the utterance cap.
    ///
    /// When the full expansion exceeds the cap, a random subset of exactly
    /// the cap size is kept to preserve as much phrasing diversity as
    /// possible. The picker removes chosen items from the pool, so the
    /// result holds no duplicate indices, and it runs on a fixed-seed
    /// generator so regenerated artifacts are stable and diffable.
    pub fn generate_utterances(&self) -> Vec<String> {
        let mut samples: Vec<String> = self
            .utterances
            .iter()
            .flat_map(Utterance::generate_all)
            .collect();

        if samples.len() > self.utterance_limit {
            let mut all = samples;
            samples = Vec::with_capacity(self.utterance_limit);
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            for _ in 0..self.utterance_limit {
                let i = rng.gen_range(0..all.len());
                samples.push(all.remove(i));
            }
        }

        samples
    }

    pub fn to_interaction(&self) -> IntentDef {
        let slots = if self.slots.is_empty() {
            None
        } else {
            Some(self.slots.iter().map(IntentSlotInfo::to_interaction).collect())
        };
        IntentDef {
            name: self.name.clone(),
            samples: self.generate_utterances(),
            slots,
        }
    }

    /// Display lines for the model summary.
    pub fn summary_lines<R: Rng>(&self, model: &Model, rng: &mut R) -> Vec<String> {
        let mut out = vec![format!(
            "INTENT {} {} utterances",
            self.name,
            self.count_all_utterance_variations()
        )];
        for slot in &self.slots {
            out.push(format!("     slot {} : {}", slot.name, slot.type_name));
        }
        for utterance in &self.utterances {
            out.extend(utterance.summary_lines(self, model, rng));
        }
        out
    }
}
