//! Model aggregate
//!
//! A `Model` is the result of parsing one shorthand file: the invocation
//! name plus every declared slot type and intent, in declaration order. It
//! owns all child entities; cross-references used for unused-item warnings
//! are recorded as plain names and line numbers, never as object links.

use crate::context::ParserContext;
use crate::intent::Intent;
use crate::interaction::{InteractionModel, InteractionModelBody, IntentDef, LanguageModel};
use crate::request::{IntentSlotMapping, SlotValues};
use crate::slot_type::SlotType;
use rand::Rng;
use std::collections::BTreeMap;

/// Reserved namespace prefix for platform-provided intents and types.
pub const BUILTIN_PREFIX: &str = "AMAZON.";

/// The one built-in intent that accepts fallback-sensitivity tuning.
pub const FALLBACK_INTENT: &str = "AMAZON.FallbackIntent";

/// Built-in numeric slot type, sampled as a random integer.
pub const NUMBER_TYPE: &str = "AMAZON.NUMBER";

/// Built-in intents force-appended to the interaction model when not
/// authored, in this order.
pub const REQUIRED_INTENTS: [&str; 3] = [
    "AMAZON.CancelIntent",
    "AMAZON.StopIntent",
    "AMAZON.HelpIntent",
];

/// Placeholder carried into the rendered artifact when the author never set
/// an invocation phrase.
pub const MISSING_INVOCATION: &str = "You haven't set INVOCATION!";

/// A parsed language model: invocation name, slot types and intents.
#[derive(Debug, Default)]
pub struct Model {
    /// Invocation phrase; empty means unset.
    pub invocation_name: String,
    pub slot_types: Vec<SlotType>,
    pub intents: Vec<Intent>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slot type, keeping the first definition on a duplicate
    /// name. Returns the index of the registered (or pre-existing) entry so
    /// the parser can route later value lines to it.
    pub fn add_slot_type(&mut self, pc: &mut ParserContext, slot_type: SlotType) -> usize {
        if let Some(i) = self.slot_types.iter().position(|s| s.name == slot_type.name) {
            pc.error(format!(
                "double registering SLOTTYPE {}, ignoring second definition",
                slot_type.name
            ));
            return i;
        }
        self.slot_types.push(slot_type);
        self.slot_types.len() - 1
    }

    /// Register an intent, keeping the first definition on a duplicate name.
    pub fn add_intent(&mut self, pc: &mut ParserContext, intent: Intent) -> usize {
        if let Some(i) = self.intents.iter().position(|s| s.name == intent.name) {
            pc.error(format!(
                "double registering INTENT {}, ignoring second definition",
                intent.name
            ));
            return i;
        }
        self.intents.push(intent);
        self.intents.len() - 1
    }

    pub fn slot_type(&self, name: &str) -> Option<&SlotType> {
        self.slot_types.iter().find(|s| s.name == name)
    }

    pub fn intent(&self, name: &str) -> Option<&Intent> {
        self.intents.iter().find(|i| i.name == name)
    }

    /// Cross-validate the whole model, recording diagnostics.
    ///
    /// Every intent is validated first (utterance slot usages registered,
    /// bindings checked), then slot types (non-empty check), then a warning
    /// for any slot type no intent references.
    pub fn validate(&mut self, pc: &mut ParserContext) {
        // intents first; collect their bound types for resolution up here,
        // the intent itself cannot see the registry
        let mut bindings: Vec<(String, String, usize)> = Vec::new();
        for intent in &mut self.intents {
            let intent_name = intent.name.clone();
            for (type_name, line) in intent.validate(pc) {
                bindings.push((intent_name.clone(), type_name, line));
            }
        }

        for (intent_name, type_name, line) in bindings {
            if type_name.starts_with(BUILTIN_PREFIX) {
                continue;
            }
            match self.slot_types.iter_mut().find(|s| s.name == type_name) {
                Some(slot_type) => slot_type.references.push(intent_name),
                None => pc.error_at(line, format!("unknown slot type {}", type_name)),
            }
        }

        for slot_type in &self.slot_types {
            slot_type.validate(pc);
            if slot_type.references.is_empty() {
                pc.warn_at(
                    slot_type.line_number,
                    format!("slot type {} is not used by any intent", slot_type.name),
                );
            }
        }
    }

    /// Total variation count across every intent, saturating.
    pub fn count_all_utterance_variations(&self) -> usize {
        self.intents.iter().fold(0usize, |acc, i| {
            acc.saturating_add(i.count_all_utterance_variations())
        })
    }

    /// Produce a concrete random value for a bound type name, used when
    /// rendering sample utterances.
    pub fn random_slot_value<R: Rng>(&self, type_name: &str, rng: &mut R) -> String {
        if type_name == NUMBER_TYPE {
            // an actual number reads better than a placeholder here
            return rng.gen_range(0..100).to_string();
        }

        if let Some(suffix) = type_name.strip_prefix(BUILTIN_PREFIX) {
            // no local vocabulary for other built-ins, abbreviate instead
            return format!("{{{}}}", suffix);
        }

        match self.slot_type(type_name) {
            Some(slot_type) => slot_type.random_value(rng),
            // likely an input error, make it visible in the sample
            None => "BADTYPE".to_string(),
        }
    }

    /// Render output artifact #1.
    ///
    /// Intents and types appear in declaration order; the three required
    /// built-in intents are appended with empty sample lists when the author
    /// did not define them.
    pub fn to_interaction_model(&self) -> InteractionModel {
        let mut intents: Vec<IntentDef> = self.intents.iter().map(Intent::to_interaction).collect();

        for name in REQUIRED_INTENTS {
            if self.intent(name).is_none() {
                intents.push(IntentDef {
                    name: name.to_string(),
                    samples: Vec::new(),
                    slots: None,
                });
            }
        }

        let invocation_name = if self.invocation_name.is_empty() {
            MISSING_INVOCATION.to_string()
        } else {
            self.invocation_name.clone()
        };

        InteractionModel {
            interaction_model: InteractionModelBody {
                language_model: LanguageModel {
                    invocation_name,
                    intents,
                    types: self.slot_types.iter().map(SlotType::to_interaction).collect(),
                },
            },
        }
    }

    /// Build the intent → slot → vocabulary mapping the runtime request
    /// classifier resolves against. Only authored intents contribute, and
    /// only their slots bound to custom (non-built-in) types.
    pub fn intent_slot_mapping(&self) -> IntentSlotMapping {
        let mut mapping = IntentSlotMapping::new();
        for intent in &self.intents {
            if intent.name.starts_with(BUILTIN_PREFIX) {
                continue;
            }
            let mut slots: BTreeMap<String, SlotValues> = BTreeMap::new();
            for slot in &intent.slots {
                if slot.type_name.starts_with(BUILTIN_PREFIX) {
                    continue;
                }
                if let Some(slot_type) = self.slot_type(&slot.type_name) {
                    let values: SlotValues = slot_type
                        .values
                        .iter()
                        .map(|v| (v.name.clone(), v.synonyms.clone()))
                        .collect();
                    slots.insert(slot.name.clone(), values);
                }
            }
            if !slots.is_empty() {
                mapping.insert(intent.name.clone(), slots);
            }
        }
        mapping
    }

    /// Human-readable report of everything parsed, including generated
    /// utterance counts and a closing totals line.
    pub fn summary_lines<R: Rng>(&self, rng: &mut R) -> Vec<String> {
        let mut out = Vec::new();
        for slot_type in &self.slot_types {
            out.extend(slot_type.summary_lines());
        }
        for intent in &self.intents {
            out.extend(intent.summary_lines(self, rng));
        }
        if self.invocation_name.is_empty() {
            out.push(format!("*** invocation: {} ***", MISSING_INVOCATION));
        } else {
            out.push(format!("*** invocation: {} ***", self.invocation_name));
        }
        out.push(format!(
            "{} slotType(s) {} intent(s) {} utterance(s)",
            self.slot_types.len(),
            self.intents.len(),
            self.count_all_utterance_variations()
        ));
        out
    }
}
