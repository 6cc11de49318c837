//! Slot types
//!
//! A `SlotType` names an enumeration of canonical values, each with optional
//! synonyms, declared under a `SLOTTYPE` line. Intents bind local slot names
//! to these types and sample generation draws random values from them.

use crate::context::ParserContext;
use crate::interaction::{SlotTypeDef, SlotValueDef, SlotValueName};
use rand::Rng;

/// One canonical value with its synonym list, parsed from a line of the form
/// `name | synonym | synonym`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotValue {
    pub name: String,
    pub synonyms: Vec<String>,
}

impl SlotValue {
    /// Parse a value line. Empty synonym segments are dropped; the canonical
    /// name keeps whatever the first segment trims to.
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split('|');
        let name = parts.next().unwrap_or_default().trim().to_string();
        let synonyms = parts
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { name, synonyms }
    }

    /// Pick the canonical name or one of the synonyms.
    ///
    /// The canonical name wins when `rand * n < 1` for n synonyms, matching
    /// the slight non-uniform weighting the format has always had.
    pub fn pick_random<R: Rng>(&self, rng: &mut R) -> &str {
        let n = self.synonyms.len();
        if n == 0 || rng.gen::<f64>() * (n as f64) < 1.0 {
            return &self.name;
        }
        &self.synonyms[rng.gen_range(0..n)]
    }

    pub fn to_interaction(&self) -> SlotValueDef {
        SlotValueDef {
            name: SlotValueName {
                value: self.name.clone(),
                synonyms: if self.synonyms.is_empty() {
                    None
                } else {
                    Some(self.synonyms.clone())
                },
            },
        }
    }

    pub fn summary_line(&self) -> String {
        if self.synonyms.is_empty() {
            format!("    {}", self.name)
        } else {
            format!("    {} or {}", self.name, self.synonyms.join("/"))
        }
    }
}

/// A named slot type: canonical values in declaration order, plus the names
/// of intents that reference it (recorded during validation, used only for
/// the unused-type warning).
#[derive(Debug, Clone)]
pub struct SlotType {
    pub name: String,
    pub values: Vec<SlotValue>,
    pub references: Vec<String>,
    pub line_number: usize,
}

impl SlotType {
    pub fn new(pc: &ParserContext, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            references: Vec::new(),
            line_number: pc.line_number,
        }
    }

    /// Add a value line. A repeated canonical name replaces the earlier
    /// definition in place.
    pub fn add_value(&mut self, line: &str) {
        let value = SlotValue::parse(line);
        if let Some(existing) = self.values.iter_mut().find(|v| v.name == value.name) {
            *existing = value;
        } else {
            self.values.push(value);
        }
    }

    pub fn value(&self, name: &str) -> Option<&SlotValue> {
        self.values.iter().find(|v| v.name == name)
    }

    /// Slot types accept no commands; every `+` line is an error.
    pub fn process_command(&mut self, pc: &mut ParserContext, line: &str) {
        pc.error(format!("unrecognized command: {}", line));
    }

    pub fn validate(&self, pc: &mut ParserContext) {
        if self.values.is_empty() {
            pc.error_at(
                self.line_number,
                format!("slot type {} has no values", self.name),
            );
        }
    }

    /// Pick a random concrete string from this type's vocabulary.
    pub fn random_value<R: Rng>(&self, rng: &mut R) -> String {
        if self.values.is_empty() {
            return "NOVALUE".to_string();
        }
        let i = rng.gen_range(0..self.values.len());
        self.values[i].pick_random(rng).to_string()
    }

    pub fn to_interaction(&self) -> SlotTypeDef {
        SlotTypeDef {
            name: self.name.clone(),
            values: self.values.iter().map(SlotValue::to_interaction).collect(),
        }
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let mut out = vec![format!("SLOT TYPE  {}", self.name)];
        out.extend(self.values.iter().map(SlotValue::summary_line));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_parse_value_with_synonyms() {
        let value = SlotValue::parse("red | reds | crimson");
        assert_eq!(value.name, "red");
        assert_eq!(value.synonyms, vec!["reds", "crimson"]);
    }

    #[test]
    fn test_parse_value_drops_empty_synonyms() {
        let value = SlotValue::parse("red | | reds |");
        assert_eq!(value.name, "red");
        assert_eq!(value.synonyms, vec!["reds"]);
    }

    #[test]
    fn test_pick_random_without_synonyms_is_canonical() {
        let value = SlotValue::parse("blue");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(value.pick_random(&mut rng), "blue");
        }
    }

    #[test]
    fn test_pick_random_stays_in_vocabulary() {
        let value = SlotValue::parse("red | reds | crimson");
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..50 {
            let picked = value.pick_random(&mut rng).to_string();
            assert!(["red", "reds", "crimson"].contains(&picked.as_str()));
        }
    }

    #[test]
    fn test_duplicate_value_replaces_earlier() {
        let pc = ParserContext::new();
        let mut slot = SlotType::new(&pc, "Color");
        slot.add_value("red | reds");
        slot.add_value("red | crimson");
        assert_eq!(slot.values.len(), 1);
        assert_eq!(slot.values[0].synonyms, vec!["crimson"]);
    }

    #[test]
    fn test_empty_slot_type_is_an_error() {
        let mut pc = ParserContext::new();
        pc.line_number = 4;
        let slot = SlotType::new(&pc, "Empty");
        let mut check = ParserContext::new();
        slot.validate(&mut check);
        assert_eq!(check.errors.len(), 1);
        assert_eq!(check.errors[0].line_number, 4);
    }

    #[test]
    fn test_random_value_of_empty_type() {
        let pc = ParserContext::new();
        let slot = SlotType::new(&pc, "Empty");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(slot.random_value(&mut rng), "NOVALUE");
    }

    #[test]
    fn test_commands_rejected() {
        let pc = ParserContext::new();
        let mut slot = SlotType::new(&pc, "Color");
        let mut check = ParserContext::new();
        slot.process_command(&mut check, "anything at all");
        assert_eq!(check.errors.len(), 1);
        assert!(check.errors[0].text.contains("unrecognized command"));
    }

    #[test]
    fn test_interaction_rendering_omits_empty_synonyms() {
        let pc = ParserContext::new();
        let mut slot = SlotType::new(&pc, "Color");
        slot.add_value("red | reds");
        slot.add_value("blue");
        let def = slot.to_interaction();
        assert_eq!(def.values[0].name.synonyms, Some(vec!["reds".to_string()]));
        assert_eq!(def.values[1].name.synonyms, None);
    }
}
