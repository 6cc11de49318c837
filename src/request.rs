//! Runtime request classification
//!
//! The counterpart to the interaction model: given an inbound structured
//! request from the voice platform, work out which intent it names and
//! resolve each slot value against the model's vocabulary. Resolution is a
//! case-insensitive exact match against canonical value names, first on the
//! top-level reported value and then on any values found in the attached
//! resolution-authority records; anything else is left unresolved with only
//! the raw value populated.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Sentinel intent name for requests that are not intent requests.
pub const NOT_INTENT: &str = "_NotIntent";

/// Sentinel intent name for input that is not a well-formed request.
pub const INVALID_INPUT: &str = "_InvalidInput";

/// Canonical value name → synonym list for one slot type.
pub type SlotValues = BTreeMap<String, Vec<String>>;

/// Intent name → slot name → vocabulary, derived from a parsed model via
/// `Model::intent_slot_mapping`. Serializable so it can ship alongside the
/// interaction model as a build artifact.
pub type IntentSlotMapping = BTreeMap<String, BTreeMap<String, SlotValues>>;

/// An inbound request, deserialized from the platform's JSON envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRequest {
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(default)]
    pub intent: Option<RequestIntent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestIntent {
    pub name: String,
    #[serde(default)]
    pub slots: BTreeMap<String, RequestSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSlot {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub resolutions: Option<Resolutions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolutions {
    #[serde(default)]
    pub resolutions_per_authority: Vec<ResolutionAuthority>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionAuthority {
    #[serde(default)]
    pub values: Vec<ResolutionValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionValue {
    pub value: ResolutionValueName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionValueName {
    pub name: String,
}

/// One slot from a classified request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassifiedSlot {
    /// The top-level value string as reported by the platform.
    pub raw: Option<String>,
    /// The canonical vocabulary value this slot resolved to, when it did.
    pub value: Option<String>,
}

impl ClassifiedSlot {
    /// Parse the raw value as a number, if it contains one.
    pub fn as_number(&self) -> Option<f64> {
        self.raw.as_ref()?.trim().parse().ok()
    }
}

/// Result of classifying a request: the intent name (or a sentinel) plus
/// every reported slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRequest {
    pub name: String,
    pub slots: BTreeMap<String, ClassifiedSlot>,
}

impl ClassifiedRequest {
    fn sentinel(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slots: BTreeMap::new(),
        }
    }

    pub fn is_intent(&self) -> bool {
        self.name != NOT_INTENT && self.name != INVALID_INPUT
    }
}

/// Classify a raw JSON request against a model-derived slot mapping.
///
/// Never fails: malformed input comes back as the `_InvalidInput` sentinel
/// and non-intent requests as `_NotIntent`.
pub fn classify_request(mapping: &IntentSlotMapping, request: &Value) -> ClassifiedRequest {
    if !request.is_object() {
        return ClassifiedRequest::sentinel(INVALID_INPUT);
    }

    let parsed: SkillRequest = match serde_json::from_value(request.clone()) {
        Ok(parsed) => parsed,
        Err(_) => return ClassifiedRequest::sentinel(INVALID_INPUT),
    };

    if parsed.request_type != "IntentRequest" {
        return ClassifiedRequest::sentinel(NOT_INTENT);
    }

    let intent = match parsed.intent {
        Some(intent) => intent,
        None => return ClassifiedRequest::sentinel(INVALID_INPUT),
    };

    let empty = BTreeMap::new();
    let slot_mapping = mapping.get(&intent.name).unwrap_or(&empty);

    let mut result = ClassifiedRequest {
        name: intent.name,
        slots: BTreeMap::new(),
    };

    for (slot_name, slot) in &intent.slots {
        let mut classified = ClassifiedSlot {
            raw: slot.value.clone(),
            value: None,
        };

        if let Some(values) = slot_mapping.get(slot_name) {
            classified.value = resolve_value(values, slot);
        }

        result.slots.insert(slot_name.clone(), classified);
    }

    result
}

/// Find an exact case-insensitive match for one of the vocabulary's
/// canonical value names; there may not be one.
fn resolve_value(values: &SlotValues, slot: &RequestSlot) -> Option<String> {
    // case-insensitive lookup table over the canonical names
    let value_map: BTreeMap<String, &String> = values
        .keys()
        .map(|name| (name.to_lowercase(), name))
        .collect();

    // is it the top level slot value?
    if let Some(raw) = &slot.value {
        if let Some(canonical) = value_map.get(&raw.to_lowercase()) {
            return Some((*canonical).clone());
        }
    }

    // no? dig into the resolution authorities then
    if let Some(resolutions) = &slot.resolutions {
        for authority in &resolutions.resolutions_per_authority {
            for auth_value in &authority.values {
                if let Some(canonical) = value_map.get(&auth_value.value.name.to_lowercase()) {
                    return Some((*canonical).clone());
                }
            }
        }
    }

    None
}
