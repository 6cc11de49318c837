//! Interaction model data types
//!
//! serde-serializable structures matching the nested interaction-model JSON
//! the voice platform consumes: `interactionModel.languageModel` carrying
//! the invocation name, the intents with their generated samples and slot
//! declarations, and the custom slot types with value/synonym vocabularies.

use serde::{Deserialize, Serialize};

/// Top-level interaction model document (output artifact #1).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionModel {
    pub interaction_model: InteractionModelBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionModelBody {
    pub language_model: LanguageModel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageModel {
    pub invocation_name: String,
    pub intents: Vec<IntentDef>,
    pub types: Vec<SlotTypeDef>,
}

/// One intent entry: its name, generated sample utterances and, when any
/// slots are bound, the slot declarations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDef {
    pub name: String,
    pub samples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<IntentSlotDef>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentSlotDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotTypeDef {
    pub name: String,
    pub values: Vec<SlotValueDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotValueDef {
    pub name: SlotValueName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotValueName {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let model = InteractionModel {
            interaction_model: InteractionModelBody {
                language_model: LanguageModel {
                    invocation_name: "test app".to_string(),
                    intents: vec![IntentDef {
                        name: "doIt".to_string(),
                        samples: vec!["do it".to_string()],
                        slots: Some(vec![IntentSlotDef {
                            name: "count".to_string(),
                            type_name: "AMAZON.NUMBER".to_string(),
                        }]),
                    }],
                    types: vec![],
                },
            },
        };

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(
            json["interactionModel"]["languageModel"]["invocationName"],
            "test app"
        );
        assert_eq!(
            json["interactionModel"]["languageModel"]["intents"][0]["slots"][0]["type"],
            "AMAZON.NUMBER"
        );
    }

    #[test]
    fn test_slotless_intent_omits_slots_key() {
        let intent = IntentDef {
            name: "plain".to_string(),
            samples: vec![],
            slots: None,
        };
        let json = serde_json::to_string(&intent).unwrap();
        assert!(!json.contains("slots"));
    }

    #[test]
    fn test_value_without_synonyms_omits_key() {
        let value = SlotValueDef {
            name: SlotValueName {
                value: "red".to_string(),
                synonyms: None,
            },
        };
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"name":{"value":"red"}}"#);
    }
}
