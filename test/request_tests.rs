//! Request classification integration tests
//!
//! Drives the runtime classifier with a slot mapping derived from a parsed
//! shorthand model, end to end.

use serde_json::json;
use vui_shorthand::{classify_request, parse, INVALID_INPUT, NOT_INTENT};

const SKIRMISH: &str = include_str!("fixtures/skirmish.als");

#[test]
fn test_mapping_covers_custom_typed_slots_only() {
    let (model, pc) = parse(SKIRMISH);
    assert!(!pc.has_errors());

    let mapping = model.intent_slot_mapping();
    assert_eq!(mapping.len(), 2);

    let order = mapping.get("OrderManeuver").unwrap();
    assert!(order.contains_key("ship"));
    assert!(order.contains_key("maneuver"));

    // the AMAZON.NUMBER slot does not carry a vocabulary
    let launch = mapping.get("LaunchShips").unwrap();
    assert!(launch.contains_key("ship"));
    assert!(!launch.contains_key("count"));

    // built-in intents never appear
    assert!(!mapping.contains_key("AMAZON.FallbackIntent"));

    let ship_values = order.get("ship").unwrap();
    assert_eq!(
        ship_values.get("fighter").unwrap(),
        &vec!["fast attack".to_string(), "interceptor".to_string()]
    );
}

#[test]
fn test_classify_intent_with_resolved_slots() {
    let (model, _) = parse(SKIRMISH);
    let mapping = model.intent_slot_mapping();

    let request = json!({
        "type": "IntentRequest",
        "intent": {
            "name": "OrderManeuver",
            "slots": {
                "ship": { "value": "Fighter" },
                "maneuver": {
                    "value": "fall back",
                    "resolutions": {
                        "resolutionsPerAuthority": [
                            { "values": [ { "value": { "name": "Retreat" } } ] }
                        ]
                    }
                }
            }
        }
    });

    let result = classify_request(&mapping, &request);
    assert!(result.is_intent());
    assert_eq!(result.name, "OrderManeuver");

    // top-level match, case-insensitive
    let ship = result.slots.get("ship").unwrap();
    assert_eq!(ship.value.as_deref(), Some("fighter"));

    // "fall back" is only a synonym, so the match comes from resolutions
    let maneuver = result.slots.get("maneuver").unwrap();
    assert_eq!(maneuver.raw.as_deref(), Some("fall back"));
    assert_eq!(maneuver.value.as_deref(), Some("retreat"));
}

#[test]
fn test_classify_numeric_slot() {
    let (model, _) = parse(SKIRMISH);
    let mapping = model.intent_slot_mapping();

    let request = json!({
        "type": "IntentRequest",
        "intent": {
            "name": "LaunchShips",
            "slots": {
                "count": { "value": "3" },
                "ship": { "value": "scout" }
            }
        }
    });

    let result = classify_request(&mapping, &request);
    assert_eq!(result.name, "LaunchShips");

    let count = result.slots.get("count").unwrap();
    assert_eq!(count.value, None);
    assert_eq!(count.as_number(), Some(3.0));

    assert_eq!(result.slots.get("ship").unwrap().value.as_deref(), Some("scout"));
}

#[test]
fn test_sentinels() {
    let (model, _) = parse(SKIRMISH);
    let mapping = model.intent_slot_mapping();

    let launch = classify_request(&mapping, &json!({ "type": "LaunchRequest" }));
    assert_eq!(launch.name, NOT_INTENT);
    assert!(!launch.is_intent());

    let garbage = classify_request(&mapping, &json!([1, 2, 3]));
    assert_eq!(garbage.name, INVALID_INPUT);

    let missing_intent = classify_request(&mapping, &json!({ "type": "IntentRequest" }));
    assert_eq!(missing_intent.name, INVALID_INPUT);
}

#[test]
fn test_unknown_intent_passes_through_unresolved() {
    let (model, _) = parse(SKIRMISH);
    let mapping = model.intent_slot_mapping();

    let request = json!({
        "type": "IntentRequest",
        "intent": {
            "name": "SelfDestruct",
            "slots": { "ship": { "value": "fighter" } }
        }
    });

    let result = classify_request(&mapping, &request);
    assert_eq!(result.name, "SelfDestruct");
    assert!(result.is_intent());
    assert_eq!(result.slots.get("ship").unwrap().value, None);
}
