//! vui-shorthand - Voice Model Shorthand Compiler
//!
//! Compiles a compact line-oriented shorthand describing a voice-assistant
//! language model (invocation phrase, slot types with value/synonym lists,
//! intents with templated sample utterances) into two artifacts: a nested
//! interaction-model structure ready for the voice platform, and an
//! intent/slot mapping backing a runtime request classifier.
//!
//! # Input format
//!
//! ```text
//! $size = (small|large)              // substitution, usable below
//! INVOCATION potato orderer
//!
//! SLOTTYPE PotatoKind
//!   russet | idaho
//!   sweet
//!
//! INTENT OrderPotato
//!   (I|we) (want|would like) {count} $size {kind} potatoes
//!   + count as AMAZON.NUMBER
//!   + kind as PotatoKind
//!   + utterance limit 1000
//! ```
//!
//! Utterance lines expand combinatorially: `(a|b)` alternates, a trailing
//! empty option `(a|)` makes a word optional, `{name}` marks a slot. When an
//! intent expands past its utterance limit, a fixed-seed random subset keeps
//! output stable and diffable.
//!
//! # Example
//!
//! ```rust
//! use vui_shorthand::parse;
//!
//! let (model, diagnostics) = parse("INVOCATION demo app\nINTENT hello\n  (hi|hello) there");
//! assert!(!diagnostics.has_errors());
//! let rendered = model.to_interaction_model();
//! assert_eq!(rendered.interaction_model.language_model.invocation_name, "demo app");
//! ```
//!
//! # Pipeline
//!
//! ```text
//! shorthand text → line parser (indent stack, substitutions, keywords)
//!                → Model { SlotTypes, Intents { Utterances } }
//!                → validate (cross-references, diagnostics)
//!                → interaction model JSON + intent slot mapping
//! ```
//!
//! Parsing never aborts on malformed input: every failure is recorded as a
//! line-tagged diagnostic and the parse continues, so a partially broken
//! file still yields a model and a complete error report.

#![warn(clippy::all)]

pub mod context;
pub mod intent;
pub mod interaction;
pub mod model;
pub mod parser;
pub mod request;
pub mod slot_type;
pub mod utterance;

// Re-export commonly used types
pub use context::{LineText, ParserContext};
pub use intent::{FallbackSensitivity, Intent, IntentSlotInfo, DEFAULT_UTTERANCE_LIMIT};
pub use interaction::InteractionModel;
pub use model::{Model, BUILTIN_PREFIX, FALLBACK_INTENT, NUMBER_TYPE, REQUIRED_INTENTS};
pub use parser::parse;
pub use request::{
    classify_request, ClassifiedRequest, ClassifiedSlot, IntentSlotMapping, SkillRequest,
    INVALID_INPUT, NOT_INTENT,
};
pub use slot_type::{SlotType, SlotValue};
pub use utterance::{Part, SlotUsage, Utterance};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
