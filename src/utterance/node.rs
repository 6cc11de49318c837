//! Utterance grammar nodes
//!
//! A single utterance line is parsed into a tree of `Part` nodes by a single
//! left-to-right character scan. Parentheses nest recursively, `|` separates
//! alternation options, and `{name}` marks a slot placeholder. The tree
//! supports full enumeration (the cross product of every alternation choice),
//! sample generation with concrete slot values, and slot-name collection.

use crate::context::ParserContext;
use crate::intent::Intent;
use crate::model::Model;
use rand::Rng;
use std::collections::BTreeMap;

/// A node in the parsed utterance tree.
///
/// Variation counts compose recursively: a sequence multiplies its parts, an
/// alternation sums its options, and leaf nodes contribute exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// A literal run of text, stored trimmed.
    Text { text: String },
    /// A `{name}` placeholder, stamped with the line it appeared on.
    Slot { name: String, line_number: usize },
    /// An ordered run of parts, concatenated on enumeration.
    Sequence { parts: Vec<Part> },
    /// A set of mutually exclusive options, each normally a sequence.
    Alternation { options: Vec<Part> },
}

impl Part {
    /// Parse one line of utterance text into a sequence node.
    ///
    /// The scan only recognizes structure at nesting depth 0; everything
    /// inside parentheses is collected verbatim and handed to a recursive
    /// parse when the group closes, so nested groups see their own content
    /// at depth 0.
    pub fn parse_sequence(pc: &mut ParserContext, text: &str) -> Part {
        let text = text.trim();
        let mut parts: Vec<Part> = Vec::new();
        let mut head = 0usize;
        let mut depth = 0i32;

        for (i, c) in text.char_indices() {
            if depth == 0 {
                if c == '{' {
                    push_text(&mut parts, &text[head..i]);
                    head = i + 1;
                }
                if c == '}' {
                    let name = text[head..i].trim().to_string();
                    push_item(
                        &mut parts,
                        Part::Slot {
                            name,
                            line_number: pc.line_number,
                        },
                    );
                    head = i + 1;
                }
            }

            if c == '(' {
                if depth == 0 {
                    if head < i {
                        push_text(&mut parts, &text[head..i]);
                    }
                    head = i + 1;
                }
                depth += 1;
            }
            if c == ')' {
                if depth == 1 {
                    let inner = Part::parse_sequence(pc, &text[head..i]);
                    push_item(&mut parts, inner);
                    head = i + 1;
                }
                depth -= 1;
            }

            if c == '|' && depth == 0 {
                push_text(&mut parts, &text[head..i]);
                head = i + 1;
                // a bare | starts a fresh option in the trailing alternation
                if let Some(Part::Alternation { options }) = parts.last_mut() {
                    options.push(Part::Sequence { parts: Vec::new() });
                }
            }
        }

        if head < text.len() {
            push_text(&mut parts, &text[head..]);
        }

        Part::Sequence { parts }
    }

    /// Collapse trivial nesting, bottom-up.
    ///
    /// A sequence with one part becomes that part, as does an alternation
    /// with one option. Sequences drop empty parts; alternations keep empty
    /// options because an empty alternative encodes an optional word.
    pub fn trim(self) -> Part {
        match self {
            Part::Sequence { parts } => {
                let mut parts: Vec<Part> = parts
                    .into_iter()
                    .map(Part::trim)
                    .filter(|p| !p.is_empty())
                    .collect();
                if parts.len() == 1 {
                    parts.pop().unwrap()
                } else {
                    Part::Sequence { parts }
                }
            }
            Part::Alternation { options } => {
                let mut options: Vec<Part> = options.into_iter().map(Part::trim).collect();
                if options.len() == 1 {
                    options.pop().unwrap()
                } else {
                    Part::Alternation { options }
                }
            }
            other => other,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Part::Text { text } => text.is_empty(),
            Part::Slot { name, .. } => name.is_empty(),
            Part::Sequence { parts } => parts.is_empty(),
            Part::Alternation { options } => options.is_empty(),
        }
    }

    /// Total number of concrete variations this node expands to.
    ///
    /// Equal to the length of the list `generate_all` produces. Deeply
    /// nested alternations can overflow `usize`, so the arithmetic
    /// saturates; a count of `usize::MAX` means "too many to enumerate".
    pub fn alternate_count(&self) -> usize {
        match self {
            Part::Text { .. } | Part::Slot { .. } => 1,
            Part::Sequence { parts } => parts
                .iter()
                .fold(1usize, |acc, p| acc.saturating_mul(p.alternate_count())),
            Part::Alternation { options } => options
                .iter()
                .fold(0usize, |acc, o| acc.saturating_add(o.alternate_count())),
        }
    }

    /// Canonical one-line rendering of the node.
    pub fn summary(&self) -> String {
        match self {
            Part::Text { text } => text.clone(),
            Part::Slot { name, .. } => format!("{{{}}}", name),
            Part::Sequence { parts } => parts
                .iter()
                .map(Part::summary)
                .collect::<Vec<_>>()
                .join(" "),
            Part::Alternation { options } => {
                if options.len() != 1 {
                    let joined = options
                        .iter()
                        .map(Part::summary)
                        .collect::<Vec<_>>()
                        .join("|");
                    format!("({})", joined)
                } else {
                    options[0].summary()
                }
            }
        }
    }

    /// Expand every combination, extending each word list in `list`.
    ///
    /// Slots contribute their `{name}` placeholder verbatim; concrete values
    /// are only substituted when generating samples.
    pub fn generate_all(&self, list: Vec<Vec<String>>) -> Vec<Vec<String>> {
        match self {
            Part::Text { text } => append_word(list, text),
            Part::Slot { name, .. } => append_word(list, &format!("{{{}}}", name)),
            Part::Sequence { parts } => parts.iter().fold(list, |acc, p| p.generate_all(acc)),
            Part::Alternation { options } => {
                let mut res = Vec::new();
                for option in options {
                    res.extend(option.generate_all(list.clone()));
                }
                res
            }
        }
    }

    /// Like `generate_all`, but slots draw a concrete value from the owning
    /// intent's bound slot type.
    pub fn generate_samples<R: Rng>(
        &self,
        list: Vec<Vec<String>>,
        intent: &Intent,
        model: &Model,
        rng: &mut R,
    ) -> Vec<Vec<String>> {
        match self {
            Part::Text { text } => append_word(list, text),
            // a fresh draw per row, so a sample batch shows the vocabulary
            Part::Slot { name, .. } => list
                .into_iter()
                .map(|mut words| {
                    words.push(intent.random_slot_value(model, name, rng));
                    words
                })
                .collect(),
            Part::Sequence { parts } => parts
                .iter()
                .fold(list, |acc, p| p.generate_samples(acc, intent, model, rng)),
            Part::Alternation { options } => {
                let mut res = Vec::new();
                for option in options {
                    res.extend(option.generate_samples(list.clone(), intent, model, rng));
                }
                res
            }
        }
    }

    /// Render one variation, choosing alternation options uniformly.
    pub fn pick_random<R: Rng>(&self, rng: &mut R) -> String {
        match self {
            Part::Text { text } => text.clone(),
            Part::Slot { name, .. } => format!("{{{}}}", name),
            Part::Sequence { parts } => parts
                .iter()
                .map(|p| p.pick_random(rng))
                .collect::<Vec<_>>()
                .join(" "),
            Part::Alternation { options } => {
                if options.is_empty() {
                    return String::new();
                }
                let i = rng.gen_range(0..options.len());
                options[i].pick_random(rng)
            }
        }
    }

    /// Count slot occurrences by name across the tree.
    pub fn collect_slot_names(&self, names: &mut BTreeMap<String, usize>) {
        match self {
            Part::Text { .. } => {}
            Part::Slot { name, .. } => {
                *names.entry(name.clone()).or_insert(0) += 1;
            }
            Part::Sequence { parts } => {
                for p in parts {
                    p.collect_slot_names(names);
                }
            }
            Part::Alternation { options } => {
                for o in options {
                    o.collect_slot_names(names);
                }
            }
        }
    }

    /// Collect every slot usage with its source line, for validation.
    pub fn collect_slot_usages(&self, usages: &mut Vec<SlotUsage>) {
        match self {
            Part::Text { .. } => {}
            Part::Slot { name, line_number } => usages.push(SlotUsage {
                name: name.clone(),
                line_number: *line_number,
            }),
            Part::Sequence { parts } => {
                for p in parts {
                    p.collect_slot_usages(usages);
                }
            }
            Part::Alternation { options } => {
                for o in options {
                    o.collect_slot_usages(usages);
                }
            }
        }
    }
}

/// One `{name}` occurrence inside an utterance tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotUsage {
    pub name: String,
    pub line_number: usize,
}

fn append_word(list: Vec<Vec<String>>, word: &str) -> Vec<Vec<String>> {
    list.into_iter()
        .map(|mut words| {
            words.push(word.to_string());
            words
        })
        .collect()
}

/// Append trimmed literal text, skipping runs that trim to nothing.
fn push_text(parts: &mut Vec<Part>, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    push_item(
        parts,
        Part::Text {
            text: text.to_string(),
        },
    );
}

/// Append an item, lazily wrapping it in a trailing alternation.
///
/// Every appended item lands inside the last option of the sequence's
/// trailing alternation; if the last part is not an alternation, a fresh
/// single-option one is created first. A `|` at depth 0 then extends that
/// alternation with a new empty option.
fn push_item(parts: &mut Vec<Part>, item: Part) {
    if !matches!(parts.last(), Some(Part::Alternation { .. })) {
        parts.push(Part::Alternation {
            options: Vec::new(),
        });
    }
    if let Some(Part::Alternation { options }) = parts.last_mut() {
        match options.last_mut() {
            Some(Part::Sequence { parts: seq }) => seq.push(item),
            _ => options.push(Part::Sequence { parts: vec![item] }),
        }
    }
}
