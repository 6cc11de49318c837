//! Indentation-sensitive line parser
//!
//! Drives the whole pipeline: splits the input into lines, strips comments,
//! applies `$name` substitutions, tracks an indentation stack to decide what
//! each line belongs to, and dispatches to keyword handlers or the current
//! parent item's content handler. Per-line failures are recorded in the
//! `ParserContext` and never abort the parse.

use crate::context::ParserContext;
use crate::intent::Intent;
use crate::model::Model;
use crate::slot_type::SlotType;
use once_cell::sync::Lazy;
use regex_lite::Regex;

static SUBSTITUTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\$\w+)\s*=\s*(.*)").unwrap());

/// What a stack frame's declaration line created, addressed by index into
/// the model so later lines can mutate it.
#[derive(Debug, Clone, Copy)]
enum ParseItem {
    SlotType(usize),
    Intent(usize),
}

/// One indentation level and the item its declaration line created, if any.
#[derive(Debug)]
struct IndentFrame {
    prefix: usize,
    item: Option<ParseItem>,
}

/// A registered `$name` text substitution.
///
/// Replacement is a literal first-occurrence substring match per line; a
/// repeated `$name` on one line is only substituted once. Long-standing
/// behavior of the format, kept as-is.
#[derive(Debug)]
struct Substitution {
    name: String,
    contents: String,
}

impl Substitution {
    fn apply(&self, line: &str) -> String {
        line.replacen(&self.name, &self.contents, 1)
    }
}

/// Count of leading whitespace characters.
fn prefix_len(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Parse shorthand text into a model plus the diagnostics gathered along
/// the way. Never fails: malformed input shows up as recorded errors and a
/// best-effort partial model.
pub fn parse(input: &str) -> (Model, ParserContext) {
    let lines: Vec<&str> = input.split('\n').collect();

    let mut pc = ParserContext::new();
    let mut model = Model::new();

    // what object is present at each indentation level
    let mut indent_stack: Vec<IndentFrame> = vec![IndentFrame {
        prefix: 0,
        item: None,
    }];

    let mut substitutions: Vec<Substitution> = Vec::new();

    for line_number in 0..lines.len() {
        pc.line_number = line_number;
        let mut line = lines[line_number].to_string();

        // comments run to end of line
        if let Some(comment_pos) = line.find("//") {
            line.truncate(comment_pos);
        }

        // apply all known substitutions, in declaration order
        for sub in &substitutions {
            line = sub.apply(&line);
        }

        let trimmed = line.trim().to_string();
        if trimmed.is_empty() {
            continue;
        }

        let prefix = prefix_len(&line);
        let words: Vec<&str> = trimmed.split_whitespace().collect();

        if prefix > indent_stack.last().map(|f| f.prefix).unwrap_or(0) {
            indent_stack.push(IndentFrame { prefix, item: None });
        }
        while indent_stack.len() > 1 && prefix < indent_stack[indent_stack.len() - 1].prefix {
            indent_stack.pop();
        }
        if prefix != indent_stack[indent_stack.len() - 1].prefix {
            pc.error("white space mismatch, cannot match any previous indentation level, ignoring line");
            continue;
        }

        let parent_item = if indent_stack.len() >= 2 {
            Some(indent_stack[indent_stack.len() - 2].item)
        } else {
            None
        };

        // lines that begin with a $ are always a substitution definition
        if trimmed.starts_with('$') {
            match SUBSTITUTION_RE.captures(&trimmed) {
                Some(caps) => substitutions.push(Substitution {
                    name: caps[1].to_string(),
                    contents: caps[2].trim().to_string(),
                }),
                None => pc.error(
                    "could not determine name and contents for substitution. \
                     Name must be alpha numeric characters only, declaration \
                     should be in the form $yourName = any content you like",
                ),
            }
            continue;
        }

        // the first token determines what to do with the rest of the line
        match words[0] {
            "INVOCATION" => {
                model.invocation_name = trimmed[words[0].len()..].trim().to_string();
            }

            "SLOTTYPE" => {
                let Some(name) = words.get(1) else {
                    pc.error("SLOTTYPE requires a name");
                    continue;
                };
                if words.len() > 2 {
                    pc.error(format!(
                        "Too many words, SLOTTYPE name may not have any spaces in it, \
                         ignoring everything after {}",
                        name
                    ));
                }
                let slot_type = SlotType::new(&pc, *name);
                let index = model.add_slot_type(&mut pc, slot_type);
                let top = indent_stack.len() - 1;
                indent_stack[top].item = Some(ParseItem::SlotType(index));
            }

            "INTENT" => {
                let Some(name) = words.get(1) else {
                    pc.error("INTENT requires a name");
                    continue;
                };
                let intent = Intent::new(&pc, *name);
                let index = model.add_intent(&mut pc, intent);
                let top = indent_stack.len() - 1;
                indent_stack[top].item = Some(ParseItem::Intent(index));
            }

            "+" => {
                // a command for the object in the parent indentation
                let command = trimmed[1..].trim().to_string();
                match parent_item.flatten() {
                    Some(ParseItem::SlotType(i)) => {
                        model.slot_types[i].process_command(&mut pc, &command)
                    }
                    Some(ParseItem::Intent(i)) => {
                        model.intents[i].process_command(&mut pc, &command)
                    }
                    None => pc.error("no parent item to apply this command to"),
                }
            }

            _ => {
                // content for the parent frame's item
                match parent_item {
                    None => pc.error(
                        "cannot find anything to apply this line to. Is the indentation correct?",
                    ),
                    Some(Some(ParseItem::SlotType(i))) => model.slot_types[i].add_value(&trimmed),
                    Some(Some(ParseItem::Intent(i))) => {
                        model.intents[i].add_utterance(&mut pc, &trimmed)
                    }
                    // a frame that never declared anything swallows content
                    Some(None) => {}
                }
            }
        }
    }

    model.validate(&mut pc);

    (model, pc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_line() {
        let (model, pc) = parse("INVOCATION hello new world");
        assert!(pc.errors.is_empty());
        assert_eq!(model.invocation_name, "hello new world");
    }

    #[test]
    fn test_invocation_last_write_wins() {
        let (model, _) = parse("INVOCATION first try\nINVOCATION second try");
        assert_eq!(model.invocation_name, "second try");
    }

    #[test]
    fn test_slot_type_with_values() {
        let (model, pc) = parse("SLOTTYPE Color\n  red | reds\n  blue");
        assert!(pc.errors.is_empty());
        let slot_type = model.slot_type("Color").expect("declared");
        assert_eq!(slot_type.values.len(), 2);
        assert_eq!(slot_type.values[0].synonyms, vec!["reds"]);
    }

    #[test]
    fn test_slot_type_name_with_spaces() {
        let (model, pc) = parse("SLOTTYPE Color Extra\n  red");
        assert_eq!(pc.errors.len(), 1);
        assert!(pc.errors[0].text.contains("Too many words"));
        // the second token is still used as the name
        assert!(model.slot_type("Color").is_some());
    }

    #[test]
    fn test_missing_slot_type_name() {
        let (_, pc) = parse("SLOTTYPE");
        assert_eq!(pc.errors.len(), 1);
        assert!(pc.errors[0].text.contains("requires a name"));
    }

    #[test]
    fn test_whitespace_mismatch_skips_line() {
        let input = "INTENT hello\n    hello there\n  mismatched line";
        let (model, pc) = parse(input);
        assert!(pc
            .errors
            .iter()
            .any(|e| e.text.contains("white space mismatch")));
        assert_eq!(model.intent("hello").unwrap().utterances.len(), 1);
    }

    #[test]
    fn test_command_without_parent() {
        let (_, pc) = parse("+ count as AMAZON.NUMBER");
        assert_eq!(pc.errors.len(), 1);
        assert!(pc.errors[0].text.contains("no parent item"));
    }

    #[test]
    fn test_content_without_parent() {
        let (_, pc) = parse("just some words");
        assert!(pc
            .errors
            .iter()
            .any(|e| e.text.contains("cannot find anything to apply")));
    }

    #[test]
    fn test_malformed_substitution() {
        let (_, pc) = parse("$broken substitution with no equals");
        assert_eq!(pc.errors.len(), 1);
        assert!(pc.errors[0].text.contains("substitution"));
    }

    #[test]
    fn test_substitution_not_retroactive() {
        // $greet is defined after the line that mentions it mid-text,
        // so the mention stays literal
        let input = "INTENT hello\n  say $greet world\n$greet = hi";
        let (model, pc) = parse(input);
        assert!(pc.errors.is_empty());
        let lines = model.intent("hello").unwrap().generate_utterances();
        assert_eq!(lines, vec!["say $greet world"]);
    }

    #[test]
    fn test_leading_dollar_line_is_never_an_utterance() {
        // a trimmed line starting with $ is always read as a substitution
        // definition, even indented under an intent
        let input = "INTENT hello\n  $greet world\n$greet = hi";
        let (model, pc) = parse(input);
        assert!(pc
            .errors
            .iter()
            .any(|e| e.text.contains("substitution")));
        assert!(model.intent("hello").unwrap().utterances.is_empty());
    }

    #[test]
    fn test_substitution_replaces_first_occurrence_only() {
        let input = "$w = hello\nINTENT hello\n  $w and $w again";
        let (model, _) = parse(input);
        let lines = model.intent("hello").unwrap().generate_utterances();
        assert_eq!(lines, vec!["hello and $w again"]);
    }

    #[test]
    fn test_blank_and_comment_only_lines_skipped() {
        let input = "\n// a comment on its own\n   \nINVOCATION test app\n";
        let (model, pc) = parse(input);
        assert!(pc.errors.is_empty());
        assert_eq!(model.invocation_name, "test app");
    }
}
