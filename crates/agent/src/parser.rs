//! Response parser — pulls a structured action out of free-form model text.
//!
//! The grammar is two consecutive lines:
//!
//! ```text
//! Action: <tool name>
//! Action Input: <single-line input>
//! ```
//!
//! Matching is ASCII case-insensitive and takes the first line pair that
//! fits. Input spanning more than one line is not supported; only the line
//! directly after `Action Input:` is used. Parsing never fails: anything
//! that does not fit the grammar degrades to "no action".

use reactloop_core::action::Action;

use crate::termination::TerminationDetector;

const ACTION_TAG: &str = "action:";
const INPUT_TAG: &str = "action input:";

/// What the parser found in one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedAction {
    Action(Action),
    NoAction,
    /// An `Action:` line was present but no valid pair followed it.
    Malformed { reason: String },
}

impl ParsedAction {
    pub fn action(&self) -> Option<&Action> {
        match self {
            Self::Action(a) => Some(a),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub action: ParsedAction,
    /// Set when the detector considers the text final, whether or not an
    /// action was also found.
    pub terminal_hint: bool,
}

/// Parse one assistant response.
pub fn parse_response(text: &str, detector: &dyn TerminationDetector) -> ParsedResponse {
    ParsedResponse {
        action: parse_action(text),
        terminal_hint: detector.is_terminal(text),
    }
}

/// Find the first `Action:` / `Action Input:` line pair.
pub fn parse_action(text: &str) -> ParsedAction {
    let lines: Vec<&str> = text.lines().collect();
    let mut first_problem: Option<String> = None;

    for (i, line) in lines.iter().enumerate() {
        let Some(name) = value_after(line, ACTION_TAG) else {
            continue;
        };

        let problem = match lines.get(i + 1) {
            None => "no 'Action Input:' line after the action".to_string(),
            Some(next) => match input_value(next) {
                None => "line after the action does not start with 'Action Input:'".to_string(),
                Some(_) if name.is_empty() => "action name is empty".to_string(),
                Some("") => "action input is empty".to_string(),
                Some(input) => return ParsedAction::Action(Action::new(name, input)),
            },
        };

        first_problem.get_or_insert(problem);
    }

    match first_problem {
        Some(reason) => ParsedAction::Malformed { reason },
        None => ParsedAction::NoAction,
    }
}

/// Trimmed remainder of `line` after the first case-insensitive `tag`.
fn value_after<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    // ASCII lowercasing keeps byte offsets valid for `line`.
    let idx = line.to_ascii_lowercase().find(tag)?;
    Some(line[idx + tag.len()..].trim())
}

/// Value of an `Action Input:` line; the tag must open the line.
fn input_value(line: &str) -> Option<&str> {
    let line = line.trim_start();
    let head = line.get(..INPUT_TAG.len())?;
    if head.eq_ignore_ascii_case(INPUT_TAG) {
        Some(line[INPUT_TAG.len()..].trim())
    } else {
        None
    }
}
