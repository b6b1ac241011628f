//! Actions parsed from model output and the observations they produce.

use serde::{Deserialize, Serialize};

/// A request to invoke a tool, parsed from one model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Name of the tool to invoke
    pub tool_name: String,

    /// Single-line input passed to the tool verbatim
    pub input: String,
}

impl Action {
    pub fn new(tool_name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            input: input.into(),
        }
    }
}

/// The result of dispatching an action, fed back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub text: String,
    pub is_error: bool,
}

impl Observation {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// One executed action and what came of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action: Action,
    pub observation: Observation,
}

/// Ordered record of executed actions, kept for diagnostics and display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog {
    records: Vec<ActionRecord>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action, observation: Observation) {
        self.records.push(ActionRecord {
            action,
            observation,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActionRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a ActionLog {
    type Item = &'a ActionRecord;
    type IntoIter = std::slice::Iter<'a, ActionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
