//! Word and character counts.

use async_trait::async_trait;
use reactloop_core::error::ToolError;
use reactloop_core::tool::Tool;

pub struct WordCountTool;

#[async_trait]
impl Tool for WordCountTool {
    fn name(&self) -> &str {
        "word_count"
    }

    fn description(&self) -> &str {
        "Count words and characters in text."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let words = input.split_whitespace().count();
        let chars = input.chars().count();
        Ok(format!("Word count: {words}, Character count: {chars}"))
    }
}
