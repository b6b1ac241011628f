//! Current local time.

use async_trait::async_trait;
use reactloop_core::error::ToolError;
use reactloop_core::tool::Tool;

pub struct CurrentTimeTool;

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time. Input is ignored."
    }

    async fn invoke(&self, _input: &str) -> Result<String, ToolError> {
        let now = chrono::Local::now();
        Ok(format!("Current time: {}", now.format("%Y-%m-%d %H:%M:%S")))
    }
}
