//! Prompt composition.
//!
//! Pure functions of (tools, problem, history) that produce the turn list
//! sent to the reasoning service. No I/O happens here.

use reactloop_core::action::Observation;
use reactloop_core::message::Turn;
use reactloop_core::tool::ToolRegistry;

/// The system turn: tool enumeration plus the action grammar.
pub fn system_turn(tools: &ToolRegistry) -> Turn {
    let tool_lines: Vec<String> = tools
        .list()
        .map(|t| format!("- {}: {}", t.name(), t.description()))
        .collect();

    Turn::system(format!(
        "You are a helpful assistant that can think step by step and use tools to solve problems.\n\
         You have access to the following tools:\n\
         \n\
         {}\n\
         \n\
         To use a tool, format your response as:\n\
         Action: tool_name\n\
         Action Input: input_for_tool\n\
         \n\
         You can think about the problem by starting with \"Thought:\" and then take actions.\n\
         After using a tool, you'll receive an \"Observation:\" with the result.\n\
         When you are done, write \"Final Answer:\" followed by your answer.",
        tool_lines.join("\n")
    ))
}

/// The opening user turn carrying the problem statement.
pub fn problem_turn(problem: &str) -> Turn {
    Turn::user(format!("Problem: {problem}\n\nLet me solve this step by step:"))
}

/// A synthesized user turn reporting a dispatch result.
pub fn observation_turn(observation: &Observation) -> Turn {
    Turn::user(format!("Observation: {}", observation.text))
}

/// Full message list: system turn, problem turn, then `history` in order.
pub fn compose(tools: &ToolRegistry, problem: &str, history: &[Turn]) -> Vec<Turn> {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(system_turn(tools));
    turns.push(problem_turn(problem));
    turns.extend_from_slice(history);
    turns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::EchoTool;
    use reactloop_core::message::Role;

    fn registry() -> ToolRegistry {
        let mut r = ToolRegistry::new();
        r.register(Box::new(EchoTool::named("zeta"))).unwrap();
        r.register(Box::new(EchoTool::named("alpha"))).unwrap();
        r
    }

    #[test]
    fn system_turn_lists_tools_in_order() {
        let turn = system_turn(&registry());
        assert_eq!(turn.role, Role::System);

        let zeta = turn.content.find("- zeta: ").unwrap();
        let alpha = turn.content.find("- alpha: ").unwrap();
        assert!(zeta < alpha);
        assert!(turn.content.contains("Action: tool_name\nAction Input: input_for_tool"));
        assert!(turn.content.contains("Final Answer:"));
    }

    #[test]
    fn problem_turn_format() {
        let turn = problem_turn("What is 12*7?");
        assert_eq!(turn.role, Role::User);
        assert!(turn.content.starts_with("Problem: What is 12*7?"));
        assert!(turn.content.ends_with("Let me solve this step by step:"));
    }

    #[test]
    fn observation_turn_format() {
        let turn = observation_turn(&Observation::success("Result: 84"));
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "Observation: Result: 84");
    }

    #[test]
    fn compose_appends_history() {
        let tools = registry();
        let history = vec![
            Turn::assistant("Action: zeta\nAction Input: x"),
            Turn::user("Observation: x"),
        ];

        let turns = compose(&tools, "p", &history);
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, Role::System);
        assert_eq!(turns[1].content, problem_turn("p").content);
        assert_eq!(turns[2].role, Role::Assistant);
        assert_eq!(turns[3].content, "Observation: x");

        // Pure: same inputs, same text.
        let again = compose(&tools, "p", &history);
        let a: Vec<_> = turns.iter().map(|t| &t.content).collect();
        let b: Vec<_> = again.iter().map(|t| &t.content).collect();
        assert_eq!(a, b);
    }
}
