//! `reactloop solve` — Run one problem through the loop and print the result.

use reactloop_agent::{LoopResult, ReactAgent};
use reactloop_config::{AppConfig, ConfigError};

pub async fn run(
    problem: String,
    max_iterations: Option<usize>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let provider = match reactloop_providers::build_from_config(&config) {
        Ok(p) => p,
        Err(ConfigError::MissingApiKey) => {
            print_key_help();
            return Err("No API key found. See above for setup instructions.".into());
        }
        Err(e) => return Err(e.into()),
    };

    let agent = ReactAgent::from_config(&config, provider)?;

    let result = match max_iterations {
        Some(n) => agent.solve_with_limit(&problem, n).await,
        None => agent.solve(&problem).await,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    if let Some(err) = &result.error {
        return Err(format!("Reasoning service failed: {err}").into());
    }

    Ok(())
}

fn print_key_help() {
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    OPENAI_API_KEY      = 'sk-...'");
    eprintln!("    OPENROUTER_API_KEY  = 'sk-or-v1-...'");
    eprintln!("    REACTLOOP_API_KEY   = '...'          (generic)");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
}

fn print_result(result: &LoopResult) {
    println!("Problem: {}", result.problem);
    println!("{}", "=".repeat(60));

    for thought in &result.thoughts {
        println!("\n--- Iteration {} ---", thought.iteration);
        println!("{}", thought.response);
    }

    if !result.action_log.is_empty() {
        println!("\nActions taken:");
        for (i, record) in result.action_log.iter().enumerate() {
            println!(
                "  {}. {}({}) -> {}",
                i + 1,
                record.action.tool_name,
                record.action.input,
                record.observation.text
            );
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("Final response:\n{}", result.final_text);
    println!(
        "\n[{} reasoning call(s), stopped by {}]",
        result.iterations, result.terminated_by
    );
}
