//! `reactloop doctor` — Diagnose configuration and provider health.

use reactloop_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("reactloop doctor — System Diagnostics");
    println!("=====================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found at {}", config_path.display());
    } else {
        println!("  ⚠️  No config file at {} (using defaults)", config_path.display());
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. Fix the config before continuing.");
            return Ok(());
        }
    };

    println!(
        "  ✅ Provider: {} / model: {}",
        config.default_provider, config.default_model
    );

    match reactloop_providers::build_from_config(&config) {
        Ok(provider) => match provider.health_check().await {
            Ok(true) => println!("  ✅ Provider reachable"),
            Ok(false) => {
                println!("  ⚠️  Provider responded but reported unhealthy");
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider check failed: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
