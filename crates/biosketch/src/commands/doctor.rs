//! Diagnostics command.

use anyhow::Result;
use biosketch_core::config::EnvVars;
use biosketch_core::{GeminiClient, ServiceConfig};
use colored::Colorize;

/// Variables the pipeline cannot run without
const REQUIRED_VARS: [&str; 2] = ["APIFY_API_KEY", "GEMINI_API_KEY"];

pub async fn execute(online: bool, env: &EnvVars) -> Result<()> {
    println!("{}", "biosketch Doctor".cyan().bold());
    println!("{}", "─".repeat(50));
    println!();

    // Check .env file
    print!("  .env file: ");
    match &env.source {
        Some(path) => println!("{}", format!("✓ {}", path.display()).green()),
        None => println!("{}", "○ not found (using process environment)".yellow()),
    }

    let issues = missing_vars(env);
    for var in REQUIRED_VARS {
        print!("  {}: ", var);
        if issues.contains(&var) {
            println!("{}", "✗ not set".red());
        } else {
            println!("{}", "✓ set".green());
        }
    }

    let config = match ServiceConfig::from_env(env) {
        Ok(config) => config,
        Err(e) => {
            println!();
            println!("{} {}", "✗".red(), e);
            anyhow::bail!("{} configuration issue(s) found", issues.len().max(1));
        }
    };

    println!("  Apify actor: {}", config.apify.actor_id);
    println!("  Gemini model: {}", config.gemini.model);

    if online {
        print!("  Gemini API: ");
        let client = GeminiClient::new(config.gemini.clone())?;
        match client.list_models().await {
            Ok(models) => {
                let available = models.iter().any(|m| m.is_model(client.model()));
                if available {
                    println!("{}", "✓ key valid, model available".green());
                } else {
                    println!("{}", "○ key valid, configured model not listed".yellow());
                }
            }
            Err(e) => {
                println!("{}", format!("✗ {}", e).red());
                anyhow::bail!("Gemini API check failed");
            }
        }
    }

    println!();
    println!("{}", "All checks passed".green().bold());
    Ok(())
}

fn missing_vars(env: &EnvVars) -> Vec<&'static str> {
    REQUIRED_VARS
        .into_iter()
        .filter(|var| env.get(var).is_none())
        .collect()
}
