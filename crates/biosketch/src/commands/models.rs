//! Model listing command.

use anyhow::Result;
use biosketch_core::types::ModelInfo;
use biosketch_core::{GeminiClient, ServiceConfig};
use colored::Colorize;

pub async fn execute(generate_only: bool, config: &ServiceConfig) -> Result<()> {
    let client = GeminiClient::new(config.gemini.clone())?;
    let models = client.list_models().await?;

    let shown: Vec<&ModelInfo> = models
        .iter()
        .filter(|m| !generate_only || m.supports_generate_content())
        .collect();

    if shown.is_empty() {
        println!("{}", "No models found".yellow());
        return Ok(());
    }

    for model in &shown {
        println!("{}", format_model(model, model.is_model(client.model())));
    }

    println!();
    println!("{} model(s)", shown.len());
    Ok(())
}

fn format_model(model: &ModelInfo, configured: bool) -> String {
    let name = if configured {
        format!("{} {}", model.name.green().bold(), "(configured)".green())
    } else {
        model.name.bold().to_string()
    };

    format!(
        "Model Name: {}\nDisplay Name: {}\nDescription: {}\nSupported Methods: {}\n---",
        name,
        model.display_name,
        model.description,
        model.supported_generation_methods.join(", ")
    )
}
