//! Sketch generation command.

use anyhow::Result;
use biosketch_core::{ApifyClient, GeminiClient, ServiceConfig, SketchOrchestrator};
use colored::Colorize;
use serde_json::json;
use std::sync::Arc;

pub async fn execute(url: &str, as_json: bool, config: &ServiceConfig) -> Result<()> {
    let orchestrator = SketchOrchestrator::new(
        Arc::new(ApifyClient::new(config.apify.clone())?),
        Arc::new(GeminiClient::new(config.gemini.clone())?),
    );

    if !as_json {
        eprintln!("{} {}", "Generating sketch for".cyan(), url.bold());
    }

    let result = orchestrator.handle(Some(url)).await;

    if as_json {
        println!("{}", render_json(&result));
    }

    match result {
        Ok(sketch) => {
            if !as_json {
                println!("{}", sketch);
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Same payload shape as `POST /generate`
fn render_json(result: &biosketch_core::Result<String>) -> String {
    let payload = match result {
        Ok(sketch) => json!({"success": true, "biographical_sketch": sketch}),
        Err(e) => json!({"error": e.to_string(), "code": e.code()}),
    };
    serde_json::to_string_pretty(&payload).unwrap_or_default()
}
