//! CLI argument definitions using clap derive macros.

use clap::{Parser, Subcommand};

/// Biosketch CLI
///
/// Generate NIH Biographical Sketches from LinkedIn profile URLs.
#[derive(Parser, Debug)]
#[command(name = "biosketch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a biographical sketch for a profile URL
    Generate {
        /// LinkedIn profile URL
        url: String,

        /// Print the same JSON payload the server returns
        #[arg(long)]
        json: bool,
    },

    /// List models available to the Gemini API key
    Models {
        /// Only show models that support generateContent
        #[arg(long)]
        generate_only: bool,
    },

    /// Check configuration and credentials
    Doctor {
        /// Also call the Gemini API to verify the key
        #[arg(long)]
        online: bool,
    },

    /// Show version information
    Version,
}
