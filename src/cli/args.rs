// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and subcommands for switchyard

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "switchyard")]
#[command(about = "A minimal dependency-ordered workflow orchestrator")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute a workflow from a YAML file
    Run {
        #[arg(help = "Path to workflow YAML file")]
        workflow: PathBuf,

        #[arg(
            short = 'V',
            long = "var",
            help = "Seed shared data (key=value, value parsed as JSON when possible)"
        )]
        vars: Vec<String>,

        #[arg(short, long, value_enum, help = "Output format")]
        format: Option<OutputFormat>,

        #[arg(short, long, help = "Write output to this file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Print the execution plan of a workflow without running it
    Plan {
        #[arg(help = "Path to workflow YAML file")]
        workflow: PathBuf,

        #[arg(short, long, value_enum, help = "Output format")]
        format: Option<OutputFormat>,
    },

    /// Run the built-in extract, validate and transform pipeline
    Demo {
        #[arg(long, help = "Source name for the extract stage", default_value = "database")]
        source: String,

        #[arg(short, long, value_enum, help = "Output format")]
        format: Option<OutputFormat>,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse variables from key=value format
    pub fn parse_variables(vars: &[String]) -> anyhow::Result<HashMap<String, Value>> {
        let mut variables = HashMap::new();

        for var in vars {
            if let Some((key, value)) = var.split_once('=') {
                // Bare words are not valid JSON and stay strings
                let value = serde_json::from_str(value)
                    .unwrap_or_else(|_| Value::String(value.to_string()));
                variables.insert(key.to_string(), value);
            } else {
                return Err(anyhow::anyhow!(
                    "Invalid variable format '{}'. Expected 'key=value'",
                    var
                ));
            }
        }

        Ok(variables)
    }
}
