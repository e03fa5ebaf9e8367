// ABOUTME: Output module for rendering run results and execution plans
// ABOUTME: Selects a formatter by format name and writes the result to a file or stdout

pub mod error;
pub mod formatter;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::debug;

use self::error::{OutputError, Result};
use self::formatter::{JsonFormatter, OutputFormatter, TextFormatter, YamlFormatter};
use crate::engine::{ExecutionPlan, ExecutionReport, WorkflowContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn formatter(self) -> Box<dyn OutputFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter),
            OutputFormat::Json => Box::new(JsonFormatter::new_pretty()),
            OutputFormat::Yaml => Box::new(YamlFormatter),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(OutputError::UnknownFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        };
        write!(f, "{}", name)
    }
}

pub fn render_run(
    context: &WorkflowContext,
    report: &ExecutionReport,
    format: OutputFormat,
) -> Result<String> {
    format.formatter().format_run(context, report)
}

pub fn render_plan(
    workflow_id: &str,
    plan: &ExecutionPlan,
    format: OutputFormat,
) -> Result<String> {
    format.formatter().format_plan(workflow_id, plan)
}

/// Write rendered output to `destination`, or stdout when none is given
pub async fn write_output(content: &str, destination: Option<&Path>) -> Result<()> {
    let Some(path) = destination else {
        println!("{}", content.trim_end());
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    fs::write(path, content).await?;
    debug!("Wrote output to {}", path.display());

    Ok(())
}
