// ABOUTME: Command implementations for the switchyard CLI
// ABOUTME: Handles execution of the run, plan and demo commands

use anyhow::Result;
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

use super::config::Config;
use crate::engine::Orchestrator;
use crate::output::{self, OutputFormat};
use crate::parser::{WorkflowDefinition, WorkflowParser};
use crate::tasks::{self, TaskRegistry};

/// Execute a workflow command
pub async fn run_workflow(
    workflow_path: PathBuf,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    info!("Starting workflow execution: {}", workflow_path.display());

    let mut definition = load_definition(&workflow_path).await?;
    definition.merge_variables(config.variables.clone());
    info!(
        "Loaded workflow: {} ({} variables)",
        definition.name,
        definition.variables.len()
    );

    let registry = TaskRegistry::new();
    let orchestrator = definition
        .build_orchestrator(&registry)
        .map_err(|e| anyhow::anyhow!("Failed to build workflow: {}", e))?;

    execute_and_render(
        orchestrator,
        definition.initial_data(),
        format.unwrap_or(config.output_format),
        output,
    )
    .await
}

/// Print the execution plan of a workflow file
pub async fn show_plan(
    workflow_path: PathBuf,
    format: Option<OutputFormat>,
    config: &Config,
) -> Result<()> {
    info!("Planning workflow: {}", workflow_path.display());

    let definition = load_definition(&workflow_path).await?;
    let orchestrator = definition
        .build_orchestrator(&TaskRegistry::new())
        .map_err(|e| anyhow::anyhow!("Failed to build workflow: {}", e))?;

    let plan = orchestrator
        .build_execution_plan()
        .map_err(|e| anyhow::anyhow!("Failed to build execution plan: {}", e))?;

    let rendered = output::render_plan(
        orchestrator.workflow_id(),
        &plan,
        format.unwrap_or(config.output_format),
    )?;
    output::write_output(&rendered, None).await?;

    Ok(())
}

/// Run the built-in data pipeline
pub async fn run_demo(source: String, format: Option<OutputFormat>, config: &Config) -> Result<()> {
    info!("Running demo pipeline with source: {}", source);

    let orchestrator = tasks::data_pipeline("data_pipeline", source);

    let mut initial_data = HashMap::from([("batch_id".to_string(), json!("batch_001"))]);
    initial_data.extend(config.variables.clone());

    execute_and_render(
        orchestrator,
        initial_data,
        format.unwrap_or(config.output_format),
        None,
    )
    .await
}

async fn load_definition(workflow_path: &Path) -> Result<WorkflowDefinition> {
    WorkflowParser::new()
        .parse_file(workflow_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to parse workflow: {}", e))
}

async fn execute_and_render(
    mut orchestrator: Orchestrator,
    initial_data: HashMap<String, serde_json::Value>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let context = orchestrator
        .execute(Some(initial_data))
        .await
        .map_err(|e| anyhow::anyhow!("Workflow execution failed: {}", e))?;

    let report = orchestrator
        .last_report()
        .ok_or_else(|| anyhow::anyhow!("Workflow finished without an execution report"))?;

    let rendered = output::render_run(&context, report, format)?;
    output::write_output(&rendered, output.as_deref()).await?;

    if let Some(path) = &output {
        info!("Results written to: {}", path.display());
    }

    // Return error if the run halted to ensure proper exit code
    match &report.failure {
        None => Ok(()),
        Some(failure) => Err(anyhow::anyhow!(
            "Workflow '{}' halted: task '{}' failed: {}",
            report.workflow_id,
            failure.task_id,
            failure.message
        )),
    }
}
