// ABOUTME: Output formatters for run results and execution plans (text, JSON, YAML)
// ABOUTME: Handles serialization and presentation of the final context and report

use serde::Serialize;

use super::error::Result;
use crate::engine::{ExecutionPlan, ExecutionReport, WorkflowContext};

pub trait OutputFormatter: Send + Sync {
    fn format_run(&self, context: &WorkflowContext, report: &ExecutionReport) -> Result<String>;

    fn format_plan(&self, workflow_id: &str, plan: &ExecutionPlan) -> Result<String>;
}

#[derive(Serialize)]
struct RunDocument<'a> {
    report: &'a ExecutionReport,
    success_rate: f64,
    context: &'a WorkflowContext,
}

#[derive(Serialize)]
struct PlanDocument<'a> {
    workflow_id: &'a str,
    plan: &'a ExecutionPlan,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct YamlFormatter;

pub struct TextFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn new_pretty() -> Self {
        Self { pretty: true }
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<String> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(encoded)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_run(&self, context: &WorkflowContext, report: &ExecutionReport) -> Result<String> {
        self.encode(&RunDocument {
            report,
            success_rate: report.success_rate(),
            context,
        })
    }

    fn format_plan(&self, workflow_id: &str, plan: &ExecutionPlan) -> Result<String> {
        self.encode(&PlanDocument { workflow_id, plan })
    }
}

impl OutputFormatter for YamlFormatter {
    fn format_run(&self, context: &WorkflowContext, report: &ExecutionReport) -> Result<String> {
        Ok(serde_yaml::to_string(&RunDocument {
            report,
            success_rate: report.success_rate(),
            context,
        })?)
    }

    fn format_plan(&self, workflow_id: &str, plan: &ExecutionPlan) -> Result<String> {
        Ok(serde_yaml::to_string(&PlanDocument { workflow_id, plan })?)
    }
}

impl OutputFormatter for TextFormatter {
    fn format_run(&self, context: &WorkflowContext, report: &ExecutionReport) -> Result<String> {
        let mut out = format!(
            "Workflow '{}' (run {}): {}\n",
            report.workflow_id, report.run_id, report.outcome
        );
        out.push_str(&format!("Plan: {}\n", report.plan.join(" -> ")));
        out.push_str(&format!("Report: {}\n", report));

        if let Some(failure) = &report.failure {
            out.push_str(&format!(
                "Failed task: {} - {}\n",
                failure.task_id, failure.message
            ));
        }

        out.push_str("Tasks:\n");
        for state in &report.tasks {
            out.push_str(&format!("  {}: {}\n", state.task_id, state.status));
        }

        out.push_str("Shared data:\n");
        for (key, value) in context.shared_data() {
            out.push_str(&format!("  {}: {}\n", key, value));
        }

        out.push_str("Task results:\n");
        for (task_id, value) in context.task_results() {
            out.push_str(&format!("  {}: {}\n", task_id, value));
        }

        Ok(out)
    }

    fn format_plan(&self, workflow_id: &str, plan: &ExecutionPlan) -> Result<String> {
        let mut out = format!("Execution plan for '{}' ({} tasks)\n", workflow_id, plan.len());
        for (index, task_id) in plan.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", index + 1, task_id));
        }
        Ok(out)
    }
}
