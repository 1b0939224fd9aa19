//! Prompt assembly for the generative model.
//!
//! [`build_prompt`] turns a [`Job`] into the task block; [`compose`] wraps that
//! block with the persona preamble and the strict-JSON output contract.

use crate::state_machine::Job;

const DEFAULT_AGENT_TYPE: &str = "General";

const DELIVERABLE: &str = "DELIVERABLE: Draft the artifact in clean Markdown suitable for direct \
publishing. Avoid placeholders, be specific, add headings where helpful.";

const OUTPUT_FORMAT: &str = "AGENT OUTPUT FORMAT:\n\
Return strict JSON with keys: text, confidence (0-1), title (optional).\n\
Produce clean, shippable text that embodies the RaNemoOS voice.\n\
Do not include backticks, code fences, or commentary outside the JSON.";

/// The two instructions sent to the model for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

/// Build the task block for a job. Pure and deterministic.
pub fn build_prompt(job: &Job) -> String {
    let agent_type = job
        .agent_type
        .as_deref()
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_AGENT_TYPE);

    let mut lines = vec![
        format!("JOB: {}", job.name),
        format!("AGENT TYPE: {agent_type}"),
        format!("PUBLISH MODE: {}", job.publish_mode),
    ];

    if let Some(context) = job.context.as_deref().filter(|c| !c.is_empty()) {
        lines.push("CONTEXT:".to_string());
        lines.push(context.to_string());
    }

    let urls: Vec<&str> = job.input_urls().collect();
    if !urls.is_empty() {
        lines.push("INPUT LINKS:".to_string());
        lines.extend(urls.iter().map(|url| format!("- {url}")));
    }

    lines.push(format!("\n{DELIVERABLE}\n"));
    lines.join("\n")
}

/// Wrap a task block with the persona and output-format instructions.
pub fn compose(persona: &str, prompt: &str) -> ChatPrompt {
    ChatPrompt {
        system: format!("{persona}\n\n{OUTPUT_FORMAT}"),
        user: format!("TASK CONTEXT:\n{}\n\nReturn JSON only.", prompt.trim()),
    }
}
