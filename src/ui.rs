//! Saída de terminal ao final de uma execução.
//!
//! Usa estilos da crate `console`: verde para jobs concluídos, amarelo para
//! jobs enviados para revisão.

use console::Style;

use crate::orchestrator::RunSummary;
use crate::state_machine::{Job, JobStatus};

/// Relatório colorido do resultado de uma execução.
pub struct RunReport {
    // Estilo verde para jobs concluídos.
    green: Style,
    // Estilo amarelo para jobs em revisão.
    yellow: Style,
    // Texto secundário (ids, links).
    dim: Style,
}

impl Default for RunReport {
    fn default() -> Self {
        Self {
            green: Style::new().green().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
        }
    }
}

impl RunReport {
    fn status_line(&self, status: JobStatus) -> String {
        match status {
            JobStatus::Done => format!("{}", self.green.apply_to("✓ Done")),
            JobStatus::NeedsReview => format!("{}", self.yellow.apply_to("● Needs Review")),
            other => other.to_string(),
        }
    }

    /// Uma linha por job, seguida dos totais.
    pub fn print_summary(&self, summary: &RunSummary) {
        if summary.reports.is_empty() {
            println!("{}", self.dim.apply_to("No queued jobs are due."));
            return;
        }
        for report in &summary.reports {
            println!(
                "  {}  {} (conf {:.2}, gate {:.2})",
                self.status_line(report.status),
                report.name,
                report.confidence,
                report.gate,
            );
            println!("      {}", self.dim.apply_to(&report.proof_url));
        }
        println!();
        println!(
            "{} processed: {} done, {} need review",
            summary.reports.len(),
            summary.count(JobStatus::Done),
            summary.count(JobStatus::NeedsReview),
        );
    }

    pub fn print_json(&self, summary: &RunSummary) {
        println!(
            "{}",
            serde_json::to_string_pretty(summary).unwrap_or_default()
        );
    }

    /// Lista os jobs vencidos sem alterá-los.
    pub fn print_due(&self, jobs: &[Job]) {
        if jobs.is_empty() {
            println!("{}", self.dim.apply_to("No queued jobs are due."));
            return;
        }
        for job in jobs {
            let gate = job
                .confidence_gate
                .map(|g| format!("{g:.2}"))
                .unwrap_or_else(|| "default".to_string());
            let due = job
                .due
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {}  {} [{}] mode={} gate={} due={}",
                self.dim.apply_to(&job.id),
                job.name,
                job.agent_type.as_deref().unwrap_or("General"),
                job.publish_mode,
                gate,
                due,
            );
        }
    }
}
