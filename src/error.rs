use thiserror::Error;

use crate::notion::QueueError;
use crate::state_machine::TransitionError;

/// Erros que abortam a execução inteira.
///
/// Falhas do modelo e do publicador nunca aparecem aqui: esses adaptadores
/// degradam para um resultado com confiança zero ou um link placeholder.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Task queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Invalid status transition: {0}")]
    Transition(#[from] TransitionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::JobStatus;

    #[test]
    fn config_error_display() {
        let err = RunnerError::Config("NOTION_TOKEN is required".into());
        assert_eq!(err.to_string(), "Config error: NOTION_TOKEN is required");
    }

    #[test]
    fn queue_error_converts() {
        let err: RunnerError = QueueError::Api {
            status: 401,
            message: "unauthorized".into(),
        }
        .into();
        assert!(matches!(err, RunnerError::Queue(_)));
        assert_eq!(
            err.to_string(),
            "Task queue error: queue API error (status 401): unauthorized"
        );
    }

    #[test]
    fn transition_error_converts() {
        let err: RunnerError = TransitionError {
            job_id: "p1".into(),
            from: JobStatus::Done,
            to: JobStatus::Running,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid status transition: job p1 cannot move from Done to Running"
        );
    }
}
