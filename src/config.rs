//! Configuração do runner, carregada uma única vez de `agent-runner.toml`.
//!
//! Valores ausentes no arquivo usam defaults sensíveis. Variáveis de ambiente
//! têm precedência sobre o arquivo. O [`RunnerConfig`] resultante é passado
//! por referência para cada construtor de colaborador e nunca é relido.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::RunnerError;
use crate::state_machine::DEFAULT_GATE;

const DEFAULT_CONFIG_FILE: &str = "agent-runner.toml";

/// Credencial que nunca aparece na saída de `Debug`.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Secret(<empty>)")
        } else {
            write!(f, "Secret(***)")
        }
    }
}

/// Configuração de nível superior de uma execução.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    /// Token de integração da fila de tarefas. Obrigatório.
    #[serde(default)]
    pub notion_token: Secret,

    /// Banco de dados com os registros de jobs. Obrigatório.
    #[serde(default)]
    pub notion_database_id: String,

    #[serde(default = "default_notion_base_url")]
    pub notion_base_url: String,

    /// Chave da API do modelo. Vazia, o runner trabalha offline.
    #[serde(default)]
    pub openai_api_key: Secret,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Timeout por requisição para toda chamada externa.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Service-account key JSON for the document store.
    #[serde(default)]
    pub drive_sa_json: Secret,

    #[serde(default)]
    pub gdrive_parent_folder_id: Option<String>,

    /// Workspace user the service account acts on behalf of.
    #[serde(default)]
    pub google_impersonate: Option<String>,

    /// Grant link-based read access on every published document.
    #[serde(default = "default_share_public")]
    pub share_public: bool,

    /// Gate applied to jobs without their own threshold.
    #[serde(default = "default_gate")]
    pub default_gate: f64,

    #[serde(default = "default_persona_path")]
    pub persona_path: PathBuf,

    /// Força o modo offline: modelo stub e links placeholder, mesmo com
    /// credenciais presentes.
    #[serde(default)]
    pub offline: bool,
}

fn default_notion_base_url() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_share_public() -> bool {
    true
}

fn default_gate() -> f64 {
    DEFAULT_GATE
}

fn default_persona_path() -> PathBuf {
    PathBuf::from(".ranemos/system-prompt.json")
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            notion_token: Secret::default(),
            notion_database_id: String::new(),
            notion_base_url: default_notion_base_url(),
            openai_api_key: Secret::default(),
            openai_model: default_openai_model(),
            openai_base_url: default_openai_base_url(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            drive_sa_json: Secret::default(),
            gdrive_parent_folder_id: None,
            google_impersonate: None,
            share_public: default_share_public(),
            default_gate: default_gate(),
            persona_path: default_persona_path(),
            offline: false,
        }
    }
}

impl RunnerConfig {
    /// Load from `path` (or `agent-runner.toml` in the working directory),
    /// overlay the process environment and validate.
    ///
    /// A missing default file is fine; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, RunnerError> {
        let file = path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let mut config = if file.exists() {
            let contents = std::fs::read_to_string(file)?;
            toml::from_str::<RunnerConfig>(&contents)?
        } else if path.is_some() {
            return Err(RunnerError::Config(format!(
                "config file not found: {}",
                file.display()
            )));
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlay environment values. Empty variables are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("NOTION_TOKEN") {
            self.notion_token = Secret::new(v);
        }
        if let Some(v) = get("NOTION_AGENT_DB") {
            self.notion_database_id = v;
        }
        if let Some(v) = get("OPENAI_API_KEY") {
            self.openai_api_key = Secret::new(v);
        }
        if let Some(v) = get("OPENAI_MODEL") {
            self.openai_model = v;
        }
        if let Some(v) = get("DRIVE_SA_JSON") {
            self.drive_sa_json = Secret::new(v);
        }
        if let Some(v) = get("GDRIVE_PARENT_FOLDER_ID") {
            self.gdrive_parent_folder_id = Some(v);
        }
        if let Some(v) = get("GOOGLE_WORKSPACE_IMPERSONATE") {
            self.google_impersonate = Some(v);
        }
    }

    /// Startup checks. Both queue credentials are mandatory.
    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.notion_token.is_empty() {
            return Err(RunnerError::Config("NOTION_TOKEN is required".into()));
        }
        if self.notion_database_id.trim().is_empty() {
            return Err(RunnerError::Config("NOTION_AGENT_DB is required".into()));
        }
        if !(0.0..=1.0).contains(&self.default_gate) {
            return Err(RunnerError::Config(format!(
                "default_gate must be within [0, 1], got {}",
                self.default_gate
            )));
        }
        Ok(())
    }

    /// Offline quando forçado ou quando não há chave do modelo.
    pub fn is_offline(&self) -> bool {
        self.offline || self.openai_api_key.is_empty()
    }

    /// O modo offline forçado também desliga a publicação real.
    pub fn publisher_configured(&self) -> bool {
        !self.offline && !self.drive_sa_json.is_empty()
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_values() {
        let config = RunnerConfig::default();
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.default_gate, 0.7);
        assert_eq!(config.request_timeout_secs, 120);
        assert!(config.share_public);
        assert!(config.is_offline());
        assert!(!config.publisher_configured());
        assert_eq!(config.persona_path, PathBuf::from(".ranemos/system-prompt.json"));
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            notion_database_id = "db-123"
            default_gate = 0.85
            share_public = false
        "#;
        let config: RunnerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.notion_database_id, "db-123");
        assert_eq!(config.default_gate, 0.85);
        assert!(!config.share_public);
        assert_eq!(config.openai_model, "gpt-4o-mini");
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config: RunnerConfig =
            toml::from_str(r#"openai_model = "from-file""#).unwrap();
        config.apply_env(env(&[
            ("NOTION_TOKEN", "secret_abc"),
            ("NOTION_AGENT_DB", "db-1"),
            ("OPENAI_API_KEY", "sk-1"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("GDRIVE_PARENT_FOLDER_ID", "folder-9"),
        ]));
        assert_eq!(config.notion_token.expose(), "secret_abc");
        assert_eq!(config.notion_database_id, "db-1");
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.gdrive_parent_folder_id.as_deref(), Some("folder-9"));
        assert!(!config.is_offline());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = RunnerConfig::default();
        config.apply_env(env(&[("OPENAI_MODEL", "  ")]));
        assert_eq!(config.openai_model, "gpt-4o-mini");
    }

    #[test]
    fn missing_token_is_fatal() {
        let mut config = RunnerConfig::default();
        config.apply_env(env(&[("NOTION_AGENT_DB", "db-1")]));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("NOTION_TOKEN"));
    }

    #[test]
    fn missing_database_is_fatal() {
        let mut config = RunnerConfig::default();
        config.apply_env(env(&[("NOTION_TOKEN", "t")]));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("NOTION_AGENT_DB"));
    }

    #[test]
    fn out_of_range_default_gate_is_rejected() {
        let mut config = RunnerConfig {
            default_gate: 1.5,
            ..RunnerConfig::default()
        };
        config.apply_env(env(&[("NOTION_TOKEN", "t"), ("NOTION_AGENT_DB", "d")]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn offline_flag_wins_over_key() {
        let config = RunnerConfig {
            openai_api_key: Secret::new("sk-1"),
            offline: true,
            ..RunnerConfig::default()
        };
        assert!(config.is_offline());
    }

    #[test]
    fn offline_flag_disables_publisher() {
        let mut config = RunnerConfig {
            drive_sa_json: Secret::new("{}"),
            ..RunnerConfig::default()
        };
        assert!(config.publisher_configured());
        config.offline = true;
        assert!(!config.publisher_configured());
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let config = RunnerConfig {
            notion_token: Secret::new("secret_abc"),
            ..RunnerConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret_abc"));
        assert!(debug.contains("Secret(***)"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = RunnerConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, RunnerError::Config(_)));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "default_gate = \"high\"").unwrap();
        let err = RunnerConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, RunnerError::Toml(_)));
    }
}
