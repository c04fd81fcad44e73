//! Configuration system for Moderant.
//!
//! Uses `figment` for layered configuration: defaults -> legacy env -> config file -> environment.
//! Configuration is loaded from `~/.config/moderant/config.toml` and/or `.moderant/config.toml`
//! in the workspace directory. CLI flags are applied by the binary on top of the result.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama3.2-vision";

/// Endpoint used when neither config nor `OPENAI_API_URL` provide one.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Conventional environment variable for the endpoint URL, usually set in `.env`.
pub const LEGACY_BASE_URL_ENV: &str = "OPENAI_API_URL";

/// Top-level configuration for a Moderant run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModerantConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Optional base URL override for the API endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Explicit API key. Never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Sampling temperature; omitted from requests when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate; omitted from requests when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
    /// Client-side request timeout. Unset means the transport default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            temperature: None,
            max_tokens: None,
            timeout_secs: None,
        }
    }
}

impl LlmConfig {
    /// The endpoint requests are sent to, without a trailing slash.
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Whether the endpoint is served from this machine (Ollama, vLLM, LM Studio).
    pub fn is_local(&self) -> bool {
        self.base_url
            .as_ref()
            .map(|u| u.contains("localhost") || u.contains("127.0.0.1"))
            .unwrap_or(false)
    }

    /// Validate this LLM config and return any warnings.
    ///
    /// Returns an empty Vec if the config is valid. Warnings never abort a run.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(temperature) = self.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            warnings.push(format!(
                "temperature ({}) is outside the typical range 0.0-2.0",
                temperature
            ));
        }
        if self.max_tokens == Some(0) {
            warnings.push("max_tokens is 0; the classifier cannot answer".to_string());
        }
        if self.timeout_secs == Some(0) {
            warnings.push("timeout_secs is 0; every request will time out".to_string());
        }
        if self.model.trim().is_empty() {
            warnings.push("model is empty; the endpoint will likely reject requests".to_string());
        }
        warnings
    }
}

/// How input files are turned into records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Header of the CSV column holding the text to analyse.
    pub csv_text_column: String,
    /// Inserted between PDF pages. Empty joins pages directly.
    pub pdf_page_separator: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            csv_text_column: "text".to_string(),
            pdf_page_separator: String::new(),
        }
    }
}

/// Where and how the report is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Report destination; the extension selects xlsx or csv output.
    pub output_path: PathBuf,
    /// Category label written on every row.
    pub category: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("output_report.xlsx"),
            category: "Bias detected".to_string(),
        }
    }
}

impl ModerantConfig {
    /// Check the whole config.
    ///
    /// Hard problems become a `ConfigError`; soft problems come back as warnings.
    pub fn validate(&self) -> Result<Vec<String>, ConfigError> {
        if self.report.category.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "report.category must not be empty".to_string(),
            });
        }
        if self.input.csv_text_column.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "input.csv_text_column must not be empty".to_string(),
            });
        }
        Ok(self.llm.validate())
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `MODERANT_`, `__` separates sections)
/// 2. Workspace-local config (`.moderant/config.toml`)
/// 3. User config (`~/.config/moderant/config.toml`)
/// 4. `OPENAI_API_URL` for `llm.base_url`
/// 5. Built-in defaults
pub fn load_config(workspace: Option<&Path>) -> Result<ModerantConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ModerantConfig::default()));

    // Legacy endpoint variable, usually supplied through `.env`
    figment = figment.merge(
        Env::raw()
            .only(&[LEGACY_BASE_URL_ENV])
            .map(|_| "llm.base_url".into()),
    );

    // User-level config
    if let Some(user_config) = user_config_path()
        && user_config.exists()
    {
        figment = figment.merge(Toml::file(&user_config));
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Environment variables (MODERANT_LLM__MODEL, MODERANT_REPORT__OUTPUT_PATH, etc.)
    figment = figment.merge(Env::prefixed("MODERANT_").split("__"));

    let config: ModerantConfig = figment.extract()?;
    Ok(config)
}

/// Path of the user-level config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "moderant", "moderant")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Path of the workspace-level config file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".moderant").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = ModerantConfig::default();
        assert_eq!(config.llm.model, "llama3.2-vision");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert!(config.llm.base_url.is_none());
        assert!(config.llm.temperature.is_none());
        assert_eq!(config.input.csv_text_column, "text");
        assert_eq!(config.input.pdf_page_separator, "");
        assert_eq!(config.report.output_path, PathBuf::from("output_report.xlsx"));
        assert_eq!(config.report.category, "Bias detected");
    }

    #[test]
    fn test_effective_base_url() {
        let mut config = LlmConfig::default();
        assert_eq!(config.effective_base_url(), "https://api.openai.com/v1");

        config.base_url = Some("http://localhost:11434/v1/".to_string());
        assert_eq!(config.effective_base_url(), "http://localhost:11434/v1");
        assert!(config.is_local());

        config.base_url = Some("https://llm.example.com/v1".to_string());
        assert!(!config.is_local());
    }

    #[test]
    fn test_api_key_never_serialized() {
        let config = LlmConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("sk-secret"));
        assert!(!rendered.contains("api_key ="));
    }

    #[test]
    fn test_llm_validate_warnings() {
        let config = LlmConfig::default();
        assert!(config.validate().is_empty());

        let config = LlmConfig {
            temperature: Some(3.5),
            max_tokens: Some(0),
            ..Default::default()
        };
        let warnings = config.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("temperature"));
        assert!(warnings[1].contains("max_tokens"));
    }

    #[test]
    fn test_validate_rejects_empty_category() {
        let mut config = ModerantConfig::default();
        config.report.category = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
            [llm]
            model = "gpt-4o-mini"

            [report]
            output_path = "reports/run.csv"
        "#;
        let config: ModerantConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.report.output_path, PathBuf::from("reports/run.csv"));
        assert_eq!(config.report.category, "Bias detected");
        assert_eq!(config.input.csv_text_column, "text");
    }

    #[test]
    fn test_load_config_layers() {
        Jail::expect_with(|jail| {
            jail.create_dir(".moderant")?;
            jail.create_file(
                ".moderant/config.toml",
                r#"
                [llm]
                model = "qwen2.5:14b"
                base_url = "http://localhost:11434/v1"

                [input]
                pdf_page_separator = "\n"
                "#,
            )?;
            jail.set_env("MODERANT_REPORT__CATEGORY", "Needs review");

            let config = load_config(Some(jail.directory())).map_err(|e| e.to_string())?;
            assert_eq!(config.llm.model, "qwen2.5:14b");
            assert_eq!(
                config.llm.base_url.as_deref(),
                Some("http://localhost:11434/v1")
            );
            assert_eq!(config.input.pdf_page_separator, "\n");
            assert_eq!(config.report.category, "Needs review");
            Ok(())
        });
    }

    #[test]
    fn test_load_config_env_overrides_workspace_file() {
        Jail::expect_with(|jail| {
            jail.create_dir(".moderant")?;
            jail.create_file(
                ".moderant/config.toml",
                "[llm]\nmodel = \"from-file\"\n",
            )?;
            jail.set_env("MODERANT_LLM__MODEL", "from-env");

            let config = load_config(Some(jail.directory())).map_err(|e| e.to_string())?;
            assert_eq!(config.llm.model, "from-env");
            Ok(())
        });
    }

    #[test]
    fn test_load_config_legacy_base_url_env() {
        Jail::expect_with(|jail| {
            jail.set_env("OPENAI_API_URL", "http://127.0.0.1:8080/v1");

            let config = load_config(Some(jail.directory())).map_err(|e| e.to_string())?;
            assert_eq!(
                config.llm.base_url.as_deref(),
                Some("http://127.0.0.1:8080/v1")
            );
            Ok(())
        });
    }

    #[test]
    fn test_load_config_bad_toml_is_parse_error() {
        Jail::expect_with(|jail| {
            jail.create_dir(".moderant")?;
            jail.create_file(".moderant/config.toml", "[llm]\nmodel = [1, 2]\n")?;

            let result = load_config(Some(jail.directory()));
            assert!(matches!(result, Err(ConfigError::ParseError { .. })));
            Ok(())
        });
    }
}
