//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the [`EngineSettings`]
//! built from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables `ETOMYTE__SECTION__KEY`
//! 3. Config file (`--config FILE` or `<project>/etomyte.toml`)
//! 4. Per-user file from [`AppConfig::user_config_file`], when present
//! 5. Built-in defaults (always present)

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use etomyte_adapters::{Extensions, starter::CONFIG_FILE};
use etomyte_core::{
    application::{AppContext, BUILTIN_NOT_FOUND_BODY, EngineSettings},
    domain::{EvalLimits, ROOT_NAME},
};

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "ETOMYTE";
/// Separator between prefix, section and key in environment variables.
pub const ENV_SEPARATOR: &str = "__";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP binding.
    pub server: ServerConfig,
    /// Rendering settings.
    pub site: SiteConfig,
    /// File extensions per fragment class.
    pub extensions: ExtensionsConfig,
    /// Snippet script limits.
    pub snippets: SnippetConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Apply `--host` / `--port` flags.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site name, exposed to snippets as `app.name`.
    pub name: String,
    pub default_template: String,
    pub not_found_body: String,
    /// Extra `app.<key>` values for snippets.
    pub context: BTreeMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Etomyte".into(),
            default_template: ROOT_NAME.into(),
            not_found_body: BUILTIN_NOT_FOUND_BODY.into(),
            context: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionsConfig {
    pub content: Vec<String>,
    pub template: Vec<String>,
    pub snippet: Vec<String>,
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        let Extensions {
            content,
            template,
            snippet,
        } = Extensions::default();
        Self {
            content,
            template,
            snippet,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnippetConfig {
    pub timeout_ms: u64,
    pub max_steps: usize,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        let limits = EvalLimits::default();
        Self {
            timeout_ms: limits.timeout.as_millis() as u64,
            max_steps: limits.max_steps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration for the project at `project`.
    ///
    /// `config_file` is the path passed via `--config`; it must exist.
    /// Without it, `<project>/etomyte.toml` is read when present.
    pub fn load(config_file: Option<&Path>, project: &Path) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(project), false),
        };

        let defaults =
            Config::try_from(&Self::default()).context("Failed to build default configuration")?;

        let mut builder = Config::builder().add_source(defaults);
        if let Some(user) = Self::user_config_file() {
            builder = builder.add_source(
                File::from(user.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let settings = builder
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Path of the project configuration file.
    pub fn config_path(project: &Path) -> PathBuf {
        project.join(CONFIG_FILE)
    }

    /// Per-user defaults shared by every site, e.g.
    /// `~/.config/etomyte/config.toml` on Linux.
    pub fn user_config_file() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "etomyte", "etomyte")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// `app.<key>` bindings: `site.context` plus `name`, `version` and
    /// `default_template`, which take precedence.
    pub fn app_context(&self) -> AppContext {
        let mut context: AppContext = self.site.context.clone().into_iter().collect();
        context.insert("name", self.site.name.as_str());
        context.insert("version", env!("CARGO_PKG_VERSION"));
        context.insert("default_template", self.site.default_template.as_str());
        context
    }

    pub fn eval_limits(&self) -> EvalLimits {
        EvalLimits {
            max_steps: self.snippets.max_steps,
            timeout: Duration::from_millis(self.snippets.timeout_ms),
            ..EvalLimits::default()
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            not_found_body: self.site.not_found_body.clone(),
            ..EngineSettings::default()
        }
        .with_default_template(self.site.default_template.as_str())
        .with_limits(self.eval_limits())
        .with_context(self.app_context())
    }

    pub fn provider_extensions(&self) -> Extensions {
        Extensions {
            content: self.extensions.content.clone(),
            template: self.extensions.template.clone(),
            snippet: self.extensions.snippet.clone(),
        }
    }

    /// Look up a dotted key, e.g. `server.port` or `site.context.author`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        let found = key
            .split('.')
            .try_fold(&value, |node, segment| node.get(segment))?;
        Some(match found {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_engine_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.site.default_template, "index");
        assert_eq!(cfg.eval_limits(), EvalLimits::default());
        assert_eq!(cfg.provider_extensions(), Extensions::default());
    }

    #[test]
    fn user_config_file_is_toml() {
        if let Some(path) = AppConfig::user_config_file() {
            assert!(path.ends_with("config.toml"));
        }
    }

    #[test]
    fn load_without_file_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let cfg = AppConfig::load(None, temp.path()).unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.snippets.max_steps, 10_000);
    }

    #[test]
    fn project_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            concat!(
                "[server]\nport = 9090\n\n",
                "[site]\ndefault_template = \"base\"\n\n",
                "[site.context]\nauthor = \"ana\"\n",
            ),
        )
        .unwrap();

        let cfg = AppConfig::load(None, temp.path()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.site.default_template, "base");
        assert_eq!(cfg.site.context.get("author").map(String::as_str), Some("ana"));
    }

    #[test]
    fn explicit_file_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing), temp.path()).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "[server\nport = ").unwrap();
        assert!(AppConfig::load(None, temp.path()).is_err());
    }

    #[test]
    fn reserved_app_keys_win_over_context() {
        let mut cfg = AppConfig::default();
        cfg.site.name = "Acme".into();
        cfg.site.context.insert("name".into(), "ignored".into());
        cfg.site.context.insert("tagline".into(), "fast".into());

        let context = cfg.app_context();
        assert_eq!(context.get("name"), Some("Acme"));
        assert_eq!(context.get("tagline"), Some("fast"));
        assert_eq!(context.get("version"), Some(env!("CARGO_PKG_VERSION")));
        assert_eq!(context.get("default_template"), Some("index"));
    }

    #[test]
    fn engine_settings_carry_site_values() {
        let mut cfg = AppConfig::default();
        cfg.site.default_template = "base".into();
        cfg.site.not_found_body = "gone".into();
        cfg.snippets.timeout_ms = 50;

        let settings = cfg.engine_settings();
        assert_eq!(settings.default_template, "base");
        assert_eq!(settings.not_found_body, "gone");
        assert_eq!(settings.limits.timeout, Duration::from_millis(50));
    }

    #[test]
    fn dotted_get() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("server.port").as_deref(), Some("8000"));
        assert_eq!(cfg.get("output.no_color").as_deref(), Some("false"));
        assert_eq!(cfg.get("site.name").as_deref(), Some("Etomyte"));
        assert!(cfg.get("does.not.exist").is_none());
    }

    #[test]
    fn serializes_to_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(text.contains("[server]"));
        assert!(text.contains("port = 8000"));
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, AppConfig::default());
    }
}
