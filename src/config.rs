use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::engine::{DerivedField, RuleEngine};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Fixed "today" for reproducible runs. Defaults to the local date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_fields")]
    pub fields: Vec<DerivedField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_true")]
    pub display_labels: bool,
    #[serde(default = "default_export_file_name")]
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub evaluation_date: Option<NaiveDate>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub display_labels: Option<bool>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/bag-report/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(date) = overrides.evaluation_date {
            self.engine.evaluation_date = Some(date);
        }
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(labels) = overrides.display_labels {
            self.export.display_labels = labels;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn evaluation_date(&self) -> NaiveDate {
        self.engine
            .evaluation_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn rule_engine(&self) -> RuleEngine {
        RuleEngine::new(self.evaluation_date()).with_parallel(self.engine.parallel)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn default_template() -> String {
        let fields = DerivedField::ALL
            .iter()
            .map(|f| format!("\"{f}\""))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"[engine]
parallel = true
# evaluation_date = "2025-03-01"

[report]
fields = [{fields}]

[export]
display_labels = true
file_name = "{file_name}"

[server]
host = "{host}"
port = {port}
"#,
            file_name = default_export_file_name(),
            host = default_host(),
            port = default_port(),
        )
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            evaluation_date: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            fields: default_report_fields(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            display_labels: true,
            file_name: default_export_file_name(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_report_fields() -> Vec<DerivedField> {
    DerivedField::ALL.to_vec()
}

fn default_export_file_name() -> String {
    "corrected_active_bag_report.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_true() -> bool {
    true
}
