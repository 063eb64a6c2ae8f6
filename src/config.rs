// src/config.rs
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "VOLTAGE_ANALYZER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "voltage-analyzer.json";
/// Runtime settings. Nominal voltage and histogram bin count are constants, not settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_width: f32,
    pub window_height: f32,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Where the histogram and report go. `None` means the process temp dir.
    pub output_dir: Option<PathBuf>,
    /// Upper bound on reading rows printed in the PDF report.
    pub report_rows: usize,
}
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: 900.0,
            window_height: 640.0,
            chart_width: 1200,
            chart_height: 600,
            output_dir: None,
            report_rows: 40,
        }
    }
}
impl AppConfig {
    /// `$VOLTAGE_ANALYZER_CONFIG`, else `./voltage-analyzer.json`, else defaults.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{ "chart_width": 800, "output_dir": "/tmp/reportes" }"#).unwrap();
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.chart_width, 800);
        assert_eq!(config.chart_height, 600);
        assert_eq!(config.report_rows, 40);
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/reportes"));
    }
    #[test]
    fn broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, "{ chart_width: ").unwrap();
        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }
    #[test]
    fn default_output_is_temp_dir() {
        assert_eq!(AppConfig::default().output_dir(), std::env::temp_dir());
    }
}
