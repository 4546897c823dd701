use anyhow::{bail, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 実行時設定（解剖学的な比率・許容誤差は含まない）
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// 入力CSVのパス
    #[serde(default = "default_input_path")]
    pub path: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown report format: {}", other),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// "text" または "json"
    #[serde(default)]
    pub format: ReportFormat,
    /// 実行開始時に標準比率テーブルを表示するか
    #[serde(default = "default_show_standard_ratios")]
    pub show_standard_ratios: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BatchConfig {
    /// rayon でフレームを並列検証
    #[serde(default)]
    pub parallel: bool,
}

fn default_input_path() -> String { "test.csv".to_string() }
fn default_show_standard_ratios() -> bool { true }

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            show_standard_ratios: default_show_standard_ratios(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// 読めなければデフォルト設定
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("{} not found, using default config", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("failed to load {}: {}; using default config", path.display(), e);
                Self::default()
            }
        }
    }
}
