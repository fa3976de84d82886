//! Output formatting for resolved secret values
//!
//! Text output prints strings as-is so values can be piped into other tools;
//! structured values fall back to JSON.

use anyhow::{Context, Result};
use serde_json::Value;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => anyhow::bail!("Unsupported output format: '{}'. Use 'text', 'json', or 'yaml'.", s),
        }
    }
}

/// Render a resolved value in the given format
pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => match value {
            Value::String(s) => Ok(s.clone()),
            Value::Null => Ok(String::new()),
            other => render(other, OutputFormat::Json),
        },
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to serialize to JSON")
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(value).context("Failed to serialize to YAML")?;
            Ok(yaml.trim_end().to_string())
        }
    }
}

/// Print a resolved value in the given format
pub fn print_value(value: &Value, format: OutputFormat) -> Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}
