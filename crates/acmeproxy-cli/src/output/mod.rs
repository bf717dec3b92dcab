//! Output formatting for different formats.

use clap::ValueEnum;
use serde::Serialize;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Render `value` as JSON or YAML.
///
/// Returns `None` for [`OutputFormat::Pretty`], which each command renders itself.
pub fn serialize<T: Serialize>(format: OutputFormat, value: &T) -> anyhow::Result<Option<String>> {
    Ok(match format {
        OutputFormat::Pretty => None,
        OutputFormat::Json => Some(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Some(serde_yaml::to_string(value)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize() {
        let value = json!({"zone": "example.com"});
        assert_eq!(serialize(OutputFormat::Pretty, &value).unwrap(), None);
        assert_eq!(
            serialize(OutputFormat::Json, &value).unwrap().unwrap(),
            "{\n  \"zone\": \"example.com\"\n}"
        );
        assert_eq!(
            serialize(OutputFormat::Yaml, &value).unwrap().unwrap(),
            "zone: example.com\n"
        );
    }
}
