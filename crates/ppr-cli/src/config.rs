//! Configuration file structure for `.ppr.toml`
//!
//! Configuration files can be placed in:
//! - User home directory: `~/.ppr.toml` (user defaults)
//! - Project directory: `./.ppr.toml` (project defaults)
//! - Custom location via `--config` (replaces both)
//!
//! Precedence (highest to lowest): command-line arguments, project config,
//! user config, built-in defaults.

use anyhow::{bail, Context, Result};
use chrono::format::{Item, StrftimeItems};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".ppr.toml";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Default presentation template for the `pptx` command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory generated files are written to when `-o` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// strftime format of the cover date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

impl Config {
    /// Parse a configuration document
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if let Some(format) = config.date_format() {
            validate_date_format(format)?;
        }
        Ok(config)
    }

    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).map_err(|e| {
            eprintln!(
                "{} Failed to parse config file: {}",
                "Error:".red().bold(),
                path.display()
            );
            eprintln!("{} {}", "Parse error:".yellow().bold(), e);
            eprintln!();
            eprintln!("{} Configuration file syntax:", "Help:".cyan().bold());
            eprintln!("  [archive]");
            eprintln!("  template = \"templates/ppr.pptx\"");
            eprintln!("  [output]");
            eprintln!("  dir = \"out\"");
            eprintln!("  [report]");
            eprintln!("  date_format = \"%d/%m/%Y\"");
            anyhow::anyhow!("Failed to parse config file: {e}")
        })
    }

    /// Find and merge the user and project configuration files
    pub fn discover() -> Self {
        let user = dirs::home_dir()
            .and_then(|home| Self::load_optional(&home.join(CONFIG_FILE_NAME), "user"));
        let project = Self::load_optional(Path::new(CONFIG_FILE_NAME), "project");
        Self::merge(user, project)
    }

    fn load_optional(path: &Path, scope: &str) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => {
                log::debug!("loaded {scope} config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                eprintln!(
                    "{} Failed to load {scope} config from {}: {}",
                    "Warning:".yellow().bold(),
                    path.display(),
                    e
                );
                None
            }
        }
    }

    /// Merge with precedence: project over user over defaults
    pub fn merge(user: Option<Self>, project: Option<Self>) -> Self {
        let mut merged = user.unwrap_or_default();
        let Some(project) = project else {
            return merged;
        };

        if let Some(archive) = project.archive {
            let target = merged.archive.get_or_insert_with(ArchiveConfig::default);
            if archive.template.is_some() {
                target.template = archive.template;
            }
        }
        if let Some(output) = project.output {
            let target = merged.output.get_or_insert_with(OutputConfig::default);
            if output.dir.is_some() {
                target.dir = output.dir;
            }
        }
        if let Some(report) = project.report {
            let target = merged.report.get_or_insert_with(ReportConfig::default);
            if report.date_format.is_some() {
                target.date_format = report.date_format;
            }
        }
        merged
    }

    pub fn template(&self) -> Option<&Path> {
        self.archive.as_ref()?.template.as_deref()
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output.as_ref()?.dir.as_deref()
    }

    pub fn date_format(&self) -> Option<&str> {
        self.report.as_ref()?.date_format.as_deref()
    }
}

/// Reject strftime strings chrono cannot format
pub fn validate_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        bail!("Invalid date_format '{format}'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_sections() {
        let config = Config::parse(
            r#"
            [archive]
            template = "templates/ppr.pptx"

            [output]
            dir = "out"

            [report]
            date_format = "%Y-%m-%d"
            "#,
        )
        .unwrap();
        assert_eq!(config.template(), Some(Path::new("templates/ppr.pptx")));
        assert_eq!(config.output_dir(), Some(Path::new("out")));
        assert_eq!(config.date_format(), Some("%Y-%m-%d"));
    }

    #[test]
    fn test_empty_config_has_no_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.template(), None);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Config::parse("[archive]\ntemplte = \"x\"").is_err());
    }

    #[test]
    fn test_bad_date_format_rejected() {
        assert!(Config::parse("[report]\ndate_format = \"%Q\"").is_err());
        assert!(validate_date_format("%d/%m/%Y").is_ok());
    }

    #[test]
    fn test_project_overrides_user() {
        let user = Config::parse(
            "[archive]\ntemplate = \"user.pptx\"\n[output]\ndir = \"user-out\"",
        )
        .unwrap();
        let project = Config::parse("[archive]\ntemplate = \"project.pptx\"").unwrap();
        let merged = Config::merge(Some(user), Some(project));
        assert_eq!(merged.template(), Some(Path::new("project.pptx")));
        assert_eq!(merged.output_dir(), Some(Path::new("user-out")));
    }

    #[test]
    fn test_merge_without_configs() {
        assert_eq!(Config::merge(None, None), Config::default());
    }
}
