use crate::error::{Error, Result};
use crate::export::ExportOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub export: ExportDefaults,
    pub report: ReportDefaults,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
}

/// Default export settings, overridable per invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    pub format: String,
    pub include_errors: bool,
    pub include_external: bool,
    pub diagram_type: String,
    pub direction: String,
    pub max_label_length: usize,
    pub color_scheme: String,
}

/// Report-only settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportDefaults {
    pub page_size: String,
    pub orientation: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
        }
    }
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            format: "svg".to_string(),
            include_errors: false,
            include_external: false,
            diagram_type: "flowchart".to_string(),
            direction: "TB".to_string(),
            max_label_length: 30,
            color_scheme: "default".to_string(),
        }
    }
}

impl Default for ReportDefaults {
    fn default() -> Self {
        Self {
            page_size: "a4".to_string(),
            orientation: "portrait".to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    #[allow(clippy::too_many_arguments)]
    pub fn merge_cli(
        &mut self,
        format: Option<String>,
        include_errors: bool,
        include_external: bool,
        diagram_type: Option<String>,
        direction: Option<String>,
        max_label_length: Option<usize>,
        page_size: Option<String>,
        orientation: Option<String>,
        color_scheme: Option<String>,
    ) {
        if let Some(f) = format {
            self.export.format = f;
        }
        if include_errors {
            self.export.include_errors = true;
        }
        if include_external {
            self.export.include_external = true;
        }
        if let Some(d) = diagram_type {
            self.export.diagram_type = d;
        }
        if let Some(d) = direction {
            self.export.direction = d;
        }
        if let Some(n) = max_label_length {
            self.export.max_label_length = n;
        }
        if let Some(p) = page_size {
            self.report.page_size = p;
        }
        if let Some(o) = orientation {
            self.report.orientation = o;
        }
        if let Some(c) = color_scheme {
            self.export.color_scheme = c;
        }
    }

    /// Option overrides as the export façade expects them
    pub fn to_options(&self) -> ExportOptions {
        ExportOptions {
            include_errors: Some(self.export.include_errors),
            include_external: Some(self.export.include_external),
            diagram_type: Some(self.export.diagram_type.clone()),
            direction: Some(self.export.direction.clone()),
            max_label_length: Some(self.export.max_label_length),
            page_size: Some(self.report.page_size.clone()),
            orientation: Some(self.report.orientation.clone()),
            color_scheme: Some(self.export.color_scheme.clone()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.export.max_label_length < 4 {
            return Err(Error::config_validation(
                "max_label_length must be at least 4",
            ));
        }

        if self.export.max_label_length > 200 {
            return Err(Error::config_validation(
                "max_label_length cannot exceed 200",
            ));
        }

        if self.project.name.trim().is_empty() {
            return Err(Error::config_validation("project name cannot be empty"));
        }

        Ok(())
    }
}
