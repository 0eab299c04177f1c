//! Packaging settings
//!
//! Defines the `xcpack.json` (or `xcpack.toml`) settings file: the game and
//! iOS platform values that end up in the generated Xcode project.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::bundle_id::DEFAULT_IDENTIFIER_TEMPLATE;
use crate::fixup::DEFAULT_FIXUP_TOOL;

/// Default settings file name
pub const SETTINGS_FILE_NAME: &str = "xcpack.json";

/// Settings for one packaging run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackagingSettings {
    /// Game product name, as shown to players
    #[serde(default = "default_product_name")]
    pub product_name: String,

    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// Bundle identifier template; `${PROJECT_NAME}` and `${COMPANY_NAME}`
    /// are replaced with the cleaned product and company names
    #[serde(default = "default_app_identifier")]
    pub app_identifier: String,

    /// Apple development team ID
    #[serde(default)]
    pub app_team_id: String,

    /// Game version shown in the App Store
    #[serde(default = "default_project_version")]
    pub project_version: String,

    /// Engine include folder used by native code in the template
    #[serde(default)]
    pub header_search_paths: String,

    /// Stop after the Xcode project is generated
    #[serde(default)]
    pub skip_packaging: bool,

    /// Tool used to rewrite dylib install names
    #[serde(default = "default_fixup_tool")]
    pub fixup_tool: String,

    /// Fail when template placeholders and generated tokens do not match
    #[serde(default)]
    pub strict_placeholders: bool,
}

fn default_product_name() -> String {
    "MyGame".to_string()
}

fn default_company_name() -> String {
    "MyCompany".to_string()
}

fn default_app_identifier() -> String {
    DEFAULT_IDENTIFIER_TEMPLATE.to_string()
}

fn default_project_version() -> String {
    "1.0".to_string()
}

fn default_fixup_tool() -> String {
    DEFAULT_FIXUP_TOOL.to_string()
}

impl Default for PackagingSettings {
    fn default() -> Self {
        Self {
            product_name: default_product_name(),
            company_name: default_company_name(),
            app_identifier: default_app_identifier(),
            app_team_id: String::new(),
            project_version: default_project_version(),
            header_search_paths: String::new(),
            skip_packaging: false,
            fixup_tool: default_fixup_tool(),
            strict_placeholders: false,
        }
    }
}

/// Error types for settings loading
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse settings TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported settings file format: {0}")]
    UnsupportedFormat(String),
}

impl PackagingSettings {
    /// Load settings from a `.json` or `.toml` file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => {
                let content = fs::read_to_string(path)?;
                Ok(serde_json::from_str(&content)?)
            }
            Some("toml") => {
                let content = fs::read_to_string(path)?;
                Ok(toml::from_str(&content)?)
            }
            _ => Err(SettingsError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Write settings as pretty JSON
    pub fn save_json(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
