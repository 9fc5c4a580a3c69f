//! Application configuration for KaiCanvas.
//!
//! User config lives at `~/.kaicanvas/kaicanvas.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KaiCanvasError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "kaicanvas.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".kaicanvas";

// ---------------------------------------------------------------------------
// Config structs (matching kaicanvas.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Route API settings.
    #[serde(default)]
    pub route: RouteConfig,

    /// Rich-text rendering limits.
    #[serde(default)]
    pub render: RenderConfig,

    /// Parameter enhancer bindings.
    #[serde(default)]
    pub enhancers: EnhancersConfig,
}

/// `[route]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Base URL of the route API (without the `/api/v1/route` suffix).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Project whose routes are resolved.
    #[serde(default)]
    pub project_id: String,

    /// Timeout in seconds for a route fetch.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Locales recognised as a leading path segment.
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,

    /// Locale applied when the caller does not pass one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_locale: Option<String>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            project_id: String::new(),
            timeout_secs: default_timeout_secs(),
            locales: default_locales(),
            default_locale: None,
        }
    }
}

fn default_api_base_url() -> String {
    "https://uniform.app".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_locales() -> Vec<String> {
    vec!["en".into()]
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Maximum nesting depth of a rich-text document.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    64
}

/// `[enhancers]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancersConfig {
    /// Parameter names handled by the asset-picker enhancer.
    #[serde(default = "default_asset_parameters")]
    pub asset_parameters: Vec<String>,
}

impl Default for EnhancersConfig {
    fn default() -> Self {
        Self {
            asset_parameters: default_asset_parameters(),
        }
    }
}

fn default_asset_parameters() -> Vec<String> {
    vec!["bynderImage".into()]
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.kaicanvas/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| KaiCanvasError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.kaicanvas/kaicanvas.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| KaiCanvasError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        KaiCanvasError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| KaiCanvasError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| KaiCanvasError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| KaiCanvasError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
