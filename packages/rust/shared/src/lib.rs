//! Shared types, error model, and configuration for KaiCanvas.
//!
//! This crate is the foundation depended on by all other KaiCanvas crates.
//! It provides:
//! - The unified error type ([`KaiCanvasError`])
//! - The composition data model ([`ComponentInstance`], [`ComponentParameter`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, EnhancersConfig, RenderConfig, RouteConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{KaiCanvasError, Result};
pub use types::{ComponentInstance, ComponentParameter};
