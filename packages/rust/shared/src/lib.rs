//! Shared types, error model, and configuration for docforge.
//!
//! This crate is the foundation depended on by the other docforge crates.
//! It provides:
//! - [`DocforgeError`] — the unified error type
//! - Domain types ([`RunContext`], [`ArtifactPaths`], [`BuildManifest`], [`StepOutputs`])
//! - Configuration ([`AppConfig`], config loading, CI environment reads)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BUILTIN_TEMPLATE_PATH, ConstructorConfig, DefaultsConfig, PandocConfig,
    REMOTE_TEMPLATE_SENTINEL, ToolchainConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, repo_name_from_env, temp_root,
};
pub use error::{DocforgeError, Result};
pub use types::{
    ArtifactPaths, BuildManifest, CURRENT_MANIFEST_VERSION, RunContext, StepOutputs,
    versioned_file_name,
};
