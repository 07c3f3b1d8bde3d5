//! Build pipeline for docforge.
//!
//! Sequential orchestration of the external tools the build depends on:
//! git (constructor checkout), HTTP (template download), apt-get
//! (toolchain install), and pandoc (PDF compilation). The pipeline entry
//! point is [`pipeline::run_build`].

pub mod convert;
pub mod discovery;
pub mod exec;
pub mod fetch;
pub mod pipeline;
pub mod template;
pub mod toolchain;

pub use pipeline::{BuildConfig, BuildResult, ProgressReporter, SilentProgress, run_build};
pub use template::TemplateSource;
