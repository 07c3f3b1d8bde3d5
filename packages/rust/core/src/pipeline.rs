//! End-to-end build pipeline: fetch → resolve template → discover →
//! install toolchain → convert → publish.
//!
//! Straight-line sequence; every step is a precondition for the next and
//! the first failure aborts the run. No retries, no partial artifacts.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, instrument};

use docforge_shared::{
    ArtifactPaths, BuildManifest, CURRENT_MANIFEST_VERSION, ConstructorConfig, DocforgeError,
    PandocConfig, Result, RunContext, ToolchainConfig,
};

use crate::convert::{self, ConvertJob};
use crate::discovery;
use crate::fetch::{self, FetchSpec};
use crate::template::{self, ResolveOptions, TemplateSource};
use crate::toolchain;

/// Configuration for one build run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Base file name of the output document.
    pub base_name: String,
    /// Directory searched for Markdown sources.
    pub docs_dir: PathBuf,
    /// Directory added to the converter's resource search path.
    pub images_dir: PathBuf,
    /// Raw template input (path, empty, or the remote sentinel).
    pub template_input: String,
    /// Root artifact directory.
    pub artifact_dir: PathBuf,
    /// Date and run number for the version suffix.
    pub run: RunContext,
    /// Constructor repository coordinates.
    pub constructor: ConstructorConfig,
    /// Toolchain installation settings.
    pub toolchain: ToolchainConfig,
    /// Converter invocation settings.
    pub pandoc: PandocConfig,
    /// Tool version recorded in the build manifest.
    pub tool_version: String,
    /// Clone the constructor repository and work inside it.
    pub clone_constructor: bool,
    /// Skip toolchain installation entirely.
    pub skip_install: bool,
    /// Temporary-directory root (clone target, template download).
    pub temp_root: PathBuf,
}

/// Result of a successful build.
#[derive(Debug)]
pub struct BuildResult {
    /// Path to the versioned PDF.
    pub versioned_pdf: PathBuf,
    /// Path to the "latest" PDF.
    pub latest_pdf: PathBuf,
    /// File name of the versioned PDF artifact.
    pub artifact_name: String,
    /// Version suffix of this build.
    pub version: String,
    /// Number of Markdown source files compiled.
    pub source_count: usize,
    /// Path to the written build manifest.
    pub manifest_path: PathBuf,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Run the full build pipeline.
///
/// 1. Fetch the constructor repository (optional for local runs)
/// 2. Resolve and verify the template
/// 3. Prepare artifact directories
/// 4. Discover Markdown sources
/// 5. Install the toolchain (skipped when the converter is present)
/// 6. Compile the PDF
/// 7. Publish versioned + latest artifacts and the build manifest
#[instrument(skip_all, fields(base = %config.base_name, version = %config.run.version_suffix()))]
pub async fn run_build(
    config: &BuildConfig,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let start = Instant::now();

    info!(
        base = %config.base_name,
        version = %config.run.version_suffix(),
        docs_dir = %config.docs_dir.display(),
        "starting build pipeline"
    );

    // --- Step 1: Fetch constructor repository ---
    if config.clone_constructor {
        progress.phase("Fetching constructor repository");
        let spec = FetchSpec {
            clone_url: config.constructor.clone_url(),
            git_ref: config.constructor.git_ref.clone(),
            clone_dir: config.temp_root.join(&config.constructor.repo),
        };
        let clone_dir = fetch::fetch_constructor(&spec).await?;

        // The rest of the run happens inside the clone, so relative
        // template and artifact paths resolve against it.
        std::env::set_current_dir(&clone_dir).map_err(|e| DocforgeError::io(&clone_dir, e))?;
    }

    // --- Step 2: Resolve template ---
    progress.phase("Resolving template");
    let source = TemplateSource::from_input(&config.template_input);
    let opts = ResolveOptions {
        remote_url: config.constructor.raw_template_url()?,
        download_dir: config.temp_root.clone(),
    };
    let resolved_template = template::resolve(&source, &opts).await?;

    // --- Step 3: Verify template ---
    template::verify(&resolved_template)?;

    // --- Step 4: Prepare artifact directories ---
    progress.phase("Preparing artifact directories");
    let paths = ArtifactPaths::for_build(&config.artifact_dir, &config.base_name, &config.run);
    docforge_artifacts::prepare_dirs(&paths)?;

    // --- Step 5: Discover Markdown sources ---
    progress.phase("Discovering Markdown files");
    let sources = discovery::discover_markdown(&config.docs_dir)?;

    // --- Step 6: Install toolchain ---
    if config.skip_install {
        info!("toolchain installation skipped by request");
    } else if toolchain::toolchain_present(&config.pandoc.binary, &config.toolchain.typesetter)
        .await
    {
        // Converter alone is not enough: CI runners ship pandoc without
        // the typesetting engine, and the install must still run then.
        info!(
            converter = %config.pandoc.binary,
            typesetter = %config.toolchain.typesetter,
            "toolchain already present, skipping install"
        );
    } else {
        progress.phase("Installing toolchain");
        toolchain::install(&config.toolchain).await?;
    }

    // --- Step 7: Compile PDF ---
    progress.phase("Compiling PDF");
    let job = ConvertJob {
        binary: config.pandoc.binary.clone(),
        output: paths.versioned_pdf.clone(),
        template: resolved_template.clone(),
        date: config.run.date_iso(),
        images_dir: config.images_dir.clone(),
        toc_depth: config.pandoc.toc_depth,
        number_sections: config.pandoc.number_sections,
        inputs: sources.clone(),
    };
    convert::run_conversion(&job).await?;

    // --- Step 8: Publish ---
    progress.phase("Publishing artifacts");
    let receipt = docforge_artifacts::publish(&paths)?;

    let manifest = BuildManifest {
        schema_version: CURRENT_MANIFEST_VERSION,
        base_name: config.base_name.clone(),
        version: config.run.version_suffix(),
        artifact_name: paths.artifact_name.clone(),
        source_count: sources.len(),
        template: resolved_template.display().to_string(),
        sha256: receipt.sha256,
        size_bytes: receipt.size_bytes,
        tool_version: config.tool_version.clone(),
        completed_at: Utc::now(),
    };
    let manifest_path = docforge_artifacts::write_manifest(&paths.artifact_dir, &manifest)?;

    let result = BuildResult {
        versioned_pdf: paths.versioned_pdf,
        latest_pdf: paths.latest_pdf,
        artifact_name: paths.artifact_name,
        version: config.run.version_suffix(),
        source_count: sources.len(),
        manifest_path,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        artifact = %result.artifact_name,
        sources = result.source_count,
        elapsed_ms = result.elapsed.as_millis(),
        "build pipeline complete"
    );

    Ok(result)
}
