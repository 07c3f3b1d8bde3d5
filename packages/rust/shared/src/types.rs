//! Core domain types for docforge builds.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Current schema version for the build manifest format.
pub const CURRENT_MANIFEST_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// RunContext
// ---------------------------------------------------------------------------

/// Per-invocation context used to build the unique version suffix.
///
/// The date has day precision (UTC calendar day); the run number is
/// monotonic per CI invocation and supplied externally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// UTC calendar day of the run.
    pub date: NaiveDate,
    /// CI run number (0 for ad-hoc local runs).
    pub run_number: u64,
}

impl RunContext {
    pub fn new(date: NaiveDate, run_number: u64) -> Self {
        Self { date, run_number }
    }

    /// Context for a run starting now (UTC day precision).
    pub fn current(run_number: u64) -> Self {
        Self::new(Utc::now().date_naive(), run_number)
    }

    /// ISO date string, day precision (e.g. `2024-03-01`).
    pub fn date_iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// The `<date>-<run>` suffix appended to versioned artifact names.
    pub fn version_suffix(&self) -> String {
        format!("{}-{}", self.date_iso(), self.run_number)
    }
}

/// File name of the versioned PDF: `<base>-<date>-<run>.pdf`.
pub fn versioned_file_name(base_name: &str, run: &RunContext) -> String {
    format!("{base_name}-{}.pdf", run.version_suffix())
}

// ---------------------------------------------------------------------------
// ArtifactPaths
// ---------------------------------------------------------------------------

/// Resolved output layout for one build.
///
/// ```text
/// <artifact_dir>/
/// ├── <base>.pdf                        latest, overwritten each run
/// └── versions/
///     └── <base>-<date>-<run>.pdf       versioned, accumulates
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Root artifact directory.
    pub artifact_dir: PathBuf,
    /// Directory holding versioned builds.
    pub versions_dir: PathBuf,
    /// Full path of the versioned PDF for this run.
    pub versioned_pdf: PathBuf,
    /// Full path of the "latest" PDF.
    pub latest_pdf: PathBuf,
    /// File name of the versioned PDF (the artifact name exposed downstream).
    pub artifact_name: String,
}

impl ArtifactPaths {
    /// Compute the layout for a build under `artifact_dir`.
    pub fn for_build(artifact_dir: impl Into<PathBuf>, base_name: &str, run: &RunContext) -> Self {
        let artifact_dir: PathBuf = artifact_dir.into();
        let versions_dir = artifact_dir.join("versions");
        let artifact_name = versioned_file_name(base_name, run);
        let versioned_pdf = versions_dir.join(&artifact_name);
        let latest_pdf = artifact_dir.join(format!("{base_name}.pdf"));
        Self {
            artifact_dir,
            versions_dir,
            versioned_pdf,
            latest_pdf,
            artifact_name,
        }
    }
}

// ---------------------------------------------------------------------------
// BuildManifest
// ---------------------------------------------------------------------------

/// The `build-manifest.json` written next to the published artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    /// Base file name of the document.
    pub base_name: String,
    /// Version suffix of this build (`<date>-<run>`).
    pub version: String,
    /// File name of the versioned PDF.
    pub artifact_name: String,
    /// Number of Markdown source files compiled.
    pub source_count: usize,
    /// Template path used for typesetting.
    pub template: String,
    /// SHA-256 of the versioned PDF.
    pub sha256: String,
    /// Size of the versioned PDF in bytes.
    pub size_bytes: u64,
    /// Tool version that produced this build.
    pub tool_version: String,
    /// When the build completed.
    pub completed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// StepOutputs
// ---------------------------------------------------------------------------

/// Outputs exposed to downstream pipeline steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutputs {
    /// Path to the versioned PDF.
    pub pdf_path: PathBuf,
    /// File name of the versioned PDF artifact.
    pub artifact_name: String,
}

impl StepOutputs {
    pub fn new(pdf_path: impl Into<PathBuf>, artifact_name: impl Into<String>) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            artifact_name: artifact_name.into(),
        }
    }

    /// Render as `key=value` lines in the CI output-file format.
    pub fn to_output_lines(&self) -> String {
        format!(
            "pdf_path={}\nartifact_name={}\n",
            self.pdf_path.display(),
            self.artifact_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march_run() -> RunContext {
        RunContext::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 7)
    }

    #[test]
    fn version_suffix_formatting() {
        let run = march_run();
        assert_eq!(run.date_iso(), "2024-03-01");
        assert_eq!(run.version_suffix(), "2024-03-01-7");
    }

    #[test]
    fn versioned_file_name_scenario() {
        // base "guide", run 7, date 2024-03-01
        assert_eq!(
            versioned_file_name("guide", &march_run()),
            "guide-2024-03-01-7.pdf"
        );
    }

    #[test]
    fn versioned_file_name_changes_with_inputs() {
        let run = march_run();
        let other_run = RunContext::new(run.date, 8);
        assert_ne!(
            versioned_file_name("guide", &run),
            versioned_file_name("guide", &other_run)
        );
        assert_ne!(
            versioned_file_name("guide", &run),
            versioned_file_name("manual", &run)
        );
    }

    #[test]
    fn artifact_paths_layout() {
        let paths = ArtifactPaths::for_build("artifacts", "guide", &march_run());
        assert_eq!(paths.artifact_name, "guide-2024-03-01-7.pdf");
        assert_eq!(paths.versions_dir, PathBuf::from("artifacts/versions"));
        assert_eq!(
            paths.versioned_pdf,
            PathBuf::from("artifacts/versions/guide-2024-03-01-7.pdf")
        );
        assert_eq!(paths.latest_pdf, PathBuf::from("artifacts/guide.pdf"));
    }

    #[test]
    fn manifest_serialization() {
        let manifest = BuildManifest {
            schema_version: CURRENT_MANIFEST_VERSION,
            base_name: "guide".into(),
            version: "2024-03-01-7".into(),
            artifact_name: "guide-2024-03-01-7.pdf".into(),
            source_count: 3,
            template: "./templates/template.tex".into(),
            sha256: "0".repeat(64),
            size_bytes: 1024,
            tool_version: "0.1.0".into(),
            completed_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&manifest).expect("serialize");
        let parsed: BuildManifest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.schema_version, CURRENT_MANIFEST_VERSION);
        assert_eq!(parsed.artifact_name, "guide-2024-03-01-7.pdf");
        assert_eq!(parsed.source_count, 3);
    }

    #[test]
    fn step_outputs_lines() {
        let outputs = StepOutputs::new("artifacts/versions/guide-2024-03-01-7.pdf", "guide-2024-03-01-7.pdf");
        let lines = outputs.to_output_lines();
        assert!(lines.contains("pdf_path=artifacts/versions/guide-2024-03-01-7.pdf\n"));
        assert!(lines.contains("artifact_name=guide-2024-03-01-7.pdf\n"));
    }
}
