//! Pandoc invocation.
//!
//! Builds the converter argument list from the resolved template, run date,
//! and discovered sources, then runs the conversion. Argument construction
//! is separated from execution so the computed options are testable.

use std::path::PathBuf;

use tracing::info;

use docforge_shared::{DocforgeError, Result};

use crate::exec;

/// One conversion: sorted Markdown inputs to a single versioned PDF.
#[derive(Debug, Clone)]
pub struct ConvertJob {
    /// Converter binary name or path.
    pub binary: String,
    /// Output path of the versioned PDF.
    pub output: PathBuf,
    /// Resolved template path.
    pub template: PathBuf,
    /// ISO build date passed as the `date` variable.
    pub date: String,
    /// Images directory added to the resource search path.
    pub images_dir: PathBuf,
    /// Table-of-contents depth.
    pub toc_depth: u32,
    /// Whether to number sections.
    pub number_sections: bool,
    /// Sorted Markdown input files.
    pub inputs: Vec<PathBuf>,
}

/// Build the full pandoc argument list for a job.
pub fn pandoc_args(job: &ConvertJob) -> Vec<String> {
    let mut args = vec![
        "--from".to_string(),
        "markdown".to_string(),
        "--to".to_string(),
        "pdf".to_string(),
        "--output".to_string(),
        job.output.to_string_lossy().into_owned(),
        "--table-of-contents".to_string(),
        format!("--toc-depth={}", job.toc_depth),
    ];

    if job.number_sections {
        args.push("--number-sections".to_string());
    }

    args.push(format!("--template={}", job.template.display()));
    args.push(format!("--variable=date:{}", job.date));
    args.push(format!("--resource-path=./:{}", job.images_dir.display()));

    args.extend(
        job.inputs
            .iter()
            .map(|p| p.to_string_lossy().into_owned()),
    );

    args
}

/// Run the conversion, surfacing the converter's error output on failure.
pub async fn run_conversion(job: &ConvertJob) -> Result<()> {
    let args = pandoc_args(job);
    info!(
        output = %job.output.display(),
        inputs = job.inputs.len(),
        "compiling PDF"
    );

    exec::run(&job.binary, &args, None)
        .await
        .map_err(|e| DocforgeError::Convert(format!("pandoc compilation failed: {e}")))?;

    info!(output = %job.output.display(), "pandoc compilation successful");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> ConvertJob {
        ConvertJob {
            binary: "pandoc".into(),
            output: "artifacts/versions/guide-2024-03-01-7.pdf".into(),
            template: "./templates/template.tex".into(),
            date: "2024-03-01".into(),
            images_dir: "images".into(),
            toc_depth: 3,
            number_sections: true,
            inputs: vec!["docs/a.md".into(), "docs/b.md".into()],
        }
    }

    #[test]
    fn args_carry_computed_options() {
        let args = pandoc_args(&job());

        assert_eq!(args[0..4], ["--from", "markdown", "--to", "pdf"]);
        assert_eq!(args[4], "--output");
        assert_eq!(args[5], "artifacts/versions/guide-2024-03-01-7.pdf");
        assert!(args.contains(&"--table-of-contents".to_string()));
        assert!(args.contains(&"--toc-depth=3".to_string()));
        assert!(args.contains(&"--number-sections".to_string()));
        assert!(args.contains(&"--template=./templates/template.tex".to_string()));
        assert!(args.contains(&"--variable=date:2024-03-01".to_string()));
        assert!(args.contains(&"--resource-path=./:images".to_string()));
    }

    #[test]
    fn inputs_are_positional_and_ordered() {
        let args = pandoc_args(&job());
        let len = args.len();
        assert_eq!(args[len - 2], "docs/a.md");
        assert_eq!(args[len - 1], "docs/b.md");
    }

    #[test]
    fn number_sections_can_be_disabled() {
        let mut j = job();
        j.number_sections = false;
        let args = pandoc_args(&j);
        assert!(!args.contains(&"--number-sections".to_string()));
    }

    #[tokio::test]
    async fn conversion_failure_maps_to_convert_error() {
        let mut j = job();
        j.binary = "false".into();
        let err = run_conversion(&j).await.unwrap_err();
        assert!(err.to_string().starts_with("conversion error"));
        assert!(err.to_string().contains("pandoc compilation failed"));
    }
}
