//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use docforge_core::pipeline::{BuildConfig, BuildResult, ProgressReporter};
use docforge_shared::{
    AppConfig, RunContext, StepOutputs, init_config, load_config, repo_name_from_env, temp_root,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docforge — assemble Markdown documents into versioned PDF artifacts.
#[derive(Parser)]
#[command(
    name = "docforge",
    version,
    about = "Assemble Markdown documents into a versioned PDF artifact.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the document construction pipeline.
    Build {
        /// Base file name of the output PDF (defaults to the repository name).
        #[arg(long, env = "INPUT_FILE_BASE_NAME")]
        base_name: Option<String>,

        /// Directory searched for Markdown sources.
        #[arg(long, env = "INPUT_DOCS_DIR")]
        docs_dir: Option<String>,

        /// Directory searched for referenced images.
        #[arg(long, env = "INPUT_IMAGES_DIR")]
        images_dir: Option<String>,

        /// Template path, or `remote_template` to download the default.
        #[arg(long, env = "INPUT_TEMPLATE_PATH")]
        template: Option<String>,

        /// CI run number used in the version suffix.
        #[arg(long, env = "GITHUB_RUN_NUMBER")]
        run_number: Option<u64>,

        /// Root directory for published artifacts.
        #[arg(long)]
        output_dir: Option<String>,

        /// Skip the toolchain installation step.
        #[arg(long)]
        skip_install: bool,

        /// Run in the current directory instead of cloning the constructor repo.
        #[arg(long)]
        no_clone: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docforge=info",
        1 => "docforge=debug",
        _ => "docforge=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            base_name,
            docs_dir,
            images_dir,
            template,
            run_number,
            output_dir,
            skip_install,
            no_clone,
        } => {
            cmd_build(BuildArgs {
                base_name: non_empty(base_name),
                docs_dir: non_empty(docs_dir),
                images_dir: non_empty(images_dir),
                template: non_empty(template),
                run_number,
                output_dir: non_empty(output_dir),
                skip_install,
                no_clone,
            })
            .await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// CI inputs arrive as env vars and may be set-but-empty; treat empty as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

struct BuildArgs {
    base_name: Option<String>,
    docs_dir: Option<String>,
    images_dir: Option<String>,
    template: Option<String>,
    run_number: Option<u64>,
    output_dir: Option<String>,
    skip_install: bool,
    no_clone: bool,
}

async fn cmd_build(args: BuildArgs) -> Result<()> {
    let config = load_config()?;

    // Base name falls back to the repository name, as the action did.
    let base_name = match args.base_name.or_else(repo_name_from_env) {
        Some(name) => name,
        None => {
            return Err(eyre!(
                "no base name: pass --base-name or set GITHUB_REPOSITORY"
            ));
        }
    };

    let run_number = match args.run_number {
        Some(n) => n,
        None => {
            warn!("run number not supplied, defaulting to 0");
            0
        }
    };
    let run = RunContext::current(run_number);

    let build_config = BuildConfig {
        base_name: base_name.clone(),
        docs_dir: PathBuf::from(
            args.docs_dir
                .unwrap_or_else(|| config.defaults.docs_dir.clone()),
        ),
        images_dir: PathBuf::from(
            args.images_dir
                .unwrap_or_else(|| config.defaults.images_dir.clone()),
        ),
        template_input: args.template.unwrap_or_default(),
        artifact_dir: PathBuf::from(
            args.output_dir
                .unwrap_or_else(|| config.defaults.artifact_dir.clone()),
        ),
        run,
        constructor: config.constructor.clone(),
        toolchain: config.toolchain.clone(),
        pandoc: config.pandoc.clone(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        clone_constructor: !args.no_clone,
        skip_install: args.skip_install,
        temp_root: temp_root(),
    };

    info!(
        base = %base_name,
        version = %build_config.run.version_suffix(),
        "starting document construction"
    );

    let reporter = CliProgress::new();
    let result = docforge_core::pipeline::run_build(&build_config, &reporter).await?;

    // Expose outputs for downstream pipeline steps.
    let outputs = StepOutputs::new(&result.versioned_pdf, &result.artifact_name);
    if let Some(output_file) = std::env::var_os("GITHUB_OUTPUT") {
        docforge_artifacts::write_step_outputs(std::path::Path::new(&output_file), &outputs)?;
    }

    // Print summary
    println!();
    println!("  Document constructed successfully!");
    println!("  Artifact:  {}", result.artifact_name);
    println!("  Version:   {}", result.version);
    println!("  Sources:   {}", result.source_count);
    println!("  Versioned: {}", result.versioned_pdf.display());
    println!("  Latest:    {}", result.latest_pdf.display());
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
