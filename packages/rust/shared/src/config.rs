//! Application configuration for docforge.
//!
//! User config lives at `~/.docforge/docforge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DocforgeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docforge";

/// Sentinel template-path value that selects the remote default template.
pub const REMOTE_TEMPLATE_SENTINEL: &str = "remote_template";

/// Built-in template path, relative to the constructor repository root.
pub const BUILTIN_TEMPLATE_PATH: &str = "./templates/template.tex";

// ---------------------------------------------------------------------------
// Config structs (matching docforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Build input defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Constructor repository coordinates.
    #[serde(default)]
    pub constructor: ConstructorConfig,

    /// Toolchain installation settings.
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// Converter invocation settings.
    #[serde(default)]
    pub pandoc: PandocConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory searched for Markdown sources.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Directory searched for referenced images.
    #[serde(default = "default_images_dir")]
    pub images_dir: String,

    /// Root directory for published artifacts.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            images_dir: default_images_dir(),
            artifact_dir: default_artifact_dir(),
        }
    }
}

fn default_docs_dir() -> String {
    "docs".into()
}
fn default_images_dir() -> String {
    "images".into()
}
fn default_artifact_dir() -> String {
    "artifacts".into()
}

/// `[constructor]` section — where the template repository lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructorConfig {
    /// Repository owner.
    #[serde(default = "default_constructor_owner")]
    pub owner: String,

    /// Repository name.
    #[serde(default = "default_constructor_repo")]
    pub repo: String,

    /// Git reference to check out.
    #[serde(default = "default_constructor_ref")]
    pub git_ref: String,

    /// Override for the remote default template URL.
    /// When unset, the URL is derived from the repository coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_url: Option<Url>,
}

impl Default for ConstructorConfig {
    fn default() -> Self {
        Self {
            owner: default_constructor_owner(),
            repo: default_constructor_repo(),
            git_ref: default_constructor_ref(),
            template_url: None,
        }
    }
}

fn default_constructor_owner() -> String {
    "yaouDev".into()
}
fn default_constructor_repo() -> String {
    "automated-document-constructor".into()
}
fn default_constructor_ref() -> String {
    "main".into()
}

impl ConstructorConfig {
    /// HTTPS clone URL for the constructor repository.
    pub fn clone_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.owner, self.repo)
    }

    /// Raw URL of the default template inside the constructor repository.
    pub fn raw_template_url(&self) -> Result<Url> {
        if let Some(url) = &self.template_url {
            return Ok(url.clone());
        }
        let raw = format!(
            "https://raw.githubusercontent.com/{}/{}/{}/templates/template.tex",
            self.owner, self.repo, self.git_ref
        );
        Url::parse(&raw)
            .map_err(|e| DocforgeError::config(format!("invalid template URL '{raw}': {e}")))
    }
}

/// `[toolchain]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Prefix package-manager calls with sudo.
    #[serde(default = "default_true")]
    pub use_sudo: bool,

    /// Packages installed before conversion.
    #[serde(default = "default_packages")]
    pub packages: Vec<String>,

    /// Typesetting engine binary probed before skipping installation.
    #[serde(default = "default_typesetter")]
    pub typesetter: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            use_sudo: true,
            packages: default_packages(),
            typesetter: default_typesetter(),
        }
    }
}

fn default_typesetter() -> String {
    "pdflatex".into()
}

fn default_true() -> bool {
    true
}
fn default_packages() -> Vec<String> {
    vec![
        "pandoc".into(),
        "texlive-latex-extra".into(),
        "texlive-fonts-recommended".into(),
    ]
}

/// `[pandoc]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PandocConfig {
    /// Converter binary name.
    #[serde(default = "default_pandoc_binary")]
    pub binary: String,

    /// Table-of-contents depth.
    #[serde(default = "default_toc_depth")]
    pub toc_depth: u32,

    /// Number sections in the output.
    #[serde(default = "default_true")]
    pub number_sections: bool,
}

impl Default for PandocConfig {
    fn default() -> Self {
        Self {
            binary: default_pandoc_binary(),
            toc_depth: default_toc_depth(),
            number_sections: true,
        }
    }
}

fn default_pandoc_binary() -> String {
    "pandoc".into()
}
fn default_toc_depth() -> u32 {
    3
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocforgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docforge/docforge.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| DocforgeError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocforgeError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocforgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocforgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocforgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

// ---------------------------------------------------------------------------
// CI environment
// ---------------------------------------------------------------------------

/// Temporary-directory root: `RUNNER_TEMP` when set, `/tmp` otherwise.
pub fn temp_root() -> PathBuf {
    match std::env::var_os("RUNNER_TEMP") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::temp_dir(),
    }
}

/// Repository name from `GITHUB_REPOSITORY` (the part after `owner/`).
pub fn repo_name_from_env() -> Option<String> {
    std::env::var("GITHUB_REPOSITORY")
        .ok()
        .and_then(|v| repo_tail(&v))
}

/// Extract the repository name from an `owner/repo` slug.
pub(crate) fn repo_tail(slug: &str) -> Option<String> {
    let tail = slug.rsplit('/').next()?.trim();
    if tail.is_empty() {
        None
    } else {
        Some(tail.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("docs_dir"));
        assert!(toml_str.contains("automated-document-constructor"));
        assert!(toml_str.contains("texlive-latex-extra"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.pandoc.toc_depth, 3);
        assert!(parsed.pandoc.number_sections);
        assert_eq!(parsed.constructor.git_ref, "main");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
docs_dir = "manuscript"

[pandoc]
toc_depth = 2
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.docs_dir, "manuscript");
        assert_eq!(config.defaults.images_dir, "images");
        assert_eq!(config.pandoc.toc_depth, 2);
        assert_eq!(config.pandoc.binary, "pandoc");
    }

    #[test]
    fn constructor_urls() {
        let constructor = ConstructorConfig::default();
        assert_eq!(
            constructor.clone_url(),
            "https://github.com/yaouDev/automated-document-constructor.git"
        );
        let url = constructor.raw_template_url().expect("valid URL");
        assert_eq!(
            url.as_str(),
            "https://raw.githubusercontent.com/yaouDev/automated-document-constructor/main/templates/template.tex"
        );
    }

    #[test]
    fn template_url_override_wins() {
        let mut constructor = ConstructorConfig::default();
        constructor.template_url =
            Some(Url::parse("http://127.0.0.1:9/custom.tex").unwrap());
        let url = constructor.raw_template_url().expect("valid URL");
        assert_eq!(url.as_str(), "http://127.0.0.1:9/custom.tex");
    }

    #[test]
    fn toolchain_defaults_include_typesetter() {
        let config = ToolchainConfig::default();
        assert_eq!(config.typesetter, "pdflatex");
        assert!(config.packages.iter().any(|p| p.starts_with("texlive")));
    }

    #[test]
    fn repo_tail_parsing() {
        assert_eq!(repo_tail("yaouDev/my-docs"), Some("my-docs".into()));
        assert_eq!(repo_tail("my-docs"), Some("my-docs".into()));
        assert_eq!(repo_tail("yaouDev/"), None);
        assert_eq!(repo_tail(""), None);
    }
}
