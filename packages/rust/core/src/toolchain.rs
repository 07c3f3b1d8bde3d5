//! Converter toolchain installation.
//!
//! Installs the document converter and the typesetting engine via the
//! platform package manager. Installation failures carry their own error
//! variant so the run fails with step-specific context.

use tracing::info;

use docforge_shared::{DocforgeError, Result, ToolchainConfig};

use crate::exec;

/// Check whether a binary already responds to `--version`.
pub async fn binary_available(binary: &str) -> bool {
    exec::run(binary, &["--version".to_string()], None)
        .await
        .is_ok()
}

/// Check whether the full toolchain is already present.
///
/// CI runners often preinstall the converter without the typesetting
/// engine, so both must respond before the install step may be skipped.
pub async fn toolchain_present(converter: &str, typesetter: &str) -> bool {
    binary_available(converter).await && binary_available(typesetter).await
}

/// Install the toolchain packages via `apt-get`.
pub async fn install(config: &ToolchainConfig) -> Result<()> {
    info!(packages = ?config.packages, sudo = config.use_sudo, "installing toolchain");

    run_apt(config, &["update".to_string()])
        .await
        .map_err(|e| DocforgeError::Toolchain(format!("package index update failed: {e}")))?;

    let mut install_args = vec!["install".to_string(), "-y".to_string()];
    install_args.extend(config.packages.iter().cloned());
    run_apt(config, &install_args)
        .await
        .map_err(|e| DocforgeError::Toolchain(format!("package installation failed: {e}")))?;

    info!("toolchain installed");
    Ok(())
}

/// Run `apt-get` with the given arguments, optionally through sudo.
async fn run_apt(
    config: &ToolchainConfig,
    args: &[String],
) -> std::result::Result<exec::CmdOutput, String> {
    if config.use_sudo {
        let mut sudo_args = vec!["apt-get".to_string()];
        sudo_args.extend(args.iter().cloned());
        exec::run("sudo", &sudo_args, None).await
    } else {
        exec::run("apt-get", args, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_converter_is_not_available() {
        assert!(!binary_available("docforge-no-such-converter-437").await);
    }

    #[tokio::test]
    async fn present_binary_is_available() {
        // `true` ignores --version and exits 0, standing in for an
        // installed converter.
        assert!(binary_available("true").await);
    }

    #[tokio::test]
    async fn converter_alone_is_not_a_full_toolchain() {
        // Converter present, typesetting engine missing: the install
        // step must still run.
        assert!(!toolchain_present("true", "docforge-no-such-typesetter-437").await);
    }

    #[tokio::test]
    async fn full_toolchain_is_detected() {
        assert!(toolchain_present("true", "true").await);
    }
}
