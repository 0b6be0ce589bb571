//! OS package dependencies and stale-state cleanup
//!
//! The vendor installer builds a kernel module on the host, so a missing
//! toolchain package predictably breaks it later: the first package manager
//! failure aborts the whole run.

use std::path::Path;

use crate::error::{Result, SetupError};
use crate::report::LogSink;
use crate::system::System;

/// Check each declared package and install the absent ones, in order.
/// Fail-fast: the first failed installation is fatal.
pub fn ensure_dependencies(
    system: &mut dyn System,
    report: &mut LogSink,
    packages: &[String],
) -> Result<()> {
    for package in packages {
        if system.package_installed(package)? {
            report.info(&format!("{package} is already installed"));
            continue;
        }
        report.info(&format!("installing {package}"));
        if !system.install_package(package)? {
            return Err(SetupError::DependencyInstallFailed {
                package: package.clone(),
            });
        }
        report.success(&format!("{package} installed"));
    }
    Ok(())
}

/// Try installing the driver straight from the package catalog.
///
/// Returns true when the catalog had it; a non-zero exit is the designed
/// fallthrough to the manual download flow, not an error.
pub fn try_catalog_install(
    system: &mut dyn System,
    report: &mut LogSink,
    package: &str,
) -> Result<bool> {
    report.info(&format!("trying '{package}' from the package catalog"));
    if system.install_package(package)? {
        return Ok(true);
    }
    report.info("not available from the catalog, using the vendor download");
    Ok(false)
}

/// Remove a configuration artifact left by a previous failed attempt.
/// Idempotent: nothing to remove is not an error.
pub fn cleanup_stale_state(
    system: &mut dyn System,
    report: &mut LogSink,
    artifact: &Path,
) -> Result<()> {
    if system.path_exists(artifact) {
        report.info(&format!("removing stale {}", artifact.display()));
        system.remove_file(artifact)?;
    }
    Ok(())
}
