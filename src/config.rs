//! Setup configuration
//!
//! All vendor constants and tunables live in one explicit [`SetupConfig`]
//! passed into the orchestrator at construction; nothing reads them as
//! ambient globals. The uninstaller path and service unit name come from the
//! vendor installer's own layout and are observed, never created, by dlsetup.

use std::path::PathBuf;

/// Default log file path; overridable with `--log-file` / `DLSETUP_LOG_FILE`.
pub const DEFAULT_LOG_PATH: &str = "/var/log/dlsetup.log";

/// Immutable configuration for one dlsetup invocation
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Vendor archive holding the `.run` installer
    pub archive_url: String,
    /// Installer file name prefix inside the extracted archive
    pub installer_prefix: String,
    /// Installer file name suffix inside the extracted archive
    pub installer_suffix: String,
    /// Vendor uninstaller binary; its presence is the idempotency marker
    pub uninstaller_path: PathBuf,
    /// Argument passed to the uninstaller binary
    pub uninstall_arg: String,
    /// Service unit registered by the vendor installer
    pub service_unit: String,
    /// Kernel module loaded by the driver after reboot
    pub kernel_module: String,
    /// USB vendor id to look for in the device listing
    pub usb_vendor_id: String,
    /// Human-readable vendor name, also matched in the device listing
    pub usb_vendor_name: String,
    /// OS packages required before the vendor installer can build its module
    pub packages: Vec<String>,
    /// apt package tried first as a fast path before the manual flow
    pub catalog_package: String,
    /// Stale apt source registration left behind by previous failed attempts
    pub stale_apt_source: PathBuf,
    /// Append-only log file mirroring console output
    pub log_path: PathBuf,
}

impl SetupConfig {
    pub fn new(log_override: Option<PathBuf>) -> Self {
        SetupConfig {
            archive_url: "https://www.synaptics.com/sites/default/files/exe_files/2024-10/\
                          DisplayLink%20USB%20Graphics%20Software%20for%20Ubuntu6.1-EXE.zip"
                .to_string(),
            installer_prefix: "displaylink-driver".to_string(),
            installer_suffix: ".run".to_string(),
            uninstaller_path: PathBuf::from("/opt/displaylink/displaylink-installer"),
            uninstall_arg: "uninstall".to_string(),
            service_unit: "displaylink-driver.service".to_string(),
            kernel_module: "evdi".to_string(),
            usb_vendor_id: "17e9".to_string(),
            usb_vendor_name: "DisplayLink".to_string(),
            packages: vec![
                "unzip".to_string(),
                "dkms".to_string(),
                "libdrm-dev".to_string(),
                "linux-headers-generic".to_string(),
            ],
            catalog_package: "displaylink-driver".to_string(),
            stale_apt_source: PathBuf::from("/etc/apt/sources.list.d/displaylink.list"),
            log_path: log_override.unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path() {
        let config = SetupConfig::new(None);
        assert_eq!(config.log_path, PathBuf::from(DEFAULT_LOG_PATH));
    }

    #[test]
    fn test_log_override() {
        let config = SetupConfig::new(Some(PathBuf::from("/tmp/test.log")));
        assert_eq!(config.log_path, PathBuf::from("/tmp/test.log"));
    }

    #[test]
    fn test_unzip_precedes_manual_flow() {
        // unzip must be in the dependency set since extraction delegates to it
        let config = SetupConfig::new(None);
        assert!(config.packages.iter().any(|p| p == "unzip"));
    }

    #[test]
    fn test_archive_url_is_https() {
        let config = SetupConfig::new(None);
        assert!(config.archive_url.starts_with("https://"));
    }
}
