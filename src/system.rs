//! External collaborator seam
//!
//! Everything dlsetup does to the host goes through the [`System`] trait:
//! privilege query, OS identity, device listing, the package manager, the
//! archive download and extraction, the vendor binaries, systemd and the
//! reboot. Each invocation returns a checked result; no command failure is
//! silently swallowed. [`HostSystem`] is the real implementation; tests
//! supply a mock.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Command;

use crate::error::{Result, SetupError};
use crate::progress::DownloadProgress;

/// External collaborators of the workflow, one method per contract
pub trait System {
    /// Whether the process runs with administrative rights
    fn is_privileged(&self) -> bool;

    /// Raw contents of `/etc/os-release`
    fn os_release(&self) -> Result<String>;

    /// Raw `lsusb` listing; Err when the devices cannot be queried
    fn usb_listing(&self) -> Result<String>;

    /// Whether an OS package is currently installed
    fn package_installed(&self, package: &str) -> Result<bool>;

    /// Install an OS package; Ok(false) means the package manager exited non-zero
    fn install_package(&mut self, package: &str) -> Result<bool>;

    fn path_exists(&self, path: &Path) -> bool;

    /// Remove a file; absence is not an error
    fn remove_file(&mut self, path: &Path) -> Result<()>;

    /// Fetch the vendor archive over HTTPS into `dest`
    fn download(&mut self, url: &str, dest: &Path) -> Result<()>;

    /// Extract a zip archive into `dest`
    fn extract_archive(&mut self, archive: &Path, dest: &Path) -> Result<()>;

    fn make_executable(&mut self, path: &Path) -> Result<()>;

    /// Run a delegated binary with inherited stdio, returning its exit code.
    /// The vendor binaries are interactive and authoritative; their output is
    /// forwarded to the operator, never parsed.
    fn run_interactive(&mut self, program: &Path, args: &[&str]) -> Result<i32>;

    /// Whether a service unit is registered with systemd
    fn unit_registered(&self, unit: &str) -> Result<bool>;

    /// Whether a kernel module is currently loaded
    fn module_loaded(&self, module: &str) -> Result<bool>;

    /// Reboot the machine; terminal on success
    fn reboot(&mut self) -> Result<()>;
}

/// The real host: apt, unzip, systemctl, lsusb, reqwest
pub struct HostSystem;

impl HostSystem {
    pub fn new() -> Self {
        HostSystem
    }
}

impl System for HostSystem {
    fn is_privileged(&self) -> bool {
        nix::unistd::geteuid().is_root()
    }

    fn os_release(&self) -> Result<String> {
        Ok(fs::read_to_string("/etc/os-release")?)
    }

    fn usb_listing(&self) -> Result<String> {
        let output = Command::new("lsusb").output()?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn package_installed(&self, package: &str) -> Result<bool> {
        let output = Command::new("dpkg-query")
            .args(["-W", "-f", "${Status}", package])
            .output()?;
        let status = String::from_utf8_lossy(&output.stdout);
        Ok(output.status.success() && dpkg_status_installed(&status))
    }

    fn install_package(&mut self, package: &str) -> Result<bool> {
        let status = Command::new("apt-get")
            .args(["install", "-y", package])
            .status()?;
        Ok(status.success())
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&mut self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn download(&mut self, url: &str, dest: &Path) -> Result<()> {
        let failed = |reason: String| SetupError::DownloadFailed {
            url: url.to_string(),
            reason,
        };
        let mut file = fs::File::create(dest).map_err(|e| failed(e.to_string()))?;
        let response = reqwest::blocking::get(url)
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| failed(e.to_string()))?;
        let progress = DownloadProgress::new(response.content_length());
        let mut reader = progress.wrap_read(response);
        io::copy(&mut reader, &mut file).map_err(|e| failed(e.to_string()))?;
        progress.finish();
        Ok(())
    }

    fn extract_archive(&mut self, archive: &Path, dest: &Path) -> Result<()> {
        let failed = |reason: String| SetupError::ExtractionFailed {
            archive: archive.display().to_string(),
            reason,
        };
        let status = Command::new("unzip")
            .arg("-q")
            .arg(archive)
            .arg("-d")
            .arg(dest)
            .status()
            .map_err(|e| failed(e.to_string()))?;
        if !status.success() {
            return Err(failed(format!("unzip exited with {status}")));
        }
        Ok(())
    }

    fn make_executable(&mut self, path: &Path) -> Result<()> {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms)?;
        Ok(())
    }

    fn run_interactive(&mut self, program: &Path, args: &[&str]) -> Result<i32> {
        let status = Command::new(program).args(args).status()?;
        // None means the child was killed by a signal
        Ok(status.code().unwrap_or(-1))
    }

    fn unit_registered(&self, unit: &str) -> Result<bool> {
        let output = Command::new("systemctl")
            .args(["list-unit-files", unit])
            .output()?;
        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(output.status.success() && listing.contains(unit))
    }

    fn module_loaded(&self, module: &str) -> Result<bool> {
        let modules = fs::read_to_string("/proc/modules")?;
        Ok(modules_contains(&modules, module))
    }

    fn reboot(&mut self) -> Result<()> {
        let status = Command::new("systemctl").arg("reboot").status()?;
        if !status.success() {
            return Err(SetupError::IoError {
                message: format!("systemctl reboot exited with {status}"),
            });
        }
        Ok(())
    }
}

/// dpkg `${Status}` value of a package that is actually on disk
fn dpkg_status_installed(status: &str) -> bool {
    status.trim() == "install ok installed"
}

/// Whether a `/proc/modules` listing contains the named module
fn modules_contains(listing: &str, module: &str) -> bool {
    listing
        .lines()
        .any(|line| line.split_whitespace().next() == Some(module))
}
