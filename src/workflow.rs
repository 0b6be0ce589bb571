//! Workflow orchestrator
//!
//! Runs the provisioning workflow as a strict, sequential state machine:
//! privilege check → idempotency check → environment detection → dependency
//! installation → stale-state cleanup → driver action → verification →
//! reboot prompt. Fail-fast: every external failure aborts the run, there is
//! no retry policy anywhere. The only designed no-op successes are declining
//! the missing-device prompt and uninstalling when nothing is installed.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::SetupConfig;
use crate::deps;
use crate::error::{Result, SetupError};
use crate::probe;
use crate::prompt::Prompter;
use crate::report::LogSink;
use crate::system::System;
use crate::workdir::ScopedWorkdir;

/// Which workflow one invocation runs; at most one per invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Uninstall,
}

/// Owns all decision points and error propagation of one invocation
pub struct Orchestrator<'a> {
    config: &'a SetupConfig,
    system: &'a mut dyn System,
    prompter: &'a mut dyn Prompter,
    report: &'a mut LogSink,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a SetupConfig,
        system: &'a mut dyn System,
        prompter: &'a mut dyn Prompter,
        report: &'a mut LogSink,
    ) -> Self {
        Orchestrator {
            config,
            system,
            prompter,
            report,
        }
    }

    pub fn run(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Install => self.install(),
            Action::Uninstall => self.uninstall(),
        }
    }

    /// Privilege is checked once, eagerly, before any mutating step
    fn require_privilege(&self) -> Result<()> {
        if self.system.is_privileged() {
            Ok(())
        } else {
            Err(SetupError::NotPrivileged)
        }
    }

    fn install(&mut self) -> Result<()> {
        self.require_privilege()?;

        // Idempotency marker before anything else: an already-installed
        // system must never reach the package manager or the download
        if self.system.path_exists(&self.config.uninstaller_path) {
            return Err(SetupError::AlreadyInstalled);
        }

        let probe = probe::detect(self.system, self.config, self.report)?;
        self.report.success(&format!(
            "detected {} {}",
            probe.distribution, probe.version
        ));

        if probe.devices.is_empty() {
            self.report
                .warn("no DisplayLink device detected on the USB bus");
            let proceed = self
                .prompter
                .confirm("No DisplayLink device is attached. Continue anyway?", false)?;
            if !proceed {
                self.report.info("nothing to do, no changes were made");
                return Ok(());
            }
        } else {
            for device in &probe.devices {
                self.report.success(&format!("found {device}"));
            }
        }

        self.report.info("checking required packages");
        deps::ensure_dependencies(self.system, self.report, &self.config.packages)?;
        deps::cleanup_stale_state(self.system, self.report, &self.config.stale_apt_source)?;

        if deps::try_catalog_install(self.system, self.report, &self.config.catalog_package)? {
            self.report.success("driver installed from the package catalog");
        } else {
            self.manual_install()?;
        }

        self.verify();
        self.prompt_reboot()
    }

    /// Download, extract and delegate to the vendor installer inside a
    /// scoped working directory that is released on every exit path.
    fn manual_install(&mut self) -> Result<()> {
        let workdir = ScopedWorkdir::create()?;
        let archive = workdir.path().join("displaylink.zip");

        self.report
            .info(&format!("downloading {}", self.config.archive_url));
        self.system.download(&self.config.archive_url, &archive)?;

        self.report.info("extracting the driver archive");
        self.system.extract_archive(&archive, workdir.path())?;

        let installer = self.locate_installer(workdir.path())?;
        self.report
            .success(&format!("found installer {}", installer.display()));
        self.system.make_executable(&installer)?;

        self.report.info("handing over to the vendor installer");
        let status = self.system.run_interactive(&installer, &[])?;
        if status != 0 {
            return Err(SetupError::VendorInstallerFailed { status });
        }
        self.report.success("vendor installer finished");
        Ok(())
    }

    /// The archive layout is upstream's; find the `.run` by pattern instead
    /// of assuming a path.
    fn locate_installer(&self, root: &Path) -> Result<PathBuf> {
        let prefix = self.config.installer_prefix.as_str();
        let suffix = self.config.installer_suffix.as_str();
        WalkDir::new(root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .find(|entry| {
                entry.file_type().is_file()
                    && entry
                        .file_name()
                        .to_str()
                        .map(|name| name.starts_with(prefix) && name.ends_with(suffix))
                        .unwrap_or(false)
            })
            .map(walkdir::DirEntry::into_path)
            .ok_or_else(|| SetupError::InstallerNotFound {
                pattern: format!("{prefix}*{suffix}"),
            })
    }

    fn uninstall(&mut self) -> Result<()> {
        self.require_privilege()?;

        // Uninstalling something not installed is not a failure
        if !self.system.path_exists(&self.config.uninstaller_path) {
            self.report
                .info("the DisplayLink driver is not installed, nothing to do");
            return Ok(());
        }

        self.report.info("running the vendor uninstaller");
        let status = self.system.run_interactive(
            &self.config.uninstaller_path,
            &[self.config.uninstall_arg.as_str()],
        )?;
        if status != 0 {
            return Err(SetupError::VendorUninstallerFailed { status });
        }
        self.report.success("driver uninstalled");

        // Removal also completes only after reboot
        self.prompt_reboot()
    }

    /// Best-effort post-install checks; informational only, never raises.
    /// The kernel module is expected to load only after reboot.
    fn verify(&mut self) {
        match self.system.unit_registered(&self.config.service_unit) {
            Ok(true) => self
                .report
                .success(&format!("{} is registered", self.config.service_unit)),
            Ok(false) => self
                .report
                .warn(&format!("{} is not registered", self.config.service_unit)),
            Err(_) => self.report.warn("could not query systemd for the service unit"),
        }
        match self.system.module_loaded(&self.config.kernel_module) {
            Ok(true) => self
                .report
                .success(&format!("kernel module {} is loaded", self.config.kernel_module)),
            Ok(false) => self.report.info(&format!(
                "kernel module {} not loaded yet (expected before reboot)",
                self.config.kernel_module
            )),
            Err(_) => self.report.warn("could not read the loaded module list"),
        }
    }

    /// Default answer is "no"; anything but an explicit yes leaves a reminder
    fn prompt_reboot(&mut self) -> Result<()> {
        if self
            .prompter
            .confirm("Reboot now to finish applying the change?", false)?
        {
            self.report.info("rebooting");
            self.system.reboot()
        } else {
            self.report
                .info("remember to reboot to finish applying the change");
            Ok(())
        }
    }
}
