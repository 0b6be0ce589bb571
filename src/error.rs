//! Error types and handling for dlsetup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//! Every error is terminal for the current invocation: nothing is caught and
//! retried, each variant maps to a process exit code via [`SetupError::exit_code`].

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for dlsetup operations
#[derive(Error, Diagnostic, Debug)]
pub enum SetupError {
    #[error("Administrative privileges are required")]
    #[diagnostic(
        code(dlsetup::privilege::denied),
        help("Re-run with sudo: sudo dlsetup --install")
    )]
    NotPrivileged,

    #[error("Unsupported platform: {detected}")]
    #[diagnostic(
        code(dlsetup::platform::unsupported),
        help("dlsetup supports Ubuntu and Ubuntu-derived distributions only")
    )]
    UnsupportedPlatform { detected: String },

    #[error("The DisplayLink driver is already installed")]
    #[diagnostic(
        code(dlsetup::install::already_installed),
        help("Run 'dlsetup --uninstall' first, then install again")
    )]
    AlreadyInstalled,

    #[error("Failed to install package '{package}'")]
    #[diagnostic(
        code(dlsetup::deps::install_failed),
        help("Check network connectivity and apt sources, then re-run")
    )]
    DependencyInstallFailed { package: String },

    #[error("Failed to download driver archive from {url}")]
    #[diagnostic(code(dlsetup::download::failed))]
    DownloadFailed { url: String, reason: String },

    #[error("Failed to extract driver archive: {archive}")]
    #[diagnostic(code(dlsetup::extract::failed))]
    ExtractionFailed { archive: String, reason: String },

    #[error("No installer matching '{pattern}' found in the extracted archive")]
    #[diagnostic(
        code(dlsetup::install::installer_not_found),
        help("The vendor archive layout may have changed upstream")
    )]
    InstallerNotFound { pattern: String },

    #[error("Vendor installer exited with status {status}")]
    #[diagnostic(code(dlsetup::install::vendor_failed))]
    VendorInstallerFailed { status: i32 },

    #[error("Vendor uninstaller exited with status {status}")]
    #[diagnostic(code(dlsetup::uninstall::vendor_failed))]
    VendorUninstallerFailed { status: i32 },

    #[error("Interrupted by operator")]
    #[diagnostic(code(dlsetup::interrupted))]
    Interrupted,

    #[error("IO error: {message}")]
    #[diagnostic(code(dlsetup::io_error))]
    IoError { message: String },
}

impl SetupError {
    /// Process exit code for this error.
    ///
    /// Interrupts use the conventional 128+SIGINT status; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            SetupError::Interrupted => 130,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for SetupError {
    fn from(err: std::io::Error) -> Self {
        SetupError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for SetupError {
    fn from(err: inquire::InquireError) -> Self {
        match err {
            inquire::InquireError::OperationInterrupted => SetupError::Interrupted,
            other => SetupError::IoError {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SetupError>;
