//! CLI definitions using clap derive API

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};
use std::path::PathBuf;

use crate::workflow::Action;

/// dlsetup - DisplayLink driver setup for Ubuntu-family systems
#[derive(Parser, Debug)]
#[command(
    name = "dlsetup",
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install or uninstall the DisplayLink USB graphics driver",
    long_about = "dlsetup provisions the vendor-supplied DisplayLink USB graphics driver on \
                  Ubuntu-family systems: it checks the host, installs the required OS packages, \
                  downloads the vendor archive and delegates to the vendor's interactive installer. \
                  Run it with administrative rights.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  sudo dlsetup                     \x1b[90m# Install (default)\x1b[0m\n   \
                  sudo dlsetup --install           \x1b[90m# Install, explicitly\x1b[0m\n   \
                  sudo dlsetup --uninstall         \x1b[90m# Remove the driver\x1b[0m\n   \
                  sudo dlsetup --non-interactive   \x1b[90m# Answer every prompt with its default\x1b[0m\n"
)]
pub struct Cli {
    /// Run the install workflow (the default when no flag is given)
    #[arg(long, conflicts_with = "uninstall")]
    pub install: bool,

    /// Run the uninstall workflow
    #[arg(long)]
    pub uninstall: bool,

    /// Answer every prompt with its default instead of asking
    #[arg(long, short = 'n')]
    pub non_interactive: bool,

    /// Log file mirroring the console output
    #[arg(long, env = "DLSETUP_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn action(&self) -> Action {
        if self.uninstall {
            Action::Uninstall
        } else {
            Action::Install
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_means_install() {
        let cli = Cli::try_parse_from(["dlsetup"]).unwrap();
        assert_eq!(cli.action(), Action::Install);
        assert!(!cli.non_interactive);
    }

    #[test]
    fn test_explicit_install_flag() {
        let cli = Cli::try_parse_from(["dlsetup", "--install"]).unwrap();
        assert_eq!(cli.action(), Action::Install);
    }

    #[test]
    fn test_uninstall_flag() {
        let cli = Cli::try_parse_from(["dlsetup", "--uninstall"]).unwrap();
        assert_eq!(cli.action(), Action::Uninstall);
    }

    #[test]
    fn test_install_and_uninstall_conflict() {
        let result = Cli::try_parse_from(["dlsetup", "--install", "--uninstall"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unrecognized_flag_is_an_error() {
        let result = Cli::try_parse_from(["dlsetup", "--frobnicate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_file_flag() {
        let cli =
            Cli::try_parse_from(["dlsetup", "--uninstall", "--log-file", "/tmp/run.log"]).unwrap();
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/run.log")));
    }

    #[test]
    fn test_non_interactive_short_flag() {
        let cli = Cli::try_parse_from(["dlsetup", "-n"]).unwrap();
        assert!(cli.non_interactive);
    }
}
