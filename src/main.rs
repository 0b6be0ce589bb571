//! dlsetup - DisplayLink USB graphics driver setup for Ubuntu-family systems
//!
//! A one-shot provisioning tool invoked interactively by an operator with
//! elevated privileges. One invocation runs exactly one workflow, install or
//! uninstall, strictly sequentially with fail-fast error propagation.

use clap::Parser;
use miette::Diagnostic;

mod cli;
mod config;
mod deps;
mod error;
mod probe;
mod progress;
mod prompt;
mod report;
mod system;
mod workdir;
mod workflow;

use cli::Cli;
use config::SetupConfig;
use prompt::{ConsolePrompter, NonInteractivePrompter, Prompter};
use report::LogSink;
use system::HostSystem;
use workflow::Orchestrator;

fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            let code = match e.kind() {
                // --help / --version are successes with no side effects
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    }
}

fn open_log(config: &SetupConfig) -> LogSink {
    match LogSink::create(&config.log_path) {
        Ok(sink) => sink,
        Err(_) => {
            let mut sink = LogSink::console_only();
            sink.warn(&format!(
                "could not open log file {}, logging to console only",
                config.log_path.display()
            ));
            sink
        }
    }
}

fn main() {
    let cli = parse_args();

    // From here on a temporary directory may exist; make sure Ctrl-C
    // releases it before the process dies
    workdir::install_interrupt_handler();

    let config = SetupConfig::new(cli.log_file.clone());
    let mut report = open_log(&config);
    let mut host = HostSystem::new();

    let mut console = ConsolePrompter;
    let mut unattended = NonInteractivePrompter;
    let prompter: &mut dyn Prompter = if cli.non_interactive {
        &mut unattended
    } else {
        &mut console
    };

    let result =
        Orchestrator::new(&config, &mut host, prompter, &mut report).run(cli.action());

    match result {
        Ok(()) => {
            report.farewell();
        }
        Err(e) => {
            let code = e
                .code()
                .map(|c| format!(" [{c}]"))
                .unwrap_or_default();
            report.error(&format!("{e}{code}"));
            if let Some(help) = e.help() {
                report.info(&format!("hint: {help}"));
            }
            report.farewell();
            std::process::exit(e.exit_code());
        }
    }
}
