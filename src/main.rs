// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Command Dispatch
//!   Stage | Options | Version
//!                |
//!                v
//!           TaskResult --> ExitCode
//! ```

use std::process::ExitCode;

use gitstage::cli::global::GlobalOptions;
use gitstage::cli::{self, Command};
use gitstage::cmd::options::run_options_command;
use gitstage::cmd::stage::run_stage_command;
use gitstage::cmd::{TaskResult, load_config};
use gitstage::logging::{LogConfig, LogLevel, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let log_config = build_log_config(&cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or_default();

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .with_ansi(!global.no_color)
        .with_git_output(!global.no_git_output)
        .build()
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    match cli.command() {
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Command::Options => match load_config(&cli.global) {
            Ok(config) => {
                run_options_command(&config);
                ExitCode::SUCCESS
            }
            Err(e) => report(&TaskResult::failed(&e)),
        },
        Command::Stage => {
            let result = match load_config(&cli.global) {
                Ok(config) => run_stage_command(&config).await,
                Err(e) => TaskResult::failed(&e),
            };
            report(&result)
        }
    }
}

fn report(result: &TaskResult) -> ExitCode {
    match result {
        TaskResult::Succeeded { commit } => println!("{commit}"),
        TaskResult::Failed { message } => eprintln!("Error: {message}"),
    }
    result.exit_code()
}
