pub mod cli;
mod commands;
pub mod config;
pub mod converter;
pub mod deployment;
pub mod error;
#[cfg(feature = "python-bindings")]
mod python;
pub mod schemas;
pub mod tool;

use anyhow::Result;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt;

use crate::{
    cli::Cli,
    commands::{CommandContext, run_command},
    config::ConverterConfig,
};

pub use crate::{
    converter::{ConvertedDocument, DocumentConverter, MarkdownConverter},
    error::{ConversionError, ToolError},
    schemas::{ConversionResult, InputSchema, ToolDeployment, ToolRunInput},
    tool::{FilesToMarkdownTool, ToolMethod, run, run_json, run_with},
};

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let max = match cli.global.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    fmt()
        .with_max_level(max)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init()
        .ok();

    let context = CommandContext {
        converter_config: ConverterConfig::from_env(),
    };

    run_command(cli.command, context).await
}
