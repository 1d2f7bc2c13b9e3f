use anyhow::{Context, Result, bail};
use tracing::info;

use crate::{
    cli::ConvertArgs,
    converter::MarkdownConverter,
    schemas::{ConversionResult, InputSchema, ToolDeployment},
    tool::{FilesToMarkdownTool, ToolMethod},
};

use super::CommandContext;

pub async fn handle(args: ConvertArgs, ctx: &CommandContext) -> Result<()> {
    let inputs = InputSchema::new(
        ToolMethod::FilesToMarkdown.name(),
        args.file_path.display().to_string(),
    );
    let converter = MarkdownConverter::new(ctx.converter_config.clone());

    let result = tokio::task::spawn_blocking(move || {
        FilesToMarkdownTool::with_converter(ToolDeployment::default(), converter)
            .files_to_markdown(&inputs)
    })
    .await
    .context("Conversion task failed to complete")?;

    match result {
        ConversionResult::TextContent(text) => {
            info!(
                source = %args.file_path.display(),
                chars = text.chars().count(),
                "converted file to markdown"
            );
            println!("{text}");
            Ok(())
        }
        ConversionResult::Error(message) => bail!("{message}"),
    }
}
