use std::{fs, io, path::Path};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::{
    cli::RunArgs,
    converter::MarkdownConverter,
    deployment::load_deployment,
    schemas::{InputSchema, ToolDeployment, ToolRunInput},
    tool::run_with,
};

use super::CommandContext;

pub async fn handle(args: RunArgs, ctx: &CommandContext) -> Result<()> {
    let module_run = build_module_run(&args)?;
    let converter = MarkdownConverter::new(ctx.converter_config.clone());

    info!(
        tool_name = %module_run.inputs.tool_name,
        source = %module_run.inputs.tool_input_data,
        consumer_id = ?module_run.consumer_id,
        "dispatching module run"
    );

    let result = tokio::task::spawn_blocking(move || run_with(module_run, converter))
        .await
        .context("Module run task failed to complete")??;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn build_module_run(args: &RunArgs) -> Result<ToolRunInput> {
    if let Some(input) = &args.input {
        let payload = read_input(input)?;
        return serde_json::from_str(&payload).context("Failed to parse module run envelope");
    }

    let Some(file_path) = &args.file_path else {
        bail!("Either --input or --file-path must be provided");
    };

    let deployment = match &args.deployment {
        Some(path) => load_deployment(path, args.node_url.as_deref())?,
        None => {
            let mut deployment = ToolDeployment::default();
            deployment.node.url = args.node_url.clone();
            deployment
        }
    };

    Ok(ToolRunInput {
        inputs: InputSchema::new(&args.tool_name, file_path),
        deployment,
        consumer_id: args.consumer_id.clone(),
        signature: args.signature.clone(),
    })
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        return io::read_to_string(io::stdin()).context("Failed to read module run from stdin");
    }
    fs::read_to_string(input)
        .with_context(|| format!("Failed to read --input {}", input.display()))
}
