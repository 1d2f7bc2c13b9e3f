use anyhow::Result;

use crate::{cli::SchemaArgs, schemas::InputSchema};

pub fn handle(args: SchemaArgs) -> Result<()> {
    let schema = InputSchema::json_schema();
    let rendered = if args.compact {
        serde_json::to_string(&schema)?
    } else {
        serde_json::to_string_pretty(&schema)?
    };
    println!("{rendered}");
    Ok(())
}
