use anyhow::Result;

use crate::{cli::Command, config::ConverterConfig};

pub mod convert;
pub mod run;
pub mod schema;

#[derive(Clone)]
pub struct CommandContext {
    pub converter_config: ConverterConfig,
}

pub async fn run_command(command: Command, ctx: CommandContext) -> Result<()> {
    match command {
        Command::Convert(args) => convert::handle(args, &ctx).await,
        Command::Run(args) => run::handle(args, &ctx).await,
        Command::Schema(args) => schema::handle(args),
    }
}
