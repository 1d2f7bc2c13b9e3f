use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "files-to-markdown-tool",
    version,
    about = "Convert documents to markdown as an orchestration tool"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct GlobalOpts {
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "Convert a file to markdown and print it")]
    Convert(ConvertArgs),
    #[command(about = "Dispatch a module run through the tool and print the JSON result")]
    Run(RunArgs),
    #[command(about = "Print the JSON schema of the tool inputs")]
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[arg(long, value_name = "PATH", required = true, help = "File to convert to markdown")]
    pub file_path: PathBuf,
}

#[derive(Args, Debug)]
#[command(group = ArgGroup::new("run_input").required(true).args(["input", "file_path"]))]
pub struct RunArgs {
    #[arg(
        long,
        value_name = "JSON",
        help = "Module run envelope as a JSON file, or - for stdin (conflicts with --file-path)"
    )]
    pub input: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "File to convert to markdown")]
    pub file_path: Option<String>,

    #[arg(long, default_value = "files_to_markdown", help = "Tool method to invoke")]
    pub tool_name: String,

    #[arg(long, value_name = "JSON", help = "Deployment description to attach to the run")]
    pub deployment: Option<PathBuf>,

    #[arg(long, env = "NODE_URL", help = "Node URL recorded in the deployment")]
    pub node_url: Option<String>,

    #[arg(long, env = "CONSUMER_ID", help = "Consumer id recorded in the run")]
    pub consumer_id: Option<String>,

    #[arg(long, help = "Pre-computed consumer signature recorded in the run")]
    pub signature: Option<String>,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    #[arg(long, help = "Print compact JSON instead of pretty-printed")]
    pub compact: bool,
}
