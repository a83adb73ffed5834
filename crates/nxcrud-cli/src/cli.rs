use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "nxcrud",
    about = "nxcrud: serialize REST resources with processor metadata",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check every processor binding of a settings file
    Validate(ValidateArgs),
    /// Flatten a JSON document into path/value pairs
    Flatten(FlattenArgs),
    /// Rebuild a JSON document from path/value pairs
    Unflatten(UnflattenArgs),
    /// Serialize a JSON document through a processor group
    Render(RenderArgs),
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Processor settings (TOML)
    pub settings: PathBuf,
    /// Only check this group
    #[arg(long)]
    pub group: Option<String>,
}

#[derive(Args)]
pub struct FlattenArgs {
    /// JSON document, `-` for stdin
    pub file: PathBuf,
    /// Prefix for every key
    #[arg(long, default_value = "")]
    pub prefix: String,
    /// Drop empty arrays and objects
    #[arg(long)]
    pub drop_empty: bool,
}

#[derive(Args)]
pub struct UnflattenArgs {
    /// Flat JSON object, `-` for stdin
    pub file: PathBuf,
}

#[derive(Args)]
pub struct RenderArgs {
    /// JSON document, `-` for stdin
    pub file: PathBuf,
    /// Processor settings (TOML)
    #[arg(long)]
    pub settings: Option<PathBuf>,
    /// Processor group
    #[arg(long)]
    pub group: Option<String>,
    /// Route table for `@pointer` values (TOML)
    #[arg(long)]
    pub routes: Option<PathBuf>,
    /// Base URI for `@resource` values
    #[arg(long, default_value = "")]
    pub resource_base: String,
    /// Fail on invalid bindings instead of skipping them
    #[arg(long)]
    pub strict: bool,
    /// Pretty-print the result
    #[arg(long)]
    pub pretty: bool,
}
