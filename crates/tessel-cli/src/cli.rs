use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tessel",
    about = "Tessel: inspect and edit game object data through typed keys and traits",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Registry configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List registered keys and trait types
    Keys,
    /// Print every supported trait of every holder in a fixture
    Inspect(InspectArgs),
    /// Offer one value to a fixture holder and print the result
    Offer(OfferArgs),
}

#[derive(Args)]
pub struct InspectArgs {
    pub fixture: PathBuf,
}

#[derive(Args)]
pub struct OfferArgs {
    pub fixture: PathBuf,
    /// Holder name as declared in the fixture
    pub holder: String,
    /// Key id, e.g. `tessel:display_name`
    pub key: String,
    /// Value as JSON, e.g. `"Grumbles"` or `[1, 2]`
    pub value: String,
    /// Record the value in the fixture when the offer succeeds
    #[arg(long)]
    pub save: bool,
}
