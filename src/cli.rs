//! Command-line arguments for `snippet-switch`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "snippet-switch",
    version,
    about = "Mount option groups on an HTML page and report which snippets they show"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Mount a widget, apply selections and print the result.
    Render(RenderArgs),

    /// Print the groups a page resolves to, as JSON.
    Groups(PageArgs),
}

#[derive(Args)]
pub struct PageArgs {
    /// HTML page containing the container element.
    #[arg(long, value_name = "FILE")]
    pub markup: PathBuf,

    /// JSON page file with `options` and `groups`. Without it groups are
    /// scanned from the markup.
    #[arg(long, value_name = "FILE")]
    pub groups: Option<PathBuf>,

    /// `id` of the container element.
    #[arg(long, value_name = "ID")]
    pub container: String,

    /// Attribute prefix (overrides the page file).
    #[arg(long)]
    pub prefix: Option<String>,
}

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Activate an option, as GROUP=OPTION. Applied in order; repeatable.
    #[arg(long = "select", value_name = "GROUP=OPTION")]
    pub select: Vec<String>,

    /// What to print.
    #[arg(long, value_enum, default_value = "html")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The container's markup after mounting.
    Html,
    /// One exclusion rule per group.
    Rules,
    /// Markup of every visible snippet.
    Visible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
}
