use crate::demo::{run_demo, DemoArgs};
use crate::leads::{run_list, run_outreach, run_show, ListArgs, OutreachArgs, ShowArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lead_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Desk",
    about = "Review inbound leads, filter them, and trigger outreach from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect and act on leads held by the remote store
    Leads {
        #[command(subcommand)]
        command: LeadsCommand,
    },
    /// Walk through a review session against in-memory leads
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum LeadsCommand {
    /// Print the lead table, optionally filtered by band and label
    List(ListArgs),
    /// Print the detail view for one lead
    Show(ShowArgs),
    /// Mark a lead as outreach_sent and call the outreach webhook
    Outreach(OutreachArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Leads { command } => match command {
            LeadsCommand::List(args) => run_list(args).await,
            LeadsCommand::Show(args) => run_show(args).await,
            LeadsCommand::Outreach(args) => run_outreach(args).await,
        },
        Command::Demo(args) => run_demo(args).await,
    }
}
