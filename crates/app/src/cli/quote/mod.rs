use clap::{Args, Subcommand};

mod show;

#[derive(Debug, Args)]
pub(crate) struct QuoteCommand {
    #[command(subcommand)]
    command: QuoteSubcommand,
}

#[derive(Debug, Subcommand)]
enum QuoteSubcommand {
    /// Print a stored quote as its dealer-facing document.
    Show(show::ShowQuoteArgs),
}

pub(crate) async fn run(command: QuoteCommand) -> Result<(), String> {
    match command.command {
        QuoteSubcommand::Show(args) => show::run(args).await,
    }
}
