use clap::{Args, Subcommand};

mod create;
mod deactivate;

#[derive(Debug, Args)]
pub(crate) struct PromoCommand {
    #[command(subcommand)]
    command: PromoSubcommand,
}

#[derive(Debug, Subcommand)]
enum PromoSubcommand {
    /// Create a promo code (active immediately).
    Create(create::CreatePromoArgs),

    /// Deactivate an existing promo code.
    Deactivate(deactivate::DeactivatePromoArgs),
}

pub(crate) async fn run(command: PromoCommand) -> Result<(), String> {
    match command.command {
        PromoSubcommand::Create(args) => create::run(args).await,
        PromoSubcommand::Deactivate(args) => deactivate::run(args).await,
    }
}
