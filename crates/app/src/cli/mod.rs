use clap::{Parser, Subcommand};

mod db;
mod promo;
mod quote;

#[derive(Debug, Parser)]
#[command(name = "sprocket-app", about = "Sprocket storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Promo(promo::PromoCommand),
    Quote(quote::QuoteCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Promo(command) => promo::run(command).await,
            Commands::Quote(command) => quote::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
