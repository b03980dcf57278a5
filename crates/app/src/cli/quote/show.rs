use std::{io, sync::Arc};

use clap::Args;
use jiff::Timestamp;
use sprocket_app::{
    database::{self, Db},
    domain::{
        catalog::PgCatalogRepository,
        quotes::{PgQuotesRepository, QuoteService},
    },
};

#[derive(Debug, Args)]
pub(crate) struct ShowQuoteArgs {
    /// Quote number, e.g. QT-20260806-A1B2
    #[arg(long)]
    number: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ShowQuoteArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let db = Db::new(pool);

    let service = QuoteService::new(
        Arc::new(PgQuotesRepository::new(db.clone())),
        Arc::new(PgCatalogRepository::new(db)),
    );

    let quote = service
        .get(&args.number)
        .await
        .map_err(|error| format!("failed to fetch quote: {error}"))?;

    QuoteService::document(&quote)
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to render quote: {error}"))?;

    if quote.is_expired(Timestamp::now()) {
        println!("note: this quote has expired and is no longer actionable");
    }

    Ok(())
}
