use std::sync::Arc;

use clap::Args;
use sprocket::roles::Role;
use sprocket_app::{
    database::{self, Db},
    domain::{
        actor::Actor,
        promos::{PgPromosRepository, PromoLedger},
    },
};

#[derive(Debug, Args)]
pub(crate) struct DeactivatePromoArgs {
    /// Promo code to deactivate
    #[arg(long)]
    code: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: DeactivatePromoArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let ledger = PromoLedger::new(Arc::new(PgPromosRepository::new(Db::new(pool))));
    let operator = Actor::new("cli@localhost", Role::Admin);

    ledger
        .deactivate(&operator, &args.code)
        .await
        .map_err(|error| format!("failed to deactivate promo: {error}"))?;

    println!("deactivated: {}", args.code.to_lowercase());

    Ok(())
}
