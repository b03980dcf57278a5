use std::sync::Arc;

use clap::Args;
use rusty_money::{Money, iso};
use sprocket::{promos::PromoKind, roles::Role};
use sprocket_app::{
    database::{self, Db},
    domain::{
        actor::Actor,
        promos::{PgPromosRepository, PromoLedger, models::NewPromo},
    },
};

#[derive(Debug, Args)]
pub(crate) struct CreatePromoArgs {
    /// Promo code (matched case-insensitively at checkout)
    #[arg(long)]
    code: String,

    /// Percent points off the subtotal (e.g. 10 for 10%)
    #[arg(long, conflicts_with = "amount_off")]
    percent: Option<i64>,

    /// Fixed amount off in minor currency units (e.g. 50000 for $500)
    #[arg(long, conflicts_with = "percent")]
    amount_off: Option<i64>,

    /// Human-readable description
    #[arg(long, default_value = "")]
    description: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreatePromoArgs) -> Result<(), String> {
    let kind = match (args.percent, args.amount_off) {
        (Some(points), None) => PromoKind::percent_points(points),
        (None, Some(minor)) => PromoKind::Fixed(Money::from_minor(minor, iso::USD)),
        _ => return Err("exactly one of --percent or --amount-off is required".to_string()),
    };

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let ledger = PromoLedger::new(Arc::new(PgPromosRepository::new(Db::new(pool))));

    // The CLI is operator tooling; it acts with admin privilege.
    let operator = Actor::new("cli@localhost", Role::Admin);

    let promo = ledger
        .create(
            &operator,
            NewPromo {
                code: args.code,
                kind,
                description: args.description,
            },
        )
        .await
        .map_err(|error| format!("failed to create promo: {error}"))?;

    println!("code: {}", promo.code());
    println!("kind: {}", promo.kind().kind_label());
    println!("active: {}", promo.is_active());

    Ok(())
}
