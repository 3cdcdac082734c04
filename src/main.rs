//! QuoteDesk CLI binary

use anyhow::Context;
use clap::Parser;
use quotedesk::cli::{Cli, Commands, QuoteDeskApp};
use quotedesk::{
    format_for_buyer, CostInputs, EngineConfig, MarginRate, Party, PriceBreakdown, QuoteRef,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = EngineConfig::load(cli.config.as_deref()).context("loading configuration")?;

    // Initialize logging; RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = QuoteDeskApp::new(config)?;

    match cli.command {
        Commands::Quote {
            costs,
            margin_bps,
            internal,
        } => {
            let breakdown =
                app.quote(&CostInputs::from(costs), margin_bps.map(MarginRate::from_bps))?;
            println!("Price: {}", breakdown.buyer_price());
            if internal {
                print_internal(&breakdown);
            }
        }

        Commands::Surplus {
            base,
            discount,
            costs,
            margin_bps,
            internal,
        } => {
            let breakdown = app.surplus_quote(
                base,
                discount,
                &CostInputs::from(costs),
                margin_bps.map(MarginRate::from_bps),
            )?;
            println!("Surplus price: {}", breakdown.buyer_price());
            if internal {
                print_internal(&breakdown);
            }
        }

        Commands::Negotiate {
            costs,
            margin_bps,
            min_margin_bps,
            offers,
            withdraw,
            json,
        } => {
            let breakdown =
                app.quote(&CostInputs::from(costs), margin_bps.map(MarginRate::from_bps))?;
            let id = app
                .open_negotiation(
                    QuoteRef::new("cli"),
                    &breakdown,
                    min_margin_bps.map(MarginRate::from_bps),
                )
                .await?;
            println!("Asking price: {}", breakdown.buyer_price());

            for offer in offers {
                let reply = app
                    .submit_offer(&id, offer)
                    .await
                    .with_context(|| format!("evaluating offer {}", offer))?;
                println!("Buyer: {}", format_for_buyer(offer.unsigned_abs()));
                if json {
                    println!("Desk:  {}", reply.decision.to_json()?);
                } else {
                    println!("Desk:  {}", reply.message);
                }

                if app.negotiation_state(&id).await?.is_terminal() {
                    break;
                }
            }

            let state = app.negotiation_state(&id).await?;
            if withdraw && !state.is_terminal() {
                app.withdraw(&id, Party::Buyer, "Buyer withdrew".to_string())
                    .await?;
            }

            let state = app.negotiation_state(&id).await?;
            println!("Outcome: {:?} after {} counter(s)", state.status(), state.round_count());
        }
    }

    Ok(())
}

/// Seller-side breakdown, for operators only
fn print_internal(breakdown: &PriceBreakdown) {
    println!("  subtotal:   {}", format_for_buyer(breakdown.subtotal()));
    println!("  commission: {} ({})", format_for_buyer(breakdown.commission()), breakdown.margin());
}
