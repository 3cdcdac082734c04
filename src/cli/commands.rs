//! CLI command definitions

use crate::pricing::CostInputs;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quotedesk")]
#[command(about = "QuoteDesk - quote pricing and negotiation for regulated goods")]
#[command(long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price a quote from its per-unit costs
    Quote {
        #[command(flatten)]
        costs: CostArgs,

        /// Margin in basis points (defaults to the configured margin)
        #[arg(short, long)]
        margin_bps: Option<u32>,

        /// Also print the internal breakdown (operators only)
        #[arg(long)]
        internal: bool,
    },

    /// Price surplus inventory with a markdown on the supplier price
    Surplus {
        /// Undiscounted supplier price in minor units
        #[arg(short, long, allow_hyphen_values = true)]
        base: i64,

        /// Discount in whole percent (30-50)
        #[arg(short, long)]
        discount: u32,

        #[command(flatten)]
        costs: CostArgs,

        /// Margin in basis points (defaults to the surplus margin)
        #[arg(short, long)]
        margin_bps: Option<u32>,

        /// Also print the internal breakdown (operators only)
        #[arg(long)]
        internal: bool,
    },

    /// Run a negotiation against a quote with a sequence of buyer offers
    Negotiate {
        #[command(flatten)]
        costs: CostArgs,

        /// Quoted margin in basis points (defaults to the configured margin)
        #[arg(short, long)]
        margin_bps: Option<u32>,

        /// Floor margin in basis points (defaults to the configured minimum)
        #[arg(long)]
        min_margin_bps: Option<u32>,

        /// Buyer offer in minor units; repeat for each round
        #[arg(short, long = "offer", allow_hyphen_values = true)]
        offers: Vec<i64>,

        /// Buyer withdraws after the last offer if still open
        #[arg(long)]
        withdraw: bool,

        /// Print each desk reply as a JSON decision instead of prose
        #[arg(long)]
        json: bool,
    },
}

/// Per-unit costs in minor units
#[derive(Args, Debug, Clone, Copy)]
pub struct CostArgs {
    /// Supplier price
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub supplier: i64,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub shipping: i64,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub taxes: i64,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub fees: i64,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub tariffs: i64,
}

impl From<CostArgs> for CostInputs {
    fn from(args: CostArgs) -> Self {
        CostInputs {
            supplier_price: args.supplier,
            shipping: args.shipping,
            taxes: args.taxes,
            fees: args.fees,
            tariffs: args.tariffs,
        }
    }
}
