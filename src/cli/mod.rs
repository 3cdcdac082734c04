//! CLI module for QuoteDesk

pub mod app;
pub mod commands;

pub use app::{BuyerReply, QuoteDeskApp};
pub use commands::{Cli, Commands, CostArgs};
