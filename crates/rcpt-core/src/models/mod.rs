//! Data models: transactions, budget plans and configuration.

pub mod budget;
pub mod config;
pub mod transaction;
