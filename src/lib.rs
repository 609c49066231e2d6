//! trendsig: rule-based trading signal and backtesting engine.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`], CLI wiring in
//! [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
