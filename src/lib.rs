//! Household Ledger - recurring expense tracking for a household
//!
//! This library provides the core of the household ledger: members with
//! incomes and tax rates, expenses grouped into categories, and the
//! calculations that turn them into per-member monthly balances.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (members, expenses, categories)
//! - `engine`: Frequency normalization, split resolution, aggregation and sorting
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `reports`: Household summary report
//! - `export`: JSON, YAML and CSV export
//! - `display`: Terminal formatting and collapse state
//! - `cli`: Command handlers for the `ledger` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use household_ledger::config::{LedgerPaths, Settings};
//! use household_ledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
