// SPDX-License-Identifier: MIT
//
// Kartenwerk — Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::KartenwerkError;
pub use types::*;
