//! Shared types and domain logic for the Cafe Back-Office Platform
//!
//! This crate contains the models and the side-effect-free decision logic
//! (unit normalization, promotion allocation, ledger arithmetic, profit and
//! loss math, low-stock evaluation) shared between the backend and any
//! other components of the system.

pub mod allocation;
pub mod finance;
pub mod ledger;
pub mod models;
pub mod stock;
pub mod types;
pub mod validation;

pub use allocation::*;
pub use finance::*;
pub use ledger::*;
pub use models::*;
pub use stock::*;
pub use types::*;
pub use validation::*;
