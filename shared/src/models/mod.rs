//! Domain models for the Cafe Back-Office Platform

mod expense;
mod ingredient;
mod order;
mod product;
mod recipe;
mod sale;

pub use expense::*;
pub use ingredient::*;
pub use order::*;
pub use product::*;
pub use recipe::*;
pub use sale::*;
