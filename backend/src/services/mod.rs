//! Business logic services for the café back-office

pub mod expense;
pub mod inventory;
pub mod order;
pub mod product;
pub mod recipe;
pub mod reporting;
