pub mod calculations;
pub mod input;
pub mod ledger;
pub mod models;

pub use models::*;
