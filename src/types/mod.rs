//! Data types for the grid engine.

mod filter;
mod row;
mod schema;

pub use filter::*;
pub use row::*;
pub use schema::*;
