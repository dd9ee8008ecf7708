//! List/table view state: search, pagination and selection.

mod list;
mod pagination;

pub use list::*;
pub use pagination::*;
