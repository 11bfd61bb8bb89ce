//! Table sorting and filtering over rendered rows
//!
//! Both controllers work on the rows the server rendered into the document.
//! Sorting only reorders rows and filtering only hides them, so the two can
//! be applied in any order.

mod compare;
mod filter;
mod rows;
mod sort;

pub use compare::*;
pub use filter::*;
pub use rows::*;
pub use sort::*;
