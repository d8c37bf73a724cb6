//! Filter options and their compilation to SQL predicates
//!
//! A record table's view is narrowed by a small, closed set of options. The
//! compiler turns them into one conjunctive predicate that is appended to the
//! table's base SELECT.

mod compiler;
mod options;

pub use compiler::{FilterCompiler, Predicate};
pub use options::{FilterOptions, KnotsVsLinks};
