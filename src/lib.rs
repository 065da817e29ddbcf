//! **mazegen** is a randomised wall maze generation and query library.

pub mod cells;
pub mod generators;
pub mod maze;
pub mod units;
