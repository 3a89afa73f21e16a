//! Operators on [`Observable`](crate::Observable).
//!
//! Each file adds inherent methods, the same way `futures` splits its
//! combinators into one module per operator.

pub mod debug;
pub mod map;
pub mod scan;
pub mod share;
