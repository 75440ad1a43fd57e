//! colgen Core Types
//!
//! This crate provides the foundational types shared by the generator and the oracle:
//! - Tables (Column, Table, Catalog) with implicit positional row ids
//! - Row sets produced by range selects
//! - Predicates with inclusive/exclusive and unbounded sides
//! - Script-level identifiers (ColumnRef, JoinKind, IndexKind, Clustering)
//! - Common error types

mod error;
mod keyword;
mod predicate;
mod reference;
mod rowset;
mod table;

pub use error::*;
pub use keyword::*;
pub use predicate::*;
pub use reference::*;
pub use rowset::*;
pub use table::*;
