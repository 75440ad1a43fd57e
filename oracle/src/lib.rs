//! colgen Oracle
//!
//! Computes the output a column-store engine must produce for a query
//! script, by brute force over in-memory tables:
//! - [`eval`]: range select, select-on-select, fetch, equi-join, sum, avg
//! - [`format`]: expected-output text layout
//! - [`script`]: typed script operations, rendering and parsing
//! - [`Interpreter`]: runs a script against a [`colgen_core::Catalog`]
//!
//! No index structure or join algorithm is modelled. Join kinds are labels.

mod error;
pub mod eval;
pub mod format;
mod interpreter;
pub mod script;

pub use error::{OracleError, OracleResult};
pub use eval::{Aggregate, JoinResult, Mean};
pub use interpreter::Interpreter;
pub use script::{Op, Script, SelectTarget};
