//! Pipeline entry points for collector operations.
//!
//! - `run_collect`: fetch all sources and assemble the conditions document
//! - `run_publish`: write the document to the destination store
//! - `run_validate`: offline configuration/environment checks

pub mod collect;
pub mod publish;
pub mod validate;

pub use collect::run_collect;
pub use publish::run_publish;
pub use validate::run_validate;
