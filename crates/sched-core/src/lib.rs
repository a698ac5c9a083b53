//! Scheduler document model and the conflict validator.
//!
//! Everything in this crate is pure: documents come in already parsed, a
//! [`Report`] comes out. Loading files and deciding exit codes live in
//! `sched-store` and `sched-cli`.

pub mod error;
pub mod ids;
pub mod issue;
pub mod model;
pub mod time;
pub mod validate;

pub use error::*;
pub use ids::*;
pub use issue::*;
pub use model::*;
pub use time::*;
pub use validate::*;
