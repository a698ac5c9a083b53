pub mod config;
pub mod documents;
pub mod error;
pub mod save;
pub mod snapshot;
pub mod workspace;

pub use config::*;
pub use documents::*;
pub use error::*;
pub use save::*;
pub use snapshot::*;
pub use workspace::*;
