//! System Definitions.
//!
//! Tipos e códigos de erro compartilhados entre o gerenciador de worker
//! tasks e o scheduler.

pub mod error;
pub mod types;

pub use error::Errno;
pub use types::{Priority, Tid};
