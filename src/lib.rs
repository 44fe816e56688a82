//! Documentation models for Solidity contracts.
//!
//! Parses a contract, attaches the doc comment found above each declaration,
//! classifies its members and merges in everything it inherits from the
//! contracts it imports.

pub mod annotation;
pub mod error;
pub mod model;
pub mod parser;
pub mod resolver;


pub use annotation::Annotation;
pub use error::{DocError, Result};
pub use model::{ContractModel, ContractStructure, Member, MemberKind, ModelOptions};
pub use resolver::{FsImportResolver, ImportResolver, MemoryImportResolver, ResolvedImport};

/// Version of soldoc
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
