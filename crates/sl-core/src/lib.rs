//! sl-core - Core library for schemalint
//!
//! This crate provides the shared configuration, the syntax model that facts
//! exports are deserialized into, the facts provider interface, and the change
//! scope used to decide which findings are reported.

pub mod change_scope;
pub mod config;
pub mod error;
pub mod facts;
pub mod module_path;
pub(crate) mod serde_helpers;
pub mod syntax;

pub use change_scope::{AllChanged, ChangeScope, FileChange, LineRange, StaticChangeScope};
pub use config::{Config, FileSuffixes, SharedSchemaConfig};
pub use error::{CoreError, CoreResult};
pub use facts::{Callee, FactsExport, FactsProvider, ImportedType, ModuleFacts};
pub use module_path::ModulePath;
pub use syntax::{Module, Pos, SourceFile};
