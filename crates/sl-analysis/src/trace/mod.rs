//! Identifier provenance tracing

pub(crate) mod model_mapping;
pub(crate) mod provenance;

pub use model_mapping::{parse_tfschema_tag, ModelFieldMapping};
pub use provenance::{DefinitionKind, IdProvenanceTracer};
