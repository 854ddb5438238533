//! Lexnet Core - record types for the lexical knowledge graph
//!
//! This crate defines the vocabulary every other lexnet crate speaks:
//! node record variants, the closed relation-type enumeration, the
//! annotation edit-log records, and the shared error type. It carries
//! no graph logic; the store, views and traversal live in
//! `lexnet-graph`.

mod annot;
mod error;
mod node;
mod relation;

pub use annot::{AnnotAction, AnnotId, AnnotRecord, EntityKind, RawRef};
pub use error::LexError;
pub use node::{NodeRecord, OntologyEntry, OntologyResolver};
pub use relation::{EdgeRecord, RelationType};
