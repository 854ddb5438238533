//! Lexnet Graph - the typed lexical knowledge graph engine
//!
//! This crate loads a lexical snapshot into an in-memory store, wraps
//! its records in lazy typed views, and layers traversal, annotation
//! and query evaluation on top:
//!
//! - [`graph`]: the [`LexGraph`] store, adjacency indices and record
//!   search
//! - [`view`]: lemma, sense, facet, synset and relation views
//! - [`traverse`]: reachability, shortest paths, induced subgraphs
//! - [`annot`]: annotation sessions with an edit tape
//! - [`merge`]: folding session tapes together
//! - [`query`]: evaluating declarative sense queries
//! - [`io`] and [`store`]: JSON snapshots and the sled-backed local
//!   install
//!
//! ```no_run
//! use lexnet_graph::{LexGraph, TraversalOptions};
//!
//! let graph = lexnet_graph::io::load_graph_json("graph.json")?;
//! for sense in graph.find_all_senses("bank")? {
//!     println!("{}: {}", sense.id, sense.definition);
//! }
//! let reachable = graph.connected("06000101", &TraversalOptions::default());
//! # Ok::<(), lexnet_core::LexError>(())
//! ```

pub mod annot;
pub mod graph;
pub mod io;
pub mod merge;
pub mod query;
pub mod store;
pub mod traverse;
pub mod view;

pub use annot::Annotator;
pub use graph::{normalize_id, EdgeKey, GraphRead, GraphStats, LexGraph, MetaMap};
pub use merge::merge;
pub use query::{evaluate, QueryExpr, QueryParser, QueryResult};
pub use store::{SnapshotStore, StoreError};
pub use traverse::TraversalOptions;
pub use view::{
    AnyNode, ExtSynset, Facet, Glyph, Lemma, RelDirection, Relation, RelationEdge, Sense, Synset,
};
