//! Persistent snapshot storage backed by sled.
//!
//! A locally installed graph snapshot lives in an embedded key-value
//! store, so repeated sessions skip the JSON parse. The graph is stored
//! in the same document shape as the JSON snapshots; adjacency indices
//! are rebuilt on load rather than persisted.

use crate::graph::LexGraph;
use crate::io::GraphDoc;
use lexnet_core::LexError;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const GRAPH_KEY: &str = "base_graph";

/// Errors from the persistent store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Sled(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Handle to the on-disk snapshot store.
pub struct SnapshotStore {
    db: sled::Db,
}

impl SnapshotStore {
    /// Opens (or creates) the store at the given directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Installs a graph snapshot, replacing any previous one.
    pub fn save_graph(&self, graph: &LexGraph) -> Result<(), StoreError> {
        let doc = GraphDoc::from_graph(graph);
        self.db.insert(GRAPH_KEY, serde_json::to_vec(&doc)?)?;
        self.db.flush()?;
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph snapshot installed"
        );
        Ok(())
    }

    /// Loads the installed snapshot, if one exists. Indices are rebuilt
    /// as part of the load.
    pub fn load_graph(&self) -> Result<Option<LexGraph>, StoreError> {
        match self.db.get(GRAPH_KEY)? {
            Some(bytes) => {
                let doc: GraphDoc = serde_json::from_slice(&bytes)?;
                Ok(Some(doc.into_graph()?))
            }
            None => Ok(None),
        }
    }

    /// Removes the installed snapshot.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.db.remove(GRAPH_KEY)?;
        self.db.flush()?;
        Ok(())
    }
}
