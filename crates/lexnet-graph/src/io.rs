//! Snapshot serialization.
//!
//! Snapshots and annotation session files share one JSON document
//! shape: a `meta` object, a `V` map of node records and an `E` map of
//! edge records. Edge keys are flattened to `"src-tgt"` strings because
//! JSON object keys cannot be pairs; loading splits them back apart.
//! Both maps are written in sorted key order so snapshots diff cleanly.

use crate::graph::{EdgeKey, LexGraph, MetaMap};
use lexnet_core::{EdgeRecord, LexError, NodeRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Separator between source and target in a flattened edge key.
pub const EDGE_KEY_SEP: char = '-';

/// The on-disk document shape shared by graph snapshots and annotation
/// session files.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GraphDoc {
    #[serde(default)]
    pub meta: MetaMap,
    #[serde(rename = "V")]
    pub nodes: BTreeMap<String, NodeRecord>,
    #[serde(rename = "E")]
    pub edges: BTreeMap<String, EdgeRecord>,
}

impl GraphDoc {
    pub fn new(
        meta: MetaMap,
        nodes: &HashMap<String, NodeRecord>,
        edges: &HashMap<EdgeKey, EdgeRecord>,
    ) -> Self {
        Self {
            meta,
            nodes: nodes.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            edges: flatten_edges(edges),
        }
    }

    pub fn from_graph(graph: &LexGraph) -> Self {
        Self::new(graph.meta.clone(), &graph.nodes, &graph.edges)
    }

    pub fn into_graph(self) -> Result<LexGraph, LexError> {
        let edges = expand_edges(&self.edges)?;
        Ok(LexGraph::from_parts(self.nodes, edges, self.meta))
    }
}

/// Joins each edge key into its `"src-tgt"` snapshot form.
pub fn flatten_edges(edges: &HashMap<EdgeKey, EdgeRecord>) -> BTreeMap<String, EdgeRecord> {
    edges
        .iter()
        .map(|(key, record)| (format!("{}{}{}", key.0, EDGE_KEY_SEP, key.1), *record))
        .collect()
}

/// Splits flattened edge keys back into pairs. Node ids never contain
/// the separator, so the first occurrence is the split point.
pub fn expand_edges(
    edges: &BTreeMap<String, EdgeRecord>,
) -> Result<HashMap<EdgeKey, EdgeRecord>, LexError> {
    let mut out = HashMap::with_capacity(edges.len());
    for (key, record) in edges {
        let (src, tgt) = key
            .split_once(EDGE_KEY_SEP)
            .ok_or_else(|| LexError::Parse(format!("malformed edge key: {}", key)))?;
        out.insert((src.to_string(), tgt.to_string()), *record);
    }
    Ok(out)
}

/// Writes a full graph snapshot to one JSON file.
pub fn dump_graph_json(graph: &LexGraph, path: impl AsRef<Path>) -> Result<(), LexError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &GraphDoc::from_graph(graph))?;
    Ok(())
}

/// Loads a graph snapshot, re-applying ingestion pruning and rebuilding
/// the adjacency indices.
pub fn load_graph_json(path: impl AsRef<Path>) -> Result<LexGraph, LexError> {
    let file = File::open(path)?;
    let doc: GraphDoc = serde_json::from_reader(BufReader::new(file))?;
    doc.into_graph()
}

/// Writes an annotation session's data to one JSON file.
pub fn dump_annot_json(
    path: impl AsRef<Path>,
    meta: MetaMap,
    nodes: &HashMap<String, NodeRecord>,
    edges: &HashMap<EdgeKey, EdgeRecord>,
) -> Result<(), LexError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &GraphDoc::new(meta, nodes, edges))?;
    Ok(())
}

/// Reads an annotation session file back into its parts.
#[allow(clippy::type_complexity)]
pub fn load_annot_json(
    path: impl AsRef<Path>,
) -> Result<(MetaMap, HashMap<String, NodeRecord>, HashMap<EdgeKey, EdgeRecord>), LexError> {
    let file = File::open(path)?;
    let doc: GraphDoc = serde_json::from_reader(BufReader::new(file))?;
    let edges = expand_edges(&doc.edges)?;
    Ok((doc.meta, doc.nodes.into_iter().collect(), edges))
}
