//! Core graph store.
//!
//! The LexGraph holds the canonical node and edge records plus two
//! adjacency indices (by source id and by target id). It owns no
//! business logic beyond index maintenance and record-level search;
//! entity views and traversal build on top of it.

use crate::view::{edges_of, AnyNode, Facet, Lemma, Relation, Sense, Synset};
use lexnet_core::{EdgeRecord, LexError, NodeRecord};
use regex::Regex;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// An edge is keyed by its ordered (source id, target id) pair.
pub type EdgeKey = (String, String);

/// Free-form snapshot metadata (label, provenance, timestamps...).
pub type MetaMap = Map<String, Value>;

/// Bare node ids are at most this long; longer ones are truncated at
/// ingestion. Sense ids embed their lemma id plus a 2-digit sense
/// number, facet ids append a homograph digit and a facet digit.
pub const MAX_BARE_ID_LEN: usize = 10;

/// Ids carrying these prefixes are synthetic (synset ids, external
/// ontology refs) and bypass truncation.
pub const RESERVED_ID_PREFIXES: [&str; 2] = ["syn", "ext"];

/// Read-only access to node and edge records.
///
/// Entity views borrow one of these instead of holding a back-pointer
/// to a concrete store, so the same view types work over the canonical
/// graph and over an annotation overlay.
pub trait GraphRead {
    fn node(&self, id: &str) -> Option<&NodeRecord>;

    fn edge(&self, key: &EdgeKey) -> Option<&EdgeRecord>;

    /// Edge keys incident to `id`. Each entry carries a reversed flag:
    /// false when `id` is the source, true when `id` is the target.
    /// Directed lookups only report outgoing edges.
    fn incident(&self, id: &str, directed: bool) -> Vec<(EdgeKey, bool)>;
}

/// The typed lexical graph.
///
/// Immutable once loaded; annotation sessions work on their own copy
/// (see [`crate::Annotator`]).
#[derive(Debug, Default)]
pub struct LexGraph {
    pub(crate) nodes: HashMap<String, NodeRecord>,
    pub(crate) edges: HashMap<EdgeKey, EdgeRecord>,
    pub meta: MetaMap,

    /// source id -> edge keys
    src_index: HashMap<String, Vec<EdgeKey>>,
    /// target id -> edge keys
    tgt_index: HashMap<String, Vec<EdgeKey>>,
}

/// Applies the ingestion id-normalization rule: reserved prefixes pass
/// through, bare ids longer than [`MAX_BARE_ID_LEN`] are truncated.
pub fn normalize_id(id: &str) -> &str {
    if RESERVED_ID_PREFIXES.iter().any(|p| id.starts_with(p)) {
        return id;
    }
    id.get(..MAX_BARE_ID_LEN).unwrap_or(id)
}

impl LexGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from snapshot parts, applying the same pruning
    /// rules as incremental insertion, then rebuilds both adjacency
    /// indices once.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = (String, NodeRecord)>,
        edges: impl IntoIterator<Item = (EdgeKey, EdgeRecord)>,
        meta: MetaMap,
    ) -> Self {
        let mut graph = Self {
            meta,
            ..Self::default()
        };
        for (id, record) in nodes {
            graph.add_node(id, record);
        }
        for ((src, tgt), record) in edges {
            graph.insert_edge(&src, &tgt, record);
        }
        graph.rebuild_indices();
        graph
    }

    /// Adds a node record. Empty ids are rejected, duplicate ids are
    /// skipped; both are logged, neither is an error.
    pub fn add_node(&mut self, id: impl Into<String>, record: NodeRecord) {
        let id = id.into();
        if id.is_empty() {
            warn!(node_type = record.node_type(), "empty node id");
            return;
        }
        if self.nodes.contains_key(&id) {
            debug!(%id, "duplicate node id");
            return;
        }
        self.nodes.insert(id, record);
    }

    /// Adds an edge and incrementally maintains both indices.
    ///
    /// Endpoints are normalized first; an edge whose endpoint is not in
    /// the node set is dropped. This is how malformed or
    /// never-materialized references are pruned at ingestion.
    pub fn add_edge(&mut self, src: &str, tgt: &str, record: EdgeRecord) {
        if let Some(key) = self.insert_edge(src, tgt, record) {
            self.src_index
                .entry(key.0.clone())
                .or_default()
                .push(key.clone());
            self.tgt_index.entry(key.1.clone()).or_default().push(key);
        }
    }

    /// Insertion without index maintenance; bulk loads rebuild once.
    fn insert_edge(&mut self, src: &str, tgt: &str, record: EdgeRecord) -> Option<EdgeKey> {
        if src.is_empty() || tgt.is_empty() {
            return None;
        }
        let src = normalize_id(src);
        let tgt = normalize_id(tgt);
        if !self.nodes.contains_key(src) {
            warn!(%src, %tgt, "edge source missing, dropping edge");
            return None;
        }
        if !self.nodes.contains_key(tgt) {
            warn!(%src, %tgt, "edge target missing, dropping edge");
            return None;
        }
        let key = (src.to_string(), tgt.to_string());
        if self.edges.contains_key(&key) {
            debug!(%src, %tgt, "duplicate edge");
            return None;
        }
        self.edges.insert(key.clone(), record);
        Some(key)
    }

    /// Rebuilds both adjacency indices from the edge set. O(E).
    pub fn rebuild_indices(&mut self) {
        self.src_index.clear();
        self.tgt_index.clear();
        for key in self.edges.keys() {
            self.src_index
                .entry(key.0.clone())
                .or_default()
                .push(key.clone());
            self.tgt_index
                .entry(key.1.clone())
                .or_default()
                .push(key.clone());
        }
    }

    /// All relations incident to a node, as edge views. Undirected
    /// lookups include incoming edges flagged as reversed.
    pub fn find_edges(&self, node_id: &str, directed: bool) -> Vec<Relation<'_>> {
        edges_of(self, node_id, directed)
    }

    pub fn has_id(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over all node records.
    pub fn nodes(&self) -> impl Iterator<Item = (&String, &NodeRecord)> {
        self.nodes.iter()
    }

    /// Iterates over all edge records.
    pub fn edges(&self) -> impl Iterator<Item = (&EdgeKey, &EdgeRecord)> {
        self.edges.iter()
    }

    /// Finds the glyph node carrying exactly this orthographic form.
    pub fn find_glyph(&self, form: &str) -> Option<&str> {
        self.nodes.iter().find_map(|(id, record)| match record {
            NodeRecord::Glyph { glyph } if glyph == form => Some(id.as_str()),
            _ => None,
        })
    }

    /// Finds lemmas whose surface form matches the pattern.
    pub fn find_lemma(&self, pattern: &str) -> Result<Vec<Lemma<'_>>, LexError> {
        let pat = Regex::new(pattern)?;
        let mut out = Vec::new();
        for (id, record) in &self.nodes {
            if let NodeRecord::Lemma { lemma, .. } = record {
                if pat.find(lemma).is_some() {
                    out.push(Lemma::new(id, self));
                }
            }
        }
        Ok(out)
    }

    /// All senses of lemmas whose surface form is exactly `lemma`.
    pub fn find_all_senses(&self, lemma: &str) -> Result<Vec<Sense<'_>>, LexError> {
        let lemmas = self.find_lemma(&format!("^{}$", lemma))?;
        let mut out = Vec::new();
        for lemma_x in &lemmas {
            out.extend(lemma_x.senses().iter().cloned());
        }
        Ok(out)
    }

    /// Finds senses matching the given constraints. `lemma` and `pos`
    /// are regex patterns, `definition` and `examples` are literal
    /// substrings; empty constraints match everything. Example text is
    /// compared with its angle-bracket markers stripped.
    pub fn find_senses(
        &self,
        lemma: &str,
        pos: &str,
        definition: &str,
        examples: &str,
    ) -> Result<Vec<Sense<'_>>, LexError> {
        let lemma_re = Regex::new(lemma)?;
        let pos_re = Regex::new(pos)?;
        let def_re = Regex::new(&regex::escape(definition))?;
        let ex_re = Regex::new(&regex::escape(examples))?;
        let marker_re = Regex::new(r"[<>]")?;

        let mut out = Vec::new();
        for (id, record) in &self.nodes {
            if !record.is_sense() {
                continue;
            }
            let sense = Sense::new(id, self);

            if !lemma.is_empty() {
                let matched = sense
                    .lemmas()
                    .iter()
                    .any(|lemma_x| lemma_re.find(&lemma_x.lemma).is_some());
                if !matched {
                    continue;
                }
            }
            if !pos.is_empty() && pos_re.find(&sense.pos).is_none() {
                continue;
            }
            if !definition.is_empty() && def_re.find(&sense.definition).is_none() {
                continue;
            }
            if !examples.is_empty() {
                let matched = sense
                    .examples
                    .iter()
                    .any(|ex| ex_re.find(&marker_re.replace_all(ex, "")).is_some());
                if !matched {
                    continue;
                }
            }
            out.push(sense);
        }
        Ok(out)
    }

    /// All lemma views grouped by surface form, each group ordered by
    /// sense number. Empty surface forms are left out.
    pub fn all_lemmas(&self) -> BTreeMap<String, Vec<Lemma<'_>>> {
        let mut groups: BTreeMap<String, Vec<Lemma<'_>>> = BTreeMap::new();
        for (id, record) in &self.nodes {
            if let NodeRecord::Lemma { lemma, .. } = record {
                if lemma.is_empty() {
                    continue;
                }
                groups.entry(lemma.clone()).or_default().push(Lemma::new(id, self));
            }
        }
        for group in groups.values_mut() {
            group.sort_by(|a, b| a.lemma_sno.cmp(&b.lemma_sno).then(a.id.cmp(&b.id)));
        }
        groups
    }

    pub fn all_senses(&self) -> Vec<Sense<'_>> {
        self.nodes
            .iter()
            .filter(|(_, record)| record.is_sense())
            .map(|(id, _)| Sense::new(id, self))
            .collect()
    }

    pub fn all_synsets(&self) -> Vec<Synset<'_>> {
        self.nodes
            .iter()
            .filter(|(_, record)| matches!(record, NodeRecord::Synset { .. }))
            .map(|(id, _)| Synset::new(id, self))
            .collect()
    }

    /// Constructs the typed view matching a node's record variant.
    pub fn view_node(&self, id: &str) -> Result<AnyNode<'_>, LexError> {
        match self.nodes.get(id) {
            Some(record) => Ok(AnyNode::from_record(id, record, self)),
            None => Err(LexError::IdNotFound(id.to_string())),
        }
    }

    /// Sense ids are at most 8 characters; anything longer carries a
    /// facet suffix.
    pub fn sense_or_facet(&self, id: &str) -> AnyNode<'_> {
        if id.chars().count() <= 8 {
            AnyNode::Sense(Sense::new(id, self))
        } else {
            AnyNode::Facet(Facet::new(id, self))
        }
    }

    /// A short content hash over the node and edge sets, stable across
    /// load order. Useful for labelling exported snapshots.
    pub fn content_hash(&self) -> String {
        let nodes: BTreeMap<&String, &NodeRecord> = self.nodes.iter().collect();
        let edges: BTreeMap<String, &EdgeRecord> = self
            .edges
            .iter()
            .map(|(key, record)| (format!("{}-{}", key.0, key.1), record))
            .collect();

        let mut hasher = Sha256::new();
        // Keys are sorted, so the serialization is canonical.
        hasher.update(serde_json::to_vec(&nodes).unwrap_or_default());
        hasher.update(serde_json::to_vec(&edges).unwrap_or_default());
        let digest = hasher.finalize();

        let mut hex = String::with_capacity(6);
        for byte in digest.iter().take(3) {
            hex.push_str(&format!("{:02x}", byte));
        }
        hex
    }

    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
        }
    }
}

impl GraphRead for LexGraph {
    fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.get(id)
    }

    fn edge(&self, key: &EdgeKey) -> Option<&EdgeRecord> {
        self.edges.get(key)
    }

    fn incident(&self, id: &str, directed: bool) -> Vec<(EdgeKey, bool)> {
        let mut out = Vec::new();
        if let Some(keys) = self.src_index.get(id) {
            out.extend(keys.iter().map(|key| (key.clone(), false)));
        }
        if !directed {
            if let Some(keys) = self.tgt_index.get(id) {
                out.extend(keys.iter().map(|key| (key.clone(), true)));
            }
        }
        out
    }
}

/// Graph statistics for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexnet_core::RelationType;

    fn lemma(text: &str) -> NodeRecord {
        NodeRecord::Lemma {
            lemma: text.to_string(),
            lemma_sno: 1,
            zhuyin: String::new(),
        }
    }

    fn sense(def: &str, pos: &str) -> NodeRecord {
        NodeRecord::Sense {
            definition: def.to_string(),
            pos: pos.to_string(),
            examples: Vec::new(),
            domain: String::new(),
            src: None,
            supplementary: String::new(),
        }
    }

    #[test]
    fn test_duplicate_node_is_idempotent() {
        let mut graph = LexGraph::new();
        graph.add_node("060001", lemma("bank"));
        graph.add_node("060001", lemma("shadow"));

        assert_eq!(graph.node_count(), 1);
        match graph.node("060001") {
            Some(NodeRecord::Lemma { lemma, .. }) => assert_eq!(lemma, "bank"),
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_empty_node_id_is_rejected() {
        let mut graph = LexGraph::new();
        graph.add_node("", lemma("bank"));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_dangling_edge_is_dropped() {
        let mut graph = LexGraph::new();
        graph.add_node("060001", lemma("bank"));
        graph.add_edge("060001", "06000101", EdgeRecord::new(RelationType::HasSense));

        assert_eq!(graph.edge_count(), 0);

        // Referential integrity: every retained edge has both endpoints.
        graph.add_node("06000101", sense("a financial institution", "N"));
        graph.add_edge("060001", "06000101", EdgeRecord::new(RelationType::HasSense));
        assert_eq!(graph.edge_count(), 1);
        for (key, _) in graph.edges() {
            assert!(graph.has_id(&key.0));
            assert!(graph.has_id(&key.1));
        }
    }

    #[test]
    fn test_duplicate_edge_is_skipped() {
        let mut graph = LexGraph::new();
        graph.add_node("060001", lemma("bank"));
        graph.add_node("06000101", sense("a financial institution", "N"));
        graph.add_edge("060001", "06000101", EdgeRecord::new(RelationType::HasSense));
        graph.add_edge("060001", "06000101", EdgeRecord::new(RelationType::Synonym));

        assert_eq!(graph.edge_count(), 1);
        let key = ("060001".to_string(), "06000101".to_string());
        assert_eq!(graph.edge(&key).unwrap().rel_type, RelationType::HasSense);
    }

    #[test]
    fn test_id_normalization() {
        assert_eq!(normalize_id("0600010101extra"), "0600010101");
        assert_eq!(normalize_id("060001"), "060001");
        assert_eq!(normalize_id("syn_000012"), "syn_000012");
        assert_eq!(normalize_id("ext_02342365N"), "ext_02342365N");

        let mut graph = LexGraph::new();
        graph.add_node("06000101", sense("s1", "N"));
        graph.add_node("0600010102", sense("facet-sized id", "N"));
        // The over-long source is truncated to a facet-sized id before lookup.
        graph.add_edge(
            "0600010102junk",
            "06000101",
            EdgeRecord::new(RelationType::HasFacet),
        );
        assert_eq!(graph.edge_count(), 1);
        assert!(graph
            .edge(&("0600010102".to_string(), "06000101".to_string()))
            .is_some());
    }

    #[test]
    fn test_indices_reflect_edge_set() {
        let mut graph = LexGraph::new();
        graph.add_node("a1", sense("one", "N"));
        graph.add_node("a2", sense("two", "N"));
        graph.add_node("a3", sense("three", "N"));
        graph.add_edge("a1", "a2", EdgeRecord::new(RelationType::Hypernym));
        graph.add_edge("a3", "a2", EdgeRecord::new(RelationType::Hyponym));

        let outgoing = graph.incident("a1", true);
        assert_eq!(outgoing.len(), 1);
        assert!(!outgoing[0].1);

        let undirected = graph.incident("a2", false);
        assert_eq!(undirected.len(), 2);
        assert!(undirected.iter().all(|(_, reversed)| *reversed));

        graph.rebuild_indices();
        assert_eq!(graph.incident("a2", false).len(), 2);
    }

    #[test]
    fn test_find_senses_by_lemma_and_definition() {
        let mut graph = LexGraph::new();
        graph.add_node("060001", lemma("bank"));
        graph.add_node("06000101", sense("a financial institution", "N"));
        graph.add_node("06000102", sense("sloping land beside a river", "N"));
        graph.add_edge("060001", "06000101", EdgeRecord::new(RelationType::HasSense));
        graph.add_edge("060001", "06000102", EdgeRecord::new(RelationType::HasSense));

        let hits = graph.find_senses("^bank$", "", "financial", "").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "06000101");

        let all = graph.find_senses("^bank$", "N", "", "").unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_find_lemma_is_pattern_based() {
        let mut graph = LexGraph::new();
        graph.add_node("060001", lemma("bank"));
        graph.add_node("060002", lemma("embankment"));

        let exact = graph.find_lemma("^bank$").unwrap();
        assert_eq!(exact.len(), 1);
        let substring = graph.find_lemma("bank").unwrap();
        assert_eq!(substring.len(), 2);
    }

    #[test]
    fn test_content_hash_is_order_independent() {
        let mut a = LexGraph::new();
        a.add_node("x1", sense("one", "N"));
        a.add_node("x2", sense("two", "V"));
        a.add_edge("x1", "x2", EdgeRecord::new(RelationType::Synonym));

        let mut b = LexGraph::new();
        b.add_node("x2", sense("two", "V"));
        b.add_node("x1", sense("one", "N"));
        b.add_edge("x1", "x2", EdgeRecord::new(RelationType::Synonym));

        assert_eq!(a.content_hash(), b.content_hash());
        assert_eq!(a.content_hash().len(), 6);

        b.add_node("x3", sense("three", "N"));
        assert_ne!(a.content_hash(), b.content_hash());
    }
}
