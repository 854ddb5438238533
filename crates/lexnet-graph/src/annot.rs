//! Annotation sessions.
//!
//! An annotator works on its own copy of the graph, so the canonical
//! snapshot stays untouched while edits accumulate. Every edit appends
//! a record to the session tape; the tape is what resolves
//! caller-supplied raw ids to session-assigned ids, and what the merge
//! protocol consumes later.

use crate::graph::{EdgeKey, GraphRead, LexGraph, MetaMap};
use crate::io;
use crate::view::{Lemma, Relation, Sense};
use chrono::Local;
use lexnet_core::{
    AnnotAction, AnnotId, AnnotRecord, EdgeRecord, EntityKind, LexError, NodeRecord, RawRef,
    RelationType,
};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::warn;

/// A mutable annotation session over a base graph.
pub struct Annotator {
    label: String,
    timestamp: String,
    serial: u32,
    nodes: HashMap<String, NodeRecord>,
    edges: HashMap<EdgeKey, EdgeRecord>,
    tape: Vec<AnnotRecord>,
}

impl Annotator {
    /// Starts a session labelled `label` over a copy of `base`.
    pub fn new(base: &LexGraph, label: &str) -> Self {
        Self {
            label: label.to_string(),
            timestamp: Local::now().format("%y%m%d%H%M%S").to_string(),
            serial: 0,
            nodes: base.nodes.clone(),
            edges: base.edges.clone(),
            tape: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// The session edit log, in append order.
    pub fn tape(&self) -> &[AnnotRecord] {
        &self.tape
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The next session-assigned node id: the label plus a zero-padded
    /// serial.
    fn new_node_id(&mut self) -> String {
        self.serial += 1;
        format!("{}_{:06}", self.label, self.serial)
    }

    /// Resolves a caller-supplied raw id against the tape. An unknown
    /// raw id passes through unchanged; a raw id claimed by more than
    /// one record is an error.
    pub fn map_to_annot_id(&self, raw: &str) -> Result<String, LexError> {
        let mut matches = self
            .tape
            .iter()
            .filter(|rec| rec.raw_node_id() == Some(raw));
        let first = matches.next();
        if matches.next().is_some() {
            return Err(LexError::AmbiguousRawId(raw.to_string()));
        }
        match first {
            Some(rec) => match &rec.annot_id {
                AnnotId::Node(id) => Ok(id.clone()),
                AnnotId::Edge(..) => Ok(raw.to_string()),
            },
            None => Ok(raw.to_string()),
        }
    }

    fn record(
        &mut self,
        annot_id: AnnotId,
        action: AnnotAction,
        kind: EntityKind,
        raw_id: Option<RawRef>,
    ) {
        self.tape
            .push(AnnotRecord::new(annot_id, action, kind, &self.label).with_raw_id(raw_id));
    }

    /// Creates a lemma node under a fresh session id. The raw id, if
    /// given, lets later edits refer to this node before its assigned
    /// id is known to the caller.
    pub fn create_lemma(&mut self, lemma: &str, raw_id: Option<&str>) -> Lemma<'_> {
        let id = self.new_node_id();
        self.record(
            AnnotId::node(id.clone()),
            AnnotAction::Edit,
            EntityKind::Lemma,
            raw_id.map(|raw| RawRef::Node(raw.to_string())),
        );
        self.nodes.insert(
            id.clone(),
            NodeRecord::Lemma {
                lemma: lemma.to_string(),
                lemma_sno: 1,
                zhuyin: String::new(),
            },
        );
        Lemma::new(&id, &*self)
    }

    /// Creates a sense node under a fresh session id.
    pub fn create_sense(&mut self, definition: &str, raw_id: Option<&str>) -> Sense<'_> {
        let id = self.new_node_id();
        self.record(
            AnnotId::node(id.clone()),
            AnnotAction::Edit,
            EntityKind::Sense,
            raw_id.map(|raw| RawRef::Node(raw.to_string())),
        );
        self.nodes.insert(
            id.clone(),
            NodeRecord::Sense {
                definition: definition.to_string(),
                pos: String::new(),
                examples: Vec::new(),
                domain: String::new(),
                src: None,
                supplementary: String::new(),
            },
        );
        Sense::new(&id, &*self)
    }

    /// Creates a typed relation. Both endpoints are resolved through
    /// the tape first and must exist in the session data.
    pub fn create_relation(
        &mut self,
        src: &str,
        tgt: &str,
        rel_type: RelationType,
    ) -> Result<Relation<'_>, LexError> {
        let src_id = self.map_to_annot_id(src)?;
        let tgt_id = self.map_to_annot_id(tgt)?;
        if !self.nodes.contains_key(&src_id) {
            return Err(LexError::IdNotFound(src.to_string()));
        }
        if !self.nodes.contains_key(&tgt_id) {
            return Err(LexError::IdNotFound(tgt.to_string()));
        }
        self.record(
            AnnotId::edge(src_id.clone(), tgt_id.clone()),
            AnnotAction::Edit,
            EntityKind::Relation,
            Some(RawRef::Edge(src.to_string(), tgt.to_string())),
        );
        let key = (src_id, tgt_id);
        self.edges.insert(key.clone(), EdgeRecord::new(rel_type));
        Ok(Relation::new(&*self, &key, false))
    }

    /// Upserts a node record under an existing (or external) id.
    pub fn set_node(&mut self, id: &str, record: NodeRecord) {
        let kind = match &record {
            NodeRecord::Lemma { .. } => EntityKind::Lemma,
            NodeRecord::Sense { .. } | NodeRecord::Facet { .. } => EntityKind::Sense,
            _ => EntityKind::Generic,
        };
        self.record(AnnotId::node(id), AnnotAction::Edit, kind, None);
        self.nodes.insert(id.to_string(), record);
    }

    /// Upserts a relation between two existing ids.
    pub fn set_relation(&mut self, src: &str, tgt: &str, rel_type: RelationType) {
        self.record(
            AnnotId::edge(src, tgt),
            AnnotAction::Edit,
            EntityKind::Relation,
            None,
        );
        self.edges
            .insert((src.to_string(), tgt.to_string()), EdgeRecord::new(rel_type));
    }

    fn remove_node(&mut self, id: &str, kind: EntityKind) -> bool {
        if self.nodes.remove(id).is_none() {
            return false;
        }
        self.record(AnnotId::node(id), AnnotAction::Delete, kind, None);
        true
    }

    /// Deletes a lemma node. Returns false when the id is unknown.
    pub fn remove_lemma(&mut self, id: &str) -> bool {
        self.remove_node(id, EntityKind::Lemma)
    }

    /// Deletes a sense (or facet) node. Returns false when the id is
    /// unknown.
    pub fn remove_sense(&mut self, id: &str) -> bool {
        self.remove_node(id, EntityKind::Sense)
    }

    /// Deletes a relation. Returns false when no such edge exists.
    pub fn remove_relation(&mut self, src: &str, tgt: &str) -> bool {
        let key = (src.to_string(), tgt.to_string());
        if self.edges.remove(&key).is_none() {
            return false;
        }
        self.record(
            AnnotId::edge(src, tgt),
            AnnotAction::Delete,
            EntityKind::Relation,
            None,
        );
        true
    }

    /// Writes the session data to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LexError> {
        let mut meta = MetaMap::new();
        meta.insert("label".to_string(), serde_json::json!(self.label));
        meta.insert("timestamp".to_string(), serde_json::json!(self.timestamp));
        meta.insert("serial".to_string(), serde_json::json!(self.serial));
        io::dump_annot_json(path, meta, &self.nodes, &self.edges)
    }

    /// Restores session data from a file written by [`Annotator::save`].
    /// A missing file is not an error; the session is left untouched
    /// and false is returned.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<bool, LexError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "session file not found");
            return Ok(false);
        }
        let (meta, nodes, edges) = io::load_annot_json(path)?;
        if let Some(label) = meta.get("label").and_then(|v| v.as_str()) {
            self.label = label.to_string();
        }
        if let Some(ts) = meta.get("timestamp").and_then(|v| v.as_str()) {
            self.timestamp = ts.to_string();
        }
        if let Some(serial) = meta.get("serial").and_then(|v| v.as_u64()) {
            self.serial = serial as u32;
        }
        self.nodes = nodes;
        self.edges = edges;
        Ok(true)
    }
}

impl GraphRead for Annotator {
    fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.get(id)
    }

    fn edge(&self, key: &EdgeKey) -> Option<&EdgeRecord> {
        self.edges.get(key)
    }

    // The session data is small relative to the base snapshot and
    // mutates constantly, so a scan beats maintaining indices here.
    fn incident(&self, id: &str, directed: bool) -> Vec<(EdgeKey, bool)> {
        let mut out = Vec::new();
        for key in self.edges.keys() {
            if key.0 == id {
                out.push((key.clone(), false));
            }
            if !directed && key.1 == id {
                out.push((key.clone(), true));
            }
        }
        out
    }
}

impl fmt::Display for Annotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Annotator[{}]: {} nodes, {} edges>",
            self.label,
            self.nodes.len(),
            self.edges.len()
        )
    }
}
