//! Annotation edit-log records.
//!
//! An overlay session appends one record per edit, in strict order.
//! The tape is the source of truth for resolving caller-supplied raw
//! ids to session-assigned ids.

use serde::{Deserialize, Serialize};

/// What an edit record did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotAction {
    Edit,
    Delete,
}

/// The kind of entity an edit record touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Lemma,
    Sense,
    Relation,
    Generic,
}

/// The id a record was assigned: a node id or an edge id pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotId {
    Node(String),
    Edge(String, String),
}

impl AnnotId {
    pub fn node(id: impl Into<String>) -> Self {
        AnnotId::Node(id.into())
    }

    pub fn edge(src: impl Into<String>, tgt: impl Into<String>) -> Self {
        AnnotId::Edge(src.into(), tgt.into())
    }
}

impl std::fmt::Display for AnnotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnotId::Node(id) => write!(f, "{}", id),
            AnnotId::Edge(src, tgt) => write!(f, "{}-{}", src, tgt),
        }
    }
}

/// A caller-supplied raw reference, kept for later id resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawRef {
    Node(String),
    Edge(String, String),
}

/// One entry of the overlay edit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotRecord {
    pub annot_id: AnnotId,
    pub action: AnnotAction,
    pub kind: EntityKind,
    /// The raw id the caller used when creating the entity, if any.
    pub raw_id: Option<RawRef>,
    /// The session this record currently belongs to. A merge re-tags
    /// carried-over records with the merge-target session.
    pub session: String,
}

impl AnnotRecord {
    pub fn new(annot_id: AnnotId, action: AnnotAction, kind: EntityKind, session: &str) -> Self {
        Self {
            annot_id,
            action,
            kind,
            raw_id: None,
            session: session.to_string(),
        }
    }

    pub fn with_raw_id(mut self, raw_id: Option<RawRef>) -> Self {
        self.raw_id = raw_id;
        self
    }

    /// The raw node id this record claims, if it claims one.
    pub fn raw_node_id(&self) -> Option<&str> {
        match &self.raw_id {
            Some(RawRef::Node(id)) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_node_id_ignores_edge_refs() {
        let rec = AnnotRecord::new(
            AnnotId::node("sess_000001"),
            AnnotAction::Edit,
            EntityKind::Relation,
            "sess",
        )
        .with_raw_id(Some(RawRef::Edge("a".into(), "b".into())));

        assert_eq!(rec.raw_node_id(), None);

        let rec = rec.with_raw_id(Some(RawRef::Node("tmp1".into())));
        assert_eq!(rec.raw_node_id(), Some("tmp1"));
    }

    #[test]
    fn test_annot_id_display() {
        assert_eq!(AnnotId::node("x1").to_string(), "x1");
        assert_eq!(AnnotId::edge("a", "b").to_string(), "a-b");
    }
}
