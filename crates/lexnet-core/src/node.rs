//! Node record variants for the lexical graph.
//!
//! Every vertex in the canonical snapshot carries a `node_type`
//! discriminator. We model the variants as one tagged enum so that
//! resolution is a single exhaustive match instead of string dispatch.

use serde::{Deserialize, Serialize};

fn default_sno() -> u32 {
    1
}

/// A vertex record as stored in the canonical snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_type", rename_all = "snake_case")]
pub enum NodeRecord {
    /// A radical / orthographic form shared by lemmas.
    Glyph {
        #[serde(default)]
        glyph: String,
    },

    /// A citation word form with phonetic transcription and a
    /// sense-number disambiguator.
    Lemma {
        #[serde(default)]
        lemma: String,
        #[serde(default = "default_sno")]
        lemma_sno: u32,
        #[serde(default)]
        zhuyin: String,
    },

    /// One meaning of a lemma.
    Sense {
        #[serde(rename = "def", default)]
        definition: String,
        #[serde(default)]
        pos: String,
        #[serde(default)]
        examples: Vec<String>,
        #[serde(default)]
        domain: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
        #[serde(default)]
        supplementary: String,
    },

    /// A sub-sense refinement of exactly one Sense. Same payload as
    /// Sense; the owning sense is recoverable through its has_facet edge.
    Facet {
        #[serde(rename = "def", default)]
        definition: String,
        #[serde(default)]
        pos: String,
        #[serde(default)]
        examples: Vec<String>,
        #[serde(default)]
        domain: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
        #[serde(default)]
        supplementary: String,
    },

    /// A synonym set, optionally cross-referenced into the external
    /// ontology.
    Synset {
        #[serde(default)]
        gloss: String,
        #[serde(default)]
        ext_word: String,
        #[serde(default)]
        ext_id: String,
    },

    /// A reference into the external ontology. The referenced object
    /// itself lives outside the graph; see [`OntologyResolver`].
    ExtSynset {
        #[serde(default)]
        ext_key: String,
        #[serde(default)]
        headword: String,
        #[serde(default)]
        serial: String,
    },
}

impl NodeRecord {
    /// The `node_type` discriminator label of this record.
    pub fn node_type(&self) -> &'static str {
        match self {
            NodeRecord::Glyph { .. } => "glyph",
            NodeRecord::Lemma { .. } => "lemma",
            NodeRecord::Sense { .. } => "sense",
            NodeRecord::Facet { .. } => "facet",
            NodeRecord::Synset { .. } => "synset",
            NodeRecord::ExtSynset { .. } => "ext_synset",
        }
    }

    pub fn is_lemma(&self) -> bool {
        matches!(self, NodeRecord::Lemma { .. })
    }

    pub fn is_sense(&self) -> bool {
        matches!(self, NodeRecord::Sense { .. })
    }

    pub fn is_facet(&self) -> bool {
        matches!(self, NodeRecord::Facet { .. })
    }
}

/// An entry of the external ontology, as resolved by a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyEntry {
    pub key: String,
    pub gloss: String,
    pub lemmas: Vec<String>,
}

/// Resolves external-ontology keys to their entries.
///
/// Network or corpus lookups are outside the core; consumers plug in
/// whatever backend they have.
pub trait OntologyResolver {
    fn resolve(&self, key: &str) -> Option<OntologyEntry>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_tag_round_trip() {
        let sense = NodeRecord::Sense {
            definition: "a financial institution".to_string(),
            pos: "N".to_string(),
            examples: vec!["the <bank> opens at nine".to_string()],
            domain: String::new(),
            src: None,
            supplementary: String::new(),
        };

        let json = serde_json::to_value(&sense).unwrap();
        assert_eq!(json["node_type"], "sense");
        assert_eq!(json["def"], "a financial institution");

        let back: NodeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, sense);
    }

    #[test]
    fn test_lemma_defaults() {
        let json = serde_json::json!({
            "node_type": "lemma",
            "lemma": "bank"
        });
        let rec: NodeRecord = serde_json::from_value(json).unwrap();
        match rec {
            NodeRecord::Lemma {
                lemma, lemma_sno, ..
            } => {
                assert_eq!(lemma, "bank");
                assert_eq!(lemma_sno, 1);
            }
            other => panic!("expected lemma, got {}", other.node_type()),
        }
    }

    #[test]
    fn test_discriminator_labels() {
        let glyph = NodeRecord::Glyph {
            glyph: "木".to_string(),
        };
        assert_eq!(glyph.node_type(), "glyph");
        assert!(!glyph.is_sense());

        let json = serde_json::json!({"node_type": "ext_synset", "ext_key": "02342365N"});
        let rec: NodeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(rec.node_type(), "ext_synset");
    }
}
