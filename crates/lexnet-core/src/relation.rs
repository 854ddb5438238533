//! Relation types for the lexical graph.
//!
//! The enumeration is closed and code-stable: semantic relations sit in
//! the 1..=20 range (plus finer holonym/meronym subtypes in 21..=26), a
//! generic fallback is -1, and structural relations start at 90.

use serde::{Deserialize, Deserializer, Serialize};

/// The typed label of a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(i32)]
pub enum RelationType {
    #[serde(rename = "holonym")]
    Holonym = 1,
    #[serde(rename = "antonym")]
    Antonym = 2,
    #[serde(rename = "meronym")]
    Meronym = 3,
    #[serde(rename = "hypernym")]
    Hypernym = 4,
    #[serde(rename = "hyponym")]
    Hyponym = 5,
    #[serde(rename = "variant")]
    Variant = 6,
    #[serde(rename = "nearsynonym")]
    NearSynonym = 7,
    #[serde(rename = "paranym")]
    Paranym = 8,
    #[serde(rename = "synonym")]
    Synonym = 9,
    #[serde(rename = "varword")]
    VarWord = 11,
    #[serde(rename = "instance_of")]
    InstanceOf = 12,
    #[serde(rename = "has_instance")]
    HasInstance = 13,
    #[serde(rename = "holonym_generic")]
    HolonymGeneric = 21,
    #[serde(rename = "holonym_member")]
    HolonymMember = 22,
    #[serde(rename = "holonym_substance")]
    HolonymSubstance = 23,
    #[serde(rename = "meronym_generic")]
    MeronymGeneric = 24,
    #[serde(rename = "meronym_member")]
    MeronymMember = 25,
    #[serde(rename = "meronym_substance")]
    MeronymSubstance = 26,
    #[serde(rename = "generic")]
    Generic = -1,
    #[serde(rename = "has_sense")]
    HasSense = 91,
    #[serde(rename = "has_lemma")]
    HasLemma = 92,
    #[serde(rename = "has_facet")]
    HasFacet = 93,
    #[serde(rename = "is_synset")]
    IsSynset = 94,
    #[serde(rename = "has_synset")]
    HasSynset = 95,
}

impl RelationType {
    /// The stable integer code of this relation type.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// The snake_case label used in snapshots and query text.
    pub fn label(self) -> &'static str {
        match self {
            RelationType::Holonym => "holonym",
            RelationType::Antonym => "antonym",
            RelationType::Meronym => "meronym",
            RelationType::Hypernym => "hypernym",
            RelationType::Hyponym => "hyponym",
            RelationType::Variant => "variant",
            RelationType::NearSynonym => "nearsynonym",
            RelationType::Paranym => "paranym",
            RelationType::Synonym => "synonym",
            RelationType::VarWord => "varword",
            RelationType::InstanceOf => "instance_of",
            RelationType::HasInstance => "has_instance",
            RelationType::HolonymGeneric => "holonym_generic",
            RelationType::HolonymMember => "holonym_member",
            RelationType::HolonymSubstance => "holonym_substance",
            RelationType::MeronymGeneric => "meronym_generic",
            RelationType::MeronymMember => "meronym_member",
            RelationType::MeronymSubstance => "meronym_substance",
            RelationType::Generic => "generic",
            RelationType::HasSense => "has_sense",
            RelationType::HasLemma => "has_lemma",
            RelationType::HasFacet => "has_facet",
            RelationType::IsSynset => "is_synset",
            RelationType::HasSynset => "has_synset",
        }
    }

    /// Parses a snapshot label. Unknown labels fall back to `Generic`,
    /// matching how never-declared relation kinds are ingested.
    pub fn from_label(label: &str) -> RelationType {
        match label {
            "holonym" => RelationType::Holonym,
            "antonym" => RelationType::Antonym,
            "meronym" => RelationType::Meronym,
            "hypernym" => RelationType::Hypernym,
            "hyponym" => RelationType::Hyponym,
            "variant" => RelationType::Variant,
            "nearsynonym" => RelationType::NearSynonym,
            "paranym" => RelationType::Paranym,
            "synonym" => RelationType::Synonym,
            "varword" => RelationType::VarWord,
            "instance_of" => RelationType::InstanceOf,
            "has_instance" => RelationType::HasInstance,
            "holonym_generic" => RelationType::HolonymGeneric,
            "holonym_member" => RelationType::HolonymMember,
            "holonym_substance" => RelationType::HolonymSubstance,
            "meronym_generic" => RelationType::MeronymGeneric,
            "meronym_member" => RelationType::MeronymMember,
            "meronym_substance" => RelationType::MeronymSubstance,
            "has_sense" => RelationType::HasSense,
            "has_lemma" => RelationType::HasLemma,
            "has_facet" => RelationType::HasFacet,
            "is_synset" => RelationType::IsSynset,
            "has_synset" => RelationType::HasSynset,
            _ => RelationType::Generic,
        }
    }

    /// Semantic relations occupy the positive code range up to 20,
    /// plus the holonym/meronym subtypes.
    pub fn is_semantic(self) -> bool {
        (1..=26).contains(&self.code())
    }

    /// Hypernym/holonym family: points toward the more general or the
    /// containing concept.
    pub fn is_upper(self) -> bool {
        matches!(
            self,
            RelationType::Holonym
                | RelationType::Hypernym
                | RelationType::HolonymGeneric
                | RelationType::HolonymMember
                | RelationType::HolonymSubstance
        )
    }

    /// Hyponym/meronym family: points toward the more specific or the
    /// contained concept.
    pub fn is_lower(self) -> bool {
        matches!(
            self,
            RelationType::Meronym
                | RelationType::Hyponym
                | RelationType::MeronymGeneric
                | RelationType::MeronymMember
                | RelationType::MeronymSubstance
        )
    }

    /// Synonym-like relations, including synset membership links.
    pub fn is_synonym_like(self) -> bool {
        matches!(
            self,
            RelationType::Synonym | RelationType::IsSynset | RelationType::HasSynset
        )
    }

    /// The declared mutual inverse, if any.
    pub fn inverse(self) -> Option<RelationType> {
        let pair = match self {
            RelationType::HasInstance => RelationType::InstanceOf,
            RelationType::InstanceOf => RelationType::HasInstance,
            RelationType::Hypernym => RelationType::Hyponym,
            RelationType::Hyponym => RelationType::Hypernym,
            RelationType::Holonym => RelationType::Meronym,
            RelationType::Meronym => RelationType::Holonym,
            RelationType::HolonymGeneric => RelationType::MeronymGeneric,
            RelationType::MeronymGeneric => RelationType::HolonymGeneric,
            RelationType::HolonymMember => RelationType::MeronymMember,
            RelationType::MeronymMember => RelationType::HolonymMember,
            RelationType::HolonymSubstance => RelationType::MeronymSubstance,
            RelationType::MeronymSubstance => RelationType::HolonymSubstance,
            _ => return None,
        };
        Some(pair)
    }
}

// Deserialization routes through `from_label` so snapshots carrying a
// relation label this build has never heard of still load, as
// `Generic`. A derived impl would reject the whole document.
impl<'de> Deserialize<'de> for RelationType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(RelationType::from_label(&label))
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An edge record as stored in the canonical snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(rename = "edge_type")]
    pub rel_type: RelationType,
}

impl EdgeRecord {
    pub fn new(rel_type: RelationType) -> Self {
        Self { rel_type }
    }
}
