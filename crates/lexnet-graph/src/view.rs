//! Typed entity views over the graph store.
//!
//! A view pairs a node id with a borrowed [`GraphRead`] and resolves
//! neighborhood structure on demand: a lemma knows its senses, a sense
//! its relations, facets and synset. Derived collections are computed
//! lazily and cached per view instance, so repeated access does not
//! re-walk the indices.
//!
//! Views compare by lexical content, not by id. Two senses with the
//! same definition, part of speech and source are equal even when they
//! live under different ids or different stores.

use crate::graph::{EdgeKey, GraphRead};
use lexnet_core::{NodeRecord, OntologyEntry, OntologyResolver, RelationType};
use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::warn;

/// How an edge was reached from the viewed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelDirection {
    /// The viewed node is the edge source.
    Forward,
    /// The viewed node is the edge target.
    Reversed,
}

/// All relations incident to `id`, as edge views.
pub(crate) fn edges_of<'a>(graph: &'a dyn GraphRead, id: &str, directed: bool) -> Vec<Relation<'a>> {
    graph
        .incident(id, directed)
        .into_iter()
        .map(|(key, reversed)| Relation::new(graph, &key, reversed))
        .collect()
}

/// A view of one typed edge.
#[derive(Clone)]
pub struct Relation<'a> {
    graph: &'a dyn GraphRead,
    pub src_id: String,
    pub tgt_id: String,
    pub rel_type: RelationType,
    /// True when this edge was reached from its target.
    pub reversed: bool,
}

impl<'a> Relation<'a> {
    pub fn new(graph: &'a dyn GraphRead, key: &EdgeKey, reversed: bool) -> Self {
        let rel_type = graph
            .edge(key)
            .map(|record| record.rel_type)
            .unwrap_or(RelationType::Generic);
        Self {
            graph,
            src_id: key.0.clone(),
            tgt_id: key.1.clone(),
            rel_type,
            reversed,
        }
    }

    pub fn key(&self) -> EdgeKey {
        (self.src_id.clone(), self.tgt_id.clone())
    }

    /// The id at the far end, relative to the node this edge was
    /// looked up from.
    pub fn end_id(&self) -> &str {
        if self.reversed {
            &self.src_id
        } else {
            &self.tgt_id
        }
    }

    /// The typed view at the far end. Ids without a record resolve to
    /// an empty sense view.
    pub fn end_node(&self) -> AnyNode<'a> {
        match self.graph.node(self.end_id()) {
            Some(record) => AnyNode::from_record(self.end_id(), record, self.graph),
            None => AnyNode::Sense(Sense::new(self.end_id(), self.graph)),
        }
    }
}

impl fmt::Debug for Relation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Relation {}: {} -> {}{}>",
            self.rel_type,
            self.src_id,
            self.tgt_id,
            if self.reversed { " (rev)" } else { "" }
        )
    }
}

impl fmt::Display for Relation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} -> {})", self.rel_type, self.src_id, self.tgt_id)
    }
}

impl PartialEq for Relation<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.src_id == other.src_id
            && self.tgt_id == other.tgt_id
            && self.rel_type == other.rel_type
    }
}

impl Eq for Relation<'_> {}

/// One entry of a node's relation neighborhood: the edge label, the
/// resolved far node and the direction of travel.
#[derive(Clone)]
pub struct RelationEdge<'a> {
    pub rel_type: RelationType,
    pub node: AnyNode<'a>,
    pub direction: RelDirection,
}

impl fmt::Debug for RelationEdge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.direction {
            RelDirection::Forward => "",
            RelDirection::Reversed => "(inv)",
        };
        write!(f, "<{}{}: {}>", self.rel_type, marker, self.node.id())
    }
}

/// Shared relation-neighborhood computation: every incident edge except
/// lemma membership links, each resolved to its far node.
fn relation_edges<'a>(graph: &'a dyn GraphRead, id: &str) -> Vec<RelationEdge<'a>> {
    edges_of(graph, id, false)
        .into_iter()
        .filter(|rel| rel.rel_type != RelationType::HasSense)
        .map(|rel| RelationEdge {
            rel_type: rel.rel_type,
            node: rel.end_node(),
            direction: if rel.reversed {
                RelDirection::Reversed
            } else {
                RelDirection::Forward
            },
        })
        .collect()
}

/// A view of a glyph node.
#[derive(Clone)]
pub struct Glyph<'a> {
    graph: &'a dyn GraphRead,
    pub id: String,
    pub glyph: String,
}

impl<'a> Glyph<'a> {
    pub fn new(id: &str, graph: &'a dyn GraphRead) -> Self {
        let glyph = match graph.node(id) {
            Some(NodeRecord::Glyph { glyph }) => glyph.clone(),
            _ => String::new(),
        };
        Self {
            graph,
            id: id.to_string(),
            glyph,
        }
    }

    /// The lemmas sharing this orthographic form.
    pub fn lemmas(&self) -> Vec<Lemma<'a>> {
        edges_of(self.graph, &self.id, true)
            .into_iter()
            .filter(|rel| rel.rel_type == RelationType::HasLemma)
            .map(|rel| Lemma::new(&rel.tgt_id, self.graph))
            .collect()
    }

    pub fn to_record(&self) -> NodeRecord {
        NodeRecord::Glyph {
            glyph: self.glyph.clone(),
        }
    }
}

impl fmt::Debug for Glyph<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Glyph: {}>", self.glyph)
    }
}

impl fmt::Display for Glyph<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph)
    }
}

impl PartialEq for Glyph<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.glyph == other.glyph
    }
}

impl Eq for Glyph<'_> {}

impl Hash for Glyph<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.glyph.hash(state);
    }
}

/// A view of a lemma node.
#[derive(Clone)]
pub struct Lemma<'a> {
    graph: &'a dyn GraphRead,
    pub id: String,
    pub lemma: String,
    pub lemma_sno: u32,
    pub zhuyin: String,
    senses: OnceCell<Vec<Sense<'a>>>,
}

impl<'a> Lemma<'a> {
    pub fn new(id: &str, graph: &'a dyn GraphRead) -> Self {
        let (lemma, lemma_sno, zhuyin) = match graph.node(id) {
            Some(NodeRecord::Lemma {
                lemma,
                lemma_sno,
                zhuyin,
            }) => (lemma.clone(), *lemma_sno, zhuyin.clone()),
            _ => (String::new(), 1, String::new()),
        };
        Self {
            graph,
            id: id.to_string(),
            lemma,
            lemma_sno,
            zhuyin,
            senses: OnceCell::new(),
        }
    }

    /// The senses attached to this lemma, in edge order. Computed once
    /// per view.
    pub fn senses(&self) -> &[Sense<'a>] {
        self.senses.get_or_init(|| {
            edges_of(self.graph, &self.id, true)
                .into_iter()
                .filter(|rel| rel.rel_type == RelationType::HasSense)
                .map(|rel| Sense::new(&rel.tgt_id, self.graph))
                .collect()
        })
    }

    /// Synsets linked directly to this lemma.
    pub fn synsets(&self) -> Vec<Synset<'a>> {
        edges_of(self.graph, &self.id, true)
            .into_iter()
            .filter(|rel| rel.rel_type == RelationType::HasSynset)
            .map(|rel| Synset::new(&rel.tgt_id, self.graph))
            .collect()
    }

    pub fn to_record(&self) -> NodeRecord {
        NodeRecord::Lemma {
            lemma: self.lemma.clone(),
            lemma_sno: self.lemma_sno,
            zhuyin: self.zhuyin.clone(),
        }
    }
}

impl fmt::Debug for Lemma<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Lemma: {}_{}>", self.lemma, self.lemma_sno)
    }
}

impl fmt::Display for Lemma<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lemma)
    }
}

impl PartialEq for Lemma<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.lemma == other.lemma && self.zhuyin == other.zhuyin
    }
}

impl Eq for Lemma<'_> {}

impl Hash for Lemma<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lemma.hash(state);
        self.zhuyin.hash(state);
    }
}

/// A view of a sense node.
#[derive(Clone)]
pub struct Sense<'a> {
    graph: &'a dyn GraphRead,
    pub id: String,
    pub definition: String,
    pub pos: String,
    pub examples: Vec<String>,
    pub domain: String,
    pub src: Option<String>,
    pub supplementary: String,
    relations: OnceCell<Vec<RelationEdge<'a>>>,
    lemmas: OnceCell<Vec<Lemma<'a>>>,
}

impl<'a> Sense<'a> {
    pub fn new(id: &str, graph: &'a dyn GraphRead) -> Self {
        let record = graph.node(id);
        let (definition, pos, examples, domain, src, supplementary) = match record {
            Some(
                NodeRecord::Sense {
                    definition,
                    pos,
                    examples,
                    domain,
                    src,
                    supplementary,
                }
                | NodeRecord::Facet {
                    definition,
                    pos,
                    examples,
                    domain,
                    src,
                    supplementary,
                },
            ) => (
                definition.clone(),
                pos.clone(),
                examples.clone(),
                domain.clone(),
                src.clone(),
                supplementary.clone(),
            ),
            _ => Default::default(),
        };
        Self {
            graph,
            id: id.to_string(),
            definition,
            pos,
            examples,
            domain,
            src,
            supplementary,
            relations: OnceCell::new(),
            lemmas: OnceCell::new(),
        }
    }

    /// The relation neighborhood of this sense. Lemma membership edges
    /// are not relations and are left out. Computed once per view.
    pub fn relations(&self) -> &[RelationEdge<'a>] {
        self.relations
            .get_or_init(|| relation_edges(self.graph, &self.id))
    }

    /// Outgoing semantic relations only: no structural edges, no
    /// reversed traversals.
    pub fn semantic_relations(&self) -> Vec<RelationEdge<'a>> {
        self.relations()
            .iter()
            .filter(|edge| {
                edge.direction == RelDirection::Forward && edge.rel_type.is_semantic()
            })
            .cloned()
            .collect()
    }

    /// Far nodes of outgoing edges carrying the given relation type.
    pub fn relations_of(&self, rel_type: RelationType) -> Vec<AnyNode<'a>> {
        self.relations()
            .iter()
            .filter(|edge| edge.direction == RelDirection::Forward && edge.rel_type == rel_type)
            .map(|edge| edge.node.clone())
            .collect()
    }

    pub fn hypernyms(&self) -> Vec<AnyNode<'a>> {
        self.relations_of(RelationType::Hypernym)
    }

    pub fn hyponyms(&self) -> Vec<AnyNode<'a>> {
        self.relations_of(RelationType::Hyponym)
    }

    pub fn synonyms(&self) -> Vec<AnyNode<'a>> {
        self.relations_of(RelationType::Synonym)
    }

    pub fn antonyms(&self) -> Vec<AnyNode<'a>> {
        self.relations_of(RelationType::Antonym)
    }

    /// Holonym family, generic/member/substance subtypes included.
    pub fn holonyms(&self) -> Vec<AnyNode<'a>> {
        self.relations()
            .iter()
            .filter(|edge| {
                edge.direction == RelDirection::Forward
                    && matches!(
                        edge.rel_type,
                        RelationType::Holonym
                            | RelationType::HolonymGeneric
                            | RelationType::HolonymMember
                            | RelationType::HolonymSubstance
                    )
            })
            .map(|edge| edge.node.clone())
            .collect()
    }

    /// Meronym family, generic/member/substance subtypes included.
    pub fn meronyms(&self) -> Vec<AnyNode<'a>> {
        self.relations()
            .iter()
            .filter(|edge| {
                edge.direction == RelDirection::Forward
                    && matches!(
                        edge.rel_type,
                        RelationType::Meronym
                            | RelationType::MeronymGeneric
                            | RelationType::MeronymMember
                            | RelationType::MeronymSubstance
                    )
            })
            .map(|edge| edge.node.clone())
            .collect()
    }

    /// The synset this sense belongs to. A well-formed graph has at
    /// most one; extras are logged and the first is kept.
    pub fn synset(&self) -> Option<Synset<'a>> {
        let synsets: Vec<Synset<'a>> = self
            .relations()
            .iter()
            .filter(|edge| {
                edge.direction == RelDirection::Forward
                    && edge.rel_type == RelationType::IsSynset
            })
            .filter_map(|edge| match &edge.node {
                AnyNode::Synset(synset) => Some(synset.clone()),
                _ => None,
            })
            .collect();
        if synsets.len() > 1 {
            warn!(sense_id = %self.id, count = synsets.len(), "multiple synsets, using the first");
        }
        synsets.into_iter().next()
    }

    /// Cross-references into the external ontology, with the relation
    /// each one was recorded under.
    pub fn ext_synsets(&self) -> Vec<(RelationType, ExtSynset<'a>)> {
        self.relations()
            .iter()
            .filter_map(|edge| match &edge.node {
                AnyNode::ExtSynset(ext) => Some((edge.rel_type, ext.clone())),
                _ => None,
            })
            .collect()
    }

    /// The facets refining this sense.
    pub fn facets(&self) -> Vec<Facet<'a>> {
        self.relations()
            .iter()
            .filter(|edge| {
                edge.direction == RelDirection::Forward
                    && edge.rel_type == RelationType::HasFacet
            })
            .filter_map(|edge| match &edge.node {
                AnyNode::Facet(facet) => Some(facet.clone()),
                _ => None,
            })
            .collect()
    }

    /// The lemmas this sense belongs to. Computed once per view.
    pub fn lemmas(&self) -> &[Lemma<'a>] {
        self.lemmas.get_or_init(|| {
            edges_of(self.graph, &self.id, false)
                .into_iter()
                .filter(|rel| rel.rel_type == RelationType::HasSense)
                .map(|rel| Lemma::new(&rel.src_id, self.graph))
                .collect()
        })
    }

    /// The surface form of the first owning lemma; empty when the
    /// sense is orphaned.
    pub fn head_word(&self) -> String {
        self.lemmas()
            .first()
            .map(|lemma| lemma.lemma.clone())
            .unwrap_or_default()
    }

    /// Own examples plus those of every facet.
    pub fn all_examples(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .examples
            .iter()
            .filter(|ex| !ex.is_empty())
            .cloned()
            .collect();
        for facet in self.facets() {
            out.extend(facet.examples.iter().filter(|ex| !ex.is_empty()).cloned());
        }
        out
    }

    /// Own relation neighborhood plus those of every facet.
    pub fn all_relations(&self) -> Vec<RelationEdge<'a>> {
        let mut out: Vec<RelationEdge<'a>> = self.relations().to_vec();
        for facet in self.facets() {
            out.extend(facet.relations().iter().cloned());
        }
        out
    }

    pub fn to_record(&self) -> NodeRecord {
        NodeRecord::Sense {
            definition: self.definition.clone(),
            pos: self.pos.clone(),
            examples: self.examples.clone(),
            domain: self.domain.clone(),
            src: self.src.clone(),
            supplementary: self.supplementary.clone(),
        }
    }
}

impl fmt::Debug for Sense<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Sense[{}]({}): {}>",
            self.id,
            self.head_word(),
            self.definition
        )
    }
}

impl fmt::Display for Sense<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.head_word(), self.definition)
    }
}

impl PartialEq for Sense<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.definition == other.definition && self.pos == other.pos && self.src == other.src
    }
}

impl Eq for Sense<'_> {}

impl Hash for Sense<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.definition.hash(state);
        self.pos.hash(state);
        self.src.hash(state);
    }
}

/// A view of a facet node. A facet behaves like the sense it refines;
/// everything not overridden here dereferences to the sense-shaped
/// payload.
#[derive(Clone)]
pub struct Facet<'a> {
    base: Sense<'a>,
    owner: OnceCell<Option<Sense<'a>>>,
}

impl<'a> Facet<'a> {
    pub fn new(id: &str, graph: &'a dyn GraphRead) -> Self {
        Self {
            base: Sense::new(id, graph),
            owner: OnceCell::new(),
        }
    }

    /// The sense-shaped payload of this facet.
    pub fn as_sense(&self) -> &Sense<'a> {
        &self.base
    }

    /// The sense this facet refines, recovered through its incoming
    /// has_facet edge. Computed once per view.
    pub fn sense(&self) -> Option<&Sense<'a>> {
        self.owner
            .get_or_init(|| {
                edges_of(self.base.graph, &self.base.id, false)
                    .into_iter()
                    .find(|rel| rel.rel_type == RelationType::HasFacet && rel.reversed)
                    .map(|rel| Sense::new(&rel.src_id, self.base.graph))
            })
            .as_ref()
    }

    /// The lemmas of the owning sense; a facet has no membership edges
    /// of its own.
    pub fn lemmas(&self) -> Vec<Lemma<'a>> {
        self.sense()
            .map(|sense| sense.lemmas().to_vec())
            .unwrap_or_default()
    }

    /// The owning sense's head word.
    pub fn head_word(&self) -> String {
        self.sense().map(|sense| sense.head_word()).unwrap_or_default()
    }

    pub fn to_record(&self) -> NodeRecord {
        NodeRecord::Facet {
            definition: self.base.definition.clone(),
            pos: self.base.pos.clone(),
            examples: self.base.examples.clone(),
            domain: self.base.domain.clone(),
            src: self.base.src.clone(),
            supplementary: self.base.supplementary.clone(),
        }
    }
}

impl<'a> std::ops::Deref for Facet<'a> {
    type Target = Sense<'a>;

    fn deref(&self) -> &Sense<'a> {
        &self.base
    }
}

impl fmt::Debug for Facet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Facet[{}]({}): {}>",
            self.base.id,
            self.head_word(),
            self.base.definition
        )
    }
}

impl fmt::Display for Facet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.head_word(), self.base.definition)
    }
}

impl PartialEq for Facet<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl Eq for Facet<'_> {}

impl Hash for Facet<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base.hash(state);
    }
}

/// A view of a synset node.
#[derive(Clone)]
pub struct Synset<'a> {
    graph: &'a dyn GraphRead,
    pub id: String,
    pub gloss: String,
    pub ext_word: String,
    pub ext_id: String,
    relations: OnceCell<Vec<RelationEdge<'a>>>,
}

impl<'a> Synset<'a> {
    pub fn new(id: &str, graph: &'a dyn GraphRead) -> Self {
        let (gloss, ext_word, ext_id) = match graph.node(id) {
            Some(NodeRecord::Synset {
                gloss,
                ext_word,
                ext_id,
            }) => (gloss.clone(), ext_word.clone(), ext_id.clone()),
            _ => Default::default(),
        };
        Self {
            graph,
            id: id.to_string(),
            gloss,
            ext_word,
            ext_id,
            relations: OnceCell::new(),
        }
    }

    /// The gloss doubles as the synset's definition.
    pub fn definition(&self) -> &str {
        &self.gloss
    }

    /// True when this synset is cross-referenced into the external
    /// ontology.
    pub fn has_ext_ref(&self) -> bool {
        !self.ext_id.is_empty()
    }

    pub fn relations(&self) -> &[RelationEdge<'a>] {
        self.relations
            .get_or_init(|| relation_edges(self.graph, &self.id))
    }

    pub fn semantic_relations(&self) -> Vec<RelationEdge<'a>> {
        self.relations()
            .iter()
            .filter(|edge| {
                edge.direction == RelDirection::Forward && edge.rel_type.is_semantic()
            })
            .cloned()
            .collect()
    }

    /// The member senses, recovered through their is_synset edges.
    pub fn senses(&self) -> Vec<Sense<'a>> {
        self.relations()
            .iter()
            .filter(|edge| edge.rel_type == RelationType::IsSynset)
            .filter_map(|edge| edge.node.as_sense().cloned())
            .collect()
    }

    pub fn to_record(&self) -> NodeRecord {
        NodeRecord::Synset {
            gloss: self.gloss.clone(),
            ext_word: self.ext_word.clone(),
            ext_id: self.ext_id.clone(),
        }
    }
}

impl fmt::Debug for Synset<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Synset[{}]: {}>", self.id, self.gloss)
    }
}

impl fmt::Display for Synset<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gloss)
    }
}

impl PartialEq for Synset<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.gloss == other.gloss
    }
}

impl Eq for Synset<'_> {}

impl Hash for Synset<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.gloss.hash(state);
    }
}

/// A view of an external-ontology reference node.
#[derive(Clone)]
pub struct ExtSynset<'a> {
    graph: &'a dyn GraphRead,
    pub id: String,
    pub ext_key: String,
    pub headword: String,
    pub serial: String,
    relations: OnceCell<Vec<RelationEdge<'a>>>,
}

impl<'a> ExtSynset<'a> {
    pub fn new(id: &str, graph: &'a dyn GraphRead) -> Self {
        let (ext_key, headword, serial) = match graph.node(id) {
            Some(NodeRecord::ExtSynset {
                ext_key,
                headword,
                serial,
            }) => (ext_key.clone(), headword.clone(), serial.clone()),
            _ => Default::default(),
        };
        Self {
            graph,
            id: id.to_string(),
            ext_key,
            headword,
            serial,
            relations: OnceCell::new(),
        }
    }

    pub fn relations(&self) -> &[RelationEdge<'a>] {
        self.relations
            .get_or_init(|| relation_edges(self.graph, &self.id))
    }

    /// The in-graph senses linked to this reference.
    pub fn senses(&self) -> Vec<Sense<'a>> {
        self.relations()
            .iter()
            .filter_map(|edge| match &edge.node {
                AnyNode::Sense(sense) => Some(sense.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn facets(&self) -> Vec<Facet<'a>> {
        self.relations()
            .iter()
            .filter_map(|edge| match &edge.node {
                AnyNode::Facet(facet) => Some(facet.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn synsets(&self) -> Vec<Synset<'a>> {
        self.relations()
            .iter()
            .filter_map(|edge| match &edge.node {
                AnyNode::Synset(synset) => Some(synset.clone()),
                _ => None,
            })
            .collect()
    }

    /// Resolves the referenced entry through a caller-provided backend.
    pub fn resolve(&self, resolver: &dyn OntologyResolver) -> Option<OntologyEntry> {
        resolver.resolve(&self.ext_key)
    }

    pub fn to_record(&self) -> NodeRecord {
        NodeRecord::ExtSynset {
            ext_key: self.ext_key.clone(),
            headword: self.headword.clone(),
            serial: self.serial.clone(),
        }
    }
}

impl fmt::Debug for ExtSynset<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<ExtSynset[{}]: {}>", self.ext_key, self.headword)
    }
}

impl fmt::Display for ExtSynset<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.headword)
    }
}

impl PartialEq for ExtSynset<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.headword == other.headword
    }
}

impl Eq for ExtSynset<'_> {}

impl Hash for ExtSynset<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.headword.hash(state);
    }
}

/// A view of any node variant.
#[derive(Clone)]
pub enum AnyNode<'a> {
    Glyph(Glyph<'a>),
    Lemma(Lemma<'a>),
    Sense(Sense<'a>),
    Facet(Facet<'a>),
    Synset(Synset<'a>),
    ExtSynset(ExtSynset<'a>),
}

impl<'a> AnyNode<'a> {
    /// Constructs the view matching a record's variant.
    pub fn from_record(id: &str, record: &NodeRecord, graph: &'a dyn GraphRead) -> Self {
        match record {
            NodeRecord::Glyph { .. } => AnyNode::Glyph(Glyph::new(id, graph)),
            NodeRecord::Lemma { .. } => AnyNode::Lemma(Lemma::new(id, graph)),
            NodeRecord::Sense { .. } => AnyNode::Sense(Sense::new(id, graph)),
            NodeRecord::Facet { .. } => AnyNode::Facet(Facet::new(id, graph)),
            NodeRecord::Synset { .. } => AnyNode::Synset(Synset::new(id, graph)),
            NodeRecord::ExtSynset { .. } => AnyNode::ExtSynset(ExtSynset::new(id, graph)),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            AnyNode::Glyph(view) => &view.id,
            AnyNode::Lemma(view) => &view.id,
            AnyNode::Sense(view) => &view.id,
            AnyNode::Facet(view) => &view.id,
            AnyNode::Synset(view) => &view.id,
            AnyNode::ExtSynset(view) => &view.id,
        }
    }

    pub fn node_type(&self) -> &'static str {
        match self {
            AnyNode::Glyph(_) => "glyph",
            AnyNode::Lemma(_) => "lemma",
            AnyNode::Sense(_) => "sense",
            AnyNode::Facet(_) => "facet",
            AnyNode::Synset(_) => "synset",
            AnyNode::ExtSynset(_) => "ext_synset",
        }
    }

    /// The sense-shaped view, for senses and facets alike.
    pub fn as_sense(&self) -> Option<&Sense<'a>> {
        match self {
            AnyNode::Sense(sense) => Some(sense),
            AnyNode::Facet(facet) => Some(facet.as_sense()),
            _ => None,
        }
    }

    pub fn to_record(&self) -> NodeRecord {
        match self {
            AnyNode::Glyph(view) => view.to_record(),
            AnyNode::Lemma(view) => view.to_record(),
            AnyNode::Sense(view) => view.to_record(),
            AnyNode::Facet(view) => view.to_record(),
            AnyNode::Synset(view) => view.to_record(),
            AnyNode::ExtSynset(view) => view.to_record(),
        }
    }
}

impl fmt::Debug for AnyNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyNode::Glyph(view) => fmt::Debug::fmt(view, f),
            AnyNode::Lemma(view) => fmt::Debug::fmt(view, f),
            AnyNode::Sense(view) => fmt::Debug::fmt(view, f),
            AnyNode::Facet(view) => fmt::Debug::fmt(view, f),
            AnyNode::Synset(view) => fmt::Debug::fmt(view, f),
            AnyNode::ExtSynset(view) => fmt::Debug::fmt(view, f),
        }
    }
}

impl fmt::Display for AnyNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyNode::Glyph(view) => fmt::Display::fmt(view, f),
            AnyNode::Lemma(view) => fmt::Display::fmt(view, f),
            AnyNode::Sense(view) => fmt::Display::fmt(view, f),
            AnyNode::Facet(view) => fmt::Display::fmt(view, f),
            AnyNode::Synset(view) => fmt::Display::fmt(view, f),
            AnyNode::ExtSynset(view) => fmt::Display::fmt(view, f),
        }
    }
}

impl PartialEq for AnyNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AnyNode::Glyph(a), AnyNode::Glyph(b)) => a == b,
            (AnyNode::Lemma(a), AnyNode::Lemma(b)) => a == b,
            (AnyNode::Sense(a), AnyNode::Sense(b)) => a == b,
            (AnyNode::Facet(a), AnyNode::Facet(b)) => a == b,
            (AnyNode::Synset(a), AnyNode::Synset(b)) => a == b,
            (AnyNode::ExtSynset(a), AnyNode::ExtSynset(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AnyNode<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LexGraph;
    use lexnet_core::EdgeRecord;

    // 060001 (bank) ── has_sense ──> 06000101, 06000102
    // 06000101 ── has_facet ──> 0600010101
    // 06000101 ── is_synset ──> syn_000001
    // 06000101 ── hypernym ──> 06000201
    fn sample_graph() -> LexGraph {
        let mut graph = LexGraph::new();
        graph.add_node(
            "060001",
            NodeRecord::Lemma {
                lemma: "bank".to_string(),
                lemma_sno: 1,
                zhuyin: "ㄅㄤ".to_string(),
            },
        );
        graph.add_node("06000101", sense("a financial institution", "N"));
        graph.add_node("06000102", sense("sloping land beside a river", "N"));
        graph.add_node(
            "0600010101",
            NodeRecord::Facet {
                definition: "the building the institution occupies".to_string(),
                pos: "N".to_string(),
                examples: vec!["the <bank> on the corner".to_string()],
                domain: String::new(),
                src: None,
                supplementary: String::new(),
            },
        );
        graph.add_node(
            "syn_000001",
            NodeRecord::Synset {
                gloss: "depository financial institution".to_string(),
                ext_word: "bank".to_string(),
                ext_id: "ext_02342365N".to_string(),
            },
        );
        graph.add_node(
            "060002",
            NodeRecord::Lemma {
                lemma: "institution".to_string(),
                lemma_sno: 1,
                zhuyin: String::new(),
            },
        );
        graph.add_node("06000201", sense("an established organization", "N"));
        graph.add_edge("060001", "06000101", EdgeRecord::new(RelationType::HasSense));
        graph.add_edge("060001", "06000102", EdgeRecord::new(RelationType::HasSense));
        graph.add_edge("060002", "06000201", EdgeRecord::new(RelationType::HasSense));
        graph.add_edge(
            "06000101",
            "0600010101",
            EdgeRecord::new(RelationType::HasFacet),
        );
        graph.add_edge(
            "06000101",
            "syn_000001",
            EdgeRecord::new(RelationType::IsSynset),
        );
        graph.add_edge(
            "06000101",
            "06000201",
            EdgeRecord::new(RelationType::Hypernym),
        );
        graph
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
    fn test_lemma_senses() {
        let graph = sample_graph();
        let lemma = Lemma::new("060001", &graph);
        assert_eq!(lemma.lemma, "bank");
        let mut ids: Vec<&str> = lemma.senses().iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["06000101", "06000102"]);
    }

    #[test]
    fn test_sense_relations_skip_membership_edges() {
        let graph = sample_graph();
        let sense = Sense::new("06000101", &graph);
        assert!(sense
            .relations()
            .iter()
            .all(|edge| edge.rel_type != RelationType::HasSense));
        assert_eq!(sense.lemmas().len(), 1);
        assert_eq!(sense.head_word(), "bank");
    }

    #[test]
    fn test_sense_hypernym_and_synset() {
        let graph = sample_graph();
        let sense = Sense::new("06000101", &graph);

        let hypernyms = sense.hypernyms();
        assert_eq!(hypernyms.len(), 1);
        assert_eq!(hypernyms[0].id(), "06000201");

        let synset = sense.synset().unwrap();
        assert_eq!(synset.gloss, "depository financial institution");
        assert!(synset.has_ext_ref());

        // The reverse view: the synset sees its member sense.
        let members = synset.senses();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, "06000101");
    }

    #[test]
    fn test_facet_delegates_to_owner() {
        let graph = sample_graph();
        let facet = Facet::new("0600010101", &graph);
        assert_eq!(facet.sense().unwrap().id, "06000101");
        assert_eq!(facet.head_word(), "bank");
        assert_eq!(facet.lemmas().len(), 1);
        // Deref exposes the sense-shaped payload.
        assert_eq!(facet.pos, "N");
    }

    #[test]
    fn test_all_examples_include_facets() {
        let graph = sample_graph();
        let sense = Sense::new("06000101", &graph);
        assert_eq!(
            sense.all_examples(),
            vec!["the <bank> on the corner".to_string()]
        );
    }

    #[test]
    fn test_holonym_family_includes_subtypes() {
        let mut graph = LexGraph::new();
        graph.add_node("s1", sense("wheel", "N"));
        graph.add_node("s2", sense("car", "N"));
        graph.add_node("s3", sense("rim", "N"));
        graph.add_edge("s1", "s2", EdgeRecord::new(RelationType::HolonymMember));
        graph.add_edge("s1", "s3", EdgeRecord::new(RelationType::MeronymGeneric));

        let sense = Sense::new("s1", &graph);
        let holonyms = sense.holonyms();
        assert_eq!(holonyms.len(), 1);
        assert_eq!(holonyms[0].id(), "s2");

        let meronyms = sense.meronyms();
        assert_eq!(meronyms.len(), 1);
        assert_eq!(meronyms[0].id(), "s3");
    }

    #[test]
    fn test_sense_equality_ignores_id() {
        let graph = sample_graph();
        let mut other = LexGraph::new();
        other.add_node("99999901", sense("a financial institution", "N"));

        let a = Sense::new("06000101", &graph);
        let b = Sense::new("99999901", &other);
        assert_eq!(a, b);

        let c = Sense::new("06000102", &graph);
        assert_ne!(a, c);
    }

    #[test]
    fn test_relation_end_id() {
        let graph = sample_graph();
        let rels = graph.find_edges("06000201", false);
        assert_eq!(rels.len(), 2);
        let hyper = rels
            .iter()
            .find(|rel| rel.rel_type == RelationType::Hypernym)
            .unwrap();
        assert!(hyper.reversed);
        assert_eq!(hyper.end_id(), "06000101");
    }

    #[test]
    fn test_view_node_dispatch() {
        let graph = sample_graph();
        assert_eq!(graph.view_node("060001").unwrap().node_type(), "lemma");
        assert_eq!(
            graph.view_node("0600010101").unwrap().node_type(),
            "facet"
        );
        assert!(graph.view_node("nope").is_err());
        assert_eq!(graph.sense_or_facet("06000101").node_type(), "sense");
        assert_eq!(graph.sense_or_facet("0600010101").node_type(), "facet");
    }
}
