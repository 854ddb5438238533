//! Declarative sense queries.
//!
//! A query arrives as an AST: sense expressions constrain a lemma by
//! part of speech, definition substring and relationship clauses;
//! relation expressions select the edges between two sense sets; a
//! genitive expression projects an attribute off every matched sense.
//! Parsing the surface syntax is a collaborator's job, plugged in
//! through [`QueryParser`]; this module only evaluates.

use crate::graph::LexGraph;
use crate::view::{AnyNode, Lemma, Relation, Sense, Synset};
use lexnet_core::{LexError, RelationType};
use regex::Regex;
use std::collections::HashSet;

/// Direction marker of a relation expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Forward,
    Bidirectional,
    /// Recognized by parsers but not evaluated.
    Backward,
}

/// The relationship attributes a clause can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelAttr {
    Hypernym,
    Hyponym,
    Holonym,
    Meronym,
    Antonym,
    Synonym,
    Variant,
    NearSynonym,
    Paranym,
    Synset,
    Facets,
    Lemmas,
    Pos,
    Definition,
    Domain,
}

impl RelAttr {
    pub fn from_name(name: &str) -> Option<RelAttr> {
        let attr = match name {
            "hypernym" => RelAttr::Hypernym,
            "hyponym" => RelAttr::Hyponym,
            "holonym" => RelAttr::Holonym,
            "meronym" => RelAttr::Meronym,
            "antonym" => RelAttr::Antonym,
            "synonym" => RelAttr::Synonym,
            "variant" => RelAttr::Variant,
            "nearsynonym" => RelAttr::NearSynonym,
            "paranym" => RelAttr::Paranym,
            "synset" => RelAttr::Synset,
            "facets" => RelAttr::Facets,
            "lemmas" => RelAttr::Lemmas,
            "pos" => RelAttr::Pos,
            "definition" => RelAttr::Definition,
            "domain" => RelAttr::Domain,
            _ => return None,
        };
        Some(attr)
    }
}

/// Clause operator: equality compares whole value sets, membership
/// asks for overlap; either can be negated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelOp {
    pub negated: bool,
    pub equality: bool,
}

/// The right-hand side of a relationship clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    Literals(Vec<String>),
    Expr(Box<SenseExpr>),
}

/// One relationship constraint on a sense.
#[derive(Debug, Clone, PartialEq)]
pub struct RelClause {
    pub attr: RelAttr,
    pub op: RelOp,
    pub targets: Targets,
}

/// A constraint inside a sense expression: either a plain token (part
/// of speech or definition substring) or a relationship clause.
#[derive(Debug, Clone, PartialEq)]
pub enum SenseClause {
    Plain(String),
    Rel(RelClause),
}

/// Selects senses of a lemma under zero or more constraints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SenseExpr {
    /// Anchored to the whole surface form; empty matches any lemma.
    pub lemma: String,
    pub clauses: Vec<SenseClause>,
}

/// Selects the typed edges between two sense sets.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationExpr {
    pub src: SenseExpr,
    pub rel_type: RelationType,
    pub arrow: Arrow,
    pub tgt: SenseExpr,
}

/// Projects an attribute off every sense a sub-expression matches.
#[derive(Debug, Clone, PartialEq)]
pub struct GenitiveExpr {
    pub expr: SenseExpr,
    pub attr: RelAttr,
}

/// A parsed query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpr {
    Sense(SenseExpr),
    Relation(RelationExpr),
    Genitive(GenitiveExpr),
    /// A conjunction as parsed; evaluation currently takes the first
    /// sub-expression.
    Complex(Vec<QueryExpr>),
}

/// Turns query text into a [`QueryExpr`]. The surface grammar lives
/// with the parser implementation, not here.
pub trait QueryParser {
    fn parse(&self, source: &str) -> Result<QueryExpr, LexError>;
}

/// A computed attribute value.
#[derive(Debug, Clone)]
pub enum AttrValue<'a> {
    Text(String),
    Nodes(Vec<AnyNode<'a>>),
    Lemmas(Vec<Lemma<'a>>),
    Synsets(Vec<Synset<'a>>),
}

impl AttrValue<'_> {
    /// Text form of the value, for comparison against literals: head
    /// words for sense-like nodes, surface forms for lemmas, glosses
    /// for synsets.
    pub fn rendered(&self) -> Vec<String> {
        match self {
            AttrValue::Text(text) => vec![text.clone()],
            AttrValue::Nodes(nodes) => nodes.iter().map(render_node).collect(),
            AttrValue::Lemmas(lemmas) => lemmas.iter().map(|l| l.lemma.clone()).collect(),
            AttrValue::Synsets(synsets) => synsets.iter().map(|s| s.gloss.clone()).collect(),
        }
    }
}

fn render_node(node: &AnyNode<'_>) -> String {
    let text = match node {
        AnyNode::Glyph(view) => view.glyph.clone(),
        AnyNode::Lemma(view) => view.lemma.clone(),
        AnyNode::Sense(view) => view.head_word(),
        AnyNode::Facet(view) => view.head_word(),
        AnyNode::Synset(view) => view.gloss.clone(),
        AnyNode::ExtSynset(view) => view.headword.clone(),
    };
    if text.is_empty() {
        node.id().to_string()
    } else {
        text
    }
}

/// The result of evaluating a query.
#[derive(Debug)]
pub enum QueryResult<'a> {
    Senses(Vec<Sense<'a>>),
    Relations(Vec<Relation<'a>>),
    Projection(Vec<(Sense<'a>, AttrValue<'a>)>),
}

/// Parses and evaluates query text in one step.
pub fn evaluate<'a>(
    graph: &'a LexGraph,
    parser: &dyn QueryParser,
    source: &str,
) -> Result<QueryResult<'a>, LexError> {
    let ast = parser.parse(source)?;
    eval_query(graph, &ast)
}

/// Evaluates a parsed query against the graph.
pub fn eval_query<'a>(graph: &'a LexGraph, expr: &QueryExpr) -> Result<QueryResult<'a>, LexError> {
    match expr {
        QueryExpr::Sense(sense_expr) => {
            Ok(QueryResult::Senses(eval_sense_expr(graph, sense_expr)?))
        }
        QueryExpr::Relation(rel_expr) => {
            Ok(QueryResult::Relations(eval_relation_expr(graph, rel_expr)?))
        }
        QueryExpr::Genitive(gen_expr) => {
            let senses = eval_sense_expr(graph, &gen_expr.expr)?;
            let projected = senses
                .into_iter()
                .map(|sense| {
                    let value = attr_of(&sense, gen_expr.attr);
                    (sense, value)
                })
                .collect();
            Ok(QueryResult::Projection(projected))
        }
        QueryExpr::Complex(exprs) => match exprs.first() {
            Some(first) => eval_query(graph, first),
            None => Err(LexError::Unsupported("empty complex query".to_string())),
        },
    }
}

/// Computes the attribute value of one sense.
pub fn attr_of<'a>(sense: &Sense<'a>, attr: RelAttr) -> AttrValue<'a> {
    match attr {
        RelAttr::Hypernym => AttrValue::Nodes(sense.relations_of(RelationType::Hypernym)),
        RelAttr::Hyponym => AttrValue::Nodes(sense.relations_of(RelationType::Hyponym)),
        RelAttr::Holonym => AttrValue::Nodes(sense.relations_of(RelationType::Holonym)),
        RelAttr::Meronym => AttrValue::Nodes(sense.relations_of(RelationType::Meronym)),
        RelAttr::Antonym => AttrValue::Nodes(sense.relations_of(RelationType::Antonym)),
        RelAttr::Synonym => AttrValue::Nodes(sense.relations_of(RelationType::Synonym)),
        RelAttr::Variant => AttrValue::Nodes(sense.relations_of(RelationType::Variant)),
        RelAttr::NearSynonym => AttrValue::Nodes(sense.relations_of(RelationType::NearSynonym)),
        RelAttr::Paranym => AttrValue::Nodes(sense.relations_of(RelationType::Paranym)),
        RelAttr::Synset => AttrValue::Synsets(sense.synset().into_iter().collect()),
        RelAttr::Facets => {
            AttrValue::Nodes(sense.facets().into_iter().map(AnyNode::Facet).collect())
        }
        RelAttr::Lemmas => AttrValue::Lemmas(sense.lemmas().to_vec()),
        RelAttr::Pos => AttrValue::Text(sense.pos.clone()),
        RelAttr::Definition => AttrValue::Text(sense.definition.clone()),
        RelAttr::Domain => AttrValue::Text(sense.domain.clone()),
    }
}

/// Evaluates a sense expression to the senses satisfying every clause.
pub fn eval_sense_expr<'a>(
    graph: &'a LexGraph,
    expr: &SenseExpr,
) -> Result<Vec<Sense<'a>>, LexError> {
    // A plain token starting with a capital letter is a part-of-speech
    // constraint; anything else constrains the definition.
    let pos_re = Regex::new(r"^[A-Z][a-z0-9]{0,2}")?;
    let mut pos = String::new();
    let mut definition = String::new();
    for clause in &expr.clauses {
        if let SenseClause::Plain(text) = clause {
            if pos_re.is_match(text) {
                pos = text.clone();
            } else {
                definition = text.clone();
            }
        }
    }

    let lemma_pattern = if expr.lemma.is_empty() {
        String::new()
    } else {
        format!("^{}$", expr.lemma)
    };
    let mut senses = graph.find_senses(&lemma_pattern, &pos, &definition, "")?;

    for clause in &expr.clauses {
        if let SenseClause::Rel(rel) = clause {
            let mut kept = Vec::new();
            for sense in senses {
                if clause_holds(graph, &sense, rel)? {
                    kept.push(sense);
                }
            }
            senses = kept;
        }
    }
    Ok(senses)
}

fn clause_holds<'a>(
    graph: &'a LexGraph,
    sense: &Sense<'a>,
    clause: &RelClause,
) -> Result<bool, LexError> {
    let value = attr_of(sense, clause.attr);
    match &clause.targets {
        Targets::Literals(literals) => {
            let mut rendered = value.rendered();
            if clause.op.equality {
                let mut want = literals.clone();
                rendered.sort();
                want.sort();
                Ok((rendered == want) != clause.op.negated)
            } else {
                let overlap = rendered.iter().any(|r| literals.contains(r));
                Ok(overlap != clause.op.negated)
            }
        }
        Targets::Expr(sub) => {
            let targets = eval_sense_expr(graph, sub)?;
            let value_senses: Vec<&Sense<'_>> = match &value {
                AttrValue::Nodes(nodes) => nodes.iter().filter_map(|n| n.as_sense()).collect(),
                _ => Vec::new(),
            };
            if clause.op.equality {
                let covered = value_senses
                    .iter()
                    .all(|v| targets.iter().any(|t| t == *v));
                let covering = targets
                    .iter()
                    .all(|t| value_senses.iter().any(|v| *v == t));
                Ok((covered && covering) != clause.op.negated)
            } else {
                let overlap = value_senses
                    .iter()
                    .any(|v| targets.iter().any(|t| t == *v));
                Ok(overlap != clause.op.negated)
            }
        }
    }
}

/// Evaluates a relation expression to the matching edge views.
///
/// Matching works from the target side: each target sense's incoming
/// edges of the named type are checked against the source-id set. A
/// bidirectional arrow additionally accepts edges stored the other way
/// around.
pub fn eval_relation_expr<'a>(
    graph: &'a LexGraph,
    expr: &RelationExpr,
) -> Result<Vec<Relation<'a>>, LexError> {
    if expr.arrow == Arrow::Backward {
        return Err(LexError::Unsupported("backward relation arrow".to_string()));
    }

    let src_ids: HashSet<String> = eval_sense_expr(graph, &expr.src)?
        .into_iter()
        .map(|sense| sense.id)
        .collect();
    let tgt_senses = eval_sense_expr(graph, &expr.tgt)?;

    let mut out = Vec::new();
    for tgt in &tgt_senses {
        for rel in graph.find_edges(&tgt.id, false) {
            if rel.rel_type != expr.rel_type {
                continue;
            }
            if rel.reversed {
                if src_ids.contains(&rel.src_id) {
                    out.push(Relation::new(graph, &rel.key(), false));
                }
            } else if expr.arrow == Arrow::Bidirectional && src_ids.contains(&rel.tgt_id) {
                out.push(Relation::new(graph, &rel.key(), true));
            }
        }
    }
    Ok(out)
}
