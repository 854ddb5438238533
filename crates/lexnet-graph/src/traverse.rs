//! Graph traversal: reachability, shortest paths and induced
//! subgraphs.
//!
//! Traversal is relation-class aware. Callers pick which edge families
//! to follow (upper, lower, synonym-like) and whether to hop through
//! facets; lemma nodes are fenced off by default so expansion stays
//! inside the semantic layer.

use crate::graph::{GraphRead, LexGraph};
use lexnet_core::{NodeRecord, RelationType};
use std::collections::{HashMap, HashSet, VecDeque};

/// Knobs for [`LexGraph::connected`] and [`LexGraph::subgraph`].
#[derive(Debug, Clone)]
pub struct TraversalOptions {
    /// Follow edges in their stored direction only. Forced on whenever
    /// an upper or lower relation class is enabled, otherwise the
    /// expansion would oscillate between levels.
    pub directed: bool,
    /// Upper bound on the size of the result set. 0 is unbounded. The
    /// bound is checked once per expanded node, so the result can run
    /// over by at most one neighborhood.
    pub max_conn: usize,
    /// Maximum expansion depth in hops. 0 is unlimited.
    pub max_depth: usize,
    /// Never expand through lemma nodes: a reached lemma is reported
    /// but its own neighborhood stays unexplored, so unrelated senses
    /// sharing the lemma do not bleed into each other.
    pub lemma_guard: bool,
    pub include_upper: bool,
    pub include_lower: bool,
    pub include_synonym: bool,
    pub include_facets: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            directed: false,
            max_conn: 1000,
            max_depth: 0,
            lemma_guard: true,
            include_upper: true,
            include_lower: true,
            include_synonym: true,
            include_facets: false,
        }
    }
}

impl LexGraph {
    /// All node ids reachable from `node_id` over the enabled relation
    /// classes. The start node itself is not reported.
    ///
    /// Depth-first; `max_conn` caps the result-set size, so the
    /// expansion is cut off rather than erroring on dense
    /// neighborhoods.
    pub fn connected(&self, node_id: &str, opts: &TraversalOptions) -> HashSet<String> {
        let directed = opts.directed || opts.include_upper || opts.include_lower;

        let mut visited: HashSet<String> = HashSet::new();
        let mut result: HashSet<String> = HashSet::new();
        let mut stack: Vec<(String, usize)> = vec![(node_id.to_string(), 0)];

        while let Some((current, depth)) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if opts.max_conn != 0 && result.len() > opts.max_conn {
                break;
            }
            if opts.max_depth != 0 && depth >= opts.max_depth {
                continue;
            }
            for rel in self.find_edges(&current, directed) {
                let include = (rel.rel_type.is_upper() && opts.include_upper)
                    || (rel.rel_type.is_lower() && opts.include_lower)
                    || (rel.rel_type.is_synonym_like() && opts.include_synonym);
                if !include {
                    continue;
                }
                let far = rel.end_id();
                let record = self.node(far);
                if let Some(record) = record {
                    if record.is_facet() && !opts.include_facets {
                        continue;
                    }
                }
                if far != node_id {
                    result.insert(far.to_string());
                }
                // The guard reports the lemma but never walks through it.
                let guarded =
                    opts.lemma_guard && record.map(NodeRecord::is_lemma).unwrap_or(false);
                if !guarded {
                    stack.push((far.to_string(), depth + 1));
                }
            }
        }
        result
    }

    /// The node ids along a shortest path from `src` to `tgt`, both
    /// endpoints included. Empty when no path exists. Undirected
    /// search also walks edges against their stored direction.
    pub fn find_shortest_path(&self, src: &str, tgt: &str, directed: bool) -> Vec<String> {
        if src == tgt {
            return vec![src.to_string()];
        }
        if !self.has_id(src) || !self.has_id(tgt) {
            return Vec::new();
        }

        // BFS, halting as soon as the target is first discovered.
        let mut parent: HashMap<String, String> = HashMap::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        visited.insert(src.to_string());
        queue.push_back(src.to_string());

        let mut found = false;
        'bfs: while let Some(current) = queue.pop_front() {
            for rel in self.find_edges(&current, directed) {
                let far = rel.end_id();
                if !visited.insert(far.to_string()) {
                    continue;
                }
                parent.insert(far.to_string(), current.clone());
                if far == tgt {
                    found = true;
                    break 'bfs;
                }
                queue.push_back(far.to_string());
            }
        }
        if !found {
            return Vec::new();
        }

        let mut path = vec![tgt.to_string()];
        let mut cursor = tgt.to_string();
        while cursor != src {
            match parent.get(&cursor) {
                Some(prev) => {
                    cursor = prev.clone();
                    path.push(cursor.clone());
                }
                // A hole in the backtrace means the walk above was cut
                // short; report no path instead of a partial one.
                None => return Vec::new(),
            }
        }
        path.reverse();
        path
    }

    /// The subgraph induced on exactly the given ids: those nodes plus
    /// every edge with both endpoints inside the set. For readability
    /// of the extract, each included sense can pull in its owning
    /// lemmas (`with_lemmas`) and its synset (`with_synsets`), edge
    /// included.
    pub fn induced_subgraph(
        &self,
        ids: &HashSet<String>,
        with_lemmas: bool,
        with_synsets: bool,
    ) -> LexGraph {
        let mut ids = ids.clone();
        if with_lemmas || with_synsets {
            // Augmented endpoints join the id set, so their connecting
            // edges fall out of the induction below.
            for id in ids.clone() {
                if !self.node(&id).map(NodeRecord::is_sense).unwrap_or(false) {
                    continue;
                }
                for rel in self.find_edges(&id, false) {
                    let pull = (with_lemmas
                        && rel.rel_type == RelationType::HasSense
                        && rel.reversed)
                        || (with_synsets
                            && rel.rel_type == RelationType::IsSynset
                            && !rel.reversed);
                    if pull {
                        ids.insert(rel.end_id().to_string());
                    }
                }
            }
        }

        let nodes = self
            .nodes
            .iter()
            .filter(|(id, _)| ids.contains(*id))
            .map(|(id, record)| (id.clone(), record.clone()));
        let edges = self
            .edges
            .iter()
            .filter(|(key, _)| ids.contains(&key.0) && ids.contains(&key.1))
            .map(|(key, record)| (key.clone(), *record));

        let mut meta = self.meta.clone();
        meta.insert(
            "label".to_string(),
            serde_json::Value::String("subgraph".to_string()),
        );
        LexGraph::from_parts(nodes, edges, meta)
    }

    /// The subgraph induced by `node_id` and everything reachable from
    /// it under `opts`. Owning lemmas are always pulled in; synsets
    /// when synonym-like relations are in scope.
    pub fn subgraph(&self, node_id: &str, opts: &TraversalOptions) -> LexGraph {
        let mut ids = self.connected(node_id, opts);
        ids.insert(node_id.to_string());
        self.induced_subgraph(&ids, true, opts.include_synonym)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexnet_core::{EdgeRecord, NodeRecord, RelationType};

    fn sense(def: &str) -> NodeRecord {
        NodeRecord::Sense {
            definition: def.to_string(),
            pos: "N".to_string(),
            examples: Vec::new(),
            domain: String::new(),
            src: None,
            supplementary: String::new(),
        }
    }

    fn chain(rel: RelationType, ids: &[&str]) -> LexGraph {
        let mut graph = LexGraph::new();
        for id in ids {
            graph.add_node(*id, sense(id));
        }
        for pair in ids.windows(2) {
            graph.add_edge(pair[0], pair[1], EdgeRecord::new(rel));
        }
        graph
    }

    #[test]
    fn test_connected_is_transitively_closed() {
        // a1 → a2 → a3, all hypernym.
        let graph = chain(RelationType::Hypernym, &["a1", "a2", "a3"]);
        let opts = TraversalOptions::default();

        let reach = graph.connected("a1", &opts);
        assert!(reach.contains("a2"));
        assert!(reach.contains("a3"));
        assert!(!reach.contains("a1"));
    }

    #[test]
    fn test_connected_respects_max_depth() {
        let graph = chain(RelationType::Hypernym, &["a1", "a2", "a3", "a4"]);
        let opts = TraversalOptions {
            max_depth: 1,
            ..Default::default()
        };
        let reach = graph.connected("a1", &opts);
        assert_eq!(reach, HashSet::from(["a2".to_string()]));

        let opts = TraversalOptions {
            max_depth: 2,
            ..Default::default()
        };
        let reach = graph.connected("a1", &opts);
        assert_eq!(reach.len(), 2);
    }

    #[test]
    fn test_connected_respects_max_conn() {
        let graph = chain(RelationType::Hypernym, &["a1", "a2", "a3", "a4", "a5"]);
        let opts = TraversalOptions {
            max_conn: 2,
            ..Default::default()
        };
        let reach = graph.connected("a1", &opts);
        assert!(reach.len() < 4);
    }

    #[test]
    fn test_max_conn_bounds_result_size() {
        // root → 5 hubs, each hub → 10 leaves, all hypernym. Per-node
        // expansion counting would pop only a handful of nodes while
        // the result balloons; the bound is on the result itself.
        let mut graph = LexGraph::new();
        graph.add_node("root", sense("root"));
        for h in 0..5 {
            let hub = format!("h{h}");
            graph.add_node(&hub, sense(&hub));
            graph.add_edge("root", &hub, EdgeRecord::new(RelationType::Hypernym));
            for l in 0..10 {
                let leaf = format!("h{h}_l{l}");
                graph.add_node(&leaf, sense(&leaf));
                graph.add_edge(&hub, &leaf, EdgeRecord::new(RelationType::Hypernym));
            }
        }

        let opts = TraversalOptions {
            max_conn: 3,
            ..Default::default()
        };
        let reach = graph.connected("root", &opts);
        // Checked per expanded node, so one neighborhood of overrun is
        // the most the cutoff allows.
        assert!(!reach.is_empty());
        assert!(reach.len() <= opts.max_conn + 10);
    }

    #[test]
    fn test_connected_skips_excluded_relation_classes() {
        let graph = chain(RelationType::Antonym, &["a1", "a2"]);
        let reach = graph.connected("a1", &TraversalOptions::default());
        assert!(reach.is_empty());

        let graph = chain(RelationType::Hypernym, &["a1", "a2"]);
        let opts = TraversalOptions {
            include_upper: false,
            ..Default::default()
        };
        assert!(graph.connected("a1", &opts).is_empty());
    }

    #[test]
    fn test_lemma_guard_stops_expansion_through_lemmas() {
        // s1 → l1 → s2, both synonym edges; s2 is only reachable by
        // walking through the lemma.
        let mut graph = LexGraph::new();
        graph.add_node("s1", sense("one"));
        graph.add_node("s2", sense("two"));
        graph.add_node(
            "l1",
            NodeRecord::Lemma {
                lemma: "word".to_string(),
                lemma_sno: 1,
                zhuyin: String::new(),
            },
        );
        graph.add_edge("s1", "l1", EdgeRecord::new(RelationType::Synonym));
        graph.add_edge("l1", "s2", EdgeRecord::new(RelationType::Synonym));

        let reach = graph.connected("s1", &TraversalOptions::default());
        assert!(reach.contains("l1"));
        assert!(!reach.contains("s2"));

        let opts = TraversalOptions {
            lemma_guard: false,
            ..Default::default()
        };
        let reach = graph.connected("s1", &opts);
        assert!(reach.contains("s2"));
    }

    #[test]
    fn test_facets_excluded_by_default() {
        let mut graph = LexGraph::new();
        graph.add_node("s1", sense("one"));
        graph.add_node(
            "f1",
            NodeRecord::Facet {
                definition: "refinement".to_string(),
                pos: "N".to_string(),
                examples: Vec::new(),
                domain: String::new(),
                src: None,
                supplementary: String::new(),
            },
        );
        graph.add_edge("s1", "f1", EdgeRecord::new(RelationType::Synonym));

        assert!(graph.connected("s1", &TraversalOptions::default()).is_empty());

        let opts = TraversalOptions {
            include_facets: true,
            ..Default::default()
        };
        assert!(graph.connected("s1", &opts).contains("f1"));
    }

    #[test]
    fn test_shortest_path_along_chain() {
        // a ─ b ─ c ─ d plus a shortcut-free branch b ─ x.
        let mut graph = chain(RelationType::Hypernym, &["a", "b", "c", "d"]);
        graph.add_node("x", sense("branch"));
        graph.add_edge("b", "x", EdgeRecord::new(RelationType::Hyponym));

        assert_eq!(
            graph.find_shortest_path("a", "d", false),
            vec!["a", "b", "c", "d"]
        );
        // Undirected: reachable against edge direction too.
        assert_eq!(graph.find_shortest_path("d", "a", false).len(), 4);
        assert_eq!(graph.find_shortest_path("a", "a", false), vec!["a"]);
    }

    #[test]
    fn test_shortest_path_respects_direction() {
        let graph = chain(RelationType::Hypernym, &["a", "b", "c"]);
        assert_eq!(
            graph.find_shortest_path("a", "c", true),
            vec!["a", "b", "c"]
        );
        assert!(graph.find_shortest_path("c", "a", true).is_empty());
    }

    #[test]
    fn test_shortest_path_unreachable_is_empty() {
        let mut graph = chain(RelationType::Hypernym, &["a", "b"]);
        graph.add_node("lonely", sense("isolated"));

        assert!(graph.find_shortest_path("a", "lonely", false).is_empty());
        assert!(graph.find_shortest_path("a", "missing", false).is_empty());
    }

    #[test]
    fn test_subgraph_is_induced() {
        // a1 → a2 → a3, and an antonym edge a2 → b1 that traversal
        // never follows.
        let mut graph = chain(RelationType::Hypernym, &["a1", "a2", "a3"]);
        graph.add_node("b1", sense("outside"));
        graph.add_edge("a2", "b1", EdgeRecord::new(RelationType::Antonym));

        let sub = graph.subgraph("a1", &TraversalOptions::default());
        assert_eq!(sub.node_count(), 3);
        assert!(sub.has_id("a1"));
        assert!(!sub.has_id("b1"));
        // Only edges with both endpoints inside survive.
        assert_eq!(sub.edge_count(), 2);
        assert_eq!(sub.meta["label"], "subgraph");
    }

    #[test]
    fn test_induced_subgraph_pulls_in_lemmas_and_synsets() {
        let mut graph = LexGraph::new();
        graph.add_node(
            "l1",
            NodeRecord::Lemma {
                lemma: "bank".to_string(),
                lemma_sno: 1,
                zhuyin: String::new(),
            },
        );
        graph.add_node("s1", sense("a financial institution"));
        graph.add_node(
            "syn_000001",
            NodeRecord::Synset {
                gloss: "depository financial institution".to_string(),
                ext_word: String::new(),
                ext_id: String::new(),
            },
        );
        graph.add_edge("l1", "s1", EdgeRecord::new(RelationType::HasSense));
        graph.add_edge("s1", "syn_000001", EdgeRecord::new(RelationType::IsSynset));

        let ids = HashSet::from(["s1".to_string()]);

        let bare = graph.induced_subgraph(&ids, false, false);
        assert_eq!(bare.node_count(), 1);
        assert_eq!(bare.edge_count(), 0);

        let full = graph.induced_subgraph(&ids, true, true);
        assert_eq!(full.node_count(), 3);
        assert!(full.has_id("l1"));
        assert!(full.has_id("syn_000001"));
        assert_eq!(full.edge_count(), 2);
    }
}
