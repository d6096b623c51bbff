//! Graph Builder - the "wins-against" adjacency structure
//!
//! An edge `winner → loser` means the winner is preferred over the loser.
//! Nodes keep the order in which they were first seen, and each node's
//! successor list keeps insertion order without duplicates. That order is
//! what the SCC pass uses for its DFS roots and neighbor visits.

use crate::{CategoryCode, Match};
use std::collections::HashMap;

/// Directed preference graph over category codes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<CategoryCode>,
    index: HashMap<CategoryCode, usize>,
    edges: Vec<Vec<usize>>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node, returning its index
    ///
    /// Registering an existing node is a no-op that returns the existing index.
    pub fn add_node(&mut self, code: &CategoryCode) -> usize {
        if let Some(&idx) = self.index.get(code) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(code.clone());
        self.index.insert(code.clone(), idx);
        self.edges.push(Vec::new());
        idx
    }

    /// Add the edge `winner → loser`, registering both nodes
    ///
    /// Returns `false` when the edge already exists or when `winner == loser`.
    /// A self-match still registers its node, but never produces a self-loop.
    pub fn add_edge(&mut self, winner: &CategoryCode, loser: &CategoryCode) -> bool {
        let from = self.add_node(winner);
        let to = self.add_node(loser);

        if from == to || self.edges[from].contains(&to) {
            return false;
        }
        self.edges[from].push(to);
        true
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `code` is a node
    pub fn contains(&self, code: &CategoryCode) -> bool {
        self.index.contains_key(code)
    }

    /// Whether the exact edge `winner → loser` exists
    pub fn has_edge(&self, winner: &CategoryCode, loser: &CategoryCode) -> bool {
        match (self.index.get(winner), self.index.get(loser)) {
            (Some(&from), Some(&to)) => self.edges[from].contains(&to),
            _ => false,
        }
    }

    /// Nodes in first-seen order
    pub fn nodes(&self) -> &[CategoryCode] {
        &self.nodes
    }

    /// Codes directly beaten by `code`, in insertion order
    ///
    /// Returns `None` if `code` is not a node.
    pub fn successors(&self, code: &CategoryCode) -> Option<Vec<&CategoryCode>> {
        let idx = *self.index.get(code)?;
        Some(self.edges[idx].iter().map(|&to| &self.nodes[to]).collect())
    }

    pub(crate) fn index_of(&self, code: &CategoryCode) -> Option<usize> {
        self.index.get(code).copied()
    }

    pub(crate) fn successor_indices(&self, idx: usize) -> &[usize] {
        &self.edges[idx]
    }

    pub(crate) fn code_at(&self, idx: usize) -> &CategoryCode {
        &self.nodes[idx]
    }
}

/// Build the preference graph from a list of matches
///
/// Every winner and loser becomes a node. Each distinct `(winner, loser)`
/// pair contributes exactly one edge; repeated pairs are ignored. The input
/// is not modified.
///
/// # Examples
///
/// ```
/// use oox_domain::{build_graph, Match};
///
/// let matches = vec![
///     Match::parse("Ni", "Ne").unwrap(),
///     Match::parse("Ni", "Ne").unwrap(),
///     Match::parse("Ne", "Se").unwrap(),
/// ];
/// let graph = build_graph(&matches);
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// ```
pub fn build_graph(matches: &[Match]) -> Graph {
    let mut graph = Graph::new();
    for m in matches {
        graph.add_edge(&m.winner, &m.loser);
    }
    graph
}
