//! Strongly connected component detection (Tarjan)
//!
//! The traversal uses an explicit frame stack instead of native recursion, and
//! all bookkeeping lives in a [`Tarjan`] value created per call, so concurrent
//! callers never share state.
//!
//! Components are emitted in *reverse topological order* of the condensation
//! graph: a component is closed only after every component reachable from it
//! has been closed. For a "winner beats loser" graph this means the least
//! preferred components come out first.

use crate::{CategoryCode, Graph};

/// Per-invocation working state for Tarjan's algorithm
struct Tarjan<'g> {
    graph: &'g Graph,
    ids: Vec<Option<usize>>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    timer: usize,
    components: Vec<Vec<usize>>,
}

impl<'g> Tarjan<'g> {
    fn new(graph: &'g Graph) -> Self {
        let n = graph.node_count();
        Self {
            graph,
            ids: vec![None; n],
            low: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::with_capacity(n),
            timer: 0,
            components: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Vec<usize>> {
        for root in 0..self.graph.node_count() {
            if self.ids[root].is_none() {
                self.visit(root);
            }
        }
        self.components
    }

    /// First visit: assign id/low from the timer and push on the component stack
    fn open(&mut self, node: usize) {
        self.ids[node] = Some(self.timer);
        self.low[node] = self.timer;
        self.timer += 1;
        self.stack.push(node);
        self.on_stack[node] = true;
    }

    /// Pop the component rooted at `root`, in pop order
    fn close(&mut self, root: usize) {
        let mut component = Vec::new();
        while let Some(node) = self.stack.pop() {
            self.on_stack[node] = false;
            component.push(node);
            if node == root {
                break;
            }
        }
        self.components.push(component);
    }

    fn visit(&mut self, root: usize) {
        let graph = self.graph;
        // (node, index of the next successor to examine)
        let mut frames: Vec<(usize, usize)> = Vec::new();

        self.open(root);
        frames.push((root, 0));

        while let Some(frame) = frames.last_mut() {
            let node = frame.0;
            let successors = graph.successor_indices(node);

            if frame.1 < successors.len() {
                let next = successors[frame.1];
                frame.1 += 1;

                match self.ids[next] {
                    None => {
                        self.open(next);
                        frames.push((next, 0));
                    }
                    Some(next_id) if self.on_stack[next] => {
                        self.low[node] = self.low[node].min(next_id);
                    }
                    // Already closed into another component
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                self.low[parent] = self.low[parent].min(self.low[node]);
            }
            if self.ids[node] == Some(self.low[node]) {
                self.close(node);
            }
        }
    }
}

/// Index-level SCCs in emission (reverse topological) order
pub(crate) fn component_indices(graph: &Graph) -> Vec<Vec<usize>> {
    Tarjan::new(graph).run()
}

/// Find the strongly connected components of `graph`
///
/// Returns components in Tarjan emission order (reverse topological order of
/// the condensation). Codes inside a component are in stack-pop order, which
/// depends on DFS start order and carries no meaning. Every node appears in
/// exactly one component.
///
/// # Examples
///
/// ```
/// use oox_domain::{build_graph, find_sccs, Match};
///
/// let matches = vec![
///     Match::parse("A", "B").unwrap(),
///     Match::parse("B", "A").unwrap(),
///     Match::parse("B", "C").unwrap(),
/// ];
/// let sccs = find_sccs(&build_graph(&matches));
/// assert_eq!(sccs.len(), 2);
/// assert_eq!(sccs[0].len(), 1); // {C} closes first
/// assert_eq!(sccs[1].len(), 2); // {A, B}
/// ```
pub fn find_sccs(graph: &Graph) -> Vec<Vec<CategoryCode>> {
    component_indices(graph)
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .map(|idx| graph.code_at(idx).clone())
                .collect()
        })
        .collect()
}
