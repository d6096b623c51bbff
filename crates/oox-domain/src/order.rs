//! Order Resolver - from matches to a preference-ordered sequence
//!
//! The final order lists components of the condensation graph with the most
//! preferred first. Tarjan closes sink components first, so the presentation
//! order is the reverse of emission order: if any code in component X beats a
//! code in component Y, X appears before Y.

use crate::graph::{build_graph, Graph};
use crate::scc::component_indices;
use crate::{CategoryCode, Match};
use std::fmt;

/// One rank in the final order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderElement {
    /// An uncontested rank
    Single(CategoryCode),

    /// A preference cycle (two or more codes) that needs manual resolution.
    /// The order of codes inside the block is not meaningful.
    Block(Vec<CategoryCode>),
}

impl OrderElement {
    /// Whether this element is an unresolved conflict block
    pub fn is_block(&self) -> bool {
        matches!(self, OrderElement::Block(_))
    }

    /// The codes in this element
    pub fn codes(&self) -> &[CategoryCode] {
        match self {
            OrderElement::Single(code) => std::slice::from_ref(code),
            OrderElement::Block(codes) => codes,
        }
    }

    /// Number of codes in this element
    pub fn len(&self) -> usize {
        self.codes().len()
    }

    /// Always false; elements hold at least one code
    pub fn is_empty(&self) -> bool {
        self.codes().is_empty()
    }

    fn from_component(component: Vec<CategoryCode>) -> Self {
        match <[CategoryCode; 1]>::try_from(component) {
            Ok([code]) => OrderElement::Single(code),
            Err(codes) => OrderElement::Block(codes),
        }
    }
}

impl fmt::Display for OrderElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderElement::Single(code) => write!(f, "{}", code),
            OrderElement::Block(codes) => {
                let names: Vec<&str> = codes.iter().map(CategoryCode::as_str).collect();
                write!(f, "{{{}}}", names.join(", "))
            }
        }
    }
}

/// Compute the final order for an already-built graph
pub fn order_from_graph(graph: &Graph) -> Vec<OrderElement> {
    let mut components = component_indices(graph);
    // Emission is sink-first; present source-first
    components.reverse();

    components
        .into_iter()
        .map(|component| {
            OrderElement::from_component(
                component
                    .into_iter()
                    .map(|idx| graph.code_at(idx).clone())
                    .collect(),
            )
        })
        .collect()
}

/// Compute the final order from a list of matches
///
/// Composes [`build_graph`], SCC detection and the source-first reordering.
///
/// # Examples
///
/// ```
/// use oox_domain::{get_final_order, Match, OrderElement};
///
/// let matches = vec![
///     Match::parse("A", "B").unwrap(),
///     Match::parse("B", "C").unwrap(),
///     Match::parse("C", "D").unwrap(),
/// ];
/// let order = get_final_order(&matches);
/// let names: Vec<String> = order.iter().map(|e| e.to_string()).collect();
/// assert_eq!(names, vec!["A", "B", "C", "D"]);
/// assert!(!order.iter().any(OrderElement::is_block));
/// ```
pub fn get_final_order(matches: &[Match]) -> Vec<OrderElement> {
    order_from_graph(&build_graph(matches))
}

/// Expand every element into its codes, preserving order
pub fn flatten(order: &[OrderElement]) -> Vec<CategoryCode> {
    order
        .iter()
        .flat_map(|element| element.codes().iter().cloned())
        .collect()
}
