//! Cycle resolution protocol
//!
//! A [`FinalOrder`] may contain conflict blocks. The caller repeatedly takes
//! the first block, obtains a total ranking of it from the user, and splices
//! that ranking back in its place until no block remains. Each step removes
//! exactly one block, so the loop runs at most once per block.

use crate::order::{flatten, get_final_order, OrderElement};
use crate::{CategoryCode, Match};
use std::collections::HashSet;
use std::fmt;

/// Errors raised while resolving conflict blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// `resolve_next` was called on an order without blocks
    NoConflict,

    /// The submitted ranking is not a permutation of the block
    NotAPermutation {
        /// Codes in the block being resolved
        expected: Vec<CategoryCode>,
        /// Codes that were submitted
        submitted: Vec<CategoryCode>,
    },

    /// The order still holds this many blocks
    Unresolved(usize),
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::NoConflict => write!(f, "No conflict block left to resolve"),
            ResolutionError::NotAPermutation { expected, submitted } => write!(
                f,
                "Ranking [{}] must list each of [{}] exactly once",
                join(submitted),
                join(expected)
            ),
            ResolutionError::Unresolved(n) => {
                write!(f, "Order still has {} unresolved conflict block(s)", n)
            }
        }
    }
}

impl std::error::Error for ResolutionError {}

fn join(codes: &[CategoryCode]) -> String {
    codes
        .iter()
        .map(CategoryCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A final order moving through manual conflict resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalOrder {
    elements: Vec<OrderElement>,
}

impl FinalOrder {
    /// Wrap a computed order
    pub fn new(elements: Vec<OrderElement>) -> Self {
        Self { elements }
    }

    /// Compute the order for `matches`
    pub fn from_matches(matches: &[Match]) -> Self {
        Self::new(get_final_order(matches))
    }

    /// Current elements
    pub fn elements(&self) -> &[OrderElement] {
        &self.elements
    }

    /// Consume into the current elements
    pub fn into_elements(self) -> Vec<OrderElement> {
        self.elements
    }

    /// The first unresolved block, if any
    pub fn first_conflict(&self) -> Option<&[CategoryCode]> {
        self.elements.iter().find_map(|element| match element {
            OrderElement::Block(codes) => Some(codes.as_slice()),
            OrderElement::Single(_) => None,
        })
    }

    /// Number of unresolved blocks
    pub fn conflict_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_block()).count()
    }

    /// Whether every element is a single code
    pub fn is_resolved(&self) -> bool {
        self.conflict_count() == 0
    }

    /// Replace the first block with `ranking`
    ///
    /// # Errors
    /// - [`ResolutionError::NoConflict`] if there is no block
    /// - [`ResolutionError::NotAPermutation`] if `ranking` does not list every
    ///   code of the block exactly once; the order is left unchanged
    pub fn resolve_next(&mut self, ranking: Vec<CategoryCode>) -> Result<(), ResolutionError> {
        let position = self
            .elements
            .iter()
            .position(OrderElement::is_block)
            .ok_or(ResolutionError::NoConflict)?;

        let block = self.elements[position].codes();
        if !is_permutation(block, &ranking) {
            return Err(ResolutionError::NotAPermutation {
                expected: block.to_vec(),
                submitted: ranking,
            });
        }

        self.elements.splice(
            position..=position,
            ranking.into_iter().map(OrderElement::Single),
        );
        Ok(())
    }

    /// Drive resolution to completion with a decision source
    ///
    /// `decide` is called with each block in turn and returns a ranking of it.
    /// Errors from `decide` and invalid rankings stop the loop.
    pub fn resolve_with<F, E>(mut self, mut decide: F) -> Result<Vec<CategoryCode>, E>
    where
        F: FnMut(&[CategoryCode]) -> Result<Vec<CategoryCode>, E>,
        E: From<ResolutionError>,
    {
        while let Some(block) = self.first_conflict() {
            let ranking = decide(block)?;
            self.resolve_next(ranking)?;
        }
        Ok(self.into_ranking()?)
    }

    /// All codes, blocks expanded in their current internal order
    pub fn flatten(&self) -> Vec<CategoryCode> {
        flatten(&self.elements)
    }

    /// The fully resolved ranking
    ///
    /// # Errors
    /// Returns [`ResolutionError::Unresolved`] if blocks remain
    pub fn into_ranking(self) -> Result<Vec<CategoryCode>, ResolutionError> {
        match self.conflict_count() {
            0 => Ok(self.flatten()),
            n => Err(ResolutionError::Unresolved(n)),
        }
    }
}

impl From<Vec<OrderElement>> for FinalOrder {
    fn from(elements: Vec<OrderElement>) -> Self {
        Self::new(elements)
    }
}

fn is_permutation(block: &[CategoryCode], ranking: &[CategoryCode]) -> bool {
    if block.len() != ranking.len() {
        return false;
    }
    let expected: HashSet<&CategoryCode> = block.iter().collect();
    let submitted: HashSet<&CategoryCode> = ranking.iter().collect();
    submitted.len() == ranking.len() && expected == submitted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CategoryCode {
        CategoryCode::new(s).unwrap()
    }

    fn codes(list: &[&str]) -> Vec<CategoryCode> {
        list.iter().map(|s| code(s)).collect()
    }

    fn m(w: &str, l: &str) -> Match {
        Match::parse(w, l).unwrap()
    }

    /// X beats {A, B, C}, which beats Y, which beats {P, Q}
    fn two_block_order() -> FinalOrder {
        FinalOrder::from_matches(&[
            m("X", "A"),
            m("A", "B"),
            m("B", "C"),
            m("C", "A"),
            m("C", "Y"),
            m("Y", "P"),
            m("P", "Q"),
            m("Q", "P"),
        ])
    }

    #[test]
    fn test_resolved_order_has_no_conflict() {
        let order = FinalOrder::from_matches(&[m("A", "B")]);
        assert!(order.is_resolved());
        assert!(order.first_conflict().is_none());
        assert_eq!(order.into_ranking().unwrap(), codes(&["A", "B"]));
    }

    #[test]
    fn test_resolve_two_blocks_in_sequence() {
        let mut order = two_block_order();
        assert_eq!(order.conflict_count(), 2);

        let first: HashSet<_> = order.first_conflict().unwrap().iter().cloned().collect();
        assert_eq!(first, codes(&["A", "B", "C"]).into_iter().collect());
        order.resolve_next(codes(&["B", "A", "C"])).unwrap();
        assert_eq!(order.conflict_count(), 1);

        order.resolve_next(codes(&["Q", "P"])).unwrap();
        assert!(order.is_resolved());
        assert_eq!(
            order.into_ranking().unwrap(),
            codes(&["X", "B", "A", "C", "Y", "Q", "P"])
        );
    }

    #[test]
    fn test_rejects_partial_ranking() {
        let mut order = two_block_order();
        let before = order.clone();
        let err = order.resolve_next(codes(&["A", "B"])).unwrap_err();
        assert!(matches!(err, ResolutionError::NotAPermutation { .. }));
        assert_eq!(order, before);
    }

    #[test]
    fn test_rejects_duplicates_and_strangers() {
        let mut order = two_block_order();
        assert!(order.resolve_next(codes(&["A", "A", "B"])).is_err());
        assert!(order.resolve_next(codes(&["A", "B", "Z"])).is_err());
        assert_eq!(order.conflict_count(), 2);
    }

    #[test]
    fn test_no_conflict_error() {
        let mut order = FinalOrder::from_matches(&[m("A", "B")]);
        assert_eq!(
            order.resolve_next(codes(&["A"])),
            Err(ResolutionError::NoConflict)
        );
    }

    #[test]
    fn test_into_ranking_unresolved() {
        let order = two_block_order();
        assert_eq!(order.into_ranking(), Err(ResolutionError::Unresolved(2)));
    }

    #[test]
    fn test_resolve_with_sorted_decisions() {
        let mut calls = 0;
        let ranking = two_block_order()
            .resolve_with(|block| {
                calls += 1;
                let mut sorted = block.to_vec();
                sorted.sort();
                Ok::<_, ResolutionError>(sorted)
            })
            .unwrap();
        assert_eq!(calls, 2);
        assert_eq!(ranking, codes(&["X", "A", "B", "C", "Y", "P", "Q"]));
    }

    #[test]
    fn test_resolve_with_bad_decision_stops() {
        let result = two_block_order().resolve_with(|_| Ok::<_, ResolutionError>(Vec::new()));
        assert!(matches!(result, Err(ResolutionError::NotAPermutation { .. })));
    }

    #[test]
    fn test_error_display() {
        let err = ResolutionError::NotAPermutation {
            expected: codes(&["A", "B"]),
            submitted: codes(&["A"]),
        };
        assert_eq!(err.to_string(), "Ranking [A] must list each of [A, B] exactly once");
    }
}
