//! Match module - pairwise preference observations

use crate::CategoryCode;

/// A single pairwise outcome: `winner` is preferred over `loser`
///
/// The optional `source_id` identifies the quiz question that produced the
/// match. It is kept for traceability and never used by the ranking engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Match {
    /// The preferred code
    pub winner: CategoryCode,

    /// The code it was preferred over
    pub loser: CategoryCode,

    /// Source identifier (e.g. question id)
    pub source_id: Option<String>,
}

impl Match {
    /// Create a new match without a source identifier
    pub fn new(winner: CategoryCode, loser: CategoryCode) -> Self {
        Self {
            winner,
            loser,
            source_id: None,
        }
    }

    /// Attach a source identifier
    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Parse a match from two raw code strings
    ///
    /// # Errors
    /// Returns error if either code is empty
    pub fn parse(winner: &str, loser: &str) -> Result<Self, String> {
        Ok(Self::new(CategoryCode::new(winner)?, CategoryCode::new(loser)?))
    }

    /// Build a match from one quiz answer
    ///
    /// Unlike [`Match::parse`], a code matched against itself is an error.
    ///
    /// # Errors
    /// Returns error if either code is empty or both name the same code
    pub fn answer(winner: &str, loser: &str, source_id: Option<String>) -> Result<Self, String> {
        let m = Self::parse(winner, loser)?;
        if m.is_self_match() {
            return Err(format!("Match for {} cannot be won against itself", m.winner));
        }
        Ok(match source_id {
            Some(id) => m.with_source(id),
            None => m,
        })
    }

    /// A match whose winner and loser are the same code
    pub fn is_self_match(&self) -> bool {
        self.winner == self.loser
    }
}
