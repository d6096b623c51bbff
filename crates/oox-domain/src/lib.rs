//! OoX Domain Layer
//!
//! This crate contains the ranking engine behind the OoX personality quiz.
//! It has ZERO external dependencies and defines the fundamental concepts,
//! value objects, and trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **CategoryCode**: An opaque label such as `Ni` or `Fe`
//! - **Match**: One pairwise comparison; the winner is preferred
//! - **Graph**: Directed preference graph, edge winner → loser
//! - **SCC**: A group of codes that mutually beat each other through a cycle
//! - **FinalOrder**: Source-first sequence of singles and conflict blocks
//! - **Tier / Health**: Presentation data derived from a resolved ranking
//!
//! ## Pipeline
//!
//! ```
//! use oox_domain::{get_final_order, Match, OrderElement};
//!
//! let matches = vec![
//!     Match::parse("Ni", "Fe").unwrap(),
//!     Match::parse("Fe", "Te").unwrap(),
//!     Match::parse("Te", "Fe").unwrap(),
//! ];
//! let order = get_final_order(&matches);
//! assert_eq!(order[0], OrderElement::Single("Ni".parse().unwrap()));
//! assert!(order[1].is_block());
//! ```
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure, synchronous functions over values passed in
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod code;
pub mod graph;
pub mod health;
pub mod matches;
pub mod order;
pub mod resolution;
pub mod scc;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use code::{CategoryCode, FUNCTION_CODES};
pub use graph::{build_graph, Graph};
pub use health::{HealthStatus, HealthTally};
pub use matches::Match;
pub use order::{flatten, get_final_order, order_from_graph, OrderElement};
pub use resolution::{FinalOrder, ResolutionError};
pub use scc::find_sccs;
pub use tier::{assign_tiers, Tier};
