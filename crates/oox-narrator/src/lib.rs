//! OoX Narrator
//!
//! Turns a ranking result into a short narrative using an LLM.
//!
//! # Overview
//!
//! The Narrator receives the final order, per-code health status and tier
//! assignment, renders them into a single fixed prompt, and parses the model's
//! Markdown answer into a `{title, description}` pair.
//!
//! # Architecture
//!
//! ```text
//! NarrativeRequest → prompt → LLM → parse (with fallbacks) → Narrative
//! ```
//!
//! Provider failures and timeouts are errors from [`Narrator::describe`];
//! callers that must always show something use
//! [`Narrator::describe_or_placeholder`].
//!
//! # Example Usage
//!
//! ```no_run
//! use oox_domain::{CategoryCode, OrderElement};
//! use oox_llm::MockProvider;
//! use oox_narrator::{NarrativeRequest, Narrator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let narrator = Narrator::with_defaults(MockProvider::new("# Title\nSeer\n# Description\nHi"));
//! let request = NarrativeRequest::new(vec![OrderElement::Single(CategoryCode::new("Ni")?)]);
//!
//! let narrative = narrator.describe(&request).await?;
//! println!("{}: {}", narrative.title, narrative.description);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod narrator;
mod parser;
mod prompt;
mod types;

pub use config::NarratorConfig;
pub use error::NarratorError;
pub use narrator::Narrator;
pub use parser::{parse_narrative, DEFAULT_DESCRIPTION, DEFAULT_TITLE};
pub use prompt::NarrativePromptBuilder;
pub use types::{Narrative, NarrativeRequest, PLACEHOLDER_DESCRIPTION, PLACEHOLDER_TITLE};
