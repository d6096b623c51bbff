//! Command implementations.

pub mod config;
pub mod describe;
pub mod rank;
pub mod resolve;

pub use self::config::execute_config;
pub use self::describe::execute_describe;
pub use self::rank::execute_rank;
pub use self::resolve::execute_resolve;
