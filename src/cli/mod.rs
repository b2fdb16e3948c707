//! CLI command implementations.

pub mod output;
pub mod search_cmd;
