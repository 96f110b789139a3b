//! Agent catalog
//!
//! The catalog is a read-only list of agent records loaded once from a
//! JSON resource shaped `{ "agents": [...] }`:
//! - `agent` holds the record types
//! - `source` loads the resource from a file or an http(s) URL
//! - `filter` derives the visible subset from the current UI state

pub mod agent;
pub mod error;
pub mod filter;
pub mod source;
