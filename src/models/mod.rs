//! Data carried through a listing or download.
//!
//! `listing` wraps the raw service reply; `object` is the serializable view
//! of a single entry used by the JSON output.

pub mod download;
pub mod listing;
pub mod object;
