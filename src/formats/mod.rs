//! Persisted forms of a [`Structure`](crate::structure::Structure).

pub mod json;
pub mod store;

pub use json::{from_json_str, to_json_string};
pub use store::StructureStore;
