//! Export of the JSON duration report

pub mod json;

pub use json::write_json;
