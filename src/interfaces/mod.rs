//! Boundary adapters: request decoding, response envelopes and output formats.

pub mod csv;
pub mod json;
pub mod text;
