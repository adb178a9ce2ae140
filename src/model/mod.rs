//! Data models for labelscope.

mod label;

pub use label::{Edges, Label, MIN_EXTENT, NormPoint, image_key};
