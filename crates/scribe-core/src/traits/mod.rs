//! Collaborator traits for OCR and PDF backends.

mod backend;
mod rasterizer;

pub use backend::*;
pub use rasterizer::*;
