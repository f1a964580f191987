//! Core types for scribe.

mod engine;
mod input;
mod page;
mod raster;
mod request;

pub use engine::{EngineConfig, DEFAULT_ENGINE_CONFIG};
pub use input::{InputValue, RawInput};
pub use page::{Page, PageSelection, PageSet};
pub use raster::NormalizedImage;
pub use request::OcrRequest;
