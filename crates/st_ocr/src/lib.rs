pub mod engine;
pub mod grouper;
pub mod types;

// Re-export the engine type so downstream crates don't need to depend on `ocr-rs` directly.
#[cfg(feature = "paddle")]
pub use ocr_rs::OcrEngine;

pub use engine::*;
pub use grouper::*;
pub use types::*;
