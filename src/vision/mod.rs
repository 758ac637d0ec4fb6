//! Vision module: client-side image normalization.
//!
//! Source images are decoded, fitted into a bounding box (1024x1024 by
//! default) and re-encoded as JPEG so they can be embedded as a base64 data
//! URL in a provider request.
//!
//! # Submodules
//!
//! - `models`: Source/normalized image types and size limits.
//! - `normalize`: Dimension planning and the resize + re-encode pipeline.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod models;
pub mod normalize;

pub use models::{NormalizedImage, SourceImage};
pub use normalize::{plan_dimensions, Normalizer};
