//! Geometry core for synthetic detection-target datasets.
//!
//! The pipeline this crate serves is: solve placement constraints so a shape
//! is guaranteed fully inside the canvas, rasterize it, derive its tight
//! bounding box, encode a normalized annotation, and optionally augment the
//! raster afterwards. Randomness is always threaded in explicitly; nothing
//! here touches a global generator.

/// Post-hoc raster augmentation: perspective warp and blur.
pub mod augment;
/// Tight bounding boxes and normalized annotation encoding.
pub mod bbox;
/// Shape specifications and rasterization.
pub mod shape;
/// Containment-constraint solving and parameter sampling.
pub mod solver;
