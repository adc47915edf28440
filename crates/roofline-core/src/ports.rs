//! Port trait definitions
//!
//! These traits define the interfaces that detector and imagery adapters
//! implement. Persistence ports live in `roofline-store`.

pub mod detector;
pub mod imagery;

pub use detector::Detector;
pub use imagery::ImageProvider;
