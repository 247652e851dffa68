//! Stitch module — attach-vs-create session decisions.

pub mod engine;

pub use engine::{StitchOutcome, Stitcher};
