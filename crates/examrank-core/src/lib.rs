//! examrank-core — Answer normalization and norm-referenced scoring.
//!
//! This crate implements the scoring engine behind the examrank service:
//! permissive multi-answer normalization that behaves identically across
//! front ends, a 1-parameter Rasch calibration (joint maximum likelihood)
//! that converts raw correctness into a percentile rank against a fixed
//! reference panel, and the admission-control rules deciding when that
//! model may run.
//!
//! The core is synchronous and pure given its inputs; persistence, front
//! ends, and certificate rendering live behind the [`store::SubmissionStore`]
//! seam in the surrounding application.

pub mod answer;
pub mod check;
pub mod error;
pub mod gate;
pub mod model;
pub mod percentile;
pub mod rasch;
pub mod scale;
pub mod store;
