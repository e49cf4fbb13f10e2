//! Core data structures for light-curve processing.

mod folded;
mod label;
mod light_curve;
mod mission;
mod outcome;

pub use folded::FoldedCurve;
pub use label::Label;
pub(crate) use light_curve::LightCurveParts;
pub use light_curve::{LightCurve, LightCurveBuilder};
pub use mission::Mission;
pub use outcome::Outcome;
