mod handler;
mod model;

pub use handler::submit;
pub use model::{OnboardingFailure, OnboardingSuccess};
