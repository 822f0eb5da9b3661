mod types;
mod normalize;
mod validate;

pub use types::{Angle, AngleUnit};
pub use normalize::{wrap_0_2pi, wrap_pm_pi};
pub use validate::{validate_latitude, validate_longitude};
