pub mod common;
pub mod smoother;
pub mod svf;

pub use common::{DcBlocker, db_to_lin, sanitize};
pub use smoother::LinearSmoother;
pub use svf::{SvfCoeff, SvfState, SvfType};
