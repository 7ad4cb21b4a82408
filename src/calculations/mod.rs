pub mod backward_pass;
pub mod forward_pass;
pub mod slack;

pub use backward_pass::{BackwardPass, LateTimes};
pub use forward_pass::{EarlyTimes, ForwardPass};
pub use slack::{Float, SlackAnalyzer};
