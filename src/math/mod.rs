mod link;
mod shrink;

pub use link::{MARGIN_CLAMP, log_phi, phi};
pub use shrink::{shrink, shrink_vec};
