mod broadcast;
mod local;
mod substrate;

pub use broadcast::Broadcast;
pub use local::LocalCluster;
pub use substrate::Substrate;
