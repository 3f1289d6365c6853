pub mod reconcile;
pub mod stats;
