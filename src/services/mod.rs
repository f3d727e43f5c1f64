//! Services for order storage, normalization and aggregation

pub mod aggregator;
pub mod config;
pub mod normalizer;
pub mod store;
pub mod sync;

pub use aggregator::Aggregator;
pub use config::Config;
pub use store::{OrderStore, StoredOrders};
pub use sync::run_sync;
