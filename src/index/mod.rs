//! Index storage for tagdex.

pub mod store;

pub use store::IndexStore;
