// Adapters layer: concrete implementations of the domain ports.

pub mod console;
pub mod http;
pub mod vehicle_store;
