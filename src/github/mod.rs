pub mod cache;
pub mod client;
pub mod links;
pub mod types;
