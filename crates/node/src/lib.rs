// node/src/lib.rs
pub mod config;
pub mod input;

pub use config::{GatewayConfig, Network, Overrides};
pub use input::{item_from_params, parse_items, read_items};
