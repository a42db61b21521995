pub mod business_layer;
pub mod config;
pub mod data_layer;
pub mod error;
pub mod utils;
