pub mod battery;
pub mod config;
pub mod mqtt;
pub mod publisher;
