pub mod client;
pub mod gateway;
pub mod models;

pub use client::ApiClient;
pub use gateway::{ChatGateway, GatewayError, GatewayResult, SendOutcome};
