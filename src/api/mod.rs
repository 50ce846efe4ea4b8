pub mod client;
pub mod error;
pub mod poller;
pub mod worker;

pub use client::{BridgeApi, HttpApi};
pub use error::ApiError;
pub use worker::ApiWorker;
