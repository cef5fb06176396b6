//! HTTP client for the DiagramHub item API.

pub mod client;

pub use client::HttpGateway;
