//! HTTP transport for the capture agent.
//!
//! Provides the request/response model shared by the fetch interceptor and
//! the self-test probe, plus a reqwest-backed client.

pub mod client;
pub mod request;
pub mod response;

pub use client::{ClientConfig, ClientError, HttpClient};
pub use request::{CacheMode, CredentialsMode, FetchRequest};
pub use response::FetchResponse;
