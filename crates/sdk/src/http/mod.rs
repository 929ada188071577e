//! HTTP plumbing shared by the resource client and schema loader

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
