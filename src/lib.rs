#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod client;
pub mod error;
pub mod ws;

pub use client::Client;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Default endpoint, matching the bundled local echo server demo.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8080";
