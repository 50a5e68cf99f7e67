//! Transport layer
//!
//! The assistant is reached over HTTP only. Everything network-facing lives
//! here so the router and chat service stay free of I/O.

pub mod http;

pub use http::{chat_route, routes, HttpServer, SERVICE_NAME};
