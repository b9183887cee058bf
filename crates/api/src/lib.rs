//! HTTP API: server wiring, the request gate, routing, and request/response
//! mapping.

pub mod app;
pub mod config;
pub mod context;
pub mod gate;
pub mod middleware;
