//! Webroot - Minimal Static File Server
//!
//! Core library for request handling, path resolution and the server lifecycle.

pub mod bootstrap;
pub mod config;
pub mod http;
pub mod server;
