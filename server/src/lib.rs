// kedai_server/src/lib.rs

//! Storefront backend: catalog, customers and orders over HTTP.
//!
//! The binary in `main.rs` wires these modules into an actix-web server;
//! integration tests build the same `App` in-process.

pub mod config;
pub mod db;
pub mod errors;
pub mod flows;
pub mod models;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod web;
