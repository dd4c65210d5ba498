// kedai_server/src/services/mod.rs

pub mod pricing;
