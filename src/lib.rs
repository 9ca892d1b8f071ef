//! NASA Explorer gateway: a thin HTTP service that proxies the public NASA
//! APIs, validates request parameters, and reshapes each upstream payload
//! into a normalized JSON schema.

pub mod clients;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod utils;
