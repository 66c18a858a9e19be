//! Core HealthSync client library (session lifecycle, API client, config).

pub mod api;
pub mod config;
pub mod credentials;
pub mod session;
