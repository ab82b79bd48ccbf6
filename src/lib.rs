//! Coffee Shop environment configuration
//!
//! The environment record the front-end reads at startup: backend API
//! base URL plus the Auth0 tenant, audience, client id and callback URL.
//!
//! The record is baked at build time from `environment.config.json`.
//! Select the variant with `COFFEESHOP_ENV` (`development` by default) and
//! supply deployment values with the `COFFEESHOP_*` overrides read by
//! build.rs. The crate performs no runtime configuration.

mod auth0;
mod bake;
pub mod config;
mod environment;
mod error;
mod manifest;

pub use environment::{environment, Auth0Config, Environment, EnvironmentConfig, ENVIRONMENT};
pub use error::EnvironmentError;
pub use manifest::EnvironmentManifest;
