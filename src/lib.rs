//! Authentication gateway for a WebODM-style processing API.
//!
//! Requests carry a JWT either as `?jwt=<token>` or in the authorization header;
//! `services::auth::TokenResolver` decides which one counts.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
