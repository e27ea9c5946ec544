//! # forum-api
//!
//! REST API server for the forum presence & read-state tracker, built with
//! the Axum framework.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
pub mod tasks;

pub use server::{create_app, create_app_state, run, run_server};
