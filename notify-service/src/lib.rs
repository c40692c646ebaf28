//! notify-service: relays signup approval requests to an administrator by email.
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
