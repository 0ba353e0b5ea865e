//! Journal backend
//!
//! Users sign up and log in for a bearer token, keep private journal
//! entries, look up cached weather conditions and send plain-text email.

#![allow(missing_docs)]

pub mod api;
pub mod app;
pub mod auth;
pub mod boot;
pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod config;
pub mod database;
pub mod emails;
pub mod environment;
pub mod journal;
pub mod mailer;
pub mod password;
pub mod router;
pub mod setup_tracing;
pub mod users;
pub mod weather;

#[cfg(any(test, feature = "test-utils"))]
pub mod tests;
