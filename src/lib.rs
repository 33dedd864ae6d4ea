//! Tattoo Devtools Library
//!
//! Local data tooling for the tattoo artist directory: synthetic data
//! generation and seeding, stored-data validation, and a hot-reload
//! development proxy. Exposed as a library for the binary and for
//! integration testing.

pub mod cli;
pub mod config;
pub mod error;
pub mod generators;
pub mod handlers;
pub mod health;
pub mod models;
pub mod output;
pub mod proxy;
pub mod scenarios;
pub mod seeding;
pub mod services;
pub mod state;
pub mod tasks;
pub mod test_utils;
