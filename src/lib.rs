pub mod auth;
pub mod config;
pub mod error_codes;
pub mod generation;
pub mod model;
pub mod prompts;
pub mod records;
pub mod seed;
pub mod shell;
pub mod store;
