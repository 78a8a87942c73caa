pub mod bootstrap;
pub mod commands;
pub mod config;
pub mod environment;
pub mod error;
pub mod logging;
pub mod origin;
pub mod proxy;
pub mod registry;
pub mod state;
pub mod web;
