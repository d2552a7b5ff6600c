pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod mail;
pub mod shutdown;
