mod auth;
mod config;
mod error_signal;
mod helpers;
mod identity;
mod session_store;
