pub mod auth;
pub mod config;
pub mod connectivity;
pub mod context;
pub mod credentials;
pub mod error;
pub mod error_signal;
pub mod login;
pub mod navigation;
pub mod request;
pub mod session;
pub mod storage;

#[cfg(test)]
mod tests;

pub use context::AppContext;
