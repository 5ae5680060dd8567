mod app_context;
mod credentials;
mod file_store;
mod helpers;
mod request_authorizer;
