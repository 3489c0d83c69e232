// Infrastructure layer - External dependencies and adapters
pub mod api_client;
pub mod api_repository;
pub mod config;
pub mod http_transport;
pub mod realtime;
pub mod realtime_transport;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
