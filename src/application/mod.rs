// Application layer - Use cases over the repository and realtime seams
pub mod auth_gate;
pub mod collaboration_service;
pub mod dashboard_repository;
pub mod dashboard_service;

#[cfg(test)]
pub(crate) mod testing;
