// Domain layer - Plain data records and the static widget catalog
pub mod catalog;
pub mod collaboration;
pub mod component;
pub mod dashboard;
pub mod envelope;
pub mod layout;
pub mod session;
