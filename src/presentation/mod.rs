// Presentation layer - Page entry points and startup wiring
pub mod app_state;
pub mod dashboard_page;
