// Repository trait for dashboard data access
use crate::domain::component::{Component, ComponentDraft, LayoutItem};
use crate::domain::dashboard::{Dashboard, DashboardPatch, DashboardSummary, NewDashboard, Template};
use crate::error::ApiError;
use async_trait::async_trait;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>, ApiError>;

    /// Full dashboard, components included
    async fn get_dashboard(&self, slug: &str) -> Result<Dashboard, ApiError>;

    async fn create_dashboard(&self, dashboard: &NewDashboard) -> Result<Dashboard, ApiError>;

    async fn update_dashboard(&self, dashboard_id: &str, patch: &DashboardPatch) -> Result<Dashboard, ApiError>;

    async fn delete_dashboard(&self, dashboard_id: &str) -> Result<(), ApiError>;

    async fn create_component(&self, dashboard_id: &str, draft: &ComponentDraft) -> Result<Component, ApiError>;

    /// Partial update; `changes` holds only the fields being changed
    async fn update_component(&self, component_id: &str, changes: &serde_json::Value) -> Result<Component, ApiError>;

    async fn replace_component(&self, component: &Component) -> Result<Component, ApiError>;

    async fn delete_component(&self, component_id: &str) -> Result<(), ApiError>;

    /// Data bound to a widget (rows, series, metric value, ...)
    async fn component_data(&self, component_id: &str) -> Result<serde_json::Value, ApiError>;

    async fn save_layout(&self, dashboard_id: &str, layout: &[LayoutItem]) -> Result<(), ApiError>;

    async fn list_templates(&self) -> Result<Vec<Template>, ApiError>;

    async fn create_from_template(&self, template_id: &str, title: &str) -> Result<Dashboard, ApiError>;
}
