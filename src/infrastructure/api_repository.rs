// REST-backed dashboard repository
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::component::{Component, ComponentDraft, LayoutItem};
use crate::domain::dashboard::{Dashboard, DashboardPatch, DashboardSummary, NewDashboard, Template};
use crate::domain::envelope::ApiResponse;
use crate::error::ApiError;
use crate::infrastructure::api_client::{ApiClient, RequestOptions};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct ApiDashboardRepository {
    client: ApiClient,
    options: RequestOptions,
}

#[derive(Serialize)]
struct LayoutPayload<'a> {
    layout: &'a [LayoutItem],
}

impl ApiDashboardRepository {
    pub fn new(client: ApiClient, options: RequestOptions) -> Self {
        Self { client, options }
    }

    fn segment(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }
}

#[async_trait]
impl DashboardRepository for ApiDashboardRepository {
    async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>, ApiError> {
        let response: ApiResponse<Vec<DashboardSummary>> =
            self.client.get("/dashboards", &self.options).await?;
        response.into_result()
    }

    async fn get_dashboard(&self, slug: &str) -> Result<Dashboard, ApiError> {
        let path = format!("/dashboards/{}", Self::segment(slug));
        let response: ApiResponse<Dashboard> = self.client.get(&path, &self.options).await?;
        response.into_result()
    }

    async fn create_dashboard(&self, dashboard: &NewDashboard) -> Result<Dashboard, ApiError> {
        let response: ApiResponse<Dashboard> =
            self.client.post("/dashboards", dashboard, &self.options).await?;
        response.into_result()
    }

    async fn update_dashboard(&self, dashboard_id: &str, patch: &DashboardPatch) -> Result<Dashboard, ApiError> {
        let path = format!("/dashboards/{}", Self::segment(dashboard_id));
        let response: ApiResponse<Dashboard> = self.client.patch(&path, patch, &self.options).await?;
        response.into_result()
    }

    async fn delete_dashboard(&self, dashboard_id: &str) -> Result<(), ApiError> {
        let path = format!("/dashboards/{}", Self::segment(dashboard_id));
        let response: Option<ApiResponse<Value>> = self.client.delete(&path, &self.options).await?;
        response.map_or(Ok(()), ApiResponse::into_unit)
    }

    async fn create_component(&self, dashboard_id: &str, draft: &ComponentDraft) -> Result<Component, ApiError> {
        let path = format!("/dashboards/{}/components", Self::segment(dashboard_id));
        let response: ApiResponse<Component> = self.client.post(&path, draft, &self.options).await?;
        response.into_result()
    }

    async fn update_component(&self, component_id: &str, changes: &Value) -> Result<Component, ApiError> {
        let path = format!("/components/{}", Self::segment(component_id));
        let response: ApiResponse<Component> = self.client.patch(&path, changes, &self.options).await?;
        response.into_result()
    }

    async fn replace_component(&self, component: &Component) -> Result<Component, ApiError> {
        let path = format!("/components/{}", Self::segment(&component.id));
        let response: ApiResponse<Component> = self.client.put(&path, component, &self.options).await?;
        response.into_result()
    }

    async fn delete_component(&self, component_id: &str) -> Result<(), ApiError> {
        let path = format!("/components/{}", Self::segment(component_id));
        let response: Option<ApiResponse<Value>> = self.client.delete(&path, &self.options).await?;
        response.map_or(Ok(()), ApiResponse::into_unit)
    }

    async fn component_data(&self, component_id: &str) -> Result<Value, ApiError> {
        let path = format!("/components/{}/data", Self::segment(component_id));
        let response: ApiResponse<Value> = self.client.get(&path, &self.options).await?;
        response.into_result()
    }

    async fn save_layout(&self, dashboard_id: &str, layout: &[LayoutItem]) -> Result<(), ApiError> {
        let path = format!("/dashboards/{}/layout", Self::segment(dashboard_id));
        let response: ApiResponse<Value> = self
            .client
            .put(&path, &LayoutPayload { layout }, &self.options)
            .await?;
        response.into_unit()
    }

    async fn list_templates(&self) -> Result<Vec<Template>, ApiError> {
        let response: ApiResponse<Vec<Template>> = self.client.get("/templates", &self.options).await?;
        response.into_result()
    }

    async fn create_from_template(&self, template_id: &str, title: &str) -> Result<Dashboard, ApiError> {
        let path = format!("/templates/{}/instantiate", Self::segment(template_id));
        let response: ApiResponse<Dashboard> = self
            .client
            .post(&path, &json!({ "title": title }), &self.options)
            .await?;
        response.into_result()
    }
}
