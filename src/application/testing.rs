// In-memory repository for service tests
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::component::{Component, ComponentDraft, GridPosition, LayoutItem};
use crate::domain::dashboard::{Dashboard, DashboardPatch, DashboardSummary, NewDashboard, Template};
use crate::error::ApiError;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Notify;

pub struct MemoryRepository {
    dashboard: Mutex<Dashboard>,
    next_id: Mutex<u32>,
    layouts: Mutex<Vec<Vec<LayoutItem>>>,
    deleted: Mutex<bool>,
    update_gate: Mutex<Option<Arc<Notify>>>,
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("{what} not found"),
        code: Some("NOT_FOUND".to_string()),
    }
}

impl MemoryRepository {
    pub fn with_dashboard(id: &str, slug: &str) -> Self {
        Self {
            dashboard: Mutex::new(Dashboard {
                id: id.to_string(),
                slug: slug.to_string(),
                title: slug.to_uppercase(),
                description: None,
                is_public: false,
                components: Vec::new(),
                created_at: None,
                updated_at: None,
            }),
            next_id: Mutex::new(0),
            layouts: Mutex::new(Vec::new()),
            deleted: Mutex::new(false),
            update_gate: Mutex::new(None),
        }
    }

    pub fn component_count(&self) -> usize {
        self.dashboard.lock().components.len()
    }

    pub fn make_static(&self, component_id: &str) {
        if let Some(c) = self
            .dashboard
            .lock()
            .components
            .iter_mut()
            .find(|c| c.id == component_id)
        {
            c.position.is_static = true;
        }
    }

    /// Park every later `update_component` call until the returned handle is
    /// notified, once per call.
    pub fn hold_updates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.update_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn is_deleted(&self) -> bool {
        *self.deleted.lock()
    }

    pub fn saved_layouts(&self) -> Vec<Vec<LayoutItem>> {
        self.layouts.lock().clone()
    }

    fn with_component<T>(
        &self,
        component_id: &str,
        f: impl FnOnce(&mut Component) -> T,
    ) -> Result<T, ApiError> {
        let mut dashboard = self.dashboard.lock();
        let component = dashboard
            .components
            .iter_mut()
            .find(|c| c.id == component_id)
            .ok_or_else(|| not_found("component"))?;
        Ok(f(component))
    }
}

#[async_trait]
impl DashboardRepository for MemoryRepository {
    async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>, ApiError> {
        let d = self.dashboard.lock();
        Ok(vec![DashboardSummary {
            id: d.id.clone(),
            slug: d.slug.clone(),
            title: d.title.clone(),
            description: d.description.clone(),
            updated_at: None,
        }])
    }

    async fn get_dashboard(&self, slug: &str) -> Result<Dashboard, ApiError> {
        let d = self.dashboard.lock();
        if d.slug == slug && !self.is_deleted() {
            Ok(d.clone())
        } else {
            Err(not_found("dashboard"))
        }
    }

    async fn create_dashboard(&self, dashboard: &NewDashboard) -> Result<Dashboard, ApiError> {
        Ok(Dashboard {
            id: "new".to_string(),
            slug: dashboard.title.to_lowercase().replace(' ', "-"),
            title: dashboard.title.clone(),
            description: dashboard.description.clone(),
            is_public: dashboard.is_public,
            components: Vec::new(),
            created_at: None,
            updated_at: None,
        })
    }

    async fn update_dashboard(&self, dashboard_id: &str, patch: &DashboardPatch) -> Result<Dashboard, ApiError> {
        let mut d = self.dashboard.lock();
        if d.id != dashboard_id {
            return Err(not_found("dashboard"));
        }
        if let Some(title) = &patch.title {
            d.title = title.clone();
        }
        if let Some(description) = &patch.description {
            d.description = Some(description.clone());
        }
        if let Some(is_public) = patch.is_public {
            d.is_public = is_public;
        }
        // Metadata only
        Ok(Dashboard {
            components: Vec::new(),
            ..d.clone()
        })
    }

    async fn delete_dashboard(&self, dashboard_id: &str) -> Result<(), ApiError> {
        if self.dashboard.lock().id != dashboard_id {
            return Err(not_found("dashboard"));
        }
        *self.deleted.lock() = true;
        Ok(())
    }

    async fn create_component(&self, dashboard_id: &str, draft: &ComponentDraft) -> Result<Component, ApiError> {
        let id = {
            let mut next = self.next_id.lock();
            *next += 1;
            let n = *next;
            format!("c{n}")
        };
        let component = Component {
            id,
            dashboard_id: dashboard_id.to_string(),
            component_type: draft.component_type,
            title: draft.title.clone(),
            config: draft.config.clone(),
            position: draft.position,
            data_source: None,
        };
        self.dashboard.lock().components.push(component.clone());
        Ok(component)
    }

    async fn update_component(&self, component_id: &str, changes: &Value) -> Result<Component, ApiError> {
        let gate = self.update_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let position = match changes.get("position") {
            Some(p) => Some(
                serde_json::from_value::<GridPosition>(p.clone())
                    .map_err(|e| ApiError::Status {
                        status: 400,
                        message: e.to_string(),
                        code: None,
                    })?,
            ),
            None => None,
        };
        self.with_component(component_id, |c| {
            if let Some(title) = changes.get("title").and_then(Value::as_str) {
                c.title = title.to_string();
            }
            if let Some(config) = changes.get("config") {
                c.config = config.clone();
            }
            if let Some(position) = position {
                c.position = position;
            }
            c.clone()
        })
    }

    async fn replace_component(&self, component: &Component) -> Result<Component, ApiError> {
        self.with_component(&component.id, |c| {
            *c = component.clone();
            c.clone()
        })
    }

    async fn delete_component(&self, component_id: &str) -> Result<(), ApiError> {
        let mut d = self.dashboard.lock();
        let before = d.components.len();
        d.components.retain(|c| c.id != component_id);
        if d.components.len() == before {
            return Err(not_found("component"));
        }
        Ok(())
    }

    async fn component_data(&self, component_id: &str) -> Result<Value, ApiError> {
        self.with_component(component_id, |c| json!({"rows": [], "component": c.id}))
    }

    async fn save_layout(&self, _dashboard_id: &str, layout: &[LayoutItem]) -> Result<(), ApiError> {
        self.layouts.lock().push(layout.to_vec());
        Ok(())
    }

    async fn list_templates(&self) -> Result<Vec<Template>, ApiError> {
        Ok(Vec::new())
    }

    async fn create_from_template(&self, _template_id: &str, title: &str) -> Result<Dashboard, ApiError> {
        self.create_dashboard(&NewDashboard::new(title)).await
    }
}
