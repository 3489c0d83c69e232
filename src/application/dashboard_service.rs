// Dashboard service - Hydrating dashboards and persisting grid edits
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::catalog::get_component_type_info;
use crate::domain::component::{Component, GRID_COLUMNS, GridPosition};
use crate::domain::dashboard::{Dashboard, DashboardPatch, DashboardSummary, NewDashboard, Template};
use crate::domain::layout::GridLayout;
use crate::error::GridError;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn DashboardRepository>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn DashboardRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_dashboards(&self) -> anyhow::Result<Vec<DashboardSummary>> {
        Ok(self.repository.list_dashboards().await?)
    }

    pub async fn create_dashboard(&self, dashboard: NewDashboard) -> anyhow::Result<Dashboard> {
        Ok(self.repository.create_dashboard(&dashboard).await?)
    }

    /// Rename or re-describe the open dashboard.
    pub async fn update_dashboard(&self, layout: &mut GridLayout, patch: &DashboardPatch) -> anyhow::Result<()> {
        let updated = self
            .repository
            .update_dashboard(layout.dashboard_id(), patch)
            .await?;
        layout.update_metadata(updated);
        Ok(())
    }

    pub async fn delete_dashboard(&self, layout: GridLayout) -> anyhow::Result<()> {
        self.repository.delete_dashboard(layout.dashboard_id()).await?;
        tracing::info!("Deleted dashboard {}", layout.slug());
        Ok(())
    }

    pub async fn list_templates(&self) -> anyhow::Result<Vec<Template>> {
        Ok(self.repository.list_templates().await?)
    }

    pub async fn create_from_template(&self, template_id: &str, title: &str) -> anyhow::Result<GridLayout> {
        let dashboard = self.repository.create_from_template(template_id, title).await?;
        Ok(GridLayout::new(dashboard))
    }

    pub async fn load(&self, slug: &str) -> anyhow::Result<GridLayout> {
        let dashboard = self.repository.get_dashboard(slug).await?;
        tracing::debug!(
            "Loaded dashboard {} with {} components",
            dashboard.slug,
            dashboard.components.len()
        );
        Ok(GridLayout::new(dashboard))
    }

    /// Create a widget of catalog type `type_key` below the current layout.
    pub async fn add_component(
        &self,
        layout: &mut GridLayout,
        type_key: &str,
        title: Option<&str>,
    ) -> anyhow::Result<Component> {
        let info = get_component_type_info(type_key)
            .ok_or_else(|| GridError::UnknownComponentType(type_key.to_string()))?;

        let mut draft = info.instantiate(title);
        draft.position.y = layout.bottom();
        draft.position = draft.position.clamp(GRID_COLUMNS);

        let created = self
            .repository
            .create_component(layout.dashboard_id(), &draft)
            .await?;
        layout.upsert(created.clone());
        Ok(created)
    }

    /// Persist a drag/resize result. The rectangle is clamped to the
    /// component's own bounds and the grid width before saving.
    pub async fn move_component(
        &self,
        layout: &mut GridLayout,
        component_id: &str,
        target: GridPosition,
    ) -> anyhow::Result<Component> {
        let current = layout
            .get(component_id)
            .ok_or_else(|| GridError::ComponentNotFound(component_id.to_string()))?;
        if current.position.is_static {
            return Err(GridError::StaticComponent(component_id.to_string()).into());
        }

        let position = current.position.moved_to(&target).clamp(GRID_COLUMNS);
        let changes = json!({ "position": position });
        let updated = self
            .repository
            .update_component(component_id, &changes)
            .await?;
        layout.upsert(updated.clone());
        Ok(updated)
    }

    pub async fn rename_component(
        &self,
        layout: &mut GridLayout,
        component_id: &str,
        title: &str,
    ) -> anyhow::Result<Component> {
        if layout.get(component_id).is_none() {
            return Err(GridError::ComponentNotFound(component_id.to_string()).into());
        }
        let updated = self
            .repository
            .update_component(component_id, &json!({ "title": title }))
            .await?;
        layout.upsert(updated.clone());
        Ok(updated)
    }

    /// Replace a component's whole configuration.
    pub async fn update_config(
        &self,
        layout: &mut GridLayout,
        component_id: &str,
        config: Value,
    ) -> anyhow::Result<Component> {
        let mut component = layout
            .get(component_id)
            .cloned()
            .ok_or_else(|| GridError::ComponentNotFound(component_id.to_string()))?;
        component.config = config;

        let replaced = self.repository.replace_component(&component).await?;
        layout.upsert(replaced.clone());
        Ok(replaced)
    }

    pub async fn remove_component(&self, layout: &mut GridLayout, component_id: &str) -> anyhow::Result<()> {
        if layout.get(component_id).is_none() {
            return Err(GridError::ComponentNotFound(component_id.to_string()).into());
        }
        self.repository.delete_component(component_id).await?;
        layout.remove(component_id);
        Ok(())
    }

    pub async fn save_layout(&self, layout: &GridLayout) -> anyhow::Result<()> {
        let items = layout.layout_items();
        self.repository
            .save_layout(layout.dashboard_id(), &items)
            .await?;
        Ok(())
    }

    pub async fn component_data(&self, component_id: &str) -> anyhow::Result<Value> {
        Ok(self.repository.component_data(component_id).await?)
    }
}
