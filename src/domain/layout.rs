// Local grid state for one open dashboard
use super::collaboration::ComponentUpdated;
use super::component::{Component, GRID_COLUMNS, GridPosition, LayoutItem};
use super::dashboard::Dashboard;
use serde_json::Value;

/// A hydrated dashboard whose component list is edited in place as layout
/// changes are made locally or arrive from other viewers.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    dashboard: Dashboard,
}

impl GridLayout {
    pub fn new(dashboard: Dashboard) -> Self {
        Self { dashboard }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dashboard_id(&self) -> &str {
        &self.dashboard.id
    }

    pub fn slug(&self) -> &str {
        &self.dashboard.slug
    }

    pub fn components(&self) -> &[Component] {
        &self.dashboard.components
    }

    pub fn get(&self, component_id: &str) -> Option<&Component> {
        self.dashboard.components.iter().find(|c| c.id == component_id)
    }

    /// First free row below every component.
    pub fn bottom(&self) -> u32 {
        self.dashboard
            .components
            .iter()
            .map(|c| c.position.bottom())
            .max()
            .unwrap_or(0)
    }

    /// Take new dashboard metadata while keeping the local component list.
    pub fn update_metadata(&mut self, mut dashboard: Dashboard) {
        dashboard.components = std::mem::take(&mut self.dashboard.components);
        self.dashboard = dashboard;
    }

    /// Insert, or replace the component with the same id.
    pub fn upsert(&mut self, component: Component) {
        match self
            .dashboard
            .components
            .iter_mut()
            .find(|c| c.id == component.id)
        {
            Some(existing) => *existing = component,
            None => self.dashboard.components.push(component),
        }
    }

    pub fn remove(&mut self, component_id: &str) -> Option<Component> {
        let idx = self
            .dashboard
            .components
            .iter()
            .position(|c| c.id == component_id)?;
        Some(self.dashboard.components.remove(idx))
    }

    /// Every component's current position, for a bulk save.
    pub fn layout_items(&self) -> Vec<LayoutItem> {
        self.dashboard
            .components
            .iter()
            .map(|c| LayoutItem {
                component_id: c.id.clone(),
                position: c.position,
            })
            .collect()
    }

    /// Merge a change made by another viewer. Recognized keys are `title`,
    /// `config` and `position`; anything else is ignored. Returns whether the
    /// component was found.
    pub fn apply_remote(&mut self, update: &ComponentUpdated) -> bool {
        let Some(component) = self
            .dashboard
            .components
            .iter_mut()
            .find(|c| c.id == update.component_id)
        else {
            return false;
        };

        if let Some(title) = update.changes.get("title").and_then(Value::as_str) {
            component.title = title.to_string();
        }
        if let Some(config) = update.changes.get("config") {
            component.config = config.clone();
        }
        if let Some(position) = update.changes.get("position") {
            match serde_json::from_value::<GridPosition>(position.clone()) {
                Ok(position) => {
                    component.position = component.position.moved_to(&position).clamp(GRID_COLUMNS);
                }
                Err(e) => {
                    tracing::warn!(component = %update.component_id, error = %e, "Ignoring malformed remote position");
                }
            }
        }
        true
    }
}
