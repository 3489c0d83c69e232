// Widget catalog - static metadata and defaults per component type
use super::component::{ComponentCategory, ComponentDraft, ComponentType, GridPosition};
use serde_json::{json, Value};
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentTypeInfo {
    pub component_type: ComponentType,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: ComponentCategory,
    pub default_config: Value,
    pub default_position: GridPosition,
}

impl ComponentTypeInfo {
    /// Build a create payload from this entry's defaults.
    pub fn instantiate(&self, title: Option<&str>) -> ComponentDraft {
        ComponentDraft {
            component_type: self.component_type,
            title: title.unwrap_or(self.label).to_string(),
            config: self.default_config.clone(),
            position: self.default_position,
        }
    }
}

fn entry(
    component_type: ComponentType,
    label: &'static str,
    description: &'static str,
    icon: &'static str,
    category: ComponentCategory,
    default_config: Value,
    default_position: GridPosition,
) -> ComponentTypeInfo {
    ComponentTypeInfo {
        component_type,
        label,
        description,
        icon,
        category,
        default_config,
        default_position,
    }
}

static CATALOG: LazyLock<Vec<ComponentTypeInfo>> = LazyLock::new(|| {
    use ComponentCategory::*;
    use ComponentType::*;

    vec![
        entry(
            LineChart,
            "Line Chart",
            "Trends over time as connected points",
            "chart-line",
            Chart,
            json!({"xAxis": "date", "yAxis": "value", "showLegend": true, "smooth": false}),
            GridPosition::new(0, 0, 6, 4).with_min(3, 3),
        ),
        entry(
            BarChart,
            "Bar Chart",
            "Compare values across categories",
            "chart-bar",
            Chart,
            json!({"xAxis": "category", "yAxis": "value", "showLegend": true, "stacked": false}),
            GridPosition::new(0, 0, 6, 4).with_min(3, 3),
        ),
        entry(
            AreaChart,
            "Area Chart",
            "Cumulative trends with filled regions",
            "chart-area",
            Chart,
            json!({"xAxis": "date", "yAxis": "value", "showLegend": true, "stacked": false}),
            GridPosition::new(0, 0, 6, 4).with_min(3, 3),
        ),
        entry(
            PieChart,
            "Pie Chart",
            "Proportions of a whole",
            "chart-pie",
            Chart,
            json!({"labelKey": "name", "valueKey": "value", "showLegend": true, "donut": false}),
            GridPosition::new(0, 0, 4, 4).with_min(3, 3).with_max(8, 8),
        ),
        entry(
            ScatterChart,
            "Scatter Plot",
            "Correlation between two measures",
            "chart-scatter",
            Chart,
            json!({"xAxis": "x", "yAxis": "y", "showLegend": false}),
            GridPosition::new(0, 0, 6, 4).with_min(3, 3),
        ),
        entry(
            Table,
            "Table",
            "Rows and columns of raw records",
            "table",
            Data,
            json!({"columns": [], "pageSize": 10, "sortable": true, "filterable": false}),
            GridPosition::new(0, 0, 8, 5).with_min(4, 3),
        ),
        entry(
            MetricCard,
            "Metric Card",
            "A single headline number with trend",
            "gauge",
            Data,
            json!({"valueKey": "value", "format": "number", "showTrend": true}),
            GridPosition::new(0, 0, 3, 2).with_min(2, 2).with_max(6, 4),
        ),
        entry(
            Progress,
            "Progress",
            "Progress toward a target",
            "progress",
            Data,
            json!({"valueKey": "value", "target": 100, "showPercentage": true}),
            GridPosition::new(0, 0, 4, 2).with_min(2, 1).with_max(12, 3),
        ),
        entry(
            Text,
            "Text",
            "Rich text notes and headings",
            "type",
            Content,
            json!({"content": "", "markdown": true}),
            GridPosition::new(0, 0, 4, 2).with_min(1, 1),
        ),
        entry(
            Image,
            "Image",
            "A static image or logo",
            "image",
            Content,
            json!({"src": "", "alt": "", "fit": "contain"}),
            GridPosition::new(0, 0, 4, 3).with_min(1, 1),
        ),
        entry(
            Iframe,
            "Embed",
            "Embedded external page",
            "globe",
            Content,
            json!({"url": "", "allowFullscreen": false}),
            GridPosition::new(0, 0, 6, 4).with_min(2, 2),
        ),
        entry(
            Spacer,
            "Spacer",
            "Empty space for layout",
            "square-dashed",
            Layout,
            json!({}),
            GridPosition::new(0, 0, 2, 1).with_min(1, 1),
        ),
    ]
});

/// Every catalog entry in declaration order.
pub fn catalog() -> &'static [ComponentTypeInfo] {
    &CATALOG
}

/// Look up a widget type by its string key. Unknown keys yield `None`.
pub fn get_component_type_info(type_key: &str) -> Option<&'static ComponentTypeInfo> {
    CATALOG
        .iter()
        .find(|info| info.component_type.as_str() == type_key)
}

/// Typed variant of [`get_component_type_info`].
pub fn component_type_info(component_type: ComponentType) -> Option<&'static ComponentTypeInfo> {
    CATALOG
        .iter()
        .find(|info| info.component_type == component_type)
}

/// All entries of `category`, in declaration order.
pub fn get_components_by_category(category: ComponentCategory) -> Vec<&'static ComponentTypeInfo> {
    CATALOG.iter().filter(|info| info.category == category).collect()
}
