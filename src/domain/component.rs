// Component (widget) domain model
use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of columns in the dashboard grid.
pub const GRID_COLUMNS: u32 = 12;

/// Supported widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    LineChart,
    BarChart,
    AreaChart,
    PieChart,
    ScatterChart,
    Table,
    MetricCard,
    Progress,
    Text,
    Image,
    Iframe,
    Spacer,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LineChart => "line-chart",
            Self::BarChart => "bar-chart",
            Self::AreaChart => "area-chart",
            Self::PieChart => "pie-chart",
            Self::ScatterChart => "scatter-chart",
            Self::Table => "table",
            Self::MetricCard => "metric-card",
            Self::Progress => "progress",
            Self::Text => "text",
            Self::Image => "image",
            Self::Iframe => "iframe",
            Self::Spacer => "spacer",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| GridError::UnknownComponentType(s.to_string()))
    }
}

/// Closed set of catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Chart,
    Data,
    Content,
    Layout,
}

impl ComponentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chart => "chart",
            Self::Data => "data",
            Self::Content => "content",
            Self::Layout => "layout",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement of a widget on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<u32>,
    #[serde(rename = "static", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_static: bool,
}

impl GridPosition {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            min_w: None,
            min_h: None,
            max_w: None,
            max_h: None,
            is_static: false,
        }
    }

    pub fn with_min(mut self, min_w: u32, min_h: u32) -> Self {
        self.min_w = Some(min_w);
        self.min_h = Some(min_h);
        self
    }

    pub fn with_max(mut self, max_w: u32, max_h: u32) -> Self {
        self.max_w = Some(max_w);
        self.max_h = Some(max_h);
        self
    }

    /// Row just below this item.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Check the size-bound invariants.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.w == 0 || self.h == 0 {
            return Err(GridError::InvalidPosition(format!(
                "size must be at least 1x1, got {}x{}",
                self.w, self.h
            )));
        }
        check_axis("w", self.w, self.min_w, self.max_w)?;
        check_axis("h", self.h, self.min_h, self.max_h)
    }

    /// Pull size and origin back inside the item's bounds and a grid of
    /// `columns` columns. Bounds themselves are kept as-is.
    pub fn clamp(&self, columns: u32) -> Self {
        let mut out = *self;
        out.w = clamp_axis(out.w, out.min_w, out.max_w).min(columns.max(1));
        out.h = clamp_axis(out.h, out.min_h, out.max_h);
        if out.x.saturating_add(out.w) > columns {
            out.x = columns.saturating_sub(out.w);
        }
        out
    }

    /// Copy `other`'s rectangle while keeping this item's bounds and flag.
    pub fn moved_to(&self, other: &GridPosition) -> Self {
        Self {
            x: other.x,
            y: other.y,
            w: other.w,
            h: other.h,
            ..*self
        }
    }
}

fn check_axis(axis: &str, value: u32, min: Option<u32>, max: Option<u32>) -> Result<(), GridError> {
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(GridError::InvalidPosition(format!(
                "min {axis} {lo} exceeds max {axis} {hi}"
            )));
        }
    }
    if let Some(lo) = min {
        if value < lo {
            return Err(GridError::InvalidPosition(format!("{axis} {value} below min {lo}")));
        }
    }
    if let Some(hi) = max {
        if value > hi {
            return Err(GridError::InvalidPosition(format!("{axis} {value} above max {hi}")));
        }
    }
    Ok(())
}

fn clamp_axis(value: u32, min: Option<u32>, max: Option<u32>) -> u32 {
    let mut v = value.max(min.unwrap_or(1)).max(1);
    if let Some(hi) = max {
        v = v.min(hi.max(1));
    }
    v
}

/// A widget placed on a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub dashboard_id: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub title: String,
    #[serde(default)]
    pub config: serde_json::Value,
    pub position: GridPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

/// Payload for creating a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDraft {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub title: String,
    pub config: serde_json::Value,
    pub position: GridPosition,
}

/// One entry of a bulk layout save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    pub component_id: String,
    pub position: GridPosition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_type_keys() {
        assert_eq!("metric-card".parse::<ComponentType>().unwrap(), ComponentType::MetricCard);
        assert_eq!(ComponentType::LineChart.to_string(), "line-chart");
        assert!("unknown-type".parse::<ComponentType>().is_err());
    }

    #[test]
    fn test_validate_bounds() {
        let pos = GridPosition::new(0, 0, 2, 3).with_min(3, 2);
        assert!(pos.validate().is_err());

        let pos = GridPosition::new(0, 0, 4, 3).with_min(3, 2).with_max(6, 4);
        assert!(pos.validate().is_ok());

        let pos = GridPosition::new(0, 0, 0, 3);
        assert!(pos.validate().is_err());
    }

    #[test]
    fn test_clamp_to_bounds_and_columns() {
        let pos = GridPosition::new(10, 0, 1, 9).with_min(3, 2).with_max(6, 4);
        let clamped = pos.clamp(GRID_COLUMNS);
        assert_eq!((clamped.x, clamped.w, clamped.h), (9, 3, 4));
        assert!(clamped.validate().is_ok());
    }

    #[test]
    fn test_extreme_coordinates_saturate() {
        let clamped = GridPosition::new(u32::MAX, 0, 3, 2).clamp(GRID_COLUMNS);
        assert_eq!((clamped.x, clamped.w), (9, 3));

        assert_eq!(GridPosition::new(0, u32::MAX, 3, 2).bottom(), u32::MAX);
    }

    #[test]
    fn test_position_wire_shape() {
        let mut pos = GridPosition::new(1, 2, 3, 4).with_min(2, 2);
        pos.is_static = true;
        let json = serde_json::to_value(pos).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"x": 1, "y": 2, "w": 3, "h": 4, "minW": 2, "minH": 2, "static": true})
        );

        let back: GridPosition =
            serde_json::from_value(serde_json::json!({"x": 0, "y": 0, "w": 4, "h": 2})).unwrap();
        assert!(!back.is_static);
        assert_eq!(back.max_w, None);
    }
}
