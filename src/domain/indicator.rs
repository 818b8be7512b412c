// Indicator definition domain model
use super::history::normalize_header;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Raw ratios above this magnitude are read as percentage points (92 -> 0.92).
/// Values in (1.0, 1.5] stay ratios; the boundary is a compatibility heuristic.
pub const PERCENT_POINTS_THRESHOLD: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl Direction {
    /// Boundary is inclusive in both directions
    pub fn meets_target(self, value: f64, target: f64) -> bool {
        match self {
            Direction::HigherIsBetter => value >= target,
            Direction::LowerIsBetter => value <= target,
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "higher_is_better" | "higher" | "maior" => Ok(Direction::HigherIsBetter),
            "lower_is_better" | "lower" | "menor" => Ok(Direction::LowerIsBetter),
            other => Err(format!("unknown comparison direction '{}'", other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::HigherIsBetter => write!(f, "higher is better"),
            Direction::LowerIsBetter => write!(f, "lower is better"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Ratio,
    Count,
    Duration,
}

impl UnitKind {
    /// Bring a raw reading onto the unit's canonical scale
    pub fn normalize(self, raw: f64) -> f64 {
        match self {
            UnitKind::Ratio if raw.abs() > PERCENT_POINTS_THRESHOLD => raw / 100.0,
            _ => raw,
        }
    }

    /// Multiplier the renderer applies when labelling normalized values
    pub fn display_scale(self) -> f64 {
        match self {
            UnitKind::Ratio => 100.0,
            UnitKind::Count | UnitKind::Duration => 1.0,
        }
    }

    pub fn default_suffix(self) -> &'static str {
        match self {
            UnitKind::Ratio => "%",
            UnitKind::Count => "",
            UnitKind::Duration => " dias",
        }
    }
}

impl FromStr for UnitKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ratio" | "%" | "percent" => Ok(UnitKind::Ratio),
            "count" => Ok(UnitKind::Count),
            "duration" | "days" => Ok(UnitKind::Duration),
            other => Err(format!("unknown unit kind '{}'", other)),
        }
    }
}

/// How the threshold of a chart is laid out across periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// Latest valid target broadcast to every period
    #[default]
    Scalar,
    PerPeriod,
}

impl FromStr for TargetMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scalar" => Ok(TargetMode::Scalar),
            "per_period" => Ok(TargetMode::PerPeriod),
            other => Err(format!("unknown target mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Area,
    Bar,
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "area" => Ok(ChartKind::Area),
            "bar" => Ok(ChartKind::Bar),
            other => Err(format!("unknown chart kind '{}'", other)),
        }
    }
}

/// Source columns an indicator reads. Names are stored normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub period: String,
    pub order: String,
    pub value: String,
    pub target: String,
    pub projection: String,
    pub note: String,
    /// chrono format for date-valued period keys, e.g. "%Y-%m"
    pub period_label_format: Option<String>,
}

pub const DEFAULT_PERIOD_FIELD: &str = "SEMANA";
pub const DEFAULT_TARGET_FIELD: &str = "META";
pub const DEFAULT_PROJECTION_FIELD: &str = "% AMEAÇAS INDICADOR MÊS";
pub const DEFAULT_NOTE_FIELD: &str = "DESCRIÇÃO DA META";

impl FieldMapping {
    pub fn new(value: &str) -> Self {
        Self {
            period: normalize_header(DEFAULT_PERIOD_FIELD),
            order: normalize_header(DEFAULT_PERIOD_FIELD),
            value: normalize_header(value),
            target: normalize_header(DEFAULT_TARGET_FIELD),
            projection: normalize_header(DEFAULT_PROJECTION_FIELD),
            note: normalize_header(DEFAULT_NOTE_FIELD),
            period_label_format: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    /// Unset bounds follow the plotted data, widened by this many display units
    pub y_padding: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorDefinition {
    pub id: String,
    pub name: String,
    pub group: String,
    pub source: String,
    pub fields: FieldMapping,
    pub direction: Direction,
    pub unit: UnitKind,
    pub projection_unit: UnitKind,
    pub unit_suffix: String,
    pub precision: usize,
    pub target_mode: TargetMode,
    pub chart: ChartSpec,
}

impl IndicatorDefinition {
    /// Definition with the conventional column names and display defaults
    pub fn new(id: &str, name: &str, value_field: &str, direction: Direction, unit: UnitKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            group: String::new(),
            source: id.to_string(),
            fields: FieldMapping::new(value_field),
            direction,
            unit,
            projection_unit: unit,
            unit_suffix: unit.default_suffix().to_string(),
            precision: 2,
            target_mode: TargetMode::default(),
            chart: ChartSpec {
                kind: ChartKind::default(),
                y_min: None,
                y_max: None,
                y_padding: None,
            },
        }
    }

    /// Render a normalized reading the way cards display it
    pub fn format_value(&self, normalized: f64) -> String {
        format!(
            "{:.*}{}",
            self.precision,
            normalized * self.unit.display_scale(),
            self.unit_suffix
        )
    }
}
