use crate::domain::catalog::IndicatorCatalog;
use crate::domain::error::KpiError;
use crate::domain::history::normalize_header;
use crate::domain::indicator::{ChartKind, ChartSpec, Direction, FieldMapping, IndicatorDefinition, TargetMode, UnitKind};
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    /// Directory holding one `<source>.csv` per history table
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { dir: default_data_dir() }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndicatorsConfig {
    #[serde(default)]
    pub indicators: Vec<IndicatorConfig>,
}

/// One `[[indicators]]` table, as written in the config file
#[derive(Debug, Deserialize, Clone)]
pub struct IndicatorConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group: String,
    pub source: String,
    pub value_field: String,
    pub target_field: Option<String>,
    pub period_field: Option<String>,
    pub order_field: Option<String>,
    pub period_label_format: Option<String>,
    pub projection_field: Option<String>,
    pub projection_unit: Option<String>,
    pub note_field: Option<String>,
    pub direction: String,
    pub unit: String,
    pub unit_suffix: Option<String>,
    pub precision: Option<usize>,
    pub target_mode: Option<String>,
    pub chart: Option<String>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub y_padding: Option<f64>,
}

impl IndicatorConfig {
    pub fn to_definition(&self) -> Result<IndicatorDefinition, KpiError> {
        let invalid = |reason: String| KpiError::configuration(&self.id, reason);

        let direction: Direction = self.direction.parse().map_err(invalid)?;
        let unit: UnitKind = self.unit.parse().map_err(invalid)?;
        let projection_unit = match &self.projection_unit {
            Some(raw) => raw.parse().map_err(invalid)?,
            None => unit,
        };
        let target_mode = match &self.target_mode {
            Some(raw) => raw.parse().map_err(invalid)?,
            None => TargetMode::default(),
        };
        let chart_kind = match &self.chart {
            Some(raw) => raw.parse().map_err(invalid)?,
            None => ChartKind::default(),
        };

        if self.value_field.trim().is_empty() {
            return Err(invalid("value_field is empty".to_string()));
        }
        if let (Some(min), Some(max)) = (self.y_min, self.y_max) {
            if min >= max {
                return Err(invalid(format!("y_min {} must be below y_max {}", min, max)));
            }
        }
        if let Some(padding) = self.y_padding {
            if !padding.is_finite() || padding < 0.0 {
                return Err(invalid(format!("y_padding {} must be a non-negative number", padding)));
            }
        }
        if let Some(format) = &self.period_label_format {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(invalid(format!("invalid period label format '{}'", format)));
            }
        }

        let mut definition = IndicatorDefinition::new(&self.id, &self.name, &self.value_field, direction, unit);
        definition.group = self.group.clone();
        definition.source = self.source.clone();
        definition.fields = self.field_mapping();
        definition.projection_unit = projection_unit;
        definition.target_mode = target_mode;
        definition.chart = ChartSpec {
            kind: chart_kind,
            y_min: self.y_min,
            y_max: self.y_max,
            y_padding: self.y_padding,
        };
        if let Some(suffix) = &self.unit_suffix {
            definition.unit_suffix = suffix.clone();
        }
        if let Some(precision) = self.precision {
            definition.precision = precision;
        }

        Ok(definition)
    }

    fn field_mapping(&self) -> FieldMapping {
        let mut fields = FieldMapping::new(&self.value_field);
        if let Some(target) = &self.target_field {
            fields.target = normalize_header(target);
        }
        if let Some(period) = &self.period_field {
            fields.period = normalize_header(period);
            fields.order = normalize_header(period);
        }
        if let Some(order) = &self.order_field {
            fields.order = normalize_header(order);
        }
        if let Some(projection) = &self.projection_field {
            fields.projection = normalize_header(projection);
        }
        if let Some(note) = &self.note_field {
            fields.note = normalize_header(note);
        }
        fields.period_label_format = self.period_label_format.clone();
        fields
    }
}

/// Validate every declared indicator; the first invalid one aborts
pub fn build_catalog(config: &IndicatorsConfig) -> Result<IndicatorCatalog, KpiError> {
    let definitions = config
        .indicators
        .iter()
        .map(IndicatorConfig::to_definition)
        .collect::<Result<Vec<_>, _>>()?;
    IndicatorCatalog::new(definitions)
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(config::Environment::with_prefix("RECAP").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_indicators_config() -> anyhow::Result<IndicatorsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/indicators"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn parse_indicators_config(toml: &str) -> anyhow::Result<IndicatorsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDICATORS: &str = r#"
[[indicators]]
id = "realizacao-semanal"
name = "Realização Semanal"
group = "Indicadores Contratuais"
source = "realizacao_semanal"
value_field = "Realização  Semanal"
direction = "maior"
unit = "ratio"

[[indicators]]
id = "disp-purgadores"
name = "Disp. Purgadores"
group = "Indicadores Cliente"
source = "disp_purgadores"
value_field = "IDP"
order_field = "DATA"
period_label_format = "%Y-%m"
direction = "higher_is_better"
unit = "ratio"
chart = "bar"
y_min = 70.0
precision = 1
"#;

    #[test]
    fn test_build_catalog_from_toml() {
        let config = parse_indicators_config(INDICATORS).unwrap();
        let catalog = build_catalog(&config).unwrap();
        assert_eq!(catalog.len(), 2);

        let realizacao = catalog.get("realizacao-semanal").unwrap();
        assert_eq!(realizacao.direction, Direction::HigherIsBetter);
        assert_eq!(realizacao.fields.value, "REALIZAÇÃO  SEMANAL");
        assert_eq!(realizacao.fields.target, "META");
        assert_eq!(realizacao.fields.order, "SEMANA");
        assert_eq!(realizacao.unit_suffix, "%");

        let purgadores = catalog.get("disp-purgadores").unwrap();
        assert_eq!(purgadores.fields.order, "DATA");
        assert_eq!(purgadores.fields.period, "SEMANA");
        assert_eq!(purgadores.fields.period_label_format.as_deref(), Some("%Y-%m"));
        assert_eq!(purgadores.chart.kind, ChartKind::Bar);
        assert_eq!(purgadores.chart.y_min, Some(70.0));
        assert_eq!(purgadores.precision, 1);
    }

    #[test]
    fn test_unknown_direction_is_configuration_error() {
        let config = parse_indicators_config(&INDICATORS.replace("\"maior\"", "\"igual\"")).unwrap();
        match build_catalog(&config) {
            Err(KpiError::Configuration { indicator, reason }) => {
                assert_eq!(indicator, "realizacao-semanal");
                assert!(reason.contains("igual"));
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_unit_is_configuration_error() {
        let config = parse_indicators_config(&INDICATORS.replace("unit = \"ratio\"\nchart", "unit = \"liters\"\nchart")).unwrap();
        assert!(matches!(build_catalog(&config), Err(KpiError::Configuration { .. })));
    }

    #[test]
    fn test_inverted_axis_bounds_are_rejected() {
        let config = parse_indicators_config(&INDICATORS.replace("y_min = 70.0", "y_min = 70.0\ny_max = 50.0")).unwrap();
        assert!(matches!(build_catalog(&config), Err(KpiError::Configuration { .. })));
    }

    #[test]
    fn test_negative_axis_padding_is_rejected() {
        let config = parse_indicators_config(&INDICATORS.replace("y_min = 70.0", "y_padding = -2.0")).unwrap();
        assert!(matches!(build_catalog(&config), Err(KpiError::Configuration { .. })));
    }

    #[test]
    fn test_shipped_catalog_is_valid() {
        let config = parse_indicators_config(include_str!("../../config/indicators.toml")).unwrap();
        let catalog = build_catalog(&config).unwrap();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.groups().len(), 2);
        assert_eq!(catalog.get("pfceo").unwrap().chart.y_padding, Some(2.0));
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.data.dir, PathBuf::from("data"));
    }
}
