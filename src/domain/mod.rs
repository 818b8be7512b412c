// Domain layer - KPI evaluation core, free of I/O
pub mod card;
pub mod catalog;
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod evaluation;
pub mod extractor;
pub mod history;
pub mod indicator;
pub mod projection;
pub mod series;
