// KPI evaluation and threshold segmentation for periodic operational indicators
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
