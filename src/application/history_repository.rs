// Repository trait for indicator history access
use crate::domain::history::HistoryRow;
use async_trait::async_trait;

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// List the history tables the source can serve
    async fn list_sources(&self) -> anyhow::Result<Vec<String>>;

    /// Load every row of a history table, in source order
    async fn load_rows(&self, source: &str) -> anyhow::Result<Vec<HistoryRow>>;
}
