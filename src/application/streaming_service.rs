// Streaming dashboard service - Progressive loading, one message per evaluated indicator
use crate::application::history_repository::HistoryRepository;
use crate::application::indicator_service::{load_card, DASHBOARD_TITLE};
use crate::domain::card::KpiCard;
use crate::domain::catalog::IndicatorCatalog;
use crate::domain::indicator::Direction;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    Skeleton(DashboardSkeleton),
    Card(KpiCard),
    Complete(CompletionEvent),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSkeleton {
    pub title: String,
    pub groups: Vec<GroupSkeleton>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSkeleton {
    pub title: String,
    pub indicators: Vec<IndicatorSkeleton>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSkeleton {
    pub id: String,
    pub name: String,
    pub direction: Direction,
    pub unit_suffix: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    pub indicators: usize,
    pub duration_ms: u64,
}

#[derive(Clone)]
pub struct StreamingDashboardService {
    repository: Arc<dyn HistoryRepository>,
    catalog: Arc<IndicatorCatalog>,
}

impl StreamingDashboardService {
    pub fn new(repository: Arc<dyn HistoryRepository>, catalog: Arc<IndicatorCatalog>) -> Self {
        Self { repository, catalog }
    }

    /// Skeleton first, then cards in completion order, then a completion event.
    /// The receiver closes once the completion event is sent.
    pub async fn stream_dashboard(&self) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let start_time = Instant::now();

        // 1. Skeleton so the renderer can lay out every card up front
        let skeleton = self.build_skeleton();
        let _ = tx.send(StreamMessage::Skeleton(skeleton)).await;

        // 2. One task per indicator; evaluations are independent
        let mut handles = Vec::with_capacity(self.catalog.len());
        for definition in self.catalog.iter() {
            let tx = tx.clone();
            let repo = self.repository.clone();
            let definition = definition.clone();

            handles.push(tokio::spawn(async move {
                let card = load_card(repo.as_ref(), &definition).await;
                let _ = tx.send(StreamMessage::Card(card)).await;
            }));
        }

        // 3. Completion once every indicator task has finished
        let total = handles.len();
        tokio::spawn(async move {
            for result in futures::future::join_all(handles).await {
                if let Err(e) = result {
                    tracing::warn!("Indicator task failed: {}", e);
                }
            }

            let duration_ms = start_time.elapsed().as_millis() as u64;
            tracing::debug!("Streamed {} indicators in {}ms", total, duration_ms);
            let complete = CompletionEvent {
                indicators: total,
                duration_ms,
            };
            let _ = tx.send(StreamMessage::Complete(complete)).await;
        });

        rx
    }

    fn build_skeleton(&self) -> DashboardSkeleton {
        let groups = self
            .catalog
            .groups()
            .into_iter()
            .map(|(title, definitions)| GroupSkeleton {
                title,
                indicators: definitions
                    .iter()
                    .map(|d| IndicatorSkeleton {
                        id: d.id.clone(),
                        name: d.name.clone(),
                        direction: d.direction,
                        unit_suffix: d.unit_suffix.clone(),
                    })
                    .collect(),
            })
            .collect();

        DashboardSkeleton {
            title: DASHBOARD_TITLE.to_string(),
            groups,
        }
    }
}
