// JSON views - domain results decorated with presentation hints
use crate::application::streaming_service::{CompletionEvent, DashboardSkeleton, StreamMessage};
use crate::domain::card::KpiCard;
use crate::domain::chart::ChartData;
use crate::domain::dashboard::{Dashboard, IndicatorDetail};
use crate::domain::indicator::{Direction, IndicatorDefinition, UnitKind};
use crate::presentation::hints::{hint_for, PresentationHint};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSummary {
    pub id: String,
    pub name: String,
    pub group: String,
    pub direction: Direction,
    pub unit: UnitKind,
    pub unit_suffix: String,
}

impl From<&IndicatorDefinition> for IndicatorSummary {
    fn from(definition: &IndicatorDefinition) -> Self {
        Self {
            id: definition.id.clone(),
            name: definition.name.clone(),
            group: definition.group.clone(),
            direction: definition.direction,
            unit: definition.unit,
            unit_suffix: definition.unit_suffix.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CardView {
    #[serde(flatten)]
    pub card: KpiCard,
    pub hint: PresentationHint,
}

impl From<KpiCard> for CardView {
    fn from(card: KpiCard) -> Self {
        let hint = hint_for(&card);
        Self { card, hint }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupView {
    pub title: String,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub groups: Vec<GroupView>,
}

impl From<Dashboard> for DashboardView {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            title: dashboard.title,
            groups: dashboard
                .groups
                .into_iter()
                .map(|group| GroupView {
                    title: group.title,
                    cards: group.cards.into_iter().map(CardView::from).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetailView {
    pub card: CardView,
    pub chart: Option<ChartData>,
}

impl From<IndicatorDetail> for DetailView {
    fn from(detail: IndicatorDetail) -> Self {
        Self {
            card: CardView::from(detail.card),
            chart: detail.chart,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEventView {
    Skeleton(DashboardSkeleton),
    Card(CardView),
    Complete(CompletionEvent),
}

impl From<StreamMessage> for StreamEventView {
    fn from(msg: StreamMessage) -> Self {
        match msg {
            StreamMessage::Skeleton(skeleton) => StreamEventView::Skeleton(skeleton),
            StreamMessage::Card(card) => StreamEventView::Card(CardView::from(card)),
            StreamMessage::Complete(event) => StreamEventView::Complete(event),
        }
    }
}
