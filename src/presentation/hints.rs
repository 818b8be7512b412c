// Presentation hints - color, icon and wording a renderer uses for a verdict
use crate::domain::card::{CardState, KpiCard};
use crate::domain::indicator::Direction;
use serde::Serialize;

pub const COMPLIANT_COLOR: &str = "#1f77b4";
pub const NON_COMPLIANT_COLOR: &str = "red";
pub const NO_DATA_COLOR: &str = "gray";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresentationHint {
    pub color: &'static str,
    pub icon: &'static str,
    pub text: &'static str,
}

/// Non-compliant wording names the side of the target the value fell on
pub fn verdict_hint(meets_target: bool, direction: Direction) -> PresentationHint {
    if meets_target {
        return PresentationHint {
            color: COMPLIANT_COLOR,
            icon: "✅",
            text: "Dentro da meta",
        };
    }

    let text = match direction {
        Direction::HigherIsBetter => "Abaixo da meta",
        Direction::LowerIsBetter => "Acima da meta",
    };
    PresentationHint {
        color: NON_COMPLIANT_COLOR,
        icon: "⚠️",
        text,
    }
}

pub fn hint_for(card: &KpiCard) -> PresentationHint {
    match &card.state {
        CardState::Evaluated(reading) => verdict_hint(reading.meets_target, card.direction),
        CardState::NoData => PresentationHint {
            color: NO_DATA_COLOR,
            icon: "",
            text: "Sem dados",
        },
    }
}
