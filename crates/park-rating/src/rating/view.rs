use super::aggregator::ParkRating;
use super::effect::Effect;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::io::Write;

/// Highest park rating the host simulation can award.
pub const MAX_PARK_RATING: i32 = 999;

/// Canonical display order: largest impact first, ties broken by rule order.
pub fn display_order(left: &Effect, right: &Effect) -> Ordering {
    right
        .impact
        .cmp(&left.impact)
        .then_with(|| left.order.cmp(&right.order))
}

/// Active effects of `rating`, sorted for display.
pub fn sorted_effects(rating: &ParkRating) -> Vec<&Effect> {
    let mut effects: Vec<&Effect> = rating.effects().collect();
    effects.sort_by(|left, right| display_order(left, right));
    effects
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactTone {
    AtMaximum,
    Positive,
    Negative,
    Neutral,
}

impl ImpactTone {
    pub fn of(effect: &Effect) -> Self {
        if effect.is_at_maximum() {
            Self::AtMaximum
        } else if effect.impact > 0 {
            Self::Positive
        } else if effect.impact < 0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AtMaximum => "At maximum",
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

/// One line of the breakdown table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectRow {
    pub name: String,
    pub value: String,
    pub impact: i32,
    /// Signed impact, e.g. `+100` or `-25`.
    pub impact_label: String,
    pub tone: ImpactTone,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i32>,
}

impl EffectRow {
    pub fn from_effect(effect: &Effect) -> Self {
        let tone = ImpactTone::of(effect);
        let impact_label = match tone {
            ImpactTone::AtMaximum if effect.impact > 0 => format!("+{}", effect.impact),
            ImpactTone::Positive => format!("+{}", effect.impact),
            _ => effect.impact.to_string(),
        };

        Self {
            name: effect.name.clone(),
            value: effect.value.clone(),
            impact: effect.impact,
            impact_label,
            tone,
            note: effect.note.clone(),
            maximum: effect.maximum,
        }
    }
}

/// Copy of the breakdown that stays valid across later recalculations.
#[derive(Debug, Clone, Serialize)]
pub struct RatingReport {
    pub total: i32,
    pub rating_label: String,
    pub effects: Vec<EffectRow>,
    pub generated_at: DateTime<Utc>,
}

impl RatingReport {
    pub fn capture(rating: &ParkRating) -> Self {
        let total = rating.total();
        Self {
            total,
            rating_label: format!("Current park rating: {total}/{MAX_PARK_RATING}"),
            effects: sorted_effects(rating)
                .into_iter()
                .map(EffectRow::from_effect)
                .collect(),
            generated_at: Utc::now(),
        }
    }

    /// Writes the rows as CSV with a header line.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["name", "value", "impact", "tone", "note", "maximum"])?;

        for row in &self.effects {
            let maximum = row.maximum.map(|max| max.to_string()).unwrap_or_default();
            csv_writer.write_record([
                row.name.as_str(),
                row.value.as_str(),
                row.impact_label.as_str(),
                row.tone.label(),
                row.note.as_str(),
                maximum.as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
