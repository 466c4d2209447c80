//! Confidence and summary heuristics for a scored route.
//!
//! Post-processes accumulated seat scores into a qualitative confidence tier
//! and a human-readable recommendation line.

use serde::Serialize;
use utoipa::ToSchema;

use crate::services::directions::RouteSegment;
use crate::services::scorer::{Seat, SeatScores};

// Three-tier thresholds, evaluated top-down; first match wins.
const HIGH_SUN_FRACTION: f64 = 0.7;
const HIGH_AVG_UV: f64 = 4.0;
const HIGH_RELATIVE_SPREAD: f64 = 0.3;
const MODERATE_SUN_FRACTION: f64 = 0.3;
const MODERATE_AVG_UV: f64 = 1.5;
const MODERATE_RELATIVE_SPREAD: f64 = 0.1;

/// Spread below which seats are treated as effectively equal.
const NEGLIGIBLE_SPREAD: f64 = 0.05;

/// How clear-cut the recommendation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Moderate,
    Low,
}

/// Classify recommendation confidence from three factors: the share of the
/// journey with the sun up, the average UV over those segments, and the
/// relative spread between the best and worst seat.
pub fn compute_confidence(segments: &[RouteSegment], scores: &SeatScores) -> Confidence {
    if segments.is_empty() {
        return Confidence::Low;
    }

    let sunny: Vec<f64> = segments
        .iter()
        .map(|s| s.uv_index)
        .filter(|&uv| uv > 0.0)
        .collect();
    if sunny.is_empty() {
        return Confidence::Low;
    }

    let sun_fraction = sunny.len() as f64 / segments.len() as f64;
    let avg_uv = sunny.iter().sum::<f64>() / sunny.len() as f64;
    let relative_spread = scores.relative_spread();

    if sun_fraction >= HIGH_SUN_FRACTION
        && avg_uv >= HIGH_AVG_UV
        && relative_spread >= HIGH_RELATIVE_SPREAD
    {
        return Confidence::High;
    }
    if sun_fraction >= MODERATE_SUN_FRACTION
        && avg_uv >= MODERATE_AVG_UV
        && relative_spread >= MODERATE_RELATIVE_SPREAD
    {
        return Confidence::Moderate;
    }
    Confidence::Low
}

/// Build the human-readable recommendation line.
///
/// Estimates "direct sun minutes" for the worst seat by allocating total
/// journey time proportionally to each seat's share of the accumulated
/// exposure. When all seats receive roughly equal sun (spread below 5%),
/// returns a fixed "no significant difference" message instead.
pub fn build_summary(
    best: Seat,
    worst: Seat,
    scores: &SeatScores,
    segments: &[RouteSegment],
) -> String {
    if scores.relative_spread() < NEGLIGIBLE_SPREAD {
        return "No significant difference between seats; sun exposure is roughly equal."
            .to_string();
    }

    let journey_minutes = match (segments.first(), segments.last()) {
        (Some(first), Some(last)) if segments.len() >= 2 => {
            (last.timestamp_utc - first.timestamp_utc) / 60.0
        }
        _ => 0.0,
    };

    let worst_score = scores.get(worst);
    let total_score = scores.total();

    if worst_score > 0.0 && journey_minutes > 0.0 && total_score > 0.0 {
        let sun_minutes = ((worst_score / total_score) * journey_minutes).round() as i64;
        format!(
            "{} recommended. {} gets ~{} min of direct sun.",
            best.label(),
            worst.label(),
            sun_minutes
        )
    } else {
        format!("{} recommended as the shadiest seat.", best.label())
    }
}
