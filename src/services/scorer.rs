//! Per-seat sun exposure scoring across route segments.
//!
//! The algorithmic core: a streaming reduction over segments. Each segment
//! queries the solar provider once, converts the sun's bearing into the
//! vehicle's frame of reference, and adds a cosine-weighted contribution to
//! every seat whose window faces within 90° of the sun.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::helpers::round_dp;
use crate::services::directions::RouteSegment;
use crate::services::geo::angular_diff;
use crate::services::solar::SolarPositionProvider;

/// The four seat positions. The declaration order (FL, FR, RL, RR) is the
/// tie-break rule when scores are equal: scans for min/max keep the first
/// seat encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Seat {
    #[serde(rename = "FL")]
    FrontLeft,
    #[serde(rename = "FR")]
    FrontRight,
    #[serde(rename = "RL")]
    RearLeft,
    #[serde(rename = "RR")]
    RearRight,
}

impl Seat {
    pub const ALL: [Seat; 4] = [
        Seat::FrontLeft,
        Seat::FrontRight,
        Seat::RearLeft,
        Seat::RearRight,
    ];

    /// Angle the seat's window faces, clockwise from the vehicle nose:
    /// 0° = windshield, 90° = right doors, 180° = rear window, 270° = left doors.
    pub fn window_facing_deg(self) -> f64 {
        match self {
            Seat::FrontLeft | Seat::RearLeft => 270.0,
            Seat::FrontRight | Seat::RearRight => 90.0,
        }
    }

    /// Display name used in summary sentences.
    pub fn label(self) -> &'static str {
        match self {
            Seat::FrontLeft => "Front Left",
            Seat::FrontRight => "Front Right",
            Seat::RearLeft => "Rear Left",
            Seat::RearRight => "Rear Right",
        }
    }
}

/// Which front seat is the driver's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum DriveSide {
    /// Driver sits front-left.
    #[default]
    #[serde(rename = "LHD")]
    LeftHandDrive,
    /// Driver sits front-right.
    #[serde(rename = "RHD")]
    RightHandDrive,
}

impl DriveSide {
    pub fn driver_seat(self) -> Seat {
        match self {
            DriveSide::LeftHandDrive => Seat::FrontLeft,
            DriveSide::RightHandDrive => Seat::FrontRight,
        }
    }
}

/// Accumulated exposure per seat, serialized with the seat codes as keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct SeatScores {
    #[serde(rename = "FL")]
    pub front_left: f64,
    #[serde(rename = "FR")]
    pub front_right: f64,
    #[serde(rename = "RL")]
    pub rear_left: f64,
    #[serde(rename = "RR")]
    pub rear_right: f64,
}

impl SeatScores {
    pub fn get(&self, seat: Seat) -> f64 {
        match seat {
            Seat::FrontLeft => self.front_left,
            Seat::FrontRight => self.front_right,
            Seat::RearLeft => self.rear_left,
            Seat::RearRight => self.rear_right,
        }
    }

    fn get_mut(&mut self, seat: Seat) -> &mut f64 {
        match seat {
            Seat::FrontLeft => &mut self.front_left,
            Seat::FrontRight => &mut self.front_right,
            Seat::RearLeft => &mut self.rear_left,
            Seat::RearRight => &mut self.rear_right,
        }
    }

    /// Seat with the lowest score; ties keep the earliest seat in `Seat::ALL`.
    pub fn min_seat(&self) -> Seat {
        let mut best = Seat::ALL[0];
        for &seat in &Seat::ALL[1..] {
            if self.get(seat) < self.get(best) {
                best = seat;
            }
        }
        best
    }

    /// Seat with the highest score; ties keep the earliest seat in `Seat::ALL`.
    pub fn max_seat(&self) -> Seat {
        let mut worst = Seat::ALL[0];
        for &seat in &Seat::ALL[1..] {
            if self.get(seat) > self.get(worst) {
                worst = seat;
            }
        }
        worst
    }

    pub fn total(&self) -> f64 {
        self.front_left + self.front_right + self.rear_left + self.rear_right
    }

    /// Normalized spread between the sunniest and shadiest seat — a proxy
    /// for how clear-cut the recommendation is. Zero when nothing scored.
    pub fn relative_spread(&self) -> f64 {
        let worst = self.get(self.max_seat());
        let best = self.get(self.min_seat());
        if worst > 0.0 {
            (worst - best) / worst
        } else {
            0.0
        }
    }
}

/// Outcome of scoring a full route.
#[derive(Debug, Clone)]
pub struct ScoredSeats {
    pub scores: SeatScores,
    /// Seat with the lowest accumulated exposure (shadiest).
    pub best_seat: Seat,
    /// Seat with the highest accumulated exposure (sunniest).
    pub worst_seat: Seat,
    pub driver_seat: Seat,
}

/// Accumulate sun-exposure scores for all four seats over a segment sequence.
///
/// An empty sequence yields all-zero scores with best/worst still resolved
/// deterministically. A failed solar lookup skips that segment (it
/// contributes zero): the enricher's time-of-day fallback can fabricate a UV
/// level but not an azimuth, and a fabricated azimuth would bias the seat
/// geometry.
pub fn score_seats<P: SolarPositionProvider>(
    provider: &P,
    segments: &[RouteSegment],
    drive_side: DriveSide,
) -> ScoredSeats {
    let mut scores = SeatScores::default();

    for seg in segments {
        let sun = match provider.sun_position(seg.lat, seg.lng, seg.timestamp_utc) {
            Ok(sun) => sun,
            Err(e) => {
                tracing::warn!(
                    "Solar lookup failed while scoring segment at ({:.4}, {:.4}): {}; skipping",
                    seg.lat,
                    seg.lng,
                    e
                );
                continue;
            }
        };

        // Sun below the horizon contributes nothing, whatever the geometry.
        if sun.elevation <= 0.0 {
            continue;
        }

        // The sun's bearing in the vehicle's frame of reference.
        let relative_angle = (sun.azimuth - seg.heading_degrees).rem_euclid(360.0);

        // Effective weight: UV intensity reduced by cloud opacity.
        let weight = seg.uv_index * (1.0 - seg.cloud_cover_pct / 100.0);
        if weight <= 0.0 {
            continue;
        }

        for seat in Seat::ALL {
            let diff = angular_diff(relative_angle, seat.window_facing_deg());
            // 1.0 when the sun is square-on to the window, 0 beyond 90° off-axis.
            let exposure = diff.to_radians().cos().max(0.0);
            *scores.get_mut(seat) += exposure * weight;
        }
    }

    for seat in Seat::ALL {
        *scores.get_mut(seat) = round_dp(scores.get(seat), 4);
    }

    ScoredSeats {
        best_seat: scores.min_seat(),
        worst_seat: scores.max_seat(),
        driver_seat: drive_side.driver_seat(),
        scores,
    }
}

/// Side of the vehicle, for the single-point side score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VehicleSide {
    Left,
    Right,
}

impl VehicleSide {
    pub fn opposite(self) -> Self {
        match self {
            VehicleSide::Left => VehicleSide::Right,
            VehicleSide::Right => VehicleSide::Left,
        }
    }
}

/// Which side of the vehicle is sunnier at a single instant.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct SideScore {
    pub sunny_side: VehicleSide,
    pub shaded_side: VehicleSide,
    /// 0–1, peaking when the sun is square abeam.
    pub intensity: f64,
}

/// Coarse single-point heuristic: relative angles in [0, 180) put the sun on
/// the right side, the rest on the left, with intensity falling off linearly
/// from the beam to the bow and stern.
pub fn side_score(solar_azimuth: f64, vehicle_heading: f64) -> SideScore {
    let relative_angle = (solar_azimuth - vehicle_heading).rem_euclid(360.0);

    let (sunny_side, intensity) = if relative_angle < 180.0 {
        (VehicleSide::Right, 1.0 - (relative_angle - 90.0).abs() / 90.0)
    } else {
        (
            VehicleSide::Left,
            (1.0 - (relative_angle - 270.0).abs() / 90.0).clamp(0.0, 1.0),
        )
    };

    SideScore {
        sunny_side,
        shaded_side: sunny_side.opposite(),
        intensity: round_dp(intensity, 3),
    }
}
