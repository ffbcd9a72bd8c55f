//! Tunable routing parameters.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "snap": { "search_radius_m": 250.0 }, "solve_timeout_ms": 2000 }
//! ```

use std::f64::consts::{FRAC_PI_2, PI};
use std::time::Duration;

use sr_core::{CoreError, CoreResult};

// ── Snapping ──────────────────────────────────────────────────────────────────

/// How stops are matched to graph vertices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SnapStrategy {
    /// Direction-aware entry points using the bearing to the next stop.
    #[default]
    Directional,
    /// Plain nearest vertex for every stop.
    Nearest,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SnapConfig {
    pub strategy: SnapStrategy,
    /// Candidate edge search radius around each stop, metres.
    pub search_radius_m: f64,
    /// An edge counts as aligned with travel when the angle between its
    /// bearing and the bearing to the next stop is below this.
    pub alignment_threshold_rad: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            strategy: SnapStrategy::Directional,
            search_radius_m: 150.0,
            alignment_threshold_rad: FRAC_PI_2,
        }
    }
}

// ── Cost ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CostProfile {
    /// Stored travel time shaped by road-class discounts and the reverse
    /// one-way penalty.
    #[default]
    Preferred,
    /// Stored travel time only.  One-way legality still applies.
    TravelTime,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CostConfig {
    pub profile: CostProfile,
    /// Multiplier on reverse-marked one-ways travelled in their legal direction.
    pub reverse_one_way_penalty: f64,
    /// Motorway / trunk.
    pub highway_discount: f64,
    /// Applies when forward speed is strictly above this.
    pub fast_road_speed_kmh: f64,
    pub fast_road_discount: f64,
    /// Applies when priority is at least this.
    pub priority_threshold: f64,
    pub priority_discount: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            profile: CostProfile::Preferred,
            reverse_one_way_penalty: 10_000.0,
            highway_discount: 0.6,
            fast_road_speed_kmh: 80.0,
            fast_road_discount: 0.75,
            priority_threshold: 1.0,
            priority_discount: 0.85,
        }
    }
}

// ── Stop limits ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StopLimits {
    pub min_stops: usize,
    pub max_stops: usize,
}

impl Default for StopLimits {
    fn default() -> Self {
        Self { min_stops: 2, max_stops: 100 }
    }
}

/// What to do when two consecutive stops snap to the same vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DegeneratePolicy {
    /// Fail the route with a degenerate no-path error.
    #[default]
    Reject,
    /// Drop the pair; it does not count as a segment.
    Skip,
}

// ── RoutingConfig ─────────────────────────────────────────────────────────────

/// Top-level routing configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingConfig {
    pub snap: SnapConfig,
    pub cost: CostConfig,
    pub limits: StopLimits,
    /// Wall-clock budget for each pairwise search.  `None` = unbounded.
    pub solve_timeout_ms: Option<u64>,
    pub degenerate_pairs: DegeneratePolicy,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            snap: SnapConfig::default(),
            cost: CostConfig::default(),
            limits: StopLimits::default(),
            solve_timeout_ms: Some(5_000),
            degenerate_pairs: DegeneratePolicy::Reject,
        }
    }
}

impl RoutingConfig {
    #[inline]
    pub fn solve_timeout(&self) -> Option<Duration> {
        self.solve_timeout_ms.map(Duration::from_millis)
    }

    /// Check every parameter is in range.
    pub fn validate(&self) -> CoreResult<()> {
        let fail = |msg: String| Err(CoreError::Config(msg));

        let r = self.snap.search_radius_m;
        if !(r > 0.0 && r.is_finite()) {
            return fail(format!("snap.search_radius_m must be positive, got {r}"));
        }
        let t = self.snap.alignment_threshold_rad;
        if !(t > 0.0 && t <= PI) {
            return fail(format!("snap.alignment_threshold_rad must be in (0, π], got {t}"));
        }

        let c = &self.cost;
        for (name, d) in [
            ("highway_discount", c.highway_discount),
            ("fast_road_discount", c.fast_road_discount),
            ("priority_discount", c.priority_discount),
        ] {
            if !(d > 0.0 && d <= 1.0) {
                return fail(format!("cost.{name} must be in (0, 1], got {d}"));
            }
        }
        if !(c.reverse_one_way_penalty >= 1.0 && c.reverse_one_way_penalty.is_finite()) {
            return fail(format!(
                "cost.reverse_one_way_penalty must be at least 1, got {}",
                c.reverse_one_way_penalty
            ));
        }

        let l = &self.limits;
        if l.min_stops < 2 {
            return fail(format!("limits.min_stops must be at least 2, got {}", l.min_stops));
        }
        if l.max_stops < l.min_stops {
            return fail(format!(
                "limits.max_stops ({}) is below limits.min_stops ({})",
                l.max_stops, l.min_stops
            ));
        }
        if self.solve_timeout_ms == Some(0) {
            return fail("solve_timeout_ms must be positive; omit it for no limit".into());
        }
        Ok(())
    }
}
