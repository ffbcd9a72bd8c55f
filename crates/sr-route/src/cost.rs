//! Direction-aware edge weights: one-way legality plus road preference.
//!
//! Rules, first match wins:
//!
//! | Condition                                        | Result                    |
//! |--------------------------------------------------|---------------------------|
//! | one-way marking forbids the direction            | `Unreachable`             |
//! | stored cost for the direction is negative or NaN | `Unreachable`             |
//! | reverse-marked one-way, legal direction          | minutes × penalty         |
//! | motorway / trunk                                 | minutes × highway discount |
//! | forward speed above the fast-road threshold      | minutes × fast discount   |
//! | priority at or above the threshold               | minutes × priority discount |
//! | otherwise                                        | minutes                   |
//!
//! The discount tiers are exclusive; they never compound.  Under
//! [`CostProfile::TravelTime`] only the two `Unreachable` rules apply.

use sr_graph::{Direction, EdgeCost, EdgeRef, OneWay, Traversal};

use crate::config::{CostConfig, CostProfile};

#[derive(Clone, Debug, Default)]
pub struct CostModel {
    cfg: CostConfig,
}

impl CostModel {
    pub fn new(cfg: CostConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &CostConfig {
        &self.cfg
    }

    /// Preference multiplier for an edge without a reverse one-way marking.
    fn discount(&self, edge: &EdgeRef<'_>) -> f64 {
        let c = &self.cfg;
        if edge.road_class.is_highway() {
            c.highway_discount
        } else if edge.forward_speed_kmh > c.fast_road_speed_kmh {
            c.fast_road_discount
        } else if edge.priority >= c.priority_threshold {
            c.priority_discount
        } else {
            1.0
        }
    }
}

impl EdgeCost for CostModel {
    fn cost(&self, edge: &EdgeRef<'_>, dir: Direction) -> Traversal {
        if edge.one_way.forbids(dir) {
            return Traversal::Unreachable;
        }
        let stored_s = edge.stored_cost_s(dir);
        if !(stored_s >= 0.0 && stored_s.is_finite()) {
            return Traversal::Unreachable;
        }
        let minutes = stored_s / 60.0;

        match self.cfg.profile {
            CostProfile::TravelTime => Traversal::Cost(minutes),
            CostProfile::Preferred if edge.one_way == OneWay::Reverse => {
                Traversal::Cost(minutes * self.cfg.reverse_one_way_penalty)
            }
            CostProfile::Preferred => Traversal::Cost(minutes * self.discount(edge)),
        }
    }

    fn min_scale(&self) -> f64 {
        match self.cfg.profile {
            CostProfile::TravelTime => 1.0,
            CostProfile::Preferred => self
                .cfg
                .highway_discount
                .min(self.cfg.fast_road_discount)
                .min(self.cfg.priority_discount)
                .min(1.0),
        }
    }
}
