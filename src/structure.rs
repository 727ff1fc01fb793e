//! Market-structure categories and the threshold policy that assigns them.
//!
//! Rules are evaluated in a fixed order and the first match wins. Every comparison
//! is strict, so a value sitting exactly on a threshold falls through to the next
//! tier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HHI above which a market may be a monopoly.
pub const MONOPOLY_HHI: f64 = 7_500.0;
/// CR4 above which a market may be a monopoly.
pub const MONOPOLY_CR4: f64 = 0.9;
/// HHI above which a market may be an oligopoly.
pub const OLIGOPOLY_HHI: f64 = 2_500.0;
/// CR4 above which a market may be an oligopoly.
pub const OLIGOPOLY_CR4: f64 = 0.6;
/// HHI above which a crowded market counts as monopolistic competition.
pub const MONOPOLISTIC_COMPETITION_HHI: f64 = 1_500.0;
/// Firm count that must be exceeded for monopolistic competition.
pub const MONOPOLISTIC_COMPETITION_MIN_FIRMS: usize = 10;

/// The four competitive structures a market can be assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StructureCategory {
    Monopoly,
    Oligopoly,
    MonopolisticCompetition,
    PerfectCompetition,
}

impl StructureCategory {
    /// All categories, from most to least concentrated.
    pub const ALL: [StructureCategory; 4] = [
        StructureCategory::Monopoly,
        StructureCategory::Oligopoly,
        StructureCategory::MonopolisticCompetition,
        StructureCategory::PerfectCompetition,
    ];

    /// Position of the category inside [`StructureCategory::ALL`].
    pub const fn index(self) -> usize {
        match self {
            StructureCategory::Monopoly => 0,
            StructureCategory::Oligopoly => 1,
            StructureCategory::MonopolisticCompetition => 2,
            StructureCategory::PerfectCompetition => 3,
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            StructureCategory::Monopoly => "Monopoly",
            StructureCategory::Oligopoly => "Oligopoly",
            StructureCategory::MonopolisticCompetition => "Monopolistic Competition",
            StructureCategory::PerfectCompetition => "Perfect Competition",
        }
    }
}

impl fmt::Display for StructureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Threshold table used by the classifier.
///
/// The default reproduces the module constants; a custom table lets callers audit
/// alternative policies without touching the rule order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureThresholds {
    /// HHI that must be exceeded for a monopoly.
    pub monopoly_hhi: f64,
    /// CR4 that must be exceeded for a monopoly.
    pub monopoly_cr4: f64,
    /// HHI that must be exceeded for an oligopoly.
    pub oligopoly_hhi: f64,
    /// CR4 that must be exceeded for an oligopoly.
    pub oligopoly_cr4: f64,
    /// HHI that must be exceeded for monopolistic competition.
    pub monopolistic_competition_hhi: f64,
    /// Establishment count that must be exceeded for monopolistic competition.
    pub monopolistic_competition_min_firms: usize,
}

impl Default for StructureThresholds {
    fn default() -> Self {
        Self {
            monopoly_hhi: MONOPOLY_HHI,
            monopoly_cr4: MONOPOLY_CR4,
            oligopoly_hhi: OLIGOPOLY_HHI,
            oligopoly_cr4: OLIGOPOLY_CR4,
            monopolistic_competition_hhi: MONOPOLISTIC_COMPETITION_HHI,
            monopolistic_competition_min_firms: MONOPOLISTIC_COMPETITION_MIN_FIRMS,
        }
    }
}

impl StructureThresholds {
    /// Applies the ordered rules to one market.
    pub fn classify(&self, hhi: f64, cr4: f64, firm_count: usize) -> StructureCategory {
        if hhi > self.monopoly_hhi && cr4 > self.monopoly_cr4 {
            StructureCategory::Monopoly
        } else if hhi > self.oligopoly_hhi && cr4 > self.oligopoly_cr4 {
            StructureCategory::Oligopoly
        } else if hhi > self.monopolistic_competition_hhi
            && firm_count > self.monopolistic_competition_min_firms
        {
            StructureCategory::MonopolisticCompetition
        } else {
            StructureCategory::PerfectCompetition
        }
    }
}

/// Classifies a market with the default threshold table.
pub fn classify_structure(hhi: f64, cr4: f64, firm_count: usize) -> StructureCategory {
    StructureThresholds::default().classify(hhi, cr4, firm_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_rules_pick_first_match() {
        assert_eq!(classify_structure(10_000.0, 1.0, 10), StructureCategory::Monopoly);
        assert_eq!(classify_structure(3_000.0, 1.0, 4), StructureCategory::Oligopoly);
        assert_eq!(
            classify_structure(2_000.0, 0.5, 11),
            StructureCategory::MonopolisticCompetition
        );
        assert_eq!(classify_structure(800.0, 0.3, 50), StructureCategory::PerfectCompetition);
    }

    #[test]
    fn monopoly_bounds_qualify_for_oligopoly_too() {
        // Both first rules match a concentrated market; order decides.
        assert_eq!(classify_structure(9_000.0, 0.95, 2), StructureCategory::Monopoly);
        // High HHI but CR4 not above 0.9 drops to oligopoly.
        assert_eq!(classify_structure(9_000.0, 0.9, 2), StructureCategory::Oligopoly);
    }

    #[test]
    fn boundary_values_fall_to_the_next_tier() {
        assert_eq!(classify_structure(7_500.0, 1.0, 1), StructureCategory::Oligopoly);
        assert_eq!(
            classify_structure(2_500.0, 1.0, 30),
            StructureCategory::MonopolisticCompetition
        );
        assert_eq!(classify_structure(2_600.0, 0.6, 5), StructureCategory::PerfectCompetition);
        assert_eq!(classify_structure(1_500.0, 0.5, 30), StructureCategory::PerfectCompetition);
        assert_eq!(classify_structure(2_000.0, 0.5, 10), StructureCategory::PerfectCompetition);
    }

    #[test]
    fn custom_thresholds_change_policy_not_order() {
        let strict = StructureThresholds {
            monopoly_hhi: 9_500.0,
            ..StructureThresholds::default()
        };
        assert_eq!(strict.classify(9_000.0, 1.0, 1), StructureCategory::Oligopoly);
        assert_eq!(
            StructureThresholds::default().classify(9_000.0, 1.0, 1),
            StructureCategory::Monopoly
        );
    }

    #[test]
    fn index_matches_all_ordering() {
        for (position, category) in StructureCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), position);
        }
        assert_eq!(
            StructureCategory::MonopolisticCompetition.to_string(),
            "Monopolistic Competition"
        );
    }
}
