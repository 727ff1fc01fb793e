//! Closed-form equilibria for linear demand `P = a - bQ` and constant marginal cost `c`.
//!
//! Each solver is an independent pure function. They only fail where a formula
//! would divide by zero (`b == 0`, `n == 0`, `1 + d == 0`); an economically
//! degenerate market with `a <= c` simply produces non-positive quantities.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};
use crate::parameters::{require_finite, require_firms, require_slope, ModelParameters};
use crate::structure::StructureCategory;

/// Simultaneous quantity competition among `n` symmetric firms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CournotOutcome {
    /// Total market quantity.
    pub total_quantity: f64,
    /// Equilibrium price.
    pub price: f64,
    /// Output of each firm.
    pub firm_quantity: f64,
    /// Profit of each firm.
    pub firm_profit: f64,
}

/// Price competition with homogeneous goods: price falls to marginal cost.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BertrandOutcome {
    /// Equilibrium price.
    pub price: f64,
    /// Profit of each firm.
    pub firm_profit: f64,
}

/// Sequential quantity competition between one leader and one follower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StackelbergOutcome {
    /// Output of the leader.
    pub leader_quantity: f64,
    /// Output of the follower.
    pub follower_quantity: f64,
    /// Total market quantity.
    pub total_quantity: f64,
    /// Equilibrium price.
    pub price: f64,
    /// Profit of the leader.
    pub leader_profit: f64,
    /// Profit of the follower.
    pub follower_profit: f64,
}

/// Joint profit maximization with the monopoly output split evenly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartelOutcome {
    /// Total market quantity.
    pub total_quantity: f64,
    /// Equilibrium price.
    pub price: f64,
    /// Output of each firm.
    pub firm_quantity: f64,
    /// Joint profit of all firms.
    pub total_profit: f64,
    /// Profit of each firm.
    pub firm_profit: f64,
}

/// Competitive equilibrium at marginal-cost pricing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerfectCompetitionOutcome {
    /// Equilibrium price.
    pub price: f64,
    /// Total market quantity.
    pub total_quantity: f64,
}

/// Differentiated products, each firm facing a demand damped by `1 + d`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonopolisticCompetitionOutcome {
    /// Equilibrium price.
    pub price: f64,
    /// Output of each firm.
    pub firm_quantity: f64,
    /// Total market quantity.
    pub total_quantity: f64,
}

/// Single-seller profit maximization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonopolyOutcome {
    /// Total market quantity.
    pub total_quantity: f64,
    /// Equilibrium price.
    pub price: f64,
    /// Monopoly profit.
    pub profit: f64,
}

/// Cournot-Nash equilibrium: `Q = n(a - c) / (b(n + 1))`.
pub fn cournot_model(n: usize, a: f64, b: f64, c: f64) -> Result<CournotOutcome> {
    require_slope(b)?;
    require_firms(n)?;
    let firms = n as f64;
    let total_quantity = firms * (a - c) / (b * (firms + 1.0));
    let price = a - b * total_quantity;
    let firm_quantity = total_quantity / firms;
    Ok(CournotOutcome {
        total_quantity,
        price,
        firm_quantity,
        firm_profit: (price - c) * firm_quantity,
    })
}

/// Bertrand equilibrium: `P = c` and zero profit.
pub fn bertrand_model(c: f64) -> BertrandOutcome {
    BertrandOutcome {
        price: c,
        firm_profit: 0.0,
    }
}

/// Stackelberg equilibrium with the leader choosing the monopoly quantity.
pub fn stackelberg_model(a: f64, b: f64, c: f64) -> Result<StackelbergOutcome> {
    require_slope(b)?;
    let leader_quantity = (a - c) / (2.0 * b);
    let follower_quantity = (a - c - b * leader_quantity) / (2.0 * b);
    let total_quantity = leader_quantity + follower_quantity;
    let price = a - b * total_quantity;
    Ok(StackelbergOutcome {
        leader_quantity,
        follower_quantity,
        total_quantity,
        price,
        leader_profit: (price - c) * leader_quantity,
        follower_profit: (price - c) * follower_quantity,
    })
}

/// Cartel: the monopoly quantity `(a - c) / 2b` shared by `n` members.
pub fn cartel_model(n: usize, a: f64, b: f64, c: f64) -> Result<CartelOutcome> {
    require_slope(b)?;
    require_firms(n)?;
    let firms = n as f64;
    let total_quantity = (a - c) / (2.0 * b);
    let price = a - b * total_quantity;
    let total_profit = (price - c) * total_quantity;
    Ok(CartelOutcome {
        total_quantity,
        price,
        firm_quantity: total_quantity / firms,
        total_profit,
        firm_profit: total_profit / firms,
    })
}

/// Perfect competition: `P = c`, `Q = (a - c) / b`.
pub fn perfect_competition_model(a: f64, b: f64, c: f64) -> Result<PerfectCompetitionOutcome> {
    require_slope(b)?;
    let price = c;
    Ok(PerfectCompetitionOutcome {
        price,
        total_quantity: (a - price) / b,
    })
}

/// Monopolistic competition: `P = (a + c) / 2`, `q = (a - P) / (b(1 + d))`, `Q = nq`.
pub fn monopolistic_competition_model(
    n: usize,
    a: f64,
    b: f64,
    c: f64,
    d: f64,
) -> Result<MonopolisticCompetitionOutcome> {
    require_slope(b)?;
    require_firms(n)?;
    if 1.0 + d == 0.0 {
        return Err(MarketError::invalid_parameter("d", d, "1 + d must be non-zero"));
    }
    let price = (a + c) / 2.0;
    let firm_quantity = (a - price) / (b * (1.0 + d));
    Ok(MonopolisticCompetitionOutcome {
        price,
        firm_quantity,
        total_quantity: n as f64 * firm_quantity,
    })
}

/// Monopoly: `Q = (a - c) / 2b`.
pub fn monopoly_model(a: f64, b: f64, c: f64) -> Result<MonopolyOutcome> {
    require_slope(b)?;
    let total_quantity = (a - c) / (2.0 * b);
    let price = a - b * total_quantity;
    Ok(MonopolyOutcome {
        total_quantity,
        price,
        profit: (price - c) * total_quantity,
    })
}

/// Economic model used to predict an equilibrium.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquilibriumModel {
    Cournot,
    Bertrand,
    Stackelberg,
    Cartel,
    PerfectCompetition,
    MonopolisticCompetition,
    Monopoly,
}

impl EquilibriumModel {
    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            EquilibriumModel::Cournot => "Cournot",
            EquilibriumModel::Bertrand => "Bertrand",
            EquilibriumModel::Stackelberg => "Stackelberg",
            EquilibriumModel::Cartel => "Cartel",
            EquilibriumModel::PerfectCompetition => "Perfect Competition",
            EquilibriumModel::MonopolisticCompetition => "Monopolistic Competition",
            EquilibriumModel::Monopoly => "Monopoly",
        }
    }
}

impl fmt::Display for EquilibriumModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const OLIGOPOLY_MODELS: [EquilibriumModel; 4] = [
    EquilibriumModel::Cournot,
    EquilibriumModel::Bertrand,
    EquilibriumModel::Stackelberg,
    EquilibriumModel::Cartel,
];

impl StructureCategory {
    /// Models that apply to a market of this structure, in display order.
    pub fn applicable_models(self) -> &'static [EquilibriumModel] {
        match self {
            StructureCategory::Monopoly => &[EquilibriumModel::Monopoly],
            StructureCategory::Oligopoly => &OLIGOPOLY_MODELS,
            StructureCategory::MonopolisticCompetition => {
                &[EquilibriumModel::MonopolisticCompetition]
            }
            StructureCategory::PerfectCompetition => &[EquilibriumModel::PerfectCompetition],
        }
    }
}

/// Outcome of any solver, tagged by model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", content = "outcome")]
pub enum EquilibriumResult {
    Cournot(CournotOutcome),
    Bertrand(BertrandOutcome),
    Stackelberg(StackelbergOutcome),
    Cartel(CartelOutcome),
    PerfectCompetition(PerfectCompetitionOutcome),
    MonopolisticCompetition(MonopolisticCompetitionOutcome),
    Monopoly(MonopolyOutcome),
}

impl EquilibriumResult {
    /// Model that produced this result.
    pub fn model(&self) -> EquilibriumModel {
        match self {
            EquilibriumResult::Cournot(_) => EquilibriumModel::Cournot,
            EquilibriumResult::Bertrand(_) => EquilibriumModel::Bertrand,
            EquilibriumResult::Stackelberg(_) => EquilibriumModel::Stackelberg,
            EquilibriumResult::Cartel(_) => EquilibriumModel::Cartel,
            EquilibriumResult::PerfectCompetition(_) => EquilibriumModel::PerfectCompetition,
            EquilibriumResult::MonopolisticCompetition(_) => {
                EquilibriumModel::MonopolisticCompetition
            }
            EquilibriumResult::Monopoly(_) => EquilibriumModel::Monopoly,
        }
    }

    /// Equilibrium market price.
    pub fn price(&self) -> f64 {
        match self {
            EquilibriumResult::Cournot(r) => r.price,
            EquilibriumResult::Bertrand(r) => r.price,
            EquilibriumResult::Stackelberg(r) => r.price,
            EquilibriumResult::Cartel(r) => r.price,
            EquilibriumResult::PerfectCompetition(r) => r.price,
            EquilibriumResult::MonopolisticCompetition(r) => r.price,
            EquilibriumResult::Monopoly(r) => r.price,
        }
    }

    /// Total market quantity; Bertrand reports none.
    pub fn total_quantity(&self) -> Option<f64> {
        match self {
            EquilibriumResult::Cournot(r) => Some(r.total_quantity),
            EquilibriumResult::Bertrand(_) => None,
            EquilibriumResult::Stackelberg(r) => Some(r.total_quantity),
            EquilibriumResult::Cartel(r) => Some(r.total_quantity),
            EquilibriumResult::PerfectCompetition(r) => Some(r.total_quantity),
            EquilibriumResult::MonopolisticCompetition(r) => Some(r.total_quantity),
            EquilibriumResult::Monopoly(r) => Some(r.total_quantity),
        }
    }
}

/// Runs the requested solver.
///
/// Only the parameters the model reads are checked: Bertrand needs a finite `c`,
/// monopolistic competition also reads `d`, and `n` matters only where firms
/// split output. Each solver then rejects the values its formula divides by.
pub fn solve(model: EquilibriumModel, params: &ModelParameters) -> Result<EquilibriumResult> {
    let ModelParameters { a, b, c, d, n } = *params;
    match model {
        EquilibriumModel::Bertrand => require_finite(&[("c", c)])?,
        EquilibriumModel::MonopolisticCompetition => {
            require_finite(&[("a", a), ("b", b), ("c", c), ("d", d)])?
        }
        EquilibriumModel::Cournot
        | EquilibriumModel::Stackelberg
        | EquilibriumModel::Cartel
        | EquilibriumModel::PerfectCompetition
        | EquilibriumModel::Monopoly => require_finite(&[("a", a), ("b", b), ("c", c)])?,
    }
    debug!("solving {model} with a={a}, b={b}, c={c}, d={d}, n={n}");

    let result = match model {
        EquilibriumModel::Cournot => EquilibriumResult::Cournot(cournot_model(n, a, b, c)?),
        EquilibriumModel::Bertrand => EquilibriumResult::Bertrand(bertrand_model(c)),
        EquilibriumModel::Stackelberg => {
            EquilibriumResult::Stackelberg(stackelberg_model(a, b, c)?)
        }
        EquilibriumModel::Cartel => EquilibriumResult::Cartel(cartel_model(n, a, b, c)?),
        EquilibriumModel::PerfectCompetition => {
            EquilibriumResult::PerfectCompetition(perfect_competition_model(a, b, c)?)
        }
        EquilibriumModel::MonopolisticCompetition => EquilibriumResult::MonopolisticCompetition(
            monopolistic_competition_model(n, a, b, c, d)?,
        ),
        EquilibriumModel::Monopoly => EquilibriumResult::Monopoly(monopoly_model(a, b, c)?),
    };
    Ok(result)
}

/// Runs every model applicable to `structure`, in display order.
pub fn solve_for_structure(
    structure: StructureCategory,
    params: &ModelParameters,
) -> Result<Vec<EquilibriumResult>> {
    structure
        .applicable_models()
        .iter()
        .map(|model| solve(*model, params))
        .collect()
}
