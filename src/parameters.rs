//! Demand and cost parameters shared by the equilibrium solvers.

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};

/// Linear inverse demand `P = a - bQ`, constant marginal cost `c`, product
/// differentiation `d` and the number of competing firms `n`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Choke price: the price at which quantity demanded reaches zero.
    pub a: f64,
    /// Slope of inverse demand.
    pub b: f64,
    /// Marginal cost.
    pub c: f64,
    /// Differentiation parameter, only read by monopolistic competition.
    pub d: f64,
    /// Firm count.
    pub n: usize,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            a: 100.0,
            b: 1.0,
            c: 20.0,
            d: 0.5,
            n: 1,
        }
    }
}

impl ModelParameters {
    /// Override the demand curve while preserving other defaults.
    pub fn with_demand(mut self, a: f64, b: f64) -> Self {
        self.a = a;
        self.b = b;
        self
    }

    /// Override the marginal cost.
    pub fn with_marginal_cost(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Override the differentiation parameter.
    pub fn with_differentiation(mut self, d: f64) -> Self {
        self.d = d;
        self
    }

    /// Set the number of firms, usually the establishment count of the market.
    pub fn with_firm_count(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    /// Rejects parameter sets for which the closed forms are undefined.
    ///
    /// `a <= c` is accepted: it yields non-positive quantities, which are
    /// meaningless economically but well defined numerically.
    ///
    /// This checks every field; [`solve`](crate::equilibrium::solve) only checks
    /// the fields the chosen model reads.
    pub fn validate(&self) -> Result<()> {
        require_finite(&[("a", self.a), ("b", self.b), ("c", self.c), ("d", self.d)])?;
        require_slope(self.b)?;
        require_firms(self.n)?;
        if 1.0 + self.d == 0.0 {
            return Err(MarketError::invalid_parameter("d", self.d, "1 + d must be non-zero"));
        }
        Ok(())
    }
}

pub(crate) fn require_finite(inputs: &[(&'static str, f64)]) -> Result<()> {
    for &(parameter, value) in inputs {
        if !value.is_finite() {
            return Err(MarketError::invalid_parameter(parameter, value, "must be finite"));
        }
    }
    Ok(())
}

pub(crate) fn require_slope(b: f64) -> Result<()> {
    if b == 0.0 {
        return Err(MarketError::invalid_parameter("b", b, "demand slope must be non-zero"));
    }
    Ok(())
}

pub(crate) fn require_firms(n: usize) -> Result<()> {
    if n == 0 {
        return Err(MarketError::invalid_parameter("n", 0.0, "at least one firm is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = ModelParameters::default();
        assert_eq!(
            (params.a, params.b, params.c, params.d, params.n),
            (100.0, 1.0, 20.0, 0.5, 1)
        );
        assert!(params.validate().is_ok());
    }

    #[test]
    fn degenerate_economics_are_not_rejected() {
        let params = ModelParameters::default()
            .with_demand(10.0, 1.0)
            .with_marginal_cost(50.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn undefined_closed_forms_are_rejected() {
        let flat = ModelParameters::default().with_demand(100.0, 0.0);
        assert!(matches!(
            flat.validate(),
            Err(MarketError::InvalidParameter { parameter: "b", .. })
        ));

        let empty = ModelParameters::default().with_firm_count(0);
        assert!(matches!(
            empty.validate(),
            Err(MarketError::InvalidParameter { parameter: "n", .. })
        ));

        let nan_cost = ModelParameters::default().with_marginal_cost(f64::NAN);
        assert!(matches!(
            nan_cost.validate(),
            Err(MarketError::InvalidParameter { parameter: "c", .. })
        ));

        let singular = ModelParameters::default().with_differentiation(-1.0);
        assert!(matches!(
            singular.validate(),
            Err(MarketError::InvalidParameter { parameter: "d", .. })
        ));
    }
}
