//! Market shares and concentration indices (CR4, HHI) computed from establishment counts.

use std::collections::HashMap;
use std::hash::Hash;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};

/// Scale applied to the sum of squared shares so a pure monopoly scores 10 000.
pub const HHI_SCALE: f64 = 10_000.0;

/// Number of leading firms summed by the concentration ratio.
pub const CONCENTRATION_RATIO_FIRMS: usize = 4;

/// Counts records per key, preserving the order in which keys are first seen.
pub(crate) fn tally<'a, R, K, F>(
    records: impl IntoIterator<Item = &'a R>,
    mut key: F,
) -> Vec<(K, usize)>
where
    R: 'a + ?Sized,
    K: Eq + Hash + Clone,
    F: FnMut(&'a R) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for record in records {
        let k = key(record);
        match index.get(&k) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(k.clone(), counts.len());
                counts.push((k, 1));
            }
        }
    }
    counts
}

/// Groups records by firm and returns each firm's share of the records together
/// with the four-firm concentration ratio.
///
/// Shares follow the order in which firms first appear; only the CR4 computation
/// sorts them. Fails with [`MarketError::EmptyInput`] when no records are given.
pub fn compute_market_shares<'a, R, K, F>(
    records: impl IntoIterator<Item = &'a R>,
    firm_key: F,
) -> Result<(DVector<f64>, f64)>
where
    R: 'a + ?Sized,
    K: Eq + Hash + Clone,
    F: FnMut(&'a R) -> K,
{
    let counts = tally(records, firm_key);
    let shares = shares_from_counts(&counts)?;
    let cr4 = concentration_ratio(&shares, CONCENTRATION_RATIO_FIRMS);
    Ok((shares, cr4))
}

/// Herfindahl-Hirschman index: sum of squared shares scaled by [`HHI_SCALE`].
///
/// Returns `0.0` for an empty share vector.
pub fn compute_hhi(shares: &DVector<f64>) -> f64 {
    HHI_SCALE * shares.norm_squared()
}

/// Sum of the `k` largest shares, or of all shares if fewer than `k` exist.
pub fn concentration_ratio(shares: &DVector<f64>, k: usize) -> f64 {
    let mut sorted: Vec<f64> = shares.iter().copied().collect();
    sorted.sort_by(|lhs, rhs| rhs.total_cmp(lhs));
    sorted.iter().take(k).sum()
}

fn shares_from_counts<K>(counts: &[(K, usize)]) -> Result<DVector<f64>> {
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Err(MarketError::empty_input("market shares"));
    }
    let total = total as f64;
    Ok(DVector::from_iterator(
        counts.len(),
        counts.iter().map(|(_, count)| *count as f64 / total),
    ))
}

/// Concentration summary for one market.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationMetrics {
    /// Share of each distinct firm, in first-seen order.
    pub market_shares: DVector<f64>,
    /// Four-firm concentration ratio in `[0, 1]`.
    pub cr4: f64,
    /// Herfindahl-Hirschman index in `(0, 10 000]`.
    pub hhi: f64,
    /// Number of distinct firms.
    pub firm_count: usize,
    /// Number of establishments (records). This is the count the structure
    /// classifier and the equilibrium solvers receive as `n`.
    pub establishment_count: usize,
}

impl ConcentrationMetrics {
    /// Computes shares, CR4 and HHI for a non-empty set of records.
    pub fn from_records<'a, R, K, F>(
        records: impl IntoIterator<Item = &'a R>,
        firm_key: F,
    ) -> Result<Self>
    where
        R: 'a + ?Sized,
        K: Eq + Hash + Clone,
        F: FnMut(&'a R) -> K,
    {
        let counts = tally(records, firm_key);
        let market_shares = shares_from_counts(&counts)?;
        let cr4 = concentration_ratio(&market_shares, CONCENTRATION_RATIO_FIRMS);
        let hhi = compute_hhi(&market_shares);

        Ok(Self {
            firm_count: counts.len(),
            establishment_count: counts.iter().map(|(_, count)| count).sum(),
            market_shares,
            cr4,
            hhi,
        })
    }

    /// Largest single share.
    pub fn max_share(&self) -> f64 {
        self.market_shares.max()
    }
}

/// One row of the ranked firm table: how many establishments a firm runs and its share.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FirmShare<K> {
    /// Firm identifier as returned by the key function.
    pub firm: K,
    /// Number of establishments.
    pub units: usize,
    /// `units` divided by the total establishment count.
    pub share: f64,
}

/// Firms ranked by establishment count, largest first. Ties keep first-seen order.
pub fn firm_distribution<'a, R, K, F>(
    records: impl IntoIterator<Item = &'a R>,
    firm_key: F,
) -> Result<Vec<FirmShare<K>>>
where
    R: 'a + ?Sized,
    K: Eq + Hash + Clone,
    F: FnMut(&'a R) -> K,
{
    let mut counts = tally(records, firm_key);
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Err(MarketError::empty_input("firm distribution"));
    }
    counts.sort_by(|lhs, rhs| rhs.1.cmp(&lhs.1));

    Ok(counts
        .into_iter()
        .map(|(firm, units)| FirmShare {
            firm,
            units,
            share: units as f64 / total as f64,
        })
        .collect())
}
