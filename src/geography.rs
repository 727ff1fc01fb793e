//! Geographic view of a market: located establishments weighted by their firm's share.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::concentration::tally;
use crate::data::Record;
use crate::error::{MarketError, Result};

/// An establishment with valid coordinates and the market share of its firm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocatedShare {
    /// Firm running the establishment.
    pub firm: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Share of the firm across all supplied records.
    pub share: f64,
}

/// Pairs every located record with its firm's share of `records`.
///
/// Shares are computed over all supplied records, located or not; records
/// lacking either coordinate are then left out.
pub fn located_shares<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<Vec<LocatedShare>> {
    let records: Vec<&Record> = records.into_iter().collect();
    let counts = tally(records.iter().copied(), Record::firm_name);
    let total = records.len();
    if total == 0 {
        return Err(MarketError::empty_input("located shares"));
    }
    let shares: HashMap<&str, f64> = counts
        .into_iter()
        .map(|(firm, units)| (firm, units as f64 / total as f64))
        .collect();

    Ok(records
        .iter()
        .filter_map(|record| {
            let (latitude, longitude) = record.coordinates()?;
            Some(LocatedShare {
                firm: record.firm_name().to_string(),
                latitude,
                longitude,
                share: shares[record.firm_name()],
            })
        })
        .collect())
}

/// Mean latitude and longitude of located records, `None` when none are located.
pub fn geographic_centroid<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> Option<(f64, f64)> {
    let (count, lat_sum, lon_sum) = records
        .into_iter()
        .filter_map(Record::coordinates)
        .fold((0usize, 0.0, 0.0), |(count, lat, lon), (latitude, longitude)| {
            (count + 1, lat + latitude, lon + longitude)
        });
    if count == 0 {
        return None;
    }
    Some((lat_sum / count as f64, lon_sum / count as f64))
}
