//! Splits a record set into activity markets and buckets each one under its structure.

use std::collections::HashMap;
use std::hash::Hash;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::concentration::ConcentrationMetrics;
use crate::data::Record;
use crate::error::{MarketError, Result};
use crate::structure::{StructureCategory, StructureThresholds};

/// Metrics and assigned structure for one activity market.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityAnalysis<A> {
    /// Activity identifier as returned by the activity key.
    pub activity: A,
    /// Concentration metrics computed over the activity's records.
    pub metrics: ConcentrationMetrics,
    /// Structure assigned by the classifier.
    pub structure: StructureCategory,
}

/// Activities grouped under the four structure categories.
///
/// Every category always has a slot, so lookups never need an existence check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureBuckets<A> {
    buckets: [Vec<A>; 4],
}

impl<A> Default for StructureBuckets<A> {
    fn default() -> Self {
        Self {
            buckets: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
        }
    }
}

impl<A> StructureBuckets<A> {
    /// Creates empty buckets for all four categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an activity to the bucket of `category`.
    pub fn push(&mut self, category: StructureCategory, activity: A) {
        self.buckets[category.index()].push(activity);
    }

    /// Activities classified under `category`, in first-seen order.
    pub fn get(&self, category: StructureCategory) -> &[A] {
        &self.buckets[category.index()]
    }

    /// Iterates over every category in [`StructureCategory::ALL`] order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (StructureCategory, &[A])> {
        StructureCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Categories holding at least one activity.
    pub fn non_empty(&self) -> Vec<StructureCategory> {
        self.iter()
            .filter(|(_, activities)| !activities.is_empty())
            .map(|(category, _)| category)
            .collect()
    }

    /// Total number of bucketed activities.
    pub fn activity_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

impl<A> FromIterator<ActivityAnalysis<A>> for StructureBuckets<A> {
    fn from_iter<I: IntoIterator<Item = ActivityAnalysis<A>>>(iter: I) -> Self {
        let mut buckets = Self::new();
        for analysis in iter {
            buckets.push(analysis.structure, analysis.activity);
        }
        buckets
    }
}

/// Groups records by key in a single pass, preserving first-seen key order.
fn group_records<'a, R, A, F>(
    records: impl IntoIterator<Item = &'a R>,
    mut key: F,
) -> Vec<(A, Vec<&'a R>)>
where
    R: 'a + ?Sized,
    A: Eq + Hash + Clone,
    F: FnMut(&'a R) -> A,
{
    let mut index: HashMap<A, usize> = HashMap::new();
    let mut groups: Vec<(A, Vec<&'a R>)> = Vec::new();
    for record in records {
        let k = key(record);
        match index.get(&k) {
            Some(&slot) => groups[slot].1.push(record),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![record]));
            }
        }
    }
    groups
}

/// Analyzes every activity market with the default thresholds.
pub fn analyze_markets<'a, R, A, K, FA, FK>(
    records: impl IntoIterator<Item = &'a R>,
    activity_key: FA,
    firm_key: FK,
) -> Result<Vec<ActivityAnalysis<A>>>
where
    R: 'a + ?Sized,
    A: Eq + Hash + Clone,
    K: Eq + Hash + Clone,
    FA: FnMut(&'a R) -> A,
    FK: FnMut(&'a R) -> K,
{
    analyze_markets_with(records, activity_key, firm_key, &StructureThresholds::default())
}

/// Analyzes every activity market, in first-seen activity order.
///
/// The classifier receives the establishment count of each activity as its firm
/// count.
pub fn analyze_markets_with<'a, R, A, K, FA, FK>(
    records: impl IntoIterator<Item = &'a R>,
    activity_key: FA,
    mut firm_key: FK,
    thresholds: &StructureThresholds,
) -> Result<Vec<ActivityAnalysis<A>>>
where
    R: 'a + ?Sized,
    A: Eq + Hash + Clone,
    K: Eq + Hash + Clone,
    FA: FnMut(&'a R) -> A,
    FK: FnMut(&'a R) -> K,
{
    let groups = group_records(records, activity_key);
    debug!("analyzing {} activity markets", groups.len());

    let mut analyses = Vec::with_capacity(groups.len());
    for (position, (activity, members)) in groups.into_iter().enumerate() {
        // An activity only exists because one of its records was seen, so an
        // empty-input error here is a contract violation and must surface.
        let metrics = ConcentrationMetrics::from_records(members.iter().copied(), &mut firm_key)?;
        let structure = thresholds.classify(metrics.hhi, metrics.cr4, metrics.establishment_count);
        trace!(
            "activity #{position}: {} establishments, {} firms, hhi {:.2}, cr4 {:.3} -> {}",
            metrics.establishment_count,
            metrics.firm_count,
            metrics.hhi,
            metrics.cr4,
            structure,
        );
        analyses.push(ActivityAnalysis {
            activity,
            metrics,
            structure,
        });
    }
    Ok(analyses)
}

/// Buckets every distinct activity under its structure category.
pub fn partition_by_structure<'a, R, A, K, FA, FK>(
    records: impl IntoIterator<Item = &'a R>,
    activity_key: FA,
    firm_key: FK,
) -> Result<StructureBuckets<A>>
where
    R: 'a + ?Sized,
    A: Eq + Hash + Clone,
    K: Eq + Hash + Clone,
    FA: FnMut(&'a R) -> A,
    FK: FnMut(&'a R) -> K,
{
    partition_by_structure_with(records, activity_key, firm_key, &StructureThresholds::default())
}

/// Same as [`partition_by_structure`] with an explicit threshold table.
pub fn partition_by_structure_with<'a, R, A, K, FA, FK>(
    records: impl IntoIterator<Item = &'a R>,
    activity_key: FA,
    firm_key: FK,
    thresholds: &StructureThresholds,
) -> Result<StructureBuckets<A>>
where
    R: 'a + ?Sized,
    A: Eq + Hash + Clone,
    K: Eq + Hash + Clone,
    FA: FnMut(&'a R) -> A,
    FK: FnMut(&'a R) -> K,
{
    let buckets: StructureBuckets<A> =
        analyze_markets_with(records, activity_key, firm_key, thresholds)?
            .into_iter()
            .collect();
    for (category, activities) in buckets.iter() {
        debug!("{category}: {} activities", activities.len());
    }
    Ok(buckets)
}

/// Records belonging to one activity class.
pub fn activity_records<'a>(records: &'a [Record], activity: &str) -> Result<Vec<&'a Record>> {
    let selected: Vec<&Record> = records
        .iter()
        .filter(|record| record.activity_class() == activity)
        .collect();
    if selected.is_empty() {
        return Err(MarketError::UnknownActivity {
            activity: activity.to_string(),
        });
    }
    Ok(selected)
}

/// Recomputes metrics and structure for the activity a caller selected.
pub fn analyze_activity(records: &[Record], activity: &str) -> Result<ActivityAnalysis<String>> {
    let selected = activity_records(records, activity)?;
    let metrics = ConcentrationMetrics::from_records(selected, Record::firm_name)?;
    let structure = StructureThresholds::default().classify(
        metrics.hhi,
        metrics.cr4,
        metrics.establishment_count,
    );
    Ok(ActivityAnalysis {
        activity: activity.to_string(),
        metrics,
        structure,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn market(activity: &str, firms: &[(&str, usize)]) -> Vec<Record> {
        firms
            .iter()
            .flat_map(|(firm, units)| (0..*units).map(move |_| Record::new(*firm, activity)))
            .collect()
    }

    #[test]
    fn every_category_is_present_even_when_empty() {
        let records = market("bakeries", &[("A", 10)]);
        let buckets =
            partition_by_structure(&records, Record::activity_class, Record::firm_name).unwrap();

        assert_eq!(buckets.get(StructureCategory::Monopoly), &["bakeries"]);
        for category in [
            StructureCategory::Oligopoly,
            StructureCategory::MonopolisticCompetition,
            StructureCategory::PerfectCompetition,
        ] {
            assert!(buckets.get(category).is_empty());
        }
        assert_eq!(buckets.non_empty(), vec![StructureCategory::Monopoly]);
        assert_eq!(buckets.iter().count(), 4);
    }

    #[test]
    fn activities_are_bucketed_in_first_seen_order() {
        let mut records = market("cement", &[("A", 4), ("B", 3), ("C", 2), ("D", 1)]);
        records.extend(market("pharmacies", &[("X", 9)]));
        records.extend(market("glass", &[("G", 5), ("H", 5)]));
        let spread: Vec<(String, usize)> = (0..30).map(|i| (format!("shop-{i}"), 1)).collect();
        let spread: Vec<(&str, usize)> = spread.iter().map(|(n, u)| (n.as_str(), *u)).collect();
        records.extend(market("tortillerias", &spread));

        let buckets =
            partition_by_structure(&records, Record::activity_class, Record::firm_name).unwrap();

        assert_eq!(buckets.get(StructureCategory::Monopoly), &["pharmacies"]);
        assert_eq!(buckets.get(StructureCategory::Oligopoly), &["cement", "glass"]);
        assert_eq!(buckets.get(StructureCategory::PerfectCompetition), &["tortillerias"]);
        assert_eq!(buckets.activity_count(), 4);
    }

    #[test]
    fn crowded_chain_market_is_monopolistic_competition() {
        // 20 establishments: one chain with 8, twelve singles.
        // HHI = 10000 * (0.16 + 12 * 0.0025) = 1900.
        let mut firms = vec![("chain", 8)];
        let singles: Vec<String> = (0..12).map(|i| format!("s{i}")).collect();
        firms.extend(singles.iter().map(|name| (name.as_str(), 1)));
        let records = market("cafes", &firms);

        let analyses =
            analyze_markets(&records, Record::activity_class, Record::firm_name).unwrap();
        assert_eq!(analyses.len(), 1);
        assert_relative_eq!(analyses[0].metrics.hhi, 1_900.0, epsilon = 1e-9);
        assert_eq!(analyses[0].structure, StructureCategory::MonopolisticCompetition);
    }

    #[test]
    fn cr4_is_reported_for_every_structure() {
        let spread: Vec<String> = (0..20).map(|i| format!("f{i}")).collect();
        let firms: Vec<(&str, usize)> = spread.iter().map(|n| (n.as_str(), 1)).collect();
        let records = market("laundries", &firms);

        let analysis = analyze_activity(&records, "laundries").unwrap();
        assert_eq!(analysis.structure, StructureCategory::PerfectCompetition);
        assert_relative_eq!(analysis.metrics.cr4, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn unknown_activity_is_an_error() {
        let records = market("bakeries", &[("A", 1)]);
        let err = analyze_activity(&records, "mines").unwrap_err();
        assert_eq!(
            err,
            MarketError::UnknownActivity {
                activity: "mines".to_string()
            }
        );
    }

    #[test]
    fn custom_thresholds_flow_through_partition() {
        let records = market("cement", &[("A", 4), ("B", 3), ("C", 2), ("D", 1)]);
        let lenient = StructureThresholds {
            monopoly_hhi: 2_000.0,
            monopoly_cr4: 0.5,
            ..StructureThresholds::default()
        };
        let buckets = partition_by_structure_with(
            &records,
            Record::activity_class,
            Record::firm_name,
            &lenient,
        )
        .unwrap();
        assert_eq!(buckets.get(StructureCategory::Monopoly), &["cement"]);
    }
}
