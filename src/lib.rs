//! Market-structure classification from establishment census data.
//!
//! Given one record per business establishment (firm name, economic-activity
//! class and optional coordinates), this crate
//!
//! - computes market shares, the four-firm concentration ratio and the
//!   Herfindahl-Hirschman index per activity (`concentration` module),
//! - assigns each activity one of four competitive structures through an ordered
//!   threshold policy (`structure` module),
//! - buckets every activity under its structure (`partition` module), and
//! - predicts price, quantity and profit with the closed-form model that fits the
//!   structure (`equilibrium` module).
//!
//! All computations are pure and deterministic. Reading the census file and
//! rendering results belong to the caller; `data` only lifts already-parsed rows
//! into [`Record`]s.
//!
//! # Quick start
//!
//! ```
//! use marketscope::{partition_by_structure, solve_for_structure, ModelParameters, Record};
//! use marketscope::partition::analyze_activity;
//!
//! let records = vec![
//!     Record::new("Cemex", "cement"),
//!     Record::new("Cemex", "cement"),
//!     Record::new("Holcim", "cement"),
//!     Record::new("Moctezuma", "cement"),
//! ];
//!
//! let buckets = partition_by_structure(&records, Record::activity_class, Record::firm_name)
//!     .expect("non-empty markets");
//! for (structure, activities) in buckets.iter() {
//!     println!("{structure}: {activities:?}");
//! }
//!
//! let analysis = analyze_activity(&records, "cement").expect("known activity");
//! let params = ModelParameters::default().with_firm_count(analysis.metrics.establishment_count);
//! let results = solve_for_structure(analysis.structure, &params).expect("valid parameters");
//! assert!(!results.is_empty());
//! ```

pub mod concentration;
pub mod data;
pub mod equilibrium;
pub mod error;
pub mod geography;
pub mod parameters;
pub mod partition;
pub mod structure;

pub use concentration::{compute_hhi, compute_market_shares, ConcentrationMetrics};
pub use data::{ColumnMapping, Record};
pub use equilibrium::{solve, solve_for_structure, EquilibriumModel, EquilibriumResult};
pub use error::{MarketError, Result};
pub use parameters::ModelParameters;
pub use partition::{partition_by_structure, ActivityAnalysis, StructureBuckets};
pub use structure::{classify_structure, StructureCategory, StructureThresholds};
