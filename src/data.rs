//! Establishment records and the helpers that lift parsed tabular rows into them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};

/// Census column holding the establishment's firm name.
pub const DEFAULT_FIRM_COLUMN: &str = "Nombre de la Unidad Económica";
/// Census column holding the economic-activity class.
pub const DEFAULT_ACTIVITY_COLUMN: &str = "Nombre de clase de la actividad";
/// Census column holding the latitude.
pub const DEFAULT_LATITUDE_COLUMN: &str = "Latitud";
/// Census column holding the longitude.
pub const DEFAULT_LONGITUDE_COLUMN: &str = "Longitud";

/// One business establishment observed in the census.
///
/// Several records may share a firm name (a chain with many branches) and many
/// records share an activity class. Coordinates are optional and never take part
/// in classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    firm_name: String,
    activity_class: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl Record {
    /// Creates a record without coordinates.
    pub fn new<F: Into<String>, A: Into<String>>(firm_name: F, activity_class: A) -> Self {
        Self {
            firm_name: firm_name.into(),
            activity_class: activity_class.into(),
            latitude: None,
            longitude: None,
        }
    }

    /// Attaches coordinates. Non-finite values are stored as missing.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude).filter(|v| v.is_finite());
        self.longitude = Some(longitude).filter(|v| v.is_finite());
        self
    }

    /// Builds a record from a parsed tabular row keyed by column name.
    ///
    /// Firm and activity are required and kept verbatim, so `"OXXO "` and `"OXXO"`
    /// count as different firms. Coordinates are parsed tolerantly: an absent
    /// column, a blank cell or a non-numeric value all become `None`.
    pub fn from_row(
        row: &HashMap<String, String>,
        mapping: &ColumnMapping,
        row_index: usize,
    ) -> Result<Self> {
        let firm_name = required_cell(row, &mapping.firm, row_index)?;
        let activity_class = required_cell(row, &mapping.activity, row_index)?;

        Ok(Self {
            firm_name,
            activity_class,
            latitude: row.get(&mapping.latitude).and_then(|raw| parse_coordinate(raw)),
            longitude: row.get(&mapping.longitude).and_then(|raw| parse_coordinate(raw)),
        })
    }

    /// Returns the firm name.
    pub fn firm_name(&self) -> &str {
        &self.firm_name
    }

    /// Returns the economic-activity class.
    pub fn activity_class(&self) -> &str {
        &self.activity_class
    }

    /// Returns the latitude if it was present and numeric.
    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    /// Returns the longitude if it was present and numeric.
    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    /// Returns `(latitude, longitude)` when both are available.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Human-readable column names used to read records out of a table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Column identifying the firm.
    pub firm: String,
    /// Column identifying the economic-activity class.
    pub activity: String,
    /// Optional latitude column.
    pub latitude: String,
    /// Optional longitude column.
    pub longitude: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            firm: DEFAULT_FIRM_COLUMN.to_string(),
            activity: DEFAULT_ACTIVITY_COLUMN.to_string(),
            latitude: DEFAULT_LATITUDE_COLUMN.to_string(),
            longitude: DEFAULT_LONGITUDE_COLUMN.to_string(),
        }
    }
}

impl ColumnMapping {
    /// Overrides the firm column while keeping other defaults.
    pub fn with_firm<S: Into<String>>(mut self, column: S) -> Self {
        self.firm = column.into();
        self
    }

    /// Overrides the activity column.
    pub fn with_activity<S: Into<String>>(mut self, column: S) -> Self {
        self.activity = column.into();
        self
    }

    /// Overrides both coordinate columns.
    pub fn with_coordinates<L: Into<String>, G: Into<String>>(
        mut self,
        latitude: L,
        longitude: G,
    ) -> Self {
        self.latitude = latitude.into();
        self.longitude = longitude.into();
        self
    }
}

/// Converts every row of a parsed table, stopping at the first invalid row.
pub fn records_from_rows<'a, I>(rows: I, mapping: &ColumnMapping) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = &'a HashMap<String, String>>,
{
    rows.into_iter()
        .enumerate()
        .map(|(row_index, row)| Record::from_row(row, mapping, row_index))
        .collect()
}

fn required_cell(row: &HashMap<String, String>, column: &str, row_index: usize) -> Result<String> {
    let value = row.get(column).ok_or_else(|| MarketError::MissingColumn {
        column: column.to_string(),
    })?;
    if value.trim().is_empty() {
        return Err(MarketError::MissingValue {
            column: column.to_string(),
            row: row_index,
        });
    }
    Ok(value.clone())
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> HashMap<String, String> {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn from_row_reads_default_census_columns() {
        let cells = row(&[
            (DEFAULT_FIRM_COLUMN, " OXXO "),
            (DEFAULT_ACTIVITY_COLUMN, "Comercio al por menor"),
            (DEFAULT_LATITUDE_COLUMN, "19.4326"),
            (DEFAULT_LONGITUDE_COLUMN, "-99.1332"),
        ]);

        let record = Record::from_row(&cells, &ColumnMapping::default(), 0).unwrap();
        assert_eq!(record.firm_name(), " OXXO ");
        assert_eq!(record.activity_class(), "Comercio al por menor");
        assert_eq!(record.coordinates(), Some((19.4326, -99.1332)));
    }

    #[test]
    fn malformed_coordinates_become_missing() {
        let cells = row(&[
            (DEFAULT_FIRM_COLUMN, "A"),
            (DEFAULT_ACTIVITY_COLUMN, "x"),
            (DEFAULT_LATITUDE_COLUMN, "n/a"),
            (DEFAULT_LONGITUDE_COLUMN, "NaN"),
        ]);

        let record = Record::from_row(&cells, &ColumnMapping::default(), 3).unwrap();
        assert_eq!(record.latitude(), None);
        assert_eq!(record.longitude(), None);

        let no_coordinates = row(&[(DEFAULT_FIRM_COLUMN, "A"), (DEFAULT_ACTIVITY_COLUMN, "x")]);
        let record = Record::from_row(&no_coordinates, &ColumnMapping::default(), 4).unwrap();
        assert_eq!(record.coordinates(), None);
    }

    #[test]
    fn missing_firm_is_rejected() {
        let blank = row(&[(DEFAULT_FIRM_COLUMN, "  "), (DEFAULT_ACTIVITY_COLUMN, "x")]);
        let err = Record::from_row(&blank, &ColumnMapping::default(), 7).unwrap_err();
        assert_eq!(
            err,
            MarketError::MissingValue {
                column: DEFAULT_FIRM_COLUMN.to_string(),
                row: 7
            }
        );

        let absent = row(&[(DEFAULT_ACTIVITY_COLUMN, "x")]);
        let err = Record::from_row(&absent, &ColumnMapping::default(), 0).unwrap_err();
        assert!(matches!(err, MarketError::MissingColumn { .. }));
    }

    #[test]
    fn padded_names_stay_distinct_firms() {
        let rows = vec![
            row(&[(DEFAULT_FIRM_COLUMN, "OXXO"), (DEFAULT_ACTIVITY_COLUMN, "x")]),
            row(&[(DEFAULT_FIRM_COLUMN, "OXXO "), (DEFAULT_ACTIVITY_COLUMN, "x")]),
        ];

        let records = records_from_rows(&rows, &ColumnMapping::default()).unwrap();
        assert_ne!(records[0].firm_name(), records[1].firm_name());
    }

    #[test]
    fn bulk_conversion_stops_at_first_invalid_row() {
        let rows = vec![
            row(&[(DEFAULT_FIRM_COLUMN, "A"), (DEFAULT_ACTIVITY_COLUMN, "x")]),
            row(&[(DEFAULT_FIRM_COLUMN, ""), (DEFAULT_ACTIVITY_COLUMN, "x")]),
            row(&[(DEFAULT_ACTIVITY_COLUMN, "x")]),
        ];

        let err = records_from_rows(&rows, &ColumnMapping::default()).unwrap_err();
        assert_eq!(
            err,
            MarketError::MissingValue {
                column: DEFAULT_FIRM_COLUMN.to_string(),
                row: 1
            }
        );
    }

    #[test]
    fn custom_mapping_and_bulk_conversion() {
        let mapping = ColumnMapping::default()
            .with_firm("firm")
            .with_activity("naics")
            .with_coordinates("lat", "lon");
        let rows = vec![
            row(&[("firm", "A"), ("naics", "4451"), ("lat", "1.5"), ("lon", "2.5")]),
            row(&[("firm", "B"), ("naics", "4451")]),
        ];

        let records = records_from_rows(&rows, &mapping).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].coordinates(), Some((1.5, 2.5)));
        assert_eq!(records[1].firm_name(), "B");
    }
}
