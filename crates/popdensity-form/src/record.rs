//! The single-row record handed to the classifier.

use serde::ser::{SerializeSeq, Serializer};

use crate::input::ValidatedInput;

/// Column names in the order the classifier was trained on.
///
/// `Yearly Change` precedes `Net Change` here even though the form shows
/// them the other way round.
pub const COLUMNS: [&str; 9] = [
    "Population (2020)",
    "Land Area (Km²)",
    "Yearly Change",
    "Net Change",
    "Migrants (net)",
    "Fert. Rate",
    "Med. Age",
    "Urban Pop %",
    "World Share",
];

/// Nine named feature values in [`COLUMNS`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    values: [f64; 9],
}

/// Convert a percentage entry to a fraction.
#[must_use]
pub fn percent_to_fraction(pct: f64) -> f64 {
    pct / 100.0
}

impl Record {
    /// Build the record from validated form values.
    ///
    /// The three percentage fields are divided by 100; everything else is
    /// passed through as `f64`.
    #[must_use]
    pub fn from_input(input: &ValidatedInput) -> Self {
        let v = input.values();
        Self {
            values: [
                v.population as f64,
                v.land_area as f64,
                percent_to_fraction(v.yearly_change_pct),
                v.net_change as f64,
                v.migrants_net as f64,
                v.fert_rate,
                v.med_age,
                percent_to_fraction(v.urban_pop_pct),
                percent_to_fraction(v.world_share_pct),
            ],
        }
    }

    /// Return the values in column order.
    #[must_use]
    pub fn values(&self) -> &[f64; 9] {
        &self.values
    }

    /// Iterate `(column name, value)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        COLUMNS.iter().copied().zip(self.values.iter().copied())
    }

    /// Look up a value by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns().find(|(name, _)| *name == column).map(|(_, v)| v)
    }

    /// Number of columns. Always nine.
    #[must_use]
    pub const fn len(&self) -> usize {
        COLUMNS.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Serializes as an ordered list of `{"column": ..., "value": ...}` so the
/// column order survives JSON consumers that reorder object keys.
impl serde::Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct Column {
            column: &'static str,
            value: f64,
        }

        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for (column, value) in self.columns() {
            seq.serialize_element(&Column { column, value })?;
        }
        seq.end()
    }
}
