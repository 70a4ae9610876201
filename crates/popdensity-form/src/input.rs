//! Raw form values and their validated counterpart.

use tracing::warn;

use crate::error::FormError;
use crate::field::{FIELDS, FieldId};

/// A single field value as entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// Whole number from an integer box.
    Integer(i64),
    /// Real number from a slider.
    Real(f64),
}

impl FieldValue {
    /// Return the value as `f64`.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            FieldValue::Integer(v) => v as f64,
            FieldValue::Real(v) => v,
        }
    }
}

/// The nine values as entered, before clamping.
///
/// Percentage fields hold percentages (0.5 means 0.5 %), exactly as the
/// user typed them.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FormInput {
    /// Population (2020).
    pub population: i64,
    /// Land area in km².
    pub land_area: i64,
    /// Absolute yearly population change.
    pub net_change: i64,
    /// Yearly change, in percent.
    pub yearly_change_pct: f64,
    /// Net migrants.
    pub migrants_net: i64,
    /// Fertility rate.
    pub fert_rate: f64,
    /// Median age.
    pub med_age: f64,
    /// Urban population share, in percent.
    pub urban_pop_pct: f64,
    /// Share of the world population, in percent.
    pub world_share_pct: f64,
}

impl Default for FormInput {
    /// The form's initial values.
    fn default() -> Self {
        Self {
            population: FieldId::Population.spec().default as i64,
            land_area: FieldId::LandArea.spec().default as i64,
            net_change: FieldId::NetChange.spec().default as i64,
            yearly_change_pct: FieldId::YearlyChangePct.spec().default,
            migrants_net: FieldId::MigrantsNet.spec().default as i64,
            fert_rate: FieldId::FertRate.spec().default,
            med_age: FieldId::MedAge.spec().default,
            urban_pop_pct: FieldId::UrbanPopPct.spec().default,
            world_share_pct: FieldId::WorldSharePct.spec().default,
        }
    }
}

impl FormInput {
    /// Read one field.
    #[must_use]
    pub fn get(&self, field: FieldId) -> FieldValue {
        match field {
            FieldId::Population => FieldValue::Integer(self.population),
            FieldId::LandArea => FieldValue::Integer(self.land_area),
            FieldId::NetChange => FieldValue::Integer(self.net_change),
            FieldId::YearlyChangePct => FieldValue::Real(self.yearly_change_pct),
            FieldId::MigrantsNet => FieldValue::Integer(self.migrants_net),
            FieldId::FertRate => FieldValue::Real(self.fert_rate),
            FieldId::MedAge => FieldValue::Real(self.med_age),
            FieldId::UrbanPopPct => FieldValue::Real(self.urban_pop_pct),
            FieldId::WorldSharePct => FieldValue::Real(self.world_share_pct),
        }
    }

    /// Write one field.
    ///
    /// An integer written into a slider is widened; a real written into an
    /// integer box is truncated toward zero.
    pub fn set(&mut self, field: FieldId, value: FieldValue) {
        let int = match value {
            FieldValue::Integer(v) => v,
            FieldValue::Real(v) => v as i64,
        };
        let real = value.as_f64();
        match field {
            FieldId::Population => self.population = int,
            FieldId::LandArea => self.land_area = int,
            FieldId::NetChange => self.net_change = int,
            FieldId::YearlyChangePct => self.yearly_change_pct = real,
            FieldId::MigrantsNet => self.migrants_net = int,
            FieldId::FertRate => self.fert_rate = real,
            FieldId::MedAge => self.med_age = real,
            FieldId::UrbanPopPct => self.urban_pop_pct = real,
            FieldId::WorldSharePct => self.world_share_pct = real,
        }
    }

    /// Clamp every bounded field and reject non-finite reals.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NonFiniteField`] for the first NaN or infinite field.
    pub fn validate(&self) -> Result<ValidatedInput, FormError> {
        let mut clamped = self.clone();
        for spec in &FIELDS {
            let value = match self.get(spec.id) {
                FieldValue::Integer(v) => FieldValue::Integer(spec.clamp_int(v)),
                FieldValue::Real(v) => {
                    if !v.is_finite() {
                        return Err(FormError::NonFiniteField {
                            field: spec.id,
                            value: v,
                        });
                    }
                    FieldValue::Real(spec.clamp(v))
                }
            };
            if value != self.get(spec.id) {
                warn!(
                    field = %spec.id,
                    entered = self.get(spec.id).as_f64(),
                    clamped = value.as_f64(),
                    "value out of range, clamped"
                );
            }
            clamped.set(spec.id, value);
        }
        Ok(ValidatedInput(clamped))
    }
}

/// A [`FormInput`] whose values are finite and inside their bounds.
///
/// Only obtainable through [`FormInput::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput(FormInput);

impl ValidatedInput {
    /// Borrow the clamped values.
    #[must_use]
    pub fn values(&self) -> &FormInput {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, FormInput};
    use crate::error::FormError;
    use crate::field::{FIELDS, FieldId};

    #[test]
    fn default_matches_field_table() {
        let input = FormInput::default();
        for spec in &FIELDS {
            assert_eq!(input.get(spec.id).as_f64(), spec.default, "{}", spec.id);
        }
    }

    #[test]
    fn in_range_input_is_unchanged() {
        let input = FormInput::default();
        let validated = input.validate().unwrap();
        assert_eq!(validated.values(), &input);
    }

    #[test]
    fn out_of_range_sliders_are_clamped() {
        let input = FormInput {
            fert_rate: 12.0,
            med_age: 2.0,
            urban_pop_pct: 140.0,
            yearly_change_pct: -9.0,
            world_share_pct: 25.0,
            ..FormInput::default()
        };
        let v = input.validate().unwrap();
        assert_eq!(v.values().fert_rate, 8.0);
        assert_eq!(v.values().med_age, 10.0);
        assert_eq!(v.values().urban_pop_pct, 100.0);
        assert_eq!(v.values().yearly_change_pct, -5.0);
        assert_eq!(v.values().world_share_pct, 20.0);
    }

    #[test]
    fn negative_population_and_area_clamp_to_zero() {
        let input = FormInput {
            population: -10,
            land_area: -1,
            net_change: -500,
            migrants_net: -20_000,
            ..FormInput::default()
        };
        let v = input.validate().unwrap();
        assert_eq!(v.values().population, 0);
        assert_eq!(v.values().land_area, 0);
        // Unbounded integer fields keep their sign.
        assert_eq!(v.values().net_change, -500);
        assert_eq!(v.values().migrants_net, -20_000);
    }

    #[test]
    fn nan_is_rejected() {
        let input = FormInput {
            med_age: f64::NAN,
            ..FormInput::default()
        };
        let err = input.validate().unwrap_err();
        assert!(matches!(
            err,
            FormError::NonFiniteField {
                field: FieldId::MedAge,
                ..
            }
        ));
    }

    #[test]
    fn infinity_is_rejected() {
        let input = FormInput {
            urban_pop_pct: f64::INFINITY,
            ..FormInput::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn set_then_get() {
        let mut input = FormInput::default();
        input.set(FieldId::FertRate, FieldValue::Real(3.4));
        input.set(FieldId::Population, FieldValue::Integer(42));
        input.set(FieldId::MedAge, FieldValue::Integer(41));
        input.set(FieldId::LandArea, FieldValue::Real(99.9));
        assert_eq!(input.get(FieldId::FertRate), FieldValue::Real(3.4));
        assert_eq!(input.get(FieldId::Population), FieldValue::Integer(42));
        assert_eq!(input.get(FieldId::MedAge), FieldValue::Real(41.0));
        assert_eq!(input.get(FieldId::LandArea), FieldValue::Integer(99));
    }
}
