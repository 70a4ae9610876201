//! The nine form fields, their bounds, defaults and step sizes.

use std::fmt;

/// Identifies one of the nine form fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    /// Total population.
    Population,
    /// Land area in km².
    LandArea,
    /// Absolute yearly population change.
    NetChange,
    /// Yearly change, in percent.
    YearlyChangePct,
    /// Net migrants.
    MigrantsNet,
    /// Fertility rate.
    FertRate,
    /// Median age.
    MedAge,
    /// Urban population share, in percent.
    UrbanPopPct,
    /// Share of the world population, in percent.
    WorldSharePct,
}

impl FieldId {
    /// Return the spec row for this field.
    #[must_use]
    pub fn spec(self) -> &'static FieldSpec {
        // FIELDS is declared in FieldId order.
        &FIELDS[self as usize]
    }

    /// Snake-case name, as used in JSON and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FieldId::Population => "population",
            FieldId::LandArea => "land_area",
            FieldId::NetChange => "net_change",
            FieldId::YearlyChangePct => "yearly_change_pct",
            FieldId::MigrantsNet => "migrants_net",
            FieldId::FertRate => "fert_rate",
            FieldId::MedAge => "med_age",
            FieldId::UrbanPopPct => "urban_pop_pct",
            FieldId::WorldSharePct => "world_share_pct",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a field is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Whole-number entry box.
    Integer,
    /// Bounded real-valued slider.
    Slider,
}

/// Static description of a form field.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FieldSpec {
    /// Which field this row describes.
    pub id: FieldId,
    /// Human-readable label shown in the form.
    pub label: &'static str,
    /// Entry style.
    pub kind: FieldKind,
    /// Inclusive lower bound, if any.
    pub min: Option<f64>,
    /// Inclusive upper bound, if any.
    pub max: Option<f64>,
    /// Initial value.
    pub default: f64,
    /// Slider/box increment.
    pub step: f64,
    /// Decimal places used when displaying the value.
    pub precision: usize,
}

impl FieldSpec {
    /// Clamp `value` into `[min, max]`, leaving unbounded sides alone.
    ///
    /// NaN passes through unchanged; callers reject it separately.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let mut v = value;
        if let Some(min) = self.min
            && v < min
        {
            v = min;
        }
        if let Some(max) = self.max
            && v > max
        {
            v = max;
        }
        v
    }

    /// Clamp an integer entry. Integer fields only carry whole bounds.
    #[must_use]
    pub fn clamp_int(&self, value: i64) -> i64 {
        let mut v = value;
        if let Some(min) = self.min {
            v = v.max(min as i64);
        }
        if let Some(max) = self.max {
            v = v.min(max as i64);
        }
        v
    }

    /// Return `true` if `value` lies inside the bounds.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    /// Format `value` with this field's display precision.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.precision)
    }

    /// Describe the bounds, e.g. `[0.0, 8.0]`, `>= 0` or `any`.
    #[must_use]
    pub fn bounds_label(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("[{}, {}]", self.format(min), self.format(max)),
            (Some(min), None) => format!(">= {}", self.format(min)),
            (None, Some(max)) => format!("<= {}", self.format(max)),
            (None, None) => "any".to_string(),
        }
    }
}

/// All form fields in form order.
pub static FIELDS: [FieldSpec; 9] = [
    FieldSpec {
        id: FieldId::Population,
        label: "Population (2020)",
        kind: FieldKind::Integer,
        min: Some(0.0),
        max: None,
        default: 10_000_000.0,
        step: 1.0,
        precision: 0,
    },
    FieldSpec {
        id: FieldId::LandArea,
        label: "Land Area (Km²)",
        kind: FieldKind::Integer,
        min: Some(0.0),
        max: None,
        default: 50_000.0,
        step: 1.0,
        precision: 0,
    },
    FieldSpec {
        id: FieldId::NetChange,
        label: "Net Change",
        kind: FieldKind::Integer,
        min: None,
        max: None,
        default: 10_000.0,
        step: 1.0,
        precision: 0,
    },
    FieldSpec {
        id: FieldId::YearlyChangePct,
        label: "Yearly Change (%)",
        kind: FieldKind::Slider,
        min: Some(-5.0),
        max: Some(10.0),
        default: 0.5,
        step: 0.1,
        precision: 2,
    },
    FieldSpec {
        id: FieldId::MigrantsNet,
        label: "Migrants (net)",
        kind: FieldKind::Integer,
        min: None,
        max: None,
        default: 0.0,
        step: 1.0,
        precision: 0,
    },
    FieldSpec {
        id: FieldId::FertRate,
        label: "Fert. Rate",
        kind: FieldKind::Slider,
        min: Some(0.0),
        max: Some(8.0),
        default: 2.0,
        step: 0.1,
        precision: 1,
    },
    FieldSpec {
        id: FieldId::MedAge,
        label: "Med. Age",
        kind: FieldKind::Slider,
        min: Some(10.0),
        max: Some(60.0),
        default: 30.0,
        step: 0.1,
        precision: 1,
    },
    FieldSpec {
        id: FieldId::UrbanPopPct,
        label: "Urban Pop (%)",
        kind: FieldKind::Slider,
        min: Some(0.0),
        max: Some(100.0),
        default: 50.0,
        step: 0.1,
        precision: 1,
    },
    FieldSpec {
        id: FieldId::WorldSharePct,
        label: "World Share (%)",
        kind: FieldKind::Slider,
        min: Some(0.0),
        max: Some(20.0),
        default: 0.1,
        step: 0.1,
        precision: 2,
    },
];
