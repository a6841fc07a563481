//! Pollutant Parameter Input
//!
//! Five independent sliders (PM10, CO, SO2, NO2, O3). Every update is clamped
//! to the pollutant's domain and snapped to its step; the last write wins.
//! There is no cross-parameter validation.
//!
//! The model is the only writer of a [`ParameterSet`]; the orchestrator reads
//! a snapshot on submission.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five pollutants the service classifies on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    /// Particulate matter up to 10 µm
    Pm10,
    /// Carbon monoxide
    Co,
    /// Sulfur dioxide
    So2,
    /// Nitrogen dioxide
    No2,
    /// Ozone
    O3,
}

impl Pollutant {
    /// All pollutants in display order
    pub const ALL: [Pollutant; 5] = [
        Pollutant::Pm10,
        Pollutant::Co,
        Pollutant::So2,
        Pollutant::No2,
        Pollutant::O3,
    ];

    /// Display label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pm10 => "PM10",
            Self::Co => "CO",
            Self::So2 => "SO2",
            Self::No2 => "NO2",
            Self::O3 => "O3",
        }
    }

    /// Measurement unit
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Pm10 => "μg/m³",
            Self::Co => "ppm",
            Self::So2 | Self::No2 | Self::O3 => "ppb",
        }
    }

    /// One-line explanation shown under the slider
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Pm10 => "Particulate matter 10 micrometers or less in diameter",
            Self::Co => "Carbon monoxide concentration in parts per million",
            Self::So2 => "Sulfur dioxide concentration in parts per billion",
            Self::No2 => "Nitrogen dioxide concentration in parts per billion",
            Self::O3 => "Ozone concentration in parts per billion",
        }
    }

    /// Slider domain
    #[must_use]
    pub fn bounds(&self) -> ParameterBounds {
        // Every pollutant currently shares the same slider range
        ParameterBounds::new(0.0, 300.0, 1.0)
    }

    /// Baseline reading a fresh model starts from
    #[must_use]
    pub fn baseline(&self) -> f64 {
        match self {
            Self::Pm10 => 50.0,
            Self::Co => 1.5,
            Self::So2 => 20.0,
            Self::No2 => 25.0,
            Self::O3 => 35.0,
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed slider domain with a step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterBounds {
    /// Lowest value
    pub min: f64,
    /// Highest value
    pub max: f64,
    /// Increment between slider stops
    pub step: f64,
}

impl ParameterBounds {
    /// Create bounds; `min <= max` and `step > 0` are expected
    #[must_use]
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Snap `value` to the nearest step and clamp it into the domain
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let snapped = if self.step > 0.0 {
            self.min + ((value - self.min) / self.step).round() * self.step
        } else {
            value
        };
        snapped.clamp(self.min, self.max)
    }

    /// Whether `value` lies inside the domain
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Position of `value` within the domain, 0.0 to 1.0
    #[must_use]
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Colour band of a slider, by how far along its range it sits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliderLevel {
    /// Below 25%
    Low,
    /// 25% to 50%
    Fair,
    /// 50% to 75%
    Elevated,
    /// 75% and above
    High,
}

impl SliderLevel {
    /// Band for a fill fraction in 0.0..=1.0
    #[must_use]
    pub fn from_fraction(fraction: f64) -> Self {
        let percent = fraction * 100.0;
        if percent < 25.0 {
            Self::Low
        } else if percent < 50.0 {
            Self::Fair
        } else if percent < 75.0 {
            Self::Elevated
        } else {
            Self::High
        }
    }

    /// Fill colour
    #[must_use]
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (59, 130, 246),
            Self::Fair => (16, 185, 129),
            Self::Elevated => (245, 158, 11),
            Self::High => (239, 68, 68),
        }
    }
}

/// Snapshot of all five readings
///
/// Serialises to the `/predict/weather` request body.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParameterSet {
    pm10: f64,
    co: f64,
    so2: f64,
    no2: f64,
    o3: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            pm10: Pollutant::Pm10.baseline(),
            co: Pollutant::Co.baseline(),
            so2: Pollutant::So2.baseline(),
            no2: Pollutant::No2.baseline(),
            o3: Pollutant::O3.baseline(),
        }
    }
}

impl ParameterSet {
    /// Reading for one pollutant
    #[must_use]
    pub fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Pm10 => self.pm10,
            Pollutant::Co => self.co,
            Pollutant::So2 => self.so2,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
        }
    }

    fn slot_mut(&mut self, pollutant: Pollutant) -> &mut f64 {
        match pollutant {
            Pollutant::Pm10 => &mut self.pm10,
            Pollutant::Co => &mut self.co,
            Pollutant::So2 => &mut self.so2,
            Pollutant::No2 => &mut self.no2,
            Pollutant::O3 => &mut self.o3,
        }
    }

    /// Whether every reading lies inside its domain
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        Pollutant::ALL
            .iter()
            .all(|p| p.bounds().contains(self.get(*p)))
    }

    /// `(pollutant, value)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        Pollutant::ALL.iter().map(move |p| (*p, self.get(*p)))
    }
}

/// Slider state for the parameter form
#[derive(Clone, Debug, Default)]
pub struct ParameterInputModel {
    values: ParameterSet,
}

impl ParameterInputModel {
    /// Create a model holding the baseline readings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move one slider
    ///
    /// The value is snapped and clamped; the applied value is returned.
    /// Non-finite input is ignored and the current value kept.
    pub fn set(&mut self, pollutant: Pollutant, value: f64) -> f64 {
        if !value.is_finite() {
            tracing::warn!(pollutant = %pollutant, value, "Ignoring non-finite slider value");
            return self.values.get(pollutant);
        }
        let applied = pollutant.bounds().clamp(value);
        *self.values.slot_mut(pollutant) = applied;
        tracing::trace!(pollutant = %pollutant, requested = value, applied, "Slider moved");
        applied
    }

    /// Current value of one slider
    #[must_use]
    pub fn get(&self, pollutant: Pollutant) -> f64 {
        self.values.get(pollutant)
    }

    /// Colour band of one slider
    #[must_use]
    pub fn level(&self, pollutant: Pollutant) -> SliderLevel {
        SliderLevel::from_fraction(pollutant.bounds().fraction(self.get(pollutant)))
    }

    /// Copy of all readings, handed to the orchestrator on submit
    #[must_use]
    pub fn snapshot(&self) -> ParameterSet {
        self.values
    }

    /// Return every slider to its baseline
    pub fn reset(&mut self) {
        self.values = ParameterSet::default();
    }
}
