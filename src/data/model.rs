use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Param – the measured elliptical-motion parameters
// ---------------------------------------------------------------------------

/// One of the four elliptical-motion parameters recorded per sample.
///
/// Each variant carries its CSV column name and display labels as data, so
/// downstream code iterates [`Param::ALL`] instead of dispatching on plot
/// subclasses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    SemiMajorAxis,
    SemiMinorAxis,
    RotationAngle,
    Eccentricity,
}

impl Param {
    /// All parameters, in canonical (plot stacking) order.
    pub const ALL: [Param; 4] = [
        Param::SemiMajorAxis,
        Param::SemiMinorAxis,
        Param::RotationAngle,
        Param::Eccentricity,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Column name in the input CSV.
    pub fn column_name(self) -> &'static str {
        match self {
            Param::SemiMajorAxis => "semi_major_axis",
            Param::SemiMinorAxis => "semi_minor_axis",
            Param::RotationAngle => "rotation_angle_deg",
            Param::Eccentricity => "eccentricity",
        }
    }

    /// Human-readable plot title.
    pub fn label(self) -> &'static str {
        match self {
            Param::SemiMajorAxis => "Semi-Major Axis",
            Param::SemiMinorAxis => "Semi-Minor Axis",
            Param::RotationAngle => "Rotation Angle",
            Param::Eccentricity => "Eccentricity",
        }
    }

    /// Y-axis label for the corresponding plot.
    pub fn y_axis_label(self) -> &'static str {
        match self {
            Param::SemiMajorAxis | Param::SemiMinorAxis => "Length",
            Param::RotationAngle => "Angle (degrees)",
            Param::Eccentricity => "Eccentricity",
        }
    }

    /// Position in [`Param::ALL`], used to index per-parameter arrays.
    pub fn index(self) -> usize {
        match self {
            Param::SemiMajorAxis => 0,
            Param::SemiMinorAxis => 1,
            Param::RotationAngle => 2,
            Param::Eccentricity => 3,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Measurement – one row of the loaded table
// ---------------------------------------------------------------------------

/// A single sample: absolute timestamp, derived elapsed time, and one value
/// per parameter (indexed by [`Param::index`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub timestamp: NaiveDateTime,
    /// Seconds since the first sample, fractional, non-decreasing.
    pub elapsed_seconds: f64,
    pub values: [f64; Param::COUNT],
}

impl Measurement {
    pub fn value(&self, param: Param) -> f64 {
        self.values[param.index()]
    }
}

// ---------------------------------------------------------------------------
// PendulumDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Created whole by the loader on a successful load
/// and never mutated afterwards; a new file load replaces it entirely.
#[derive(Debug, Clone)]
pub struct PendulumDataset {
    /// All samples, ordered by timestamp.
    pub samples: Vec<Measurement>,
}

impl PendulumDataset {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All values of one parameter, in sample order.
    pub fn column_values(&self, param: Param) -> Vec<f64> {
        self.samples.iter().map(|m| m.value(param)).collect()
    }

    /// Total recorded timespan in seconds (0 for a single sample).
    pub fn timespan_seconds(&self) -> f64 {
        self.samples.last().map(|m| m.elapsed_seconds).unwrap_or(0.0)
    }
}
