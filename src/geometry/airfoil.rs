use serde::{Deserialize, Serialize};

use crate::utils::{cosspace, LookupError};

/// Chordwise stations per surface of a generated NACA section
const NACA_STATIONS: usize = 81;

/// An immutable 2-D section shape, normalized to unit chord.
///
/// Coordinates are stored in Selig order (upper trailing edge, around the
/// leading edge, lower trailing edge). Queries interpolate each surface
/// linearly in x/c.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AirfoilDefinition", into = "AirfoilDefinition")]
pub struct Airfoil {
    name: String,
    coordinates: Vec<[f64; 2]>,
    /// Upper surface, leading edge to trailing edge
    upper: Vec<[f64; 2]>,
    /// Lower surface, leading edge to trailing edge
    lower: Vec<[f64; 2]>,
    generated: bool,
}

/// How an airfoil appears in configuration files: a resolvable name or an
/// explicit outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum AirfoilDefinition {
    Named(String),
    Coordinates {
        name: String,
        coordinates: Vec<[f64; 2]>,
    },
}

impl TryFrom<AirfoilDefinition> for Airfoil {
    type Error = LookupError;

    fn try_from(definition: AirfoilDefinition) -> Result<Self, Self::Error> {
        match definition {
            AirfoilDefinition::Named(name) => Airfoil::new(&name),
            AirfoilDefinition::Coordinates { name, coordinates } => {
                Airfoil::from_coordinates(&name, coordinates)
            }
        }
    }
}

impl From<Airfoil> for AirfoilDefinition {
    fn from(airfoil: Airfoil) -> Self {
        if airfoil.generated {
            AirfoilDefinition::Named(airfoil.name)
        } else {
            AirfoilDefinition::Coordinates {
                name: airfoil.name,
                coordinates: airfoil.coordinates,
            }
        }
    }
}

impl Airfoil {
    /// Resolves an airfoil by name. NACA 4-digit designations
    /// (`naca2412`, `NACA 0012`) are generated analytically.
    pub fn new(name: &str) -> Result<Self, LookupError> {
        let digits = parse_naca4(name).ok_or_else(|| LookupError::UnknownAirfoil(name.to_string()))?;
        let [m, p, t] = digits;
        let mut airfoil = Self::from_coordinates(name, naca4_coordinates(m, p, t))?;
        airfoil.generated = true;
        Ok(airfoil)
    }

    /// Builds an airfoil from an explicit Selig-ordered outline.
    pub fn from_coordinates(name: &str, coordinates: Vec<[f64; 2]>) -> Result<Self, LookupError> {
        let invalid = |reason: &str| LookupError::InvalidCoordinates {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if coordinates.len() < 3 {
            return Err(invalid("at least three points are required"));
        }
        if coordinates
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite())
        {
            return Err(invalid("coordinates must be finite"));
        }

        let leading_edge = coordinates
            .iter()
            .enumerate()
            .fold(0, |best, (i, p)| if p[0] < coordinates[best][0] { i } else { best });
        if leading_edge == 0 || leading_edge == coordinates.len() - 1 {
            return Err(invalid("outline must wrap around the leading edge"));
        }

        let mut upper: Vec<[f64; 2]> = coordinates[..=leading_edge].iter().rev().copied().collect();
        let mut lower: Vec<[f64; 2]> = coordinates[leading_edge..].to_vec();
        upper.sort_by(|a, b| a[0].total_cmp(&b[0]));
        lower.sort_by(|a, b| a[0].total_cmp(&b[0]));

        Ok(Self {
            name: name.to_string(),
            coordinates,
            upper,
            lower,
            generated: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stored outline in Selig order.
    pub fn coordinates(&self) -> &[[f64; 2]] {
        &self.coordinates
    }

    pub fn upper_z(&self, x_over_c: f64) -> Result<f64, LookupError> {
        check_domain(x_over_c)?;
        Ok(interpolate(&self.upper, x_over_c))
    }

    pub fn lower_z(&self, x_over_c: f64) -> Result<f64, LookupError> {
        check_domain(x_over_c)?;
        Ok(interpolate(&self.lower, x_over_c))
    }

    /// Height of the mean camber line at `x_over_c`.
    pub fn local_camber(&self, x_over_c: f64) -> Result<f64, LookupError> {
        check_domain(x_over_c)?;
        Ok(self.camber_at(x_over_c))
    }

    /// Distance between the surfaces at `x_over_c`, never negative.
    pub fn local_thickness(&self, x_over_c: f64) -> Result<f64, LookupError> {
        check_domain(x_over_c)?;
        Ok((interpolate(&self.upper, x_over_c) - interpolate(&self.lower, x_over_c)).max(0.0))
    }

    /// Camber blended affinely towards `other`; `factor` 0 is `self`, 1 is
    /// `other`.
    pub fn blended_camber(&self, other: &Airfoil, factor: f64, x_over_c: f64) -> Result<f64, LookupError> {
        check_domain(x_over_c)?;
        Ok((1.0 - factor) * self.camber_at(x_over_c) + factor * other.camber_at(x_over_c))
    }

    /// The outline resampled on `n` cosine-spaced stations per surface, in
    /// Selig order (2n - 1 points, the leading edge shared).
    pub fn outline(&self, n: usize) -> Vec<[f64; 2]> {
        let stations = cosspace(0.0, 1.0, n.max(2));
        let upper = stations
            .iter()
            .rev()
            .map(|&x| [x, interpolate(&self.upper, x)]);
        let lower = stations
            .iter()
            .skip(1)
            .map(|&x| [x, interpolate(&self.lower, x)]);
        upper.chain(lower).collect()
    }

    /// Outline blended affinely towards `other` on the same stations.
    pub fn blended_outline(&self, other: &Airfoil, factor: f64, n: usize) -> Vec<[f64; 2]> {
        self.outline(n)
            .into_iter()
            .zip(other.outline(n))
            .map(|(a, b)| [a[0], (1.0 - factor) * a[1] + factor * b[1]])
            .collect()
    }

    fn camber_at(&self, x_over_c: f64) -> f64 {
        (interpolate(&self.upper, x_over_c) + interpolate(&self.lower, x_over_c)) / 2.0
    }
}

fn check_domain(x_over_c: f64) -> Result<(), LookupError> {
    if (0.0..=1.0).contains(&x_over_c) {
        Ok(())
    } else {
        Err(LookupError::OutOfDomain { x_over_c })
    }
}

/// Linear interpolation on a surface sorted by x, held constant past its ends.
fn interpolate(surface: &[[f64; 2]], x: f64) -> f64 {
    let first = surface[0];
    let last = surface[surface.len() - 1];
    if x <= first[0] {
        return first[1];
    }
    if x >= last[0] {
        return last[1];
    }
    let i = surface.partition_point(|p| p[0] < x);
    let (a, b) = (surface[i - 1], surface[i]);
    let span = b[0] - a[0];
    if span <= 0.0 {
        return b[1];
    }
    a[1] + (b[1] - a[1]) * (x - a[0]) / span
}

/// Maximum camber, its position and thickness, as chord fractions.
fn parse_naca4(name: &str) -> Option<[f64; 3]> {
    let lower = name.trim().to_ascii_lowercase();
    let digits = lower.strip_prefix("naca")?.trim();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value = |range: std::ops::Range<usize>| digits[range].parse::<f64>().ok();
    Some([
        value(0..1)? / 100.0,
        value(1..2)? / 10.0,
        value(2..4)? / 100.0,
    ])
}

/// NACA 4-digit section with a closed trailing edge, Selig order.
fn naca4_coordinates(m: f64, p: f64, t: f64) -> Vec<[f64; 2]> {
    let stations = cosspace(0.0, 1.0, NACA_STATIONS);

    let surface_points = |x: f64| {
        let thickness = 5.0
            * t
            * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x.powi(2) + 0.2843 * x.powi(3)
                - 0.1036 * x.powi(4))
                .max(0.0);
        let (camber, slope) = if m == 0.0 || p == 0.0 {
            (0.0, 0.0)
        } else if x <= p {
            (
                m / (p * p) * (2.0 * p * x - x * x),
                2.0 * m / (p * p) * (p - x),
            )
        } else {
            (
                m / ((1.0 - p) * (1.0 - p)) * (1.0 - 2.0 * p + 2.0 * p * x - x * x),
                2.0 * m / ((1.0 - p) * (1.0 - p)) * (p - x),
            )
        };
        let theta = slope.atan();
        (
            [x - thickness * theta.sin(), camber + thickness * theta.cos()],
            [x + thickness * theta.sin(), camber - thickness * theta.cos()],
        )
    };

    let upper = stations.iter().rev().map(|&x| surface_points(x).0);
    let lower = stations.iter().skip(1).map(|&x| surface_points(x).1);
    upper.chain(lower).collect()
}
