use nalgebra::Vector3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{Fuselage, Mesh, Wing};
use crate::config::MeshConfig;
use crate::optimization::Scalar;
use crate::utils::{ConfigError, GeometryError, Result};

/// Reference quantities coefficients are normalized by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceDimensions<T = f64> {
    /// Area (m^2)
    pub s_ref: T,
    /// Span (m), for roll and yaw moments
    pub b_ref: T,
    /// Chord (m), for pitching moment
    pub c_ref: T,
}

/// The full vehicle: wings, fuselages and a moment reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Scalar + Serialize",
    deserialize = "T: Scalar + Deserialize<'de>"
))]
pub struct Airplane<T: Scalar = f64> {
    pub name: String,
    /// Moment reference point (usually the CG)
    #[serde(default = "origin")]
    pub xyz_ref: Vector3<T>,
    #[serde(default)]
    pub wings: Vec<Wing<T>>,
    #[serde(default)]
    pub fuselages: Vec<Fuselage<T>>,
    #[serde(default)]
    pub s_ref: Option<T>,
    #[serde(default)]
    pub b_ref: Option<T>,
    #[serde(default)]
    pub c_ref: Option<T>,
}

fn origin<T: Scalar>() -> Vector3<T> {
    Vector3::zeros()
}

impl<T: Scalar> Airplane<T> {
    pub fn new(
        name: &str,
        xyz_ref: Vector3<T>,
        wings: Vec<Wing<T>>,
        fuselages: Vec<Fuselage<T>>,
    ) -> Self {
        Self {
            name: name.to_string(),
            xyz_ref,
            wings,
            fuselages,
            s_ref: None,
            b_ref: None,
            c_ref: None,
        }
    }

    /// Parses an airplane from YAML, airfoils given by name or coordinates,
    /// and validates its geometry.
    pub fn from_yaml_str(yaml: &str) -> Result<Self>
    where
        T: DeserializeOwned,
    {
        let airplane: Self = serde_yaml::from_str(yaml).map_err(ConfigError::from)?;
        airplane.validate()?;
        Ok(airplane)
    }

    /// Fixes the reference dimensions to those of the first wing, keeping
    /// any already set explicitly.
    pub fn with_reference_dimensions_from_wing(mut self) -> Result<Self, GeometryError> {
        let reference = self.reference_dimensions()?;
        self.s_ref = Some(reference.s_ref);
        self.b_ref = Some(reference.b_ref);
        self.c_ref = Some(reference.c_ref);
        Ok(self)
    }

    /// Explicit reference dimensions where set, the first wing's area, span
    /// and mean geometric chord otherwise.
    pub fn reference_dimensions(&self) -> Result<ReferenceDimensions<T>, GeometryError> {
        if let (Some(s_ref), Some(b_ref), Some(c_ref)) = (self.s_ref, self.b_ref, self.c_ref) {
            return Ok(ReferenceDimensions {
                s_ref,
                b_ref,
                c_ref,
            });
        }
        let wing = self
            .wings
            .first()
            .ok_or_else(|| GeometryError::NoReferenceDimensions(self.name.clone()))?;
        wing.validate()?;
        Ok(ReferenceDimensions {
            s_ref: self.s_ref.unwrap_or_else(|| wing.area()),
            b_ref: self.b_ref.unwrap_or_else(|| wing.span()),
            c_ref: self.c_ref.unwrap_or_else(|| wing.mean_geometric_chord()),
        })
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        for wing in &self.wings {
            wing.validate()?;
        }
        for fuselage in &self.fuselages {
            fuselage.validate()?;
        }
        Ok(())
    }

    /// Surface mesh of every wing then every fuselage, in declaration order.
    pub fn mesh_body(&self, config: &MeshConfig) -> Result<Mesh<T>> {
        let mut mesh = Mesh::default();
        for wing in &self.wings {
            mesh.append(wing.mesh_body(config)?);
        }
        for fuselage in &self.fuselages {
            mesh.append(fuselage.mesh_body(config)?);
        }
        Ok(mesh)
    }
}

impl Airplane<f64> {
    /// The same airplane with constant scalars of another type, e.g. to
    /// evaluate fixed geometry with dual numbers.
    pub fn lift<U: Scalar>(&self) -> Airplane<U> {
        Airplane {
            name: self.name.clone(),
            xyz_ref: self.xyz_ref.map(U::from_f64),
            wings: self.wings.iter().map(Wing::lift).collect(),
            fuselages: self.fuselages.iter().map(Fuselage::lift).collect(),
            s_ref: self.s_ref.map(U::from_f64),
            b_ref: self.b_ref.map(U::from_f64),
            c_ref: self.c_ref.map(U::from_f64),
        }
    }
}
