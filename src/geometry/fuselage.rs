use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::mesh::ring_quads;
use super::{FuselageXSec, Mesh};
use crate::config::MeshConfig;
use crate::optimization::Scalar;
use crate::utils::{cosspace, Error, GeometryError, Result};

/// A body of revolution through circular cross-sections. Fuselages are
/// meshed for export but carry no lifting panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Scalar + Serialize",
    deserialize = "T: Scalar + Deserialize<'de>"
))]
pub struct Fuselage<T: Scalar = f64> {
    pub name: String,
    pub xyz_le: Vector3<T>,
    pub xsecs: Vec<FuselageXSec<T>>,
}

impl<T: Scalar> Fuselage<T> {
    pub fn new(name: &str, xyz_le: Vector3<T>, xsecs: Vec<FuselageXSec<T>>) -> Self {
        Self {
            name: name.to_string(),
            xyz_le,
            xsecs,
        }
    }

    /// Samples `profile` at `stations` cosine-spaced fractions of the body
    /// length, clustering stations at the nose and tail.
    pub fn from_profile<F, E>(
        name: &str,
        xyz_le: Vector3<T>,
        stations: usize,
        mut profile: F,
    ) -> Result<Self>
    where
        F: FnMut(f64) -> Result<FuselageXSec<T>, E>,
        Error: From<E>,
    {
        let xsecs = cosspace(0.0, 1.0, stations)
            .into_iter()
            .map(|xi| profile(xi).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(name, xyz_le, xsecs))
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.xsecs.len() < 2 {
            return Err(GeometryError::TooFewSections {
                owner: self.name.clone(),
                found: self.xsecs.len(),
            });
        }
        for (index, xsec) in self.xsecs.iter().enumerate() {
            let radius = xsec.radius.value();
            if !(radius >= 0.0) {
                return Err(GeometryError::NegativeRadius {
                    owner: self.name.clone(),
                    index,
                    radius,
                });
            }
        }
        Ok(())
    }

    /// Axial extent between the first and last stations.
    pub fn length(&self) -> T {
        match (self.xsecs.first(), self.xsecs.last()) {
            (Some(first), Some(last)) => (last.xyz_c.x - first.xyz_c.x).abs(),
            _ => T::zero(),
        }
    }

    /// Rings of points around each station, joined by quads.
    pub fn mesh_body(&self, config: &MeshConfig) -> Result<Mesh<T>> {
        config.check()?;
        self.validate()?;

        let per_ring = config.fuselage_circumferential_resolution;
        let angles: Vec<(f64, f64)> = (0..per_ring)
            .map(|m| {
                let theta = 2.0 * PI * m as f64 / per_ring as f64;
                (theta.cos(), theta.sin())
            })
            .collect();

        let mut points = Vec::with_capacity(self.xsecs.len() * per_ring);
        for xsec in &self.xsecs {
            let center = self.xyz_le + xsec.xyz_c;
            for &(cos, sin) in &angles {
                points.push(Vector3::new(
                    center.x,
                    center.y + xsec.radius * cos,
                    center.z + xsec.radius * sin,
                ));
            }
        }

        Ok(Mesh::new(
            points,
            ring_quads(0, self.xsecs.len(), per_ring),
        ))
    }
}

impl Fuselage<f64> {
    pub fn lift<U: Scalar>(&self) -> Fuselage<U> {
        Fuselage {
            name: self.name.clone(),
            xyz_le: self.xyz_le.map(U::from_f64),
            xsecs: self.xsecs.iter().map(FuselageXSec::lift).collect(),
        }
    }
}
