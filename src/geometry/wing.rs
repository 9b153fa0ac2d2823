use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::mesh::grid_quads;
use super::{Airfoil, Mesh, WingXSec};
use crate::config::MeshConfig;
use crate::optimization::Scalar;
use crate::utils::{
    cosspace, deg_to_rad, lerp, lerp_vector, linspace, normalize, GeometryError, Result,
};

/// Below this the YZ extent of a section counts as zero
const MIN_SECTION_SPAN: f64 = 1e-12;

/// A lifting surface lofted through an ordered list of cross-sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Scalar + Serialize",
    deserialize = "T: Scalar + Deserialize<'de>"
))]
pub struct Wing<T: Scalar = f64> {
    pub name: String,
    pub xyz_le: Vector3<T>,
    /// Mirror across the XZ plane at mesh time
    #[serde(default)]
    pub symmetric: bool,
    pub xsecs: Vec<WingXSec<T>>,
}

/// Camber-surface nodes of one wing half, indexed
/// `[section][spanwise station][chordwise station]`.
#[derive(Debug, Clone)]
pub struct CamberGrid<T> {
    pub sections: Vec<Vec<Vec<Vector3<T>>>>,
    /// Whether these are the nodes of the reflected half
    pub mirrored: bool,
}

/// Local frame of one spanwise station.
struct Station<T> {
    leading_edge: Vector3<T>,
    chord_direction: Vector3<T>,
    up: Vector3<T>,
    chord: T,
}

impl<T: Scalar> Station<T> {
    fn point(&self, x: T, z: T) -> Vector3<T> {
        self.leading_edge + (self.chord_direction * x + self.up * z) * self.chord
    }
}

/// Rotation of the aft part of a section about its hinge.
struct Hinge<T> {
    threshold: f64,
    x: T,
    z: T,
    cos: T,
    sin: T,
}

impl<T: Scalar> Hinge<T> {
    /// Rotates `(x, z)` aft of the hinge by the deflection, trailing edge
    /// down for positive deflections.
    fn apply(&self, x: f64, z: f64) -> (T, T) {
        let (x_t, z_t) = (T::from_f64(x), T::from_f64(z));
        if x <= self.threshold {
            return (x_t, z_t);
        }
        let dx = x_t - self.x;
        let dz = z_t - self.z;
        (
            self.x + dx * self.cos + dz * self.sin,
            self.z - dx * self.sin + dz * self.cos,
        )
    }
}

impl<T: Scalar> Wing<T> {
    pub fn new(name: &str, xyz_le: Vector3<T>, symmetric: bool, xsecs: Vec<WingXSec<T>>) -> Self {
        Self {
            name: name.to_string(),
            xyz_le,
            symmetric,
            xsecs,
        }
    }

    /// Checks the loft is well formed. Meshing calls this first.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.xsecs.len() < 2 {
            return Err(GeometryError::TooFewSections {
                owner: self.name.clone(),
                found: self.xsecs.len(),
            });
        }
        for (index, xsec) in self.xsecs.iter().enumerate() {
            let chord = xsec.chord.value();
            if !(chord > 0.0) {
                return Err(GeometryError::NonPositiveChord {
                    owner: self.name.clone(),
                    index,
                    chord,
                });
            }
            let hinge_point = xsec.control_surface.hinge_point.value();
            if xsec.control_surface.is_active() && !(hinge_point > 0.0 && hinge_point < 1.0) {
                return Err(GeometryError::InvalidHingePoint {
                    owner: self.name.clone(),
                    index,
                    hinge_point,
                });
            }
            let y = self.xsec_leading_edge(index).y.value();
            if self.symmetric && y < -MIN_SECTION_SPAN {
                return Err(GeometryError::MirroredHalvesIntersect {
                    owner: self.name.clone(),
                    index,
                    y,
                });
            }
        }
        for index in 0..self.xsecs.len() - 1 {
            if self.section_span(index).value() <= MIN_SECTION_SPAN {
                return Err(GeometryError::ZeroSpanSection {
                    owner: self.name.clone(),
                    index,
                });
            }
        }
        Ok(())
    }

    /// Absolute leading edge of cross-section `index`.
    pub fn xsec_leading_edge(&self, index: usize) -> Vector3<T> {
        self.xyz_le + self.xsecs[index].xyz_le
    }

    /// YZ-projected distance between the leading edges bounding a section.
    fn section_span(&self, index: usize) -> T {
        let delta = self.xsecs[index + 1].xyz_le - self.xsecs[index].xyz_le;
        (delta.y * delta.y + delta.z * delta.z).sqrt()
    }

    /// Span projected on the YZ plane, both halves included.
    pub fn span(&self) -> T {
        let half: T = (0..self.xsecs.len().saturating_sub(1))
            .map(|i| self.section_span(i))
            .sum();
        if self.symmetric {
            half * 2.0
        } else {
            half
        }
    }

    /// Planform area, both halves included.
    pub fn area(&self) -> T {
        let half: T = self
            .xsecs
            .windows(2)
            .enumerate()
            .map(|(i, pair)| (pair[0].chord + pair[1].chord) * 0.5 * self.section_span(i))
            .sum();
        if self.symmetric {
            half * 2.0
        } else {
            half
        }
    }

    pub fn mean_geometric_chord(&self) -> T {
        self.area() / self.span()
    }

    pub fn aspect_ratio(&self) -> T {
        let span = self.span();
        span * span / self.area()
    }

    /// Halves to mesh: the stored one, then its reflection if symmetric.
    pub fn halves(&self) -> &'static [bool] {
        if self.symmetric {
            &[false, true]
        } else {
            &[false]
        }
    }

    /// Up vector of the reference plane at each cross-section, normal to
    /// the span direction projected on the YZ plane.
    fn reference_normals(&self) -> Vec<Vector3<T>> {
        let section_normals: Vec<Vector3<T>> = (0..self.xsecs.len() - 1)
            .map(|i| {
                let delta = self.xsecs[i + 1].xyz_le - self.xsecs[i].xyz_le;
                let span = self.section_span(i);
                Vector3::new(T::zero(), -delta.z / span, delta.y / span)
            })
            .collect();

        let last = section_normals.len() - 1;
        (0..self.xsecs.len())
            .map(|i| match i {
                0 => section_normals[0],
                i if i > last => section_normals[last],
                i => normalize(&(section_normals[i - 1] + section_normals[i])),
            })
            .collect()
    }

    fn station(&self, normals: &[Vector3<T>], section: usize, factor: f64) -> Station<T> {
        let (inner, outer) = (&self.xsecs[section], &self.xsecs[section + 1]);
        let twist = deg_to_rad(lerp(inner.twist, outer.twist, factor));
        let normal = normalize(&lerp_vector(&normals[section], &normals[section + 1], factor));
        let x_hat: Vector3<T> = Vector3::x();
        Station {
            leading_edge: lerp_vector(
                &self.xsec_leading_edge(section),
                &self.xsec_leading_edge(section + 1),
                factor,
            ),
            chord_direction: x_hat * twist.cos() - normal * twist.sin(),
            up: x_hat * twist.sin() + normal * twist.cos(),
            chord: lerp(inner.chord, outer.chord, factor),
        }
    }

    fn hinge(&self, section: usize, factor: f64, mirrored: bool) -> Result<Option<Hinge<T>>> {
        let surface = &self.xsecs[section].control_surface;
        if !surface.is_active() {
            return Ok(None);
        }
        let threshold = surface.hinge_point.value();
        let z = self.blended_camber(section, factor, threshold)?;
        let deflection = deg_to_rad(surface.deflection_for(mirrored));
        Ok(Some(Hinge {
            threshold,
            x: surface.hinge_point,
            z: T::from_f64(z),
            cos: deflection.cos(),
            sin: deflection.sin(),
        }))
    }

    fn section_airfoils(&self, section: usize) -> (&Airfoil, &Airfoil) {
        (&self.xsecs[section].airfoil, &self.xsecs[section + 1].airfoil)
    }

    fn blended_camber(&self, section: usize, factor: f64, x_over_c: f64) -> Result<f64> {
        let (inner, outer) = self.section_airfoils(section);
        Ok(inner.blended_camber(outer, factor, x_over_c)?)
    }

    /// Camber-surface nodes of one half. Sections are meshed independently,
    /// so the boundary station of each section is repeated in the next.
    pub fn camber_grid(&self, config: &MeshConfig, mirrored: bool) -> Result<CamberGrid<T>> {
        config.check()?;
        self.validate()?;

        let normals = self.reference_normals();
        let spanwise = linspace(0.0, 1.0, config.spanwise_resolution + 1);
        let chordwise = cosspace(0.0, 1.0, config.chordwise_resolution + 1);

        let mut sections = Vec::with_capacity(self.xsecs.len() - 1);
        for section in 0..self.xsecs.len() - 1 {
            let mut stations = Vec::with_capacity(spanwise.len());
            for &factor in &spanwise {
                let station = self.station(&normals, section, factor);
                let hinge = self.hinge(section, factor, mirrored)?;
                let mut nodes = Vec::with_capacity(chordwise.len());
                for &x in &chordwise {
                    let z = self.blended_camber(section, factor, x)?;
                    let (x, z) = match &hinge {
                        Some(hinge) => hinge.apply(x, z),
                        None => (T::from_f64(x), T::from_f64(z)),
                    };
                    nodes.push(reflect(station.point(x, z), mirrored));
                }
                stations.push(nodes);
            }
            sections.push(stations);
        }
        Ok(CamberGrid { sections, mirrored })
    }

    /// Thin camber surface of both halves, as used by the vortex lattice.
    pub fn mesh_camber(&self, config: &MeshConfig) -> Result<Mesh<T>> {
        let mut mesh = Mesh::default();
        for &mirrored in self.halves() {
            let grid = self.camber_grid(config, mirrored)?;
            let mut half = Mesh::default();
            for stations in grid.sections {
                let rows = stations.len();
                let columns = stations.first().map_or(0, Vec::len);
                let faces = grid_quads(half.points.len(), rows, columns);
                half.points.extend(stations.into_iter().flatten());
                half.faces.extend(faces);
            }
            if mirrored {
                rewind(&mut half);
            }
            mesh.append(half);
        }
        Ok(mesh)
    }

    /// Closed outline loft of both halves, for export.
    pub fn mesh_body(&self, config: &MeshConfig) -> Result<Mesh<T>> {
        config.check()?;
        self.validate()?;

        let normals = self.reference_normals();
        let spanwise = linspace(0.0, 1.0, config.spanwise_resolution + 1);
        let outline_stations = config.chordwise_resolution + 1;

        let mut mesh = Mesh::default();
        for &mirrored in self.halves() {
            let mut half = Mesh::default();
            for section in 0..self.xsecs.len() - 1 {
                let (inner, outer) = self.section_airfoils(section);
                let offset = half.points.len();
                let mut columns = 0;
                for &factor in &spanwise {
                    let station = self.station(&normals, section, factor);
                    let hinge = self.hinge(section, factor, mirrored)?;
                    let outline = inner.blended_outline(outer, factor, outline_stations);
                    columns = outline.len();
                    for [x, z] in outline {
                        let (x, z) = match &hinge {
                            Some(hinge) => hinge.apply(x, z),
                            None => (T::from_f64(x), T::from_f64(z)),
                        };
                        half.points.push(station.point(x, z));
                    }
                }
                half.faces
                    .extend(grid_quads(offset, spanwise.len(), columns));
            }
            // Outline order runs upper trailing edge first, which winds the
            // stored half inwards.
            rewind(&mut half);
            if mirrored {
                half = half.mirrored();
            }
            mesh.append(half);
        }
        Ok(mesh)
    }
}

impl Wing<f64> {
    /// The same wing with constant scalars of another type.
    pub fn lift<U: Scalar>(&self) -> Wing<U> {
        Wing {
            name: self.name.clone(),
            xyz_le: self.xyz_le.map(U::from_f64),
            symmetric: self.symmetric,
            xsecs: self.xsecs.iter().map(WingXSec::lift).collect(),
        }
    }
}

fn reflect<T: Scalar>(point: Vector3<T>, mirrored: bool) -> Vector3<T> {
    if mirrored {
        Vector3::new(point.x, -point.y, point.z)
    } else {
        point
    }
}

fn rewind<T: Scalar>(mesh: &mut Mesh<T>) {
    for face in &mut mesh.faces {
        face.reverse();
    }
}
