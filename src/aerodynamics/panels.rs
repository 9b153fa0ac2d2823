use nalgebra::Vector3;

use crate::config::MeshConfig;
use crate::geometry::{Airplane, CamberGrid};
use crate::optimization::Scalar;
use crate::utils::{lerp_vector, normalize, norm, Result, SolverError};

/// Chordwise position of the bound vortex leg
const BOUND_LEG_FRACTION: f64 = 0.25;
/// Chordwise position of the collocation point
const COLLOCATION_FRACTION: f64 = 0.75;

/// One quadrilateral of the camber-surface lattice with its horseshoe
/// vortex. "Left" and "right" are as seen by a pilot looking forward from
/// behind the airplane, so the bound leg runs in +y on the starboard side.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel<T: Scalar = f64> {
    pub front_left: Vector3<T>,
    pub front_right: Vector3<T>,
    pub back_left: Vector3<T>,
    pub back_right: Vector3<T>,
    /// Left end of the bound leg
    pub left: Vector3<T>,
    /// Right end of the bound leg
    pub right: Vector3<T>,
    pub collocation: Vector3<T>,
    /// Unit normal, pointing up for an unflipped wing
    pub normal: Vector3<T>,
    pub area: T,
}

impl<T: Scalar> Panel<T> {
    pub fn new(
        front_left: Vector3<T>,
        front_right: Vector3<T>,
        back_left: Vector3<T>,
        back_right: Vector3<T>,
    ) -> Self {
        let left = lerp_vector(&front_left, &back_left, BOUND_LEG_FRACTION);
        let right = lerp_vector(&front_right, &back_right, BOUND_LEG_FRACTION);
        let collocation = lerp_vector(
            &lerp_vector(&front_left, &back_left, COLLOCATION_FRACTION),
            &lerp_vector(&front_right, &back_right, COLLOCATION_FRACTION),
            0.5,
        );
        let cross = (back_right - front_left).cross(&(front_right - back_left));
        Self {
            front_left,
            front_right,
            back_left,
            back_right,
            left,
            right,
            collocation,
            normal: normalize(&cross),
            area: norm(&cross) * 0.5,
        }
    }

    /// Midpoint of the bound leg, where its force acts.
    pub fn bound_midpoint(&self) -> Vector3<T> {
        (self.left + self.right) * T::from_f64(0.5)
    }

    /// Bound leg vector, left to right.
    pub fn bound_vector(&self) -> Vector3<T> {
        self.right - self.left
    }
}

/// Splits one half's camber grid into panels, spanwise-major within each
/// section.
fn grid_panels<T: Scalar>(grid: &CamberGrid<T>, panels: &mut Vec<Panel<T>>) {
    for nodes in &grid.sections {
        for j in 0..nodes.len().saturating_sub(1) {
            // The reflected half runs from the root outboard to port, so its
            // outer station is on the left.
            let (left, right) = if grid.mirrored {
                (&nodes[j + 1], &nodes[j])
            } else {
                (&nodes[j], &nodes[j + 1])
            };
            for k in 0..left.len().saturating_sub(1) {
                panels.push(Panel::new(left[k], right[k], left[k + 1], right[k + 1]));
            }
        }
    }
}

/// Discretizes every wing of the airplane into vortex-lattice panels.
/// Fuselages carry no lift and contribute none.
pub fn build_panels<T: Scalar>(airplane: &Airplane<T>, config: &MeshConfig) -> Result<Vec<Panel<T>>> {
    let mut panels = Vec::new();
    for wing in &airplane.wings {
        for &mirrored in wing.halves() {
            let grid = wing.camber_grid(config, mirrored)?;
            grid_panels(&grid, &mut panels);
        }
    }
    if panels.is_empty() {
        return Err(SolverError::NoPanels.into());
    }
    Ok(panels)
}
