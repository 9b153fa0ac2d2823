use nalgebra::{DMatrix, DVector, Vector3};
use rayon::prelude::*;
use tracing::{debug, info};

use super::linalg::solve_dense;
use super::panels::{build_panels, Panel};
use super::singularities::horseshoe_induced_velocity;
use super::OperatingPoint;
use crate::config::VlmConfig;
use crate::dynamics::{Axes, Loads};
use crate::geometry::{Airplane, ReferenceDimensions};
use crate::optimization::Scalar;
use crate::utils::{Result, SolverError};

/// Forces, moments and coefficients of one vortex-lattice solve.
///
/// Geometry-axis quantities use x aft, y starboard, z up; body-axis
/// quantities use x forward, y starboard, z down. Moments are taken about
/// the airplane's reference point.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct AeroResults<T: Scalar = f64> {
    pub force_geometry: Vector3<T>,
    pub moment_geometry: Vector3<T>,
    pub force_body: Vector3<T>,
    pub moment_body: Vector3<T>,
    /// Along the lift direction (N)
    pub lift: T,
    /// Along the free stream (N)
    pub induced_drag: T,
    /// Positive to starboard (N)
    pub side_force: T,
    pub CL: T,
    pub CDi: T,
    pub CY: T,
    /// Rolling moment coefficient, positive right wing down
    pub Cl: T,
    /// Pitching moment coefficient, positive nose up
    pub Cm: T,
    /// Yawing moment coefficient, positive nose right
    pub Cn: T,
    /// Solved circulation of each panel, in panel order
    pub circulations: Vec<T>,
}

impl<T: Scalar> AeroResults<T> {
    pub fn num_panels(&self) -> usize {
        self.circulations.len()
    }

    pub fn cl_over_cdi(&self) -> T {
        self.CL / self.CDi
    }

    /// Loads in body axes, ready to drive a [`DynamicsState`](crate::dynamics::DynamicsState).
    pub fn body_forces(&self) -> Loads<T> {
        let mut loads = Loads::default();
        loads.add_force(Axes::Body, self.force_body);
        loads.add_moment(self.moment_body);
        loads
    }

    /// Loads in wind axes: drag aft, side force to starboard, lift up.
    pub fn wind_forces(&self) -> Loads<T> {
        let mut loads = Loads::default();
        loads.add_force(
            Axes::Wind,
            Vector3::new(-self.induced_drag, self.side_force, -self.lift),
        );
        loads.add_moment(self.moment_body);
        loads
    }
}

/// Vortex-lattice solver with horseshoe vortices on the camber surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VortexLatticeMethod {
    pub config: VlmConfig,
}

impl VortexLatticeMethod {
    pub fn new(config: VlmConfig) -> Self {
        Self { config }
    }

    /// Solves the airplane at one operating point.
    pub fn run<T: Scalar>(
        &self,
        airplane: &Airplane<T>,
        op: &OperatingPoint<T>,
    ) -> Result<AeroResults<T>> {
        let reference = airplane.reference_dimensions()?;
        let panels = build_panels(airplane, &self.config.mesh)?;
        debug!(
            airplane = %airplane.name,
            panels = panels.len(),
            "Assembled vortex lattice"
        );
        self.solve(&panels, &airplane.xyz_ref, &reference, op)
    }

    /// Solves independent operating points of the same airplane in
    /// parallel. Results come back in the order of `ops`.
    pub fn run_batch(
        &self,
        airplane: &Airplane<f64>,
        ops: &[OperatingPoint<f64>],
    ) -> Result<Vec<AeroResults<f64>>> {
        let reference = airplane.reference_dimensions()?;
        let panels = build_panels(airplane, &self.config.mesh)?;
        info!(
            airplane = %airplane.name,
            panels = panels.len(),
            cases = ops.len(),
            "Running batched vortex-lattice analysis"
        );
        ops.par_iter()
            .map(|op| self.solve(&panels, &airplane.xyz_ref, &reference, op))
            .collect()
    }

    fn induced_velocity<T: Scalar>(
        &self,
        panels: &[Panel<T>],
        point: &Vector3<T>,
        circulations: &DVector<T>,
    ) -> Vector3<T> {
        let trailing: Vector3<T> = Vector3::x();
        panels
            .iter()
            .zip(circulations.iter())
            .fold(Vector3::zeros(), |sum, (panel, &gamma)| {
                sum + horseshoe_induced_velocity(
                    point,
                    &panel.left,
                    &panel.right,
                    &trailing,
                    gamma,
                    self.config.singularity_epsilon,
                )
            })
    }

    fn solve<T: Scalar>(
        &self,
        panels: &[Panel<T>],
        xyz_ref: &Vector3<T>,
        reference: &ReferenceDimensions<T>,
        op: &OperatingPoint<T>,
    ) -> Result<AeroResults<T>> {
        let n = panels.len();
        let epsilon = self.config.singularity_epsilon;
        let trailing: Vector3<T> = Vector3::x();

        let influence = DMatrix::from_fn(n, n, |i, j| {
            let target = &panels[i];
            let source = &panels[j];
            horseshoe_induced_velocity(
                &target.collocation,
                &source.left,
                &source.right,
                &trailing,
                T::one(),
                epsilon,
            )
            .dot(&target.normal)
        });
        let freestream = DVector::from_iterator(
            n,
            panels.iter().map(|panel| {
                -op.freestream_velocity_at(&panel.collocation, xyz_ref)
                    .dot(&panel.normal)
            }),
        );
        let circulations = solve_dense(influence, freestream, self.config.singular_pivot_tolerance)?;

        let mut force_geometry = Vector3::zeros();
        let mut moment_geometry = Vector3::zeros();
        for (panel, &gamma) in panels.iter().zip(circulations.iter()) {
            let midpoint = panel.bound_midpoint();
            let velocity = op.freestream_velocity_at(&midpoint, xyz_ref)
                + self.induced_velocity(panels, &midpoint, &circulations);
            let force = velocity.cross(&panel.bound_vector()) * (op.density * gamma);
            moment_geometry += (midpoint - xyz_ref).cross(&force);
            force_geometry += force;
        }

        let results = self.coefficients(force_geometry, moment_geometry, reference, op, circulations);
        if !results.CL.is_finite() || !results.CDi.is_finite() || !results.Cm.is_finite() {
            return Err(SolverError::NonFinite("aerodynamic coefficients".to_string()).into());
        }
        Ok(results)
    }

    fn coefficients<T: Scalar>(
        &self,
        force_geometry: Vector3<T>,
        moment_geometry: Vector3<T>,
        reference: &ReferenceDimensions<T>,
        op: &OperatingPoint<T>,
        circulations: DVector<T>,
    ) -> AeroResults<T> {
        let force_body = geometry_to_body(&force_geometry);
        let moment_body = geometry_to_body(&moment_geometry);

        let lift = force_geometry.dot(&op.lift_direction());
        let induced_drag = force_geometry.dot(&op.freestream_direction());
        let side_force = force_geometry.dot(&op.side_direction());

        let qs = op.dynamic_pressure() * reference.s_ref;
        AeroResults {
            force_geometry,
            moment_geometry,
            force_body,
            moment_body,
            lift,
            induced_drag,
            side_force,
            CL: lift / qs,
            CDi: induced_drag / qs,
            CY: side_force / qs,
            Cl: moment_body.x / (qs * reference.b_ref),
            Cm: moment_body.y / (qs * reference.c_ref),
            Cn: moment_body.z / (qs * reference.b_ref),
            circulations: circulations.iter().copied().collect(),
        }
    }
}

/// Rotates a geometry-axis vector into body axes (a half turn about y).
fn geometry_to_body<T: Scalar>(v: &Vector3<T>) -> Vector3<T> {
    Vector3::new(-v.x, v.y, -v.z)
}
