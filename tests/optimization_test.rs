mod common;

use std::sync::Arc;

use aerolattice::aerodynamics::{AeroResults, OperatingPoint, VortexLatticeMethod};
use aerolattice::config::{MeshConfig, VlmConfig};
use aerolattice::geometry::{Airfoil, Airplane, Wing, WingXSec};
use aerolattice::optimization::{
    quasi_variable, variable, Bindings, Constraint, OptimizationContext, Opti, Problem, Scalar,
    Var,
};
use aerolattice::utils::Result;
use approx::assert_relative_eq;
use nalgebra::Vector3;

use crate::common::{coarse_vlm_config, glider_with_elevator, HORIZONTAL_STABILIZER};

/// Untwisted rectangular wing of aspect ratio 6 whose angle of attack and
/// tip twist are decision variables.
struct WingDesign {
    alpha: Var,
    tip_twist: Var,
    target_cl: f64,
    solver: VortexLatticeMethod,
}

impl WingDesign {
    fn new<C: OptimizationContext>(context: &mut C, tip_twist: Var) -> Self {
        Self {
            alpha: variable(context, 4.0, Some(-5.0), Some(15.0)),
            tip_twist,
            target_cl: 0.4,
            solver: VortexLatticeMethod::new(VlmConfig {
                mesh: MeshConfig {
                    spanwise_resolution: 6,
                    chordwise_resolution: 2,
                    ..Default::default()
                },
                ..Default::default()
            }),
        }
    }

    fn airplane<T: Scalar>(&self, vars: &Bindings<T>) -> Result<Airplane<T>> {
        let airfoil = Arc::new(Airfoil::new("naca0012")?);
        let chord = T::one();
        let wing = Wing::new(
            "Wing",
            Vector3::zeros(),
            true,
            vec![
                WingXSec::new(Vector3::zeros(), chord, T::zero(), airfoil.clone()),
                WingXSec::new(
                    Vector3::new(T::zero(), T::from_f64(3.0), T::zero()),
                    chord,
                    vars.value(self.tip_twist)?,
                    airfoil,
                ),
            ],
        );
        Ok(Airplane::new(
            "Rectangle",
            Vector3::new(T::from_f64(0.25), T::zero(), T::zero()),
            vec![wing],
            vec![],
        ))
    }

    fn analyze<T: Scalar>(&self, vars: &Bindings<T>) -> Result<AeroResults<T>> {
        let op = OperatingPoint::new(T::from_f64(20.0), vars.value(self.alpha)?, T::zero());
        self.solver.run(&self.airplane(vars)?, &op)
    }
}

impl Problem for WingDesign {
    fn objective<T: Scalar>(&self, vars: &Bindings<T>) -> Result<T> {
        Ok(self.analyze(vars)?.CDi * 100.0)
    }

    fn constraints<T: Scalar>(&self, vars: &Bindings<T>) -> Result<Vec<Constraint<T>>> {
        let cl = self.analyze(vars)?.CL;
        Ok(vec![Constraint::equal(cl, T::from_f64(self.target_cl))])
    }
}

#[test]
fn test_quasi_variable_matches_plain_analysis() {
    let mut opti = Opti::default();
    let tip_twist = quasi_variable(&mut opti, -2.0);
    let design = WingDesign::new(&mut opti, tip_twist);

    let through_bindings = design.analyze(&opti.initial_bindings()).unwrap();
    let direct = design
        .solver
        .run(
            &design.airplane(&Bindings::new(vec![-2.0, 4.0])).unwrap(),
            &OperatingPoint::new(20.0, 4.0, 0.0),
        )
        .unwrap();
    assert_eq!(through_bindings.CL, direct.CL);
    assert_eq!(through_bindings.CDi, direct.CDi);
}

#[test]
fn test_washout_reduces_induced_drag_at_fixed_lift() {
    let mut baseline_opti = Opti::default();
    let fixed_twist = quasi_variable(&mut baseline_opti, 0.0);
    let baseline = WingDesign::new(&mut baseline_opti, fixed_twist);
    let baseline_solution = baseline_opti.solve(&baseline).unwrap();
    assert_eq!(baseline_solution.value(fixed_twist).unwrap(), 0.0);

    let mut design_opti = Opti::default();
    let free_twist = variable(&mut design_opti, 0.0, Some(-10.0), Some(10.0));
    let design = WingDesign::new(&mut design_opti, free_twist);
    let solution = design_opti.solve(&design).unwrap();

    // Rebuild the optimum from plain numbers
    let optimum = design.analyze(&solution.bindings()).unwrap();
    assert_relative_eq!(optimum.CL, 0.4, epsilon = 1e-3);
    assert!(solution.constraint_violation <= 1e-4);

    let twist = solution.value(free_twist).unwrap();
    assert!(twist < 0.0, "expected washout, found {} deg", twist);
    assert!(
        solution.objective < baseline_solution.objective,
        "{} !< {}",
        solution.objective,
        baseline_solution.objective
    );
}

#[test]
fn test_bound_limits_angle_of_attack() {
    struct MaxLift {
        design: WingDesign,
    }

    impl Problem for MaxLift {
        fn objective<T: Scalar>(&self, vars: &Bindings<T>) -> Result<T> {
            Ok(-self.design.analyze(vars)?.CL)
        }
    }

    let mut opti = Opti::default();
    let tip_twist = quasi_variable(&mut opti, 0.0);
    let design = WingDesign::new(&mut opti, tip_twist);
    let alpha = design.alpha;
    let solution = opti.solve(&MaxLift { design }).unwrap();

    let alpha = solution.value(alpha).unwrap();
    assert!(alpha > 14.99 && alpha <= 15.0 + 1e-4, "alpha = {}", alpha);
}

/// Angle of attack and elevator deflection for a lift coefficient with
/// zero pitching moment.
struct GliderTrim {
    alpha: Var,
    elevator: Var,
    target_cl: f64,
    solver: VortexLatticeMethod,
}

impl GliderTrim {
    fn analyze<T: Scalar>(&self, vars: &Bindings<T>) -> Result<AeroResults<T>> {
        let airplane = glider_with_elevator(vars.value(self.elevator)?);
        let op = OperatingPoint::new(T::from_f64(10.0), vars.value(self.alpha)?, T::zero());
        self.solver.run(&airplane, &op)
    }
}

impl Problem for GliderTrim {
    fn objective<T: Scalar>(&self, vars: &Bindings<T>) -> Result<T> {
        let elevator = vars.value(self.elevator)?;
        Ok(elevator * elevator * 1e-6)
    }

    fn constraints<T: Scalar>(&self, vars: &Bindings<T>) -> Result<Vec<Constraint<T>>> {
        let results = self.analyze(vars)?;
        Ok(vec![
            Constraint::equal(results.CL, T::from_f64(self.target_cl)),
            Constraint::equal(results.Cm, T::zero()),
        ])
    }
}

#[test]
fn test_glider_trim() {
    let mut opti = Opti::default();
    let trim = GliderTrim {
        alpha: variable(&mut opti, 3.0, Some(-5.0), Some(15.0)),
        elevator: variable(&mut opti, 0.0, Some(-25.0), Some(25.0)),
        target_cl: 0.5,
        solver: VortexLatticeMethod::new(coarse_vlm_config()),
    };
    let solution = opti.solve(&trim).unwrap();

    let trimmed = trim.analyze(&solution.bindings()).unwrap();
    assert_relative_eq!(trimmed.CL, 0.5, epsilon = 1e-3);
    assert_relative_eq!(trimmed.Cm, 0.0, epsilon = 1e-3);

    // With the moment reference at the wing's leading edge the glider pitches
    // nose-down at this CL, so trimming takes trailing-edge-up elevator
    let elevator = solution.value(trim.elevator).unwrap();
    assert!(elevator < 0.0 && elevator > -5.0, "elevator = {}", elevator);

    let airplane = glider_with_elevator(elevator);
    assert_eq!(
        airplane.wings[HORIZONTAL_STABILIZER].xsecs[0]
            .control_surface
            .deflection,
        elevator
    );
}
