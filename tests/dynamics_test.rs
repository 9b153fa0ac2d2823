use aerolattice::config::OptiConfig;
use aerolattice::dynamics::{
    Axes, Dynamics, DynamicsState, Loads, MassProperties, PointMass2DCartesian,
    PointMass2DSpeedGamma, PointMass3DCartesian, Representation, RigidBody3DEuler, Trajectory,
    TrajectoryVariables,
};
use aerolattice::optimization::{
    Bindings, Constraint, Dual, OptimizationContext, Opti, Problem, Scalar,
};
use aerolattice::utils::{Result, GRAVITY, SEA_LEVEL_DENSITY};
use approx::assert_relative_eq;
use nalgebra::Vector3;
use pretty_assertions::assert_eq;

const MASS: f64 = 1.5;

/// Weight plus a wind-axes lift and drag, the loads of a gliding airframe.
fn glide_loads() -> Loads {
    let mut loads = Loads::default();
    loads.add_gravity(MASS, GRAVITY);
    loads.add_force(Axes::Wind, Vector3::new(-0.9, 0.0, -13.5));
    loads
}

/// Descending northwards at about 7 degrees below the horizon.
fn descending() -> PointMass3DCartesian {
    PointMass3DCartesian::new(Vector3::new(0.0, 0.0, -80.0), Vector3::new(12.0, 0.0, 1.5))
}

#[test]
fn test_planar_representations_agree_on_acceleration() {
    let mass = MassProperties::point_mass(MASS);
    let loads = glide_loads();
    let inertial = descending();

    let reference = inertial.derivative(&loads, &mass);
    let cartesian = PointMass2DCartesian::from_inertial(&inertial).derivative(&loads, &mass);
    assert_relative_eq!(cartesian.u_e, reference.u_e, epsilon = 1e-12);
    assert_relative_eq!(cartesian.w_e, reference.w_e, epsilon = 1e-12);
    assert_eq!(reference.v_e, 0.0);

    // Speed and path angle rates follow from the Cartesian acceleration
    let (u, w) = (inertial.u_e, inertial.w_e);
    let speed_sq = u * u + w * w;
    let expected_speed_rate = (u * reference.u_e + w * reference.w_e) / speed_sq.sqrt();
    let expected_gamma_rate = (w * reference.u_e - u * reference.w_e) / speed_sq;

    let speed_gamma = PointMass2DSpeedGamma::from_inertial(&inertial).derivative(&loads, &mass);
    assert_relative_eq!(speed_gamma.speed, expected_speed_rate, epsilon = 1e-12);
    assert_relative_eq!(speed_gamma.gamma, expected_gamma_rate, epsilon = 1e-12);
    assert_relative_eq!(speed_gamma.x_e, u, epsilon = 1e-12);
    assert_relative_eq!(speed_gamma.z_e, w, epsilon = 1e-12);
}

#[test]
fn test_level_rigid_body_matches_point_mass() {
    let mass = MassProperties::point_mass(MASS).with_inertia(0.08, 0.05, 0.12, 0.004);
    let loads = glide_loads();
    let inertial = descending();

    let point = inertial.derivative(&loads, &mass);
    let body = RigidBody3DEuler::from_inertial(&inertial);
    let rates = body.derivative(&loads, &mass);

    // Level attitude and no rotation: body axes are earth axes
    assert_relative_eq!(rates.velocity_body(), point.velocity(), epsilon = 1e-12);
    assert_relative_eq!(rates.position(), point.position(), epsilon = 1e-12);
    assert_eq!(rates.rates(), Vector3::zeros());
}

#[test]
fn test_conversion_chain_returns_to_start() {
    let start: DynamicsState = PointMass2DSpeedGamma::new(30.0, -60.0, 14.0, -0.08).into();
    let chain = [
        Representation::PointMass2DCartesian,
        Representation::PointMass3DCartesian,
        Representation::RigidBody3DEuler,
        Representation::PointMass2DSpeedGamma,
    ];
    let end = chain.iter().fold(start, |state, &kind| state.convert(kind));

    assert_eq!(end.kind(), Representation::PointMass2DSpeedGamma);
    for (a, b) in end.state().iter().zip(start.state()) {
        assert_relative_eq!(*a, b, epsilon = 1e-12);
    }
}

#[test]
fn test_rigid_body_state_vector_layout() {
    let state: DynamicsState = RigidBody3DEuler::from_inertial(&descending()).into();
    let names = state.state_names();
    assert_eq!(names.len(), 12);
    assert_eq!(&names[..3], &["x_e", "y_e", "z_e"]);
    assert_eq!(state.state()[3], 12.0);

    let mut values = state.state();
    values[7] = 0.1;
    let pitched = state.with_state(&values).unwrap();
    match pitched {
        DynamicsState::RigidBody3DEuler(body) => assert_eq!(body.theta, 0.1),
        other => panic!("unexpected representation {:?}", other.kind()),
    }
}

#[test]
fn test_path_angle_rate_derivative_through_duals() {
    let (lift, speed) = (20.0, 11.0);
    let mut loads: Loads<Dual> = Loads::default();
    loads.add_gravity(Dual::constant(MASS), GRAVITY);
    loads.add_force(
        Axes::Wind,
        Vector3::new(Dual::constant(0.0), Dual::constant(0.0), Dual::constant(-lift)),
    );
    let state = PointMass2DSpeedGamma::new(
        Dual::constant(0.0),
        Dual::constant(-50.0),
        Dual::variable(speed),
        Dual::constant(0.0),
    );
    let rates = state.derivative(&loads, &MassProperties::point_mass(Dual::constant(MASS)));

    let excess = lift - MASS * GRAVITY;
    assert_relative_eq!(rates.gamma.re, excess / (MASS * speed), epsilon = 1e-12);
    assert_relative_eq!(
        rates.gamma.eps,
        -excess / (MASS * speed * speed),
        epsilon = 1e-12
    );
    assert_relative_eq!(rates.x_e.eps, 1.0, epsilon = 1e-12);
}

const WING_AREA: f64 = 0.3;
const LIFT_COEFFICIENT: f64 = 0.5;
const DRAG_COEFFICIENT: f64 = 0.03;

/// Weight plus lift and drag at fixed coefficients.
fn fixed_polar_loads<T: Scalar>(state: &DynamicsState<T>) -> Loads<T> {
    let inertial = state.to_inertial();
    let speed_sq =
        inertial.u_e * inertial.u_e + inertial.v_e * inertial.v_e + inertial.w_e * inertial.w_e;
    let dynamic_pressure_area = speed_sq * (0.5 * SEA_LEVEL_DENSITY * WING_AREA);

    let mut loads = Loads::default();
    loads.add_gravity(T::from_f64(MASS), GRAVITY);
    loads.add_force(
        Axes::Wind,
        Vector3::new(
            -(dynamic_pressure_area * DRAG_COEFFICIENT),
            T::zero(),
            -(dynamic_pressure_area * LIFT_COEFFICIENT),
        ),
    );
    loads
}

fn rk4_glide(start: DynamicsState, duration: f64, steps: usize) -> DynamicsState {
    let mass = MassProperties::point_mass(MASS);
    let h = duration / steps as f64;
    let rate = |values: &[f64]| {
        let state = start.with_state(values).unwrap();
        state.derivative(&fixed_polar_loads(&state), &mass).state()
    };
    let offset = |x: &[f64], k: &[f64], scale: f64| -> Vec<f64> {
        x.iter().zip(k).map(|(x, k)| x + scale * k).collect()
    };

    let mut x = start.state();
    for _ in 0..steps {
        let k1 = rate(&x);
        let k2 = rate(&offset(&x, &k1, h / 2.0));
        let k3 = rate(&offset(&x, &k2, h / 2.0));
        let k4 = rate(&offset(&x, &k3, h));
        for i in 0..x.len() {
            x[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
    }
    start.with_state(&x).unwrap()
}

/// Find a trajectory satisfying the equations of motion: no objective, only
/// collocation constraints and a pinned start.
struct GlideCollocation {
    states: TrajectoryVariables,
    dt: f64,
}

impl Problem for GlideCollocation {
    fn objective<T: Scalar>(&self, _vars: &Bindings<T>) -> Result<T> {
        Ok(T::zero())
    }

    fn constraints<T: Scalar>(&self, vars: &Bindings<T>) -> Result<Vec<Constraint<T>>> {
        let trajectory = self.states.bind(vars)?;
        let mass = MassProperties::point_mass(T::from_f64(MASS));
        let rates = trajectory.derivatives(&mass, |_, state| Ok(fixed_polar_loads(state)))?;
        Ok(trajectory.collocation_constraints(&rates, T::from_f64(self.dt))?)
    }
}

#[test]
fn test_glide_by_collocation_matches_time_stepping() {
    let (nodes, duration) = (16, 3.0);
    let dt = duration / (nodes - 1) as f64;
    let start: DynamicsState = PointMass2DSpeedGamma::new(0.0, -50.0, 12.0, -0.05).into();

    // Straight-line guess at the initial speed and path angle
    let guess: Vec<DynamicsState> = (0..nodes)
        .map(|k| {
            let t = k as f64 * dt;
            PointMass2DSpeedGamma::new(
                12.0 * 0.05f64.cos() * t,
                -50.0 + 12.0 * 0.05f64.sin() * t,
                12.0,
                -0.05,
            )
            .into()
        })
        .collect();
    let guess = Trajectory::from_states(&guess).unwrap();

    let mut opti = Opti::new(OptiConfig {
        max_iterations: 2000,
        ..Default::default()
    });
    let states = TrajectoryVariables::declare(&mut opti, &guess);
    states.pin(&mut opti, 0, &start).unwrap();
    states.bound_field(&mut opti, "speed", Some(1.0), None).unwrap();
    assert_eq!(opti.num_variables(), 4 * nodes);

    let problem = GlideCollocation { states, dt };
    let solution = opti.solve(&problem).unwrap();
    let trajectory = problem.states.bind(&solution.bindings()).unwrap();
    let end = trajectory.state(nodes - 1).unwrap();
    let reference = rk4_glide(start, duration, 3000);

    // Trapezoidal collocation at 0.2 s steps lands within about 7 mm of RK4
    let tolerances = [0.03, 0.01, 0.01, 0.003];
    for ((actual, expected), tolerance) in end.state().iter().zip(reference.state()).zip(tolerances) {
        assert_relative_eq!(*actual, expected, epsilon = tolerance);
    }
    assert_eq!(trajectory.field("x_e").unwrap()[0], 0.0);
}
