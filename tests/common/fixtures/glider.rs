use std::sync::Arc;

use aerolattice::config::{MeshConfig, VlmConfig};
use aerolattice::geometry::{
    Airfoil, Airplane, ControlSurfaceKind, Fuselage, FuselageXSec, Wing, WingXSec,
};
use aerolattice::optimization::Scalar;
use aerolattice::utils::LookupError;
use nalgebra::Vector3;

/// Moment reference of the glider, at the main wing's root leading edge
pub const GLIDER_CG: [f64; 3] = [0.0, 0.0, 0.0];

pub const MAIN_WING: usize = 0;
pub const HORIZONTAL_STABILIZER: usize = 1;
pub const VERTICAL_STABILIZER: usize = 2;

fn airfoil(name: &str) -> Arc<Airfoil> {
    Arc::new(Airfoil::new(name).expect("NACA 4-digit airfoils are generated"))
}

/// A two-metre sailplane: tapered, dihedralled main wing with flaps and
/// ailerons, a conventional tail and a slender fuselage. Its lifting
/// surfaces are those of the published XFLR5 comparison case; the fuselage
/// carries no panels.
pub fn glider() -> Airplane {
    let main_wing = Wing::new(
        "Main Wing",
        Vector3::zeros(),
        true,
        vec![
            WingXSec::new(Vector3::zeros(), 0.18, 2.0, airfoil("naca4412"))
                .with_control_surface(ControlSurfaceKind::Symmetric, 0.0)
                .with_hinge_point(0.75),
            WingXSec::new(Vector3::new(0.01, 0.5, 0.0), 0.16, 0.0, airfoil("naca4412"))
                .with_control_surface(ControlSurfaceKind::Asymmetric, 0.0)
                .with_hinge_point(0.75),
            WingXSec::new(Vector3::new(0.08, 1.0, 0.1), 0.08, -2.0, airfoil("naca4412")),
        ],
    );
    let horizontal_stabilizer = Wing::new(
        "Horizontal Stabilizer",
        Vector3::new(0.6, 0.0, 0.1),
        true,
        vec![
            WingXSec::new(Vector3::zeros(), 0.1, -10.0, airfoil("naca0012"))
                .with_control_surface(ControlSurfaceKind::Symmetric, 0.0)
                .with_hinge_point(0.75),
            WingXSec::new(Vector3::new(0.02, 0.17, 0.0), 0.08, -10.0, airfoil("naca0012")),
        ],
    );
    let vertical_stabilizer = Wing::new(
        "Vertical Stabilizer",
        Vector3::new(0.6, 0.0, 0.15),
        false,
        vec![
            WingXSec::new(Vector3::zeros(), 0.1, 0.0, airfoil("naca0012"))
                .with_control_surface(ControlSurfaceKind::Symmetric, 0.0)
                .with_hinge_point(0.75),
            WingXSec::new(Vector3::new(0.04, 0.0, 0.15), 0.06, 0.0, airfoil("naca0012")),
        ],
    );

    let profile = airfoil("naca0012");
    let fuselage = Fuselage::from_profile("Fuselage", Vector3::zeros(), 30, |xi| {
        Ok::<_, LookupError>(FuselageXSec::new(
            Vector3::new(0.8 * xi - 0.1, 0.0, 0.1 * xi - 0.03),
            0.6 * profile.local_thickness(xi)?,
        ))
    })
    .expect("profile stations lie on the airfoil");

    Airplane::new(
        "Glider",
        Vector3::from(GLIDER_CG),
        vec![main_wing, horizontal_stabilizer, vertical_stabilizer],
        vec![fuselage],
    )
}

/// The glider in another scalar type with its elevator set to `deflection`.
pub fn glider_with_elevator<T: Scalar>(deflection: T) -> Airplane<T> {
    let mut airplane = glider().lift::<T>();
    airplane.wings[HORIZONTAL_STABILIZER].xsecs[0]
        .control_surface
        .deflection = deflection;
    airplane
}

/// A lighter lattice for tests that solve many times.
pub fn coarse_vlm_config() -> VlmConfig {
    VlmConfig {
        mesh: MeshConfig {
            spanwise_resolution: 4,
            chordwise_resolution: 3,
            ..Default::default()
        },
        ..Default::default()
    }
}
