use aerolattice::aerodynamics::AeroResults;
use aerolattice::geometry::Mesh;

/// Assert that every force, moment and coefficient is finite
#[track_caller]
pub fn assert_results_finite(results: &AeroResults) {
    for (name, value) in [
        ("CL", results.CL),
        ("CDi", results.CDi),
        ("CY", results.CY),
        ("Cl", results.Cl),
        ("Cm", results.Cm),
        ("Cn", results.Cn),
    ] {
        assert!(value.is_finite(), "{} is not finite", name);
    }
    assert!(
        results.force_geometry.iter().all(|x| x.is_finite()),
        "Force contains non-finite values"
    );
    assert!(
        results.circulations.iter().all(|x| x.is_finite()),
        "Circulation contains non-finite values"
    );
}

/// Assert that a mesh indexes only its own points and that every point is finite
#[track_caller]
pub fn assert_mesh_valid(mesh: &Mesh) {
    assert!(mesh.validate().is_ok(), "Mesh has dangling face indices");
    assert!(
        mesh.points.iter().all(|p| p.iter().all(|x| x.is_finite())),
        "Mesh contains non-finite points"
    );
    assert!(mesh.num_faces() > 0, "Mesh has no faces");
}
