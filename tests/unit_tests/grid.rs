use matrixcompare::assert_scalar_eq;
use sneddon::geometry::{fracture_set, Domain, FractureTrace};
use sneddon::grid::{CartesianMesher, Mesher};
use sneddon::params::{ParameterAssignment, ShearPoisson, TractionBc, UniformTension};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

const DOMAIN: Domain = Domain {
    length: 50.0,
    height: 50.0,
};

fn vertical_fracture() -> Vec<FractureTrace> {
    fracture_set(&DOMAIN, 3.0, FRAC_PI_2, true)
}

#[test]
fn cartesian_mesh_counts_and_areas() {
    let bucket = CartesianMesher::default().mesh(&vertical_fracture(), &DOMAIN, 1.3).unwrap();
    // 50 / 1.3 rounds to 38 cells per direction; the vertical count is kept even
    // so the fracture centerline coincides with a face row.
    let (nx, ny) = (38, 38);
    assert_eq!(bucket.bulk().num_cells(), nx * ny);
    // All grid faces plus one duplicate per fracture cell.
    assert_eq!(
        bucket.bulk().num_faces(),
        (nx + 1) * ny + nx * (ny + 1) + bucket.pairing().len()
    );

    let pairing = bucket.pairing();
    assert!(!pairing.is_empty());
    assert_eq!(pairing.plus().len(), pairing.minus().len());
    assert_eq!(bucket.num_fracture_grids(), 1);
    assert_eq!(bucket.fractures()[0].num_cells(), pairing.len());

    let dx = DOMAIN.length / nx as f64;
    for &face in pairing.plus() {
        assert_scalar_eq!(bucket.bulk().face_area(face), dx, comp = abs, tol = 1e-12);
    }
}

#[test]
fn paired_faces_are_geometric_duplicates() {
    let bucket = CartesianMesher::default().mesh(&vertical_fracture(), &DOMAIN, 0.65).unwrap();
    let bulk = bucket.bulk();
    for (&plus, &minus) in bucket.pairing().plus().iter().zip(bucket.pairing().minus()) {
        assert_ne!(plus, minus);
        assert_eq!(bulk.face_center(plus), bulk.face_center(minus));
        assert_eq!(bulk.face_area(plus), bulk.face_area(minus));
    }
}

#[test]
fn fracture_faces_lie_strictly_inside_the_trace() {
    for h in [3.0, 2.2, 1.3, 0.65, 0.52, 0.36] {
        let bucket = CartesianMesher::default().mesh(&vertical_fracture(), &DOMAIN, h).unwrap();
        let bulk = bucket.bulk();
        for &face in bucket.pairing().plus() {
            let c = bulk.face_center(face);
            assert_scalar_eq!(c.y, 25.0, comp = abs, tol = 1e-12);
            assert!((c.x - 25.0).abs() < 3.0, "face center {} outside trace at h = {}", c.x, h);
        }
    }
}

#[test]
fn empty_fracture_set_gives_bucket_without_pairing() {
    let bucket = CartesianMesher::default().mesh(&[], &DOMAIN, 1.3).unwrap();
    assert!(bucket.pairing().is_empty());
    assert_eq!(bucket.num_fracture_grids(), 0);
    assert_eq!(bucket.bulk().num_cells(), 38 * 38);
}

#[test]
fn oblique_fracture_is_rejected() {
    let fractures = fracture_set(&DOMAIN, 3.0, FRAC_PI_4, true);
    assert!(CartesianMesher::default().mesh(&fractures, &DOMAIN, 1.3).is_err());
}

#[test]
fn nonpositive_mesh_size_is_rejected() {
    assert!(CartesianMesher::default().mesh(&vertical_fracture(), &DOMAIN, 0.0).is_err());
}

#[test]
fn parameter_assignment_satisfies_bucket_invariant() {
    let mut bucket = CartesianMesher::default().mesh(&vertical_fracture(), &DOMAIN, 1.3).unwrap();
    assert!(!bucket.has_all_parameters());

    let assignment = UniformTension {
        moduli: ShearPoisson { mu: 1.0, nu: 0.25 },
        traction: TractionBc { p0: 1e-5 },
    };
    assignment.assign(&mut bucket).unwrap();
    assert!(bucket.has_all_parameters());
    assert_eq!(bucket.bulk_parameters().unwrap().traction.p0, 1e-5);
}

#[test]
fn fracture_face_areas_follow_the_pairing_order() {
    let bucket = CartesianMesher::default().mesh(&vertical_fracture(), &DOMAIN, 2.2).unwrap();
    let areas = bucket.fracture_face_areas();
    assert_eq!(areas.len(), bucket.pairing().len());
    for (&area, &face) in areas.iter().zip(bucket.pairing().plus()) {
        assert_eq!(area, bucket.bulk().face_area(face));
    }
}
