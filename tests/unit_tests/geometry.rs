use matrixcompare::assert_scalar_eq;
use nalgebra::{Point2, Point3};
use sneddon::geometry::{fracture_set, shoelace_area, Domain, EllipticFracture, FracturePolygon, FractureTrace};
use std::f64::consts::FRAC_PI_2;

const DOMAIN: Domain = Domain {
    length: 50.0,
    height: 50.0,
};

#[test]
fn axis_aligned_trace_endpoints() {
    let trace = FractureTrace::centered_in(&DOMAIN, 3.0, FRAC_PI_2);
    let [p0, p1] = trace.endpoints();
    assert_scalar_eq!(p0.x, 22.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(p0.y, 25.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(p1.x, 28.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(p1.y, 25.0, comp = abs, tol = 1e-12);
    assert_eq!(trace.center(), Point2::new(25.0, 25.0));
}

#[test]
fn oblique_trace_endpoints() {
    let beta = std::f64::consts::FRAC_PI_4;
    let trace = FractureTrace::centered_in(&DOMAIN, 2.0, beta);
    let [p0, p1] = trace.endpoints();
    let offset = 2.0 / 2.0_f64.sqrt();
    assert_scalar_eq!(p0.x, 25.0 - offset, comp = abs, tol = 1e-12);
    assert_scalar_eq!(p0.y, 25.0 - offset, comp = abs, tol = 1e-12);
    assert_scalar_eq!(p1.x, 25.0 + offset, comp = abs, tol = 1e-12);
    assert_scalar_eq!(p1.y, 25.0 + offset, comp = abs, tol = 1e-12);
}

#[test]
fn excluded_fracture_gives_empty_set() {
    assert!(fracture_set(&DOMAIN, 3.0, FRAC_PI_2, false).is_empty());
    assert_eq!(fracture_set(&DOMAIN, 3.0, FRAC_PI_2, true).len(), 1);
}

#[test]
fn extruded_polygon_spans_the_thickness() {
    let trace = FractureTrace::centered_in(&DOMAIN, 3.0, FRAC_PI_2);
    let polygon = FracturePolygon::from_trace(&trace, 5.0);
    let vertices = polygon.vertices();
    assert_scalar_eq!(vertices[0].y, 0.0, comp = abs, tol = 1e-15);
    assert_scalar_eq!(vertices[2].y, 10.0, comp = abs, tol = 1e-15);
    // The trace endpoints appear in the xz-plane.
    assert_scalar_eq!(vertices[0].x, 22.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(vertices[1].x, 28.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(vertices[0].z, 25.0, comp = abs, tol = 1e-12);
}

#[test]
fn shoelace_area_of_unit_square() {
    let square = [
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ];
    assert_scalar_eq!(shoelace_area(square), 1.0, comp = abs, tol = 1e-15);
}

#[test]
fn penny_polygon_area_ratio_approaches_one() {
    let center = Point3::new(25.0, 25.0, 25.0);
    let coarse = EllipticFracture::penny(center, 3.0, 16);
    let fine = EllipticFracture::penny(center, 3.0, 200);

    // Inscribed polygon: the ratio is below one and improves with the point count.
    let coarse_ratio = coarse.area_ratio();
    let fine_ratio = fine.area_ratio();
    assert!(coarse_ratio > 0.97 && coarse_ratio < 1.0);
    assert!(fine_ratio > 0.999 && fine_ratio < 1.0);
    assert!(fine_ratio > coarse_ratio);
}

#[test]
fn elliptic_polygon_has_requested_point_count() {
    let ellipse = EllipticFracture::new(Point3::origin(), 4.0, 2.0, 32);
    let polygon = ellipse.polygon();
    assert_eq!(polygon.len(), 32);
    // First vertex sits on the major axis.
    assert_scalar_eq!(polygon[0].x, 4.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(polygon[0].y, 0.0, comp = abs, tol = 1e-12);
}
