//! Fracture geometry construction.
//!
//! Fractures are built once from the domain extents, a half-length and an
//! inclination angle, and are immutable afterwards. Degenerate input (zero
//! half-length, inclination with zero-length projection) is a caller error and
//! is not handled here.
use nalgebra::{Point2, Point3, Vector2};

/// Axis-aligned rectangular domain `[0, length] x [0, height]`.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Domain {
    pub length: f64,
    pub height: f64,
}

impl Domain {
    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.length / 2.0, self.height / 2.0)
    }
}

/// A finite-length fracture trace embedded in a 2D domain.
///
/// The trace is the segment `center ± a * (sin(beta), cos(beta))`, where `a` is the
/// half-length and `beta` the inclination measured from the vertical axis. For
/// `beta = pi/2` the trace runs along the horizontal axis through the domain center.
#[derive(Clone, Debug, PartialEq)]
pub struct FractureTrace {
    center: Point2<f64>,
    half_length: f64,
    inclination: f64,
}

impl FractureTrace {
    /// A single fracture centered in the domain.
    pub fn centered_in(domain: &Domain, half_length: f64, inclination: f64) -> Self {
        Self {
            center: domain.center(),
            half_length,
            inclination,
        }
    }

    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    pub fn half_length(&self) -> f64 {
        self.half_length
    }

    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    /// The direction from the center towards the second endpoint (unit length).
    pub fn axis(&self) -> Vector2<f64> {
        Vector2::new(self.inclination.sin(), self.inclination.cos())
    }

    pub fn endpoints(&self) -> [Point2<f64>; 2] {
        let offset = self.axis() * self.half_length;
        [self.center - offset, self.center + offset]
    }
}

/// Build the fracture set for a run: a single centered fracture, or the empty set
/// for a baseline run without a fracture.
pub fn fracture_set(domain: &Domain, half_length: f64, inclination: f64, include: bool) -> Vec<FractureTrace> {
    if include {
        vec![FractureTrace::centered_in(domain, half_length, inclination)]
    } else {
        Vec::new()
    }
}

/// A planar rectangular fracture in 3D, obtained by extruding a 2D trace through
/// the domain thickness `2t` along the y axis.
#[derive(Clone, Debug, PartialEq)]
pub struct FracturePolygon {
    vertices: [Point3<f64>; 4],
}

impl FracturePolygon {
    pub fn from_trace(trace: &FractureTrace, half_thickness: f64) -> Self {
        let [p0, p1] = trace.endpoints();
        let t2 = 2.0 * half_thickness;
        // The 2D trace lives in the xz-plane of the extruded domain.
        Self {
            vertices: [
                Point3::new(p0.x, 0.0, p0.y),
                Point3::new(p1.x, 0.0, p1.y),
                Point3::new(p1.x, t2, p1.y),
                Point3::new(p0.x, t2, p0.y),
            ],
        }
    }

    pub fn vertices(&self) -> &[Point3<f64>; 4] {
        &self.vertices
    }
}

/// A penny-shaped (elliptical) fracture centered in a 3D domain, represented as a
/// polygon with a fixed number of vertices in the plane `z = center.z`.
#[derive(Clone, Debug, PartialEq)]
pub struct EllipticFracture {
    center: Point3<f64>,
    major_axis: f64,
    minor_axis: f64,
    num_points: usize,
}

impl EllipticFracture {
    pub fn new(center: Point3<f64>, major_axis: f64, minor_axis: f64, num_points: usize) -> Self {
        Self {
            center,
            major_axis,
            minor_axis,
            num_points,
        }
    }

    /// A circular ("penny") fracture of radius `a`.
    pub fn penny(center: Point3<f64>, radius: f64, num_points: usize) -> Self {
        Self::new(center, radius, radius, num_points)
    }

    pub fn polygon(&self) -> Vec<Point3<f64>> {
        let n = self.num_points;
        (0..n)
            .map(|i| {
                let angle = 2.0 * std::f64::consts::PI * (i as f64) / (n as f64);
                Point3::new(
                    self.center.x + self.major_axis * angle.cos(),
                    self.center.y + self.minor_axis * angle.sin(),
                    self.center.z,
                )
            })
            .collect()
    }

    /// Ratio of the polygon area to the ideal ellipse area.
    ///
    /// A sanity diagnostic for the geometric fidelity of the polygonal
    /// approximation, not an error threshold. Approaches 1 from below as the
    /// number of points grows.
    pub fn area_ratio(&self) -> f64 {
        let polygon = self.polygon();
        let polygon_area = shoelace_area(polygon.iter().map(|p| Point2::new(p.x, p.y)));
        let ellipse_area = std::f64::consts::PI * self.major_axis * self.minor_axis;
        let ratio = polygon_area / ellipse_area;
        log::debug!(
            "elliptic fracture polygon with {} points: area ratio {:.6}",
            self.num_points,
            ratio
        );
        ratio
    }
}

/// Area of a simple polygon given by its vertices in order (shoelace formula).
pub fn shoelace_area(vertices: impl IntoIterator<Item = Point2<f64>>) -> f64 {
    let vertices: Vec<_> = vertices.into_iter().collect();
    let n = vertices.len();
    let mut twice_area = 0.0;
    for i in 0..n {
        let p = &vertices[i];
        let q = &vertices[(i + 1) % n];
        twice_area += p.x * q.y - q.x * p.y;
    }
    (twice_area / 2.0).abs()
}
