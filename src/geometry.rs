// Geometry interface consumed by the transport loop, plus a minimal
// single-cell implementation for driving histories end to end.
//
// Full constructive solid geometry, lattices, and universe nesting belong
// to the geometry layer; the core only needs cell location, the distance
// to the next boundary, and crossing bookkeeping.

use crate::particle::Particle;

/// Distance to the next geometric boundary along the flight direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryDistance {
    pub distance: f64,
    /// Surface that will be hit, if known.
    pub surface: Option<usize>,
    /// True when the boundary is a lattice boundary rather than a cell
    /// surface.
    pub in_lattice: bool,
}

/// The geometric operations the transport loop consumes.
pub trait Geometry {
    /// Locate the particle's cell, setting its cell and material indices.
    /// Returns false if the position is outside the geometry.
    fn find_cell(&self, p: &mut Particle) -> bool;

    /// Distance along the current direction to the next boundary.
    fn distance_to_boundary(&self, p: &Particle) -> BoundaryDistance;

    /// Cross a cell surface. Mutates the particle's cell bookkeeping and
    /// kills it on leakage through an outer vacuum boundary.
    fn cross_surface(&self, p: &mut Particle, last_cell: Option<usize>);

    /// Cross a lattice boundary.
    fn cross_lattice(&self, p: &mut Particle);
}

/// A single spherical cell centered on the origin with a vacuum boundary:
/// the smallest geometry able to exercise the full transport loop.
#[derive(Debug, Clone)]
pub struct SphereCell {
    pub radius: f64,
    /// Material filling the cell; `None` is void.
    pub material: Option<usize>,
}

impl SphereCell {
    pub fn new(radius: f64, material: Option<usize>) -> Self {
        Self { radius, material }
    }
}

impl Geometry for SphereCell {
    fn find_cell(&self, p: &mut Particle) -> bool {
        let [x, y, z] = p.position;
        if x * x + y * y + z * z < self.radius * self.radius {
            p.cell = Some(0);
            p.material = self.material;
            true
        } else {
            false
        }
    }

    fn distance_to_boundary(&self, p: &Particle) -> BoundaryDistance {
        // Ray-sphere intersection from inside: with a unit direction,
        // t^2 + b t + c = 0 and the outgoing root is always positive.
        let [x, y, z] = p.position;
        let [u, v, w] = p.direction;
        let b = 2.0 * (x * u + y * v + z * w);
        let c = x * x + y * y + z * z - self.radius * self.radius;
        let disc = b * b - 4.0 * c;
        let distance = if disc < 0.0 {
            f64::INFINITY
        } else {
            (-b + disc.sqrt()) / 2.0
        };
        BoundaryDistance {
            distance,
            surface: Some(0),
            in_lattice: false,
        }
    }

    fn cross_surface(&self, p: &mut Particle, _last_cell: Option<usize>) {
        // The only surface is the outer vacuum boundary
        p.alive = false;
        p.cell = None;
        p.material = None;
    }

    fn cross_lattice(&self, _p: &mut Particle) {}
}
