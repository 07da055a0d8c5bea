use std::collections::HashMap;
use std::sync::Arc;

use crate::delaunay::delaunay;
use crate::TinError;

// tolerance on barycentric weights when testing containment
const EPS: f64 = 1e-10;

// triangles with a smaller denominator are considered flat
const DEGENERATE_DENOM: f64 = 1e-5;

/// A triangle of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facet {
    /// Indices of the vertices in the control point list.
    pub vertices: [usize; 3],
    /// `neighbors[k]` is the facet across the edge opposite to `vertices[k]`.
    pub neighbors: [Option<usize>; 3],
}

/// Coefficients giving the barycentric weights of a point in a facet.
///
/// The weight of the first vertex is
/// `mul1[0] * (x - cst[0]) + mul1[1] * (y - cst[1])`, the second one uses
/// `mul2` and the third is the complement to one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BarycentricCoefficients {
    /// Coefficients of the first weight.
    pub mul1: [f64; 2],
    /// Coefficients of the second weight.
    pub mul2: [f64; 2],
    /// Location of the third vertex.
    pub cst: [f64; 2],
}

impl BarycentricCoefficients {
    /// Computes the coefficients of a triangle, zeroed when it is flat.
    pub fn new(p1: [f64; 2], p2: [f64; 2], p3: [f64; 2]) -> Self {
        let denom = (p2[1] - p3[1]) * (p1[0] - p3[0]) + (p3[0] - p2[0]) * (p1[1] - p3[1]);
        if denom.abs() < DEGENERATE_DENOM {
            return Self::default();
        }
        Self {
            mul1: [(p2[1] - p3[1]) / denom, (p3[0] - p2[0]) / denom],
            mul2: [(p3[1] - p1[1]) / denom, (p1[0] - p3[0]) / denom],
            cst: p3,
        }
    }

    /// Whether the triangle was too flat to get coefficients.
    pub fn is_degenerate(&self) -> bool {
        self.mul1 == [0.0, 0.0] && self.mul2 == [0.0, 0.0]
    }

    /// Returns the barycentric weights of a point.
    pub fn weights(&self, x: f64, y: f64) -> [f64; 3] {
        let (dx, dy) = (x - self.cst[0], y - self.cst[1]);
        let l1 = self.mul1[0] * dx + self.mul1[1] * dy;
        let l2 = self.mul2[0] * dx + self.mul2[1] * dy;
        [l1, l2, 1.0 - l1 - l2]
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        self.weights(x, y)
            .iter()
            .all(|l| (-EPS..=1.0 + EPS).contains(l))
    }
}

/// Outcome of a directed walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// The point lies in this facet.
    Inside(usize),
    /// The walk left the network through this facet.
    Outside(usize),
    /// The walk hit a flat facet or ran out of steps.
    Stalled,
}

/// A triangulated irregular network over a set of vertices.
///
/// The facet topology is shared, so a network can be mirrored onto another
/// vertex set with the same indexing, such as the other side of a set of
/// control points. A mirrored network may have a concave outline.
#[derive(Debug, Clone)]
pub struct Triangulation {
    facets: Arc<[Facet]>,
    coefficients: Vec<BarycentricCoefficients>,
    convex: bool,
}

fn link_neighbors(triangles: &[[usize; 3]]) -> Vec<Facet> {
    let mut edges: HashMap<(usize, usize), Vec<(usize, usize)>> = HashMap::new();
    for (f, t) in triangles.iter().enumerate() {
        for k in 0..3 {
            let (a, b) = (t[(k + 1) % 3], t[(k + 2) % 3]);
            edges.entry((a.min(b), a.max(b))).or_default().push((f, k));
        }
    }

    let mut facets: Vec<Facet> = triangles
        .iter()
        .map(|&vertices| Facet {
            vertices,
            neighbors: [None; 3],
        })
        .collect();

    for owners in edges.values() {
        if let [(f1, k1), (f2, k2)] = owners[..] {
            facets[f1].neighbors[k1] = Some(f2);
            facets[f2].neighbors[k2] = Some(f1);
        }
    }
    facets
}

impl Triangulation {
    /// Builds the Delaunay network of a set of vertices.
    ///
    /// # Errors
    ///
    /// Returns [`TinError::Triangulation`] if no facet can be built.
    pub fn delaunay(vertices: &[[f64; 2]]) -> Result<Self, TinError> {
        let facets: Arc<[Facet]> = link_neighbors(&delaunay(vertices)?).into();
        let coefficients = Self::compute_coefficients(&facets, vertices);
        Ok(Self {
            facets,
            coefficients,
            convex: true,
        })
    }

    /// Returns a network with the same facets over another vertex set.
    ///
    /// `vertices` must be indexed like the vertices this network was built
    /// from.
    pub fn mirrored(&self, vertices: &[[f64; 2]]) -> Self {
        Self {
            facets: Arc::clone(&self.facets),
            coefficients: Self::compute_coefficients(&self.facets, vertices),
            convex: false,
        }
    }

    fn compute_coefficients(
        facets: &[Facet],
        vertices: &[[f64; 2]],
    ) -> Vec<BarycentricCoefficients> {
        facets
            .iter()
            .map(|f| {
                let [a, b, c] = f.vertices;
                BarycentricCoefficients::new(vertices[a], vertices[b], vertices[c])
            })
            .collect()
    }

    /// Returns the facets.
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    /// Returns the barycentric coefficients, indexed like the facets.
    pub fn coefficients(&self) -> &[BarycentricCoefficients] {
        &self.coefficients
    }

    /// Returns the number of facets.
    pub fn len(&self) -> usize {
        self.facets.len()
    }

    /// Whether the network has no facet.
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Walks from facet `start` towards a point across the facet edges.
    ///
    /// At each step the walk crosses the edge opposite to the first vertex
    /// with a negative weight. It gives up after `2 + len / 4` steps.
    pub fn walk(&self, start: usize, x: f64, y: f64) -> Walk {
        if self.facets.is_empty() {
            return Walk::Stalled;
        }
        let max_steps = 2 + self.facets.len() / 4;
        let mut current = start.min(self.facets.len() - 1);

        for _ in 0..max_steps {
            let coefs = &self.coefficients[current];
            if coefs.is_degenerate() {
                return Walk::Stalled;
            }

            let weights = coefs.weights(x, y);
            match weights.iter().position(|&l| l < -EPS) {
                Some(k) => match self.facets[current].neighbors[k] {
                    Some(next) => current = next,
                    None => return Walk::Outside(current),
                },
                None => return Walk::Inside(current),
            }
        }
        Walk::Stalled
    }

    /// Scans every facet for the one containing a point.
    pub fn find_facet_exhaustive(&self, x: f64, y: f64) -> Option<usize> {
        self.coefficients
            .iter()
            .position(|c| !c.is_degenerate() && c.contains(x, y))
    }

    /// Locates the facet containing a point, starting from a hint.
    ///
    /// The hint is typically the facet of the previous point of a batch. A
    /// stalled walk falls back to [`Triangulation::find_facet_exhaustive`],
    /// and so does leaving a mirrored network, whose outline may be concave.
    ///
    /// # Returns
    ///
    /// The facet index, or `None` if the point lies outside the network.
    pub fn find_facet_directed(&self, hint: usize, x: f64, y: f64) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        match self.walk(hint, x, y) {
            Walk::Inside(facet) => Some(facet),
            Walk::Outside(_) if self.convex => None,
            Walk::Outside(_) | Walk::Stalled => self.find_facet_exhaustive(x, y),
        }
    }
}
