use std::collections::HashSet;

use spade::{DelaunayTriangulation, HasPosition, Point2, Triangulation as _};

use crate::TinError;

// a mesh vertex remembers the control point it was inserted for
struct Node {
    position: Point2<f64>,
    index: usize,
}

impl HasPosition for Node {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// Computes the Delaunay triangulation of a point set.
///
/// The mesh is built incrementally with exact orientation and in-circle
/// predicates, so co-circular and grid-aligned points still give a proper
/// triangulation of their convex hull. Coincident points are inserted once,
/// under the index of their first occurrence.
///
/// # Arguments
///
/// * `points` - The points to triangulate.
///
/// # Returns
///
/// The triangles as counter-clockwise triplets of indices into `points`.
///
/// # Errors
///
/// Returns [`TinError::Triangulation`] if the points are collinear or
/// coincident, or if a coordinate is not finite.
pub fn delaunay(points: &[[f64; 2]]) -> Result<Vec<[usize; 3]>, TinError> {
    let n = points.len();
    if points.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
        return Err(TinError::Triangulation(n));
    }

    let mut mesh: DelaunayTriangulation<Node> = DelaunayTriangulation::new();
    let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(n);

    for (i, p) in points.iter().enumerate() {
        // -0.0 and 0.0 are the same location
        let [x, y] = [p[0] + 0.0, p[1] + 0.0];
        if !seen.insert((x.to_bits(), y.to_bits())) {
            log::debug!("skipping duplicate control point {i} at ({x}, {y})");
            continue;
        }
        mesh.insert(Node {
            position: Point2::new(x, y),
            index: i,
        })
        .map_err(|err| {
            log::debug!("cannot insert control point {i}: {err:?}");
            TinError::Triangulation(n)
        })?;
    }

    let triangles: Vec<[usize; 3]> = mesh
        .inner_faces()
        .map(|face| face.vertices().map(|v| v.data().index))
        .map(|t| {
            let [a, b, c] = t.map(|k| points[k]);
            let area = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            if area < 0.0 {
                [t[0], t[2], t[1]]
            } else {
                t
            }
        })
        .collect();

    if triangles.is_empty() {
        return Err(TinError::Triangulation(n));
    }

    log::debug!("triangulated {n} points into {} facets", triangles.len());
    Ok(triangles)
}
