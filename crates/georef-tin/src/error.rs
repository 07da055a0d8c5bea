/// An error type for the triangulated transformer.
#[derive(thiserror::Error, Debug)]
pub enum TinError {
    /// Fewer than three control points.
    #[error("Not enough control points: at least 3 required, got {0}")]
    NotEnoughPoints(usize),

    /// The control points do not span a triangle.
    #[error("Cannot triangulate {0} control points, they are collinear or coincident")]
    Triangulation(usize),

    /// A configuration could not be (de)serialized.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}
