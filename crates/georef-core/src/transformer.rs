use crate::TransformError;

/// Direction of a coordinate transformation.
///
/// `Forward` maps image pixel/line to georeferenced X/Y, `Inverse` maps
/// georeferenced X/Y back to pixel/line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformDirection {
    /// Pixel/line to georeferenced coordinates.
    Forward,
    /// Georeferenced coordinates to pixel/line.
    Inverse,
}

impl TransformDirection {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            TransformDirection::Forward => TransformDirection::Inverse,
            TransformDirection::Inverse => TransformDirection::Forward,
        }
    }

    /// Returns the effective direction of a transformer built with the given
    /// `reversed` flag.
    pub fn resolve(self, reversed: bool) -> Self {
        if reversed {
            self.flipped()
        } else {
            self
        }
    }
}

/// A batch coordinate transformer.
///
/// Points are transformed in place. Each point is processed independently and
/// its outcome is written to `success`; a failed point keeps its input
/// coordinates.
pub trait Transformer: Send + Sync {
    /// Transforms a batch of points in place.
    ///
    /// # Arguments
    ///
    /// * `direction` - The requested direction, before applying the `reversed` flag.
    /// * `x` - The X (or pixel) coordinates.
    /// * `y` - The Y (or line) coordinates.
    /// * `z` - Optional heights, one per point.
    /// * `success` - Per-point success flags.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::MismatchedLengths`] if the slices disagree in
    /// length. Per-point failures are reported through `success` only.
    fn transform(
        &self,
        direction: TransformDirection,
        x: &mut [f64],
        y: &mut [f64],
        z: Option<&mut [f64]>,
        success: &mut [bool],
    ) -> Result<(), TransformError>;

    /// Transforms a single point, returning `None` if it fails.
    fn transform_point(
        &self,
        direction: TransformDirection,
        x: f64,
        y: f64,
        z: f64,
    ) -> Option<[f64; 2]> {
        let (mut xs, mut ys, mut zs) = ([x], [y], [z]);
        let mut ok = [false];
        self.transform(direction, &mut xs, &mut ys, Some(&mut zs), &mut ok)
            .ok()?;
        ok[0].then_some([xs[0], ys[0]])
    }
}

/// Validates the slice lengths of a transform batch.
///
/// Returns the number of points in the batch.
pub fn check_batch(
    x: &[f64],
    y: &[f64],
    z: Option<&[f64]>,
    success: &[bool],
) -> Result<usize, TransformError> {
    let n = x.len();
    let check = |name, actual| {
        if actual != n {
            Err(TransformError::MismatchedLengths {
                name,
                expected: n,
                actual,
            })
        } else {
            Ok(())
        }
    };
    check("y", y.len())?;
    if let Some(z) = z {
        check("z", z.len())?;
    }
    check("success", success.len())?;
    Ok(n)
}
