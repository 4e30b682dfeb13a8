//! Point-group reductions: centroids and the stalk direction vector.

use kinesin_core::{KinesinError, Result};

use crate::types::Vector3;

/// Unweighted center of geometry of a point group.
///
/// # Errors
///
/// Returns an error if `points` is empty.
pub fn centroid(points: &[Vector3]) -> Result<Vector3> {
    if points.is_empty() {
        return Err(KinesinError::InvalidInput(
            "cannot take the centroid of an empty point group".into(),
        ));
    }
    let mut sum = Vector3::zero();
    for p in points {
        sum = sum.add(p);
    }
    Ok(sum.scale(1.0 / points.len() as f64))
}

/// Unit vector pointing from the `top` centroid to the `bottom` centroid.
///
/// # Errors
///
/// Returns [`KinesinError::DegenerateVector`] if the two centroids coincide.
pub fn stalk_direction(top: &Vector3, bottom: &Vector3) -> Result<Vector3> {
    bottom.sub(top).try_normalize().ok_or_else(|| {
        KinesinError::DegenerateVector("stalk top and bottom centroids coincide".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_of_triangle() {
        let points = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
        ];
        let c = centroid(&points).unwrap();
        assert!((c.x - 2.0 / 3.0).abs() < 1e-10);
        assert!((c.y - 2.0 / 3.0).abs() < 1e-10);
        assert!(c.z.abs() < 1e-10);
    }

    #[test]
    fn centroid_empty_is_error() {
        assert!(centroid(&[]).is_err());
    }

    #[test]
    fn stalk_points_top_to_bottom() {
        let top = Vector3::new(0.0, 0.0, 10.0);
        let bottom = Vector3::new(0.0, 0.0, 4.0);
        let d = stalk_direction(&top, &bottom).unwrap();
        assert!((d.z + 1.0).abs() < 1e-12);
        assert!((d.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn coincident_stalk_centroids_rejected() {
        let p = Vector3::new(1.0, 2.0, 3.0);
        let err = stalk_direction(&p, &p).unwrap_err();
        assert!(matches!(err, KinesinError::DegenerateVector(_)));
    }
}
