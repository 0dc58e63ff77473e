//! Surface-sample input: point-set loading and the greedy radius filter
//! that turns a raw sample into graph node positions.

use std::fs;
use std::path::Path;

use crate::prelude::*;
use crate::{GraphError, Result};

/// Radius used to de-duplicate raw point sets before graph construction.
pub const DEFAULT_SAMPLE_RADIUS: f64 = 0.05;

/// Greedy O(n^2) de-duplication: for each surviving point `i`, drop every
/// later point `j` closer than `radius`. Output order is retained input
/// order, and no surviving pair is closer than the radius.
pub fn simplify_sample(points: &mut Vec<Vector3>, radius: f64) {
    let mut i = 0;
    while i < points.len() {
        let mut j = i + 1;
        while j < points.len() {
            if (points[i] - points[j]).norm() < radius {
                points.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

/// Load a count-prefixed `x y z` sample file.
pub fn load_sample<P: AsRef<Path>>(path: P) -> Result<Vec<Vector3>> {
    let text = fs::read_to_string(path)?;
    let mut tokens = text.split_whitespace();
    let n: usize = tokens
        .next()
        .ok_or_else(|| GraphError::SampleParse("missing point count".into()))?
        .parse()
        .map_err(|e| GraphError::SampleParse(format!("bad point count: {e}")))?;

    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let mut coord = [0.; 3];
        for c in coord.iter_mut() {
            *c = tokens
                .next()
                .ok_or_else(|| GraphError::SampleParse(format!("sample truncated at point {i}")))?
                .parse()
                .map_err(|e| GraphError::SampleParse(format!("bad coordinate at point {i}: {e}")))?;
        }
        points.push(Vector3::new(coord[0], coord[1], coord[2]));
    }
    Ok(points)
}

#[cfg(test)]
mod tests {

    use std::io::Write;

    use super::*;

    #[test]
    fn test_simplify_drops_close_points() {
        let mut points = vec![
            Vector3::new(0., 0., 0.),
            Vector3::new(0.02, 0., 0.), // within radius of point 0
            Vector3::new(1., 0., 0.),
            Vector3::new(1., 0.04, 0.), // within radius of point 2
            Vector3::new(2., 0., 0.),
        ];
        simplify_sample(&mut points, 0.05);
        assert_eq!(
            points,
            vec![
                Vector3::new(0., 0., 0.),
                Vector3::new(1., 0., 0.),
                Vector3::new(2., 0., 0.),
            ]
        );
    }

    #[test]
    fn test_simplify_handles_runs_of_duplicates() {
        // Three points pairwise within the radius collapse to the first
        let mut points = vec![
            Vector3::new(0., 0., 0.),
            Vector3::new(0.01, 0., 0.),
            Vector3::new(0.02, 0., 0.),
            Vector3::new(5., 5., 5.),
        ];
        simplify_sample(&mut points, 0.1);
        assert_eq!(
            points,
            vec![Vector3::new(0., 0., 0.), Vector3::new(5., 5., 5.)]
        );
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let mut points: Vec<Vector3> = (0..40)
            .map(|i| {
                let s = i as f64 * 0.013;
                Vector3::new(s.sin(), s.cos(), s * 0.1)
            })
            .collect();

        simplify_sample(&mut points, 0.05);
        let once = points.clone();
        simplify_sample(&mut points, 0.05);
        assert_eq!(points, once);

        // No surviving pair is closer than the radius
        for (i, a) in once.iter().enumerate() {
            for b in once.iter().skip(i + 1) {
                assert!((a - b).norm() >= 0.05);
            }
        }
    }

    #[test]
    fn test_load_sample() {
        let path = std::env::temp_dir().join(format!("defgraph_sample_{}.sam", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "3\n0.5 0 0\n1 2 3\n-1 -2 -3\n").unwrap();

        let points = load_sample(&path).unwrap();
        assert_eq!(
            points,
            vec![
                Vector3::new(0.5, 0., 0.),
                Vector3::new(1., 2., 3.),
                Vector3::new(-1., -2., -3.),
            ]
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_sample_truncated() {
        let path =
            std::env::temp_dir().join(format!("defgraph_truncated_{}.sam", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "2\n0 0 0\n").unwrap();

        let err = load_sample(&path).unwrap_err();
        assert!(matches!(err, GraphError::SampleParse(_)));
        std::fs::remove_file(&path).ok();
    }
}
