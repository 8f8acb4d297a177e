//! Geometry helpers used by the placement mappers.

use crate::error::{LayoutError, Result};
use glam::{DVec2, DVec3};
use rand::Rng;
use std::f64::consts::{PI, TAU};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

/// Decimal digits kept after normalization.
pub const DEFAULT_PRECISION: u32 = 10;

/// A Cartesian point the layout engine can normalize and place.
pub trait Coordinate:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
{
    /// Number of axes.
    const DIM: usize;

    const ZERO: Self;

    fn axis(&self, axis: usize) -> f64;

    /// Builds a point from exactly [`Self::DIM`] axis values.
    fn from_axes(axes: &[f64]) -> Self;

    fn norm(self) -> f64;
}

impl Coordinate for DVec2 {
    const DIM: usize = 2;
    const ZERO: Self = DVec2::ZERO;

    fn axis(&self, axis: usize) -> f64 {
        self[axis]
    }

    fn from_axes(axes: &[f64]) -> Self {
        DVec2::new(axes[0], axes[1])
    }

    fn norm(self) -> f64 {
        let length = self.length();
        if length.is_finite() {
            return length;
        }
        // The squared length overflows before the length does.
        let scale = self.abs().max_element();
        (self / scale).length() * scale
    }
}

impl Coordinate for DVec3 {
    const DIM: usize = 3;
    const ZERO: Self = DVec3::ZERO;

    fn axis(&self, axis: usize) -> f64 {
        self[axis]
    }

    fn from_axes(axes: &[f64]) -> Self {
        DVec3::new(axes[0], axes[1], axes[2])
    }

    fn norm(self) -> f64 {
        let length = self.length();
        if length.is_finite() {
            return length;
        }
        // The squared length overflows before the length does.
        let scale = self.abs().max_element();
        (self / scale).length() * scale
    }
}

/// Angles of a point on a sphere.
///
/// `polar` is measured from the +z axis and `azimuth` around it in the xy plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalAngles {
    pub polar: f64,
    pub azimuth: f64,
}

impl SphericalAngles {
    pub fn new(polar: f64, azimuth: f64) -> Self {
        Self { polar, azimuth }
    }

    /// Cartesian point on the unit sphere.
    pub fn to_unit(self) -> DVec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        DVec3::new(sin_polar * cos_azimuth, sin_polar * sin_azimuth, cos_polar)
    }
}

/// What to do with an axis whose values are all equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneratePolicy {
    /// Map every value on the axis to `0.0`.
    #[default]
    Zero,
    /// Fail with [`LayoutError::DegenerateRange`].
    Error,
}

/// Min-max scales `values` into `[0, 1]`.
///
/// An empty slice yields an empty vector. A constant slice is handled by `policy`.
pub fn normalize_axis(values: &[f64], policy: DegeneratePolicy) -> Result<Vec<f64>> {
    normalize_axis_at(values, 0, policy)
}

fn normalize_axis_at(values: &[f64], axis: usize, policy: DegeneratePolicy) -> Result<Vec<f64>> {
    if values.iter().any(|value| !value.is_finite()) {
        return Err(LayoutError::NonFiniteAxis { axis });
    }
    let Some((min, max)) = min_max(values) else {
        return Ok(Vec::new());
    };

    // Spans wider than f64::MAX are shrunk before subtracting.
    let shrink = if (max - min).is_finite() {
        1.0
    } else {
        min.abs().max(max.abs())
    };
    let (min, max) = (min / shrink, max / shrink);

    let range = max - min;
    if range == 0.0 {
        return match policy {
            DegeneratePolicy::Zero => Ok(vec![0.0; values.len()]),
            DegeneratePolicy::Error => Err(LayoutError::DegenerateRange { axis }),
        };
    }

    Ok(values
        .iter()
        .map(|value| (value / shrink - min) / range)
        .collect())
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(min, max), &v| (min.min(v), max.max(v))),
    )
}

/// Normalizes every axis of `points` independently, then rounds to `precision` digits.
pub fn normalize_points<P: Coordinate>(
    points: &[P],
    policy: DegeneratePolicy,
    precision: Option<u32>,
) -> Result<Vec<P>> {
    let mut columns = Vec::with_capacity(P::DIM);
    for axis in 0..P::DIM {
        let values: Vec<f64> = points.iter().map(|point| point.axis(axis)).collect();
        let mut scaled = normalize_axis_at(&values, axis, policy)?;
        if let Some(digits) = precision {
            scaled.iter_mut().for_each(|v| *v = round_to(*v, digits));
        }
        columns.push(scaled);
    }

    let mut axes = vec![0.0; P::DIM];
    Ok((0..points.len())
        .map(|i| {
            for (axis, column) in columns.iter().enumerate() {
                axes[axis] = column[i];
            }
            P::from_axes(&axes)
        })
        .collect())
}

/// Rounds half away from zero to `digits` decimal places.
///
/// `value` is returned unchanged when `digits` is beyond what an `f64` can scale to.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Arithmetic mean of `points`.
pub fn centroid<P: Coordinate>(points: &[P]) -> Result<P> {
    if points.is_empty() {
        return Err(LayoutError::EmptyEmbedding);
    }
    let count = points.len() as f64;
    Ok(points
        .iter()
        .fold(P::ZERO, |acc, &point| acc + point / count))
}

/// Distance from `center` to the farthest of `points`, multiplied by `scale`.
pub fn bounding_radius<P: Coordinate>(points: &[P], center: P, scale: f64) -> f64 {
    points
        .iter()
        .map(|&point| (point - center).norm())
        .fold(0.0, f64::max)
        * scale
}

/// Fibonacci lattice angles for `n` points on a sphere.
///
/// Point `k` has `polar = acos(1 - 2k/n)` and `azimuth = pi (1 + sqrt 5) k`. The
/// sequence starts at the north pole.
pub fn fibonacci_sphere_points(n: usize) -> Vec<SphericalAngles> {
    let increment = PI * (1.0 + 5f64.sqrt());
    (0..n)
        .map(|k| {
            let k = k as f64;
            SphericalAngles::new((1.0 - 2.0 * k / n as f64).acos(), increment * k)
        })
        .collect()
}

/// `n` Fibonacci lattice points on the sphere of `radius` around `center`.
pub fn fibonacci_sphere(n: usize, center: DVec3, radius: f64) -> Vec<DVec3> {
    fibonacci_sphere_points(n)
        .into_iter()
        .map(|angles| center + angles.to_unit() * radius)
        .collect()
}

/// `n` points on the circle of `radius` around `center` at uniformly drawn angles.
pub fn circle_points<R: Rng + ?Sized>(
    n: usize,
    radius: f64,
    center: DVec2,
    rng: &mut R,
) -> Vec<DVec2> {
    (0..n)
        .map(|_| {
            let (sin, cos) = rng.gen_range(0.0..TAU).sin_cos();
            center + DVec2::new(cos, sin) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f64 = 1e-9;

    #[test]
    fn normalize_axis_scales_into_unit_range() {
        let scaled = normalize_axis(&[2.0, 4.0, 3.0, -2.0], DegeneratePolicy::Zero).unwrap();
        assert_eq!(scaled, vec![4.0 / 6.0, 1.0, 5.0 / 6.0, 0.0]);
        assert!(normalize_axis(&[], DegeneratePolicy::Error).unwrap().is_empty());
    }

    #[test]
    fn constant_axis_follows_policy() {
        let zeroed = normalize_axis(&[3.5, 3.5, 3.5], DegeneratePolicy::Zero).unwrap();
        assert_eq!(zeroed, vec![0.0; 3]);

        let err = normalize_axis(&[3.5, 3.5], DegeneratePolicy::Error).unwrap_err();
        assert!(matches!(err, LayoutError::DegenerateRange { axis: 0 }));
    }

    #[test]
    fn normalize_points_reports_the_flat_axis() {
        let points = [DVec3::new(0.0, 1.0, 5.0), DVec3::new(1.0, 2.0, 5.0)];
        let err = normalize_points(&points, DegeneratePolicy::Error, None).unwrap_err();
        assert!(matches!(err, LayoutError::DegenerateRange { axis: 2 }));

        let ok = normalize_points(&points, DegeneratePolicy::Zero, Some(10)).unwrap();
        assert_eq!(ok, vec![DVec3::new(0.0, 0.0, 0.0), DVec3::new(1.0, 1.0, 0.0)]);
    }

    #[test]
    fn huge_spans_stay_finite() {
        let scaled = normalize_axis(&[1e308, -1e308, 0.0], DegeneratePolicy::Zero).unwrap();
        assert_eq!(scaled, vec![1.0, 0.0, 0.5]);

        let err = normalize_axis(&[1.0, f64::NAN], DegeneratePolicy::Zero).unwrap_err();
        assert!(matches!(err, LayoutError::NonFiniteAxis { axis: 0 }));
    }

    #[test]
    fn huge_points_have_finite_norm_and_centroid() {
        let point = DVec2::new(1e308, -1e308);
        assert!((point.norm() / 1e308 - 2f64.sqrt()).abs() < EPS);

        let center = centroid(&[DVec2::new(1.5e308, 1.0), DVec2::new(1.5e308, 3.0)]).unwrap();
        assert_eq!(center, DVec2::new(1.5e308, 2.0));
    }

    #[test]
    fn rounding_keeps_ten_digits() {
        assert_eq!(round_to(0.123456789049, 10), 0.123456789);
        assert_eq!(round_to(0.12345678906, 10), 0.1234567891);
        assert_eq!(round_to(1.0, 10), 1.0);
    }

    #[test]
    fn rounding_beyond_f64_range_is_a_no_op() {
        assert_eq!(round_to(0.25, 400), 0.25);
        assert_eq!(round_to(0.0, u32::MAX), 0.0);
        assert_eq!(round_to(0.3, 15), 0.3);
    }

    #[test]
    fn centroid_and_radius() {
        let points = [DVec2::new(0.0, 0.0), DVec2::new(2.0, 0.0), DVec2::new(1.0, 3.0)];
        let center = centroid(&points).unwrap();
        assert!((center - DVec2::new(1.0, 1.0)).length() < EPS);

        let radius = bounding_radius(&points, center, 1.2);
        assert!((radius - 2.0 * 1.2).abs() < EPS);

        assert!(matches!(
            centroid::<DVec2>(&[]),
            Err(LayoutError::EmptyEmbedding)
        ));
    }

    #[test]
    fn fibonacci_edge_counts() {
        assert!(fibonacci_sphere_points(0).is_empty());

        let single = fibonacci_sphere_points(1);
        assert_eq!(single.len(), 1);
        assert!((single[0].to_unit() - DVec3::Z).length() < EPS);
    }

    #[test]
    fn fibonacci_points_lie_on_sphere_and_are_distinct() {
        let center = DVec3::new(1.0, -2.0, 0.5);
        let points = fibonacci_sphere(64, center, 3.0);
        assert_eq!(points.len(), 64);
        for point in &points {
            assert!(((*point - center).length() - 3.0).abs() < EPS);
        }
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!(a.distance(*b) > EPS);
            }
        }
    }

    #[test]
    fn circle_points_are_seeded() {
        let center = DVec2::new(4.0, -1.0);
        let first = circle_points(10, 2.5, center, &mut StdRng::seed_from_u64(9));
        let second = circle_points(10, 2.5, center, &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);
        for point in &first {
            assert!(((*point - center).length() - 2.5).abs() < EPS);
        }
    }
}
