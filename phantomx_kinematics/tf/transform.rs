//! Rigid transform stored as translation plus unit quaternion

use nalgebra::{
    Isometry3, Matrix3, Matrix4, Point3, Quaternion, Rotation3, Translation3, UnitQuaternion,
};
use serde::{Deserialize, Serialize};

/// Pose of a child frame in its parent frame
///
/// Maps child coordinates into parent coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation in meters
    pub translation: [f64; 3],
    /// Rotation quaternion `[x, y, z, w]`
    pub rotation: [f64; 4],
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn from_translation(translation: [f64; 3]) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// From a rigid homogeneous matrix; the rotation block is assumed orthonormal
    pub fn from_matrix(m: &Matrix4<f64>) -> Self {
        let rotation: Matrix3<f64> = m.fixed_view::<3, 3>(0, 0).into_owned();
        let q = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation));
        Self::from_isometry(&Isometry3::from_parts(
            Translation3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]),
            q,
        ))
    }

    pub fn from_isometry(iso: &Isometry3<f64>) -> Self {
        let t = iso.translation.vector;
        let q = iso.rotation.coords;
        Self {
            translation: [t.x, t.y, t.z],
            rotation: [q.x, q.y, q.z, q.w],
        }
    }

    pub fn to_isometry(&self) -> Isometry3<f64> {
        let [x, y, z, w] = self.rotation;
        let [tx, ty, tz] = self.translation;
        Isometry3::from_parts(
            Translation3::new(tx, ty, tz),
            UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z)),
        )
    }

    pub fn to_matrix(&self) -> Matrix4<f64> {
        self.to_isometry().to_homogeneous()
    }

    /// `self * other`: apply `other` first, then `self`
    pub fn compose(&self, other: &Transform) -> Transform {
        Self::from_isometry(&(self.to_isometry() * other.to_isometry()))
    }

    pub fn inverse(&self) -> Transform {
        Self::from_isometry(&self.to_isometry().inverse())
    }

    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.to_isometry().transform_point(point)
    }

    /// Linear interpolation of the translation, SLERP of the rotation
    pub fn interpolate(&self, other: &Transform, t: f64) -> Transform {
        let t = t.clamp(0.0, 1.0);
        let a = self.to_isometry();
        let b = other.to_isometry();
        let translation = a.translation.vector.lerp(&b.translation.vector, t);
        let rotation = a.rotation.try_slerp(&b.rotation, t, 1e-9).unwrap_or(if t < 0.5 {
            a.rotation
        } else {
            b.rotation
        });
        Self::from_isometry(&Isometry3::from_parts(translation.into(), rotation))
    }

    pub fn is_identity(&self, tolerance: f64) -> bool {
        (self.to_matrix() - Matrix4::identity()).norm() < tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn rot_z(angle: f64) -> Transform {
        Transform::from_isometry(&Isometry3::rotation(nalgebra::Vector3::z() * angle))
    }

    #[test]
    fn test_compose_and_inverse() {
        let a = Transform::from_translation([1.0, 2.0, 3.0]);
        let b = rot_z(FRAC_PI_2);
        let ab = a.compose(&b);
        let p = ab.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(1.0, 3.0, 3.0)).norm() < 1e-12);
        assert!(ab.compose(&ab.inverse()).is_identity(1e-12));
    }

    #[test]
    fn test_matrix_round_trip() {
        let m = crate::kinematics::transform::mount_transform([0.12, -0.06, 0.001], -2.356)
            * crate::kinematics::transform::tibia_transform(0.4, [-0.0645, -0.016]);
        let tf = Transform::from_matrix(&m);
        assert!((tf.to_matrix() - m).norm() < 1e-12);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let a = Transform::identity();
        let b = Transform {
            translation: [2.0, 0.0, 0.0],
            ..rot_z(FRAC_PI_2)
        };
        let mid = a.interpolate(&b, 0.5);
        assert!((mid.translation[0] - 1.0).abs() < 1e-12);
        let expected = rot_z(FRAC_PI_2 / 2.0);
        for i in 0..4 {
            assert!((mid.rotation[i] - expected.rotation[i]).abs() < 1e-12);
        }
    }
}
