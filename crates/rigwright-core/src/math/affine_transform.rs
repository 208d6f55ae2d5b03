// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Affine transformations in 3D space.

use crate::math::{Mat4, Quaternion, Vec3};
use std::ops::Mul;

/// Represents a 3D affine transformation (translation, rotation, scale).
///
/// This is a semantic wrapper around a `Mat4` that guarantees the matrix
/// represents an affine transform. World matrices of scene nodes and the
/// per-bone delta transforms are expressed with it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct AffineTransform(pub Mat4);

impl AffineTransform {
    /// The identity transform, which results in no change.
    pub const IDENTITY: Self = Self(Mat4::IDENTITY);

    /// Creates an `AffineTransform` from a translation, rotation and scale.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rigwright_core::math::{AffineTransform, Quaternion, Vec3};
    ///
    /// let t = AffineTransform::from_trs(Vec3::new(1.0, 2.0, 3.0), Quaternion::IDENTITY, Vec3::ONE);
    /// assert_eq!(t.translation(), Vec3::new(1.0, 2.0, 3.0));
    /// ```
    #[inline]
    pub fn from_trs(translation: Vec3, rotation: Quaternion, scale: Vec3) -> Self {
        Self(Mat4::from_trs(translation, rotation, scale))
    }

    /// Converts the `AffineTransform` to a `Mat4`.
    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        self.0
    }

    /// Extracts the translation component from the affine transform.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.0.translation()
    }

    /// Extracts the rotation component as a quaternion.
    ///
    /// # Note
    ///
    /// The basis columns are normalized before conversion. With non-uniform
    /// scale combined with rotation down a chain the basis may be skewed, in
    /// which case the result is only an approximation.
    #[inline]
    pub fn rotation(&self) -> Quaternion {
        Quaternion::from_rotation_matrix(&self.0)
    }

    /// Maps a point from the local space of this transform to its parent space.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.0.transform_point(p)
    }

    /// Maps a direction from the local space of this transform to its parent
    /// space, ignoring translation.
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.0.transform_vector(v)
    }

    /// Maps a point from parent space back into this transform's local space.
    ///
    /// A singular transform (zero scale) leaves the point unchanged.
    #[inline]
    pub fn inverse_transform_point(&self, p: Vec3) -> Vec3 {
        match self.inverse() {
            Some(inv) => inv.transform_point(p),
            None => p,
        }
    }

    /// Computes the inverse of the affine transformation.
    ///
    /// Returns `None` if the transformation is not invertible (e.g., zero scale).
    ///
    /// # Example
    ///
    /// ```rust
    /// use rigwright_core::math::{AffineTransform, Quaternion, Vec3};
    ///
    /// let t = AffineTransform::from_trs(Vec3::new(1.0, 2.0, 3.0), Quaternion::IDENTITY, Vec3::ONE);
    /// let inverse = t.inverse().unwrap();
    /// assert_eq!(inverse.translation(), Vec3::new(-1.0, -2.0, -3.0));
    /// ```
    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        self.0.affine_inverse().map(Self)
    }

    /// Returns the transform mapping the local frame of `before` onto the
    /// local frame of `after`: `after⁻¹ · before`.
    ///
    /// Left-multiplying a bind pose taken against `before` by this matrix
    /// yields the bind pose valid against `after`.
    pub fn frame_delta(before: &Self, after: &Self) -> Option<Self> {
        after.inverse().map(|inv| inv * *before)
    }
}

impl Default for AffineTransform {
    /// Returns the identity `AffineTransform`.
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for AffineTransform {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl From<AffineTransform> for Mat4 {
    /// Converts the `AffineTransform` into its inner `Mat4`.
    #[inline]
    fn from(transform: AffineTransform) -> Self {
        transform.0
    }
}

impl From<Mat4> for AffineTransform {
    #[inline]
    fn from(val: Mat4) -> Self {
        AffineTransform(val)
    }
}
