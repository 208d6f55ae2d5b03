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

use std::collections::HashMap;

use approx::AbsDiffEq;
use rigwright_core::math::{AffineTransform, Mat4};
use rigwright_data::NodeId;

const UNCHANGED_EPSILON: f32 = 1e-6;

/// Accumulated change of frame per bone over a rebake.
///
/// Each entry maps bind poses taken against the bone's original frame onto
/// its current one. Successive edits of the same bone compose as
/// `Δ_new · Δ_existing`.
#[derive(Debug, Default, Clone)]
pub struct DeltaTracker {
    deltas: HashMap<NodeId, Mat4>,
}

impl DeltaTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the change from `before` to `after` for `node`.
    ///
    /// Edits that leave the world matrix unchanged, or whose result cannot be
    /// inverted, are ignored.
    pub fn record(&mut self, node: NodeId, before: &AffineTransform, after: &AffineTransform) {
        if before.0.abs_diff_eq(&after.0, UNCHANGED_EPSILON) {
            return;
        }
        let Some(delta) = AffineTransform::frame_delta(before, after) else {
            log::warn!("RebakeLane: node {node} collapsed to zero scale, bind poses left alone");
            return;
        };
        let delta = delta.to_matrix();
        self.deltas
            .entry(node)
            .and_modify(|existing| *existing = delta * *existing)
            .or_insert(delta);
    }

    /// The accumulated delta for `node`, if it was edited.
    pub fn get(&self, node: NodeId) -> Option<&Mat4> {
        self.deltas.get(&node)
    }

    /// Number of edited bones.
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Whether no bone was edited.
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}
