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

//! The transform hierarchy a rig lives in.

mod document;
mod graph;
mod transform;

pub use self::document::SceneDocument;
pub use self::graph::{Node, NodeId, SceneGraph};
pub use self::transform::Transform;

use crate::components::ComponentId;

/// Structural problems found in a scene graph.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A link points at a node that does not exist.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    /// Parent and child lists disagree.
    #[error("node {child} and its parent {parent} disagree about their link")]
    BrokenLink {
        /// The parent side of the link.
        parent: NodeId,
        /// The child side of the link.
        child: NodeId,
    },
    /// A node is its own ancestor.
    #[error("node {0} is part of a parent cycle")]
    Cycle(NodeId),
    /// A component is missing or owned by another node.
    #[error("component {0:?} is missing or attached to the wrong node")]
    BrokenComponent(ComponentId),
    /// The scene text could not be parsed.
    #[error("failed to parse scene: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The scene could not be written as text.
    #[error("failed to write scene: {0}")]
    Write(#[from] ron::Error),
}
