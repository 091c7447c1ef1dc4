//! Transform System
//!
//! Flattens the node hierarchy into world-space entries. World matrices are
//! composed depth-first: `world = parent_world * local`.

use glam::{Mat4, Quat, Vec3};

use crate::assets::document::NodeDef;
use crate::errors::{ResourceError, Result};

/// One visited node with its composed world matrix.
///
/// Mesh-less nodes (groups, cameras) are emitted too; callers filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedNode {
    pub index: usize,
    pub name: Option<String>,
    pub world_matrix: Mat4,
    pub mesh: Option<usize>,
    pub camera: Option<usize>,
}

/// Local transform of a node.
///
/// An explicit matrix is used verbatim; otherwise TRS is composed with
/// identity rotation, zero translation and unit scale as defaults.
#[must_use]
pub fn local_matrix(node: &NodeDef) -> Mat4 {
    if let Some(matrix) = node.matrix {
        return Mat4::from_cols_array(&matrix);
    }

    let translation = node.translation.map_or(Vec3::ZERO, Vec3::from_array);
    let rotation = node.rotation.map_or(Quat::IDENTITY, Quat::from_array);
    let scale = node.scale.map_or(Vec3::ONE, Vec3::from_array);

    Mat4::from_scale_rotation_translation(scale, rotation, translation)
}

/// Flattens the subtree rooted at `node` into depth-first order.
pub fn flatten(node: usize, parent_world: Mat4, nodes: &[NodeDef]) -> Result<Vec<FlattenedNode>> {
    let mut output = Vec::new();
    let mut ancestors = Vec::new();
    flatten_into(node, parent_world, nodes, &mut ancestors, &mut output)?;
    Ok(output)
}

/// Flattens every root of a scene, in order.
pub fn flatten_roots(roots: &[usize], nodes: &[NodeDef]) -> Result<Vec<FlattenedNode>> {
    let mut output = Vec::new();
    let mut ancestors = Vec::new();
    for &root in roots {
        flatten_into(root, Mat4::IDENTITY, nodes, &mut ancestors, &mut output)?;
    }
    Ok(output)
}

fn flatten_into(
    index: usize,
    parent_world: Mat4,
    nodes: &[NodeDef],
    ancestors: &mut Vec<usize>,
    output: &mut Vec<FlattenedNode>,
) -> Result<()> {
    let node = nodes.get(index).ok_or(ResourceError::IndexOutOfBounds {
        context: "nodes",
        index,
    })?;
    if ancestors.contains(&index) {
        return Err(ResourceError::NodeCycle(index).into());
    }

    let world_matrix = parent_world * local_matrix(node);
    output.push(FlattenedNode {
        index,
        name: node.name.clone(),
        world_matrix,
        mesh: node.mesh,
        camera: node.camera,
    });

    ancestors.push(index);
    for &child in &node.children {
        flatten_into(child, world_matrix, nodes, ancestors, output)?;
    }
    ancestors.pop();

    Ok(())
}
