//! Mesh data handed to a renderer

use glam::Vec3;
use serde::Serialize;

/// Indexed triangle mesh of a sampled surface.
///
/// Positions are `(x, height, y)`: the function value is the up axis and
/// the domain's `y` input is the depth axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshBuffer {
  pub positions: Vec<[f32; 3]>,
  pub indices: Vec<u32>,
  pub normals: Vec<[f32; 3]>,
  /// Number of lattice points whose evaluation failed and were flattened
  pub failed_samples: usize,
}

impl MeshBuffer {
  /// Build a mesh and derive its vertex normals.
  pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
    let normals = compute_vertex_normals(&positions, &indices);
    MeshBuffer {
      positions,
      indices,
      normals,
      failed_samples: 0,
    }
  }

  /// Calculate vertex count
  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  /// Calculate index count
  pub fn index_count(&self) -> usize {
    self.indices.len()
  }

  /// Calculate triangle count
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
    self
      .indices
      .chunks_exact(3)
      .map(|tri| [tri[0], tri[1], tri[2]])
  }

  /// Get position data as bytes
  pub fn position_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.positions)
  }

  /// Get normal data as bytes
  pub fn normal_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.normals)
  }

  /// Get index data as bytes
  pub fn index_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.indices)
  }

  /// Axis-aligned bounds `(min, max)` of all positions.
  pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
    let first = Vec3::from_array(*self.positions.first()?);
    let (min, max) = self.positions.iter().fold((first, first), |acc, p| {
      let p = Vec3::from_array(*p);
      (acc.0.min(p), acc.1.max(p))
    });
    Some((min.to_array(), max.to_array()))
  }
}

/// Area-weighted vertex normals.
///
/// Each triangle `(a, b, c)` contributes `(c - b) x (a - b)` to its three
/// corners; the sums are normalized. Vertices touched by no triangle, or
/// only by zero-area ones, keep a zero normal.
pub fn compute_vertex_normals(
  positions: &[[f32; 3]],
  indices: &[u32],
) -> Vec<[f32; 3]> {
  let mut sums = vec![Vec3::ZERO; positions.len()];

  for tri in indices.chunks_exact(3) {
    let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
    let (Some(pa), Some(pb), Some(pc)) =
      (positions.get(a), positions.get(b), positions.get(c))
    else {
      continue;
    };
    let pa = Vec3::from_array(*pa);
    let pb = Vec3::from_array(*pb);
    let pc = Vec3::from_array(*pc);
    let face = (pc - pb).cross(pa - pb);
    sums[a] += face;
    sums[b] += face;
    sums[c] += face;
  }

  sums
    .into_iter()
    .map(|n| n.normalize_or_zero().to_array())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_single_triangle_normal_points_up() {
    // Same winding as one surface cell: (x0,y0), (x0,y1), (x1,y0)
    let positions = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]];
    let normals = compute_vertex_normals(&positions, &[0, 1, 2]);
    for n in normals {
      assert_eq!(n, [0.0, 1.0, 0.0]);
    }
  }

  #[test]
  fn test_unreferenced_vertex_keeps_zero_normal() {
    let positions = vec![
      [0.0, 0.0, 0.0],
      [0.0, 0.0, 1.0],
      [1.0, 0.0, 0.0],
      [5.0, 5.0, 5.0],
    ];
    let normals = compute_vertex_normals(&positions, &[0, 1, 2]);
    assert_eq!(normals[3], [0.0, 0.0, 0.0]);
  }

  #[test]
  fn test_bounds_and_byte_views() {
    let mesh = MeshBuffer::new(
      vec![[-1.0, 2.0, 0.5], [3.0, -4.0, 1.5], [0.0, 0.0, 0.0]],
      vec![0, 1, 2],
    );
    assert_eq!(mesh.bounds(), Some(([-1.0, -4.0, 0.0], [3.0, 2.0, 1.5])));
    assert_eq!(mesh.position_bytes().len(), 3 * 3 * 4);
    assert_eq!(mesh.index_bytes().len(), 3 * 4);
    assert_eq!(mesh.triangles().collect::<Vec<_>>(), vec![[0, 1, 2]]);
    assert_eq!(MeshBuffer::default().bounds(), None);
  }
}
