use log::{debug, trace};

use crate::evaluator::Evaluable;
use crate::mesh::MeshBuffer;
use crate::params::PlotDomain;

/// Sample `expr` over `domain` and triangulate the lattice.
///
/// Lattice point `(i, j)` becomes vertex `i * (resolution + 1) + j` at
/// `(x, f(x, y) * height_scale, y)`. A point whose evaluation fails, or
/// whose scaled height is not finite, is placed at height 0 and the pass
/// continues. Every cell is split into `(a, b, c)` and `(b, d, c)` where
/// `a = (i, j)`, `b = (i, j + 1)`, `c = (i + 1, j)`, `d = (i + 1, j + 1)`.
///
/// The result depends only on the arguments.
pub fn tessellate<E>(domain: &PlotDomain, expr: &E) -> MeshBuffer
where
  E: Evaluable + ?Sized,
{
  let cells = domain.resolution();
  let height_scale = domain.height_scale();

  let mut positions = Vec::with_capacity(domain.vertex_count());
  let mut failed_samples = 0;

  // i outer, j inner: this order defines the linear index
  for i in 0..=cells {
    for j in 0..=cells {
      let (x, y) = domain.sample_point(i, j);
      // Checked after narrowing: heights past f32::MAX are overflow too
      let z = match expr.eval(x, y).map(|v| (v * height_scale) as f32) {
        Ok(z) if z.is_finite() => z,
        Ok(_) => {
          trace!("f({x}, {y}) overflows after scaling");
          failed_samples += 1;
          0.0
        }
        Err(err) => {
          trace!("f({x}, {y}) failed: {err}");
          failed_samples += 1;
          0.0
        }
      };
      positions.push([x as f32, z, y as f32]);
    }
  }

  let indices = grid_indices(cells);
  let mut mesh = MeshBuffer::new(positions, indices);
  mesh.failed_samples = failed_samples;

  debug!(
    "Tessellated {} vertices, {} triangles at resolution {} ({} failed samples)",
    mesh.vertex_count(),
    mesh.triangle_count(),
    cells,
    failed_samples
  );

  mesh
}

/// Triangle indices for a `cells` x `cells` lattice, two per cell.
pub fn grid_indices(cells: u32) -> Vec<u32> {
  let row = cells + 1;
  let mut indices = Vec::with_capacity(6 * cells as usize * cells as usize);

  for i in 0..cells {
    for j in 0..cells {
      let a = i * row + j;
      let b = a + 1;
      let c = a + row;
      let d = c + 1;

      indices.extend_from_slice(&[a, b, c]);
      indices.extend_from_slice(&[b, d, c]);
    }
  }

  indices
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_grid_indices_two_by_two() {
    assert_eq!(
      grid_indices(2),
      vec![
        0, 1, 3, 1, 4, 3, //
        1, 2, 4, 2, 5, 4, //
        3, 4, 6, 4, 7, 6, //
        4, 5, 7, 5, 8, 7,
      ]
    );
  }

  #[test]
  fn test_grid_indices_empty_for_zero_cells() {
    assert!(grid_indices(0).is_empty());
  }
}
