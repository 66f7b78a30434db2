//! A live surface: the current parameters, formula text and mesh, rebuilt
//! whenever something that affects geometry changes.

use log::{info, warn};

use crate::evaluator::FlatSurface;
use crate::functions::plot3d::tessellate;
use crate::mesh::MeshBuffer;
use crate::params::{Control, PlotDomain, PlotParams};
use crate::{compile, CompileError, PlotError};

#[derive(Debug, Clone)]
pub struct SurfacePlot {
  params: PlotParams,
  domain: PlotDomain,
  text: String,
  mesh: MeshBuffer,
  last_error: Option<CompileError>,
  generation: u64,
  // false until some text has compiled
  has_valid_mesh: bool,
}

impl SurfacePlot {
  /// Start a session. Invalid formula text does not fail construction;
  /// the surface starts flat and the error is kept in
  /// [`SurfacePlot::last_error`].
  pub fn new(
    params: PlotParams,
    text: impl Into<String>,
  ) -> Result<Self, PlotError> {
    let domain = params.domain()?;
    let mut plot = SurfacePlot {
      params,
      domain,
      text: text.into(),
      mesh: MeshBuffer::default(),
      last_error: None,
      generation: 0,
      has_valid_mesh: false,
    };

    // A compile error here leaves the flat surface in place
    let _ = plot.rebuild();
    Ok(plot)
  }

  pub fn mesh(&self) -> &MeshBuffer {
    &self.mesh
  }

  pub fn params(&self) -> &PlotParams {
    &self.params
  }

  /// The domain of the current parameters.
  ///
  /// After a failed rebuild that kept the last valid mesh, this can be
  /// ahead of [`SurfacePlot::mesh`]. A session that never compiled is
  /// always shown flat over this domain.
  pub fn domain(&self) -> &PlotDomain {
    &self.domain
  }

  pub fn expression_text(&self) -> &str {
    &self.text
  }

  /// The compile error from the most recent rebuild, if it failed.
  pub fn last_error(&self) -> Option<&CompileError> {
    self.last_error.as_ref()
  }

  /// Number of meshes produced so far.
  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// Replace the formula text and rebuild.
  ///
  /// On a compile error the previous mesh stays in place.
  pub fn set_expression(
    &mut self,
    text: impl Into<String>,
  ) -> Result<(), CompileError> {
    self.text = text.into();
    self.rebuild()
  }

  /// Apply one control-panel change. Returns whether the mesh was rebuilt.
  pub fn apply(&mut self, control: Control) -> Result<bool, PlotError> {
    let mut next = self.params;
    if !next.apply(control) {
      self.params = next;
      return Ok(false);
    }
    self.domain = next.domain()?;
    self.params = next;
    self.rebuild()?;
    Ok(true)
  }

  /// Replace all parameters at once and rebuild.
  pub fn set_params(&mut self, params: PlotParams) -> Result<(), PlotError> {
    self.domain = params.domain()?;
    self.params = params;
    self.rebuild()?;
    Ok(())
  }

  /// Compile the current text and resample. The text is compiled on every
  /// call; nothing is cached between rebuilds. Until a text has compiled
  /// once, failures resample the flat surface instead.
  fn rebuild(&mut self) -> Result<(), CompileError> {
    match compile(&self.text) {
      Ok(expr) => {
        self.mesh = tessellate(&self.domain, &expr);
        self.last_error = None;
        self.has_valid_mesh = true;
        self.generation += 1;
        info!(
          "Rebuilt surface #{} for `{}` ({} vertices)",
          self.generation,
          expr.expr(),
          self.mesh.vertex_count()
        );
        Ok(())
      }
      Err(err) if self.has_valid_mesh => {
        warn!("Keeping previous surface, `{}` rejected: {err}", self.text);
        self.last_error = Some(err.clone());
        Err(err)
      }
      Err(err) => {
        warn!("Showing a flat surface, `{}` rejected: {err}", self.text);
        self.mesh = tessellate(&self.domain, &FlatSurface);
        self.last_error = Some(err.clone());
        self.generation += 1;
        Err(err)
      }
    }
  }
}
