//! Plot parameters as the control panel sees them, and the validated
//! domain the tessellator samples.

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::PlotError;

/// Largest resolution whose `(resolution + 1)^2` vertices can still be
/// addressed by a `u32` index buffer.
pub const MAX_RESOLUTION: u32 = 65_534;

// Slider ranges of the interactive control panel.
pub const X_MIN_RANGE: (f64, f64) = (-20.0, 0.0);
pub const X_MAX_RANGE: (f64, f64) = (0.0, 20.0);
pub const Y_MIN_RANGE: (f64, f64) = (-20.0, 0.0);
pub const Y_MAX_RANGE: (f64, f64) = (0.0, 20.0);
pub const RESOLUTION_RANGE: (u32, u32) = (10, 100);
pub const HEIGHT_RANGE: (f64, f64) = (0.1, 5.0);

/// The full parameter state, including the rendering-only toggles.
///
/// Field names serialize in camelCase (`xMin`, `yMax`, ...) and every
/// field is optional in a parameter file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlotParams {
  pub x_min: f64,
  pub x_max: f64,
  pub y_min: f64,
  pub y_max: f64,
  pub resolution: u32,
  pub height: f64,
  pub wireframe: bool,
  pub rotation: bool,
}

impl Default for PlotParams {
  fn default() -> Self {
    PlotParams {
      x_min: -5.0,
      x_max: 5.0,
      y_min: -5.0,
      y_max: 5.0,
      resolution: 50,
      height: 2.0,
      wireframe: true,
      rotation: true,
    }
  }
}

/// A single change coming from the control panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
  XMin(f64),
  XMax(f64),
  YMin(f64),
  YMax(f64),
  Resolution(u32),
  Height(f64),
  Wireframe(bool),
  Rotation(bool),
}

impl Control {
  /// Whether this control changes mesh geometry. The toggles only
  /// affect how an existing mesh is drawn.
  pub fn rebuilds_mesh(&self) -> bool {
    !matches!(self, Control::Wireframe(_) | Control::Rotation(_))
  }
}

fn clamp_slider(
  name: &str,
  value: f64,
  (lo, hi): (f64, f64),
  current: f64,
) -> f64 {
  if value.is_nan() {
    warn!("Ignoring NaN for {name}");
    return current;
  }
  value.clamp(lo, hi)
}

impl PlotParams {
  /// Apply a control change, clamping it to the slider range.
  ///
  /// Returns true if the mesh has to be rebuilt.
  pub fn apply(&mut self, control: Control) -> bool {
    match control {
      Control::XMin(v) => {
        self.x_min = clamp_slider("xMin", v, X_MIN_RANGE, self.x_min)
      }
      Control::XMax(v) => {
        self.x_max = clamp_slider("xMax", v, X_MAX_RANGE, self.x_max)
      }
      Control::YMin(v) => {
        self.y_min = clamp_slider("yMin", v, Y_MIN_RANGE, self.y_min)
      }
      Control::YMax(v) => {
        self.y_max = clamp_slider("yMax", v, Y_MAX_RANGE, self.y_max)
      }
      Control::Resolution(n) => {
        self.resolution = n.clamp(RESOLUTION_RANGE.0, RESOLUTION_RANGE.1)
      }
      Control::Height(v) => {
        self.height = clamp_slider("height", v, HEIGHT_RANGE, self.height)
      }
      Control::Wireframe(on) => self.wireframe = on,
      Control::Rotation(on) => self.rotation = on,
    }
    control.rebuilds_mesh()
  }

  /// Validate the parameters and produce the domain to sample.
  ///
  /// Unlike the sliders this accepts any finite bounds and any
  /// resolution in `1..=MAX_RESOLUTION`.
  pub fn domain(&self) -> Result<PlotDomain, PlotError> {
    if self.resolution == 0 {
      return Err(PlotError::InvalidDomain(
        "resolution must be at least 1".into(),
      ));
    }
    PlotDomain::new(
      (self.x_min, self.x_max),
      (self.y_min, self.y_max),
      self.resolution,
      self.height,
    )
  }

  pub fn from_json_str(text: &str) -> Result<Self, PlotError> {
    Ok(serde_json::from_str(text)?)
  }

  pub fn load(path: &Path) -> Result<Self, PlotError> {
    let text = std::fs::read_to_string(path)?;
    Self::from_json_str(&text)
  }
}

/// The sampling window: bounds, cells per axis and height multiplier.
///
/// Read-only once built. The grid has `resolution + 1` lattice points per
/// axis; lattice point `(i, j)` has linear index `i * (resolution + 1) + j`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotDomain {
  x_min: f64,
  x_max: f64,
  y_min: f64,
  y_max: f64,
  resolution: u32,
  height_scale: f64,
}

impl PlotDomain {
  /// Build a domain from `(min, max)` ranges.
  ///
  /// A resolution of 0 is allowed here and samples a single point.
  /// Equal or reversed bounds are accepted; the surface collapses or
  /// mirrors along that axis.
  pub fn new(
    x_range: (f64, f64),
    y_range: (f64, f64),
    resolution: u32,
    height_scale: f64,
  ) -> Result<Self, PlotError> {
    let (x_min, x_max) = x_range;
    let (y_min, y_max) = y_range;

    for (name, value) in [
      ("xMin", x_min),
      ("xMax", x_max),
      ("yMin", y_min),
      ("yMax", y_max),
      ("height", height_scale),
    ] {
      if !value.is_finite() {
        return Err(PlotError::InvalidDomain(format!(
          "{name} must be a finite number, got {value}"
        )));
      }
    }
    if resolution > MAX_RESOLUTION {
      return Err(PlotError::InvalidDomain(format!(
        "resolution {resolution} exceeds the maximum of {MAX_RESOLUTION}"
      )));
    }

    if x_min == x_max || y_min == y_max {
      warn!(
        "Degenerate plot domain [{x_min}, {x_max}] x [{y_min}, {y_max}]; \
         the surface has zero area"
      );
    } else if x_min > x_max || y_min > y_max {
      warn!(
        "Reversed plot domain [{x_min}, {x_max}] x [{y_min}, {y_max}]; \
         triangle winding is mirrored"
      );
    }

    Ok(PlotDomain {
      x_min,
      x_max,
      y_min,
      y_max,
      resolution,
      height_scale,
    })
  }

  pub fn x_range(&self) -> (f64, f64) {
    (self.x_min, self.x_max)
  }

  pub fn y_range(&self) -> (f64, f64) {
    (self.y_min, self.y_max)
  }

  pub fn resolution(&self) -> u32 {
    self.resolution
  }

  pub fn height_scale(&self) -> f64 {
    self.height_scale
  }

  /// Grid spacing along x and y. Both are 0 when the resolution is 0.
  pub fn steps(&self) -> (f64, f64) {
    if self.resolution == 0 {
      return (0.0, 0.0);
    }
    let cells = self.resolution as f64;
    (
      (self.x_max - self.x_min) / cells,
      (self.y_max - self.y_min) / cells,
    )
  }

  /// The `(x, y)` input of lattice point `(i, j)`.
  pub fn sample_point(&self, i: u32, j: u32) -> (f64, f64) {
    let (x_step, y_step) = self.steps();
    (
      self.x_min + i as f64 * x_step,
      self.y_min + j as f64 * y_step,
    )
  }

  pub fn vertex_count(&self) -> usize {
    let side = self.resolution as usize + 1;
    side * side
  }

  pub fn triangle_count(&self) -> usize {
    let cells = self.resolution as usize;
    2 * cells * cells
  }
}
