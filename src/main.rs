use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use surfplot::{compile, tessellate, Evaluable, PlotParams};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Sample a formula and write the surface mesh as JSON
  Mesh {
    /// Formula in x and y, e.g. "sin(x) * cos(y)"
    expression: String,

    #[command(flatten)]
    domain: DomainArgs,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
  },
  /// Evaluate a formula at a single point
  Eval {
    expression: String,
    #[arg(allow_negative_numbers = true)]
    x: f64,
    #[arg(allow_negative_numbers = true)]
    y: f64,
  },
  /// Check that a formula compiles and print its normalized form
  Check { expression: String },
}

#[derive(Args)]
struct DomainArgs {
  /// JSON parameter file (xMin, xMax, yMin, yMax, resolution, height)
  #[arg(long)]
  params: Option<PathBuf>,

  #[arg(long, allow_negative_numbers = true)]
  x_min: Option<f64>,
  #[arg(long, allow_negative_numbers = true)]
  x_max: Option<f64>,
  #[arg(long, allow_negative_numbers = true)]
  y_min: Option<f64>,
  #[arg(long, allow_negative_numbers = true)]
  y_max: Option<f64>,
  /// Grid cells per axis
  #[arg(short, long)]
  resolution: Option<u32>,
  /// Multiplier applied to f(x, y)
  #[arg(long, allow_negative_numbers = true)]
  height: Option<f64>,
}

impl DomainArgs {
  /// Parameter file first, then individual flags on top.
  fn to_params(&self) -> anyhow::Result<PlotParams> {
    let mut params = match &self.params {
      Some(path) => PlotParams::load(path).with_context(|| {
        format!("Failed to load parameters from {}", path.display())
      })?,
      None => PlotParams::default(),
    };
    if let Some(v) = self.x_min {
      params.x_min = v;
    }
    if let Some(v) = self.x_max {
      params.x_max = v;
    }
    if let Some(v) = self.y_min {
      params.y_min = v;
    }
    if let Some(v) = self.y_max {
      params.y_max = v;
    }
    if let Some(n) = self.resolution {
      params.resolution = n;
    }
    if let Some(v) = self.height {
      params.height = v;
    }
    Ok(params)
  }
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let default_filter = match cli.verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or(default_filter),
  )
  .init();

  match cli.command {
    Commands::Mesh {
      expression,
      domain,
      output,
      pretty,
    } => {
      let params = domain.to_params()?;
      let domain = params.domain()?;
      let expr = compile(&expression)
        .with_context(|| format!("Cannot compile `{expression}`"))?;
      let mesh = tessellate(&domain, &expr);

      let writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(File::create(path).with_context(|| {
          format!("Failed to create {}", path.display())
        })?),
        None => Box::new(io::stdout().lock()),
      };
      let mut writer = BufWriter::new(writer);
      if pretty {
        serde_json::to_writer_pretty(&mut writer, &mesh)?;
      } else {
        serde_json::to_writer(&mut writer, &mesh)?;
      }
      writeln!(writer)?;
      writer.flush()?;

      info!(
        "Wrote {} vertices and {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
      );
    }
    Commands::Eval { expression, x, y } => {
      let expr = compile(&expression)
        .with_context(|| format!("Cannot compile `{expression}`"))?;
      let value = expr
        .eval(x, y)
        .with_context(|| format!("Cannot evaluate at ({x}, {y})"))?;
      println!("{value}");
    }
    Commands::Check { expression } => {
      let expr = compile(&expression)
        .with_context(|| format!("Cannot compile `{expression}`"))?;
      if !expr.expr().depends_on_variables() {
        warn!("`{expression}` does not depend on x or y");
      }
      println!("{}", expr.expr());
    }
  }

  Ok(())
}
