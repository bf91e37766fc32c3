//! SSL Field CLI
//!
//! Creates, inspects and renders field geometry settings files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use prost::Message;
use ssl_field_core::{Division, RoboCupField};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ssl-field")]
#[command(about = "Edit and render SSL field geometry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a settings file with default markings
    Defaults {
        /// Output settings JSON file path
        #[arg(long)]
        out: PathBuf,

        /// Division preset for the dimensions
        #[arg(long, value_enum)]
        division: Option<DivisionArg>,
    },

    /// Print the dimensions and markings of a settings file
    Show {
        /// Settings JSON file path
        #[arg(long)]
        settings: PathBuf,
    },

    /// Render the geometry protobuf
    Render {
        /// Settings JSON file path (startup defaults if omitted)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Apply a division preset after loading
        #[arg(long, value_enum)]
        division: Option<DivisionArg>,

        /// Regenerate default markings from the dimensions
        #[arg(long, default_value = "false")]
        regenerate: bool,

        /// Output file for the encoded SSL_GeometryFieldSize
        #[arg(long)]
        out: PathBuf,

        /// Output file for the encoded SSL_GeometryModels
        #[arg(long)]
        models: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DivisionArg {
    A,
    B,
    C,
}

impl From<DivisionArg> for Division {
    fn from(arg: DivisionArg) -> Self {
        match arg {
            DivisionArg::A => Division::A,
            DivisionArg::B => Division::B,
            DivisionArg::C => Division::C,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Defaults { out, division } => {
            let field = match division {
                Some(division) => RoboCupField::with_dimensions(&Division::from(division).dimensions()),
                None => RoboCupField::new(),
            };
            field
                .save_settings(&out)
                .with_context(|| format!("failed to write {}", out.display()))?;
        }

        Commands::Show { settings } => {
            let field = load_field(&settings)?;
            print_field(&field)?;
        }

        Commands::Render {
            settings,
            division,
            regenerate,
            out,
            models,
        } => {
            let field = match settings {
                Some(path) => load_field(&path)?,
                None => RoboCupField::new(),
            };
            if let Some(division) = division {
                field.apply_division(division.into());
            }
            if regenerate {
                field.update_trigger().fire();
            }
            field.check_consistency()?;

            let bytes = field.encode_geometry();
            fs::write(&out, &bytes).with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!("Wrote {} bytes of geometry to {}", bytes.len(), out.display());

            if let Some(path) = models {
                let bytes = field.geometry_models().encode_to_vec();
                fs::write(&path, &bytes)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!("Wrote {} bytes of models to {}", bytes.len(), path.display());
            }
        }
    }

    Ok(())
}

fn load_field(path: &Path) -> Result<Arc<RoboCupField>> {
    let field = RoboCupField::new();
    field
        .load_settings(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(field)
}

fn print_field(field: &RoboCupField) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&field.dimensions())?);

    let lines = field.lines();
    println!("{} lines:", lines.len());
    for line in lines.iter() {
        let [x1, y1] = line.p1();
        let [x2, y2] = line.p2();
        println!(
            "  {:<32} {:<32} ({x1}, {y1}) -> ({x2}, {y2}) t={}",
            line.name(),
            line.shape_type().get(),
            line.thickness()
        );
    }
    drop(lines);

    let arcs = field.arcs();
    println!("{} arcs:", arcs.len());
    for arc in arcs.iter() {
        let [x, y] = arc.center();
        println!(
            "  {:<32} {:<32} ({x}, {y}) r={} [{:.3}, {:.3}] t={}",
            arc.name(),
            arc.shape_type().get(),
            arc.radius(),
            arc.start_angle(),
            arc.end_angle(),
            arc.thickness()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ssl_field_proto::{SslGeometryFieldSize, SslGeometryModels, Vector2f};

    use super::*;

    fn run_args(args: &[&str]) -> Result<()> {
        run(Cli::try_parse_from(std::iter::once("ssl-field").chain(args.iter().copied()))?)
    }

    fn path_str(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    #[test]
    fn test_defaults_then_render() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("field.json");
        let geometry = dir.path().join("geometry.bin");
        let models = dir.path().join("models.bin");

        run_args(&["defaults", "--out", path_str(&settings), "--division", "b"]).unwrap();
        run_args(&["show", "--settings", path_str(&settings)]).unwrap();
        run_args(&[
            "render",
            "--settings",
            path_str(&settings),
            "--out",
            path_str(&geometry),
            "--models",
            path_str(&models),
        ])
        .unwrap();

        let size = SslGeometryFieldSize::decode(fs::read(&geometry).unwrap().as_slice()).unwrap();
        assert_eq!(size.field_length, 9000);
        assert_eq!(size.field_width, 6000);
        assert_eq!(size.field_lines.len(), 12);
        assert_eq!(size.field_lines[0].p1, Vector2f::new(-4500.0, 3000.0));
        assert_eq!(size.field_arcs.len(), 1);

        let models = SslGeometryModels::decode(fs::read(&models).unwrap().as_slice()).unwrap();
        assert!(models.straight_two_phase.is_some());
        assert!(models.chip_fixed_loss.is_some());
    }

    #[test]
    fn test_render_division_without_regenerate_keeps_markings() {
        let dir = tempfile::tempdir().unwrap();
        let geometry = dir.path().join("geometry.bin");

        run_args(&["render", "--division", "c", "--out", path_str(&geometry)]).unwrap();
        let size = SslGeometryFieldSize::decode(fs::read(&geometry).unwrap().as_slice()).unwrap();
        assert_eq!(size.field_length, 4500);
        assert_eq!(size.field_lines[0].p1, Vector2f::new(-6020.0, 4510.0));

        run_args(&["render", "--division", "c", "--regenerate", "--out", path_str(&geometry)])
            .unwrap();
        let size = SslGeometryFieldSize::decode(fs::read(&geometry).unwrap().as_slice()).unwrap();
        assert_eq!(size.field_lines[0].p1, Vector2f::new(-2250.0, 1500.0));
    }

    #[test]
    fn test_show_missing_settings_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = run_args(&["show", "--settings", path_str(&missing)]).unwrap_err();
        assert!(err.to_string().contains("failed to load"));
    }
}
