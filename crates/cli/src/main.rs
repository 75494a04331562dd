use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use toric_cy::api::{CyConfig, IntNumsCfg};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod model;
mod provenance;
mod report;

use model::{Example, Source};
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Intersection numbers, cones and Hodge data of toric Calabi-Yaus")]
struct Cmd {
    /// Ambient variety as JSON (see `model` for the format)
    #[arg(long, global = true, conflicts_with = "example")]
    input: Option<PathBuf>,

    /// Built-in ambient variety
    #[arg(long, global = true, value_enum)]
    example: Option<Example>,

    /// Allow complete intersections, non-favorable or non-3-fold hypersurfaces
    #[arg(long, global = true)]
    experimental: bool,

    /// Log cache misses and derived views
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Description, Hodge numbers, smoothness and divisor basis
    Describe {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Intersection numbers as JSON
    Intnums {
        #[arg(long)]
        in_basis: bool,
        /// Read index 0 as the anticanonical class
        #[arg(long)]
        anticanonical: bool,
        #[arg(long)]
        out: PathBuf,
    },
    /// Mori, Kähler and effective cone rays in the current bases
    Cones {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Volume, divisor volumes, AA and inverse Kähler metric at a point
    Kahler {
        /// Comma-separated Kähler parameters in the divisor basis
        #[arg(long)]
        t: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();

    let source = match (cmd.input, cmd.example) {
        (Some(path), _) => Source::File(path),
        (None, Some(e)) => Source::Example(e),
        (None, None) => bail!("pass --input FILE or --example NAME"),
    };
    let cfg = CyConfig {
        experimental: cmd.experimental,
    };
    let cy = model::load(&source, cfg)?;
    tracing::info!(source = %source.label(), model = %cy, "loaded");

    match cmd.action {
        Action::Describe { out } => {
            let d = report::describe(&cy)?;
            emit(&d, out.as_deref(), Payload::new(source.label(), "describe", json!({})))
        }
        Action::Intnums {
            in_basis,
            anticanonical,
            out,
        } => {
            let view = IntNumsCfg {
                in_basis,
                zero_as_anticanonical: anticanonical,
                ..IntNumsCfg::default()
            };
            let k = report::intnums(&cy, &view)?;
            let params = json!({"in_basis": in_basis, "anticanonical": anticanonical});
            emit(&k, Some(&out), Payload::new(source.label(), "intnums", params))
        }
        Action::Cones { out } => {
            let c = report::cones(&cy)?;
            emit(&c, out.as_deref(), Payload::new(source.label(), "cones", json!({})))
        }
        Action::Kahler { t, out } => {
            let t = report::parse_point(&t)?;
            let k = report::kahler(&cy, &t)?;
            let params = json!({ "t": t });
            emit(&k, out.as_deref(), Payload::new(source.label(), "kahler", params))
        }
    }
}

/// Print `value`, or write it to `out` with a provenance sidecar.
fn emit<T: Serialize>(value: &T, out: Option<&Path>, payload: Payload) -> Result<()> {
    let Some(out) = out else {
        println!("{}", serde_json::to_string_pretty(value)?);
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(out, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", out.display()))?;
    let prov = write_sidecar(out, payload)?;
    tracing::info!(out = %out.display(), provenance = %prov.display(), "wrote");
    Ok(())
}
