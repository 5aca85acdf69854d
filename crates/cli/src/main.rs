use std::fmt::Display;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::fmt::SubscriberBuilder;
use updown::prelude::*;

mod provenance;

const EXAMPLE: &str = "Example usage:
    updown <isosig> -h2 -w15 -e5 -r";

#[derive(Parser, Debug)]
#[command(name = "updown", version)]
#[command(about = "Simplify a 4-manifold triangulation with Up-side-Down local search")]
#[command(disable_help_flag = true, after_help = EXAMPLE)]
struct Cmd {
    /// Isomorphism signature of the input triangulation
    sig: String,

    /// Maximum number of 2-4 moves per epoch (height)
    #[arg(short = 'h', long, default_value_t = 10)]
    height: usize,

    /// Maximum number of 3-3 and 4-4 moves per lateral search (width)
    #[arg(short = 'w', long, default_value_t = 30)]
    width: usize,

    /// Number of epochs
    #[arg(short = 'e', long, default_value_t = 10)]
    epochs: usize,

    /// Use random choices
    #[arg(short = 'r', long)]
    random: bool,

    /// Seed for random choices (default: taken from the clock)
    #[arg(long, requires = "random")]
    seed: Option<u64>,

    /// Print reports as JSON lines instead of text
    #[arg(long)]
    json: bool,

    /// Also write the run summary as JSON to this path, with a provenance sidecar
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cmd {
    fn search_cfg(&self, clock_seed: impl FnOnce() -> u64) -> SearchCfg {
        let selection = if self.random {
            Selection::Random {
                seed: self.seed.unwrap_or_else(clock_seed),
            }
        } else {
            Selection::Deterministic
        };
        SearchCfg {
            height: self.height,
            width: self.width,
            epochs: self.epochs,
            selection,
            ..SearchCfg::default()
        }
    }
}

fn main() -> ExitCode {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(io::stderr)
        .init();
    let cmd = match Cmd::try_parse() {
        Ok(cmd) => cmd,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };
    if let Err(e) = Triangulation4::from_signature(&cmd.sig) {
        eprintln!("error: invalid isomorphism signature: {e}\n");
        eprintln!("{}", Cmd::command().render_usage());
        eprintln!("\n{EXAMPLE}");
        return ExitCode::from(1);
    }
    let cfg = cmd.search_cfg(clock_seed);
    let stdout = io::stdout();
    match run(&cmd, &cfg, &mut stdout.lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn run<W: Write>(cmd: &Cmd, cfg: &SearchCfg, out: &mut W) -> Result<RunSummary> {
    if let Selection::Random { seed } = cfg.selection {
        tracing::info!(seed, "random selection");
    }
    tracing::info!(
        height = cfg.height,
        width = cfg.width,
        epochs = cfg.epochs,
        "run"
    );

    let mut write_error = None;
    let summary = simplify::<Triangulation4, _>(&cmd.sig, cfg, |report| {
        if write_error.is_none() {
            write_error = emit(out, report, cmd.json).err();
        }
    })
    .context("search failed")?;
    if let Some(e) = write_error {
        return Err(e);
    }
    emit(out, &summary.final_report, cmd.json)?;
    out.flush()?;

    if let Some(path) = &cmd.out {
        write_summary(path, &cmd.sig, cfg, &summary)?;
    }
    Ok(summary)
}

/// One report, as text lines or one JSON line.
fn emit<W: Write, R: Serialize + Display>(out: &mut W, report: &R, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, report)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{report}")?;
    }
    Ok(())
}

fn write_summary(path: &Path, sig: &str, cfg: &SearchCfg, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    std::fs::write(path, serde_json::to_vec_pretty(summary)?)
        .with_context(|| format!("writing {}", path.display()))?;

    let fin = &summary.final_report;
    let payload = provenance::Payload::new(json!({ "input": sig, "cfg": cfg })).with_metrics(
        json!({
            "original_edges": fin.original_edges,
            "edges": fin.edges,
            "size": fin.size,
            "improving_epochs": summary.improvements.len(),
        }),
    );
    let sidecar = provenance::write_sidecar(path, payload)?;
    tracing::info!(out = %path.display(), sidecar = %sidecar.display(), "wrote summary");
    Ok(())
}
