use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spacelabel::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;
mod provenance;

#[derive(Parser)]
#[command(name = "spacelabel")]
#[command(about = "Export labelled radio-spectrogram features as TFCat")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build a TFCat catalogue from annotated vertex lists
    Export {
        /// Vertex lists (.json or .csv)
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Crop window `t0,f0,t1,f1`; times as Unix seconds or ISOT
        #[arg(long, value_parser = parse_bbox)]
        bbox: Option<TimeFrequencyBox>,
        /// CRS document; defaults to the built-in TFCat CRS
        #[arg(long)]
        crs: Option<PathBuf>,
    },
    /// Print one summary line per feature of a TFCat catalogue
    Summary {
        #[arg(long)]
        input: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Export {
            input,
            out,
            bbox,
            crs,
        } => export(&input, &out, bbox, crs.as_deref()),
        Action::Summary { input } => summary(&input),
        Action::Report => report(),
    }
}

fn parse_time_arg(s: &str) -> Result<CalendarTime, String> {
    let parsed = match s.trim().parse::<f64>() {
        Ok(secs) => CalendarTime::from_unix_seconds(secs),
        Err(_) => CalendarTime::parse_isot(s),
    };
    parsed.map_err(|e| e.to_string())
}

fn parse_bbox(s: &str) -> Result<TimeFrequencyBox, String> {
    let parts: Vec<&str> = s.split(',').collect();
    let &[t0, f0, t1, f1] = parts.as_slice() else {
        return Err(format!("expected t0,f0,t1,f1, got {s:?}"));
    };
    let freq = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad frequency {v:?}: {e}"))
    };
    TimeFrequencyBox::new(
        parse_time_arg(t0)?,
        freq(f0)?,
        parse_time_arg(t1)?,
        freq(f1)?,
    )
        .map_err(|e| e.to_string())
}

fn export(
    input: &Path,
    out: &Path,
    bbox: Option<TimeFrequencyBox>,
    crs_path: Option<&Path>,
) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), bbox = ?bbox, "export");
    let crs = match crs_path {
        Some(p) => Crs::from_path(p).with_context(|| format!("loading CRS {}", p.display()))?,
        None => Crs::tfcat_default()?,
    };
    let mut catalogue = Catalogue::new(crs);
    for a in input::load_annotations(input)? {
        catalogue
            .add_feature(a.name.clone(), &a.vertexes)
            .with_context(|| format!("annotation {:?}", a.name))?;
    }
    let text = catalogue.to_json_string(bbox.as_ref())?;

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(out, text).with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(features = catalogue.len(), "catalogue_written");

    let bbox_json = bbox.map(|b| {
        serde_json::json!([
            b.time_min().unix_seconds(),
            b.freq_min(),
            b.time_max().unix_seconds(),
            b.freq_max()
        ])
    });
    let payload = provenance::Payload::new(serde_json::json!({
        "bbox": bbox_json,
        "crs": crs_path.map(|p| p.to_string_lossy().into_owned()),
        "features": catalogue.len()
    }))
    .with_input(input);
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

fn summary(input: &Path) -> Result<()> {
    tracing::info!(input = %input.display(), "summary");
    let text =
        std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let catalogue = Catalogue::from_json_str(&text)
        .with_context(|| format!("parsing {}", input.display()))?;
    print!("{}", catalogue.text_summary());
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "tool": {
            "name": "spacelabel",
            "version": spacelabel::VERSION
        },
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
