//! `compendium` - CLI for the field-notes canvas and exporter
//!
//! This binary replays sketch scripts onto the annotation canvas, bundles
//! record dumps into export archives and manages stored preferences.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;

use compendium::canvas::script::SketchScript;
use compendium::cli::{Cli, Command, ConfigCommand, ExportCommand, PrefsCommand, SketchCommand};
use compendium::prefs::{PreferenceStore, SqlitePreferences};
use compendium::{init_logging, Artifact, CanvasSession, Config, ExportOutcome, Exporter, JsonFileSource};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Export(cmd) => handle_export(&config, &cmd).await,
        Command::Sketch(cmd) => handle_sketch(&config, &cmd).await,
        Command::Prefs(cmd) => handle_prefs(&config, cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_export(config: &Config, cmd: &ExportCommand) -> Result<()> {
    let out_dir = cmd.out.clone().unwrap_or_else(|| config.output_dir());
    let source = JsonFileSource::new(&cmd.input);
    let exporter = Exporter::new(&config.export);

    let report = match exporter.export(&source, &out_dir).await? {
        ExportOutcome::Completed(report) => report,
        ExportOutcome::Busy => bail!("export already in progress"),
    };

    if cmd.json {
        let summary = serde_json::json!({
            "path": report.path,
            "records": report.records,
            "images": report.images,
            "skipped_images": report.skipped_images,
            "bytes": report.bytes,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Wrote {}", report.path.display());
        println!("  Records:        {}", report.records);
        println!("  Images:         {}", report.images);
        if report.skipped_images > 0 {
            println!("  Skipped images: {}", report.skipped_images);
        }
        println!("  Size:           {} bytes", report.bytes);
    }
    Ok(())
}

async fn handle_sketch(config: &Config, cmd: &SketchCommand) -> Result<()> {
    let script = SketchScript::load(&cmd.script)
        .await
        .with_context(|| format!("reading sketch script {}", cmd.script.display()))?;

    let seed = match &cmd.seed {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading seed artifact {}", path.display()))?;
            Some(Artifact::from(text.trim()))
        }
        None => None,
    };

    let mut session = CanvasSession::initialize(&config.canvas, cmd.width, seed.as_ref()).await;
    let base_dir = cmd.script.parent().unwrap_or_else(|| Path::new("."));
    let summary = script.replay(&mut session, base_dir).await?;

    let artifact = session.snapshot();
    if artifact.is_empty() {
        bail!("canvas could not be encoded");
    }

    tokio::fs::write(&cmd.out, artifact.as_str())
        .await
        .with_context(|| format!("writing {}", cmd.out.display()))?;

    if let Some(png) = &cmd.png {
        let bytes = artifact
            .payload()
            .context("snapshot produced an undecodable artifact")?;
        tokio::fs::write(png, bytes)
            .await
            .with_context(|| format!("writing {}", png.display()))?;
    }

    let (width, height) = session.dimensions();
    println!(
        "Rendered {width}x{height} sketch ({} strokes, {} photos) to {}",
        summary.strokes,
        summary.photos,
        cmd.out.display()
    );
    Ok(())
}

fn handle_prefs(config: &Config, cmd: PrefsCommand) -> Result<()> {
    if !config.preferences.enabled {
        bail!("preferences are disabled in configuration");
    }

    let path = config.preferences_path();
    let store = SqlitePreferences::open(&path)
        .with_context(|| format!("opening preferences at {}", path.display()))?;

    match cmd {
        PrefsCommand::Get { key } => match store.get(&key)? {
            Some(value) => println!("{value}"),
            None => bail!("no preference named '{key}'"),
        },
        PrefsCommand::Set { key, value } => {
            store.set(&key, &value)?;
            println!("Saved {key}.");
        }
        PrefsCommand::Remove { key } => {
            if store.remove(&key)? {
                println!("Removed {key}.");
            } else {
                println!("{key} was not set.");
            }
        }
        PrefsCommand::List => {
            for (key, value) in store.entries()? {
                println!("{key} = {value}");
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let canvas = &config.canvas;
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Canvas]");
                println!("  Default width:      {}", canvas.default_width);
                println!("  Height:             {}", canvas.height);
                println!("  Brush color:        {}", canvas.brush_color);
                println!(
                    "  Brush size:         {} ({}..={})",
                    canvas.brush_size, canvas.min_brush_size, canvas.max_brush_size
                );
                println!("  Decode timeout:     {} ms", canvas.decode_timeout_ms);
                println!("  Palette:            {}", canvas.palette.join(" "));
                println!();
                println!("[Export]");
                println!("  Output directory:   {}", config.output_dir().display());
                println!("  Archive prefix:     {}", config.export.archive_prefix);
                println!();
                println!("[Preferences]");
                println!("  Enabled:            {}", config.preferences.enabled);
                println!("  Database path:      {}", config.preferences_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}
