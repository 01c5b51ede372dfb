//! Subcommand handlers for convert, play, palettes, analyze and config actions.

use std::io::Write;
use std::path::Path;

use super::args::{AnalyzeArgs, ConfigAction, ConvertArgs, PlayArgs, RenderArgs};
use crate::analyzer::FontRasterizer;
use crate::config::{default_path as get_config_path, Config, DEFAULT_CONFIG_TOML};
use crate::curve::Curve;
use crate::palette::Palette;
use crate::pipeline::{Conversion, Converter};
use crate::playback::{ctrlc_received, setup_ctrlc_handler, Playback};
use crate::render::{RenderRequest, ResampleFilter};

/// Id under which `--symbols` palettes are registered.
const CUSTOM_PALETTE_ID: &str = "custom";

/// Clear the terminal and move the cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Build a converter, attaching a font rasterizer when a font is configured.
fn build_converter(font: Option<&Path>) -> Result<Converter, String> {
    let converter = Converter::new();
    match font {
        Some(path) => {
            let rasterizer = FontRasterizer::open(path).map_err(|e| e.to_string())?;
            Ok(converter.with_rasterizer(Box::new(rasterizer)))
        }
        None => Ok(converter),
    }
}

/// Merge CLI render options over the config file.
fn build_request(
    render: &RenderArgs,
    config: &Config,
    converter: &Converter,
) -> Result<RenderRequest, String> {
    let palette = if render.symbols.is_empty() {
        let id = render.palette.as_deref().unwrap_or(&config.render.palette);
        converter.palette(Some(id)).map_err(|e| e.to_string())?
    } else {
        log::debug!("Building custom palette from {} symbols", render.symbols.len());
        converter
            .create_custom_palette(
                CUSTOM_PALETTE_ID,
                "Custom",
                &render.symbols,
                Some("Built from --symbols"),
            )
            .map_err(|e| e.to_string())?
    };

    let curve_height = render.curve_height.unwrap_or(config.curve.height);
    let points = if render.curve.is_empty() {
        config.curve.points()
    } else {
        render.curve.clone()
    };
    let curve = Curve::from_points(points, curve_height).map_err(|e| e.to_string())?;

    let resample = render
        .resample
        .map(ResampleFilter::from)
        .unwrap_or(config.render.resample);

    let mut request = RenderRequest::new(render.width.unwrap_or(config.render.width), palette)
        .inverted(render.invert || config.render.invert)
        .curve(curve)
        .resample(resample)
        .cell_aspect(config.render.cell_aspect);
    if let Some(height) = render.height {
        request = request.cell_height(height);
    }

    log::debug!(
        "Rendering {} cells wide with palette '{}', resample {}",
        request.cell_width,
        request.palette.id(),
        request.resample.name()
    );
    Ok(request)
}

/// Frames of an animation separated by a blank line.
fn format_conversion(conversion: &Conversion) -> String {
    conversion.frames().join("\n")
}

/// Convert a file and print (or write) the result.
pub async fn run_convert(args: ConvertArgs, config: &Config) -> Result<(), String> {
    let converter = build_converter(config.analyzer.font.as_deref())?;
    let request = build_request(&args.render, config, &converter)?;

    let conversion = converter
        .convert_file(&args.file, &request)
        .await
        .map_err(|e| e.to_string())?;
    let text = format_conversion(&conversion);

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, text)
                .await
                .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
            println!(
                "Wrote {} frame(s) to {}",
                conversion.frames().len(),
                path.display()
            );
        }
        None => print!("{}", text),
    }

    Ok(())
}

/// Convert a file and play its frames in the terminal until Ctrl+C or the
/// requested number of loops.
pub async fn run_play(args: PlayArgs, config: &Config) -> Result<(), String> {
    let converter = build_converter(config.analyzer.font.as_deref())?;
    let request = build_request(&args.render, config, &converter)?;

    let frames = converter
        .convert_file(&args.file, &request)
        .await
        .map_err(|e| e.to_string())?
        .into_frames();

    if let Err(e) = setup_ctrlc_handler() {
        log::warn!("Could not install Ctrl+C handler: {}", e);
    }

    let mut playback = Playback::new(frames.len(), args.fps.unwrap_or(config.playback.fps));
    playback.start();
    log::info!(
        "Playing {} frame(s) at {} fps",
        playback.frame_count(),
        playback.fps()
    );

    let mut stdout = std::io::stdout();
    let mut loops = 0;

    loop {
        let Some(frame) = frames.get(playback.current()) else {
            break;
        };
        write!(stdout, "{}{}", CLEAR_SCREEN, frame).map_err(|e| e.to_string())?;
        stdout.flush().map_err(|e| e.to_string())?;

        if !playback.is_playing() {
            break;
        }

        tokio::time::sleep(playback.interval()).await;
        if ctrlc_received() {
            playback.stop();
            break;
        }

        if playback.tick() == Some(0) {
            loops += 1;
            if args.loops.is_some_and(|max| loops >= max) {
                playback.stop();
                break;
            }
        }
    }

    Ok(())
}

/// Print the palette registry.
pub fn list_palettes(json: bool) -> Result<(), String> {
    let converter = Converter::new();
    let palettes = converter.registry().list();

    if json {
        let palettes: Vec<&Palette> = palettes.iter().map(|p| p.as_ref()).collect();
        let text = serde_json::to_string_pretty(&palettes).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    println!("Available palettes:");
    for palette in &palettes {
        println!("  {}", palette);
        if let Some(description) = palette.description() {
            println!("      {}", description);
        }
    }
    println!();
    println!("Use --palette <id> to select a palette.");
    Ok(())
}

/// Measure symbols and print them darkest first.
pub fn run_analyze(args: AnalyzeArgs, config: &Config) -> Result<(), String> {
    let font = args.font.as_deref().or(config.analyzer.font.as_deref());
    if font.is_none() {
        log::warn!("No font configured, using evenly spaced brightness");
    }
    let converter = build_converter(font)?;
    let size = args.size.unwrap_or(config.analyzer.size);

    let measured = converter.analyze_brightness(&args.symbols, size);

    if args.json {
        let text = serde_json::to_string_pretty(&measured).map_err(|e| e.to_string())?;
        println!("{}", text);
    } else {
        for entry in &measured {
            println!("{}\t{:.4}", entry.symbol, entry.brightness);
        }
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) -> Result<(), String> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(config_path.as_path())).map_err(|e| e.to_string())?;

            println!("Current configuration:");
            println!("  Width: {}", config.render.width);
            println!("  Invert: {}", if config.render.invert { "yes" } else { "no" });
            println!("  Palette: {}", config.render.palette);
            println!("  Resample: {}", config.render.resample.name());
            println!("  Cell aspect: {}", config.render.cell_aspect);
            println!(
                "  Curve: {} point(s), height {}",
                config.curve.points.len(),
                config.curve.height
            );
            match &config.analyzer.font {
                Some(font) => println!("  Font: {}", font.display()),
                None => println!("  Font: none (linear brightness)"),
            }
            println!("  Analyzer size: {}", config.analyzer.size);
            println!("  FPS: {}", config.playback.fps);
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            if config_path.exists() {
                return Err(format!(
                    "Config file already exists: {}\nUse 'emoji-mosaic config show' to view current settings.",
                    config_path.display()
                ));
            }

            // Create parent directories if needed
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Error creating config directory: {}", e))?;
            }

            std::fs::write(&config_path, DEFAULT_CONFIG_TOML)
                .map_err(|e| format!("Error writing config file: {}", e))?;

            println!("Created config file: {}", config_path.display());
        }
    }

    Ok(())
}
