use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

use tapeworn::engine::Engine;
use tapeworn::params::{ParamId, ParamValues, Parameters};
use tapeworn::preset::{Manager, Preset};
use tapeworn::render::{default_output_path, render_file};
use tapeworn::settings::Settings;
use tapeworn::Mode;

#[cfg(debug_assertions)]
#[global_allocator]
static ALLOCATOR: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

#[derive(Parser, Debug)]
#[command(name = "tapeworn")]
#[command(version)]
#[command(about = "Lo-fi tape, vinyl, VHS and radio degradation for WAV files.")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Degrade a WAV file.
    Render {
        input: PathBuf,
        /// Defaults to `<input>_lofi_<timestamp>.wav`.
        output: Option<PathBuf>,
        #[arg(long, help = "Start from a named preset")]
        preset: Option<String>,
        #[arg(long, value_enum, help = "Character mode")]
        mode: Option<Mode>,
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, f32)>,
        #[arg(long, help = "Frames per processing block")]
        block_size: Option<usize>,
        #[arg(long, env = "TAPEWORN_SEED", help = "Seed for reproducible output")]
        seed: Option<u64>,
    },
    /// Manage presets.
    Presets {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// List parameter names, ranges and defaults.
    Params,
}

#[derive(Subcommand, Debug)]
enum PresetAction {
    List,
    Show {
        name: String,
    },
    Save {
        name: String,
        #[arg(long, help = "Preset to start from")]
        from: Option<String>,
        #[arg(long, value_enum)]
        mode: Option<Mode>,
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, f32)>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        name: String,
    },
}

fn parse_assignment(s: &str) -> Result<(String, f32), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

/// Resolve a starting preset, then a mode override, then individual values.
fn build_params(
    presets: &Manager,
    preset: Option<&str>,
    mode: Option<Mode>,
    assignments: &[(String, f32)],
) -> Result<ParamValues> {
    let base = match preset {
        Some(name) => {
            presets
                .get_preset_by_name(name)
                .ok_or_else(|| anyhow!("Unknown preset: {name}"))?
                .params
        }
        None => ParamValues::default(),
    };

    let params = Parameters::from_values(&base);
    if let Some(mode) = mode {
        params.set_mode(mode);
    }
    for (name, value) in assignments {
        params
            .set_by_name(name, *value)
            .map_err(|e| anyhow!("{name}={value}: {e}"))?;
    }
    Ok(params.snapshot())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    info!("tapeworn v{}", env!("CARGO_PKG_VERSION"));
    debug!("Args: {args:?}");

    let settings = Settings::load().context("failed to load settings")?;
    debug!("Settings:\n{settings}");

    match args.command {
        Command::Render {
            input,
            output,
            preset,
            mode,
            set,
            block_size,
            seed,
        } => {
            let presets = Manager::new(&settings.preset_dir)?;
            let values = build_params(&presets, preset.as_deref(), mode, &set)?;
            let output = output.unwrap_or_else(|| default_output_path(&input));
            let block_size = block_size.unwrap_or(settings.block_size);

            let params = Arc::new(Parameters::from_values(&values));
            let (mut engine, _) = Engine::with_parameters(params, seed.or(settings.seed));
            let report = render_file(&mut engine, &input, &output, block_size)
                .with_context(|| format!("failed to render '{}'", input.display()))?;

            println!("{report}");
            println!("Output: {}", output.display());
        }
        Command::Presets { action } => {
            let mut presets = Manager::new(&settings.preset_dir)?;
            match action {
                PresetAction::List => {
                    for preset in presets.factory_presets() {
                        println!(
                            "{:<16} {:<10} factory",
                            preset.name,
                            preset.category.as_deref().unwrap_or("")
                        );
                    }
                    for preset in presets.get_presets() {
                        println!(
                            "{:<16} {:<10} user",
                            preset.name,
                            preset.category.as_deref().unwrap_or("")
                        );
                    }
                }
                PresetAction::Show { name } => {
                    let preset = presets
                        .get_preset_by_name(&name)
                        .ok_or_else(|| anyhow!("Unknown preset: {name}"))?;
                    print!("{preset}");
                }
                PresetAction::Save {
                    name,
                    from,
                    mode,
                    set,
                    description,
                } => {
                    let values = build_params(&presets, from.as_deref(), mode, &set)?;
                    let mut preset =
                        Preset::new(name, values).with_category(&values.mode.to_string());
                    if let Some(description) = description.as_deref() {
                        preset = preset.with_description(description);
                    }
                    presets.save_preset(&preset)?;
                    println!("Saved preset '{}'", preset.name);
                }
                PresetAction::Delete { name } => {
                    presets.delete_preset(&name)?;
                    println!("Deleted preset '{name}'");
                }
            }
        }
        Command::Params => {
            for id in ParamId::ALL {
                let range = id.range();
                println!(
                    "{:<14} {:>6} .. {:<6} default {:<6} {}",
                    id.name(),
                    range.min,
                    range.max,
                    range.default,
                    range.unit
                );
            }
        }
    }

    Ok(())
}
