use crate::config::{load_config, Config};
use crate::document::Document;
use crate::layout::scenario_flow_view;
use crate::layout_dump::write_layout_dump;
use crate::model::{Npc, Scenario};
use crate::palette::{build_clipboard_json, PaletteOptions};
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::storage::{parse_scenario, to_json_pretty};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "scnflow", version, about = "Scenario flow-graph layout and export")]
pub struct Args {
    /// Scenario JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for text formats.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Replace the stored layout with a fresh layered layout first
    #[arg(long = "auto-layout")]
    pub auto_layout: bool,

    /// Palette: only this NPC (id or name)
    #[arg(long = "npc")]
    pub npc: Option<String>,

    /// Palette: hide rolls from players
    #[arg(long = "secret")]
    pub secret: bool,

    /// Palette: add a SAN check command
    #[arg(long = "san")]
    pub san: bool,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    /// The scenario document itself
    Json,
    /// Resolved node boxes and label anchors
    Layout,
    /// Chat palette clipboard JSON per NPC
    Palette,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .try_init();
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let mut scenario = parse_scenario(&input)?;
    if args.auto_layout {
        let mut doc = Document::new(scenario);
        doc.apply_auto_layout(&config.flow);
        scenario = doc.into_scenario();
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_scenario(&scenario, &config);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_scenario(&scenario, &config);
            write_output_png(&svg, &output, &config.render)?;
        }
        OutputFormat::Json => {
            let json = to_json_pretty(&scenario)?;
            write_text(&json, args.output.as_deref())?;
        }
        OutputFormat::Layout => {
            let view = scenario_flow_view(&scenario, &config.flow);
            write_layout_dump(args.output.as_deref(), &view)?;
        }
        OutputFormat::Palette => {
            let options = PaletteOptions {
                secret: args.secret,
                include_san_check: args.san,
            };
            let text = palette_text(&scenario, args.npc.as_deref(), options)?;
            write_text(&text, args.output.as_deref())?;
        }
    }

    Ok(())
}

fn render_scenario(scenario: &Scenario, config: &Config) -> String {
    let view = scenario_flow_view(scenario, &config.flow);
    render_svg(&view, &config.theme, &config.flow, &config.render)
}

fn select_npcs<'a>(scenario: &'a Scenario, filter: Option<&str>) -> Result<Vec<&'a Npc>> {
    let Some(filter) = filter else {
        return Ok(scenario.npcs.iter().collect());
    };
    let npc = scenario
        .npcs
        .iter()
        .find(|npc| npc.id == filter || npc.name == filter)
        .ok_or_else(|| anyhow::anyhow!("No NPC matches '{}'", filter))?;
    Ok(vec![npc])
}

/// Clipboard JSON for every selected NPC, one document after another.
fn palette_text(
    scenario: &Scenario,
    filter: Option<&str>,
    options: PaletteOptions,
) -> Result<String> {
    let npcs = select_npcs(scenario, filter)?;
    if npcs.is_empty() {
        return Err(anyhow::anyhow!("Scenario has no NPCs"));
    }
    let mut blocks = Vec::with_capacity(npcs.len());
    for npc in npcs {
        tracing::debug!(npc = %npc.id, skills = npc.skills.len(), "building chat palette");
        blocks.push(build_clipboard_json(npc, options)?);
    }
    Ok(blocks.join("\n"))
}

fn write_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => println!("{}", text),
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NpcStats;

    fn scenario() -> Scenario {
        let mut scenario = Scenario::default();
        scenario.npcs = vec![
            Npc {
                id: "n1".to_string(),
                name: "Doctor".to_string(),
                stats: Some(NpcStats {
                    DEX: Some(12),
                    ..Default::default()
                }),
                ..Default::default()
            },
            Npc {
                id: "n2".to_string(),
                name: "Nurse".to_string(),
                ..Default::default()
            },
        ];
        scenario
    }

    #[test]
    fn parses_palette_flags() {
        let args = Args::parse_from([
            "scnflow", "-i", "in.json", "-e", "palette", "--secret", "--san", "-vv",
        ]);
        assert_eq!(args.output_format, OutputFormat::Palette);
        assert!(args.secret && args.san);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn npc_filter_matches_id_or_name() {
        let scenario = scenario();
        assert_eq!(select_npcs(&scenario, None).unwrap().len(), 2);
        assert_eq!(select_npcs(&scenario, Some("Nurse")).unwrap()[0].id, "n2");
        assert_eq!(select_npcs(&scenario, Some("n1")).unwrap()[0].name, "Doctor");
        assert!(select_npcs(&scenario, Some("Nobody")).is_err());
    }

    #[test]
    fn palette_requires_npcs() {
        let empty = Scenario::default();
        assert!(palette_text(&empty, None, PaletteOptions::default()).is_err());
        let text = palette_text(&scenario(), Some("n1"), PaletteOptions::default()).unwrap();
        assert!(text.contains("\"initiative\": 12"));
    }
}
