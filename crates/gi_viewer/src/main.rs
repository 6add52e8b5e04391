//! Headless gi viewer.
//!
//! Renders a scene for a number of frames and writes each frame as a PNG.
//!
//! ```text
//! gi_viewer [scene.json] [--frames N] [--out DIR] [--tone OP]
//!           [--commands FILE] [--oscillate INDEX]
//! ```
//!
//! Without a scene file the built-in demo scene is rendered.

mod hooks;
mod script;
mod sink;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use gi_core::{load_scene, SceneDescription, ToneOperator};
use gi_renderer::{Renderer, Session};

use hooks::{OscillateSphere, ViewerHooks};
use script::CommandScript;
use sink::PngSequenceSink;

/// Sweep used by `--oscillate`: between x = -2 and x = 2 at one unit per second.
const OSCILLATE_LIMIT: f32 = 2.0;
const OSCILLATE_SPEED: f32 = 1.0;

#[derive(Debug)]
struct Args {
    scene: Option<PathBuf>,
    frames: u64,
    out: PathBuf,
    tone: Option<ToneOperator>,
    commands: Option<PathBuf>,
    oscillate: Option<usize>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            scene: None,
            frames: 1,
            out: PathBuf::from("frames"),
            tone: None,
            commands: None,
            oscillate: None,
        }
    }
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} [scene.json] [--frames N] [--out DIR] [--tone none|ward|reinhard|adaptive_logarithmic] \
         [--commands FILE] [--oscillate INDEX]",
        program
    )
}

fn parse_args(argv: &[String]) -> Result<Args> {
    let program = argv.first().map(String::as_str).unwrap_or("gi_viewer");
    let mut args = Args::default();
    let mut iter = argv.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{} needs a value\n{}", flag, usage(program)))
        };

        match arg.as_str() {
            "--frames" => {
                let v = value("--frames")?;
                args.frames = v.parse().with_context(|| format!("invalid frame count '{}'", v))?;
            }
            "--out" => args.out = PathBuf::from(value("--out")?),
            "--tone" => args.tone = Some(value("--tone")?.parse()?),
            "--commands" => args.commands = Some(PathBuf::from(value("--commands")?)),
            "--oscillate" => {
                let v = value("--oscillate")?;
                args.oscillate = Some(v.parse().with_context(|| format!("invalid object index '{}'", v))?);
            }
            "-h" | "--help" => {
                println!("{}", usage(program));
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown option '{}'\n{}", flag, usage(program)),
            path => {
                if args.scene.is_some() {
                    bail!("more than one scene file given\n{}", usage(program));
                }
                args.scene = Some(PathBuf::from(path));
            }
        }
    }

    Ok(args)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let args = parse_args(&argv)?;

    let mut description = match &args.scene {
        Some(path) => load_scene(path).with_context(|| format!("failed to load {}", path.display()))?,
        None => {
            log::info!("No scene file given, rendering the demo scene");
            SceneDescription::default_scene()
        }
    };
    if let Some(tone) = args.tone {
        description.settings.tone_operator = tone;
    }

    let script = match &args.commands {
        Some(path) => CommandScript::load(path).with_context(|| format!("failed to read {}", path.display()))?,
        None => CommandScript::default(),
    };

    let sink = PngSequenceSink::new(&args.out, script)
        .with_context(|| format!("failed to create {}", args.out.display()))?;

    let oscillate = args
        .oscillate
        .map(|index| OscillateSphere::new(index, OSCILLATE_LIMIT, OSCILLATE_SPEED));

    let resolution = description.resolution;
    log::info!(
        "Rendering {} frame(s) at {}x{} with {} tone mapping",
        args.frames,
        resolution.width,
        resolution.height,
        description.settings.tone_operator
    );

    let renderer = Renderer::new(resolution.width, resolution.height, description.settings.clone())?;
    let mut session = Session::new(renderer, ViewerHooks::new(description, oscillate), sink)?;
    session.run(args.frames)?;

    log::info!(
        "Wrote {} frame(s) to {}",
        session.sink().written().len(),
        args.out.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("gi_viewer")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_defaults() {
        let args = parse_args(&argv(&[])).unwrap();
        assert_eq!(args.frames, 1);
        assert!(args.scene.is_none());
        assert_eq!(args.out, PathBuf::from("frames"));
    }

    #[test]
    fn test_parse_all_options() {
        let args = parse_args(&argv(&[
            "scene.json",
            "--frames",
            "12",
            "--out",
            "renders",
            "--tone",
            "reinhard",
            "--commands",
            "moves.txt",
            "--oscillate",
            "0",
        ]))
        .unwrap();

        assert_eq!(args.scene, Some(PathBuf::from("scene.json")));
        assert_eq!(args.frames, 12);
        assert_eq!(args.out, PathBuf::from("renders"));
        assert_eq!(args.tone, Some(ToneOperator::Reinhard));
        assert_eq!(args.commands, Some(PathBuf::from("moves.txt")));
        assert_eq!(args.oscillate, Some(0));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&argv(&["--frames"])).is_err());
        assert!(parse_args(&argv(&["--frames", "many"])).is_err());
        assert!(parse_args(&argv(&["--tone", "filmic"])).is_err());
        assert!(parse_args(&argv(&["--bogus"])).is_err());
        assert!(parse_args(&argv(&["a.json", "b.json"])).is_err());
    }
}
