use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use strum::IntoEnumIterator;
use tickslide::config::{self, Preset, SliderOptions};
use tickslide::slider::InputAction;
use tickslide::{InputEvent, ValueEngine};

#[derive(Parser, Debug)]
#[command(name = "tickslide", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Start from a named preset instead of a config file
    #[arg(short = 'p', long, conflicts_with = "config")]
    preset: Option<String>,

    /// Config file to load (defaults to the user config file)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print the derived geometry.
    Layout,
    /// Feed a sequence of actions to a fresh engine, printing the value after each.
    ///
    /// Actions: drag:PX, step:DIR, click:POS, release, set:VALUE, enable, disable
    Replay { actions: Vec<Action> },
    /// List the built-in presets.
    Presets,
    /// Write the default config file if missing and print its path.
    Init,
}

#[derive(Debug, Clone)]
enum Action {
    Input(InputEvent),
    /// Click at an along-axis position in the track.
    ClickAt(f64),
    Set(String),
    Enable,
    Disable,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = s.split_once(':').unwrap_or((s, ""));
        let pixels = || {
            arg.parse::<i32>()
                .map_err(|e| format!("'{s}': expected whole pixels ({e})"))
        };
        match name {
            "drag" => Ok(Action::Input(InputEvent::Drag(pixels()?))),
            "step" => Ok(Action::Input(InputEvent::Step(pixels()?))),
            "click" => arg
                .parse()
                .map(Action::ClickAt)
                .map_err(|e| format!("'{s}': expected a track position ({e})")),
            "release" => Ok(Action::Input(InputEvent::Release)),
            "set" => Ok(Action::Set(arg.to_string())),
            "enable" => Ok(Action::Enable),
            "disable" => Ok(Action::Disable),
            _ => Err(format!("unknown action '{name}'")),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Presets => {
            for preset in Preset::iter() {
                println!("{preset}");
            }
            Ok(())
        }
        Commands::Init => {
            let path = config::default_config_path()?;
            config::write_default_config(&path)?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Layout => {
            let engine = build_engine(cli.preset.as_deref(), cli.config)?;
            print_layout(&engine);
            Ok(())
        }
        Commands::Replay { actions } => {
            let mut engine = build_engine(cli.preset.as_deref(), cli.config)?;
            replay(&mut engine, &actions);
            Ok(())
        }
    }
}

fn build_engine(preset: Option<&str>, path: Option<PathBuf>) -> anyhow::Result<ValueEngine> {
    let options = match (preset, path) {
        (Some(name), _) => name.parse::<SliderOptions>()?,
        (None, Some(path)) => {
            if !path.exists() {
                anyhow::bail!("Config file '{}' does not exist", path.display());
            }
            config::load_options(&path)
                .with_context(|| format!("Failed to load config from '{}'", path.display()))?
        }
        (None, None) => config::load_options(&config::default_config_path()?)?,
    };

    let engine = ValueEngine::from_options(&options)?;
    for advisory in engine.config().advisories() {
        println!("note: {advisory}");
    }
    Ok(engine)
}

fn print_layout(engine: &ValueEngine) {
    let layout = engine.layout();
    let cfg = engine.config();
    let track = layout.track_extent();
    let thumb = layout.thumb_extent();

    println!("orientation      {}", cfg.orientation());
    println!("range            {} .. {}", cfg.start_value(), cfg.end_value());
    println!("ticks            {}", layout.num_ticks());
    println!("tick width       {}", engine.quantizer().tick_width());
    println!("track            {}x{} px", track.width, track.height);
    println!("thumb            {}x{} px ({})", thumb.width, thumb.height, cfg.thumb_style());
    println!("slide length     {} px", layout.slide_length());
    println!("tick spacing     {} px", layout.tick_spacing());
    println!("value per pixel  {}", layout.displacement_to_value());
    println!(
        "tick labels      {}",
        engine.labels().tick_labels(engine.quantizer()).join(" ")
    );
    println!("value            {}", engine.labels().reading(engine.get()));
}

fn replay(engine: &mut ValueEngine, actions: &[Action]) {
    for action in actions {
        let outcome = match action {
            Action::Input(event) => input_note(engine.dispatch(*event)),
            Action::ClickAt(pos) => {
                let px = engine
                    .layout()
                    .click_displacement(*pos, engine.thumb_offset());
                input_note(engine.dispatch(InputEvent::Click(px)))
            }
            Action::Set(raw) => match engine.set_str(raw) {
                Ok(_) => String::new(),
                Err(e) => format!(" (rejected: {e})"),
            },
            Action::Enable => engine
                .enable()
                .map(|a| format!(" ({a})"))
                .unwrap_or_default(),
            Action::Disable => engine
                .disable()
                .map(|a| format!(" ({a})"))
                .unwrap_or_default(),
        };
        println!(
            "{:<14} {}{}",
            format!("{action:?}"),
            engine.labels().reading(engine.get()),
            outcome
        );
    }
}

fn input_note(action: InputAction) -> String {
    match action {
        InputAction { consumed: false, .. } => " (ignored)".to_string(),
        _ => String::new(),
    }
}
