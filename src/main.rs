use shapegen::{
    build_with, format_catalogue, list_shapes, BuildOptions, CatalogueFormat, ConeStrategy,
    ExportFormat, Exporter, Parameters, Settings,
};
use std::path::PathBuf;
use std::time::Instant;

const USAGE: &str = r#"shapegen - build a primitive solid and export it

USAGE:
  shapegen <SHAPE> [--size F] [--radius F] [--height F] [options]
  shapegen --export-info [--export-file NAME]

SHAPES:
  cube      --size
  sphere    --size (diameter)
  cylinder  --radius --height
  cone      --radius --height

OPTIONS:
  -o, --output NAME        file name inside the output folder (default <shape>.step)
      --output-dir DIR     output folder (default from settings, "examples")
      --as-base64          print the model as base64 instead of writing a file
      --format FMT         base64 format: stl, step, brep, iges, glb (default glb)
      --cone-strategy S    primitive | revolve
      --config FILE        TOML settings file
      --export-info        print the shape catalogue
      --export-file NAME   catalogue format from NAME (.json or .xml)
  -h, --help               show this help

Set RUST_LOG (e.g. RUST_LOG=shapegen=debug) for diagnostics on stderr.
"#;

fn main() {
    if let Err(err) = init_logging() {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let command = match Command::parse(std::env::args().skip(1).collect()) {
        Ok(Some(command)) => command,
        Ok(None) => {
            print!("{USAGE}");
            return;
        }
        Err(msg) => {
            eprintln!("error: {msg}");
            eprint!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(command) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr so stdout only carries catalogue or base64 output.
fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()?;
    Ok(())
}

fn run(command: Command) -> shapegen::Result<()> {
    let mut settings = match &command.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(dir) = command.output_dir.clone() {
        settings.output_dir = dir;
    }
    if let Some(strategy) = command.cone_strategy {
        settings.cone_strategy = strategy;
    }

    let shape = match (&command.shape, command.export_info) {
        (Some(shape), false) => shape.as_str(),
        _ => {
            let format = match &command.export_file {
                Some(name) => CatalogueFormat::from_file_name(name)?,
                None => CatalogueFormat::Json,
            };
            println!("{}", format_catalogue(&list_shapes(), format)?);
            return Ok(());
        }
    };

    let started = Instant::now();
    let options = BuildOptions {
        cone_strategy: settings.cone_strategy,
    };
    let model = build_with(shape, &command.parameters, &options)?;
    let exporter = Exporter::new(settings.tessellation.clone());

    if command.as_base64 {
        let format = match &command.format {
            Some(name) => name.parse()?,
            None => ExportFormat::Glb,
        };
        println!("{}", exporter.export_to_base64(&model, format)?);
        return Ok(());
    }

    let file_name = command
        .output
        .clone()
        .unwrap_or_else(|| format!("{shape}.step"));
    let path = exporter.save_model(&model, &settings.output_dir, &file_name)?;
    println!("Model saved as: {}", path.display());
    println!("Generation time: {:.3} s", started.elapsed().as_secs_f64());
    Ok(())
}

#[derive(Debug, Default)]
struct Command {
    shape: Option<String>,
    parameters: Parameters,
    output: Option<String>,
    output_dir: Option<PathBuf>,
    as_base64: bool,
    format: Option<String>,
    cone_strategy: Option<ConeStrategy>,
    config: Option<PathBuf>,
    export_info: bool,
    export_file: Option<String>,
}

impl Command {
    /// `Ok(None)` means help was requested.
    fn parse(args: Vec<String>) -> Result<Option<Self>, String> {
        let mut args = Args::new(args);
        let mut command = Command::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "--size" => command.parameters.size = Some(args.number("--size")?),
                "--radius" => command.parameters.radius = Some(args.number("--radius")?),
                "--height" => command.parameters.height = Some(args.number("--height")?),
                "-o" | "--output" => command.output = Some(args.value("--output")?),
                "--output-dir" => command.output_dir = Some(args.value("--output-dir")?.into()),
                "--as-base64" => command.as_base64 = true,
                "--format" => command.format = Some(args.value("--format")?),
                "--cone-strategy" => {
                    command.cone_strategy = Some(args.value("--cone-strategy")?.parse()?)
                }
                "--config" => command.config = Some(args.value("--config")?.into()),
                "--export-info" => command.export_info = true,
                "--export-file" => command.export_file = Some(args.value("--export-file")?),
                flag if flag.starts_with('-') => return Err(format!("unknown option: {flag}")),
                _ if command.shape.is_none() => command.shape = Some(arg.clone()),
                _ => return Err(format!("unexpected argument: {arg}")),
            }
        }

        Ok(Some(command))
    }
}

struct Args {
    args: Vec<String>,
    pos: usize,
}

impl Args {
    fn new(args: Vec<String>) -> Self {
        Self { args, pos: 0 }
    }

    fn next(&mut self) -> Option<String> {
        let arg = self.args.get(self.pos)?.clone();
        self.pos += 1;
        Some(arg)
    }

    fn value(&mut self, flag: &str) -> Result<String, String> {
        self.next().ok_or_else(|| format!("missing value for {flag}"))
    }

    fn number(&mut self, flag: &str) -> Result<f64, String> {
        let raw = self.value(flag)?;
        raw.parse()
            .map_err(|_| format!("invalid number for {flag}: {raw}"))
    }
}
