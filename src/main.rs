use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use uvtt_import::config::AppConfig;
use uvtt_import::geometry::OriginOffset;
use uvtt_import::{
    DirectoryHost, ImportAction, ImportError, ImportOptions, build_scene_items, parse_uvtt,
    read_uvtt_file, render_preview, run_import_action,
};

#[derive(Parser)]
#[command(name = "uvtt-import", about = "Import Universal VTT maps into tabletop scenes")]
struct Cli {
    /// Configuration file (defaults to $UVTT_IMPORT_CONFIG or ./config/default.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new scene from the map image
    Scene {
        input: PathBuf,
        /// Output directory standing in for the host scene store
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Add walls, doors and lights to the current scene
    Items {
        input: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Scene grid DPI
        #[arg(long)]
        dpi: Option<f64>,
        /// Also import lights
        #[arg(long)]
        lights: bool,
        /// Subtract the map origin before scaling
        #[arg(long)]
        origin_offset: bool,
    },
    /// Render the converted map as SVG
    Preview {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        dpi: Option<f64>,
    },
    /// Print document statistics
    Inspect { input: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    let config = load_configuration(cli.config.as_deref());
    init_logging(&config);

    if let Err(err) = run(cli.command, &config) {
        eprintln!("Error: {}", err);
        process::exit(err.exit_code());
    }
}

fn run(command: Command, config: &AppConfig) -> Result<(), ImportError> {
    let mut options = ImportOptions::from(&config.import);
    match command {
        Command::Scene { input, out } => {
            let content = read_uvtt_file(&input)?;
            let mut host = directory_host(out, None, config);
            run_import_action(
                &mut host,
                ImportAction::CreateScene,
                &file_name(&input),
                &content,
                &options,
            )?;
            println!(
                "Successfully created scene from '{}' in '{}'",
                input.display(),
                host.root().display()
            );
        }
        Command::Items {
            input,
            out,
            dpi,
            lights,
            origin_offset,
        } => {
            options.include_lights |= lights;
            if origin_offset {
                options.origin_offset = OriginOffset::Apply;
            }
            let content = read_uvtt_file(&input)?;
            let mut host = directory_host(out, dpi, config);
            run_import_action(
                &mut host,
                ImportAction::ImportItems,
                &file_name(&input),
                &content,
                &options,
            )?;
            println!(
                "Successfully imported {} items from '{}' into '{}'",
                host.items().len(),
                input.display(),
                host.root().display()
            );
        }
        Command::Preview { input, output, dpi } => {
            let document = parse_uvtt(&read_uvtt_file(&input)?)?;
            let dpi = dpi.unwrap_or(config.import.grid_dpi);
            let (items, summary) =
                build_scene_items(&document, dpi, &config.import.player_id, &options)?;
            let svg = render_preview(&document, &items, dpi)?;
            fs::write(&output, svg).map_err(ImportError::Preview)?;
            info!(items = summary.total(), "preview rendered");
            println!(
                "Successfully rendered '{}' to '{}'",
                input.display(),
                output.display()
            );
        }
        Command::Inspect { input } => {
            let document = parse_uvtt(&read_uvtt_file(&input)?)?;
            let res = &document.resolution;
            println!("File:            {}", input.display());
            println!("Format:          {}", document.format);
            println!("Pixels per grid: {}", res.pixels_per_grid);
            println!("Map origin:      ({}, {})", res.map_origin.x, res.map_origin.y);
            println!("Map size:        {} x {}", res.map_size.x, res.map_size.y);
            println!("Walls:           {}", document.walls().count());
            println!("Portals:         {}", document.portals().len());
            println!("Lights:          {}", document.lights().len());
            match document.image() {
                Some(image) => println!("Image:           {} base64 chars", image.len()),
                None => println!("Image:           none"),
            }
        }
    }
    Ok(())
}

fn directory_host(out: Option<PathBuf>, dpi: Option<f64>, config: &AppConfig) -> DirectoryHost {
    DirectoryHost::new(
        out.unwrap_or_else(|| config.output.directory.clone()),
        dpi.unwrap_or(config.import.grid_dpi),
        config.import.player_id.clone(),
    )
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn load_configuration(override_path: Option<&Path>) -> AppConfig {
    let loaded = match override_path {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::discover(),
    };
    match loaded {
        Ok(config) => config,
        Err(err) if override_path.is_some() => {
            eprintln!("Error loading config: {}", err);
            process::exit(1);
        }
        Err(err) => {
            eprintln!("Warning: {}; using default configuration", err);
            AppConfig::default()
        }
    }
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if subscriber.try_init().is_err() {
        // already initialized
    }
}
