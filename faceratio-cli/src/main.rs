use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use faceratio_core::{config::Config, detect, Celebrity, FaceAnalyzer, Region};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "faceratio")]
#[command(about = "Golden-ratio face scoring and celebrity look-alike matching", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default search path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the main face of a detector response (JSON)
    Analyze {
        /// Detector output file
        input: PathBuf,
        /// Number of celebrity matches to return
        #[arg(short, long)]
        top: Option<usize>,
        /// Do not store the result
        #[arg(long)]
        no_save: bool,
    },
    /// Show a stored result
    Show {
        /// Result ID
        id: String,
    },
    /// List stored results
    List,
    /// Remove a stored result
    Remove {
        /// Result ID
        id: String,
    },
    /// List the celebrity dataset
    Celebs {
        /// Only show one region (e.g. korea, north_america)
        #[arg(short, long)]
        region: Option<Region>,
    },
    /// Show configuration
    Config {
        /// Validate configuration
        #[arg(long)]
        validate: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Analyze {
            input,
            top,
            no_save,
        } => cmd_analyze(config, input, top, no_save),
        Commands::Show { id } => cmd_show(config, id),
        Commands::List => cmd_list(config),
        Commands::Remove { id } => cmd_remove(config, id),
        Commands::Celebs { region } => cmd_celebs(config, region),
        Commands::Config { validate } => cmd_config(config, validate),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(Config::load()?),
    }
}

fn cmd_analyze(
    config: Config,
    input: PathBuf,
    top: Option<usize>,
    no_save: bool,
) -> anyhow::Result<()> {
    let top_n = top.unwrap_or(config.matching.top_n);
    if top_n == 0 {
        bail!("--top must be greater than 0");
    }

    let faces = detect::load_detections(&input)
        .with_context(|| format!("reading detector output {}", input.display()))?;
    let face = detect::select_main_face(&faces)?;

    let analyzer = FaceAnalyzer::new(config)?;

    let start = Instant::now();
    let report = analyzer.analyze_face_with_top_n(face, top_n)?;
    log::debug!(
        "Analysis took {:.2}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !no_save && analyzer.save_report(&report)? {
        eprintln!("✓ Result saved: {}", report.id);
    }

    Ok(())
}

fn cmd_show(config: Config, id: String) -> anyhow::Result<()> {
    let analyzer = FaceAnalyzer::new(config)?;
    let report = analyzer.store().load(&id)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_list(config: Config) -> anyhow::Result<()> {
    let analyzer = FaceAnalyzer::new(config)?;
    let ids = analyzer.store().list()?;

    if ids.is_empty() {
        println!(
            "No stored results in {}",
            analyzer.store().base_path().display()
        );
        return Ok(());
    }

    println!("{:<24} {:>5}  {:<8} {}", "Result ID", "Score", "Shape", "Created At");
    println!("{}", "-".repeat(64));

    for id in ids {
        match analyzer.store().load(&id) {
            Ok(report) => println!(
                "{:<24} {:>5}  {:<8} {}",
                report.id,
                report.score,
                report.face_type.shape,
                report.created_at.format("%Y-%m-%d %H:%M:%S")
            ),
            Err(e) => log::warn!("Skipping unreadable result {}: {}", id, e),
        }
    }

    Ok(())
}

fn cmd_remove(config: Config, id: String) -> anyhow::Result<()> {
    let analyzer = FaceAnalyzer::new(config)?;
    analyzer.store().remove(&id)?;
    println!("✓ Result {} removed", id);
    Ok(())
}

fn cmd_celebs(config: Config, region: Option<Region>) -> anyhow::Result<()> {
    let analyzer = FaceAnalyzer::new(config)?;
    let db = analyzer.celebrities();

    println!("{:<24} {:<20} {:<16} {}", "Name", "Localized", "Region", "Gender");
    println!("{}", "-".repeat(72));

    let celebs: Vec<&Celebrity> = match region {
        Some(region) => db.by_region(region).collect(),
        None => db.entries().iter().collect(),
    };

    for celeb in &celebs {
        println!(
            "{:<24} {:<20} {:<16} {:?}",
            celeb.name, celeb.name_ko, celeb.region, celeb.gender
        );
    }

    println!();
    println!("{} of {} celebrities", celebs.len(), db.len());
    Ok(())
}

fn cmd_config(config: Config, validate: bool) -> anyhow::Result<()> {
    if validate {
        config.validate()?;
        println!("✓ Configuration is valid");
        return Ok(());
    }

    println!("Configuration:");
    println!();

    println!("[matching]");
    println!("  top_n = {}", config.matching.top_n);
    println!();

    println!("[dataset]");
    match &config.dataset.path {
        Some(path) => println!("  path = {:?}", path),
        None => println!("  path = (built-in)"),
    }
    println!();

    println!("[storage]");
    println!("  results_path = {:?}", config.storage.results_path);
    println!("  save_results = {}", config.storage.save_results);

    Ok(())
}
