use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

use englishpod_transcripts::library::{fix_unknown, organize_by_level, rename_by_title, status_report};
use englishpod_transcripts::{
    BatchProcessor, Config, DescriptionParser, DictionaryApiClient, PronunciationEnricher,
};

fn cli() -> Command {
    Command::new("englishpod")
        .version("0.1.0")
        .author("TigreRoll")
        .about("Parse EnglishPod video descriptions into structured transcripts")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (defaults to englishpod.toml)")
                .global(true),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse one description file and print the record as JSON")
                .arg(Arg::new("file").value_name("FILE").required(true))
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .help("Pretty-print the JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("batch")
                .about("Parse every description in a directory")
                .arg(
                    Arg::new("input-dir")
                        .short('i')
                        .long("input-dir")
                        .value_name("DIR")
                        .help("Directory containing description HTML files"),
                )
                .arg(
                    Arg::new("output-dir")
                        .short('o')
                        .long("output-dir")
                        .value_name("DIR")
                        .help("Output directory for records"),
                )
                .arg(
                    Arg::new("workers")
                        .short('w')
                        .long("workers")
                        .value_name("NUM")
                        .help("Number of parallel workers"),
                )
                .arg(
                    Arg::new("typescript")
                        .long("typescript")
                        .help("Also write a TypeScript episodes module")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("organize")
                .about("Copy descriptions into per-level folders")
                .arg(Arg::new("input-dir").short('i').long("input-dir").value_name("DIR"))
                .arg(Arg::new("output-dir").short('o').long("output-dir").value_name("DIR")),
        )
        .subcommand(
            Command::new("fix-unknown")
                .about("Move files out of the Unknown level folder using their names")
                .arg(Arg::new("dir").short('d').long("dir").value_name("DIR")),
        )
        .subcommand(
            Command::new("status")
                .about("Report missing video numbers per folder")
                .arg(Arg::new("dir").short('d').long("dir").value_name("DIR")),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename video_<n>.html files after their titles")
                .arg(Arg::new("dir").short('d').long("dir").value_name("DIR"))
                .arg(
                    Arg::new("live")
                        .long("live")
                        .help("Apply the renames (default is a dry run)")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("pronounce")
                .about("Add IPA pronunciations to a records JSON file")
                .arg(
                    Arg::new("file")
                        .short('f')
                        .long("file")
                        .value_name("FILE")
                        .required(true),
                )
                .arg(
                    Arg::new("live")
                        .long("live")
                        .help("Save changes (default is a dry run)")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("delay-ms")
                        .long("delay-ms")
                        .value_name("MS")
                        .help("Delay between lookups in milliseconds"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Config {
    let loaded = match matches.get_one::<String>("config") {
        Some(path) => Config::from_file(Path::new(path)),
        None => Config::load(),
    };

    loaded.unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    })
}

fn path_arg(matches: &ArgMatches, name: &str, default: &Path) -> PathBuf {
    matches
        .get_one::<String>(name)
        .map(PathBuf::from)
        .unwrap_or_else(|| default.to_path_buf())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let filter = if matches.get_flag("verbose") {
        "englishpod_transcripts=debug,englishpod=debug,warn"
    } else {
        "englishpod_transcripts=info,englishpod=info,warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = load_config(&matches);

    match matches.subcommand() {
        Some(("parse", sub)) => {
            let file = sub.get_one::<String>("file").context("missing FILE")?;
            let html = tokio::fs::read_to_string(file)
                .await
                .with_context(|| format!("reading {}", file))?;

            let parser = DescriptionParser::new().with_title_marker(config.parser.title_marker.clone());
            let outcome = parser.parse_report(&html);
            if outcome.is_empty() {
                warn!("Nothing recognized in {}", file);
            }

            let json = if sub.get_flag("pretty") {
                serde_json::to_string_pretty(&outcome.record)?
            } else {
                serde_json::to_string(&outcome.record)?
            };
            println!("{}", json);
        }
        Some(("batch", sub)) => {
            if let Some(workers) = sub.get_one::<String>("workers") {
                config.library.max_workers = workers.parse().context("workers must be a number")?;
            }
            if sub.get_flag("typescript") {
                config.output.typescript = true;
            }
            config.validate()?;

            let input_dir = path_arg(sub, "input-dir", &config.library.descriptions_dir);
            let output_dir = path_arg(sub, "output-dir", &config.output.base_dir);

            if !input_dir.exists() {
                error!("Input directory does not exist: {}", input_dir.display());
                return Err(anyhow::anyhow!("Input directory not found"));
            }

            let processor = BatchProcessor::new(&config);
            let result = processor.process_directory(&input_dir, &output_dir).await?;

            info!("✅ Parsed: {}", result.parsed);
            info!("⚠️ Empty: {}", result.empty);
            info!("❌ Failed: {}", result.failed);
        }
        Some(("organize", sub)) => {
            let input_dir = path_arg(sub, "input-dir", &config.library.descriptions_dir);
            let output_dir = path_arg(sub, "output-dir", &config.library.levels_dir);

            let parser = DescriptionParser::new().with_title_marker(config.parser.title_marker.clone());
            let summary =
                organize_by_level(&parser, &input_dir, &output_dir, &config.library.extension).await?;

            for (level, count) in &summary.copied {
                info!("   {}: +{} files", level, count);
            }
            info!("⏭️ Skipped (already exist): {}", summary.skipped);
        }
        Some(("fix-unknown", sub)) => {
            let dir = path_arg(sub, "dir", &config.library.levels_dir);
            let summary = fix_unknown(&dir, &config.library.extension).await?;

            for (level, count) in &summary.moved {
                info!("   {}: +{} files", level, count);
            }
            if summary.still_unknown > 0 {
                warn!("⚠️ {} files still unknown", summary.still_unknown);
            }
        }
        Some(("status", sub)) => {
            config.validate()?;
            let dir = path_arg(sub, "dir", &config.library.levels_dir);
            let report = status_report(&dir, &config.library.status_folders, &config.library.extension)?;

            for folder in report.incomplete() {
                info!("🔄 {}: {} missing videos", folder.name, folder.missing.len());
            }
        }
        Some(("rename", sub)) => {
            let dir = path_arg(sub, "dir", &config.library.descriptions_dir);
            let dry_run = !sub.get_flag("live");

            let parser = DescriptionParser::new().with_title_marker(config.parser.title_marker.clone());
            let summary = rename_by_title(&parser, &dir, &config.library.extension, dry_run).await?;

            info!(
                "📊 {} {} file(s), skipped {}, failed {}",
                if dry_run { "Would rename" } else { "Renamed" },
                summary.renames.len(),
                summary.skipped,
                summary.failed
            );
        }
        Some(("pronounce", sub)) => {
            if let Some(delay) = sub.get_one::<String>("delay-ms") {
                config.pronunciation.delay_ms = delay.parse().context("delay-ms must be a number")?;
            }
            config.validate()?;

            let file = PathBuf::from(sub.get_one::<String>("file").context("missing FILE")?);
            if !file.exists() {
                return Err(anyhow::anyhow!("File not found: {}", file.display()));
            }

            let client = DictionaryApiClient::new(&config.pronunciation)?;
            let enricher =
                PronunciationEnricher::new(client, Duration::from_millis(config.pronunciation.delay_ms));
            let stats = enricher.enrich_file(&file, !sub.get_flag("live")).await?;

            info!("✅ Pronunciations added: {}", stats.added);
            info!("❌ Failed to fetch: {}", stats.failed);
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}
