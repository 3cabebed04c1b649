use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod chapter;
mod config;
mod cover;
mod error;
mod natural;
mod order;
mod probe;
mod report;
mod select;

use chapter::ChapterMode;
use config::Settings;
use error::Error;
use probe::Prober;

/// Assemble split audiobooks into one ordered, chaptered build plan.
#[derive(Parser)]
#[command(name = "legato", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Propose a play order from metadata and filenames.
    Plan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Comma-separated sidecar image filenames to search for.
        #[arg(long)]
        image_names: Option<String>,

        /// Optional path to write an ffmpeg concat list in proposed order.
        #[arg(long)]
        files_out: Option<PathBuf>,
    },

    /// Write the ffmpeg concat list and chapter metadata files.
    Build {
        #[command(flatten)]
        scan: ScanArgs,

        /// Create chapters per directory, per file, or not at all.
        #[arg(long, value_enum)]
        chapters: Option<ChapterMode>,

        /// Concat list output file.
        #[arg(long, default_value = "files.txt")]
        files_out: PathBuf,

        /// FFMETADATA output file.
        #[arg(long, default_value = "meta.txt")]
        meta_out: PathBuf,
    },

    /// Extract cover art from sidecar images or embedded tags.
    Cover {
        #[command(flatten)]
        scan: ScanArgs,

        /// Comma-separated sidecar image filenames to search for.
        #[arg(long)]
        image_names: Option<String>,

        /// Output image path for the extracted cover art.
        #[arg(long, default_value = "cover.jpg")]
        output: PathBuf,

        /// Optional target container to embed the cover into.
        #[arg(long)]
        embed: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Root directory containing the audiobook parts.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Scan subdirectories as well.
    #[arg(long)]
    recursive: bool,

    /// Comma-separated file extensions to include.
    #[arg(long)]
    extensions: Option<String>,
}

impl ScanArgs {
    fn apply(&self, settings: &mut Settings) {
        if self.recursive {
            settings.scan.recursive = true;
        }
        if let Some(extensions) = &self.extensions {
            settings.scan.extensions = config::parse_list(extensions);
        }
    }

    fn canonical_root(&self) -> Result<PathBuf, Error> {
        std::fs::canonicalize(&self.root)
            .map_err(|e| Error::Config(format!("invalid root {}: {e}", self.root.display())))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "legato=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let settings = Settings::load().map_err(|e| Error::Config(e.to_string()))?;
    settings.validate().map_err(Error::Config)?;

    match cli.command {
        Commands::Plan {
            scan,
            image_names,
            files_out,
        } => run_plan(settings, scan, image_names, files_out),
        Commands::Build {
            scan,
            chapters,
            files_out,
            meta_out,
        } => run_build(settings, scan, chapters, files_out, meta_out),
        Commands::Cover {
            scan,
            image_names,
            output,
            embed,
        } => run_cover(settings, scan, image_names, output, embed),
    }
}

fn run_plan(
    mut settings: Settings,
    scan_args: ScanArgs,
    image_names: Option<String>,
    files_out: Option<PathBuf>,
) -> Result<(), Error> {
    scan_args.apply(&mut settings);
    if let Some(names) = &image_names {
        settings.cover.image_names = config::parse_list(names);
    }
    let root = scan_args.canonical_root()?;

    let parts = catalog::scan(&root, &settings.scan)?;
    if parts.is_empty() {
        return Err(Error::NoMatchingFiles);
    }

    let prober = Prober::detect();
    let (records, mut warnings) = prober.probe_all(&parts);
    let (ordered, order_warnings) = order::order(parts, &records);
    warnings.extend(order_warnings);

    let metadata_source = select::select_metadata_source(&ordered);
    let cover_source =
        select::select_cover_source(&root, &settings.scan, &settings.cover, &ordered)?;

    println!(
        "{}",
        report::format_plan(
            &ordered,
            &root,
            &warnings,
            metadata_source,
            cover_source.as_ref()
        )
    );

    if let Some(out) = &files_out {
        report::write_concat_list(&ordered, out)?;
        tracing::info!(path = %out.display(), "wrote concat list");
    }
    Ok(())
}

fn run_build(
    mut settings: Settings,
    scan_args: ScanArgs,
    chapters: Option<ChapterMode>,
    files_out: PathBuf,
    meta_out: PathBuf,
) -> Result<(), Error> {
    scan_args.apply(&mut settings);
    let mode = chapters.unwrap_or(settings.chapters.mode);
    let root = scan_args.canonical_root()?;

    let parts = catalog::scan(&root, &settings.scan)?;
    if parts.is_empty() {
        return Err(Error::NoMatchingFiles);
    }

    let prober = Prober::detect();
    let (records, mut warnings) = prober.probe_all(&parts);
    let (ordered, order_warnings) = order::order(parts, &records);
    warnings.extend(order_warnings);
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    // Chapters are computed before anything is written so a timing failure
    // leaves no output behind.
    let chapter_list = chapter::build_chapters(&ordered, mode, &root)?;

    report::write_concat_list(&ordered, &files_out)?;
    tracing::info!(path = %files_out.display(), files = ordered.len(), "wrote concat list");

    if mode != ChapterMode::None {
        report::write_ffmetadata(&chapter_list, &meta_out)?;
        tracing::info!(
            path = %meta_out.display(),
            chapters = chapter_list.len(),
            "wrote chapter metadata"
        );
    }
    Ok(())
}

fn run_cover(
    mut settings: Settings,
    scan_args: ScanArgs,
    image_names: Option<String>,
    output: PathBuf,
    embed: Option<PathBuf>,
) -> Result<(), Error> {
    scan_args.apply(&mut settings);
    if let Some(names) = &image_names {
        settings.cover.image_names = config::parse_list(names);
    }
    let root = scan_args.canonical_root()?;

    let source = match select::find_sidecar(&root, &settings.scan, &settings.cover)? {
        Some(sidecar) => select::CoverSource::Sidecar(sidecar),
        None => {
            // No curated sidecar: fall back to embedded art in the play set.
            let parts = catalog::scan(&root, &settings.scan)?;
            let prober = Prober::detect();
            let (records, warnings) = prober.probe_all(&parts);
            for warning in &warnings {
                tracing::warn!("{warning}");
            }
            let (ordered, _) = order::order(parts, &records);
            select::select_embedded(&ordered, &settings.cover)
                .map(select::CoverSource::Embedded)
                .ok_or(Error::NoCoverArt)?
        }
    };

    cover::extract(&source, &output)?;
    println!("Cover art saved to {}", output.display());

    if let Some(target) = &embed {
        cover::embed(&output, target)?;
        println!("Embedded cover art into {}", target.display());
    }
    Ok(())
}
