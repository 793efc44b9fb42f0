//! patwatch CLI - patent watch report generator

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use patwatch::build::estimate_detail_pages;
use patwatch::{
    JsonFormat, PartSelection, PatentWatch, PatentWorkbook, RecordKind, ReportConfig, ReportStats,
};

#[derive(Parser)]
#[command(name = "patwatch")]
#[command(author = "patwatch contributors")]
#[command(version)]
#[command(about = "Generate patent watch DOCX reports from spreadsheets", long_about = None)]
struct Cli {
    /// Input workbook
    #[arg(value_name = "WORKBOOK")]
    input: Option<PathBuf>,

    /// Output DOCX file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Report configuration (TOML)
    #[arg(short, long, value_name = "FILE", env = "PATWATCH_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the DOCX report
    #[command(alias = "gen")]
    Generate {
        /// Input workbook
        #[arg(value_name = "WORKBOOK")]
        input: PathBuf,

        /// Output file (defaults to the workbook name with .docx)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// DOCX template to merge the report into
        #[arg(short, long, value_name = "FILE")]
        template: Option<PathBuf>,

        /// Report title
        #[arg(long)]
        title: Option<String>,

        /// Skip image lookup and fetching
        #[arg(long)]
        no_images: bool,

        /// Save fetched images into this directory
        #[arg(long, value_name = "DIR")]
        image_dir: Option<PathBuf>,

        /// Report parts (e.g., "all", "title,fp-index", "details")
        #[arg(short, long)]
        parts: Option<String>,
    },

    /// Show workbook information and page estimates
    Info {
        /// Input workbook
        #[arg(value_name = "WORKBOOK")]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump the report model as JSON
    Json {
        /// Input workbook
        #[arg(value_name = "WORKBOOK")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Compact output (no indentation)
        #[arg(long)]
        compact: bool,

        /// Dump the parsed records instead of the report model
        #[arg(long)]
        records: bool,
    },

    /// Print the default configuration as TOML
    Config {
        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Default)]
struct GenerateArgs {
    template: Option<PathBuf>,
    title: Option<String>,
    no_images: bool,
    image_dir: Option<PathBuf>,
    parts: Option<String>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Some(Commands::Generate {
            input,
            output,
            template,
            title,
            no_images,
            image_dir,
            parts,
        }) => cmd_generate(
            &input,
            output.as_deref(),
            config,
            GenerateArgs {
                template,
                title,
                no_images,
                image_dir,
                parts,
            },
        ),
        Some(Commands::Info { input, json }) => cmd_info(&input, config, json),
        Some(Commands::Json {
            input,
            output,
            compact,
            records,
        }) => cmd_json(&input, output.as_deref(), config, compact, records),
        Some(Commands::Config { output }) => cmd_config(output.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_generate(
                    &input,
                    cli.output.as_deref(),
                    config,
                    GenerateArgs::default(),
                )
            } else {
                println!("{}", "Usage: patwatch <WORKBOOK> [OUTPUT]".yellow());
                println!("       patwatch --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> patwatch::Result<ReportConfig> {
    match path {
        Some(path) => ReportConfig::from_file(path),
        None => Ok(ReportConfig::default()),
    }
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("docx")
}

fn cmd_generate(
    input: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    args: GenerateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output(input));
    if output == input {
        return Err(format!("Output would overwrite the workbook: {}", input.display()).into());
    }

    let mut watch = PatentWatch::with_config(load_config(config)?);
    if let Some(title) = args.title {
        watch = watch.with_title(title);
    }
    if let Some(template) = args.template {
        watch = watch.with_template(template);
    }
    if args.no_images {
        watch = watch.with_images(false);
    }
    if let Some(dir) = args.image_dir {
        fs::create_dir_all(&dir)?;
        watch = watch.with_image_dir(dir);
    }
    if let Some(parts) = args.parts {
        let parts =
            PartSelection::parse(&parts).map_err(|e| format!("Invalid part list: {}", e))?;
        watch = watch.with_parts(parts);
    }

    let workbook = watch.read(input)?;

    let pb = ProgressBar::new(workbook.record_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message("Building report...");

    let report = watch.build_with_progress(&workbook, |record| {
        pb.set_message(record.text(patwatch::Field::Number));
        pb.inc(1);
    })?;

    pb.set_message("Writing DOCX...");
    let data = watch.render(&report)?;
    fs::write(&output, data)?;
    pb.finish_with_message("Done!");

    println!("{} {}", "Saved to".green(), output.display());
    print_stats(&report.stats);

    Ok(())
}

fn print_stats(stats: &ReportStats) {
    println!("\n{}", "Report Statistics".green().bold());
    println!(
        "  {} First publications: {}",
        "├─".dimmed(),
        stats.first_publications
    );
    println!("  {} Granted patents: {}", "├─".dimmed(), stats.granted_patents);
    println!("  {} Detail blocks: {}", "├─".dimmed(), stats.detail_blocks);
    println!("  {} Forced page breaks: {}", "├─".dimmed(), stats.forced_breaks);
    println!("  {} Images: {}", "├─".dimmed(), stats.images_embedded);
    if stats.image_failures > 0 {
        println!(
            "  {} Image failures: {}",
            "├─".dimmed(),
            stats.image_failures.to_string().yellow()
        );
    }
    if stats.uncategorized > 0 {
        println!(
            "  {} Uncategorized records: {}",
            "├─".dimmed(),
            stats.uncategorized.to_string().yellow()
        );
    }
    println!("  {} Missing links: {}", "└─".dimmed(), stats.missing_links);
}

fn category_counts(config: &ReportConfig, workbook: &PatentWorkbook) -> Vec<(String, usize, usize)> {
    config
        .category_names()
        .map(|name| {
            (
                name.to_string(),
                workbook.in_category(RecordKind::FirstPublication, name).count(),
                workbook.in_category(RecordKind::GrantedPatent, name).count(),
            )
        })
        .collect()
}

fn cmd_info(
    input: &Path,
    config: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let format = patwatch::detect_format_from_path(input)?;
    let workbook = PatentWatch::with_config(config.clone()).read(input)?;

    let counts = category_counts(&config, &workbook);
    let fp_pages = estimate_detail_pages(&config, &workbook, RecordKind::FirstPublication);
    let gp_pages = estimate_detail_pages(&config, &workbook, RecordKind::GrantedPatent);

    if json {
        let categories: Vec<serde_json::Value> = counts
            .iter()
            .map(|(name, fp, gp)| {
                serde_json::json!({
                    "name": name,
                    "first_publications": fp,
                    "granted_patents": gp,
                })
            })
            .collect();
        let info = serde_json::json!({
            "file": input.display().to_string(),
            "format": format.to_string(),
            "sheets": workbook.sheet_names,
            "first_publications": workbook.first_publications.len(),
            "granted_patents": workbook.granted_patents.len(),
            "images": workbook.images.len(),
            "categories": categories,
            "estimated_pages": {
                "first_publication_details": fp_pages,
                "granted_details": gp_pages,
            },
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Workbook Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Sheets".bold(), workbook.sheet_names.join(", "));
    println!(
        "{}: {}",
        "First publications".bold(),
        workbook.first_publications.len()
    );
    println!("{}: {}", "Granted patents".bold(), workbook.granted_patents.len());
    println!("{}: {}", "Image entries".bold(), workbook.images.len());

    println!();
    println!("{}", "Categories".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (name, fp, gp) in &counts {
        println!("{}: {} FP, {} GP", name.bold(), fp, gp);
    }

    println!();
    println!("{}", "Page Estimate".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "First publication details".bold(), fp_pages);
    println!("{}: {}", "Granted patent details".bold(), gp_pages);

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    compact: bool,
    records: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let watch = PatentWatch::with_config(load_config(config)?).with_images(false);
    let workbook = watch.read(input)?;

    let json = if records {
        patwatch::render::to_json(&workbook, format)?
    } else {
        let report = watch.build(&workbook)?;
        patwatch::render::to_json(&report, format)?
    };

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_config(output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let toml = ReportConfig::default().to_toml()?;

    if let Some(path) = output {
        fs::write(path, &toml)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", toml);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "patwatch".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Library version: {}", patwatch::VERSION);
}
