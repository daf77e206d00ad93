//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use mtextstrip_core::{Batch, FormatSelection, ProgressReporter, StripReport};
use mtextstrip_markup::{CodeSet, list_categories};
use mtextstrip_shared::{
    AppConfig, Drawing, config_file_path, load_config_or_default, save_config_to,
};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// mtextstrip: strip inline formatting codes from drawing text.
#[derive(Parser)]
#[command(
    name = "mtextstrip",
    version,
    about = "Strip inline formatting codes from the text entities of a drawing.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.mtextstrip/mtextstrip.toml.
    #[arg(long, global = true, env = "MTEXTSTRIP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Strip formatting from the text entities of a drawing.
    Strip {
        /// Drawing document (JSON).
        drawing: PathBuf,

        /// Format codes to strip, e.g. "CFH". Defaults to the saved selection.
        #[arg(short, long)]
        formats: Option<String>,

        /// Only these entity handles (comma-separated). Defaults to every entity.
        #[arg(long)]
        handles: Option<String>,

        /// Write the result here instead of over the input.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Run the strip but do not write anything.
        #[arg(long)]
        dry_run: bool,

        /// Save the formats used as the new default selection.
        #[arg(long)]
        remember: bool,
    },

    /// Strip formatting from a single string and print the result.
    Text {
        /// Raw formatted text.
        text: String,

        /// Format codes to strip.
        #[arg(short, long)]
        formats: String,
    },

    /// List the format categories and the saved selection.
    Formats,

    /// Save exactly these format codes as the default selection.
    Select {
        /// Format codes, e.g. "CFHSU".
        codes: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "mtextstrip=info",
        1 => "mtextstrip=debug",
        _ => "mtextstrip=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => config_file_path()?,
    };

    match cli.command {
        Command::Strip {
            drawing,
            formats,
            handles,
            out,
            dry_run,
            remember,
        } => cmd_strip(&config_path, StripArgs {
            drawing,
            formats,
            handles,
            out,
            dry_run,
            remember,
        }),
        Command::Text { text, formats } => cmd_text(&text, &formats),
        Command::Formats => cmd_formats(&config_path),
        Command::Select { codes } => cmd_select(&config_path, &codes),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(&config_path),
            ConfigAction::Show => cmd_config_show(&config_path),
        },
    }
}

// ---------------------------------------------------------------------------
// strip
// ---------------------------------------------------------------------------

struct StripArgs {
    drawing: PathBuf,
    formats: Option<String>,
    handles: Option<String>,
    out: Option<PathBuf>,
    dry_run: bool,
    remember: bool,
}

fn cmd_strip(config_path: &Path, args: StripArgs) -> Result<()> {
    let mut config = load_config_or_default(config_path)?;

    let (codes, unknown) = match args.formats.as_deref() {
        Some(list) => CodeSet::parse(list),
        None => (FormatSelection::load(&config).codes(), Vec::new()),
    };
    report_unknown(&unknown);

    if args.remember {
        FormatSelection::from_codes(&codes).save(&mut config);
        save_config_to(&config, config_path)?;
        info!(codes = %codes, "saved format selection");
    }

    if codes.is_empty() {
        println!("No format categories selected; nothing to strip.");
        return Ok(());
    }

    let mut drawing = Drawing::load(&args.drawing)?;
    let handles = args.handles.as_deref().map(parse_handles);

    info!(
        drawing = %args.drawing.display(),
        codes = %codes,
        "stripping formatting"
    );

    let (mut report, missing) = {
        let mut batch = Batch::from_drawing(&mut drawing, handles.as_deref());
        let missing = batch.missing_handles().to_vec();

        if batch.is_empty() {
            println!("No text entities selected; drawing left untouched.");
            return Ok(());
        }

        let reporter = CliProgress::new();
        let report = mtextstrip_core::run(&mut batch, &codes, &reporter).map_err(|e| {
            eyre!(
                "strip aborted, {} left untouched: {e}",
                args.drawing.display()
            )
        })?;
        (report, missing)
    };
    report.unknown_codes = unknown;

    let target = args.out.as_deref().unwrap_or(args.drawing.as_path());
    if args.dry_run {
        info!("dry run, not writing");
    } else {
        if config.defaults.backup && target.exists() {
            let backup = backup_path(target);
            std::fs::copy(target, &backup)
                .map_err(|e| eyre!("failed to back up {}: {e}", target.display()))?;
            info!(backup = %backup.display(), "wrote backup");
        }
        drawing.save(target, config.defaults.pretty_output)?;
    }

    print_summary(&report, &codes, &missing, (!args.dry_run).then_some(target));
    Ok(())
}

/// Split a comma-separated handle list, dropping blanks and duplicates.
fn parse_handles(list: &str) -> Vec<String> {
    let mut handles: Vec<String> = Vec::new();
    for handle in list.split(',').map(str::trim).filter(|h| !h.is_empty()) {
        if !handles.iter().any(|h| h == handle) {
            handles.push(handle.to_string());
        }
    }
    handles
}

/// `drawing.json` backs up to `drawing.json.bak`.
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

fn report_unknown(unknown: &[char]) {
    if !unknown.is_empty() {
        let list: String = unknown.iter().collect();
        warn!(codes = %list, "ignoring unknown format codes");
    }
}

/// Field link outcome, when the run touched field links at all.
fn field_link_line(report: &StripReport) -> Option<String> {
    if report.field_links_clear + report.field_links_locked == 0 {
        return None;
    }
    Some(format!(
        "{} slots free of links, {} locked",
        report.field_links_clear, report.field_links_locked
    ))
}

fn print_summary(report: &StripReport, codes: &CodeSet, missing: &[String], written: Option<&Path>) {
    println!();
    println!("  Formatting stripped ({codes})");
    println!("  Containers:     {}", report.containers);
    println!(
        "  Texts changed:  {} of {}",
        report.texts_changed, report.texts_rewritten
    );
    if let Some(line) = field_link_line(report) {
        println!("  Field links:    {line}");
    }
    if report.masks_cleared > 0 {
        println!("  Masks cleared:  {}", report.masks_cleared);
    }
    if report.columns_removed > 0 {
        println!("  Columns:        {} removed", report.columns_removed);
    }
    if !report.unknown_codes.is_empty() {
        let list: String = report.unknown_codes.iter().collect();
        println!("  Unknown codes:  {list}");
    }
    if !missing.is_empty() {
        println!("  Not found:      {}", missing.join(", "));
    }
    match written {
        Some(path) => println!("  Written:        {}", path.display()),
        None => println!("  Dry run, nothing written"),
    }
    println!("  Time:           {:.2}s", report.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif bar per phase.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str, total: usize) {
        self.bar.reset();
        self.bar.set_length(total as u64);
        self.bar.set_message(name.to_string());
    }

    fn container_done(&self, _handle: &str, current: usize, _total: usize) {
        self.bar.set_position(current as u64);
    }

    fn done(&self, _report: &StripReport) {
        self.bar.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// text, formats, select
// ---------------------------------------------------------------------------

fn cmd_text(text: &str, formats: &str) -> Result<()> {
    let (codes, unknown) = CodeSet::parse(formats);
    report_unknown(&unknown);
    println!("{}", mtextstrip_markup::strip(text, &codes));
    Ok(())
}

fn cmd_formats(config_path: &Path) -> Result<()> {
    let config = load_config_or_default(config_path)?;
    let selection = FormatSelection::load(&config);

    for category in list_categories() {
        let mark = if selection.is_selected(category.code) {
            "x"
        } else {
            " "
        };
        println!(
            "  [{mark}] {}  {:<20} {}",
            category.code, category.display_name, category.description
        );
    }
    Ok(())
}

fn cmd_select(config_path: &Path, list: &str) -> Result<()> {
    let (codes, unknown) = CodeSet::parse(list);
    report_unknown(&unknown);

    let mut config = load_config_or_default(config_path)?;
    FormatSelection::from_codes(&codes).save(&mut config);
    save_config_to(&config, config_path)?;

    println!("Selection saved: {codes}");
    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init(config_path: &Path) -> Result<()> {
    save_config_to(&AppConfig::default(), config_path)?;
    println!("Config initialized at: {}", config_path.display());
    Ok(())
}

fn cmd_config_show(config_path: &Path) -> Result<()> {
    let config = load_config_or_default(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
