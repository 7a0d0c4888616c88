#![allow(
    clippy::needless_pass_by_value, // clap hands over owned paths
    clippy::cast_precision_loss,    // byte counts are formatted for display
)]

//! ppr - product potential report generator
//!
//! Fills presentation templates and lays out printable reports from a
//! business-plan record saved by the report wizard.

mod config;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use ppr_core::{
    flatten, report_file_name, token_for, BusinessPlanRecord, PatentDraftRecord, RenderRequest,
    TEMPLATE_KEYS,
};
use ppr_layout::{
    layout_filing_receipt, layout_patent_application, layout_report, to_pdf, LayoutConfig,
    PaginatedDocument, APPLICATION_FILE_NAME, DEFAULT_DATE_FORMAT, RECEIPT_FILE_NAME,
};
use ppr_template::{render_archive_with, render_request, scan_template, TokenMatcher};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{validate_date_format, Config};

/// Format bytes as human-readable size (e.g., "1.5 KB")
fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "ppr",
    about = "Generate product potential reports",
    long_about = "Generate product potential reports from a business-plan record.\n\
                  \n\
                  Fills {{key}} tokens in presentation templates (.pptx) and lays out\n\
                  printable PDF reports, patent application drafts and filing receipts.",
    version
)]
struct Args {
    /// Suppress status output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log more detail (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Use this configuration file instead of ~/.ppr.toml and ./.ppr.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every template token the flattener produces
    Keys,

    /// Print the flat variable map of a record as JSON
    Flatten {
        /// Business-plan record (JSON)
        record: PathBuf,

        /// Write the map to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fill a presentation template with a record
    Pptx {
        /// Business-plan record (JSON)
        record: PathBuf,

        /// Template archive (defaults to [archive] template in .ppr.toml)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output file (defaults to <project>_PPR.pptx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Lay out the printable PDF report for a record
    Pdf {
        /// Business-plan record (JSON)
        record: PathBuf,

        /// Output file (defaults to <project>_PPR.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Cover date format (defaults to [report] date_format or %d/%m/%Y)
        #[arg(long, value_name = "FORMAT")]
        date_format: Option<String>,
    },

    /// Render an HTML preview from a request body
    Html {
        /// HTML template
        template: PathBuf,

        /// Request body: {"data": {...}, "outputName": "..."}
        request: PathBuf,

        /// Output file (defaults to <outputName>.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the tokens a template expects and flag unknown ones
    Check {
        /// Template archive
        template: PathBuf,

        /// Fail if the template uses a key the flattener does not produce
        #[arg(long)]
        strict: bool,
    },

    /// Lay out a patent application draft or its filing receipt
    Patent {
        /// Patent draft (JSON)
        draft: PathBuf,

        /// Render the filing receipt instead of the application
        #[arg(long)]
        receipt: bool,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Status lines go to stderr so stdout stays machine readable
struct Reporter {
    quiet: bool,
}

impl Reporter {
    fn wrote(&self, path: &Path, bytes: usize, detail: &str) {
        if !self.quiet {
            eprintln!(
                "{} Wrote {} ({}{detail})",
                "✓".green().bold(),
                path.display(),
                format_bytes(bytes)
            );
        }
    }

    fn warn(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {message}", "Warning:".yellow().bold());
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    // RUST_LOG wins over the flags
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .try_init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::discover(),
    };
    let reporter = Reporter { quiet: args.quiet };

    match args.command {
        Commands::Keys => {
            for key in TEMPLATE_KEYS {
                println!("{}", token_for(key));
            }
            Ok(())
        }
        Commands::Flatten { record, output } => flatten_command(&record, output, &reporter),
        Commands::Pptx {
            record,
            template,
            output,
        } => pptx_command(&record, template, output, &config, &reporter),
        Commands::Pdf {
            record,
            output,
            date_format,
        } => pdf_command(&record, output, date_format, &config, &reporter),
        Commands::Html {
            template,
            request,
            output,
        } => html_command(&template, &request, output, &config, &reporter),
        Commands::Check { template, strict } => check_command(&template, strict),
        Commands::Patent {
            draft,
            receipt,
            output,
        } => patent_command(&draft, receipt, output, &config, &reporter),
    }
}

fn read_record(path: &Path) -> Result<BusinessPlanRecord> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read record: {}", path.display()))?;
    BusinessPlanRecord::from_json(&json)
        .with_context(|| format!("Invalid business-plan record: {}", path.display()))
}

/// `-o` wins, then `[output] dir` joined with the derived name, then the
/// derived name in the working directory
fn output_path(explicit: Option<PathBuf>, config: &Config, file_name: &str) -> PathBuf {
    explicit.unwrap_or_else(|| match config.output_dir() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    })
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write: {}", path.display()))
}

fn flatten_command(record: &Path, output: Option<PathBuf>, reporter: &Reporter) -> Result<()> {
    let vars = flatten(&read_record(record)?);
    let json = serde_json::to_string_pretty(&vars).context("Failed to serialise variables")?;
    match output {
        Some(path) => {
            write_output(&path, json.as_bytes())?;
            reporter.wrote(&path, json.len(), &format!(", {} keys", vars.len()));
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn pptx_command(
    record: &Path,
    template: Option<PathBuf>,
    output: Option<PathBuf>,
    config: &Config,
    reporter: &Reporter,
) -> Result<()> {
    let Some(template) = template.or_else(|| config.template().map(Path::to_path_buf)) else {
        bail!("No template given: pass --template or set [archive] template in .ppr.toml");
    };
    let record = read_record(record)?;
    let vars = flatten(&record);
    let bytes = fs::read(&template)
        .with_context(|| format!("Failed to read template: {}", template.display()))?;

    let rendered = render_archive_with(&bytes, &TokenMatcher::new(&vars))
        .with_context(|| format!("Failed to fill template: {}", template.display()))?;
    let path = output_path(output, config, &report_file_name(&record.project_name, "pptx"));
    write_output(&path, &rendered.bytes)?;
    reporter.wrote(
        &path,
        rendered.bytes.len(),
        &format!(
            ", {} tokens in {} parts",
            rendered.replacements(),
            rendered.rewritten_parts().count()
        ),
    );
    Ok(())
}

fn pdf_command(
    record: &Path,
    output: Option<PathBuf>,
    date_format: Option<String>,
    config: &Config,
    reporter: &Reporter,
) -> Result<()> {
    let format = date_format
        .as_deref()
        .or_else(|| config.date_format())
        .unwrap_or(DEFAULT_DATE_FORMAT);
    validate_date_format(format)?;
    let date = chrono::Local::now().format(format).to_string();

    let record = read_record(record)?;
    let vars = flatten(&record);
    let document = layout_report(&record, &vars, &LayoutConfig::default(), &date)?;
    let path = output_path(output, config, &report_file_name(&record.project_name, "pdf"));
    emit(&document, &path, reporter)
}

fn emit(document: &PaginatedDocument, path: &Path, reporter: &Reporter) -> Result<()> {
    for warning in &document.warnings {
        reporter.warn(&warning.to_string());
    }
    let pdf = to_pdf(document)?;
    write_output(path, &pdf)?;
    reporter.wrote(path, pdf.len(), &format!(", {} pages", document.page_count()));
    Ok(())
}

fn html_command(
    template: &Path,
    request: &Path,
    output: Option<PathBuf>,
    config: &Config,
    reporter: &Reporter,
) -> Result<()> {
    let markup = fs::read_to_string(template)
        .with_context(|| format!("Failed to read template: {}", template.display()))?;
    let body = fs::read_to_string(request)
        .with_context(|| format!("Failed to read request: {}", request.display()))?;
    let request = RenderRequest::from_json(&body)
        .with_context(|| format!("Rejected request: {}", request.display()))?;

    let preview = render_request(&markup, &request);
    let path = output_path(output, config, &preview.file_name);
    write_output(&path, preview.html.as_bytes())?;
    reporter.wrote(&path, preview.html.len(), "");
    Ok(())
}

fn check_command(template: &Path, strict: bool) -> Result<()> {
    let bytes = fs::read(template)
        .with_context(|| format!("Failed to read template: {}", template.display()))?;
    let scan = scan_template(&bytes)
        .with_context(|| format!("Failed to scan template: {}", template.display()))?;

    for site in &scan.tokens {
        let token = token_for(&site.key);
        if site.known {
            println!("{}\t{}", site.part, token);
        } else {
            println!("{}\t{} {}", site.part, token.yellow(), "(unknown)".yellow());
        }
    }
    let unknown = scan.unknown().count();
    println!(
        "{} tokens in {} parts, {} unknown, {} catalogue keys unused",
        scan.tokens.len(),
        scan.parts_scanned,
        unknown,
        scan.unused_keys().len()
    );
    if strict && unknown > 0 {
        bail!("{unknown} unknown tokens in {}", template.display());
    }
    Ok(())
}

fn patent_command(
    draft: &Path,
    receipt: bool,
    output: Option<PathBuf>,
    config: &Config,
    reporter: &Reporter,
) -> Result<()> {
    let json = fs::read_to_string(draft)
        .with_context(|| format!("Failed to read draft: {}", draft.display()))?;
    let draft = PatentDraftRecord::from_json(&json)
        .with_context(|| format!("Invalid patent draft: {}", draft.display()))?;

    let portrait = LayoutConfig::portrait();
    let (document, file_name) = if receipt {
        let format = config.date_format().unwrap_or(DEFAULT_DATE_FORMAT);
        let date = chrono::Local::now().format(format).to_string();
        (
            layout_filing_receipt(&draft.filing_details, &portrait, &date)?,
            RECEIPT_FILE_NAME,
        )
    } else {
        (
            layout_patent_application(&draft, &portrait)?,
            APPLICATION_FILE_NAME,
        )
    };
    emit(&document, &output_path(output, config, file_name), reporter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(12), "12 bytes");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_output_path_precedence() {
        let config = Config::parse("[output]\ndir = \"out\"").unwrap();
        assert_eq!(
            output_path(Some(PathBuf::from("x.pdf")), &config, "Trakker_PPR.pdf"),
            PathBuf::from("x.pdf")
        );
        assert_eq!(
            output_path(None, &config, "Trakker_PPR.pdf"),
            Path::new("out").join("Trakker_PPR.pdf")
        );
        assert_eq!(
            output_path(None, &Config::default(), "Trakker_PPR.pdf"),
            PathBuf::from("Trakker_PPR.pdf")
        );
    }

    #[test]
    fn test_verbose_counts() {
        let args = Args::try_parse_from(["ppr", "-vv", "keys"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(Args::try_parse_from(["ppr", "-q", "-v", "keys"]).is_err());
    }
}
