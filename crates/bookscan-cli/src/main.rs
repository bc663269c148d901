use std::io::Write;
use std::path::{Path, PathBuf};

use bookscan_core::config_file;
use bookscan_core::{
    BookFormat, BookType, NarrativeType, OcrDocument, ScanConfigBuilder, Scanner, TitleComponents,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

/// Book scanner - Recover ISBNs, editions and condition notes from OCR text
/// and build marketplace listing titles
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan an OCR result (JSON pages/lines, or plain .txt) for ISBN, edition and flaws
    Scan {
        /// Path to the OCR document
        file_path: PathBuf,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file (default: platform config dir, then ./.bookscan.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Reject ISBN candidates whose check digit does not verify
        #[arg(long)]
        verify_checksum: bool,
    },

    /// Build a listing title from book metadata
    Title {
        /// Main title
        #[arg(long)]
        title: String,

        /// Author(s) as supplied by the metadata provider
        #[arg(long)]
        author: String,

        /// Subtitle, kept only for short main titles
        #[arg(long)]
        subtitle: Option<String>,

        /// Edition, e.g. "3rd Edition"
        #[arg(long)]
        edition: Option<String>,

        /// Binding label, e.g. "Hardcover" or "Mass Market Paperback"
        #[arg(long, default_value = "Paperback")]
        binding: String,

        /// book, cookbook or textbook
        #[arg(long, default_value = "book")]
        book_type: BookType,

        /// fiction, non-fiction or unknown
        #[arg(long, default_value = "unknown")]
        narrative: NarrativeType,

        /// Compound keyword phrase from the classifier
        #[arg(long)]
        keyword: Option<String>,

        /// OCR document to take the edition from when --edition is absent
        #[arg(long)]
        ocr: Option<PathBuf>,

        /// Emit the title as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Config file (default: platform config dir, then ./.bookscan.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the title budget in characters
        #[arg(long)]
        budget: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan {
            file_path,
            json,
            no_color,
            output,
            config,
            verify_checksum,
        } => {
            let mut builder = config_builder(config.as_deref())?;
            if verify_checksum {
                builder = builder.verify_isbn_checksum(true);
            }
            scan(&file_path, builder, json, no_color, output)
        }
        Command::Title {
            title,
            author,
            subtitle,
            edition,
            binding,
            book_type,
            narrative,
            keyword,
            ocr,
            json,
            no_color,
            config,
            budget,
        } => {
            let mut builder = config_builder(config.as_deref())?;
            if let Some(budget) = budget {
                builder = builder.title_budget(budget);
            }
            let components = TitleComponents {
                main_title: title,
                subtitle,
                author,
                edition,
                format: BookFormat::from_binding(&binding),
                book_type,
                keyword,
                narrative,
            };
            build_title(components, builder, ocr.as_deref(), json, no_color)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve configuration: explicit --config file, else the platform/CWD cascade.
fn config_builder(path: Option<&Path>) -> anyhow::Result<ScanConfigBuilder> {
    let file = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            tracing::debug!(path = %path.display(), "using explicit config file");
            config_file::load_from_path(path)?
        }
        None => config_file::load_config(),
    };
    Ok(file.to_builder())
}

fn read_document(path: &Path) -> anyhow::Result<OcrDocument> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let content = std::fs::read_to_string(path)?;

    let is_txt = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("txt"))
        .unwrap_or(false);

    if is_txt {
        Ok(OcrDocument::from_plain_text(&content))
    } else {
        OcrDocument::from_json(&content)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }
}

fn scan(
    file_path: &Path,
    builder: ScanConfigBuilder,
    json: bool,
    no_color: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let scanner = Scanner::with_config(builder.build()?);
    let document = read_document(file_path)?;
    let report = scanner.scan(&document);

    let color = ColorMode(!no_color && !json && output.is_none());
    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    if json {
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
    } else {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.display().to_string());
        output::print_scan_report(&mut writer, &file_name, &report, color)?;
    }
    writer.flush()?;
    Ok(())
}

fn build_title(
    mut components: TitleComponents,
    builder: ScanConfigBuilder,
    ocr: Option<&Path>,
    json: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    let scanner = Scanner::with_config(builder.build()?);

    if let Some(path) = ocr {
        let report = scanner.scan(&read_document(path)?);
        report.fill_edition(&mut components);
    }

    let title = scanner.synthesize_title(&components);
    let budget = scanner.config().title_budget();
    let mut stdout = std::io::stdout();

    if json {
        let value = serde_json::json!({
            "title": title,
            "chars": title.chars().count(),
            "budget": budget,
            "components": components,
        });
        serde_json::to_writer_pretty(&mut stdout, &value)?;
        writeln!(stdout)?;
    } else {
        output::print_title(&mut stdout, &title, budget, ColorMode(!no_color))?;
    }
    Ok(())
}
