//! prosemark CLI - restructure plain prose into consistently styled output

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use prosemark::model::LineType;
use prosemark::{
    parse_file_with_options, process_files_with_progress, process_text_with_options,
    CleanupPreset, Document, FormatOptions, JsonFormat, NumberingPolicy, ParseOptions,
    RenderOptions,
};

#[derive(Parser)]
#[command(name = "prosemark")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Restructure plain prose into Markdown, text, and JSON", long_about = None)]
struct Cli {
    /// Input text file ("-" for stdin)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct ProcessArgs {
    /// Text cleanup preset
    #[arg(long, value_enum, env = "PROSEMARK_CLEANUP")]
    cleanup: Option<CleanupLevel>,

    /// Heading numbering policy
    #[arg(long, value_enum, env = "PROSEMARK_NUMBERING")]
    numbering: Option<Numbering>,

    /// Do not insert page breaks before structural headings
    #[arg(long)]
    no_page_breaks: bool,

    /// Formatting options record (JSON file)
    #[arg(long, value_name = "JSON", env = "PROSEMARK_OPTIONS")]
    options: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Format text as Markdown
    #[command(alias = "md")]
    Format {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Include a table of contents
        #[arg(long)]
        toc: bool,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Format text as plain text
    Text {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include a table of contents
        #[arg(long)]
        toc: bool,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Output the section tree (or the styled block stream) as JSON
    Json {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output the styled block stream instead of the section tree
        #[arg(long)]
        layout: bool,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Show how each line was classified
    Analyze {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only show lines of this type
        #[arg(long = "type", value_name = "TYPE")]
        line_type: Option<String>,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Show the heading outline
    Outline {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Show document statistics
    Info {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Format many files in parallel
    Batch {
        /// Input text files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "prosemark_output")]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "markdown")]
        format: BatchFormat,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// No cleanup at all
    None,
    /// Minimal cleanup (line endings, BOM, Unicode normalization)
    Minimal,
    /// Standard cleanup (default)
    Standard,
    /// Aggressive cleanup (also joins hyphenated line breaks)
    Aggressive,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Numbering {
    /// Number headings only when none are numbered
    Auto,
    /// Always number unnumbered headings
    Always,
    /// Never add numbers
    Never,
}

impl From<Numbering> for NumberingPolicy {
    fn from(numbering: Numbering) -> Self {
        match numbering {
            Numbering::Auto => NumberingPolicy::Auto,
            Numbering::Always => NumberingPolicy::Always,
            Numbering::Never => NumberingPolicy::Never,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum BatchFormat {
    /// Markdown (.md)
    Markdown,
    /// Plain text (.txt)
    Text,
    /// JSON section tree (.json)
    Json,
}

impl BatchFormat {
    fn extension(self) -> &'static str {
        match self {
            BatchFormat::Markdown => "md",
            BatchFormat::Text => "txt",
            BatchFormat::Json => "json",
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Some(Commands::Format {
            input,
            output,
            frontmatter,
            toc,
            process,
        }) => cmd_format(&input, output.as_deref(), frontmatter, toc, &process),
        Some(Commands::Text {
            input,
            output,
            toc,
            process,
        }) => cmd_text(&input, output.as_deref(), toc, &process),
        Some(Commands::Json {
            input,
            output,
            compact,
            layout,
            process,
        }) => cmd_json(&input, output.as_deref(), compact, layout, &process),
        Some(Commands::Analyze {
            input,
            line_type,
            process,
        }) => cmd_analyze(&input, line_type.as_deref(), &process),
        Some(Commands::Outline { input, process }) => cmd_outline(&input, &process),
        Some(Commands::Info { input, process }) => cmd_info(&input, &process),
        Some(Commands::Batch {
            inputs,
            output,
            format,
            process,
        }) => cmd_batch(&inputs, &output, format, &process),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                let process = ProcessArgs {
                    cleanup: None,
                    numbering: None,
                    no_page_breaks: false,
                    options: None,
                };
                cmd_format(&input, None, false, false, &process)
            } else {
                println!("{}", "Usage: prosemark <FILE>".yellow());
                println!("       prosemark --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Build processing and render options from the command line.
fn build_options(
    args: &ProcessArgs,
) -> Result<(ParseOptions, RenderOptions), Box<dyn std::error::Error>> {
    let mut parse = ParseOptions::new();
    let mut render = RenderOptions::new();

    if let Some(path) = &args.options {
        let record = FormatOptions::from_json(&fs::read_to_string(path)?)?;
        (parse, render) = record.apply(parse, render)?;
    }

    parse = match args.cleanup {
        Some(CleanupLevel::None) => parse.without_cleanup(),
        Some(CleanupLevel::Minimal) => parse.with_cleanup(CleanupPreset::Minimal),
        Some(CleanupLevel::Standard) => parse.with_cleanup(CleanupPreset::Standard),
        Some(CleanupLevel::Aggressive) => parse.with_cleanup(CleanupPreset::Aggressive),
        None => parse,
    };
    if let Some(numbering) = args.numbering {
        parse = parse.with_numbering(numbering.into());
    }
    if args.no_page_breaks {
        parse = parse.with_page_breaks(false);
    }

    log::debug!(
        "options: cleanup={:?} numbering={:?} page_breaks={}",
        parse.cleanup,
        parse.numbering,
        parse.page_breaks
    );
    Ok((parse, render))
}

fn load(input: &Path, options: ParseOptions) -> Result<Document, Box<dyn std::error::Error>> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(process_text_with_options(&text, options.with_source("<stdin>")))
    } else {
        Ok(parse_file_with_options(input, options)?)
    }
}

fn emit(content: &str, output: Option<&Path>) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}

fn cmd_format(
    input: &Path,
    output: Option<&Path>,
    frontmatter: bool,
    toc: bool,
    process: &ProcessArgs,
) -> CliResult {
    let (parse, mut render) = build_options(process)?;
    render = render.with_frontmatter(frontmatter);
    if toc {
        render = render.with_toc(true);
    }
    let doc = load(input, parse)?;
    let markdown = prosemark::render::to_markdown(&doc, &render)?;
    emit(&markdown, output)
}

fn cmd_text(input: &Path, output: Option<&Path>, toc: bool, process: &ProcessArgs) -> CliResult {
    let (parse, mut render) = build_options(process)?;
    if toc {
        render = render.with_toc(true);
    }
    let doc = load(input, parse)?;
    let text = prosemark::render::to_text(&doc, &render)?;
    emit(&text, output)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    layout: bool,
    process: &ProcessArgs,
) -> CliResult {
    let (parse, render) = build_options(process)?;
    let doc = load(input, parse)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let mut json = if layout {
        let rendered = prosemark::render::render_document(&doc, &render);
        prosemark::render::layout_to_json(&rendered, format)?
    } else {
        prosemark::render::to_json(&doc, format)?
    };
    json.push('\n');
    emit(&json, output)
}

fn cmd_analyze(input: &Path, line_type: Option<&str>, process: &ProcessArgs) -> CliResult {
    let (parse, _) = build_options(process)?;
    let doc = load(input, parse)?;

    for line in &doc.lines {
        let kind = line.line_type();
        if line_type.is_some_and(|t| !t.eq_ignore_ascii_case(kind.as_str())) {
            continue;
        }
        let label = format!("{:<20}", kind.as_str());
        let label = match kind {
            LineType::Heading | LineType::NumberedHeading => label.cyan().bold(),
            LineType::BulletListItem | LineType::NumberedListItem | LineType::LetteredListItem => {
                label.green()
            }
            LineType::TableRow => label.magenta(),
            LineType::PageBreak | LineType::SectionBreak => label.yellow(),
            LineType::Blank => label.dimmed(),
            _ => label.normal(),
        };
        let number = line
            .class
            .number()
            .map(|n| format!("[{}] ", n.raw))
            .unwrap_or_default();
        println!(
            "{:>5} {} {:.2} {:<16} {}{}",
            line.index + 1,
            label,
            line.confidence,
            line.rule.dimmed(),
            number.yellow(),
            line.text
        );
    }

    Ok(())
}

fn cmd_outline(input: &Path, process: &ProcessArgs) -> CliResult {
    let (parse, _) = build_options(process)?;
    let doc = load(input, parse)?;

    let outline = doc.root.outline();
    if outline.is_empty() {
        println!("{}", "No headings found".yellow());
        return Ok(());
    }
    for entry in outline {
        let indent = "  ".repeat(entry.depth.saturating_sub(1) as usize);
        if entry.depth == 1 {
            println!("{}{}", indent, entry.title.bold());
        } else {
            println!("{}{}", indent, entry.title);
        }
    }
    Ok(())
}

fn cmd_info(input: &Path, process: &ProcessArgs) -> CliResult {
    let (parse, _) = build_options(process)?;
    let doc = load(input, parse)?;
    let meta = &doc.metadata;
    let stats = &doc.stats;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(title) = doc.title() {
        println!("{}: {}", "Title".bold(), title);
    }
    println!("{}: {}", "Lines".bold(), meta.line_count);
    println!("{}: {}", "Words".bold(), meta.word_count);
    println!(
        "{}: {} ({})",
        "Short document".bold(),
        if meta.is_short { "Yes" } else { "No" },
        meta.short_reason
    );
    println!(
        "{}: {}",
        "Numbering".bold(),
        if meta.numbering_synthesized {
            "synthesized"
        } else {
            "as in source"
        }
    );

    println!();
    println!("{}", "Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Sections".bold(), stats.section_count);
    println!(
        "{}: {} existing, {} synthesized",
        "Heading numbers".bold(),
        stats.existing_numbers,
        stats.synthesized_numbers
    );
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!(
        "{}: {} retained, {} collapsed",
        "Lists".bold(),
        stats.lists_retained,
        stats.lists_collapsed
    );
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!(
        "{}: {} forced, {} explicit, {} suppressed",
        "Page breaks".bold(),
        stats.forced_page_breaks,
        stats.explicit_page_breaks,
        stats.suppressed_page_breaks
    );

    println!();
    println!("{}", "Line Types".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (line_type, count) in &stats.line_types {
        println!("{:<20} {}", line_type.as_str(), count);
    }

    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output: &Path,
    format: BatchFormat,
    process: &ProcessArgs,
) -> CliResult {
    let (parse, render) = build_options(process)?;
    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Processing...");
    let results = process_files_with_progress(inputs, &parse, |_| pb.inc(1));
    pb.finish_with_message("Done!");

    let mut failed = 0;
    for (path, result) in results {
        let stem = path.file_stem().unwrap_or_default().to_string_lossy();
        let target = output.join(format!("{}.{}", stem, format.extension()));
        let written = result.map_err(|e| e.to_string()).and_then(|doc| {
            let content = match format {
                BatchFormat::Markdown => prosemark::render::to_markdown(&doc, &render),
                BatchFormat::Text => prosemark::render::to_text(&doc, &render),
                BatchFormat::Json => prosemark::render::to_json(&doc, JsonFormat::Pretty),
            }
            .map_err(|e| e.to_string())?;
            fs::write(&target, content).map_err(|e| e.to_string())
        });
        match written {
            Ok(()) => println!("  {} {}", "├─".dimmed(), target.display()),
            Err(e) => {
                failed += 1;
                eprintln!("  {} {}: {}", "✗".red(), path.display(), e);
            }
        }
    }

    let done = inputs.len() - failed;
    println!(
        "\n{} {} of {} files formatted",
        "Done!".green().bold(),
        done,
        inputs.len()
    );
    if failed > 0 {
        return Err(format!("{} files failed", failed).into());
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "prosemark".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Structure inference for unstructured prose");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/prosemark".dimmed());
    println!("License: MIT");
}
