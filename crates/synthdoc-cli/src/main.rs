//! synthdoc CLI - Inspect research synthesis reports
//!
//! Usage:
//!   synthdoc [OPTIONS] <COMMAND> [FILE]
//!
//! Commands:
//!   parse     Parse and display document structure
//!   stats     Show document statistics
//!   plain     Print the report without inline markers
//!   filename  Print the export file name of a report payload

mod report;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use synthdoc_core::{parse, Block, Document, LineRange, Span};
use tracing::debug;

use report::{ExportFormat, ResearchReport};

#[derive(Parser, Debug)]
#[command(name = "synthdoc")]
#[command(about = "Parse research synthesis reports into a document model")]
#[command(version)]
struct Cli {
    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Treat input as a research report JSON payload instead of markdown
    #[arg(short, long, global = true)]
    report: bool,

    /// Show detailed structure and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and display document structure
    Parse {
        /// Input file, `-` or omitted for stdin
        file: Option<PathBuf>,
    },
    /// Show document statistics
    Stats { file: Option<PathBuf> },
    /// Print the report without inline markers
    Plain { file: Option<PathBuf> },
    /// Print the export file name of a report payload
    Filename {
        #[arg(long, value_enum, default_value_t = ExportFormat::Pdf)]
        ext: ExportFormat,
        file: Option<PathBuf>,
    },
}

impl Command {
    fn file(&self) -> Option<&Path> {
        match self {
            Command::Parse { file }
            | Command::Stats { file }
            | Command::Plain { file }
            | Command::Filename { file, .. } => file.as_deref(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let input = read_input(cli.command.file())?;

    let report = if cli.report {
        Some(ResearchReport::from_json(&input)?)
    } else {
        None
    };

    let (title, doc) = match &report {
        Some(r) => {
            debug!(
                query = %r.query,
                subagents = r.subagents,
                sources = r.total_sources,
                "decoded report payload"
            );
            (Some(r.query.as_str()), r.document())
        }
        None => (None, parse(&input)),
    };

    match &cli.command {
        Command::Parse { .. } => cmd_parse(cli, title, &doc),
        Command::Stats { .. } => cmd_stats(cli, &doc, report.as_ref()),
        Command::Plain { .. } => cmd_plain(title, &doc),
        Command::Filename { ext, .. } => match &report {
            Some(r) => {
                println!("{}", r.file_name(*ext));
                Ok(())
            }
            None => bail!("`filename` needs a report payload; pass --report"),
        },
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p)
            .with_context(|| format!("failed to read '{}'", p.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

// =============================================================================
// Parse Command
// =============================================================================

fn cmd_parse(cli: &Cli, title: Option<&str>, doc: &Document) -> Result<()> {
    if cli.json {
        let json = convert_document(title, doc);
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else if cli.verbose {
        print_document_verbose(title, doc);
    } else {
        print_document_summary(title, doc);
    }
    Ok(())
}

// =============================================================================
// Stats Command
// =============================================================================

fn cmd_stats(cli: &Cli, doc: &Document, report: Option<&ResearchReport>) -> Result<()> {
    let stats = DocumentStats::from_document(doc);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Document Statistics");
    println!("-------------------");
    if let Some(r) = report {
        println!("Query:          {}", r.query);
        if let Some(model) = &r.model {
            println!("Model:          {}", model);
        }
        println!("Subagents:      {}", r.subagents);
        println!("Sources:        {}", r.total_sources);
        println!("Listed sources: {}", r.sources().count());
        if let Some(c) = &r.complexity_analysis {
            println!(
                "Complexity:     {} ({} subagents planned, ~{} sources)",
                c.complexity_score, c.num_subagents, c.estimated_sources
            );
            if !c.explanation.is_empty() {
                println!("  {}", c.explanation);
            }
        }
        for line in subagent_lines(r, cli.verbose) {
            println!("{}", line);
        }
        println!();
    }
    println!("Content:");
    println!("  Total blocks:   {}", stats.total_blocks);
    println!("  Headings:       {}", stats.headings);
    println!("  Paragraphs:     {}", stats.paragraphs);
    println!("  Bullet items:   {}", stats.bullet_items);
    println!("  Numbered items: {}", stats.numbered_items);
    println!("  Tables:         {}", stats.tables);
    println!("  Table rows:     {}", stats.table_rows);
    println!("  Rules:          {}", stats.rules);
    println!();
    println!("Inline:");
    println!("  Bold spans:     {}", stats.bold_spans);
    println!("  Italic spans:   {}", stats.italic_spans);
    println!("  Code spans:     {}", stats.code_spans);
    println!();
    println!("Size:");
    println!("  Characters:     {}", stats.chars);
    println!("  Words:          {}", stats.words);
    println!("  Lines:          {}", stats.lines);

    Ok(())
}

/// One line per subagent; with `verbose`, its sources follow.
fn subagent_lines(report: &ResearchReport, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for result in report.subagent_results.iter().flatten() {
        lines.push(format!(
            "  Subtask {}: {} ({} sources)",
            result.subtask,
            result.search_focus,
            result.sources.len()
        ));
        if !verbose {
            continue;
        }
        for source in &result.sources {
            match &source.url {
                Some(url) => lines.push(format!("    - {} <{}>", source.title, url)),
                None => lines.push(format!("    - {}", source.title)),
            }
            if !source.content.is_empty() {
                let preview: String = source.content.chars().take(60).collect();
                let ellipsis = if source.content.chars().count() > 60 { "..." } else { "" };
                lines.push(format!("      {}{}", preview.replace('\n', " "), ellipsis));
            }
        }
    }
    lines
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
struct DocumentStats {
    total_blocks: usize,
    headings: usize,
    paragraphs: usize,
    bullet_items: usize,
    numbered_items: usize,
    tables: usize,
    table_rows: usize,
    rules: usize,
    bold_spans: usize,
    italic_spans: usize,
    code_spans: usize,
    chars: usize,
    words: usize,
    lines: u32,
}

impl DocumentStats {
    fn from_document(doc: &Document) -> Self {
        let text = doc.plain_text();
        let mut stats = Self {
            total_blocks: doc.len(),
            chars: text.chars().count(),
            words: text.split_whitespace().count(),
            lines: doc.lines.len(),
            ..Self::default()
        };

        for block in doc {
            match block {
                Block::Heading(h) => {
                    stats.headings += 1;
                    stats.count_spans(&h.spans);
                }
                Block::Paragraph(p) => {
                    stats.paragraphs += 1;
                    stats.count_spans(&p.spans);
                }
                Block::BulletItem(b) => {
                    stats.bullet_items += 1;
                    stats.count_spans(&b.spans);
                }
                Block::NumberedItem(n) => {
                    stats.numbered_items += 1;
                    stats.count_spans(&n.spans);
                }
                Block::Table(t) => {
                    stats.tables += 1;
                    stats.table_rows += t.rows.len();
                    for cell in t.all_rows().flatten() {
                        stats.count_spans(cell);
                    }
                }
                Block::Rule(_) => stats.rules += 1,
            }
        }
        stats
    }

    fn count_spans(&mut self, spans: &[Span]) {
        for span in spans {
            self.bold_spans += span.bold as usize;
            self.italic_spans += span.italic as usize;
            self.code_spans += span.code as usize;
        }
    }
}

// =============================================================================
// Plain Command
// =============================================================================

fn cmd_plain(title: Option<&str>, doc: &Document) -> Result<()> {
    if let Some(title) = title {
        println!("{}", title);
        println!();
    }
    println!("{}", doc.plain_text());
    Ok(())
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Serialize)]
struct JsonDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    lines: u32,
    blocks: Vec<JsonBlock<'a>>,
}

#[derive(Serialize)]
struct JsonLines {
    start: u32,
    end: u32,
}

impl From<LineRange> for JsonLines {
    fn from(r: LineRange) -> Self {
        JsonLines {
            start: r.start,
            end: r.end,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonBlock<'a> {
    Heading {
        level: u8,
        spans: Vec<JsonSpan<'a>>,
        lines: JsonLines,
    },
    Paragraph {
        spans: Vec<JsonSpan<'a>>,
        lines: JsonLines,
    },
    BulletItem {
        spans: Vec<JsonSpan<'a>>,
        lines: JsonLines,
    },
    NumberedItem {
        ordinal: u64,
        spans: Vec<JsonSpan<'a>>,
        lines: JsonLines,
    },
    Table {
        header: Vec<Vec<JsonSpan<'a>>>,
        rows: Vec<Vec<Vec<JsonSpan<'a>>>>,
        lines: JsonLines,
    },
    Rule {
        lines: JsonLines,
    },
}

#[derive(Serialize)]
struct JsonSpan<'a> {
    text: &'a str,
    bold: bool,
    italic: bool,
    code: bool,
}

fn convert_document<'a>(title: Option<&'a str>, doc: &'a Document) -> JsonDocument<'a> {
    JsonDocument {
        title,
        lines: doc.lines.end,
        blocks: doc.iter().map(convert_block).collect(),
    }
}

fn convert_block<'a>(block: &'a Block) -> JsonBlock<'a> {
    match block {
        Block::Heading(h) => JsonBlock::Heading {
            level: h.level.as_u8(),
            spans: convert_spans(&h.spans),
            lines: h.lines.into(),
        },
        Block::Paragraph(p) => JsonBlock::Paragraph {
            spans: convert_spans(&p.spans),
            lines: p.lines.into(),
        },
        Block::BulletItem(b) => JsonBlock::BulletItem {
            spans: convert_spans(&b.spans),
            lines: b.lines.into(),
        },
        Block::NumberedItem(n) => JsonBlock::NumberedItem {
            ordinal: n.ordinal,
            spans: convert_spans(&n.spans),
            lines: n.lines.into(),
        },
        Block::Table(t) => JsonBlock::Table {
            header: t.header.iter().map(|cell| convert_spans(cell)).collect(),
            rows: t
                .rows
                .iter()
                .map(|row| row.iter().map(|cell| convert_spans(cell)).collect())
                .collect(),
            lines: t.lines.into(),
        },
        Block::Rule(lines) => JsonBlock::Rule {
            lines: (*lines).into(),
        },
    }
}

fn convert_spans<'a>(spans: &'a [Span]) -> Vec<JsonSpan<'a>> {
    spans
        .iter()
        .map(|s| JsonSpan {
            text: &s.text,
            bold: s.bold,
            italic: s.italic,
            code: s.code,
        })
        .collect()
}

// =============================================================================
// Text Output
// =============================================================================

fn print_document_summary(title: Option<&str>, doc: &Document) {
    if let Some(title) = title {
        println!("Title: {}", title);
    }

    println!("Blocks: {}", doc.len());
    for (i, block) in doc.iter().enumerate() {
        println!("  [{}] {}", i + 1, describe_block(block));
    }
}

fn print_document_verbose(title: Option<&str>, doc: &Document) {
    println!("=== Report Document ===");
    println!();
    if let Some(title) = title {
        println!("Title: {}", title);
    }
    println!("Lines: {}..{}", doc.lines.start, doc.lines.end);
    println!();

    println!("--- Blocks ---");
    for (i, block) in doc.iter().enumerate() {
        println!();
        let lines = block.lines();
        println!(
            "[{}] {} (lines {}..{})",
            i + 1,
            describe_block(block),
            lines.start,
            lines.end
        );
        print_block_verbose(block, 1);
    }
}

fn describe_block(block: &Block) -> String {
    match block {
        Block::Heading(h) => format!("Heading (level {})", h.level.as_u8()),
        Block::Paragraph(_) => "Paragraph".to_string(),
        Block::BulletItem(_) => "BulletItem".to_string(),
        Block::NumberedItem(n) => format!("NumberedItem ({})", n.ordinal),
        Block::Table(t) => format!("Table ({} columns, {} rows)", t.width(), t.rows.len()),
        Block::Rule(_) => "Rule".to_string(),
    }
}

fn print_block_verbose(block: &Block, indent: usize) {
    let prefix = "  ".repeat(indent);

    match block {
        Block::Table(t) => {
            for (i, row) in t.all_rows().enumerate() {
                let header_marker = if i == 0 { " (header)" } else { "" };
                let cells: Vec<String> = row.iter().map(|c| format_spans(c)).collect();
                println!("{}Row {}{}: {}", prefix, i + 1, header_marker, cells.join(" | "));
            }
        }
        Block::Rule(_) => {}
        _ => {
            if let Some(spans) = block.spans() {
                println!("{}Content: {}", prefix, format_spans(spans));
            }
        }
    }
}

/// Render spans back with canonical markers.
fn format_spans(spans: &[Span]) -> String {
    let mut result = String::new();
    for span in spans {
        let marker = if span.bold {
            "**"
        } else if span.italic {
            "*"
        } else if span.code {
            "`"
        } else {
            ""
        };
        result.push_str(marker);
        result.push_str(&span.text);
        result.push_str(marker);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["synthdoc", "stats", "--json", "-r", "report.json"]).unwrap();
        assert!(cli.json);
        assert!(cli.report);
        assert_eq!(cli.command.file(), Some(Path::new("report.json")));
    }

    #[test]
    fn filename_ext_defaults_to_pdf() {
        let cli = Cli::try_parse_from(["synthdoc", "filename"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Filename {
                ext: ExportFormat::Pdf,
                file: None
            }
        ));
        let cli = Cli::try_parse_from(["synthdoc", "filename", "--ext", "docx", "-"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Filename {
                ext: ExportFormat::Docx,
                ..
            }
        ));
    }

    #[test]
    fn stats_count_blocks_and_spans() {
        let doc = parse("# **T**\n\n- a *b*\n1. `c`\n\n| h | i |\n|---|---|\n| **x** | y |\n\n---");
        let stats = DocumentStats::from_document(&doc);
        assert_eq!(stats.total_blocks, 5);
        assert_eq!(stats.headings, 1);
        assert_eq!(stats.bullet_items, 1);
        assert_eq!(stats.numbered_items, 1);
        assert_eq!(stats.tables, 1);
        assert_eq!(stats.table_rows, 1);
        assert_eq!(stats.rules, 1);
        assert_eq!(stats.bold_spans, 2);
        assert_eq!(stats.italic_spans, 1);
        assert_eq!(stats.code_spans, 1);
        assert_eq!(stats.lines, 10);
    }

    #[test]
    fn subagent_lines_list_sources_when_verbose() {
        let report = ResearchReport::from_json(
            r#"{
                "query": "q",
                "subagent_results": [
                    {
                        "subtask": 1,
                        "search_focus": "costs",
                        "sources": [
                            {"title": "A", "content": "line one\nline two", "url": "https://a.example"},
                            {"title": "B", "content": ""}
                        ]
                    },
                    {"subtask": 2, "search_focus": "policy", "sources": []}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            subagent_lines(&report, false),
            vec![
                "  Subtask 1: costs (2 sources)".to_string(),
                "  Subtask 2: policy (0 sources)".to_string(),
            ]
        );
        assert_eq!(
            subagent_lines(&report, true),
            vec![
                "  Subtask 1: costs (2 sources)".to_string(),
                "    - A <https://a.example>".to_string(),
                "      line one line two".to_string(),
                "    - B".to_string(),
                "  Subtask 2: policy (0 sources)".to_string(),
            ]
        );
    }

    #[test]
    fn format_spans_uses_canonical_markers() {
        let doc = parse("__a__ _b_ `c` d");
        let spans = doc.blocks[0].spans().unwrap();
        assert_eq!(format_spans(spans), "**a** *b* `c` d");
    }

    #[test]
    fn json_output_tags_block_types() {
        let doc = parse("## Sources\n3. First");
        let json = serde_json::to_value(convert_document(Some("q"), &doc)).unwrap();
        assert_eq!(json["title"], "q");
        assert_eq!(json["blocks"][0]["type"], "Heading");
        assert_eq!(json["blocks"][0]["level"], 2);
        assert_eq!(json["blocks"][1]["type"], "NumberedItem");
        assert_eq!(json["blocks"][1]["ordinal"], 3);
        assert_eq!(json["blocks"][1]["spans"][0]["text"], "First");
    }
}
