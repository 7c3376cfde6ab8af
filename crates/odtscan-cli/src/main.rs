//! odtscan CLI - Inspect lines and tables of an OpenDocument text body
//!
//! Usage:
//!   odtscan [OPTIONS] [COMMAND] [ARGS] <FILE>
//!
//! Commands:
//!   lines     List every top-level line (default)
//!   line      Print one line
//!   find      Find the first line containing a string
//!   table     Print one table
//!   stats     Show document statistics

use std::env;
use std::fs;
use std::process;

use odtscan_core::{Document, Table, TableOptions};
use serde::Serialize;

fn main() {
    let args: Vec<String> = env::args().collect();

    match run(&args) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let config = parse_args(args)?;
    init_logging(config.verbose);

    let input = fs::read_to_string(&config.file)
        .map_err(|e| format!("failed to read '{}': {}", config.file, e))?;

    let doc = if config.body {
        Document::new(input)
    } else {
        Document::from_content_xml(&input)
    };
    log::debug!("loaded {} body bytes from {}", doc.content().len(), config.file);

    match config.command {
        Command::Lines => cmd_lines(&doc, &config),
        Command::Line(index) => cmd_line(&doc, index, &config),
        Command::Find(ref needle) => cmd_find(&doc, needle, &config),
        Command::Table(index) => cmd_table(&doc, index, &config),
        Command::Stats => cmd_stats(&doc, &config),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

#[derive(Debug, PartialEq, Eq)]
struct Config {
    command: Command,
    file: String,
    format: OutputFormat,
    options: TableOptions,
    start: usize,
    body: bool,
    verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Lines,
    Line(usize),
    Find(String),
    Table(usize),
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_index(value: &str, what: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("invalid {}: {}", what, value))
}

fn parse_args(args: &[String]) -> Result<Config, String> {
    let mut format = OutputFormat::Text;
    let mut options = TableOptions::new();
    let mut start = 0;
    let mut body = false;
    let mut verbose = false;
    let mut positionals: Vec<&str> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-V" | "--version" => {
                println!("odtscan {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "-v" | "--verbose" => verbose = true,
            "-j" | "--json" => format = OutputFormat::Json,
            "--raw" => options = options.raw_cells(true),
            "--strict" => options = options.strict(true),
            "--body" => body = true,
            "--start" => {
                i += 1;
                let value = args.get(i).ok_or("--start needs a value")?;
                start = parse_index(value, "start line")?;
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("unknown option: {}", arg));
            }
            _ => positionals.push(arg),
        }
        i += 1;
    }

    let (command, rest) = match positionals.split_first() {
        Some((&"lines", rest)) => (Command::Lines, rest),
        Some((&"stats", rest)) => (Command::Stats, rest),
        Some((&"line", [index, rest @ ..])) => (Command::Line(parse_index(index, "line index")?), rest),
        Some((&"table", [index, rest @ ..])) => {
            (Command::Table(parse_index(index, "table index")?), rest)
        }
        Some((&"find", [needle, rest @ ..])) => (Command::Find(needle.to_string()), rest),
        Some((&cmd @ ("line" | "table" | "find"), _)) => {
            return Err(format!("'{}' needs an argument", cmd));
        }
        _ => (Command::Lines, positionals.as_slice()),
    };

    let file = match rest {
        [file] => file.to_string(),
        [] => return Err("no input file specified".to_string()),
        _ => return Err("multiple files specified".to_string()),
    };

    Ok(Config {
        command,
        file,
        format,
        options,
        start,
        body,
        verbose,
    })
}

fn print_help() {
    eprintln!(
        r#"odtscan - inspect lines and tables of an OpenDocument text body

USAGE:
    odtscan [OPTIONS] [COMMAND] [ARGS] <FILE>

COMMANDS:
    lines           List every top-level line (default)
    line <N>        Print line N (plain text, or markup with --raw)
    find <TEXT>     Print the index of the first line containing TEXT
    table <N>       Print table N
    stats           Show document statistics

OPTIONS:
    --raw            Print raw markup instead of plain text
    --strict         Fail when a table row is missing cells
    --start <N>      First line considered by 'find' (default 0)
    --body           Treat FILE as a bare body fragment, not content.xml
    -j, --json       Output in JSON format
    -v, --verbose    Enable debug logging (RUST_LOG overrides)
    -h, --help       Print help information
    -V, --version    Print version information

EXAMPLES:
    odtscan content.xml                 List lines
    odtscan find Audio: content.xml     Locate the line containing 'Audio:'
    odtscan -j table 0 content.xml      Dump the first table as JSON
    odtscan --raw line 4 content.xml    Print the markup of line 4
"#
    );
}

// =============================================================================
// Lines Command
// =============================================================================

#[derive(Serialize)]
struct JsonLine<'a> {
    index: usize,
    start: u32,
    end: u32,
    text: &'a str,
}

fn cmd_lines(doc: &Document, config: &Config) -> Result<(), String> {
    let spans = doc.line_spans();
    let raw = config.options.raw_cells;
    let texts: Vec<String> = (0..spans.len())
        .map(|i| line_text(doc, i, raw))
        .collect::<Result<_, _>>()?;

    match config.format {
        OutputFormat::Json => {
            let lines: Vec<_> = spans
                .iter()
                .zip(&texts)
                .enumerate()
                .map(|(index, (span, text))| JsonLine {
                    index,
                    start: span.start,
                    end: span.end,
                    text,
                })
                .collect();
            print_json(&lines)
        }
        OutputFormat::Text => {
            for (index, text) in texts.iter().enumerate() {
                println!("{:>5}  {}", index, text);
            }
            Ok(())
        }
    }
}

fn line_text(doc: &Document, index: usize, raw: bool) -> Result<String, String> {
    let text = if raw {
        doc.raw_line(index).map(str::to_string)
    } else {
        doc.plain_line(index).map(|t| t.into_owned())
    };
    text.map_err(|e| e.to_string())
}

// =============================================================================
// Line Command
// =============================================================================

fn cmd_line(doc: &Document, index: usize, config: &Config) -> Result<(), String> {
    let text = line_text(doc, index, config.options.raw_cells)?;
    match config.format {
        OutputFormat::Json => print_json(&serde_json::json!({ "index": index, "text": text })),
        OutputFormat::Text => {
            println!("{}", text);
            Ok(())
        }
    }
}

// =============================================================================
// Find Command
// =============================================================================

fn cmd_find(doc: &Document, needle: &str, config: &Config) -> Result<(), String> {
    let found = doc.line_index_of(needle, config.start);
    match config.format {
        OutputFormat::Json => print_json(&serde_json::json!({ "index": found }))?,
        OutputFormat::Text => {
            if let Some(index) = found {
                println!("{}", index);
            }
        }
    }
    match found {
        Some(_) => Ok(()),
        None => Err(format!(
            "no line at or after {} contains '{}'",
            config.start, needle
        )),
    }
}

// =============================================================================
// Table Command
// =============================================================================

#[derive(Serialize)]
struct JsonTable<'a> {
    index: usize,
    columns: Vec<String>,
    rows: Vec<Vec<&'a str>>,
}

fn convert_table<'a>(index: usize, table: &'a Table<'a>) -> JsonTable<'a> {
    JsonTable {
        index,
        columns: table.column_names(),
        rows: table
            .rows
            .iter()
            .map(|row| row.cells.iter().map(|c| c.as_ref()).collect())
            .collect(),
    }
}

fn cmd_table(doc: &Document, index: usize, config: &Config) -> Result<(), String> {
    let table = doc
        .table(index, config.options)
        .map_err(|e| e.to_string())?;

    match config.format {
        OutputFormat::Json => print_json(&convert_table(index, &table)),
        OutputFormat::Text => {
            println!("{}", table.column_names().join("\t"));
            for row in &table.rows {
                let cells: Vec<&str> = row.cells.iter().map(|c| c.as_ref()).collect();
                println!("{}", cells.join("\t"));
            }
            Ok(())
        }
    }
}

// =============================================================================
// Stats Command
// =============================================================================

#[derive(Serialize)]
struct DocumentStats {
    bytes: usize,
    lines: usize,
    tables: Vec<TableStats>,
}

#[derive(Serialize)]
struct TableStats {
    columns: usize,
    rows: usize,
}

impl DocumentStats {
    fn from_document(doc: &Document) -> Result<Self, String> {
        let tables = (0..doc.table_count())
            .map(|i| {
                let table = doc
                    .table(i, TableOptions::default())
                    .map_err(|e| e.to_string())?;
                Ok(TableStats {
                    columns: table.column_count(),
                    rows: table.row_count(),
                })
            })
            .collect::<Result<_, String>>()?;

        Ok(Self {
            bytes: doc.content().len(),
            lines: doc.line_count(),
            tables,
        })
    }
}

fn cmd_stats(doc: &Document, config: &Config) -> Result<(), String> {
    let stats = DocumentStats::from_document(doc)?;

    match config.format {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Text => {
            println!("Document Statistics");
            println!("-------------------");
            println!("Body bytes:   {}", stats.bytes);
            println!("Lines:        {}", stats.lines);
            println!("Tables:       {}", stats.tables.len());
            for (i, table) in stats.tables.iter().enumerate() {
                println!("  #{:<3} {} columns x {} rows", i, table.columns, table.rows);
            }
            Ok(())
        }
    }
}

// =============================================================================
// JSON Output
// =============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}
