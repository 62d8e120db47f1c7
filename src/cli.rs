//! CLI: encode/decode JSON documents against a schema description.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use json_packer::{describe, lower, parse_definition, Packer, Schema};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compact JSON documents into positional envelopes (and back) using a declared schema
#[derive(Parser, Debug)]
#[command(name = "json-packer", version)]
pub struct CommandLineInterface {
    /// log debug events to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// turn domain documents into envelopes
    Encode(CodecRun),
    /// rebuild domain documents from envelopes
    Decode(CodecRun),
    /// check a schema description and print its normalized form
    Schema(SchemaOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; every output is processed on its own
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CodecRun {
    /// schema description (.json)
    #[arg(long, short)]
    schema: PathBuf,

    #[command(flatten)]
    input_settings: InputSettings,

    /// output file, one JSON document per line (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// pretty-print each output document
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    /// schema description (.json)
    #[arg(long, short)]
    schema: PathBuf,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Encode,
    Decode,
}

/// One input document and where it came from.
#[derive(Debug, Clone)]
struct Document {
    source: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut documents = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file {source_path_str}"))?;
            for document in parse_source(&source_path_str, &source, self.ndjson)? {
                self.select(document, &mut documents)?;
            }
        }
        tracing::debug!(count = documents.len(), "loaded input documents");
        Ok(documents)
    }

    /// Apply `--json-pointer` then `--jq-expr`.
    fn select(&self, document: Document, out: &mut Vec<Document>) -> Result<()> {
        let Document { source, value } = document;
        let value = match self.json_pointer.as_deref() {
            None => value,
            Some(pointer) => match value.pointer(pointer) {
                Some(selected) => selected.clone(),
                None => bail!("{source}: JSON pointer {pointer} selects nothing"),
            },
        };
        match self.jq_expr.as_deref() {
            None => out.push(Document { source, value }),
            Some(jq_expr) => {
                let outputs = crate::jq_exec::run_filter(jq_expr, &value)
                    .with_context(|| format!("failed to apply jq expression to {source}"))?;
                for (index, value) in outputs.into_iter().enumerate() {
                    out.push(Document { source: format!("{source}#{index}"), value });
                }
            }
        }
        Ok(())
    }
}

impl CodecRun {
    fn run(&self, direction: Direction) -> Result<bool> {
        let schema = load_schema(&self.schema)?;
        let documents = self.input_settings.load_documents()?;

        // schemas are immutable, so one tree serves every worker
        let results: Vec<Result<Value, json_packer::Error>> = documents
            .par_iter()
            .map(|document| match direction {
                Direction::Encode => schema.encode(&document.value).map_err(Into::into),
                Direction::Decode => schema.decode(&document.value).map_err(Into::into),
            })
            .collect();

        let mut rendered = String::new();
        let mut failures = 0usize;
        for (document, result) in documents.iter().zip(results) {
            match result {
                Ok(value) => {
                    let text = if self.pretty {
                        serde_json::to_string_pretty(&value)?
                    } else {
                        serde_json::to_string(&value)?
                    };
                    rendered.push_str(&text);
                    rendered.push('\n');
                }
                Err(error) => {
                    failures += 1;
                    eprintln!("{} {}: {error}", "❌".red(), document.source.bold());
                }
            }
        }
        write_output(self.out.as_deref(), &rendered)?;

        if failures > 0 {
            eprintln!("{}", format!("{failures} of {} documents failed", documents.len()).red());
        } else {
            tracing::info!(count = documents.len(), ?direction, "all documents processed");
        }
        Ok(failures == 0)
    }
}

impl SchemaOut {
    fn run(&self) -> Result<bool> {
        let schema = load_schema(&self.schema)?;
        let normalized = serde_json::to_string_pretty(&describe(&schema))?;
        write_output(self.out.as_deref(), &format!("{normalized}\n"))?;
        eprintln!("{} {}", "✅".green(), self.schema.display());
        Ok(true)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn init_logging(&self) {
        let fallback = if self.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    /// `Ok(false)` when at least one document was rejected.
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Encode(target) => target.run(Direction::Encode),
            Command::Decode(target) => target.run(Direction::Decode),
            Command::Schema(target) => target.run(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn load_schema(path: &Path) -> Result<Schema> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file {}", path.display()))?;
    let definition = parse_definition(&source)
        .with_context(|| format!("failed to parse schema file {}", path.display()))?;
    let schema = lower(&definition)
        .with_context(|| format!("invalid schema in {}", path.display()))?;
    tracing::debug!(kind = schema.kind_name(), path = %path.display(), "schema loaded");
    Ok(schema)
}

fn parse_source(source_path: &str, source: &str, ndjson: bool) -> Result<Vec<Document>> {
    if !ndjson {
        let value = serde_json::from_str::<Value>(source)
            .with_context(|| format!("failed to parse JSON source file ({source_path})"))?;
        return Ok(vec![Document { source: source_path.to_string(), value }]);
    }
    let mut documents = Vec::new();
    for (index, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let source = format!("{source_path}:{}", index + 1);
        let value = serde_json::from_str::<Value>(line)
            .with_context(|| format!("failed to parse NDJSON line ({source})"))?;
        documents.push(Document { source, value });
    }
    Ok(documents)
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
