mod script;
mod table;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use libcompose_core::{
    CompositionAction, CompositionResult, Config, Engine, SpecialKey, TableKeyMapper, BACKSPACE,
};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use script::Step;
use table::TableComposer;

/// Replay a key script through a composition engine and print every result.
#[derive(Parser)]
#[command(name = "compose-replay")]
struct Args {
    /// Code table for the table composer (TOML)
    #[arg(long)]
    table: PathBuf,

    /// Key layout mapping raw keys to tokens (TOML)
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Engine configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print each result as one JSON line
    #[arg(long)]
    json: bool,

    /// Log engine decisions to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Key script; read line by line from stdin when omitted
    script: Option<String>,
}

/// Minimal host: applies committed text and literal keys to a buffer.
#[derive(Default)]
struct Host {
    buffer: String,
}

impl Host {
    /// `was_composing` is the engine state before the step ran.
    fn apply(&mut self, step: Step, result: &CompositionResult, was_composing: bool) {
        self.buffer.push_str(result.committed_text());

        let Step::Key(key) = step else {
            return;
        };
        if was_composing {
            return;
        }

        // While idle, keys the engine did not consume belong to the host.
        match result.action() {
            CompositionAction::None if key == BACKSPACE => {
                self.buffer.pop();
            }
            CompositionAction::None => {
                if let Some(literal) = literal_text(key) {
                    self.buffer.push(literal);
                }
            }
            // Idle Enter/Space run an empty commit under the default policy.
            CompositionAction::Commit if result.committed_text().is_empty() => {
                if let Some(SpecialKey::Enter | SpecialKey::Space) = SpecialKey::from_char(key) {
                    if let Some(literal) = literal_text(key) {
                        self.buffer.push(literal);
                    }
                }
            }
            _ => {}
        }
    }
}

fn literal_text(key: char) -> Option<char> {
    match SpecialKey::from_char(key) {
        Some(SpecialKey::Enter) => Some('\n'),
        Some(SpecialKey::Space) => Some(' '),
        Some(SpecialKey::Tab) => Some('\t'),
        Some(SpecialKey::Escape) => None,
        None => Some(key),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_engine(args: &Args) -> Result<Engine> {
    let composer = TableComposer::load_toml(&args.table)?;

    let mut builder = Engine::builder().composer(Box::new(composer));
    if let Some(path) = &args.layout {
        let layout = TableKeyMapper::load_toml(path)?;
        builder = builder.key_mapper(Box::new(layout));
    }
    if let Some(path) = &args.config {
        let config = Config::load_toml(path)
            .map_err(|e| anyhow!("loading config {}: {}", path.display(), e))?;
        builder = builder.config(config);
    }
    Ok(builder.build()?)
}

fn run_step(engine: &mut Engine, step: Step) -> Option<CompositionResult> {
    match step {
        Step::Key(key) => Some(engine.input(key)),
        Step::Select(index) => Some(engine.select_candidate(index)),
        Step::Commit => Some(engine.commit()),
        Step::Cancel => Some(engine.cancel()),
        Step::Reset => {
            engine.reset();
            None
        }
    }
}

fn print_result(step: Step, result: &CompositionResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(result)?);
        return Ok(());
    }

    if !result.success() {
        println!("{:>10}  ✗ {}", step.to_string(), result.error_message());
        return Ok(());
    }
    let mut line = format!("{:>10}  {:?}", step.to_string(), result.action());
    if !result.committed_text().is_empty() {
        line.push_str(&format!("  commit={:?}", result.committed_text()));
    }
    if !result.composing_text().is_empty() {
        line.push_str(&format!("  preedit={:?}", result.composing_text()));
    }
    if result.has_buffer() {
        line.push_str(&format!("  buffer={:?}", result.buffer()));
    }
    if !result.candidates().is_empty() {
        let marked: Vec<String> = result
            .candidates()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if Some(i) == result.selected_candidate_index() {
                    format!("[{}]", c)
                } else {
                    c.clone()
                }
            })
            .collect();
        line.push_str(&format!("  candidates={}", marked.join(" ")));
    }
    println!("{}", line);
    Ok(())
}

fn replay(engine: &mut Engine, host: &mut Host, script: &str, json: bool) -> Result<()> {
    for step in script::parse(script).with_context(|| format!("parsing script {:?}", script))? {
        let was_composing = engine.is_composing();
        let Some(result) = run_step(engine, step) else {
            if !json {
                println!("{:>10}  reset", step.to_string());
            }
            continue;
        };
        host.apply(step, &result, was_composing);
        print_result(step, &result, json)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut engine = build_engine(&args)?;
    let mut host = Host::default();

    if !args.json {
        println!(
            "composer: {} ({}){}",
            engine.composer_name(),
            engine.language_code(),
            engine
                .key_mapper_name()
                .map(|name| format!(", layout: {}", name))
                .unwrap_or_default()
        );
    }

    match &args.script {
        Some(script) => replay(&mut engine, &mut host, script, args.json)?,
        None => {
            for line in io::stdin().lock().lines() {
                let line = line.context("reading script from stdin")?;
                replay(&mut engine, &mut host, &line, args.json)?;
            }
        }
    }

    // Whatever is still composing is finalized into the buffer.
    if engine.is_composing() {
        let result = engine.commit();
        host.buffer.push_str(result.committed_text());
    }

    if !args.json {
        println!("buffer: {}", host.buffer);
    }
    Ok(())
}
