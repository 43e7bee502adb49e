use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use xglish::langtab::LANGS;
use xglish::pipeline::PipelineConfig;
use xglish::progress::ConsoleProgress;
use xglish::target::MixTarget;
use xglish::MixError;

#[derive(Parser, Debug)]
#[command(name = "xglish")]
#[command(about = "Code-mixed Romanized Indic text from English sentences", long_about = None)]
struct Args {
    /// Sentences to mix (reads stdin lines when absent and no --input given)
    #[arg(value_name = "TEXT")]
    texts: Vec<String>,

    /// Target tag, e.g. Hinglish_Mix, Tamil_Mix, Roman_hi, Convert_Devanagari
    #[arg(short, long, default_value = "Hinglish_Mix")]
    target: String,

    /// Familiarity threshold (default from config; lower keeps more English)
    #[arg(long)]
    threshold: Option<f32>,

    /// Read input sentences from a file, one per line
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Config file path (default: search for xglish.toml upwards)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Translation backend override: libretranslate or indictrans2
    #[arg(long)]
    backend: Option<String>,

    /// Restore strategy override: mask or align
    #[arg(long)]
    strategy: Option<String>,

    /// Lexicon data directory override
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Report per-item failures instead of aborting the whole batch
    #[arg(long)]
    best_effort: bool,

    /// Generate a default config file, then exit
    #[arg(long)]
    init_config: bool,

    /// Directory to write the config file (default: current directory)
    #[arg(long, value_name = "DIR")]
    init_config_dir: Option<PathBuf>,

    /// Overwrite an existing config file with --init-config
    #[arg(long)]
    force: bool,

    /// List supported target tags, then exit
    #[arg(long)]
    list_targets: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let progress = ConsoleProgress::new(!args.quiet);

    if args.init_config {
        let dir = args
            .init_config_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let path = xglish::config::init_default_config(&dir, args.force)?;
        eprintln!("Wrote config: {}", path.display());
        return Ok(());
    }

    if args.list_targets {
        print_targets();
        return Ok(());
    }

    let target = match MixTarget::parse(&args.target) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Run with --list-targets for the supported tags.");
            std::process::exit(2);
        }
    };

    let cfg = PipelineConfig::resolve(
        args.config.clone(),
        args.backend.clone(),
        args.strategy.clone(),
        None,
        args.data_dir.clone(),
    )
    .context("resolve config")?;
    if let Some(p) = cfg.config_path.as_deref() {
        progress.info(format!("Config: {}", p.display()));
    }
    let mixer = cfg.build_mixer(&progress).context("build pipeline")?;

    let inputs = read_inputs(&args)?;
    if inputs.is_empty() {
        progress.warn("no input sentences");
        return Ok(());
    }
    progress.info(format!("Mixing {} sentence(s), target {target}", inputs.len()));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.best_effort {
        let mut failures = 0usize;
        for result in mixer.mix_batch_partial(&inputs, &target, args.threshold) {
            match result {
                Ok(line) => writeln!(out, "{line}")?,
                Err(e) => {
                    failures += 1;
                    progress.warn(e.to_string());
                    writeln!(out)?;
                }
            }
        }
        if failures > 0 {
            progress.warn(format!("{failures} of {} inputs failed", inputs.len()));
        }
    } else {
        match mixer.mix_batch(&inputs, &target, args.threshold) {
            Ok(lines) => {
                for line in lines {
                    writeln!(out, "{line}")?;
                }
            }
            Err(e @ MixError::InvalidParameter(_)) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn read_inputs(args: &Args) -> anyhow::Result<Vec<String>> {
    if !args.texts.is_empty() {
        return Ok(args.texts.clone());
    }
    if let Some(path) = args.input.as_deref() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read input: {}", path.display()))?;
        return Ok(text.lines().map(|l| l.to_string()).collect());
    }
    let stdin = std::io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        lines.push(line.context("read stdin")?);
    }
    Ok(lines)
}

fn print_targets() {
    println!("Mix targets (translate + Romanize + restore):");
    for lang in LANGS {
        println!("  {}_Mix", lang.name);
    }
    println!("\nFull-Roman targets (translate + Romanize, no restore):");
    for lang in LANGS {
        println!("  Roman_{}", lang.code);
    }
    println!("\nScript conversion (no translation):");
    println!("  Convert_<Script>            e.g. Convert_Devanagari");
    println!("  Convert_<Script>_<Script>   e.g. Convert_Devanagari_Kannada");
}
