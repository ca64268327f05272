//! Command-line interface for `linescramble`.

#![forbid(unsafe_code)]

mod codec;

use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use scramble_break::{format_elapsed, KeySearch, Recovery, SearchConfig, SearchProgress, Strategy};
use scramble_core::{
    pixel_distance, scramble_lines, to_grayscale, unscramble_lines, Key, Permutation,
};
use serde::Serialize;

const USAGE: &str = "\
linescramble <IMAGE> <KEY> [OUTPUT] [scramble|unscramble]
       linescramble <IMAGE> break";

/// Keys between two progress dots in break mode.
const DOT_EVERY: u32 = 2048;

/// Scramble image rows with a 15-bit key, or recover the key of a scrambled image.
#[derive(Parser)]
#[command(name = "linescramble", version, about, override_usage = USAGE)]
struct Cli {
    /// Input image.
    image: PathBuf,
    /// Decimal key (masked to 15 bits), or `break` to recover the key.
    key: String,
    /// Output image for scramble/unscramble.
    #[arg(default_value = "out.png")]
    output: PathBuf,
    /// Transform to apply with the key.
    #[arg(value_enum, ignore_case = true, default_value_t = Process::Scramble)]
    process: Process,
    /// Scoring method for break mode; prompts on stdin when omitted.
    #[arg(long, value_enum)]
    method: Option<Method>,
    /// Worker threads for break mode (defaults to one per core).
    #[arg(long)]
    threads: Option<usize>,
    /// Directory receiving `trouve_<key>.png` in break mode.
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,
    /// Write a JSON summary of the recovered key.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
    /// Ignore keys that cannot scramble the image without losing rows.
    #[arg(long, default_value_t = false)]
    skip_non_bijective: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Process {
    Scramble,
    Unscramble,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Method {
    Euclidean,
    Pearson,
}

impl From<Method> for Strategy {
    fn from(method: Method) -> Self {
        match method {
            Method::Euclidean => Strategy::Euclidean,
            Method::Pearson => Strategy::Pearson,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::try_parse().unwrap_or_else(|err| {
        if !err.use_stderr() {
            err.exit();
        }
        let _ = err.print();
        std::process::exit(1);
    });

    if cli.key.eq_ignore_ascii_case("break") {
        cmd_break(&cli)
    } else {
        let key: Key = cli.key.parse().unwrap_or_else(|err| {
            eprintln!("error: {err}\n\nUsage: {USAGE}");
            std::process::exit(1);
        });
        cmd_transform(&cli.image, key, &cli.output, cli.process)
    }
}

fn cmd_transform(image_path: &Path, key: Key, output: &Path, process: Process) -> Result<()> {
    let image = codec::load(image_path)?;
    info!(
        "loaded {} ({}x{})",
        image_path.display(),
        image.width(),
        image.height()
    );
    if !key.is_bijective_for(image.height()) {
        warn!(
            "key {key} does not permute {} rows bijectively; rows will collide",
            image.height()
        );
    }

    let perm = Permutation::generate(image.height(), key).context("empty image")?;
    let result = match process {
        Process::Scramble => scramble_lines(&image, &perm)?,
        Process::Unscramble => unscramble_lines(&image, &perm)?,
    };

    let score = pixel_distance(&image, &result)?;
    println!("difference score: {score}/100");

    codec::save(&result, output)?;
    println!("done, image written to {}", output.display());
    Ok(())
}

fn cmd_break(cli: &Cli) -> Result<()> {
    let image = codec::load(&cli.image)?;
    let gray = to_grayscale(&image);

    let strategy = match cli.method {
        Some(method) => method.into(),
        None => prompt_strategy(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    println!("analysing {} candidate keys...", Key::COUNT);
    let dots = AtomicU32::new(0);
    let search = KeySearch::with_config(SearchConfig {
        strategy,
        threads: cli.threads,
        skip_non_bijective: cli.skip_non_bijective,
        ..SearchConfig::default()
    })
    .on_progress(|progress| print_dots(&dots, progress));
    let recovery = search.run(&gray).context("key search failed")?;
    println!();

    println!("key found: {}", recovery.key);
    println!("time: {}", format_elapsed(recovery.elapsed));

    let perm = Permutation::generate(image.height(), recovery.key)?;
    let recovered = unscramble_lines(&image, &perm)?;
    let output = cli.out_dir.join(format!("trouve_{}.png", recovery.key));
    codec::save(&recovered, &output)?;
    let shown = fs::canonicalize(&output).unwrap_or_else(|_| output.clone());
    println!("result saved to {}", shown.display());

    if let Some(path) = &cli.report {
        write_report(path, &cli.image, &output, &recovery)?;
    }
    Ok(())
}

/// Reads the scoring method: `1` selects Euclidean, anything else Pearson.
fn prompt_strategy(input: &mut impl BufRead, output: &mut impl Write) -> Result<Strategy> {
    writeln!(output, "Scoring method:")?;
    writeln!(output, "1 - Euclidean (row distance)")?;
    writeln!(output, "2 - Pearson (row correlation)")?;
    write!(output, "Your choice: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("read method choice")?;
    Ok(if line.trim() == "1" {
        Strategy::Euclidean
    } else {
        Strategy::Pearson
    })
}

/// Dots owed after `evaluated` keys: one per nonzero key index that is a
/// multiple of [`DOT_EVERY`], so a full search prints 15.
fn dots_due(evaluated: u32) -> u32 {
    evaluated.saturating_sub(1) / DOT_EVERY
}

fn print_dots(printed: &AtomicU32, progress: SearchProgress) {
    let due = dots_due(progress.evaluated);
    let before = printed.fetch_max(due, Ordering::Relaxed);
    if due > before {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(".".repeat((due - before) as usize).as_bytes());
        let _ = stdout.flush();
    }
}

#[derive(Serialize)]
struct Report<'a> {
    image: &'a Path,
    output: &'a Path,
    #[serde(flatten)]
    recovery: &'a Recovery,
}

fn write_report(path: &Path, image: &Path, output: &Path, recovery: &Recovery) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let report = Report {
        image,
        output,
        recovery,
    };
    serde_json::to_writer_pretty(file, &report)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn choose(answer: &str) -> Strategy {
        let mut prompt = Vec::new();
        let strategy = prompt_strategy(&mut Cursor::new(answer), &mut prompt).expect("prompt");
        assert!(String::from_utf8(prompt).expect("utf8").contains("Your choice"));
        strategy
    }

    #[test]
    fn prompt_maps_one_to_euclidean() {
        assert_eq!(choose("1\n"), Strategy::Euclidean);
        assert_eq!(choose("  1  \n"), Strategy::Euclidean);
    }

    #[test]
    fn prompt_maps_everything_else_to_pearson() {
        assert_eq!(choose("2\n"), Strategy::Pearson);
        assert_eq!(choose("x\n"), Strategy::Pearson);
        assert_eq!(choose(""), Strategy::Pearson);
    }

    #[test]
    fn full_search_prints_fifteen_dots() {
        assert_eq!(dots_due(0), 0);
        assert_eq!(dots_due(2048), 0);
        assert_eq!(dots_due(2049), 1);
        assert_eq!(dots_due(Key::COUNT), 15);
    }

    #[test]
    fn positional_defaults() {
        let cli = Cli::try_parse_from(["linescramble", "in.png", "42"]).expect("parse");
        assert_eq!(cli.output, PathBuf::from("out.png"));
        assert_eq!(cli.process, Process::Scramble);
        assert_eq!(cli.method, None);
    }

    #[test]
    fn process_is_case_insensitive() {
        let cli = Cli::try_parse_from(["linescramble", "in.png", "42", "o.png", "UNSCRAMBLE"])
            .expect("parse");
        assert_eq!(cli.process, Process::Unscramble);
    }

    #[test]
    fn one_argument_is_rejected() {
        assert!(Cli::try_parse_from(["linescramble", "in.png"]).is_err());
    }

    #[test]
    fn method_flag_maps_to_strategy() {
        let cli = Cli::try_parse_from(["linescramble", "in.png", "break", "--method", "pearson"])
            .expect("parse");
        assert_eq!(cli.method.map(Strategy::from), Some(Strategy::Pearson));
    }
}
