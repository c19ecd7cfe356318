use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::warn;

use columnfall::{ColumnView, Piece, Playground};

/// Positions outside `[-2^21, 2^21]` are rejected by the reader.
const X_LIMIT: i64 = 1 << 21;

/// Drop colored pieces into an unbounded row of columns; lines of four or
/// more identical colors clear and gravity closes the gaps.
#[derive(Parser)]
#[command(name = "columnfall", version)]
struct Cli {
    /// Input file of whitespace-separated `color x` pairs; stdin when omitted.
    input: Option<PathBuf>,

    /// Print the full board after every placement and enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Engine warnings+ on stderr; --verbose enables debug; RUST_LOG overrides.
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_module("columnfall", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let mut input = String::new();
    match &cli.input {
        Some(path) => {
            File::open(path)
                .and_then(|mut f| f.read_to_string(&mut input))
                .with_context(|| format!("reading {}", path.display()))?;
        }
        None => {
            io::stdin()
                .read_to_string(&mut input)
                .context("reading stdin")?;
        }
    }

    let mut playground = Playground::new()?;
    place_stream(&mut playground, &input, cli.verbose)?;

    let stdout = io::stdout().lock();
    let mut out = BufWriter::new(stdout);
    for (x, view) in playground.columns() {
        if let ColumnView::Pieces { pieces, .. } = view {
            for (y, piece) in pieces.iter().enumerate() {
                writeln!(out, "{} {} {}", piece.color(), x, y)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Feed `color x` records to the playground.
///
/// End of input or a malformed token stops the stream — not an error. A
/// record with a reserved color or out-of-range position is skipped with a
/// warning; the engine never sees invalid input.
fn place_stream(playground: &mut Playground, input: &str, verbose: bool) -> anyhow::Result<()> {
    let mut tokens = input.split_ascii_whitespace();
    loop {
        let Some(color_token) = tokens.next() else {
            break;
        };
        let Some(x_token) = tokens.next() else {
            break;
        };
        let Ok(color) = color_token.parse::<u16>() else {
            break;
        };
        let Ok(x) = x_token.parse::<i64>() else {
            break;
        };

        let piece = match u8::try_from(color).ok().and_then(Piece::new) {
            Some(piece) => piece,
            None => {
                warn!("skipping record with reserved color {color}");
                continue;
            }
        };
        if !(-X_LIMIT..=X_LIMIT).contains(&x) {
            warn!("skipping record with out-of-range position {x}");
            continue;
        }

        if verbose {
            println!("Place piece {:3} at {}", piece.color(), x);
        }
        playground
            .place(x, piece)
            .with_context(|| format!("placing a piece at x={x}"))?;
        if verbose {
            print_board(playground);
        }
    }
    Ok(())
}

/// Debug rendering: per-column fill and piece rows, padding runs as gap
/// markers.
fn print_board(playground: &Playground) {
    let (start, end) = playground.bounds();
    println!("Playground: [{start}; {end}]");
    for (x, view) in playground.columns() {
        match view {
            ColumnView::Pieces { pieces, capacity } => {
                print!("[{x:8}] col {:2}/{capacity:2} |", pieces.len());
                for piece in pieces {
                    print!("{:3}|", piece.color());
                }
                println!();
            }
            ColumnView::Padding { size } => {
                println!("[{x:8}] --- {size} cols ---");
            }
        }
    }
    println!();
}
