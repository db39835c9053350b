//! `passage` reads Bible references and prints what they resolve to.
//!
//! ```text
//! # name, OSIS reference, verse count and binary form of each reference
//! passage "Gen 1:1-5, 7" "Rev 22"
//!
//! # the same as JSON, one object per line
//! echo "Jude 3-5" | passage --json
//!
//! # count how often each verse is hit across all inputs
//! passage --tally "Gen 1:1-3" "Gen 1:2-4" "Gen 1:3"
//! ```

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use serde_json::json;
use tracing::info;

use passage::codec::{choose_method, to_binary};
use passage::telemetry::init_tracing;
use passage::{Order, Passage, PassageKeyFactory, PassageTally, RestrictionType, Settings};

/// Bible reference reader
#[derive(Parser, Debug)]
#[command(name = "passage")]
#[command(about = "Reads Bible references and prints their names, OSIS form and encoding")]
#[command(version)]
struct Args {
    /// References to read; standard input is read line by line when none are given
    references: Vec<String>,

    /// Print one JSON object per reference
    #[arg(long)]
    json: bool,

    /// Collect every reference into one ranked tally
    #[arg(long)]
    tally: bool,

    /// Widen every reference by this many verses
    #[arg(long, default_value_t = 0)]
    blur: u32,

    /// Settings file to use instead of passage.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn describe(passage: &Passage, json: bool) -> String {
    let binary = to_binary(passage);
    if json {
        json!({
            "name": passage.name(),
            "osis": passage.osis_ref(),
            "verses": passage.count_verses(),
            "ranges": passage.count_ranges(RestrictionType::None),
            "method": choose_method(passage).to_string(),
            "binary": hex(&binary),
        })
        .to_string()
    } else {
        format!(
            "{}\t{}\t{}\t{}",
            passage.name(),
            passage.osis_ref(),
            passage.count_verses(),
            hex(&binary)
        )
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    init_tracing(&settings.log_filter);

    let factory = PassageKeyFactory::new(&settings)?;
    info!(
        kind = %factory.kind(),
        versification = factory.default_versification().name(),
        "passage factory ready"
    );

    let references: Vec<String> = if args.references.is_empty() {
        io::stdin().lock().lines().collect::<Result<_, _>>()?
    } else {
        args.references.clone()
    };

    let mut tally: PassageTally = factory.create_tally();
    tally.set_order(Order::Tally);
    for reference in references.iter().filter(|r| !r.trim().is_empty()) {
        let mut passage = factory.get_key(reference)?;
        passage.blur(args.blur, settings.blur_restriction);
        if args.tally {
            tally.add(&passage)?;
        } else {
            println!("{}", describe(&passage, args.json));
        }
    }

    if args.tally {
        if args.json {
            let ranked: Vec<_> = tally
                .ranked()
                .into_iter()
                .map(|(verse, rank)| json!({ "verse": verse.name(), "rank": rank }))
                .collect();
            println!("{}", json!({ "total": tally.total(), "max": tally.max_rank(), "verses": ranked }));
        } else {
            println!("{}", tally.name_and_tally(0));
        }
    }
    Ok(())
}
