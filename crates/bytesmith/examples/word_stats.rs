//! Tokenizes a piece of text and prints a small word-frequency report,
//! exercising the buffer pipeline end to end: trim the input, split it into
//! words, normalize their case, and assemble the report line by line with
//! formatted appends.
//!
//! Pass a file path to analyze its contents; without arguments a built-in
//! sample is used.
//!
//! Run with
//!
//! ```bash
//! cargo run -p bytesmith --example word_stats [-- path/to/file]
//! ```

use std::{collections::BTreeMap, env, process::ExitCode};

use bytesmith::{Buffer, bformat, fileio, join};

const SAMPLE: &[u8] = b"  the quick brown fox jumps over the lazy dog \
                        while the dog naps  ";

fn main() -> ExitCode {
    let mut text = match env::args().nth(1) {
        Some(path) => match fileio::read_to_buffer(&path) {
            Ok(buf) => buf,
            Err(err) => {
                eprintln!("word_stats: {path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => Buffer::from(SAMPLE),
    };

    match report(&mut text) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("word_stats: {err}");
            ExitCode::FAILURE
        }
    }
}

fn report(text: &mut Buffer) -> bytesmith::Result<Buffer> {
    text.trim(b" \t\r\n");

    let mut words = Vec::new();
    for line in &text.split(b"\n")? {
        words.extend(line.split(b" ")?);
    }
    for word in &mut words {
        word.trim(b".,;:!?\"'");
        word.make_ascii_lowercase();
    }
    words.retain(|w| !w.is_empty());

    let mut counts: BTreeMap<&[u8], usize> = BTreeMap::new();
    for word in &words {
        *counts.entry(word.as_bytes()).or_insert(0) += 1;
    }

    let mut out = bformat!("{} words, {} distinct\n", words.len(), counts.len())?;
    for (word, count) in &counts {
        out.format_into(format_args!(
            "{:>4}  {}\n",
            count,
            Buffer::from(*word)
        ))?;
    }

    let preview = join(words.iter().take(8), b" ")?;
    out.concat_str("first words: ")?;
    out.concat_buffer(&preview)?;
    Ok(out)
}
