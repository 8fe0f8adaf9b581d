// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};
use streamcursor::{GrowableBuffer, StreamCursor};

mod request;
use request::{scan_head, Scan};

/// Scan the request line and headers of an HTTP-style message.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Input file; reads stdin when omitted
    file: Option<PathBuf>,
    /// Initial size of the staging buffer
    #[arg(long, default_value_t = 64)]
    initial_size: usize,
    /// Largest the staging buffer may grow to
    #[arg(long, default_value_t = 64 * 1024)]
    max_size: usize,
    /// Bytes read from the input per step
    #[arg(long, default_value_t = 16)]
    chunk_size: usize,
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut input: Box<dyn Read> = match &cli.file {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };

    let mut buf = GrowableBuffer::new(cli.initial_size, cli.max_size);
    let mut chunk = vec![0u8; cli.chunk_size.max(1)];
    loop {
        let n = input.read(&mut chunk)?;
        buf.write(chunk.get(..n).unwrap_or_default())?;
        debug!("read {} bytes, {} buffered", n, buf.len());

        let mut cursor = StreamCursor::new(&mut buf);
        match scan_head(&mut cursor)? {
            Scan::Complete(head) => {
                println!("{} {} HTTP/{}", head.method, head.target, head.version);
                for (name, value) in &head.headers {
                    println!("{}: {}", name, value);
                }
                info!("{} body bytes already buffered", cursor.remaining());
                return Ok(());
            }
            Scan::NeedMore if n == 0 => return Err("input ended inside the request head".into()),
            Scan::NeedMore => {}
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
