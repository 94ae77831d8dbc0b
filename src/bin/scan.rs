use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use qrcompose::scan::decode_payloads;
use tracing_subscriber::EnvFilter;

/// Decode QR codes from image files.
#[derive(Parser, Debug)]
#[command(name = "qrcompose-scan", version, about)]
struct Cli {
    /// Images to scan
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Payload every image must contain
    #[arg(short, long)]
    expect: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut failures = 0;

    for path in &cli.images {
        match decode_payloads(path) {
            Ok(payloads) => {
                for payload in &payloads {
                    println!("✓ {}: {}", path.display(), payload);
                }
                if let Some(expected) = &cli.expect {
                    if !payloads.iter().any(|p| p == expected) {
                        println!("✗ {}: expected payload '{}' not found", path.display(), expected);
                        failures += 1;
                    }
                }
            }
            Err(e) => {
                println!("✗ {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures == 0 {
        println!("\n=== All {} image(s) decoded ===", cli.images.len());
        ExitCode::SUCCESS
    } else {
        println!("\n=== Found {} issue(s) ===", failures);
        ExitCode::FAILURE
    }
}
