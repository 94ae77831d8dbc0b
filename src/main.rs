use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use qrcompose::{generate_qr_code, scan, ErrorCorrection, QrJob, TextOverlay, TextPosition};
use tracing_subscriber::EnvFilter;

const EXAMPLE_URL: &str = "https://spintegration.fi/";
const EXAMPLE_FILENAME: &str = "spintegration_qr_with_text.png";

/// Generate a QR code image with optional logo and caption.
#[derive(Parser, Debug)]
#[command(name = "qrcompose", version, about)]
struct Cli {
    /// Text or URL to encode
    data: Option<String>,

    /// Output file; the extension picks the format
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON job file; flags given on the command line override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    fill_color: Option<String>,

    #[arg(long)]
    back_color: Option<String>,

    /// Symbol version to start from (1-40)
    #[arg(long = "qr-version")]
    qr_version: Option<i16>,

    /// Error correction level: L, M, Q or H
    #[arg(long)]
    error_correction: Option<ErrorCorrection>,

    /// Pixels per module
    #[arg(long)]
    box_size: Option<u32>,

    /// Quiet zone width in modules
    #[arg(long)]
    border: Option<u32>,

    /// Fail instead of growing past the requested version
    #[arg(long)]
    exact_version: bool,

    /// Image to embed in the center
    #[arg(short, long)]
    logo: Option<PathBuf>,

    /// Caption to stamp onto the code
    #[arg(short, long)]
    text: Option<String>,

    /// Caption placement: center or corner
    #[arg(long)]
    position: Option<TextPosition>,

    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long)]
    font_size: Option<f32>,

    /// Decode the written file and check it round-trips
    #[arg(long)]
    verify: bool,
}

impl Cli {
    fn into_job(self) -> anyhow::Result<(QrJob, bool)> {
        let mut job = match &self.config {
            Some(path) => QrJob::load(path)?,
            None => QrJob::new(EXAMPLE_URL, EXAMPLE_FILENAME),
        };

        if let Some(data) = self.data {
            job.request.data = data;
        }
        if let Some(output) = self.output {
            job.filename = output;
        }
        if let Some(c) = self.fill_color {
            job.request.fill_color = c;
        }
        if let Some(c) = self.back_color {
            job.request.back_color = c;
        }
        job.request.version = self.qr_version.unwrap_or(job.request.version);
        job.request.error_correction = self.error_correction.unwrap_or(job.request.error_correction);
        job.request.box_size = self.box_size.unwrap_or(job.request.box_size);
        job.request.border = self.border.unwrap_or(job.request.border);
        if self.exact_version {
            job.request.fit = false;
        }
        if self.logo.is_some() {
            job.logo_path = self.logo;
        }

        if self.text.is_some() || self.position.is_some() || self.font.is_some() || self.font_size.is_some() {
            let overlay = job.text.get_or_insert_with(TextOverlay::default);
            if let Some(text) = self.text {
                overlay.text = text;
            }
            overlay.position = self.position.unwrap_or(overlay.position);
            overlay.font_size = self.font_size.unwrap_or(overlay.font_size);
            if self.font.is_some() {
                overlay.font_path = self.font;
            }
        }

        Ok((job, self.verify))
    }
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let (job, verify) = Cli::parse().into_job()?;
    tracing::debug!(?job, "job ready");

    let Some(path) = generate_qr_code(&job) else {
        return Ok(ExitCode::FAILURE);
    };

    if verify {
        match scan::verify_payload(&path, &job.request.data) {
            Ok(true) => println!("✅ '{}' decodes back to the original payload", path.display()),
            Ok(false) => {
                println!("❌ '{}' decodes to a different payload", path.display());
                return Ok(ExitCode::FAILURE);
            }
            Err(e) => {
                println!("❌ Could not read back '{}': {e}", path.display());
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
