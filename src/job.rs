use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::request::QrRequest;
use crate::text::TextOverlay;

pub const DEFAULT_FILENAME: &str = "qr_code.png";

fn default_filename() -> PathBuf {
    PathBuf::from(DEFAULT_FILENAME)
}

/// One complete generation: what to encode, how to decorate it, and where to
/// write it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrJob {
    #[serde(flatten)]
    pub request: QrRequest,
    #[serde(default = "default_filename")]
    pub filename: PathBuf,
    #[serde(default)]
    pub logo_path: Option<PathBuf>,
    /// Text is only stamped when this is present.
    #[serde(default)]
    pub text: Option<TextOverlay>,
}

impl QrJob {
    pub fn new(data: impl Into<String>, filename: impl Into<PathBuf>) -> Self {
        Self {
            request: QrRequest::new(data),
            filename: filename.into(),
            logo_path: None,
            text: None,
        }
    }

    pub fn with_logo(mut self, logo_path: impl Into<PathBuf>) -> Self {
        self.logo_path = Some(logo_path.into());
        self
    }

    pub fn with_text(mut self, overlay: TextOverlay) -> Self {
        self.text = Some(overlay);
        self
    }

    /// Reads a job description from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComposeError;
    use crate::request::ErrorCorrection;
    use crate::text::TextPosition;

    #[test]
    fn minimal_job_gets_defaults() {
        let job: QrJob = serde_json::from_str(r#"{"data": "https://example.com"}"#).unwrap();
        assert_eq!(job, QrJob::new("https://example.com", DEFAULT_FILENAME));
    }

    #[test]
    fn full_job_parses() {
        let json = r##"{
            "data": "hello",
            "version": 3,
            "error_correction": "low",
            "box_size": 4,
            "border": 2,
            "fill_color": "#000",
            "back_color": "yellow",
            "fit": false,
            "filename": "out/hello.jpg",
            "logo_path": "logo.png",
            "text": {"text": "HI", "position": "corner", "font_size": 32.0}
        }"##;
        let job: QrJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.request.version, 3);
        assert_eq!(job.request.error_correction, ErrorCorrection::L);
        assert!(!job.request.fit);
        assert_eq!(job.filename, PathBuf::from("out/hello.jpg"));
        assert_eq!(job.logo_path, Some(PathBuf::from("logo.png")));
        let text = job.text.unwrap();
        assert_eq!(text.position, TextPosition::Corner);
        assert_eq!(text.font_size, 32.0);
        assert_eq!(text.font_path, None);
    }

    #[test]
    fn load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(QrJob::load(&path), Err(ComposeError::Job(_))));
        assert!(matches!(QrJob::load(&dir.path().join("nope.json")), Err(ComposeError::Io(_))));
    }
}
