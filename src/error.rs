use thiserror::Error;

use crate::models::{OutputFormat, Section};

/// Failures while building an export package.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A single slide could not be rendered. No partial package is produced.
    #[error("slide {slide} ({section}): {reason}")]
    Slide {
        slide: usize,
        section: Section,
        reason: String,
    },

    #[error("unsupported export format: {0}")]
    UnsupportedFormat(OutputFormat),

    #[error("failed to write package: {0}")]
    Package(#[from] std::io::Error),
}

impl ExportError {
    /// Whether the caller can fix the failure by changing the request: an
    /// unsupported format or slide content that cannot be drawn.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_) | Self::Slide { .. })
    }
}

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("slide {index} out of range (deck has {count} slides)")]
    SlideOutOfRange { index: usize, count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_and_format_errors_are_the_callers() {
        let slide = ExportError::Slide {
            slide: 1,
            section: Section::Cover,
            reason: "client logo is not valid base64".to_string(),
        };
        assert!(slide.is_client_error());
        assert!(ExportError::UnsupportedFormat(OutputFormat::Pdf).is_client_error());

        let io = std::io::Error::other("disk full");
        assert!(!ExportError::Package(io).is_client_error());
    }
}
