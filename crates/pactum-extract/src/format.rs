//! Document formats the extraction backends accept.

use aws_sdk_bedrockruntime::types::DocumentFormat;

use crate::error::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Doc,
    Xlsx,
    Xls,
    Csv,
    Html,
    Markdown,
    Text,
}

impl DocumentKind {
    /// Detect the kind from a filename's extension.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "doc" => Ok(Self::Doc),
            "xlsx" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            "csv" => Ok(Self::Csv),
            "html" | "htm" => Ok(Self::Html),
            "md" | "markdown" => Ok(Self::Markdown),
            "txt" => Ok(Self::Text),
            _ => Err(ExtractError::UnsupportedFormat(filename.to_string())),
        }
    }

    pub fn bedrock_format(self) -> DocumentFormat {
        match self {
            Self::Pdf => DocumentFormat::Pdf,
            Self::Docx => DocumentFormat::Docx,
            Self::Doc => DocumentFormat::Doc,
            Self::Xlsx => DocumentFormat::Xlsx,
            Self::Xls => DocumentFormat::Xls,
            Self::Csv => DocumentFormat::Csv,
            Self::Html => DocumentFormat::Html,
            Self::Markdown => DocumentFormat::Md,
            Self::Text => DocumentFormat::Txt,
        }
    }

    /// Plain-text formats that can be sent as UTF-8 text instead of bytes.
    pub fn is_plain_text(self) -> bool {
        matches!(self, Self::Csv | Self::Html | Self::Markdown | Self::Text)
    }
}

/// Sanitize a filename for use as a Bedrock `DocumentBlock` name.
///
/// The name field only allows alphanumeric characters, single whitespace,
/// hyphens, parentheses, and square brackets.
pub fn sanitize_document_name(filename: &str) -> String {
    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename);

    let mut result = String::with_capacity(stem.len());
    let mut prev_space = false;
    for c in stem.chars() {
        let c = if c.is_alphanumeric() || matches!(c, '-' | '(' | ')' | '[' | ']') {
            c
        } else {
            ' '
        };
        if c == ' ' {
            if !prev_space {
                result.push(c);
            }
            prev_space = true;
        } else {
            result.push(c);
            prev_space = false;
        }
    }

    let trimmed = result.trim();
    if trimmed.is_empty() {
        "document".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_extension() {
        assert_eq!(DocumentKind::from_filename("acme.PDF").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("terms.md").unwrap(), DocumentKind::Markdown);
        assert!(DocumentKind::Text.is_plain_text());
        assert!(!DocumentKind::Pdf.is_plain_text());
        assert!(matches!(
            DocumentKind::from_filename("scan.tiff"),
            Err(ExtractError::UnsupportedFormat(_))
        ));
        assert!(DocumentKind::from_filename("README").is_err());
    }

    #[test]
    fn sanitized_names_keep_allowed_characters() {
        assert_eq!(
            sanitize_document_name("Acme_PPA  (final) [v2].pdf"),
            "Acme PPA (final) [v2]"
        );
        assert_eq!(sanitize_document_name("___.pdf"), "document");
    }
}
