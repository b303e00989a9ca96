//! Content classification by leading bytes.

/// What a blob looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ContentKind {
    Image,
    Audio,
    Text,
    Binary,
}

/// A blob prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// JPEG or PNG bytes.
    Image(Vec<u8>),
    /// RIFF or `ftyp` bytes.
    Audio(Vec<u8>),
    /// Valid UTF-8.
    Text(String),
    /// Anything else, rendered as lowercase hex. Display only.
    Binary { hex: String },
}

impl Content {
    /// The kind this content was classified as.
    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Image(_) => ContentKind::Image,
            Content::Audio(_) => ContentKind::Audio,
            Content::Text(_) => ContentKind::Text,
            Content::Binary { .. } => ContentKind::Binary,
        }
    }
}

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];
const RIFF_MAGIC: &[u8] = b"RIFF";
const FTYP_MAGIC: &[u8] = b"ftyp";

/// Decides how a blob is shown.
pub struct ContentSniffer;

impl ContentSniffer {
    /// Classify a blob.
    ///
    /// Image signatures win over audio, audio over text. A blob that matches
    /// no signature is text if the whole of it is valid UTF-8.
    pub fn classify(blob: &[u8]) -> ContentKind {
        match sniff(blob) {
            Sniffed::Image => ContentKind::Image,
            Sniffed::Audio => ContentKind::Audio,
            Sniffed::Text(_) => ContentKind::Text,
            Sniffed::Binary => ContentKind::Binary,
        }
    }

    /// Classify and convert a blob in one step.
    pub fn inspect(blob: &[u8]) -> Content {
        match sniff(blob) {
            Sniffed::Image => Content::Image(blob.to_vec()),
            Sniffed::Audio => Content::Audio(blob.to_vec()),
            Sniffed::Text(text) => Content::Text(text.to_string()),
            Sniffed::Binary => Content::Binary {
                hex: hex::encode(blob),
            },
        }
    }
}

enum Sniffed<'a> {
    Image,
    Audio,
    Text(&'a str),
    Binary,
}

fn sniff(blob: &[u8]) -> Sniffed<'_> {
    if blob.starts_with(JPEG_MAGIC) || blob.starts_with(PNG_MAGIC) {
        Sniffed::Image
    } else if blob.starts_with(RIFF_MAGIC) || blob.starts_with(FTYP_MAGIC) {
        Sniffed::Audio
    } else {
        match std::str::from_utf8(blob) {
            Ok(text) => Sniffed::Text(text),
            Err(_) => Sniffed::Binary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_signatures() {
        assert_eq!(ContentSniffer::classify(&[0xFF, 0xD8, 0xFF, 0xE0]), ContentKind::Image);
        assert_eq!(
            ContentSniffer::classify(b"\x89PNG\r\n\x1a\n"),
            ContentKind::Image
        );
    }

    #[test]
    fn test_audio_signatures() {
        assert_eq!(ContentSniffer::classify(b"RIFF\x24\x00\x00\x00WAVE"), ContentKind::Audio);
        assert_eq!(ContentSniffer::classify(b"ftypM4A "), ContentKind::Audio);
    }

    #[test]
    fn test_ftyp_only_at_start() {
        assert_eq!(
            ContentSniffer::classify(b"def ftype():\n    pass"),
            ContentKind::Text
        );
        assert_eq!(
            ContentSniffer::classify(b"\x00\x00\x00\x20ftypisom"),
            ContentKind::Text
        );
    }

    #[test]
    fn test_image_precedence_over_audio() {
        assert_eq!(
            ContentSniffer::classify(b"\x89PNGRIFF....WAVE"),
            ContentKind::Image
        );
        assert_eq!(
            ContentSniffer::classify(b"\xFF\xD8RIFF\x24\x00\x00\x00WAVE"),
            ContentKind::Image
        );
        assert_eq!(
            ContentSniffer::inspect(b"\x89PNGftyp"),
            Content::Image(b"\x89PNGftyp".to_vec())
        );
    }

    #[test]
    fn test_signature_precedence_over_text() {
        // Valid UTF-8, but the signature decides.
        assert_eq!(ContentSniffer::classify(b"RIFF plain words"), ContentKind::Audio);
    }

    #[test]
    fn test_text_and_binary() {
        assert_eq!(ContentSniffer::classify(b"{\"room\": 1}"), ContentKind::Text);
        assert_eq!(ContentSniffer::classify("héllo".as_bytes()), ContentKind::Text);
        assert_eq!(ContentSniffer::classify(&[]), ContentKind::Text);
        assert_eq!(ContentSniffer::classify(&[0xC3, 0x28]), ContentKind::Binary);
    }

    #[test]
    fn test_binary_renders_lowercase_hex() {
        let content = ContentSniffer::inspect(&[0xDE, 0xAD, 0xBE, 0xEF, 0xFF]);
        assert_eq!(
            content,
            Content::Binary {
                hex: "deadbeefff".to_string()
            }
        );
        assert_eq!(content.kind(), ContentKind::Binary);
    }

    #[test]
    fn test_inspect_text() {
        assert_eq!(
            ContentSniffer::inspect(b"print('x')"),
            Content::Text("print('x')".to_string())
        );
    }

    #[test]
    fn test_short_blobs() {
        assert_eq!(ContentSniffer::classify(&[0xFF]), ContentKind::Binary);
        assert_eq!(ContentSniffer::classify(b"RIF"), ContentKind::Text);
    }
}
