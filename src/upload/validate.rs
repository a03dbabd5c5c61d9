//! Upload type checks.
//!
//! Declared MIME types and extensions come from the client and cannot be
//! trusted on their own, so acceptance happens in two phases: an allow-list
//! check on the declared MIME at ingress, then a magic-number sniff of the
//! stored bytes. A file is only kept when the sniffed content agrees with
//! the type it was declared as.

/// Logical file types the system accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Doc,
    Docx,
    Png,
    Jpg,
    Gif,
}

impl FileKind {
    pub const ALL: [FileKind; 6] = [
        FileKind::Pdf,
        FileKind::Doc,
        FileKind::Docx,
        FileKind::Png,
        FileKind::Jpg,
        FileKind::Gif,
    ];

    /// MIME strings accepted for this type at the declared-type phase.
    pub fn accepted_mimes(self) -> &'static [&'static str] {
        match self {
            FileKind::Pdf => &["application/pdf"],
            FileKind::Doc => &["application/msword"],
            FileKind::Docx => {
                &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"]
            }
            FileKind::Png => &["image/png"],
            FileKind::Jpg => &["image/jpeg", "image/jpg"],
            FileKind::Gif => &["image/gif"],
        }
    }

    pub fn canonical_mime(self) -> &'static str {
        self.accepted_mimes()[0]
    }

    /// Resolve a declared MIME against the allow-list.
    pub fn from_declared_mime(mime: &str) -> Option<FileKind> {
        let mime = mime.to_lowercase();
        FileKind::ALL
            .into_iter()
            .find(|kind| kind.accepted_mimes().contains(&mime.as_str()))
    }
}

/// Leading-byte signatures for every supported type. GIF carries two
/// (GIF87a and GIF89a). The longest signature is 8 bytes.
const SIGNATURES: &[(&[u8], FileKind)] = &[
    (&[0x25, 0x50, 0x44, 0x46], FileKind::Pdf),
    (
        &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1],
        FileKind::Doc,
    ),
    (&[0x50, 0x4B, 0x03, 0x04], FileKind::Docx),
    (
        &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
        FileKind::Png,
    ),
    (&[0xFF, 0xD8, 0xFF], FileKind::Jpg),
    (b"GIF87a", FileKind::Gif),
    (b"GIF89a", FileKind::Gif),
];

/// Bytes of the file head needed to match any known signature.
pub const SNIFF_LENGTH: usize = 8;

/// Identify content by its leading bytes. `None` means no known signature
/// matched, which callers treat as invalid rather than assuming anything.
pub fn sniff_kind(prefix: &[u8]) -> Option<FileKind> {
    SIGNATURES
        .iter()
        .find(|(signature, _)| prefix.starts_with(signature))
        .map(|(_, kind)| *kind)
}

/// Content agreement rule for phase two: the sniffed type's canonical MIME
/// must be acceptable for the type the file was declared as.
pub fn content_matches_declared(declared: FileKind, sniffed: FileKind) -> bool {
    declared
        .accepted_mimes()
        .contains(&sniffed.canonical_mime())
}
