/// Image MIME types that may be saved, with the extension used on disk.
pub const ALLOWED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/gif", "gif"),
    ("image/bmp", "bmp"),
    ("image/x-icon", "ico"),
    ("image/vnd.microsoft.icon", "ico"),
    ("image/jpeg", "jpeg"),
    ("image/png", "png"),
    ("image/svg+xml", "svg"),
    ("image/tiff", "tiff"),
    ("image/webm", "webm"),
];

/// `type/subtype` without parameters, lowercased.
pub fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase()
}

pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = mime_essence(content_type);
    ALLOWED_IMAGE_TYPES
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
}
