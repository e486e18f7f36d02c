use image::ImageFormat;
use url::Url;

/// Extensions kept as-is when taken from the URL path.
pub const KNOWN_EXTENSIONS: &[&str] = &[
    "jpe", "jpeg", "jfif", "exif", "tiff", "gif", "bmp", "png", "webp", "jpg",
];

pub const DEFAULT_EXTENSION: &str = "jpg";

/// File extension for an image URL, from the last path segment.
///
/// Anything outside [`KNOWN_EXTENSIONS`] (including no extension at all)
/// becomes `jpg`.
pub fn extension_for_url(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    };
    let filename = path.rsplit('/').next().unwrap_or("");
    let candidate = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if KNOWN_EXTENSIONS.contains(&candidate.as_str()) {
        candidate
    } else {
        DEFAULT_EXTENSION.to_string()
    }
}

/// Detect the image format from the leading signature bytes.
pub fn sniff_image(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}
