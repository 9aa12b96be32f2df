use chrono::{DateTime, NaiveDateTime, Utc};
use url::Url;

/// Metadata returned by the final response of a probe (after redirects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub status: u16,
    /// Declared length; a missing or unparsable header counts as zero.
    pub content_length: u64,
    pub content_type: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    /// URL that produced this response.
    pub final_url: Url,
    pub redirects: u32,
}

/// Parses a `Last-Modified` style header value.
///
/// Accepts the IMF-fixdate / RFC 2822 form, RFC 850 and asctime. Anything
/// else yields `None`, which callers treat the same as an absent header.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    const LEGACY_FORMATS: &[&str] = &[
        // RFC 850: Sunday, 06-Nov-94 08:49:37 GMT
        "%A, %d-%b-%y %H:%M:%S GMT",
        // asctime: Sun Nov  6 08:49:37 1994
        "%a %b %e %H:%M:%S %Y",
    ];
    LEGACY_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(value, format)
            .ok()
            .map(|naive| naive.and_utc())
    })
}
