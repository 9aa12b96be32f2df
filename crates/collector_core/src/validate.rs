use crate::{extension_for, Limits, ProbeResult, Rejection};

/// A probe that passed every policy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub extension: &'static str,
}

/// Checks probe metadata against the static policy. First failing check wins:
/// not found, then size, then content type.
pub fn validate(probe: &ProbeResult, limits: &Limits) -> Result<Accepted, Rejection> {
    if (400..500).contains(&probe.status) || probe.content_length == 0 {
        return Err(Rejection::NotFound);
    }
    if probe.content_length > limits.max_size_bytes {
        return Err(Rejection::TooLarge {
            max_bytes: limits.max_size_bytes,
        });
    }
    let extension = probe
        .content_type
        .as_deref()
        .and_then(extension_for)
        .ok_or(Rejection::InvalidContentType)?;
    Ok(Accepted { extension })
}
