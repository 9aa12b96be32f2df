use collector_core::{validate, Accepted, Limits, ProbeResult, Rejection, MIB};
use url::Url;

fn probe(status: u16, content_length: u64, content_type: Option<&str>) -> ProbeResult {
    ProbeResult {
        status,
        content_length,
        content_type: content_type.map(str::to_string),
        last_modified: None,
        final_url: Url::parse("http://a.test/x.png").unwrap(),
        redirects: 0,
    }
}

fn limits() -> Limits {
    Limits::new("/tmp")
}

#[test]
fn accepted_probe_reports_extension() {
    let result = validate(&probe(200, 100, Some("image/png")), &limits());
    assert_eq!(result, Ok(Accepted { extension: "png" }));
}

#[test]
fn client_errors_and_empty_bodies_are_not_found() {
    assert_eq!(
        validate(&probe(404, 100, Some("image/png")), &limits()),
        Err(Rejection::NotFound)
    );
    assert_eq!(
        validate(&probe(200, 0, Some("image/png")), &limits()),
        Err(Rejection::NotFound)
    );
}

#[test]
fn not_found_wins_over_later_checks() {
    assert_eq!(
        validate(&probe(410, 10 * MIB, Some("text/html")), &limits()),
        Err(Rejection::NotFound)
    );
}

#[test]
fn size_cap_is_inclusive() {
    let max = limits().max_size_bytes;
    assert!(validate(&probe(200, max, Some("image/jpeg")), &limits()).is_ok());
    assert_eq!(
        validate(&probe(200, max + 1, Some("image/jpeg")), &limits()),
        Err(Rejection::TooLarge { max_bytes: max })
    );
}

#[test]
fn six_megabytes_is_too_large_by_default() {
    assert_eq!(
        validate(&probe(200, 6_291_456, Some("image/png")), &limits()),
        Err(Rejection::TooLarge { max_bytes: 5 * MIB })
    );
}

#[test]
fn unknown_or_missing_content_type_is_rejected() {
    assert_eq!(
        validate(&probe(200, 10, Some("text/html")), &limits()),
        Err(Rejection::InvalidContentType)
    );
    assert_eq!(
        validate(&probe(200, 10, None), &limits()),
        Err(Rejection::InvalidContentType)
    );
}
