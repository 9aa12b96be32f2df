use std::io::{BufReader, Cursor, Read};

use collector_core::{InvalidJob, JobSource, Separator, SourceError, SourceItem};
use pretty_assertions::assert_eq;

fn collect(input: &str, separator: Separator) -> Vec<SourceItem> {
    JobSource::new(Cursor::new(input.as_bytes().to_vec()), separator)
        .map(|item| item.unwrap())
        .collect()
}

fn summary(items: &[SourceItem]) -> Vec<(usize, String, bool)> {
    items
        .iter()
        .map(|item| match item {
            SourceItem::Job(job) => (job.index, job.raw.clone(), true),
            SourceItem::Invalid(InvalidJob { index, raw }) => (*index, raw.clone(), false),
        })
        .collect()
}

#[test]
fn whitespace_source_yields_valid_and_invalid_items_in_order() {
    let items = collect(
        "http://a.test/x.png not-a-url\n\n  https://b.test/y.gif\t",
        Separator::Whitespace,
    );
    assert_eq!(
        summary(&items),
        vec![
            (1, "http://a.test/x.png".to_string(), true),
            (2, "not-a-url".to_string(), false),
            (3, "https://b.test/y.gif".to_string(), true),
        ]
    );
}

#[test]
fn custom_separator_trims_segments_and_counts_empty_ones() {
    let items = collect(
        " http://a.test/1.png ,, ,http://a.test/2.png,\n",
        Separator::Byte(b','),
    );
    assert_eq!(
        summary(&items),
        vec![
            (1, "http://a.test/1.png".to_string(), true),
            (4, "http://a.test/2.png".to_string(), true),
        ]
    );
}

#[test]
fn blank_lines_keep_indices_aligned_with_line_numbers() {
    let items = collect(
        "http://a.test/1.png\n\nnot-a-url\n\nhttp://a.test/2.png\n",
        Separator::Byte(b'\n'),
    );
    assert_eq!(
        summary(&items),
        vec![
            (1, "http://a.test/1.png".to_string(), true),
            (3, "not-a-url".to_string(), false),
            (5, "http://a.test/2.png".to_string(), true),
        ]
    );
}

#[test]
fn whitespace_runs_are_a_single_boundary() {
    let items = collect(
        "\n  http://a.test/1.png \t\r\n http://a.test/2.png  ",
        Separator::Whitespace,
    );
    assert_eq!(
        items.iter().map(SourceItem::index).collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[test]
fn segments_spanning_buffer_refills_are_reassembled() {
    let input = format!("http://a.test/{} http://b.test/z.png", "p".repeat(64));
    let reader = BufReader::with_capacity(8, Cursor::new(input.into_bytes()));
    let items: Vec<_> = JobSource::new(reader, Separator::Whitespace)
        .map(|item| item.unwrap())
        .collect();
    assert_eq!(items.len(), 2);
    match &items[0] {
        SourceItem::Job(job) => assert_eq!(job.url.path().len(), 65),
        other => panic!("expected a job, got {other:?}"),
    }
    assert_eq!(items[1].index(), 2);
}

#[test]
fn invalid_scheme_is_reported_not_dropped() {
    let items = collect("ftp://a.test/x.png", Separator::Whitespace);
    assert_eq!(
        items,
        vec![SourceItem::Invalid(InvalidJob {
            index: 1,
            raw: "ftp://a.test/x.png".to_string(),
        })]
    );
}

#[test]
fn opening_a_missing_file_is_a_typed_error() {
    let temp = tempfile::TempDir::new().unwrap();
    let err = JobSource::open(&temp.path().join("absent.txt"), Separator::Whitespace)
        .err()
        .expect("missing source must fail");
    assert!(matches!(err, SourceError::Missing { .. }));
}

#[test]
fn reopening_restarts_from_the_first_segment() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("urls.txt");
    std::fs::write(&path, "http://a.test/1.png\nhttp://a.test/2.png\n").unwrap();

    let first: Vec<_> = JobSource::open(&path, Separator::Byte(b'\n'))
        .unwrap()
        .take(1)
        .map(|item| item.unwrap().index())
        .collect();
    let second: Vec<_> = JobSource::open(&path, Separator::Byte(b'\n'))
        .unwrap()
        .map(|item| item.unwrap().index())
        .collect();
    assert_eq!(first, vec![1]);
    assert_eq!(second, vec![1, 2]);
}

struct FailingReader {
    served: bool,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.served {
            return Err(std::io::Error::other("disk went away"));
        }
        self.served = true;
        let chunk = b"http://a.test/1.png ";
        buf[..chunk.len()].copy_from_slice(chunk);
        Ok(chunk.len())
    }
}

#[test]
fn read_failure_surfaces_once_and_ends_the_stream() {
    let reader = BufReader::new(FailingReader { served: false });
    let mut source = JobSource::new(reader, Separator::Whitespace);
    assert!(matches!(source.next(), Some(Ok(SourceItem::Job(_)))));
    assert!(matches!(source.next(), Some(Err(SourceError::Read(_)))));
    assert!(source.next().is_none());
}
