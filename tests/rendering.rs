use chrono::{Local, TimeZone};
use geo_report::fonts;
use geo_report::input::parse_json;
use geo_report::metadata::read_info_entry;
use geo_report::model::score::ScoreReport;
use geo_report::report::{score, RenderContext};
use geo_report::theme::Theme;
use sha2::{Digest, Sha256};

const SCORE_PAYLOAD: &str = r#"{
    "url": "https://example.com",
    "analyzedAt": "2024-01-15T10:30:00Z",
    "totalScore": 68,
    "grade": "B",
    "pages": [
        {"url": "https://example.com/", "scores": {"structure": 70, "schema": 60, "url": 80, "meta": 65, "total": 69}},
        {"url": "https://example.com/blog/first", "scores": {"structure": 50, "schema": 40, "url": 90, "meta": 55, "total": 58}}
    ],
    "categories": {
        "structure": {"score": 21, "maxScore": 30, "percentage": 70, "items": [
            {"name": "Heading hierarchy", "score": 8, "maxScore": 10, "passed": true, "detail": "One h1 per page"}
        ]}
    },
    "recommendations": [{"priority": "high", "category": "schema", "issue": "Add Organization markup"}]
}"#;

fn render_sample_pdf() -> Option<Vec<u8>> {
    if !fonts::default_fonts_available() {
        return None;
    }

    let data: ScoreReport = parse_json(SCORE_PAYLOAD).expect("valid payload");
    let generated_at = Local
        .with_ymd_and_hms(2024, 1, 16, 9, 0, 0)
        .single()
        .expect("valid local time");
    let context = RenderContext::at(Theme::audit(), generated_at);
    let family = fonts::default_font_family().expect("font family");
    let bytes = score::assemble(&data, &context)
        .render(&context.theme, family)
        .expect("render score report");

    Some(bytes)
}

/// Volatile values written by the PDF backend, as (opening, closing) markers.
const VOLATILE: &[(&str, &str)] = &[
    ("/CreationDate(", ")"),
    ("/ModDate(", ")"),
    ("/ID[", "]"),
    ("/Producer(", ")"),
    ("<xmp:CreateDate>", "</xmp:CreateDate>"),
    ("<xmp:ModifyDate>", "</xmp:ModifyDate>"),
    ("<xmp:MetadataDate>", "</xmp:MetadataDate>"),
    ("<xmpMM:DocumentID>", "</xmpMM:DocumentID>"),
    ("<xmpMM:InstanceID>", "</xmpMM:InstanceID>"),
    ("<xmpMM:VersionID>", "</xmpMM:VersionID>"),
];

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

/// Zeroes every volatile value, keeping delimiters and whitespace in place.
fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    let mut normalized = bytes.to_vec();
    for (open, close) in VOLATILE {
        let (open, close) = (open.as_bytes(), close.as_bytes());
        let mut cursor = 0;
        while let Some(found) = find(&normalized, open, cursor) {
            let value_start = found + open.len();
            let Some(value_end) = find(&normalized, close, value_start) else {
                break;
            };
            for byte in &mut normalized[value_start..value_end] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            cursor = value_end + close.len();
        }
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

#[test]
fn renders_a_pdf_document() {
    let Some(bytes) = render_sample_pdf() else {
        eprintln!("Skipping renders_a_pdf_document: no usable font family found.");
        return;
    };
    assert!(bytes.starts_with(b"%PDF"), "output should start with the PDF header");
}

#[test]
fn rendering_is_deterministic() {
    let (Some(first), Some(second)) = (render_sample_pdf(), render_sample_pdf()) else {
        eprintln!("Skipping rendering_is_deterministic: no usable font family found.");
        return;
    };

    assert_eq!(first.len(), second.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&first),
        normalized_hash(&second),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn scrubbing_only_touches_volatile_values() {
    let raw = b"/Title(Report)/CreationDate(D:20240116090000)/ID[<ab12> <cd34>]";
    let scrubbed = scrub_pdf(raw);
    assert_eq!(
        scrubbed,
        b"/Title(Report)/CreationDate(0000000000000000)/ID[<0000> <0000>]".to_vec()
    );
}

#[test]
fn info_dictionary_names_the_report() {
    let Some(bytes) = render_sample_pdf() else {
        eprintln!("Skipping info_dictionary_names_the_report: no usable font family found.");
        return;
    };

    let title = read_info_entry(&bytes, "Title").expect("readable info");
    assert_eq!(title.as_deref(), Some(score::TITLE));
    let author = read_info_entry(&bytes, "Author").expect("readable info");
    assert_eq!(author.as_deref(), Some("GEO Tracker"));
    let subject = read_info_entry(&bytes, "Subject").expect("readable info");
    assert_eq!(subject.as_deref(), Some("https://example.com"));
}
