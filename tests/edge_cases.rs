//! Edge case tests for smsxtract
//!
//! These tests cover malformed, truncated and unusual exports that the
//! line-based parser has to tolerate.

use std::fs;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tempfile::tempdir;

use smsxtract::message::{Direction, MessageKind};
use smsxtract::parser::RecordParser;
use smsxtract::pipeline::Extractor;
use smsxtract::store::MessageStore;

fn parse(export: &str) -> Vec<smsxtract::Message> {
    RecordParser::new().parse_str(export).unwrap()
}

fn attachment_block(meta: &str, prev: &str, ct: &str, data: &str, next: &str) -> String {
    [
        meta.to_string(),
        "<parts>".to_string(),
        prev.to_string(),
        format!(r#"<part ct="{ct}" data="{data}" />"#),
        next.to_string(),
        "</parts>".to_string(),
        "</mms>".to_string(),
    ]
    .join("\n")
}

// =========================================================================
// Missing and odd attributes
// =========================================================================

#[test]
fn test_missing_attributes_read_as_empty() {
    let messages = parse("<sms protocol=\"0\" />");
    assert_eq!(messages.len(), 1);
    let msg = &messages[0];
    assert_eq!(msg.address, "");
    assert_eq!(msg.body, "");
    assert_eq!(msg.contact_name, "");
    assert_eq!(msg.display_date, "");
    assert_eq!(msg.timestamp, 0);
    assert_eq!(msg.direction, Direction::Unknown);
}

#[test]
fn test_body_without_toa_runs_to_closing_quote() {
    let messages = parse(r#"<sms protocol="0" address="1" date="1" type="1" body="no toa here" />"#);
    assert_eq!(messages[0].body, "no toa here");
}

#[test]
fn test_body_may_contain_raw_quotes_before_toa() {
    let messages = parse(r#"<sms protocol="0" address="1" date="1" type="1" body="she said "hi" ok" toa="null" />"#);
    assert_eq!(messages[0].body, r#"she said "hi" ok"#);
}

#[test]
fn test_attribute_names_not_confused() {
    let line = r#"<sms protocol="0" readable_date="Mar 3" date="42" contact_name="Carol" address="1" type="1" body="x" toa="null" />"#;
    let msg = &parse(line)[0];
    assert_eq!(msg.timestamp, 42);
    assert_eq!(msg.display_date, "Mar 3");
    assert_eq!(msg.contact_name, "Carol");
}

#[test]
fn test_name_attribute_preferred_over_contact_name() {
    let line = r#"<sms protocol="0" address="1" date="1" type="1" body="x" toa="null" contact_name="Old" name="New" />"#;
    assert_eq!(parse(line)[0].contact_name, "New");
}

#[test]
fn test_type_codes_beyond_two_are_unknown() {
    for code in ["0", "3", "5", ""] {
        let line = format!(r#"<sms protocol="0" address="1" date="1" type="{code}" body="x" toa="null" />"#);
        assert_eq!(parse(&line)[0].direction, Direction::Unknown, "type={code}");
    }
}

// =========================================================================
// Addresses
// =========================================================================

#[test]
fn test_short_codes_kept_verbatim() {
    let line = r#"<sms protocol="0" address="72345" date="1" type="1" body="x" toa="null" />"#;
    assert_eq!(parse(line)[0].address, "72345");
}

#[test]
fn test_country_codes_collapse_into_one_contact() {
    let export = [
        r#"<sms protocol="0" address="+1 5551234567" date="1" type="1" body="a" toa="null" contact_name="Bob" />"#,
        r#"<sms protocol="0" address="5551234567" date="2" type="1" body="b" toa="null" contact_name="Bob" />"#,
        r#"<sms protocol="0" address="0015551234567" date="3" type="1" body="c" toa="null" contact_name="Bob" />"#,
    ]
    .join("\n");

    let store: MessageStore = parse(&export).into_iter().collect();
    assert_eq!(store.contacts().len(), 1);
    assert_eq!(store.contacts()[0].address, "5551234567");
}

// =========================================================================
// Text encoding
// =========================================================================

#[test]
fn test_unicode_bodies_and_names() {
    let line = r#"<sms protocol="0" address="1" date="1" type="1" body="Привет 你好 🌍" toa="null" contact_name="Мария" />"#;
    let msg = &parse(line)[0];
    assert_eq!(msg.body, "Привет 你好 🌍");
    assert_eq!(msg.contact_name, "Мария");
}

#[test]
fn test_entities_in_every_field() {
    let line = r#"<sms protocol="0" address="1" date="1" type="1" body="&lt;3 &amp; &#128512;" toa="null" readable_date="Jan 1 &amp; 2" contact_name="Tom &amp; Jerry" />"#;
    let msg = &parse(line)[0];
    assert_eq!(msg.body, "<3 & 😀");
    assert_eq!(msg.display_date, "Jan 1 & 2");
    assert_eq!(msg.contact_name, "Tom & Jerry");
}

#[test]
fn test_crlf_line_endings() {
    let export = "<smses>\r\n<sms protocol=\"0\" address=\"1\" date=\"1\" type=\"1\" body=\"x\" toa=\"null\" contact_name=\"Bob\" />\r\n</smses>\r\n";
    let messages = parse(export);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].contact_name, "Bob");
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("latin1.xml");
    let mut bytes = br#"<sms protocol="0" address="1" date="1" type="1" body="caf"#.to_vec();
    bytes.push(0xe9);
    bytes.extend_from_slice(br#"" toa="null" contact_name="Bob" />"#);
    fs::write(&input, bytes).unwrap();

    let messages = RecordParser::new().parse(&input).unwrap();
    assert_eq!(messages[0].body, "caf\u{fffd}");
}

// =========================================================================
// Attachments at the edges
// =========================================================================

#[test]
fn test_attachment_without_metadata_is_skipped() {
    let export = format!(
        "<part ct=\"image/png\" data=\"{}\" />\n<x/>\n<sms protocol=\"0\" address=\"1\" date=\"1\" type=\"1\" body=\"ok\" toa=\"null\" />",
        BASE64.encode(b"png")
    );
    let parser = RecordParser::new();
    let mut records = parser.records(export.lines());
    let messages: Vec<_> = records.by_ref().collect::<Result<_, _>>().unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].kind(), MessageKind::Text);
    assert_eq!(records.skipped(), 1);
}

#[test]
fn test_attachment_on_last_line_is_skipped() {
    let export = format!(
        "<mms date=\"1\" address=\"1\">\n<parts>\n<x/>\n<part ct=\"image/gif\" data=\"{}\" />",
        BASE64.encode(b"gif")
    );
    let parser = RecordParser::new();
    let mut records = parser.records(export.lines());
    assert!(records.next().is_none());
    assert_eq!(records.skipped(), 1);
}

#[test]
fn test_skipped_records_reported_in_summary() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("edge.xml");
    let export = format!(
        "<part ct=\"image/jpeg\" data=\"{}\" />\n<sms protocol=\"0\" address=\"1\" date=\"1\" type=\"1\" body=\"ok\" toa=\"null\" />\n",
        BASE64.encode(b"jpg")
    );
    fs::write(&input, export).unwrap();

    let summary = Extractor::default().extract_file(&input).unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.skipped_records, 1);
    assert!(!dir.path().join("edge.xml.d/files").exists());
}

#[test]
fn test_payload_with_line_wrapping_whitespace() {
    let encoded = BASE64.encode(b"wrapped payload bytes");
    let (head, tail) = encoded.split_at(8);
    let data = format!("{head} \t{tail}");
    let export = attachment_block(
        r#"<mms date="1" address="1" m_size="10" contact_name="A">"#,
        "<x/>",
        "image/jpeg",
        &data,
        "<y/>",
    );
    let messages = parse(&export);
    assert_eq!(messages[0].payload(), Some(&b"wrapped payload bytes"[..]));
}

#[test]
fn test_empty_payload_is_empty_file() {
    let export = attachment_block(
        r#"<mms date="1" address="1" m_size="null">"#,
        "<x/>",
        "image/png",
        "",
        "<y/>",
    );
    let messages = parse(&export);
    assert_eq!(messages[0].payload(), Some(&b""[..]));
    assert_eq!(messages[0].direction, Direction::Outgoing);
}

#[test]
fn test_unsafe_source_names_fall_back_to_counter() {
    for src in ["", "..", "dir/"] {
        let prev = format!(r#"<part text="<img src="{src}" />" />"#);
        let export = attachment_block(
            r#"<mms date="1" address="1" m_size="1">"#,
            &prev,
            "image/png",
            "",
            "<y/>",
        );
        assert_eq!(parse(&export)[0].payload_name(), Some("img_001.png"), "src={src:?}");
    }
}

#[test]
fn test_unknown_media_types_are_ignored() {
    let export = attachment_block(
        r#"<mms date="1" address="1" m_size="1">"#,
        "<x/>",
        "audio/amr",
        &BASE64.encode(b"amr"),
        "<y/>",
    );
    assert!(parse(&export).is_empty());
}

// =========================================================================
// Output naming
// =========================================================================

#[test]
fn test_contact_name_with_slash_is_sanitized() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sms.xml");
    fs::write(
        &input,
        r#"<sms protocol="0" address="5551234567" date="1" type="1" body="x" toa="null" contact_name="Mom/Dad" />"#,
    )
    .unwrap();

    Extractor::default().extract_file(&input).unwrap();
    assert!(dir.path().join("sms.xml.d/messages/5551234567_Mom_Dad.txt").is_file());
}

#[test]
fn test_empty_export_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty.xml");
    fs::write(&input, "").unwrap();

    let summary = Extractor::default().extract_file(&input).unwrap();
    assert_eq!(summary.total, 0);
    assert_eq!(summary.first_message, None);

    let root = dir.path().join("empty.xml.d");
    assert_eq!(fs::read_dir(root.join("messages")).unwrap().count(), 0);
    assert!(!root.join("files").exists());
}
