//! SVG encoding and decoding of notes.
//!
//! Each note is persisted as a self-contained decorative SVG document. The
//! document doubles as the serialized record: three `<text>` elements carry
//! the note's fields and are tagged with stable `id` attributes so the
//! decoder can find them no matter how the surrounding template evolves.
//!
//! - `note-title`: the note title.
//! - `note-body`: four `<tspan>` line fragments holding the content.
//! - `note-meta`: a `Created:` footer with the RFC 3339 creation timestamp.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::trace;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{Note, NoteError, Result};

/// Attribute value marking the title element.
const TITLE_ID: &str = "note-title";
/// Attribute value marking the body element.
const BODY_ID: &str = "note-body";
/// Attribute value marking the footer element.
const META_ID: &str = "note-meta";
/// Literal prefix of the footer text.
const META_PREFIX: &str = "Created:";

/// Word boundaries of the four body lines. Words past the last boundary are
/// dropped on encode.
const LINE_BREAKS: [usize; 5] = [0, 7, 13, 19, 25];

/// Splits note content into the four fixed line fragments rendered in the
/// document body. Lines beyond the available words come out empty.
fn body_lines(content: &str) -> [String; 4] {
    let words: Vec<&str> = content.split_whitespace().collect();
    let slice = |from: usize, to: usize| -> String {
        words[from.min(words.len())..to.min(words.len())].join(" ")
    };

    [
        slice(LINE_BREAKS[0], LINE_BREAKS[1]),
        slice(LINE_BREAKS[1], LINE_BREAKS[2]),
        slice(LINE_BREAKS[2], LINE_BREAKS[3]),
        slice(LINE_BREAKS[3], LINE_BREAKS[4]),
    ]
}

/// Renders a note into its SVG document text.
///
/// Pure and deterministic: the output depends only on the note's fields.
/// Title and content are escaped before interpolation, so markup-significant
/// characters in user text cannot break the document structure.
pub fn render_note(note: &Note) -> String {
    let [line1, line2, line3, line4] =
        body_lines(&note.content).map(|line| escape(line.as_str()).into_owned());
    let title = escape(note.title.as_str());
    let created_at = note.created_at.to_rfc3339();

    trace!("Rendering note {} into SVG document", note.id);

    format!(
        r##"<svg width="440" height="340" viewBox="0 0 440 340" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="bgGradient" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" stop-color="#0a0a12"/>
      <stop offset="100%" stop-color="#1a0f2e"/>
    </linearGradient>

    <filter id="neonGlow" x="-50%" y="-50%" width="200%" height="200%">
      <feDropShadow dx="0" dy="0" stdDeviation="3" flood-color="#ff008c"/>
      <feDropShadow dx="0" dy="0" stdDeviation="6" flood-color="#00eaff"/>
    </filter>

    <pattern id="techGrid" width="14" height="14" patternUnits="userSpaceOnUse">
      <path d="M14 0 L0 0 0 14" fill="none" stroke="rgba(0,234,255,0.05)" stroke-width="0.5"/>
    </pattern>
  </defs>

  <polygon points="30,30 410,20 400,300 20,310"
           fill="url(#bgGradient)" stroke="#00eaff" stroke-width="1.5"
           filter="url(#neonGlow)"/>
  <polygon points="35,35 405,25 395,295 25,305"
           fill="url(#techGrid)" opacity="0.3"/>

  <rect x="30" y="60" width="6" height="220" fill="#ff008c" opacity="0.6"/>
  <rect x="404" y="60" width="6" height="220" fill="#00eaff" opacity="0.6"/>

  <circle cx="30" cy="30" r="4" fill="#00ff99"/>
  <circle cx="410" cy="20" r="4" fill="#ff008c"/>
  <circle cx="400" cy="300" r="4" fill="#00eaff"/>
  <circle cx="20" cy="310" r="4" fill="#ff66cc"/>

  <text id="{TITLE_ID}" x="50" y="70" font-family="Orbitron, monospace" font-size="20" font-weight="bold"
        fill="#00eaff" filter="url(#neonGlow)">{title}</text>

  <line x1="50" y1="80" x2="370" y2="80" stroke="#ff008c" stroke-width="1.5" opacity="0.9"/>

  <text id="{BODY_ID}" x="50" y="115" font-family="Share Tech Mono, monospace" font-size="14" fill="#c0faff">
    <tspan x="50" dy="0">{line1}</tspan>
    <tspan x="50" dy="22">{line2}</tspan>
    <tspan x="50" dy="22">{line3}</tspan>
    <tspan x="50" dy="22">{line4}</tspan>
  </text>

  <rect x="50" y="250" width="320" height="40" rx="4" ry="4"
        fill="rgba(0,234,255,0.08)" stroke="#ff008c" stroke-width="1"
        filter="url(#neonGlow)"/>

  <text id="{META_ID}" x="60" y="275" font-family="Share Tech Mono, monospace" font-size="12"
        fill="#00ff99">{META_PREFIX} {created_at}</text>

  <line x1="370" y1="250" x2="400" y2="240" stroke="#00eaff" stroke-width="2"/>
  <circle cx="400" cy="240" r="4" fill="#ff008c"/>
</svg>
"##
    )
}

/// Returns the `id` attribute of an element, if any.
fn element_id(start: &BytesStart) -> Option<String> {
    for attr in start.attributes().flatten() {
        if attr.key.as_ref() == b"id" {
            if let Ok(value) = attr.unescape_value() {
                return Some(value.into_owned());
            }
        }
    }
    None
}

fn malformed(path: &Path, message: impl Into<String>) -> NoteError {
    NoteError::MalformedRecord {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Which tagged element the decoder is currently inside.
enum Field {
    Title,
    Meta,
}

/// Parses an SVG document back into a note.
///
/// The id is not embedded in the document; it comes from the record's
/// filename and is passed through. `path` is only used for error context.
///
/// Fails with [`NoteError::MalformedRecord`] when any tagged element is
/// missing, the markup does not parse, or the footer timestamp is invalid.
/// Callers must treat that as data corruption, not absence.
pub fn parse_note(id: u64, path: &Path, document: &str) -> Result<Note> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);

    let mut title: Option<String> = None;
    let mut lines: Option<Vec<String>> = None;
    let mut meta: Option<String> = None;

    let mut field: Option<Field> = None;
    let mut in_body = false;
    let mut in_tspan = false;
    let mut fragment = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => match start.name().as_ref() {
                b"text" => match element_id(&start).as_deref() {
                    Some(TITLE_ID) => {
                        field = Some(Field::Title);
                        title = Some(String::new());
                    }
                    Some(BODY_ID) => {
                        in_body = true;
                        lines = Some(Vec::new());
                    }
                    Some(META_ID) => {
                        field = Some(Field::Meta);
                        meta = Some(String::new());
                    }
                    _ => {}
                },
                b"tspan" if in_body => {
                    in_tspan = true;
                    fragment.clear();
                }
                _ => {}
            },
            Ok(Event::Text(text)) => {
                let value = text
                    .unescape()
                    .map_err(|e| malformed(path, format!("invalid character data: {}", e)))?;
                if in_tspan {
                    fragment.push_str(&value);
                } else {
                    match field {
                        Some(Field::Title) => {
                            if let Some(buffer) = title.as_mut() {
                                buffer.push_str(&value);
                            }
                        }
                        Some(Field::Meta) => {
                            if let Some(buffer) = meta.as_mut() {
                                buffer.push_str(&value);
                            }
                        }
                        None => {}
                    }
                }
            }
            Ok(Event::End(end)) => match end.name().as_ref() {
                b"tspan" if in_body => {
                    in_tspan = false;
                    if let Some(list) = lines.as_mut() {
                        list.push(std::mem::take(&mut fragment));
                    }
                }
                b"text" => {
                    field = None;
                    in_body = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(path, format!("invalid markup: {}", e))),
        }
    }

    let title = title.ok_or_else(|| malformed(path, "missing title element"))?;
    let lines = lines.ok_or_else(|| malformed(path, "missing body element"))?;
    let meta = meta.ok_or_else(|| malformed(path, "missing footer element"))?;

    // Empty trailing fragments are rendering artifacts, not content.
    let content = lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let stamp = meta
        .strip_prefix(META_PREFIX)
        .ok_or_else(|| malformed(path, format!("footer does not start with '{}'", META_PREFIX)))?
        .trim();
    let created_at = DateTime::parse_from_rfc3339(stamp)
        .map_err(|e| malformed(path, format!("invalid creation timestamp '{}': {}", stamp, e)))?
        .with_timezone(&Utc);

    trace!("Decoded note {} from SVG document", id);

    Ok(Note {
        id,
        title,
        content,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_note(title: &str, content: &str) -> Note {
        Note {
            id: 7,
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
        }
    }

    fn record_path() -> &'static Path {
        Path::new("7.svg")
    }

    #[test]
    fn round_trip_preserves_fields() {
        let note = sample_note("Groceries", "milk eggs bread");
        let document = render_note(&note);
        let parsed = parse_note(note.id, record_path(), &document).unwrap();
        assert_eq!(parsed, note);
    }

    #[test]
    fn round_trip_escapes_markup_characters() {
        let note = sample_note("Tags & <tricks>", "a < b && b > \"c\"");
        let document = render_note(&note);
        let parsed = parse_note(note.id, record_path(), &document).unwrap();
        assert_eq!(parsed.title, "Tags & <tricks>");
        assert_eq!(parsed.content, "a < b && b > \"c\"");
    }

    #[test]
    fn content_truncates_after_twenty_five_words() {
        let words: Vec<String> = (0..30).map(|i| format!("w{}", i)).collect();
        let note = sample_note("Long", &words.join(" "));
        let document = render_note(&note);
        let parsed = parse_note(note.id, record_path(), &document).unwrap();
        assert_eq!(parsed.content, words[..25].join(" "));
    }

    #[test]
    fn body_lines_split_at_word_boundaries() {
        let words: Vec<String> = (0..25).map(|i| format!("w{}", i)).collect();
        let lines = body_lines(&words.join(" "));
        assert_eq!(lines[0], words[..7].join(" "));
        assert_eq!(lines[1], words[7..13].join(" "));
        assert_eq!(lines[2], words[13..19].join(" "));
        assert_eq!(lines[3], words[19..25].join(" "));
    }

    #[test]
    fn short_content_leaves_later_lines_empty() {
        let lines = body_lines("milk eggs bread");
        assert_eq!(lines[0], "milk eggs bread");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn rejects_document_without_title() {
        let document = concat!(
            "<svg><text id=\"note-body\"><tspan>x</tspan></text>",
            "<text id=\"note-meta\">Created: 2025-03-14T09:26:53+00:00</text></svg>"
        );
        let err = parse_note(1, record_path(), document).unwrap_err();
        assert!(matches!(err, NoteError::MalformedRecord { .. }));
    }

    #[test]
    fn rejects_document_without_body() {
        let document = concat!(
            "<svg><text id=\"note-title\">t</text>",
            "<text id=\"note-meta\">Created: 2025-03-14T09:26:53+00:00</text></svg>"
        );
        let err = parse_note(1, record_path(), document).unwrap_err();
        assert!(matches!(err, NoteError::MalformedRecord { .. }));
    }

    #[test]
    fn rejects_document_without_footer() {
        let document =
            "<svg><text id=\"note-title\">t</text><text id=\"note-body\"><tspan>x</tspan></text></svg>";
        let err = parse_note(1, record_path(), document).unwrap_err();
        assert!(matches!(err, NoteError::MalformedRecord { .. }));
    }

    #[test]
    fn rejects_unparseable_timestamp() {
        let document = concat!(
            "<svg><text id=\"note-title\">t</text>",
            "<text id=\"note-body\"><tspan>x</tspan></text>",
            "<text id=\"note-meta\">Created: yesterday</text></svg>"
        );
        let err = parse_note(1, record_path(), document).unwrap_err();
        assert!(matches!(err, NoteError::MalformedRecord { .. }));
    }

    #[test]
    fn rejects_non_markup_document() {
        let err = parse_note(1, record_path(), "this is not a note record").unwrap_err();
        assert!(matches!(err, NoteError::MalformedRecord { .. }));
    }

    #[test]
    fn decoder_ignores_template_decoration() {
        // Template edits around the tagged elements must not affect decoding.
        let note = sample_note("Stable", "fields are found by id");
        let document = render_note(&note).replace(
            "<line x1=\"50\" y1=\"80\"",
            "<circle cx=\"1\" cy=\"1\" r=\"1\"/><line x1=\"50\" y1=\"80\"",
        );
        let parsed = parse_note(note.id, record_path(), &document).unwrap();
        assert_eq!(parsed, note);
    }
}
