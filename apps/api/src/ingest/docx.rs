//! DOCX → plain text.
//!
//! A .docx is a zip archive; the body lives in `word/document.xml`. Only run
//! text (`<w:t>`) is kept, paragraphs become newlines, and XML entities are
//! decoded. Tables come out as their cell text in reading order.

use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).context("file is not a valid DOCX archive")?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .context("DOCX archive has no main document part")?
        .read_to_string(&mut xml)
        .context("failed to read the main document part")?;

    Ok(document_xml_to_text(&xml))
}

/// Walks the WordprocessingML markup tag by tag, keeping text in document order.
fn document_xml_to_text(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len() / 4);
    let mut in_run = false;
    let mut in_text = false;
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        if in_text {
            out.push_str(&decode_entities(&rest[..open]));
        }
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let closing = tag.starts_with('/');
        let self_closing = tag.ends_with('/');
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("");

        match name {
            "w:r" => in_run = !closing && !self_closing,
            "w:t" => in_text = !closing && !self_closing,
            // Tab stops inside paragraph properties are also `w:tab`; only runs count.
            "w:tab" if in_run && !closing => out.push('\t'),
            "w:br" | "w:cr" if in_run && !closing => out.push('\n'),
            "w:p" if closing || self_closing => out.push('\n'),
            _ => {}
        }
    }

    out.trim_end().to_string()
}

/// Decodes the five predefined XML entities plus numeric character references.
/// Unknown entities are left untouched.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail.find(';').and_then(|semi| {
            let entity = &tail[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi + 1))
        });

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
