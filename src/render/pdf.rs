//! In-process PDF rasterizer.
//!
//! Turns the builder's plain-text markup into a paginated A4 document with
//! lopdf. Deterministic and allocation-only — no external rendering engine
//! process, so there is nothing to time-bound or leak on error paths.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::core::EngineError;

const PAGE_WIDTH: i64 = 595; // A4 portrait, points
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;

struct TextLine {
    text: String,
    font: &'static str,
    size: i64,
    advance: i64,
}

fn classify(line: &str) -> TextLine {
    if let Some(rest) = line.strip_prefix("# ") {
        TextLine {
            text: rest.to_string(),
            font: "F2",
            size: 16,
            advance: 24,
        }
    } else if let Some(rest) = line.strip_prefix("## ") {
        TextLine {
            text: rest.to_string(),
            font: "F2",
            size: 11,
            advance: 18,
        }
    } else if line.starts_with('|') {
        TextLine {
            text: line.to_string(),
            font: "F3",
            size: 8,
            advance: 12,
        }
    } else {
        TextLine {
            text: line.to_string(),
            font: "F1",
            size: 10,
            advance: 14,
        }
    }
}

/// Rasterize markup into PDF bytes.
pub fn rasterize(markup: &str) -> Result<Vec<u8>, EngineError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let font_mono = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_regular,
            "F2" => font_bold,
            "F3" => font_mono,
        },
    });

    // Paginate: top-down cursor, new page when the cursor passes the margin.
    let mut pages: Vec<Vec<Operation>> = Vec::new();
    let mut ops: Vec<Operation> = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    for raw in markup.lines() {
        if raw.trim().is_empty() {
            y -= 8;
            continue;
        }
        let line = classify(raw);
        y -= line.advance;
        if y < MARGIN {
            pages.push(std::mem::take(&mut ops));
            y = PAGE_HEIGHT - MARGIN - line.advance;
        }
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![line.font.into(), line.size.into()],
        ));
        ops.push(Operation::new("Td", vec![MARGIN.into(), y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.text)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
    pages.push(ops);

    let mut page_ids = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| EngineError::Render(format!("content stream encoding failed: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    let count = page_ids.len() as i64;
    let kids: Vec<Object> = page_ids.into_iter().map(Object::Reference).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| EngineError::Render(format!("failed to serialize PDF: {e}")))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_valid_pdf_header() {
        let bytes = rasterize("# INVOICE FA-001\n\nIssue date: 2025-03-10").unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn long_documents_paginate() {
        let mut markup = String::from("# LONG DOCUMENT\n");
        for i in 0..200 {
            markup.push_str(&format!("Line {i}\n"));
        }
        let bytes = rasterize(&markup).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() >= 2, "expected multiple pages");
    }

    #[test]
    fn output_is_deterministic() {
        let markup = "# INVOICE\nSame input";
        assert_eq!(rasterize(markup).unwrap(), rasterize(markup).unwrap());
    }
}
