use lopdf::{Document, Object, Stream, dictionary};

use super::xmp;
use crate::core::{EngineError, XmlSyntax};

/// Conventional attachment filename for each embedded syntax.
pub fn attachment_filename(syntax: XmlSyntax) -> &'static str {
    match syntax {
        XmlSyntax::Cii => "factur-x.xml",
        XmlSyntax::Ubl => "xrechnung.xml",
        XmlSyntax::FatturaPa => "fattura.xml",
        XmlSyntax::KsefFa2 | XmlSyntax::KsefFa3 => "faktura.xml",
    }
}

/// Embed an XML payload into a PDF as a PDF/A-3 file attachment.
///
/// Takes existing PDF bytes and returns the modified bytes with the XML
/// attached under the syntax's conventional filename and the matching XMP
/// metadata block installed.
pub fn embed_xml(pdf_bytes: &[u8], xml: &str, syntax: XmlSyntax) -> Result<Vec<u8>, EngineError> {
    let mut doc = Document::load_mem(pdf_bytes)
        .map_err(|e| EngineError::Render(format!("failed to load PDF for embedding: {e}")))?;

    embed_into_document(&mut doc, xml.as_bytes(), syntax)?;

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| EngineError::Render(format!("failed to save PDF: {e}")))?;
    Ok(output)
}

fn embed_into_document(
    doc: &mut Document,
    xml_bytes: &[u8],
    syntax: XmlSyntax,
) -> Result<(), EngineError> {
    let filename = attachment_filename(syntax);

    // 1. EmbeddedFile stream
    let ef_stream = Stream::new(
        dictionary! {
            "Type" => "EmbeddedFile",
            "Subtype" => Object::Name(b"text#2Fxml".to_vec()),
            "Params" => dictionary! {
                "Size" => Object::Integer(xml_bytes.len() as i64),
            },
        },
        xml_bytes.to_vec(),
    );
    let ef_stream_id = doc.add_object(ef_stream);

    // 2. FileSpec dictionary
    let filespec = dictionary! {
        "Type" => "Filespec",
        "F" => Object::string_literal(filename),
        "UF" => Object::string_literal(filename),
        "Desc" => Object::string_literal("Machine-readable invoice payload"),
        "AFRelationship" => Object::Name(b"Alternative".to_vec()),
        "EF" => dictionary! {
            "F" => Object::Reference(ef_stream_id),
            "UF" => Object::Reference(ef_stream_id),
        },
    };
    let filespec_id = doc.add_object(filespec);

    // 3. EmbeddedFiles name tree
    let ef_name_tree = dictionary! {
        "Names" => Object::Array(vec![
            Object::string_literal(filename),
            Object::Reference(filespec_id),
        ]),
    };
    let ef_name_tree_id = doc.add_object(ef_name_tree);

    // 4. Names dictionary
    let names_dict = dictionary! {
        "EmbeddedFiles" => Object::Reference(ef_name_tree_id),
    };
    let names_id = doc.add_object(names_dict);

    // 5. XMP metadata stream — must not be compressed per PDF/A
    let xmp_bytes = xmp::build_xmp(syntax, filename).into_bytes();
    let metadata_stream = Stream::new(
        dictionary! {
            "Type" => "Metadata",
            "Subtype" => "XML",
        },
        xmp_bytes,
    )
    .with_compression(false);
    let metadata_id = doc.add_object(metadata_stream);

    // 6. Update the catalog
    let catalog = doc
        .catalog_mut()
        .map_err(|e| EngineError::Render(format!("failed to get PDF catalog: {e}")))?;

    catalog.set("AF", Object::Array(vec![Object::Reference(filespec_id)]));
    catalog.set("Names", Object::Reference(names_id));
    catalog.set("Metadata", Object::Reference(metadata_id));
    catalog.set("MarkInfo", dictionary! { "Marked" => Object::Boolean(true) });

    Ok(())
}
