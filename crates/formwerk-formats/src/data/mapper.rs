// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structural mapper — bidirectional transform between an XML element tree
// and the generic value tree, used when XML is one side of a data
// conversion.
//
// The mapping is deliberately lossy in both directions and callers must not
// "repair" it: element attributes are discarded, sibling elements sharing a
// tag name collapse to the last one, and lists recompose as synthetic
// `item_0`, `item_1`, ... child elements. Decomposing what `value_to_xml`
// produced therefore yields an `item_N`-keyed mapping, not the original
// list.

use formwerk_core::error::{FormwerkError, Result};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use super::value::DataValue;

/// Tag name of the synthetic root element wrapped around recomposed values.
const ROOT_TAG: &str = "root";

/// Deepest element nesting the decomposer follows. Documents nested further
/// are rejected as malformed instead of recursed into.
const MAX_DEPTH: usize = 128;

// -- Decompose: XML to value tree ---------------------------------------------

/// Parse an XML document and decompose its root element into a value tree.
///
/// The root always becomes a mapping: each child element contributes one
/// entry named after its tag. A child with element children recurses; a leaf
/// child becomes its text content, or null when the element is empty. The
/// root's own text and all attributes are ignored.
pub fn xml_to_value(xml: &str) -> Result<DataValue> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| FormwerkError::MalformedInput(format!("xml parse: {e}")))?
        {
            Event::Start(_) => {
                let element = read_element(&mut reader, 0)?;
                return Ok(DataValue::Map(element.children));
            }
            Event::Empty(_) => return Ok(DataValue::Map(Vec::new())),
            Event::Eof => {
                return Err(FormwerkError::MalformedInput(
                    "xml document has no root element".to_string(),
                ));
            }
            // Skip the declaration, comments, and whitespace before the root.
            _ => {}
        }
        buf.clear();
    }
}

/// Body of one element: its child entries and any directly contained text.
struct ParsedElement {
    children: Vec<(String, DataValue)>,
    text: Option<String>,
}

impl ParsedElement {
    /// Collapse into a value: children win over text, absent both is null.
    fn into_value(self) -> DataValue {
        if !self.children.is_empty() {
            DataValue::Map(self.children)
        } else if let Some(text) = self.text {
            DataValue::Text(text)
        } else {
            DataValue::Null
        }
    }
}

/// Read the body of the element whose Start event was just consumed, up to
/// its matching End event. `depth` counts the enclosing elements above the
/// root; bodies nested past `MAX_DEPTH` are rejected before any further
/// recursion.
fn read_element(reader: &mut Reader<&[u8]>, depth: usize) -> Result<ParsedElement> {
    if depth > MAX_DEPTH {
        return Err(FormwerkError::MalformedInput(
            "xml nesting too deep".to_string(),
        ));
    }

    let mut children: Vec<(String, DataValue)> = Vec::new();
    let mut text: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| FormwerkError::MalformedInput(format!("xml parse: {e}")))?
        {
            Event::Start(start) => {
                let tag = tag_name(&start)?;
                let child = read_element(reader, depth + 1)?;
                DataValue::map_insert(&mut children, tag, child.into_value());
            }
            Event::Empty(start) => {
                let tag = tag_name(&start)?;
                DataValue::map_insert(&mut children, tag, DataValue::Null);
            }
            Event::Text(t) => {
                let content = t
                    .unescape()
                    .map_err(|e| FormwerkError::MalformedInput(format!("xml text: {e}")))?;
                text.get_or_insert_with(String::new).push_str(&content);
            }
            Event::CData(c) => {
                let content = String::from_utf8_lossy(&c).into_owned();
                text.get_or_insert_with(String::new).push_str(&content);
            }
            Event::End(_) => return Ok(ParsedElement { children, text }),
            Event::Eof => {
                return Err(FormwerkError::MalformedInput(
                    "xml document ended inside an element".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn tag_name(start: &BytesStart<'_>) -> Result<String> {
    String::from_utf8(start.name().as_ref().to_vec())
        .map_err(|e| FormwerkError::MalformedInput(format!("xml tag name: {e}")))
}

// -- Recompose: value tree to XML ---------------------------------------------

/// Recompose a value tree as an XML document wrapped in a `root` element.
///
/// Mapping keys become element names verbatim; keys that are not valid XML
/// names produce invalid XML, unchanged from the behavior this service has
/// always had. List items become `item_<index>` elements. Scalars become
/// text content (null becomes an empty element).
pub fn value_to_xml(value: &DataValue) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new(ROOT_TAG)))
        .map_err(write_err)?;
    write_value(&mut writer, value)?;
    writer
        .write_event(Event::End(BytesEnd::new(ROOT_TAG)))
        .map_err(write_err)?;
    Ok(writer.into_inner().into_inner())
}

fn write_value(writer: &mut Writer<Cursor<Vec<u8>>>, value: &DataValue) -> Result<()> {
    match value {
        DataValue::Map(entries) => {
            for (key, child) in entries {
                write_element(writer, key, child)?;
            }
        }
        DataValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                write_element(writer, &format!("item_{index}"), item)?;
            }
        }
        scalar => {
            // scalar_text is Some for every non-list, non-map variant.
            if let Some(text) = scalar.scalar_text() {
                if !text.is_empty() {
                    writer
                        .write_event(Event::Text(BytesText::new(&text)))
                        .map_err(write_err)?;
                }
            }
        }
    }
    Ok(())
}

fn write_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    value: &DataValue,
) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(write_err)?;
    write_value(writer, value)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(write_err)?;
    Ok(())
}

fn write_err(e: impl std::fmt::Display) -> FormwerkError {
    FormwerkError::WriteFailure(format!("xml write: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<(&str, DataValue)>) -> DataValue {
        DataValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    fn text(s: &str) -> DataValue {
        DataValue::Text(s.to_string())
    }

    #[test]
    fn nested_mapping_recomposes_and_round_trips() {
        let value = map(vec![
            ("a", text("1")),
            ("b", map(vec![("c", text("2"))])),
        ]);
        let xml = String::from_utf8(value_to_xml(&value).unwrap()).unwrap();
        assert!(xml.contains("<a>1</a>"));
        assert!(xml.contains("<b><c>2</c></b>"));

        // Mapping-only trees survive the round trip exactly.
        let back = xml_to_value(&xml).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn list_items_become_indexed_elements() {
        let value = map(vec![(
            "items",
            DataValue::List(vec![text("x"), text("y")]),
        )]);
        let xml = String::from_utf8(value_to_xml(&value).unwrap()).unwrap();
        assert!(xml.contains("<item_0>x</item_0>"));
        assert!(xml.contains("<item_1>y</item_1>"));
    }

    #[test]
    fn list_round_trip_is_asymmetric() {
        // Lists decompose back as item_N mappings, not lists. This is the
        // documented shape of the transform, so pin it.
        let value = map(vec![(
            "items",
            DataValue::List(vec![text("x"), text("y")]),
        )]);
        let xml = String::from_utf8(value_to_xml(&value).unwrap()).unwrap();
        let back = xml_to_value(&xml).unwrap();
        let expected = map(vec![(
            "items",
            map(vec![("item_0", text("x")), ("item_1", text("y"))]),
        )]);
        assert_eq!(back, expected);
        assert_ne!(back, value);
    }

    #[test]
    fn repeated_sibling_tags_collapse_to_the_last() {
        let back =
            xml_to_value("<root><k>first</k><k>last</k><other>1</other></root>").unwrap();
        let expected = map(vec![("k", text("last")), ("other", text("1"))]);
        assert_eq!(back, expected);
    }

    #[test]
    fn empty_elements_decompose_to_null() {
        let back = xml_to_value("<root><a/><b></b></root>").unwrap();
        let expected = map(vec![("a", DataValue::Null), ("b", DataValue::Null)]);
        assert_eq!(back, expected);
    }

    #[test]
    fn childless_root_decomposes_to_an_empty_mapping() {
        assert_eq!(
            xml_to_value("<root>just text</root>").unwrap(),
            DataValue::Map(Vec::new())
        );
        assert_eq!(xml_to_value("<root/>").unwrap(), DataValue::Map(Vec::new()));
    }

    #[test]
    fn leaf_whitespace_is_preserved() {
        let back = xml_to_value("<root><a> padded </a></root>").unwrap();
        assert_eq!(back, map(vec![("a", text(" padded "))]));
    }

    #[test]
    fn attributes_are_discarded() {
        let back = xml_to_value(r#"<root><a unit="mm">5</a></root>"#).unwrap();
        assert_eq!(back, map(vec![("a", text("5"))]));
    }

    #[test]
    fn null_recomposes_as_an_empty_element() {
        let xml =
            String::from_utf8(value_to_xml(&map(vec![("a", DataValue::Null)])).unwrap())
                .unwrap();
        assert!(xml.contains("<a></a>"));
    }

    #[test]
    fn scalar_text_is_escaped() {
        let xml = String::from_utf8(
            value_to_xml(&map(vec![("a", text("fish & <chips>"))])).unwrap(),
        )
        .unwrap();
        assert!(xml.contains("<a>fish &amp; &lt;chips&gt;</a>"));
    }

    #[test]
    fn declaration_is_written() {
        let xml = String::from_utf8(value_to_xml(&DataValue::Map(Vec::new())).unwrap()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    }

    #[test]
    fn malformed_xml_is_rejected() {
        assert!(xml_to_value("<root><unclosed></root>").is_err());
        assert!(xml_to_value("").is_err());
    }

    fn nested_document(levels: usize) -> String {
        let mut xml = String::from("<root>");
        for _ in 0..levels {
            xml.push_str("<a>");
        }
        xml.push('x');
        for _ in 0..levels {
            xml.push_str("</a>");
        }
        xml.push_str("</root>");
        xml
    }

    #[test]
    fn runaway_nesting_is_rejected_as_malformed() {
        // A well-formed but absurdly deep document must come back as a
        // typed error, never take the process down.
        let result = xml_to_value(&nested_document(200_000));
        assert!(matches!(result, Err(FormwerkError::MalformedInput(_))));
    }

    #[test]
    fn nesting_at_the_cap_still_parses() {
        assert!(xml_to_value(&nested_document(MAX_DEPTH)).is_ok());
        assert!(xml_to_value(&nested_document(MAX_DEPTH + 1)).is_err());
    }
}
