// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structured-data codecs: parse CSV/JSON/YAML/XML into the generic value
// tree and serialize back out. XML goes through the structural mapper.

use formwerk_core::error::{FormwerkError, Result};
use formwerk_core::types::Format;

use super::mapper;
use super::value::DataValue;

/// Parse a structured-data document into a value tree.
pub fn parse(bytes: &[u8], source: Format) -> Result<DataValue> {
    match source {
        Format::Csv => csv_to_value(bytes),
        Format::Json => serde_json::from_slice(bytes)
            .map_err(|e| FormwerkError::MalformedInput(format!("json parse: {e}"))),
        Format::Yaml | Format::Yml => serde_yaml::from_slice(bytes)
            .map_err(|e| FormwerkError::MalformedInput(format!("yaml parse: {e}"))),
        Format::Xml => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| FormwerkError::MalformedInput(format!("xml is not utf-8: {e}")))?;
            mapper::xml_to_value(text)
        }
        other => Err(FormwerkError::MalformedInput(format!(
            "not a structured-data format: {other}"
        ))),
    }
}

/// Serialize a value tree into the requested data format.
pub fn serialize(value: &DataValue, target: Format) -> Result<Vec<u8>> {
    match target {
        Format::Csv => value_to_csv(value),
        Format::Json => serde_json::to_vec_pretty(value)
            .map_err(|e| FormwerkError::WriteFailure(format!("json write: {e}"))),
        Format::Yaml => serde_yaml::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| FormwerkError::WriteFailure(format!("yaml write: {e}"))),
        Format::Xml => mapper::value_to_xml(value),
        other => Err(FormwerkError::WriteFailure(format!(
            "not a structured-data target: {other}"
        ))),
    }
}

// -- CSV ----------------------------------------------------------------------

/// Parse CSV into a list of row mappings keyed by the header, with scalar
/// inference per field (integer, then float, otherwise text; empty fields
/// become null).
fn csv_to_value(bytes: &[u8]) -> Result<DataValue> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| FormwerkError::MalformedInput(format!("csv header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| FormwerkError::MalformedInput(format!("csv parse: {e}")))?;
        let mut entries = Vec::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            let field = record.get(index).unwrap_or("");
            DataValue::map_insert(&mut entries, header.clone(), DataValue::infer_scalar(field));
        }
        rows.push(DataValue::Map(entries));
    }
    Ok(DataValue::List(rows))
}

/// Serialize a list-shaped value to CSV.
///
/// Rows of mappings produce a header row from first-seen key order across
/// all rows; rows of scalars fall back to a single column named `0`, the
/// shape tabular exporters give an unlabelled series. Anything else is
/// malformed for this target.
fn value_to_csv(value: &DataValue) -> Result<Vec<u8>> {
    let DataValue::List(rows) = value else {
        return Err(FormwerkError::MalformedInput(
            "csv output requires a list of rows".to_string(),
        ));
    };
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    let csv_err = |e: csv::Error| FormwerkError::WriteFailure(format!("csv write: {e}"));

    if rows.iter().all(|row| matches!(row, DataValue::Map(_))) {
        let (headers, cells) = rows_to_table(rows)?;
        writer.write_record(&headers).map_err(csv_err)?;
        for row in cells {
            writer.write_record(&row).map_err(csv_err)?;
        }
    } else {
        writer.write_record(["0"]).map_err(csv_err)?;
        for row in rows {
            let cell = row.scalar_text().ok_or_else(|| {
                FormwerkError::MalformedInput(
                    "csv rows must be mappings or scalars".to_string(),
                )
            })?;
            writer.write_record([cell]).map_err(csv_err)?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| FormwerkError::WriteFailure(format!("csv write: {e}")))
}

// -- Tabular projection -------------------------------------------------------

/// Project a value tree onto (headers, rows of cell text) for tabular
/// rendering. Requires a list of row mappings with scalar fields.
pub fn as_table(value: &DataValue) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let DataValue::List(rows) = value else {
        return Err(FormwerkError::MalformedInput(
            "tabular output requires a list of rows".to_string(),
        ));
    };
    if !rows.iter().all(|row| matches!(row, DataValue::Map(_))) {
        return Err(FormwerkError::MalformedInput(
            "tabular output requires rows of mappings".to_string(),
        ));
    }
    rows_to_table(rows)
}

/// Header union in first-seen order plus stringified cells, one row per
/// mapping. Missing fields render empty; nested values are not renderable.
fn rows_to_table(rows: &[DataValue]) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        if let DataValue::Map(entries) = row {
            for (key, _) in entries {
                if !headers.iter().any(|existing| existing == key) {
                    headers.push(key.clone());
                }
            }
        }
    }

    let mut cells = Vec::with_capacity(rows.len());
    for row in rows {
        let mut out = Vec::with_capacity(headers.len());
        for header in &headers {
            let cell = match row.get(header) {
                Some(field) => field.scalar_text().ok_or_else(|| {
                    FormwerkError::MalformedInput(format!(
                        "field {header} holds a nested value and cannot be a cell"
                    ))
                })?,
                None => String::new(),
            };
            out.push(cell);
        }
        cells.push(out);
    }
    Ok((headers, cells))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE_CSV: &str = "name,age,city\nalice,30,berlin\nbob,25,paris\ncarol,41,oslo\n";

    #[test]
    fn csv_rows_become_header_keyed_mappings() {
        let value = parse(PEOPLE_CSV.as_bytes(), Format::Csv).unwrap();
        let DataValue::List(rows) = &value else {
            panic!("expected list");
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0].get("name"),
            Some(&DataValue::Text("alice".into()))
        );
        assert_eq!(rows[0].get("age"), Some(&DataValue::Number(30.into())));
    }

    #[test]
    fn three_row_csv_to_json_keeps_header_keys_in_row_order() {
        let value = parse(PEOPLE_CSV.as_bytes(), Format::Csv).unwrap();
        let json = serialize(&value, Format::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&json).unwrap();

        let array = parsed.as_array().expect("json array");
        assert_eq!(array.len(), 3);
        for row in array {
            assert_eq!(row.as_object().unwrap().len(), 3);
        }
        assert_eq!(array[0]["name"], "alice");
        assert_eq!(array[1]["name"], "bob");
        assert_eq!(array[2]["name"], "carol");
        assert_eq!(array[0]["age"], 30);

        // serde_json::Value reorders keys on re-parse, so header order is
        // asserted on the emitted text, row by row.
        let text = std::str::from_utf8(&json).unwrap();
        for body in text.split('{').skip(1) {
            let name = body.find("\"name\"").unwrap();
            let age = body.find("\"age\"").unwrap();
            let city = body.find("\"city\"").unwrap();
            assert!(name < age && age < city);
        }
    }

    #[test]
    fn json_pretty_output_uses_two_space_indent() {
        let value = parse(br#"{"a": 1}"#, Format::Json).unwrap();
        let json = String::from_utf8(serialize(&value, Format::Json).unwrap()).unwrap();
        assert!(json.contains("\n  \"a\": 1"));
    }

    #[test]
    fn csv_round_trip_preserves_cells() {
        let value = parse(PEOPLE_CSV.as_bytes(), Format::Csv).unwrap();
        let out = String::from_utf8(serialize(&value, Format::Csv).unwrap()).unwrap();
        assert_eq!(out, PEOPLE_CSV);
    }

    #[test]
    fn csv_quoting_applies_where_needed() {
        let value = DataValue::List(vec![DataValue::Map(vec![
            ("note".to_string(), DataValue::Text("has, comma".into())),
            ("plain".to_string(), DataValue::Text("x".into())),
        ])]);
        let out = String::from_utf8(serialize(&value, Format::Csv).unwrap()).unwrap();
        assert_eq!(out, "note,plain\n\"has, comma\",x\n");
    }

    #[test]
    fn non_list_data_cannot_become_csv() {
        let value = parse(br#"{"a": 1}"#, Format::Json).unwrap();
        assert!(matches!(
            serialize(&value, Format::Csv),
            Err(FormwerkError::MalformedInput(_))
        ));
    }

    #[test]
    fn scalar_list_exports_as_a_single_unlabelled_column() {
        let value = parse(br#"["x", "y"]"#, Format::Json).unwrap();
        let out = String::from_utf8(serialize(&value, Format::Csv).unwrap()).unwrap();
        assert_eq!(out, "0\nx\ny\n");
    }

    #[test]
    fn header_union_keeps_first_seen_order() {
        let value = parse(
            br#"[{"a": 1, "b": 2}, {"b": 3, "c": 4}]"#,
            Format::Json,
        )
        .unwrap();
        let (headers, rows) = as_table(&value).unwrap();
        assert_eq!(headers, ["a", "b", "c"]);
        assert_eq!(rows[0], ["1", "2", ""]);
        assert_eq!(rows[1], ["", "3", "4"]);
    }

    #[test]
    fn yaml_round_trips_through_the_tree() {
        let yaml = b"- name: alice\n  age: 30\n- name: bob\n  age: 25\n";
        let value = parse(yaml, Format::Yaml).unwrap();
        let out = String::from_utf8(serialize(&value, Format::Yaml).unwrap()).unwrap();
        assert!(out.contains("name: alice"));
        let back = parse(out.as_bytes(), Format::Yaml).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn xml_target_goes_through_the_structural_mapper() {
        let value = parse(br#"{"a": "1", "b": {"c": "2"}}"#, Format::Json).unwrap();
        let xml = String::from_utf8(serialize(&value, Format::Xml).unwrap()).unwrap();
        assert!(xml.contains("<root><a>1</a><b><c>2</c></b></root>"));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(parse(b"{not json", Format::Json).is_err());
        assert!(parse(b"<root><open></root>", Format::Xml).is_err());
        assert!(parse(b"a,b\n\"unbalanced\n", Format::Csv).is_err());
    }
}
