use crate::{IngestError, TabularDataset};
use serde_json::Value;

/// Parses raw upload bytes into a [`TabularDataset`].
///
/// The first record is the header and declares the columns; every following
/// record must match its arity. Anything the reader rejects (ragged rows,
/// invalid UTF-8) surfaces as [`IngestError::InvalidInput`] before a single
/// write is attempted.
pub fn parse_csv(bytes: &[u8]) -> Result<TabularDataset, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|error| IngestError::InvalidInput(error.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    if columns.is_empty() {
        return Err(IngestError::InvalidInput(
            "empty input: no header row".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| IngestError::InvalidInput(error.to_string()))?;
        rows.push(record.iter().map(coerce_scalar).collect());
    }

    Ok(TabularDataset { columns, rows })
}

// Mirrors the loose typing CSV consumers expect: empty cells are null,
// booleans and numeric literals keep their type, everything else is a string.
fn coerce_scalar(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if cell.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if cell.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(integer) = cell.parse::<i64>() {
        return Value::from(integer);
    }
    if let Ok(float) = cell.parse::<f64>() {
        if float.is_finite() {
            return Value::from(float);
        }
    }
    Value::String(cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::parse_csv;
    use crate::IngestError;
    use serde_json::{json, Value};

    #[test]
    fn parses_header_and_rows_in_file_order() {
        let dataset = parse_csv(b"text,author\nhello,alice\nworld,bob\n")
            .expect("well-formed csv should parse");

        assert_eq!(dataset.columns, vec!["text", "author"]);
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(dataset.rows[0], vec![json!("hello"), json!("alice")]);
        assert_eq!(dataset.rows[1], vec![json!("world"), json!("bob")]);
    }

    #[test]
    fn coerces_scalars_per_cell() {
        let dataset = parse_csv(b"a,b,c,d\n42,3.5,TRUE,plain\n")
            .expect("well-formed csv should parse");

        assert_eq!(
            dataset.rows[0],
            vec![json!(42), json!(3.5), json!(true), json!("plain")]
        );
    }

    #[test]
    fn empty_cells_become_null() {
        let dataset = parse_csv(b"a,b\n,x\n").expect("well-formed csv should parse");
        assert_eq!(dataset.rows[0][0], Value::Null);
        assert_eq!(dataset.rows[0][1], json!("x"));
    }

    #[test]
    fn header_only_input_yields_zero_rows() {
        let dataset = parse_csv(b"a,b\n").expect("header-only csv should parse");
        assert_eq!(dataset.columns.len(), 2);
        assert!(dataset.rows.is_empty());
    }

    #[test]
    fn empty_input_is_invalid() {
        let error = parse_csv(b"").expect_err("empty input must be rejected");
        assert!(matches!(error, IngestError::InvalidInput(_)));
    }

    #[test]
    fn ragged_rows_are_invalid() {
        let error = parse_csv(b"a,b\n1,2,3\n").expect_err("ragged row must be rejected");
        assert!(matches!(error, IngestError::InvalidInput(_)));
    }

    #[test]
    fn unterminated_quote_is_invalid() {
        // The dangling quote swallows the rest of the file into one field,
        // which no longer matches the two-column header.
        let error = parse_csv(b"a,b\n\"x,1\ny,2\n").expect_err("must be rejected");
        assert!(matches!(error, IngestError::InvalidInput(_)));
    }

    #[test]
    fn non_utf8_bytes_are_invalid() {
        let error = parse_csv(b"a,b\n\xff\xfe,1\n").expect_err("must be rejected");
        assert!(matches!(error, IngestError::InvalidInput(_)));
    }

    #[test]
    fn quoted_fields_keep_embedded_delimiters() {
        let dataset =
            parse_csv(b"text\n\"a, quoted, value\"\n").expect("well-formed csv should parse");
        assert_eq!(dataset.rows[0][0], json!("a, quoted, value"));
    }
}
