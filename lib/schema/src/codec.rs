//! CSV reading and writing for request tables
//!
//! Column types are inferred once per column after the whole file is read:
//! a column is numeric when every present cell parses as a number, boolean
//! when every present cell is a boolean literal, and text otherwise. Cells of
//! a text column keep their exact source spelling.

use reqsift_core::{Error, RawTable, Result, Value};
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellType {
    Number,
    Bool,
    Text,
}

/// Parse a CSV document with a header row
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()
        .map_err(malformed)?
        .iter()
        .map(str::to_string)
        .collect();
    if columns.is_empty() {
        return Err(Error::Schema("input has no header row".into()));
    }

    let records = rdr
        .records()
        .collect::<std::result::Result<Vec<csv::StringRecord>, _>>()
        .map_err(malformed)?;

    let types: Vec<CellType> = (0..columns.len())
        .map(|col| infer_type(records.iter().map(|r| r.get(col).unwrap_or(""))))
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            record
                .iter()
                .zip(&types)
                .map(|(raw, ty)| parse_cell(raw, *ty))
                .collect()
        })
        .collect();

    RawTable::from_rows(columns, rows)
}

pub fn read_csv_bytes(bytes: &[u8]) -> Result<RawTable> {
    read_csv(bytes)
}

/// Write a table as CSV: header first, `\n` line endings, quoting only where needed
pub fn write_csv<W: Write>(table: &RawTable, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(table.columns()).map_err(write_failed)?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(Value::to_string))
            .map_err(write_failed)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_bytes(table: &RawTable) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    Ok(buffer)
}

fn infer_type<'a>(cells: impl Iterator<Item = &'a str>) -> CellType {
    let mut ty = CellType::Number;
    let mut all_bool = true;
    for raw in cells.filter(|c| !Value::is_missing_token(c)) {
        if Value::parse_bool(raw).is_none() {
            all_bool = false;
        }
        if ty == CellType::Number && Value::parse_number(raw).is_none() {
            ty = CellType::Bool;
        }
        if ty == CellType::Bool && !all_bool {
            return CellType::Text;
        }
    }
    ty
}

fn parse_cell(raw: &str, ty: CellType) -> Value {
    if Value::is_missing_token(raw) {
        return Value::Missing;
    }
    match ty {
        CellType::Number => Value::parse_number(raw).map_or(Value::Missing, Value::Number),
        CellType::Bool => Value::parse_bool(raw).map_or(Value::Missing, Value::Bool),
        CellType::Text => Value::Text(raw.to_string()),
    }
}

fn malformed(e: csv::Error) -> Error {
    Error::Schema(format!("malformed CSV: {}", e))
}

fn write_failed(e: csv::Error) -> Error {
    Error::Serialization(format!("CSV write failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqsift_core::ColumnKind;

    #[test]
    fn test_read_infers_column_types() {
        let input = "ip,method,bytes,tls\n1.1.1.1,GET,120,true\n9.9.9.9,POST,,False\n";
        let table = read_csv_bytes(input.as_bytes()).unwrap();

        assert_eq!(table.columns(), &["ip", "method", "bytes", "tls"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.row(0).unwrap()[2], Value::Number(120.0));
        assert_eq!(table.row(1).unwrap()[2], Value::Missing);
        assert_eq!(table.row(1).unwrap()[3], Value::Bool(false));
        assert_eq!(table.column_kind(0), ColumnKind::Categorical);
        assert_eq!(table.column_kind(2), ColumnKind::Numeric);
        assert_eq!(table.column_kind(3), ColumnKind::Numeric);
    }

    #[test]
    fn test_mixed_column_keeps_source_text() {
        let input = "port\n80\nssh\n080\n";
        let table = read_csv_bytes(input.as_bytes()).unwrap();
        assert_eq!(table.column_kind(0), ColumnKind::Categorical);
        assert_eq!(table.row(2).unwrap()[0], Value::Text("080".into()));
    }

    #[test]
    fn test_empty_input_is_schema_error() {
        assert!(matches!(read_csv_bytes(b""), Err(Error::Schema(_))));
    }

    #[test]
    fn test_header_only_gives_empty_table() {
        let table = read_csv_bytes(b"a,b\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.num_columns(), 2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = read_csv_bytes(b"a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_duplicate_header_rejected() {
        assert!(matches!(read_csv_bytes(b"a,a\n1,2\n"), Err(Error::Schema(_))));
    }

    #[test]
    fn test_write_csv() {
        let table = RawTable::from_rows(
            vec!["path".into(), "bytes".into(), "note".into()],
            vec![
                vec!["/a,b".into(), 120i64.into(), Value::Missing],
                vec!["/c".into(), 0.5.into(), "ok".into()],
            ],
        )
        .unwrap();

        let out = String::from_utf8(to_csv_bytes(&table).unwrap()).unwrap();
        assert_eq!(out, "path,bytes,note\n\"/a,b\",120,\n/c,0.5,ok\n");
    }

    #[test]
    fn test_write_then_read_keeps_rows() {
        let input = "ip,method,bytes\n1.1.1.1,GET,120\n9.9.9.9,POST,50000\n";
        let table = read_csv_bytes(input.as_bytes()).unwrap();
        let out = to_csv_bytes(&table).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), input);
    }
}
