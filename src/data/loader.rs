use std::collections::BTreeSet;
use std::fmt;
use std::io::Cursor;
use std::path::Path;

use anyhow::Context;
use calamine::{Data, Ods, Reader, Xls, Xlsb, Xlsx};

use super::model::{CellValue, Column, ColumnKind, Table};
use crate::error::{ProfileError, Result};

/// Tokens read as a missing cell, on top of the empty string.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Extensions routed to the spreadsheet parser.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse uploaded bytes into a [`Table`]. Dispatch by extension only.
///
/// Supported formats:
/// * `.csv` – comma separated, header row first
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet, header row first
pub fn load(bytes: &[u8], filename: &str) -> Result<Table> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    log::debug!("Parsing '{filename}' as .{ext}");

    let (headers, rows) = match ext.as_str() {
        "csv" => read_csv(bytes)?,
        "xlsx" | "xlsm" => read_spreadsheet::<Xlsx<_>>(bytes)?,
        "xlsb" => read_spreadsheet::<Xlsb<_>>(bytes)?,
        "xls" => read_spreadsheet::<Xls<_>>(bytes)?,
        "ods" => read_spreadsheet::<Ods<_>>(bytes)?,
        "" => {
            return Err(ProfileError::Format(format!(
                "'{filename}' has no file extension"
            )))
        }
        other => {
            return Err(ProfileError::Format(format!(
                "Unsupported file extension: .{other}"
            )))
        }
    };

    let table = build_table(headers, rows)?;
    log::info!(
        "Loaded '{filename}': {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

/// Read a file from disk and hand its bytes to [`load`].
pub fn load_path(path: &Path) -> anyhow::Result<Table> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    Ok(load(&bytes, filename)?)
}

// ---------------------------------------------------------------------------
// Raw cells – what a parser hands to the coercion pass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    /// Untyped text that may still turn out numeric (CSV fields).
    Literal(String),
    /// Text the source already typed as a string (spreadsheet cells).
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

/// A raw cell after literal parsing.
#[derive(Debug, Clone, PartialEq)]
enum Parsed {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Missing,
}

fn is_na(s: &str) -> bool {
    s.is_empty() || NA_TOKENS.contains(&s)
}

fn parse_raw(raw: &RawCell) -> Parsed {
    match raw {
        RawCell::Empty => Parsed::Missing,
        RawCell::Int(i) => Parsed::Int(*i),
        RawCell::Float(f) if f.is_nan() => Parsed::Missing,
        RawCell::Float(f) => Parsed::Float(*f),
        RawCell::Bool(b) => Parsed::Bool(*b),
        RawCell::Text(s) if is_na(s) => Parsed::Missing,
        RawCell::Text(s) => Parsed::Text(s.clone()),
        RawCell::Literal(s) if is_na(s) => Parsed::Missing,
        RawCell::Literal(s) => {
            let t = s.trim();
            if let Ok(i) = t.parse::<i64>() {
                Parsed::Int(i)
            } else if let Ok(f) = t.parse::<f64>() {
                if f.is_nan() {
                    Parsed::Missing
                } else {
                    Parsed::Float(f)
                }
            } else if t.eq_ignore_ascii_case("true") {
                Parsed::Bool(true)
            } else if t.eq_ignore_ascii_case("false") {
                Parsed::Bool(false)
            } else {
                Parsed::Text(s.clone())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Column coercion
// ---------------------------------------------------------------------------

/// Decide the column kind from every non-missing cell.
fn infer_kind(cells: &[Parsed]) -> ColumnKind {
    let mut present = cells.iter().filter(|c| **c != Parsed::Missing).peekable();
    if present.peek().is_none() {
        return ColumnKind::Text;
    }

    let mut all_int = true;
    let mut all_num = true;
    let mut all_bool = true;
    for cell in present {
        match cell {
            Parsed::Int(_) => all_bool = false,
            Parsed::Float(_) => {
                all_int = false;
                all_bool = false;
            }
            Parsed::Bool(_) => {
                all_int = false;
                all_num = false;
            }
            Parsed::Text(_) => return ColumnKind::Text,
            Parsed::Missing => {}
        }
    }

    if all_int {
        ColumnKind::Integer
    } else if all_num {
        ColumnKind::Float
    } else if all_bool {
        ColumnKind::Boolean
    } else {
        ColumnKind::Text
    }
}

fn coerce(cell: Parsed, kind: ColumnKind) -> CellValue {
    match (kind, cell) {
        (_, Parsed::Missing) => CellValue::Missing,
        (ColumnKind::Integer, Parsed::Int(i)) => CellValue::Integer(i),
        (ColumnKind::Float, Parsed::Int(i)) => CellValue::Float(i as f64),
        (ColumnKind::Float, Parsed::Float(f)) => CellValue::Float(f),
        (ColumnKind::Boolean, Parsed::Bool(b)) => CellValue::Bool(b),
        (_, Parsed::Int(i)) => CellValue::Text(i.to_string()),
        (_, Parsed::Float(f)) => CellValue::Text(f.to_string()),
        (_, Parsed::Bool(b)) => CellValue::Text(b.to_string()),
        (_, Parsed::Text(s)) => CellValue::Text(s),
    }
}

/// Blank headers become `Unnamed: {i}`; repeats get `.1`, `.2`, … suffixes.
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut used: BTreeSet<String> = BTreeSet::new();
    let mut out = Vec::with_capacity(raw.len());

    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut k = 1;
        while used.contains(&candidate) {
            candidate = format!("{base}.{k}");
            k += 1;
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// Turn a header and raw rows into a typed [`Table`].
fn build_table(headers: Vec<String>, rows: Vec<Vec<RawCell>>) -> Result<Table> {
    if rows.is_empty() {
        return Err(ProfileError::EmptyInput);
    }
    if headers.is_empty() {
        return Err(ProfileError::Format("No columns to parse from file".into()));
    }

    let headers = normalize_headers(headers);
    let width = headers.len();

    let mut by_column: Vec<Vec<Parsed>> = vec![Vec::with_capacity(rows.len()); width];
    for (row_no, row) in rows.iter().enumerate() {
        if row.len() > width {
            return Err(ProfileError::Format(format!(
                "Row {}: expected {width} fields, saw {}",
                row_no + 1,
                row.len()
            )));
        }
        for (col_idx, cells) in by_column.iter_mut().enumerate() {
            let parsed = row.get(col_idx).map_or(Parsed::Missing, parse_raw);
            cells.push(parsed);
        }
    }

    let columns = headers
        .into_iter()
        .zip(by_column)
        .map(|(name, parsed)| {
            let kind = infer_kind(&parsed);
            let cells = parsed.into_iter().map(|c| coerce(c, kind)).collect();
            Column::new(name, kind, cells)
        })
        .collect();

    Table::new(columns)
}

// ---------------------------------------------------------------------------
// CSV parser
// ---------------------------------------------------------------------------

type RawSheet = (Vec<String>, Vec<Vec<RawCell>>);

/// Header row then records. Short records are padded by `build_table`.
fn read_csv(bytes: &[u8]) -> Result<RawSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|field| RawCell::Literal(field.to_string()))
                .collect(),
        );
    }

    Ok((headers, rows))
}

// ---------------------------------------------------------------------------
// Spreadsheet parser
// ---------------------------------------------------------------------------

/// First worksheet; its first non-blank row is the header.
///
/// Leading blank columns are kept (as `Unnamed: {i}`), and a data cell to
/// the right of the last header cell widens the header with a blank name.
fn read_spreadsheet<'a, R>(bytes: &'a [u8]) -> Result<RawSheet>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: fmt::Display,
{
    let mut workbook =
        R::new(Cursor::new(bytes)).map_err(|e| ProfileError::Format(format!("{e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ProfileError::Format("Workbook has no worksheets".into()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ProfileError::Format(format!("worksheet '{sheet_name}': {e}")))?;

    // The range starts at the first used cell; restore the columns before it.
    let lead = range.start().map_or(0, |(_, col)| col as usize);

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .map(|row| {
            std::iter::repeat(String::new())
                .take(lead)
                .chain(row.iter().map(header_text))
                .collect()
        })
        .unwrap_or_default();
    let rows = rows_iter
        .map(|row| {
            std::iter::repeat(RawCell::Empty)
                .take(lead)
                .chain(row.iter().map(spreadsheet_cell))
                .collect()
        })
        .collect();

    Ok((headers, rows))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn spreadsheet_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::String(s) => RawCell::Text(s.clone()),
        // Dates, durations and error cells are shown as text.
        other => RawCell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
