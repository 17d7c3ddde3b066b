//! Worksheet parsing - reads the cell values of one sheet.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::parse_cell_ref_bytes;
use crate::error::{Result, SeatplanError};
use crate::types::CellValue;
use crate::xml_helpers::attr_string;

/// A non-empty cell with its 0-indexed position.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SheetCell {
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
}

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Date,
    Default,
}

pub(super) fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        b"d" => CellTypeTag::Date,
        _ => CellTypeTag::Default,
    }
}

/// Cell currently being read.
struct PendingCell {
    row: u32,
    col: u32,
    tag: CellTypeTag,
}

/// Position and type of a `<c>` element. Cells without an `r` attribute
/// take the next column of the current row.
fn cell_header(e: &BytesStart, row: u32, next_col: u32) -> PendingCell {
    let mut col = next_col;
    let mut tag = CellTypeTag::Default;
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => {
                if let Some((c, _)) = parse_cell_ref_bytes(&attr.value) {
                    col = c;
                }
            }
            b"t" => tag = parse_cell_type_tag(&attr.value),
            _ => {}
        }
    }
    PendingCell { row, col, tag }
}

/// Turn the raw text of a cell into a value, `None` for blanks and errors.
fn resolve_value(
    tag: CellTypeTag,
    raw: &str,
    shared_strings: &[String],
) -> Result<Option<CellValue>> {
    let value = match tag {
        CellTypeTag::Shared => {
            let idx: usize = raw
                .trim()
                .parse()
                .map_err(|_| SeatplanError::Parse(format!("bad shared string index '{raw}'")))?;
            let s = shared_strings.get(idx).ok_or_else(|| {
                SeatplanError::Parse(format!("shared string index {idx} out of range"))
            })?;
            CellValue::text(s)
        }
        CellTypeTag::Inline | CellTypeTag::Str | CellTypeTag::Date => CellValue::text(raw),
        CellTypeTag::Bool => match raw.trim() {
            "" => None,
            v => Some(CellValue::Bool(v == "1" || v.eq_ignore_ascii_case("true"))),
        },
        CellTypeTag::Error => None,
        CellTypeTag::Default => match raw.trim().parse::<f64>() {
            Ok(n) => Some(CellValue::Number(n)),
            Err(_) => CellValue::text(raw),
        },
    };
    Ok(value)
}

/// Read every non-empty cell of the worksheet at `path`, in document order.
pub(super) fn parse_sheet_cells<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    shared_strings: &[String],
) -> Result<Vec<SheetCell>> {
    let file = archive.by_name(path)?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut cells = Vec::new();
    let mut buf = Vec::new();
    let mut row: u32 = 0;
    let mut next_row: u32 = 0;
    let mut next_col: u32 = 0;
    let mut pending: Option<PendingCell> = None;
    let mut in_text = false;
    let mut text = String::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"row" => {
                    row = row_number(e).unwrap_or(next_row);
                    next_row = row.saturating_add(1);
                    next_col = 0;
                }
                b"c" => {
                    let cell = cell_header(e, row, next_col);
                    next_col = cell.col.saturating_add(1);
                    pending = Some(cell);
                    text.clear();
                }
                // <v> holds plain values, <t> the text of inline strings.
                b"v" | b"t" if pending.is_some() => in_text = true,
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"row" => {
                    let empty_row = row_number(e).unwrap_or(next_row);
                    next_row = empty_row.saturating_add(1);
                }
                b"c" => {
                    next_col = cell_header(e, row, next_col).col.saturating_add(1);
                }
                _ => {}
            },
            Event::Text(ref e) if in_text => {
                text.push_str(&e.unescape()?);
            }
            Event::CData(ref e) if in_text => {
                text.push_str(&String::from_utf8_lossy(e));
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_text = false,
                b"c" => {
                    if let Some(cell) = pending.take() {
                        if let Some(value) = resolve_value(cell.tag, &text, shared_strings)? {
                            cells.push(SheetCell {
                                row: cell.row,
                                col: cell.col,
                                value,
                            });
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(cells)
}

/// 0-indexed row from the 1-based `r` attribute of a `<row>`.
fn row_number(e: &BytesStart) -> Option<u32> {
    attr_string(e, b"r")?.parse::<u32>().ok()?.checked_sub(1)
}
