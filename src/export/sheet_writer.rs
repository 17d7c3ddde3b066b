//! Generates worksheet XML from a [`SheetSpec`].
//!
//! Text is written as inline strings (`t="inlineStr"`).

use std::fmt::Write as _;

use crate::cell_ref::{cell_ref, range_ref};
use crate::xml_helpers::xml_escape;

use super::{CellContent, CellStyle, SheetSpec};

/// Write a complete worksheet XML string.
pub(crate) fn write_sheet_xml(sheet: &SheetSpec) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    out.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    out.push('\n');

    // <dimension>
    let dimension = sheet
        .extent()
        .map_or_else(|| "A1".to_string(), |(r, c)| range_ref(0, 0, r, c));
    let _ = writeln!(out, "<dimension ref=\"{dimension}\"/>");

    out.push_str("<sheetFormatPr defaultRowHeight=\"15\"/>\n");

    // <cols>
    let mut widths = sheet.col_widths().peekable();
    if widths.peek().is_some() {
        out.push_str("<cols>\n");
        for (col, width) in widths {
            let col1 = col + 1; // XLSX is 1-based
            let _ = writeln!(
                out,
                "<col min=\"{col1}\" max=\"{col1}\" width=\"{width:.2}\" customWidth=\"1\"/>"
            );
        }
        out.push_str("</cols>\n");
    }

    // <sheetData>
    out.push_str("<sheetData>\n");
    write_sheet_data(&mut out, sheet);
    out.push_str("</sheetData>\n");

    // <mergeCells>
    let merges = sheet.merges();
    if !merges.is_empty() {
        let _ = writeln!(out, "<mergeCells count=\"{}\">", merges.len());
        for m in merges {
            let _ = writeln!(
                out,
                "<mergeCell ref=\"{}\"/>",
                range_ref(m.start_row, m.start_col, m.end_row, m.end_col)
            );
        }
        out.push_str("</mergeCells>\n");
    }

    out.push_str(
        "<pageMargins left=\"0.7\" right=\"0.7\" top=\"0.75\" bottom=\"0.75\" header=\"0.3\" footer=\"0.3\"/>\n",
    );
    out.push_str("</worksheet>");
    out
}

/// Write all cell rows into `<sheetData>`. Cells arrive row-major.
fn write_sheet_data(out: &mut String, sheet: &SheetSpec) {
    let mut open_row: Option<u32> = None;
    for (row, col, content, style) in sheet.cells() {
        if open_row != Some(row) {
            if open_row.is_some() {
                out.push_str("</row>\n");
            }
            let _ = write!(out, "<row r=\"{}\">", row + 1);
            open_row = Some(row);
        }
        write_cell(out, row, col, content, style);
    }
    if open_row.is_some() {
        out.push_str("</row>\n");
    }
}

/// Write a single `<c>` element.
fn write_cell(out: &mut String, row: u32, col: u32, content: &CellContent, style: CellStyle) {
    let _ = write!(out, "<c r=\"{}\"", cell_ref(row, col));
    let xf = style.xf_index();
    if xf != 0 {
        let _ = write!(out, " s=\"{xf}\"");
    }

    match content {
        CellContent::Text(text) => {
            let _ = write!(out, " t=\"inlineStr\"><is><t");
            if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
                out.push_str(" xml:space=\"preserve\"");
            }
            let _ = write!(out, ">{}</t></is></c>", xml_escape(text));
        }
        CellContent::Integer(n) => {
            let _ = write!(out, "><v>{n}</v></c>");
        }
        CellContent::Number(n) if n.is_finite() => {
            let _ = write!(out, "><v>{n}</v></c>");
        }
        CellContent::Number(_) | CellContent::Blank => out.push_str("/>"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::export::MergeRange;

    #[test]
    fn test_empty_sheet() {
        let xml = write_sheet_xml(&SheetSpec::new("Empty"));
        assert!(xml.contains("<dimension ref=\"A1\"/>"));
        assert!(xml.contains("<sheetData>\n</sheetData>"));
        assert!(!xml.contains("<mergeCells"));
        assert!(!xml.contains("<cols>"));
    }

    #[test]
    fn test_cells_grouped_by_row() {
        let mut sheet = SheetSpec::new("S");
        sheet.set(0, 0, "ROOM 1", CellStyle::Title);
        sheet.set(4, 1, CellContent::Integer(1001), CellStyle::SeatShaded);
        sheet.set(4, 0, CellContent::Blank, CellStyle::SeatPlain);
        let xml = write_sheet_xml(&sheet);

        assert!(xml.contains(
            "<row r=\"1\"><c r=\"A1\" s=\"1\" t=\"inlineStr\"><is><t>ROOM 1</t></is></c></row>"
        ));
        assert!(xml.contains("<row r=\"5\"><c r=\"A5\" s=\"7\"/><c r=\"B5\" s=\"6\"><v>1001</v></c></row>"));
        assert!(xml.contains("<dimension ref=\"A1:B5\"/>"));
    }

    #[test]
    fn test_text_is_escaped_and_preserved() {
        let mut sheet = SheetSpec::new("S");
        sheet.set(0, 0, " A&B <x> ", CellStyle::Default);
        let xml = write_sheet_xml(&sheet);
        assert!(xml.contains("<t xml:space=\"preserve\"> A&amp;B &lt;x&gt; </t>"));
    }

    #[test]
    fn test_merges_and_widths() {
        let mut sheet = SheetSpec::new("S");
        sheet.set(0, 0, "T", CellStyle::Title);
        sheet.merge(MergeRange::row_span(0, 0, 7));
        sheet.set_col_width(3, 2.5);
        let xml = write_sheet_xml(&sheet);
        assert!(xml.contains("<mergeCells count=\"1\">\n<mergeCell ref=\"A1:H1\"/>"));
        assert!(xml.contains("<col min=\"4\" max=\"4\" width=\"2.50\" customWidth=\"1\"/>"));
    }

    #[test]
    fn test_non_finite_number_is_blank() {
        let mut sheet = SheetSpec::new("S");
        sheet.set(0, 0, CellContent::Number(f64::NAN), CellStyle::Default);
        let xml = write_sheet_xml(&sheet);
        assert!(xml.contains("<c r=\"A1\"/>"));
    }
}
