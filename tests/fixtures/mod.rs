//! In-memory XLSX fixtures.
//!
//! Builds minimal workbooks with `zip::ZipWriter` so tests can feed the
//! reader without files on disk. Text cells go through the shared string
//! table unless built as [`FixtureValue::InlineString`].
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::ZipWriter;

// ============================================================================
// Cell Value
// ============================================================================

/// A value placed in a fixture cell.
#[derive(Debug, Clone)]
pub enum FixtureValue {
    /// Shared string.
    String(String),
    Number(f64),
    Boolean(bool),
    /// Error value such as `#N/A`.
    Error(String),
    /// Inline string (not shared).
    InlineString(String),
}

impl From<&str> for FixtureValue {
    fn from(s: &str) -> Self {
        FixtureValue::String(s.to_string())
    }
}

impl From<String> for FixtureValue {
    fn from(s: String) -> Self {
        FixtureValue::String(s)
    }
}

impl From<f64> for FixtureValue {
    fn from(n: f64) -> Self {
        FixtureValue::Number(n)
    }
}

impl From<i32> for FixtureValue {
    fn from(n: i32) -> Self {
        FixtureValue::Number(f64::from(n))
    }
}

impl From<bool> for FixtureValue {
    fn from(b: bool) -> Self {
        FixtureValue::Boolean(b)
    }
}

// ============================================================================
// Sheet Builder
// ============================================================================

#[derive(Debug, Clone)]
pub struct CellEntry {
    pub cell_ref: String,
    pub value: FixtureValue,
}

/// Builder for a single worksheet.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    pub name: String,
    pub cells: Vec<CellEntry>,
}

impl SheetBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: Vec::new(),
        }
    }

    /// Add a cell by A1 reference.
    #[must_use]
    pub fn cell<V: Into<FixtureValue>>(mut self, cell_ref: &str, value: V) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: value.into(),
        });
        self
    }

    /// Add a header row at row 1 followed by data rows. Empty strings are
    /// left out so they read back as blank cells.
    #[must_use]
    pub fn table(mut self, headers: &[&str], rows: &[Vec<FixtureValue>]) -> Self {
        for (col, header) in headers.iter().enumerate() {
            self = self.cell(&a1(0, col), *header);
        }
        for (r, row) in rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                if matches!(value, FixtureValue::String(s) if s.is_empty()) {
                    continue;
                }
                self = self.cell(&a1(r + 1, col), value.clone());
            }
        }
        self
    }
}

/// 0-based (row, col) to an A1 reference.
#[must_use]
pub fn a1(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap()));
        n = (n - 1) / 26;
    }
    letters.reverse();
    format!("{}{}", letters.into_iter().collect::<String>(), row + 1)
}

// ============================================================================
// Workbook Builder
// ============================================================================

#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetBuilder>,
}

impl XlsxBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut shared_strings: Vec<String> = Vec::new();
        for sheet in &self.sheets {
            for cell in &sheet.cells {
                if let FixtureValue::String(ref s) = cell.value {
                    if !shared_strings.contains(s) {
                        shared_strings.push(s.clone());
                    }
                }
            }
        }

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(generate_content_types(self.sheets.len()).as_bytes())
            .unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(generate_rels().as_bytes()).unwrap();

        zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
        zip.write_all(generate_workbook_rels(self.sheets.len()).as_bytes())
            .unwrap();

        zip.start_file("xl/workbook.xml", options).unwrap();
        zip.write_all(generate_workbook(&self.sheets).as_bytes())
            .unwrap();

        if !shared_strings.is_empty() {
            zip.start_file("xl/sharedStrings.xml", options).unwrap();
            zip.write_all(generate_shared_strings(&shared_strings).as_bytes())
                .unwrap();
        }

        for (i, sheet) in self.sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                .unwrap();
            zip.write_all(generate_sheet_xml(sheet, &shared_strings).as_bytes())
                .unwrap();
        }

        zip.finish().expect("Failed to finish ZIP").into_inner()
    }
}

// ============================================================================
// XML Generation
// ============================================================================

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn generate_content_types(sheet_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
"#,
    );
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn generate_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
        .to_string()
}

fn generate_workbook_rels(sheet_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>
"#
        ));
    }
    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
"#,
        sheet_count + 1
    ));
    xml.push_str("</Relationships>");
    xml
}

fn generate_workbook(sheets: &[SheetBuilder]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
"#,
    );
    for (i, sheet) in sheets.iter().enumerate() {
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>
"#,
            escape(&sheet.name),
            i + 1,
            i + 1
        ));
    }
    xml.push_str("</sheets>\n</workbook>");
    xml
}

fn generate_shared_strings(strings: &[String]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">
"#,
        strings.len()
    );
    for s in strings {
        xml.push_str(&format!("<si><t>{}</t></si>\n", escape(s)));
    }
    xml.push_str("</sst>");
    xml
}

/// Row number (1-based) of an A1 reference.
fn ref_row(cell_ref: &str) -> u32 {
    cell_ref
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .unwrap()
}

fn generate_sheet_xml(sheet: &SheetBuilder, shared_strings: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
"#,
    );

    let mut cells: Vec<&CellEntry> = sheet.cells.iter().collect();
    cells.sort_by_key(|c| ref_row(&c.cell_ref));

    let mut current_row: Option<u32> = None;
    for cell in cells {
        let row = ref_row(&cell.cell_ref);
        if current_row != Some(row) {
            if current_row.is_some() {
                xml.push_str("</row>\n");
            }
            xml.push_str(&format!("<row r=\"{row}\">"));
            current_row = Some(row);
        }
        let r = &cell.cell_ref;
        match &cell.value {
            FixtureValue::String(s) => {
                let idx = shared_strings.iter().position(|x| x == s).unwrap();
                xml.push_str(&format!("<c r=\"{r}\" t=\"s\"><v>{idx}</v></c>"));
            }
            FixtureValue::Number(n) => {
                xml.push_str(&format!("<c r=\"{r}\"><v>{n}</v></c>"));
            }
            FixtureValue::Boolean(b) => {
                xml.push_str(&format!("<c r=\"{r}\" t=\"b\"><v>{}</v></c>", u8::from(*b)));
            }
            FixtureValue::Error(e) => {
                xml.push_str(&format!("<c r=\"{r}\" t=\"e\"><v>{}</v></c>", escape(e)));
            }
            FixtureValue::InlineString(s) => {
                xml.push_str(&format!(
                    "<c r=\"{r}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                    escape(s)
                ));
            }
        }
    }
    if current_row.is_some() {
        xml.push_str("</row>\n");
    }

    xml.push_str("</sheetData>\n</worksheet>");
    xml
}
