//! Assemble the OOXML ZIP container for a workbook.

use std::fmt::Write as _;
use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::ZipWriter;

use crate::error::Result;
use crate::xml_helpers::xml_escape;

use super::sheet_writer::write_sheet_xml;
use super::styles::styles_xml;
use super::WorkbookSpec;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Write every part of the package and return the archive bytes.
pub(super) fn write_package(workbook: &WorkbookSpec) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut parts: Vec<(String, String)> = vec![
        ("[Content_Types].xml".to_string(), content_types_xml(workbook)),
        ("_rels/.rels".to_string(), root_rels_xml()),
        ("xl/workbook.xml".to_string(), workbook_xml(workbook)),
        (
            "xl/_rels/workbook.xml.rels".to_string(),
            workbook_rels_xml(workbook),
        ),
        ("xl/styles.xml".to_string(), styles_xml()),
    ];
    for (idx, sheet) in workbook.sheets().iter().enumerate() {
        parts.push((
            format!("xl/worksheets/sheet{}.xml", idx + 1),
            write_sheet_xml(sheet),
        ));
    }

    for (name, xml) in parts {
        writer.start_file(name, options)?;
        writer.write_all(xml.as_bytes())?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

fn content_types_xml(workbook: &WorkbookSpec) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    out.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    out.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    out.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    out.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    for idx in 1..=workbook.len() {
        let _ = write!(
            out,
            r#"<Override PartName="/xl/worksheets/sheet{idx}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        );
    }
    out.push_str("</Types>");
    out
}

fn root_rels_xml() -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    out.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#);
    out.push_str("</Relationships>");
    out
}

fn workbook_xml(workbook: &WorkbookSpec) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    out.push_str("<sheets>");
    for (idx, sheet) in workbook.sheets().iter().enumerate() {
        let id = idx + 1;
        let _ = write!(
            out,
            r#"<sheet name="{}" sheetId="{id}" r:id="rId{id}"/>"#,
            xml_escape(&sheet.name)
        );
    }
    out.push_str("</sheets></workbook>");
    out
}

/// Worksheets take `rId1..=rIdN`; styles follow them.
fn workbook_rels_xml(workbook: &WorkbookSpec) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for id in 1..=workbook.len() {
        let _ = write!(
            out,
            r#"<Relationship Id="rId{id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{id}.xml"/>"#
        );
    }
    let _ = write!(
        out,
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        workbook.len() + 1
    );
    out.push_str("</Relationships>");
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::export::{CellStyle, SheetSpec};
    use std::io::Read;
    use zip::ZipArchive;

    fn two_sheet_workbook() -> WorkbookSpec {
        let mut wb = WorkbookSpec::new();
        let mut first = SheetSpec::new("Room 101");
        first.set(0, 0, "ROOM 101", CellStyle::Title);
        wb.push(first);
        wb.push(SheetSpec::new("Attendance - Room 101"));
        wb
    }

    #[test]
    fn test_package_parts() {
        let bytes = write_package(&two_sheet_workbook()).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "xl/_rels/workbook.xml.rels",
                "xl/styles.xml",
                "xl/workbook.xml",
                "xl/worksheets/sheet1.xml",
                "xl/worksheets/sheet2.xml",
            ]
        );

        let mut workbook = String::new();
        archive
            .by_name("xl/workbook.xml")
            .unwrap()
            .read_to_string(&mut workbook)
            .unwrap();
        assert!(workbook.contains(r#"<sheet name="Attendance - Room 101" sheetId="2" r:id="rId2"/>"#));
    }

    #[test]
    fn test_rels_put_styles_after_sheets() {
        let xml = workbook_rels_xml(&two_sheet_workbook());
        assert!(xml.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles""#));
    }

    #[test]
    fn test_content_types_list_each_sheet() {
        let xml = content_types_xml(&two_sheet_workbook());
        assert_eq!(xml.matches("worksheet+xml").count(), 2);
    }
}
