//! Fixed stylesheet shared by every generated workbook.
//!
//! Each [`CellStyle`] maps to one `<xf>` in `cellXfs`; the font, fill and
//! border tables are static.

use std::fmt::Write as _;

/// Visual role of a cell in the generated sheets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CellStyle {
    #[default]
    Default,
    /// Merged sheet title on an indigo band.
    Title,
    /// Bold title without fill.
    PlainTitle,
    /// White bold text on a purple band (bench and section headers).
    Band,
    /// Seat-position code header cell.
    SeatCode,
    /// Bold centered display name.
    PositionName,
    /// Seat cell, shaded.
    SeatShaded,
    /// Seat cell, white.
    SeatPlain,
    /// Table column header.
    ColumnHeader,
    /// Centered value without border.
    Centered,
    /// Centered value with a thin border.
    Bordered,
}

struct Xf {
    font: u32,
    fill: u32,
    border: u32,
    centered: bool,
}

impl CellStyle {
    /// All styles in `cellXfs` order.
    pub(crate) const ALL: [CellStyle; 11] = [
        CellStyle::Default,
        CellStyle::Title,
        CellStyle::PlainTitle,
        CellStyle::Band,
        CellStyle::SeatCode,
        CellStyle::PositionName,
        CellStyle::SeatShaded,
        CellStyle::SeatPlain,
        CellStyle::ColumnHeader,
        CellStyle::Centered,
        CellStyle::Bordered,
    ];

    /// Index of this style in `cellXfs`.
    #[must_use]
    pub fn xf_index(self) -> u32 {
        match self {
            Self::Default => 0,
            Self::Title => 1,
            Self::PlainTitle => 2,
            Self::Band => 3,
            Self::SeatCode => 4,
            Self::PositionName => 5,
            Self::SeatShaded => 6,
            Self::SeatPlain => 7,
            Self::ColumnHeader => 8,
            Self::Centered => 9,
            Self::Bordered => 10,
        }
    }

    fn xf(self) -> Xf {
        let (font, fill, border, centered) = match self {
            Self::Default => (0, 0, 0, false),
            Self::Title => (3, 2, 0, true),
            Self::PlainTitle => (4, 0, 0, false),
            Self::Band => (2, 3, 0, true),
            Self::SeatCode => (2, 4, 1, true),
            Self::PositionName => (1, 0, 0, true),
            Self::SeatShaded => (0, 5, 1, true),
            Self::SeatPlain => (0, 6, 1, true),
            Self::ColumnHeader => (1, 4, 0, true),
            Self::Centered => (0, 0, 0, true),
            Self::Bordered => (0, 0, 1, true),
        };
        Xf {
            font,
            fill,
            border,
            centered,
        }
    }
}

/// (size, bold, ARGB color)
const FONTS: [(u32, bool, Option<&str>); 5] = [
    (11, false, None),
    (11, true, None),
    (11, true, Some("FFFFFFFF")),
    (16, true, Some("FFFFFFFF")),
    (14, true, None),
];

/// Solid fill colors after the two reserved fills (`none`, `gray125`).
const SOLID_FILLS: [&str; 5] = ["FF3F51B5", "FF7E57C2", "FFD1C4E9", "FFE0F7FA", "FFFFFFFF"];

/// Build `xl/styles.xml`.
#[must_use]
pub(crate) fn styles_xml() -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    out.push('\n');

    // <fonts>
    let _ = write!(out, "<fonts count=\"{}\">", FONTS.len());
    for (size, bold, color) in FONTS {
        out.push_str("<font>");
        if bold {
            out.push_str("<b/>");
        }
        let _ = write!(out, "<sz val=\"{size}\"/>");
        match color {
            Some(rgb) => {
                let _ = write!(out, "<color rgb=\"{rgb}\"/>");
            }
            None => out.push_str("<color theme=\"1\"/>"),
        }
        out.push_str("<name val=\"Calibri\"/><family val=\"2\"/></font>");
    }
    out.push_str("</fonts>\n");

    // <fills>
    let _ = write!(out, "<fills count=\"{}\">", SOLID_FILLS.len() + 2);
    out.push_str("<fill><patternFill patternType=\"none\"/></fill>");
    out.push_str("<fill><patternFill patternType=\"gray125\"/></fill>");
    for rgb in SOLID_FILLS {
        let _ = write!(
            out,
            "<fill><patternFill patternType=\"solid\"><fgColor rgb=\"{rgb}\"/><bgColor indexed=\"64\"/></patternFill></fill>"
        );
    }
    out.push_str("</fills>\n");

    // <borders>
    out.push_str("<borders count=\"2\">");
    out.push_str("<border><left/><right/><top/><bottom/><diagonal/></border>");
    out.push_str("<border>");
    for side in ["left", "right", "top", "bottom"] {
        let _ = write!(out, "<{side} style=\"thin\"><color auto=\"1\"/></{side}>");
    }
    out.push_str("<diagonal/></border>");
    out.push_str("</borders>\n");

    out.push_str(
        "<cellStyleXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></cellStyleXfs>\n",
    );

    // <cellXfs>
    let _ = write!(out, "<cellXfs count=\"{}\">", CellStyle::ALL.len());
    for style in CellStyle::ALL {
        let xf = style.xf();
        let _ = write!(
            out,
            "<xf numFmtId=\"0\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"",
            xf.font, xf.fill, xf.border
        );
        if xf.font != 0 {
            out.push_str(" applyFont=\"1\"");
        }
        if xf.fill != 0 {
            out.push_str(" applyFill=\"1\"");
        }
        if xf.border != 0 {
            out.push_str(" applyBorder=\"1\"");
        }
        if xf.centered {
            out.push_str(
                " applyAlignment=\"1\"><alignment horizontal=\"center\" vertical=\"center\"/></xf>",
            );
        } else {
            out.push_str("/>");
        }
    }
    out.push_str("</cellXfs>\n");

    out.push_str(
        "<cellStyles count=\"1\"><cellStyle name=\"Normal\" xfId=\"0\" builtinId=\"0\"/></cellStyles>\n",
    );
    out.push_str("</styleSheet>");
    out
}
