//! Utilities for Excel-style cell references.

/// Convert a 0-indexed column to its letter form (`0 -> "A"`, `26 -> "AA"`).
#[must_use]
pub fn col_to_letter(col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = u64::from(col) + 1; // Convert to 1-based
    while n > 0 {
        n -= 1;
        let offset = u8::try_from(n % 26).unwrap_or(0);
        letters.push(char::from(b'A' + offset));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// A1-style reference for a 0-indexed `(row, col)`.
#[must_use]
pub fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letter(col), u64::from(row) + 1)
}

/// A1-style range for 0-indexed inclusive corners, e.g. `A1:D1`.
#[must_use]
pub fn range_ref(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> String {
    format!(
        "{}:{}",
        cell_ref(start_row, start_col),
        cell_ref(end_row, end_col)
    )
}

/// Parse a cell reference from raw bytes (ASCII) into (col, row) where col and row are 0-indexed.
///
/// Works directly on XML attribute values (e.g. `attr.value` from quick-xml).
#[must_use]
pub fn parse_cell_ref_bytes(ref_bytes: &[u8]) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in ref_bytes {
        if b == b'$' {
            continue;
        }
        if b.is_ascii_alphabetic() {
            if saw_row {
                return None;
            }
            let upper = b.to_ascii_uppercase();
            col = col
                .checked_mul(26)?
                .checked_add(u32::from(upper - b'A') + 1)?;
            saw_col = true;
        } else if b.is_ascii_digit() {
            row = row.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some((col - 1, row - 1))
}

/// Parse a cell reference like "A1" into (col, row), 0-indexed.
#[must_use]
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    parse_cell_ref_bytes(cell_ref.trim().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_letter() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(col_to_letter(701), "ZZ");
        assert_eq!(col_to_letter(702), "AAA");
    }

    #[test]
    fn test_cell_and_range_ref() {
        assert_eq!(cell_ref(0, 0), "A1");
        assert_eq!(cell_ref(4, 27), "AB5");
        assert_eq!(range_ref(0, 0, 0, 3), "A1:D1");
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("$C$12"), Some((2, 11)));
        assert_eq!(parse_cell_ref("aa3"), Some((26, 2)));
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("12"), None);
        assert_eq!(parse_cell_ref("B"), None);
        assert_eq!(parse_cell_ref("1A"), None);
    }

    #[test]
    fn test_parse_roundtrips_generated_refs() {
        for (row, col) in [(0, 0), (9, 25), (99, 26), (1048575, 16383)] {
            assert_eq!(parse_cell_ref(&cell_ref(row, col)), Some((col, row)));
        }
    }
}
