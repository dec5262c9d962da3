//! FILENAME: engine/src/coord.rs
//! PURPOSE: The cell position model and its textual codec.
//! CONTEXT: Positions are 0-based (row, col) pairs internally and A1-style
//! labels externally. Column "A" = 0, "B" = 1, ..., "Z" = 25, "AA" = 26.
//! Row 1 in a label = row 0 internally. The sentinel `Position::NONE`
//! denotes "no position"; every decoding failure maps to it.

use serde::{Deserialize, Serialize};

/// Exclusive upper bound for row indices.
pub const MAX_ROWS: i32 = 16384;
/// Exclusive upper bound for column indices.
pub const MAX_COLS: i32 = 16384;
/// Longest label accepted by `Position::from_label`.
pub const MAX_POSITION_LENGTH: usize = 17;
/// Longest column letter run accepted by `Position::from_label`.
pub const MAX_POS_LETTER_COUNT: usize = 3;

/// A cell position as 0-based (row, col). Ordered lexicographically,
/// row first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// The "no position" sentinel.
    pub const NONE: Position = Position { row: -1, col: -1 };

    pub fn new(row: i32, col: i32) -> Position {
        Position { row, col }
    }

    /// True iff the position addresses a cell inside the grid bounds.
    pub fn is_valid(&self) -> bool {
        self.row >= 0 && self.row < MAX_ROWS && self.col >= 0 && self.col < MAX_COLS
    }

    /// Decodes an A1-style label ("A1", "AB12") to a position.
    ///
    /// Returns `Position::NONE` unless the label is 1..=3 uppercase letters
    /// followed by digits without a leading zero, the total length is at
    /// most `MAX_POSITION_LENGTH`, and the decoded position is valid.
    /// The leading-zero rule keeps the codec a bijection: every accepted
    /// label re-prints exactly as itself.
    pub fn from_label(label: &str) -> Position {
        if label.is_empty() || label.len() > MAX_POSITION_LENGTH {
            return Position::NONE;
        }

        let letter_count = label
            .bytes()
            .take_while(|b| b.is_ascii_uppercase())
            .count();
        if letter_count == 0 || letter_count > MAX_POS_LETTER_COUNT {
            return Position::NONE;
        }

        let (letters, digits) = label.split_at(letter_count);
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Position::NONE;
        }

        let col = match col_to_index(letters) {
            Some(c) => c,
            None => return Position::NONE,
        };

        // At most 16 digits here, so an i64 parse cannot overflow.
        let row_num: i64 = match digits.parse() {
            Ok(n) => n,
            Err(_) => return Position::NONE,
        };
        if row_num > MAX_ROWS as i64 {
            return Position::NONE;
        }

        let pos = Position::new(row_num as i32 - 1, col);
        if pos.is_valid() {
            pos
        } else {
            Position::NONE
        }
    }
}

impl std::fmt::Display for Position {
    /// Writes the canonical label, or nothing for an invalid position.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        write!(f, "{}{}", index_to_col(self.col), self.row + 1)
    }
}

/// Converts a column letter run ("A", "AA", "ABC") to a 0-based column index.
/// "A" -> 0, "B" -> 1, ..., "Z" -> 25, "AA" -> 26, "AB" -> 27, etc.
/// Returns None for an empty or non-uppercase string, or on overflow.
pub fn col_to_index(col_str: &str) -> Option<i32> {
    if col_str.is_empty() {
        return None;
    }
    let mut result: i64 = 0;
    for c in col_str.chars() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        result = result * 26 + (c as i64 - 'A' as i64 + 1);
        if result > i32::MAX as i64 {
            return None;
        }
    }
    Some(result as i32 - 1)
}

/// Converts a 0-based column index to a column letter run.
/// 0 -> "A", 1 -> "B", ..., 25 -> "Z", 26 -> "AA", 27 -> "AB", etc.
pub fn index_to_col(mut col_index: i32) -> String {
    let mut result = String::new();
    loop {
        let remainder = col_index % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }
    result
}
