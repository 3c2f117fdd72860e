use std::fmt::Formatter;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Notation(String);

impl std::fmt::Display for A1Notation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<A1Notation> for String {
    fn from(a1_notation: A1Notation) -> Self {
        a1_notation.0
    }
}

impl AsRef<str> for A1Notation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for A1Notation {
    fn from(s: String) -> Self {
        A1Notation(s)
    }
}

pub trait ToA1Notation {
    fn to_a1_notation(&self) -> A1Notation;
}

/// A range local to one sheet, e.g. `Suno` + `A10:B`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub sheet: Box<str>,
    pub range: Box<str>,
}

impl SheetRange {
    pub fn new(sheet: &str, range: &str) -> Self {
        SheetRange {
            sheet: sheet.into(),
            range: range.into(),
        }
    }
}

/// Sheet titles made only of letters, digits and underscores can be used bare,
/// everything else has to be single-quoted with inner quotes doubled.
fn quote_sheet_title(title: &str) -> String {
    let is_plain = !title.is_empty()
        && title
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if is_plain {
        title.to_owned()
    } else {
        format!("'{}'", title.replace('\'', "''"))
    }
}

impl ToA1Notation for SheetRange {
    fn to_a1_notation(&self) -> A1Notation {
        A1Notation(format!(
            "{}!{}",
            quote_sheet_title(&self.sheet),
            self.range
        ))
    }
}

impl std::fmt::Display for SheetRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_a1_notation())
    }
}
