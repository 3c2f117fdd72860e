use serde::Serialize;
use serde_json::Value;

use crate::domain::sheets::value_range::cell_at;

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseEntry {
    pub account: String,
    pub license_key: String,
}

impl LicenseEntry {
    pub fn new(account: impl Into<String>, license_key: impl Into<String>) -> Self {
        LicenseEntry {
            account: account.into(),
            license_key: license_key.into(),
        }
    }

    /// Column A is the account, column B the license key. Cells the API
    /// omitted (trailing blanks) read as empty strings.
    pub fn from_row(row: &[Value]) -> Self {
        LicenseEntry {
            account: cell_at(row, 0).unwrap_or_default(),
            license_key: cell_at(row, 1).unwrap_or_default(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.account.is_empty() && self.license_key.is_empty()
    }

    /// Reads the single active-license row; no row at all means no active license.
    pub fn active_from_rows(rows: Option<&[Vec<Value>]>) -> Self {
        rows.and_then(|rows| rows.first())
            .map(|row| LicenseEntry::from_row(row))
            .unwrap_or_default()
    }
}

/// Walks the license range top to bottom. The list has no stored length: the
/// first row whose account and key are both empty marks the end of data, and
/// nothing below it belongs to the list.
pub struct LicenseRows<'a> {
    rows: std::slice::Iter<'a, Vec<Value>>,
    finished: bool,
}

impl<'a> LicenseRows<'a> {
    pub fn new(rows: &'a [Vec<Value>]) -> Self {
        LicenseRows {
            rows: rows.iter(),
            finished: false,
        }
    }
}

impl Iterator for LicenseRows<'_> {
    type Item = LicenseEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.rows.next().map(|row| LicenseEntry::from_row(row)) {
            Some(entry) if !entry.is_blank() => Some(entry),
            _ => {
                self.finished = true;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for LicenseRows<'_> {}
