//! Typed, tagged-variant field model for parsed ROM headers.
//!
//! Format handlers append `Field`s to a `RomFields` collection; renderers
//! and property pages consume the collection read-only. Fields are grouped
//! into tabs; multi-language variants are keyed by packed language codes.

use std::collections::BTreeMap;

use serde::Serialize;

/// A language code packed into a `u32`, one ASCII character per byte,
/// left-padded with zeroes (e.g. "en" -> 0x0000_656E).
pub type LangCode = u32;

/// Pack an ASCII language tag (up to 4 characters) into a `LangCode`.
pub fn lc_from_str(s: &str) -> LangCode {
    s.bytes().take(4).fold(0, |lc, b| (lc << 8) | b as u32)
}

/// Unpack a `LangCode` back into its ASCII tag.
pub fn lc_to_string(lc: LangCode) -> String {
    lc.to_be_bytes()
        .iter()
        .filter(|&&b| b != 0)
        .map(|&b| b as char)
        .collect()
}

/// Row data for a list-table field: either a single table or one table
/// per language variant.
#[derive(Debug, Clone, Serialize)]
pub enum ListRows {
    Single(Vec<Vec<String>>),
    Multi(BTreeMap<LangCode, Vec<Vec<String>>>),
}

/// A list-table field: optional column headers, row data, and optional
/// per-row checkbox bits (bit N = row N).
#[derive(Debug, Clone, Serialize)]
pub struct ListData {
    pub col_names: Option<Vec<String>>,
    pub rows: ListRows,
    pub checkboxes: Option<u32>,
    /// Render the table on its own rows, below the field name.
    pub separate_row: bool,
}

/// One age rating entry (e.g. ESRB, PEGI).
#[derive(Debug, Clone, Serialize)]
pub struct AgeRating {
    pub organization: String,
    pub rating: String,
    /// False when the rating slot exists but is inactive for this title.
    pub active: bool,
}

/// The tagged union of field payloads.
#[derive(Debug, Clone, Serialize)]
pub enum FieldData {
    String(String),
    Bitfield {
        names: Vec<String>,
        /// Checkbox cells per rendered row; 0 means the default of 4.
        elems_per_row: u8,
        value: u32,
    },
    ListData(ListData),
    DateTime {
        /// Unix timestamp; `None` when the header carried no valid value.
        timestamp: Option<i64>,
        is_utc: bool,
        has_date: bool,
        has_time: bool,
    },
    AgeRatings(Vec<AgeRating>),
    /// 1 to 3 dimensions; unused trailing entries are 0.
    Dimensions([i32; 3]),
    StringMulti(BTreeMap<LangCode, String>),
}

/// A single named field with its tab assignment and validity flag.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub name: String,
    pub data: FieldData,
    pub tab_idx: usize,
    pub is_valid: bool,
}

/// Append-only ordered field collection with tab names and a collection
/// default language code. Built lazily by the owning parser, at most once.
#[derive(Debug, Clone, Serialize)]
pub struct RomFields {
    fields: Vec<Field>,
    tab_names: Vec<String>,
    cur_tab: usize,
    default_lc: LangCode,
}

impl RomFields {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            tab_names: Vec::new(),
            cur_tab: 0,
            default_lc: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    /// Number of tabs. At least 1 once any field has been added.
    pub fn tab_count(&self) -> usize {
        std::cmp::max(self.tab_names.len(), self.cur_tab + 1)
    }

    pub fn tab_name(&self, idx: usize) -> Option<&str> {
        self.tab_names.get(idx).map(String::as_str)
    }

    /// Start a new named tab. Tab indices are assigned consecutively
    /// starting at 0; the first call names tab 0.
    pub fn add_tab(&mut self, name: impl Into<String>) {
        if self.tab_names.is_empty() {
            self.tab_names.push(name.into());
            self.cur_tab = 0;
        } else {
            self.tab_names.push(name.into());
            self.cur_tab = self.tab_names.len() - 1;
        }
    }

    /// The ROM-declared default language code (0 = none declared).
    pub fn default_language(&self) -> LangCode {
        self.default_lc
    }

    pub fn set_default_language(&mut self, lc: LangCode) {
        self.default_lc = lc;
    }

    fn push(&mut self, name: impl Into<String>, data: FieldData) -> usize {
        self.push_with_validity(name, data, true)
    }

    fn push_with_validity(
        &mut self,
        name: impl Into<String>,
        data: FieldData,
        is_valid: bool,
    ) -> usize {
        self.fields.push(Field {
            name: name.into(),
            data,
            tab_idx: self.cur_tab,
            is_valid,
        });
        self.fields.len() - 1
    }

    pub fn add_string(&mut self, name: impl Into<String>, text: impl Into<String>) -> usize {
        self.push(name, FieldData::String(text.into()))
    }

    pub fn add_bitfield(
        &mut self,
        name: impl Into<String>,
        names: Vec<String>,
        elems_per_row: u8,
        value: u32,
    ) -> usize {
        self.push(
            name,
            FieldData::Bitfield {
                names,
                elems_per_row,
                value,
            },
        )
    }

    pub fn add_list(&mut self, name: impl Into<String>, list: ListData) -> usize {
        // A multi-language table must carry the collection default code.
        let is_valid = match &list.rows {
            ListRows::Multi(map) => {
                debug_assert!(
                    map.contains_key(&self.default_lc),
                    "multi-language list is missing the default language variant"
                );
                map.contains_key(&self.default_lc)
            }
            ListRows::Single(_) => true,
        };
        self.push_with_validity(name, FieldData::ListData(list), is_valid)
    }

    pub fn add_datetime(
        &mut self,
        name: impl Into<String>,
        timestamp: Option<i64>,
        is_utc: bool,
        has_date: bool,
        has_time: bool,
    ) -> usize {
        self.push(
            name,
            FieldData::DateTime {
                timestamp,
                is_utc,
                has_date,
                has_time,
            },
        )
    }

    pub fn add_age_ratings(&mut self, name: impl Into<String>, ratings: Vec<AgeRating>) -> usize {
        self.push(name, FieldData::AgeRatings(ratings))
    }

    pub fn add_dimensions(&mut self, name: impl Into<String>, dims: [i32; 3]) -> usize {
        self.push(name, FieldData::Dimensions(dims))
    }

    pub fn add_string_multi(
        &mut self,
        name: impl Into<String>,
        variants: BTreeMap<LangCode, String>,
    ) -> usize {
        debug_assert!(
            variants.contains_key(&self.default_lc),
            "multi-language string is missing the default language variant"
        );
        let is_valid = variants.contains_key(&self.default_lc);
        self.push_with_validity(name, FieldData::StringMulti(variants), is_valid)
    }
}

impl Default for RomFields {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a RomFields {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Select a language variant: the requested code if present, else the
/// default code, else the first available variant.
pub fn select_variant<'a, T>(
    variants: &'a BTreeMap<LangCode, T>,
    def_lc: LangCode,
    user_lc: LangCode,
) -> Option<&'a T> {
    variants
        .get(&user_lc)
        .or_else(|| variants.get(&def_lc))
        .or_else(|| variants.values().next())
}

#[cfg(test)]
#[path = "tests/fields_tests.rs"]
mod tests;
