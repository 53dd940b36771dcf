//! Plain-text rendering of field collections.
//!
//! [`FieldsOutput`] renders a `RomFields` collection as aligned
//! colon-padded lines; list-table fields become multi-column tables with
//! per-column widths and multi-line cell support. [`RomOutput`] wraps a
//! whole handler: detection banner, fields, and external resource keys.

use std::fmt::{self, Display, Write as _};

use chrono::{Local, TimeZone, Utc};

use crate::fields::{select_variant, FieldData, LangCode, ListRows, RomFields};
use crate::{ExtUrl, ImageType, NameKind, RomData};

/// Escape a string for text output: control characters map to the
/// U+2400 control-picture block; embedded newlines are re-indented by
/// `width` columns (plus one for the opening quote when quoted).
fn safe_string(s: &str, quotes: bool, width: usize) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    if quotes {
        out.push('\'');
    }
    for ch in s.chars() {
        if ch == '\n' && width > 0 {
            out.push('\n');
            for _ in 0..(width + usize::from(quotes)) {
                out.push(' ');
            }
        } else if (ch as u32) < 0x20 {
            // U+2400 through U+241F control pictures.
            out.push(char::from_u32(0x2400 + ch as u32).unwrap_or('\u{FFFD}'));
        } else {
            out.push(ch);
        }
    }
    if quotes {
        out.push('\'');
    }
    out
}

/// Write `name` followed by a colon, space-padded to `width` columns.
fn colon_pad(f: &mut fmt::Formatter<'_>, width: usize, name: &str) -> fmt::Result {
    let pad = width.saturating_sub(name.len()).max(1);
    write!(f, "{}{:<pad$}", name, ':')
}

fn pad(f: &mut fmt::Formatter<'_>, width: usize) -> fmt::Result {
    write!(f, "{:width$}", "")
}

fn write_bitfield(
    f: &mut fmt::Formatter<'_>,
    width: usize,
    name: &str,
    names: &[String],
    elems_per_row: u8,
    value: u32,
) -> fmt::Result {
    let per_row = if elems_per_row != 0 {
        elems_per_row as usize
    } else {
        4
    };

    // Column widths from the non-empty names, wrapping at per_row.
    let mut col_size = vec![0usize; per_row];
    let mut col = 0;
    for name in names.iter().filter(|n| !n.is_empty()).take(32) {
        col_size[col] = col_size[col].max(name.len());
        col = (col + 1) % per_row;
    }

    colon_pad(f, width, name)?;
    let mut col = 0;
    let mut bits = value;
    for name in names.iter().take(32) {
        if name.is_empty() {
            bits >>= 1;
            continue;
        }
        // Wrap before printing so a full final row doesn't leave an
        // empty trailing row.
        if col == per_row {
            f.write_char('\n')?;
            pad(f, width)?;
            col = 0;
        }
        let mark = if bits & 1 != 0 { '*' } else { ' ' };
        write!(f, " [{}] {:<w$}", mark, name, w = col_size[col])?;
        col += 1;
        bits >>= 1;
    }
    Ok(())
}

fn write_list_data(
    f: &mut fmt::Formatter<'_>,
    width: usize,
    name: &str,
    list: &crate::fields::ListData,
    def_lc: LangCode,
    user_lc: LangCode,
) -> fmt::Result {
    let rows: &Vec<Vec<String>> = match &list.rows {
        ListRows::Single(rows) => rows,
        ListRows::Multi(map) => match select_variant(map, def_lc, user_lc) {
            Some(rows) => rows,
            None => {
                colon_pad(f, width, name)?;
                return f.write_str("[ERROR: No list data.]");
            }
        },
    };

    let col_count = match &list.col_names {
        Some(names) => names.len(),
        None => rows.first().map(Vec::len).unwrap_or(0),
    };
    if col_count == 0 {
        colon_pad(f, width, name)?;
        return f.write_str("[ERROR: No list data.]");
    }

    // Split cells on embedded newlines up front; each sub-line is
    // re-aligned as its own table row.
    let row_lines: Vec<Vec<Vec<String>>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    cell.split('\n')
                        .map(|seg| safe_string(seg, false, 0))
                        .collect()
                })
                .collect()
        })
        .collect();

    // Column widths: max of header name and the longest line of any cell.
    let mut col_size = vec![0usize; col_count];
    if let Some(names) = &list.col_names {
        for (i, n) in names.iter().enumerate() {
            col_size[i] = n.len();
        }
    }
    for row in &row_lines {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            for line in cell {
                col_size[i] = col_size[i].max(line.len());
            }
        }
    }

    // Reserve room in column 0 for the "[x] " checkbox prefix.
    let has_checkboxes = list.checkboxes.is_some();
    if has_checkboxes {
        col_size[0] += 4;
    }

    colon_pad(f, width, name)?;
    if list.separate_row {
        f.write_char('\n')?;
    }

    let mut skip_first_nl = true;
    if let Some(names) = &list.col_names {
        // Centered column headers; odd slack goes to the right.
        for (i, n) in names.iter().enumerate() {
            let spc = col_size[i] - n.len();
            write!(
                f,
                "|{:l$}{}{:r$}",
                "",
                n,
                "",
                l = spc / 2,
                r = spc / 2 + spc % 2
            )?;
        }
        f.write_str("|\n")?;

        if !list.separate_row {
            pad(f, width)?;
        }
        for &size in &col_size {
            write!(f, "|{:-<w$}", "", w = size)?;
        }
        f.write_char('|')?;
        skip_first_nl = false;
    }

    // The prefix is printed literally, so data cells use the bare width.
    if has_checkboxes {
        col_size[0] -= 4;
    }

    let mut checkboxes = list.checkboxes.unwrap_or(0);
    for row in &row_lines {
        let nl_count = row.iter().map(|c| c.len().saturating_sub(1)).max().unwrap_or(0);
        for line in 0..=nl_count {
            if skip_first_nl {
                skip_first_nl = false;
            } else {
                f.write_char('\n')?;
                if !list.separate_row {
                    pad(f, width)?;
                }
            }
            f.write_char('|')?;
            if has_checkboxes {
                let mark = if checkboxes & 1 != 0 { 'x' } else { ' ' };
                write!(f, "[{}] ", mark)?;
            }
            for i in 0..col_count {
                let text = row
                    .get(i)
                    .and_then(|cell| cell.get(line))
                    .map(String::as_str)
                    .unwrap_or("");
                write!(f, "{:<w$}|", text, w = col_size[i])?;
            }
        }
        if has_checkboxes {
            checkboxes >>= 1;
        }
    }
    Ok(())
}

fn write_datetime(
    f: &mut fmt::Formatter<'_>,
    width: usize,
    name: &str,
    timestamp: Option<i64>,
    is_utc: bool,
    has_date: bool,
    has_time: bool,
) -> fmt::Result {
    colon_pad(f, width, name)?;
    let Some(ts) = timestamp else {
        return f.write_str("Unknown");
    };

    let fmt_str = match (has_date, has_time) {
        (true, true) => "%Y-%m-%d %H:%M:%S",
        (true, false) => "%Y-%m-%d",
        (false, true) => "%H:%M:%S",
        (false, false) => return f.write_str("Invalid DateTime"),
    };

    let rendered = if is_utc {
        Utc.timestamp_opt(ts, 0)
            .single()
            .map(|dt| dt.format(fmt_str).to_string())
    } else {
        Local
            .timestamp_opt(ts, 0)
            .single()
            .map(|dt| dt.format(fmt_str).to_string())
    };
    match rendered {
        Some(s) => f.write_str(&s),
        None => f.write_str("Invalid DateTime"),
    }
}

/// Renders a field collection as aligned text.
pub struct FieldsOutput<'a> {
    fields: &'a RomFields,
    lc: LangCode,
}

impl<'a> FieldsOutput<'a> {
    /// `lc` selects multi-language variants; 0 uses the ROM default.
    pub fn new(fields: &'a RomFields, lc: LangCode) -> Self {
        Self { fields, lc }
    }
}

impl Display for FieldsOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max_width = self
            .fields
            .iter()
            .map(|fld| fld.name.len())
            .max()
            .unwrap_or(0)
            + 2;

        let def_lc = self.fields.default_language();
        let user_lc = if self.lc != 0 { self.lc } else { def_lc };

        let tab_count = self.fields.tab_count();
        let mut cur_tab = usize::MAX;
        let mut printed_first = false;

        for field in self.fields {
            if !field.is_valid {
                continue;
            }
            if printed_first {
                f.write_char('\n')?;
            }

            if tab_count > 1 && cur_tab != field.tab_idx {
                // Tab indices are assigned consecutively from 0.
                debug_assert!(cur_tab == usize::MAX || cur_tab + 1 == field.tab_idx);
                cur_tab = field.tab_idx;
                match self.fields.tab_name(cur_tab) {
                    Some(name) => writeln!(f, "----- {} -----", name)?,
                    None => writeln!(f, "----- (tab {}) -----", cur_tab)?,
                }
            }

            match &field.data {
                FieldData::String(s) => {
                    colon_pad(f, max_width, &field.name)?;
                    f.write_str(&safe_string(s, true, max_width))?;
                }
                FieldData::Bitfield {
                    names,
                    elems_per_row,
                    value,
                } => {
                    write_bitfield(f, max_width, &field.name, names, *elems_per_row, *value)?;
                }
                FieldData::ListData(list) => {
                    write_list_data(f, max_width, &field.name, list, def_lc, user_lc)?;
                }
                FieldData::DateTime {
                    timestamp,
                    is_utc,
                    has_date,
                    has_time,
                } => {
                    write_datetime(
                        f, max_width, &field.name, *timestamp, *is_utc, *has_date, *has_time,
                    )?;
                }
                FieldData::AgeRatings(ratings) => {
                    colon_pad(f, max_width, &field.name)?;
                    let active: Vec<String> = ratings
                        .iter()
                        .filter(|r| r.active)
                        .map(|r| format!("{}={}", r.organization, r.rating))
                        .collect();
                    if active.is_empty() {
                        f.write_str("None")?;
                    } else {
                        f.write_str(&active.join(", "))?;
                    }
                }
                FieldData::Dimensions(dims) => {
                    colon_pad(f, max_width, &field.name)?;
                    write!(f, "{}", dims[0])?;
                    if dims[1] > 0 {
                        write!(f, "x{}", dims[1])?;
                        if dims[2] > 0 {
                            write!(f, "x{}", dims[2])?;
                        }
                    }
                }
                FieldData::StringMulti(variants) => {
                    colon_pad(f, max_width, &field.name)?;
                    match select_variant(variants, def_lc, user_lc) {
                        Some(s) => f.write_str(&safe_string(s, true, max_width))?,
                        None => f.write_str("''")?,
                    }
                }
            }
            printed_first = true;
        }
        Ok(())
    }
}

/// Full text report for one opened ROM: detection banner, fields, and
/// external resource keys. Loads lazily-computed state up front so the
/// `Display` impl can stay read-only.
pub struct RomOutput<'a> {
    system: Option<&'static str>,
    file_type: &'static str,
    ext: Vec<(ImageType, Vec<ExtUrl>)>,
    fields: Option<&'a RomFields>,
    lc: LangCode,
}

impl<'a> RomOutput<'a> {
    pub fn new(rom: &'a mut dyn RomData, lc: LangCode) -> Self {
        let system = rom.system_name(NameKind::Long);
        let file_type = rom.file_type();

        let mut ext = Vec::new();
        for &image_type in rom.supported_image_types() {
            // ext_urls may legitimately fail even for a supported type.
            if let Ok(urls) = rom.ext_urls(image_type, 0) {
                if !urls.is_empty() {
                    ext.push((image_type, urls));
                }
            }
        }

        let fields = rom.fields();
        Self {
            system,
            file_type,
            ext,
            fields,
            lc,
        }
    }
}

impl Display for RomOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "-- {} {} detected",
            self.system.unwrap_or("(unknown system)"),
            self.file_type
        )?;
        if let Some(fields) = self.fields {
            writeln!(f, "{}", FieldsOutput::new(fields, self.lc))?;
        }
        for (image_type, urls) in &self.ext {
            for ext_url in urls {
                writeln!(
                    f,
                    "-- {}: {} (cache_key: {})",
                    image_type.display_name(),
                    ext_url.url,
                    ext_url.cache_key
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/textout_tests.rs"]
mod tests;
