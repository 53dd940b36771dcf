//! Key/value metadata properties for desktop indexers and thumbnailers.
//!
//! Parallels the field collection but is flat: one well-known property key
//! per entry. Built lazily and independently of the field collection.

use serde::Serialize;

/// Well-known metadata property keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Property {
    Title,
    Publisher,
    Description,
    CreationDate,
    Width,
    Height,
}

impl Property {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Publisher => "Publisher",
            Self::Description => "Description",
            Self::CreationDate => "CreationDate",
            Self::Width => "Width",
            Self::Height => "Height",
        }
    }
}

/// A metadata value.
#[derive(Debug, Clone, Serialize)]
pub enum MetaValue {
    Text(String),
    Int(i64),
    UnixTime(i64),
}

/// Ordered key/value metadata collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RomMetaData {
    props: Vec<(Property, MetaValue)>,
}

impl RomMetaData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (Property, MetaValue)> {
        self.props.iter()
    }

    /// First value stored under `prop`, if any.
    pub fn get(&self, prop: Property) -> Option<&MetaValue> {
        self.props.iter().find(|(p, _)| *p == prop).map(|(_, v)| v)
    }

    pub fn add_text(&mut self, prop: Property, text: impl Into<String>) {
        self.props.push((prop, MetaValue::Text(text.into())));
    }

    pub fn add_int(&mut self, prop: Property, value: i64) {
        self.props.push((prop, MetaValue::Int(value)));
    }

    pub fn add_unix_time(&mut self, prop: Property, timestamp: i64) {
        self.props.push((prop, MetaValue::UnixTime(timestamp)));
    }
}
