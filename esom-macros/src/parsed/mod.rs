mod document;
mod field;

pub(crate) use document::ParsedDocument;
pub(crate) use field::ParsedField;
