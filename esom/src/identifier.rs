//! Identifier field resolution for bulk writes.

use crate::errors::EsError;
use crate::types::{DocumentDescriptor, DocumentMetadata, FieldDescriptor};

/// Find the `#[es(id)]` field among a type's directly declared fields.
///
/// Inherited identifier fields are not honored: only the descriptor's own
/// field list is scanned. Fails with a domain error naming the type when no
/// marker is present.
pub fn resolve(descriptor: &'static DocumentDescriptor) -> Result<&'static FieldDescriptor, EsError> {
    descriptor
        .fields
        .iter()
        .find(|field| field.is_id)
        .ok_or_else(|| EsError::MissingIdField {
            type_name: descriptor.type_name.to_string(),
        })
}

/// [`resolve`] by type parameter instead of descriptor.
pub fn resolve_for<T: DocumentMetadata>() -> Result<&'static FieldDescriptor, EsError> {
    resolve(T::descriptor())
}
