//! Document auto-registration.
//!
//! `#[derive(EsDocument)]` submits a registration for every document type,
//! letting boot-time code (see [`Es::ensure_indices`](crate::client::Es::ensure_indices))
//! discover all indexable types without listing them by hand.

use crate::types::DocumentDescriptor;

/// Metadata for one auto-discovered document type.
pub struct DocumentRegistration {
    /// The struct name (e.g. "Article").
    pub type_name: &'static str,
    /// Accessor for the type's static descriptor.
    pub descriptor: fn() -> &'static DocumentDescriptor,
}

inventory::collect!(DocumentRegistration);

/// All document types registered via the derive.
pub fn registered_documents() -> impl Iterator<Item = &'static DocumentRegistration> {
    inventory::iter::<DocumentRegistration>()
}

/// Look up a registered document's descriptor by struct name.
pub fn descriptor_by_name(type_name: &str) -> Option<&'static DocumentDescriptor> {
    registered_documents()
        .find(|registration| registration.type_name == type_name)
        .map(|registration| (registration.descriptor)())
}
