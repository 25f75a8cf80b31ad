use serde::de::DeserializeOwned;
use serde::Serialize;

/// Per-field mapping metadata collected by `#[derive(EsDocument)]`.
///
/// One descriptor exists per annotated field, built once into the type's
/// static [`DocumentDescriptor`] and never mutated afterwards. The options
/// mirror what an index mapping can express; no cross-field validation is
/// performed here (a `scaling_factor` on a non-scaled-float field is simply
/// ignored by the compiler).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Ordered type tags. The first entry is the primary type; an empty list
    /// means the field is not mapped (identifier-only fields).
    pub types: &'static [&'static str],
    pub copy_to: Option<&'static str>,
    pub analyzer: Option<&'static str>,
    pub search_analyzer: Option<&'static str>,
    pub format: Option<&'static str>,
    pub scaling_factor: f64,
    pub dims: u32,
    pub relations: &'static str,
    /// 0 means "use the engine default".
    pub ignore_above: u32,
    pub is_id: bool,
}

impl FieldDescriptor {
    /// A descriptor with the given tags and every option at its default.
    pub const fn new(name: &'static str, types: &'static [&'static str]) -> Self {
        Self {
            name,
            types,
            copy_to: None,
            analyzer: None,
            search_analyzer: None,
            format: None,
            scaling_factor: 1.0,
            dims: 128,
            relations: "",
            ignore_above: 0,
            is_id: false,
        }
    }
}

/// Static metadata for one document type: its directly declared fields plus
/// an optional link to the descriptor of the type it extends.
#[derive(Debug, Clone, Copy)]
pub struct DocumentDescriptor {
    pub type_name: &'static str,
    /// Directly declared fields only; ancestor fields are reached via
    /// [`DocumentDescriptor::ancestry`].
    pub fields: &'static [FieldDescriptor],
    pub parent: Option<fn() -> &'static DocumentDescriptor>,
    pub id_field: Option<&'static str>,
}

impl DocumentDescriptor {
    /// Walk the descriptor chain from this type to its most distant ancestor.
    pub fn ancestry(&'static self) -> Ancestry {
        Ancestry { next: Some(self) }
    }
}

/// Iterator over a descriptor and its ancestors, nearest first.
pub struct Ancestry {
    next: Option<&'static DocumentDescriptor>,
}

impl Iterator for Ancestry {
    type Item = &'static DocumentDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.parent.map(|descriptor| descriptor());
        Some(current)
    }
}

/// Access to the static descriptor of a document type.
///
/// Implemented by `#[derive(EsDocument)]`; the descriptor is built once into
/// a `static` so repeated lookups are free.
pub trait DocumentMetadata {
    fn descriptor() -> &'static DocumentDescriptor;
}

/// A struct that can be indexed and searched.
///
/// Implemented by `#[derive(EsDocument)]`. `id_value` reads the field marked
/// `#[es(id)]` (None when the field is unset or the type has no marker);
/// `write_text_field` is the generated name-indexed setter table used by
/// highlight back-patching — it tries the type's own string fields first and
/// then delegates down the `extends` chain, returning `false` when no
/// writable field matches.
pub trait EsDocument: DocumentMetadata + Serialize + DeserializeOwned {
    fn id_value(&self) -> Option<serde_json::Value>;

    fn write_text_field(&mut self, name: &str, value: &str) -> bool;
}
