use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod parsed;

use parsed::ParsedDocument;

/// Derive `DocumentMetadata` and `EsDocument` for an indexable struct.
///
/// Field attributes live under the `es` namespace:
///
/// ```text
/// #[derive(EsDocument, Serialize, Deserialize)]
/// pub struct Article {
///     #[es(id, types = ["keyword"])]
///     pub id: String,
///     #[es(types = ["text", "keyword"], analyzer = "ik_max_word")]
///     pub title: String,
///     #[es(types = ["long"])]
///     pub views: i64,
/// }
/// ```
///
/// Supported keys: `id`, `extends`, `types = [...]`, `analyzer`,
/// `search_analyzer`, `format`, `scaling_factor`, `dims`, `relations`,
/// `ignore_above`, `copy_to`. A field with mapping keys but no `types` list
/// defaults to `["text", "keyword"]`. `#[es(extends)]` marks the (usually
/// `#[serde(flatten)]`-ed) embedded base document that supplies the ancestor
/// descriptor chain; its type must derive `EsDocument` as well.
///
/// The deriving struct must also implement `Serialize` and `Deserialize`,
/// which `EsDocument` requires as supertraits.
#[proc_macro_derive(EsDocument, attributes(es))]
pub fn derive_es_document(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedDocument::from_input(&input) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
