//! Highlight back-patching.

use tracing::{debug, warn};

use crate::response::SearchResponse;
use crate::types::EsDocument;

/// Overwrite hit sources with their highlight fragments, in place.
///
/// For every hit carrying a highlight map, each highlighted field is located
/// by exact name through the document's generated setter table — the type's
/// own fields first, then its `extends` chain — and force-overwritten with
/// **the first fragment only**; remaining fragments are discarded. A field
/// that cannot be found (or is not string-valued) is logged and skipped;
/// this never fails.
pub fn apply_highlights<T: EsDocument>(response: &mut SearchResponse<T>) {
    if response.hits.hits.is_empty() {
        debug!("no hits, skipping highlight rewrite");
        return;
    }

    for hit in &mut response.hits.hits {
        let Some(source) = hit.source.as_mut() else {
            debug!(id = %hit.id, "hit without source, skipping highlight rewrite");
            continue;
        };
        let Some(highlight) = hit.highlight.as_ref() else {
            continue;
        };

        for (field, fragments) in highlight {
            let Some(first) = fragments.first() else {
                continue;
            };
            if source.write_text_field(field, first) {
                debug!(field = %field, "applied highlight fragment");
            } else {
                warn!(
                    field = %field,
                    doc_type = T::descriptor().type_name,
                    "highlighted field not found on document"
                );
            }
        }
    }
}
