//! Index mapping compilation.
//!
//! [`compile`] walks a document type's field descriptors (its own declared
//! fields first, then ancestors nearest to most distant) and produces the
//! `properties` section of an index-create request. The mapping is rebuilt
//! on every call; callers that need it repeatedly can memoize the result.

mod relations;

pub use relations::parse_relations;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{DocumentDescriptor, DocumentMetadata, FieldDescriptor};

/// One entry in an index mapping, tagged by its `type` discriminant.
///
/// The variant set is closed and exhaustively matched: an unrecognized tag
/// falls back to [`Property::Text`] in the compiler rather than silently
/// producing a new kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Property {
    Text {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        analyzer: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        search_analyzer: Option<String>,
    },
    Keyword {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        ignore_above: Option<u32>,
    },
    SearchAsYouType,
    Long,
    Integer,
    Short,
    Byte,
    Double,
    Float,
    HalfFloat,
    ScaledFloat {
        scaling_factor: f64,
    },
    Boolean,
    Date {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        format: Option<String>,
    },
    Object,
    Nested,
    GeoPoint,
    GeoShape,
    Ip,
    Completion,
    TokenCount {
        analyzer: String,
    },
    Percolator,
    Join {
        #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
        relations: BTreeMap<String, Vec<String>>,
    },
    RankFeature,
    RankFeatures,
    DenseVector {
        dims: u32,
    },
}

impl Property {
    /// A bare text property (no analyzers). Used as the fallback kind.
    pub fn text() -> Self {
        Property::Text {
            analyzer: None,
            search_analyzer: None,
        }
    }

    /// A bare keyword property (engine-default ignore_above).
    pub fn keyword() -> Self {
        Property::Keyword { ignore_above: None }
    }
}

/// The compiled mapping: field path → property definition.
///
/// Serializes to the `{"properties": {...}}` object an index-create request
/// expects. Key order is irrelevant to the engine; a `BTreeMap` keeps the
/// serialized form deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeMapping {
    pub properties: BTreeMap<String, Property>,
}

impl TypeMapping {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn get(&self, path: &str) -> Option<&Property> {
        self.properties.get(path)
    }
}

/// Which declaration wins when a type and one of its ancestors map the same
/// field name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MappingPrecedence {
    /// The most distant ancestor's descriptor wins. This is the documented
    /// behavior and the default.
    #[default]
    MostAncestralWins,
    /// The deriving type's own descriptor wins.
    MostDerivedWins,
}

/// Compile the mapping for a document type with the default precedence.
pub fn compile<T: DocumentMetadata>() -> TypeMapping {
    compile_descriptor(T::descriptor(), MappingPrecedence::default())
}

/// Compile the mapping for a document type with an explicit precedence.
pub fn compile_with<T: DocumentMetadata>(precedence: MappingPrecedence) -> TypeMapping {
    compile_descriptor(T::descriptor(), precedence)
}

/// Compile a mapping from a descriptor, walking declared fields first and
/// then the ancestor chain nearest to most distant.
pub fn compile_descriptor(
    descriptor: &'static DocumentDescriptor,
    precedence: MappingPrecedence,
) -> TypeMapping {
    let mut mapping = TypeMapping::default();
    for level in descriptor.ancestry() {
        for field in level.fields {
            map_field(&mut mapping, field, precedence);
        }
    }
    mapping
}

fn map_field(mapping: &mut TypeMapping, field: &FieldDescriptor, precedence: MappingPrecedence) {
    if field.types.is_empty() {
        // Identifier-only fields carry no mapping; anything else with an
        // empty tag list is a malformed hand-built descriptor.
        if !field.is_id {
            warn!(field = field.name, "field has no type tags, skipping");
        }
        return;
    }

    let primary = field.types[0];
    let property = property_for(primary, field);
    insert(mapping, field.name.to_string(), property, precedence);

    // Multi-field rule: only a primary of exactly `text` grows `keyword`
    // sub-fields, one per trailing `keyword` tag. Other secondary tags are
    // not a supported combination and are ignored.
    if primary == "text" && field.types.len() > 1 {
        for tag in &field.types[1..] {
            if *tag == "keyword" {
                insert(
                    mapping,
                    format!("{}.keyword", field.name),
                    Property::keyword(),
                    precedence,
                );
            }
        }
    }
}

fn property_for(primary: &str, field: &FieldDescriptor) -> Property {
    match primary.to_ascii_lowercase().as_str() {
        "text" => Property::Text {
            analyzer: field.analyzer.map(str::to_owned),
            search_analyzer: field.search_analyzer.map(str::to_owned),
        },
        "keyword" => Property::Keyword {
            ignore_above: (field.ignore_above > 0).then_some(field.ignore_above),
        },
        "search_as_you_type" => Property::SearchAsYouType,
        "long" => Property::Long,
        "integer" | "int" => Property::Integer,
        "short" => Property::Short,
        "byte" => Property::Byte,
        "double" => Property::Double,
        "float" => Property::Float,
        "half_float" => Property::HalfFloat,
        "scaled_float" => Property::ScaledFloat {
            scaling_factor: field.scaling_factor,
        },
        "boolean" | "bool" => Property::Boolean,
        "date" => Property::Date {
            format: field.format.map(str::to_owned),
        },
        "object" => Property::Object,
        "nested" => Property::Nested,
        "geo_point" => Property::GeoPoint,
        "geo_shape" => Property::GeoShape,
        "ip" => Property::Ip,
        "completion" => Property::Completion,
        "token_count" => Property::TokenCount {
            analyzer: field.analyzer.unwrap_or("standard").to_owned(),
        },
        "percolator" => Property::Percolator,
        "join" => {
            if field.relations.trim().is_empty() {
                warn!(
                    field = field.name,
                    "join field has no relations configured"
                );
            }
            Property::Join {
                relations: parse_relations(field.relations),
            }
        }
        "rank_feature" => Property::RankFeature,
        "rank_features" => Property::RankFeatures,
        "dense_vector" => Property::DenseVector { dims: field.dims },
        "sparse_vector" => {
            warn!(
                field = field.name,
                "sparse_vector is not supported, substituting object"
            );
            Property::Object
        }
        other => {
            warn!(
                field = field.name,
                tag = other,
                "unsupported field type, falling back to text"
            );
            Property::text()
        }
    }
}

fn insert(mapping: &mut TypeMapping, path: String, property: Property, precedence: MappingPrecedence) {
    match precedence {
        // Traversal runs declared fields first, so a plain overwrite lets
        // each more ancestral visit replace what came before it.
        MappingPrecedence::MostAncestralWins => {
            mapping.properties.insert(path, property);
        }
        MappingPrecedence::MostDerivedWins => {
            mapping.properties.entry(path).or_insert(property);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_serializes_with_type_tag() {
        let property = Property::Text {
            analyzer: Some("ik_max_word".to_string()),
            search_analyzer: None,
        };
        assert_eq!(
            serde_json::to_value(&property).unwrap(),
            json!({"type": "text", "analyzer": "ik_max_word"})
        );
    }

    #[test]
    fn unit_kinds_serialize_to_bare_type() {
        assert_eq!(
            serde_json::to_value(Property::SearchAsYouType).unwrap(),
            json!({"type": "search_as_you_type"})
        );
        assert_eq!(
            serde_json::to_value(Property::GeoPoint).unwrap(),
            json!({"type": "geo_point"})
        );
        assert_eq!(
            serde_json::to_value(Property::RankFeatures).unwrap(),
            json!({"type": "rank_features"})
        );
    }

    #[test]
    fn scaled_float_always_carries_its_factor() {
        assert_eq!(
            serde_json::to_value(Property::ScaledFloat { scaling_factor: 100.0 }).unwrap(),
            json!({"type": "scaled_float", "scaling_factor": 100.0})
        );
    }

    #[test]
    fn join_without_relations_omits_the_key() {
        let property = Property::Join {
            relations: BTreeMap::new(),
        };
        assert_eq!(
            serde_json::to_value(&property).unwrap(),
            json!({"type": "join"})
        );
    }

    #[test]
    fn keyword_omits_zero_ignore_above() {
        assert_eq!(
            serde_json::to_value(Property::keyword()).unwrap(),
            json!({"type": "keyword"})
        );
        assert_eq!(
            serde_json::to_value(Property::Keyword {
                ignore_above: Some(64)
            })
            .unwrap(),
            json!({"type": "keyword", "ignore_above": 64})
        );
    }

    #[test]
    fn mapping_serializes_under_properties() {
        let mut mapping = TypeMapping::default();
        mapping
            .properties
            .insert("views".to_string(), Property::Long);
        assert_eq!(
            serde_json::to_value(&mapping).unwrap(),
            json!({"properties": {"views": {"type": "long"}}})
        );
    }

    #[test]
    fn primary_tag_is_case_insensitive() {
        let field = FieldDescriptor::new("flag", &["Boolean"]);
        assert_eq!(property_for(field.types[0], &field), Property::Boolean);
    }

    #[test]
    fn unrecognized_tag_falls_back_to_text() {
        let field = FieldDescriptor::new("mystery", &["flattened"]);
        assert_eq!(property_for(field.types[0], &field), Property::text());
    }

    #[test]
    fn token_count_defaults_to_standard_analyzer() {
        let field = FieldDescriptor::new("length", &["token_count"]);
        assert_eq!(
            property_for(field.types[0], &field),
            Property::TokenCount {
                analyzer: "standard".to_string()
            }
        );
    }

    #[test]
    fn sparse_vector_substitutes_object() {
        let field = FieldDescriptor::new("weights", &["sparse_vector"]);
        assert_eq!(property_for(field.types[0], &field), Property::Object);
    }
}
