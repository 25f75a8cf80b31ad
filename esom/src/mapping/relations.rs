use std::collections::BTreeMap;

/// Parse a compact join-relations string into a parent → children map.
///
/// Grammar: clauses separated by `;`, each clause `parent:child1,child2`.
/// Labels are trimmed of surrounding whitespace. A clause without a `:` is
/// silently dropped. When the same parent appears in two clauses, the later
/// clause replaces the earlier one. There is no escaping: labels containing
/// `;`, `:` or `,` are unsupported.
///
/// ```
/// use esom::mapping::parse_relations;
///
/// let relations = parse_relations("question:answer;comment:reply,note");
/// assert_eq!(relations["question"], vec!["answer"]);
/// assert_eq!(relations["comment"], vec!["reply", "note"]);
/// ```
pub fn parse_relations(input: &str) -> BTreeMap<String, Vec<String>> {
    let mut relations = BTreeMap::new();
    for clause in input.split(';') {
        let Some((parent, children)) = clause.split_once(':') else {
            continue;
        };
        let children: Vec<String> = children
            .split(',')
            .map(|child| child.trim().to_string())
            .collect();
        relations.insert(parent.trim().to_string(), children);
    }
    relations
}
