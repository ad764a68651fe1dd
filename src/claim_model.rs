//! Structured merge/delete of the extension trees carried by repost
//! modifications (C6). A repost claim may edit or delete named extension
//! schemas (small structured attribute bags) on the claim it reposts;
//! this module implements that merge algebra independent of any protobuf
//! wire type, working over a small tagged-variant tree instead — see
//! `examples/original_source/hub/schema/attrs.py`'s `Struct`/
//! `StreamExtensionMap`, which this module generalizes per design note
//! §9 ("model as a tagged variant ... with merge/delete defined by
//! variant-matched recursion").
//!
//! Only stream claims carry extensions, and a modification only ever
//! applies to a reposted claim of the same type (§4.5).

use std::collections::BTreeMap;

use crate::error::ClaimModelError;

/// A leaf or nested value inside an extension's attribute map. Mirrors a
/// protobuf-Struct value's variants (null, bool, number, string, list, map)
/// without depending on protobuf itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<ExtensionValue>),
    Map(ExtensionAttrs),
}

/// One extension schema's attribute map, e.g. `{"a": 1, "b": ["x", "y"]}`.
pub type ExtensionAttrs = BTreeMap<String, ExtensionValue>;

/// The full extension tree carried by a stream claim: schema name to its
/// attribute map. A claim with no extensions is an empty tree.
pub type ExtensionTree = BTreeMap<String, ExtensionAttrs>;

impl ExtensionValue {
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ExtensionValue::Null,
            serde_json::Value::Bool(b) => ExtensionValue::Bool(*b),
            serde_json::Value::Number(n) => ExtensionValue::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => ExtensionValue::String(s.clone()),
            serde_json::Value::Array(items) => {
                ExtensionValue::List(items.iter().map(ExtensionValue::from_json).collect())
            }
            serde_json::Value::Object(map) => ExtensionValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), ExtensionValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ExtensionValue::Null => serde_json::Value::Null,
            ExtensionValue::Bool(b) => serde_json::Value::Bool(*b),
            ExtensionValue::Number(n) => serde_json::json!(n),
            ExtensionValue::String(s) => serde_json::Value::String(s.clone()),
            ExtensionValue::List(items) => {
                serde_json::Value::Array(items.iter().map(ExtensionValue::to_json).collect())
            }
            ExtensionValue::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// Merges `other` into `target` in place.
///
/// - A key absent from `target` is copied in when `!delete` (adding it would
///   make no sense under delete — there is nothing there to delete).
/// - A key present in both, with non-empty map/list values on both sides,
///   recurses (maps) or applies element-wise matching (lists): on add, a
///   missing element is appended; on delete, a present element is removed.
/// - A key present in both sides as an empty-in-`other` map or list is a
///   whole-field removal signal under `delete`.
/// - A key present on both sides as equal scalars collapses — it is
///   redundant either way, so it is removed from `target`.
/// - A key whose kind disagrees between `target` and `other` (e.g. a list
///   here, a scalar there) is left untouched: type-mismatched leaves never
///   mutate the target (§4.5, property 8).
pub fn merge_attrs(target: &mut ExtensionAttrs, other: &ExtensionAttrs, delete: bool) {
    for (key, other_value) in other {
        match target.get(key).cloned() {
            None => {
                if !delete {
                    target.insert(key.clone(), other_value.clone());
                }
            }
            Some(ExtensionValue::Map(mut sub)) => {
                if let ExtensionValue::Map(other_sub) = other_value {
                    if other_sub.is_empty() {
                        if delete {
                            target.remove(key);
                        }
                    } else {
                        merge_attrs(&mut sub, other_sub, delete);
                        if delete && sub.is_empty() {
                            target.remove(key);
                        } else {
                            target.insert(key.clone(), ExtensionValue::Map(sub));
                        }
                    }
                }
                // else: target holds a map, other holds something else — type mismatch, untouched.
            }
            Some(ExtensionValue::List(mut items)) => {
                if let ExtensionValue::List(other_items) = other_value {
                    if other_items.is_empty() {
                        if delete {
                            target.remove(key);
                        }
                    } else {
                        for item in other_items {
                            let pos = items.iter().position(|existing| existing == item);
                            if delete {
                                if let Some(p) = pos {
                                    items.remove(p);
                                }
                            } else if pos.is_none() {
                                items.push(item.clone());
                            }
                        }
                        target.insert(key.clone(), ExtensionValue::List(items));
                    }
                }
            }
            Some(existing_scalar) => {
                let same_kind = std::mem::discriminant(&existing_scalar) == std::mem::discriminant(other_value);
                if same_kind && existing_scalar == *other_value {
                    target.remove(key);
                }
            }
        }
    }
}

/// Merges every schema in `other` into `target`. A schema with an empty
/// attribute map in `other` is a whole-schema removal signal under
/// `delete`, same as an empty nested map inside [`merge_attrs`].
pub fn merge_tree(target: &mut ExtensionTree, other: &ExtensionTree, delete: bool) {
    for (schema, other_attrs) in other {
        if delete && other_attrs.is_empty() {
            target.remove(schema);
            continue;
        }
        let mut attrs = target.remove(schema).unwrap_or_default();
        merge_attrs(&mut attrs, other_attrs, delete);
        if delete && attrs.is_empty() {
            continue;
        }
        target.insert(schema.clone(), attrs);
    }
}

/// The claim-type discriminant that gates whether a modification applies
/// (§4.5: "only defined when modifier's claim-type equals the reposted
/// claim's type and both are the stream type").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimType {
    Stream,
    Channel,
    Repost,
    Collection,
}

/// The structured deletions/edits a repost claim carries against the claim
/// it reposts — `mods.deletions`/`mods.edits` in the source, built up by
/// [`ClaimModification::record_edit`]/[`record_deletion`](Self::record_deletion)
/// as a publisher edits a repost, then applied once against the reposted
/// claim's own extensions by [`ClaimModification::apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimModification {
    pub claim_type: Option<ClaimType>,
    pub deletions: ExtensionTree,
    pub edits: ExtensionTree,
}

impl ClaimModification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `edits` into the stored edit set for `claim_type`. Only stream
    /// claims carry extensions, so a non-stream `claim_type` is a no-op —
    /// mirrors `ModifyingClaimReference.update`'s early return.
    pub fn record_edit(&mut self, claim_type: ClaimType, edits: &ExtensionTree) {
        if claim_type != ClaimType::Stream {
            return;
        }
        self.claim_type = Some(claim_type);
        merge_tree(&mut self.edits, edits, false);
    }

    /// Folds `deletions` into the stored deletion set for `claim_type`. This
    /// accumulates the requested deletions themselves (an add-merge into
    /// `self.deletions`, same as `record_edit`) — the `delete` semantics are
    /// only applied later, when `apply` merges `self.deletions` into the
    /// reposted claim's extensions with `delete: true`.
    pub fn record_deletion(&mut self, claim_type: ClaimType, deletions: &ExtensionTree) {
        if claim_type != ClaimType::Stream {
            return;
        }
        self.claim_type = Some(claim_type);
        merge_tree(&mut self.deletions, deletions, false);
    }

    /// Applies this modification to `reposted_extensions`, returning the
    /// resulting extension tree. Deletions are applied before edits (§4.5).
    /// Returns a clone of `reposted_extensions` unchanged if the modifier's
    /// claim type doesn't match `reposted_claim_type`, or either side isn't
    /// the stream type — a modification never applies across a type change.
    pub fn apply(
        &self,
        reposted_claim_type: ClaimType,
        reposted_extensions: &ExtensionTree,
    ) -> ExtensionTree {
        if reposted_claim_type != ClaimType::Stream || self.claim_type != Some(reposted_claim_type) {
            return reposted_extensions.clone();
        }
        let mut result = reposted_extensions.clone();
        merge_tree(&mut result, &self.deletions, true);
        merge_tree(&mut result, &self.edits, false);
        result
    }
}

/// Parses one extension's schema and attribute map out of a caller-supplied
/// JSON value, accepting either a single-key wrapper `{schema: attrs}` (the
/// schema name is read off the wrapper) or a bare attribute map paired with
/// an externally-known `schema_hint`.
pub fn parse_extension_value(
    schema_hint: Option<&str>,
    value: &serde_json::Value,
) -> Result<(String, ExtensionAttrs), ClaimModelError> {
    let obj = match value {
        serde_json::Value::Object(map) => map,
        other => return Err(ClaimModelError::NotAMap(other.to_string())),
    };
    if schema_hint.is_none() && obj.len() == 1 {
        let (schema, attrs) = obj.iter().next().expect("len == 1");
        let attrs_map = match attrs {
            serde_json::Value::Object(inner) => inner,
            other => return Err(ClaimModelError::NotAMap(other.to_string())),
        };
        return Ok((schema.clone(), to_attrs(attrs_map)));
    }
    let schema = schema_hint.ok_or(ClaimModelError::AmbiguousSchema)?.to_string();
    Ok((schema, to_attrs(obj)))
}

/// As [`parse_extension_value`], but the input is a JSON-encoded string
/// (accepted only when it begins with `{`, matching the source's
/// `str.startswith('{')` dispatch between raw strings and JSON payloads).
pub fn parse_extension_json_str(
    schema_hint: Option<&str>,
    s: &str,
) -> Result<(String, ExtensionAttrs), ClaimModelError> {
    if !s.trim_start().starts_with('{') {
        return Err(ClaimModelError::NotAMap(s.to_string()));
    }
    let value: serde_json::Value =
        serde_json::from_str(s).map_err(|e| ClaimModelError::Json(e.to_string()))?;
    parse_extension_value(schema_hint, &value)
}

fn to_attrs(map: &serde_json::Map<String, serde_json::Value>) -> ExtensionAttrs {
    map.iter()
        .map(|(k, v)| (k.clone(), ExtensionValue::from_json(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> ExtensionValue {
        ExtensionValue::Number(n)
    }

    fn strs(items: &[&str]) -> ExtensionValue {
        ExtensionValue::List(items.iter().map(|s| ExtensionValue::String(s.to_string())).collect())
    }

    fn tree_of(schema: &str, attrs: ExtensionAttrs) -> ExtensionTree {
        let mut tree = ExtensionTree::new();
        tree.insert(schema.to_string(), attrs);
        tree
    }

    #[test]
    fn stream_extension_merge_s6() {
        let reposted = tree_of(
            "s",
            ExtensionAttrs::from([("a".to_string(), num(1.0)), ("b".to_string(), strs(&["x", "y"]))]),
        );
        let mut modification = ClaimModification::new();
        modification.record_deletion(ClaimType::Stream, &tree_of("s", ExtensionAttrs::from([("a".to_string(), num(1.0))])));
        modification.record_edit(ClaimType::Stream, &tree_of("s", ExtensionAttrs::from([("b".to_string(), strs(&["z"]))])));

        let result = modification.apply(ClaimType::Stream, &reposted);
        let expected = tree_of("s", ExtensionAttrs::from([("b".to_string(), strs(&["x", "y", "z"]))]));
        assert_eq!(result, expected);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut modifier = ExtensionAttrs::new();
        modifier.insert("tag".to_string(), ExtensionValue::String("music".to_string()));

        let mut once = ExtensionAttrs::new();
        merge_attrs(&mut once, &modifier, false);
        let mut twice = once.clone();
        merge_attrs(&mut twice, &modifier, false);
        assert_eq!(once, twice);
    }

    #[test]
    fn delete_then_add_restores_claim() {
        let original = ExtensionAttrs::from([("title".to_string(), ExtensionValue::String("hi".to_string()))]);
        let modifier = original.clone();

        let mut deleted = original.clone();
        merge_attrs(&mut deleted, &modifier, true);
        assert!(deleted.is_empty());

        merge_attrs(&mut deleted, &modifier, false);
        assert_eq!(deleted, original);
    }

    #[test]
    fn type_mismatched_leaf_is_untouched() {
        let mut target = ExtensionAttrs::from([("x".to_string(), strs(&["a"]))]);
        let other = ExtensionAttrs::from([("x".to_string(), num(5.0))]);
        merge_attrs(&mut target, &other, false);
        assert_eq!(target.get("x"), Some(&strs(&["a"])));
    }

    #[test]
    fn empty_other_map_removes_whole_field_on_delete() {
        let mut target = ExtensionAttrs::from([(
            "nested".to_string(),
            ExtensionValue::Map(ExtensionAttrs::from([("k".to_string(), num(1.0))])),
        )]);
        let other = ExtensionAttrs::from([("nested".to_string(), ExtensionValue::Map(ExtensionAttrs::new()))]);
        merge_attrs(&mut target, &other, true);
        assert!(!target.contains_key("nested"));
    }

    #[test]
    fn apply_is_noop_when_claim_type_differs() {
        let reposted = tree_of("s", ExtensionAttrs::from([("a".to_string(), num(1.0))]));
        let mut modification = ClaimModification::new();
        modification.record_edit(ClaimType::Stream, &tree_of("s", ExtensionAttrs::from([("b".to_string(), num(2.0))])));

        let result = modification.apply(ClaimType::Channel, &reposted);
        assert_eq!(result, reposted);
    }

    #[test]
    fn single_key_wrapper_parses_schema_and_attrs() {
        let value = serde_json::json!({"musicdetails": {"artist": "bob"}});
        let (schema, attrs) = parse_extension_value(None, &value).unwrap();
        assert_eq!(schema, "musicdetails");
        assert_eq!(attrs.get("artist"), Some(&ExtensionValue::String("bob".to_string())));
    }

    #[test]
    fn json_string_must_start_with_brace() {
        assert!(parse_extension_json_str(Some("s"), "not json").is_err());
        let parsed = parse_extension_json_str(None, r#"{"s": {"a": 1}}"#).unwrap();
        assert_eq!(parsed.0, "s");
    }
}
