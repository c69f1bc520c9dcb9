//! Dotted field paths over JSON documents.
//!
//! A path like `items.*.title` is split on `.`; each segment is a plain key or
//! the `*` wildcard, which fans out over the elements of an array. Reading a
//! path never fails: a missing key, a wildcard on a non-array or a non-string
//! leaf simply contributes no locations.
//!
//! Resolved locations are reported as concrete step lists (`items`, `0`,
//! `title`) rather than borrowed references, so callers can translate the
//! text asynchronously and write it back afterwards.

use serde_json::{Map, Value};
use std::fmt;

/// Wildcard token
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Wildcard,
}

/// A parsed field specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split('.')
            .map(|part| {
                if part == WILDCARD {
                    Segment::Wildcard
                } else {
                    Segment::Key(part.to_string())
                }
            })
            .collect();

        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The path as literal steps, for use as a write destination.
    ///
    /// A wildcard has nothing to expand over when writing, so it is kept as
    /// the literal key `*`.
    pub fn as_steps(&self) -> Vec<PathStep> {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Key(key) => PathStep::Key(key.clone()),
                Segment::Wildcard => PathStep::Key(WILDCARD.to_string()),
            })
            .collect()
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        FieldPath::parse(raw)
    }
}

impl From<String> for FieldPath {
    fn from(raw: String) -> Self {
        FieldPath::parse(&raw)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One concrete step into a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(key) => f.write_str(key),
            PathStep::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Render concrete steps back into dotted form (`items.0.title`).
pub fn display_steps(steps: &[PathStep]) -> String {
    steps
        .iter()
        .map(PathStep::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// A string leaf addressed by a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Concrete steps from the document root to the leaf
    pub steps: Vec<PathStep>,
    /// The leaf's current text
    pub text: String,
}

/// Enumerate every string leaf addressed by `path`, expanding wildcards.
///
/// Results are in document order: array elements are visited by ascending
/// index.
pub fn resolve(doc: &Value, path: &FieldPath) -> Vec<Location> {
    let mut out = Vec::new();
    let mut prefix = Vec::new();
    walk(doc, path.segments(), &mut prefix, &mut |steps, value| {
        if let Value::String(text) = value {
            out.push(Location {
                steps: steps.to_vec(),
                text: text.clone(),
            });
        }
    });
    out
}

/// Locations of object or array elements reached by a trailing wildcard.
///
/// These are not translated, but a mirrored destination gets an empty
/// container of the same kind so its shape stays parallel to the source.
pub fn resolve_placeholders(doc: &Value, path: &FieldPath) -> Vec<(Vec<PathStep>, Value)> {
    if !matches!(path.segments().last(), Some(Segment::Wildcard)) {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut prefix = Vec::new();
    walk(doc, path.segments(), &mut prefix, &mut |steps, value| {
        let placeholder = match value {
            Value::Object(_) => Value::Object(Map::new()),
            Value::Array(_) => Value::Array(Vec::new()),
            _ => return,
        };
        out.push((steps.to_vec(), placeholder));
    });
    out
}

fn walk<F>(value: &Value, segments: &[Segment], prefix: &mut Vec<PathStep>, visit: &mut F)
where
    F: FnMut(&[PathStep], &Value),
{
    let Some((segment, rest)) = segments.split_first() else {
        visit(prefix, value);
        return;
    };

    match segment {
        Segment::Wildcard => {
            if let Value::Array(items) = value {
                for (index, item) in items.iter().enumerate() {
                    prefix.push(PathStep::Index(index));
                    walk(item, rest, prefix, visit);
                    prefix.pop();
                }
            }
        }
        Segment::Key(key) => {
            if let Some((step, child)) = child(value, key) {
                prefix.push(step);
                walk(child, rest, prefix, visit);
                prefix.pop();
            }
        }
    }
}

/// Step into `value` by `key`. Numeric keys index arrays.
fn child<'a>(value: &'a Value, key: &str) -> Option<(PathStep, &'a Value)> {
    match value {
        Value::Object(map) => map.get(key).map(|v| (PathStep::Key(key.to_string()), v)),
        Value::Array(items) => {
            let index = key.parse::<usize>().ok()?;
            items.get(index).map(|v| (PathStep::Index(index), v))
        }
        _ => None,
    }
}

/// Read the value at concrete `steps`.
pub fn get<'a>(doc: &'a Value, steps: &[PathStep]) -> Option<&'a Value> {
    steps.iter().try_fold(doc, |current, step| match (step, current) {
        (PathStep::Key(key), Value::Object(map)) => map.get(key),
        (PathStep::Key(key), Value::Array(items)) => items.get(key.parse::<usize>().ok()?),
        (PathStep::Index(index), Value::Array(items)) => items.get(*index),
        _ => None,
    })
}

/// Mutable access to the value at concrete `steps`, without creating anything.
pub fn get_mut<'a>(doc: &'a mut Value, steps: &[PathStep]) -> Option<&'a mut Value> {
    steps.iter().try_fold(doc, |current, step| match (step, current) {
        (PathStep::Key(key), Value::Object(map)) => map.get_mut(key),
        (PathStep::Key(key), Value::Array(items)) => items.get_mut(key.parse::<usize>().ok()?),
        (PathStep::Index(index), Value::Array(items)) => items.get_mut(*index),
        _ => None,
    })
}

/// Whether one of the two step lists is a prefix of the other, so writing at
/// one would replace or reach through the other. `Key("1")` and `Index(1)`
/// name the same step.
pub fn overlaps(a: &[PathStep], b: &[PathStep]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| same_step(x, y))
}

fn same_step(a: &PathStep, b: &PathStep) -> bool {
    match (a, b) {
        (PathStep::Index(i), PathStep::Key(k)) | (PathStep::Key(k), PathStep::Index(i)) => {
            k.parse::<usize>().is_ok_and(|n| n == *i)
        }
        _ => a == b,
    }
}

/// Write `value` at `steps`, materialising missing intermediate containers.
///
/// Key steps create objects and index steps create arrays (padded with
/// `null`). An existing scalar in the way is replaced by the container the
/// step needs; an existing object or array is reused as-is, so a write never
/// discards a container that already holds data.
///
/// A named key cannot live in an existing array. Such a write is refused:
/// the document is left unchanged and `false` is returned.
pub fn set_with_autocreate(doc: &mut Value, steps: &[PathStep], value: Value) -> bool {
    if !writable(doc, steps) {
        return false;
    }

    let mut current = doc;
    for step in steps {
        current = slot(current, step);
    }
    *current = value;
    true
}

/// Walk the existing part of `steps` and check no named key meets an array.
fn writable(doc: &Value, steps: &[PathStep]) -> bool {
    let mut current = doc;
    for step in steps {
        match (current, step) {
            (Value::Array(_), PathStep::Key(key)) if key.parse::<usize>().is_err() => {
                return false;
            }
            (Value::Object(_) | Value::Array(_), _) => match get(current, std::slice::from_ref(step)) {
                Some(next) => current = next,
                None => return true,
            },
            _ => return true,
        }
    }
    true
}

fn slot<'a>(current: &'a mut Value, step: &PathStep) -> &'a mut Value {
    if !current.is_object() && !current.is_array() {
        *current = match step {
            PathStep::Key(_) => Value::Object(Map::new()),
            PathStep::Index(_) => Value::Array(Vec::new()),
        };
    }

    match current {
        Value::Array(items) => {
            let index = match step {
                PathStep::Index(index) => *index,
                // `writable` has ruled out non-numeric keys here
                PathStep::Key(key) => key.parse::<usize>().unwrap_or(items.len()),
            };
            index_slot(items, index)
        }
        Value::Object(map) => map.entry(step.to_string()).or_insert(Value::Null),
        other => other,
    }
}

fn index_slot(items: &mut Vec<Value>, index: usize) -> &mut Value {
    if items.len() <= index {
        items.resize(index + 1, Value::Null);
    }
    &mut items[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn texts(doc: &Value, path: &str) -> Vec<String> {
        resolve(doc, &FieldPath::parse(path))
            .into_iter()
            .map(|loc| loc.text)
            .collect()
    }

    // ==================== Parsing Tests ====================

    #[test]
    fn test_parse_plain_and_wildcard_segments() {
        let path = FieldPath::parse("items.*.title");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("items".to_string()),
                Segment::Wildcard,
                Segment::Key("title".to_string()),
            ]
        );
        assert_eq!(path.to_string(), "items.*.title");
    }

    #[test]
    fn test_display_steps() {
        let steps = vec![
            PathStep::Key("items".to_string()),
            PathStep::Index(2),
            PathStep::Key("title".to_string()),
        ];
        assert_eq!(display_steps(&steps), "items.2.title");
    }

    // ==================== Read Tests ====================

    #[test]
    fn test_resolve_top_level_string() {
        let doc = json!({"message": "Hello"});
        let locations = resolve(&doc, &"message".into());
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].steps, vec![PathStep::Key("message".to_string())]);
        assert_eq!(locations[0].text, "Hello");
    }

    #[test]
    fn test_resolve_nested_path() {
        let doc = json!({"data": {"user": {"bio": "Likes tea"}}});
        assert_eq!(texts(&doc, "data.user.bio"), vec!["Likes tea"]);
    }

    #[test]
    fn test_resolve_wildcard_preserves_order() {
        let doc = json!({"items": [{"title": "A"}, {"title": "B"}, {"title": "C"}]});
        let locations = resolve(&doc, &"items.*.title".into());

        assert_eq!(
            locations.iter().map(|l| l.text.as_str()).collect::<Vec<_>>(),
            vec!["A", "B", "C"]
        );
        assert_eq!(locations[1].steps[1], PathStep::Index(1));
    }

    #[test]
    fn test_resolve_trailing_wildcard_over_strings() {
        let doc = json!({"tags": ["red", 7, "blue", null]});
        assert_eq!(texts(&doc, "tags.*"), vec!["red", "blue"]);
    }

    #[test]
    fn test_resolve_nested_wildcards() {
        let doc = json!({
            "sections": [
                {"rows": [{"label": "a"}, {"label": "b"}]},
                {"rows": [{"label": "c"}]}
            ]
        });
        assert_eq!(texts(&doc, "sections.*.rows.*.label"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_resolve_numeric_key_indexes_array() {
        let doc = json!({"items": [{"title": "A"}, {"title": "B"}, {"title": "C"}]});
        let locations = resolve(&doc, &"items.2.title".into());
        assert_eq!(locations[0].text, "C");
        assert_eq!(locations[0].steps[1], PathStep::Index(2));
    }

    #[test]
    fn test_resolve_wildcard_on_non_array_is_skipped() {
        let doc = json!({"items": {"title": "A"}});
        assert!(texts(&doc, "items.*.title").is_empty());
    }

    #[test]
    fn test_resolve_missing_key_is_skipped() {
        let doc = json!({"message": "Hello"});
        assert!(texts(&doc, "missing").is_empty());
        assert!(texts(&doc, "message.deeper").is_empty());
        assert!(texts(&doc, "a.b.c.d").is_empty());
    }

    #[test]
    fn test_resolve_non_string_leaf_is_skipped() {
        let doc = json!({"count": 3, "flag": true, "nested": {"a": "x"}, "list": ["y"]});
        assert!(texts(&doc, "count").is_empty());
        assert!(texts(&doc, "flag").is_empty());
        assert!(texts(&doc, "nested").is_empty());
        assert!(texts(&doc, "list").is_empty());
    }

    #[test]
    fn test_resolve_malformed_paths_do_not_panic() {
        let doc = json!({"a": {"": "empty key"}});
        assert!(texts(&doc, "").is_empty());
        assert!(texts(&doc, "..").is_empty());
        assert_eq!(texts(&doc, "a."), vec!["empty key"]);
        assert!(texts(&doc, "*").is_empty());
    }

    #[test]
    fn test_resolve_on_scalar_document() {
        assert!(texts(&json!("just text"), "message").is_empty());
        assert!(texts(&Value::Null, "message").is_empty());
    }

    #[test]
    fn test_resolve_root_array_with_wildcard() {
        let doc = json!([{"name": "x"}, {"name": "y"}]);
        assert_eq!(texts(&doc, "*.name"), vec!["x", "y"]);
    }

    // ==================== Placeholder Tests ====================

    #[test]
    fn test_placeholders_for_objects_under_trailing_wildcard() {
        let doc = json!({"items": ["text", {"k": 1}, [1, 2], 5]});
        let placeholders = resolve_placeholders(&doc, &"items.*".into());

        assert_eq!(placeholders.len(), 2);
        assert_eq!(placeholders[0].0[1], PathStep::Index(1));
        assert_eq!(placeholders[0].1, json!({}));
        assert_eq!(placeholders[1].1, json!([]));
    }

    #[test]
    fn test_no_placeholders_without_trailing_wildcard() {
        let doc = json!({"items": [{"k": 1}]});
        assert!(resolve_placeholders(&doc, &"items.*.k".into()).is_empty());
    }

    // ==================== Write Tests ====================

    #[test]
    fn test_get_and_get_mut() {
        let mut doc = json!({"items": [{"title": "A"}]});
        let steps = vec![
            PathStep::Key("items".to_string()),
            PathStep::Index(0),
            PathStep::Key("title".to_string()),
        ];
        assert_eq!(get(&doc, &steps), Some(&json!("A")));

        *get_mut(&mut doc, &steps).unwrap() = json!("Z");
        assert_eq!(doc, json!({"items": [{"title": "Z"}]}));
    }

    #[test]
    fn test_get_mut_does_not_create() {
        let mut doc = json!({});
        assert!(get_mut(&mut doc, &[PathStep::Key("missing".to_string())]).is_none());
        assert_eq!(doc, json!({}));
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut doc = json!({"message": "Hello"});
        let steps = FieldPath::parse("translated.message").as_steps();
        set_with_autocreate(&mut doc, &steps, json!("Hola"));
        assert_eq!(doc, json!({"message": "Hello", "translated": {"message": "Hola"}}));
    }

    #[test]
    fn test_set_creates_arrays_for_index_steps() {
        let mut doc = json!({});
        let steps = vec![
            PathStep::Key("translated".to_string()),
            PathStep::Key("items".to_string()),
            PathStep::Index(2),
            PathStep::Key("title".to_string()),
        ];
        set_with_autocreate(&mut doc, &steps, json!("C"));
        assert_eq!(
            doc,
            json!({"translated": {"items": [null, null, {"title": "C"}]}})
        );
    }

    #[test]
    fn test_set_replaces_scalar_in_the_way() {
        let mut doc = json!({"translated": "oops"});
        let steps = FieldPath::parse("translated.message").as_steps();
        set_with_autocreate(&mut doc, &steps, json!("Hola"));
        assert_eq!(doc, json!({"translated": {"message": "Hola"}}));
    }

    #[test]
    fn test_set_reuses_existing_containers() {
        let mut doc = json!({"translated": {"keep": 1}});
        let steps = FieldPath::parse("translated.message").as_steps();
        set_with_autocreate(&mut doc, &steps, json!("Hola"));
        assert_eq!(doc, json!({"translated": {"keep": 1, "message": "Hola"}}));
    }

    #[test]
    fn test_set_index_into_existing_object_uses_string_key() {
        let mut doc = json!({"t": {"a": 1}});
        let steps = vec![PathStep::Key("t".to_string()), PathStep::Index(0)];
        set_with_autocreate(&mut doc, &steps, json!("x"));
        assert_eq!(doc, json!({"t": {"a": 1, "0": "x"}}));
    }

    #[test]
    fn test_set_named_key_on_array_is_refused() {
        let mut doc = json!([1, 2]);
        let steps = FieldPath::parse("translated").as_steps();

        assert!(!set_with_autocreate(&mut doc, &steps, json!("x")));
        assert!(!set_with_autocreate(&mut doc, &steps, json!("y")));
        assert_eq!(doc, json!([1, 2]));
    }

    #[test]
    fn test_set_named_key_on_nested_array_is_refused() {
        let mut doc = json!({"items": [{"a": 1}]});
        let steps = FieldPath::parse("items.title").as_steps();

        assert!(!set_with_autocreate(&mut doc, &steps, json!("x")));
        assert_eq!(doc, json!({"items": [{"a": 1}]}));
    }

    #[test]
    fn test_set_numeric_key_on_array_indexes() {
        let mut doc = json!(["a"]);
        let steps = FieldPath::parse("1.t").as_steps();

        assert!(set_with_autocreate(&mut doc, &steps, json!("x")));
        assert_eq!(doc, json!(["a", {"t": "x"}]));
    }

    // ==================== Overlap Tests ====================

    #[test]
    fn test_overlaps() {
        let message = FieldPath::parse("message").as_steps();
        let nested = FieldPath::parse("message.message").as_steps();
        let other = FieldPath::parse("translated.message").as_steps();

        assert!(overlaps(&message, &nested));
        assert!(overlaps(&nested, &message));
        assert!(overlaps(&message, &message));
        assert!(!overlaps(&message, &other));
        assert!(overlaps(
            &[PathStep::Key("items".to_string()), PathStep::Index(1)],
            &FieldPath::parse("items.1.title").as_steps()
        ));
    }

    // ==================== Property Tests ====================

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            "[a-z]{0,6}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                proptest::collection::hash_map("[a-c]{1,2}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn arb_object_tree() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![Just(Value::Null), "[a-z]{0,6}".prop_map(Value::String)];
        leaf.prop_recursive(4, 32, 4, |inner| {
            proptest::collection::hash_map("[a-c]{1,2}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect()))
        })
    }

    proptest! {
        #[test]
        fn prop_resolved_locations_point_at_their_text(
            doc in arb_json(),
            path in "([a-c]{1,2}|\\*|[0-2])(\\.([a-c]{1,2}|\\*|[0-2])){0,3}",
        ) {
            for location in resolve(&doc, &FieldPath::parse(&path)) {
                prop_assert_eq!(
                    get(&doc, &location.steps),
                    Some(&Value::String(location.text.clone()))
                );
            }
        }

        #[test]
        fn prop_set_then_get_round_trips(
            mut doc in arb_object_tree(),
            path in "[a-c]{1,2}(\\.[a-c]{1,2}){0,3}",
        ) {
            let steps = FieldPath::parse(&path).as_steps();
            set_with_autocreate(&mut doc, &steps, json!("written"));
            prop_assert_eq!(get(&doc, &steps), Some(&json!("written")));
        }
    }
}
