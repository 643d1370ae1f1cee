//! Paths into JSON trees and the transform application routine built on them.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json_bytes::{ByteString, Map, Value};
use tower::BoxError;

/// A JSON object as returned and consumed by GraphQL requests and responses.
pub type Object = Map<ByteString, Value>;

/// A path into a JSON tree, as a sequence of object keys.
///
/// Array indices are never part of a path: an array encountered while
/// following a path stands for "every element", see [`map_at_path`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path(Vec<ByteString>);

impl Path {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, segment: impl Into<ByteString>) {
        self.0.push(segment.into());
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    /// A copy of this path with `suffix` appended.
    pub(crate) fn join(&self, suffix: &Path) -> Self {
        let mut segments = self.0.clone();
        segments.extend(suffix.0.iter().cloned());
        Self(segments)
    }
}

impl Deref for Path {
    type Target = [ByteString];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl<T: Into<ByteString>> FromIterator<T> for Path {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.0.iter() {
            write!(f, "/{}", segment.as_str())?;
        }
        Ok(())
    }
}

/// Apply `transform` to the value(s) found at `path` inside `value`.
///
/// The tree is consumed and a rewritten tree is returned; nothing outside the
/// path is touched. Along the path:
/// - an array applies the remaining path independently to every element, at
///   any nesting depth,
/// - a null, or an object missing the next key, ends the walk with the
///   subtree returned as-is,
/// - at the end of the path the transform replaces the value there, applied
///   element-wise if that value is an array.
///
/// `transform` is never invoked with `Value::Null`. An error from the
/// transform aborts the whole call.
pub fn map_at_path<F>(value: Value, path: &[ByteString], transform: &F) -> Result<Value, BoxError>
where
    F: Fn(Value) -> Result<Value, BoxError> + ?Sized,
{
    match (path.split_first(), value) {
        (_, Value::Null) => Ok(Value::Null),
        (_, Value::Array(elements)) => Ok(Value::Array(
            elements
                .into_iter()
                .map(|element| map_at_path(element, path, transform))
                .collect::<Result<_, _>>()?,
        )),
        (None, value) => transform(value),
        (Some((head, rest)), Value::Object(mut object)) => {
            if let Some(entry) = object.get_mut(head.as_str()) {
                let inner = std::mem::take(entry);
                *entry = map_at_path(inner, rest, transform)?;
            }
            Ok(Value::Object(object))
        }
        // scalar leaf in the middle of a path: nothing to descend into
        (Some(_), value) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json_bytes::json;
    use test_log::test;

    use super::*;

    fn path(segments: &[&str]) -> Path {
        segments.iter().copied().collect()
    }

    fn upper(value: Value) -> Result<Value, BoxError> {
        match value {
            Value::String(s) => Ok(Value::String(s.as_str().to_uppercase().into())),
            other => Ok(other),
        }
    }

    #[test]
    fn maps_a_nested_value() {
        let result = map_at_path(
            json!({"a": {"b": "x", "c": "y"}}),
            &path(&["a", "b"]),
            &upper,
        )
        .unwrap();
        assert_eq!(result, json!({"a": {"b": "X", "c": "y"}}));
    }

    #[test]
    fn maps_every_array_element() {
        let calls = AtomicUsize::new(0);
        let result = map_at_path(json!({"list": ["a", "a"]}), &path(&["list"]), &|value| {
            calls.fetch_add(1, Ordering::SeqCst);
            upper(value)
        })
        .unwrap();
        assert_eq!(result, json!({"list": ["A", "A"]}));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn maps_through_arrays_of_objects() {
        let result = map_at_path(
            json!({"list": [{"name": "a"}, {"name": "b"}]}),
            &path(&["list", "name"]),
            &upper,
        )
        .unwrap();
        assert_eq!(result, json!({"list": [{"name": "A"}, {"name": "B"}]}));
    }

    #[test]
    fn maps_nested_lists_at_any_depth() {
        let result = map_at_path(
            json!({"matrix": [["a", "b"], [], ["c"]]}),
            &path(&["matrix"]),
            &upper,
        )
        .unwrap();
        assert_eq!(result, json!({"matrix": [["A", "B"], [], ["C"]]}));
    }

    #[test]
    fn null_along_the_path_is_untouched() {
        let calls = AtomicUsize::new(0);
        let tree = json!({"nestedNullable": null});
        let result = map_at_path(tree.clone(), &path(&["nestedNullable", "name"]), &|value| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        })
        .unwrap();
        assert_eq!(result, tree);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn null_elements_are_skipped() {
        let result = map_at_path(json!({"list": ["a", null, "b"]}), &path(&["list"]), &upper).unwrap();
        assert_eq!(result, json!({"list": ["A", null, "B"]}));
    }

    #[test]
    fn missing_key_is_a_no_op() {
        let tree = json!({"other": "a"});
        let result = map_at_path(tree.clone(), &path(&["absent", "name"]), &upper).unwrap();
        assert_eq!(result, tree);
    }

    #[test]
    fn successive_applications_compose() {
        let exclaim = |value: Value| match value {
            Value::String(s) => Ok(Value::String(format!("{}!", s.as_str()).into())),
            other => Ok(other),
        };
        let tree = json!({"a": {"b": ["x", "y"]}});
        let p = path(&["a", "b"]);

        let two_passes =
            map_at_path(map_at_path(tree.clone(), &p, &upper).unwrap(), &p, &exclaim).unwrap();
        let fused = map_at_path(tree, &p, &|value| exclaim(upper(value)?)).unwrap();

        assert_eq!(two_passes, fused);
        assert_eq!(two_passes, json!({"a": {"b": ["X!", "Y!"]}}));
    }

    #[test]
    fn transform_errors_propagate() {
        let result = map_at_path(json!({"a": "x"}), &path(&["a"]), &|_| {
            Err(BoxError::from("boom"))
        });
        assert_eq!(result.unwrap_err().to_string(), "boom");
    }

    #[test]
    fn path_displays_with_slashes() {
        assert_eq!(path(&["a", "b", "c"]).to_string(), "/a/b/c");
        assert_eq!(Path::empty().to_string(), "");
    }
}
