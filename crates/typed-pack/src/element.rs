//! Projection of a typed element tree onto a [`Value::Map`].
//!
//! Each element becomes a map holding its primitive value under `"value"`
//! and each child under the child's name. A collection child gathers the run
//! of consecutive siblings sharing its name into an [`Value::Array`]. When a
//! name repeats outside such a run, the first entry is kept.

use crate::Value;

/// A node of a typed element tree.
pub trait TypedElement: Sized {
    fn name(&self) -> &str;

    /// Primitive value carried by the node itself.
    fn value(&self) -> Option<&Value>;

    /// Whether the node's definition allows repetition.
    fn is_collection(&self) -> bool;

    fn children(&self) -> &[Self];
}

/// Owned element tree node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementNode {
    pub name: String,
    pub value: Option<Value>,
    pub is_collection: bool,
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn collection(mut self) -> Self {
        self.is_collection = true;
        self
    }

    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(child);
        self
    }
}

impl TypedElement for ElementNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    fn is_collection(&self) -> bool {
        self.is_collection
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

fn try_add(pairs: &mut Vec<(String, Value)>, key: &str, value: Value) {
    if !pairs.iter().any(|(k, _)| k == key) {
        pairs.push((key.to_owned(), value));
    }
}

/// Builds the map for `element` and, recursively, its children.
pub fn element_to_value<E: TypedElement>(element: &E) -> Value {
    let mut pairs = Vec::new();
    if let Some(value) = element.value() {
        pairs.push(("value".to_owned(), value.clone()));
    }

    let children = element.children();
    let mut ix = 0;
    while ix < children.len() {
        let child = &children[ix];
        if child.is_collection() {
            let name = child.name();
            let run = children[ix..]
                .iter()
                .take_while(|sibling| sibling.name() == name)
                .count();
            let items = children[ix..ix + run].iter().map(element_to_value).collect();
            try_add(&mut pairs, name, Value::Array(items));
            ix += run;
        } else {
            try_add(&mut pairs, child.name(), element_to_value(child));
            ix += 1;
        }
    }

    Value::Map(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primitive(name: &str, value: &str) -> ElementNode {
        ElementNode::new(name).with_value(value)
    }

    #[test]
    fn leaf_value_goes_under_value_key() {
        let node = primitive("gender", "female");
        assert_eq!(
            element_to_value(&node),
            Value::Map(vec![("value".into(), "female".into())])
        );
    }

    #[test]
    fn collection_run_becomes_array() {
        let patient = ElementNode::new("Patient")
            .with_child(primitive("given", "Ewout").collection())
            .with_child(primitive("given", "Jan").collection())
            .with_child(primitive("active", "true"));
        let value = element_to_value(&patient);
        assert_eq!(value["given"].as_array().map(<[_]>::len), Some(2));
        assert_eq!(value["given"][1]["value"].as_str(), Some("Jan"));
        assert_eq!(value["active"]["value"].as_str(), Some("true"));
        assert!(value.get("value").is_none());
    }

    #[test]
    fn later_duplicates_are_skipped() {
        let node = ElementNode::new("root")
            .with_child(primitive("a", "first"))
            .with_child(primitive("b", "x"))
            .with_child(primitive("a", "second"));
        let value = element_to_value(&node);
        assert_eq!(value.as_map().map(<[_]>::len), Some(2));
        assert_eq!(value["a"]["value"].as_str(), Some("first"));
    }

    #[test]
    fn interrupted_collection_keeps_first_run() {
        let node = ElementNode::new("root")
            .with_child(primitive("c", "1").collection())
            .with_child(primitive("x", "y"))
            .with_child(primitive("c", "2").collection());
        let value = element_to_value(&node);
        assert_eq!(value["c"].as_array().map(<[_]>::len), Some(1));
        assert_eq!(value["c"][0]["value"].as_str(), Some("1"));
    }
}
