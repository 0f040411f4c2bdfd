//! Label structure descriptors (`.labels` artifacts).

use serde::{Deserialize, Serialize};

/// A node in the label forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LabelNode>,
}

impl LabelNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(name: impl Into<String>, children: Vec<LabelNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(&self.name);
        for child in &self.children {
            child.collect_names(out);
        }
    }

    fn find(&self, name: &str) -> Option<&LabelNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

/// Flat or hierarchical set of label names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelsMetaData {
    pub roots: Vec<LabelNode>,
}

impl LabelsMetaData {
    pub fn new(roots: Vec<LabelNode>) -> Self {
        Self { roots }
    }

    /// A flat label set: every name is a root with no children.
    pub fn flat<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            roots: names.iter().map(|n| LabelNode::leaf(n.as_ref())).collect(),
        }
    }

    /// All label names, depth-first pre-order.
    pub fn label_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for root in &self.roots {
            root.collect_names(&mut out);
        }
        out
    }

    pub fn num_labels(&self) -> usize {
        self.label_names().len()
    }

    pub fn is_hierarchical(&self) -> bool {
        self.roots.iter().any(|r| !r.children.is_empty())
    }

    fn find(&self, name: &str) -> Option<&LabelNode> {
        self.roots.iter().find_map(|r| r.find(name))
    }

    /// Children of `parent`, or the roots when `parent` is `None`.
    pub fn children_of(&self, parent: Option<&str>) -> &[LabelNode] {
        match parent {
            None => &self.roots,
            Some(name) => self.find(name).map(|n| n.children.as_slice()).unwrap_or(&[]),
        }
    }

    /// First name declared more than once, if any.
    pub fn duplicate_name(&self) -> Option<&str> {
        let names = self.label_names();
        let mut seen = std::collections::HashSet::new();
        names.into_iter().find(|n| !seen.insert(*n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> LabelsMetaData {
        LabelsMetaData::new(vec![
            LabelNode::with_children(
                "organ",
                vec![LabelNode::leaf("heart"), LabelNode::leaf("lung")],
            ),
            LabelNode::leaf("bone"),
        ])
    }

    #[test]
    fn test_label_names_preorder() {
        assert_eq!(hierarchy().label_names(), vec!["organ", "heart", "lung", "bone"]);
        assert_eq!(hierarchy().num_labels(), 4);
    }

    #[test]
    fn test_children_lookup() {
        let meta = hierarchy();
        assert!(meta.is_hierarchical());
        assert_eq!(meta.children_of(None).len(), 2);
        assert_eq!(meta.children_of(Some("organ")).len(), 2);
        assert!(meta.children_of(Some("heart")).is_empty());
        assert!(meta.children_of(Some("nope")).is_empty());
    }

    #[test]
    fn test_flat_and_duplicates() {
        let flat = LabelsMetaData::flat(&["a", "b", "a"]);
        assert!(!flat.is_hierarchical());
        assert_eq!(flat.duplicate_name(), Some("a"));
        assert_eq!(hierarchy().duplicate_name(), None);
    }

    #[test]
    fn test_leaf_serializes_without_children() {
        let json = serde_json::to_string(&LabelNode::leaf("x")).unwrap();
        assert_eq!(json, r#"{"name":"x"}"#);
    }
}
