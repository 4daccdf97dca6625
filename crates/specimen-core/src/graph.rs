//! Walking and rewriting builder graphs.
//!
//! Graphs are immutable; [`replace_node`] returns a new root that shares
//! every untouched subtree with the original.

use crate::builder::BuilderRef;
use std::fmt::Write;
use std::sync::Arc;

/// Visit every node depth-first, parents before children.
pub fn walk<F>(root: &BuilderRef, visit: &mut F)
where
    F: FnMut(&BuilderRef, usize),
{
    walk_at(root, 0, visit);
}

fn walk_at<F>(node: &BuilderRef, depth: usize, visit: &mut F)
where
    F: FnMut(&BuilderRef, usize),
{
    visit(node, depth);
    for child in node.children() {
        walk_at(&child, depth + 1, visit);
    }
}

/// First node in depth-first order matching `predicate`.
pub fn find_first<P>(root: &BuilderRef, predicate: P) -> Option<BuilderRef>
where
    P: Fn(&BuilderRef) -> bool,
{
    find_dyn(root, &predicate)
}

fn find_dyn(node: &BuilderRef, predicate: &dyn Fn(&BuilderRef) -> bool) -> Option<BuilderRef> {
    if predicate(node) {
        return Some(node.clone());
    }
    node.children()
        .iter()
        .find_map(|child| find_dyn(child, predicate))
}

/// Copy of the graph with `target` (compared by identity) swapped for
/// `replacement`. Nodes that cannot be recomposed keep their old children.
pub fn replace_node(root: &BuilderRef, target: &BuilderRef, replacement: &BuilderRef) -> BuilderRef {
    if Arc::ptr_eq(root, target) {
        return replacement.clone();
    }
    let children = root.children();
    if children.is_empty() {
        return root.clone();
    }
    let rebuilt: Vec<BuilderRef> = children
        .iter()
        .map(|c| replace_node(c, target, replacement))
        .collect();
    if rebuilt.iter().zip(&children).all(|(a, b)| Arc::ptr_eq(a, b)) {
        return root.clone();
    }
    root.compose(rebuilt).unwrap_or_else(|| root.clone())
}

/// Indented outline of the graph, one node per line.
pub fn describe(root: &BuilderRef) -> String {
    let mut out = String::new();
    walk(root, &mut |node, depth| {
        let _ = writeln!(out, "{}{}", "  ".repeat(depth), node.node_name());
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{CompositeBuilder, DelegatingBuilder, FilteringBuilder, UnsafeRequestGuard};
    use crate::context::{ResolutionContext, SpecimenContext};
    use crate::specification::TrueSpecification;
    use specimen_types::{Request, Specimen, TypeRef, Value};

    fn constant(v: i32) -> BuilderRef {
        Arc::new(DelegatingBuilder::new(move |_, _| Ok(Specimen::Value(Value::I32(v)))))
    }

    #[test]
    fn test_replace_node_rebuilds_only_the_spine() {
        let leaf = constant(1);
        let untouched = constant(9);
        let filter: BuilderRef = Arc::new(FilteringBuilder::new(leaf.clone(), Arc::new(TrueSpecification)));
        let root: BuilderRef = Arc::new(CompositeBuilder::new(vec![filter, untouched.clone()]));

        let new_root = replace_node(&root, &leaf, &constant(2));
        assert!(!Arc::ptr_eq(&root, &new_root));
        let kids = new_root.children();
        assert!(Arc::ptr_eq(&kids[1], &untouched));

        let mut ctx = ResolutionContext::new(new_root);
        assert_eq!(
            ctx.resolve(&Request::of(TypeRef::i32())).unwrap(),
            Specimen::Value(Value::I32(2))
        );
        let mut old = ResolutionContext::new(root);
        assert_eq!(
            old.resolve(&Request::of(TypeRef::i32())).unwrap(),
            Specimen::Value(Value::I32(1))
        );
    }

    #[test]
    fn test_find_and_describe() {
        let guard: BuilderRef = Arc::new(UnsafeRequestGuard);
        let root: BuilderRef = Arc::new(CompositeBuilder::new(vec![constant(1), guard.clone()]));
        let found = find_first(&root, |n| n.node_name() == "UnsafeRequestGuard").unwrap();
        assert!(Arc::ptr_eq(&found, &guard));

        let outline = describe(&root);
        assert_eq!(outline.lines().next(), Some("CompositeBuilder"));
        assert!(outline.contains("  UnsafeRequestGuard"));
    }

    #[test]
    fn test_unmatched_replacement_returns_same_root() {
        let root: BuilderRef = Arc::new(CompositeBuilder::new(vec![constant(1)]));
        let stranger = constant(3);
        assert!(Arc::ptr_eq(&replace_node(&root, &stranger, &constant(4)), &root));
    }
}
