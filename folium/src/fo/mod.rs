// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The source formatting-object tree.
//!
//! The tree is an index-based arena: nodes refer to their children by
//! [`NodeId`] and never to their parents. Properties are carried exactly as
//! they arrive from the parser, as `(name, value)` source strings; parsing
//! and unit resolution happen later in `resolve`.

/// Handle for a node in a [`FoTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The formatting-object vocabulary understood by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoKind {
    Root,
    LayoutMasterSet,
    SimplePageMaster,
    RegionBody,
    RegionBefore,
    RegionAfter,
    PageSequence,
    Flow,
    StaticContent,
    Block,
    Inline,
    Character,
    ExternalGraphic,
    Leader,
    PageNumber,
    PageNumberCitation,
    BasicLink,
    Table,
    TableColumn,
    TableHeader,
    TableBody,
    TableFooter,
    TableRow,
    TableCell,
    ListBlock,
    ListItem,
    ListItemLabel,
    ListItemBody,
    Float,
    Footnote,
    FootnoteBody,
    Marker,
    RetrieveMarker,
    BlockContainer,
    /// Character data between elements.
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FoNode {
    pub(crate) kind: FoKind,
    pub(crate) properties: Vec<(String, String)>,
    pub(crate) children: Vec<NodeId>,
}

/// An immutable-after-construction tree of formatting objects.
///
/// The external parser builds the tree through [`add_child`](Self::add_child)
/// and [`set_property`](Self::set_property); layout only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct FoTree {
    nodes: Vec<FoNode>,
}

impl FoTree {
    /// Creates a tree holding a bare `root` node.
    pub fn new() -> Self {
        Self {
            nodes: vec![FoNode {
                kind: FoKind::Root,
                properties: Vec::new(),
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a new child to `parent` and returns its id.
    pub fn add_child(&mut self, parent: NodeId, kind: FoKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(FoNode {
            kind,
            properties: Vec::new(),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Appends a text node to `parent`.
    pub fn add_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.add_child(parent, FoKind::Text(text.to_owned()))
    }

    /// Records a specified property. Later values for the same name win.
    pub fn set_property(&mut self, node: NodeId, name: &str, value: &str) {
        let properties = &mut self.nodes[node.index()].properties;
        if let Some(slot) = properties.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value.to_owned();
        } else {
            properties.push((name.to_owned(), value.to_owned()));
        }
    }

    pub fn kind(&self, node: NodeId) -> &FoKind {
        &self.nodes[node.index()].kind
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].children
    }

    /// Returns the specified value of a property, if any.
    pub fn property(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.index()]
            .properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn properties(&self, node: NodeId) -> &[(String, String)] {
        &self.nodes[node.index()].properties
    }

    /// Returns the first child of `node` with the given kind.
    pub(crate) fn find_child(&self, node: NodeId, kind: &FoKind) -> Option<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .find(|&child| self.kind(child) == kind)
    }

}

impl Default for FoTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_query() {
        let mut tree = FoTree::new();
        let seq = tree.add_child(tree.root(), FoKind::PageSequence);
        tree.set_property(seq, "master-reference", "simple");
        tree.set_property(seq, "master-reference", "cover");
        let flow = tree.add_child(seq, FoKind::Flow);
        tree.add_text(flow, "hello");

        assert_eq!(tree.property(seq, "master-reference"), Some("cover"));
        assert_eq!(tree.children(seq), &[flow]);
        assert_eq!(
            tree.kind(tree.children(flow)[0]),
            &FoKind::Text("hello".into())
        );
        assert_eq!(tree.find_child(tree.root(), &FoKind::PageSequence), Some(seq));
    }
}
