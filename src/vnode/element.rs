//! VNode construction: `create_element` and builder helpers.

use std::rc::Rc;

use super::kind::{Component, NodeKind};
use super::value::{AttrValue, Attributes, EventHandler, NODE_VALUE};
use crate::hooks::Hooks;

// ---------------------------------------------------------------------------
// VNode
// ---------------------------------------------------------------------------

/// An immutable description of one node of the desired UI.
///
/// Attributes and children are shared, so cloning a `VNode` (or handing its
/// parts to a fiber) never copies the subtree.
#[derive(Debug, Clone)]
pub struct VNode {
    kind: NodeKind,
    attributes: Rc<Attributes>,
    children: Rc<Vec<VNode>>,
}

impl VNode {
    /// Create a node with no attributes and no children.
    pub fn new(kind: impl Into<NodeKind>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Rc::new(Attributes::new()),
            children: Rc::new(Vec::new()),
        }
    }

    /// Create a text node carrying `value` as its `nodeValue`.
    pub fn text(value: impl Into<String>) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert(NODE_VALUE.to_owned(), AttrValue::Str(value.into()));
        Self {
            kind: NodeKind::Text,
            attributes: Rc::new(attributes),
            children: Rc::new(Vec::new()),
        }
    }

    /// Create a fragment wrapping `children`.
    pub fn fragment<I, C>(children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<VNode>,
    {
        Self::new(NodeKind::Fragment).with_children(children)
    }

    /// Create a component node from a render function.
    pub fn component<F>(render: F) -> Self
    where
        F: Fn(&mut Hooks<'_>, &Props) -> Option<VNode> + 'static,
    {
        Self::new(Component::new(render))
    }

    /// Set an attribute (builder).
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Rc::make_mut(&mut self.attributes).insert(key.into(), value.into());
        self
    }

    /// Attach an event listener under `key`, e.g. `"onClick"` (builder).
    pub fn on(self, key: impl Into<String>, handler: impl Fn(&super::Event) + 'static) -> Self {
        self.attr(key, AttrValue::Listener(EventHandler::new(handler)))
    }

    /// Append one child (builder).
    pub fn child(mut self, child: impl Into<VNode>) -> Self {
        Rc::make_mut(&mut self.children).push(child.into());
        self
    }

    /// Append several children (builder).
    pub fn with_children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<VNode>,
    {
        Rc::make_mut(&mut self.children).extend(children.into_iter().map(Into::into));
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn children(&self) -> &[VNode] {
        &self.children
    }

    /// Text payload of a text node.
    pub fn text_value(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Text => self.attributes.get(NODE_VALUE).and_then(AttrValue::as_str),
            _ => None,
        }
    }

    pub(crate) fn into_parts(self) -> (NodeKind, Rc<Attributes>, Rc<Vec<VNode>>) {
        (self.kind, self.attributes, self.children)
    }
}

impl From<&str> for VNode {
    fn from(s: &str) -> Self {
        VNode::text(s)
    }
}

impl From<String> for VNode {
    fn from(s: String) -> Self {
        VNode::text(s)
    }
}

impl From<&VNode> for VNode {
    fn from(node: &VNode) -> Self {
        node.clone()
    }
}

// ---------------------------------------------------------------------------
// Props
// ---------------------------------------------------------------------------

/// What a component receives: its attributes and the children it was given.
#[derive(Debug, Clone)]
pub struct Props {
    attributes: Rc<Attributes>,
    children: Rc<Vec<VNode>>,
}

impl Props {
    pub(crate) fn new(attributes: Rc<Attributes>, children: Rc<Vec<VNode>>) -> Self {
        Self {
            attributes,
            children,
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    /// String attribute lookup.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttrValue::as_str)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn children(&self) -> &[VNode] {
        &self.children
    }
}

// ---------------------------------------------------------------------------
// Free constructors
// ---------------------------------------------------------------------------

/// Build a virtual node from a kind, attributes, and children.
///
/// String children become text nodes.
pub fn create_element<K, I, C>(kind: K, attributes: Attributes, children: I) -> VNode
where
    K: Into<NodeKind>,
    I: IntoIterator<Item = C>,
    C: Into<VNode>,
{
    VNode {
        kind: kind.into(),
        attributes: Rc::new(attributes),
        children: Rc::new(children.into_iter().map(Into::into).collect()),
    }
}

/// Shorthand for an element node with no attributes or children.
pub fn h(tag: impl Into<String>) -> VNode {
    VNode::new(NodeKind::Element(tag.into()))
}

/// Build an attribute map from key/value pairs.
pub fn attributes<I, K, V>(pairs: I) -> Attributes
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<AttrValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
