//! Serialize a recorded host tree to HTML-like markup for assertions.

use std::fmt::Write;

use super::host::{HostId, RecordingHost, CONTAINER};
use crate::vnode::NODE_VALUE;

/// Markup for `node` and everything below it.
///
/// Elements print as `<tag k="v">...</tag>` with attributes in the order they
/// were set; text nodes print their `nodeValue`; listeners are omitted. The
/// container itself is transparent, so `to_markup(host, host.container())`
/// gives the rendered document.
pub fn to_markup(host: &RecordingHost, node: HostId) -> String {
    let mut out = String::new();
    write_node(host, node, &mut out);
    out
}

fn write_node(host: &RecordingHost, id: HostId, out: &mut String) {
    let Some(node) = host.node(id) else {
        return;
    };
    if node.is_text() {
        if let Some(value) = node.attributes.get(NODE_VALUE) {
            let _ = write!(out, "{value}");
        }
        return;
    }

    let transparent = node.label == CONTAINER;
    if !transparent {
        out.push('<');
        out.push_str(&node.label);
        for (key, value) in &node.attributes {
            let _ = write!(out, " {key}=\"{value}\"");
        }
        out.push('>');
    }
    for &child in host.children(id) {
        write_node(host, child, out);
    }
    if !transparent {
        let _ = write!(out, "</{}>", node.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostAdapter, HostNodeKind};

    #[test]
    fn nested_markup() {
        let mut host = RecordingHost::new();
        let container = host.container();
        let div = host.create_node(HostNodeKind::Element("div")).unwrap();
        host.set_attribute(&div, "id", &"x".into()).unwrap();
        let text = host.create_node(HostNodeKind::Text).unwrap();
        host.set_attribute(&text, NODE_VALUE, &"hello".into()).unwrap();
        host.append_child(&div, &text).unwrap();
        host.append_child(&container, &div).unwrap();

        assert_eq!(to_markup(&host, container), r#"<div id="x">hello</div>"#);
        assert_eq!(to_markup(&host, text), "hello");
    }

    #[test]
    fn empty_container() {
        let host = RecordingHost::new();
        assert_eq!(to_markup(&host, host.container()), "");
    }
}
