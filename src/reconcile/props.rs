//! Attribute diffing: the minimal set of host calls between two attribute maps.

use crate::host::{HostAdapter, HostError};
use crate::vnode::{event_name, AttrValue, Attributes, EventHandler};

/// One host-side change produced by [`diff_attributes`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttrChange<'a> {
    /// Listener removed or replaced: detach the old handler.
    DetachListener {
        key: &'a str,
        event: String,
        handler: &'a EventHandler,
    },
    /// Plain attribute no longer present.
    Remove { key: &'a str },
    /// Plain attribute added or changed.
    Set { key: &'a str, value: &'a AttrValue },
    /// Listener added or replaced: attach the new handler.
    AttachListener {
        key: &'a str,
        event: String,
        handler: &'a EventHandler,
    },
}

impl AttrChange<'_> {
    /// Apply this change to an attribute map, mirroring what the host now holds.
    pub fn record(&self, attributes: &mut Attributes) {
        match self {
            AttrChange::DetachListener { key, .. } | AttrChange::Remove { key } => {
                attributes.shift_remove(*key);
            }
            AttrChange::Set { key, value } => {
                attributes.insert((*key).to_owned(), (*value).clone());
            }
            AttrChange::AttachListener { key, handler, .. } => {
                attributes.insert((*key).to_owned(), AttrValue::Listener((*handler).clone()));
            }
        }
    }
}

/// Compare `old` against `new` and list the changes, grouped as: detaches,
/// removals, sets, attaches. Keys whose value is unchanged produce nothing.
pub fn diff_attributes<'a>(old: &'a Attributes, new: &'a Attributes) -> Vec<AttrChange<'a>> {
    let mut changes = Vec::new();

    for (key, value) in old {
        if let AttrValue::Listener(handler) = value {
            if new.get(key) != Some(value) {
                changes.push(AttrChange::DetachListener {
                    key,
                    event: event_name(key),
                    handler,
                });
            }
        }
    }

    for (key, value) in old {
        if value.is_listener() {
            continue;
        }
        match new.get(key) {
            None => changes.push(AttrChange::Remove { key }),
            Some(next) if next.is_listener() => changes.push(AttrChange::Remove { key }),
            Some(_) => {}
        }
    }

    for (key, value) in new {
        if !value.is_listener() && old.get(key) != Some(value) {
            changes.push(AttrChange::Set { key, value });
        }
    }

    for (key, value) in new {
        if let AttrValue::Listener(handler) = value {
            if old.get(key) != Some(value) {
                changes.push(AttrChange::AttachListener {
                    key,
                    event: event_name(key),
                    handler,
                });
            }
        }
    }

    changes
}

/// Apply one change to a host node.
pub fn apply_change<H: HostAdapter>(
    host: &mut H,
    node: &H::Node,
    change: &AttrChange<'_>,
) -> Result<(), HostError> {
    match change {
        AttrChange::DetachListener { event, handler, .. } => {
            host.remove_listener(node, event, handler)
        }
        AttrChange::Remove { key } => host.remove_attribute(node, key),
        AttrChange::Set { key, value } => host.set_attribute(node, key, value),
        AttrChange::AttachListener { event, handler, .. } => host.add_listener(node, event, handler),
    }
}

/// Apply a change list to one host node. Returns the number of host calls made.
pub fn apply_changes<H: HostAdapter>(
    host: &mut H,
    node: &H::Node,
    changes: &[AttrChange<'_>],
) -> Result<usize, HostError> {
    for change in changes {
        apply_change(host, node, change)?;
    }
    Ok(changes.len())
}
