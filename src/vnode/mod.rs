//! Virtual node model: immutable descriptions of the desired UI shape.

pub mod element;
pub mod kind;
pub mod value;

pub use element::{attributes, create_element, h, Props, VNode};
pub use kind::{Component, NodeKind};
pub use value::{event_name, AttrValue, Attributes, Event, EventHandler, NODE_VALUE};
