//! Styleable node protocol for the tessel style engine.
//!
//! The engine never owns the tree it styles. Hosts expose their UI elements
//! through the [`Styleable`] capability trait: read-only access to identity
//! (element name, style id, classes), state (pseudo-classes), structure
//! (parent, ordered children) and attributes.
//!
//! [`StyleTree`] is an arena-allocated element tree implementing the trait,
//! for hosts without a tree of their own and for tests.
//!
//! # Design
//!
//! The arena uses [`NodeId`] indices for all relationships, providing O(1)
//! access and traversal without borrow checker issues. [`NodeRef`] pairs a
//! tree reference with an id so it can be handed to the matcher by value.

mod styleable;
mod tree;

pub use styleable::{Ancestors, ChildrenInfo, Styleable};
pub use tree::{Attribute, ElementData, Node, NodeId, NodeRef, StyleTree};
