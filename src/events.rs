//! # Events
//!
//! Click handlers are described as data instead of closures. A component
//! returns [`Handler`]s alongside its nodes; the composer binds them to the
//! ids the nodes received in the document, and the resulting
//! [`EventRegistry`] can either dispatch events against a [`Document`] or
//! export the bindings as a browser script.

use crate::core::error::{MenagerieError, Result};
use crate::dom::{Document, Element, NodeId, NODE_ATTR};
use log::debug;
use serde::Serialize;
use std::fmt;

/// The events a binding can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A pointer click.
    Click,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Click => f.write_str("click"),
        }
    }
}

/// What happens when a bound event fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Append a `p` with the given text and class to the document root.
    AppendParagraph {
        /// Text content of the new paragraph.
        text: String,
        /// CSS class of the new paragraph.
        class: String,
    },
}

impl Action {
    /// Runs the action against `document`, returning the id of the
    /// appended node.
    pub fn apply(&self, document: &mut Document) -> Result<NodeId> {
        match self {
            Action::AppendParagraph { text, class } => document.append(
                Element::new("p")
                    .with_text(text.as_str())
                    .with_class(class.as_str())
                    .into(),
            ),
        }
    }

    /// The action as a JavaScript statement list, for the page script.
    pub fn to_script(&self) -> Result<String> {
        match self {
            Action::AppendParagraph { text, class } => {
                let text = js_string(text)?;
                let class = js_string(class)?;
                Ok(format!(
                    "var p = document.createElement('p'); \
                     p.textContent = {text}; \
                     p.classList.add({class}); \
                     document.body.appendChild(p);"
                ))
            }
        }
    }
}

/// A handler as returned by a component, targeting one of the nodes of
/// the same fragment by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    /// Index of the target node within the fragment.
    pub target: usize,
    /// Event the handler reacts to.
    pub event: EventKind,
    /// Action to run.
    pub action: Action,
}

impl Handler {
    /// Creates a click handler on fragment node `target`.
    pub fn on_click(target: usize, action: Action) -> Self {
        Self {
            target,
            event: EventKind::Click,
            action,
        }
    }
}

/// A handler bound to a node of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    /// Id of the node in the document.
    pub node: NodeId,
    /// Event the binding reacts to.
    pub event: EventKind,
    /// Action to run.
    pub action: Action,
}

/// Event-to-action bindings for one composed page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRegistry {
    bindings: Vec<Binding>,
}

impl EventRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `event` on `node` to `action`.
    pub fn register(
        &mut self,
        node: NodeId,
        event: EventKind,
        action: Action,
    ) {
        debug!("Binding {} on node {} to {:?}", event, node, action);
        self.bindings.push(Binding {
            node,
            event,
            action,
        });
    }

    /// All bindings, in registration order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Distinct nodes that have at least one binding, in binding order.
    pub fn bound_nodes(&self) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        for binding in &self.bindings {
            if !nodes.contains(&binding.node) {
                nodes.push(binding.node);
            }
        }
        nodes
    }

    /// Fires `event` on `node`, running every matching action in
    /// registration order. Returns how many actions ran.
    ///
    /// Fails with [`MenagerieError::UnknownNode`] if `node` is not a child
    /// of the root.
    pub fn dispatch(
        &self,
        document: &mut Document,
        node: NodeId,
        event: EventKind,
    ) -> Result<usize> {
        if document.node(node).is_none() {
            return Err(MenagerieError::UnknownNode {
                id: node,
                len: document.len(),
            });
        }

        let mut ran = 0;
        for binding in self
            .bindings
            .iter()
            .filter(|b| b.node == node && b.event == event)
        {
            let _ = binding.action.apply(document)?;
            ran += 1;
        }
        Ok(ran)
    }

    /// Exports the bindings as a browser script that attaches one
    /// listener per binding. Targets are looked up by their [`NODE_ATTR`]
    /// attribute, see [`Document::body_html_marked`].
    pub fn to_script(&self) -> Result<String> {
        let mut script = String::from(
            "document.addEventListener('DOMContentLoaded', function () {\n",
        );
        for binding in &self.bindings {
            let selector = js_string(&format!(
                "[{}=\"{}\"]",
                NODE_ATTR, binding.node
            ))?;
            script.push_str(&format!(
                "  document.querySelector({}).addEventListener('{}', \
                 function () {{ {} }});\n",
                selector,
                binding.event,
                binding.action.to_script()?
            ));
        }
        script.push_str("});\n");
        Ok(script)
    }
}

/// Quotes `value` as a JavaScript string literal.
fn js_string(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| {
        MenagerieError::internal_error(format!(
            "Cannot encode script literal: {}",
            e
        ))
    })
}
