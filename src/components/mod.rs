//! # Components
//!
//! Renderable components: small units that each produce a fixed piece of
//! UI. Rendering is pure; a component returns a [`Fragment`] and never
//! touches a document itself. The [`crate::composer`] appends fragments to
//! the document root in page order.
//!
//! ## Available Components
//!
//! - [`header`]: the page greeting heading, parameterised by page name
//! - [`hello_world_button`]: a button that appends a greeting per click
//! - [`image`]: the pig and rabbit pictures
//!
//! ## Implementing Custom Components
//!
//! ```rust
//! use menagerie::components::{Component, Fragment};
//! use menagerie::dom::Element;
//!
//! #[derive(Debug)]
//! struct Footer;
//!
//! impl Component for Footer {
//!     fn name(&self) -> &'static str {
//!         "footer"
//!     }
//!
//!     fn render(&self, _param: Option<&str>) -> Fragment {
//!         Fragment::single(Element::new("footer").with_text("Bye"))
//!     }
//! }
//!
//! assert_eq!(Footer.render(None).nodes().len(), 1);
//! ```

use crate::dom::Node;
use crate::events::Handler;

/// Greeting heading.
pub mod header;
/// Button that appends a greeting on click.
pub mod hello_world_button;
/// Image components.
pub mod image;

pub use header::Header;
pub use hello_world_button::HelloWorldButton;
pub use image::ImageComponent;

/// A unit that knows how to render a fixed piece of UI.
pub trait Component: std::fmt::Debug {
    /// Stable name, used in logs and as the stylesheet key.
    fn name(&self) -> &'static str;

    /// Renders the component. Components that take no parameter ignore
    /// `param`.
    fn render(&self, param: Option<&str>) -> Fragment;

    /// CSS rules for the classes this component emits, if any.
    fn stylesheet(&self) -> Option<&'static str> {
        None
    }
}

/// The output of one render: top-level nodes plus handlers targeting them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    nodes: Vec<Node>,
    handlers: Vec<Handler>,
}

impl Fragment {
    /// An empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fragment holding one node.
    pub fn single<N: Into<Node>>(node: N) -> Self {
        Self::new().with_node(node)
    }

    /// Appends a top-level node.
    pub fn with_node<N: Into<Node>>(mut self, node: N) -> Self {
        self.nodes.push(node.into());
        self
    }

    /// Attaches a handler. Its `target` indexes into this fragment's nodes.
    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handlers.push(handler);
        self
    }

    /// The top-level nodes, in order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The attached handlers.
    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    /// Splits the fragment into its nodes and handlers.
    pub fn into_parts(self) -> (Vec<Node>, Vec<Handler>) {
        (self.nodes, self.handlers)
    }
}
