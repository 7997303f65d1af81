use super::{Component, Fragment};
use crate::dom::Element;

/// The page heading: `Welcome to {page} page`.
///
/// With no parameter the placeholder renders empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Header;

impl Header {
    /// Creates the header component.
    pub fn new() -> Self {
        Self
    }
}

impl Component for Header {
    fn name(&self) -> &'static str {
        "header"
    }

    fn render(&self, param: Option<&str>) -> Fragment {
        let page_name = param.unwrap_or_default();
        Fragment::single(
            Element::new("h1")
                .with_text(format!("Welcome to {} page", page_name)),
        )
    }

    fn stylesheet(&self) -> Option<&'static str> {
        Some("h1 {\n  color: #555;\n  font-family: sans-serif;\n}\n")
    }
}
