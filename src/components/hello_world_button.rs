use super::{Component, Fragment};
use crate::dom::Element;
use crate::events::{Action, Handler};

/// Label of the button and text of every paragraph it appends.
pub const HELLO_WORLD: &str = "Hello World";
/// Class of the button.
pub const BUTTON_CLASS: &str = "hello-world-button";
/// Class of each paragraph appended on click.
pub const TEXT_CLASS: &str = "hello-world-text";

/// A `Hello World` button. Each click appends a `p.hello-world-text` to
/// the document root.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelloWorldButton;

impl HelloWorldButton {
    /// Creates the button component.
    pub fn new() -> Self {
        Self
    }

    /// The action bound to the button's click.
    pub fn click_action() -> Action {
        Action::AppendParagraph {
            text: HELLO_WORLD.to_string(),
            class: TEXT_CLASS.to_string(),
        }
    }
}

impl Component for HelloWorldButton {
    fn name(&self) -> &'static str {
        "hello-world-button"
    }

    fn render(&self, _param: Option<&str>) -> Fragment {
        Fragment::single(
            Element::new("button")
                .with_text(HELLO_WORLD)
                .with_class(BUTTON_CLASS),
        )
        .with_handler(Handler::on_click(0, Self::click_action()))
    }

    fn stylesheet(&self) -> Option<&'static str> {
        Some(
            ".hello-world-button {\n  font-size: 20px;\n  padding: 7px 15px;\n  \
             background: green;\n  color: white;\n  outline: none;\n}\n\
             .hello-world-text {\n  color: green;\n  font-weight: bold;\n}\n",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn test_button_node() {
        let fragment = HelloWorldButton::new().render(None);
        assert_eq!(fragment.nodes().len(), 1);

        let button = fragment.nodes()[0].as_element().unwrap();
        assert_eq!(button.tag(), "button");
        assert_eq!(button.text_content(), "Hello World");
        assert!(button.has_class("hello-world-button"));
    }

    #[test]
    fn test_button_binds_click_to_itself() {
        let fragment = HelloWorldButton::new().render(Some("ignored"));
        assert_eq!(fragment.handlers().len(), 1);

        let handler = &fragment.handlers()[0];
        assert_eq!(handler.target, 0);
        assert_eq!(handler.event, EventKind::Click);
        assert_eq!(handler.action, HelloWorldButton::click_action());
    }
}
