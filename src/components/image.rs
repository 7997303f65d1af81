use super::{Component, Fragment};
use crate::dom::Element;

/// Rendered width of every picture, in pixels.
pub const DEFAULT_WIDTH: u32 = 100;

/// Asset reference of the pig picture, relative to the asset directory.
pub const PIG_ASSET: &str = "imgs/pig.jpg";
/// Asset reference of the rabbit picture, relative to the asset directory.
pub const RABBIT_ASSET: &str = "imgs/rabbit.jpg";

/// A picture with fixed alt text, width and class.
///
/// `src` is the already-resolved URL of the asset; see
/// [`crate::assets::AssetPipeline::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageComponent {
    name: &'static str,
    alt: &'static str,
    class: &'static str,
    src: String,
}

impl ImageComponent {
    /// The pig picture: `alt="pig"`, class `pig-img`.
    pub fn pig<S: Into<String>>(src: S) -> Self {
        Self {
            name: "pig-image",
            alt: "pig",
            class: "pig-img",
            src: src.into(),
        }
    }

    /// The rabbit picture: `alt="rabbit"`, class `rabbit-img`.
    pub fn rabbit<S: Into<String>>(src: S) -> Self {
        Self {
            name: "rabbit-image",
            alt: "rabbit",
            class: "rabbit-img",
            src: src.into(),
        }
    }

    /// The resolved image URL.
    pub fn src(&self) -> &str {
        &self.src
    }
}

impl Component for ImageComponent {
    fn name(&self) -> &'static str {
        self.name
    }

    fn render(&self, _param: Option<&str>) -> Fragment {
        Fragment::single(
            Element::new("img")
                .with_attr("alt", self.alt)
                .with_attr("width", DEFAULT_WIDTH)
                .with_attr("src", &self.src)
                .with_class(self.class),
        )
    }

    fn stylesheet(&self) -> Option<&'static str> {
        match self.class {
            "pig-img" => Some(
                ".pig-img {\n  display: block;\n  border: 2px solid pink;\n}\n",
            ),
            "rabbit-img" => Some(
                ".rabbit-img {\n  display: block;\n  border: 2px solid gray;\n}\n",
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pig_image_attributes() {
        let fragment =
            ImageComponent::pig("/static/images/imgs/pig.jpg").render(None);
        assert_eq!(fragment.nodes().len(), 1);

        let img = fragment.nodes()[0].as_element().unwrap();
        assert_eq!(img.tag(), "img");
        assert_eq!(img.attr("alt"), Some("pig"));
        assert_eq!(img.attr("width"), Some("100"));
        assert_eq!(img.attr("src"), Some("/static/images/imgs/pig.jpg"));
        assert_eq!(img.classes(), ["pig-img".to_string()]);
    }

    #[test]
    fn test_rabbit_image_attributes() {
        let fragment =
            ImageComponent::rabbit("rabbit.jpg").render(Some("x"));
        let img = fragment.nodes()[0].as_element().unwrap();
        assert_eq!(img.attr("alt"), Some("rabbit"));
        assert_eq!(img.attr("width"), Some("100"));
        assert!(img.has_class("rabbit-img"));
    }
}
