//! # Pages
//!
//! The two page variants and the components each is made of. The set and
//! order of components is fixed here and cannot be changed at runtime.

use std::fmt;
use std::str::FromStr;

use crate::assets::AssetPipeline;
use crate::components::image::{PIG_ASSET, RABBIT_ASSET};
use crate::components::{Header, HelloWorldButton, ImageComponent};
use crate::composer::{Entry, PageDescriptor};
use crate::core::error::{MenagerieError, Result};

/// A page variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// Header, hello-world button, pig picture.
    Pig,
    /// Header, rabbit picture.
    Rabbit,
}

impl Page {
    /// Every page, in build order.
    pub const ALL: [Page; 2] = [Page::Rabbit, Page::Pig];

    /// The page name: used as the header parameter, the file stem and the
    /// route.
    pub fn name(&self) -> &'static str {
        match self {
            Page::Pig => "pig",
            Page::Rabbit => "rabbit",
        }
    }

    /// The document title.
    pub fn title(&self) -> &'static str {
        match self {
            Page::Pig => "Pig Page",
            Page::Rabbit => "Rabbit Page",
        }
    }

    /// The route the page is served on.
    pub fn route(&self) -> String {
        format!("/{}/", self.name())
    }

    /// The built file name.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.name())
    }

    /// Builds the page's descriptor, resolving image assets through
    /// `assets`.
    pub fn descriptor(
        &self,
        assets: &AssetPipeline,
    ) -> Result<PageDescriptor> {
        let page = PageDescriptor::new(self.name(), self.title())
            .with_entry(Entry::with_param(Header::new(), self.name()));

        Ok(match self {
            Page::Pig => page
                .with_entry(Entry::new(HelloWorldButton::new()))
                .with_entry(Entry::new(ImageComponent::pig(
                    assets.resolve(PIG_ASSET)?,
                ))),
            Page::Rabbit => page.with_entry(Entry::new(
                ImageComponent::rabbit(assets.resolve(RABBIT_ASSET)?),
            )),
        })
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Page {
    type Err = MenagerieError;

    fn from_str(s: &str) -> Result<Self> {
        Page::ALL
            .into_iter()
            .find(|page| page.name() == s)
            .ok_or_else(|| {
                MenagerieError::internal_error(format!(
                    "Unknown page '{}'",
                    s
                ))
            })
    }
}
