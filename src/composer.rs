//! # Page Composer
//!
//! A [`PageDescriptor`] lists which components make up a page, in order,
//! and which parameter each receives. [`PageComposer::compose_into`]
//! renders them one by one into a document root and binds their handlers.
//! The first failure aborts the rest of the page.

use log::{debug, info, warn};

use crate::components::Component;
use crate::core::error::Result;
use crate::dom::Document;
use crate::events::EventRegistry;

/// One component of a page together with the parameter it is rendered
/// with.
#[derive(Debug)]
pub struct Entry {
    component: Box<dyn Component>,
    param: Option<String>,
}

impl Entry {
    /// An entry rendered without a parameter.
    pub fn new<C: Component + 'static>(component: C) -> Self {
        Self {
            component: Box::new(component),
            param: None,
        }
    }

    /// An entry rendered with `param`.
    pub fn with_param<C, S>(component: C, param: S) -> Self
    where
        C: Component + 'static,
        S: Into<String>,
    {
        Self {
            component: Box::new(component),
            param: Some(param.into()),
        }
    }

    /// The component.
    pub fn component(&self) -> &dyn Component {
        self.component.as_ref()
    }

    /// The parameter passed to `render`.
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }
}

/// The ordered list of components that make up one page.
#[derive(Debug)]
pub struct PageDescriptor {
    name: String,
    title: String,
    entries: Vec<Entry>,
}

impl PageDescriptor {
    /// Creates an empty descriptor.
    pub fn new<N: Into<String>, T: Into<String>>(name: N, title: T) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// Appends an entry.
    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    /// The page name, used for file names and routes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The document title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The entries, in render order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Distinct stylesheets of the page's components, in first-use order.
    pub fn stylesheets(&self) -> Vec<&'static str> {
        let mut seen: Vec<&'static str> = Vec::new();
        for entry in &self.entries {
            if let Some(css) = entry.component().stylesheet() {
                if !seen.contains(&css) {
                    seen.push(css);
                }
            }
        }
        seen
    }
}

/// A page after composition: its document and event bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPage {
    /// Page name.
    pub name: String,
    /// The composed document.
    pub document: Document,
    /// Event bindings registered during composition.
    pub events: EventRegistry,
    /// Stylesheets of the components on the page.
    pub stylesheets: Vec<&'static str>,
}

/// Renders page descriptors into documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageComposer;

impl PageComposer {
    /// Renders every entry of `page` into `document`, in order, and binds
    /// the handlers each component returns.
    ///
    /// Stops at the first error; nodes appended before it stay in place.
    pub fn compose_into(
        page: &PageDescriptor,
        document: &mut Document,
        events: &mut EventRegistry,
    ) -> Result<()> {
        for entry in page.entries() {
            let component = entry.component();
            debug!(
                "Rendering {} into page {} with {:?}",
                component.name(),
                page.name(),
                entry.param()
            );

            let (nodes, handlers) =
                component.render(entry.param()).into_parts();
            let mut ids = Vec::with_capacity(nodes.len());
            for node in nodes {
                ids.push(document.append(node)?);
            }

            for handler in handlers {
                match ids.get(handler.target) {
                    Some(&id) => {
                        events.register(id, handler.event, handler.action)
                    }
                    None => warn!(
                        "{} returned a handler for missing node {}",
                        component.name(),
                        handler.target
                    ),
                }
            }
        }
        Ok(())
    }

    /// Composes `page` into a fresh document.
    pub fn compose(page: &PageDescriptor) -> Result<ComposedPage> {
        let mut document = Document::new(page.title());
        let mut events = EventRegistry::new();
        Self::compose_into(page, &mut document, &mut events)?;
        info!(
            "Composed page {} ({} nodes, {} bindings)",
            page.name(),
            document.len(),
            events.bindings().len()
        );

        Ok(ComposedPage {
            name: page.name().to_string(),
            document,
            events,
            stylesheets: page.stylesheets(),
        })
    }
}
