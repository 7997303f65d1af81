//! # HTML Output Generation
//!
//! Writes a composed page as a complete HTML document. For each page the
//! generator emits up to three files into the output directory:
//!
//! - `<page>.html`, the page shell rendered through [`PageTemplates`]
//! - the page stylesheet, built from the stylesheets of its components
//! - the page script, which re-creates the page's event bindings in the
//!   browser
//!
//! Stylesheet and script names follow [`crate::assets::output_name`], so
//! production builds get content-hashed names.
//!
//! # Examples
//!
//! ```rust,no_run
//! use menagerie::composer::{Entry, PageComposer, PageDescriptor};
//! use menagerie::components::Header;
//! use menagerie::core::config::Profile;
//! use menagerie::core::traits::Generator;
//! use menagerie::generators::HtmlGenerator;
//! use menagerie::template::PageTemplates;
//! use std::path::Path;
//!
//! let page = PageDescriptor::new("hello", "Hello")
//!     .with_entry(Entry::with_param(Header::new(), "hello"));
//! let composed = PageComposer::compose(&page).unwrap();
//!
//! let generator = HtmlGenerator::new(
//!     PageTemplates::new().unwrap(),
//!     Profile::Development,
//!     "/static/",
//! )
//! .with_minification(true);
//!
//! generator.generate(&composed, Path::new("dist")).unwrap();
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use minify_html::{minify, Cfg};
use serde::Serialize;

use crate::assets::output_name;
use crate::composer::ComposedPage;
use crate::core::config::Profile;
use crate::core::error::{MenagerieError, Result};
use crate::core::traits::{GeneratedPage, Generator, IntoContext};
use crate::events::Binding;
use crate::template::PageTemplates;

/// Template context for one page.
#[derive(Debug, Serialize)]
pub struct PageContext<'a> {
    /// Page name.
    pub page: &'a str,
    /// Document title.
    pub title: &'a str,
    /// Serialized body children.
    pub body: String,
    /// URL of the page stylesheet.
    pub stylesheet: Option<String>,
    /// URL of the page script.
    pub script: Option<String>,
    /// Event bindings of the page.
    pub events: &'a [Binding],
}

impl IntoContext for PageContext<'_> {
    fn into_context(self) -> Result<serde_json::Value> {
        let page = self.page;
        to_context(&self, page)
    }
}

/// Serializes a template context for `page`.
fn to_context<T: Serialize>(
    value: &T,
    page: &str,
) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| {
        MenagerieError::output_generation_error(
            "Failed to build template context",
            PathBuf::from(format!("{}.html", page)),
            Some(Box::new(e)),
        )
    })
}

/// HTML output generator.
#[derive(Debug)]
pub struct HtmlGenerator {
    templates: PageTemplates,
    profile: Profile,
    public_path: String,
    minify: bool,
}

impl HtmlGenerator {
    /// Creates a generator. `public_path` is the URL prefix of the output
    /// directory and must end with `/`.
    pub fn new(
        templates: PageTemplates,
        profile: Profile,
        public_path: &str,
    ) -> Self {
        Self {
            templates,
            profile,
            public_path: public_path.to_string(),
            minify: false,
        }
    }

    /// Enables or disables HTML minification.
    pub fn with_minification(mut self, enable: bool) -> Self {
        self.minify = enable;
        self
    }

    /// Minifies a page stylesheet or script when minification is on.
    ///
    /// The content is minified as the body of a `<style>` or `<script>`
    /// element; if the result does not keep that wrapper the content is
    /// written unminified.
    fn minify_asset(&self, tag: &str, content: &str) -> String {
        if !self.minify {
            return content.to_string();
        }
        let open = format!("<{}>", tag);
        let close = format!("</{}>", tag);
        let wrapped = format!("{}{}{}", open, content, close);
        let minified = minify(wrapped.as_bytes(), &minify_cfg());

        match String::from_utf8(minified) {
            Ok(html) => match html
                .strip_prefix(open.as_str())
                .and_then(|rest| rest.strip_suffix(close.as_str()))
            {
                Some(inner) => inner.to_string(),
                None => {
                    warn!("Could not minify {} content, keeping it", tag);
                    content.to_string()
                }
            },
            Err(e) => {
                warn!("Minified {} content is not UTF-8: {}", tag, e);
                content.to_string()
            }
        }
    }

    /// Writes `content` to `output_dir` under a profile-dependent name and
    /// returns the written path and its URL.
    fn write_named(
        &self,
        output_dir: &Path,
        name: &str,
        ext: &str,
        content: &str,
    ) -> Result<(PathBuf, String)> {
        let file_name =
            output_name(self.profile, name, ext, content.as_bytes());
        let path = output_dir.join(&file_name);
        write_file(&path, content)?;
        Ok((path, format!("{}{}", self.public_path, file_name)))
    }

    /// Minifies HTML content using the `minify-html` crate.
    fn minify_html(&self, content: &str, path: &Path) -> Result<String> {
        let minified = minify(content.as_bytes(), &minify_cfg());
        String::from_utf8(minified).map_err(|e| {
            MenagerieError::output_generation_error(
                "HTML minification failed",
                path.to_path_buf(),
                Some(Box::new(e)),
            )
        })
    }
}

impl Generator for HtmlGenerator {
    fn generate(
        &self,
        page: &ComposedPage,
        output_dir: &Path,
    ) -> Result<GeneratedPage> {
        self.validate(page, output_dir)?;
        fs::create_dir_all(output_dir).map_err(|e| {
            MenagerieError::io_error(output_dir.to_path_buf(), e)
        })?;

        let css = page.stylesheets.concat();
        let stylesheet = if css.is_empty() {
            None
        } else {
            let css = self.minify_asset("style", &css);
            Some(self.write_named(output_dir, &page.name, "css", &css)?)
        };

        let script = if page.events.is_empty() {
            None
        } else {
            let js = self.minify_asset("script", &page.events.to_script()?);
            Some(self.write_named(output_dir, &page.name, "js", &js)?)
        };

        let context = PageContext {
            page: &page.name,
            title: page.document.title(),
            body: page
                .document
                .body_html_marked(&page.events.bound_nodes())?,
            stylesheet: stylesheet.as_ref().map(|(_, url)| url.clone()),
            script: script.as_ref().map(|(_, url)| url.clone()),
            events: page.events.bindings(),
        }
        .into_context()?;

        let html_path = output_dir.join(format!("{}.html", page.name));
        let rendered = self.templates.render_page(&page.name, &context)?;
        let html = if self.minify {
            self.minify_html(&rendered, &html_path)?
        } else {
            rendered
        };
        write_file(&html_path, &html)?;
        info!("Generated {}", html_path.display());

        Ok(GeneratedPage {
            html: html_path,
            stylesheet: stylesheet.map(|(path, _)| path),
            script: script.map(|(path, _)| path),
        })
    }

    fn validate(
        &self,
        page: &ComposedPage,
        output_dir: &Path,
    ) -> Result<()> {
        let _ = page.document.children()?;

        if page.name.is_empty()
            || page.name.contains(&['/', '\\'][..])
            || page.name.starts_with('.')
        {
            return Err(MenagerieError::output_generation_error(
                format!("Invalid page name '{}'", page.name),
                output_dir.to_path_buf(),
                None,
            ));
        }

        if output_dir.exists() && !output_dir.is_dir() {
            return Err(MenagerieError::output_generation_error(
                "Output path is not a directory",
                output_dir.to_path_buf(),
                None,
            ));
        }

        Ok(())
    }
}

fn minify_cfg() -> Cfg {
    Cfg {
        minify_css: true,
        minify_js: true,
        ..Cfg::default()
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| MenagerieError::io_error(path.to_path_buf(), e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| MenagerieError::io_error(path.to_path_buf(), e))
}
