//! # Template Rendering Module
//!
//! Page shells are rendered with Handlebars. A built-in `page` template is
//! always registered; any `<name>.hbs` file in the configured template
//! directory is registered under `<name>` and takes precedence for the page
//! of the same name.
//!
//! The context passed to templates carries `title`, `body`, `stylesheet`
//! (optional URL), `script` (optional URL) and `page`. `body` is already
//! HTML and must be emitted with a triple-stash: `{{{body}}}`.

use crate::core::error::{MenagerieError, Result};
use handlebars::Handlebars;
use log::debug;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

/// Name of the built-in page template.
pub const DEFAULT_TEMPLATE: &str = "page";

const DEFAULT_PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{{title}}</title>
    {{#if stylesheet}}<link rel="stylesheet" href="{{stylesheet}}">{{/if}}
  </head>
  <body>{{{body}}}{{#if script}}<script src="{{script}}"></script>{{/if}}</body>
</html>
"#;

/// Renders page shells with Handlebars.
pub struct PageTemplates {
    engine: Handlebars<'static>,
    template_dir: Option<PathBuf>,
}

impl std::fmt::Debug for PageTemplates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageTemplates")
            .field("template_dir", &self.template_dir)
            .field(
                "templates",
                &self.engine.get_templates().keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl PageTemplates {
    /// Creates a renderer holding only the built-in page template.
    pub fn new() -> Result<Self> {
        let mut engine = Handlebars::new();
        engine.set_strict_mode(false);
        engine.register_escape_fn(handlebars::html_escape);
        engine
            .register_template_string(
                DEFAULT_TEMPLATE,
                DEFAULT_PAGE_TEMPLATE,
            )
            .map_err(|e| {
                MenagerieError::template_rendering_error(
                    format!("Failed to register template: {}", e),
                    DEFAULT_TEMPLATE.to_string(),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            engine,
            template_dir: None,
        })
    }

    /// Registers every `.hbs` file in `dir` under its file stem.
    pub fn with_template_dir(mut self, dir: &Path) -> Result<Self> {
        for entry in std::fs::read_dir(dir).map_err(|e| {
            MenagerieError::template_rendering_error(
                format!("Failed to read template directory: {}", e),
                String::new(),
                Some(Box::new(e)),
            )
        })? {
            let path = entry
                .map_err(|e| MenagerieError::io_error(dir.to_path_buf(), e))?
                .path();
            if !path.is_file()
                || path.extension().and_then(|s| s.to_str()) != Some("hbs")
            {
                continue;
            }

            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| {
                    MenagerieError::template_rendering_error(
                        "Invalid template filename",
                        path.display().to_string(),
                        None,
                    )
                })?
                .to_string();

            self.engine.register_template_file(&name, &path).map_err(
                |e| {
                    MenagerieError::template_rendering_error(
                        format!("Failed to register template: {}", e),
                        name.clone(),
                        Some(Box::new(e)),
                    )
                },
            )?;
            debug!("Registered template {} from {}", name, path.display());
        }

        self.template_dir = Some(dir.to_path_buf());
        Ok(self)
    }

    /// Whether a template is registered under `name`.
    pub fn has_template(&self, name: &str) -> bool {
        self.engine.has_template(name)
    }

    /// Renders the template registered for `page`, falling back to the
    /// built-in page template.
    pub fn render_page(
        &self,
        page: &str,
        context: &JsonValue,
    ) -> Result<String> {
        let template = if self.has_template(page) {
            page
        } else {
            DEFAULT_TEMPLATE
        };

        self.engine.render(template, context).map_err(|e| {
            MenagerieError::template_rendering_error(
                format!("Template rendering failed: {}", e),
                template.to_string(),
                Some(Box::new(e)),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_template() -> Result<()> {
        let templates = PageTemplates::new()?;
        let html = templates.render_page(
            "pig",
            &json!({
                "title": "Pig Page",
                "body": "<h1>Hi</h1>",
                "stylesheet": "/static/pig.css",
                "script": null,
            }),
        )?;

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Pig Page</title>"));
        assert!(html.contains("<body><h1>Hi</h1></body>"));
        assert!(html.contains(r#"href="/static/pig.css""#));
        assert!(!html.contains("<script"));
        Ok(())
    }

    #[test]
    fn test_page_override_from_dir() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("rabbit.hbs"),
            "<main>{{title}}|{{{body}}}</main>",
        )?;
        fs::write(dir.path().join("notes.txt"), "ignored")?;

        let templates =
            PageTemplates::new()?.with_template_dir(dir.path())?;
        assert!(templates.has_template("rabbit"));
        assert!(!templates.has_template("notes"));

        let context = json!({ "title": "Rabbit Page", "body": "<img>" });
        assert_eq!(
            templates.render_page("rabbit", &context)?,
            "<main>Rabbit Page|<img></main>"
        );
        assert!(templates
            .render_page("pig", &context)?
            .contains("<title>Rabbit Page</title>"));
        Ok(())
    }

    #[test]
    fn test_title_is_escaped() -> Result<()> {
        let templates = PageTemplates::new()?;
        let html = templates
            .render_page("x", &json!({ "title": "<x>", "body": "" }))?;
        assert!(html.contains("<title>&lt;x&gt;</title>"));
        Ok(())
    }
}
