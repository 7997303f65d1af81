//! End-to-end page scenarios: composition order, button clicks, repeated
//! rendering and serving the built files.

use menagerie::components::hello_world_button::{HELLO_WORLD, TEXT_CLASS};
use menagerie::assets::AssetPipeline;
use menagerie::components::{
    Component, Header, HelloWorldButton, ImageComponent,
};
use menagerie::composer::{Entry, PageComposer, PageDescriptor};
use menagerie::core::config::{Config, Profile};
use menagerie::dom::{Document, Node};
use menagerie::events::{EventKind, EventRegistry};
use menagerie::pages::Page;
use menagerie::server::{Reply, StaticServer};
use menagerie::{Menagerie, MenagerieError, Result};
use std::fs;
use tempfile::TempDir;

fn project(profile: Profile) -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    let imgs = dir.path().join("assets/imgs");
    fs::create_dir_all(&imgs).unwrap();
    fs::write(imgs.join("pig.jpg"), b"pig").unwrap();
    fs::write(imgs.join("rabbit.jpg"), b"rabbit").unwrap();
    let config = Config {
        asset_dir: dir.path().join("assets"),
        output_dir: dir.path().join("dist"),
        profile,
        ..Default::default()
    };
    (dir, config)
}

fn tags(document: &Document) -> Vec<String> {
    document
        .children()
        .unwrap()
        .iter()
        .filter_map(Node::as_element)
        .map(|e| e.tag().to_string())
        .collect()
}

#[test]
fn test_pig_page_body_order() -> Result<()> {
    let (_dir, config) = project(Profile::Development);
    let menagerie = Menagerie::new(config);
    let assets = AssetPipeline::from_config(menagerie.config());
    let page = menagerie.compose(Page::Pig, &assets)?;

    assert_eq!(page.document.title(), "Pig Page");
    assert_eq!(tags(&page.document), ["h1", "button", "img"]);

    let children = page.document.children()?;
    assert_eq!(children[0].text_content(), "Welcome to pig page");
    let img = children[2].as_element().unwrap();
    assert_eq!(img.attr("alt"), Some("pig"));
    assert_eq!(img.attr("width"), Some("100"));
    assert!(img.has_class("pig-img"));
    Ok(())
}

#[test]
fn test_rabbit_page_body_order() -> Result<()> {
    let (_dir, config) = project(Profile::Development);
    let menagerie = Menagerie::new(config);
    let assets = AssetPipeline::from_config(menagerie.config());
    let page = menagerie.compose(Page::Rabbit, &assets)?;

    assert_eq!(page.document.title(), "Rabbit Page");
    assert_eq!(tags(&page.document), ["h1", "img"]);
    let img = page.document.children()?[1].as_element().unwrap().clone();
    assert_eq!(img.attr("alt"), Some("rabbit"));
    assert!(img.has_class("rabbit-img"));
    Ok(())
}

#[test]
fn test_button_clicks_append_paragraphs() -> Result<()> {
    let page = PageComposer::compose(
        &PageDescriptor::new("pig", "Pig Page")
            .with_entry(Entry::with_param(Header::new(), "pig"))
            .with_entry(Entry::new(HelloWorldButton::new())),
    )?;
    let mut document = page.document.clone();
    let button = 1;

    for _ in 0..3 {
        assert_eq!(
            page.events.dispatch(&mut document, button, EventKind::Click)?,
            1
        );
    }

    let paragraphs: Vec<_> = document
        .children()?
        .iter()
        .filter_map(Node::as_element)
        .filter(|e| e.tag() == "p")
        .collect();
    assert_eq!(paragraphs.len(), 3);
    for p in paragraphs {
        assert_eq!(p.text_content(), HELLO_WORLD);
        assert_eq!(p.classes(), [TEXT_CLASS.to_string()]);
    }

    // the heading has no binding
    assert_eq!(page.events.dispatch(&mut document, 0, EventKind::Click)?, 0);
    Ok(())
}

#[test]
fn test_rendering_n_times_appends_n_copies() -> Result<()> {
    let image = ImageComponent::rabbit("/static/images/imgs/rabbit.jpg");
    let mut page = PageDescriptor::new("rabbits", "Rabbits");
    for _ in 0..4 {
        page = page.with_entry(Entry::new(image.clone()));
    }
    let composed = PageComposer::compose(&page)?;

    assert_eq!(composed.document.len(), 4);
    let expected = image.render(None).nodes()[0].clone();
    for node in composed.document.children()? {
        assert_eq!(node, &expected);
    }
    Ok(())
}

#[test]
fn test_missing_root_stops_composition() {
    let page = PageDescriptor::new("pig", "Pig Page")
        .with_entry(Entry::with_param(Header::new(), "pig"))
        .with_entry(Entry::new(HelloWorldButton::new()));
    let mut document = Document::without_root("Pig Page");
    let mut events = EventRegistry::new();

    let err = PageComposer::compose_into(&page, &mut document, &mut events)
        .unwrap_err();
    assert!(matches!(err, MenagerieError::RootNotFound { .. }));
    assert!(document.is_empty());
    assert!(events.is_empty());
}

#[test]
fn test_served_page_is_built_file_verbatim() -> Result<()> {
    let (_dir, config) = project(Profile::Production);
    let _ = Menagerie::new(config.clone()).build()?;

    let built = fs::read_to_string(config.output_dir.join("pig.html"))?;
    let server = StaticServer::from_config(&config);
    assert_eq!(server.respond("/pig/")?, Reply::Page(built));
    Ok(())
}
