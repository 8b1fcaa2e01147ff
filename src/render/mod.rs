//! Renderer module — trait-based format dispatch.

pub mod json;
pub mod markdown;

use crate::model::ProjectDocument;
use anyhow::{anyhow, Result};

/// One output page. `name` carries no extension; the caller appends the
/// renderer's extension when writing.
pub struct Page {
    pub name: String,
    pub content: String,
}

impl Page {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Page {
        Page {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Trait for rendering a ProjectDocument into a set of pages.
pub trait Renderer {
    fn render(&self, doc: &ProjectDocument) -> Vec<Page>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use markdown or json", format)),
    }
}
