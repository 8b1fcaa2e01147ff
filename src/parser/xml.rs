//! Thin XML access layer over sxd-document / sxd-xpath.
//!
//! TwinCAT sources and manifests are XML wrappers; everything the parsers
//! need is "find the first element/attribute/text matching this path",
//! which XPath covers directly.

use anyhow::{anyhow, Result};
use sxd_document::dom::Document;
use sxd_document::{parser, Package};
use sxd_xpath::nodeset::Node;
use sxd_xpath::{evaluate_xpath, Context, Factory, Value};

/// Parse XML content into a package. Malformed content is an error the
/// caller contains at the file boundary.
pub fn parse(content: &str) -> Result<Package> {
    parser::parse(content).map_err(|e| anyhow!("malformed XML: {}", e))
}

/// All nodes matching `xpath`, in document order.
pub fn nodes<'d>(doc: &'d Document<'d>, xpath: &str) -> Result<Vec<Node<'d>>> {
    let value =
        evaluate_xpath(doc, xpath).map_err(|e| anyhow!("xpath {} failed: {}", xpath, e))?;
    match value {
        Value::Nodeset(nodeset) => Ok(nodeset.document_order()),
        _ => Ok(Vec::new()),
    }
}

/// First node matching `xpath`, if any.
pub fn first_node<'d>(doc: &'d Document<'d>, xpath: &str) -> Result<Option<Node<'d>>> {
    Ok(nodes(doc, xpath)?.into_iter().next())
}

/// Trimmed string value of the first node matching `xpath`, or empty.
pub fn first_text(doc: &Document<'_>, xpath: &str) -> Result<String> {
    Ok(first_node(doc, xpath)?
        .map(|node| node.string_value().trim().to_string())
        .unwrap_or_default())
}

/// Attribute value of an element node.
pub fn attribute<'d>(node: &Node<'d>, name: &str) -> Option<&'d str> {
    node.element().and_then(|el| el.attribute_value(name))
}

/// All nodes matching an XPath that uses a namespace prefix.
pub fn nodes_ns<'d>(
    doc: &'d Document<'d>,
    xpath: &str,
    prefix: &str,
    uri: &str,
) -> Result<Vec<Node<'d>>> {
    let factory = Factory::new();
    let expression = factory
        .build(xpath)
        .map_err(|e| anyhow!("invalid xpath {}: {}", xpath, e))?
        .ok_or_else(|| anyhow!("empty xpath expression"))?;
    let mut context = Context::new();
    context.set_namespace(prefix, uri);
    let value = expression
        .evaluate(&context, doc.root())
        .map_err(|e| anyhow!("xpath {} failed: {}", xpath, e))?;
    match value {
        Value::Nodeset(nodeset) => Ok(nodeset.document_order()),
        _ => Ok(Vec::new()),
    }
}
