//! Owned element tree for APT and VSR documents.
//!
//! Documents are small, so they are read once with `quick_xml` into an
//! [`XmlNode`] tree and then navigated freely. Element names keep their
//! namespace prefix (`nsbots:Groups`); lookups match on the local part.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt::Display;

use crate::core::error::DocumentError;
use crate::parsing::text::normalize_text;

/// One XML element with its attributes, direct text and child elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    /// Qualified tag name as written in the document.
    pub name: String,
    /// Attributes keyed by local name; namespace declarations are dropped.
    pub attributes: Vec<(String, String)>,
    /// Concatenated character data directly under this element.
    pub text: String,
    pub children: Vec<XmlNode>,
}

/// Returns true if the qualified element name `qualified` refers to `tag`.
///
/// The name matches when it equals `tag` or when its part after the last
/// namespace prefix does. Names that merely contain `tag` do not match, so
/// `AcqGroups` and `VerificationGroups` are never taken for `Groups`.
///
/// # Examples
///
/// ```
/// use trexolists::parsing::xml_tree::tag_matches;
///
/// assert!(tag_matches("nsbots:Groups", "Groups"));
/// assert!(tag_matches("Groups", "Groups"));
/// assert!(!tag_matches("nsbots:AcqGroups", "Groups"));
/// ```
pub fn tag_matches(qualified: &str, tag: &str) -> bool {
    qualified == tag || local_part(qualified) == tag
}

fn local_part(qualified: &str) -> &str {
    qualified
        .rsplit_once(':')
        .map(|(_, local)| local)
        .unwrap_or(qualified)
}

fn to_xml_err<E: Display>(err: E) -> DocumentError {
    DocumentError::Xml(err.to_string())
}

impl XmlNode {
    /// Parses a complete document and returns its root element.
    pub fn parse(xml: &str) -> Result<XmlNode, DocumentError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event().map_err(to_xml_err)? {
                Event::Start(e) => stack.push(Self::open(&e)?),
                Event::Empty(e) => {
                    let node = Self::open(&e)?;
                    Self::attach(&mut stack, &mut root, node)?;
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    let node = stack.pop().ok_or_else(|| {
                        DocumentError::Xml(format!("unexpected closing tag </{}>", name))
                    })?;
                    if node.name != name {
                        return Err(DocumentError::Xml(format!(
                            "closing tag </{}> does not match <{}>",
                            name, node.name
                        )));
                    }
                    Self::attach(&mut stack, &mut root, node)?;
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(to_xml_err)?;
                    Self::append_text(&mut stack, &text)?;
                }
                Event::CData(e) => {
                    Self::append_text(&mut stack, &String::from_utf8_lossy(&e))?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(DocumentError::Xml(format!(
                "document ended inside <{}>",
                open.name
            )));
        }
        root.ok_or(DocumentError::EmptyDocument)
    }

    fn open(start: &BytesStart<'_>) -> Result<XmlNode, DocumentError> {
        let mut node = XmlNode {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            ..XmlNode::default()
        };
        for attr in start.attributes() {
            let attr = attr.map_err(to_xml_err)?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let local = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(to_xml_err)?.into_owned();
            node.attributes.push((local, value));
        }
        Ok(node)
    }

    /// Character data belongs to the open element; outside the root only
    /// whitespace is allowed.
    fn append_text(stack: &mut [XmlNode], text: &str) -> Result<(), DocumentError> {
        match stack.last_mut() {
            Some(current) => current.text.push_str(text),
            None if text.trim().is_empty() => {}
            None => {
                return Err(DocumentError::Xml(format!(
                    "text outside the root element: {:?}",
                    text.trim()
                )))
            }
        }
        Ok(())
    }

    fn attach(
        stack: &mut [XmlNode],
        root: &mut Option<XmlNode>,
        node: XmlNode,
    ) -> Result<(), DocumentError> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None if root.is_none() => *root = Some(node),
            None => {
                return Err(DocumentError::Xml(format!(
                    "second root element <{}>",
                    node.name
                )))
            }
        }
        Ok(())
    }

    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    pub fn is(&self, tag: &str) -> bool {
        tag_matches(&self.name, tag)
    }

    /// First direct child whose name refers to `tag`.
    pub fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.is(tag))
    }

    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.is(tag))
    }

    /// Follows a chain of child tags from this node.
    pub fn path(&self, tags: &[&str]) -> Option<&XmlNode> {
        tags.iter().try_fold(self, |node, tag| node.child(tag))
    }

    /// Normalized text of this element.
    pub fn text(&self) -> Option<String> {
        normalize_text(Some(&self.text))
    }

    /// Normalized text of the first child named `tag`; absent if there is none.
    pub fn child_text(&self, tag: &str) -> Option<String> {
        self.child(tag).and_then(XmlNode::text)
    }

    pub fn path_text(&self, tags: &[&str]) -> Option<String> {
        self.path(tags).and_then(XmlNode::text)
    }

    /// Raw attribute value by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Normalized attribute value by local name.
    pub fn attribute_text(&self, name: &str) -> Option<String> {
        normalize_text(self.attribute(name))
    }

    /// Depth-first search for the first descendant named `tag`, self excluded.
    pub fn find_descendant(&self, tag: &str) -> Option<&XmlNode> {
        self.children
            .iter()
            .find_map(|c| if c.is(tag) { Some(c) } else { c.find_descendant(tag) })
    }
}
