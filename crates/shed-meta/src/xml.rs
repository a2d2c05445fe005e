//! Minimal XML element tree over `quick-xml`.
//!
//! Definition files are small, so they are read fully into a tree that the
//! parsers can query by child name, the way the files are documented.

use std::path::{Component, Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use shed_fs::NormalizedPath;

use crate::{Error, Result};

/// Namespace of XInclude directives.
pub const XINCLUDE_NS: &str = "http://www.w3.org/2001/XInclude";

/// Nested includes deeper than this are rejected.
const MAX_INCLUDE_DEPTH: usize = 8;

/// Element nesting limit. The tree and its consumers recurse, so this
/// bounds their stack use.
pub const MAX_ELEMENT_DEPTH: usize = 256;

/// A parsed XML element with its attributes, children and text content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Qualified element name, prefix included
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Concatenated text and CDATA content
    pub text: String,
}

impl Element {
    /// Parse a document and return its root element.
    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader.read_event().map_err(|e| Error::Xml {
                message: format!("{} at position {}", e, reader.buffer_position()),
            })?;
            match event {
                Event::Start(start) => {
                    if stack.len() >= MAX_ELEMENT_DEPTH {
                        return Err(Error::Xml {
                            message: format!(
                                "elements nested deeper than {MAX_ELEMENT_DEPTH} levels at position {}",
                                reader.buffer_position()
                            ),
                        });
                    }
                    stack.push(Self::from_start(&start)?);
                }
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| Error::Xml {
                        message: "unexpected closing tag".into(),
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let unescaped = text.unescape().map_err(|e| Error::Xml {
                            message: e.to_string(),
                        })?;
                        current.text.push_str(&unescaped);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::Xml {
                message: format!("unclosed element <{}>", open.name),
            });
        }
        root.ok_or_else(|| Error::Xml {
            message: "document has no root element".into(),
        })
    }

    /// Read and parse the document at `path`.
    pub fn parse_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::MissingFile {
                path: path.display().to_string(),
            },
            _ => Error::io(path, e),
        })?;
        Self::parse(&content)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| Error::Xml {
                message: format!("bad attribute on <{name}>: {e}"),
            })?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).to_string();
            let value = attribute
                .unescape_value()
                .map_err(|e| Error::Xml {
                    message: e.to_string(),
                })?
                .to_string();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    /// Element name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value, treating an empty string as absent.
    pub fn non_empty_attr(&self, key: &str) -> Option<&str> {
        self.attr(key).filter(|value| !value.trim().is_empty())
    }

    /// First direct child named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children named `name`.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Every element named `name` below this one, depth first.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        collect_descendants(self, name, &mut found);
        found
    }

    /// Trimmed text content, `None` when empty.
    pub fn text(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Whether this element is an XInclude directive.
    pub fn is_include(&self) -> bool {
        if self.local_name() != "include" {
            return false;
        }
        match self.name.split_once(':') {
            Some((prefix, _)) => prefix == "xi" || self.declares_namespace(prefix, XINCLUDE_NS),
            None => self.attr("xmlns") == Some(XINCLUDE_NS),
        }
    }

    fn declares_namespace(&self, prefix: &str, uri: &str) -> bool {
        self.attr(&format!("xmlns:{prefix}")) == Some(uri)
    }

    /// Replace every include directive below this element with the root of
    /// the referenced document.
    ///
    /// `href` resolves against `base_dir`; targets must stay inside `root`.
    pub fn resolve_includes(self, base_dir: &Path, root: &Path) -> Result<Self> {
        self.resolve_includes_at(base_dir, root, 0)
    }

    fn resolve_includes_at(mut self, base_dir: &Path, root: &Path, depth: usize) -> Result<Self> {
        let children = std::mem::take(&mut self.children);
        for child in children {
            if child.is_include() {
                let href = child
                    .non_empty_attr("href")
                    .ok_or_else(|| Error::missing_attribute("include", "href"))?;
                if depth >= MAX_INCLUDE_DEPTH {
                    return Err(Error::IncludeDepth {
                        href: href.to_string(),
                    });
                }
                let target = include_target(base_dir, href, root)?;
                let included = Self::parse_file(&target)?;
                let nested_base = target.parent().unwrap_or(base_dir).to_path_buf();
                self.children
                    .push(included.resolve_includes_at(&nested_base, root, depth + 1)?);
            } else {
                self.children
                    .push(child.resolve_includes_at(base_dir, root, depth)?);
            }
        }
        Ok(self)
    }
}

/// Resolve `href` to an existing file under `root`.
///
/// Absolute hrefs, `..` escapes and symlinks leading out of `root` are all
/// rejected.
fn include_target(base_dir: &Path, href: &str, root: &Path) -> Result<PathBuf> {
    let outside = || Error::IncludeOutsideRepository {
        href: href.to_string(),
    };
    if Path::new(href).has_root() || Path::new(href).is_absolute() {
        return Err(outside());
    }
    let target = lexically_normalize(&base_dir.join(href)).ok_or_else(outside)?;
    let root = lexically_normalize(root).ok_or_else(outside)?;
    if !target.starts_with(&root) {
        return Err(outside());
    }
    if !target.is_file() {
        return Err(Error::MissingFile {
            path: href.to_string(),
        });
    }

    let canonical = |path: &Path| {
        NormalizedPath::canonical(path)
            .map(|p| p.to_native())
            .map_err(|_| Error::MissingFile {
                path: href.to_string(),
            })
    };
    if !canonical(&target)?.starts_with(canonical(&root)?) {
        return Err(outside());
    }
    Ok(target)
}

/// Fold `.` and `..` components without touching the filesystem; `None`
/// when `..` climbs above the start of the path.
fn lexically_normalize(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                ) {
                    return None;
                }
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Some(normalized)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::Xml {
            message: format!("unexpected second root element <{}>", element.name),
        });
    }
    *root = Some(element);
    Ok(())
}

fn collect_descendants<'a>(element: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    for child in &element.children {
        if child.name == name {
            found.push(child);
        }
        collect_descendants(child, name, found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_attributes_and_text() {
        let root = Element::parse(
            r#"<?xml version="1.0"?>
<tool id="filter_tool" name="Filter &amp; sort">
    <description>  rows  </description>
    <inputs><param name="input" type="data"/></inputs>
</tool>"#,
        )
        .unwrap();

        assert_eq!(root.name, "tool");
        assert_eq!(root.attr("name"), Some("Filter & sort"));
        assert_eq!(root.child("description").unwrap().text(), Some("rows"));
        let params = root.descendants_named("param");
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].attr("type"), Some("data"));
    }

    #[test]
    fn cdata_becomes_text() {
        let root = Element::parse("<command><![CDATA[echo $a > $b]]></command>").unwrap();
        assert_eq!(root.text(), Some("echo $a > $b"));
    }

    #[test]
    fn mismatched_tags_are_errors() {
        let err = Element::parse("<tool><inputs></tool>").unwrap_err();
        assert!(matches!(err, Error::Xml { .. }));
    }

    #[test]
    fn nesting_limit_is_enforced() {
        let nested = |depth: usize| {
            format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth))
        };
        assert!(Element::parse(&nested(MAX_ELEMENT_DEPTH)).is_ok());

        let err = Element::parse(&nested(100_000)).unwrap_err();
        assert!(err.to_string().contains("nested deeper than 256 levels"));
    }

    #[test]
    fn empty_document_is_error() {
        assert!(Element::parse("   ").is_err());
    }

    #[test]
    fn include_detection_requires_namespace() {
        let prefixed = Element::parse(r#"<xi:include href="a.xml"/>"#).unwrap();
        assert!(prefixed.is_include());

        let declared = Element::parse(
            r#"<x:include xmlns:x="http://www.w3.org/2001/XInclude" href="a.xml"/>"#,
        )
        .unwrap();
        assert!(declared.is_include());

        let plain = Element::parse(r#"<include href="a.xml"/>"#).unwrap();
        assert!(!plain.is_include());
    }

    #[test]
    fn lexical_normalization_folds_dots() {
        assert_eq!(
            lexically_normalize(Path::new("/srv/repo/./conf/../extra.xml")),
            Some(PathBuf::from("/srv/repo/extra.xml"))
        );
        assert_eq!(lexically_normalize(Path::new("repo/../../x.xml")), None);
    }

    #[test]
    fn non_empty_attr_ignores_blank_values() {
        let root = Element::parse(r#"<tool id="" name="x"/>"#).unwrap();
        assert_eq!(root.non_empty_attr("id"), None);
        assert_eq!(root.non_empty_attr("name"), Some("x"));
    }
}
