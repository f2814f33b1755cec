//! Mutable XML document tree
//!
//! Worksheets are edited in place, so the whole part is kept in memory.
//! Parsing and writing go through `quick_xml`; everything the tree does not
//! interpret (declaration, comments, processing instructions, doctype) is kept
//! as the original event and written back untouched.
//!
//! Queries work on local names, so `xdr:pic` and `pic` match the same pattern.

use std::borrow::Cow;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::error::{XlsxError, XlsxResult};

/// A node in the tree
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Element with attributes and children
    Element(XmlElement),
    /// Character data (unescaped)
    Text(String),
    /// CDATA section
    CData(String),
    /// Anything else, replayed verbatim
    Raw(Event<'static>),
}

impl XmlNode {
    /// The element, if this node is one
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// The element, mutably, if this node is one
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// An XML element
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlNode>,
    self_closing: bool,
}

impl XmlElement {
    /// Create an empty element with a qualified name (e.g. `"c"` or `"x:c"`)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            self_closing: true,
        }
    }

    /// Builder: add an attribute
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: add a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_child(XmlNode::Text(text.into()));
        self
    }

    /// Qualified name as written in the document
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace prefix
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Namespace prefix, if any
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(p, _)| p)
    }

    /// Build a qualified name that shares this element's prefix
    pub fn sibling_name(&self, local: &str) -> String {
        match self.prefix() {
            Some(p) => format!("{}:{}", p, local),
            None => local.to_string(),
        }
    }

    /// Attributes in document order
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    /// Attribute by qualified name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute by local name, ignoring the prefix (`r:embed` matches `"embed"`).
    /// Namespace declarations never match.
    pub fn attr_local(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .filter(|(k, _)| k != "xmlns" && !k.starts_with("xmlns:"))
            .find(|(k, _)| local_part(k) == local)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing one in place or appending
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// All child nodes
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Child element at node index `index`
    pub fn element_at_mut(&mut self, index: usize) -> Option<&mut XmlElement> {
        self.children.get_mut(index).and_then(XmlNode::as_element_mut)
    }

    /// Insert a node at `index` among all child nodes
    pub fn insert_child(&mut self, index: usize, node: XmlNode) {
        self.self_closing = false;
        self.children.insert(index, node);
    }

    /// Append a node
    pub fn push_child(&mut self, node: XmlNode) {
        self.self_closing = false;
        self.children.push(node);
    }

    /// Replace all children with `nodes`
    pub fn replace_children(&mut self, nodes: Vec<XmlNode>) {
        self.self_closing = self.self_closing && nodes.is_empty();
        self.children = nodes;
    }

    /// Direct child elements
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Direct child elements with a local name
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.local_name() == local)
    }

    /// First direct child element with a local name
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.local_name() == local)
    }

    /// Node index of the first direct child element matching `predicate`
    pub fn find_child<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(&XmlElement) -> bool,
    {
        self.children
            .iter()
            .position(|n| n.as_element().is_some_and(&predicate))
    }

    /// All descendant elements matching `predicate`, in document order
    pub fn descendants_where<P>(&self, predicate: P) -> Vec<&XmlElement>
    where
        P: Fn(&XmlElement) -> bool,
    {
        let mut out = Vec::new();
        self.collect_descendants(&predicate, &mut out);
        out
    }

    fn collect_descendants<'a, P>(&'a self, predicate: &P, out: &mut Vec<&'a XmlElement>)
    where
        P: Fn(&XmlElement) -> bool,
    {
        for child in self.elements() {
            if predicate(child) {
                out.push(child);
            }
            child.collect_descendants(predicate, out);
        }
    }

    /// All descendant elements with a local name, in document order
    pub fn descendants(&self, local: &str) -> Vec<&XmlElement> {
        self.descendants_where(|e| e.local_name() == local)
    }

    /// Descendant combinator query: `select(&["sheetData", "row", "c"])` finds
    /// every `c` below a `row` below a `sheetData`, in document order.
    ///
    /// An empty path selects `self`.
    pub fn select(&self, path: &[&str]) -> Vec<&XmlElement> {
        let Some((first, rest)) = path.split_first() else {
            return vec![self];
        };

        let mut out = Vec::new();
        for el in self.descendants(first) {
            if rest.is_empty() {
                out.push(el);
            } else {
                out.extend(el.select(rest));
            }
        }
        out
    }

    /// First match of [`select`](Self::select)
    pub fn select_first(&self, path: &[&str]) -> Option<&XmlElement> {
        self.select(path).into_iter().next()
    }

    /// Concatenated text of all descendant text and CDATA nodes
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) | XmlNode::CData(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
                XmlNode::Raw(_) => {}
            }
        }
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> XlsxResult<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (k, v) in &self.attrs {
            start.push_attribute(Attribute {
                key: QName(k.as_bytes()),
                value: Cow::Owned(escape(v, true).into_owned().into_bytes()),
            });
        }

        if self.children.is_empty() && self.self_closing {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            write_node(child, writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

/// A parsed XML part
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    nodes: Vec<XmlNode>,
}

impl XmlDocument {
    /// Parse a part. `part` is only used in error messages.
    pub fn parse(part: &str, xml: &str) -> XlsxResult<Self> {
        let mut reader = Reader::from_str(xml);

        let mut top: Vec<XmlNode> = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            let node = match reader.read_event()? {
                Event::Start(e) => {
                    let mut el = element_from_start(&e)?;
                    el.self_closing = false;
                    stack.push(el);
                    continue;
                }
                Event::Empty(e) => XmlNode::Element(element_from_start(&e)?),
                Event::End(_) => match stack.pop() {
                    Some(el) => XmlNode::Element(el),
                    None => {
                        return Err(XlsxError::InvalidXml(format!(
                            "{}: unbalanced end tag",
                            part
                        )))
                    }
                },
                Event::Text(e) => XmlNode::Text(e.unescape()?.into_owned()),
                Event::CData(e) => XmlNode::CData(
                    String::from_utf8(e.into_inner().into_owned())
                        .map_err(|_| XlsxError::NotUtf8(part.to_string()))?,
                ),
                Event::Eof => break,
                other => XmlNode::Raw(other.into_owned()),
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => top.push(node),
            }
        }

        if !stack.is_empty() {
            return Err(XlsxError::InvalidXml(format!(
                "{}: unclosed element <{}>",
                part,
                stack.last().map(|e| e.name.as_str()).unwrap_or_default()
            )));
        }

        let doc = Self { nodes: top };
        if doc.root().is_none() {
            return Err(XlsxError::InvalidXml(format!("{}: no root element", part)));
        }
        Ok(doc)
    }

    /// The document element
    pub fn root(&self) -> Option<&XmlElement> {
        self.nodes.iter().find_map(XmlNode::as_element)
    }

    /// The document element, mutably
    pub fn root_mut(&mut self) -> Option<&mut XmlElement> {
        self.nodes.iter_mut().find_map(XmlNode::as_element_mut)
    }

    /// Serialize back to a UTF-8 string
    pub fn to_xml_string(&self) -> XlsxResult<String> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            write_node(node, &mut writer)?;
        }
        String::from_utf8(writer.into_inner()).map_err(|_| XlsxError::NotUtf8("<output>".into()))
    }
}

fn write_node<W: std::io::Write>(node: &XmlNode, writer: &mut Writer<W>) -> XlsxResult<()> {
    match node {
        XmlNode::Element(e) => e.write(writer)?,
        XmlNode::Text(t) => {
            writer.write_event(Event::Text(BytesText::from_escaped(escape(t, false))))?
        }
        XmlNode::CData(t) => writer.write_event(Event::CData(BytesCData::new(t.as_str())))?,
        XmlNode::Raw(ev) => writer.write_event(ev)?,
    }
    Ok(())
}

fn element_from_start(e: &BytesStart<'_>) -> XlsxResult<XmlElement> {
    let mut el = XmlElement::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        el.attrs.push((key, value));
    }
    Ok(el)
}

/// Escape markup characters, and whitespace a parser would normalize.
///
/// Quotes stay literal in character data. Attribute values are always written
/// double-quoted, and keep tabs and line breaks as character references.
fn escape(value: &str, in_attr: bool) -> Cow<'_, str> {
    let special = |c: char| match c {
        '&' | '<' | '>' | '\r' => true,
        '"' | '\t' | '\n' => in_attr,
        _ => false,
    };
    if !value.contains(special) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            '"' if in_attr => out.push_str("&quot;"),
            '\t' if in_attr => out.push_str("&#9;"),
            '\n' if in_attr => out.push_str("&#10;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, l)| l).unwrap_or(name)
}
