//! Minimal XML element tree built on `quick-xml` events.
//!
//! The tree keeps every event it does not need to touch in its original,
//! still-escaped form, so a document whose text is never replaced is written
//! back byte for byte. Only text nodes that were replaced are re-escaped.

use quick_xml::events::{BytesCData, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{EmbeddingError, Error, Result};

const FORMAT: &str = "XML";

/// Character data of an element: either a text run or a CDATA section.
#[derive(Debug, Clone)]
struct XmlText {
    content: String,
    cdata: bool,
    /// Original event, dropped once the content is replaced.
    raw: Option<Event<'static>>,
}

impl XmlText {
    fn from_text(text: BytesText<'_>) -> Result<Self> {
        let content = text
            .unescape()
            .map_err(|e| Error::parse(FORMAT, e))?
            .into_owned();
        Ok(Self {
            content,
            cdata: false,
            raw: Some(Event::Text(text.into_owned())),
        })
    }

    fn from_cdata(cdata: BytesCData<'_>) -> Result<Self> {
        let content = std::str::from_utf8(&cdata)
            .map_err(|e| Error::parse(FORMAT, e))?
            .to_string();
        Ok(Self {
            content,
            cdata: true,
            raw: Some(Event::CData(cdata.into_owned())),
        })
    }

    fn replaced(content: String, cdata: bool) -> Self {
        Self {
            content,
            cdata,
            raw: None,
        }
    }

    fn to_event(&self) -> Event<'_> {
        match &self.raw {
            Some(event) => event.clone(),
            None if self.cdata => Event::CData(BytesCData::new(self.content.as_str())),
            None => Event::Text(BytesText::new(&self.content)),
        }
    }
}

#[derive(Debug, Clone)]
enum XmlNode {
    Element(XmlElement),
    Text(XmlText),
    /// Comments, processing instructions and anything else kept verbatim.
    Other(Event<'static>),
}

/// An element with its children in document order.
#[derive(Debug, Clone)]
struct XmlElement {
    start: BytesStart<'static>,
    children: Vec<XmlNode>,
    self_closing: bool,
}

impl XmlElement {
    fn new(start: BytesStart<'_>, self_closing: bool) -> Self {
        Self {
            start: start.into_owned(),
            children: Vec::new(),
            self_closing,
        }
    }

    /// Qualified tag name.
    fn name(&self) -> &[u8] {
        self.start.name().into_inner()
    }

    /// Text and CDATA runs before the first child element. Comments and
    /// processing instructions in between are not part of the text.
    fn leading_text(&self) -> impl Iterator<Item = &XmlText> {
        self.children
            .iter()
            .take_while(|node| !matches!(node, XmlNode::Element(_)))
            .filter_map(|node| match node {
                XmlNode::Text(text) => Some(text),
                _ => None,
            })
    }

    /// The element's own text, joined across its leading runs.
    fn text(&self) -> Option<String> {
        let mut runs = self.leading_text().peekable();
        runs.peek()?;
        Some(runs.map(|run| run.content.as_str()).collect())
    }

    /// Replaces the leading text with `content`, written where the first run
    /// was. Stays CDATA only if every replaced run was CDATA.
    fn set_text(&mut self, content: String) {
        let cdata = self.leading_text().all(|run| run.cdata);
        let end = self
            .children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(_)))
            .unwrap_or(self.children.len());

        let mut first = None;
        let mut index = 0;
        self.children.retain(|node| {
            let keep = match node {
                XmlNode::Text(_) if index < end => {
                    let is_first = first.is_none();
                    if is_first {
                        first = Some(index);
                    }
                    is_first
                }
                _ => true,
            };
            index += 1;
            keep
        });

        if let Some(slot) = first {
            self.children[slot] = XmlNode::Text(XmlText::replaced(content, cdata));
        }
    }
}

/// A parsed XML document: root element plus whatever surrounds it.
#[derive(Debug, Clone)]
pub struct XmlTree {
    prolog: Vec<Event<'static>>,
    root: XmlElement,
    epilog: Vec<Event<'static>>,
}

impl XmlTree {
    /// Parses a complete document. Fails on any malformed input.
    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::parse(FORMAT, format!("{} at position {}", e, reader.buffer_position()))
            })?;

            match event {
                Event::Start(start) => stack.push(XmlElement::new(start, false)),
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::parse(FORMAT, "unexpected closing tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Empty(start) => attach(&mut stack, &mut root, XmlElement::new(start, true))?,
                Event::Text(text) => match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Text(XmlText::from_text(text)?)),
                    None if text.iter().all(u8::is_ascii_whitespace) => {
                        let event = Event::Text(text.into_owned());
                        if root.is_none() {
                            prolog.push(event);
                        } else {
                            epilog.push(event);
                        }
                    }
                    None => return Err(Error::parse(FORMAT, "text outside the root element")),
                },
                Event::CData(cdata) => match stack.last_mut() {
                    Some(parent) => {
                        parent.children.push(XmlNode::Text(XmlText::from_cdata(cdata)?))
                    }
                    None => return Err(Error::parse(FORMAT, "CDATA outside the root element")),
                },
                Event::Eof => break,
                other => match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Other(other.into_owned())),
                    None if root.is_none() => prolog.push(other.into_owned()),
                    None => epilog.push(other.into_owned()),
                },
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::parse(
                FORMAT,
                format!("unclosed element <{}>", String::from_utf8_lossy(open.name())),
            ));
        }

        let root = root.ok_or_else(|| Error::parse(FORMAT, "no root element"))?;
        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    /// Visits the non-blank text of every element named `tag` below the root,
    /// in document order.
    pub fn for_each_text<F>(&self, tag: &str, mut f: F) -> Result<()>
    where
        F: FnMut(&str) -> Result<()>,
    {
        walk(&self.root, tag.as_bytes(), &mut f)
    }

    /// Like [`for_each_text`](Self::for_each_text) but allows replacing the
    /// text. Elements whose text is left as it was are written back unchanged.
    pub fn for_each_text_mut<F>(&mut self, tag: &str, mut f: F) -> Result<()>
    where
        F: FnMut(&mut String) -> Result<()>,
    {
        walk_mut(&mut self.root, tag.as_bytes(), &mut f)
    }

    /// Serializes the tree back to a string.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for event in &self.prolog {
            write(&mut writer, event.clone())?;
        }
        write_element(&mut writer, &self.root)?;
        for event in &self.epilog {
            write(&mut writer, event.clone())?;
        }

        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::Embedding(EmbeddingError::Serialize(e.to_string())))
    }
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None if root.is_some() => return Err(Error::parse(FORMAT, "multiple root elements")),
        None => *root = Some(element),
    }
    Ok(())
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn walk<F>(element: &XmlElement, tag: &[u8], f: &mut F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    for child in &element.children {
        if let XmlNode::Element(el) = child {
            if el.name() == tag {
                if let Some(text) = el.text().filter(|t| !is_blank(t)) {
                    f(&text)?;
                }
            }
            walk(el, tag, f)?;
        }
    }
    Ok(())
}

fn walk_mut<F>(element: &mut XmlElement, tag: &[u8], f: &mut F) -> Result<()>
where
    F: FnMut(&mut String) -> Result<()>,
{
    for child in element.children.iter_mut() {
        if let XmlNode::Element(el) = child {
            if el.name() == tag {
                if let Some(original) = el.text().filter(|t| !is_blank(t)) {
                    let mut text = original.clone();
                    f(&mut text)?;
                    if text != original {
                        el.set_text(text);
                    }
                }
            }
            walk_mut(el, tag, f)?;
        }
    }
    Ok(())
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Embedding(EmbeddingError::Serialize(e.to_string())))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    if element.self_closing {
        return write(writer, Event::Empty(element.start.clone()));
    }

    write(writer, Event::Start(element.start.clone()))?;
    for child in &element.children {
        match child {
            XmlNode::Element(el) => write_element(writer, el)?,
            XmlNode::Text(text) => write(writer, text.to_event())?,
            XmlNode::Other(event) => write(writer, event.clone())?,
        }
    }
    write(writer, Event::End(element.start.to_end()))
}
