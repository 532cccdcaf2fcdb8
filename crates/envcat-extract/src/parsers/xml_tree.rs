//! Minimal namespace-agnostic element tree over quick-xml events, with
//! ElementTree-style path selection (`//` = any depth, `/` = child).

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    /// Local name, namespace prefix stripped.
    pub name: String,
    /// Attributes keyed by local name.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    text: String,
}

#[derive(Debug, Clone, Copy)]
enum Step<'p> {
    Child(&'p str),
    Descendant(&'p str),
}

impl XmlElement {
    /// Parse a document and return its root element.
    pub fn parse(raw: &[u8]) -> Result<XmlElement, String> {
        let mut reader = Reader::from_reader(raw);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut buf = Vec::new();

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| format!("XML error at byte {}: {e}", reader.error_position()))?;
            match event {
                Event::Start(start) => stack.push(Self::open(&start)?),
                Event::Empty(start) => {
                    let element = Self::open(&start)?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let value = text.unescape().map_err(|e| e.to_string())?;
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&value);
                    }
                }
                Event::CData(data) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| "unbalanced closing tag".to_string())?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(format!("{} unclosed element(s) at end of document", stack.len()));
        }
        root.ok_or_else(|| "document has no root element".to_string())
    }

    fn open(start: &BytesStart<'_>) -> Result<XmlElement, String> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| e.to_string())?.into_owned();
            attributes.push((key, value));
        }
        Ok(XmlElement {
            name,
            attributes,
            ..Default::default()
        })
    }

    fn attach(
        stack: &mut [XmlElement],
        root: &mut Option<XmlElement>,
        element: XmlElement,
    ) -> Result<(), String> {
        match stack.last_mut() {
            Some(parent) => {
                parent.children.push(element);
                Ok(())
            }
            None if root.is_none() => {
                *root = Some(element);
                Ok(())
            }
            None => Err("multiple root elements".to_string()),
        }
    }

    /// Trimmed text content, `None` if blank.
    pub fn text(&self) -> Option<&str> {
        let t = self.text.trim();
        (!t.is_empty()).then_some(t)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All elements matching `path`, in document order.
    ///
    /// `//a/b` selects every `b` that is a child of an `a` at any depth.
    pub fn select_all<'a>(&'a self, path: &str) -> Vec<&'a XmlElement> {
        let steps = Self::compile(path);
        let mut current: Vec<&XmlElement> = vec![self];
        for step in steps {
            let mut next = Vec::new();
            for node in current {
                match step {
                    Step::Child(name) => {
                        next.extend(node.children.iter().filter(|c| c.name == name));
                    }
                    Step::Descendant(name) => node.collect_descendants(name, &mut next),
                }
            }
            dedup_by_address(&mut next);
            current = next;
        }
        current
    }

    /// First element matching `path`.
    pub fn select(&self, path: &str) -> Option<&XmlElement> {
        self.select_all(path).into_iter().next()
    }

    /// Text of the first element matching `path`.
    pub fn select_text(&self, path: &str) -> Option<&str> {
        self.select(path).and_then(XmlElement::text)
    }

    fn collect_descendants<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlElement>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.collect_descendants(name, out);
        }
    }

    fn compile(path: &str) -> Vec<Step<'_>> {
        let mut steps = Vec::new();
        let mut rest = path;
        while !rest.is_empty() {
            let (descendant, tail) = if let Some(t) = rest.strip_prefix("//") {
                (true, t)
            } else if let Some(t) = rest.strip_prefix('/') {
                (false, t)
            } else {
                (false, rest)
            };
            let end = tail.find('/').unwrap_or(tail.len());
            let name = &tail[..end];
            if !name.is_empty() {
                steps.push(if descendant {
                    Step::Descendant(name)
                } else {
                    Step::Child(name)
                });
            }
            rest = &tail[end..];
        }
        steps
    }
}

fn dedup_by_address(nodes: &mut Vec<&XmlElement>) {
    let mut seen = std::collections::HashSet::new();
    nodes.retain(|n| seen.insert(*n as *const XmlElement));
}
