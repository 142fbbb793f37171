//! Typed document tree used by the extractors.
//!
//! Extractors are written against [`DocNode`] only. [`HtmlNode`] backs it
//! with a parsed `scraper` document; [`MemElement`] is an owned tree that
//! tests build by hand.
use scraper::{ElementRef, Html};

/// Attribute filter for [`DocNode::find_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr<'a> {
    Any,
    /// Matches when the element carries this class token.
    Class(&'a str),
    Id(&'a str),
}

/// Read-only view of one element in a document tree.
pub trait DocNode: Copy {
    fn tag(&self) -> &str;

    fn has_class(&self, class: &str) -> bool;

    fn id(&self) -> Option<&str>;

    /// Element children in document order. Text nodes are skipped.
    fn children(&self) -> Vec<Self>;

    /// Concatenated text of every descendant text node.
    fn text(&self) -> String;

    /// Text of each direct child node (text or element), whitespace-only
    /// nodes dropped.
    fn contents(&self) -> Vec<String>;

    fn matches(&self, tag: &str, attr: Attr<'_>) -> bool {
        if self.tag() != tag {
            return false;
        }
        match attr {
            Attr::Any => true,
            Attr::Class(class) => self.has_class(class),
            Attr::Id(id) => self.id() == Some(id),
        }
    }

    /// All matching descendants in document order, excluding `self`.
    fn find_all(&self, tag: &str, attr: Attr<'_>) -> Vec<Self> {
        let mut found = Vec::new();
        collect_matches(*self, tag, attr, &mut found);
        found
    }

    /// First matching descendant in document order.
    fn find(&self, tag: &str, attr: Attr<'_>) -> Option<Self> {
        self.children().into_iter().find_map(|child| {
            if child.matches(tag, attr) {
                Some(child)
            } else {
                child.find(tag, attr)
            }
        })
    }

    fn first_child(&self) -> Option<Self> {
        self.children().into_iter().next()
    }

    fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }
}

fn collect_matches<N: DocNode>(node: N, tag: &str, attr: Attr<'_>, out: &mut Vec<N>) {
    for child in node.children() {
        if child.matches(tag, attr) {
            out.push(child);
        }
        collect_matches(child, tag, attr, out);
    }
}

fn keep_content(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

// ── HTML backend ─────────────────────────────────────────────────────

/// A parsed HTML page.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parse markup leniently; malformed input still yields a tree.
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// The `<body>` element, or the root element if the parser produced none.
    #[must_use]
    pub fn body(&self) -> HtmlNode<'_> {
        let root = HtmlNode(self.html.root_element());
        root.find("body", Attr::Any).unwrap_or(root)
    }
}

/// An element of an [`HtmlDocument`].
#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a>(ElementRef<'a>);

impl<'a> DocNode for HtmlNode<'a> {
    fn tag(&self) -> &str {
        self.0.value().name()
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.value().classes().any(|c| c == class)
    }

    fn id(&self) -> Option<&str> {
        self.0.value().id()
    }

    fn children(&self) -> Vec<Self> {
        self.0
            .children()
            .filter_map(ElementRef::wrap)
            .map(HtmlNode)
            .collect()
    }

    fn text(&self) -> String {
        self.0.text().collect()
    }

    fn contents(&self) -> Vec<String> {
        self.0
            .children()
            .filter_map(|node| {
                if let Some(text) = node.value().as_text() {
                    let text: &str = text;
                    keep_content(text)
                } else {
                    ElementRef::wrap(node)
                        .and_then(|el| keep_content(&el.text().collect::<String>()))
                }
            })
            .collect()
    }
}

// ── In-memory backend ────────────────────────────────────────────────

/// A child of a [`MemElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemChild {
    Element(MemElement),
    Text(String),
}

/// Hand-built element tree. `&MemElement` implements [`DocNode`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemElement {
    pub tag: String,
    pub classes: Vec<String>,
    pub id: Option<String>,
    pub children: Vec<MemChild>,
}

impl MemElement {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(MemChild::Text(text.to_string()));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: MemElement) -> Self {
        self.children.push(MemChild::Element(child));
        self
    }
}

fn mem_text(element: &MemElement, out: &mut String) {
    for child in &element.children {
        match child {
            MemChild::Text(t) => out.push_str(t),
            MemChild::Element(e) => mem_text(e, out),
        }
    }
}

impl<'a> DocNode for &'a MemElement {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn children(&self) -> Vec<Self> {
        let element: &'a MemElement = *self;
        element
            .children
            .iter()
            .filter_map(|child| match child {
                MemChild::Element(e) => Some(e),
                MemChild::Text(_) => None,
            })
            .collect()
    }

    fn text(&self) -> String {
        let mut out = String::new();
        mem_text(self, &mut out);
        out
    }

    fn contents(&self) -> Vec<String> {
        self.children
            .iter()
            .filter_map(|child| match child {
                MemChild::Text(t) => keep_content(t),
                MemChild::Element(e) => keep_content(&DocNode::text(&e)),
            })
            .collect()
    }
}
