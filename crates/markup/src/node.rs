use crate::escape::{escape_attr, escape_text};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements rendered on their own line(s) in the plain-text form.
const BLOCK_ELEMENTS: &[&str] = &[
    "article", "body", "br", "div", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "html", "li", "main", "nav", "ol", "p", "section", "table", "td", "tr", "ul",
];

/// A node of a static markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Siblings without a wrapping element.
    Fragment(Vec<Node>),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn style(self, value: impl Into<String>) -> Self {
        self.attr("style", value)
    }

    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(Node::Text(value.into()))
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag)
    }

    fn is_block(&self) -> bool {
        BLOCK_ELEMENTS.contains(&self.tag)
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_attr(value, out);
            out.push('"');
        }
        out.push('>');

        if self.is_void() {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }

        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }

    fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    fn write_text(&self, out: &mut String) {
        match self.tag {
            "head" | "script" | "style" | "template" => return,
            "img" => {
                if let Some(alt) = self.attr_value("alt") {
                    out.push('\n');
                    out.push_str(alt);
                    out.push('\n');
                }
                return;
            }
            _ => {}
        }

        let block = self.is_block();
        if block {
            out.push('\n');
        }

        for child in &self.children {
            child.write_text(out);
        }

        if self.tag == "a" {
            if let Some(href) = self.attr_value("href") {
                out.push_str(" (");
                out.push_str(href);
                out.push(')');
            }
        }

        if block {
            out.push('\n');
        }
    }
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn fragment<I>(nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        Self::Fragment(nodes.into_iter().map(Into::into).collect())
    }

    /// Serialize as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write_html(out),
            Node::Text(text) => escape_text(text, out),
            Node::Fragment(nodes) => {
                for node in nodes {
                    node.write_html(out);
                }
            }
        }
    }

    /// Readable plain-text rendering: one line per block, links as
    /// `label (href)`, scripts and styles dropped.
    pub fn to_plain_text(&self) -> String {
        let mut raw = String::new();
        self.write_text(&mut raw);

        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write_text(out),
            Node::Text(text) => out.push_str(text),
            Node::Fragment(nodes) => {
                for node in nodes {
                    node.write_text(out);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_elements_with_attributes_in_order() {
        let node: Node = Element::new("div")
            .class("card")
            .attr("data-id", "7")
            .child(Element::new("h2").text("Title"))
            .into();

        assert_eq!(
            node.to_html(),
            r#"<div class="card" data-id="7"><h2>Title</h2></div>"#
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let node: Node = Element::new("img").attr("src", "/a.png").attr("alt", "A").into();
        assert_eq!(node.to_html(), r#"<img src="/a.png" alt="A">"#);
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let node: Node = Element::new("p")
            .attr("title", "\"quoted\"")
            .text("<script>alert(1)</script>")
            .into();

        assert_eq!(
            node.to_html(),
            r#"<p title="&quot;quoted&quot;">&lt;script&gt;alert(1)&lt;/script&gt;</p>"#
        );
    }

    #[test]
    fn fragments_render_siblings_without_wrapper() {
        let node = Node::fragment([Element::new("br"), Element::new("hr")]);
        assert_eq!(node.to_html(), "<br><hr>");
    }

    #[test]
    fn plain_text_puts_blocks_on_lines_and_expands_links() {
        let node: Node = Element::new("div")
            .child(Element::new("h1").text("Receipt"))
            .child(
                Element::new("p")
                    .text("Get it ")
                    .child(Element::new("a").attr("href", "https://x.test/d").text("here")),
            )
            .child(Element::new("style").text("p { color: red }"))
            .into();

        assert_eq!(node.to_plain_text(), "Receipt\nGet it here (https://x.test/d)");
    }
}
