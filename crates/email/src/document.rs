use storefront_markup::{Element, Node};

const BODY_STYLE: &str = "margin:0;padding:0;background-color:#ffffff;\
font-family:ui-sans-serif,system-ui,-apple-system,'Segoe UI',Roboto,Helvetica,Arial,sans-serif;";

const PREVIEW_STYLE: &str = "display:none;overflow:hidden;line-height:1px;opacity:0;\
max-height:0;max-width:0;";

/// A rendered email: inbox preview line plus the body tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub preview: String,
    pub body: Node,
}

impl Document {
    /// Full HTML document, ready to hand to a mail transport.
    pub fn to_html(&self) -> String {
        let root: Node = Element::new("html")
            .attr("lang", "en")
            .attr("dir", "ltr")
            .child(
                Element::new("head")
                    .child(
                        Element::new("meta")
                            .attr("http-equiv", "Content-Type")
                            .attr("content", "text/html; charset=UTF-8"),
                    )
                    .child(
                        Element::new("meta")
                            .attr("name", "viewport")
                            .attr("content", "width=device-width, initial-scale=1"),
                    ),
            )
            .child(
                Element::new("body")
                    .style(BODY_STYLE)
                    .child(Element::new("div").style(PREVIEW_STYLE).text(self.preview.clone()))
                    .child(self.body.clone()),
            )
            .into();

        let mut out = String::from("<!DOCTYPE html>");
        root.write_html(&mut out);
        out
    }

    /// Plain-text alternative body.
    pub fn plain_text(&self) -> String {
        self.body.to_plain_text()
    }
}
