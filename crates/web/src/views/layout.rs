//! Document shell shared by every storefront page.
//!
//! Streamed pages write [`open`] first and [`close`] last, with their
//! sections in between; non-streamed pages use [`page`].

use storefront_markup::{Element, Node, escape_text};

const STYLES: &str = "\
*{box-sizing:border-box}\
body{margin:0;font-family:ui-sans-serif,system-ui,sans-serif;color:#0f172a}\
nav{display:flex;justify-content:center;gap:1rem;padding:1rem;background:#0f172a}\
nav a{color:#f8fafc;text-decoration:none}\
main{max-width:72rem;margin:0 auto;padding:1.5rem}\
.product-section{margin-bottom:3rem}\
.section-header{display:flex;gap:1rem;align-items:baseline}\
.product-grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(18rem,1fr));gap:1rem}\
.card{display:flex;flex-direction:column;border:1px solid #e2e8f0;border-radius:.5rem;overflow:hidden}\
.card-image{aspect-ratio:16/9;background:#e2e8f0}\
.card-image img{width:100%;height:100%;object-fit:cover}\
.card-body{padding:1rem;flex-grow:1}\
.card-footer{padding:1rem}\
.button{display:block;text-align:center;padding:.5rem;border-radius:.375rem;background:#0f172a;color:#f8fafc;text-decoration:none}\
.product-card-skeleton .line{height:1rem;margin:.5rem 0;border-radius:.25rem;background:#e2e8f0}\
.animate-pulse{animation:pulse 2s cubic-bezier(.4,0,.6,1) infinite}\
@keyframes pulse{50%{opacity:.5}}\
.section-error{color:#b91c1c}";

/// Replaces the children of `#{id}` with the content of `template#{id}-content`.
const SWAP_SCRIPT: &str = "function $swap(id){\
var slot=document.getElementById(id),tpl=document.getElementById(id+'-content');\
if(slot&&tpl){slot.replaceChildren(tpl.content.cloneNode(true));tpl.remove();}}";

fn nav() -> Node {
    Element::new("nav")
        .child(Element::new("a").attr("href", "/").text("Home"))
        .child(Element::new("a").attr("href", "/products").text("Products"))
        .into()
}

/// Everything up to and including the opening `<main>` tag.
pub fn open(title: &str) -> String {
    let mut out = String::from(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>",
    );
    escape_text(title, &mut out);
    out.push_str("</title><style>");
    out.push_str(STYLES);
    out.push_str("</style><script>");
    out.push_str(SWAP_SCRIPT);
    out.push_str("</script></head><body>");
    nav().write_html(&mut out);
    out.push_str("<main>");
    out
}

/// Closes what [`open`] opened.
pub fn close() -> String {
    "</main></body></html>".to_string()
}

/// A complete page around `content`.
pub fn page(title: &str, content: impl Into<Node>) -> String {
    let mut out = open(title);
    content.into().write_html(&mut out);
    out.push_str(&close());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_wraps_content_in_shell() {
        let html = page("Shop & Co", Element::new("p").text("hello"));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Shop &amp; Co</title>"));
        assert!(html.contains(r#"<a href="/products">Products</a>"#));
        assert!(html.contains("<main><p>hello</p></main>"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn open_leaves_main_unclosed() {
        let html = open("Storefront");

        assert!(html.ends_with("<main>"));
        assert!(html.contains("function $swap(id)"));
        assert!(!html.contains("</body>"));
    }
}
