use once_cell::sync::Lazy;
use regex::Regex;
use ego_tree::NodeRef;
use scraper::{Html, Node};

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Convert a legacy HTML fragment to Markdown.
///
/// Covers the tags the legacy editor produced: headings, paragraphs,
/// emphasis, links, images, lists, blockquotes, code and rules. `<cite>`
/// elements are kept as inline HTML because the target rich text fields
/// render them for attribution lines.
pub fn html_to_markdown(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let rendered = render_children(fragment.tree.root());
    EXCESS_NEWLINES.replace_all(&rendered, "\n\n").trim().to_string()
}

/// Strip all markup and return the concatenated text content.
pub fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    collect_text(fragment.tree.root()).trim().to_string()
}

fn collect_text(node: NodeRef<Node>) -> String {
    match node.value() {
        Node::Text(text) => text.text.to_string(),
        _ => node.children().map(collect_text).collect(),
    }
}

fn render_children(node: NodeRef<Node>) -> String {
    node.children().map(render_node).collect()
}

fn render_node(node: NodeRef<Node>) -> String {
    match node.value() {
        Node::Text(text) => collapse_whitespace(&text.text),
        Node::Element(element) => render_element(element.name(), node),
        _ => String::new(),
    }
}

fn render_element(name: &str, node: NodeRef<Node>) -> String {
    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = name[1..].parse::<usize>().unwrap_or(1);
            let inner = render_children(node);
            format!("\n\n{} {}\n\n", "#".repeat(level), inner.trim())
        }
        "p" | "div" | "section" | "article" => {
            format!("\n\n{}\n\n", render_children(node).trim())
        }
        "strong" | "b" => wrap_inline(render_children(node), "**"),
        "em" | "i" => wrap_inline(render_children(node), "_"),
        "a" => {
            let inner = render_children(node);
            match element_attr(node, "href") {
                Some(href) if !href.is_empty() => format!("[{}]({})", inner, href),
                _ => inner,
            }
        }
        "img" => {
            let alt = element_attr(node, "alt").unwrap_or_default();
            match element_attr(node, "src") {
                Some(src) if !src.is_empty() => format!("![{}]({})", alt, src),
                _ => String::new(),
            }
        }
        "ul" => render_list(node, None),
        "ol" => render_list(node, Some(1)),
        "li" => format!("\n{}\n", render_children(node).trim()),
        "blockquote" => {
            let inner = render_children(node);
            let quoted: Vec<String> = inner
                .trim()
                .lines()
                .map(|line| format!("> {}", line).trim_end().to_string())
                .collect();
            format!("\n\n{}\n\n", quoted.join("\n"))
        }
        "pre" => {
            let code = collect_text(node);
            format!("\n\n```\n{}\n```\n\n", code.trim_matches('\n'))
        }
        "code" => format!("`{}`", collect_text(node)),
        "br" => "\n".to_string(),
        "hr" => "\n\n---\n\n".to_string(),
        // Kept verbatim for attribution rendering downstream.
        "cite" => format!("<cite>{}</cite>", render_children(node)),
        _ => render_children(node),
    }
}

fn render_list(node: NodeRef<Node>, start: Option<usize>) -> String {
    let mut items = Vec::new();
    let mut index = start.unwrap_or(0);
    for child in node.children() {
        if let Node::Element(element) = child.value() {
            if element.name() == "li" {
                let item = render_children(child).trim().to_string();
                match start {
                    Some(_) => {
                        items.push(format!("{}. {}", index, item));
                        index += 1;
                    }
                    None => items.push(format!("- {}", item)),
                }
            }
        }
    }
    format!("\n\n{}\n\n", items.join("\n"))
}

fn wrap_inline(inner: String, marker: &str) -> String {
    if inner.trim().is_empty() {
        inner
    } else {
        format!("{}{}{}", marker, inner.trim(), marker)
    }
}

fn element_attr(node: NodeRef<Node>, attr: &str) -> Option<String> {
    match node.value() {
        Node::Element(element) => element.attr(attr).map(|v| v.to_string()),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_and_headings() {
        let html = "<h2>Title</h2><p>First paragraph.</p><p>Second.</p>";
        assert_eq!(
            html_to_markdown(html),
            "## Title\n\nFirst paragraph.\n\nSecond."
        );
    }

    #[test]
    fn test_inline_markup() {
        let html = "<p>A <strong>bold</strong> and <em>subtle</em> statement</p>";
        assert_eq!(html_to_markdown(html), "A **bold** and _subtle_ statement");
    }

    #[test]
    fn test_links_and_images() {
        assert_eq!(
            html_to_markdown(r#"<a href="https://example.org">site</a>"#),
            "[site](https://example.org)"
        );
        assert_eq!(
            html_to_markdown(r#"<img src="https://example.org/i.jpg" alt="photo">"#),
            "![photo](https://example.org/i.jpg)"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            html_to_markdown("<ul><li>one</li><li>two</li></ul>"),
            "- one\n- two"
        );
        assert_eq!(
            html_to_markdown("<ol><li>one</li><li>two</li></ol>"),
            "1. one\n2. two"
        );
    }

    #[test]
    fn test_cite_is_preserved() {
        let html = "<p>Image from <cite>Rijksmuseum</cite></p>";
        assert_eq!(html_to_markdown(html), "Image from <cite>Rijksmuseum</cite>");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            html_to_markdown("<blockquote><p>wise words</p></blockquote>"),
            "> wise words"
        );
    }

    #[test]
    fn test_plain_text_strips_markup() {
        assert_eq!(
            plain_text("<p>Hello <b>world</b>, <a href=\"#\">link</a></p>"),
            "Hello world, link"
        );
        assert_eq!(plain_text("no markup at all"), "no markup at all");
    }
}
