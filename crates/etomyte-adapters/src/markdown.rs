//! Markdown to HTML conversion for `.md` fragments.

use pulldown_cmark::{Options, Parser, html};

/// File extension marking a fragment as Markdown.
pub const MARKDOWN_EXTENSION: &str = ".md";

pub fn is_markdown(extension: &str) -> bool {
    extension.eq_ignore_ascii_case(MARKDOWN_EXTENSION)
}

/// Convert CommonMark (plus tables and strikethrough) to HTML.
pub fn to_html(source: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
