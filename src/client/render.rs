//! HTML rendering for chat messages.
//!
//! Assistant replies are markdown and go through a sanitizer before they are
//! shown as markup. User and error text is escaped and shown literally.
//! [`render_terminal`] is the same markdown pass for the terminal: styles
//! become ANSI attributes and raw HTML is dropped.

use crossterm::style::{Attribute, Color, ContentStyle, StyledContent};
use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

use super::message::{Message, Role};

/// Markdown to sanitized HTML. Single newlines become `<br>`.
fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, markdown_options()).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut raw = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut raw, parser);
    ammonia::clean(&raw)
}

/// Literal, pre-wrapped text.
pub fn render_plain(text: &str) -> String {
    format!(
        "<p style=\"white-space: pre-wrap\">{}</p>",
        tera::escape_html(text)
    )
}

/// Markdown to styled terminal text.
pub fn render_terminal(text: &str) -> String {
    let mut writer = TerminalWriter::default();
    for event in Parser::new_ext(text, markdown_options()) {
        writer.event(event);
    }
    writer.out.trim_end().to_string()
}

#[derive(Default)]
struct TerminalWriter {
    out: String,
    bold: usize,
    italic: usize,
    strike: usize,
    code_block: bool,
    // inside a raw <script> or <style> element
    hidden: bool,
    lists: Vec<Option<u64>>,
    links: Vec<String>,
}

impl TerminalWriter {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Strong) | Event::Start(Tag::Heading { .. }) => self.bold += 1,
            Event::End(TagEnd::Strong) => self.bold = self.bold.saturating_sub(1),
            Event::End(TagEnd::Heading(_)) => {
                self.bold = self.bold.saturating_sub(1);
                self.out.push_str("\n\n");
            }
            Event::Start(Tag::Emphasis) => self.italic += 1,
            Event::End(TagEnd::Emphasis) => self.italic = self.italic.saturating_sub(1),
            Event::Start(Tag::Strikethrough) => self.strike += 1,
            Event::End(TagEnd::Strikethrough) => self.strike = self.strike.saturating_sub(1),
            Event::Start(Tag::List(start)) => {
                if !self.lists.is_empty() && !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
                self.lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.out.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                match self.lists.last_mut() {
                    Some(Some(n)) => {
                        self.out.push_str(&format!("{indent}{n}. "));
                        *n += 1;
                    }
                    _ => self.out.push_str(&format!("{indent}- ")),
                }
            }
            Event::End(TagEnd::Item) => {
                if !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
            }
            Event::End(TagEnd::Paragraph) => {
                self.out.push_str(if self.lists.is_empty() { "\n\n" } else { "\n" });
            }
            Event::Start(Tag::CodeBlock(_)) => self.code_block = true,
            Event::End(TagEnd::CodeBlock) => {
                self.code_block = false;
                self.out.push('\n');
            }
            Event::Start(Tag::Link { dest_url, .. }) => self.links.push(dest_url.to_string()),
            Event::End(TagEnd::Link) => {
                if let Some(url) = self.links.pop() {
                    self.out.push_str(&format!(" ({url})"));
                }
            }
            Event::Text(_) if self.hidden => {}
            Event::Text(text) if self.code_block => {
                for line in text.lines() {
                    self.out.push_str("    ");
                    self.push_code(line);
                    self.out.push('\n');
                }
            }
            Event::Text(text) => self.push_styled(&text),
            Event::Code(code) => self.push_code(&code),
            Event::SoftBreak | Event::HardBreak => self.out.push('\n'),
            Event::Rule => self.out.push_str("---\n\n"),
            Event::TaskListMarker(done) => self.out.push_str(if done { "[x] " } else { "[ ] " }),
            Event::Html(raw) | Event::InlineHtml(raw) => self.skip_html(&raw),
            _ => {}
        }
    }

    fn skip_html(&mut self, raw: &str) {
        let raw = raw.to_ascii_lowercase();
        if raw.contains("<script") || raw.contains("<style") {
            self.hidden = true;
        }
        if raw.contains("</script") || raw.contains("</style") {
            self.hidden = false;
        }
    }

    fn push_styled(&mut self, text: &str) {
        let mut style = ContentStyle::new();
        if self.bold > 0 {
            style.attributes.set(Attribute::Bold);
        }
        if self.italic > 0 {
            style.attributes.set(Attribute::Italic);
        }
        if self.strike > 0 {
            style.attributes.set(Attribute::CrossedOut);
        }
        self.out.push_str(&StyledContent::new(style, text).to_string());
    }

    fn push_code(&mut self, code: &str) {
        let mut style = ContentStyle::new();
        style.foreground_color = Some(Color::Cyan);
        self.out.push_str(&StyledContent::new(style, code).to_string());
    }
}

pub fn render_message(message: &Message) -> String {
    match message.role() {
        Role::Assistant => render_markdown(message.text()),
        Role::User | Role::Error => render_plain(message.text()),
    }
}
