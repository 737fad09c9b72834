use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use super::message::{Message, Role};
use super::render::{render_message, render_terminal};
use super::session::ChatSession;

const TEMPLATE_NAME: &str = "chat.html";
const TITLE: &str = "Gemini Chat";

#[derive(Serialize)]
struct RenderedMessage {
    role: Role,
    html: String,
}

/// Renders a session as a standalone HTML page.
pub struct ChatView {
    tera: Tera,
}

impl ChatView {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, include_str!("../../templates/chat.html"))?;
        tera.autoescape_on(vec![".html"]);
        Ok(Self { tera })
    }

    pub fn render_html(&self, session: &ChatSession) -> Result<String> {
        let messages: Vec<RenderedMessage> = session
            .messages()
            .iter()
            .map(|message| RenderedMessage {
                role: message.role(),
                html: render_message(message),
            })
            .collect();

        let mut context = Context::new();
        context.insert("title", TITLE);
        context.insert("messages", &messages);
        context.insert("input", session.input());
        context.insert("loading", &session.is_loading());
        context.insert("send_label", if session.is_loading() { "Sending..." } else { "Send" });

        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}

/// Terminal rendering. Remembers how many messages it has printed so each call
/// emits only what was appended since, keeping the newest turn at the bottom.
/// Assistant markdown is rendered; user and error text is printed as typed.
#[derive(Debug, Default)]
pub struct Transcript {
    printed: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&mut self, session: &ChatSession) -> Vec<String> {
        let lines = session
            .messages()
            .get(self.printed..)
            .unwrap_or_default()
            .iter()
            .map(format_line)
            .collect();
        self.printed = session.messages().len();
        lines
    }
}

fn format_line(message: &Message) -> String {
    match message.role() {
        Role::User => format!("you > {}", message.text()),
        Role::Assistant => format!("gemini > {}", render_terminal(message.text())),
        Role::Error => format!("error > {}", message.text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn loading_view_disables_send() {
        let view = ChatView::new().unwrap();
        let mut session = ChatSession::new();
        session.set_input("Hello");
        session.begin_submit();

        let html = view.render_html(&session).unwrap();
        assert!(html.contains("<button disabled>Sending...</button>"), "{}", html);
        assert!(html.contains("class=\"loading\""));
        assert!(html.contains("<div class=\"message user\">"));
    }

    #[test]
    fn idle_view_has_enabled_send_and_no_indicator() {
        let view = ChatView::new().unwrap();
        let mut session = ChatSession::new();
        session.set_input("Hello");
        session.begin_submit();
        session.finish_submit(Ok("**Hi** there".to_string()));

        let html = view.render_html(&session).unwrap();
        assert!(html.contains("<button>Send</button>"));
        assert!(!html.contains("class=\"loading\""));
        assert!(html.contains("<strong>Hi</strong> there"));
    }

    #[test]
    fn assistant_script_never_reaches_the_page() {
        let view = ChatView::new().unwrap();
        let mut session = ChatSession::new();
        session.set_input("x");
        session.begin_submit();
        session.finish_submit(Ok("<script>alert(1)</script>**ok**".to_string()));

        let html = view.render_html(&session).unwrap();
        assert!(!html.contains("alert(1)"));
        assert!(html.contains("<strong>ok</strong>"));
    }

    #[test]
    fn pending_input_is_escaped() {
        let view = ChatView::new().unwrap();
        let mut session = ChatSession::new();
        session.set_input("<b>draft</b>");

        let html = view.render_html(&session).unwrap();
        assert!(html.contains("&lt;b&gt;draft&lt;&#x2F;b&gt;"), "{}", html);
    }

    #[test]
    fn transcript_prints_only_new_messages() {
        let mut transcript = Transcript::new();
        let mut session = ChatSession::new();
        assert!(transcript.pending(&session).is_empty());

        session.set_input("Hello");
        session.begin_submit();
        assert_eq!(transcript.pending(&session), vec!["you > Hello"]);

        session.finish_submit(Ok("Hi there".to_string()));
        assert_eq!(transcript.pending(&session), vec!["gemini > Hi there"]);
        assert!(transcript.pending(&session).is_empty());
    }

    #[test]
    fn transcript_renders_assistant_markdown() {
        let mut transcript = Transcript::new();
        let mut session = ChatSession::new();
        session.set_input("**literal**");
        session.begin_submit();
        session.finish_submit(Ok("**Hi** there <script>alert(1)</script>".to_string()));

        let lines = transcript.pending(&session);
        assert_eq!(lines[0], "you > **literal**");
        assert_eq!(
            lines[1],
            format!("gemini > {}", render_terminal("**Hi** there <script>alert(1)</script>"))
        );
        assert!(!lines[1].contains("**"));
        assert!(!lines[1].contains("alert"));
    }

    #[test]
    fn transcript_survives_a_shorter_session() {
        let mut transcript = Transcript::new();
        let mut long = ChatSession::new();
        long.set_input("Hello");
        long.begin_submit();
        long.finish_submit(Ok("Hi".to_string()));
        assert_eq!(transcript.pending(&long).len(), 2);

        let mut short = ChatSession::new();
        short.set_input("again");
        short.begin_submit();
        assert!(transcript.pending(&short).is_empty());
    }
}
