use crate::i18n::{Locale, Msg};

#[derive(Debug, Clone, PartialEq)]
enum Status {
    Message(Msg),
    Issues(usize),
    Raw(String),
}

/// Footer status. Stored unresolved so a locale switch re-renders it.
#[derive(Debug, Clone)]
pub struct StatusLine {
    status: Status,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            status: Status::Message(Msg::Ready),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, msg: Msg) {
        self.status = Status::Message(msg);
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.status = Status::Raw(msg.into());
    }

    pub fn ready(&mut self) {
        self.set(Msg::Ready);
    }

    pub fn issues_remaining(&mut self, count: usize) {
        self.status = Status::Issues(count);
    }

    pub fn pending_exit(&mut self) {
        self.set(Msg::PendingExit);
    }

    pub fn message(&self, locale: Locale) -> String {
        match &self.status {
            Status::Message(msg) => locale.text(*msg).to_string(),
            Status::Issues(count) => format!("{count} {}", locale.text(Msg::IssuesRemaining)),
            Status::Raw(text) => text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_the_active_locale() {
        let mut status = StatusLine::new();
        status.issues_remaining(2);
        assert_eq!(status.message(Locale::EnUs), "2 issue(s) remaining");
        assert_eq!(status.message(Locale::ZhCn), "2 项待修正");
        status.ready();
        assert_eq!(status.message(Locale::EnUs), "Ready");
    }
}
