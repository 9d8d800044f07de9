use std::fmt;

/// One piece of a rendered assistant message. Links carry their URL
/// explicitly so the UI never has to re-parse generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Link { label: String, url: String },
}

/// An assistant message as an ordered sequence of line segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedMessage {
    segments: Vec<Segment>,
}

impl RenderedMessage {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.segments.push(Segment::Text(text.into()));
    }

    pub fn push_link(&mut self, label: impl Into<String>, url: impl Into<String>) {
        self.segments.push(Segment::Link {
            label: label.into(),
            url: url.into(),
        });
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The URL of the first link segment, if the message carries one.
    pub fn download_url(&self) -> Option<&str> {
        self.segments.iter().find_map(|segment| match segment {
            Segment::Link { url, .. } => Some(url.as_str()),
            Segment::Text(_) => None,
        })
    }
}

impl fmt::Display for RenderedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match segment {
                Segment::Text(text) => write!(f, "{}", text)?,
                Segment::Link { label, url } => write!(f, "{} ({})", label, url)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_link_with_trailing_parenthesised_url() {
        let mut message = RenderedMessage::new();
        message.push_text("PowerPoint created successfully");
        message.push_link("Download PowerPoint", "https://x/y.pptx");

        let text = message.to_string();
        let link_line = text.lines().last().unwrap();
        assert_eq!(link_line, "Download PowerPoint (https://x/y.pptx)");
    }

    #[test]
    fn download_url_returns_first_link() {
        let mut message = RenderedMessage::new();
        message.push_text("before");
        message.push_link("a", "https://first.example/deck.pptx");
        message.push_link("b", "https://second.example/deck.pptx");

        assert_eq!(
            message.download_url(),
            Some("https://first.example/deck.pptx")
        );
    }

    #[test]
    fn download_url_is_none_for_plain_text() {
        let mut message = RenderedMessage::new();
        message.push_text("Error: request failed with HTTP 500");
        assert_eq!(message.download_url(), None);
    }
}
