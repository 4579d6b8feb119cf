use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Styles applied to the parts of a tweet body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub base: Style,
    pub mention: Style,
    pub hashtag: Style,
    pub link: Style,
}

impl TextStyle {
    pub fn tweet() -> Self {
        Self {
            base: Style::default().fg(Color::White),
            mention: Style::default().fg(Color::Cyan),
            hashtag: Style::default().fg(Color::Blue),
            link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        }
    }

    /// Dimmed variant for quoting a tweet inside a dialog.
    pub fn muted() -> Self {
        let dim = Style::default().fg(Color::DarkGray);
        Self {
            base: dim,
            mention: dim,
            hashtag: dim,
            link: dim,
        }
    }
}

/// Renders raw tweet text into wrapped, highlighted lines.
pub struct TweetText<'a> {
    value: &'a str,
    style: TextStyle,
}

impl<'a> TweetText<'a> {
    pub fn new(value: &'a str, style: TextStyle) -> Self {
        Self { value, style }
    }

    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        textwrap::wrap(self.value, usize::from(width.max(1)))
            .into_iter()
            .map(|row| Line::from(self.spans(&row)))
            .collect()
    }

    pub fn height(&self, width: u16) -> u16 {
        let rows = textwrap::wrap(self.value, usize::from(width.max(1))).len();
        u16::try_from(rows.max(1)).unwrap_or(u16::MAX)
    }

    fn spans(&self, row: &str) -> Vec<Span<'static>> {
        row.split_inclusive(' ')
            .map(|word| Span::styled(word.to_string(), self.style_for(word.trim_end())))
            .collect()
    }

    fn style_for(&self, word: &str) -> Style {
        if word.len() > 1 && word.starts_with('@') {
            self.style.mention
        } else if word.len() > 1 && word.starts_with('#') {
            self.style.hashtag
        } else if word.starts_with("https://") || word.starts_with("http://") {
            self.style.link
        } else {
            self.style.base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_wraps_to_width() {
        let text = TweetText::new("one two three four", TextStyle::tweet());
        let lines = text.lines(10);
        assert_eq!(lines.len(), 2);
        assert_eq!(text_of(&lines[0]), "one two");
        assert_eq!(text_of(&lines[1]), "three four");
        assert_eq!(text.height(10), 2);
        assert_eq!(text.height(9), 3);
    }

    #[test]
    fn test_empty_text_takes_one_row() {
        let text = TweetText::new("", TextStyle::tweet());
        assert_eq!(text.height(20), 1);
    }

    #[test]
    fn test_highlights_tokens() {
        let style = TextStyle::tweet();
        let text = TweetText::new("hi @ada see #rust at https://x.io @", style);
        let lines = text.lines(80);
        let spans = &lines[0].spans;

        let styled = |needle: &str| {
            spans
                .iter()
                .find(|s| s.content.trim_end() == needle)
                .map(|s| s.style)
                .unwrap()
        };
        assert_eq!(styled("@ada"), style.mention);
        assert_eq!(styled("#rust"), style.hashtag);
        assert_eq!(styled("https://x.io"), style.link);
        assert_eq!(styled("hi"), style.base);
        assert_eq!(styled("@"), style.base);
    }
}
