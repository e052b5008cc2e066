//! Markdown parser for deck files.
//!
//! # Format
//! ```markdown
//! Q: What is the capital of France?
//! A: Paris
//!
//! Q: Explain borrowing
//! A: Borrowing allows references without ownership.
//! Multiple lines are supported.
//! ```

use crate::error::ParseError;
use crate::types::CardContent;

/// Parse markdown content into question/answer pairs.
pub fn parse(content: &str) -> Result<Vec<CardContent>, ParseError> {
    if content.trim().is_empty() {
        return Ok(vec![]);
    }

    let mut parser = Parser::new();

    for (idx, line) in content.lines().enumerate() {
        parser.process_line(line, idx + 1)?;
    }

    parser.finalize()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Question,
    Answer,
}

struct CardBuilder {
    question: Option<String>,
    answer: Option<String>,
    start_line: usize,
}

impl CardBuilder {
    fn new(start_line: usize) -> Self {
        Self {
            question: None,
            answer: None,
            start_line,
        }
    }

    /// Blank fields count as missing.
    fn build(self) -> Result<CardContent, ParseError> {
        let line = self.start_line;
        let question = non_blank(self.question).ok_or(ParseError::MissingQuestion { line })?;
        let answer = non_blank(self.answer).ok_or(ParseError::MissingAnswer { line })?;

        Ok(CardContent { question, answer })
    }
}

fn non_blank(field: Option<String>) -> Option<String> {
    field
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

struct Parser {
    cards: Vec<CardContent>,
    current: Option<CardBuilder>,
    current_field: Option<Field>,
    buffer: Vec<String>,
}

impl Parser {
    fn new() -> Self {
        Self {
            cards: Vec::new(),
            current: None,
            current_field: None,
            buffer: Vec::new(),
        }
    }

    fn process_line(&mut self, line: &str, line_num: usize) -> Result<(), ParseError> {
        match Self::parse_line(line) {
            LineType::Question(text) => self.handle_question(text, line_num)?,
            LineType::Answer(text) => self.handle_answer(text, line_num)?,
            // Text outside a card has no question to belong to
            LineType::Text(_) if self.current.is_none() => {
                return Err(ParseError::MissingQuestion { line: line_num });
            }
            LineType::Text(text) => self.buffer.push(text.to_string()),
            LineType::Empty if self.current.is_none() => {}
            LineType::Empty => self.buffer.push(String::new()),
        }
        Ok(())
    }

    fn parse_line(line: &str) -> LineType<'_> {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("Q:") {
            LineType::Question(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("A:") {
            LineType::Answer(rest.trim())
        } else if trimmed.is_empty() {
            LineType::Empty
        } else {
            LineType::Text(line)
        }
    }

    fn handle_question(&mut self, text: &str, line_num: usize) -> Result<(), ParseError> {
        self.flush_buffer();

        // A new question closes the previous card
        if let Some(card) = self.current.take() {
            self.cards.push(card.build()?);
        }

        self.current = Some(CardBuilder::new(line_num));
        self.current_field = Some(Field::Question);
        self.buffer.push(text.to_string());
        Ok(())
    }

    fn handle_answer(&mut self, text: &str, line_num: usize) -> Result<(), ParseError> {
        self.flush_buffer();

        match self.current {
            Some(ref card) if card.answer.is_none() => {}
            _ => return Err(ParseError::MissingQuestion { line: line_num }),
        }

        self.current_field = Some(Field::Answer);
        self.buffer.push(text.to_string());
        Ok(())
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let content = self.buffer.join("\n");
        self.buffer.clear();

        if let Some(ref mut card) = self.current {
            match self.current_field {
                Some(Field::Question) => card.question = Some(content),
                Some(Field::Answer) => card.answer = Some(content),
                None => {}
            }
        }
    }

    fn finalize(mut self) -> Result<Vec<CardContent>, ParseError> {
        self.flush_buffer();

        if let Some(card) = self.current.take() {
            self.cards.push(card.build()?);
        }

        Ok(self.cards)
    }
}

enum LineType<'a> {
    Question(&'a str),
    Answer(&'a str),
    Text(&'a str),
    Empty,
}
