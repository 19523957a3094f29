use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    TagOpen,
    AttrKey,
    AttrValue,
    Content,
    Invalid,
    Eof,
}

/// One lexical token of a GPX document together with its raw bytes.
///
/// `Content` tokens from [`GpxTokenizer`] borrow the input buffer. Tag names and
/// attributes are small owned copies, since quick-xml lends attributes from the
/// current event rather than from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub bytes: Cow<'a, [u8]>,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, bytes: &'a [u8]) -> Self {
        Token {
            kind,
            bytes: Cow::Borrowed(bytes),
        }
    }

    pub fn tag_open(name: &'a [u8]) -> Self {
        Token::new(TokenKind::TagOpen, name)
    }

    pub fn attr_key(key: &'a [u8]) -> Self {
        Token::new(TokenKind::AttrKey, key)
    }

    pub fn attr_value(value: &'a [u8]) -> Self {
        Token::new(TokenKind::AttrValue, value)
    }

    pub fn content(text: &'a [u8]) -> Self {
        Token::new(TokenKind::Content, text)
    }

    pub fn invalid() -> Self {
        Token::new(TokenKind::Invalid, b"")
    }

    pub fn eof() -> Self {
        Token::new(TokenKind::Eof, b"")
    }

    /// `invalid` and `eof` both mark the end of usable input.
    pub fn is_end(&self) -> bool {
        matches!(self.kind, TokenKind::Invalid | TokenKind::Eof)
    }

    fn owned(kind: TokenKind, bytes: &[u8]) -> Token<'static> {
        Token {
            kind,
            bytes: Cow::Owned(bytes.to_vec()),
        }
    }

    fn quoted_value(value: &[u8]) -> Token<'static> {
        let mut bytes = Vec::with_capacity(value.len() + 2);
        bytes.push(b'"');
        bytes.extend_from_slice(value);
        bytes.push(b'"');
        Token {
            kind: TokenKind::AttrValue,
            bytes: Cow::Owned(bytes),
        }
    }
}

/// Forward-only token producer over a GPX byte buffer.
///
/// Each start or empty-element tag yields a `TagOpen` token followed by one
/// `AttrKey`/`AttrValue` pair per attribute, in document order. Attribute values
/// are raw (not unescaped) and wrapped in double quotes, whichever quote character
/// the document used. Text and CDATA yield `Content` (trimmed, blank text is
/// dropped). End tags, comments and
/// declarations yield nothing. The iterator ends after the first `Eof` or
/// `Invalid` token.
pub struct GpxTokenizer<'a> {
    reader: Reader<&'a [u8]>,
    pending: VecDeque<Token<'a>>,
    finished: bool,
}

impl<'a> GpxTokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);

        GpxTokenizer {
            reader,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    fn finish(&mut self, token: Token<'a>) -> Token<'a> {
        self.finished = true;
        self.pending.clear();
        token
    }

    fn open_tag(&mut self, tag: &BytesStart<'_>) -> Token<'a> {
        for attr in tag.attributes() {
            match attr {
                Ok(attr) => {
                    self.pending
                        .push_back(Token::owned(TokenKind::AttrKey, attr.key.as_ref()));
                    self.pending
                        .push_back(Token::quoted_value(&attr.value));
                }
                Err(e) => {
                    tracing::warn!(
                        position = self.reader.buffer_position(),
                        "malformed attribute: {e}"
                    );
                    return self.finish(Token::invalid());
                }
            }
        }

        Token::owned(TokenKind::TagOpen, tag.name().as_ref())
    }
}

impl<'a> Iterator for GpxTokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }
        if self.finished {
            return None;
        }

        loop {
            let event = match self.reader.read_event() {
                Err(e) => {
                    tracing::warn!(
                        position = self.reader.error_position(),
                        "XML error, treating as end of input: {e}"
                    );
                    return Some(self.finish(Token::invalid()));
                }
                Ok(Event::Eof) => return Some(self.finish(Token::eof())),
                Ok(event) => event,
            };

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => return Some(self.open_tag(e)),
                Event::Text(e) => {
                    let text = e.into_inner();
                    if !text.iter().all(|b| b.is_ascii_whitespace()) {
                        return Some(Token {
                            kind: TokenKind::Content,
                            bytes: text,
                        });
                    }
                }
                Event::CData(e) => {
                    return Some(Token {
                        kind: TokenKind::Content,
                        bytes: e.into_inner(),
                    });
                }
                _ => {}
            }
        }
    }
}
