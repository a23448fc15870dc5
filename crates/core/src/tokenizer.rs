//! Tokenizer: raw text to a generic [`Node`] tree.
//!
//! The tokenizer has no knowledge of board semantics. It records, per
//! atom, the exact substring consumed (for later verbatim replay) and the
//! byte offset (for diagnostics). It never heuristically recovers:
//! unbalanced parentheses, unterminated strings, and invalid numeric
//! literals are fatal [`SyntaxError`]s.

use crate::error::SyntaxError;
use crate::node::{ListNode, Node, NumAtom, Span, StrAtom, SymAtom};
use rust_decimal::Decimal;

/// Tokenize a complete source text into its single top-level list.
pub fn tokenize(src: &str) -> Result<Node, SyntaxError> {
    let mut scanner = Scanner { src, pos: 0 };
    scanner.skip_whitespace();
    let root = match scanner.peek() {
        Some('(') => scanner.list()?,
        Some(_) => {
            return Err(SyntaxError::new(
                scanner.pos,
                "expected a parenthesized list",
            ))
        }
        None => return Err(SyntaxError::new(0, "unexpected end of input")),
    };
    scanner.skip_whitespace();
    if scanner.peek().is_some() {
        return Err(SyntaxError::new(
            scanner.pos,
            "trailing content after top-level list",
        ));
    }
    Ok(root)
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Parse a list starting at the current `(`.
    fn list(&mut self) -> Result<Node, SyntaxError> {
        let start = self.pos;
        self.bump(); // consume '('
        let mut children = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return Err(SyntaxError::new(start, "unclosed list"));
                }
                Some(')') => {
                    self.bump();
                    return Ok(Node::List(ListNode {
                        children,
                        span: Span::new(start, self.pos),
                    }));
                }
                Some('(') => children.push(self.list()?),
                Some('"') => children.push(self.string()?),
                Some(_) => children.push(self.word()?),
            }
        }
    }

    /// Parse a quoted string with backslash escaping.
    fn string(&mut self) -> Result<Node, SyntaxError> {
        let start = self.pos;
        self.bump(); // consume '"'
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(SyntaxError::new(start, "unterminated string")),
                Some('"') => break,
                Some('\\') => match self.bump() {
                    None => {
                        return Err(SyntaxError::new(start, "unterminated escape in string"))
                    }
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    // Unknown escapes pass the escaped character through,
                    // which covers \" and \\ as well.
                    Some(other) => value.push(other),
                },
                Some(c) => value.push(c),
            }
        }
        let span = Span::new(start, self.pos);
        Ok(Node::Str(StrAtom {
            value,
            raw: self.src[start..self.pos].to_owned(),
            span,
        }))
    }

    /// Parse a bare token: a symbol, or a numeric literal if it looks like
    /// one. A token that starts like a number but does not parse as one is
    /// a syntax error, not a symbol.
    fn word(&mut self) -> Result<Node, SyntaxError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '(' || c == ')' || c == '"' {
                break;
            }
            self.bump();
        }
        let raw = &self.src[start..self.pos];
        let span = Span::new(start, self.pos);
        if looks_numeric(raw) {
            let value = parse_decimal(raw)
                .ok_or_else(|| SyntaxError::new(start, format!("invalid numeric literal `{raw}`")))?;
            Ok(Node::Num(NumAtom {
                value,
                raw: raw.to_owned(),
                span,
            }))
        } else {
            Ok(Node::Sym(SymAtom {
                name: raw.to_owned(),
                span,
            }))
        }
    }
}

/// A token is numeric when its first character past an optional sign is a
/// digit (or a decimal point followed by a digit) and every character is
/// drawn from the numeric alphabet. Tokens like `F.Cu`, `-`, or bare
/// identity tokens such as `17ad8d9a-...` stay symbolic; a token made
/// only of numeric characters that still fails to parse (`1.2.3`) is an
/// invalid literal, not a symbol.
fn looks_numeric(tok: &str) -> bool {
    let body = tok.strip_prefix(['+', '-']).unwrap_or(tok);
    let mut chars = body.chars();
    let leading = match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    };
    if !leading {
        return false;
    }
    let bytes = body.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| match b {
        b'0'..=b'9' | b'.' | b'e' | b'E' => true,
        // An interior sign only occurs right after an exponent marker;
        // anywhere else it marks an identifier such as a bare uuid.
        b'+' | b'-' => i > 0 && matches!(bytes[i - 1], b'e' | b'E'),
        _ => false,
    })
}

/// Parse a numeric token exactly. Accepts signed integers and decimals
/// with an optional exponent; no semantic rounding happens here.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.contains(['e', 'E']) {
        Decimal::from_scientific(raw).ok()
    } else {
        raw.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(src: &str) -> ListNode {
        match tokenize(src).expect("tokenize failed") {
            Node::List(l) => l,
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn atoms_keep_raw_source_text() {
        let l = root("(at 1.500 -0.8 90)");
        match &l.children[1] {
            Node::Num(n) => {
                assert_eq!(n.raw, "1.500");
                assert_eq!(n.value, "1.5".parse().unwrap());
            }
            other => panic!("expected number, got {other:?}"),
        }
        match &l.children[2] {
            Node::Num(n) => assert_eq!(n.raw, "-0.8"),
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn strings_unescape_but_keep_raw() {
        let l = root(r#"(property "Ref \"A\"")"#);
        match &l.children[1] {
            Node::Str(s) => {
                assert_eq!(s.value, "Ref \"A\"");
                assert_eq!(s.raw, r#""Ref \"A\"""#);
            }
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn dotted_names_are_symbols_not_numbers() {
        let l = root("(layer F.Cu)");
        assert_eq!(l.children[1].as_sym(), Some("F.Cu"));
    }

    #[test]
    fn nested_lists_carry_spans() {
        let src = "(a (b 1) (c 2))";
        let l = root(src);
        let b = l.child("b").unwrap();
        assert_eq!(&src[b.span.start..b.span.end], "(b 1)");
    }

    #[test]
    fn unclosed_list_is_an_error_at_the_open_paren() {
        let err = tokenize("(kicad_pcb (net 0 \"\")").unwrap_err();
        assert_eq!(err.offset, 0);
        assert!(err.message.contains("unclosed"));
    }

    #[test]
    fn stray_close_paren_reports_its_offset() {
        let src = "(net 0 \"\") )";
        let err = tokenize(src).unwrap_err();
        assert_eq!(err.offset, src.find(") )").unwrap() + 2);
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let err = tokenize("(paper \"A4").unwrap_err();
        assert!(err.message.contains("unterminated string"));
    }

    #[test]
    fn invalid_numeric_literal_is_fatal() {
        let err = tokenize("(at 1.2.3)").unwrap_err();
        assert!(err.message.contains("invalid numeric literal"));
    }

    #[test]
    fn exponent_notation_is_accepted() {
        let l = root("(width 2.5e-1)");
        assert_eq!(l.children[1].as_num(), Some("0.25".parse().unwrap()));
    }

    #[test]
    fn bare_identity_tokens_stay_symbolic() {
        // Old-format tstamp values are unquoted and may start with a digit.
        let l = root("(tstamp 17ad8d9a-2f51-4031-a9e3-d6b0c4a87b0e)");
        assert_eq!(
            l.children[1].as_sym(),
            Some("17ad8d9a-2f51-4031-a9e3-d6b0c4a87b0e")
        );
        // Even an all-digit token with interior dashes is an identifier.
        let l = root("(tstamp 12345678-1234-1234-1234-123456789012)");
        assert!(l.children[1].as_sym().is_some());
    }
}
