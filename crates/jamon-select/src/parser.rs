//! Selector parser
//!
//! Hand-written recursive descent over the selector text. Positions in
//! errors are byte offsets into the original input.

use crate::selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, PseudoElement, SelectorComponent, SelectorList,
};
use crate::{SelectorError, SelectorResult};

/// Parse a complete selector list
pub(crate) fn parse_selector_list(input: &str) -> SelectorResult<SelectorList> {
    let mut parser = Parser { input, pos: 0 };
    let list = parser.selector_list(false)?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(parser.error("unexpected character"));
    }
    Ok(list)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: &'static str) -> SelectorError {
        tracing::trace!("Selector '{}' rejected at {}: {}", self.input, self.pos, message);
        SelectorError::Syntax {
            selector: self.input.to_string(),
            position: self.pos,
            message,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Skip whitespace, returns true if any was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    /// `complex (, complex)*`, stopping before `)` when nested
    fn selector_list(&mut self, nested: bool) -> SelectorResult<SelectorList> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.complex_selector(nested)?);
            self.skip_whitespace();
            if !self.eat(',') {
                break;
            }
        }
        Ok(SelectorList { selectors })
    }

    fn complex_selector(&mut self, nested: bool) -> SelectorResult<ComplexSelector> {
        let mut compounds = vec![self.compound_selector()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some(')') if nested => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.error("unexpected character")),
            };
            if combinator != Combinator::Descendant {
                self.bump();
                self.skip_whitespace();
            }

            if has_pseudo_element(compounds.last()) {
                return Err(self.error("pseudo-element must be last"));
            }
            combinators.push(combinator);
            compounds.push(self.compound_selector()?);
        }

        Ok(ComplexSelector { compounds, combinators })
    }

    fn compound_selector(&mut self) -> SelectorResult<CompoundSelector> {
        let mut compound = CompoundSelector::default();

        if self.eat('*') {
            compound.components.push(SelectorComponent::Universal);
        } else if self.starts_identifier() {
            let name = self.identifier()?;
            compound.components.push(SelectorComponent::Type(name.to_ascii_lowercase()));
        }

        loop {
            let component = match self.peek() {
                Some('#') => {
                    self.bump();
                    if !self.starts_identifier() {
                        return Err(self.error("expected identifier after '#'"));
                    }
                    SelectorComponent::Id(self.identifier()?)
                }
                Some('.') => {
                    self.bump();
                    if !self.starts_identifier() {
                        return Err(self.error("expected identifier after '.'"));
                    }
                    SelectorComponent::Class(self.identifier()?)
                }
                Some('[') => SelectorComponent::Attribute(self.attribute()?),
                Some(':') => self.pseudo()?,
                _ => break,
            };

            if has_pseudo_element(Some(&compound)) {
                return Err(self.error("pseudo-element must be last"));
            }
            compound.components.push(component);
        }

        if compound.components.is_empty() {
            return Err(self.error("expected selector"));
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> SelectorResult<AttributeSelector> {
        self.bump();
        self.skip_whitespace();
        if !self.starts_identifier() {
            return Err(self.error("expected attribute name"));
        }
        let name = self.identifier()?.to_ascii_lowercase();
        self.skip_whitespace();

        if self.eat(']') {
            return Ok(AttributeSelector {
                name,
                matcher: None,
                case_insensitive: false,
            });
        }

        let kind = match self.bump() {
            Some('=') => '=',
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                if !self.eat('=') {
                    return Err(self.error("expected '='"));
                }
                c
            }
            _ => return Err(self.error("expected attribute operator")),
        };
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => self.string(quote)?,
            _ if self.starts_identifier() => self.identifier()?,
            _ => return Err(self.error("expected attribute value")),
        };
        let matcher = match kind {
            '~' => AttributeMatcher::Contains(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            '*' => AttributeMatcher::Substring(value),
            _ => AttributeMatcher::Exact(value),
        };

        let had_space = self.skip_whitespace();
        let mut case_insensitive = false;
        match self.peek() {
            Some('i' | 'I') if had_space => {
                self.bump();
                case_insensitive = true;
            }
            Some('s' | 'S') if had_space => {
                self.bump();
            }
            _ => {}
        }
        self.skip_whitespace();
        if !self.eat(']') {
            return Err(self.error("expected ']'"));
        }

        Ok(AttributeSelector {
            name,
            matcher: Some(matcher),
            case_insensitive,
        })
    }

    fn pseudo(&mut self) -> SelectorResult<SelectorComponent> {
        self.bump();
        let double = self.eat(':');
        if !self.starts_identifier() {
            return Err(self.error("expected pseudo-class name"));
        }
        let name = self.identifier()?;

        if double {
            return PseudoElement::parse(&name)
                .map(SelectorComponent::PseudoElement)
                .ok_or_else(|| self.error("unknown pseudo-element"));
        }
        if let Some(element) = PseudoElement::parse(&name).filter(PseudoElement::is_legacy) {
            return Ok(SelectorComponent::PseudoElement(element));
        }

        if !self.eat('(') {
            return PseudoClass::parse(&name)
                .map(SelectorComponent::PseudoClass)
                .ok_or_else(|| self.error("unknown pseudo-class"));
        }

        let lower = name.to_ascii_lowercase();
        let pseudo = match lower.as_str() {
            "not" | "is" | "where" => {
                let list = self.selector_list(true)?;
                match lower.as_str() {
                    "not" => PseudoClass::Not(list),
                    "is" => PseudoClass::Is(list),
                    _ => PseudoClass::Where(list),
                }
            }
            "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type" => {
                let start = self.pos;
                let end = self.input[start..]
                    .find(')')
                    .map(|offset| start + offset)
                    .ok_or_else(|| self.error("expected ')'"))?;
                let expr = NthExpression::parse(&self.input[start..end])
                    .ok_or_else(|| self.error("invalid An+B expression"))?;
                self.pos = end;
                match lower.as_str() {
                    "nth-child" => PseudoClass::NthChild(expr),
                    "nth-last-child" => PseudoClass::NthLastChild(expr),
                    "nth-of-type" => PseudoClass::NthOfType(expr),
                    _ => PseudoClass::NthLastOfType(expr),
                }
            }
            _ => return Err(self.error("unknown pseudo-class")),
        };

        self.skip_whitespace();
        if !self.eat(')') {
            return Err(self.error("expected ')'"));
        }
        Ok(SelectorComponent::PseudoClass(pseudo))
    }

    fn starts_identifier(&self) -> bool {
        match (self.peek(), self.peek_nth(1)) {
            (Some('-'), Some(next)) => is_name_start(next) || next == '-' || next == '\\',
            (Some('\\'), Some(_)) => true,
            (Some(c), _) => is_name_start(c),
            (None, _) => false,
        }
    }

    fn identifier(&mut self) -> SelectorResult<String> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                out.push(self.escape()?);
            } else if is_name_char(c) {
                self.bump();
                out.push(c);
            } else {
                break;
            }
        }
        Ok(out)
    }

    /// Code point after a backslash
    fn escape(&mut self) -> SelectorResult<char> {
        let Some(first) = self.peek() else {
            return Ok(char::REPLACEMENT_CHARACTER);
        };
        if first == '\n' {
            return Err(self.error("invalid escape"));
        }
        if !first.is_ascii_hexdigit() {
            self.bump();
            return Ok(first);
        }

        let mut code = 0u32;
        let mut digits = 0;
        while digits < 6 {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(d) => {
                    code = code * 16 + d;
                    digits += 1;
                    self.bump();
                }
                None => break,
            }
        }
        // One whitespace terminates the escape
        if self.peek().is_some_and(is_whitespace) {
            self.bump();
        }

        Ok(match char::from_u32(code) {
            Some(c) if code != 0 => c,
            _ => char::REPLACEMENT_CHARACTER,
        })
    }

    fn string(&mut self, quote: char) -> SelectorResult<String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\n') => return Err(self.error("newline in string")),
                Some('\\') => {
                    // An escaped newline continues the string
                    if self.eat('\n') {
                        continue;
                    }
                    out.push(self.escape()?);
                }
                Some(c) => out.push(c),
            }
        }
    }
}

fn has_pseudo_element(compound: Option<&CompoundSelector>) -> bool {
    compound.is_some_and(|c| {
        c.components
            .iter()
            .any(|component| matches!(component, SelectorComponent::PseudoElement(_)))
    })
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

/// Escape a string for use as a CSS identifier (`CSS.escape`)
pub fn escape_identifier(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let first = value.chars().next();
    let only_dash = value == "-";

    for (i, c) in value.chars().enumerate() {
        match c {
            '\0' => out.push(char::REPLACEMENT_CHARACTER),
            '\x01'..='\x1f' | '\x7f' => out.push_str(&format!("\\{:x} ", c as u32)),
            '0'..='9' if i == 0 || (i == 1 && first == Some('-')) => {
                out.push_str(&format!("\\{:x} ", c as u32));
            }
            '-' if only_dash => out.push_str("\\-"),
            c if !c.is_ascii() || c.is_ascii_alphanumeric() || c == '-' || c == '_' => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }

    out
}
