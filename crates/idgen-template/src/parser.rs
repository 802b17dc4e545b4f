//! Translates a template string into its ordered list of elements.
//!
//! ```text
//! element delimiter      :
//! resolver marker        @   (leading, any element)
//! random pick            n+
//! fixed string           =text=       (may contain ':' and '+')
//! range (1-based)        1n2  or  n1,2
//! first / last chars     2n   /  n2
//! whole value            n
//! ```
//!
//! Keys are runs of ASCII letters or `_`. Empty elements (`a::b`, a trailing
//! `:`) are skipped.

use crate::element::{Element, Window};
use crate::error::{Result, TemplateError};

pub const ELEMENT_DELIMITER: char = ':';
pub const LITERAL_DELIMITER: char = '=';
pub const RANDOM_INDICATOR: char = '+';
pub const RANGE_SEPARATOR: char = ',';
pub const RESOLVER_MARKER: char = '@';

/// Parses `template` into elements, in template order.
pub fn parse(template: &str) -> Result<Vec<Element>> {
    let mut elements = Vec::new();
    let mut rest = template;

    while !rest.is_empty() {
        let (token, tail) = next_token(template, rest)?;
        rest = tail;
        if !token.is_empty() {
            elements.push(parse_element(template, token)?);
        }
    }

    Ok(elements)
}

/// Splits the next element token off `input`, consuming its delimiter.
fn next_token<'a>(template: &str, input: &'a str) -> Result<(&'a str, &'a str)> {
    let body = input.strip_prefix(RESOLVER_MARKER).unwrap_or(input);

    let end = match body.strip_prefix(LITERAL_DELIMITER) {
        Some(literal) => {
            let close = literal.find(LITERAL_DELIMITER).ok_or_else(|| {
                TemplateError::parse(template, format!("unterminated literal \"{input}\""))
            })?;
            // marker + opening delimiter + literal text + closing delimiter
            (input.len() - body.len()) + 1 + close + 1
        }
        None => input.find(ELEMENT_DELIMITER).unwrap_or(input.len()),
    };

    let (token, tail) = input.split_at(end);
    match tail.strip_prefix(ELEMENT_DELIMITER) {
        Some(tail) => Ok((token, tail)),
        None if tail.is_empty() => Ok((token, tail)),
        None => Err(TemplateError::parse(
            template,
            format!("unexpected \"{tail}\" after literal \"{token}\""),
        )),
    }
}

fn parse_element(template: &str, token: &str) -> Result<Element> {
    let (resolver, body) = match token.strip_prefix(RESOLVER_MARKER) {
        Some(body) => (true, body),
        None => (false, token),
    };

    if body.is_empty() {
        return Err(TemplateError::parse(
            template,
            format!("resolver marker without element in \"{token}\""),
        ));
    }

    let mut element = if let Some(literal) = body.strip_prefix(LITERAL_DELIMITER) {
        let text = literal.strip_suffix(LITERAL_DELIMITER).ok_or_else(|| {
            TemplateError::parse(template, format!("unterminated literal \"{token}\""))
        })?;
        Element::fixed(token, text)
    } else {
        parse_keyed(template, token, body)?
    };

    element.set_resolver(resolver);
    Ok(element)
}

fn parse_keyed(template: &str, token: &str, body: &str) -> Result<Element> {
    let invalid = |reason: String| TemplateError::parse(template, reason);

    let (lead, rest) = split_while(body, |c| c.is_ascii_digit());
    let (key, rest) = split_while(rest, is_key_char);
    if key.is_empty() {
        return Err(invalid(format!("missing data key in element \"{token}\"")));
    }

    if rest.strip_prefix(RANDOM_INDICATOR) == Some("") {
        if !lead.is_empty() {
            return Err(invalid(format!(
                "random pick cannot take a position in \"{token}\""
            )));
        }
        return Ok(Element::random_pick(token, key));
    }

    let (trail, rest) = split_while(rest, |c| c.is_ascii_digit());
    let range_end = match rest.strip_prefix(RANGE_SEPARATOR) {
        Some(end) if !end.is_empty() && end.chars().all(|c| c.is_ascii_digit()) => Some(end),
        None if rest.is_empty() => None,
        _ => {
            return Err(invalid(format!(
                "unexpected \"{rest}\" in element \"{token}\""
            )))
        }
    };

    let position = |digits: &str| -> Result<usize> {
        match digits.parse::<usize>() {
            Ok(0) => Err(invalid(format!(
                "positions start at 1 in element \"{token}\""
            ))),
            Ok(value) => Ok(value),
            Err(_) => Err(invalid(format!(
                "position \"{digits}\" out of range in element \"{token}\""
            ))),
        }
    };

    let window = match (lead.is_empty(), trail.is_empty(), range_end) {
        (true, true, None) => Window::Whole,
        (false, true, None) => Window::Head(position(lead)?),
        (true, false, None) => Window::Tail(position(trail)?),
        (false, false, None) => Window::Range(position(lead)?, position(trail)?),
        (true, false, Some(end)) => Window::Range(position(trail)?, position(end)?),
        _ => {
            return Err(invalid(format!(
                "malformed range in element \"{token}\""
            )))
        }
    };

    if let Window::Range(a, b) = window {
        if a > b {
            return Err(invalid(format!(
                "range start {a} is past its end {b} in element \"{token}\""
            )));
        }
    }

    Ok(Element::slice(token, key, window))
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn split_while(input: &str, pred: impl Fn(char) -> bool) -> (&str, &str) {
    let end = input.find(|c: char| !pred(c)).unwrap_or(input.len());
    input.split_at(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    fn window_of(element: &Element) -> Window {
        match element.kind() {
            ElementKind::Slice { window, .. } => *window,
            other => panic!("expected a slice element, got {other:?}"),
        }
    }

    #[test]
    fn empty_template_has_no_elements() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn parses_every_element_kind() {
        let elements = parse("=x:y=:f+:2f:l3:1l2:n1,3:f").unwrap();

        let kinds: Vec<_> = elements.iter().map(Element::kind_name).collect();
        assert_eq!(
            kinds,
            vec!["fixed", "random", "slice", "slice", "slice", "slice", "slice"]
        );

        assert!(matches!(elements[0].kind(), ElementKind::Fixed { text } if text == "x:y"));
        assert_eq!(elements[1].key(), Some("f"));
        assert_eq!(window_of(&elements[2]), Window::Head(2));
        assert_eq!(window_of(&elements[3]), Window::Tail(3));
        assert_eq!(window_of(&elements[4]), Window::Range(1, 2));
        assert_eq!(window_of(&elements[5]), Window::Range(1, 3));
        assert_eq!(window_of(&elements[6]), Window::Whole);
    }

    #[test]
    fn keeps_element_sources() {
        let elements = parse("@N+:=a+b=").unwrap();
        let sources: Vec<_> = elements.iter().map(Element::source).collect();
        assert_eq!(sources, vec!["@N+", "=a+b="]);
    }

    #[test]
    fn resolver_marker_applies_to_any_element() {
        let elements = parse("2f:@N+:@=x=").unwrap();
        let resolvers: Vec<_> = elements.iter().map(Element::is_resolver).collect();
        assert_eq!(resolvers, vec![false, true, true]);
    }

    #[test]
    fn multi_letter_keys() {
        let elements = parse("2first_name:last+").unwrap();
        assert_eq!(elements[0].key(), Some("first_name"));
        assert_eq!(elements[1].key(), Some("last"));
    }

    #[test]
    fn empty_elements_are_skipped() {
        let elements = parse("=a=::1l3:").unwrap();
        assert_eq!(elements.len(), 2);
    }

    #[test]
    fn rejects_malformed_elements() {
        for template in [
            "=abc",
            "=abc=x",
            "@",
            "12",
            "2f+",
            "f#",
            "0f",
            "f0",
            "3f1",
            "f3,1",
            "2f1,3",
            "f1,",
            "f,3",
            "f99999999999999999999999",
        ] {
            let err = parse(template).unwrap_err();
            assert!(
                matches!(err, TemplateError::Parse { .. }),
                "expected a parse error for {template:?}, got {err:?}"
            );
        }
    }
}
