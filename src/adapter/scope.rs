//! Selector scoping and specificity boosting for flat token stylesheets.
//!
//! This is not a CSS parser. The scanner only understands enough structure
//! (comments, strings, brace nesting, top-level commas) to find each rule's
//! selector list; declaration blocks are copied through untouched.

use std::fmt;

/// Suffix repeated once per boost level. Adds one ID column per repetition
/// and matches every element that does not carry `id="_"`.
pub const BOOST_SUFFIX: &str = ":not(#_)";

/// Conditional group rules whose inner rules are scoped like top-level ones.
const GROUPING_AT_RULES: [&str; 4] = ["@media", "@supports", "@container", "@layer"];

/// Prefixes every top-level selector with `scope` (descendant combinator).
///
/// A bare `:root` selector is replaced by the scope itself so the custom
/// properties land on the scope root; `:root` compounds keep their suffix
/// (`:root.dark` → `#app.dark`).
pub fn wrap_with_scope(css: &str, scope: &str) -> String {
    let scope = scope.trim();
    rewrite_selector_lists(css, &|selector: &str| {
        match selector.strip_prefix(":root") {
            Some(rest) if rest.is_empty() || !starts_with_ident_char(rest) => {
                format!("{scope}{rest}")
            }
            _ => format!("{scope} {selector}"),
        }
    })
}

/// Appends [`BOOST_SUFFIX`] `boost` times to every selector that starts with `scope`.
///
/// Compounds on the scope are boosted too (`#app.dark` → `#app:not(#_).dark`);
/// a longer identifier (`#application`) is not the scope. `boost == 0` returns
/// the input unchanged.
pub fn boost_specificity(css: &str, boost: u32, scope: &str) -> String {
    if boost == 0 {
        return css.to_string();
    }
    let scope = scope.trim();
    let suffix = BOOST_SUFFIX.repeat(boost as usize);
    rewrite_selector_lists(css, &|selector: &str| match selector.strip_prefix(scope) {
        Some(rest) if !starts_with_ident_char(rest) && !rest.starts_with('\\') => {
            format!("{scope}{suffix}{rest}")
        }
        _ => selector.to_string(),
    })
}

/// Scope wrapping followed by boosting, the shape every platform emits.
pub fn scope_and_boost(css: &str, scope: &str, boost: u32) -> String {
    boost_specificity(&wrap_with_scope(css, scope), boost, scope)
}

fn starts_with_ident_char(s: &str) -> bool {
    s.chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Applies `rewrite` to each selector of every style rule, recursing into grouping at-rules.
fn rewrite_selector_lists(css: &str, rewrite: &dyn Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(css.len() + 64);
    let mut rest = css;

    loop {
        let trivia = leading_trivia_len(rest);
        out.push_str(&rest[..trivia]);
        rest = &rest[trivia..];
        if rest.is_empty() {
            break;
        }

        let Some((end, terminator)) = find_prelude_end(rest) else {
            out.push_str(rest);
            break;
        };

        if terminator == b';' {
            out.push_str(&rest[..=end]);
            rest = &rest[end + 1..];
            continue;
        }

        let Some(close) = find_block_end(rest, end) else {
            out.push_str(rest);
            break;
        };
        let prelude = &rest[..end];
        let body = &rest[end + 1..close];
        let selectors = prelude.trim_end();
        let gap = &prelude[selectors.len()..];

        if selectors.starts_with('@') {
            out.push_str(prelude);
            out.push('{');
            let keyword = selectors
                .split(|c: char| c.is_whitespace() || c == '(')
                .next()
                .unwrap_or_default()
                .to_ascii_lowercase();
            if GROUPING_AT_RULES.contains(&keyword.as_str()) {
                out.push_str(&rewrite_selector_lists(body, rewrite));
            } else {
                out.push_str(body);
            }
            out.push('}');
        } else {
            let rewritten: Vec<String> = split_selector_list(selectors)
                .into_iter()
                .map(|s| rewrite(s))
                .collect();
            out.push_str(&rewritten.join(", "));
            out.push_str(gap);
            out.push('{');
            out.push_str(body);
            out.push('}');
        }
        rest = &rest[close + 1..];
    }

    out
}

/// Length of leading whitespace and comments.
fn leading_trivia_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes[i..].starts_with(b"/*") {
            i = comment_end(bytes, i);
        } else {
            return i;
        }
    }
}

/// Index just past the comment starting at `start`, or the end of input.
fn comment_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

/// Index just past the string literal starting at `start`.
fn string_end(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Position of the first top-level `{` or `;`, skipping strings, comments and parentheses.
fn find_prelude_end(s: &str) -> Option<(usize, u8)> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = string_end(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = comment_end(bytes, i);
                continue;
            }
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b @ (b'{' | b';') if depth == 0 => return Some((i, b)),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index of the `}` matching the `{` at `open`.
fn find_block_end(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = string_end(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = comment_end(bytes, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Splits `a, b:is(c, d), e` on top-level commas. Commas in comments are ignored.
fn split_selector_list(list: &str) -> Vec<&str> {
    let bytes = list.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = string_end(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = comment_end(bytes, i);
                continue;
            }
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(list[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

/// CSS specificity as `(ids, classes, types)`, compared lexicographically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity {
    pub ids: u32,
    pub classes: u32,
    pub types: u32,
}

impl Specificity {
    fn add(self, other: Specificity) -> Self {
        Self {
            ids: self.ids + other.ids,
            classes: self.classes + other.classes,
            types: self.types + other.types,
        }
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.ids, self.classes, self.types)
    }
}

/// Specificity of a single complex selector (no top-level commas).
///
/// `:not()`, `:is()` and `:has()` count as their most specific argument,
/// `:where()` counts as zero, pseudo-elements count as types.
pub fn selector_specificity(selector: &str) -> Specificity {
    let chars: Vec<char> = selector.chars().collect();
    let mut total = Specificity::default();
    let mut i = 0;

    let read_ident = |mut j: usize| {
        while j < chars.len()
            && (chars[j].is_alphanumeric() || chars[j] == '-' || chars[j] == '_' || chars[j] == '\\')
        {
            if chars[j] == '\\' {
                j += 1;
            }
            j += 1;
        }
        j.min(chars.len())
    };

    while i < chars.len() {
        match chars[i] {
            '#' => {
                total.ids += 1;
                i = read_ident(i + 1);
            }
            '.' => {
                total.classes += 1;
                i = read_ident(i + 1);
            }
            '[' => {
                total.classes += 1;
                i = matching(&chars, i, '[', ']') + 1;
            }
            ':' if chars.get(i + 1) == Some(&':') => {
                total.types += 1;
                i = read_ident(i + 2);
                if chars.get(i) == Some(&'(') {
                    i = matching(&chars, i, '(', ')') + 1;
                }
            }
            ':' => {
                let name_end = read_ident(i + 1);
                let name: String = chars[i + 1..name_end].iter().collect::<String>().to_ascii_lowercase();
                i = name_end;
                if chars.get(i) == Some(&'(') {
                    let close = matching(&chars, i, '(', ')');
                    let inner: String = chars[i + 1..close.min(chars.len())].iter().collect();
                    i = close + 1;
                    match name.as_str() {
                        "where" => {}
                        "not" | "is" | "has" | "matches" => {
                            let max = split_selector_list(&inner)
                                .into_iter()
                                .map(selector_specificity)
                                .max()
                                .unwrap_or_default();
                            total = total.add(max);
                        }
                        _ => total.classes += 1,
                    }
                } else {
                    total.classes += 1;
                }
            }
            c if c.is_alphabetic() || c == '_' || c == '-' => {
                total.types += 1;
                i = read_ident(i);
            }
            _ => i += 1,
        }
    }

    total
}

/// Index of the bracket closing the one at `open`, or `chars.len()`.
fn matching(chars: &[char], open: usize, open_ch: char, close_ch: char) -> usize {
    let mut depth = 0usize;
    for (offset, c) in chars[open..].iter().enumerate() {
        if *c == open_ch {
            depth += 1;
        } else if *c == close_ch {
            depth -= 1;
            if depth == 0 {
                return open + offset;
            }
        }
    }
    chars.len()
}

/// Highest specificity among all selectors of all style rules in `css`.
pub fn max_rule_specificity(css: &str) -> Specificity {
    use std::cell::Cell;
    let max = Cell::new(Specificity::default());
    rewrite_selector_lists(css, &|selector: &str| {
        max.set(max.get().max(selector_specificity(selector)));
        selector.to_string()
    });
    max.get()
}
