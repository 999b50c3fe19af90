//! XPath-like selectors over [`Element`] trees
//!
//! Supported syntax, always relative to the context element:
//!
//! - `a/b/c` child steps, `*` matches any name
//! - `b[@attr="value"]` attribute equality, `b[@attr]` attribute presence;
//!   predicates can be chained: `b[@x="1"][@y="2"]`
//! - a trailing `@attr` step selects an attribute value instead of elements
//!   (`@article-type`, `journal-meta/issn/@pub-type`)
//!
//! Selectors are parsed on every call. Malformed predicates never match anything
//! rather than failing.

use crate::common::tree::Element;
use crate::common::xml_utils::collapse_whitespace;

#[derive(Debug, PartialEq)]
enum Predicate<'p> {
    Exists(&'p str),
    Equals(&'p str, &'p str),
    Never,
}

#[derive(Debug, PartialEq)]
struct Step<'p> {
    name: &'p str,
    predicates: Vec<Predicate<'p>>,
}

impl Step<'_> {
    fn matches(&self, element: &Element) -> bool {
        (self.name == "*" || element.name == self.name)
            && self.predicates.iter().all(|p| match p {
                Predicate::Exists(key) => element.attr(key).is_some(),
                Predicate::Equals(key, value) => element.attr(key) == Some(*value),
                Predicate::Never => false,
            })
    }
}

/// Select every element matched by `path`, in document order
pub fn select<'a>(root: &'a Element, path: &str) -> Vec<&'a Element> {
    let (steps, attribute) = parse_path(path);
    if attribute.is_some() {
        return Vec::new();
    }
    walk(root, &steps)
}

/// Select flattened text values: element text, or attribute values for a trailing `@attr`
pub fn select_values(root: &Element, path: &str) -> Vec<String> {
    let (steps, attribute) = parse_path(path);
    let elements = walk(root, &steps);
    match attribute {
        Some(attr) => elements
            .into_iter()
            .filter_map(|e| e.attr(attr))
            .map(collapse_whitespace)
            .collect(),
        None => elements.into_iter().map(Element::flat_text).collect(),
    }
}

fn walk<'a>(root: &'a Element, steps: &[Step<'_>]) -> Vec<&'a Element> {
    let mut current = vec![root];
    for step in steps {
        current = current
            .into_iter()
            .flat_map(|e| e.child_elements().filter(|c| step.matches(c)))
            .collect();
        if current.is_empty() {
            break;
        }
    }
    current
}

fn parse_path(path: &str) -> (Vec<Step<'_>>, Option<&str>) {
    let mut segments = split_segments(path);
    let attribute = match segments.last() {
        Some(last) if last.starts_with('@') => segments.pop().map(|s| &s[1..]),
        _ => None,
    };
    let steps = segments.into_iter().map(parse_step).collect();
    (steps, attribute)
}

/// Split on `/` outside of predicates and quoted values
fn split_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in path.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                '/' if depth == 0 => {
                    segments.push(&path[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    segments.push(&path[start..]);

    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

fn parse_step(segment: &str) -> Step<'_> {
    let (name, rest) = match segment.find('[') {
        Some(i) => (&segment[..i], &segment[i..]),
        None => (segment, ""),
    };

    let predicates = rest
        .split(']')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| match p.strip_prefix('[') {
            Some(body) => parse_predicate(body.trim()),
            None => Predicate::Never,
        })
        .collect();

    Step {
        name: name.trim(),
        predicates,
    }
}

fn parse_predicate(body: &str) -> Predicate<'_> {
    let Some(body) = body.strip_prefix('@') else {
        return Predicate::Never;
    };
    match body.split_once('=') {
        Some((key, value)) => {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
            match unquoted {
                Some(v) => Predicate::Equals(key.trim(), v),
                None => Predicate::Never,
            }
        }
        None => Predicate::Exists(body.trim()),
    }
}
