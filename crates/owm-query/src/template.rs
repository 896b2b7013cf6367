//! URL templates with positional `{PARAMn}` placeholders.
//!
//! Patterns are parsed once into literal and placeholder segments so that
//! rendering is plain concatenation and the numbering rules are checked when
//! the catalog is built rather than on every call.

use std::collections::BTreeSet;

use crate::error::CatalogError;
use crate::param::QueryParam;

const OPEN: &str = "{PARAM";
const CLOSE: char = '}';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// 1-based parameter position
    Param(usize),
}

/// A parsed pattern: literal text interleaved with placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

impl Pattern {
    pub fn parse(source: &str) -> Result<Self, CatalogError> {
        let mut segments = Vec::new();
        let mut seen = BTreeSet::new();
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after_open = &rest[start + OPEN.len()..];
            let end = after_open
                .find(CLOSE)
                .ok_or_else(|| CatalogError::UnterminatedPlaceholder(source.to_string()))?;
            let digits = &after_open[..end];

            let index = parse_index(digits).ok_or_else(|| CatalogError::InvalidPlaceholder {
                pattern: source.to_string(),
                placeholder: format!("{}{}{}", OPEN, digits, CLOSE),
            })?;
            if !seen.insert(index) {
                return Err(CatalogError::DuplicatePlaceholder {
                    pattern: source.to_string(),
                    index,
                });
            }

            segments.push(Segment::Param(index));
            rest = &after_open[end + CLOSE.len_utf8()..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder positions in ascending order.
    pub fn placeholders(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(i) => Some(*i),
                Segment::Literal(_) => None,
            })
            .collect();
        indices.sort_unstable();
        indices
    }

    pub fn placeholder_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Param(_)))
            .count()
    }

    /// Append the rendered pattern to `out`.
    ///
    /// `params` is the full parameter list; placeholder `n` reads `params[n - 1]`.
    /// Callers guarantee every referenced position exists.
    fn render_into(&self, params: &[QueryParam], out: &mut String) {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Param(i) => {
                    if let Some(value) = params.get(i - 1) {
                        out.push_str(&value.to_string());
                    }
                }
            }
        }
    }
}

fn parse_index(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<usize>().ok().filter(|n| *n >= 1)
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    name: String,
    required: Pattern,
    optional_suffixes: Vec<Pattern>,
}

impl QueryTemplate {
    /// Parse and validate a template.
    ///
    /// The required pattern must use `PARAM1..PARAMn` exactly once each; the
    /// k-th suffix must contain exactly one placeholder, `PARAM(n+k)`.
    pub fn new(
        name: impl Into<String>,
        required: &str,
        optional_suffixes: &[impl AsRef<str>],
    ) -> Result<Self, CatalogError> {
        let required = Pattern::parse(required)?;
        let count = required.placeholder_count();
        let expected: Vec<usize> = (1..=count).collect();
        if required.placeholders() != expected {
            return Err(CatalogError::NonContiguousPlaceholders {
                pattern: required.as_str().to_string(),
                expected: count,
            });
        }

        let optional_suffixes = optional_suffixes
            .iter()
            .enumerate()
            .map(|(k, suffix)| {
                let suffix = Pattern::parse(suffix.as_ref())?;
                let position = count + k + 1;
                if suffix.placeholders() != [position] {
                    return Err(CatalogError::InvalidSuffix {
                        suffix: suffix.as_str().to_string(),
                        expected: position,
                    });
                }
                Ok(suffix)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.into(),
            required,
            optional_suffixes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_pattern(&self) -> &str {
        self.required.as_str()
    }

    pub fn optional_suffixes(&self) -> impl Iterator<Item = &str> {
        self.optional_suffixes.iter().map(Pattern::as_str)
    }

    /// Number of parameters that must be supplied.
    pub fn required_count(&self) -> usize {
        self.required.placeholder_count()
    }

    /// Largest number of parameters that end up in the query.
    pub fn max_params(&self) -> usize {
        self.required_count() + self.optional_suffixes.len()
    }

    /// Render with `params`, which must hold at least `required_count()`
    /// values. Optional suffixes are appended while values remain; values
    /// beyond the last suffix are not used. Returns the query and the number
    /// of suffixes appended.
    pub(crate) fn render(&self, params: &[QueryParam]) -> (String, usize) {
        let mut query = String::with_capacity(self.required.as_str().len() + params.len() * 8);
        self.required.render_into(params, &mut query);

        let extra = params.len().saturating_sub(self.required_count());
        let appended = extra.min(self.optional_suffixes.len());
        for suffix in &self.optional_suffixes[..appended] {
            suffix.render_into(params, &mut query);
        }
        (query, appended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_parse_segments() {
        let p = Pattern::parse("a?lat={PARAM1}&lon={PARAM2}").unwrap();
        assert_eq!(p.placeholders(), vec![1, 2]);
        assert_eq!(
            p.segments,
            vec![
                Segment::Literal("a?lat=".into()),
                Segment::Param(1),
                Segment::Literal("&lon=".into()),
                Segment::Param(2),
            ]
        );
    }

    #[test]
    fn test_parse_without_placeholders() {
        let p = Pattern::parse("api.example.org/ping").unwrap();
        assert_eq!(p.placeholder_count(), 0);
    }

    #[test]
    fn test_bare_param_text_is_literal() {
        // Only the braced form is a placeholder.
        let p = Pattern::parse("x?PARAM1={PARAM1}").unwrap();
        assert_eq!(p.placeholders(), vec![1]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Pattern::parse("q={PARAM1"),
            Err(CatalogError::UnterminatedPlaceholder(_))
        ));
        assert!(matches!(
            Pattern::parse("q={PARAMx}"),
            Err(CatalogError::InvalidPlaceholder { .. })
        ));
        assert!(matches!(
            Pattern::parse("q={PARAM0}"),
            Err(CatalogError::InvalidPlaceholder { .. })
        ));
        assert!(matches!(
            Pattern::parse("q={PARAM1}&r={PARAM1}"),
            Err(CatalogError::DuplicatePlaceholder { index: 1, .. })
        ));
    }

    #[test]
    fn test_template_rejects_gap() {
        let err = QueryTemplate::new("t", "a={PARAM1}&b={PARAM3}", &[] as &[&str]).unwrap_err();
        assert!(matches!(err, CatalogError::NonContiguousPlaceholders { expected: 2, .. }));
    }

    #[test]
    fn test_template_rejects_misnumbered_suffix() {
        let err = QueryTemplate::new("t", "q={PARAM1}", &[",{PARAM3}"]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::InvalidSuffix {
                suffix: ",{PARAM3}".into(),
                expected: 2
            }
        );
        assert!(QueryTemplate::new("t", "q={PARAM1}", &[","]).is_err());
        assert!(QueryTemplate::new("t", "q={PARAM1}", &[",{PARAM2}{PARAM3}"]).is_err());
    }

    #[test]
    fn test_render_appends_suffixes_in_order() {
        let t = QueryTemplate::new("t", "q={PARAM1}", &[",{PARAM2}", ";{PARAM3}"]).unwrap();
        assert_eq!(t.max_params(), 3);
        assert_eq!(t.render(&params!["a"]), ("q=a".to_string(), 0));
        assert_eq!(t.render(&params!["a", "b"]), ("q=a,b".to_string(), 1));
        assert_eq!(t.render(&params!["a", "b", "c"]), ("q=a,b;c".to_string(), 2));
        assert_eq!(t.render(&params!["a", "b", "c", "d"]), ("q=a,b;c".to_string(), 2));
    }

    #[test]
    fn test_render_placeholders_out_of_order() {
        let t = QueryTemplate::new("t", "lon={PARAM2}&lat={PARAM1}", &[] as &[&str]).unwrap();
        assert_eq!(t.render(&params![1, 2]).0, "lon=2&lat=1");
    }
}
