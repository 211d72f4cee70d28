/// Ant-style path pattern.
///
/// Supported segments: literals, `{name}` and `*` (exactly one segment),
/// `**` (zero or more segments).
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Single,
    Any,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = split(pattern)
            .map(|segment| match segment {
                "**" => Segment::Any,
                "*" => Segment::Single,
                s if s.starts_with('{') && s.ends_with('}') => Segment::Single,
                s => Segment::Literal(s.to_string()),
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<&str> = split(path).collect();
        match_segments(&self.segments, &path)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Any, rest)) => (0..=path.len()).any(|skip| match_segments(rest, &path[skip..])),
        Some((segment, rest)) => match path.split_first() {
            None => false,
            Some((head, tail)) => {
                let head_matches = match segment {
                    Segment::Literal(literal) => literal == head,
                    _ => true,
                };
                head_matches && match_segments(rest, tail)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_matches_exactly_one_segment() {
        let pattern = PathPattern::parse("/api/recipe/{id}");
        assert!(pattern.matches("/api/recipe/42"));
        assert!(pattern.matches("/api/recipe/search"));
        assert!(!pattern.matches("/api/recipe"));
        assert!(!pattern.matches("/api/recipe/42/like"));
    }

    #[test]
    fn double_wildcard_matches_zero_or_more_segments() {
        let pattern = PathPattern::parse("/api/recipe/{id}/like/**");
        assert!(pattern.matches("/api/recipe/1/like"));
        assert!(pattern.matches("/api/recipe/1/like/toggle"));
        assert!(pattern.matches("/api/recipe/1/like/a/b/c"));
        assert!(!pattern.matches("/api/recipe/1/comment"));
    }

    #[test]
    fn double_wildcard_in_the_middle() {
        let pattern = PathPattern::parse("/api/**/count");
        assert!(pattern.matches("/api/count"));
        assert!(pattern.matches("/api/recipe/1/comment/count"));
        assert!(!pattern.matches("/api/recipe/1/comment"));
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let pattern = PathPattern::parse("/api/recipe/search/");
        assert!(pattern.matches("/api/recipe/search"));
        assert!(pattern.matches("/api/recipe/search/"));
    }

    #[test]
    fn literals_are_case_sensitive() {
        let pattern = PathPattern::parse("/swagger-ui.html");
        assert!(pattern.matches("/swagger-ui.html"));
        assert!(!pattern.matches("/Swagger-UI.html"));
    }
}
