//! File specification string grammars, ISO 32000-1:2008 Section 7.11.2.
//!
//! A file specification string is either a path in the PDF's own
//! platform-independent syntax or, when the file system is `/URL`, a
//! uniform resource locator.

use nom::{
    IResult,
    branch::alt,
    character::complete::{char, none_of, one_of},
    combinator::all_consuming,
    multi::{fold_many0, separated_list1},
    sequence::preceded,
};

/// Which grammar a file specification string is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSpecGrammar {
    /// Component path separated by `/`
    Path,
    /// Absolute URL
    Url,
}

impl FileSpecGrammar {
    /// Grammar selected by a file specification's `/FS` name.
    pub fn for_file_system(fs: Option<&str>) -> Self {
        match fs {
            Some("URL") => FileSpecGrammar::Url,
            _ => FileSpecGrammar::Path,
        }
    }

    /// Returns true if `s` is well-formed under this grammar.
    pub fn accepts(&self, s: &str) -> bool {
        match self {
            FileSpecGrammar::Path => is_valid_file_spec_string(s),
            FileSpecGrammar::Url => is_valid_url_string(s),
        }
    }
}

/// `\/` or `\\`
fn escaped_char(input: &str) -> IResult<&str, char> {
    preceded(char('\\'), one_of("\\/"))(input)
}

/// One path component. A lone backslash is kept literally.
fn path_component(input: &str) -> IResult<&str, String> {
    fold_many0(
        alt((escaped_char, char('\\'), none_of("\\/\0"))),
        String::new,
        |mut acc, c| {
            acc.push(c);
            acc
        },
    )(input)
}

/// Split a file specification path into unescaped components.
///
/// Returns `None` if the string contains a NUL character.
///
/// # Example
///
/// ```
/// use pdf_attest::validation::strings::parse_file_spec_path;
///
/// let parts = parse_file_spec_path("/C/My Documents/a\\/b.txt").unwrap();
/// assert_eq!(parts, vec!["", "C", "My Documents", "a/b.txt"]);
/// ```
pub fn parse_file_spec_path(s: &str) -> Option<Vec<String>> {
    all_consuming(separated_list1(char('/'), path_component))(s)
        .ok()
        .map(|(_, parts)| parts)
}

/// Path grammar check.
pub fn is_valid_file_spec_string(s: &str) -> bool {
    parse_file_spec_path(s).is_some()
}

/// URL grammar check. Relative references are rejected.
pub fn is_valid_url_string(s: &str) -> bool {
    match url::Url::parse(s) {
        Ok(_) => true,
        Err(e) => {
            log::trace!("url {:?} rejected: {}", s, e);
            false
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_path() {
        assert_eq!(
            parse_file_spec_path("docs/readme.txt").unwrap(),
            vec!["docs", "readme.txt"]
        );
    }

    #[test]
    fn test_absolute_and_empty_components() {
        assert_eq!(parse_file_spec_path("/a//b").unwrap(), vec!["", "a", "", "b"]);
        assert_eq!(parse_file_spec_path("").unwrap(), vec![""]);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(parse_file_spec_path("a\\\\b").unwrap(), vec!["a\\b"]);
        assert_eq!(parse_file_spec_path("a\\/b/c").unwrap(), vec!["a/b", "c"]);
        // backslash before anything else is literal
        assert_eq!(parse_file_spec_path("C:\\temp").unwrap(), vec!["C:\\temp"]);
        assert_eq!(parse_file_spec_path("end\\").unwrap(), vec!["end\\"]);
    }

    #[test]
    fn test_nul_is_invalid() {
        assert!(!is_valid_file_spec_string("a\0b"));
        assert!(is_valid_file_spec_string("attachment.pdf"));
    }

    #[test]
    fn test_url_grammar() {
        assert!(is_valid_url_string("https://example.com/report.pdf"));
        assert!(is_valid_url_string("file:///tmp/a.txt"));
        assert!(!is_valid_url_string("report.pdf"));
        assert!(!is_valid_url_string("http://exa mple.com"));
    }

    #[test]
    fn test_grammar_selection() {
        assert_eq!(FileSpecGrammar::for_file_system(None), FileSpecGrammar::Path);
        assert_eq!(FileSpecGrammar::for_file_system(Some("URL")), FileSpecGrammar::Url);
        assert_eq!(FileSpecGrammar::for_file_system(Some("NFS")), FileSpecGrammar::Path);
        assert!(!FileSpecGrammar::Url.accepts("relative/path"));
        assert!(FileSpecGrammar::Path.accepts("relative/path"));
    }
}
