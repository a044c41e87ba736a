//! Line-oriented text formats shared by the config, class map and price files.
//!
//! Both formats skip blank lines and lines starting with `#`, split each
//! remaining line once, and trim both halves. Later duplicates win.

use crate::error::LineError;

/// A failed line, 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFailure {
    pub line: usize,
    pub content: String,
    pub reason: LineError,
}

fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().enumerate().filter_map(|(i, raw)| {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            None
        } else {
            Some((i + 1, line))
        }
    })
}

fn failure(line: usize, content: &str, reason: LineError) -> LineFailure {
    LineFailure {
        line,
        content: content.to_string(),
        reason,
    }
}

/// Parses `key: value` lines, splitting on the first `:`.
pub fn parse_colon_pairs(text: &str) -> Result<Vec<(String, String)>, LineFailure> {
    content_lines(text)
        .map(|(number, line)| {
            let (key, value) = line.split_once(':').ok_or_else(|| {
                failure(
                    number,
                    line,
                    LineError::MissingSeparator { separator: ":" },
                )
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(failure(number, line, LineError::EmptyKey));
            }
            Ok((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Parses `name value` lines, splitting on the first run of whitespace.
pub fn parse_whitespace_pairs(text: &str) -> Result<Vec<(String, String)>, LineFailure> {
    content_lines(text)
        .map(|(number, line)| {
            let (key, value) = line
                .split_once(char::is_whitespace)
                .ok_or_else(|| {
                    failure(
                        number,
                        line,
                        LineError::MissingSeparator {
                            separator: "whitespace",
                        },
                    )
                })?;
            Ok((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Like [`parse_whitespace_pairs`] but the value must be a class index.
pub fn parse_indexed_names(text: &str) -> Result<Vec<(usize, String)>, LineFailure> {
    let pairs = parse_whitespace_pairs(text)?;
    let numbers = content_lines(text).map(|(number, line)| (number, line.to_string()));

    pairs
        .into_iter()
        .zip(numbers)
        .map(|((name, index), (number, line))| {
            index
                .parse::<usize>()
                .map(|index| (index, name))
                .map_err(|_| failure(number, &line, LineError::InvalidIndex(index)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colon_pairs_split_on_first_colon() {
        let pairs = parse_colon_pairs("input_size: 224\nurl: http://host:80\n").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("input_size".to_string(), "224".to_string()),
                ("url".to_string(), "http://host:80".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let text = "# model settings\n\n   \n  # indented comment\n";
        assert!(parse_colon_pairs(text).unwrap().is_empty());
        assert!(parse_whitespace_pairs(text).unwrap().is_empty());
        assert!(parse_indexed_names(text).unwrap().is_empty());
    }

    #[test]
    fn test_missing_colon_reports_line_number() {
        let err = parse_colon_pairs("# header\ninput_size: 100\nbroken line\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.content, "broken line");
        assert_eq!(err.reason, LineError::MissingSeparator { separator: ":" });
    }

    #[test]
    fn test_whitespace_pairs_keep_rest_of_line() {
        let pairs = parse_whitespace_pairs("kungpao_chicken 18\nmapo_tofu\t12.5 \n").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("kungpao_chicken".to_string(), "18".to_string()),
                ("mapo_tofu".to_string(), "12.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_whitespace_pairs_reject_single_token() {
        let err = parse_whitespace_pairs("kungpao_chicken\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(matches!(err.reason, LineError::MissingSeparator { .. }));
    }

    #[test]
    fn test_indexed_names_reject_non_numeric_index() {
        let err = parse_indexed_names("rice 0\nnoodles one\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.reason, LineError::InvalidIndex("one".to_string()));
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let text = "rice 0\n# comment\nkungpao_chicken 3\n";
        assert_eq!(parse_indexed_names(text), parse_indexed_names(text));
    }
}
