//! Filtering catalog records by the file types they track.

use super::mangle::filter_patterns;
use crate::backend::content_index_dir;
use crate::catalog::RepositoryRecord;
use crate::config::{case_insensitive_filesystem, HgLayout, QueryConfig};
use crate::progress::Progress;
use regex::{Regex, RegexBuilder};
use std::fs;
use std::path::Path;
use url::Url;

/// One mangled glob fragment, compiled for matching index filenames.
#[derive(Debug, Clone)]
pub struct FilterPattern {
    glob: String,
    regex: Regex,
}

impl FilterPattern {
    /// Compile a mangled fragment. The index suffix is appended here.
    pub fn new(glob: &str) -> Result<Self, regex::Error> {
        let mut source = String::with_capacity(glob.len() + 8);
        source.push('^');
        for ch in glob.chars() {
            match ch {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                c => source.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
            }
        }
        source.push_str(&regex::escape(HgLayout::INDEX_SUFFIX));
        source.push('$');

        let regex = RegexBuilder::new(&source)
            .case_insensitive(case_insensitive_filesystem())
            .build()?;
        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    /// The mangled fragment this pattern was built from.
    pub fn glob(&self) -> &str {
        &self.glob
    }

    /// Whether an index filename matches `<glob>.i`.
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }
}

/// Parsed form of a discovery query.
#[derive(Debug, Clone)]
pub enum FileFilter {
    /// Keep every record.
    All,
    /// Keep records tracking at least one matching file.
    Patterns(Vec<FilterPattern>),
}

impl FileFilter {
    /// Interpret a raw query string.
    ///
    /// Anything that does not yield at least one usable pattern means "no
    /// filter"; unparseable input is reported to `progress`, never returned
    /// as an error.
    pub fn from_query(raw_query: Option<&str>, progress: &dyn Progress) -> Self {
        let raw = match raw_query.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return FileFilter::All,
        };

        let url = match parse_query_url(raw) {
            Ok(url) => url,
            Err(e) => {
                progress.warning(&format!("Could not parse query {:?}: {}", raw, e));
                return FileFilter::All;
            }
        };

        let value = url
            .query_pairs()
            .find(|(key, _)| key == QueryConfig::FILE_PATTERN_KEY)
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();

        if value.is_empty() {
            progress.message("Query contained only unknown keys or empty values");
            return FileFilter::All;
        }
        progress.message(&format!("Client requested repositories matching {}", value));

        let patterns: Vec<FilterPattern> = filter_patterns(&value)
            .iter()
            .filter_map(|glob| match FilterPattern::new(glob) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    progress.warning(&format!("Ignoring pattern {:?}: {}", glob, e));
                    None
                }
            })
            .collect();

        if patterns.is_empty() {
            FileFilter::All
        } else {
            FileFilter::Patterns(patterns)
        }
    }

    /// Whether the repository at `repo_dir` passes this filter.
    pub fn accepts(&self, repo_dir: &Path, progress: &dyn Progress) -> bool {
        let patterns = match self {
            FileFilter::All => return true,
            FileFilter::Patterns(patterns) => patterns,
        };

        let index_dir = content_index_dir(repo_dir);
        let entries = match fs::read_dir(&index_dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    progress.warning(&format!("Cannot list {}: {}", index_dir.display(), e));
                }
                return false;
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .any(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .map(|name| patterns.iter().any(|p| p.matches(name)))
                    .unwrap_or(false)
            })
    }
}

/// Parse `raw` as an absolute URL, or as a reference relative to
/// [`QueryConfig::RELATIVE_BASE`].
fn parse_query_url(raw: &str) -> Result<Url, url::ParseError> {
    match Url::parse(raw) {
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(QueryConfig::RELATIVE_BASE)?.join(raw)
        }
        parsed => parsed,
    }
}

/// Keep the records whose repositories track a file matching the query.
///
/// An empty, absent, pattern-less or unparseable query returns `records`
/// unchanged.
pub fn filter<I>(records: I, raw_query: Option<&str>, progress: &dyn Progress) -> Vec<RepositoryRecord>
where
    I: IntoIterator<Item = RepositoryRecord>,
{
    let file_filter = FileFilter::from_query(raw_query, progress);
    records
        .into_iter()
        .filter(|record| file_filter.accepts(&record.path, progress))
        .collect()
}
