// Domain rules - Business logic and policies

use crate::domain::errors::*;
use crate::domain::model::*;

/// Token that joins words in a metadata query
pub const QUERY_WORD_JOINER: char = '+';

/// Configuration switches that influence strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrategyOptions {
    /// Transcode only the main feature of a DVD straight from the drive
    pub main_feature_only: bool,
    /// Back up Blu-ray discs instead of ripping titles to MKV
    pub backup_mode: bool,
}

/// Business rules for rip strategy selection
pub struct StrategySelector;

impl StrategySelector {
    /// Select the rip strategy for a classified disc.
    ///
    /// Pure: the result depends only on the disc type and the two switches.
    pub fn select(disc_type: DiscType, options: StrategyOptions) -> Result<RipStrategy, DomainError> {
        match disc_type {
            DiscType::Music => Ok(RipStrategy::MusicExtract),
            DiscType::Data => Ok(RipStrategy::DataCopy),
            DiscType::Bluray if options.backup_mode => Ok(RipStrategy::FullDiscBackup),
            DiscType::Bluray => Ok(RipStrategy::FullDiscMkv),
            DiscType::Dvd if !options.main_feature_only => Ok(RipStrategy::FullDiscMkv),
            DiscType::Dvd => Ok(RipStrategy::MainFeatureOnly),
            DiscType::Unknown => Err(DomainError::Classification(
                "disc type could not be determined".to_string(),
            )),
        }
    }
}

/// Normalise a label into a metadata query: trim, then join words with `+`.
///
/// Runs of spaces and underscores collapse into one joiner so that no
/// query ever contains an empty word.
pub fn normalize_query(label: &str) -> String {
    label
        .trim()
        .split(|c: char| c == ' ' || c == '_' || c == QUERY_WORD_JOINER)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(&QUERY_WORD_JOINER.to_string())
}

/// Number of words in a normalised query
pub fn query_word_count(query: &str) -> usize {
    if query.is_empty() {
        0
    } else {
        query.split(QUERY_WORD_JOINER).count()
    }
}

/// Drop the last word of a normalised query, if more than one remains
pub fn strip_last_word(query: &str) -> Option<String> {
    query
        .rsplit_once(QUERY_WORD_JOINER)
        .map(|(head, _)| head.to_string())
}

/// Ordered candidate queries for progressive narrowing.
///
/// Yields the normalised label, then (once) the part of the label before its
/// first hyphen, then the normalised label with trailing words removed one
/// at a time. Candidates are produced lazily so callers stop at the first
/// match.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    stage: QueryStage,
    primary: String,
    hyphen: Option<String>,
    narrowing: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryStage {
    Primary,
    Hyphen,
    Narrowing,
    Done,
}

impl QueryPlan {
    pub fn new(label: &str) -> Self {
        let primary = normalize_query(label);
        let hyphen = label
            .find('-')
            .map(|index| normalize_query(&label[..index]))
            .filter(|query| !query.is_empty());
        Self {
            stage: QueryStage::Primary,
            narrowing: Some(primary.clone()),
            primary,
            hyphen,
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Upper bound on the number of queries this plan can yield
    pub fn max_attempts(&self) -> usize {
        if self.primary.is_empty() {
            return 0;
        }
        1 + usize::from(self.hyphen.is_some()) + query_word_count(&self.primary).saturating_sub(1)
    }
}

impl Iterator for QueryPlan {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            match self.stage {
                QueryStage::Primary => {
                    self.stage = QueryStage::Hyphen;
                    if !self.primary.is_empty() {
                        return Some(self.primary.clone());
                    }
                }
                QueryStage::Hyphen => {
                    self.stage = QueryStage::Narrowing;
                    if let Some(query) = self.hyphen.take() {
                        return Some(query);
                    }
                }
                QueryStage::Narrowing => {
                    let next = self.narrowing.as_deref().and_then(strip_last_word);
                    match next {
                        Some(query) => {
                            self.narrowing = Some(query.clone());
                            return Some(query);
                        }
                        None => self.stage = QueryStage::Done,
                    }
                }
                QueryStage::Done => return None,
            }
        }
    }
}

/// Strip non-ASCII characters from a year; series ranges keep their first year
pub fn sanitize_year(raw: &str) -> String {
    let ascii: String = raw.chars().filter(char::is_ascii).collect();
    let ascii = ascii.trim();
    let leading: String = ascii.chars().take_while(char::is_ascii_digit).collect();
    if leading.len() >= 4 {
        leading[..4].to_string()
    } else if ascii.chars().any(|c| c.is_ascii_digit()) {
        ascii.to_string()
    } else {
        // "N/A" and friends
        String::new()
    }
}

/// Business rules for choosing the main feature of a rip
pub struct MainFeatureSelector;

impl MainFeatureSelector {
    /// Largest file wins; on equal sizes the first one seen is kept
    pub fn select(files: &[OutputFile]) -> Option<&OutputFile> {
        let mut largest: Option<&OutputFile> = None;
        for file in files {
            match largest {
                Some(current) if file.size <= current.size => {}
                _ => largest = Some(file),
            }
        }
        largest
    }
}

/// Replace characters that cannot appear in a single path component
pub fn sanitize_path_component(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => DATA_DISC_PLACEHOLDER.to_string(),
        _ => cleaned,
    }
}

/// `<title> (<year>)`, or just the title when no year is known
pub fn title_directory_name(title: &str, year: &str) -> String {
    let title = sanitize_path_component(title);
    let year = year.trim();
    if year.is_empty() {
        title
    } else {
        format!("{} ({})", title, sanitize_path_component(year))
    }
}

/// Image file name for a data disc
pub fn data_image_name(label: &str) -> String {
    let stem = if label.trim().is_empty() {
        DATA_DISC_PLACEHOLDER.to_string()
    } else {
        sanitize_path_component(label)
    };
    format!("{}.iso", stem)
}
