//! Structure extraction options and configuration.

/// Options for structure extraction.
///
/// Every heuristic threshold lives here so that callers can tune the
/// engine for unusual corpora without touching the rule code.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Smallest font size counted as body text
    pub body_size_min: f32,

    /// Largest font size counted as body text
    pub body_size_max: f32,

    /// Baseline used when no span falls inside the body band
    pub default_baseline: f32,

    /// Fraction of pages a string must appear on to count as boilerplate
    pub repetition_ratio: f64,

    /// Minimum number of pages for boilerplate, whatever the ratio says
    pub repetition_min_pages: usize,

    /// Boilerplate strings must be shorter than this (in characters)
    pub repetition_max_len: usize,

    /// Bold spans above `baseline * bold_ratio` are headings
    pub bold_ratio: f32,

    /// First span of a page above `baseline * leading_ratio` is a heading
    pub leading_ratio: f32,

    /// Tolerance used when bucketing candidates into H1/H2
    pub tier_tolerance: f32,

    /// Spans shorter than this (in characters) are never headings
    pub min_heading_len: usize,

    /// How to resolve two title texts that land in the same language
    pub title_policy: TitleConflictPolicy,

    /// Merge the document info title into the title map
    pub merge_metadata_title: bool,

    /// Which pages are scanned for tables
    pub table_scope: TableScope,

    /// Trace every heading decision at debug level
    pub verbose: bool,

    /// Process batch documents in parallel
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body-text font size band.
    pub fn with_body_band(mut self, min: f32, max: f32) -> Self {
        self.body_size_min = min;
        self.body_size_max = max;
        self
    }

    /// Set the fallback baseline size.
    pub fn with_default_baseline(mut self, size: f32) -> Self {
        self.default_baseline = size;
        self
    }

    /// Set the boilerplate page ratio.
    pub fn with_repetition_ratio(mut self, ratio: f64) -> Self {
        self.repetition_ratio = ratio;
        self
    }

    /// Set the heading size ratios (bold rule, first-span rule).
    pub fn with_heading_ratios(mut self, bold: f32, leading: f32) -> Self {
        self.bold_ratio = bold;
        self.leading_ratio = leading;
        self
    }

    /// Set the level tier tolerance.
    pub fn with_tier_tolerance(mut self, tolerance: f32) -> Self {
        self.tier_tolerance = tolerance;
        self
    }

    /// Set the title conflict policy.
    pub fn with_title_policy(mut self, policy: TitleConflictPolicy) -> Self {
        self.title_policy = policy;
        self
    }

    /// Enable or disable the metadata title merge.
    pub fn with_metadata_title(mut self, merge: bool) -> Self {
        self.merge_metadata_title = merge;
        self
    }

    /// Set the table page scope.
    pub fn with_table_scope(mut self, scope: TableScope) -> Self {
        self.table_scope = scope;
        self
    }

    /// Enable verbose heading traces.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            body_size_min: 8.0,
            body_size_max: 14.0,
            default_baseline: 12.0,
            repetition_ratio: 0.6,
            repetition_min_pages: 2,
            repetition_max_len: 80,
            bold_ratio: 1.1,
            leading_ratio: 1.2,
            tier_tolerance: 0.95,
            min_heading_len: 2,
            title_policy: TitleConflictPolicy::FirstWins,
            merge_metadata_title: false,
            table_scope: TableScope::All,
            verbose: false,
            parallel: true,
        }
    }
}

/// Resolution when two maximal title texts normalize to the same language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleConflictPolicy {
    /// Keep the text seen first in page order
    #[default]
    FirstWins,
    /// Overwrite with the text seen last
    LastWins,
}

/// Pages scanned by the table detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableScope {
    /// Every page
    #[default]
    All,
    /// Only the first `n` pages
    FirstPages(u32),
}

impl TableScope {
    /// Whether `page` (1-based) is inside the scope.
    pub fn includes(self, page: u32) -> bool {
        match self {
            TableScope::All => true,
            TableScope::FirstPages(n) => page <= n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .with_body_band(9.0, 13.0)
            .with_title_policy(TitleConflictPolicy::LastWins)
            .with_table_scope(TableScope::FirstPages(5))
            .verbose(true)
            .sequential();

        assert_eq!(options.body_size_min, 9.0);
        assert_eq!(options.body_size_max, 13.0);
        assert_eq!(options.title_policy, TitleConflictPolicy::LastWins);
        assert!(options.verbose);
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.default_baseline, 12.0);
        assert_eq!(options.repetition_max_len, 80);
        assert_eq!(options.title_policy, TitleConflictPolicy::FirstWins);
        assert!(!options.merge_metadata_title);
        assert!(options.parallel);
    }

    #[test]
    fn test_table_scope() {
        assert!(TableScope::All.includes(400));
        assert!(TableScope::FirstPages(5).includes(5));
        assert!(!TableScope::FirstPages(5).includes(6));
    }
}
