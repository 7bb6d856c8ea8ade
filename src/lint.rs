//! The acceptance gate a generated board passes through before anyone plays it.
//!
//! Clue linting is a pluggable [`BoardLinter`]; [`PlaceholderLinter`] catches the filler text
//! content generators tend to produce. [`certify`] combines linting, construction and starter
//! reachability into a single verdict.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use regex::RegexSet;
use tracing::{info, warn};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::SpecError;
use crate::reachability::ReachabilityReport;
use crate::spec::{BoardSpec, ItemSpec};

/// A problem with the text of a board specification. `item` indexes [`BoardSpec::items`].
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LintIssue {
    /// The clue is filler such as "this is item 3".
    Placeholder { item: usize, clue: String },
    /// The clue talks about the puzzle instead of the answer.
    MetaReference { item: usize, phrase: String },
    /// The clue has fewer than three words.
    TooShort { item: usize, clue: String },
    /// The clue is little more than the answer itself.
    RepeatsAnswer { item: usize, clue: String },
    /// A likely starter clue admits it depends on other answers.
    StarterDependsOnOthers { item: usize, clue: String },
    /// A likely starter clue is too vague to solve cold.
    GenericStarter { item: usize, clue: String },
    /// No item looks solvable without help.
    NoStarter,
}

impl Display for LintIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Placeholder { item, clue } => write!(f, "item {item} has a placeholder clue: {clue:?}"),
            Self::MetaReference { item, phrase } => write!(f, "item {item} refers to the puzzle itself: {phrase:?}"),
            Self::TooShort { item, clue } => write!(f, "item {item} has an overly short clue: {clue:?}"),
            Self::RepeatsAnswer { item, clue } => write!(f, "item {item} clue just repeats the answer: {clue:?}"),
            Self::StarterDependsOnOthers { item, clue } => write!(f, "starter item {item} has dependencies: {clue:?}"),
            Self::GenericStarter { item, clue } => write!(f, "starter item {item} is too generic: {clue:?}"),
            Self::NoStarter => write!(f, "no identifiable starter clue"),
        }
    }
}

/// Judges the text quality of a board specification. An empty result approves the board.
pub trait BoardLinter {
    /// Every issue found in `spec`.
    fn lint(&self, spec: &BoardSpec) -> Vec<LintIssue>;
}

impl<F> BoardLinter for F
where
    F: Fn(&BoardSpec) -> Vec<LintIssue>,
{
    fn lint(&self, spec: &BoardSpec) -> Vec<LintIssue> {
        self(spec)
    }
}

const PLACEHOLDER_PATTERNS: &[&str] = &[
    r"this is item \d+",
    r"item \d+ in the .+ category",
    r".+ item \d+",
    r"the \d+(?:st|nd|rd|th) item",
    r"entry number \d+",
    r"answer \d+",
    r"clue \d+",
    r"position \(\d+,\s*\d+\)",
    r"this is the .+ item",
    r"number \d+ in our list",
];

const META_PHRASES: &[&str] = &[
    "in our puzzle",
    "in this grid",
    "in the current board",
    "according to our list",
    "as per our arrangement",
    "in this puzzle game",
];

const DEPENDENCY_PHRASES: &[&str] = &["solve first", "need other answers", "requires"];
const GENERIC_WORDS: &[&str] = &["something", "anything", "item", "thing", "element"];
// only the first few starters are inspected
const STARTERS_CHECKED: usize = 3;

/// Pattern-based linter for placeholder, meta and lazy clues.
#[derive(Clone, Debug)]
pub struct PlaceholderLinter {
    placeholders: RegexSet,
}

impl PlaceholderLinter {
    /// Compile the built-in patterns.
    pub fn new() -> Result<Self, regex::Error> {
        let placeholders = RegexSet::new(PLACEHOLDER_PATTERNS.iter().map(|p| format!("(?i){p}")))?;
        Ok(Self { placeholders })
    }

    fn lint_item(&self, index: usize, item: &ItemSpec) -> Vec<LintIssue> {
        let mut issues = Vec::new();
        let clue = item.clue.to_lowercase();
        let words = clue.split_whitespace().count();

        if self.placeholders.is_match(&clue) {
            issues.push(LintIssue::Placeholder { item: index, clue: item.clue.clone() });
        }
        if let Some(phrase) = META_PHRASES.iter().find(|p| clue.contains(*p)) {
            issues.push(LintIssue::MetaReference { item: index, phrase: (*phrase).to_owned() });
        }
        if words < 3 {
            issues.push(LintIssue::TooShort { item: index, clue: item.clue.clone() });
        }
        let answer = item.answer.to_lowercase();
        if !answer.is_empty() && clue.contains(&answer) && words < 5 {
            issues.push(LintIssue::RepeatsAnswer { item: index, clue: item.clue.clone() });
        }
        issues
    }

    fn lint_starters(&self, spec: &BoardSpec) -> Vec<LintIssue> {
        let mut starters = spec
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.difficulty == 1 && item.references.is_empty())
            .collect_vec();
        if starters.is_empty() {
            starters = spec.items.iter().enumerate().filter(|(_, item)| item.difficulty <= 2).collect();
        }
        if starters.is_empty() {
            return vec![LintIssue::NoStarter];
        }

        let mut issues = Vec::new();
        for (index, item) in starters.into_iter().take(STARTERS_CHECKED) {
            let clue = item.clue.to_lowercase();
            if DEPENDENCY_PHRASES.iter().any(|p| clue.contains(p)) {
                issues.push(LintIssue::StarterDependsOnOthers { item: index, clue: item.clue.clone() });
            }
            let generic = GENERIC_WORDS.iter().filter(|w| clue.contains(*w)).count();
            if generic > 1 || (generic == 1 && clue.split_whitespace().count() < 6) {
                issues.push(LintIssue::GenericStarter { item: index, clue: item.clue.clone() });
            }
        }
        issues
    }
}

impl BoardLinter for PlaceholderLinter {
    fn lint(&self, spec: &BoardSpec) -> Vec<LintIssue> {
        let mut issues = spec
            .items
            .iter()
            .enumerate()
            .flat_map(|(index, item)| self.lint_item(index, item))
            .collect_vec();
        issues.extend(self.lint_starters(spec));
        issues
    }
}

/// Why [`certify`] turned a board specification away.
#[derive(Clone, Debug, PartialEq)]
pub struct Rejection {
    /// Text problems reported by the linter.
    pub lint: Vec<LintIssue>,
    /// Structural problem that stopped the board being built.
    pub malformed: Option<SpecError>,
    /// Starter reachability, when the board could be built.
    pub reachability: Option<ReachabilityReport>,
    /// The quality bar that was applied.
    pub threshold: f64,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut reasons = self.lint.iter().map(ToString::to_string).collect_vec();
        if let Some(error) = &self.malformed {
            reasons.push(error.to_string());
        }
        if let Some(report) = self.reachability.as_ref().filter(|r| !r.meets(self.threshold)) {
            reasons.push(format!("{report}, below the {:.1}% bar", self.threshold));
        }
        write!(f, "board rejected: {}", reasons.join("; "))
    }
}

impl std::error::Error for Rejection {}

/// Decide whether `spec` is fit to play.
///
/// The board must pass `linter`, build cleanly, and have at least
/// [`reachability_threshold`](EngineConfig::reachability_threshold) percent of its cells reachable
/// from its starter clues. Every failing check is reported together.
pub fn certify(spec: &BoardSpec, linter: &dyn BoardLinter, config: &EngineConfig) -> Result<Board, Rejection> {
    let lint = linter.lint(spec);
    let threshold = config.reachability_threshold;

    let board = match Board::from_spec(spec, config) {
        Ok(board) => board,
        Err(error) => {
            warn!(category = %spec.category, %error, "board specification is malformed");
            return Err(Rejection { lint, malformed: Some(error), reachability: None, threshold });
        }
    };

    let report = board.starter_reachability();
    if lint.is_empty() && report.meets(threshold) {
        info!(category = %spec.category, %report, "board certified");
        return Ok(board);
    }

    warn!(category = %spec.category, issues = lint.len(), %report, "board rejected");
    Err(Rejection { lint, malformed: None, reachability: Some(report), threshold })
}
