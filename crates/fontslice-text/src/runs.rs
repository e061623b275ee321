//! Text partitioning into font runs

use fontslice_css::{FontDescriptor, FontStyle, FontWeight};

/// A maximal contiguous substring assigned to one descriptor, or to none.
///
/// `start` and `end` are Unicode scalar positions, end-exclusive. The runs
/// produced for a string partition `[0, char_count)` in order, with no gaps
/// or overlaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub start: usize,
    pub end: usize,
    /// None when no descriptor covers the run; rendered with the caller's
    /// fallback appearance.
    pub descriptor: Option<FontDescriptor>,
}

impl TextRun {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Partition `text` into runs, one descriptor each.
///
/// Descriptors are first filtered by the requested weight and style (exact
/// match where requested). Matching is first-match-wins in filtered order,
/// except that the previous run's descriptor is retried first so text in a
/// locally uniform script stays amortized O(N).
pub fn build_runs(
    text: &str,
    descriptors: &[FontDescriptor],
    weight: Option<FontWeight>,
    style: Option<FontStyle>,
) -> Vec<TextRun> {
    let filtered = filter_descriptors(descriptors, weight, style);

    let mut runs = Vec::new();
    let mut current: Option<usize> = None;
    let mut run_start = 0;
    let mut length = 0;

    for (i, c) in text.chars().enumerate() {
        let matched = match_char(c, &filtered, current);
        if i == 0 {
            current = matched;
        } else if matched != current {
            runs.push(make_run(run_start, i, current, &filtered));
            run_start = i;
            current = matched;
        }
        length = i + 1;
    }

    if length > 0 {
        runs.push(make_run(run_start, length, current, &filtered));
    }
    runs
}

fn filter_descriptors<'a>(
    descriptors: &'a [FontDescriptor],
    weight: Option<FontWeight>,
    style: Option<FontStyle>,
) -> Vec<&'a FontDescriptor> {
    let select = |style_constraint: Option<FontStyle>| {
        descriptors
            .iter()
            .filter(|d| weight.is_none_or(|w| d.weight == w))
            .filter(|d| style_constraint.is_none_or(|s| d.style == s))
            .collect::<Vec<_>>()
    };

    let filtered = select(style);
    // Stylesheets often lack a dedicated italic slice; fall back to
    // any-style slices of the right weight. Weight has no such fallback.
    if filtered.is_empty() && style == Some(FontStyle::Italic) {
        return select(None);
    }
    filtered
}

/// Match a character, retrying the previous run's descriptor first.
fn match_char(c: char, filtered: &[&FontDescriptor], hint: Option<usize>) -> Option<usize> {
    if let Some(i) = hint
        && filtered[i].matches_char(c)
    {
        return Some(i);
    }
    filtered.iter().position(|d| d.matches_char(c))
}

fn make_run(
    start: usize,
    end: usize,
    matched: Option<usize>,
    filtered: &[&FontDescriptor],
) -> TextRun {
    TextRun {
        start,
        end,
        descriptor: matched.map(|i| filtered[i].clone()),
    }
}
