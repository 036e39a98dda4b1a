use glob::Pattern;

use crate::errors::ProcessorError;

/// Include/exclude account filter built from glob patterns.
///
/// An account passes when it matches at least one include pattern (or no
/// include patterns are configured) and matches no exclude pattern. Exclude
/// always wins over include.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl AccountFilter {
    /// Compiles the include and exclude patterns.
    ///
    /// Returns `ProcessorError::InvalidPattern` for the first pattern that
    /// does not compile.
    pub fn new<I, E>(include: I, exclude: E) -> Result<Self, ProcessorError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// A filter that lets every account through.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn accepts(&self, account: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|p| p.matches(account)) {
            return false;
        }
        !self.exclude.iter().any(|p| p.matches(account))
    }
}

fn compile<P>(patterns: P) -> Result<Vec<Pattern>, ProcessorError>
where
    P: IntoIterator,
    P::Item: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            Pattern::new(pattern).map_err(|e| ProcessorError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}
