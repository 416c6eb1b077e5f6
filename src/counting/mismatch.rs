use std::collections::HashMap;

/// Observed barcode variants per reference name.
///
/// Once a name has an entry its canonical barcode is always present, possibly
/// with count zero, so totals and best-variant queries are well-defined.
#[derive(Debug, Default)]
pub struct MismatchLedger {
    entries: HashMap<String, HashMap<String, u64>>,
}

impl MismatchLedger {
    /// Record one observation of `observed` matched to `name`
    pub fn record(&mut self, name: &str, canonical: &str, observed: &str) {
        let variants = self.entries.entry(name.to_string()).or_default();
        variants.entry(canonical.to_string()).or_insert(0);
        *variants.entry(observed.to_string()).or_insert(0) += 1;
    }

    /// Occurrences of `observed` recorded for `name`
    #[must_use]
    pub fn count(&self, name: &str, observed: &str) -> u64 {
        self.entries
            .get(name)
            .and_then(|variants| variants.get(observed))
            .copied()
            .unwrap_or(0)
    }

    /// All variants observed for `name`, with counts
    #[must_use]
    pub fn variants(&self, name: &str) -> Option<&HashMap<String, u64>> {
        self.entries.get(name)
    }

    /// The most frequently observed variant for `name`.
    ///
    /// Ties break toward the lexicographically smallest variant, so the
    /// selection is deterministic across runs.
    #[must_use]
    pub fn best_variant(&self, name: &str) -> Option<&str> {
        self.entries
            .get(name)?
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(variant, _)| variant.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
