use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use itertools::Itertools;
use thiserror::Error;

use crate::core::types::{CacheStats, CatalogRow, MultiplexRow, Orientation, Uniqueness};
use crate::counting::mismatch::MismatchLedger;
use crate::counting::sample::{BarcodeMatch, SampleCounter, SharedCache};
use crate::matching::cache::MatchCache;
use crate::matching::multi::{prefix, MultiLengthCache};
use crate::report::RunSummary;

/// Distance bound for classifying tag and multiplex codes
pub const TAG_CODE_DISTANCE: u32 = 1;

#[derive(Error, Debug)]
pub enum CountError {
    #[error("Multiplex code supplied but no multiplex sample sheet was configured")]
    UnexpectedMultiplexCode,

    #[error("Multiplexing is configured, every read needs a multiplex code")]
    MissingMultiplexCode,

    #[error("Mismatch tracking was not enabled for this counter")]
    TrackingDisabled,
}

/// The up/down counter pair for one sample
struct SamplePair {
    up: SampleCounter,
    down: SampleCounter,
}

impl SamplePair {
    fn new(up_cache: &SharedCache, down_cache: &SharedCache) -> Self {
        Self {
            up: SampleCounter::new(Rc::clone(up_cache)),
            down: SampleCounter::new(Rc::clone(down_cache)),
        }
    }

    fn named(up_cache: &SharedCache, down_cache: &SharedCache, sample: &str) -> Self {
        Self {
            up: SampleCounter::named(Rc::clone(up_cache), format!("{sample}_UP")),
            down: SampleCounter::named(Rc::clone(down_cache), format!("{sample}_DOWN")),
        }
    }

    fn get(&self, orientation: Orientation) -> &SampleCounter {
        match orientation {
            Orientation::Up => &self.up,
            Orientation::Down => &self.down,
        }
    }

    fn get_mut(&mut self, orientation: Orientation) -> &mut SampleCounter {
        match orientation {
            Orientation::Up => &mut self.up,
            Orientation::Down => &mut self.down,
        }
    }
}

/// How reads are routed to sample counters, fixed at construction
enum Routing {
    /// one shared counter pair
    Single(SamplePair),
    /// multiplex barcode -> index into `pairs`
    Multiplexed {
        cache: MatchCache<usize>,
        pairs: Vec<SamplePair>,
    },
}

/// Top-level read router and count aggregator.
///
/// Classifies each incoming read's tag code into an orientation, optionally
/// resolves its multiplex code to a sample, delegates the payload barcode to
/// the right [`SampleCounter`], and keeps the mismatch ledgers used to revise
/// the catalog afterwards.
pub struct BarcodeCounter {
    rows: Vec<CatalogRow>,
    tag_cache: MatchCache<Orientation>,
    up_cache: SharedCache,
    down_cache: SharedCache,
    routing: Routing,
    /// per-orientation ledgers, present when tracking is enabled
    mismatches: Option<[MismatchLedger; 2]>,
    total: u64,
    total_found: u64,
}

impl BarcodeCounter {
    /// Build a counter over catalog rows with the two orientation tag codes.
    ///
    /// `up_code` and `down_code` are the fixed primer sequences that mark
    /// which orientation a read carries; they are matched at distance
    /// [`TAG_CODE_DISTANCE`].
    #[must_use]
    pub fn new(rows: Vec<CatalogRow>, up_code: &str, down_code: &str) -> Self {
        let tag_cache = MatchCache::new(HashMap::from([
            (up_code.to_string(), Orientation::Up),
            (down_code.to_string(), Orientation::Down),
        ]));

        let up_catalog: HashMap<String, String> = rows
            .iter()
            .map(|row| (row.up_tag.clone(), row.name.clone()))
            .collect();
        let down_catalog: HashMap<String, String> = rows
            .iter()
            .map(|row| (row.down_tag.clone(), row.name.clone()))
            .collect();

        let up_cache: SharedCache = Rc::new(RefCell::new(MultiLengthCache::new(up_catalog)));
        let down_cache: SharedCache = Rc::new(RefCell::new(MultiLengthCache::new(down_catalog)));
        let routing = Routing::Single(SamplePair::new(&up_cache, &down_cache));

        Self {
            rows,
            tag_cache,
            up_cache,
            down_cache,
            routing,
            mismatches: None,
            total: 0,
            total_found: 0,
        }
    }

    /// Route reads per sample using a multiplex sample sheet
    #[must_use]
    pub fn with_multiplex(mut self, samples: Vec<MultiplexRow>) -> Self {
        let mut catalog: HashMap<String, usize> = HashMap::new();
        let mut pairs = Vec::with_capacity(samples.len());
        for row in &samples {
            catalog.insert(row.barcode.clone(), pairs.len());
            pairs.push(SamplePair::named(
                &self.up_cache,
                &self.down_cache,
                &row.sample,
            ));
        }
        self.routing = Routing::Multiplexed {
            cache: MatchCache::new(catalog),
            pairs,
        };
        self
    }

    /// Record every observed barcode variant per matched strain
    #[must_use]
    pub fn with_mismatch_tracking(mut self) -> Self {
        self.mismatches = Some([MismatchLedger::default(), MismatchLedger::default()]);
        self
    }

    /// Route one read through tag and multiplex classification into its
    /// sample counter.
    ///
    /// `Err` means the call was misconfigured (multiplex code without a
    /// sample sheet or vice versa) and nothing was mutated. `Ok(None)` means
    /// the read could not be resolved and was only counted as attempted.
    pub fn add(
        &mut self,
        barcode: &str,
        tag_code: &str,
        max_distance: u32,
        multiplex_code: Option<&str>,
    ) -> Result<Option<BarcodeMatch>, CountError> {
        match (&self.routing, multiplex_code) {
            (Routing::Single(_), Some(_)) => return Err(CountError::UnexpectedMultiplexCode),
            (Routing::Multiplexed { .. }, None) => return Err(CountError::MissingMultiplexCode),
            _ => {}
        }

        self.total += 1;

        let Some(orientation) =
            self.tag_cache
                .resolve(tag_code, TAG_CODE_DISTANCE, Uniqueness::Any)
        else {
            return Ok(None);
        };

        let found = match &mut self.routing {
            Routing::Single(pair) => pair.get_mut(orientation).add(barcode, max_distance),
            Routing::Multiplexed { cache, pairs } => {
                // presence checked above
                let Some(code) = multiplex_code else {
                    return Ok(None);
                };
                match cache.resolve(code, TAG_CODE_DISTANCE, Uniqueness::Any) {
                    Some(sample) => pairs[sample].get_mut(orientation).add(barcode, max_distance),
                    None => return Ok(None),
                }
            }
        };

        let Some(found) = found else {
            return Ok(None);
        };
        self.total_found += 1;

        if let Some(ledgers) = &mut self.mismatches {
            let cache = match orientation {
                Orientation::Up => &self.up_cache,
                Orientation::Down => &self.down_cache,
            };
            let canonical = cache
                .borrow()
                .original(&found.value)
                .map(str::to_string)
                .unwrap_or_else(|| found.reference.clone());
            ledgers[orientation.index()].record(
                &found.value,
                &canonical,
                prefix(barcode, found.length),
            );
        }

        Ok(Some(found))
    }

    /// The per-strain count table as tab-delimited text.
    ///
    /// One row per catalog strain in input order; one count column per sample
    /// counter (`UP`/`DOWN` for a single pair, `<sample>_UP`/`<sample>_DOWN`
    /// per multiplex sample).
    #[must_use]
    pub fn count_table(&self) -> String {
        let names = self.ordered_names();
        let mut out = String::new();

        match &self.routing {
            Routing::Single(pair) => {
                out.push_str("Strain\tUP\tDOWN\n");
                for name in names {
                    out.push_str(&format!(
                        "{}\t{}\t{}\n",
                        name,
                        pair.get(Orientation::Up).count(name),
                        pair.get(Orientation::Down).count(name)
                    ));
                }
            }
            Routing::Multiplexed { pairs, .. } => {
                let header = pairs
                    .iter()
                    .flat_map(|pair| [pair.up.name(), pair.down.name()])
                    .map(|name| name.unwrap_or(""))
                    .join("\t");
                out.push_str(&format!("Strain\t{header}\n"));
                for name in names {
                    let counts = pairs
                        .iter()
                        .flat_map(|pair| [pair.up.count(name), pair.down.count(name)])
                        .map(|count| count.to_string())
                        .join("\t");
                    out.push_str(&format!("{name}\t{counts}\n"));
                }
            }
        }

        out
    }

    /// All observed mismatches as tab-delimited text: strain, canonical
    /// barcode, canonical's own count, and a "/"-joined list of
    /// "variant (count)" entries.
    ///
    /// # Errors
    ///
    /// Returns `CountError::TrackingDisabled` when the counter was built
    /// without mismatch tracking.
    pub fn mismatch_table(&self) -> Result<String, CountError> {
        let ledgers = self.mismatches.as_ref().ok_or(CountError::TrackingDisabled)?;
        let mut out = String::new();

        for orientation in Orientation::BOTH {
            let ledger = &ledgers[orientation.index()];
            let cache = match orientation {
                Orientation::Up => self.up_cache.borrow(),
                Orientation::Down => self.down_cache.borrow(),
            };

            for name in self.ordered_names() {
                let Some(variants) = ledger.variants(name) else {
                    continue;
                };
                let canonical = cache.original(&name.to_string()).unwrap_or(name);
                let own_count = variants.get(canonical).copied().unwrap_or(0);
                let others = variants
                    .iter()
                    .filter(|(variant, _)| variant.as_str() != canonical)
                    .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
                    .map(|(variant, count)| format!("{variant} ({count})"))
                    .join("/");
                out.push_str(&format!("{name}\t{canonical}\t{own_count}\t{others}\n"));
            }
        }

        Ok(out)
    }

    /// The catalog with each tag replaced by its most frequently observed
    /// variant, as tab-delimited text in the original row order.
    ///
    /// Strains never seen in the ledger keep their original tags.
    ///
    /// # Errors
    ///
    /// Returns `CountError::TrackingDisabled` when the counter was built
    /// without mismatch tracking.
    pub fn revised_catalog(&self) -> Result<String, CountError> {
        let ledgers = self.mismatches.as_ref().ok_or(CountError::TrackingDisabled)?;
        let mut out = String::new();

        for row in &self.rows {
            let up = ledgers[Orientation::Up.index()]
                .best_variant(&row.name)
                .unwrap_or(row.up_tag.as_str());
            let down = ledgers[Orientation::Down.index()]
                .best_variant(&row.name)
                .unwrap_or(row.down_tag.as_str());
            out.push_str(&format!("{}\t{}\t{}\n", row.name, up, down));
        }

        Ok(out)
    }

    /// The mismatch ledger for one orientation, when tracking is enabled
    #[must_use]
    pub fn ledger(&self, orientation: Orientation) -> Option<&MismatchLedger> {
        self.mismatches
            .as_ref()
            .map(|ledgers| &ledgers[orientation.index()])
    }

    /// Attempted vs. matched read totals
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary::new(self.total, self.total_found)
    }

    /// Reads routed through this counter, resolved or not
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Reads that resolved to a strain and were counted
    #[must_use]
    pub fn total_found(&self) -> u64 {
        self.total_found
    }

    /// Counters summed over the tag, multiplex, and both orientation caches
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        let mut stats = self.tag_cache.stats()
            + self.up_cache.borrow().stats()
            + self.down_cache.borrow().stats();
        if let Routing::Multiplexed { cache, .. } = &self.routing {
            stats += cache.stats();
        }
        stats
    }

    /// Catalog strain names in input order, first occurrence only
    fn ordered_names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.name.as_str()).unique()
    }
}
