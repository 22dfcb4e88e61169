//! Forgiving conversion of free-form compensation strings into comparable amounts.
//!
//! Budgets are typed by job creators ("$80,000", "45k", "35/hr"), so parsing never
//! fails: anything unreadable is treated as an unspecified budget (`0.0`). Parsed
//! values are memoized in a bounded LRU keyed by `(raw, employment type)`.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

use lru::LruCache;
use tracing::debug;

/// Default number of memoized `(raw, employment type)` pairs.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Amounts below this for salaried postings are read as hourly rates.
const HOURLY_THRESHOLD: f64 = 1_000.0;
const FULL_TIME_ANNUAL_HOURS: f64 = 2_000.0;
const PART_TIME_ANNUAL_HOURS: f64 = 1_000.0;

static GLOBAL_PARSER: OnceLock<BudgetParser> = OnceLock::new();

/// Memoizing budget parser.
pub struct BudgetParser {
    cache: Mutex<LruCache<(String, String), f64>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Hit/miss counters for the memo, exposed for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BudgetCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl Default for BudgetParser {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl BudgetParser {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn parse(&self, raw: Option<&str>, employment_type: &str) -> f64 {
        let raw = match raw {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return 0.0,
        };

        let key = (raw.to_string(), employment_type.to_string());
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(amount) = cache.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return *amount;
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let amount = parse_budget_uncached(raw, employment_type);
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, amount);
        }
        amount
    }

    pub fn stats(&self) -> BudgetCacheStats {
        let entries = self.cache.lock().map(|cache| cache.len()).unwrap_or(0);
        BudgetCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        }
    }
}

/// Sizes the process-wide parser. Returns `false` when it was already initialized.
pub fn install_global_parser(capacity: usize) -> bool {
    let installed = GLOBAL_PARSER
        .set(BudgetParser::with_capacity(capacity))
        .is_ok();
    if installed {
        debug!(capacity, "budget parser cache installed");
    }
    installed
}

pub fn global_parser() -> &'static BudgetParser {
    GLOBAL_PARSER.get_or_init(BudgetParser::default)
}

/// Parses a budget through the process-wide memo.
pub fn parse_budget(raw: Option<&str>, employment_type: &str) -> f64 {
    global_parser().parse(raw, employment_type)
}

/// Parses without touching the memo.
pub fn parse_budget_uncached(raw: &str, employment_type: &str) -> f64 {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | 'k' | 'K'))
        .collect();

    let amount = match kept.find(['k', 'K']) {
        Some(suffix) => leading_decimal(&kept[..suffix].replace(',', "")).map(|value| value * 1_000.0),
        None => leading_decimal(&kept.replace(',', "")),
    };

    let amount = match amount {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => return 0.0,
    };

    annualize(amount, employment_type)
}

fn annualize(amount: f64, employment_type: &str) -> f64 {
    if amount >= HOURLY_THRESHOLD {
        return amount;
    }

    match employment_type.trim().to_ascii_lowercase().as_str() {
        "full-time" => amount * FULL_TIME_ANNUAL_HOURS,
        "part-time" => amount * PART_TIME_ANNUAL_HOURS,
        _ => amount,
    }
}

/// Longest leading `digits[.digits]` prefix, mirroring how lenient float readers behave.
fn leading_decimal(text: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for (idx, c) in text.char_indices() {
        match c {
            '0'..='9' => {
                seen_digit = true;
                end = idx + 1;
            }
            '.' if !seen_dot => {
                seen_dot = true;
            }
            _ => break,
        }
    }

    if !seen_digit {
        return None;
    }
    text[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k_suffix_multiplies_by_one_thousand() {
        assert_eq!(parse_budget_uncached("45k", "project"), 45_000.0);
        assert_eq!(parse_budget_uncached("1.5K", "contract"), 1_500.0);
    }

    #[test]
    fn strips_currency_symbols_and_separators() {
        assert_eq!(parse_budget_uncached("$2,500", "project"), 2_500.0);
        assert_eq!(parse_budget_uncached("USD 90,000.50", "contract"), 90_000.5);
    }

    #[test]
    fn ranges_parse_to_a_positive_amount() {
        let amount = parse_budget_uncached("$80,000 - $120,000", "contract");
        assert!(amount > 0.0 && amount.is_finite());
    }

    #[test]
    fn salaried_amounts_under_threshold_are_annualized() {
        assert_eq!(parse_budget_uncached("35", "full-time"), 70_000.0);
        assert_eq!(parse_budget_uncached("35", "part-time"), 35_000.0);
        assert_eq!(parse_budget_uncached("35", "contract"), 35.0);
        assert_eq!(parse_budget_uncached("1000", "full-time"), 1_000.0);
    }

    #[test]
    fn unreadable_input_is_unspecified() {
        assert_eq!(parse_budget_uncached("negotiable", "full-time"), 0.0);
        assert_eq!(parse_budget_uncached("k", "project"), 0.0);
        assert_eq!(parse_budget_uncached("...", "project"), 0.0);

        let parser = BudgetParser::default();
        assert_eq!(parser.parse(None, "full-time"), 0.0);
        assert_eq!(parser.parse(Some(""), "full-time"), 0.0);
        assert_eq!(parser.parse(Some("   "), "contract"), 0.0);
    }

    #[test]
    fn repeated_pairs_are_served_from_the_memo() {
        let parser = BudgetParser::with_capacity(8);
        assert_eq!(parser.parse(Some("90k"), "full-time"), 90_000.0);
        assert_eq!(parser.parse(Some("90k"), "full-time"), 90_000.0);
        assert_eq!(parser.parse(Some("90k"), "contract"), 90_000.0);

        let stats = parser.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.entries, 2);
    }

    #[test]
    fn memo_is_bounded_by_capacity() {
        let parser = BudgetParser::with_capacity(2);
        for raw in ["1k", "2k", "3k", "4k"] {
            parser.parse(Some(raw), "project");
        }
        assert_eq!(parser.stats().entries, 2);
        assert_eq!(parser.parse(Some("1k"), "project"), 1_000.0);
        assert_eq!(parser.stats().misses, 5, "evicted entries are recomputed");
    }

    #[test]
    fn zero_capacity_falls_back_to_a_single_slot() {
        let parser = BudgetParser::with_capacity(0);
        assert_eq!(parser.parse(Some("12k"), "project"), 12_000.0);
        assert_eq!(parser.stats().entries, 1);
    }
}
