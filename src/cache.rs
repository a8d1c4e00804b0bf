
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::message::resource::Rdata;
use crate::record::ParsedRecord;

/// Default number of entries a cache may hold before the next cleanup clears
/// it out entirely.
pub const DEFAULT_ENTRY_LIMIT: usize = 100_000;

// A TTL-0 announcement keeps its record visible for this long before it
// actually disappears (RFC 6762 section 10.1).
const ZERO_TTL_SECONDS: u64 = 1;

/// Configuration for an [`MdnsCache`].
///
/// ```rust
/// use mdns_cache::{MdnsCache, MdnsCacheConfig};
///
/// let config = MdnsCacheConfig::new().with_entry_limit(1000);
/// let cache = MdnsCache::with_config(config);
/// assert!(cache.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct MdnsCacheConfig {
    /// Soft cap on stored entries. Exceeding it marks the cache overfilled;
    /// the next [`MdnsCache::cleanup_records`] call then evicts everything.
    ///
    /// Default: [`DEFAULT_ENTRY_LIMIT`]
    pub entry_limit: usize,
}

impl Default for MdnsCacheConfig {
    fn default() -> Self {
        Self {
            entry_limit: DEFAULT_ENTRY_LIMIT,
        }
    }
}

impl MdnsCacheConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entry limit.
    pub fn with_entry_limit(mut self, entry_limit: usize) -> Self {
        self.entry_limit = entry_limit;
        self
    }
}

/// How an update changed the cache, as reported to listeners.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UpdateType {
    RecordAdded,
    RecordChanged,
    /// Never returned by [`MdnsCache::update_dns_record`]; records only ever
    /// leave the cache during cleanup, and consumers classify those callback
    /// notifications with this variant.
    RecordRemoved,
    NoChange,
}

/// Key identifying one cache slot.
///
/// The lowercased owner name sorts first so that range scans by name walk
/// contiguous entries; then the type; then a per-type disambiguator, which
/// for PTR records is the pointed-to domain so that several PTR records can
/// share one owner name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CacheKey {
    name_lowercase: String,
    typ: u16,
    optional: String,
}

impl CacheKey {
    pub fn new(typ: u16, name: &str, optional: &str) -> CacheKey {
        CacheKey {
            name_lowercase: name.to_ascii_lowercase(),
            typ,
            optional: optional.to_owned(),
        }
    }

    /// The key under which `record` is stored.
    pub fn create_for(record: &ParsedRecord) -> CacheKey {
        CacheKey::new(
            record.typ().value(),
            &record.name().data,
            &get_optional_field_for_record(record),
        )
    }

    pub fn name_lowercase(&self) -> &str {
        &self.name_lowercase
    }

    pub fn typ(&self) -> u16 {
        self.typ
    }

    pub fn optional(&self) -> &str {
        &self.optional
    }
}

fn get_optional_field_for_record(record: &ParsedRecord) -> String {
    match record.rdata() {
        Some(Rdata::Ptr(ptr)) => ptr.ptr.data.clone(),
        _ => String::new(),
    }
}

/// An ordered cache of mDNS resource records with TTL-based lazy expiry.
///
/// The cache owns its records and runs no background work: every mutation
/// happens inside [`update_dns_record`](MdnsCache::update_dns_record),
/// [`remove_record`](MdnsCache::remove_record) and
/// [`cleanup_records`](MdnsCache::cleanup_records) on the caller's thread,
/// with the caller supplying every timestamp. Callers that share a cache
/// across threads must serialize access themselves.
pub struct MdnsCache {
    records: BTreeMap<CacheKey, Rc<ParsedRecord>>,
    next_expiration: Option<Instant>,
    entry_limit: usize,
}

impl Default for MdnsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MdnsCache {
    /// Creates a cache with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MdnsCacheConfig::default())
    }

    /// Creates a cache with the given configuration.
    pub fn with_config(config: MdnsCacheConfig) -> Self {
        MdnsCache {
            records: BTreeMap::new(),
            next_expiration: None,
            entry_limit: config.entry_limit,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lower bound on the earliest expiration across all entries, or `None`
    /// when unknown (empty cache, or everything was just cleaned up). Kept
    /// exact only by [`cleanup_records`](MdnsCache::cleanup_records); updates
    /// in between may move it earlier but never later.
    pub fn next_expiration(&self) -> Option<Instant> {
        self.next_expiration
    }

    /// When `record` actually stops being served: `time_created` plus its
    /// TTL, with TTL-0 goodbye records getting a one-second grace window.
    pub fn get_effective_expiration(record: &ParsedRecord) -> Instant {
        let ttl = if record.ttl() != 0 {
            Duration::from_secs(record.ttl() as u64)
        } else {
            Duration::from_secs(ZERO_TTL_SECONDS)
        };
        record.time_created() + ttl
    }

    /// Exact-key lookup. Expired entries that cleanup has not yet visited are
    /// still returned; only [`find_dns_records`](MdnsCache::find_dns_records)
    /// and [`cleanup_records`](MdnsCache::cleanup_records) consult expiration.
    pub fn lookup_key(&self, key: &CacheKey) -> Option<&Rc<ParsedRecord>> {
        self.records.get(key)
    }

    /// Inserts or replaces the record under its key and reports how the
    /// cache changed.
    ///
    /// A TTL-0 goodbye announcement for a key that is not cached is ignored
    /// (`NoChange`). An existing entry is always replaced, refreshing its
    /// creation time and TTL, even when the result is `NoChange`.
    pub fn update_dns_record(&mut self, record: Rc<ParsedRecord>) -> UpdateType {
        let key = CacheKey::create_for(&record);

        // Ignore "goodbye" packets for records not in the cache.
        if record.ttl() == 0 && !self.records.contains_key(&key) {
            return UpdateType::NoChange;
        }

        // The global bound may only move earlier here; cleanup_records is
        // the one place it is recomputed exactly.
        let mut new_expiration = Self::get_effective_expiration(&record);
        if let Some(next_expiration) = self.next_expiration {
            new_expiration = new_expiration.min(next_expiration);
        }

        let update_type = match self.records.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(record);
                UpdateType::RecordAdded
            }
            Entry::Occupied(mut entry) => {
                let update_type = if record.ttl() != 0 && !record.is_equal(entry.get(), true) {
                    UpdateType::RecordChanged
                } else {
                    UpdateType::NoChange
                };
                entry.insert(record);
                update_type
            }
        };

        self.next_expiration = Some(new_expiration);
        update_type
    }

    /// All live records for `name` (case-insensitive), restricted to `typ`
    /// unless `typ` is `0`, which matches every type. Entries whose effective
    /// expiration is at or before `now` are skipped but not deleted.
    pub fn find_dns_records(&self, typ: u16, name: &str, now: Instant) -> Vec<Rc<ParsedRecord>> {
        let name_lowercase = name.to_ascii_lowercase();
        let start = CacheKey::new(typ, &name_lowercase, "");
        let mut records = vec![];
        for (key, record) in self.records.range(start..) {
            if key.name_lowercase != name_lowercase || (typ != 0 && key.typ != typ) {
                break;
            }
            // Expired entries are deleted only upon cleanup.
            if now < Self::get_effective_expiration(record) {
                records.push(Rc::clone(record));
            }
        }
        records
    }

    /// Evicts expired entries, invoking `record_removed_callback` for each
    /// one, and recomputes the next-expiration bound.
    ///
    /// Cheap to call eagerly: when `now` is before the cached bound and the
    /// cache is not overfilled this returns without touching any entry. An
    /// overfilled cache is cleared completely, whatever the individual TTLs.
    pub fn cleanup_records<F>(&mut self, now: Instant, mut record_removed_callback: F)
    where
        F: FnMut(Rc<ParsedRecord>),
    {
        // TODO: make overfill pruning more intelligent than clearing
        // everything.
        let remove_all_records = self.is_cache_overfilled();

        // next_expiration is guaranteed to be at or before the earliest
        // expiration, which lets clients call this eagerly with impunity.
        if let Some(next_expiration) = self.next_expiration
            && now < next_expiration
            && !remove_all_records
        {
            return;
        }

        let mut next_expiration: Option<Instant> = None;
        let mut removed = 0usize;
        self.records.retain(|_key, record| {
            let expiration = Self::get_effective_expiration(record);
            if remove_all_records || now >= expiration {
                record_removed_callback(Rc::clone(record));
                removed += 1;
                false
            } else {
                next_expiration = Some(match next_expiration {
                    Some(e) if e <= expiration => e,
                    _ => expiration,
                });
                true
            }
        });
        if removed > 0 {
            log::debug!("cleanup removed {removed} cached records");
        }
        self.next_expiration = next_expiration;
    }

    /// Removes and returns the entry holding exactly this record.
    ///
    /// The stored entry must be the same allocation, not merely value-equal;
    /// a record that was already replaced or evicted yields `None`.
    pub fn remove_record(&mut self, record: &Rc<ParsedRecord>) -> Option<Rc<ParsedRecord>> {
        let key = CacheKey::create_for(record);
        let found = self.records.get(&key)?;
        if Rc::ptr_eq(found, record) {
            self.records.remove(&key)
        } else {
            None
        }
    }

    pub fn is_cache_overfilled(&self) -> bool {
        self.records.len() > self.entry_limit
    }
}
