use crate::resolver::HostResolution;
use lazy_static::lazy_static;
use lru::LruCache;
use parking_lot::Mutex;
use std::{borrow::Borrow, fmt::Debug, hash::Hash, net::IpAddr, sync::Arc};
use tracing::trace;

pub const DEFAULT_CACHE_SIZE: usize = 10000;

// The entries are only ever touched through the non-promoting accessors of
// `LruCache`, so the LRU order is the insertion order and `pop_lru` evicts the
// oldest inserted entry.
pub struct BoundedCache<K: Hash + Eq, V> {
    entries: LruCache<K, V>,
    capacity: usize,
}

impl<K: Hash + Eq, V> BoundedCache<K, V> {
    /// Creates a cache holding at most `capacity` entries. A capacity of zero
    /// puts no bound on the cache, callers that want caching disabled must not
    /// write to it.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            capacity,
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.peek(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains(key)
    }

    /// Overwriting an existing key keeps its position in the eviction order.
    pub fn set(&mut self, key: K, value: V)
    where
        K: Debug,
    {
        if let Some(slot) = self.entries.peek_mut(&key) {
            *slot = value;
            return;
        }

        if self.capacity > 0 {
            while self.entries.len() >= self.capacity {
                match self.entries.pop_lru() {
                    Some((evicted, _)) => trace!("Evicted {:?} from the cache", evicted),
                    None => break,
                }
            }
        }

        self.entries.push(key, value);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Shrinking is lazy, the extra entries go away when new keys are inserted.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What the two resolver contracts store for a host name. Both adapters share
/// one key space, each one only understands its own variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedRecord {
    Address(IpAddr),
    Resolution(HostResolution),
}

lazy_static! {
    static ref GLOBAL_CACHE: DnsCache = DnsCache::new(DEFAULT_CACHE_SIZE);
}

/// A handle to a cache shared by every resolver holding a clone of it.
#[derive(Clone)]
pub struct DnsCache {
    inner: Arc<Mutex<BoundedCache<String, CachedRecord>>>,
}

impl DnsCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BoundedCache::new(capacity))),
        }
    }

    /// The process wide cache, it lives until the process exits.
    pub fn global() -> Self {
        GLOBAL_CACHE.clone()
    }

    pub fn get(&self, name: &str) -> Option<CachedRecord> {
        self.inner.lock().get(name).cloned()
    }

    pub fn get_address(&self, name: &str) -> Option<IpAddr> {
        match self.inner.lock().get(name) {
            Some(CachedRecord::Address(addr)) => Some(*addr),
            _ => None,
        }
    }

    pub fn get_resolution(&self, name: &str) -> Option<HostResolution> {
        match self.inner.lock().get(name) {
            Some(CachedRecord::Resolution(resolution)) => Some(resolution.clone()),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().contains(name)
    }

    pub fn set(&self, name: impl Into<String>, record: CachedRecord) {
        self.inner.lock().set(name.into(), record);
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn set_capacity(&self, capacity: usize) {
        self.inner.lock().set_capacity(capacity);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl std::fmt::Debug for DnsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("DnsCache")
            .field("capacity", &cache.capacity())
            .field("len", &cache.len())
            .finish()
    }
}
