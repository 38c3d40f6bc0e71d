//! Artifact cache — bounded LRU of validated results keyed by request fingerprint,
//! with single-flight generation.
//!
//! Concurrent misses for the same fingerprint share one in-flight generation: the caller
//! that runs it gets `cache_hit = false`, every caller that waited on it gets
//! `cache_hit = true`. Only successful results are stored. A failed flight is reported to
//! everyone waiting on it and the next request starts a fresh one.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;
use tracing::debug;

use crate::generation::crafter::CraftError;
use crate::generation::models::{GenerationResult, RequestFingerprint};

type Flight = Arc<OnceCell<Result<GenerationResult, CraftError>>>;

struct CacheEntry {
    result: GenerationResult,
    last_used: u64,
}

#[derive(Default)]
struct LruState {
    entries: HashMap<RequestFingerprint, CacheEntry>,
    /// last_used tick → key; the first entry is the eviction candidate.
    recency: BTreeMap<u64, RequestFingerprint>,
    tick: u64,
}

impl LruState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

pub struct ArtifactCache {
    capacity: usize,
    state: Mutex<LruState>,
    in_flight: Mutex<HashMap<RequestFingerprint, Flight>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ArtifactCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(LruState::default()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the cached result marked `cache_hit = true`, refreshing its recency.
    pub fn get(&self, fingerprint: &RequestFingerprint) -> Option<GenerationResult> {
        let mut state = lock(&self.state);
        let tick = state.next_tick();
        let entry = state.entries.get_mut(fingerprint)?;
        let previous = std::mem::replace(&mut entry.last_used, tick);
        let mut result = entry.result.clone();
        state.recency.remove(&previous);
        state.recency.insert(tick, fingerprint.clone());

        result.cache_hit = true;
        Some(result)
    }

    /// Stores `result` (as a miss) and evicts the least recently used entry when full.
    pub fn put(&self, fingerprint: RequestFingerprint, mut result: GenerationResult) {
        result.cache_hit = false;

        let mut state = lock(&self.state);
        let tick = state.next_tick();
        if let Some(old) = state.entries.insert(
            fingerprint.clone(),
            CacheEntry {
                result,
                last_used: tick,
            },
        ) {
            state.recency.remove(&old.last_used);
        }
        state.recency.insert(tick, fingerprint);

        while state.entries.len() > self.capacity {
            let Some((_, evicted)) = state.recency.pop_first() else {
                break;
            };
            state.entries.remove(&evicted);
            debug!("Evicted artifacts {evicted} from cache");
        }
    }

    /// Returns the cached result for `fingerprint`, or runs `generate` exactly once across
    /// all concurrent callers with the same fingerprint and caches a successful outcome.
    pub async fn get_or_generate<F, Fut>(
        &self,
        fingerprint: &RequestFingerprint,
        generate: F,
    ) -> Result<GenerationResult, CraftError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<GenerationResult, CraftError>>,
    {
        if let Some(hit) = self.get(fingerprint) {
            debug!("Cache hit for {fingerprint}");
            return Ok(hit);
        }

        let flight: Flight = lock(&self.in_flight)
            .entry(fingerprint.clone())
            .or_default()
            .clone();

        let mut generated = false;
        let generated_flag = &mut generated;
        let outcome = flight
            .get_or_init(|| async move {
                // A flight for this key may have finished between the lookup above and
                // joining the in-flight table.
                if let Some(hit) = self.get(fingerprint) {
                    return Ok(hit);
                }

                *generated_flag = true;
                debug!("Cache miss for {fingerprint}; generating");
                let outcome = generate().await;
                if let Ok(result) = &outcome {
                    self.put(fingerprint.clone(), result.clone());
                }
                outcome
            })
            .await
            .clone();

        {
            let mut in_flight = lock(&self.in_flight);
            if in_flight
                .get(fingerprint)
                .is_some_and(|current| Arc::ptr_eq(current, &flight))
            {
                in_flight.remove(fingerprint);
            }
        }

        if generated {
            outcome
        } else {
            debug!("Joined in-flight generation for {fingerprint}");
            outcome.map(|mut result| {
                result.cache_hit = true;
                result
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generator::GeneratorKind;
    use crate::generation::models::{CoverLetter, GenerationError};
    use crate::generation::profile::fingerprint;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn sample(body: &str) -> GenerationResult {
        GenerationResult {
            cover_letter: CoverLetter::from_body(body.to_string()),
            tips: vec![],
            cache_hit: false,
            backend: GeneratorKind::Template,
            generated_at: Utc::now(),
        }
    }

    fn key(n: usize) -> RequestFingerprint {
        fingerprint(&format!("job {n}"), "bio")
    }

    #[test]
    fn test_get_marks_hit_and_put_stores_miss() {
        let cache = ArtifactCache::new(4);
        assert!(cache.get(&key(1)).is_none());

        let mut stored = sample("hello");
        stored.cache_hit = true;
        cache.put(key(1), stored);

        let hit = cache.get(&key(1)).unwrap();
        assert!(hit.cache_hit);
        assert_eq!(hit.cover_letter.body, "hello");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = ArtifactCache::new(2);
        cache.put(key(1), sample("one"));
        cache.put(key(2), sample("two"));
        // Touch 1 so 2 becomes the eviction candidate.
        assert!(cache.get(&key(1)).is_some());
        cache.put(key(3), sample("three"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key(1)).is_some());
        assert!(cache.get(&key(2)).is_none());
        assert!(cache.get(&key(3)).is_some());
    }

    #[test]
    fn test_put_replaces_existing_entry() {
        let cache = ArtifactCache::new(2);
        cache.put(key(1), sample("old"));
        cache.put(key(1), sample("new"));
        cache.put(key(2), sample("two"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key(1)).unwrap().cover_letter.body, "new");
    }

    #[tokio::test]
    async fn test_concurrent_misses_generate_once() {
        let cache = Arc::new(ArtifactCache::new(8));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_generate(&key(7), || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(sample("shared"))
                    })
                    .await
            }));
        }

        let mut misses = 0;
        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            assert_eq!(result.cover_letter.body, "shared");
            if !result.cache_hit {
                misses += 1;
            }
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(misses, 1);
        assert!(cache.get(&key(7)).unwrap().cache_hit);
    }

    #[tokio::test]
    async fn test_failures_are_shared_but_not_cached() {
        let cache = ArtifactCache::new(8);
        let err = cache
            .get_or_generate(&key(1), || async {
                Err(CraftError::Generation(GenerationError::UpstreamModelFailure(
                    "boom".to_string(),
                )))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CraftError::Generation(_)));
        assert!(cache.is_empty());

        let ok = cache
            .get_or_generate(&key(1), || async { Ok(sample("retry")) })
            .await
            .unwrap();
        assert!(!ok.cache_hit);
        assert_eq!(cache.len(), 1);
    }
}
