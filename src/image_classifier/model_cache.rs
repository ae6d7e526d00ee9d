use crate::image_classifier::interface::ClassifierError;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Holds one loaded model for the whole process.
///
/// The first caller loads it while holding the lock, so concurrent callers
/// wait instead of loading twice. A failed load leaves the slot empty and the
/// next call tries again. Within one call the loader is attempted up to
/// `attempts` times with `retry_delay` in between.
pub struct ModelCache<M> {
    slot: Mutex<Option<Arc<M>>>,
    attempts: u32,
    retry_delay: Duration,
}

impl<M> ModelCache<M> {
    pub fn new(attempts: u32, retry_delay: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            attempts: attempts.max(1),
            retry_delay,
        }
    }

    pub fn get_or_load<F>(&self, mut load: F) -> Result<Arc<M>, ClassifierError>
    where
        F: FnMut() -> Result<M, Box<dyn std::error::Error + Send + Sync>>,
    {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ClassifierError::ModelLoad("model cache lock poisoned".to_string()))?;

        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        let mut last_error = String::new();
        for attempt in 1..=self.attempts {
            match load() {
                Ok(model) => {
                    let model = Arc::new(model);
                    *slot = Some(Arc::clone(&model));
                    return Ok(model);
                }
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < self.attempts {
                        std::thread::sleep(self.retry_delay);
                    }
                }
            }
        }

        Err(ClassifierError::ModelLoad(format!(
            "{} (gave up after {} attempts)",
            last_error, self.attempts
        )))
    }

    #[allow(dead_code)]
    pub fn is_loaded(&self) -> bool {
        self.slot.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_loads_once() {
        let cache = ModelCache::new(3, Duration::ZERO);
        let loads = AtomicUsize::new(0);

        for _ in 0..5 {
            let model = cache
                .get_or_load(|| {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok("mobilenet".to_string())
                })
                .unwrap();
            assert_eq!(model.as_str(), "mobilenet");
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(cache.is_loaded());
    }

    #[test]
    fn test_transient_failure_is_retried_within_call() {
        let cache = ModelCache::new(3, Duration::ZERO);
        let mut calls = 0;

        let model = cache
            .get_or_load(|| {
                calls += 1;
                if calls < 3 {
                    Err("network hiccup".into())
                } else {
                    Ok(42)
                }
            })
            .unwrap();

        assert_eq!(*model, 42);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_failure_is_not_cached() {
        let cache: ModelCache<u32> = ModelCache::new(2, Duration::ZERO);

        let first = cache.get_or_load(|| Err("offline".into()));
        match first {
            Err(ClassifierError::ModelLoad(message)) => {
                assert!(message.contains("offline"));
                assert!(message.contains("2 attempts"));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
        assert!(!cache.is_loaded());

        let second = cache.get_or_load(|| Ok(7)).unwrap();
        assert_eq!(*second, 7);
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(ModelCache::new(1, Duration::ZERO));
        let loads = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let loads = Arc::clone(&loads);
                std::thread::spawn(move || {
                    cache
                        .get_or_load(|| {
                            loads.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(Duration::from_millis(20));
                            Ok(1u8)
                        })
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
