use crate::common_types::RawTextRegion;
use crate::AppResult;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

mod ocrs_reader;
pub use ocrs_reader::*;

/// A constructed OCR engine instance bound to one fixed set of languages.
/// Implementations must be safe to share across concurrent requests.
pub trait OcrReader {
    fn read_text(&self, image: &[u8]) -> AppResult<Vec<RawTextRegion>>;
}

pub type ReaderHandle = Arc<dyn OcrReader + Send + Sync>;

pub type ReaderFactory = Box<dyn Fn(&[String]) -> AppResult<ReaderHandle> + Send + Sync>;

/// Canonical cache key for a set of language codes: sorted and joined with
/// commas, so permutations of the same set map to the same key.
pub fn cache_key(languages: &[String]) -> String {
    let mut codes: Vec<&str> = languages.iter().map(String::as_str).collect();
    codes.sort_unstable();
    codes.join(",")
}

/// Process-wide cache of OCR readers keyed by canonical language set.
///
/// The single mutex covers the whole lookup-or-create section, so a reader is
/// constructed at most once per key even under concurrent requests; requests
/// for a new key queue behind the first one's construction. Entries are never
/// evicted. A failed construction inserts nothing, so the next request for
/// the same key retries.
pub struct ReaderCache {
    readers: tokio::sync::Mutex<HashMap<String, ReaderHandle>>,
    factory: ReaderFactory,
}

impl ReaderCache {
    pub fn new(factory: ReaderFactory) -> Self {
        ReaderCache {
            readers: tokio::sync::Mutex::new(HashMap::new()),
            factory,
        }
    }

    pub async fn get_or_create(&self, languages: &[String]) -> AppResult<ReaderHandle> {
        let key = cache_key(languages);
        let mut readers = self.readers.lock().await;
        if let Some(reader) = readers.get(&key) {
            info!("Using cached OCR reader for languages: {key}");
            return Ok(reader.clone());
        }

        let reader = (self.factory)(languages)?;
        readers.insert(key.clone(), reader.clone());
        info!("Cached new OCR reader for languages: {key}");
        Ok(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoopReader;

    impl OcrReader for NoopReader {
        fn read_text(&self, _image: &[u8]) -> AppResult<Vec<RawTextRegion>> {
            Ok(vec![])
        }
    }

    fn counting_cache(constructions: Arc<AtomicUsize>) -> ReaderCache {
        ReaderCache::new(Box::new(move |_languages| {
            constructions.fetch_add(1, Ordering::SeqCst);
            // Widen the window in which a racing lookup could observe a
            // missing entry.
            std::thread::sleep(std::time::Duration::from_millis(20));
            Ok(Arc::new(NoopReader) as ReaderHandle)
        }))
    }

    #[test]
    fn test_cache_key_is_permutation_invariant() {
        assert_eq!(cache_key(&["en".to_string(), "ko".to_string()]), "en,ko");
        assert_eq!(cache_key(&["ko".to_string(), "en".to_string()]), "en,ko");
        assert_eq!(cache_key(&["en".to_string()]), "en");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_get_or_create_constructs_once() {
        let constructions = Arc::new(AtomicUsize::new(0));
        let cache = Arc::new(counting_cache(constructions.clone()));

        let mut tasks = vec![];
        for _ in 0..8 {
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move {
                cache
                    .get_or_create(&["en".to_string(), "ko".to_string()])
                    .await
                    .unwrap()
            }));
        }

        let mut handles = vec![];
        for task in tasks {
            handles.push(task.await.unwrap());
        }

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        for handle in &handles[1..] {
            assert!(Arc::ptr_eq(&handles[0], handle));
        }
    }

    #[tokio::test]
    async fn test_permutations_share_one_reader() {
        let constructions = Arc::new(AtomicUsize::new(0));
        let cache = counting_cache(constructions.clone());

        let first = cache
            .get_or_create(&["en".to_string(), "ko".to_string()])
            .await
            .unwrap();
        let second = cache
            .get_or_create(&["ko".to_string(), "en".to_string()])
            .await
            .unwrap();

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_failed_construction_is_not_cached() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_in_factory = attempts.clone();
        let cache = ReaderCache::new(Box::new(move |languages| {
            attempts_in_factory.fetch_add(1, Ordering::SeqCst);
            Err(AppError::UnsupportedLanguage {
                code: languages[0].clone(),
            })
        }));

        assert!(cache.get_or_create(&["xx".to_string()]).await.is_err());
        assert!(cache.get_or_create(&["xx".to_string()]).await.is_err());
        // Both calls must reach the factory; a failure never poisons the key.
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
