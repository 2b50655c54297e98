//! Glint Parse Cache
//!
//! Expressions in templates repeat heavily, so parse results are cached
//! per source string for the life of the process. Two access paths share
//! one cache: a blocking `get_or_parse` for callers that need the result
//! now, and a non-blocking `get` that schedules a background parse and
//! returns immediately, for callers on a frame budget.
//!
//! Lock discipline: the result map is a coarse `Mutex` and the blocking
//! path parses while holding it, so a given string is parsed at most once
//! no matter how many threads race on it. The in-flight map is a separate
//! lock; background submissions for a string already being parsed just
//! queue their notification instead of spawning another worker.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;

use once_cell::sync::Lazy;

use glint_expr::{parse, ParseResult};

static GLOBAL: Lazy<ParseCache> = Lazy::new(ParseCache::new);

type Notify = Box<dyn FnOnce(Arc<ParseResult>) + Send>;

/// Cloneable handle to a shared parse cache.
#[derive(Clone)]
pub struct ParseCache {
    inner: Arc<Inner>,
}

struct Inner {
    results: Mutex<HashMap<String, Arc<ParseResult>>>,
    in_flight: Mutex<HashMap<String, Vec<Notify>>>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                results: Mutex::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// The process-wide cache.
    pub fn global() -> &'static ParseCache {
        &GLOBAL
    }

    /// Blocking path: return the cached result, parsing it first if
    /// needed. Parsing happens under the result lock, so concurrent
    /// callers for the same string wait instead of re-parsing.
    pub fn get_or_parse(&self, source: &str) -> Arc<ParseResult> {
        let mut results = self.inner.results.lock().expect("cache lock poisoned");
        Arc::clone(
            results
                .entry(source.to_string())
                .or_insert_with(|| Arc::new(parse(source))),
        )
    }

    /// Non-blocking path: the cached result if the string has been parsed,
    /// otherwise `None` after scheduling a background parse so a later
    /// call finds it ready.
    pub fn get(&self, source: &str) -> Option<Arc<ParseResult>> {
        let cached = self.cached(source);
        if cached.is_none() {
            self.parse_in_background(source, |_| {});
        }
        cached
    }

    /// Schedule a parse and get the result delivered to `notify` on a
    /// worker thread. If the result is already cached the notification
    /// runs immediately on the calling thread. Every registered
    /// notification fires exactly once; submissions for a string already
    /// in flight share its worker.
    pub fn parse_in_background(
        &self,
        source: &str,
        notify: impl FnOnce(Arc<ParseResult>) + Send + 'static,
    ) {
        if let Some(cached) = self.cached(source) {
            notify(cached);
            return;
        }

        let first_waiter = {
            let mut in_flight = self.inner.in_flight.lock().expect("cache lock poisoned");
            let waiters = in_flight.entry(source.to_string()).or_default();
            waiters.push(Box::new(notify));
            waiters.len() == 1
        };

        if first_waiter {
            let cache = self.clone();
            let source = source.to_string();
            thread::spawn(move || {
                let result = cache.get_or_parse(&source);
                // The result is cached before the waiter list is taken, so
                // a submission landing in between either sees the cache or
                // gets drained here.
                let waiters = cache
                    .inner
                    .in_flight
                    .lock()
                    .expect("cache lock poisoned")
                    .remove(&source)
                    .unwrap_or_default();
                for waiter in waiters {
                    waiter(Arc::clone(&result));
                }
            });
        }
    }

    fn cached(&self, source: &str) -> Option<Arc<ParseResult>> {
        self.inner
            .results
            .lock()
            .expect("cache lock poisoned")
            .get(source)
            .cloned()
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new()
    }
}
