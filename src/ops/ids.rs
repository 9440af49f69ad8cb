//! Identifier generation for new categories and items.
//!
//! Ids are opaque strings. The default generator emits millisecond
//! timestamps so new ids match the ones already found in stored data.

use chrono::Utc;

/// Source of fresh ids. `taken` reports whether an id is already in use
/// in the target collection; a generator must never return such an id.
pub trait IdGenerator {
    fn next_id(&mut self, taken: &dyn Fn(&str) -> bool) -> String;
}

/// Millisecond-timestamp ids, strictly increasing within a process.
#[derive(Debug, Default)]
pub struct TimestampIds {
    last: i64,
}

impl TimestampIds {
    pub fn new() -> Self {
        TimestampIds::default()
    }
}

impl IdGenerator for TimestampIds {
    fn next_id(&mut self, taken: &dyn Fn(&str) -> bool) -> String {
        let mut candidate = Utc::now().timestamp_millis().max(self.last + 1);
        while taken(&candidate.to_string()) {
            candidate += 1;
        }
        self.last = candidate;
        candidate.to_string()
    }
}

/// Deterministic `prefix1`, `prefix2`, … ids for tests and fixtures.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: u64,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        SequentialIds {
            prefix: prefix.to_string(),
            counter: 0,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, taken: &dyn Fn(&str) -> bool) -> String {
        loop {
            self.counter += 1;
            let id = format!("{}{}", self.prefix, self.counter);
            if !taken(&id) {
                return id;
            }
        }
    }
}
