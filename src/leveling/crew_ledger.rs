use std::collections::HashMap;

/// Next-free hour per exclusive crew code. Lives for one leveling run.
#[derive(Debug, Default)]
pub(crate) struct CrewLedger {
    next_free: HashMap<String, f64>,
}

impl CrewLedger {
    pub(crate) fn earliest_start(&self, code: &str, ready: f64) -> f64 {
        let free_at = self.next_free.get(code).copied().unwrap_or(0.0);
        ready.max(free_at)
    }

    pub(crate) fn reserve(&mut self, code: &str, finish: f64) {
        self.next_free.insert(code.to_string(), finish);
    }
}
