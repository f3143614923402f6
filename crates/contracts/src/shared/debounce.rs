/// Debounced value driven by an external clock (milliseconds).
///
/// Every `push` restarts the delay; `poll` hands out the last pushed value
/// once the delay has elapsed without another push.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
    settled: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
            settled: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn push(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms));
    }

    /// Returns the newly settled value, if it changed
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        let ready = matches!(&self.pending, Some((_, at)) if now_ms.saturating_sub(*at) >= self.delay_ms);
        if !ready {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if self.settled.as_ref() == Some(&value) {
            return None;
        }
        self.settled = Some(value.clone());
        Some(value)
    }

    /// Push and settle immediately (used by "clear" buttons)
    pub fn flush(&mut self, value: T) -> Option<T> {
        self.pending = None;
        if self.settled.as_ref() == Some(&value) {
            return None;
        }
        self.settled = Some(value.clone());
        Some(value)
    }

    pub fn settled(&self) -> Option<&T> {
        self.settled.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settles_to_last_keystroke() {
        let mut d = Debouncer::new(150);
        d.push("s".to_string(), 0);
        d.push("so".to_string(), 60);
        d.push("sof".to_string(), 120);
        assert_eq!(d.poll(200), None);
        assert!(d.is_pending());
        assert_eq!(d.poll(270), Some("sof".to_string()));
        assert_eq!(d.settled().map(String::as_str), Some("sof"));
        assert_eq!(d.poll(1000), None);
    }

    #[test]
    fn test_repeated_value_is_not_emitted_twice() {
        let mut d = Debouncer::new(100);
        d.push(1, 0);
        assert_eq!(d.poll(100), Some(1));
        d.push(1, 150);
        assert_eq!(d.poll(300), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn test_flush() {
        let mut d = Debouncer::new(100);
        d.push("abc".to_string(), 0);
        assert_eq!(d.flush(String::new()), Some(String::new()));
        assert_eq!(d.poll(500), None);
    }
}
