//! Debounced notification of the thread's rendered height.

use std::fmt;
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Reports height changes to the host once they settle.
///
/// `observe` is fed every measured height (typically once per frame) and
/// `poll` fires the callback when a new height has held for the debounce
/// window. Identical heights are never reported twice in a row.
pub struct HeightMonitor {
    debounce: Duration,
    callback: Box<dyn FnMut(u32)>,
    observed: Option<(u32, Instant)>,
    reported: Option<u32>,
}

impl HeightMonitor {
    pub fn new(debounce: Duration, callback: impl FnMut(u32) + 'static) -> Self {
        Self {
            debounce,
            callback: Box::new(callback),
            observed: None,
            reported: None,
        }
    }

    pub fn observe(&mut self, height: u32, now: Instant) {
        match self.observed {
            Some((current, _)) if current == height => {}
            _ => self.observed = Some((height, now)),
        }
    }

    /// Returns `true` if the callback fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some((height, since)) = self.observed else {
            return false;
        };
        if self.reported == Some(height) || now.duration_since(since) < self.debounce {
            return false;
        }
        self.reported = Some(height);
        (self.callback)(height);
        true
    }

    #[must_use]
    pub const fn last_reported(&self) -> Option<u32> {
        self.reported
    }
}

impl fmt::Debug for HeightMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeightMonitor")
            .field("debounce", &self.debounce)
            .field("observed", &self.observed)
            .field("reported", &self.reported)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn monitor() -> (HeightMonitor, Rc<RefCell<Vec<u32>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let monitor = HeightMonitor::new(DEFAULT_DEBOUNCE, move |h| sink.borrow_mut().push(h));
        (monitor, log)
    }

    #[test]
    fn burst_of_changes_reports_final_height_once() {
        let (mut monitor, log) = monitor();
        let start = Instant::now();
        let ms = |n| start + Duration::from_millis(n);

        monitor.observe(10, ms(0));
        monitor.observe(12, ms(20));
        assert!(!monitor.poll(ms(40)));
        monitor.observe(15, ms(40));
        assert!(!monitor.poll(ms(80)));
        assert!(monitor.poll(ms(90)));
        assert!(!monitor.poll(ms(200)));

        assert_eq!(*log.borrow(), vec![15]);
    }

    #[test]
    fn repeated_height_does_not_restart_the_window() {
        let (mut monitor, log) = monitor();
        let start = Instant::now();
        let ms = |n| start + Duration::from_millis(n);

        monitor.observe(7, ms(0));
        monitor.observe(7, ms(30));
        assert!(monitor.poll(ms(50)));
        monitor.observe(7, ms(60));
        assert!(!monitor.poll(ms(500)));

        assert_eq!(*log.borrow(), vec![7]);
        assert_eq!(monitor.last_reported(), Some(7));
    }

    #[test]
    fn returning_to_reported_height_is_silent() {
        let (mut monitor, log) = monitor();
        let start = Instant::now();
        let ms = |n| start + Duration::from_millis(n);

        monitor.observe(5, ms(0));
        monitor.poll(ms(60));
        monitor.observe(9, ms(70));
        monitor.observe(5, ms(80));
        monitor.poll(ms(200));

        assert_eq!(*log.borrow(), vec![5]);
    }
}
