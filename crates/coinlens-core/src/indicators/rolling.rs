use std::collections::VecDeque;

/// Fixed-size trailing window with an O(1) running sum.
///
/// The sum is compensated (Neumaier) so that sliding over multi-year
/// series does not accumulate visible drift. The window also counts its
/// non-zero members, which lets callers test "all zero" exactly instead of
/// comparing a floating sum against zero.
#[derive(Debug, Clone)]
pub(crate) struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
    sum: f64,
    compensation: f64,
    non_zero: usize,
}

impl RollingWindow {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
            sum: 0.0,
            compensation: 0.0,
            non_zero: 0,
        }
    }

    /// Pushes `value`, evicting the oldest member once the window is full.
    pub(crate) fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            if let Some(evicted) = self.values.pop_front() {
                self.accumulate(-evicted);
                if evicted != 0.0 {
                    self.non_zero -= 1;
                }
            }
        }
        self.values.push_back(value);
        self.accumulate(value);
        if value != 0.0 {
            self.non_zero += 1;
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub(crate) fn all_zero(&self) -> bool {
        self.non_zero == 0
    }

    /// Mean of the window once it holds `capacity` values.
    pub(crate) fn mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        if self.all_zero() {
            return Some(0.0);
        }
        Some((self.sum + self.compensation) / self.capacity as f64)
    }

    fn accumulate(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
    }
}
