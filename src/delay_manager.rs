use std::cell::Cell;
use std::time::Duration;
use std::thread;
use log::info;

/// Fixed pause between rows that hit the network. Not adaptive.
#[derive(Debug, Clone)]
pub struct DelayManager {
    row_delay: Duration,
    pauses: Cell<usize>,
}

impl DelayManager {
    pub fn new(row_delay: Duration) -> Self {
        DelayManager { row_delay, pauses: Cell::new(0) }
    }

    pub fn row_delay(&self) {
        self.pauses.set(self.pauses.get() + 1);
        if self.row_delay.is_zero() {
            return;
        }
        info!("Waiting for {} seconds (Row Delay)...", self.row_delay.as_secs_f32());
        thread::sleep(self.row_delay);
    }

    /// How many row delays have been taken so far.
    pub fn pauses(&self) -> usize {
        self.pauses.get()
    }
}
