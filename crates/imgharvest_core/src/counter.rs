/// Successful-download counter with tentative reservations.
///
/// A slot is reserved when a download is dispatched, then either committed
/// after the file is written or released on failure. `committed + reserved`
/// never exceeds `limit`, so in-flight work can never overshoot the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCounter {
    limit: usize,
    committed: usize,
    reserved: usize,
}

impl DownloadCounter {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            committed: 0,
            reserved: 0,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn committed(&self) -> usize {
        self.committed
    }

    pub fn in_flight(&self) -> usize {
        self.reserved
    }

    /// Slots not yet committed or reserved.
    pub fn available(&self) -> usize {
        self.limit - self.committed - self.reserved
    }

    pub fn is_full(&self) -> bool {
        self.committed >= self.limit
    }

    pub fn try_reserve(&mut self) -> bool {
        if self.available() == 0 {
            return false;
        }
        self.reserved += 1;
        true
    }

    /// Sequence number the next committed download will carry (1-based).
    pub fn next_sequence(&self) -> usize {
        self.committed + 1
    }

    /// Confirms a reserved slot and returns the new committed count.
    pub fn commit(&mut self) -> usize {
        debug_assert!(self.reserved > 0, "commit without reservation");
        self.reserved = self.reserved.saturating_sub(1);
        self.committed += 1;
        self.committed
    }

    pub fn release(&mut self) {
        debug_assert!(self.reserved > 0, "release without reservation");
        self.reserved = self.reserved.saturating_sub(1);
    }

    /// Drops every outstanding reservation, e.g. when in-flight work is cancelled.
    pub fn release_all(&mut self) {
        self.reserved = 0;
    }
}
