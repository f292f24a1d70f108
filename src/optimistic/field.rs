//! Single optimistically-updated value.

/// Where a field stands relative to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    /// Displayed value matches the last known server value.
    Confirmed,
    /// Locally mutated, awaiting the server.
    Pending,
    /// The last mutation failed and the prior value was restored.
    Reverted,
}

/// Identifies one in-flight mutation of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// A displayed value plus the server value it falls back to.
///
/// At most one mutation is pending at a time. [`begin`](Self::begin)
/// refuses to start a second one, and settling with anything but the
/// current ticket is ignored.
#[derive(Debug, Clone)]
pub struct OptimisticField<T> {
    displayed: T,
    confirmed: T,
    status: FieldStatus,
    pending: Option<Ticket>,
    next_ticket: u64,
}

impl<T: Clone> OptimisticField<T> {
    pub fn new(value: T) -> Self {
        Self {
            displayed: value.clone(),
            confirmed: value,
            status: FieldStatus::Confirmed,
            pending: None,
            next_ticket: 0,
        }
    }

    pub fn displayed(&self) -> &T {
        &self.displayed
    }

    pub fn confirmed(&self) -> &T {
        &self.confirmed
    }

    pub fn status(&self) -> FieldStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply `f` to the displayed value and mark the field pending.
    ///
    /// Returns `None` without touching anything if a mutation is already
    /// in flight.
    pub fn begin(&mut self, f: impl FnOnce(&T) -> T) -> Option<(Ticket, T)> {
        if self.pending.is_some() {
            return None;
        }
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        let next = f(&self.displayed);
        self.displayed = next.clone();
        self.status = FieldStatus::Pending;
        self.pending = Some(ticket);
        Some((ticket, next))
    }

    /// Settle a successful mutation.
    ///
    /// The authoritative value replaces the optimistic guess when present.
    pub fn commit(&mut self, ticket: Ticket, authoritative: Option<T>) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        if let Some(value) = authoritative {
            self.displayed = value;
        }
        self.confirmed = self.displayed.clone();
        self.status = FieldStatus::Confirmed;
        self.pending = None;
        true
    }

    /// Settle a failed mutation by restoring the last confirmed value.
    pub fn revert(&mut self, ticket: Ticket) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.displayed = self.confirmed.clone();
        self.status = FieldStatus::Reverted;
        self.pending = None;
        true
    }

    /// Take a fresh server value from a refresh.
    ///
    /// While a mutation is pending only the rollback baseline moves; the
    /// optimistic value stays on screen until the mutation settles.
    pub fn sync(&mut self, value: T) {
        if self.pending.is_some() {
            self.confirmed = value;
        } else {
            self.displayed = value.clone();
            self.confirmed = value;
            self.status = FieldStatus::Confirmed;
        }
    }
}
