//! Trailing-edge autosave debounce
//!
//! Every buffer change re-arms the debouncer and hands out a new ticket. The
//! host waits `delay_ms` and fires the ticket; only the ticket from the most
//! recent change is honoured, so a burst of changes saves once, with the last
//! content.

/// Timer request for the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveTicket {
    pub generation: u64,
    pub delay_ms: u32,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay_ms: u32,
    generation: u64,
    pending: bool,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            generation: 0,
            pending: false,
        }
    }

    /// Cancel any pending save and start a new quiet period
    pub fn touch(&mut self) -> AutosaveTicket {
        self.generation += 1;
        self.pending = true;
        self.ticket()
    }

    /// Consume `ticket`; true only for the latest pending ticket
    pub fn fire(&mut self, ticket: AutosaveTicket) -> bool {
        if !self.pending || ticket.generation != self.generation {
            return false;
        }
        self.pending = false;
        true
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Ticket for the pending save, if any
    pub fn pending(&self) -> Option<AutosaveTicket> {
        self.pending.then(|| self.ticket())
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    fn ticket(&self) -> AutosaveTicket {
        AutosaveTicket {
            generation: self.generation,
            delay_ms: self.delay_ms,
        }
    }
}
