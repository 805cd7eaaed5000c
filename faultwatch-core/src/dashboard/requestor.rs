//! Request Sequencing
//!
//! Overlapping requests are allowed. Each one gets a token from a monotonic
//! sequence and only the response to the newest token is applied.

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues tokens and tracks how many are still unanswered
#[derive(Debug, Clone, Default)]
pub struct TokenSequence {
    latest: u64,
    in_flight: usize,
}

impl TokenSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        self.in_flight += 1;
        RequestToken(self.latest)
    }

    /// Mark `token` answered. Returns whether its response should be applied.
    pub fn settle(&mut self, token: RequestToken) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.is_latest(token)
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

/// Observable state of the prediction requestor.
///
/// Validation and chart updates happen synchronously inside a single call,
/// so only the waiting state is visible between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    /// At least one `/predict` call is unanswered
    Requesting,
}
