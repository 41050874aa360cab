//! Request bookkeeping shared by the list controllers.

/// Lifecycle of a re-entrant list fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// Last request succeeded.
    Loaded,
    /// Last request failed; previously loaded rows are kept.
    Failed(String),
}

/// What happened when a response was handed back to a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the controller's rows.
    Applied,
    /// A newer request was issued meanwhile; the response was dropped.
    Stale,
    /// The backend rejected the token. The caller must route to login.
    SessionExpired,
    /// The request failed with a message meant for the user.
    Failed(String),
}

/// Monotonic request generation. Only the response matching the latest
/// issued generation may touch controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSeq(u64);

impl RequestSeq {
    /// Issue the next generation.
    pub fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    /// Whether `generation` is still the latest issued one.
    pub fn is_current(&self, generation: u64) -> bool {
        self.0 == generation
    }
}
