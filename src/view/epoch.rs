//! Request epochs: drop responses that arrive after a newer request started.

/// Monotonic counter for one kind of request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestEpoch {
    latest: u64,
}

/// Captured when a request starts; compared again when its response lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

impl RequestEpoch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every earlier token
    pub fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Supersede outstanding tokens without starting a request
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_token_wins() {
        let mut epoch = RequestEpoch::new();
        let first = epoch.begin();
        let second = epoch.begin();

        assert!(!epoch.is_current(first));
        assert!(epoch.is_current(second));
    }

    #[test]
    fn test_invalidate() {
        let mut epoch = RequestEpoch::new();
        let token = epoch.begin();
        epoch.invalidate();

        assert!(!epoch.is_current(token));
    }
}
