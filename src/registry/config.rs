//! Registry configuration

/// What to do with a subscriber whose buffer is full at broadcast time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Remove the subscriber; its stream ends and the viewer reconnects and resyncs
    #[default]
    Disconnect,
    /// Skip this update for the subscriber and keep it registered
    DropUpdate,
}

/// Subscriber registry configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Snapshots buffered per subscriber (minimum 1)
    pub subscriber_buffer: usize,

    /// Policy for subscribers that fall behind
    pub overflow: OverflowPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            subscriber_buffer: 16,
            overflow: OverflowPolicy::Disconnect,
        }
    }
}

impl RegistryConfig {
    /// Set the per-subscriber buffer size
    ///
    /// At least one slot is always kept so the resync snapshot fits.
    pub fn subscriber_buffer(mut self, capacity: usize) -> Self {
        self.subscriber_buffer = capacity.max(1);
        self
    }

    /// Set the overflow policy
    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }
}
