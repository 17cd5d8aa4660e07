/// What a tracker does when a name is minted again while its previous
/// endpoint is still alive.
///
/// Re-minting always orphans the previous entry from name lookup; existing
/// handles and their attachments are left untouched either way. A previous
/// entry whose endpoint is already gone never counts as reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameReuse {
    /// Replace the entry without comment
    Overwrite,
    /// Replace the entry and log a warning
    #[default]
    Warn,
    /// Refuse to mint while the previous endpoint is alive
    Reject,
}

/// Configuration for a [`Tracker`](crate::Tracker)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackerConfig {
    pub name_reuse: NameReuse,
}

impl TrackerConfig {
    pub fn new() -> Self { Self::default() }

    pub fn with_name_reuse(mut self, name_reuse: NameReuse) -> Self {
        self.name_reuse = name_reuse;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_warns() {
        assert_eq!(TrackerConfig::new().name_reuse, NameReuse::Warn);
        assert_eq!(TrackerConfig::new().with_name_reuse(NameReuse::Reject).name_reuse, NameReuse::Reject);
    }
}
