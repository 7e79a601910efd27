/// Selects how a naive calendar timestamp is interpreted or produced.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Zone {
    /// The calendar time is UTC.
    #[default]
    Utc,
    /// The calendar time is in the host's local timezone.
    Local,
}

impl Zone {
    /// Returns `true` for [`Zone::Utc`].
    #[must_use]
    pub const fn is_utc(self) -> bool {
        matches!(self, Self::Utc)
    }
}

impl From<bool> for Zone {
    /// Maps an `is_utc` flag onto a zone.
    fn from(is_utc: bool) -> Self {
        if is_utc { Self::Utc } else { Self::Local }
    }
}
