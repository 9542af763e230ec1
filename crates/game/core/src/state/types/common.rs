use std::fmt;

/// Unique identifier for a participant in a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipantId(pub u32);

impl ParticipantId {
    /// Conventional identifier for the locally controlled participant.
    pub const PLAYER: Self = Self(0);

    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer resource meter (health-like or shield-like) tracked per participant.
///
/// `current` is always clamped to `[0, maximum]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    /// Removes up to `amount`, returning how much was actually removed.
    pub fn deplete(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Adds up to `amount` without exceeding the maximum, returning the gain.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.maximum - self.current);
        self.current += gained;
        gained
    }

    /// Overwrites the current value, clamped to the maximum.
    pub fn set(&mut self, value: u32) {
        self.current = value.min(self.maximum);
    }

    pub fn missing(&self) -> u32 {
        self.maximum - self.current
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Current value as a percentage of the maximum (0 when maximum is 0).
    pub fn percent(&self) -> u32 {
        if self.maximum == 0 {
            return 0;
        }
        (u64::from(self.current) * 100 / u64::from(self.maximum)) as u32
    }
}

impl fmt::Display for ResourceMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.maximum)
    }
}
