use serde::{Deserialize, Serialize};

/// How playback continues once the current track ends.
///
/// Persisted as the integers `0`, `1` and `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "u8", into = "u8")]
pub enum RepeatMode {
    /// Advance through the list and stop at its end.
    #[default]
    Off,
    /// Advance through the list, wrapping around at its end.
    All,
    /// Replay the current track.
    One,
}

impl RepeatMode {
    /// All modes, in cycling order.
    pub const ALL: [RepeatMode; 3] = [RepeatMode::Off, RepeatMode::All, RepeatMode::One];

    /// Returns the mode after this one, wrapping back to [`RepeatMode::Off`].
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    /// Returns a human-readable name for the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatMode::Off => "Repeat Off",
            RepeatMode::All => "Repeat All",
            RepeatMode::One => "Repeat One",
        }
    }
}

impl From<u8> for RepeatMode {
    fn from(value: u8) -> Self {
        match value {
            1 => RepeatMode::All,
            2 => RepeatMode::One,
            _ => RepeatMode::Off,
        }
    }
}

impl From<RepeatMode> for u8 {
    fn from(mode: RepeatMode) -> Self {
        match mode {
            RepeatMode::Off => 0,
            RepeatMode::All => 1,
            RepeatMode::One => 2,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_all_modes() {
        let mut mode = RepeatMode::Off;
        for expected in [RepeatMode::All, RepeatMode::One, RepeatMode::Off] {
            mode = mode.cycle();
            assert_eq!(mode, expected);
        }
    }

    #[test]
    fn unknown_integers_fall_back_to_off() {
        assert_eq!(RepeatMode::from(2), RepeatMode::One);
        assert_eq!(RepeatMode::from(7), RepeatMode::Off);
        assert_eq!(u8::from(RepeatMode::All), 1);
    }
}
