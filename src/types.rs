use std::fmt;

/// A single controllable/observable property of the accessory, exposed
/// to the platform as an independent get/set pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Characteristic {
    Active,
    RotationSpeed,
}

impl Characteristic {
    pub fn as_name(&self) -> &'static str {
        match self {
            Characteristic::Active => "Active",
            Characteristic::RotationSpeed => "RotationSpeed",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(Characteristic::Active),
            "RotationSpeed" => Some(Characteristic::RotationSpeed),
            _ => None,
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_name())
    }
}

/// Fan power state. Wire form is 0 (inactive) or 1 (active).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveState {
    Inactive,
    Active,
}

impl ActiveState {
    pub fn as_i64(&self) -> i64 {
        match self {
            ActiveState::Inactive => 0,
            ActiveState::Active => 1,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(ActiveState::Inactive),
            1 => Some(ActiveState::Active),
            _ => None,
        }
    }
}

impl fmt::Display for ActiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveState::Inactive => f.write_str("INACTIVE"),
            ActiveState::Active => f.write_str("ACTIVE"),
        }
    }
}

/// Emitted to the platform when an externally pushed update lands on a
/// characteristic.
#[derive(Debug, Clone)]
pub struct CharacteristicUpdate {
    pub characteristic: Characteristic,
    pub value: i64,
}
