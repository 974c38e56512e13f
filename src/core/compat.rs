use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string is not one of the 8 recognized ABO/Rh types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid blood type: {0}")]
pub struct InvalidBloodType(pub String);

/// The 8 ABO/Rh blood types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "O-")]
    ONeg,
    #[serde(rename = "O+")]
    OPos,
    #[serde(rename = "A-")]
    ANeg,
    #[serde(rename = "A+")]
    APos,
    #[serde(rename = "B-")]
    BNeg,
    #[serde(rename = "B+")]
    BPos,
    #[serde(rename = "AB-")]
    AbNeg,
    #[serde(rename = "AB+")]
    AbPos,
}

/// All recognized blood types, in the conventional table order
pub const ALL_BLOOD_TYPES: [BloodType; 8] = [
    BloodType::ONeg,
    BloodType::OPos,
    BloodType::ANeg,
    BloodType::APos,
    BloodType::BNeg,
    BloodType::BPos,
    BloodType::AbNeg,
    BloodType::AbPos,
];

impl BloodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::ONeg => "O-",
            BloodType::OPos => "O+",
            BloodType::ANeg => "A-",
            BloodType::APos => "A+",
            BloodType::BNeg => "B-",
            BloodType::BPos => "B+",
            BloodType::AbNeg => "AB-",
            BloodType::AbPos => "AB+",
        }
    }

    /// Blood types a donor of this type may safely give to
    ///
    /// Standard ABO/Rh compatibility table: O- is the universal donor,
    /// AB+ is the universal recipient.
    pub fn compatible_recipients(&self) -> &'static [BloodType] {
        use BloodType::*;
        match self {
            ONeg => &[ONeg, OPos, ANeg, APos, BNeg, BPos, AbNeg, AbPos],
            OPos => &[OPos, APos, BPos, AbPos],
            ANeg => &[ANeg, APos, AbNeg, AbPos],
            APos => &[APos, AbPos],
            BNeg => &[BNeg, BPos, AbNeg, AbPos],
            BPos => &[BPos, AbPos],
            AbNeg => &[AbNeg, AbPos],
            AbPos => &[AbPos],
        }
    }

    /// True if this donor type may give to the recipient type
    #[inline]
    pub fn can_donate_to(&self, recipient: BloodType) -> bool {
        self.compatible_recipients().contains(&recipient)
    }

    /// Blood types a recipient of this type may safely receive from
    ///
    /// Derived from the recipient table so the two directions cannot drift
    /// out of sync.
    pub fn compatible_donors(&self) -> Vec<BloodType> {
        ALL_BLOOD_TYPES
            .iter()
            .copied()
            .filter(|donor| donor.can_donate_to(*self))
            .collect()
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = InvalidBloodType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "O-" => Ok(BloodType::ONeg),
            "O+" => Ok(BloodType::OPos),
            "A-" => Ok(BloodType::ANeg),
            "A+" => Ok(BloodType::APos),
            "B-" => Ok(BloodType::BNeg),
            "B+" => Ok(BloodType::BPos),
            "AB-" => Ok(BloodType::AbNeg),
            "AB+" => Ok(BloodType::AbPos),
            other => Err(InvalidBloodType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_types() {
        for bt in ALL_BLOOD_TYPES {
            let parsed: BloodType = bt.as_str().parse().unwrap();
            assert_eq!(parsed, bt);
        }
    }

    #[test]
    fn test_parse_invalid() {
        assert!("C+".parse::<BloodType>().is_err());
        assert!("".parse::<BloodType>().is_err());
        assert!("o-".parse::<BloodType>().is_err());
    }

    #[test]
    fn test_universal_donor() {
        for bt in ALL_BLOOD_TYPES {
            assert!(BloodType::ONeg.can_donate_to(bt), "O- should donate to {}", bt);
        }
    }

    #[test]
    fn test_universal_recipient() {
        for bt in ALL_BLOOD_TYPES {
            assert!(bt.can_donate_to(BloodType::AbPos), "{} should donate to AB+", bt);
        }
    }

    #[test]
    fn test_directions_consistent() {
        // X donates to Y iff X is among Y's compatible donors
        for donor in ALL_BLOOD_TYPES {
            for recipient in ALL_BLOOD_TYPES {
                assert_eq!(
                    donor.can_donate_to(recipient),
                    recipient.compatible_donors().contains(&donor),
                    "inconsistent table for {} -> {}",
                    donor,
                    recipient
                );
            }
        }
    }

    #[test]
    fn test_rh_negative_never_receives_positive() {
        use BloodType::*;
        for donor in [OPos, APos, BPos, AbPos] {
            for recipient in [ONeg, ANeg, BNeg, AbNeg] {
                assert!(!donor.can_donate_to(recipient));
            }
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&BloodType::AbPos).unwrap();
        assert_eq!(json, "\"AB+\"");
        let back: BloodType = serde_json::from_str("\"O-\"").unwrap();
        assert_eq!(back, BloodType::ONeg);
    }
}
