use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelType {
    Adventure,
    Leisure,
    Business,
    Family,
    Solo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    Pending,
    Ongoing,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Traveler,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

macro_rules! str_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!(
                        "unknown {} value: {}",
                        stringify!($ty),
                        other
                    )),
                }
            }
        }
    };
}

str_enum!(TravelType {
    Adventure => "ADVENTURE",
    Leisure => "LEISURE",
    Business => "BUSINESS",
    Family => "FAMILY",
    Solo => "SOLO",
});

str_enum!(PlanStatus {
    Pending => "PENDING",
    Ongoing => "ONGOING",
    Completed => "COMPLETED",
});

str_enum!(RequestStatus {
    Pending => "PENDING",
    Accepted => "ACCEPTED",
    Rejected => "REJECTED",
});

str_enum!(UserRole {
    Traveler => "TRAVELER",
    Admin => "ADMIN",
});

str_enum!(UserStatus {
    Active => "ACTIVE",
    Blocked => "BLOCKED",
});

str_enum!(Gender {
    Male => "MALE",
    Female => "FEMALE",
    Other => "OTHER",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [PlanStatus::Pending, PlanStatus::Ongoing, PlanStatus::Completed] {
            assert_eq!(status.as_str().parse::<PlanStatus>().unwrap(), status);
        }
        assert!("CANCELLED".parse::<PlanStatus>().is_err());
    }

    #[test]
    fn test_wire_format_is_screaming_snake() {
        let json = serde_json::to_string(&TravelType::Adventure).unwrap();
        assert_eq!(json, "\"ADVENTURE\"");
        let parsed: RequestStatus = serde_json::from_str("\"ACCEPTED\"").unwrap();
        assert_eq!(parsed, RequestStatus::Accepted);
    }
}
