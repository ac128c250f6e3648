use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::errors::ReservationError;

/// One hourly booking unit from the fixed daily schedule. The set is closed:
/// opening hour 9, closing hour 18, the closing hour itself not bookable,
/// giving the nine labels `"09:00"` through `"17:00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(u8);

impl Slot {
    pub const OPEN_HOUR: u8 = 9;
    pub const CLOSE_HOUR: u8 = 18;

    pub fn from_hour(hour: u8) -> Option<Self> {
        (Self::OPEN_HOUR..Self::CLOSE_HOUR).contains(&hour).then_some(Self(hour))
    }

    /// Parse a slot label of the form `"HH:00"`.
    pub fn parse(label: &str) -> Result<Self, ReservationError> {
        let invalid = || {
            ReservationError::Validation(format!(
                "invalid time slot '{label}'; expected an hourly label between {:02}:00 and {:02}:00",
                Self::OPEN_HOUR,
                Self::CLOSE_HOUR - 1
            ))
        };
        let (hh, mm) = label.split_once(':').ok_or_else(invalid)?;
        if mm != "00" || hh.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = hh.parse().map_err(|_| invalid())?;
        Self::from_hour(hour).ok_or_else(invalid)
    }

    pub fn hour(&self) -> u8 {
        self.0
    }

    pub fn label(&self) -> String {
        format!("{:02}:00", self.0)
    }

    /// All slots of a day, ascending.
    pub fn all() -> impl Iterator<Item = Slot> {
        (Self::OPEN_HOUR..Self::CLOSE_HOUR).map(Slot)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Slot::parse(&s).map_err(|e| D::Error::custom(e.to_string()))
    }
}

/// Closed status variant. All transition logic lives here; callers never
/// compare status strings inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => models::reservation::STATUS_PENDING,
            ReservationStatus::Confirmed => models::reservation::STATUS_CONFIRMED,
            ReservationStatus::Rejected => models::reservation::STATUS_REJECTED,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            models::reservation::STATUS_PENDING => Some(Self::Pending),
            models::reservation::STATUS_CONFIRMED => Some(Self::Confirmed),
            models::reservation::STATUS_REJECTED => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Providers may only request one of these two.
    pub fn parse_requested(s: &str) -> Result<Self, ReservationError> {
        match Self::parse(s) {
            Some(st @ (Self::Confirmed | Self::Rejected)) => Ok(st),
            _ => Err(ReservationError::Validation(
                "invalid status; status must be 'confirmed' or 'rejected'".into(),
            )),
        }
    }

    /// The state machine: pending → confirmed, pending → rejected. Both
    /// target states are terminal; there is no un-confirm.
    pub fn transition(self, to: ReservationStatus) -> Result<ReservationStatus, ReservationError> {
        match (self, to) {
            (Self::Pending, Self::Confirmed) | (Self::Pending, Self::Rejected) => Ok(to),
            _ => Err(ReservationError::Validation(format!(
                "illegal transition from '{}' to '{}'",
                self.as_str(),
                to.as_str()
            ))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReservationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReservationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| D::Error::custom(format!("unknown status '{s}'")))
    }
}

/// A reservation as the engine sees it.
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    pub id: Uuid,
    pub proposal_id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub day: NaiveDate,
    pub slot: Slot,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated booking request, produced by
/// [`CreateReservation::validate`](CreateReservation::validate).
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub proposal_id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub day: NaiveDate,
    pub slot: Slot,
}

/// Raw booking intake. Every field is optional on the wire; the legacy
/// client spellings are accepted as aliases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateReservation {
    #[serde(default, alias = "Date")]
    pub date: Option<String>,
    #[serde(default, alias = "Time")]
    pub time: Option<String>,
    #[serde(default, alias = "ServiceProposal")]
    pub proposal_id: Option<Uuid>,
    #[serde(default, alias = "ServiceProvider")]
    pub provider_id: Option<Uuid>,
    #[serde(default, alias = "Client")]
    pub client_id: Option<Uuid>,
}

impl CreateReservation {
    /// All five fields are mandatory; a client cannot book their own
    /// proposal.
    pub fn validate(self) -> Result<NewReservation, ReservationError> {
        let (Some(date), Some(time), Some(proposal_id), Some(provider_id), Some(client_id)) =
            (self.date, self.time, self.proposal_id, self.provider_id, self.client_id)
        else {
            return Err(ReservationError::Validation("all fields are mandatory".into()));
        };
        if client_id == provider_id {
            return Err(ReservationError::Validation("you cannot book your own service".into()));
        }
        let day = parse_day(&date)?;
        let slot = Slot::parse(&time)?;
        Ok(NewReservation { proposal_id, client_id, provider_id, day, slot })
    }
}

/// Parse a calendar day, truncating any time-of-day component. Rejects
/// garbage outright instead of carrying an invalid date forward.
pub fn parse_day(raw: &str) -> Result<NaiveDate, ReservationError> {
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(day);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    Err(ReservationError::Validation(format!("invalid date '{raw}'; expected YYYY-MM-DD")))
}

/// One cell of the availability grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub time: String,
    pub is_available: bool,
}

/// Contact card of one party, shaped for the list views.
#[derive(Debug, Clone, Serialize)]
pub struct PartySummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub address: Option<String>,
    pub photo: Option<String>,
}

/// Proposal card with the linked service name resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalSummary {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub service_name: Option<String>,
}

/// A reservation expanded with its joined records. Any referent that has
/// been deleted since booking comes through as `None`.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationView {
    pub id: Uuid,
    pub day: NaiveDate,
    pub slot: Slot,
    pub status: ReservationStatus,
    pub proposal: Option<ProposalSummary>,
    pub client: Option<PartySummary>,
    pub provider: Option<PartySummary>,
}
