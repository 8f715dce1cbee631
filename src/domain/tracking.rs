use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete package status reported by tracking events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingStatus {
    PickedUpAtOrigin,
    FacilityTransit,
    OutForDelivery,
    Delivered,
}

impl TrackingStatus {
    pub const ALL: [TrackingStatus; 4] = [
        TrackingStatus::PickedUpAtOrigin,
        TrackingStatus::FacilityTransit,
        TrackingStatus::OutForDelivery,
        TrackingStatus::Delivered,
    ];

    /// Wire name as stored alongside tracking events.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingStatus::PickedUpAtOrigin => "PICKED_UP_AT_ORIGIN",
            TrackingStatus::FacilityTransit => "FACILITY_TRANSIT",
            TrackingStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            TrackingStatus::Delivered => "DELIVERED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrackingStatus::PickedUpAtOrigin => "Picked up at origin",
            TrackingStatus::FacilityTransit => "Transit through facility",
            TrackingStatus::OutForDelivery => "On delivery vehicle",
            TrackingStatus::Delivered => "Delivered",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, TrackingStatus::Delivered)
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tracking status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for TrackingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrackingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Human label for a raw status name; anything unrecognised is "Other status".
pub fn label_for(name: &str) -> &'static str {
    name.parse::<TrackingStatus>()
        .map(|status| status.label())
        .unwrap_or("Other status")
}

/// One status change recorded for a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub status: TrackingStatus,
    pub at: DateTime<Utc>,
}

impl TrackingEvent {
    pub fn new(status: TrackingStatus, at: DateTime<Utc>) -> Self {
        Self { status, at }
    }
}

/// Events newest first. Events sharing a timestamp keep their input order.
pub fn timeline(events: &[TrackingEvent]) -> Vec<TrackingEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| b.at.cmp(&a.at));
    sorted
}

/// Estimated arrival: the pickup event that comes first in the timeline,
/// plus `eta_days`. `None` until the parcel has been picked up.
pub fn eta(events: &[TrackingEvent], eta_days: u32) -> Option<DateTime<Utc>> {
    let pickup = timeline(events)
        .into_iter()
        .find(|event| event.status == TrackingStatus::PickedUpAtOrigin)?;
    pickup
        .at
        .checked_add_signed(Duration::days(i64::from(eta_days)))
}

/// When the parcel reached a final status, if it has.
pub fn delivered_at(events: &[TrackingEvent]) -> Option<DateTime<Utc>> {
    timeline(events)
        .into_iter()
        .find(|event| event.status.is_final())
        .map(|event| event.at)
}
