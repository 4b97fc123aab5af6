//! Request and response bodies shared by the server and the client.

use crate::{Guest, GuestId, Party, PartyId, RsvpStatus};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FindMatchRequest {
    pub query: String,
}

/// Full-party submission. Every id in `guest_ids_in_party` gets written:
/// selected ids become yes, the rest become no.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitRsvpRequest {
    pub party_id: PartyId,
    pub guest_ids_in_party: Vec<GuestId>,
    pub selected_ids: Vec<GuestId>,
}

#[derive(Eq, PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub attending: usize,
    pub declined: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PartyWithGuests {
    pub party: Party,
    pub guests: Vec<Guest>,
}

// Admin bodies each carry the shared secret, checked server-side on
// every call.

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListPartiesRequest {
    pub admin_password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatePartyRequest {
    pub admin_password: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdatePartyRequest {
    pub admin_password: String,
    pub party_id: PartyId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeletePartyRequest {
    pub admin_password: String,
    pub party_id: PartyId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateGuestRequest {
    pub admin_password: String,
    pub party_id: Option<PartyId>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub rsvp_status: RsvpStatus,
    #[serde(default)]
    pub dietary_restrictions: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateGuestRequest {
    pub admin_password: String,
    pub guest_id: GuestId,
    pub party_id: Option<PartyId>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub rsvp_status: RsvpStatus,
    #[serde(default)]
    pub dietary_restrictions: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteGuestRequest {
    pub admin_password: String,
    pub guest_id: GuestId,
}
