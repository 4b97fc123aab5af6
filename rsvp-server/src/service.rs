//! Business operations over the guest store: party matching, RSVP
//! submission, and the admin curation calls.

use crate::auth::AdminAuth;
use crate::store::{GuestStore, StoreError};
use rsvp_common::api::{
    CreateGuestRequest, CreatePartyRequest, DeleteGuestRequest, DeletePartyRequest,
    ListPartiesRequest, PartyWithGuests, SubmitOutcome, SubmitRsvpRequest, UpdateGuestRequest,
    UpdatePartyRequest,
};
use rsvp_common::{matcher, Attendance, Guest, GuestId, MatchResult, Party, PartyId};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Shown when a matched guest has no party record to name.
pub const FALLBACK_PARTY_NAME: &str = "Your Party";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("admin password rejected")]
    Unauthorized,
    #[error("{0}")]
    Invalid(String),
    #[error("party not found: {0}")]
    PartyNotFound(PartyId),
    #[error("guest not found: {0}")]
    GuestNotFound(GuestId),
    #[error("a submission needs at least one guest id in the party")]
    EmptyParty,
    #[error("selected guest {0} is not in the submitted party")]
    SelectionOutsideParty(GuestId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn require_admin(auth: &AdminAuth, supplied: &str) -> Result<(), ServiceError> {
    if auth.verify(supplied) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Match free text against every guest and assemble the winning guest's
/// party view. Read-only; `None` means nothing to search or nothing to
/// search against, never a failure.
pub fn find_party_match(
    store: &dyn GuestStore,
    query: &str,
) -> Result<Option<MatchResult>, ServiceError> {
    if query.trim().is_empty() {
        return Ok(None);
    }
    let guests = store.list_all_guests()?;
    let (matched, confidence) = match matcher::find_best_match(query, &guests) {
        Some(hit) => hit,
        None => return Ok(None),
    };
    let matched = matched.clone();
    tracing::debug!(confidence, guest = %matched.id, "name query matched");

    let (party, roster) = match matched.party_id.as_ref() {
        Some(party_id) => {
            // A dangling party id still groups its guests; only the
            // display name is lost.
            let party = match store.get_party(party_id)? {
                Some(party) => party,
                None => Party {
                    id: party_id.clone(),
                    name: FALLBACK_PARTY_NAME.to_string(),
                },
            };
            (party, store.list_guests_by_party(party_id)?)
        }
        None => {
            // Solo guest: a party of one, keyed by the guest's own id.
            let party = Party {
                id: PartyId(matched.id.0.clone()),
                name: FALLBACK_PARTY_NAME.to_string(),
            };
            (party, vec![matched.clone()])
        }
    };

    Ok(Some(MatchResult {
        party,
        guests: roster,
        matched_guest: matched,
        confidence,
    }))
}

/// Write one full party response: selected guests become yes, every
/// other guest in the party becomes no. Each save overwrites whatever
/// was stored before.
pub fn submit_party_rsvp(
    store: &dyn GuestStore,
    req: &SubmitRsvpRequest,
) -> Result<SubmitOutcome, ServiceError> {
    if req.guest_ids_in_party.is_empty() {
        return Err(ServiceError::EmptyParty);
    }
    let roster: HashSet<&GuestId> = req.guest_ids_in_party.iter().collect();
    for id in &req.selected_ids {
        if !roster.contains(id) {
            return Err(ServiceError::SelectionOutsideParty(id.clone()));
        }
    }

    let selected: HashSet<&GuestId> = req.selected_ids.iter().collect();
    let attending: Vec<GuestId> = req
        .guest_ids_in_party
        .iter()
        .filter(|id| selected.contains(*id))
        .cloned()
        .collect();
    let declining: Vec<GuestId> = req
        .guest_ids_in_party
        .iter()
        .filter(|id| !selected.contains(*id))
        .cloned()
        .collect();

    if !attending.is_empty() {
        store.set_guest_status(&attending, Attendance::Yes)?;
    }
    if !declining.is_empty() {
        store.set_guest_status(&declining, Attendance::No)?;
    }
    tracing::info!(
        party = %req.party_id,
        attending = attending.len(),
        declined = declining.len(),
        "rsvp submitted"
    );
    Ok(SubmitOutcome {
        attending: attending.len(),
        declined: declining.len(),
    })
}

/// Every party with its ordered roster, parties in name order. Guests
/// without a party never appear here.
pub fn list_parties_with_guests(
    store: &dyn GuestStore,
    auth: &AdminAuth,
    req: &ListPartiesRequest,
) -> Result<Vec<PartyWithGuests>, ServiceError> {
    require_admin(auth, &req.admin_password)?;
    store
        .list_parties()?
        .into_iter()
        .map(|party| {
            let guests = store.list_guests_by_party(&party.id)?;
            Ok(PartyWithGuests { party, guests })
        })
        .collect()
}

pub fn create_party(
    store: &dyn GuestStore,
    auth: &AdminAuth,
    req: &CreatePartyRequest,
) -> Result<Party, ServiceError> {
    require_admin(auth, &req.admin_password)?;
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ServiceError::Invalid("party name is required".to_string()));
    }
    let party = Party {
        id: PartyId(Uuid::new_v4().to_string()),
        name: name.to_string(),
    };
    store.put_party(&party)?;
    tracing::info!(party = %party.id, "party created");
    Ok(party)
}

pub fn update_party(
    store: &dyn GuestStore,
    auth: &AdminAuth,
    req: &UpdatePartyRequest,
) -> Result<Party, ServiceError> {
    require_admin(auth, &req.admin_password)?;
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ServiceError::Invalid("party name is required".to_string()));
    }
    let mut party = store
        .get_party(&req.party_id)?
        .ok_or_else(|| ServiceError::PartyNotFound(req.party_id.clone()))?;
    party.name = name.to_string();
    store.put_party(&party)?;
    Ok(party)
}

/// Deleting a party removes its guests first, then the party record.
/// Deleting an absent party is a no-op.
pub fn delete_party(
    store: &dyn GuestStore,
    auth: &AdminAuth,
    req: &DeletePartyRequest,
) -> Result<(), ServiceError> {
    require_admin(auth, &req.admin_password)?;
    for guest in store.list_guests_by_party(&req.party_id)? {
        store.delete_guest(&guest.id)?;
    }
    store.delete_party(&req.party_id)?;
    tracing::info!(party = %req.party_id, "party deleted");
    Ok(())
}

pub fn create_guest(
    store: &dyn GuestStore,
    auth: &AdminAuth,
    req: &CreateGuestRequest,
) -> Result<Guest, ServiceError> {
    require_admin(auth, &req.admin_password)?;
    let (first_name, last_name) = validated_names(&req.first_name, &req.last_name)?;
    if let Some(party_id) = req.party_id.as_ref() {
        ensure_party_exists(store, party_id)?;
    }
    let guest = Guest {
        id: GuestId(Uuid::new_v4().to_string()),
        first_name,
        last_name,
        party_id: req.party_id.clone(),
        rsvp_status: req.rsvp_status,
        dietary_restrictions: normalized_dietary(req.dietary_restrictions.as_deref()),
    };
    store.put_guest(&guest)?;
    tracing::info!(guest = %guest.id, "guest created");
    Ok(guest)
}

/// Full-record update; may move the guest to another party or clear the
/// party entirely.
pub fn update_guest(
    store: &dyn GuestStore,
    auth: &AdminAuth,
    req: &UpdateGuestRequest,
) -> Result<Guest, ServiceError> {
    require_admin(auth, &req.admin_password)?;
    let (first_name, last_name) = validated_names(&req.first_name, &req.last_name)?;
    if let Some(party_id) = req.party_id.as_ref() {
        ensure_party_exists(store, party_id)?;
    }
    let mut guest = store
        .get_guest(&req.guest_id)?
        .ok_or_else(|| ServiceError::GuestNotFound(req.guest_id.clone()))?;
    guest.first_name = first_name;
    guest.last_name = last_name;
    guest.party_id = req.party_id.clone();
    guest.rsvp_status = req.rsvp_status;
    guest.dietary_restrictions = normalized_dietary(req.dietary_restrictions.as_deref());
    store.put_guest(&guest)?;
    Ok(guest)
}

/// Deleting an absent guest is a no-op.
pub fn delete_guest(
    store: &dyn GuestStore,
    auth: &AdminAuth,
    req: &DeleteGuestRequest,
) -> Result<(), ServiceError> {
    require_admin(auth, &req.admin_password)?;
    store.delete_guest(&req.guest_id)?;
    tracing::info!(guest = %req.guest_id, "guest deleted");
    Ok(())
}

fn validated_names(first: &str, last: &str) -> Result<(String, String), ServiceError> {
    let first = first.trim();
    let last = last.trim();
    if first.is_empty() || last.is_empty() {
        return Err(ServiceError::Invalid(
            "first and last name are required".to_string(),
        ));
    }
    Ok((first.to_string(), last.to_string()))
}

fn normalized_dietary(raw: Option<&str>) -> Option<String> {
    let trimmed = raw.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn ensure_party_exists(store: &dyn GuestStore, party_id: &PartyId) -> Result<(), ServiceError> {
    if store.get_party(party_id)?.is_none() {
        return Err(ServiceError::PartyNotFound(party_id.clone()));
    }
    Ok(())
}
