//! Shared fixtures for the integration suites: an in-process workflow
//! backend over a temporary store, plus seed helpers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rsvp_client::workflow::RsvpBackend;
use rsvp_common::api::{SubmitOutcome, SubmitRsvpRequest};
use rsvp_common::{Guest, GuestId, MatchResult, Party, PartyId, RsvpStatus};
use rsvp_server::service;
use rsvp_server::store::{GuestStore, SledStore};

pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// Workflow backend wired straight to the service layer over a
/// temporary store: the HTTP path's semantics without the wire.
#[derive(Clone)]
pub struct DirectBackend {
    store: SledStore,
}

impl DirectBackend {
    pub fn new() -> Result<Self> {
        Ok(Self {
            store: SledStore::temporary()?,
        })
    }

    pub fn store(&self) -> &SledStore {
        &self.store
    }
}

#[async_trait]
impl RsvpBackend for DirectBackend {
    async fn find_match(&self, query: &str) -> Result<Option<MatchResult>> {
        Ok(service::find_party_match(&self.store, query)?)
    }

    async fn submit_rsvp(&self, req: &SubmitRsvpRequest) -> Result<SubmitOutcome> {
        Ok(service::submit_party_rsvp(&self.store, req)?)
    }
}

pub fn seed_party(store: &SledStore, id: &str, name: &str) -> Result<PartyId> {
    let party = Party {
        id: PartyId(id.to_string()),
        name: name.to_string(),
    };
    store.put_party(&party)?;
    Ok(party.id)
}

pub fn seed_guest(
    store: &SledStore,
    id: &str,
    first: &str,
    last: &str,
    party: Option<&str>,
) -> Result<GuestId> {
    let guest = Guest {
        id: GuestId(id.to_string()),
        first_name: first.to_string(),
        last_name: last.to_string(),
        party_id: party.map(|p| PartyId(p.to_string())),
        ..Guest::default()
    };
    store.put_guest(&guest)?;
    Ok(guest.id)
}

/// The two-guest sample party the suites share.
pub fn seed_luna_party(store: &SledStore) -> Result<(PartyId, GuestId, GuestId)> {
    let party = seed_party(store, "party-luna", "Luna & Robinson")?;
    let grant = seed_guest(store, "guest-grant", "Grant", "Luna", Some("party-luna"))?;
    let raye = seed_guest(store, "guest-raye", "Raye", "Robinson", Some("party-luna"))?;
    Ok((party, grant, raye))
}

pub fn status_of(store: &SledStore, id: &GuestId) -> Result<RsvpStatus> {
    Ok(store
        .get_guest(id)?
        .with_context(|| format!("guest {id} missing"))?
        .rsvp_status)
}
