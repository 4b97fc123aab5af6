//! One round trip over a real server on an ephemeral loopback port.

use anyhow::Result;
use reqwest::Client;
use rsvp_client::api;
use rsvp_client::workflow::{HttpBackend, RsvpWorkflow, Step};
use rsvp_common::api::{
    CreateGuestRequest, CreatePartyRequest, ListPartiesRequest, SubmitRsvpRequest,
};
use rsvp_common::{PartyId, RsvpStatus};
use rsvp_server::auth::AdminAuth;
use rsvp_server::http::{self, State};
use rsvp_server::store::SledStore;
use rsvp_test::ADMIN_PASSWORD;
use std::net::SocketAddr;

fn spawn_server() -> Result<String> {
    let store = SledStore::temporary()?;
    let state = State::new(store, AdminAuth::new(ADMIN_PASSWORD));
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let (local_addr, server) = http::bind(addr, state)?;
    tokio::spawn(server);
    Ok(format!("http://{local_addr}"))
}

fn create_guest_req(party_id: &PartyId, first: &str, last: &str) -> CreateGuestRequest {
    CreateGuestRequest {
        admin_password: ADMIN_PASSWORD.to_string(),
        party_id: Some(party_id.clone()),
        first_name: first.to_string(),
        last_name: last.to_string(),
        rsvp_status: RsvpStatus::Unset,
        dietary_restrictions: None,
    }
}

#[tokio::test]
async fn full_rsvp_round_trip_over_http() -> Result<()> {
    let base = spawn_server()?;
    let client = Client::new();

    let party = api::create_party(
        &client,
        &base,
        &CreatePartyRequest {
            admin_password: ADMIN_PASSWORD.to_string(),
            name: "Luna & Robinson".to_string(),
        },
    )
    .await?;
    let grant = api::create_guest(&client, &base, &create_guest_req(&party.id, "Grant", "Luna")).await?;
    api::create_guest(&client, &base, &create_guest_req(&party.id, "Raye", "Robinson")).await?;

    let mut flow = RsvpWorkflow::new(HttpBackend::new(base.clone()));
    let tier = flow.search("Grant Luna").await?;
    assert!(tier.is_some());
    flow.toggle_selection(&grant.id)?;
    flow.advance().await?;
    flow.advance().await?;
    assert_eq!(flow.current_step(), Step::Thanks);

    let listed = api::list_parties(
        &client,
        &base,
        &ListPartiesRequest {
            admin_password: ADMIN_PASSWORD.to_string(),
        },
    )
    .await?;
    assert_eq!(listed.len(), 1);
    let statuses: Vec<(String, RsvpStatus)> = listed[0]
        .guests
        .iter()
        .map(|g| (g.full_name(), g.rsvp_status))
        .collect();
    assert_eq!(
        statuses,
        [
            ("Grant Luna".to_string(), RsvpStatus::Yes),
            ("Raye Robinson".to_string(), RsvpStatus::No),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn admin_routes_answer_401_to_a_bad_password() -> Result<()> {
    let base = spawn_server()?;
    let client = Client::new();

    let err = api::create_party(
        &client,
        &base,
        &CreatePartyRequest {
            admin_password: "guessing".to_string(),
            name: "Gatecrashers".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("401"));
    Ok(())
}

#[tokio::test]
async fn invalid_submission_answers_422() -> Result<()> {
    let base = spawn_server()?;
    let client = Client::new();

    let err = api::submit_rsvp(
        &client,
        &base,
        &SubmitRsvpRequest {
            party_id: PartyId("p1".to_string()),
            guest_ids_in_party: Vec::new(),
            selected_ids: Vec::new(),
        },
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("422"));
    Ok(())
}
