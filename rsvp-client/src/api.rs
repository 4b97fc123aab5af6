//! Free async wrappers over the server's JSON routes, one per route.
//! Non-2xx responses surface as errors.

use anyhow::Result;
use reqwest::Client;
use rsvp_common::api::{
    CreateGuestRequest, CreatePartyRequest, DeleteGuestRequest, DeletePartyRequest,
    FindMatchRequest, ListPartiesRequest, PartyWithGuests, SubmitOutcome, SubmitRsvpRequest,
    UpdateGuestRequest, UpdatePartyRequest,
};
use rsvp_common::{Guest, MatchResult, Party};

pub async fn find_match(
    client: &Client,
    base_url: &str,
    query: &str,
) -> Result<Option<MatchResult>> {
    Ok(client
        .post(String::from(base_url) + "/rsvp/post/find-match")
        .json(&FindMatchRequest {
            query: query.to_string(),
        })
        .send()
        .await?
        .error_for_status()?
        .json::<_>()
        .await?)
}

pub async fn submit_rsvp(
    client: &Client,
    base_url: &str,
    req: &SubmitRsvpRequest,
) -> Result<SubmitOutcome> {
    Ok(client
        .post(String::from(base_url) + "/rsvp/post/submit")
        .json(req)
        .send()
        .await?
        .error_for_status()?
        .json::<_>()
        .await?)
}

pub async fn list_parties(
    client: &Client,
    base_url: &str,
    req: &ListPartiesRequest,
) -> Result<Vec<PartyWithGuests>> {
    Ok(client
        .post(String::from(base_url) + "/admin/post/list-parties")
        .json(req)
        .send()
        .await?
        .error_for_status()?
        .json::<_>()
        .await?)
}

pub async fn create_party(
    client: &Client,
    base_url: &str,
    req: &CreatePartyRequest,
) -> Result<Party> {
    Ok(client
        .post(String::from(base_url) + "/admin/post/create-party")
        .json(req)
        .send()
        .await?
        .error_for_status()?
        .json::<_>()
        .await?)
}

pub async fn update_party(
    client: &Client,
    base_url: &str,
    req: &UpdatePartyRequest,
) -> Result<Party> {
    Ok(client
        .post(String::from(base_url) + "/admin/post/update-party")
        .json(req)
        .send()
        .await?
        .error_for_status()?
        .json::<_>()
        .await?)
}

pub async fn delete_party(
    client: &Client,
    base_url: &str,
    req: &DeletePartyRequest,
) -> Result<()> {
    client
        .post(String::from(base_url) + "/admin/post/delete-party")
        .json(req)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

pub async fn create_guest(
    client: &Client,
    base_url: &str,
    req: &CreateGuestRequest,
) -> Result<Guest> {
    Ok(client
        .post(String::from(base_url) + "/admin/post/create-guest")
        .json(req)
        .send()
        .await?
        .error_for_status()?
        .json::<_>()
        .await?)
}

pub async fn update_guest(
    client: &Client,
    base_url: &str,
    req: &UpdateGuestRequest,
) -> Result<Guest> {
    Ok(client
        .post(String::from(base_url) + "/admin/post/update-guest")
        .json(req)
        .send()
        .await?
        .error_for_status()?
        .json::<_>()
        .await?)
}

pub async fn delete_guest(
    client: &Client,
    base_url: &str,
    req: &DeleteGuestRequest,
) -> Result<()> {
    client
        .post(String::from(base_url) + "/admin/post/delete-guest")
        .json(req)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}
