//! Guest-facing workflow scenarios over a real store.

use anyhow::Result;
use rsvp_client::workflow::{RsvpWorkflow, Step};
use rsvp_common::RsvpStatus;
use rsvp_test::{seed_guest, seed_luna_party, status_of, DirectBackend};

#[tokio::test]
async fn attend_flow_saves_yes_for_selected_and_no_for_the_rest() -> Result<()> {
    let backend = DirectBackend::new()?;
    let (_, grant, raye) = seed_luna_party(backend.store())?;

    let mut flow = RsvpWorkflow::new(backend.clone());
    let tier = flow.search("grant luna").await?;
    assert!(tier.is_some());
    assert_eq!(flow.current_step(), Step::PartyReview);
    assert_eq!(flow.match_headline(), Some("We found your party"));

    flow.toggle_selection(&grant)?;
    assert_eq!(flow.advance().await?, Step::Confirm);
    assert_eq!(flow.confirmation_text(), "Attending: Grant Luna.");
    assert_eq!(flow.advance().await?, Step::Thanks);

    assert_eq!(status_of(backend.store(), &grant)?, RsvpStatus::Yes);
    assert_eq!(status_of(backend.store(), &raye)?, RsvpStatus::No);
    Ok(())
}

#[tokio::test]
async fn decline_flow_marks_the_whole_party_no() -> Result<()> {
    let backend = DirectBackend::new()?;
    let (_, grant, raye) = seed_luna_party(backend.store())?;

    let mut flow = RsvpWorkflow::new(backend.clone());
    flow.search("raye robinson").await?;
    assert_eq!(flow.advance().await?, Step::DeclinePrompt);
    assert_eq!(flow.confirm_decline().await?, Step::Confirm);
    assert_eq!(flow.advance().await?, Step::Thanks);
    assert!(flow.thanks_text().contains("miss you"));

    assert_eq!(status_of(backend.store(), &grant)?, RsvpStatus::No);
    assert_eq!(status_of(backend.store(), &raye)?, RsvpStatus::No);
    Ok(())
}

#[tokio::test]
async fn misspelled_query_still_finds_the_party() -> Result<()> {
    let backend = DirectBackend::new()?;
    seed_luna_party(backend.store())?;

    let mut flow = RsvpWorkflow::new(backend.clone());
    let tier = flow.search("gran luna").await?;
    assert!(tier.is_some());
    let found = flow.current_match().unwrap();
    assert_eq!(found.matched_guest.full_name(), "Grant Luna");
    assert_eq!(found.party.name, "Luna & Robinson");
    Ok(())
}

#[tokio::test]
async fn empty_store_gives_no_match_feedback() -> Result<()> {
    let backend = DirectBackend::new()?;
    let mut flow = RsvpWorkflow::new(backend.clone());
    assert_eq!(flow.search("anyone at all").await?, None);
    assert_eq!(flow.current_step(), Step::Search);
    Ok(())
}

#[tokio::test]
async fn a_saved_yes_is_preselected_next_session() -> Result<()> {
    let backend = DirectBackend::new()?;
    let (_, grant, _) = seed_luna_party(backend.store())?;

    let mut first = RsvpWorkflow::new(backend.clone());
    first.search("grant luna").await?;
    first.toggle_selection(&grant)?;
    first.advance().await?;
    first.advance().await?;

    // A later visit starts from what the store remembers.
    let mut second = RsvpWorkflow::new(backend.clone());
    second.search("grant luna").await?;
    assert_eq!(second.current_selection(), vec![grant]);
    Ok(())
}

#[tokio::test]
async fn concurrent_sessions_land_on_the_last_write() -> Result<()> {
    let backend = DirectBackend::new()?;
    let (_, grant, raye) = seed_luna_party(backend.store())?;

    let mut first = RsvpWorkflow::new(backend.clone());
    let mut second = RsvpWorkflow::new(backend.clone());
    first.search("grant luna").await?;
    second.search("raye robinson").await?;

    first.toggle_selection(&grant)?;
    first.advance().await?;

    second.toggle_selection(&raye)?;
    second.advance().await?;

    // The second full-party save overwrote the first.
    assert_eq!(status_of(backend.store(), &grant)?, RsvpStatus::No);
    assert_eq!(status_of(backend.store(), &raye)?, RsvpStatus::Yes);
    Ok(())
}

#[tokio::test]
async fn solo_guest_flows_through_a_party_of_one() -> Result<()> {
    let backend = DirectBackend::new()?;
    let drifter = seed_guest(backend.store(), "guest-dan", "Drifter", "Dan", None)?;

    let mut flow = RsvpWorkflow::new(backend.clone());
    flow.search("Drifter Dan").await?;
    let found = flow.current_match().unwrap();
    assert_eq!(found.party.name, "Your Party");
    assert_eq!(found.guests.len(), 1);

    flow.toggle_selection(&drifter)?;
    flow.advance().await?;
    flow.advance().await?;
    assert_eq!(status_of(backend.store(), &drifter)?, RsvpStatus::Yes);
    Ok(())
}

#[tokio::test]
async fn not_you_returns_to_a_clean_search() -> Result<()> {
    let backend = DirectBackend::new()?;
    let (_, grant, _) = seed_luna_party(backend.store())?;

    let mut flow = RsvpWorkflow::new(backend.clone());
    flow.search("grant luna").await?;
    flow.toggle_selection(&grant)?;
    assert_eq!(flow.go_back().await?, Step::Search);
    assert!(flow.current_match().is_none());

    // Nothing was saved, so the fresh session has no preselection.
    flow.search("grant luna").await?;
    assert!(flow.current_selection().is_empty());
    Ok(())
}
