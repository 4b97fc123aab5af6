//! The guest-facing RSVP flow as an explicit state machine.
//!
//! One value walks search → party review → confirm → thanks, holding
//! the matched party, the in-progress selection, and the autosave
//! bookkeeping. Every transition method takes `&mut self`, so a second
//! save can never start while one is in flight.
//!
//! Saving happens on entry to the confirm step, keyed by a signature of
//! party id plus the sorted selected ids: re-entering confirm with the
//! same content does not write again, while any content change does.

use crate::api;
use async_trait::async_trait;
use rsvp_common::api::{SubmitOutcome, SubmitRsvpRequest};
use rsvp_common::matcher::ConfidenceTier;
use rsvp_common::{join_names, GuestId, MatchResult, RsvpStatus};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// What the workflow talks to for lookups and saves.
#[async_trait]
pub trait RsvpBackend: Send + Sync {
    async fn find_match(&self, query: &str) -> anyhow::Result<Option<MatchResult>>;
    async fn submit_rsvp(&self, req: &SubmitRsvpRequest) -> anyhow::Result<SubmitOutcome>;
}

#[async_trait]
impl<B: RsvpBackend + ?Sized> RsvpBackend for Arc<B> {
    async fn find_match(&self, query: &str) -> anyhow::Result<Option<MatchResult>> {
        (**self).find_match(query).await
    }

    async fn submit_rsvp(&self, req: &SubmitRsvpRequest) -> anyhow::Result<SubmitOutcome> {
        (**self).submit_rsvp(req).await
    }
}

/// Production backend: the server's JSON API over `reqwest`.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RsvpBackend for HttpBackend {
    async fn find_match(&self, query: &str) -> anyhow::Result<Option<MatchResult>> {
        api::find_match(&self.client, &self.base_url, query).await
    }

    async fn submit_rsvp(&self, req: &SubmitRsvpRequest) -> anyhow::Result<SubmitOutcome> {
        api::submit_rsvp(&self.client, &self.base_url, req).await
    }
}

/// The step a caller should render right now.
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum Step {
    Search,
    PartyReview,
    DeclinePrompt,
    Confirm,
    Thanks,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("cannot {action} during {step:?}")]
    InvalidTransition { action: &'static str, step: Step },
    #[error("guest {0} is not in the matched party")]
    SelectionOutsideParty(GuestId),
    #[error("search failed: {0}")]
    SearchFailed(anyhow::Error),
}

enum WorkflowState {
    Searching,
    Engaged(Session),
}

/// Everything tied to one matched party. Dropped wholesale on "not
/// you", so nothing from an old match can leak into the next one.
struct Session {
    found: MatchResult,
    stage: Stage,
    selection: BTreeSet<GuestId>,
    saved_signature: Option<String>,
    save_error: Option<String>,
}

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
enum Stage {
    Review { decline_prompt: bool },
    Confirm,
    Thanks,
}

impl Session {
    fn new(found: MatchResult) -> Self {
        let selection = found
            .guests
            .iter()
            .filter(|g| g.rsvp_status == RsvpStatus::Yes)
            .map(|g| g.id.clone())
            .collect();
        Self {
            found,
            stage: Stage::Review {
                decline_prompt: false,
            },
            selection,
            saved_signature: None,
            save_error: None,
        }
    }

    fn signature(&self) -> String {
        let ids: Vec<&str> = self.selection.iter().map(|id| id.0.as_str()).collect();
        format!("{}::{}", self.found.party.id.0, ids.join(","))
    }
}

pub struct RsvpWorkflow<B> {
    backend: B,
    state: WorkflowState,
    saving: bool,
}

impl<B: RsvpBackend> RsvpWorkflow<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: WorkflowState::Searching,
            saving: false,
        }
    }

    pub fn current_step(&self) -> Step {
        match &self.state {
            WorkflowState::Searching => Step::Search,
            WorkflowState::Engaged(session) => match session.stage {
                Stage::Review {
                    decline_prompt: false,
                } => Step::PartyReview,
                Stage::Review {
                    decline_prompt: true,
                } => Step::DeclinePrompt,
                Stage::Confirm => Step::Confirm,
                Stage::Thanks => Step::Thanks,
            },
        }
    }

    pub fn current_match(&self) -> Option<&MatchResult> {
        match &self.state {
            WorkflowState::Searching => None,
            WorkflowState::Engaged(session) => Some(&session.found),
        }
    }

    /// Selected guest ids, ascending. Always a subset of the matched
    /// roster.
    pub fn current_selection(&self) -> Vec<GuestId> {
        match &self.state {
            WorkflowState::Searching => Vec::new(),
            WorkflowState::Engaged(session) => session.selection.iter().cloned().collect(),
        }
    }

    pub fn is_selected(&self, id: &GuestId) -> bool {
        match &self.state {
            WorkflowState::Searching => false,
            WorkflowState::Engaged(session) => session.selection.contains(id),
        }
    }

    /// True while a save is awaiting the backend. Left stale if the
    /// save future is dropped mid-flight; the next attempt resets it.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Why the last save attempt failed, if it did. Cleared once the
    /// current content is known to be saved.
    pub fn last_save_error(&self) -> Option<&str> {
        match &self.state {
            WorkflowState::Searching => None,
            WorkflowState::Engaged(session) => session.save_error.as_deref(),
        }
    }

    /// Headline for the review step, worded by match confidence.
    pub fn match_headline(&self) -> Option<&'static str> {
        self.current_match()
            .map(|found| ConfidenceTier::from_score(found.confidence).headline())
    }

    /// Full names of the selected guests, in roster order.
    pub fn selected_names(&self) -> Vec<String> {
        match &self.state {
            WorkflowState::Searching => Vec::new(),
            WorkflowState::Engaged(session) => session
                .found
                .guests
                .iter()
                .filter(|g| session.selection.contains(&g.id))
                .map(|g| g.full_name())
                .collect(),
        }
    }

    fn roster_names(&self) -> Vec<String> {
        match &self.state {
            WorkflowState::Searching => Vec::new(),
            WorkflowState::Engaged(session) => {
                session.found.guests.iter().map(|g| g.full_name()).collect()
            }
        }
    }

    /// Sentence for the confirm step: the selected names, or the whole
    /// party's when no one is attending.
    pub fn confirmation_text(&self) -> String {
        let selected = self.selected_names();
        if selected.is_empty() {
            format!("Not attending: {}.", join_names(&self.roster_names()))
        } else {
            format!("Attending: {}.", join_names(&selected))
        }
    }

    pub fn thanks_text(&self) -> String {
        let selected = self.selected_names();
        if selected.is_empty() {
            format!("We will miss you, {}!", join_names(&self.roster_names()))
        } else {
            format!(
                "Thank you! We can't wait to celebrate with {}.",
                join_names(&selected)
            )
        }
    }

    /// Look up a party by name. `Ok(Some(tier))` moves to the review
    /// step; `Ok(None)` means a blank query or no match, and the
    /// workflow stays where it is. A blank query never reaches the
    /// backend.
    pub async fn search(&mut self, query: &str) -> Result<Option<ConfidenceTier>, WorkflowError> {
        let step = self.current_step();
        if step != Step::Search {
            return Err(WorkflowError::InvalidTransition {
                action: "search",
                step,
            });
        }
        if query.trim().is_empty() {
            return Ok(None);
        }
        let found = self
            .backend
            .find_match(query)
            .await
            .map_err(WorkflowError::SearchFailed)?;
        let found = match found {
            Some(found) => found,
            None => return Ok(None),
        };
        let tier = ConfidenceTier::from_score(found.confidence);
        self.state = WorkflowState::Engaged(Session::new(found));
        Ok(Some(tier))
    }

    /// Flip one roster member in or out of the selection. Valid only on
    /// the review step.
    pub fn toggle_selection(&mut self, id: &GuestId) -> Result<(), WorkflowError> {
        let step = self.current_step();
        if step != Step::PartyReview {
            return Err(WorkflowError::InvalidTransition {
                action: "toggle a guest",
                step,
            });
        }
        if let WorkflowState::Engaged(session) = &mut self.state {
            if !session.found.guests.iter().any(|g| &g.id == id) {
                return Err(WorkflowError::SelectionOutsideParty(id.clone()));
            }
            if !session.selection.remove(id) {
                session.selection.insert(id.clone());
            }
        }
        Ok(())
    }

    /// The context-sensitive "continue":
    ///
    /// - review with a selection → save, then confirm
    /// - review with nothing selected → the decline prompt
    /// - confirm → thanks, once the current content is saved; a failed
    ///   save is retried here and failure keeps the workflow on confirm
    pub async fn advance(&mut self) -> Result<Step, WorkflowError> {
        match self.current_step() {
            Step::PartyReview => {
                if self.current_selection().is_empty() {
                    self.set_stage(Stage::Review {
                        decline_prompt: true,
                    });
                } else {
                    self.set_stage(Stage::Confirm);
                    self.autosave_if_needed().await;
                }
                Ok(self.current_step())
            }
            Step::Confirm => {
                self.autosave_if_needed().await;
                if self.last_save_error().is_none() {
                    self.set_stage(Stage::Thanks);
                }
                Ok(self.current_step())
            }
            step => Err(WorkflowError::InvalidTransition {
                action: "continue",
                step,
            }),
        }
    }

    /// Step backwards: thanks → confirm (autosave check re-runs),
    /// confirm → review (selection kept), review → search ("not you":
    /// the match, selection, and save bookkeeping are all discarded).
    pub async fn go_back(&mut self) -> Result<Step, WorkflowError> {
        match self.current_step() {
            Step::PartyReview => {
                self.state = WorkflowState::Searching;
                Ok(Step::Search)
            }
            Step::Confirm => {
                self.set_stage(Stage::Review {
                    decline_prompt: false,
                });
                Ok(Step::PartyReview)
            }
            Step::Thanks => {
                self.set_stage(Stage::Confirm);
                self.autosave_if_needed().await;
                Ok(Step::Confirm)
            }
            step => Err(WorkflowError::InvalidTransition {
                action: "go back",
                step,
            }),
        }
    }

    /// Accept the decline prompt: the empty selection is saved, marking
    /// the whole party as not attending, and the workflow moves to
    /// confirm.
    pub async fn confirm_decline(&mut self) -> Result<Step, WorkflowError> {
        let step = self.current_step();
        if step != Step::DeclinePrompt {
            return Err(WorkflowError::InvalidTransition {
                action: "confirm the decline",
                step,
            });
        }
        self.set_stage(Stage::Confirm);
        self.autosave_if_needed().await;
        Ok(self.current_step())
    }

    /// Dismiss the decline prompt and return to the review step.
    pub fn cancel_decline(&mut self) -> Result<Step, WorkflowError> {
        let step = self.current_step();
        if step != Step::DeclinePrompt {
            return Err(WorkflowError::InvalidTransition {
                action: "cancel the decline",
                step,
            });
        }
        self.set_stage(Stage::Review {
            decline_prompt: false,
        });
        Ok(Step::PartyReview)
    }

    fn set_stage(&mut self, stage: Stage) {
        if let WorkflowState::Engaged(session) = &mut self.state {
            session.stage = stage;
        }
    }

    /// Save the current selection unless this exact content is already
    /// saved. The request is snapshotted before suspending and results
    /// are applied only after the await returns, so a future dropped
    /// mid-save leaves the recorded state untouched and a later entry
    /// retries.
    async fn autosave_if_needed(&mut self) {
        let (request, signature) = match &mut self.state {
            WorkflowState::Searching => return,
            WorkflowState::Engaged(session) => {
                let signature = session.signature();
                if session.saved_signature.as_deref() == Some(signature.as_str()) {
                    // Content already durable; an error from a
                    // superseded attempt no longer applies.
                    session.save_error = None;
                    return;
                }
                let request = SubmitRsvpRequest {
                    party_id: session.found.party.id.clone(),
                    guest_ids_in_party: session
                        .found
                        .guests
                        .iter()
                        .map(|g| g.id.clone())
                        .collect(),
                    selected_ids: session.selection.iter().cloned().collect(),
                };
                (request, signature)
            }
        };

        self.saving = true;
        let result = self.backend.submit_rsvp(&request).await;
        self.saving = false;

        if let WorkflowState::Engaged(session) = &mut self.state {
            match result {
                Ok(_) => {
                    session.saved_signature = Some(signature);
                    session.save_error = None;
                }
                Err(err) => {
                    session.save_error = Some(format!("{err:#}"));
                }
            }
        }
    }
}
