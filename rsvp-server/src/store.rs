//! Guest and party records in a `sled` keyspace: one tree per record
//! type, ids as keys, JSON values.

use rsvp_common::{Attendance, Guest, GuestId, Party, PartyId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Backend(#[from] sled::Error),
    #[error("bad record encoding: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Storage seen by the service layer. Synchronous: `sled` completes
/// these calls without blocking long enough to matter under the async
/// handlers.
pub trait GuestStore: Send + Sync {
    /// Every guest record, in stable (key) order.
    fn list_all_guests(&self) -> Result<Vec<Guest>, StoreError>;
    fn get_guest(&self, id: &GuestId) -> Result<Option<Guest>, StoreError>;
    fn get_party(&self, id: &PartyId) -> Result<Option<Party>, StoreError>;
    /// All parties, name ascending.
    fn list_parties(&self) -> Result<Vec<Party>, StoreError>;
    /// A party's roster, `(last_name, first_name)` ascending.
    fn list_guests_by_party(&self, id: &PartyId) -> Result<Vec<Guest>, StoreError>;
    /// Write one status to every listed guest as a single atomic batch.
    /// Ids without a record are skipped, not errors.
    fn set_guest_status(&self, ids: &[GuestId], attendance: Attendance) -> Result<(), StoreError>;
    fn put_party(&self, party: &Party) -> Result<(), StoreError>;
    fn delete_party(&self, id: &PartyId) -> Result<(), StoreError>;
    fn put_guest(&self, guest: &Guest) -> Result<(), StoreError>;
    fn delete_guest(&self, id: &GuestId) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct SledStore {
    parties: sled::Tree,
    guests: sled::Tree,
}

impl SledStore {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, StoreError> {
        Self::from_db(&sled::open(path)?)
    }

    /// Backed by files that vanish when the store is dropped.
    pub fn temporary() -> Result<Self, StoreError> {
        Self::from_db(&sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: &sled::Db) -> Result<Self, StoreError> {
        Ok(Self {
            parties: db.open_tree("parties")?,
            guests: db.open_tree("guests")?,
        })
    }
}

impl GuestStore for SledStore {
    fn list_all_guests(&self) -> Result<Vec<Guest>, StoreError> {
        let mut guests = Vec::new();
        for entry in self.guests.iter() {
            let (_, raw) = entry?;
            guests.push(serde_json::from_slice(&raw)?);
        }
        Ok(guests)
    }

    fn get_guest(&self, id: &GuestId) -> Result<Option<Guest>, StoreError> {
        match self.guests.get(id.0.as_bytes())? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    fn get_party(&self, id: &PartyId) -> Result<Option<Party>, StoreError> {
        match self.parties.get(id.0.as_bytes())? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    fn list_parties(&self) -> Result<Vec<Party>, StoreError> {
        let mut parties: Vec<Party> = Vec::new();
        for entry in self.parties.iter() {
            let (_, raw) = entry?;
            parties.push(serde_json::from_slice(&raw)?);
        }
        parties.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(parties)
    }

    fn list_guests_by_party(&self, id: &PartyId) -> Result<Vec<Guest>, StoreError> {
        let mut roster: Vec<Guest> = Vec::new();
        for guest in self.list_all_guests()? {
            if guest.party_id.as_ref() == Some(id) {
                roster.push(guest);
            }
        }
        roster.sort_by(|a, b| {
            (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name))
        });
        Ok(roster)
    }

    fn set_guest_status(&self, ids: &[GuestId], attendance: Attendance) -> Result<(), StoreError> {
        let mut batch = sled::Batch::default();
        let mut touched = false;
        for id in ids {
            let mut guest = match self.get_guest(id)? {
                Some(guest) => guest,
                None => {
                    tracing::warn!(guest_id = %id, "status write skipped an unknown guest");
                    continue;
                }
            };
            guest.rsvp_status = attendance.into();
            batch.insert(id.0.as_bytes(), serde_json::to_vec(&guest)?);
            touched = true;
        }
        if touched {
            self.guests.apply_batch(batch)?;
        }
        Ok(())
    }

    fn put_party(&self, party: &Party) -> Result<(), StoreError> {
        self.parties
            .insert(party.id.0.as_bytes(), serde_json::to_vec(party)?)?;
        Ok(())
    }

    fn delete_party(&self, id: &PartyId) -> Result<(), StoreError> {
        self.parties.remove(id.0.as_bytes())?;
        Ok(())
    }

    fn put_guest(&self, guest: &Guest) -> Result<(), StoreError> {
        self.guests
            .insert(guest.id.0.as_bytes(), serde_json::to_vec(guest)?)?;
        Ok(())
    }

    fn delete_guest(&self, id: &GuestId) -> Result<(), StoreError> {
        self.guests.remove(id.0.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsvp_common::RsvpStatus;

    fn store() -> SledStore {
        SledStore::temporary().unwrap()
    }

    fn guest(id: &str, first: &str, last: &str, party: Option<&str>) -> Guest {
        Guest {
            id: GuestId(id.to_string()),
            first_name: first.to_string(),
            last_name: last.to_string(),
            party_id: party.map(|p| PartyId(p.to_string())),
            ..Guest::default()
        }
    }

    #[test]
    fn guest_round_trip() {
        let store = store();
        let mut g = guest("g1", "Grant", "Luna", Some("p1"));
        g.dietary_restrictions = Some("vegetarian".to_string());
        store.put_guest(&g).unwrap();
        assert_eq!(store.get_guest(&g.id).unwrap(), Some(g.clone()));

        store.delete_guest(&g.id).unwrap();
        assert_eq!(store.get_guest(&g.id).unwrap(), None);
    }

    #[test]
    fn party_round_trip_and_overwrite() {
        let store = store();
        let mut party = Party {
            id: PartyId("p1".to_string()),
            name: "Luna Family".to_string(),
        };
        store.put_party(&party).unwrap();
        party.name = "Luna-Reyes Family".to_string();
        store.put_party(&party).unwrap();
        assert_eq!(store.get_party(&party.id).unwrap(), Some(party));
    }

    #[test]
    fn parties_list_name_ascending() {
        let store = store();
        for (id, name) in [("p1", "Zhang"), ("p2", "Abbott"), ("p3", "Miro")] {
            store
                .put_party(&Party {
                    id: PartyId(id.to_string()),
                    name: name.to_string(),
                })
                .unwrap();
        }
        let names: Vec<String> = store
            .list_parties()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Abbott", "Miro", "Zhang"]);
    }

    #[test]
    fn roster_sorted_by_last_then_first() {
        let store = store();
        store.put_guest(&guest("g1", "Raye", "Robinson", Some("p1"))).unwrap();
        store.put_guest(&guest("g2", "Adam", "Robinson", Some("p1"))).unwrap();
        store.put_guest(&guest("g3", "Bea", "Acker", Some("p1"))).unwrap();
        store.put_guest(&guest("g4", "Zoe", "Acker", Some("p2"))).unwrap();

        let roster: Vec<String> = store
            .list_guests_by_party(&PartyId("p1".to_string()))
            .unwrap()
            .into_iter()
            .map(|g| g.full_name())
            .collect();
        assert_eq!(roster, ["Bea Acker", "Adam Robinson", "Raye Robinson"]);
    }

    #[test]
    fn status_write_is_batched_over_all_ids() {
        let store = store();
        store.put_guest(&guest("g1", "Grant", "Luna", Some("p1"))).unwrap();
        store.put_guest(&guest("g2", "Raye", "Robinson", Some("p1"))).unwrap();

        store
            .set_guest_status(
                &[GuestId("g1".to_string()), GuestId("g2".to_string())],
                Attendance::Yes,
            )
            .unwrap();

        for id in ["g1", "g2"] {
            let g = store.get_guest(&GuestId(id.to_string())).unwrap().unwrap();
            assert_eq!(g.rsvp_status, RsvpStatus::Yes);
        }
    }

    #[test]
    fn status_write_skips_unknown_ids() {
        let store = store();
        store.put_guest(&guest("g1", "Grant", "Luna", Some("p1"))).unwrap();

        store
            .set_guest_status(
                &[GuestId("ghost".to_string()), GuestId("g1".to_string())],
                Attendance::No,
            )
            .unwrap();

        let g = store.get_guest(&GuestId("g1".to_string())).unwrap().unwrap();
        assert_eq!(g.rsvp_status, RsvpStatus::No);
        assert_eq!(store.get_guest(&GuestId("ghost".to_string())).unwrap(), None);
    }

    #[test]
    fn status_write_preserves_other_fields() {
        let store = store();
        let mut g = guest("g1", "Grant", "Luna", Some("p1"));
        g.dietary_restrictions = Some("no nuts".to_string());
        store.put_guest(&g).unwrap();

        store
            .set_guest_status(&[g.id.clone()], Attendance::Yes)
            .unwrap();

        let after = store.get_guest(&g.id).unwrap().unwrap();
        assert_eq!(after.dietary_restrictions, Some("no nuts".to_string()));
        assert_eq!(after.party_id, Some(PartyId("p1".to_string())));
    }
}
