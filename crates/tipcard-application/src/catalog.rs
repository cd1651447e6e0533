//! Catalog use case: room and staff management.
//!
//! Every edit follows the same shape: take the session's current profile,
//! apply the change, bump `updated_at`, persist local-first through the
//! record store, and put the new profile back on the session. Saves that
//! only reach the cache are fine - a later sync pushes them.

use std::sync::Arc;
use tipcard_core::error::{Result, TipcardError};
use tipcard_core::profile::{HOTELS_COLLECTION, OrganizationProfile, Room, StaffMember};
use tipcard_core::session::SessionManager;
use tipcard_core::store::{RecordKey, RecordStore};
use uuid::Uuid;

/// Form contents for a new room.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomInput {
    pub number: String,
    pub floor: String,
    pub room_type: String,
}

/// Form contents for a new staff member.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffInput {
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    pub image: Option<String>,
}

/// Edits the onboarded organization's rooms and staff.
pub struct CatalogUseCase {
    manager: Arc<SessionManager>,
    records: Arc<RecordStore>,
}

impl CatalogUseCase {
    pub fn new(manager: Arc<SessionManager>, records: Arc<RecordStore>) -> Self {
        Self { manager, records }
    }

    /// Adds a room and returns it with its generated id.
    pub async fn add_room(&self, input: RoomInput) -> Result<Room> {
        if input.number.trim().is_empty() || input.floor.trim().is_empty() {
            return Err(TipcardError::invalid_input(
                "room number and floor are required",
            ));
        }

        let room = Room {
            id: Uuid::new_v4().to_string(),
            number: input.number,
            floor: input.floor,
            room_type: input.room_type,
            assigned_staff_ids: Vec::new(),
        };

        let added = room.clone();
        self.edit_profile(move |profile| {
            profile.rooms.push(room);
            Ok(())
        })
        .await?;
        Ok(added)
    }

    pub async fn remove_room(&self, room_id: &str) -> Result<()> {
        let room_id = room_id.to_string();
        self.edit_profile(move |profile| {
            let before = profile.rooms.len();
            profile.rooms.retain(|room| room.id != room_id);
            if profile.rooms.len() == before {
                return Err(TipcardError::not_found("rooms", room_id.clone()));
            }
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// Adds a staff member and returns them with their generated id.
    pub async fn add_staff(&self, input: StaffInput) -> Result<StaffMember> {
        if input.name.trim().is_empty() {
            return Err(TipcardError::invalid_input("staff name is required"));
        }

        let member = StaffMember {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            role: input.role,
            email: input.email,
            phone: input.phone,
            image: input.image,
        };

        let added = member.clone();
        self.edit_profile(move |profile| {
            profile.staff.push(member);
            Ok(())
        })
        .await?;
        Ok(added)
    }

    /// Removes a staff member and unassigns them from every room.
    pub async fn remove_staff(&self, staff_id: &str) -> Result<()> {
        let staff_id = staff_id.to_string();
        self.edit_profile(move |profile| {
            let before = profile.staff.len();
            profile.staff.retain(|member| member.id != staff_id);
            if profile.staff.len() == before {
                return Err(TipcardError::not_found("staff", staff_id.clone()));
            }
            for room in &mut profile.rooms {
                room.assigned_staff_ids.retain(|id| id != &staff_id);
            }
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// Assigns a staff member to a room. Idempotent.
    pub async fn assign_staff(&self, room_id: &str, staff_id: &str) -> Result<()> {
        let room_id = room_id.to_string();
        let staff_id = staff_id.to_string();
        self.edit_profile(move |profile| {
            if profile.staff_member(&staff_id).is_none() {
                return Err(TipcardError::not_found("staff", staff_id.clone()));
            }
            let Some(room) = profile.rooms.iter_mut().find(|room| room.id == room_id) else {
                return Err(TipcardError::not_found("rooms", room_id.clone()));
            };
            if !room.assigned_staff_ids.contains(&staff_id) {
                room.assigned_staff_ids.push(staff_id.clone());
            }
            Ok(())
        })
        .await?;
        Ok(())
    }

    pub async fn unassign_staff(&self, room_id: &str, staff_id: &str) -> Result<()> {
        let room_id = room_id.to_string();
        let staff_id = staff_id.to_string();
        self.edit_profile(move |profile| {
            let Some(room) = profile.rooms.iter_mut().find(|room| room.id == room_id) else {
                return Err(TipcardError::not_found("rooms", room_id.clone()));
            };
            room.assigned_staff_ids.retain(|id| id != &staff_id);
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// The shared edit path: load, mutate, persist, publish.
    async fn edit_profile<F>(&self, edit: F) -> Result<OrganizationProfile>
    where
        F: FnOnce(&mut OrganizationProfile) -> Result<()>,
    {
        let mut profile = self
            .manager
            .profile()
            .await
            .ok_or(TipcardError::NoActiveProfile)?;

        edit(&mut profile)?;
        profile.touch();

        let key = RecordKey::new(HOTELS_COLLECTION, &profile.uid)?;
        let outcome = self.records.save(&key, &profile).await?;
        if !outcome.is_synced() {
            tracing::debug!(key = %key, "catalog edit retained locally only");
        }

        self.manager.update_profile(profile.clone()).await;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tipcard_core::config::AppConfig;
    use tipcard_core::profile::RegistrationInput;
    use tipcard_infrastructure::{MemoryAuthProvider, MemoryDocumentStore, MemoryStorage};

    struct Harness {
        remote: Arc<MemoryDocumentStore>,
        records: Arc<RecordStore>,
        manager: Arc<SessionManager>,
        catalog: CatalogUseCase,
    }

    async fn onboarded_harness() -> Harness {
        let auth = Arc::new(MemoryAuthProvider::new());
        let remote = Arc::new(MemoryDocumentStore::new());
        let storage = Arc::new(MemoryStorage::new());
        let records = Arc::new(RecordStore::new(remote.clone(), storage.clone()));
        let manager = Arc::new(SessionManager::new(
            auth,
            records.clone(),
            storage,
            AppConfig::default(),
        ));

        manager
            .register(RegistrationInput {
                hotel_name: "Acme Inn".to_string(),
                email: "a@b.com".to_string(),
                password: "secret1".to_string(),
                confirm_password: "secret1".to_string(),
                phone: "+1 555 0100".to_string(),
                address: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: "62704".to_string(),
            })
            .await
            .unwrap();

        let catalog = CatalogUseCase::new(manager.clone(), records.clone());
        Harness {
            remote,
            records,
            manager,
            catalog,
        }
    }

    fn room_input() -> RoomInput {
        RoomInput {
            number: "101".to_string(),
            floor: "1".to_string(),
            room_type: "standard".to_string(),
        }
    }

    fn staff_input() -> StaffInput {
        StaffInput {
            name: "Maria Lopez".to_string(),
            role: "Housekeeping".to_string(),
            email: "maria@acme.test".to_string(),
            phone: "+1 555 0111".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_add_room_persists_through_record_store() {
        let h = onboarded_harness().await;

        let room = h.catalog.add_room(room_input()).await.unwrap();

        let profile = h.manager.profile().await.unwrap();
        assert_eq!(profile.rooms.len(), 1);
        assert_eq!(profile.rooms[0].id, room.id);

        // Survives a re-fetch with the remote down: the cache has it.
        h.remote.set_offline(true);
        let key = RecordKey::new(HOTELS_COLLECTION, &profile.uid).unwrap();
        let fetched: OrganizationProfile = h.records.fetch(&key).await.unwrap();
        assert_eq!(fetched.rooms.len(), 1);
    }

    #[tokio::test]
    async fn test_add_room_requires_number_and_floor() {
        let h = onboarded_harness().await;
        let mut input = room_input();
        input.number = "".to_string();
        assert!(h.catalog.add_room(input).await.is_err());
    }

    #[tokio::test]
    async fn test_remove_room() {
        let h = onboarded_harness().await;
        let room = h.catalog.add_room(room_input()).await.unwrap();

        h.catalog.remove_room(&room.id).await.unwrap();
        assert!(h.manager.profile().await.unwrap().rooms.is_empty());

        let err = h.catalog.remove_room(&room.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_assign_and_unassign_staff() {
        let h = onboarded_harness().await;
        let room = h.catalog.add_room(room_input()).await.unwrap();
        let member = h.catalog.add_staff(staff_input()).await.unwrap();

        h.catalog.assign_staff(&room.id, &member.id).await.unwrap();
        // Idempotent: assigning again does not duplicate.
        h.catalog.assign_staff(&room.id, &member.id).await.unwrap();

        let profile = h.manager.profile().await.unwrap();
        assert_eq!(profile.rooms[0].assigned_staff_ids, vec![member.id.clone()]);

        h.catalog
            .unassign_staff(&room.id, &member.id)
            .await
            .unwrap();
        let profile = h.manager.profile().await.unwrap();
        assert!(profile.rooms[0].assigned_staff_ids.is_empty());
    }

    #[tokio::test]
    async fn test_assign_staff_requires_existing_references() {
        let h = onboarded_harness().await;
        let room = h.catalog.add_room(room_input()).await.unwrap();

        assert!(h.catalog.assign_staff(&room.id, "ghost").await.is_err());
        assert!(h.catalog.assign_staff("ghost", "ghost").await.is_err());
    }

    #[tokio::test]
    async fn test_remove_staff_unassigns_from_rooms() {
        let h = onboarded_harness().await;
        let room = h.catalog.add_room(room_input()).await.unwrap();
        let member = h.catalog.add_staff(staff_input()).await.unwrap();
        h.catalog.assign_staff(&room.id, &member.id).await.unwrap();

        h.catalog.remove_staff(&member.id).await.unwrap();

        let profile = h.manager.profile().await.unwrap();
        assert!(profile.staff.is_empty());
        assert!(profile.rooms[0].assigned_staff_ids.is_empty());
    }

    #[tokio::test]
    async fn test_edits_require_an_onboarded_session() {
        let h = onboarded_harness().await;
        h.manager.reset_onboarding().await;

        let err = h.catalog.add_room(room_input()).await.unwrap_err();
        assert!(matches!(err, TipcardError::NoActiveProfile));
    }

    #[tokio::test]
    async fn test_edits_update_timestamp() {
        let h = onboarded_harness().await;
        let before = h.manager.profile().await.unwrap().updated_at;

        h.catalog.add_room(room_input()).await.unwrap();

        let after = h.manager.profile().await.unwrap().updated_at;
        assert!(after >= before);
    }
}
