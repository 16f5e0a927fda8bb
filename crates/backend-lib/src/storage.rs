// ============================
// carebridge-backend-lib/src/storage.rs
// ============================
//! Storage abstraction with flat-file implementation.
//!
//! The flat-file store keeps the user/hospital/membership tables in
//! memory behind one `RwLock` and persists them as a single JSON
//! document via write-to-temp-then-rename. Compound operations
//! (`create_hospital`, `add_staff`, `update_membership`) run their
//! whole check-then-act sequence under one write-lock acquisition;
//! that lock is the isolation boundary that keeps concurrent calls
//! from both passing the same uniqueness check.
use async_trait::async_trait;
use carebridge_common::{HospitalStatus, Role, UpdateHospitalRequest};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::{fs as tokio_fs, sync::RwLock};
use uuid::Uuid;

use crate::error::AppError;
use crate::model::{Hospital, Membership, User};

/// Trait for directory storage backends
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Insert a new user. Fails with a field error if the email is
    /// already taken (case-insensitive).
    async fn insert_user(&self, user: User) -> Result<User, AppError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Case-insensitive email lookup.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Insert a hospital together with its founding admin membership.
    /// Both rows become visible together or not at all. Fails with a
    /// field error if the registration number is already taken.
    async fn create_hospital(
        &self,
        hospital: Hospital,
        founder_id: Uuid,
    ) -> Result<(Hospital, Membership), AppError>;

    async fn find_hospital(&self, id: Uuid) -> Result<Option<Hospital>, AppError>;

    async fn list_hospitals(&self) -> Result<Vec<Hospital>, AppError>;

    /// Overwrite contact fields. Status is untouched by this path.
    async fn update_hospital(
        &self,
        id: Uuid,
        changes: UpdateHospitalRequest,
    ) -> Result<Hospital, AppError>;

    /// Unconditional status overwrite; any status is reachable from any
    /// other. Callers restrict who may invoke this.
    async fn set_hospital_status(
        &self,
        id: Uuid,
        status: HospitalStatus,
    ) -> Result<Hospital, AppError>;

    /// The single active membership for a (user, hospital) pair, if
    /// any. Basis of every authorization decision.
    async fn find_active_membership(
        &self,
        user_id: Uuid,
        hospital_id: Uuid,
    ) -> Result<Option<Membership>, AppError>;

    /// All memberships held by a user, active or not.
    async fn memberships_for_user(&self, user_id: Uuid) -> Result<Vec<Membership>, AppError>;

    /// All memberships of a hospital, active and inactive.
    async fn list_staff(&self, hospital_id: Uuid) -> Result<Vec<Membership>, AppError>;

    /// Add or reactivate a staff membership.
    ///
    /// Existing active row → `AlreadyMember`. Existing inactive row →
    /// reactivated in place with the new role and inviter, keeping its
    /// id. Otherwise a nurse may not hold an active nurse assignment at
    /// any other hospital (`NurseAlreadyAssigned`); if all checks pass
    /// a new active row is inserted.
    async fn add_staff(
        &self,
        hospital_id: Uuid,
        user_id: Uuid,
        role: Role,
        invited_by: Uuid,
    ) -> Result<Membership, AppError>;

    /// Partial overwrite of role and/or active flag. A change that
    /// would leave the row as an active nurse assignment re-checks the
    /// system-wide nurse invariant.
    async fn update_membership(
        &self,
        hospital_id: Uuid,
        membership_id: Uuid,
        role: Option<Role>,
        active: Option<bool>,
    ) -> Result<Membership, AppError>;

    /// Soft removal: flips `is_active` to false, never deletes.
    async fn deactivate_membership(
        &self,
        hospital_id: Uuid,
        membership_id: Uuid,
    ) -> Result<Membership, AppError>;
}

/// The three directory tables, persisted together so multi-row writes
/// land in one atomic file replacement.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Tables {
    users: Vec<User>,
    hospitals: Vec<Hospital>,
    memberships: Vec<Membership>,
}

/// Flat-file implementation of the `Store` trait
pub struct FlatFileStore {
    path: PathBuf,
    tables: RwLock<Tables>,
}

impl FlatFileStore {
    /// Open (or initialize) a store rooted at `dir`.
    pub async fn open<P: AsRef<Path>>(dir: P) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        tokio_fs::create_dir_all(&dir).await?;
        let path = dir.join("directory.json");

        let tables = if path.exists() {
            let content = tokio_fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            Tables::default()
        };

        Ok(Self {
            path,
            tables: RwLock::new(tables),
        })
    }

    /// Write the tables to disk. Temp-file-then-rename keeps a crash
    /// from ever leaving a half-written document behind.
    async fn persist(&self, tables: &Tables) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(tables)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for FlatFileStore {
    async fn insert_user(&self, user: User) -> Result<User, AppError> {
        let mut t = self.tables.write().await;
        if t.users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::field(
                "email",
                "A user with this email already exists.",
            ));
        }
        t.users.push(user.clone());
        self.persist(&t).await?;
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let t = self.tables.read().await;
        Ok(t.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_hospital(
        &self,
        hospital: Hospital,
        founder_id: Uuid,
    ) -> Result<(Hospital, Membership), AppError> {
        let mut t = self.tables.write().await;
        if t.hospitals
            .iter()
            .any(|h| h.registration_number.eq_ignore_ascii_case(&hospital.registration_number))
        {
            return Err(AppError::field(
                "registration_number",
                "A hospital with this registration number already exists.",
            ));
        }
        if !t.users.iter().any(|u| u.id == founder_id) {
            return Err(AppError::UserNotFound);
        }

        // A hospital must never exist without its founding admin: both
        // rows go into the same persisted document.
        let membership = Membership::new(
            founder_id,
            hospital.id,
            Role::HospitalAdmin,
            Some(founder_id),
        );
        t.hospitals.push(hospital.clone());
        t.memberships.push(membership.clone());
        if let Err(e) = self.persist(&t).await {
            t.hospitals.pop();
            t.memberships.pop();
            return Err(e);
        }
        Ok((hospital, membership))
    }

    async fn find_hospital(&self, id: Uuid) -> Result<Option<Hospital>, AppError> {
        let t = self.tables.read().await;
        Ok(t.hospitals.iter().find(|h| h.id == id).cloned())
    }

    async fn list_hospitals(&self) -> Result<Vec<Hospital>, AppError> {
        let t = self.tables.read().await;
        let mut hospitals = t.hospitals.clone();
        hospitals.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(hospitals)
    }

    async fn update_hospital(
        &self,
        id: Uuid,
        changes: UpdateHospitalRequest,
    ) -> Result<Hospital, AppError> {
        let mut t = self.tables.write().await;
        let idx = t
            .hospitals
            .iter()
            .position(|h| h.id == id)
            .ok_or(AppError::HospitalNotFound)?;
        {
            let h = &mut t.hospitals[idx];
            if let Some(name) = changes.name {
                h.name = name;
            }
            if let Some(email) = changes.email {
                h.email = email;
            }
            if let Some(phone) = changes.phone {
                h.phone = phone;
            }
            if let Some(address) = changes.address {
                h.address = address;
            }
            if let Some(city) = changes.city {
                h.city = city;
            }
            if let Some(country) = changes.country {
                h.country = country;
            }
            h.updated_at = Utc::now();
        }
        let out = t.hospitals[idx].clone();
        self.persist(&t).await?;
        Ok(out)
    }

    async fn set_hospital_status(
        &self,
        id: Uuid,
        status: HospitalStatus,
    ) -> Result<Hospital, AppError> {
        let mut t = self.tables.write().await;
        let idx = t
            .hospitals
            .iter()
            .position(|h| h.id == id)
            .ok_or(AppError::HospitalNotFound)?;
        t.hospitals[idx].status = status;
        t.hospitals[idx].updated_at = Utc::now();
        let out = t.hospitals[idx].clone();
        self.persist(&t).await?;
        Ok(out)
    }

    async fn find_active_membership(
        &self,
        user_id: Uuid,
        hospital_id: Uuid,
    ) -> Result<Option<Membership>, AppError> {
        let t = self.tables.read().await;
        Ok(t.memberships
            .iter()
            .find(|m| m.user_id == user_id && m.hospital_id == hospital_id && m.is_active)
            .cloned())
    }

    async fn memberships_for_user(&self, user_id: Uuid) -> Result<Vec<Membership>, AppError> {
        let t = self.tables.read().await;
        Ok(t.memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_staff(&self, hospital_id: Uuid) -> Result<Vec<Membership>, AppError> {
        let t = self.tables.read().await;
        Ok(t.memberships
            .iter()
            .filter(|m| m.hospital_id == hospital_id)
            .cloned()
            .collect())
    }

    async fn add_staff(
        &self,
        hospital_id: Uuid,
        user_id: Uuid,
        role: Role,
        invited_by: Uuid,
    ) -> Result<Membership, AppError> {
        let mut t = self.tables.write().await;
        if !t.users.iter().any(|u| u.id == user_id) {
            return Err(AppError::UserNotFound);
        }
        if !t.hospitals.iter().any(|h| h.id == hospital_id) {
            return Err(AppError::HospitalNotFound);
        }

        if let Some(idx) = t
            .memberships
            .iter()
            .position(|m| m.user_id == user_id && m.hospital_id == hospital_id)
        {
            if t.memberships[idx].is_active {
                return Err(AppError::AlreadyMember);
            }
            // Reactivate instead of creating a duplicate: overwrite the
            // role and inviter, keep the row identity.
            {
                let m = &mut t.memberships[idx];
                m.role = role;
                m.is_active = true;
                m.invited_by = Some(invited_by);
                m.updated_at = Utc::now();
            }
            let out = t.memberships[idx].clone();
            self.persist(&t).await?;
            return Ok(out);
        }

        // A nurse holds at most one active nurse assignment across all
        // hospitals.
        if role == Role::Nurse
            && t.memberships
                .iter()
                .any(|m| m.user_id == user_id && m.role == Role::Nurse && m.is_active)
        {
            return Err(AppError::NurseAlreadyAssigned);
        }

        let membership = Membership::new(user_id, hospital_id, role, Some(invited_by));
        t.memberships.push(membership.clone());
        if let Err(e) = self.persist(&t).await {
            t.memberships.pop();
            return Err(e);
        }
        Ok(membership)
    }

    async fn update_membership(
        &self,
        hospital_id: Uuid,
        membership_id: Uuid,
        role: Option<Role>,
        active: Option<bool>,
    ) -> Result<Membership, AppError> {
        let mut t = self.tables.write().await;
        let idx = t
            .memberships
            .iter()
            .position(|m| m.id == membership_id && m.hospital_id == hospital_id)
            .ok_or(AppError::MembershipNotFound)?;

        let new_role = role.unwrap_or(t.memberships[idx].role);
        let new_active = active.unwrap_or(t.memberships[idx].is_active);

        if new_role == Role::Nurse && new_active {
            let user_id = t.memberships[idx].user_id;
            if t.memberships
                .iter()
                .any(|m| m.id != membership_id && m.user_id == user_id && m.role == Role::Nurse && m.is_active)
            {
                return Err(AppError::NurseAlreadyAssigned);
            }
        }

        {
            let m = &mut t.memberships[idx];
            m.role = new_role;
            m.is_active = new_active;
            m.updated_at = Utc::now();
        }
        let out = t.memberships[idx].clone();
        self.persist(&t).await?;
        Ok(out)
    }

    async fn deactivate_membership(
        &self,
        hospital_id: Uuid,
        membership_id: Uuid,
    ) -> Result<Membership, AppError> {
        let mut t = self.tables.write().await;
        let idx = t
            .memberships
            .iter()
            .position(|m| m.id == membership_id && m.hospital_id == hospital_id)
            .ok_or(AppError::MembershipNotFound)?;
        {
            let m = &mut t.memberships[idx];
            m.is_active = false;
            m.updated_at = Utc::now();
        }
        let out = t.memberships[idx].clone();
        self.persist(&t).await?;
        Ok(out)
    }
}
