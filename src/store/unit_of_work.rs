//! Staging context for one logical user action.
//!
//! Writes are staged in program order and applied by [`UnitOfWork::save`] in a
//! single transaction. A failed save keeps everything staged so the caller can
//! retry or surface the error.

use super::{
    LocalStore, app_state, cascade,
    record::{Draft, Record, StagedRow},
};
use crate::{
    domain::{EntityKind, Owner},
    entities::{Medication, User},
    errors::{Error, Result},
    events::AppEvent,
};
use chrono::Utc;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, TransactionTrait, prelude::Uuid};
use std::{collections::BTreeSet, sync::atomic::Ordering};
use tracing::{debug, error, info, instrument};

#[derive(Clone, Debug)]
enum PendingOp {
    Insert {
        kind: EntityKind,
        owner: Option<Owner>,
        row: StagedRow,
    },
    Update {
        kind: EntityKind,
        id: Uuid,
        owner: Option<Owner>,
        row: StagedRow,
    },
    Delete {
        kind: EntityKind,
        id: Uuid,
    },
    SetActiveUser(Option<Uuid>),
    SetOnboardingCompleted(bool),
}

/// Writes staged against a [`LocalStore`], committed together.
#[derive(Debug)]
#[must_use = "staged writes are lost unless save() is called"]
pub struct UnitOfWork<'s> {
    store: &'s LocalStore,
    pending: Vec<PendingOp>,
}

impl<'s> UnitOfWork<'s> {
    pub(crate) const fn new(store: &'s LocalStore) -> Self {
        Self {
            store,
            pending: Vec::new(),
        }
    }

    /// Validates and stages a new record, returning its store-assigned id.
    ///
    /// Nothing is staged when validation fails.
    pub fn insert<D: Draft>(&mut self, draft: D) -> Result<Uuid> {
        draft.validate()?;
        let id = Uuid::new_v4();
        let owner = draft.owner();
        let row = draft.stage(id, Utc::now())?;
        debug!("Staged insert of {} {id}", D::KIND);
        self.pending.push(PendingOp::Insert {
            kind: D::KIND,
            owner,
            row,
        });
        Ok(id)
    }

    /// Validates and stages a full-row update of an existing record.
    pub fn update<R: Record>(&mut self, record: &R) -> Result<()> {
        record.validate()?;
        let row = record.stage_update(Utc::now())?;
        self.pending.push(PendingOp::Update {
            kind: R::KIND,
            id: record.id(),
            owner: record.owner(),
            row,
        });
        Ok(())
    }

    /// Stages removal of a record and everything it owns.
    pub fn delete<R: Record>(&mut self, id: Uuid) {
        self.pending.push(PendingOp::Delete { kind: R::KIND, id });
    }

    /// Stages the active profile reference.
    pub fn set_active_user(&mut self, user_id: Option<Uuid>) {
        self.pending.push(PendingOp::SetActiveUser(user_id));
    }

    /// Stages a write of the onboarding flag.
    pub fn set_onboarding_completed(&mut self, completed: bool) {
        self.pending.push(PendingOp::SetOnboardingCompleted(completed));
    }

    /// Number of staged writes not yet committed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drops every staged write.
    pub fn discard(&mut self) {
        self.pending.clear();
    }

    /// Commits every staged write atomically, returning the new store generation.
    ///
    /// On failure the transaction is rolled back and the staged writes are
    /// kept, so calling `save` again retries the whole unit.
    #[instrument(skip(self), fields(ops = self.pending.len()))]
    pub async fn save(&mut self) -> Result<u64> {
        if self.pending.is_empty() {
            return Ok(self.store.generation());
        }

        let _writer = self.store.writer.lock().await;
        match self.apply().await {
            Ok(kinds) => {
                let committed = self.pending.len();
                self.pending.clear();
                let generation = self.store.generation.fetch_add(1, Ordering::SeqCst) + 1;
                info!("Committed {committed} writes (generation {generation})");
                self.store
                    .events
                    .publish(AppEvent::Committed { generation, kinds });
                Ok(generation)
            }
            Err(e) => {
                error!(
                    "Commit failed, {} staged writes kept for retry: {e}",
                    self.pending.len()
                );
                Err(e)
            }
        }
    }

    async fn apply(&self) -> Result<BTreeSet<EntityKind>> {
        let txn = self.store.db.begin().await?;
        let mut kinds = BTreeSet::new();

        for op in self.pending.iter().cloned() {
            match op {
                PendingOp::Insert { kind, owner, row } => {
                    if let Some(owner) = owner {
                        ensure_owner(&txn, owner).await?;
                    }
                    row.insert(&txn).await?;
                    kinds.insert(kind);
                }
                PendingOp::Update {
                    kind,
                    id,
                    owner,
                    row,
                } => {
                    if let Some(owner) = owner {
                        ensure_owner(&txn, owner).await?;
                    }
                    row.update(&txn).await.map_err(|e| match e {
                        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => {
                            Error::NotFound { kind, id }
                        }
                        other => other.into(),
                    })?;
                    kinds.insert(kind);
                }
                PendingOp::Delete { kind, id } => {
                    kinds.extend(cascade::delete(&txn, kind, id).await?);
                }
                PendingOp::SetActiveUser(user_id) => {
                    if let Some(id) = user_id {
                        ensure_owner(&txn, Owner::User(id)).await?;
                    }
                    app_state::set_active_user(&txn, user_id).await?;
                    kinds.insert(EntityKind::AppState);
                }
                PendingOp::SetOnboardingCompleted(completed) => {
                    app_state::set_onboarding_completed(&txn, completed).await?;
                    kinds.insert(EntityKind::AppState);
                }
            }
        }

        txn.commit().await?;
        Ok(kinds)
    }
}

/// Fails the unit with a constraint error when the owning row is missing.
async fn ensure_owner<C>(db: &C, owner: Owner) -> Result<()>
where
    C: ConnectionTrait,
{
    let exists = match owner {
        Owner::User(id) => User::find_by_id(id).one(db).await?.is_some(),
        Owner::Medication(id) => Medication::find_by_id(id).one(db).await?.is_some(),
    };
    if exists {
        Ok(())
    } else {
        Err(Error::constraint(format!("owner {owner:?} does not exist")))
    }
}
