//! The parent's profile and the baby recorded alongside it.

use super::{
    DeliveryType, EntityKind, Gender, Owner,
    bounds::{check_not_blank, check_positive},
    tokens::decode_optional,
};
use crate::{
    entities::{baby, user},
    errors::Result,
    store::{Draft, Record, StagedRow},
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::NotSet, Set, prelude::Uuid};

/// The root of the tracking aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub birth_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub delivery_type: Option<DeliveryType>,
    pub profile_image: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Input for a new [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub birth_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub delivery_type: Option<DeliveryType>,
    pub profile_image: Option<Vec<u8>>,
}

fn validate_user(name: &str) -> Result<()> {
    check_not_blank("name", name)
}

impl Draft for NewUser {
    const KIND: EntityKind = EntityKind::User;

    fn owner(&self) -> Option<Owner> {
        None
    }

    fn validate(&self) -> Result<()> {
        validate_user(&self.name)
    }

    fn stage(self, id: Uuid, now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::User(user::ActiveModel {
            id: Set(id),
            name: Set(self.name.trim().to_string()),
            birth_date: Set(self.birth_date),
            delivery_date: Set(self.delivery_date),
            delivery_type: Set(self.delivery_type.map(|t| t.as_token().to_string())),
            profile_image: Set(self.profile_image),
            created_at: Set(now),
            last_modified: Set(now),
        }))
    }
}

impl Record for User {
    type Entity = user::Entity;
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> Uuid {
        self.id
    }

    fn id_column() -> user::Column {
        user::Column::Id
    }

    fn decode(model: user::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            name: model.name,
            birth_date: model.birth_date,
            delivery_date: model.delivery_date,
            delivery_type: decode_optional(model.delivery_type.as_deref()),
            profile_image: model.profile_image,
            created_at: model.created_at,
            last_modified: model.last_modified,
        })
    }

    fn owner(&self) -> Option<Owner> {
        None
    }

    fn validate(&self) -> Result<()> {
        validate_user(&self.name)
    }

    fn stage_update(&self, now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::User(user::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(self.id),
            name: Set(self.name.trim().to_string()),
            birth_date: Set(self.birth_date),
            delivery_date: Set(self.delivery_date),
            delivery_type: Set(self.delivery_type.map(|t| t.as_token().to_string())),
            profile_image: Set(self.profile_image.clone()),
            created_at: NotSet,
            last_modified: Set(now),
        }))
    }
}

/// A baby linked to its parent's profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Baby {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub birth_date: DateTime<Utc>,
    pub birth_weight: Option<f64>,
    pub birth_length: Option<f64>,
    pub gender: Gender,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Input for a new [`Baby`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewBaby {
    pub user_id: Option<Uuid>,
    pub name: String,
    pub birth_date: DateTime<Utc>,
    pub birth_weight: Option<f64>,
    pub birth_length: Option<f64>,
    pub gender: Gender,
}

fn validate_baby(name: &str, weight: Option<f64>, length: Option<f64>) -> Result<()> {
    check_not_blank("baby name", name)?;
    check_positive("birth_weight", weight)?;
    check_positive("birth_length", length)
}

impl Draft for NewBaby {
    const KIND: EntityKind = EntityKind::Baby;

    fn owner(&self) -> Option<Owner> {
        self.user_id.map(Owner::User)
    }

    fn validate(&self) -> Result<()> {
        validate_baby(&self.name, self.birth_weight, self.birth_length)
    }

    fn stage(self, id: Uuid, now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::Baby(baby::ActiveModel {
            id: Set(id),
            user_id: Set(self.user_id),
            name: Set(self.name.trim().to_string()),
            birth_date: Set(self.birth_date),
            birth_weight: Set(self.birth_weight),
            birth_length: Set(self.birth_length),
            gender: Set(self.gender.as_token().to_string()),
            created_at: Set(now),
            last_modified: Set(now),
        }))
    }
}

impl Record for Baby {
    type Entity = baby::Entity;
    const KIND: EntityKind = EntityKind::Baby;

    fn id(&self) -> Uuid {
        self.id
    }

    fn id_column() -> baby::Column {
        baby::Column::Id
    }

    fn decode(model: baby::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            birth_date: model.birth_date,
            birth_weight: model.birth_weight,
            birth_length: model.birth_length,
            gender: Gender::from_token(&model.gender)?,
            created_at: model.created_at,
            last_modified: model.last_modified,
        })
    }

    fn owner(&self) -> Option<Owner> {
        self.user_id.map(Owner::User)
    }

    fn validate(&self) -> Result<()> {
        validate_baby(&self.name, self.birth_weight, self.birth_length)
    }

    fn stage_update(&self, now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::Baby(baby::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(self.id),
            user_id: Set(self.user_id),
            name: Set(self.name.trim().to_string()),
            birth_date: Set(self.birth_date),
            birth_weight: Set(self.birth_weight),
            birth_length: Set(self.birth_length),
            gender: Set(self.gender.as_token().to_string()),
            created_at: NotSet,
            last_modified: Set(now),
        }))
    }
}
