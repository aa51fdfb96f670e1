//! First-run onboarding - creates the profile, the baby and the app flags.
//!
//! Everything the flow writes commits in one unit. The remote mirror runs
//! afterwards and can only ever fail quietly.

use crate::{
    domain::{DeliveryType, Gender, NewBaby, NewUser, User, bounds::check_positive},
    errors::{Error, Result},
    events::AppEvent,
    store::LocalStore,
    sync::SyncAgent,
};
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

/// Details of a baby that has already been born.
#[derive(Debug, Clone, PartialEq)]
pub struct BabyDetails {
    /// Must not be blank
    pub name: String,
    /// Not in the future
    pub birth_date: DateTime<Utc>,
    pub gender: Gender,
    /// Kilograms
    pub birth_weight: Option<f64>,
    /// Centimetres
    pub birth_length: Option<f64>,
}

/// What the onboarding screens collect.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingForm {
    /// The parent's name; must not be blank
    pub name: String,
    /// The parent's birth date; must be in the past
    pub birth_date: DateTime<Utc>,
    /// Due date while the baby is not born yet
    pub due_date: DateTime<Utc>,
    /// Kept only when the baby is born
    pub delivery_type: DeliveryType,
    /// Raw image bytes, mirrored as an asset
    pub profile_image: Option<Vec<u8>>,
    /// `Some` once the baby is born
    pub baby: Option<BabyDetails>,
}

impl OnboardingForm {
    /// Checks the profile step: a name and a birth date in the past.
    pub fn validate_profile(&self, now: DateTime<Utc>) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::constraint("name cannot be empty"));
        }
        if self.birth_date >= now {
            return Err(Error::constraint("birth date must be in the past"));
        }
        Ok(())
    }

    /// Checks the delivery step.
    pub fn validate_delivery(&self, now: DateTime<Utc>) -> Result<()> {
        match &self.baby {
            Some(baby) => {
                if baby.name.trim().is_empty() {
                    return Err(Error::constraint("baby name cannot be empty"));
                }
                if baby.birth_date > now {
                    return Err(Error::constraint("baby birth date cannot be in the future"));
                }
                check_positive("birth_weight", baby.birth_weight)?;
                check_positive("birth_length", baby.birth_length)
            }
            None if self.due_date <= now => {
                Err(Error::constraint("due date must be in the future"))
            }
            None => Ok(()),
        }
    }

    /// Runs both steps' checks.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        self.validate_profile(now)?;
        self.validate_delivery(now)
    }

    /// The profile row. A born baby fixes the delivery date and keeps the
    /// delivery type; before birth only the due date is known.
    fn user_draft(&self) -> NewUser {
        let (delivery_date, delivery_type) = match &self.baby {
            Some(baby) => (baby.birth_date, Some(self.delivery_type)),
            None => (self.due_date, None),
        };
        NewUser {
            name: self.name.clone(),
            birth_date: self.birth_date,
            delivery_date,
            delivery_type,
            profile_image: self.profile_image.clone(),
        }
    }
}

/// Commits the onboarding profile, mirrors it best effort and announces
/// completion.
///
/// A sync failure is logged and ignored. A local failure is returned and no
/// completion event is sent.
///
/// # Errors
/// * `Constraint` if the form is invalid
/// * `Persistence` if the commit fails
#[instrument(skip_all)]
pub async fn complete_onboarding(
    store: &LocalStore,
    sync: &SyncAgent,
    form: &OnboardingForm,
) -> Result<User> {
    form.validate(Utc::now())?;

    let mut unit = store.begin();
    let user_id = unit.insert(form.user_draft())?;
    if let Some(baby) = &form.baby {
        unit.insert(NewBaby {
            user_id: Some(user_id),
            name: baby.name.clone(),
            birth_date: baby.birth_date,
            birth_weight: baby.birth_weight,
            birth_length: baby.birth_length,
            gender: baby.gender,
        })?;
    }
    unit.set_active_user(Some(user_id));
    unit.set_onboarding_completed(true);
    unit.save().await?;

    let user: User = store.get(user_id).await?;
    sync.mirror_best_effort(&user).await;

    store.events().publish(AppEvent::OnboardingCompleted);
    info!("Onboarding completed for user {user_id}");
    Ok(user)
}
