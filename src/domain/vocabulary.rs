//! Closed tag and category vocabularies.
//!
//! Every case persists as a stable string token. Tokens are what the store and
//! the remote mirror see; they must never be renamed once released, only added.

use crate::errors::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::{fmt, str::FromStr};

/// Declares a vocabulary enum together with its token table.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $token:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every case, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// The persisted token for this case.
            #[must_use]
            pub const fn as_token(self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)+
                }
            }

            /// Reconstructs a case from its persisted token.
            pub fn from_token(token: &str) -> Result<Self> {
                match token {
                    $($token => Ok(Self::$variant),)+
                    other => Err(Error::UnknownVariant {
                        vocabulary: stringify!($name),
                        token: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_token())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_token(s)
            }
        }

        impl super::tokens::Token for $name {
            fn token(&self) -> &'static str {
                self.as_token()
            }

            fn parse_token(token: &str) -> Result<Self> {
                Self::from_token(token)
            }
        }
    };
}

vocabulary! {
    /// How the baby was delivered
    DeliveryType {
        Vaginal => "Vaginal Birth",
        Cesarean => "C-Section",
    }
}

vocabulary! {
    /// Baby's gender as recorded at onboarding
    Gender {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
}

vocabulary! {
    /// Emotional symptoms offered on the mood check-in
    PostpartumSymptom {
        Sadness => "Feeling Sad",
        Anxiety => "Anxiety",
        Overwhelmed => "Feeling Overwhelmed",
        Crying => "Crying Spells",
        Irritability => "Irritability",
        SleepIssues => "Sleep Problems",
        AppetiteChanges => "Appetite Changes",
        Concentration => "Difficulty Concentrating",
        Worthlessness => "Feelings of Worthlessness",
        Disconnected => "Feeling Disconnected",
    }
}

vocabulary! {
    /// Physical recovery symptoms
    PhysicalSymptom {
        IncisionPain => "Incision Pain",
        BreastPain => "Breast Pain",
        Cramping => "Cramping",
        BackPain => "Back Pain",
        PelvicPain => "Pelvic Pain",
        Headache => "Headache",
        Swelling => "Swelling",
        Fatigue => "Fatigue",
        Constipation => "Constipation",
        Hemorrhoids => "Hemorrhoids",
    }
}

vocabulary! {
    /// Lochia level on a recovery entry
    BleedingLevel {
        None => "None",
        Light => "Light",
        Moderate => "Moderate",
        Heavy => "Heavy",
    }
}

vocabulary! {
    /// Kind of self-care activity
    ActivityType {
        Meditation => "Meditation",
        Exercise => "Exercise",
        Shower => "Shower",
        Nap => "Nap",
        Reading => "Reading",
        Outdoors => "Time Outdoors",
        Hobby => "Hobby",
        Socializing => "Socializing",
        PelvicFloor => "Pelvic Floor Exercise",
        Breathing => "Breathing Exercise",
    }
}

vocabulary! {
    /// How often a medication is taken
    FrequencyType {
        Daily => "Daily",
        Weekly => "Weekly",
        AsNeeded => "As Needed",
        Custom => "Custom",
    }
}

vocabulary! {
    /// Reminder slots for a medication
    TimeOfDay {
        Morning => "Morning",
        Afternoon => "Afternoon",
        Evening => "Evening",
        Bedtime => "Bedtime",
    }
}

vocabulary! {
    /// Tags a journal entry can carry
    JournalTag {
        Milestone => "Milestone",
        Gratitude => "Gratitude",
        Challenge => "Challenge",
        Victory => "Victory",
        Reflection => "Reflection",
        Goal => "Goal",
        Memory => "Memory",
        Support => "Support",
    }
}

impl TimeOfDay {
    /// Hour of day a reminder in this slot defaults to.
    #[must_use]
    pub const fn default_hour(self) -> u32 {
        match self {
            Self::Morning => 8,
            Self::Afternoon => 13,
            Self::Evening => 18,
            Self::Bedtime => 22,
        }
    }

    /// Default scheduled time for this slot on the given day.
    #[must_use]
    pub fn default_time(self, on: NaiveDate) -> NaiveDateTime {
        let time = NaiveTime::from_hms_opt(self.default_hour(), 0, 0).unwrap_or(NaiveTime::MIN);
        on.and_time(time)
    }
}
