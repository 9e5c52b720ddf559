use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accepts the hyphenated UUID form issued by [`ApplicationId::generate`].
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim())
            .ok()
            .map(|uuid| Self(uuid.hyphenated().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review workflow state. Any status may move to any other.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == raw.trim())
    }
}

/// Declares a closed set of string literals persisted verbatim.
macro_rules! bracket_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $literal:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $literal)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $literal,)+
                }
            }

            pub fn parse(raw: &str) -> Option<Self> {
                let raw = raw.trim();
                Self::ALL.iter().copied().find(|value| value.label() == raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

bracket_enum! {
    /// Monthly revenue bracket.
    RevenueBracket {
        Under10K => "Under $10K/month",
        From10KTo50K => "$10K-50K/month",
        From50KTo100K => "$50K-100K/month",
        From100KTo500K => "$100K-500K/month",
        From500KTo1M => "$500K-1M/month",
        Over1M => "Over $1M/month",
    }
}

bracket_enum! {
    /// Monthly marketing budget bracket.
    BudgetBracket {
        Under5K => "Under $5K/month",
        From5KTo15K => "$5K-15K/month",
        From15KTo30K => "$15K-30K/month",
        From30KTo50K => "$30K-50K/month",
        Over50K => "Over $50K/month",
    }
}

bracket_enum! {
    /// How soon the prospect wants to start.
    Timeline {
        Asap => "ASAP (Within 30 days)",
        OneToThreeMonths => "1-3 months",
        ThreeToSixMonths => "3-6 months",
        SixPlusMonths => "6+ months",
    }
}

impl RevenueBracket {
    /// Maps the quick form's `monthlyRevenue` option onto the stored bracket.
    pub fn from_form_option(option: Option<&str>) -> Self {
        match option.map(str::trim) {
            Some("10k-50k") => Self::From10KTo50K,
            Some("50k-200k") => Self::From50KTo100K,
            Some("200k-plus") | Some("more-than-200k") => Self::From100KTo500K,
            _ => Self::Under10K,
        }
    }
}

impl BudgetBracket {
    /// Maps the quick form's `monthlyBudget` option onto the stored bracket.
    pub fn from_form_option(option: Option<&str>) -> Self {
        match option.map(str::trim) {
            Some("2.5k-5k") => Self::From5KTo15K,
            Some("5k-10k") => Self::From15KTo30K,
            Some("10k-plus") => Self::From30KTo50K,
            _ => Self::Under5K,
        }
    }
}

/// Contact and business profile captured at submission, after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub website: Option<String>,
    pub company: String,
    pub revenue: RevenueBracket,
    pub challenges: String,
    pub goals: String,
    pub timeline: Timeline,
    pub budget: BudgetBracket,
}

impl NewApplication {
    /// Stamps identity and workflow defaults onto the draft.
    pub fn into_record(self, id: ApplicationId, now: DateTime<Utc>) -> ApplicationRecord {
        ApplicationRecord {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            instagram: self.instagram,
            tiktok: self.tiktok,
            website: self.website,
            company: self.company,
            revenue: self.revenue,
            challenges: self.challenges,
            goals: self.goals,
            timeline: self.timeline,
            budget: self.budget,
            status: ApplicationStatus::Pending,
            submitted_at: now,
            reviewed_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Persisted application document. Field names match the stored collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: ApplicationId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub company: String,
    pub revenue: RevenueBracket,
    pub challenges: String,
    pub goals: String,
    pub timeline: Timeline,
    pub budget: BudgetBracket,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-status totals shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusStats {
    pub pending: u64,
    pub reviewed: u64,
    pub approved: u64,
    pub rejected: u64,
}

impl StatusStats {
    pub fn record(&mut self, status: ApplicationStatus, count: u64) {
        match status {
            ApplicationStatus::Pending => self.pending += count,
            ApplicationStatus::Reviewed => self.reviewed += count,
            ApplicationStatus::Approved => self.approved += count,
            ApplicationStatus::Rejected => self.rejected += count,
        }
    }

    pub fn total(&self) -> u64 {
        self.pending + self.reviewed + self.approved + self.rejected
    }
}

/// Current time truncated to milliseconds, the precision both stores keep.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
