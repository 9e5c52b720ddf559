use serde::Deserialize;

use super::domain::{BudgetBracket, NewApplication, RevenueBracket, Timeline};
use super::validation::{is_basic_email, normalize_email, normalize_text, ValidationError};

const DEFAULT_CHALLENGES: &str = "General business growth";
const DEFAULT_GOALS: &str = "Growth and scaling objectives";

/// Body accepted by `POST /api/contact`.
///
/// Both site forms post here. The quick lead form is recognised by `fullName`;
/// anything else is treated as the detailed application form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    // quick lead form
    pub full_name: Option<String>,
    pub monthly_revenue: Option<String>,
    pub monthly_budget: Option<String>,
    pub help_needed: Option<Vec<String>>,
    // detailed application form
    pub name: Option<String>,
    pub company: Option<String>,
    pub revenue: Option<String>,
    pub challenges: Option<String>,
    pub timeline: Option<String>,
    pub budget: Option<String>,
    // shared
    pub email: Option<String>,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub website: Option<String>,
    pub goals: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormVariant {
    QuickLead,
    DetailedApplication,
}

impl ContactRequest {
    pub fn variant(&self) -> FormVariant {
        if self.full_name.is_some() {
            FormVariant::QuickLead
        } else {
            FormVariant::DetailedApplication
        }
    }

    /// Checks required fields and the basic email shape, then maps the form
    /// onto the stored document fields.
    pub fn into_new_application(self) -> Result<NewApplication, ValidationError> {
        match self.variant() {
            FormVariant::QuickLead => self.quick_lead(),
            FormVariant::DetailedApplication => self.detailed_application(),
        }
    }

    fn quick_lead(self) -> Result<NewApplication, ValidationError> {
        let full_name = normalize_text(self.full_name);
        let email = normalize_text(self.email);
        let phone = normalize_text(self.phone);
        let (Some(full_name), Some(email), Some(phone)) = (full_name, email, phone) else {
            return Err(ValidationError::MissingFields);
        };
        let email = checked_email(&email)?;

        let website = normalize_text(self.website);
        let company = website
            .clone()
            .unwrap_or_else(|| format!("{full_name}'s Business"));

        let help_needed: Vec<String> = self
            .help_needed
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| normalize_text(Some(item)))
            .collect();
        let challenges = if help_needed.is_empty() {
            DEFAULT_CHALLENGES.to_string()
        } else {
            format!("Help needed with: {}", help_needed.join(", "))
        };

        Ok(NewApplication {
            name: full_name,
            email,
            phone: Some(phone),
            instagram: normalize_text(self.instagram),
            tiktok: normalize_text(self.tiktok),
            website,
            company,
            revenue: RevenueBracket::from_form_option(self.monthly_revenue.as_deref()),
            challenges,
            goals: normalize_text(self.goals).unwrap_or_else(|| DEFAULT_GOALS.to_string()),
            timeline: Timeline::OneToThreeMonths,
            budget: BudgetBracket::from_form_option(self.monthly_budget.as_deref()),
        })
    }

    fn detailed_application(self) -> Result<NewApplication, ValidationError> {
        let (
            Some(name),
            Some(email),
            Some(company),
            Some(revenue),
            Some(challenges),
            Some(goals),
            Some(timeline),
            Some(budget),
        ) = (
            normalize_text(self.name),
            normalize_text(self.email),
            normalize_text(self.company),
            normalize_text(self.revenue),
            normalize_text(self.challenges),
            normalize_text(self.goals),
            normalize_text(self.timeline),
            normalize_text(self.budget),
        )
        else {
            return Err(ValidationError::MissingFields);
        };
        let email = checked_email(&email)?;

        let revenue = RevenueBracket::parse(&revenue).ok_or(ValidationError::InvalidChoice {
            field: "revenue",
            value: revenue,
        })?;
        let timeline = Timeline::parse(&timeline).ok_or(ValidationError::InvalidChoice {
            field: "timeline",
            value: timeline,
        })?;
        let budget = BudgetBracket::parse(&budget).ok_or(ValidationError::InvalidChoice {
            field: "budget",
            value: budget,
        })?;

        Ok(NewApplication {
            name,
            email,
            phone: normalize_text(self.phone),
            instagram: normalize_text(self.instagram),
            tiktok: normalize_text(self.tiktok),
            website: normalize_text(self.website),
            company,
            revenue,
            challenges,
            goals,
            timeline,
            budget,
        })
    }
}

fn checked_email(raw: &str) -> Result<String, ValidationError> {
    if !is_basic_email(raw.trim()) {
        return Err(ValidationError::InvalidEmailFormat);
    }
    Ok(normalize_email(raw))
}
