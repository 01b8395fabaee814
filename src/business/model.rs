//! Business profile created at the end of onboarding.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a business. Businesses are never deleted, only
/// transitioned between these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    Trial,
    Active,
    Paused,
    Expired,
}

impl BusinessStatus {
    /// Whether the auto-responder answers customers in this state.
    pub fn is_responding(&self) -> bool {
        matches!(self, Self::Trial | Self::Active)
    }
}

impl std::fmt::Display for BusinessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Trial => "trial",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for BusinessStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial" => Ok(Self::Trial),
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "expired" => Ok(Self::Expired),
            other => Err(format!("unknown business status '{other}'")),
        }
    }
}

/// The five answers collected by the onboarding interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDraft {
    /// Business type code, `"1"` through `"10"`.
    pub business_type: String,
    pub name: String,
    /// Resolved product category label.
    pub category: String,
    pub has_delivery: bool,
    /// Resolved operating-hours label.
    pub hours: String,
}

/// A configured business, keyed by the owner's phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub phone: String,
    pub name: String,
    pub business_type: String,
    pub product_category: String,
    pub has_delivery: bool,
    pub hours: String,
    pub status: BusinessStatus,
    pub trial_ends_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    /// Create a trial business from a finished onboarding draft.
    pub fn from_draft(phone: &str, draft: BusinessDraft, now: DateTime<Utc>, trial_days: i64) -> Self {
        Self {
            phone: phone.to_string(),
            name: draft.name,
            business_type: draft.business_type,
            product_category: draft.category,
            has_delivery: draft.has_delivery,
            hours: draft.hours,
            status: BusinessStatus::Trial,
            trial_ends_at: now + Duration::days(trial_days),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the trial ran out without the business being activated.
    pub fn trial_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == BusinessStatus::Trial && now >= self.trial_ends_at
    }

    /// Length of the trial this business was given, in whole days.
    pub fn trial_length_days(&self) -> i64 {
        (self.trial_ends_at - self.created_at).num_days()
    }

    /// Whole days left in the trial, rounded up, never negative.
    pub fn trial_days_left(&self, now: DateTime<Utc>) -> i64 {
        let remaining = self.trial_ends_at - now;
        if remaining <= Duration::zero() {
            return 0;
        }
        let days = remaining.num_days();
        if remaining > Duration::days(days) { days + 1 } else { days }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BusinessDraft {
        BusinessDraft {
            business_type: "2".into(),
            name: "Lagos Food Palace".into(),
            category: "Fast food".into(),
            has_delivery: true,
            hours: "9am - 8pm".into(),
        }
    }

    #[test]
    fn from_draft_starts_trial() {
        let now = Utc::now();
        let business = Business::from_draft("2348000000000", draft(), now, 7);
        assert_eq!(business.status, BusinessStatus::Trial);
        assert_eq!(business.trial_ends_at, now + Duration::days(7));
        assert_eq!(business.product_category, "Fast food");
        assert!(business.has_delivery);
    }

    #[test]
    fn trial_expiry() {
        let now = Utc::now();
        let business = Business::from_draft("1", draft(), now, 7);
        assert!(!business.trial_expired(now));
        assert!(business.trial_expired(now + Duration::days(7)));
        assert_eq!(business.trial_days_left(now), 7);
        assert_eq!(business.trial_days_left(now + Duration::hours(36)), 6);
        assert_eq!(business.trial_days_left(now + Duration::days(9)), 0);
    }

    #[test]
    fn trial_length_follows_configured_days() {
        let now = Utc::now();
        assert_eq!(Business::from_draft("1", draft(), now, 14).trial_length_days(), 14);
        assert_eq!(Business::from_draft("1", draft(), now, 7).trial_length_days(), 7);
    }

    #[test]
    fn paused_business_never_expires_by_trial() {
        let now = Utc::now();
        let mut business = Business::from_draft("1", draft(), now, 7);
        business.status = BusinessStatus::Paused;
        assert!(!business.trial_expired(now + Duration::days(30)));
        assert!(!business.status.is_responding());
    }

    #[test]
    fn status_display_roundtrips() {
        for status in [
            BusinessStatus::Trial,
            BusinessStatus::Active,
            BusinessStatus::Paused,
            BusinessStatus::Expired,
        ] {
            let parsed: BusinessStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
        assert!("deleted".parse::<BusinessStatus>().is_err());
    }
}
