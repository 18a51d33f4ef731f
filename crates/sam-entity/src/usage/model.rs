//! Usage record model.

use chrono::{DateTime, Duration, Utc};
use sam_core::error::AppError;
use sam_core::result::AppResult;
use sam_core::types::{LicenseId, RecordId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One checkout of a license by a user.
///
/// A record is active while `actually_return_time` is `None`. Records are
/// never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UsageRecord {
    #[serde(rename = "RecordID")]
    pub record_id: RecordId,
    #[serde(rename = "LicenseID")]
    pub license_id: LicenseId,
    #[serde(rename = "UserID")]
    pub user_id: UserId,
    #[serde(rename = "Checkout_time")]
    pub checkout_time: DateTime<Utc>,
    #[serde(rename = "Duration_Days")]
    pub duration_days: i32,
    /// Due date; starts at checkout + duration and moves with renewals.
    #[serde(rename = "Return_Time")]
    pub return_time: DateTime<Utc>,
    #[serde(rename = "Actually_Return_Time")]
    pub actually_return_time: Option<DateTime<Utc>>,
    pub is_expired: bool,
}

impl UsageRecord {
    /// Whether the license is still checked out under this record.
    pub fn is_active(&self) -> bool {
        self.actually_return_time.is_none()
    }

    /// Close the record at `now`.
    pub fn mark_returned(&mut self, now: DateTime<Utc>) {
        self.actually_return_time = Some(now);
        self.is_expired = true;
    }

    /// Push the due date out by `days`. The record is unchanged if the new
    /// due date is not representable.
    pub fn extend(&mut self, days: i64) -> AppResult<()> {
        let due = Duration::try_days(days)
            .and_then(|delta| self.return_time.checked_add_signed(delta))
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Renewing by {days} days moves the due date past the supported range"
                ))
            })?;
        self.return_time = due;
        Ok(())
    }
}

/// Data for a new checkout, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUsageRecord {
    pub license_id: LicenseId,
    pub user_id: UserId,
    pub checkout_time: DateTime<Utc>,
    pub duration_days: i32,
    pub return_time: DateTime<Utc>,
}

impl NewUsageRecord {
    /// A checkout starting at `now` and due `duration_days` later.
    pub fn checkout(
        license_id: LicenseId,
        user_id: UserId,
        now: DateTime<Utc>,
        duration_days: i32,
    ) -> Self {
        Self {
            license_id,
            user_id,
            checkout_time: now,
            duration_days,
            return_time: now + Duration::days(i64::from(duration_days)),
        }
    }

    /// Materialize the row once an id has been assigned.
    pub fn into_record(self, record_id: RecordId) -> UsageRecord {
        UsageRecord {
            record_id,
            license_id: self.license_id,
            user_id: self.user_id,
            checkout_time: self.checkout_time,
            duration_days: self.duration_days,
            return_time: self.return_time,
            actually_return_time: None,
            is_expired: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_sets_due_date() {
        let now = Utc::now();
        let new = NewUsageRecord::checkout(LicenseId::new(1), UserId::new(2), now, 30);
        assert_eq!(new.return_time - new.checkout_time, Duration::days(30));

        let record = new.into_record(RecordId::new(9));
        assert!(record.is_active());
        assert!(!record.is_expired);
    }

    #[test]
    fn test_extend_and_return() {
        let now = Utc::now();
        let mut record =
            NewUsageRecord::checkout(LicenseId::new(1), UserId::new(2), now, 30).into_record(RecordId::new(1));
        let due = record.return_time;

        record.extend(10).unwrap();
        assert_eq!(record.return_time - due, Duration::days(10));
        assert_eq!(record.checkout_time, now);

        record.mark_returned(now);
        assert!(!record.is_active());
        assert!(record.is_expired);
    }

    #[test]
    fn test_extend_past_calendar_limit_is_rejected() {
        let now = Utc::now();
        let mut record =
            NewUsageRecord::checkout(LicenseId::new(1), UserId::new(2), now, 30).into_record(RecordId::new(1));
        let due = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        record.return_time = due;

        let err = record.extend(10).unwrap_err();
        assert_eq!(err.kind, sam_core::error::ErrorKind::Validation);
        assert_eq!(record.return_time, due);
    }

    #[test]
    fn test_wire_field_names() {
        let now = Utc::now();
        let record =
            NewUsageRecord::checkout(LicenseId::new(1), UserId::new(2), now, 30).into_record(RecordId::new(3));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["RecordID"], 3);
        assert_eq!(json["Duration_Days"], 30);
        assert!(json["Actually_Return_Time"].is_null());
        assert_eq!(json["is_expired"], false);
    }
}
