//! Recycling transactions and the rules that score them.
//!
//! A transaction records one drop-off: the material kind, its weight and the
//! points it earned. Points are derived from a fixed per-kilogram rate table
//! and are immutable once recorded.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, UserId};

/// Default cap on transactions per user per UTC day.
pub const DEFAULT_DAILY_LIMIT: u32 = 10;

/// Window in which an identical submission counts as a duplicate.
pub const DUPLICATE_WINDOW_MINUTES: i64 = 5;

/// Supported recyclable material kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    /// Plastic bottles and packaging, 10 points per kilogram.
    Plastic,
    /// Glass containers, 8 points per kilogram.
    Glass,
    /// Metal cans and scrap, 15 points per kilogram.
    Metal,
    /// Paper and cardboard, 5 points per kilogram.
    Paper,
}

impl MaterialKind {
    /// Every supported kind, in rate-table order.
    pub const ALL: [Self; 4] = [Self::Plastic, Self::Glass, Self::Metal, Self::Paper];

    /// Canonical lower-case name used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plastic => "plastic",
            Self::Glass => "glass",
            Self::Metal => "metal",
            Self::Paper => "paper",
        }
    }

    /// Points credited per kilogram.
    #[must_use]
    pub const fn points_per_kg(self) -> u32 {
        match self {
            Self::Plastic => 10,
            Self::Glass => 8,
            Self::Metal => 15,
            Self::Paper => 5,
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a material name is outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported material type: {0}")]
pub struct UnknownMaterial(pub String);

impl FromStr for MaterialKind {
    type Err = UnknownMaterial;

    /// Parse a material name, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use dropme_backend::domain::MaterialKind;
    ///
    /// assert_eq!("Plastic".parse::<MaterialKind>(), Ok(MaterialKind::Plastic));
    /// assert!("wood".parse::<MaterialKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalised)
            .ok_or_else(|| UnknownMaterial(s.to_owned()))
    }
}

/// Strictly positive, finite weight in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct WeightKg(f64);

impl WeightKg {
    /// Validate a raw weight.
    ///
    /// # Errors
    ///
    /// Returns [`RecyclingRejection::InvalidWeight`] unless `value` is finite
    /// and above zero.
    pub const fn new(value: f64) -> Result<Self, RecyclingRejection> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(RecyclingRejection::InvalidWeight { weight_kg: value })
        }
    }

    /// Weight in kilograms.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for WeightKg {
    type Error = RecyclingRejection;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeightKg> for f64 {
    fn from(value: WeightKg) -> Self {
        value.0
    }
}

/// Points earned for `weight` of `material`: `floor(weight * rate)`.
///
/// # Errors
///
/// Returns [`RecyclingRejection::InvalidWeight`] when the product leaves the
/// representable range.
///
/// # Examples
/// ```
/// use dropme_backend::domain::{MaterialKind, WeightKg, score};
///
/// let weight = WeightKg::new(0.99).expect("positive weight");
/// assert_eq!(score(MaterialKind::Plastic, weight), Ok(9));
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "points are defined as the floor of weight times the material rate"
)]
pub fn score(material: MaterialKind, weight: WeightKg) -> Result<u64, RecyclingRejection> {
    let product = (weight.get() * f64::from(material.points_per_kg())).floor();
    #[expect(
        clippy::cast_precision_loss,
        reason = "upper bound comparison tolerates rounding of u64::MAX"
    )]
    let ceiling = u64::MAX as f64;
    if !product.is_finite() || product >= ceiling {
        return Err(RecyclingRejection::InvalidWeight {
            weight_kg: weight.get(),
        });
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "product is finite, non-negative and below u64::MAX"
    )]
    let points = product as u64;
    Ok(points)
}

/// Business-rule rejections raised while recording or removing transactions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecyclingRejection {
    /// The submitting user is not registered.
    #[error("User not found")]
    UserNotFound {
        /// Identifier that failed to resolve.
        user_id: UserId,
    },
    /// The user already reached today's cap.
    #[error("Daily recycling limit exceeded")]
    DailyLimitExceeded {
        /// Configured cap per UTC day.
        limit: u32,
    },
    /// Same material and weight were recorded inside the duplicate window.
    #[error("Duplicate recycling detected")]
    DuplicateSubmission,
    /// The material name is not in the rate table.
    #[error("Unsupported material type")]
    UnsupportedMaterial {
        /// Name as submitted.
        material: String,
    },
    /// The weight is not a positive finite number, or scores out of range.
    #[error("Weight must be a positive number of kilograms")]
    InvalidWeight {
        /// Weight as submitted.
        weight_kg: f64,
    },
    /// Recorded transactions are permanent.
    #[error("Deleting recycling records is not allowed")]
    OperationNotPermitted,
}

impl RecyclingRejection {
    /// Stable `snake_case` reason code exposed in error details.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::UserNotFound { .. } => "user_not_found",
            Self::DailyLimitExceeded { .. } => "daily_limit_exceeded",
            Self::DuplicateSubmission => "duplicate_submission",
            Self::UnsupportedMaterial { .. } => "unsupported_material",
            Self::InvalidWeight { .. } => "invalid_weight",
            Self::OperationNotPermitted => "operation_not_permitted",
        }
    }
}

/// Every rejection is a business-rule failure reported as an invalid request.
impl From<RecyclingRejection> for Error {
    fn from(value: RecyclingRejection) -> Self {
        let reason = value.reason();
        let message = value.to_string();
        match value {
            RecyclingRejection::DailyLimitExceeded { limit } => Self::invalid_request(message)
                .with_details(json!({ "reason": reason, "limit": limit })),
            RecyclingRejection::UserNotFound { .. }
            | RecyclingRejection::DuplicateSubmission
            | RecyclingRejection::UnsupportedMaterial { .. }
            | RecyclingRejection::InvalidWeight { .. }
            | RecyclingRejection::OperationNotPermitted => Self::rule_violation(message, reason),
        }
    }
}

/// Limits applied by the transaction writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecyclingPolicy {
    daily_limit: u32,
    duplicate_window: Duration,
}

impl RecyclingPolicy {
    /// Policy with the given daily cap and the standard duplicate window.
    ///
    /// A cap of zero refuses every submission.
    #[must_use]
    pub const fn new(daily_limit: u32) -> Self {
        Self {
            daily_limit,
            duplicate_window: Duration::minutes(DUPLICATE_WINDOW_MINUTES),
        }
    }

    /// Maximum transactions per user per UTC day.
    #[must_use]
    pub const fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Interval in which an identical submission is a duplicate.
    #[must_use]
    pub const fn duplicate_window(&self) -> Duration {
        self.duplicate_window
    }

    /// Start of the UTC calendar day containing `now`.
    #[must_use]
    pub fn day_start(now: DateTime<Utc>) -> DateTime<Utc> {
        now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// Earliest timestamp still inside the duplicate window.
    #[must_use]
    pub fn duplicate_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duplicate_window
    }

    /// Limits a repository re-checks while recording a submission made at
    /// `now`.
    #[must_use]
    pub fn guard_at(&self, now: DateTime<Utc>) -> RecordGuard {
        RecordGuard {
            day_start: Self::day_start(now),
            daily_limit: self.daily_limit,
            duplicate_since: self.duplicate_cutoff(now),
        }
    }
}

/// Limits re-evaluated inside the storage write.
///
/// Repositories check these against committed rows in the same unit that
/// inserts the transaction, so writers in other processes cannot both slip
/// under the cap or the duplicate window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordGuard {
    /// Transactions at or after this instant count toward the cap.
    pub day_start: DateTime<Utc>,
    /// Cap per UTC day.
    pub daily_limit: u32,
    /// Identical transactions at or after this instant are duplicates.
    pub duplicate_since: DateTime<Utc>,
}

/// Result of a guarded write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The transaction was stored and the owner credited.
    Recorded,
    /// The cap was reached by a concurrent writer; nothing was stored.
    DailyLimitReached,
    /// A concurrent writer stored the same submission; nothing was stored.
    Duplicate,
}

impl Default for RecyclingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_LIMIT)
    }
}

/// Input for building a [`RecyclingTransaction`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecyclingTransactionDraft {
    /// Transaction identifier.
    pub id: Uuid,
    /// Owner of the transaction.
    pub user_id: UserId,
    /// Recycled material.
    pub material: MaterialKind,
    /// Weight dropped off.
    pub weight_kg: WeightKg,
    /// Points credited.
    pub points_earned: u64,
    /// Recording time in UTC.
    pub created_at: DateTime<Utc>,
}

/// A recorded recycling drop-off.
///
/// ## Invariants
/// - `points_earned == floor(weight_kg * rate(material))` for freshly scored
///   transactions; stored rows are trusted as-is.
/// - Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecyclingTransaction {
    id: Uuid,
    user_id: UserId,
    #[serde(rename = "materialType")]
    material: MaterialKind,
    weight_kg: WeightKg,
    points_earned: u64,
    created_at: DateTime<Utc>,
}

impl RecyclingTransaction {
    /// Rebuild a transaction from stored or pre-validated parts.
    #[must_use]
    pub const fn new(draft: RecyclingTransactionDraft) -> Self {
        let RecyclingTransactionDraft {
            id,
            user_id,
            material,
            weight_kg,
            points_earned,
            created_at,
        } = draft;
        Self {
            id,
            user_id,
            material,
            weight_kg,
            points_earned,
            created_at,
        }
    }

    /// Score a new submission and stamp it with a fresh id.
    ///
    /// # Errors
    ///
    /// Propagates the [`score`] rejection for out-of-range products.
    pub fn scored(
        user_id: UserId,
        material: MaterialKind,
        weight_kg: WeightKg,
        created_at: DateTime<Utc>,
    ) -> Result<Self, RecyclingRejection> {
        let points_earned = score(material, weight_kg)?;
        Ok(Self::new(RecyclingTransactionDraft {
            id: Uuid::new_v4(),
            user_id,
            material,
            weight_kg,
            points_earned,
            created_at,
        }))
    }

    /// Transaction identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Owner of the transaction.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Recycled material.
    #[must_use]
    pub const fn material(&self) -> MaterialKind {
        self.material
    }

    /// Weight dropped off.
    #[must_use]
    pub const fn weight_kg(&self) -> WeightKg {
        self.weight_kg
    }

    /// Points credited for this drop-off.
    #[must_use]
    pub const fn points_earned(&self) -> u64 {
        self.points_earned
    }

    /// Recording time in UTC.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
#[path = "recycling_tests.rs"]
mod tests;
