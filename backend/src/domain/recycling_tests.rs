//! Tests for material parsing, scoring and rejection mapping.

use super::*;
use crate::domain::ErrorCode;
use chrono::TimeZone;
use rstest::rstest;
use serde_json::json;

fn weight(value: f64) -> WeightKg {
    WeightKg::new(value).expect("positive weight")
}

#[rstest]
#[case("plastic", MaterialKind::Plastic)]
#[case("GLASS", MaterialKind::Glass)]
#[case(" Metal ", MaterialKind::Metal)]
#[case("paper", MaterialKind::Paper)]
fn parses_material_names_case_insensitively(#[case] input: &str, #[case] expected: MaterialKind) {
    assert_eq!(input.parse::<MaterialKind>(), Ok(expected));
}

#[rstest]
#[case("wood")]
#[case("")]
#[case("plastics")]
fn rejects_unknown_material_names(#[case] input: &str) {
    assert_eq!(
        input.parse::<MaterialKind>(),
        Err(UnknownMaterial(input.to_owned()))
    );
}

#[rstest]
#[case(MaterialKind::Plastic, 10)]
#[case(MaterialKind::Glass, 8)]
#[case(MaterialKind::Metal, 15)]
#[case(MaterialKind::Paper, 5)]
fn rate_table_matches_published_rates(#[case] kind: MaterialKind, #[case] rate: u32) {
    assert_eq!(kind.points_per_kg(), rate);
}

#[rstest]
#[case(MaterialKind::Plastic, 0.99, 9)]
#[case(MaterialKind::Plastic, 2.0, 20)]
#[case(MaterialKind::Glass, 1.25, 10)]
#[case(MaterialKind::Metal, 0.5, 7)]
#[case(MaterialKind::Paper, 0.1, 0)]
#[case(MaterialKind::Paper, 3.999, 19)]
fn score_truncates_towards_zero(
    #[case] kind: MaterialKind,
    #[case] kg: f64,
    #[case] expected: u64,
) {
    assert_eq!(score(kind, weight(kg)), Ok(expected));
}

#[rstest]
fn score_matches_floor_for_every_material() {
    for kind in MaterialKind::ALL {
        for kg in [0.01, 0.3, 1.0, 7.77, 123.456] {
            let expected = (kg * f64::from(kind.points_per_kg())).floor();
            let points = score(kind, weight(kg)).expect("scorable");
            assert!((expected - points as f64).abs() < f64::EPSILON, "{kind} {kg}");
        }
    }
}

#[rstest]
fn score_rejects_products_outside_u64() {
    let result = score(MaterialKind::Metal, weight(f64::MAX));
    assert!(matches!(result, Err(RecyclingRejection::InvalidWeight { .. })));
}

#[rstest]
#[case(0.0)]
#[case(-1.5)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn weight_rejects_non_positive_or_non_finite(#[case] value: f64) {
    let result = WeightKg::new(value);
    assert!(matches!(result, Err(RecyclingRejection::InvalidWeight { .. })));
}

#[rstest]
#[case(RecyclingRejection::UserNotFound { user_id: UserId::random() }, ErrorCode::InvalidRequest, "user_not_found")]
#[case(RecyclingRejection::DailyLimitExceeded { limit: 10 }, ErrorCode::InvalidRequest, "daily_limit_exceeded")]
#[case(RecyclingRejection::DuplicateSubmission, ErrorCode::InvalidRequest, "duplicate_submission")]
#[case(RecyclingRejection::UnsupportedMaterial { material: "wood".to_owned() }, ErrorCode::InvalidRequest, "unsupported_material")]
#[case(RecyclingRejection::InvalidWeight { weight_kg: 0.0 }, ErrorCode::InvalidRequest, "invalid_weight")]
#[case(RecyclingRejection::OperationNotPermitted, ErrorCode::InvalidRequest, "operation_not_permitted")]
fn rejections_map_to_domain_errors(
    #[case] rejection: RecyclingRejection,
    #[case] code: ErrorCode,
    #[case] reason: &str,
) {
    let error = Error::from(rejection);
    assert_eq!(error.code(), code);
    assert_eq!(error.reason(), Some(reason));
}

#[rstest]
fn daily_limit_error_reports_limit() {
    let error = Error::from(RecyclingRejection::DailyLimitExceeded { limit: 3 });
    assert_eq!(error.details().and_then(|d| d.get("limit")), Some(&json!(3)));
    assert_eq!(error.message(), "Daily recycling limit exceeded");
}

#[rstest]
fn day_start_truncates_to_utc_midnight() {
    let now = Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).single().expect("valid time");
    let expected = Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).single().expect("valid time");
    assert_eq!(RecyclingPolicy::day_start(now), expected);
}

#[rstest]
fn duplicate_cutoff_is_five_minutes_back() {
    let policy = RecyclingPolicy::default();
    let now = Utc.with_ymd_and_hms(2026, 3, 14, 0, 2, 0).single().expect("valid time");
    let expected = Utc.with_ymd_and_hms(2026, 3, 13, 23, 57, 0).single().expect("valid time");
    assert_eq!(policy.duplicate_cutoff(now), expected);
    assert_eq!(policy.daily_limit(), DEFAULT_DAILY_LIMIT);
}

#[rstest]
#[case(0)]
#[case(3)]
fn guard_carries_the_configured_cap(#[case] limit: u32) {
    let policy = RecyclingPolicy::new(limit);
    let now = Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).single().expect("valid time");

    let guard = policy.guard_at(now);

    assert_eq!(guard.daily_limit, limit);
    assert_eq!(guard.day_start, RecyclingPolicy::day_start(now));
    assert_eq!(guard.duplicate_since, policy.duplicate_cutoff(now));
}

#[rstest]
fn transaction_serialises_camel_case() {
    let user_id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    let created_at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).single().expect("valid time");
    let id = Uuid::nil();
    let transaction = RecyclingTransaction::new(RecyclingTransactionDraft {
        id,
        user_id,
        material: MaterialKind::Glass,
        weight_kg: weight(1.5),
        points_earned: 12,
        created_at,
    });

    let value = serde_json::to_value(&transaction).expect("serialise transaction");
    assert_eq!(
        value,
        json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "userId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "materialType": "glass",
            "weightKg": 1.5,
            "pointsEarned": 12,
            "createdAt": "2026-01-02T03:04:05Z",
        })
    );
}

#[rstest]
fn scored_transaction_uses_rate_table() {
    let created_at = Utc::now();
    let transaction =
        RecyclingTransaction::scored(UserId::random(), MaterialKind::Metal, weight(2.0), created_at)
            .expect("scorable");
    assert_eq!(transaction.points_earned(), 30);
    assert_eq!(transaction.created_at(), created_at);
}
