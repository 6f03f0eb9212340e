//! Serde roundtrip and JsonSchema validation tests for entity types.

use chrono::{Duration, Utc};
use schemars::schema_for;
use lqa_core::audit_detail::{EscalationDetail, StatusChangedDetail};
use lqa_core::entities::*;
use lqa_core::enums::*;
use lqa_core::responses::*;
use lqa_core::scoring::ScoreSummary;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn disputed_report() -> QualityReport {
    let now = Utc::now();
    QualityReport {
        id: "rpt-a3f8b2c1".into(),
        freelancer_id: "frl-11111111".into(),
        project_name: "App store listing".into(),
        report_type: ReportType::Combined,
        lqa_score: Some(81.5),
        qs_score: Some(4.0),
        lqa_errors: vec![
            LqaErrorEntry {
                error_type: "Accuracy".into(),
                severity: Severity::Major,
                count: 2,
            },
            LqaErrorEntry {
                error_type: "Style".into(),
                severity: Severity::Preferential,
                count: 5,
            },
        ],
        status: ReportStatus::TranslatorDisputed,
        reviewer_id: Some("usr-22222222".into()),
        reviewer_comments: Some("Several mistranslations in the UI strings.".into()),
        translator_comments: Some("Terms follow the client glossary.".into()),
        submission_date: Some(now),
        review_deadline: Some(now + Duration::days(7)),
        finalization_date: None,
        final_reviewer_comments: None,
        version: 3,
        created_at: now,
        updated_at: now,
    }
}

roundtrip_and_validate!(report_roundtrip, QualityReport, disputed_report());

roundtrip_and_validate!(
    freelancer_roundtrip,
    Freelancer,
    Freelancer {
        id: "frl-11111111".into(),
        full_name: "Ana Silva".into(),
        email: "ana@example.com".into(),
        status: FreelancerStatus::Active,
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    user_roundtrip,
    User,
    User {
        id: "usr-22222222".into(),
        full_name: "Priya Raman".into(),
        email: "priya@example.com".into(),
        role: UserRole::ProjectManager,
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    settings_record_roundtrip,
    SettingsRecord,
    SettingsRecord {
        id: "qst-33333333".into(),
        settings: QualitySettings {
            dispute_period_days: 10,
            probation_threshold: 75.0,
            lqa_weight: 3.0,
            qs_multiplier: 20.0,
        },
        is_active: true,
        created_by: Some("usr-22222222".into()),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    audit_roundtrip,
    AuditEntry,
    AuditEntry {
        id: "aud-44444444".into(),
        actor_id: Some("usr-22222222".into()),
        entity_type: EntityType::Report,
        entity_id: "rpt-a3f8b2c1".into(),
        action: AuditAction::StatusChanged,
        detail: Some(
            serde_json::to_value(StatusChangedDetail {
                from: "pending_translator_review".into(),
                to: "translator_disputed".into(),
                action: "dispute".into(),
                reason: Some("Terms follow the client glossary.".into()),
            })
            .unwrap()
        ),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    escalation_detail_roundtrip,
    EscalationDetail,
    EscalationDetail {
        kind: "consecutive_low_lqa".into(),
        scores: vec![60.0, 65.0, 62.0],
        threshold: 70.0,
    }
);

roundtrip_and_validate!(
    transition_response_roundtrip,
    TransitionResponse,
    TransitionResponse {
        report: disputed_report(),
        notifications_sent: 3,
        notifications_failed: 0,
    }
);

roundtrip_and_validate!(
    scorecard_roundtrip,
    ScorecardResponse,
    ScorecardResponse {
        freelancer: Freelancer {
            id: "frl-11111111".into(),
            full_name: "Ana Silva".into(),
            email: "ana@example.com".into(),
            status: FreelancerStatus::Probation,
            created_at: Utc::now(),
        },
        settings: QualitySettings::default(),
        summary: ScoreSummary {
            eligible_reports: 3,
            avg_lqa: Some(87.5),
            avg_qs: Some(4.5),
            combined: Some(88.0),
        },
        below_threshold: false,
    }
);

#[test]
fn report_status_serializes_snake_case_in_entity() {
    let json = serde_json::to_value(disputed_report()).unwrap();
    assert_eq!(json["status"], "translator_disputed");
    assert_eq!(json["report_type"], "combined");
    assert_eq!(json["lqa_errors"][1]["severity"], "preferential");
}
