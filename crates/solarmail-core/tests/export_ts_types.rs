//! Exports the dashboard's TypeScript types when run.
//!
//! Run with: cargo test --test export_ts_types -- --ignored
//!
//! Ignored by default so it doesn't write files during normal CI. Set
//! `TS_RS_EXPORT_DIR` to choose where the `.ts` files land.

use ts_rs::TS;

#[test]
#[ignore = "Run manually to generate TypeScript types: cargo test --test export_ts_types -- --ignored"]
fn export_typescript_types() {
    // Records
    solarmail_core::EmailSummary::export_all().expect("EmailSummary");
    solarmail_core::AnalysisResult::export_all().expect("AnalysisResult");
    solarmail_core::ExtractedEntities::export_all().expect("ExtractedEntities");
    solarmail_core::ExtractedKeywords::export_all().expect("ExtractedKeywords");
    solarmail_core::SyncStatus::export_all().expect("SyncStatus");
    solarmail_core::SyncAck::export_all().expect("SyncAck");
    solarmail_core::HealthStatus::export_all().expect("HealthStatus");

    // Error taxonomy
    solarmail_core::ErrorKind::export_all().expect("ErrorKind");

    println!("TypeScript types exported successfully!");
}

#[test]
fn declarations_use_service_field_names() {
    let email = solarmail_core::EmailSummary::decl();
    assert!(email.contains("body_preview: string"), "{email}");
    assert!(email.contains("body?: string"), "{email}");
    assert!(email.contains("id: number"), "{email}");

    let kind = solarmail_core::ErrorKind::decl();
    assert!(kind.contains("\"transport\""), "{kind}");
}
