//! Integration tests for the progression ledger on the SQLite store.

use focusquest_core::storage::{keys, migrations};
use focusquest_core::{Database, KeyValueStore, LedgerOptions, ProgressionLedger, DEFAULT_THEME_ID};

#[test]
fn test_progress_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focusquest.db");

    let before = {
        let db = Database::open_at(&path).unwrap();
        let mut ledger = ProgressionLedger::open(db, LedgerOptions::default()).unwrap();
        ledger.award_experience(600).unwrap();
        assert!(ledger.purchase_theme("matrix", 50).unwrap());
        assert!(ledger.equip_theme("matrix").unwrap());
        ledger.record_session("Write docs", 300).unwrap();
        ledger.state().clone()
    };

    let db = Database::open_at(&path).unwrap();
    let ledger = ProgressionLedger::open(db, LedgerOptions::default()).unwrap();
    assert_eq!(ledger.state(), &before);
    assert_eq!(ledger.experience(), 600);
    assert_eq!(ledger.currency(), 10);
    assert_eq!(ledger.level(), 4);
    assert_eq!(ledger.equipped_theme(), "matrix");
    assert_eq!(ledger.session_history()[0].label, "Write docs");
}

#[test]
fn test_stored_encoding_matches_key_layout() {
    let db = Database::open_in_memory().unwrap();
    let mut ledger = ProgressionLedger::open(db, LedgerOptions::default()).unwrap();
    ledger.award_experience(250).unwrap();

    let db = ledger.into_store();
    assert_eq!(db.get(keys::EXPERIENCE).unwrap().as_deref(), Some("250"));
    assert_eq!(db.get(keys::CURRENCY).unwrap().as_deref(), Some("25"));
    assert_eq!(db.get(keys::UNLOCKED_THEMES).unwrap().as_deref(), Some(r#"["default"]"#));
    assert_eq!(db.get(keys::EQUIPPED_THEME).unwrap().as_deref(), Some(DEFAULT_THEME_ID));
    assert_eq!(db.get(keys::SESSION_HISTORY).unwrap().as_deref(), Some("[]"));
    assert_eq!(
        migrations::schema_version(&db).unwrap(),
        migrations::CURRENT_VERSION
    );
}

#[test]
fn test_legacy_profile_loads_after_migration() {
    let mut db = Database::open_in_memory().unwrap();
    db.set(keys::EXPERIENCE, "1200").unwrap();
    db.set(keys::CURRENCY, "120").unwrap();
    db.set(keys::UNLOCKED_THEMES, r#"["default","ice","ice"]"#).unwrap();
    db.set(keys::EQUIPPED_THEME, "ice").unwrap();
    db.set(
        keys::SESSION_HISTORY,
        r#"[{"id":1700000000500,"text":"Second","xp":250,"date":"11/14/2023"},
            {"id":1700000000000,"text":"Python Quest","xp":300,"date":"11/14/2023"}]"#,
    )
    .unwrap();

    let ledger = ProgressionLedger::open(db, LedgerOptions::default()).unwrap();
    assert_eq!(ledger.level(), 5);
    assert_eq!(ledger.unlocked_themes(), ["default".to_string(), "ice".to_string()]);
    assert_eq!(ledger.equipped_theme(), "ice");
    let history = ledger.session_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].label, "Python Quest");
    assert_eq!(history[1].experience_awarded, 300);
    // No one-off repair: experience stays what was stored.
    assert_eq!(ledger.experience(), 1200);
}

#[test]
fn test_history_disabled_leaves_existing_log_untouched() {
    let mut db = Database::open_in_memory().unwrap();
    db.set(
        keys::SESSION_HISTORY,
        r#"[{"id":1,"label":"Kept","experienceAwarded":250,"date":"2024-01-01"}]"#,
    )
    .unwrap();

    let mut ledger =
        ProgressionLedger::open(db, LedgerOptions { keep_history: false }).unwrap();
    assert!(ledger.session_history().is_empty());
    ledger.record_session("Ignored", 250).unwrap();
    ledger.award_experience(250).unwrap();

    let db = ledger.into_store();
    let ledger = ProgressionLedger::open(db, LedgerOptions::default()).unwrap();
    assert_eq!(ledger.session_history().len(), 1);
    assert_eq!(ledger.session_history()[0].label, "Kept");
}

/// Make SQLite refuse any write to `key`, failing the statement partway
/// through whatever batch it belongs to.
fn reject_writes_to(db: &Database, key: &str) {
    db.conn()
        .execute_batch(&format!(
            "CREATE TRIGGER reject_write BEFORE INSERT ON kv
             WHEN NEW.key = '{key}'
             BEGIN SELECT RAISE(ABORT, 'write rejected'); END;"
        ))
        .unwrap();
}

fn allow_writes(db: &Database) {
    db.conn()
        .execute_batch("DROP TRIGGER IF EXISTS reject_write;")
        .unwrap();
}

#[test]
fn test_failed_award_leaves_no_partial_write() {
    let db = Database::open_in_memory().unwrap();
    let mut ledger = ProgressionLedger::open(db, LedgerOptions::default()).unwrap();
    ledger.award_experience(100).unwrap();

    // Experience is written before coins; the coin write fails.
    reject_writes_to(ledger.store(), keys::CURRENCY);
    assert!(ledger.award_experience(500).is_err());
    assert_eq!(ledger.experience(), 100);
    assert_eq!(ledger.currency(), 10);

    let db = ledger.into_store();
    allow_writes(&db);
    assert_eq!(db.get(keys::EXPERIENCE).unwrap().as_deref(), Some("100"));
    assert_eq!(db.get(keys::CURRENCY).unwrap().as_deref(), Some("10"));

    let reopened = ProgressionLedger::open(db, LedgerOptions::default()).unwrap();
    assert_eq!(reopened.experience(), 100);
    assert_eq!(reopened.currency(), 10);
    assert_eq!(reopened.level(), 2);
}

#[test]
fn test_failed_purchase_keeps_coins_and_themes_together() {
    let db = Database::open_in_memory().unwrap();
    let mut ledger = ProgressionLedger::open(db, LedgerOptions::default()).unwrap();
    ledger.award_experience(600).unwrap();

    reject_writes_to(ledger.store(), keys::UNLOCKED_THEMES);
    assert!(ledger.purchase_theme("matrix", 50).is_err());

    let db = ledger.into_store();
    allow_writes(&db);
    let reopened = ProgressionLedger::open(db, LedgerOptions::default()).unwrap();
    assert_eq!(reopened.currency(), 60);
    assert!(!reopened.is_unlocked("matrix"));
}

#[test]
fn test_failed_migration_leaves_legacy_records_untouched() {
    let mut db = Database::open_in_memory().unwrap();
    db.set(keys::SCHEMA_VERSION, "1").unwrap();
    db.set(keys::UNLOCKED_THEMES, r#"["ice","ice"]"#).unwrap();
    db.set(keys::EQUIPPED_THEME, "gold").unwrap();

    reject_writes_to(&db, keys::SCHEMA_VERSION);
    assert!(migrations::migrate(&mut db).is_err());
    assert_eq!(db.get(keys::UNLOCKED_THEMES).unwrap().as_deref(), Some(r#"["ice","ice"]"#));
    assert_eq!(db.get(keys::EQUIPPED_THEME).unwrap().as_deref(), Some("gold"));
    assert_eq!(migrations::schema_version(&db).unwrap(), 1);

    allow_writes(&db);
    assert_eq!(migrations::migrate(&mut db).unwrap(), migrations::CURRENT_VERSION);
    assert_eq!(
        db.get(keys::UNLOCKED_THEMES).unwrap().as_deref(),
        Some(r#"["default","ice"]"#)
    );
    assert_eq!(db.get(keys::EQUIPPED_THEME).unwrap().as_deref(), Some(DEFAULT_THEME_ID));
}
