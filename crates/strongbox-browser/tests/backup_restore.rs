// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for browser file backup, deletion and restore.

use secrecy::SecretString;
use strongbox_browser::{BrowserBackupManager, Lifecycle, StartupAction};
use strongbox_core::StrongboxError;
use strongbox_test_utils::BrowserFixture;
use strongbox_vault::VaultStore;

fn password(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

fn patterned(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
}

/// Backup two files, delete them, restore byte-identical, and reject a wrong password.
#[tokio::test]
async fn backup_delete_restore_roundtrip() {
    let small = patterned(100, 1);
    let large = patterned(50_000, 7);
    let fixture = BrowserFixture::builder()
        .firefox_profile("Profiles/e2e.default", vec![("logins.json", small.clone())])
        .chromium_profile("google-chrome", "Default", vec![("Login Data", large.clone())])
        .build()
        .unwrap();
    let manager = BrowserBackupManager::from_config(&fixture.config());

    let backup = manager.backup(&password("correct")).await.unwrap();
    assert_eq!(backup.processed, 2);
    assert!(backup.warnings.is_empty());
    assert!(manager.backup_exists());

    let deletion = manager.secure_delete_all(true).await.unwrap();
    assert!(deletion.success);
    assert_eq!(deletion.deleted, 2);
    assert!(fixture.files().iter().all(|p| !p.exists()));
    assert!(!manager.browser_files_exist());

    let err = manager.restore(&password("wrong")).await.unwrap_err();
    assert!(err.is_authentication(), "expected authentication error, got {err:?}");
    assert!(fixture.files().iter().all(|p| !p.exists()));

    let restored = manager.restore(&password("correct")).await.unwrap();
    assert_eq!(restored.processed, 2);
    assert_eq!(std::fs::read(&fixture.files()[0]).unwrap(), small);
    assert_eq!(std::fs::read(&fixture.files()[1]).unwrap(), large);
}

/// Restore recreates a deleted profile directory.
#[tokio::test]
async fn restore_recreates_missing_directories() {
    let fixture = BrowserFixture::builder()
        .chromium_profile("vivaldi", "Profile 3", vec![("Local State", b"{\"os_crypt\":{}}".to_vec())])
        .build()
        .unwrap();
    let manager = BrowserBackupManager::from_config(&fixture.config());
    manager.backup(&password("pw")).await.unwrap();

    let profile_dir = fixture.files()[0].parent().unwrap().to_path_buf();
    std::fs::remove_dir_all(&profile_dir).unwrap();

    manager.restore(&password("pw")).await.unwrap();
    assert!(fixture.files()[0].is_file());
}

/// Restore leaves no temp files beside the restored file.
#[tokio::test]
async fn restore_leaves_no_temp_files() {
    let fixture = BrowserFixture::builder()
        .firefox_profile("Profiles/t", vec![("key4.db", b"db".to_vec())])
        .build()
        .unwrap();
    let manager = BrowserBackupManager::from_config(&fixture.config());
    manager.backup(&password("pw")).await.unwrap();
    manager.restore(&password("pw")).await.unwrap();

    let dir = fixture.files()[0].parent().unwrap();
    let names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["key4.db".to_string()]);
}

/// A second backup replaces the first rather than merging with it.
#[tokio::test]
async fn backup_replaces_previous_vault_contents() {
    let fixture = BrowserFixture::builder()
        .firefox_profile("Profiles/r", vec![("logins.json", b"v1".to_vec())])
        .build()
        .unwrap();
    let manager = BrowserBackupManager::from_config(&fixture.config());
    manager.backup(&password("pw")).await.unwrap();

    std::fs::write(&fixture.files()[0], b"v2").unwrap();
    manager.backup(&password("pw")).await.unwrap();

    fixture.remove_files().unwrap();
    manager.restore(&password("pw")).await.unwrap();
    assert_eq!(std::fs::read(&fixture.files()[0]).unwrap(), b"v2");
}

/// First run creates the main vault and protects present files; the next launch restores them.
#[tokio::test]
async fn lifecycle_first_run_then_startup_restores() {
    let fixture = BrowserFixture::builder()
        .firefox_profile("Profiles/life", vec![("logins.json", b"{}".to_vec()), ("key4.db", b"k".to_vec())])
        .build()
        .unwrap();
    let config = fixture.config();
    let main_vault = VaultStore::new(config.storage.vault_path());
    let lifecycle = Lifecycle::new(BrowserBackupManager::from_config(&config), main_vault.clone());
    let pw = password("session");

    assert!(lifecycle.is_first_run());
    match lifecycle.on_launch(&pw).await.unwrap() {
        StartupAction::Protected { backup, deletion } => {
            assert_eq!(backup.processed, 2);
            assert!(deletion.success);
        }
        other => panic!("expected Protected, got {other:?}"),
    }
    assert!(fixture.files().iter().all(|p| !p.exists()));
    assert!(main_vault.exists());
    assert!(!lifecycle.is_first_run());

    match lifecycle.on_launch(&pw).await.unwrap() {
        StartupAction::Restored(report) => assert_eq!(report.processed, 2),
        other => panic!("expected Restored, got {other:?}"),
    }
    assert!(fixture.files().iter().all(|p| p.exists()));
}

/// Partial presence of browser files does not trigger a restore.
#[tokio::test]
async fn startup_skips_restore_when_some_files_remain() {
    let fixture = BrowserFixture::builder()
        .firefox_profile("Profiles/p", vec![("logins.json", b"{}".to_vec())])
        .chromium_profile("chromium", "Default", vec![("Login Data", b"x".to_vec())])
        .build()
        .unwrap();
    let config = fixture.config();
    let lifecycle = Lifecycle::new(
        BrowserBackupManager::from_config(&config),
        VaultStore::new(config.storage.vault_path()),
    );
    lifecycle.manager().backup(&password("pw")).await.unwrap();
    std::fs::remove_file(&fixture.files()[0]).unwrap();

    let action = lifecycle.startup(&password("pw")).await.unwrap();
    assert_eq!(action, StartupAction::Skipped);
    assert!(!fixture.files()[0].exists());
}

/// Exit backs up, deletes, and reports a clean session.
#[tokio::test]
async fn exit_backs_up_then_deletes() {
    let fixture = BrowserFixture::builder()
        .chromium_profile("brave-browser", "Default", vec![("Login Data", b"exit".to_vec())])
        .build()
        .unwrap();
    let config = fixture.config();
    let lifecycle = Lifecycle::new(
        BrowserBackupManager::from_config(&config),
        VaultStore::new(config.storage.vault_path()),
    );

    let report = lifecycle.exit(&password("pw")).await.unwrap();
    assert!(report.is_clean());
    assert_eq!(report.backup.map(|b| b.processed), Some(1));
    assert!(!fixture.files()[0].exists());
}

/// Exit with a failing backup deletes nothing.
#[tokio::test]
async fn exit_keeps_files_when_backup_fails() {
    let fixture = BrowserFixture::builder()
        .firefox_profile("Profiles/keep", vec![("key4.db", b"k".to_vec())])
        .build()
        .unwrap();
    let config = fixture.config();
    let lifecycle = Lifecycle::new(
        BrowserBackupManager::from_config(&config),
        VaultStore::new(config.storage.vault_path()),
    );

    let err = lifecycle.exit(&password("")).await.unwrap_err();
    assert!(matches!(err, StrongboxError::InvalidInput(_)));
    assert!(fixture.files()[0].exists());
}

/// Two launches in a row, with nothing in between, end with the files restored.
#[tokio::test]
async fn second_launch_restores_without_manual_vault_setup() {
    let fixture = BrowserFixture::builder()
        .firefox_profile("Profiles/twice", vec![("logins.json", b"{\"logins\":[]}".to_vec())])
        .build()
        .unwrap();
    let config = fixture.config();
    let lifecycle = Lifecycle::new(
        BrowserBackupManager::from_config(&config),
        VaultStore::new(config.storage.vault_path()),
    );
    let pw = password("m");

    let first = lifecycle.on_launch(&pw).await.unwrap();
    assert!(matches!(first, StartupAction::Protected { .. }));
    assert!(!fixture.files()[0].exists());

    let second = lifecycle.on_launch(&pw).await.unwrap();
    assert!(matches!(second, StartupAction::Restored(ref r) if r.processed == 1));
    assert_eq!(std::fs::read(&fixture.files()[0]).unwrap(), b"{\"logins\":[]}");
}

/// First run with no browser files still creates the main vault.
#[tokio::test]
async fn first_run_without_browser_files_creates_main_vault() {
    let fixture = BrowserFixture::builder().build().unwrap();
    let config = fixture.config();
    let main_vault = VaultStore::new(config.storage.vault_path());
    let lifecycle = Lifecycle::new(BrowserBackupManager::from_config(&config), main_vault.clone());

    assert_eq!(lifecycle.on_launch(&password("m")).await.unwrap(), StartupAction::Skipped);
    assert!(main_vault.exists());
    assert!(!lifecycle.is_first_run());
}

/// A mistyped password at exit touches neither the browser files nor the backup.
#[tokio::test]
async fn exit_with_mistyped_password_keeps_files_and_backup() {
    let fixture = BrowserFixture::builder()
        .firefox_profile("Profiles/typo", vec![("key4.db", b"k".to_vec())])
        .build()
        .unwrap();
    let config = fixture.config();
    let lifecycle = Lifecycle::new(
        BrowserBackupManager::from_config(&config),
        VaultStore::new(config.storage.vault_path()),
    );
    let right = password("right");

    lifecycle.on_launch(&right).await.unwrap();
    lifecycle.on_launch(&right).await.unwrap();
    assert!(fixture.files()[0].exists());
    let backup_before = std::fs::read(config.storage.browser_vault_path()).unwrap();

    let err = lifecycle.exit(&password("typo")).await.unwrap_err();
    assert!(err.is_authentication());
    assert!(fixture.files()[0].exists());
    assert_eq!(std::fs::read(config.storage.browser_vault_path()).unwrap(), backup_before);

    let report = lifecycle.exit(&right).await.unwrap();
    assert!(report.is_clean());
    match lifecycle.startup(&right).await.unwrap() {
        StartupAction::Restored(report) => assert_eq!(report.processed, 1),
        other => panic!("expected Restored, got {other:?}"),
    }
}

/// First run against an existing main vault rejects a wrong password before protecting anything.
#[tokio::test]
async fn first_run_checks_existing_main_vault() {
    let fixture = BrowserFixture::builder()
        .firefox_profile("Profiles/existing", vec![("logins.json", b"{}".to_vec())])
        .build()
        .unwrap();
    let config = fixture.config();
    let main_vault = VaultStore::new(config.storage.vault_path());
    main_vault
        .save(&strongbox_vault::CredentialBook::new(), &password("right"))
        .await
        .unwrap();
    let lifecycle = Lifecycle::new(BrowserBackupManager::from_config(&config), main_vault);

    let err = lifecycle.first_run(&password("wrong")).await.unwrap_err();
    assert!(err.is_authentication());
    assert!(fixture.files()[0].exists());
    assert!(!config.storage.browser_vault_path().exists());
}
