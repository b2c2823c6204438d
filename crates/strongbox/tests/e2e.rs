// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end session tests across config, vault and browser crates.
//!
//! Each test builds its own browser fixture and TOML config, so tests are
//! independent and order-insensitive.

use secrecy::SecretString;
use strongbox_browser::{BrowserBackupManager, Lifecycle, StartupAction};
use strongbox_config::StrongboxConfig;
use strongbox_core::{CredentialRecord, StrongboxError};
use strongbox_test_utils::BrowserFixture;
use strongbox_vault::{CredentialBook, VaultStore};

fn password(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

/// Render the fixture locations as a TOML config and load it the way the binary does.
fn config_for(fixture: &BrowserFixture) -> StrongboxConfig {
    let toml = format!(
        r#"
[general]
log_level = "debug"

[storage]
data_dir = '{}'

[discovery]
firefox_dir = '{}'
chromium_dirs = []

[eraser]
buffer_size = 1024
"#,
        fixture.data_dir().display(),
        fixture.firefox_dir().display(),
    );
    strongbox_config::load_and_validate_str(&toml).expect("fixture config should validate")
}

#[tokio::test]
async fn full_session_protects_and_restores_browser_files() {
    let fixture = BrowserFixture::builder()
        .firefox_profile(
            "Profiles/session.default",
            vec![("logins.json", b"{\"logins\":[]}".to_vec()), ("key4.db", vec![0xAB; 4096])],
        )
        .build()
        .unwrap();
    let config = config_for(&fixture);
    assert_eq!(config.eraser.buffer_size, 1024);

    let main_vault = VaultStore::new(config.storage.vault_path());
    let lifecycle = Lifecycle::new(BrowserBackupManager::from_config(&config), main_vault.clone());
    let pw = password("session-master");

    // First launch creates the main vault and protects the browser files.
    assert!(lifecycle.is_first_run());
    let action = lifecycle.on_launch(&pw).await.unwrap();
    assert!(matches!(action, StartupAction::Protected { .. }));
    assert!(fixture.files().iter().all(|p| !p.exists()));
    assert!(!lifecycle.is_first_run());

    let mut book: CredentialBook = main_vault.load(&pw).await.unwrap();
    assert!(book.is_empty());
    let id = book.insert(CredentialRecord {
        service: "mail".into(),
        username: "alice".into(),
        password: "hunter2-but-longer".into(),
        ..Default::default()
    });
    main_vault.save(&book, &pw).await.unwrap();

    // Second launch restores the files byte for byte.
    match lifecycle.on_launch(&pw).await.unwrap() {
        StartupAction::Restored(report) => assert_eq!(report.processed, 2),
        other => panic!("expected Restored, got {other:?}"),
    }
    assert_eq!(std::fs::read(&fixture.files()[1]).unwrap(), vec![0xAB; 4096]);

    // Exit backs up and wipes again; the main vault is untouched.
    let exit = lifecycle.exit(&pw).await.unwrap();
    assert!(exit.is_clean());
    assert!(fixture.files().iter().all(|p| !p.exists()));

    let reloaded: CredentialBook = main_vault.load(&pw).await.unwrap();
    assert_eq!(reloaded.get(&id).map(|r| r.service.as_str()), Some("mail"));
}

#[tokio::test]
async fn main_and_browser_vaults_are_separate_files() {
    let fixture = BrowserFixture::builder()
        .firefox_profile("Profiles/sep", vec![("logins.json", b"{}".to_vec())])
        .build()
        .unwrap();
    let config = config_for(&fixture);
    assert_ne!(config.storage.vault_path(), config.storage.browser_vault_path());

    let manager = BrowserBackupManager::from_config(&config);
    manager.backup(&password("pw")).await.unwrap();

    assert!(config.storage.browser_vault_path().is_file());
    assert!(!config.storage.vault_path().exists());
}

#[tokio::test]
async fn wrong_master_password_leaves_everything_in_place() {
    let fixture = BrowserFixture::builder()
        .firefox_profile("Profiles/wrong", vec![("key4.db", b"key".to_vec())])
        .build()
        .unwrap();
    let config = config_for(&fixture);
    let main_vault = VaultStore::new(config.storage.vault_path());
    main_vault
        .save(&CredentialBook::new(), &password("right"))
        .await
        .unwrap();

    let err = main_vault
        .load::<CredentialBook>(&password("wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, StrongboxError::Authentication));

    let lifecycle = Lifecycle::new(BrowserBackupManager::from_config(&config), main_vault);
    lifecycle.manager().backup(&password("right")).await.unwrap();
    lifecycle.manager().secure_delete_all(true).await.unwrap();

    let err = lifecycle.startup(&password("wrong")).await.unwrap_err();
    assert!(err.is_authentication());
    assert!(!fixture.files()[0].exists());
}

#[test]
fn unknown_config_keys_are_rejected() {
    let errors = strongbox_config::load_and_validate_str("[storage]\ndata_dri = '/tmp'\n").unwrap_err();
    assert!(!errors.is_empty());
}
