use std::sync::Arc;
use std::time::Duration;

use warden_authc::CancellationToken;
use warden_core::{AuthenticationError, AuthenticationToken, AuthorizationError, ManualClock, Realm};
use warden_session::{SessionContext, SessionError, SessionManagerConfig};
use warden_test::{AuthEvent, MockRealm, RecordingAuthListener, test_authorization, test_token};

use super::*;
use crate::SecurityManagerBuilder;

fn authorized_realm() -> MockRealm {
    MockRealm::new("db")
        .succeeding("alice")
        .with_authorization(test_authorization())
}

fn manager_with(realm: &MockRealm) -> Arc<SecurityManager> {
    SecurityManagerBuilder::new()
        .with_realm(Arc::new(realm.clone()) as Arc<dyn Realm>)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_login_returns_subject_with_session() {
    let manager = manager_with(&authorized_realm());
    let token = test_token().with_host("10.0.0.7");

    let subject = manager.login(&token).await.unwrap();

    assert_eq!(subject.primary_principal().unwrap().as_str(), "alice");
    let session = subject.session().await.unwrap();
    assert_eq!(session.host(), Some("10.0.0.7"));
    assert!(subject.is_valid().await);
    assert!(subject.is_permitted("printer:print:lp7200").await.unwrap());
    assert!(!subject.is_permitted("printer:manage").await.unwrap());
    assert!(subject.has_role("user").await.unwrap());
    subject.check_role("user").await.unwrap();
}

#[tokio::test]
async fn test_failed_login_creates_no_session() {
    let manager = manager_with(&MockRealm::new("db"));

    let err = manager.login(&test_token()).await.unwrap_err();

    assert!(matches!(
        err,
        WardenError::Authentication(AuthenticationError::UnknownAccount { .. })
    ));
    assert_eq!(manager.sessions().active_session_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_check_permission_reports_principal() {
    let manager = manager_with(&authorized_realm());
    let subject = manager.login(&test_token()).await.unwrap();

    let err = subject.check_permission("server:restart").await.unwrap_err();
    match err {
        WardenError::Authorization(AuthorizationError::Unauthorized { principal, .. }) => {
            assert_eq!(principal, "alice");
        },
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn test_logout_is_idempotent_and_ends_checks() {
    let manager = manager_with(&authorized_realm());
    let subject = manager.login(&test_token()).await.unwrap();

    subject.logout().await.unwrap();
    subject.logout().await.unwrap();

    assert!(!subject.is_valid().await);
    let err = subject.is_permitted("printer:print").await.unwrap_err();
    assert!(matches!(err, WardenError::Session(SessionError::Stopped(_))));
    assert!(err.requires_login());
}

#[tokio::test]
async fn test_logout_notifies_listeners() {
    let listener = RecordingAuthListener::new();
    let manager = SecurityManagerBuilder::new()
        .with_realm(Arc::new(authorized_realm()))
        .with_authentication_listener(Arc::new(listener.clone()))
        .build()
        .unwrap();

    let subject = manager.login(&test_token()).await.unwrap();
    subject.logout().await.unwrap();

    assert_eq!(
        listener.events(),
        vec![
            AuthEvent::Success("alice".to_owned()),
            AuthEvent::Logout("alice".to_owned()),
        ]
    );
}

#[tokio::test]
async fn test_logout_clears_cached_authorization() {
    let realm = authorized_realm();
    let manager = manager_with(&realm);

    let subject = manager.login(&test_token()).await.unwrap();
    assert!(subject.is_permitted("printer:print").await.unwrap());
    assert!(subject.has_role("user").await.unwrap());
    assert_eq!(realm.authz_calls(), 1);

    subject.logout().await.unwrap();

    let again = manager.login(&test_token()).await.unwrap();
    assert!(again.is_permitted("printer:print").await.unwrap());
    assert_eq!(realm.authz_calls(), 2);
}

#[tokio::test]
async fn test_uncached_authorization_hits_realm_each_time() {
    let realm = authorized_realm();
    let manager = SecurityManagerBuilder::new()
        .with_realm(Arc::new(realm.clone()))
        .with_authorization_cache(false)
        .build()
        .unwrap();

    let subject = manager.login(&test_token()).await.unwrap();
    subject.is_permitted("printer:print").await.unwrap();
    subject.is_permitted("printer:print").await.unwrap();
    assert_eq!(realm.authz_calls(), 2);
}

#[tokio::test]
async fn test_resume_rebuilds_subject() {
    let manager = manager_with(&authorized_realm());
    let subject = manager.login(&test_token()).await.unwrap();

    let resumed = manager.resume(*subject.session_id()).await.unwrap();

    assert_eq!(resumed.principals(), subject.principals());
    assert_eq!(resumed.session_id(), subject.session_id());
    assert!(resumed.has_role("user").await.unwrap());
}

#[tokio::test]
async fn test_resume_after_logout_fails() {
    let manager = manager_with(&authorized_realm());
    let subject = manager.login(&test_token()).await.unwrap();
    subject.logout().await.unwrap();

    let err = manager.resume(*subject.session_id()).await.unwrap_err();
    assert!(matches!(err, WardenError::Session(SessionError::Stopped(_))));
}

#[tokio::test]
async fn test_resume_anonymous_session_is_unauthenticated() {
    let manager = manager_with(&authorized_realm());
    let id = manager.sessions().start(&SessionContext::new()).await.unwrap();

    let err = manager.resume(id).await.unwrap_err();
    assert!(matches!(
        err,
        WardenError::Authorization(AuthorizationError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_expired_session_blocks_checks_but_not_logout() {
    let clock = Arc::new(ManualClock::starting_now());
    let manager = SecurityManagerBuilder::new()
        .with_realm(Arc::new(authorized_realm()))
        .with_session_config(SessionManagerConfig {
            global_timeout: Some(Duration::from_secs(60)),
            ..SessionManagerConfig::default()
        })
        .with_clock(clock.clone())
        .build()
        .unwrap();

    let subject = manager.login(&test_token()).await.unwrap();
    clock.advance(Duration::from_secs(30));
    subject.touch().await.unwrap();
    clock.advance(Duration::from_secs(45));
    assert!(subject.has_role("user").await.unwrap());

    clock.advance(Duration::from_secs(61));
    let err = subject.has_role("user").await.unwrap_err();
    assert!(matches!(err, WardenError::Session(SessionError::Expired(_))));

    subject.logout().await.unwrap();
}

#[tokio::test]
async fn test_attributes_and_reserved_keys() {
    let manager = manager_with(&authorized_realm());
    let subject = manager.login(&test_token()).await.unwrap();

    subject.set_attribute("cart", serde_json::json!([1, 2])).await.unwrap();
    assert_eq!(
        subject.get_attribute("cart").await.unwrap(),
        Some(serde_json::json!([1, 2]))
    );
    assert_eq!(
        subject.remove_attribute("cart").await.unwrap(),
        Some(serde_json::json!([1, 2]))
    );

    let err = subject
        .set_attribute(PRINCIPALS_ATTRIBUTE, serde_json::json!("mallory"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WardenError::Session(SessionError::InvalidAttributeKey)
    ));
    assert!(subject.remove_attribute(PRINCIPALS_ATTRIBUTE).await.is_err());
}

#[tokio::test]
async fn test_reserved_keys_are_not_readable_through_subject() {
    let manager = manager_with(&authorized_realm());
    let subject = manager
        .login(&test_token().with_remember_me(true))
        .await
        .unwrap();

    for key in [PRINCIPALS_ATTRIBUTE, REMEMBER_ME_ATTRIBUTE, "warden.anything"] {
        let err = subject.get_attribute(key).await.unwrap_err();
        assert!(matches!(
            err,
            WardenError::Session(SessionError::InvalidAttributeKey)
        ));
    }

    // still stored, only hidden from the subject
    let stored = manager
        .sessions()
        .get_attribute(subject.session_id(), PRINCIPALS_ATTRIBUTE)
        .await
        .unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn test_remember_me_recorded() {
    let manager = manager_with(&authorized_realm());
    let subject = manager
        .login(&test_token().with_remember_me(true))
        .await
        .unwrap();
    assert!(subject.is_remembered().await.unwrap());

    let plain = manager.login(&test_token()).await.unwrap();
    assert!(!plain.is_remembered().await.unwrap());
}

#[tokio::test]
async fn test_cancelled_login() {
    let manager = manager_with(&authorized_realm());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = manager
        .login_with_cancel(&test_token(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WardenError::Authentication(AuthenticationError::Cancelled)
    ));
}

#[tokio::test]
async fn test_blank_principal_rejected() {
    let manager = manager_with(&authorized_realm());
    let err = manager
        .login(&AuthenticationToken::username_password(" ", "pw"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WardenError::Authentication(AuthenticationError::InvalidToken(_))
    ));
}

#[tokio::test]
async fn test_validation_start_and_shutdown() {
    let manager = manager_with(&authorized_realm());
    assert!(manager.start_validation());
    assert!(manager.start_validation());
    manager.shutdown().await;
    manager.shutdown().await;
}

#[tokio::test]
async fn test_validation_disabled() {
    let manager = SecurityManagerBuilder::new()
        .with_realm(Arc::new(authorized_realm()))
        .with_session_config(SessionManagerConfig {
            validation_enabled: false,
            ..SessionManagerConfig::default()
        })
        .build()
        .unwrap();
    assert!(!manager.start_validation());
}
