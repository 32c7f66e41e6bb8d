//! Session lifecycle through the security manager: idle expiry on access,
//! sweeps, the background validation task, and listener notifications.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use warden_core::{AuthenticationToken, ManualClock, Realm};
use warden_security::{SecurityManager, SecurityManagerBuilder, WardenError};
use warden_session::{Session, SessionError, SessionId, SessionListener, SessionManagerConfig};
use warden_test::MockRealm;

#[derive(Default)]
struct CountingListener {
    started: AtomicUsize,
    stopped: AtomicUsize,
    expired: Mutex<Vec<SessionId>>,
}

impl CountingListener {
    fn expired(&self) -> Vec<SessionId> {
        self.expired.lock().unwrap().clone()
    }
}

impl SessionListener for CountingListener {
    fn on_start(&self, _session: &Session) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_stop(&self, _session: &Session) {
        self.stopped.fetch_add(1, Ordering::SeqCst);
    }

    fn on_expiration(&self, session: &Session) {
        self.expired.lock().unwrap().push(session.id());
    }
}

fn session_config(timeout: Duration, interval: Duration) -> SessionManagerConfig {
    SessionManagerConfig {
        global_timeout: Some(timeout),
        validation_enabled: true,
        validation_interval: interval,
        delete_invalid_sessions: true,
    }
}

fn realm() -> Arc<dyn Realm> {
    Arc::new(MockRealm::new("memory").succeeding("alice"))
}

fn manual_manager(listener: Arc<CountingListener>) -> (Arc<SecurityManager>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_now());
    let manager = SecurityManagerBuilder::new()
        .with_realm(realm())
        .with_session_config(session_config(Duration::from_secs(60), Duration::from_secs(3600)))
        .with_session_listener(listener)
        .with_clock(clock.clone())
        .build()
        .unwrap();
    (manager, clock)
}

fn token() -> AuthenticationToken {
    warden_test::test_token()
}

#[tokio::test]
async fn test_listener_sees_start_stop_and_lazy_expiry() {
    let listener = Arc::new(CountingListener::default());
    let (manager, clock) = manual_manager(listener.clone());

    let leaving = manager.login(&token()).await.unwrap();
    let idle = manager.login(&token()).await.unwrap();
    assert_eq!(listener.started.load(Ordering::SeqCst), 2);

    leaving.logout().await.unwrap();
    assert_eq!(listener.stopped.load(Ordering::SeqCst), 1);

    clock.advance(Duration::from_secs(61));
    let err = idle.is_permitted("anything").await.unwrap_err();
    assert!(matches!(err, WardenError::Session(SessionError::Expired(_))));
    assert!(err.requires_login());
    assert_eq!(listener.expired(), vec![*idle.session_id()]);

    // Repeated access reports the same expiry without a second notification.
    assert!(!idle.is_valid().await);
    assert_eq!(listener.expired().len(), 1);
    assert_eq!(listener.stopped.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sweep_expires_idle_and_purges_dead_sessions() {
    let listener = Arc::new(CountingListener::default());
    let (manager, clock) = manual_manager(listener.clone());

    let stopped = manager.login(&token()).await.unwrap();
    let idle = manager.login(&token()).await.unwrap();
    let busy = manager.login(&token()).await.unwrap();
    stopped.logout().await.unwrap();

    clock.advance(Duration::from_secs(40));
    busy.touch().await.unwrap();
    clock.advance(Duration::from_secs(30));

    let report = manager.sessions().validate_sessions().await.unwrap();
    assert_eq!(report.examined, 2);
    assert_eq!(report.expired, 1);
    assert_eq!(report.purged, 2);
    assert_eq!(listener.expired(), vec![*idle.session_id()]);

    for gone in [&stopped, &idle] {
        let err = manager.resume(*gone.session_id()).await.unwrap_err();
        assert!(matches!(err, WardenError::Session(SessionError::Unknown(_))));
        assert!(err.requires_login());
    }
    assert!(busy.is_permitted_all(&[]).await.unwrap());
    assert_eq!(manager.sessions().active_session_count().await.unwrap(), 1);

    // Logging out a purged session is not an error.
    idle.logout().await.unwrap();
}

#[tokio::test]
async fn test_touch_keeps_session_alive_in_real_time() {
    let manager = SecurityManagerBuilder::new()
        .with_realm(realm())
        .with_session_config(session_config(Duration::from_millis(300), Duration::from_secs(3600)))
        .build()
        .unwrap();

    let subject = manager.login(&token()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    subject.touch().await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(subject.is_valid().await, "350ms after login but 200ms after touch");

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!subject.is_valid().await);
    let err = subject.touch().await.unwrap_err();
    assert!(matches!(err, WardenError::Session(SessionError::Expired(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_background_validation_purges_idle_sessions() {
    let listener = Arc::new(CountingListener::default());
    let manager = SecurityManagerBuilder::new()
        .with_realm(realm())
        .with_session_config(session_config(Duration::from_millis(100), Duration::from_millis(50)))
        .with_session_listener(listener.clone())
        .build()
        .unwrap();
    assert!(manager.start_validation());
    // Starting twice keeps the running task.
    assert!(manager.start_validation());

    let subject = manager.login(&token()).await.unwrap();
    let id = *subject.session_id();

    let mut purged = false;
    for _ in 0..40 {
        tokio::time::sleep(Duration::from_millis(50)).await;
        if matches!(
            manager.sessions().get_session(&id).await,
            Err(SessionError::Unknown(_))
        ) {
            purged = true;
            break;
        }
    }
    assert!(purged, "sweep never purged the idle session");
    assert_eq!(listener.expired(), vec![id]);
    assert_eq!(manager.sessions().active_session_count().await.unwrap(), 0);

    manager.shutdown().await;
    subject.logout().await.unwrap();
}

#[tokio::test]
async fn test_per_session_work_does_not_block_other_sessions() {
    let listener = Arc::new(CountingListener::default());
    let (manager, _clock) = manual_manager(listener);

    let mut subjects = Vec::new();
    for _ in 0..8 {
        subjects.push(manager.login(&token()).await.unwrap());
    }

    let tasks: Vec<_> = subjects
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, subject)| {
            tokio::spawn(async move {
                for n in 0..10 {
                    subject
                        .set_attribute("counter", serde_json::json!(n))
                        .await
                        .unwrap();
                    subject.touch().await.unwrap();
                }
                subject.set_attribute("owner", serde_json::json!(i)).await.unwrap();
            })
        })
        .collect();
    for joined in futures::future::join_all(tasks).await {
        joined.unwrap();
    }

    for (i, subject) in subjects.iter().enumerate() {
        assert_eq!(subject.get_attribute("counter").await.unwrap(), Some(serde_json::json!(9)));
        assert_eq!(subject.get_attribute("owner").await.unwrap(), Some(serde_json::json!(i)));
    }
    assert_eq!(manager.sessions().active_session_count().await.unwrap(), 8);
}
