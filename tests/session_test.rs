mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};

use setlist2playlist::{
    management::{SessionManager, SessionStore, StoreError},
    spotify::{Credential, Session, SessionError},
    types::TokenResponse,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn session_with(access: &str, refresh: &str, expiry: &str, token_type: &str) -> Session {
    Session::new(access, refresh, expiry, token_type)
}

fn temp_session_path(name: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "setlist2playlist-test-{}-{}",
        name,
        std::process::id()
    ));
    path.push("cache/session.json");
    path
}

#[test]
fn test_validate_accepts_complete_future_session() {
    let session = session_with("access", "refresh", "2025-06-01T13:00:00Z", "Bearer");
    assert_eq!(session.validate_at(fixed_now()), Ok(()));
}

#[test]
fn test_validate_rejects_expiry_at_or_before_now() {
    let now = fixed_now();
    for expiry in [
        "2025-06-01T12:00:00Z",
        "2025-06-01T11:59:59Z",
        "2020-01-01T00:00:00Z",
    ] {
        let session = session_with("access", "refresh", expiry, "Bearer");
        assert_eq!(session.validate_at(now), Err(SessionError::Expired), "{}", expiry);
    }
}

#[test]
fn test_validate_rejects_every_missing_field_combination() {
    let present = ["access", "refresh", "2025-06-01T13:00:00Z", "Bearer"];

    // Every combination of present/empty fields except "all present"
    for mask in 0u8..15 {
        let field = |i: usize| if mask & (1 << i) != 0 { present[i] } else { "" };
        let session = session_with(field(0), field(1), field(2), field(3));

        match session.validate_at(fixed_now()) {
            Err(SessionError::MissingField(_)) => {}
            other => panic!("mask {:04b}: expected missing field, got {:?}", mask, other),
        }
    }
}

#[test]
fn test_validate_reports_first_missing_field() {
    let session = session_with("", "", "2025-06-01T13:00:00Z", "Bearer");
    assert_eq!(
        session.validate_at(fixed_now()),
        Err(SessionError::MissingField("access token"))
    );

    let session = session_with("access", "refresh", "2025-06-01T13:00:00Z", "  ");
    assert_eq!(
        session.validate_at(fixed_now()),
        Err(SessionError::MissingField("token type"))
    );
}

#[test]
fn test_validate_rejects_malformed_expiry() {
    let session = session_with("access", "refresh", "tomorrow", "Bearer");
    assert_eq!(
        session.validate_at(fixed_now()),
        Err(SessionError::MalformedExpiry("tomorrow".to_string()))
    );
}

#[test]
fn test_validate_honours_timezone_offsets() {
    // 14:30+02:00 is 12:30Z, still ahead of now
    let session = session_with("access", "refresh", "2025-06-01T14:30:00+02:00", "Bearer");
    assert_eq!(session.validate_at(fixed_now()), Ok(()));
}

#[test]
fn test_credential_round_trip() {
    let credential = Credential {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        expires_at: fixed_now() + Duration::seconds(3600),
        token_type: "Bearer".to_string(),
    };

    let session = Session::from_credential(&credential);
    assert_eq!(session.expiry, "2025-06-01T13:00:00Z");
    assert_eq!(session.to_credential().unwrap(), credential);
}

#[test]
fn test_to_credential_rejects_malformed_expiry() {
    let session = session_with("access", "refresh", "not-a-date", "Bearer");
    assert!(matches!(
        session.to_credential(),
        Err(SessionError::MalformedExpiry(_))
    ));
}

#[test]
fn test_credential_from_token_response() {
    let response = TokenResponse {
        access_token: "new-access".to_string(),
        token_type: "Bearer".to_string(),
        scope: None,
        expires_in: 3600,
        refresh_token: Some("new-refresh".to_string()),
    };

    let credential = Credential::from_token_response(response, Some("old-refresh"), fixed_now()).unwrap();
    assert_eq!(credential.access_token, "new-access");
    assert_eq!(credential.refresh_token, "new-refresh");
    assert_eq!(credential.expires_at, fixed_now() + Duration::seconds(3600));
}

#[test]
fn test_credential_keeps_previous_refresh_token() {
    let response = TokenResponse {
        access_token: "new-access".to_string(),
        token_type: "Bearer".to_string(),
        scope: None,
        expires_in: 60,
        refresh_token: None,
    };

    let credential = Credential::from_token_response(response, Some("old-refresh"), fixed_now()).unwrap();
    assert_eq!(credential.refresh_token, "old-refresh");
}

fn token_response_lasting(expires_in: i64) -> TokenResponse {
    TokenResponse {
        access_token: "new-access".to_string(),
        token_type: "Bearer".to_string(),
        scope: None,
        expires_in,
        refresh_token: Some("new-refresh".to_string()),
    }
}

#[test]
fn test_credential_rejects_out_of_range_lifetime() {
    for expires_in in [i64::MAX, i64::MAX / 1000, 9_300_000_000_000_000] {
        assert_eq!(
            Credential::from_token_response(token_response_lasting(expires_in), None, fixed_now()),
            Err(SessionError::InvalidLifetime(expires_in)),
            "{}",
            expires_in
        );
    }
}

#[test]
fn test_credential_rejects_negative_lifetime() {
    for expires_in in [-1, -3600, i64::MIN] {
        assert_eq!(
            Credential::from_token_response(token_response_lasting(expires_in), None, fixed_now()),
            Err(SessionError::InvalidLifetime(expires_in))
        );
    }
}

#[test]
fn test_credential_accepts_zero_lifetime() {
    let credential =
        Credential::from_token_response(token_response_lasting(0), None, fixed_now()).unwrap();
    assert_eq!(credential.expires_at, fixed_now());
}

#[test]
fn test_credential_debug_redacts_tokens() {
    let credential = Credential {
        access_token: "BQDa-very-long-access-token".to_string(),
        refresh_token: "AQBz-very-long-refresh-token".to_string(),
        expires_at: fixed_now(),
        token_type: "Bearer".to_string(),
    };
    let debug = format!("{:?}", credential);
    assert!(!debug.contains("very-long-access-token"));
    assert!(!debug.contains("very-long-refresh-token"));
    assert!(debug.contains("Bearer"));
}

#[test]
fn test_session_debug_redacts_tokens() {
    let session = session_with(
        "BQDa-very-long-access-token",
        "AQBz-very-long-refresh-token",
        "2025-06-01T13:00:00Z",
        "Bearer",
    );
    let debug = format!("{:?}", session);
    assert!(!debug.contains("very-long-access-token"));
    assert!(!debug.contains("very-long-refresh-token"));
    assert!(debug.contains("2025-06-01T13:00:00Z"));
}

#[test]
fn test_session_json_field_names() {
    let session = session_with("a", "r", "2025-06-01T13:00:00Z", "Bearer");
    let json: serde_json::Value = serde_json::to_value(&session).unwrap();

    assert_eq!(json["access_token"], "a");
    assert_eq!(json["refresh_token"], "r");
    assert_eq!(json["expiry"], "2025-06-01T13:00:00Z");
    assert_eq!(json["token_type"], "Bearer");
}

#[tokio::test]
async fn test_session_manager_round_trip() {
    let path = temp_session_path("round-trip");
    let _ = std::fs::remove_file(&path);
    let store = SessionManager::at(&path);

    let session = common::valid_session();
    store.write(&session).await.unwrap();
    let loaded = store.read().await.unwrap();

    assert_eq!(loaded, session);
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_session_manager_overwrites_previous_session() {
    let path = temp_session_path("overwrite");
    let store = SessionManager::at(&path);

    store.write(&common::expired_session()).await.unwrap();
    let fresh = Session::new("fresh", "refresh", common::rfc3339_in(600), "Bearer");
    store.write(&fresh).await.unwrap();

    assert_eq!(store.read().await.unwrap(), fresh);
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_session_manager_missing_file() {
    let store = SessionManager::at(temp_session_path("missing"));
    assert!(matches!(store.read().await, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn test_session_manager_corrupt_file() {
    let path = temp_session_path("corrupt");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let store = SessionManager::at(&path);
    assert!(matches!(store.read().await, Err(StoreError::SerdeError(_))));
    let _ = std::fs::remove_file(&path);
}
