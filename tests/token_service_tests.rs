//! Token service integration tests.
//!
//! Tokens are forged directly with `jsonwebtoken` where a test needs claims
//! the service itself would never mint.

mod common;

use auth_token::jwt::{TokenKind, ISSUER};
use auth_token::{AuthError, InvalidTokenReason, TokenService};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use common::{forge, forge_with, token_service, user, Account, SECRET};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde_json::{json, Value};

fn teste_claims(token_type: Option<&str>, exp_offset_secs: i64) -> Value {
    let now = Utc::now().timestamp();
    let mut claims = json!({
        "sub": "1",
        "name": "Teste",
        "email": "teste@email.com",
        "role": "ADMIN",
        "iat": now,
        "exp": now + exp_offset_secs,
    });
    if let Some(token_type) = token_type {
        claims["type"] = json!(token_type);
    }
    claims
}

fn assert_invalid(result: Result<impl std::fmt::Debug, AuthError>, expected: InvalidTokenReason) {
    match result {
        Err(AuthError::TokenInvalid { reason }) => assert_eq!(reason, expected),
        other => panic!("expected TokenInvalid({expected:?}), got {other:?}"),
    }
}

#[test]
fn test_extract_principal_from_foreign_token_without_issuer() {
    let service = token_service();
    let token = forge(&teste_claims(Some("ACCESS"), 3600));

    let principal = service.extract_principal(&token).unwrap();

    assert_eq!(principal, user());
    assert!(!service.is_invalid(&token));
}

#[test]
fn test_issued_token_carries_all_claims() {
    let service = token_service();
    let now = Utc::now();
    let token = service.issue_access(&Account::teste(), now).unwrap();

    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.validate_aud = false;
    let data = decode::<Value>(
        &token,
        &DecodingKey::from_secret(SECRET.as_bytes()),
        &validation,
    )
    .unwrap();
    let claims = data.claims;

    assert_eq!(claims["sub"], "1");
    assert_eq!(claims["name"], "Teste");
    assert_eq!(claims["email"], "teste@email.com");
    assert_eq!(claims["role"], "ADMIN");
    assert_eq!(claims["type"], "ACCESS");
    assert_eq!(claims["iss"], ISSUER);
    assert_eq!(claims["iat"], now.timestamp());
    assert_eq!(claims["exp"], now.timestamp() + 3600);
}

#[test]
fn test_garbage_is_invalid() {
    let service = token_service();

    assert!(service.is_invalid("invalid-token"));
    assert!(service.is_invalid(""));
    assert!(service.is_invalid("a.b.c"));
    assert!(matches!(
        service.extract_principal("invalid-token"),
        Err(AuthError::TokenInvalid {
            reason: InvalidTokenReason::Malformed(_)
        })
    ));
}

#[test]
fn test_expired_token_is_invalid() {
    let service = token_service();
    let token = forge(&teste_claims(Some("ACCESS"), -10));

    assert!(service.is_invalid(&token));
    assert!(!service.is_access_token(&token));
    assert!(!service.is_refresh_token(&token));
    assert_invalid(service.extract_principal(&token), InvalidTokenReason::Expired);
}

#[test]
fn test_foreign_key_is_signature_mismatch() {
    let service = token_service();
    let token = forge_with(
        &teste_claims(Some("ACCESS"), 3600),
        b"some-other-secret-key-0123456789abcdef",
    );

    assert!(service.is_invalid(&token));
    assert_invalid(service.decode(&token), InvalidTokenReason::SignatureMismatch);
}

#[test]
fn test_tampered_payload_is_signature_mismatch() {
    let service = token_service();
    let token = service.issue_access(&user(), Utc::now()).unwrap();

    let parts: Vec<&str> = token.split('.').collect();
    let mut payload: Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
    payload["role"] = json!("ROOT");
    let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap());
    let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    assert_invalid(service.decode(&tampered), InvalidTokenReason::SignatureMismatch);
}

#[test]
fn test_missing_exp_is_invalid() {
    let service = token_service();
    let mut claims = teste_claims(Some("ACCESS"), 3600);
    claims.as_object_mut().unwrap().remove("exp");

    assert!(service.is_invalid(&forge(&claims)));
}

#[test]
fn test_classification() {
    let service = token_service();
    let now = Utc::now();
    let access = service.issue_access(&user(), now).unwrap();
    let refresh = service.issue_refresh(&user(), now).unwrap();

    assert!(service.is_access_token(&access));
    assert!(!service.is_refresh_token(&access));
    assert!(service.is_refresh_token(&refresh));
    assert!(!service.is_access_token(&refresh));
    assert_eq!(service.token_kind(&access).unwrap(), Some(TokenKind::Access));
}

#[test]
fn test_unknown_or_absent_type_is_neither_kind() {
    let service = token_service();

    for token_type in [None, Some("ID"), Some("refresh"), Some("")] {
        let token = forge(&teste_claims(token_type, 3600));

        assert!(!service.is_invalid(&token), "{token_type:?}");
        assert!(!service.is_access_token(&token), "{token_type:?}");
        assert!(!service.is_refresh_token(&token), "{token_type:?}");
        assert_eq!(service.token_kind(&token).unwrap(), None);
    }
}

#[test]
fn test_non_numeric_subject_verifies_but_has_no_principal() {
    let service = token_service();
    let mut claims = teste_claims(Some("ACCESS"), 3600);
    claims["sub"] = json!("teste@email.com");
    let token = forge(&claims);

    assert!(!service.is_invalid(&token));
    assert!(service.is_access_token(&token));
    assert!(matches!(
        service.extract_principal(&token),
        Err(AuthError::TokenInvalid {
            reason: InvalidTokenReason::Malformed(_)
        })
    ));
}

#[test]
fn test_rotate_access_from_refresh() {
    let service = token_service();
    let refresh = service
        .issue_refresh(&user(), Utc::now() - Duration::seconds(30))
        .unwrap();

    let access = service.rotate_access_from_refresh(&refresh).unwrap();

    assert!(service.is_access_token(&access));
    assert_eq!(service.extract_principal(&access).unwrap(), user());
    // The presented refresh token stays usable.
    assert!(service.is_refresh_token(&refresh));
}

#[test]
fn test_rotate_refresh_from_refresh() {
    let service = token_service();
    let refresh = service
        .issue_refresh(&user(), Utc::now() - Duration::seconds(30))
        .unwrap();

    let rotated = service.rotate_refresh_from_refresh(&refresh).unwrap();

    assert_ne!(rotated, refresh);
    assert!(service.is_refresh_token(&rotated));
    assert_eq!(service.extract_principal(&rotated).unwrap(), user());
}

#[test]
fn test_rotate_with_access_token_is_wrong_type() {
    let service = token_service();
    let access = service.issue_access(&user(), Utc::now()).unwrap();

    let expected = Err(AuthError::WrongTokenType {
        expected: TokenKind::Refresh,
        found: Some("ACCESS".to_string()),
    });

    assert_eq!(service.rotate_access_from_refresh(&access), expected);
    assert_eq!(service.rotate_refresh_from_refresh(&access), expected);
}

#[test]
fn test_rotate_without_type_is_wrong_type() {
    let service = token_service();
    let token = forge(&teste_claims(None, 3600));

    assert_eq!(
        service.rotate_access_from_refresh(&token),
        Err(AuthError::WrongTokenType {
            expected: TokenKind::Refresh,
            found: None,
        })
    );
}

#[test]
fn test_rotate_with_expired_refresh_is_invalid() {
    let service = token_service();
    let token = forge(&teste_claims(Some("REFRESH"), -1));

    assert_invalid(
        service.rotate_access_from_refresh(&token),
        InvalidTokenReason::Expired,
    );
    assert_invalid(
        service.rotate_refresh_from_refresh(&token),
        InvalidTokenReason::Expired,
    );
}
