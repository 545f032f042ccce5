use std::sync::Arc;

use chrono::Duration;

use portfolio_auth::domain::repository::{Clock, CodeStore};
use portfolio_auth::domain::types::VerificationRecord;
use portfolio_auth::error::AuthServiceError;
use portfolio_auth::infra::locks::IdentityLocks;
use portfolio_auth::usecase::code::RequestCodeInput;
use portfolio_auth::usecase::verify::{VerifyCodeInput, VerifyCodeUseCase};

use crate::helpers::{ADMIN_EMAIL, Fixture, MockClock, YieldingStore};

fn attempt(email: &str, code: &str) -> VerifyCodeInput {
    VerifyCodeInput {
        email: email.to_owned(),
        code: code.to_owned(),
    }
}

async fn issue(fx: &Fixture) -> String {
    fx.issuer()
        .execute(RequestCodeInput {
            email: ADMIN_EMAIL.to_owned(),
        })
        .await
        .unwrap();
    fx.mailer.last_code()
}

/// A code guaranteed to differ from `code`.
fn wrong(code: &str) -> String {
    if code == "123456" { "654321" } else { "123456" }.to_owned()
}

#[tokio::test]
async fn should_accept_correct_code_exactly_once() {
    let fx = Fixture::new();
    let code = issue(&fx).await;

    let out = fx.verifier().execute(attempt(ADMIN_EMAIL, &code)).await.unwrap();
    assert_eq!(out.identity, ADMIN_EMAIL);
    assert!(fx.store.get(ADMIN_EMAIL).await.unwrap().is_none(), "code consumed");

    let replay = fx.verifier().execute(attempt(ADMIN_EMAIL, &code)).await;
    assert!(
        matches!(replay, Err(AuthServiceError::CodeNotFound)),
        "expected CodeNotFound on replay, got {replay:?}"
    );
}

#[tokio::test]
async fn should_report_not_found_without_issued_code() {
    let fx = Fixture::new();

    let result = fx.verifier().execute(attempt(ADMIN_EMAIL, "123456")).await;
    assert!(matches!(result, Err(AuthServiceError::CodeNotFound)));

    let result = fx
        .verifier()
        .execute(attempt("stranger@example.com", "123456"))
        .await;
    assert!(matches!(result, Err(AuthServiceError::CodeNotFound)));
}

#[tokio::test]
async fn should_reject_correct_code_after_expiry_and_purge_it() {
    let fx = Fixture::new();
    let code = issue(&fx).await;

    fx.clock.advance(Duration::minutes(5) + Duration::seconds(1));

    let result = fx.verifier().execute(attempt(ADMIN_EMAIL, &code)).await;
    assert!(
        matches!(result, Err(AuthServiceError::CodeExpired)),
        "expected CodeExpired, got {result:?}"
    );
    assert!(fx.store.get(ADMIN_EMAIL).await.unwrap().is_none(), "expired record purged");

    let again = fx.verifier().execute(attempt(ADMIN_EMAIL, &code)).await;
    assert!(matches!(again, Err(AuthServiceError::CodeNotFound)));
}

#[tokio::test]
async fn should_report_expired_before_comparing_codes() {
    let fx = Fixture::new();
    let code = issue(&fx).await;

    fx.clock.advance(Duration::minutes(10));

    let result = fx.verifier().execute(attempt(ADMIN_EMAIL, &wrong(&code))).await;
    assert!(matches!(result, Err(AuthServiceError::CodeExpired)));
}

#[tokio::test]
async fn should_accept_code_at_exact_expiry_instant() {
    let fx = Fixture::new();
    let code = issue(&fx).await;

    fx.clock.advance(Duration::minutes(5));

    fx.verifier()
        .execute(attempt(ADMIN_EMAIL, &code))
        .await
        .expect("code is still valid at its expiry instant");
}

#[tokio::test]
async fn should_keep_record_on_mismatch_and_allow_retries() {
    let fx = Fixture::new();
    let code = issue(&fx).await;
    let bad = wrong(&code);

    for _ in 0..20 {
        let result = fx.verifier().execute(attempt(ADMIN_EMAIL, &bad)).await;
        assert!(
            matches!(result, Err(AuthServiceError::CodeMismatch)),
            "expected CodeMismatch, got {result:?}"
        );
    }
    let record = fx.store.get(ADMIN_EMAIL).await.unwrap().unwrap();
    assert_eq!(record.code, code, "mismatch must not change the record");

    fx.verifier().execute(attempt(ADMIN_EMAIL, &code)).await.unwrap();
}

#[tokio::test]
async fn should_compare_codes_exactly() {
    let fx = Fixture::new();
    let code = issue(&fx).await;

    for variant in [
        format!(" {code}"),
        format!("{code} "),
        code[..5].to_owned(),
        String::new(),
    ] {
        let result = fx.verifier().execute(attempt(ADMIN_EMAIL, &variant)).await;
        assert!(
            matches!(result, Err(AuthServiceError::CodeMismatch)),
            "expected CodeMismatch for {variant:?}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_only_accept_latest_code_after_reissue() {
    let fx = Fixture::new();
    let first = issue(&fx).await;
    let second = loop {
        // Two draws may collide; keep issuing until they differ.
        let next = issue(&fx).await;
        if next != first {
            break next;
        }
    };

    let stale = fx.verifier().execute(attempt(ADMIN_EMAIL, &first)).await;
    assert!(
        matches!(stale, Err(AuthServiceError::CodeMismatch)),
        "superseded code must fail, got {stale:?}"
    );

    fx.verifier().execute(attempt(ADMIN_EMAIL, &second)).await.unwrap();
}

#[tokio::test]
async fn should_not_let_one_identity_consume_another_identity_code() {
    let fx = Fixture::new();
    let code = issue(&fx).await;
    let other_code = wrong(&code);
    let other = VerificationRecord::issue(
        "other@example.com".to_owned(),
        other_code.clone(),
        fx.clock.now(),
    );
    fx.store.set(&other).await.unwrap();

    let result = fx.verifier().execute(attempt("other@example.com", &code)).await;
    assert!(matches!(result, Err(AuthServiceError::CodeMismatch)));

    fx.verifier().execute(attempt("other@example.com", &other_code)).await.unwrap();
    assert!(fx.store.get(ADMIN_EMAIL).await.unwrap().is_some(), "admin code untouched");
    fx.verifier().execute(attempt(ADMIN_EMAIL, &code)).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_let_only_one_concurrent_verification_succeed() {
    let fx = Fixture::new();
    let code = issue(&fx).await;
    let verifier = Arc::new(fx.verifier());

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..16 {
        let verifier = Arc::clone(&verifier);
        let code = code.clone();
        tasks.spawn(async move { verifier.execute(attempt(ADMIN_EMAIL, &code)).await });
    }

    let mut successes = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => successes += 1,
            Err(AuthServiceError::CodeNotFound) => {}
            Err(other) => panic!("unexpected outcome: {other:?}"),
        }
    }
    assert_eq!(successes, 1, "a code must be consumed at most once");
    assert_eq!(fx.locks.active(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_verify_different_identities_independently() {
    let fx = Fixture::new();
    let now = fx.clock.now();
    for i in 0..10 {
        let record =
            VerificationRecord::issue(format!("user{i}@example.com"), format!("10000{i}"), now);
        fx.store.set(&record).await.unwrap();
    }
    let verifier = Arc::new(fx.verifier());

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..10 {
        let verifier = Arc::clone(&verifier);
        tasks.spawn(async move {
            verifier
                .execute(attempt(&format!("user{i}@example.com"), &format!("10000{i}")))
                .await
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().unwrap();
    }
    for i in 0..10 {
        assert!(fx.store.get(&format!("user{i}@example.com")).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn should_consume_code_once_across_processes_sharing_a_store() {
    let store = YieldingStore::default();
    let clock = MockClock::new();
    store
        .set(&VerificationRecord::issue(
            ADMIN_EMAIL.to_owned(),
            "482913".to_owned(),
            clock.now(),
        ))
        .await
        .unwrap();

    // Separate lock maps: nothing in-process serializes the two verifiers.
    let replica = |store: &YieldingStore| VerifyCodeUseCase {
        codes: store.clone(),
        clock: clock.clone(),
        locks: IdentityLocks::new(),
    };
    let (a, b) = (replica(&store), replica(&store));

    let (first, second) = tokio::join!(
        a.execute(attempt(ADMIN_EMAIL, "482913")),
        b.execute(attempt(ADMIN_EMAIL, "482913")),
    );

    let outcomes = [first, second];
    assert_eq!(
        outcomes.iter().filter(|r| r.is_ok()).count(),
        1,
        "a code must be consumed at most once, got {outcomes:?}"
    );
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(AuthServiceError::CodeNotFound))),
        "the losing verifier reports the code as gone, got {outcomes:?}"
    );
    assert!(store.get(ADMIN_EMAIL).await.unwrap().is_none());
}
