use std::sync::Arc;

use chrono::Duration;

use portfolio_auth::domain::repository::{Clock, CodeStore};
use portfolio_auth::domain::types::CODE_LEN;
use portfolio_auth::error::AuthServiceError;
use portfolio_auth::usecase::code::RequestCodeInput;

use crate::helpers::{ADMIN_EMAIL, FailingMailer, Fixture, StalledMailer};

fn input(email: &str) -> RequestCodeInput {
    RequestCodeInput {
        email: email.to_owned(),
    }
}

#[tokio::test]
async fn should_issue_and_mail_code_for_admin() {
    let fx = Fixture::new();

    let out = fx.issuer().execute(input(ADMIN_EMAIL)).await.unwrap();

    let record = fx.store.get(ADMIN_EMAIL).await.unwrap().expect("record stored");
    assert_eq!(record.identity, ADMIN_EMAIL);
    assert_eq!(record.code.len(), CODE_LEN);
    assert_eq!(record.expires_at, out.expires_at);
    assert_eq!(out.expires_at, fx.clock.now() + Duration::minutes(5));

    let sent = fx.mailer.sent();
    assert_eq!(sent.len(), 1, "expected exactly one email");
    assert_eq!(sent[0].to, ADMIN_EMAIL);
    assert_eq!(sent[0].subject, "Admin Panel Login Verification Code");
    assert!(sent[0].html.contains("expire in 5 minutes"));
    assert_eq!(fx.mailer.last_code(), record.code);
}

#[tokio::test]
async fn should_reject_every_other_identity_without_storing() {
    let fx = Fixture::new();

    for email in [
        "someone@example.com",
        "ADMIN@example.com",
        " admin@example.com",
        "admin@example.com ",
        "",
    ] {
        let result = fx.issuer().execute(input(email)).await;
        assert!(
            matches!(result, Err(AuthServiceError::UnauthorizedIdentity)),
            "expected UnauthorizedIdentity for {email:?}, got {result:?}"
        );
        assert!(fx.store.get(email).await.unwrap().is_none());
    }

    assert!(fx.store.get(ADMIN_EMAIL).await.unwrap().is_none());
    assert!(fx.mailer.sent().is_empty(), "no mail may be sent");
}

#[tokio::test]
async fn should_overwrite_previous_code_on_reissue() {
    let fx = Fixture::new();

    fx.issuer().execute(input(ADMIN_EMAIL)).await.unwrap();
    fx.clock.advance(Duration::seconds(30));
    fx.issuer().execute(input(ADMIN_EMAIL)).await.unwrap();
    let second = fx.mailer.last_code();

    let record = fx.store.get(ADMIN_EMAIL).await.unwrap().unwrap();
    assert_eq!(record.code, second);
    assert_eq!(fx.mailer.sent().len(), 2);
    // Re-issuing also restarts the TTL.
    assert_eq!(record.expires_at, fx.clock.now() + Duration::minutes(5));
}

#[tokio::test]
async fn should_keep_record_when_delivery_fails() {
    let fx = Fixture::new();

    let result = fx.issuer_with(FailingMailer).execute(input(ADMIN_EMAIL)).await;

    assert!(
        matches!(result, Err(AuthServiceError::DeliveryFailed(_))),
        "expected DeliveryFailed, got {result:?}"
    );
    assert!(
        fx.store.get(ADMIN_EMAIL).await.unwrap().is_some(),
        "code stays issued even though it was not delivered"
    );
}

#[tokio::test(start_paused = true)]
async fn should_report_delivery_failed_when_mail_times_out() {
    let fx = Fixture::new();

    let result = fx.issuer_with(StalledMailer).execute(input(ADMIN_EMAIL)).await;

    match result {
        Err(AuthServiceError::DeliveryFailed(e)) => {
            assert!(e.to_string().contains("timed out"), "unexpected cause: {e}");
        }
        other => panic!("expected DeliveryFailed, got {other:?}"),
    }
    assert!(fx.store.get(ADMIN_EMAIL).await.unwrap().is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_leave_one_of_the_mailed_codes_after_concurrent_requests() {
    let fx = Fixture::new();
    let issuer = Arc::new(fx.issuer());

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let issuer = Arc::clone(&issuer);
        tasks.spawn(async move { issuer.execute(input(ADMIN_EMAIL)).await });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().unwrap();
    }

    // Last write wins: exactly one record, holding one of the mailed codes.
    let record = fx.store.get(ADMIN_EMAIL).await.unwrap().unwrap();
    let mailed: Vec<String> = fx
        .mailer
        .sent()
        .into_iter()
        .map(|m| {
            let end = m.html.find("</h1>").unwrap();
            m.html[end - 6..end].to_owned()
        })
        .collect();
    assert_eq!(mailed.len(), 8);
    assert!(mailed.contains(&record.code));
    assert_eq!(fx.locks.active(), 0, "all identity slots released");
}
