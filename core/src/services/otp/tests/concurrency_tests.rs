//! Per-key serialization tests

use std::sync::Arc;

use super::mocks::*;
use crate::domain::entities::otp_record::OtpTransport;
use crate::domain::value_objects::otp_context::OtpContext;
use crate::errors::{DomainError, OtpError};
use crate::repositories::otp::r#trait::OtpRepository;
use crate::services::otp::{SendCodeRequest, SendOverrides, VerifyOverrides};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_sends_on_one_key_issue_one_code() {
    let h = harness(production_config());

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let service = Arc::clone(&h.service);
            tokio::spawn(async move {
                service
                    .send(
                        SendCodeRequest::mobile("+15550001111", OtpContext::Register),
                        SendOverrides::default(),
                    )
                    .await
            })
        })
        .collect();

    let mut issued = 0;
    let mut throttled = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => issued += 1,
            Err(DomainError::Otp(OtpError::ResendTooSoon { .. })) => throttled += 1,
            Err(other) => panic!("Unexpected error: {:?}", other),
        }
    }

    assert_eq!(issued, 1);
    assert_eq!(throttled, 9);
    assert_eq!(h.dispatcher.wait_for(1).await.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_mismatches_count_every_retry() {
    let h = harness(development_config());
    h.service
        .send(
            SendCodeRequest::email("user@x.com", OtpContext::Register, "User"),
            SendOverrides::default(),
        )
        .await
        .unwrap();
    let overrides = VerifyOverrides {
        max_retries: Some(20),
        ..Default::default()
    };

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&h.service);
            tokio::spawn(async move {
                service
                    .verify("424242", "user@x.com", OtpTransport::Email, overrides)
                    .await
            })
        })
        .collect();

    let mut seen: Vec<u32> = Vec::new();
    for handle in handles {
        seen.push(handle.await.unwrap().unwrap().retries);
    }
    seen.sort_unstable();

    assert_eq!(seen, (1..=8).collect::<Vec<u32>>());
    let record = h
        .repository
        .find(OtpTransport::Email, "user@x.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.retries, 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_mismatches_block_exactly_at_cap() {
    let h = harness(development_config());
    h.service
        .send(
            SendCodeRequest::email("user@x.com", OtpContext::Register, "User"),
            SendOverrides::default(),
        )
        .await
        .unwrap();
    let overrides = VerifyOverrides {
        max_retries: Some(3),
        ..Default::default()
    };

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let service = Arc::clone(&h.service);
            tokio::spawn(async move {
                service
                    .verify("424242", "user@x.com", OtpTransport::Email, overrides)
                    .await
            })
        })
        .collect();

    let mut mismatches = 0;
    let mut blocked = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(result) => {
                assert!(!result.status);
                mismatches += 1;
            }
            Err(DomainError::Otp(OtpError::Blocked { .. })) => blocked += 1,
            Err(other) => panic!("Unexpected error: {:?}", other),
        }
    }

    assert_eq!(mismatches, 3);
    assert_eq!(blocked, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_different_keys_proceed_independently() {
    let h = harness(development_config());

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let service = Arc::clone(&h.service);
            tokio::spawn(async move {
                service
                    .send(
                        SendCodeRequest::email(
                            format!("user{}@x.com", i),
                            OtpContext::Register,
                            "User",
                        ),
                        SendOverrides::default(),
                    )
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
    assert_eq!(h.repository.len().await, 5);
}
