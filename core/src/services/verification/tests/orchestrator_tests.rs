//! Orchestrator tests

use std::sync::atomic::{AtomicUsize, Ordering};

use super::mocks::*;
use crate::domain::entities::otp_record::OtpTransport;
use crate::domain::value_objects::otp_context::OtpContext;
use crate::errors::{DomainError, OtpError, ValidationError};
use crate::repositories::otp::r#trait::OtpRepository;
use crate::services::otp::{SendCodeRequest, SendOverrides};
use crate::services::verification::{Gated, RegistrationCodes};

#[tokio::test]
async fn test_registration_email_only_succeeds() {
    let h = harness(MockAccountDirectory::new());
    h.orchestrator
        .send_registration_code("a@x.com", OtpTransport::Email)
        .await
        .unwrap();

    let result = h
        .orchestrator
        .verify_registration(&RegistrationCodes::email_only("a@x.com", "000000"))
        .await
        .unwrap();

    assert!(result.succeeded);
    assert!(result.email.status);
    assert!(result.mobile.is_none());
}

#[tokio::test]
async fn test_registration_partial_failure_rejects_both() {
    let h = harness(MockAccountDirectory::new());
    h.orchestrator
        .send_registration_code("a@x.com", OtpTransport::Email)
        .await
        .unwrap();
    h.orchestrator
        .send_registration_code("+1555", OtpTransport::Mobile)
        .await
        .unwrap();

    let codes = RegistrationCodes::email_only("a@x.com", "000000").with_mobile("+1555", "wrong");
    let result = h.orchestrator.verify_registration(&codes).await.unwrap();

    assert!(!result.succeeded);
    assert!(result.email.status);
    let mobile = result.mobile.unwrap();
    assert!(!mobile.status);
    assert_eq!(mobile.retries, 1);

    // Both channels ran to completion
    let email = h
        .repository
        .find(OtpTransport::Email, "a@x.com")
        .await
        .unwrap()
        .unwrap();
    assert!(email.last_code_verified);
}

#[tokio::test]
async fn test_registration_error_propagates_after_both_settle() {
    let h = harness(MockAccountDirectory::new());
    h.orchestrator
        .send_registration_code("a@x.com", OtpTransport::Email)
        .await
        .unwrap();

    // No code was ever sent to the mobile number
    let codes = RegistrationCodes::email_only("a@x.com", "000000").with_mobile("+15550001111", "000000");
    let result = h.orchestrator.verify_registration(&codes).await;

    match result {
        Err(DomainError::Otp(OtpError::NotFound { target })) => assert_eq!(target, "+15550001111"),
        other => panic!("Expected not found, got {:?}", other),
    }
    let email = h
        .repository
        .find(OtpTransport::Email, "a@x.com")
        .await
        .unwrap()
        .unwrap();
    assert!(email.last_code_verified);
}

#[tokio::test]
async fn test_formatted_targets_share_one_record() {
    let h = harness(MockAccountDirectory::new());
    h.orchestrator
        .otp()
        .send(
            SendCodeRequest::mobile("+1 555-0100", OtpContext::Register),
            SendOverrides::default(),
        )
        .await
        .unwrap();
    h.orchestrator
        .send_registration_code(" A@x.com ", OtpTransport::Email)
        .await
        .unwrap();

    let codes = RegistrationCodes::email_only("a@X.com  ", "000000")
        .with_mobile("+1 (555) 0100", "000000");
    let result = h.orchestrator.verify_registration(&codes).await.unwrap();

    assert!(result.succeeded);
    assert!(result.mobile.unwrap().status);
    assert_eq!(h.repository.len().await, 2);
    let mobile = h
        .repository
        .find(OtpTransport::Mobile, "+15550100")
        .await
        .unwrap()
        .unwrap();
    assert!(mobile.last_code_verified);
}

#[tokio::test]
async fn test_empty_mobile_is_treated_as_absent() {
    let h = harness(MockAccountDirectory::new());
    h.orchestrator
        .send_registration_code("a@x.com", OtpTransport::Email)
        .await
        .unwrap();

    let codes = RegistrationCodes {
        email: "a@x.com".to_string(),
        email_code: "000000".to_string(),
        mobile: Some(String::new()),
        mobile_code: None,
    };
    let result = h.orchestrator.verify_registration(&codes).await.unwrap();

    assert!(result.succeeded);
    assert!(result.mobile.is_none());
}

#[tokio::test]
async fn test_missing_mobile_code_counts_as_mismatch() {
    let h = harness(MockAccountDirectory::new());
    h.orchestrator
        .send_registration_code("a@x.com", OtpTransport::Email)
        .await
        .unwrap();
    h.orchestrator
        .send_registration_code("+15550001111", OtpTransport::Mobile)
        .await
        .unwrap();

    let codes = RegistrationCodes {
        email: "a@x.com".to_string(),
        email_code: "000000".to_string(),
        mobile: Some("+15550001111".to_string()),
        mobile_code: None,
    };
    let result = h.orchestrator.verify_registration(&codes).await.unwrap();

    assert!(!result.succeeded);
    assert!(!result.mobile.unwrap().status);
}

#[tokio::test]
async fn test_send_registration_code_validates_target() {
    let h = harness(MockAccountDirectory::new());

    let email = h
        .orchestrator
        .send_registration_code("not-an-email", OtpTransport::Email)
        .await;
    assert!(matches!(
        email,
        Err(DomainError::ValidationErr(ValidationError::InvalidEmail { .. }))
    ));

    let mobile = h
        .orchestrator
        .send_registration_code("5550001111", OtpTransport::Mobile)
        .await;
    assert!(matches!(
        mobile,
        Err(DomainError::ValidationErr(ValidationError::InvalidMobile { .. }))
    ));
    assert!(h.repository.is_empty().await);
}

#[tokio::test]
async fn test_send_registration_code_rejects_existing_account() {
    let directory = MockAccountDirectory::new()
        .with_account(OtpTransport::Email, "taken@x.com", "Taken")
        .with_account(OtpTransport::Mobile, "+15550001111", "Taken");
    let h = harness(directory);

    match h
        .orchestrator
        .send_registration_code("Taken@x.com", OtpTransport::Email)
        .await
    {
        Err(DomainError::BusinessRule { message }) => assert_eq!(message, "Email already in use"),
        other => panic!("Expected business rule error, got {:?}", other),
    }
    match h
        .orchestrator
        .send_registration_code("+1 555 000 1111", OtpTransport::Mobile)
        .await
    {
        Err(DomainError::BusinessRule { message }) => assert_eq!(message, "Mobile already in use"),
        other => panic!("Expected business rule error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_password_reset_codes_require_account() {
    let h = harness(MockAccountDirectory::new());

    let result = h
        .orchestrator
        .send_password_reset_codes(Some("ghost@x.com"), None)
        .await;

    match result {
        Err(DomainError::NotFound { resource }) => assert_eq!(resource, "Account"),
        other => panic!("Expected not found, got {:?}", other),
    }
    assert!(h.repository.is_empty().await);
}

#[tokio::test]
async fn test_password_reset_codes_require_a_channel() {
    let h = harness(MockAccountDirectory::new());

    let result = h.orchestrator.send_password_reset_codes(None, Some("  ")).await;

    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::RequiredField { .. }))
    ));
}

#[tokio::test]
async fn test_password_reset_codes_sent_to_both_channels() {
    let directory = MockAccountDirectory::new()
        .with_account(OtpTransport::Mobile, "+15550001111", "Jane");
    let h = harness(directory);

    // Unknown email, resolved through the mobile number
    let sent = h
        .orchestrator
        .send_password_reset_codes(Some("jane@x.com"), Some("+15550001111"))
        .await
        .unwrap();

    assert!(sent.email.is_some());
    assert!(sent.mobile.is_some());
    assert_eq!(h.repository.len().await, 2);
}

#[tokio::test]
async fn test_password_reset_verification() {
    let directory = MockAccountDirectory::new()
        .with_account(OtpTransport::Email, "jane@x.com", "Jane");
    let h = harness(directory);
    h.orchestrator
        .send_password_reset_codes(Some("jane@x.com"), None)
        .await
        .unwrap();

    let result = h
        .orchestrator
        .verify_password_reset("000000", Some("jane@x.com"), None)
        .await
        .unwrap();

    assert!(result.succeeded);
    assert!(result.email.unwrap().status);
    assert!(result.mobile.is_none());
}

#[tokio::test]
async fn test_password_reset_verification_requires_a_channel() {
    let h = harness(MockAccountDirectory::new());

    let result = h.orchestrator.verify_password_reset("000000", None, None).await;

    match result {
        Err(DomainError::Validation { message }) => assert_eq!(message, "Invalid email or mobile"),
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_password_reset_verification_requires_account() {
    let h = harness(MockAccountDirectory::new());
    h.orchestrator
        .send_registration_code("ghost@x.com", OtpTransport::Email)
        .await
        .unwrap();
    let commits = AtomicUsize::new(0);
    let counter = &commits;

    let result = h
        .orchestrator
        .reset_password_with("000000", Some("ghost@x.com"), Some(""), |_| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await;

    match result {
        Err(DomainError::NotFound { resource }) => assert_eq!(resource, "Account"),
        other => panic!("Expected not found, got {:?}", other),
    }
    assert_eq!(commits.load(Ordering::SeqCst), 0);

    // The code was left untouched
    let record = h
        .repository
        .find(OtpTransport::Email, "ghost@x.com")
        .await
        .unwrap()
        .unwrap();
    assert!(!record.last_code_verified);
    assert_eq!(record.retries, 0);
}

#[tokio::test]
async fn test_register_with_commits_only_on_success() {
    let h = harness(MockAccountDirectory::new());
    h.orchestrator
        .send_registration_code("a@x.com", OtpTransport::Email)
        .await
        .unwrap();
    h.orchestrator
        .send_registration_code("+1555", OtpTransport::Mobile)
        .await
        .unwrap();
    let commits = AtomicUsize::new(0);
    let counter = &commits;

    let rejected = h
        .orchestrator
        .register_with(
            &RegistrationCodes::email_only("a@x.com", "000000").with_mobile("+1555", "wrong"),
            |_| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok("account-1")
            },
        )
        .await
        .unwrap();
    match rejected {
        Gated::Rejected(result) => assert!(!result.succeeded),
        Gated::Committed(_) => panic!("Account created despite a failed channel"),
    }
    assert_eq!(commits.load(Ordering::SeqCst), 0);

    let committed = h
        .orchestrator
        .register_with(
            &RegistrationCodes::email_only("a@x.com", "000000").with_mobile("+1555", "000000"),
            |result| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                assert!(result.succeeded);
                Ok("account-1")
            },
        )
        .await
        .unwrap();
    assert_eq!(committed, Gated::Committed("account-1"));
    assert_eq!(commits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_reset_password_with_propagates_commit_error() {
    let directory = MockAccountDirectory::new()
        .with_account(OtpTransport::Email, "jane@x.com", "Jane");
    let h = harness(directory);
    h.orchestrator
        .send_password_reset_codes(Some("jane@x.com"), None)
        .await
        .unwrap();

    let result: Result<Gated<_, ()>, _> = h
        .orchestrator
        .reset_password_with("000000", Some("jane@x.com"), None, |_| async {
            Err(DomainError::Internal {
                message: "password store unavailable".to_string(),
            })
        })
        .await;

    assert!(matches!(result, Err(DomainError::Internal { .. })));
}
