//! End-to-end OTP flows through the public API

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use otp_core::{
        AccountDirectory, AccountProfile, DomainResult, Gated, InMemoryOtpRepository,
        NotificationDispatcher, NotificationPayload, OtpError, OtpService, OtpServiceConfig,
        OtpTransport, RegistrationCodes, SendCodeRequest, SendOverrides, VerificationOrchestrator,
        OtpContext, VerifyOverrides,
    };
    use otp_shared::config::{EnvironmentPolicy, OtpConfig};

    // Captures delivered codes so the test can act like the recipient
    struct Inbox {
        messages: Mutex<Vec<(String, String)>>,
    }

    impl Inbox {
        fn new() -> Self {
            Self {
                messages: Mutex::new(Vec::new()),
            }
        }

        async fn latest_code(&self, target: &str) -> Option<String> {
            for _ in 0..100 {
                let found = self
                    .messages
                    .lock()
                    .unwrap()
                    .iter()
                    .rev()
                    .find(|(to, _)| to == target)
                    .map(|(_, code)| code.clone());
                if found.is_some() {
                    return found;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            None
        }
    }

    #[async_trait]
    impl NotificationDispatcher for Inbox {
        async fn send_message(
            &self,
            _transport: OtpTransport,
            target: &str,
            payload: &NotificationPayload,
        ) -> Result<String, String> {
            let code = match payload {
                NotificationPayload::Email { data, .. } => data.code.clone(),
                NotificationPayload::Sms { text } => text
                    .split_whitespace()
                    .find(|word| word.chars().all(|c| c.is_ascii_digit()))
                    .unwrap_or_default()
                    .to_string(),
            };
            self.messages
                .lock()
                .unwrap()
                .push((target.to_string(), code));
            Ok(format!("inbox-{}", target))
        }
    }

    struct NoAccounts;

    #[async_trait]
    impl AccountDirectory for NoAccounts {
        async fn find_account(
            &self,
            _transport: OtpTransport,
            _target: &str,
        ) -> DomainResult<Option<AccountProfile>> {
            Ok(None)
        }
    }

    fn production_service() -> (Arc<OtpService<InMemoryOtpRepository, Inbox>>, Arc<Inbox>) {
        let inbox = Arc::new(Inbox::new());
        let config = OtpServiceConfig::new(&OtpConfig::default(), &EnvironmentPolicy::production());
        let service = OtpService::new(
            Arc::new(InMemoryOtpRepository::new()),
            Arc::clone(&inbox),
            config,
        );
        (Arc::new(service), inbox)
    }

    #[tokio::test]
    async fn test_production_round_trip_with_delivered_code() {
        let (service, inbox) = production_service();

        service
            .send(
                SendCodeRequest::email("Jane@X.com", OtpContext::Register, "Jane"),
                SendOverrides::default(),
            )
            .await
            .unwrap();
        let code = inbox.latest_code("jane@x.com").await.unwrap();
        assert_eq!(code.len(), 6);

        let result = service
            .verify(&code, "jane@x.com", OtpTransport::Email, VerifyOverrides::default())
            .await
            .unwrap();
        assert!(result.status);

        // Proven code lets the next send through immediately
        let again = service
            .send(
                SendCodeRequest::email("jane@x.com", OtpContext::Register, "Jane"),
                SendOverrides::default(),
            )
            .await
            .unwrap();
        assert_eq!(again.attempt, 1);
    }

    #[tokio::test]
    async fn test_registration_with_both_channels() {
        let (service, inbox) = production_service();
        let orchestrator = VerificationOrchestrator::new(Arc::clone(&service), Arc::new(NoAccounts));

        orchestrator
            .send_registration_code("a@x.com", OtpTransport::Email)
            .await
            .unwrap();
        orchestrator
            .send_registration_code("+15550001111", OtpTransport::Mobile)
            .await
            .unwrap();
        let email_code = inbox.latest_code("a@x.com").await.unwrap();
        let mobile_code = inbox.latest_code("+15550001111").await.unwrap();

        let codes = RegistrationCodes::email_only("a@x.com", email_code)
            .with_mobile("+15550001111", mobile_code);
        let outcome = orchestrator
            .register_with(&codes, |_| async { Ok(42u64) })
            .await
            .unwrap();

        assert_eq!(outcome, Gated::Committed(42));
    }

    #[tokio::test]
    async fn test_wrong_codes_until_blocked() {
        let (service, _inbox) = production_service();
        service
            .send(
                SendCodeRequest::mobile("+15550001111", OtpContext::ResetPassword),
                SendOverrides::default(),
            )
            .await
            .unwrap();

        for _ in 0..5 {
            let result = service
                .verify("not-a-code", "+15550001111", OtpTransport::Mobile, VerifyOverrides::default())
                .await
                .unwrap();
            assert!(!result.status);
        }

        let error = service
            .verify("not-a-code", "+15550001111", OtpTransport::Mobile, VerifyOverrides::default())
            .await
            .unwrap_err();
        assert_eq!(error.as_otp().map(OtpError::code), Some("OTP_BLOCKED"));
    }
}
