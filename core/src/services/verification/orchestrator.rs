//! Multi-channel verification orchestrator

use std::future::Future;
use std::sync::Arc;

use otp_shared::utils::{is_valid_email, is_valid_mobile, mask_target};

use crate::domain::entities::otp_record::{OtpRecord, OtpTransport};
use crate::domain::value_objects::otp_context::OtpContext;
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::otp::r#trait::OtpRepository;
use crate::services::otp::{
    NotificationDispatcher, OtpService, SendCodeRequest, SendCodeResult, SendOverrides,
    VerifyCodeResult, VerifyOverrides,
};

use super::directory::{AccountDirectory, AccountProfile};
use super::types::{Gated, OrchestrationResult, RegistrationCodes, ResetCodesSent, ResetVerification};

/// Name used in registration emails, before any account exists
const REGISTRATION_USERNAME: &str = "User";

/// Registration and password reset flows over the OTP engine
///
/// Verifications across channels run concurrently and always run to
/// completion; their retry and block effects persist even when the overall
/// decision is a failure.
pub struct VerificationOrchestrator<R, D, A>
where
    R: OtpRepository,
    D: NotificationDispatcher + 'static,
    A: AccountDirectory,
{
    otp: Arc<OtpService<R, D>>,
    accounts: Arc<A>,
}

impl<R, D, A> VerificationOrchestrator<R, D, A>
where
    R: OtpRepository,
    D: NotificationDispatcher + 'static,
    A: AccountDirectory,
{
    pub fn new(otp: Arc<OtpService<R, D>>, accounts: Arc<A>) -> Self {
        Self { otp, accounts }
    }

    pub fn otp(&self) -> &OtpService<R, D> {
        &self.otp
    }

    /// Send a registration code to a target not yet bound to an account
    ///
    /// # Returns
    ///
    /// * `Ok(SendCodeResult)` - The code was issued
    /// * `Err(DomainError::ValidationErr)` - Malformed email or mobile
    /// * `Err(DomainError::BusinessRule)` - An account already uses the target
    /// * `Err(DomainError::Otp)` - Issuance refused by the OTP engine
    pub async fn send_registration_code(
        &self,
        target: &str,
        transport: OtpTransport,
    ) -> DomainResult<SendCodeResult> {
        let target = validate_target(target, transport)?;

        if self.accounts.find_account(transport, &target).await?.is_some() {
            let message = match transport {
                OtpTransport::Email => "Email already in use",
                OtpTransport::Mobile => "Mobile already in use",
            };
            return Err(DomainError::BusinessRule {
                message: message.to_string(),
            });
        }

        let request = match transport {
            OtpTransport::Email => {
                SendCodeRequest::email(target, OtpContext::Register, REGISTRATION_USERNAME)
            }
            OtpTransport::Mobile => SendCodeRequest::mobile(target, OtpContext::Register),
        };
        self.otp.send(request, SendOverrides::default()).await
    }

    /// Send password reset codes to the account's email and/or mobile
    ///
    /// The account is looked up by email first, then by mobile. The mobile
    /// code is sent before the email code.
    pub async fn send_password_reset_codes(
        &self,
        email: Option<&str>,
        mobile: Option<&str>,
    ) -> DomainResult<ResetCodesSent> {
        let email = present(email);
        let mobile = present(mobile);
        if email.is_none() && mobile.is_none() {
            return Err(ValidationError::RequiredField {
                field: "email or mobile".to_string(),
            }
            .into());
        }

        let account = self.resolve_account(email, mobile).await?;

        let mut sent = ResetCodesSent {
            email: None,
            mobile: None,
        };
        if let Some(mobile) = mobile {
            let request = SendCodeRequest::mobile(mobile, OtpContext::ResetPassword);
            sent.mobile = Some(self.otp.send(request, SendOverrides::default()).await?);
        }
        if let Some(email) = email {
            let request =
                SendCodeRequest::email(email, OtpContext::ResetPassword, account.display_name);
            sent.email = Some(self.otp.send(request, SendOverrides::default()).await?);
        }

        Ok(sent)
    }

    /// Verify the registration codes of every submitted channel in parallel
    ///
    /// Both checks settle before any error propagates. An empty mobile number
    /// is treated as absent; a mobile number without a code is checked
    /// against an empty code.
    pub async fn verify_registration(
        &self,
        codes: &RegistrationCodes,
    ) -> DomainResult<OrchestrationResult> {
        let email_check = self.otp.verify(
            &codes.email_code,
            &codes.email,
            OtpTransport::Email,
            VerifyOverrides::default(),
        );
        let mobile_check = self.check(
            codes.mobile_code.as_deref().unwrap_or(""),
            present(codes.mobile.as_deref()),
            OtpTransport::Mobile,
        );

        let (email, mobile) = tokio::join!(email_check, mobile_check);
        let email = email?;
        let mobile = mobile?;

        let succeeded = email.status && mobile.as_ref().map_or(true, |m| m.status);
        log_decision("registration", succeeded, &codes.email);

        Ok(OrchestrationResult {
            succeeded,
            email,
            mobile,
        })
    }

    /// Verify one reset code against every provided channel in parallel
    ///
    /// # Returns
    ///
    /// * `Ok(ResetVerification)` - Every channel settled; `succeeded` gates the reset
    /// * `Err(DomainError::Validation)` - Neither email nor mobile was given
    /// * `Err(DomainError::NotFound)` - No account uses the email or mobile
    /// * `Err(DomainError::Otp)` - A channel could not be verified
    pub async fn verify_password_reset(
        &self,
        code: &str,
        email: Option<&str>,
        mobile: Option<&str>,
    ) -> DomainResult<ResetVerification> {
        let email = present(email);
        let mobile = present(mobile);
        if email.is_none() && mobile.is_none() {
            return Err(DomainError::Validation {
                message: "Invalid email or mobile".to_string(),
            });
        }
        self.resolve_account(email, mobile).await?;

        let (email_result, mobile_result) = tokio::join!(
            self.check(code, email, OtpTransport::Email),
            self.check(code, mobile, OtpTransport::Mobile),
        );
        let email_result = email_result?;
        let mobile_result = mobile_result?;

        let succeeded = [&email_result, &mobile_result]
            .into_iter()
            .flatten()
            .all(|result| result.status);
        log_decision(
            "password_reset",
            succeeded,
            email.or(mobile).unwrap_or_default(),
        );

        Ok(ResetVerification {
            succeeded,
            email: email_result,
            mobile: mobile_result,
        })
    }

    /// Verify registration codes and run `commit` only if every channel passed
    pub async fn register_with<T, F, Fut>(
        &self,
        codes: &RegistrationCodes,
        commit: F,
    ) -> DomainResult<Gated<OrchestrationResult, T>>
    where
        F: FnOnce(OrchestrationResult) -> Fut,
        Fut: Future<Output = DomainResult<T>>,
    {
        let result = self.verify_registration(codes).await?;
        if !result.succeeded {
            return Ok(Gated::Rejected(result));
        }
        Ok(Gated::Committed(commit(result).await?))
    }

    /// Verify a reset code and run `commit` only if every channel passed
    pub async fn reset_password_with<T, F, Fut>(
        &self,
        code: &str,
        email: Option<&str>,
        mobile: Option<&str>,
        commit: F,
    ) -> DomainResult<Gated<ResetVerification, T>>
    where
        F: FnOnce(ResetVerification) -> Fut,
        Fut: Future<Output = DomainResult<T>>,
    {
        let result = self.verify_password_reset(code, email, mobile).await?;
        if !result.succeeded {
            return Ok(Gated::Rejected(result));
        }
        Ok(Gated::Committed(commit(result).await?))
    }

    /// Account owning `email`, or failing that `mobile`
    async fn resolve_account(
        &self,
        email: Option<&str>,
        mobile: Option<&str>,
    ) -> DomainResult<AccountProfile> {
        let mut account = None;
        if let Some(email) = email {
            let email = OtpRecord::normalize_target(OtpTransport::Email, email);
            account = self.accounts.find_account(OtpTransport::Email, &email).await?;
        }
        if account.is_none() {
            if let Some(mobile) = mobile {
                let mobile = OtpRecord::normalize_target(OtpTransport::Mobile, mobile);
                account = self.accounts.find_account(OtpTransport::Mobile, &mobile).await?;
            }
        }
        account.ok_or_else(|| DomainError::NotFound {
            resource: "Account".to_string(),
        })
    }

    async fn check(
        &self,
        code: &str,
        target: Option<&str>,
        transport: OtpTransport,
    ) -> DomainResult<Option<VerifyCodeResult>> {
        match target {
            Some(target) => self
                .otp
                .verify(code, target, transport, VerifyOverrides::default())
                .await
                .map(Some),
            None => Ok(None),
        }
    }
}

fn validate_target(target: &str, transport: OtpTransport) -> Result<String, ValidationError> {
    match transport {
        OtpTransport::Email => {
            let email = target.trim();
            if !is_valid_email(email) {
                return Err(ValidationError::InvalidEmail {
                    email: email.to_string(),
                });
            }
            Ok(OtpRecord::normalize_target(transport, email))
        }
        OtpTransport::Mobile => {
            if !is_valid_mobile(target) {
                return Err(ValidationError::InvalidMobile {
                    mobile: target.to_string(),
                });
            }
            Ok(OtpRecord::normalize_target(transport, target))
        }
    }
}

/// Channel value, or `None` when it is missing or blank
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn log_decision(flow: &str, succeeded: bool, target: &str) {
    if succeeded {
        tracing::info!(
            flow = flow,
            recipient = %mask_target(target),
            event = "verification_succeeded",
            "Every channel verified"
        );
    } else {
        tracing::warn!(
            flow = flow,
            recipient = %mask_target(target),
            event = "verification_rejected",
            "At least one channel failed verification"
        );
    }
}
