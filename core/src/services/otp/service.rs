//! OTP issuance and verification

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use std::sync::Arc;

use otp_shared::utils::{format_duration_ms, mask_target, TimeUnit};

use crate::domain::entities::otp_record::{OtpRecord, OtpRecordPatch, OtpTransport};
use crate::errors::{DomainError, DomainResult, OtpError};
use crate::repositories::otp::r#trait::OtpRepository;

use super::config::{OtpServiceConfig, SendOverrides, SendPolicy, VerifyOverrides};
use super::dispatcher::NotificationDispatcher;
use super::generator::CodeGenerator;
use super::key_lock::KeyedLocks;
use super::templates::{self, NotificationPayload};
use super::types::{SendCodeRequest, SendCodeResult, VerifyCodeResult};

/// Issues, throttles and verifies one-time codes per (transport, target)
///
/// Every `send` and `verify` holds the key's lock for its whole
/// read-decide-write sequence. Delivery runs on a detached task.
pub struct OtpService<R: OtpRepository, D: NotificationDispatcher + 'static> {
    /// Record store
    repository: Arc<R>,
    /// Message delivery
    dispatcher: Arc<D>,
    /// Service configuration
    config: OtpServiceConfig,
    generator: CodeGenerator,
    locks: KeyedLocks<(OtpTransport, String)>,
}

impl<R: OtpRepository, D: NotificationDispatcher + 'static> OtpService<R, D> {
    /// Create a new OTP service
    ///
    /// # Arguments
    ///
    /// * `repository` - OTP record store
    /// * `dispatcher` - Delivery of rendered messages
    /// * `config` - Defaults and the production-app flag
    pub fn new(repository: Arc<R>, dispatcher: Arc<D>, config: OtpServiceConfig) -> Self {
        let generator = CodeGenerator::new(config.production_app, config.default_code.clone());
        Self {
            repository,
            dispatcher,
            config,
            generator,
            locks: KeyedLocks::new(),
        }
    }

    pub fn config(&self) -> &OtpServiceConfig {
        &self.config
    }

    /// Issue a code for the request's target, or reissue one if allowed
    ///
    /// # Returns
    ///
    /// * `Ok(SendCodeResult)` - The code was recorded; delivery is in flight
    /// * `Err(DomainError::Otp(Blocked))` - The target is blocked, or this resend hit the attempt cap
    /// * `Err(DomainError::Otp(ResendTooSoon))` - The active code is unexpired and unverified
    /// * `Err(DomainError::Otp(InvalidContext))` - No copy for the request's context
    pub async fn send(
        &self,
        request: SendCodeRequest,
        overrides: SendOverrides,
    ) -> DomainResult<SendCodeResult> {
        let policy = self.config.send_policy(&overrides);
        let transport = request.transport();
        let target = OtpRecord::normalize_target(transport, &request.target);

        let _guard = self.locks.acquire((transport, target.clone())).await;
        let now = Utc::now();

        let record = match self.repository.find(transport, &target).await? {
            None => {
                let code = self.generator.generate(policy.length);
                let payload =
                    templates::render(request.context, &request.channel, &code, policy.timeout_ms)?;
                let record = self
                    .repository
                    .create(OtpRecord::new(transport, &target, code, now))
                    .await?;
                self.dispatch_detached(transport, &target, payload);
                record
            }
            Some(record) => {
                let (code, attempt) = self.admit_resend(&record, &policy, now).await?;
                let payload =
                    templates::render(request.context, &request.channel, &code, policy.timeout_ms)?;
                let record = self
                    .repository
                    .update(
                        transport,
                        &target,
                        OtpRecordPatch::reissue(code, now, attempt),
                    )
                    .await?;
                self.dispatch_detached(transport, &target, payload);
                record
            }
        };

        tracing::info!(
            recipient = %mask_target(&target),
            transport = %transport,
            context = %request.context,
            attempt = record.attempt,
            event = "otp_issued",
            "Issued verification code"
        );

        Ok(SendCodeResult {
            sent_at: record.last_sent_at,
            timeout: policy.timeout_ms,
            attempt: record.attempt,
            max_attempt: policy.max_attempt,
        })
    }

    /// Decide whether an existing record may be reissued
    ///
    /// Returns the new code and the attempt number it will carry. Hitting the
    /// attempt cap persists the block before failing.
    async fn admit_resend(
        &self,
        record: &OtpRecord,
        policy: &SendPolicy,
        now: DateTime<Utc>,
    ) -> DomainResult<(String, u32)> {
        let block_window_elapsed = record.is_block_window_elapsed(now, policy.block_timeout_ms);

        if record.blocked && !block_window_elapsed {
            return Err(self.blocked_error(record, now, policy.block_timeout_ms));
        }

        if !record.is_timed_out(now, policy.timeout_ms) && !record.last_code_verified {
            tracing::warn!(
                recipient = %mask_target(&record.target),
                transport = %record.transport,
                event = "otp_resend_throttled",
                "Resend requested before the active code timed out"
            );
            return Err(OtpError::ResendTooSoon {
                target: record.target.clone(),
                window: format_duration_ms(policy.timeout_ms, TimeUnit::Day),
            }
            .into());
        }

        let attempt = if block_window_elapsed || record.last_code_verified {
            0
        } else {
            record.attempt
        };

        if attempt >= policy.max_attempt {
            self.repository
                .update(record.transport, &record.target, OtpRecordPatch::block())
                .await?;
            return Err(self.blocked_error(record, now, policy.block_timeout_ms));
        }

        Ok((self.generator.generate(policy.length), attempt + 1))
    }

    /// Check `code` against the active code of `target`
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyCodeResult)` - `status` tells whether the code matched
    /// * `Err(DomainError::Otp(NotFound))` - No code was ever sent to `target`
    /// * `Err(DomainError::Otp(Blocked))` - The target is blocked
    /// * `Err(DomainError::Otp(Expired))` - The active code timed out
    pub async fn verify(
        &self,
        code: &str,
        target: &str,
        transport: OtpTransport,
        overrides: VerifyOverrides,
    ) -> DomainResult<VerifyCodeResult> {
        let policy = self.config.verify_policy(&overrides);
        let target = OtpRecord::normalize_target(transport, target);

        let _guard = self.locks.acquire((transport, target.clone())).await;
        let now = Utc::now();

        let record = self
            .repository
            .find(transport, &target)
            .await?
            .ok_or_else(|| OtpError::NotFound {
                target: target.clone(),
            })?;

        if record.blocked {
            return Err(self.blocked_error(&record, now, policy.block_timeout_ms));
        }

        if record.is_timed_out(now, policy.timeout_ms) {
            tracing::info!(
                recipient = %mask_target(&target),
                transport = %transport,
                event = "otp_expired",
                "Verification attempted with an expired code"
            );
            return Err(OtpError::Expired { target }.into());
        }

        if !constant_time_eq(code.as_bytes(), record.code.as_bytes()) {
            let retries = record.retries + 1;
            let blocked = retries >= policy.max_retries;
            self.repository
                .update(
                    transport,
                    &target,
                    OtpRecordPatch::failed_retry(retries, blocked),
                )
                .await?;

            tracing::warn!(
                recipient = %mask_target(&target),
                transport = %transport,
                retries = retries,
                max_retries = policy.max_retries,
                blocked = blocked,
                event = "otp_mismatch",
                "Verification code mismatch"
            );

            return Ok(VerifyCodeResult {
                status: false,
                retries,
                max_retries: policy.max_retries,
            });
        }

        self.repository
            .update(transport, &target, OtpRecordPatch::verified())
            .await?;

        tracing::info!(
            recipient = %mask_target(&target),
            transport = %transport,
            event = "otp_verified",
            "Verification code verified"
        );

        Ok(VerifyCodeResult {
            status: true,
            retries: record.retries,
            max_retries: policy.max_retries,
        })
    }

    fn blocked_error(
        &self,
        record: &OtpRecord,
        now: DateTime<Utc>,
        block_timeout_ms: u64,
    ) -> DomainError {
        let remaining = record.block_remaining_ms(now, block_timeout_ms);
        tracing::warn!(
            recipient = %mask_target(&record.target),
            transport = %record.transport,
            remaining_ms = remaining,
            event = "otp_blocked",
            "Target is blocked"
        );
        OtpError::Blocked {
            target: record.target.clone(),
            retry_after: format_duration_ms(remaining, TimeUnit::Hour),
        }
        .into()
    }

    /// Hand `payload` to the dispatcher without waiting for it
    fn dispatch_detached(&self, transport: OtpTransport, target: &str, payload: NotificationPayload) {
        if !self.config.production_app {
            tracing::debug!(
                recipient = %mask_target(target),
                transport = %transport,
                event = "otp_dispatch_skipped",
                "Skipping delivery outside a production app"
            );
            return;
        }

        let dispatcher = Arc::clone(&self.dispatcher);
        let target = target.to_string();
        tokio::spawn(async move {
            match dispatcher.send_message(transport, &target, &payload).await {
                Ok(message_id) => {
                    tracing::debug!(
                        recipient = %mask_target(&target),
                        transport = %transport,
                        message_id = %message_id,
                        event = "otp_dispatched",
                        "Verification code delivered"
                    );
                }
                Err(error) => {
                    tracing::error!(
                        recipient = %mask_target(&target),
                        transport = %transport,
                        error = %error,
                        event = "otp_dispatch_failed",
                        "Failed to deliver verification code"
                    );
                }
            }
        });
    }
}
