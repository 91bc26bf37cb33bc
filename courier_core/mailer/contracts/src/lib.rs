use std::future::Future;

use courier_models::{
    email_address::EmailAddress,
    mail::{CopyMode, RecipientSet},
};
use courier_templates_contracts::Placeholders;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait MailerService: Send + Sync + 'static {
    /// Compose and dispatch a message to a single recipient.
    ///
    /// Returns `Ok(true)` iff the transport accepted the message. Transport
    /// failures are logged and reported as `Ok(false)`.
    fn send(
        &self,
        to: EmailAddress,
        from: EmailAddress,
        subject: String,
        body: String,
    ) -> impl Future<Output = Result<bool, MailerSendError>> + Send;

    /// Like [`MailerService::send`], with the sender taken from the
    /// configured default address.
    fn send_from_default(
        &self,
        to: EmailAddress,
        subject: String,
        body: String,
    ) -> impl Future<Output = Result<bool, MailerSendError>> + Send;

    /// Compose a single message for the whole recipient set, placed into the
    /// To, Cc or Bcc field selected by `copy_mode`.
    fn send_bulk(
        &self,
        recipients: RecipientSet,
        from: EmailAddress,
        subject: String,
        body: String,
        copy_mode: CopyMode,
    ) -> impl Future<Output = Result<bool, MailerSendError>> + Send;

    /// Render the template at `location` and dispatch it to a single
    /// recipient. An empty rendering is reported as `Ok(false)` without
    /// touching the transport.
    fn send_templated(
        &self,
        to: EmailAddress,
        from: EmailAddress,
        subject: String,
        location: String,
        placeholders: Placeholders,
    ) -> impl Future<Output = Result<bool, MailerSendError>> + Send;

    /// Render the template at `location` and dispatch it to the recipient
    /// set, like [`MailerService::send_bulk`].
    fn send_bulk_templated(
        &self,
        recipients: RecipientSet,
        from: EmailAddress,
        subject: String,
        location: String,
        placeholders: Placeholders,
        copy_mode: CopyMode,
    ) -> impl Future<Output = Result<bool, MailerSendError>> + Send;
}

#[derive(Debug, Error)]
pub enum MailerSendError {
    /// Bulk dispatch requires at least one recipient.
    #[error("Cannot send mail to an empty recipient set.")]
    EmptyRecipients,
    /// The default-sender variant requires a configured sender address.
    #[error("No default sender address is configured.")]
    NoDefaultSender,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockMailerService {
    pub fn with_send(
        mut self,
        to: EmailAddress,
        from: EmailAddress,
        subject: String,
        body: String,
        result: bool,
    ) -> Self {
        self.expect_send()
            .once()
            .with(
                mockall::predicate::eq(to),
                mockall::predicate::eq(from),
                mockall::predicate::eq(subject),
                mockall::predicate::eq(body),
            )
            .return_once(move |_, _, _, _| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_send_from_default(
        mut self,
        to: EmailAddress,
        subject: String,
        body: String,
        result: bool,
    ) -> Self {
        self.expect_send_from_default()
            .once()
            .with(
                mockall::predicate::eq(to),
                mockall::predicate::eq(subject),
                mockall::predicate::eq(body),
            )
            .return_once(move |_, _, _| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_send_bulk(
        mut self,
        recipients: RecipientSet,
        from: EmailAddress,
        subject: String,
        body: String,
        copy_mode: CopyMode,
        result: bool,
    ) -> Self {
        self.expect_send_bulk()
            .once()
            .with(
                mockall::predicate::eq(recipients),
                mockall::predicate::eq(from),
                mockall::predicate::eq(subject),
                mockall::predicate::eq(body),
                mockall::predicate::eq(copy_mode),
            )
            .return_once(move |_, _, _, _, _| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_send_templated(
        mut self,
        to: EmailAddress,
        from: EmailAddress,
        subject: String,
        location: String,
        placeholders: Placeholders,
        result: bool,
    ) -> Self {
        self.expect_send_templated()
            .once()
            .with(
                mockall::predicate::eq(to),
                mockall::predicate::eq(from),
                mockall::predicate::eq(subject),
                mockall::predicate::eq(location),
                mockall::predicate::eq(placeholders),
            )
            .return_once(move |_, _, _, _, _| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_send_bulk_templated(
        mut self,
        recipients: RecipientSet,
        from: EmailAddress,
        subject: String,
        location: String,
        placeholders: Placeholders,
        copy_mode: CopyMode,
        result: bool,
    ) -> Self {
        self.expect_send_bulk_templated()
            .once()
            .with(
                mockall::predicate::eq(recipients),
                mockall::predicate::eq(from),
                mockall::predicate::eq(subject),
                mockall::predicate::eq(location),
                mockall::predicate::eq(placeholders),
                mockall::predicate::eq(copy_mode),
            )
            .return_once(move |_, _, _, _, _, _| Box::pin(std::future::ready(Ok(result))));
        self
    }
}
