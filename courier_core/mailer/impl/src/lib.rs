use courier_core_mailer_contracts::{MailerSendError, MailerService};
use courier_email_contracts::MailTransport;
use courier_models::{
    email_address::EmailAddress,
    mail::{CopyMode, MailBodyKind, MailPriority, OutboundMail, RecipientSet},
};
use courier_templates_contracts::{Placeholders, TemplateService};
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct MailerServiceImpl<Transport, Templates> {
    transport: Transport,
    templates: Templates,
    config: MailerServiceConfig,
}

#[derive(Debug, Clone, Default)]
pub struct MailerServiceConfig {
    pub default_from: Option<EmailAddress>,
}

impl<Transport, Templates> MailerServiceImpl<Transport, Templates> {
    pub fn new(transport: Transport, templates: Templates, config: MailerServiceConfig) -> Self {
        Self {
            transport,
            templates,
            config,
        }
    }
}

impl<Transport, Templates> MailerService for MailerServiceImpl<Transport, Templates>
where
    Transport: MailTransport,
    Templates: TemplateService,
{
    async fn send(
        &self,
        to: EmailAddress,
        from: EmailAddress,
        subject: String,
        body: String,
    ) -> Result<bool, MailerSendError> {
        let mail = compose(from, RecipientSet::from([to]), CopyMode::To, subject, body);
        Ok(self.dispatch(mail).await)
    }

    async fn send_from_default(
        &self,
        to: EmailAddress,
        subject: String,
        body: String,
    ) -> Result<bool, MailerSendError> {
        let from = self
            .config
            .default_from
            .clone()
            .ok_or(MailerSendError::NoDefaultSender)?;
        self.send(to, from, subject, body).await
    }

    async fn send_bulk(
        &self,
        recipients: RecipientSet,
        from: EmailAddress,
        subject: String,
        body: String,
        copy_mode: CopyMode,
    ) -> Result<bool, MailerSendError> {
        if recipients.is_empty() {
            return Err(MailerSendError::EmptyRecipients);
        }
        let mail = compose(from, recipients, copy_mode, subject, body);
        Ok(self.dispatch(mail).await)
    }

    async fn send_templated(
        &self,
        to: EmailAddress,
        from: EmailAddress,
        subject: String,
        location: String,
        placeholders: Placeholders,
    ) -> Result<bool, MailerSendError> {
        let body = self.templates.render(&location, &placeholders).await;
        if body.is_empty() {
            info!("Not sending mail to {to}: template {location:?} rendered to an empty body");
            return Ok(false);
        }
        self.send(to, from, subject, body).await
    }

    async fn send_bulk_templated(
        &self,
        recipients: RecipientSet,
        from: EmailAddress,
        subject: String,
        location: String,
        placeholders: Placeholders,
        copy_mode: CopyMode,
    ) -> Result<bool, MailerSendError> {
        if recipients.is_empty() {
            return Err(MailerSendError::EmptyRecipients);
        }
        let body = self.templates.render(&location, &placeholders).await;
        if body.is_empty() {
            info!(
                "Not sending mail to {} recipients: template {location:?} rendered to an empty body",
                recipients.len()
            );
            return Ok(false);
        }
        self.send_bulk(recipients, from, subject, body, copy_mode)
            .await
    }
}

impl<Transport, Templates> MailerServiceImpl<Transport, Templates>
where
    Transport: MailTransport,
    Templates: TemplateService,
{
    /// Transport failures never escape to the caller.
    async fn dispatch(&self, mail: OutboundMail) -> bool {
        match self.transport.send(mail).await {
            Ok(accepted) => accepted,
            Err(err) => {
                error!("Failed to send mail: {err:#}");
                false
            }
        }
    }
}

fn compose(
    from: EmailAddress,
    recipients: RecipientSet,
    copy_mode: CopyMode,
    subject: String,
    body: String,
) -> OutboundMail {
    let mut mail = OutboundMail {
        from,
        to: RecipientSet::new(),
        cc: RecipientSet::new(),
        bcc: RecipientSet::new(),
        subject,
        body,
        kind: MailBodyKind::Html,
        priority: MailPriority::Highest,
    };
    match copy_mode {
        CopyMode::To => mail.to = recipients,
        CopyMode::Cc => mail.cc = recipients,
        CopyMode::Bcc => mail.bcc = recipients,
    }
    mail
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use courier_email_contracts::MockMailTransport;
    use courier_templates_contracts::MockTemplateService;

    use super::*;

    #[tokio::test]
    async fn send_accepted() {
        // Arrange
        let transport = MockMailTransport::new().with_send(direct_mail(), true);
        let sut = service(transport, MockTemplateService::new(), None);

        // Act
        let result = sut
            .send(
                addr("to@example.com"),
                addr("from@example.com"),
                "The Subject".into(),
                "<p>Hello</p>".into(),
            )
            .await;

        // Assert
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn send_rejected_reports_soft_failure() {
        // Arrange
        let transport = MockMailTransport::new().with_send(direct_mail(), false);
        let sut = service(transport, MockTemplateService::new(), None);

        // Act
        let result = sut
            .send(
                addr("to@example.com"),
                addr("from@example.com"),
                "The Subject".into(),
                "<p>Hello</p>".into(),
            )
            .await;

        // Assert
        assert!(!result.unwrap());
    }

    #[tokio::test]
    async fn transport_errors_never_escape() {
        // Arrange
        let transport = MockMailTransport::new()
            .with_send_error(direct_mail(), anyhow!("connection refused"));
        let sut = service(transport, MockTemplateService::new(), None);

        // Act
        let result = sut
            .send(
                addr("to@example.com"),
                addr("from@example.com"),
                "The Subject".into(),
                "<p>Hello</p>".into(),
            )
            .await;

        // Assert
        assert!(!result.unwrap());
    }

    #[tokio::test]
    async fn send_from_default_uses_configured_sender() {
        // Arrange
        let transport = MockMailTransport::new().with_send(
            OutboundMail {
                from: addr("noreply@example.com"),
                ..direct_mail()
            },
            true,
        );
        let sut = service(
            transport,
            MockTemplateService::new(),
            Some("noreply@example.com"),
        );

        // Act
        let result = sut
            .send_from_default(
                addr("to@example.com"),
                "The Subject".into(),
                "<p>Hello</p>".into(),
            )
            .await;

        // Assert
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn send_from_default_requires_configured_sender() {
        // Arrange
        let sut = service(MockMailTransport::new(), MockTemplateService::new(), None);

        // Act
        let result = sut
            .send_from_default(
                addr("to@example.com"),
                "The Subject".into(),
                "<p>Hello</p>".into(),
            )
            .await;

        // Assert
        assert!(matches!(result, Err(MailerSendError::NoDefaultSender)));
    }

    #[tokio::test]
    async fn send_bulk_requires_recipients() {
        // Arrange
        let sut = service(MockMailTransport::new(), MockTemplateService::new(), None);

        // Act
        let result = sut
            .send_bulk(
                RecipientSet::new(),
                addr("from@example.com"),
                "The Subject".into(),
                "<p>Hello</p>".into(),
                CopyMode::To,
            )
            .await;

        // Assert
        assert!(matches!(result, Err(MailerSendError::EmptyRecipients)));
    }

    #[tokio::test]
    async fn send_bulk_carbon_copy_fills_only_cc() {
        // Arrange
        let transport = MockMailTransport::new().with_send(
            OutboundMail {
                cc: recipients(["a@example.com", "b@example.com"]),
                to: RecipientSet::new(),
                ..direct_mail()
            },
            true,
        );
        let sut = service(transport, MockTemplateService::new(), None);

        // Act
        let result = sut
            .send_bulk(
                recipients(["a@example.com", "b@example.com"]),
                addr("from@example.com"),
                "The Subject".into(),
                "<p>Hello</p>".into(),
                CopyMode::Cc,
            )
            .await;

        // Assert
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn send_bulk_blind_carbon_copy_fills_only_bcc() {
        // Arrange
        let transport = MockMailTransport::new().with_send(
            OutboundMail {
                bcc: recipients(["a@example.com", "b@example.com"]),
                to: RecipientSet::new(),
                ..direct_mail()
            },
            true,
        );
        let sut = service(transport, MockTemplateService::new(), None);

        // Act
        let result = sut
            .send_bulk(
                recipients(["a@example.com", "b@example.com"]),
                addr("from@example.com"),
                "The Subject".into(),
                "<p>Hello</p>".into(),
                CopyMode::Bcc,
            )
            .await;

        // Assert
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn send_bulk_default_copy_mode_is_direct() {
        // Arrange
        let transport = MockMailTransport::new().with_send(
            OutboundMail {
                to: recipients(["a@example.com", "b@example.com"]),
                ..direct_mail()
            },
            true,
        );
        let sut = service(transport, MockTemplateService::new(), None);

        // Act
        let result = sut
            .send_bulk(
                recipients(["a@example.com", "b@example.com"]),
                addr("from@example.com"),
                "The Subject".into(),
                "<p>Hello</p>".into(),
                CopyMode::default(),
            )
            .await;

        // Assert
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn send_templated_renders_and_dispatches() {
        // Arrange
        let transport = MockMailTransport::new().with_send(
            OutboundMail {
                body: "<p>Hi Alice!</p>".into(),
                ..direct_mail()
            },
            true,
        );
        let templates = MockTemplateService::new().with_render(
            "greeting.html".into(),
            placeholders([("${name}", "Alice")]),
            "<p>Hi Alice!</p>".into(),
        );
        let sut = service(transport, templates, None);

        // Act
        let result = sut
            .send_templated(
                addr("to@example.com"),
                addr("from@example.com"),
                "The Subject".into(),
                "greeting.html".into(),
                placeholders([("${name}", "Alice")]),
            )
            .await;

        // Assert
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn send_templated_empty_body_skips_transport() {
        // Arrange
        let templates = MockTemplateService::new().with_render(
            "missing.html".into(),
            Placeholders::new(),
            String::new(),
        );
        let sut = service(MockMailTransport::new(), templates, None);

        // Act
        let result = sut
            .send_templated(
                addr("to@example.com"),
                addr("from@example.com"),
                "The Subject".into(),
                "missing.html".into(),
                Placeholders::new(),
            )
            .await;

        // Assert
        assert!(!result.unwrap());
    }

    #[tokio::test]
    async fn send_bulk_templated_requires_recipients_before_rendering() {
        // Arrange
        let sut = service(MockMailTransport::new(), MockTemplateService::new(), None);

        // Act
        let result = sut
            .send_bulk_templated(
                RecipientSet::new(),
                addr("from@example.com"),
                "The Subject".into(),
                "greeting.html".into(),
                Placeholders::new(),
                CopyMode::To,
            )
            .await;

        // Assert
        assert!(matches!(result, Err(MailerSendError::EmptyRecipients)));
    }

    #[tokio::test]
    async fn send_bulk_templated_empty_body_skips_transport() {
        // Arrange
        let templates = MockTemplateService::new().with_render(
            "missing.html".into(),
            Placeholders::new(),
            String::new(),
        );
        let sut = service(MockMailTransport::new(), templates, None);

        // Act
        let result = sut
            .send_bulk_templated(
                recipients(["a@example.com"]),
                addr("from@example.com"),
                "The Subject".into(),
                "missing.html".into(),
                Placeholders::new(),
                CopyMode::To,
            )
            .await;

        // Assert
        assert!(!result.unwrap());
    }

    #[tokio::test]
    async fn send_bulk_templated_renders_and_dispatches() {
        // Arrange
        let transport = MockMailTransport::new().with_send(
            OutboundMail {
                to: RecipientSet::new(),
                cc: recipients(["a@example.com", "b@example.com"]),
                body: "<p>Hi folks!</p>".into(),
                ..direct_mail()
            },
            true,
        );
        let templates = MockTemplateService::new().with_render(
            "greeting.html".into(),
            placeholders([("${name}", "folks")]),
            "<p>Hi folks!</p>".into(),
        );
        let sut = service(transport, templates, None);

        // Act
        let result = sut
            .send_bulk_templated(
                recipients(["a@example.com", "b@example.com"]),
                addr("from@example.com"),
                "The Subject".into(),
                "greeting.html".into(),
                placeholders([("${name}", "folks")]),
                CopyMode::Cc,
            )
            .await;

        // Assert
        assert!(result.unwrap());
    }

    fn service(
        transport: MockMailTransport,
        templates: MockTemplateService,
        default_from: Option<&str>,
    ) -> MailerServiceImpl<MockMailTransport, MockTemplateService> {
        MailerServiceImpl::new(
            transport,
            templates,
            MailerServiceConfig {
                default_from: default_from.map(|a| a.parse().unwrap()),
            },
        )
    }

    fn direct_mail() -> OutboundMail {
        OutboundMail {
            from: addr("from@example.com"),
            to: recipients(["to@example.com"]),
            cc: RecipientSet::new(),
            bcc: RecipientSet::new(),
            subject: "The Subject".into(),
            body: "<p>Hello</p>".into(),
            kind: MailBodyKind::Html,
            priority: MailPriority::Highest,
        }
    }

    fn addr(address: &str) -> EmailAddress {
        address.parse().unwrap()
    }

    fn recipients<'a>(addresses: impl IntoIterator<Item = &'a str>) -> RecipientSet {
        addresses.into_iter().map(|a| a.parse().unwrap()).collect()
    }

    fn placeholders<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Placeholders {
        entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect()
    }
}
