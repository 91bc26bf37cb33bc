use std::collections::BTreeSet;

use crate::email_address::EmailAddress;

/// Addresses receiving a single bulk dispatch.
pub type RecipientSet = BTreeSet<EmailAddress>;

/// Selects the message field a recipient set is placed into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CopyMode {
    #[default]
    To,
    Cc,
    Bcc,
}

/// `X-Priority` levels, 1 (highest) to 5 (lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MailPriority {
    Highest,
    High,
    Normal,
    Low,
    Lowest,
}

impl MailPriority {
    pub fn x_priority(self) -> u8 {
        match self {
            Self::Highest => 1,
            Self::High => 2,
            Self::Normal => 3,
            Self::Low => 4,
            Self::Lowest => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBodyKind {
    Plain,
    Html,
}

/// A fully composed message. Built per dispatch call and discarded after the
/// transport call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub from: EmailAddress,
    pub to: RecipientSet,
    pub cc: RecipientSet,
    pub bcc: RecipientSet,
    pub subject: String,
    pub body: String,
    pub kind: MailBodyKind,
    pub priority: MailPriority,
}
