//! Contact-form endpoint: one JSON request in, two emails out.
//!
//! Fire-once and best-effort. Nothing is queued or retried; any failure
//! becomes a generic 500 for the visitor.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{PlayerError, PlayerResult};

/// Body of a contact-form POST.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ContactRequest {
    /// Parse and check a JSON body. Name, email and message must be non-blank.
    pub fn from_json(body: &[u8]) -> PlayerResult<Self> {
        let request: Self = serde_json::from_slice(body).map_err(|e| PlayerError::invalid_request(format!("malformed contact request: {e}")))?;
        for (field, value) in [("name", &request.name), ("email", &request.email), ("message", &request.message)] {
            if value.trim().is_empty() {
                return Err(PlayerError::invalid_request(format!("contact request is missing {field}")));
            }
        }
        Ok(request)
    }

    /// First word of the name, for greetings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// JSON response body.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ContactBody {
    Success { success: bool },
    Failure { error: String },
}

/// Status code plus JSON body, ready to hand to any HTTP layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactResponse {
    pub status: u16,
    pub body: ContactBody,
}

impl ContactResponse {
    pub fn ok() -> Self {
        Self {
            status: 200,
            body: ContactBody::Success { success: true },
        }
    }

    pub fn failed() -> Self {
        Self {
            status: 500,
            body: ContactBody::Failure {
                error: "Failed to send email".to_string(),
            },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.body).unwrap_or_else(|_| r#"{"error":"Failed to send email"}"#.to_string())
    }
}

/// Addresses the relay sends from and to.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Mailboxes {
    /// Account the relay authenticates as
    pub sender: String,
    /// Display name on the acknowledgement
    pub sender_name: String,
    /// Where inquiries are delivered
    pub inbox: String,
}

/// A plain-text email handed to the relay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
}

/// A third-party mail relay (SMTP service, HTTP mail API, ...).
pub trait MailRelay {
    fn send(&self, mail: &OutgoingMail) -> impl Future<Output = PlayerResult<()>>;
}

/// Inquiry notification for the site owner, replying to the visitor.
pub fn inquiry_mail(request: &ContactRequest, mailboxes: &Mailboxes) -> OutgoingMail {
    let phone = request.phone.as_deref().filter(|p| !p.trim().is_empty()).unwrap_or("Not provided");
    OutgoingMail {
        from: mailboxes.sender.clone(),
        to: mailboxes.inbox.clone(),
        reply_to: Some(request.email.clone()),
        subject: format!("New Portfolio Inquiry from {}", request.name),
        text: format!(
            "Name: {}\nEmail: {}\nPhone: {}\n\nMessage:\n{}\n",
            request.name, request.email, phone, request.message
        ),
    }
}

/// Acknowledgement sent back to the visitor.
pub fn acknowledgement_mail(request: &ContactRequest, mailboxes: &Mailboxes) -> OutgoingMail {
    OutgoingMail {
        from: format!("\"{}\" <{}>", mailboxes.sender_name, mailboxes.sender),
        to: request.email.clone(),
        reply_to: None,
        subject: format!("Thank you for connecting - {}", mailboxes.sender_name),
        text: format!(
            "Dear {},\n\nThank you for reaching out. I have received your message and will review it shortly.\n\nBest regards,\n{}\n",
            request.first_name(),
            mailboxes.sender_name
        ),
    }
}

/// Handle one contact-form submission.
///
/// Both emails are attempted; the response is 200 only if both were accepted.
pub async fn handle_contact<R: MailRelay>(body: &[u8], relay: &R, mailboxes: &Mailboxes) -> ContactResponse {
    let request = match ContactRequest::from_json(body) {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!(error = %err, "rejected contact request");
            return ContactResponse::failed();
        }
    };

    let inquiry = inquiry_mail(&request, mailboxes);
    let ack = acknowledgement_mail(&request, mailboxes);
    let (inquiry_sent, ack_sent) = futures::future::join(relay.send(&inquiry), relay.send(&ack)).await;

    match inquiry_sent.and(ack_sent) {
        Ok(()) => {
            tracing::debug!(to = %mailboxes.inbox, "contact request relayed");
            ContactResponse::ok()
        }
        Err(err) => {
            tracing::error!(error = %err, "email error");
            ContactResponse::failed()
        }
    }
}
