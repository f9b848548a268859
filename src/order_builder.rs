use crate::auth::AuthContext;
use crate::event::Ticket;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One issued ticket: a recipient email paired with the ticket id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub email: String,
    pub ticket_id: String,
}

/// Normalized order payload for `POST /orders/`.
///
/// Exactly one of `buyer_email` / `buyer_id` identifies the payer:
/// authenticated sessions send the account id, anonymous buyers send a
/// syntactically valid email. The unset field stays off the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_id: Option<String>,
    #[serde(rename = "detail")]
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("ticket is sold out")]
    SoldOut,
    #[error("add at least one recipient or include yourself")]
    NoRecipients,
    #[error("an email address is required")]
    BuyerEmailRequired,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("action not available in this step")]
    InvalidTransition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SelectingBuyerMode,
    CollectingOthers,
    AwaitingBuyerEmail,
    Ready,
}

/// Which step routed into the buyer-email capture, so Back returns there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuyerEmailOrigin {
    JustMe,
    Others,
}

fn is_valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}

/// Multi-step purchase flow as an explicit state machine.
///
/// `SelectingBuyerMode -> {CollectingOthers, AwaitingBuyerEmail} -> Ready`.
/// Field mutators never transition; `choose_*` and `submit_*` do, and a
/// rejected submission leaves the state untouched. Back-navigation keeps
/// everything already entered.
#[derive(Debug)]
pub struct OrderBuilder {
    auth: AuthContext,
    ticket_id: String,
    step: Step,
    recipient_emails: Vec<String>,
    include_self: bool,
    buyer_email: String,
    email_origin: Option<BuyerEmailOrigin>,
    order: Option<OrderRequest>,
}

impl OrderBuilder {
    /// Start a purchase flow for one ticket type. Sold-out tickets cannot
    /// be selected.
    pub fn new(auth: AuthContext, ticket: &Ticket) -> Result<Self, ValidationError> {
        if ticket.is_sold_out() {
            return Err(ValidationError::SoldOut);
        }

        Ok(Self {
            auth,
            ticket_id: ticket.id.clone(),
            step: Step::SelectingBuyerMode,
            recipient_emails: vec![String::new()],
            include_self: true,
            buyer_email: String::new(),
            email_origin: None,
            order: None,
        })
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn recipient_emails(&self) -> &[String] {
        &self.recipient_emails
    }

    pub fn include_self(&self) -> bool {
        self.include_self
    }

    pub fn buyer_email(&self) -> &str {
        &self.buyer_email
    }

    /// The assembled request, available once the flow reaches `Ready`.
    pub fn order_request(&self) -> Option<&OrderRequest> {
        self.order.as_ref()
    }

    /// "Just me": authenticated buyers go straight to `Ready` with a single
    /// self line item; guests must identify themselves by email first.
    pub fn choose_just_me(&mut self) -> Result<(), ValidationError> {
        if self.step != Step::SelectingBuyerMode {
            return Err(ValidationError::InvalidTransition);
        }

        match &self.auth {
            AuthContext::Authenticated { id, email } => {
                self.order = Some(OrderRequest {
                    buyer_email: None,
                    buyer_id: Some(id.clone()),
                    line_items: vec![LineItem {
                        email: email.clone(),
                        ticket_id: self.ticket_id.clone(),
                    }],
                });
                self.step = Step::Ready;
                Ok(())
            }
            AuthContext::Guest => {
                self.email_origin = Some(BuyerEmailOrigin::JustMe);
                self.step = Step::AwaitingBuyerEmail;
                Ok(())
            }
        }
    }

    pub fn choose_buy_for_others(&mut self) -> Result<(), ValidationError> {
        if self.step != Step::SelectingBuyerMode {
            return Err(ValidationError::InvalidTransition);
        }
        self.step = Step::CollectingOthers;
        Ok(())
    }

    pub fn add_email_field(&mut self) {
        self.recipient_emails.push(String::new());
    }

    /// No-op below one remaining field or for an out-of-range index.
    pub fn remove_email_field(&mut self, index: usize) {
        if self.recipient_emails.len() > 1 && index < self.recipient_emails.len() {
            self.recipient_emails.remove(index);
        }
    }

    pub fn set_email(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.recipient_emails.get_mut(index) {
            *slot = value.into();
        }
    }

    pub fn set_include_self(&mut self, include_self: bool) {
        self.include_self = include_self;
    }

    pub fn set_buyer_email(&mut self, value: impl Into<String>) {
        self.buyer_email = value.into();
    }

    fn has_recipient_email(&self) -> bool {
        self.recipient_emails.iter().any(|e| !e.trim().is_empty())
    }

    /// Submit the recipient list. Requires including yourself or at least
    /// one non-blank recipient email; guests without a captured buyer email
    /// are routed to the email step before the order can be assembled.
    pub fn submit_others(&mut self) -> Result<(), ValidationError> {
        if self.step != Step::CollectingOthers {
            return Err(ValidationError::InvalidTransition);
        }

        if !self.include_self && !self.has_recipient_email() {
            return Err(ValidationError::NoRecipients);
        }

        if !self.auth.is_authenticated() && self.buyer_email.trim().is_empty() {
            self.email_origin = Some(BuyerEmailOrigin::Others);
            self.step = Step::AwaitingBuyerEmail;
            return Ok(());
        }

        self.finalize()
    }

    /// Submit the buyer email identifying an anonymous payer and assemble
    /// the order from everything captured so far.
    pub fn submit_buyer_email(&mut self) -> Result<(), ValidationError> {
        if self.step != Step::AwaitingBuyerEmail {
            return Err(ValidationError::InvalidTransition);
        }
        if self.buyer_email.trim().is_empty() {
            return Err(ValidationError::BuyerEmailRequired);
        }
        self.finalize()
    }

    /// Back-navigation, preserving all entered data.
    pub fn back(&mut self) {
        self.step = match self.step {
            Step::CollectingOthers => Step::SelectingBuyerMode,
            Step::AwaitingBuyerEmail => match self.email_origin {
                Some(BuyerEmailOrigin::Others) => Step::CollectingOthers,
                _ => Step::SelectingBuyerMode,
            },
            other => other,
        };
    }

    /// Clear all transient state back to the initial step.
    pub fn reset(&mut self) {
        self.step = Step::SelectingBuyerMode;
        self.recipient_emails = vec![String::new()];
        self.include_self = true;
        self.buyer_email.clear();
        self.email_origin = None;
        self.order = None;
    }

    /// Assemble the normalized request: self recipient first (when
    /// included), then remaining recipients in entry order, all for the
    /// selected ticket.
    fn finalize(&mut self) -> Result<(), ValidationError> {
        let (buyer_id, buyer_email, self_email) = match &self.auth {
            AuthContext::Authenticated { id, email } => {
                (Some(id.clone()), None, email.clone())
            }
            AuthContext::Guest => {
                let email = self.buyer_email.trim();
                if email.is_empty() {
                    return Err(ValidationError::BuyerEmailRequired);
                }
                if !is_valid_email(email) {
                    return Err(ValidationError::InvalidEmail(email.to_string()));
                }
                (None, Some(email.to_string()), email.to_string())
            }
        };

        let mut line_items = Vec::new();
        if self.include_self {
            line_items.push(LineItem {
                email: self_email,
                ticket_id: self.ticket_id.clone(),
            });
        }
        for email in &self.recipient_emails {
            let email = email.trim();
            if !email.is_empty() {
                line_items.push(LineItem {
                    email: email.to_string(),
                    ticket_id: self.ticket_id.clone(),
                });
            }
        }

        if line_items.is_empty() {
            return Err(ValidationError::NoRecipients);
        }

        self.order = Some(OrderRequest {
            buyer_email,
            buyer_id,
            line_items,
        });
        self.step = Step::Ready;
        Ok(())
    }
}
