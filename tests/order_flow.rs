//! End-to-end purchase flow: an anonymous buyer picks a ticket, adds
//! recipients, identifies themselves by email, and the assembled order is
//! submitted.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};
use ticketpass::{
    AuthContext, FetchError, OrderAck, OrderBuilder, OrderOutcome, OrderRequest, OrderSubmitter,
    OrdersApi, Step, Ticket,
};

struct RecordingOrdersApi {
    received: Mutex<Vec<OrderRequest>>,
    redirect_url: Option<&'static str>,
}

#[async_trait]
impl OrdersApi for RecordingOrdersApi {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderAck, FetchError> {
        self.received.lock().unwrap().push(request.clone());
        Ok(OrderAck {
            url: self.redirect_url.map(str::to_string),
        })
    }
}

fn ticket() -> Ticket {
    Ticket {
        id: "T1".to_string(),
        name: "Regular".to_string(),
        cost: Decimal::new(250000, 2),
        currency: "NGN".to_string(),
        quantity: 40,
    }
}

#[tokio::test]
async fn guest_buys_for_others_and_is_redirected_to_payment() {
    let mut builder = OrderBuilder::new(AuthContext::Guest, &ticket()).unwrap();

    builder.choose_buy_for_others().unwrap();
    builder.set_email(0, "a@x.com");
    builder.add_email_field();
    builder.set_email(1, "b@x.com");
    builder.set_include_self(true);

    // Guest without a captured email is routed to the email step first.
    builder.submit_others().unwrap();
    assert_eq!(builder.step(), Step::AwaitingBuyerEmail);

    builder.set_buyer_email("me@x.com");
    builder.submit_buyer_email().unwrap();
    assert_eq!(builder.step(), Step::Ready);

    let order = builder.order_request().unwrap();
    assert_eq!(order.buyer_email.as_deref(), Some("me@x.com"));
    assert_eq!(order.buyer_id, None);
    let pairs: Vec<_> = order
        .line_items
        .iter()
        .map(|l| (l.email.as_str(), l.ticket_id.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("me@x.com", "T1"), ("a@x.com", "T1"), ("b@x.com", "T1")]
    );

    let api = Arc::new(RecordingOrdersApi {
        received: Mutex::new(Vec::new()),
        redirect_url: Some("https://pay.example.com/session/123"),
    });
    let submitter = OrderSubmitter::new(api.clone());

    let outcome = submitter.submit(order).await.unwrap();
    assert_eq!(
        outcome,
        OrderOutcome::RedirectToPayment("https://pay.example.com/session/123".to_string())
    );

    let received = api.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0], *order);
}

#[tokio::test]
async fn authenticated_just_me_completes_inline() {
    let auth = AuthContext::authenticated("u1", "me@x.com");
    let mut builder = OrderBuilder::new(auth, &ticket()).unwrap();
    builder.choose_just_me().unwrap();

    let api = Arc::new(RecordingOrdersApi {
        received: Mutex::new(Vec::new()),
        redirect_url: None,
    });
    let submitter = OrderSubmitter::new(api.clone());

    let outcome = submitter
        .submit(builder.order_request().unwrap())
        .await
        .unwrap();
    assert_eq!(outcome, OrderOutcome::Completed);

    let received = api.received.lock().unwrap();
    assert_eq!(received[0].buyer_id.as_deref(), Some("u1"));
    assert_eq!(received[0].buyer_email, None);
    assert_eq!(received[0].line_items.len(), 1);
}

#[tokio::test]
async fn retry_after_back_navigation_preserves_recipients() {
    let mut builder = OrderBuilder::new(AuthContext::Guest, &ticket()).unwrap();
    builder.choose_buy_for_others().unwrap();
    builder.set_email(0, "a@x.com");
    builder.submit_others().unwrap();

    // Back out of the email step and forward again; nothing entered is lost.
    builder.back();
    assert_eq!(builder.step(), Step::CollectingOthers);
    assert_eq!(builder.recipient_emails()[0], "a@x.com");

    builder.set_buyer_email("me@x.com");
    builder.submit_others().unwrap();
    assert_eq!(builder.step(), Step::Ready);

    let order = builder.order_request().unwrap();
    assert_eq!(order.line_items.len(), 2);
}
