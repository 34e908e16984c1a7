use peercast_client::{LogLevel, NegotiationPhase, SessionState};
use peercast_core::{MessageKind, Role};

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{MockCapture, kinds, offer_msg};

#[tokio::test]
async fn test_unknown_message_type() {
    init_tracing();

    let mut session = create_test_session(MockCapture::granted());
    session.join_as(Role::Viewer).await;

    let before = session.coordinator.log().len();
    session
        .relay
        .deliver_raw(r#"{"type":"bogus","data":{"x":1},"role":"broadcaster","code":"12345678"}"#);
    session.step().await;

    let new_entries = session.coordinator.log().replay(before);
    assert_eq!(new_entries.len(), 1);
    assert_eq!(new_entries[0].level, LogLevel::Warn);
    assert_eq!(new_entries[0].text, "[relay] Unknown message type: bogus");

    assert_eq!(
        session.coordinator.state(),
        SessionState::Negotiating(NegotiationPhase::AwaitingOffer)
    );
    assert!(session.transport.calls().await.is_empty());
    assert!(session.relay.drain().is_empty());

    // The next valid message is handled normally.
    session.relay.deliver(&offer_msg("remote-offer"));
    session.step().await;
    assert_eq!(kinds(&session.relay.drain()), vec![MessageKind::Answer]);
    assert_eq!(session.coordinator.state(), SessionState::Connected);
}

#[tokio::test]
async fn test_malformed_frame_is_dropped() {
    init_tracing();

    let mut session = create_test_session(MockCapture::granted());
    session.join_as(Role::Viewer).await;

    session.relay.deliver_raw("{\"type\": ");
    session.relay.deliver(&offer_msg("remote-offer"));
    session.step().await;

    assert_eq!(kinds(&session.relay.drain()), vec![MessageKind::Answer]);
    assert!(
        session
            .coordinator
            .log()
            .snapshot()
            .iter()
            .any(|e| e.level == LogLevel::Warn && e.text.starts_with("[relay] Dropping frame"))
    );
}

#[tokio::test]
async fn test_join_ack_and_server_error_are_logged() {
    init_tracing();

    let mut session = create_test_session(MockCapture::granted());
    session.join_as(Role::Viewer).await;

    session.relay.deliver_raw(
        r#"{"type":"join_ack","message":"Join acknowledged","role":"viewer","code":"12345678"}"#,
    );
    session.relay.deliver_raw(
        r#"{"type":"error","message":"Unknown message type: None","code":"12345678"}"#,
    );
    session.step().await;
    session.step().await;

    let texts: Vec<String> = session
        .coordinator
        .log()
        .snapshot()
        .into_iter()
        .map(|e| e.text)
        .collect();
    assert!(texts.contains(&"Join acknowledged: Join acknowledged".to_owned()));
    assert!(texts.contains(&"Error from server: Unknown message type: None".to_owned()));
    assert_eq!(
        session.coordinator.state(),
        SessionState::Negotiating(NegotiationPhase::AwaitingOffer)
    );
}
