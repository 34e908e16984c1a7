use std::sync::Arc;
use std::time::Duration;

use peercast_client::{ChannelState, Collaborators, Coordinator, SessionConfig, SessionError, SessionState};
use peercast_core::{MessageKind, Role};

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{
    MockCapture, MockConnector, MockPresenter, MockTransport, MockTransportFactory, TransportCall,
    candidate_msg, kinds, log_contains, offer_msg,
};

#[tokio::test]
async fn test_teardown_is_idempotent() {
    init_tracing();

    let mut session = create_test_session(MockCapture::granted());
    session.join_as(Role::Viewer).await;
    session
        .coordinator
        .on_relay_message(candidate_msg(1, Role::Broadcaster))
        .await
        .unwrap();

    session.coordinator.teardown().await;
    session.coordinator.teardown().await;

    assert_eq!(session.coordinator.state(), SessionState::Closed);
    assert_eq!(session.coordinator.channel_state(), ChannelState::Closed);
    assert_eq!(session.coordinator.pending_candidates(), 0);
    assert_eq!(
        session
            .transport
            .count(|c| matches!(c, TransportCall::Close))
            .await,
        1
    );

    let err = session
        .coordinator
        .on_relay_message(offer_msg("late"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::TornDown));
    assert!(session.relay.drain().is_empty());
}

#[tokio::test]
async fn test_teardown_before_role_assignment() {
    init_tracing();

    let mut session = create_test_session(MockCapture::granted());
    session.coordinator.teardown().await;

    assert_eq!(session.coordinator.state(), SessionState::Closed);
    assert!(session.transport.calls().await.is_empty());
    let err = session
        .coordinator
        .assign_role(Role::Viewer)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::TornDown));
    assert_eq!(session.factory.created(), 0);
}

#[tokio::test]
async fn test_teardown_interrupts_pending_capture() {
    init_tracing();

    let (connector, mut relay) = MockConnector::pair();
    let transport = MockTransport::new();
    let collaborators = Collaborators {
        connector: Arc::new(connector),
        transports: Arc::new(MockTransportFactory::new(transport.clone())),
        capture: Arc::new(MockCapture::slow(Duration::from_millis(200))),
        presenter: Arc::new(MockPresenter::default()),
    };
    let handle = Coordinator::new(SessionConfig::default(), collaborators).spawn();

    handle.assign_role(Role::Broadcaster).await.unwrap();
    let starter = handle.clone();
    let start = tokio::spawn(async move { starter.start_as_broadcaster().await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.teardown().await;

    let result = start.await.unwrap();
    assert!(matches!(result, Err(SessionError::TornDown)));
    assert_eq!(handle.state(), SessionState::Closed);

    let sent = relay.drain();
    assert!(!kinds(&sent).contains(&MessageKind::Offer));
    assert_eq!(
        transport
            .count(|c| matches!(c, TransportCall::CreateOffer))
            .await,
        0
    );

    // Calls after the loop stopped report the teardown.
    handle.teardown().await;
    assert!(matches!(
        handle.assign_role(Role::Broadcaster).await,
        Err(SessionError::TornDown)
    ));
}

#[tokio::test]
async fn test_teardown_stops_display_pump() {
    init_tracing();

    let mut session = create_test_session(MockCapture::granted());
    session.join_as(Role::Broadcaster).await;
    session.coordinator.start_as_broadcaster().await.unwrap();
    assert_eq!(session.capture.pumps_running(), 1);

    session.coordinator.teardown().await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(session.capture.pumps_running(), 0);
}

#[tokio::test]
async fn test_teardown_during_candidate_check_skips_the_candidate() {
    init_tracing();

    let (connector, mut relay) = MockConnector::pair();
    let transport = MockTransport::new();
    transport.slow_remote_check(Duration::from_millis(200));
    let collaborators = Collaborators {
        connector: Arc::new(connector),
        transports: Arc::new(MockTransportFactory::new(transport.clone())),
        capture: Arc::new(MockCapture::denied()),
        presenter: Arc::new(MockPresenter::default()),
    };
    let handle = Coordinator::new(SessionConfig::default(), collaborators).spawn();

    handle.become_viewer().await.unwrap();
    let join = relay.next_message().await.expect("join message");
    assert_eq!(join.kind, MessageKind::Join);

    relay.deliver(&candidate_msg(1, Role::Broadcaster));
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.teardown().await;

    assert_eq!(handle.state(), SessionState::Closed);
    assert!(!log_contains(handle.log(), "Queuing ICE candidate"));
    assert!(transport.applied_candidates().await.is_empty());
}
