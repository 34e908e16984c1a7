use peercast_client::{MediaError, NegotiationPhase, SessionError, SessionState};
use peercast_core::{MessageKind, Role};

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{MockCapture, TransportCall, kinds, log_contains, mock_offer};

#[tokio::test]
async fn test_broadcaster_media_denied() {
    init_tracing();

    let mut session = create_test_session(MockCapture::denied());
    session.join_as(Role::Broadcaster).await;

    let err = session
        .coordinator
        .start_as_broadcaster()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::MediaAcquisition(MediaError::PermissionDenied(_))
    ));

    assert!(session.relay.drain().is_empty(), "no offer may be sent");
    assert_eq!(
        session
            .transport
            .count(|c| matches!(c, TransportCall::CreateOffer))
            .await,
        0
    );
    assert!(log_contains(
        session.coordinator.log(),
        "Error getting display media: permission denied"
    ));

    // Reported, not fatal.
    assert_eq!(
        session.coordinator.state(),
        SessionState::Negotiating(NegotiationPhase::Preparing)
    );
    assert!(session.presenter.local_streams().is_empty());
}

#[tokio::test]
async fn test_broadcaster_sends_offer_with_role() {
    init_tracing();

    let mut session = create_test_session(MockCapture::granted());
    session.join_as(Role::Broadcaster).await;

    session.coordinator.start_as_broadcaster().await.unwrap();

    assert_eq!(
        session.transport.calls().await,
        vec![
            TransportCall::AddTrack("video".to_owned()),
            TransportCall::CreateOffer,
            TransportCall::SetLocal(mock_offer()),
        ]
    );

    let sent = session.relay.drain();
    assert_eq!(kinds(&sent), vec![MessageKind::Offer]);
    assert_eq!(sent[0].role, Some(Role::Broadcaster));
    assert_eq!(sent[0].code.as_deref(), Some("12345678"));
    assert_eq!(sent[0].data, Some(mock_offer().0));

    assert_eq!(session.presenter.local_streams(), vec!["test-display"]);
    assert_eq!(
        session.coordinator.state(),
        SessionState::Negotiating(NegotiationPhase::OfferSent)
    );
    assert_eq!(session.coordinator.negotiation_round(), 1);
    assert_eq!(session.capture.requests(), 1);
}
