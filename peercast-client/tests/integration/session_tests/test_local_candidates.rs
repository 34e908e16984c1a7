use peercast_client::{PeerEvent, RemoteStream};
use peercast_core::{MessageKind, Role};

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{MockCapture, kinds, offer_msg, test_candidate};

#[tokio::test]
async fn test_local_candidate_before_open_is_queued_behind_join() {
    init_tracing();

    let mut session = create_test_session(MockCapture::granted());
    session
        .coordinator
        .assign_role(Role::Broadcaster)
        .await
        .unwrap();

    // The channel is still connecting.
    session
        .coordinator
        .on_local_candidate_discovered(test_candidate(1))
        .unwrap();
    assert!(session.relay.drain().is_empty());

    session.step().await;

    let sent = session.relay.drain();
    assert_eq!(
        kinds(&sent),
        vec![MessageKind::Join, MessageKind::IceCandidate]
    );
    assert_eq!(sent[1].role, Some(Role::Broadcaster));
    assert_eq!(sent[1].code.as_deref(), Some("12345678"));
    assert_eq!(sent[1].data, Some(test_candidate(1).0));
}

#[tokio::test]
async fn test_engine_events_reach_relay_and_presenter() {
    init_tracing();

    let mut session = create_test_session(MockCapture::granted());
    session.join_as(Role::Viewer).await;
    session
        .coordinator
        .on_relay_message(offer_msg("remote-offer"))
        .await
        .unwrap();
    session.relay.drain();

    let events = session.factory.events().await.expect("engine events sender");
    events
        .send(PeerEvent::LocalCandidate(test_candidate(4)))
        .await
        .unwrap();
    events
        .send(PeerEvent::RemoteTrack(RemoteStream {
            stream_id: "peercast-display".to_owned(),
            track_id: "video".to_owned(),
            kind: "video".to_owned(),
            track: None,
        }))
        .await
        .unwrap();

    session.step().await;
    session.step().await;

    let sent = session.relay.drain();
    assert_eq!(kinds(&sent), vec![MessageKind::IceCandidate]);
    assert_eq!(sent[0].role, Some(Role::Viewer));

    let remote = session.presenter.remote_streams();
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].stream_id, "peercast-display");
}
