#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use common::RecordingSink;
use webmetrics_core::{ResponseSink, StatusObservingResponse};

#[test]
fn defaults_to_200() {
    let wrapped = StatusObservingResponse::new(RecordingSink::default());
    assert_eq!(wrapped.status(), 200);
    assert!(wrapped.inner().calls.is_empty());
}

#[test]
fn last_status_wins_and_calls_are_forwarded() {
    let mut wrapped = StatusObservingResponse::new(RecordingSink::default());
    wrapped.set_status(201);
    wrapped.send_error(404).unwrap();
    wrapped.send_error_with_message(500, "boom").unwrap();

    assert_eq!(wrapped.status(), 500);
    assert_eq!(
        wrapped.into_inner().calls,
        vec!["set_status(201)", "send_error(404)", "send_error(500, boom)"]
    );
}

#[test]
fn failing_send_error_still_observed() {
    let sink = RecordingSink {
        fail_send_error: true,
        ..Default::default()
    };
    let mut wrapped = StatusObservingResponse::new(sink);
    assert!(wrapped.send_error(503).is_err());
    assert_eq!(wrapped.status(), 503);
}

#[test]
fn wraps_borrowed_sinks() {
    let mut sink = RecordingSink::default();
    {
        let mut wrapped = StatusObservingResponse::new(&mut sink);
        wrapped.set_status(204);
        assert_eq!(wrapped.status(), 204);
    }
    assert_eq!(sink.calls, vec!["set_status(204)"]);
}
