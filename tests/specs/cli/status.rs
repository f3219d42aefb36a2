//! `fdk status` output specs

use crate::prelude::*;

#[test]
fn status_on_empty_state_dir() {
    let host = Host::empty();

    host.fdk().args(&["status"]).passes().stdout_eq(
        "fdkd:     not running\n\
         desired:  stopped\n\
         command:  -\n\
         trace:    -\n\
         level:    -\n\
         updated:  -\n",
    );
}

#[test]
fn status_json_on_empty_state_dir() {
    let host = Host::empty();

    let out = host.fdk().args(&["status", "-o", "json"]).passes().stdout();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(json["desired"]["running"], false);
    assert_eq!(json["daemon"]["running"], false);
    assert!(json["daemon"]["pid"].is_null());
}

#[test]
fn stop_records_stopped_intent() {
    let host = Host::empty();

    host.fdk().args(&["stop"]).passes();

    host.fdk()
        .args(&["status"])
        .passes()
        .stdout_has("desired:  stopped\n");
}
