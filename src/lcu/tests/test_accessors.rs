// Tests for the connection-checked accessors

use super::test_helpers::*;
use crate::lcu::{
  Method, Outcome, CURRENT_SUMMONER_ENDPOINT, READY_CHECK_ACCEPT_ENDPOINT, READY_CHECK_ENDPOINT,
};

#[cfg(test)]
mod accessor_tests {
  use super::*;

  #[test]
  fn test_ready_check_in_progress_is_detected() {
    let fs = FakeFs::default();
    let transport = FakeTransport::default();
    online(&fs, &transport, 54321);
    transport.set(Method::Get, READY_CHECK_ENDPOINT, Ok((200, READY_CHECK_IN_PROGRESS_JSON)));
    let mut client = fake_client(&fs, &transport);

    assert!(client.check_ready_check());

    match client.ready_check() {
      Outcome::Found(ready_check) => {
        assert_eq!(ready_check.state, "InProgress");
        assert_eq!(ready_check.player_response.as_deref(), Some("None"));
      }
      other => panic!("expected a ready check, got {:?}", other),
    }
  }

  #[test]
  fn test_other_ready_check_states_are_ignored() {
    for body in [
      r#"{"state": "Invalid"}"#,
      r#"{"state": "EveryoneReady"}"#,
      r#"{"state": "PartyNotReady"}"#,
      r#"{"playerResponse": "Accepted"}"#,
    ] {
      let fs = FakeFs::default();
      let transport = FakeTransport::default();
      online(&fs, &transport, 54321);
      transport.set(Method::Get, READY_CHECK_ENDPOINT, Ok((200, body)));
      let mut client = fake_client(&fs, &transport);

      assert!(!client.check_ready_check(), "state body {} should not match", body);
    }
  }

  #[test]
  fn test_error_statuses_mean_no_ready_check() {
    for status in [400, 404, 500, 503] {
      let fs = FakeFs::default();
      let transport = FakeTransport::default();
      online(&fs, &transport, 54321);
      // Body says InProgress but the status wins
      transport.set(Method::Get, READY_CHECK_ENDPOINT, Ok((status, READY_CHECK_IN_PROGRESS_JSON)));
      let mut client = fake_client(&fs, &transport);

      assert!(!client.check_ready_check(), "status {} should not match", status);
      assert!(matches!(client.ready_check(), Outcome::NotFound));
    }
  }

  /// Scenario: the endpoint answers but with a body we can't read.
  /// Expected: false, and the session survives since the client is alive.
  #[test]
  fn test_malformed_ready_check_keeps_session() {
    let fs = FakeFs::default();
    let transport = FakeTransport::default();
    online(&fs, &transport, 54321);
    transport.set(Method::Get, READY_CHECK_ENDPOINT, Ok((200, "{\"state\": ")));
    let mut client = fake_client(&fs, &transport);

    assert!(!client.check_ready_check());
    assert!(matches!(client.ready_check(), Outcome::Failed(_)));
    assert!(client.session().is_some());
  }

  #[test]
  fn test_accept_succeeds_only_on_204() {
    for (reply, expected) in [
      (Ok((204, "")), true),
      (Ok((200, "")), false),
      (Ok((404, "")), false),
      (Ok((500, "")), false),
      (Err("connection reset"), false),
    ] {
      let fs = FakeFs::default();
      let transport = FakeTransport::default();
      online(&fs, &transport, 54321);
      transport.set(Method::Post, READY_CHECK_ACCEPT_ENDPOINT, reply);
      let mut client = fake_client(&fs, &transport);

      assert_eq!(client.accept(), expected, "reply {:?}", reply);
    }
  }

  #[test]
  fn test_accept_posts_with_basic_auth() {
    let fs = FakeFs::default();
    let transport = FakeTransport::default();
    online(&fs, &transport, 54321);
    transport.set(Method::Post, READY_CHECK_ACCEPT_ENDPOINT, Ok((204, "")));
    let mut client = fake_client(&fs, &transport);

    assert!(client.accept());

    let requests = transport.requests();
    let accept = requests.last().unwrap();
    assert_eq!(accept.method, Method::Post);
    assert_eq!(
      accept.url,
      "https://127.0.0.1:54321/lol-matchmaking/v1/ready-check/accept"
    );
    // base64("riot:pw")
    assert_eq!(accept.authorization, "Basic cmlvdDpwdw==");
  }

  #[test]
  fn test_accessors_short_circuit_when_disconnected() {
    let fs = FakeFs::default();
    let transport = FakeTransport::default();
    let mut client = fake_client(&fs, &transport);

    assert!(!client.check_ready_check());
    assert!(!client.accept());
    assert!(client.get_identity().is_none());
    assert_eq!(transport.request_count(), 0);
  }

  #[test]
  fn test_every_accessor_reverifies_connection() {
    let fs = FakeFs::default();
    let transport = FakeTransport::default();
    online(&fs, &transport, 54321);
    transport.set(Method::Get, READY_CHECK_ENDPOINT, Ok((200, READY_CHECK_IN_PROGRESS_JSON)));
    transport.set(Method::Post, READY_CHECK_ACCEPT_ENDPOINT, Ok((204, "")));
    let mut client = fake_client(&fs, &transport);

    assert!(client.check_ready_check());
    assert!(client.accept());

    let probes = transport
      .requests()
      .iter()
      .filter(|r| r.url.ends_with(CURRENT_SUMMONER_ENDPOINT))
      .count();
    assert_eq!(probes, 2);
  }

  #[test]
  fn test_identity_returns_decoded_json() {
    let fs = FakeFs::default();
    let transport = FakeTransport::default();
    online(&fs, &transport, 54321);
    let mut client = fake_client(&fs, &transport);

    let identity = client.get_identity().unwrap();
    assert_eq!(identity["summonerId"], 123456);
    assert_eq!(identity["gameName"], "Tester");
  }

  /// Scenario: the probe succeeds but the identity call then fails.
  #[test]
  fn test_identity_errors_are_swallowed() {
    let fs = FakeFs::default();
    let transport = FakeTransport::default();
    online(&fs, &transport, 54321);
    transport.push_once(Method::Get, CURRENT_SUMMONER_ENDPOINT, Ok((200, SUMMONER_JSON)));
    transport.push_once(Method::Get, CURRENT_SUMMONER_ENDPOINT, Ok((500, "")));
    let mut client = fake_client(&fs, &transport);

    assert!(client.get_identity().is_none());
  }
}
