//! Channel queries through a recording transport.

mod common;

use common::*;
use pousser::{LogLevel, Method, PousserError, QueryParams};
use serde_json::json;

#[test]
fn test_get_signed_without_body() {
    let (mut client, transport, _) = client();
    transport.respond(200, r#"{"ok":true}"#);

    let mut params = QueryParams::new();
    params.insert("filter_by_prefix".to_string(), "presence-".into());
    let response = client.get("/channels", &params).unwrap();

    assert_eq!(response.decoded, Some(json!({"ok": true})));

    let request = transport.last_request();
    assert_eq!(request.method, Method::Get);
    assert!(request.body.is_none());

    let (path, query) = split_url(&request.url);
    assert_eq!(path, "/api/app/1/channels");
    assert!(!query.contains_key("body_md5"));
    assert_eq!(query["filter_by_prefix"], "presence-");

    let raw_query = request.url.split_once('?').unwrap().1;
    assert_eq!(
        request.header("hash"),
        Some(expected_signature("GET", &path, raw_query).as_str())
    );
}

#[test]
fn test_get_non_200_is_none() {
    let (mut client, transport, logger) = client();
    transport.respond(404, "not found");

    assert!(client.get("/channels", &QueryParams::new()).is_none());
    assert!(logger.levels().contains(&LogLevel::Error));
}

#[test]
fn test_get_undecodable_body_is_none() {
    let (mut client, transport, logger) = client();
    transport.respond(200, "<html>");

    assert!(client.get("/channels", &QueryParams::new()).is_none());
    assert!(logger.has(LogLevel::Error, "not JSON"));
}

#[test]
fn test_get_channel_info() {
    let (mut client, transport, _) = client();
    transport.respond(200, r#"{"occupied":true,"user_count":3}"#);

    let mut params = QueryParams::new();
    params.insert("info".to_string(), vec!["user_count", "subscription_count"].into());
    let info = client.get_channel_info("presence-room", &params).unwrap().unwrap();

    assert_eq!(info["user_count"], json!(3));
    let (path, query) = split_url(&transport.last_request().url);
    assert_eq!(path, "/api/app/1/channels/presence-room");
    assert_eq!(query["info"], "user_count,subscription_count");
}

#[test]
fn test_get_channel_info_failure_and_validation() {
    let (mut client, transport, _) = client();
    transport.respond(500, "");

    assert_eq!(client.get_channel_info("room", &QueryParams::new()).unwrap(), None);
    assert!(matches!(
        client.get_channel_info("bad room", &QueryParams::new()),
        Err(PousserError::InvalidChannelName(_))
    ));
    assert_eq!(transport.requests().len(), 1);
}

#[test]
fn test_get_channels_flattens() {
    let (mut client, transport, _) = client();
    transport.respond(200, r#"{"channels":{"a":{},"b":{}}}"#);

    let channels = client.get_channels(&QueryParams::new()).unwrap();
    assert_eq!(channels.len(), 2);
    let mut names: Vec<String> = channels.into_iter().map(|c| c.name).collect();
    names.sort();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_get_channels_failure() {
    let (mut client, transport, _) = client();
    transport.respond(401, "unauthorized");
    assert!(client.get_channels(&QueryParams::new()).is_none());
}

#[test]
fn test_get_users_info() {
    let (mut client, transport, _) = client();
    transport.respond(200, r#"{"users":[{"id":"u1"},{"id":"u2"}]}"#);

    let response = client.get_users_info("presence-room").unwrap().unwrap();
    assert_eq!(response.status, 200);
    let (path, _) = split_url(&transport.last_request().url);
    assert_eq!(path, "/api/app/1/channels/presence-room/users");

    transport.respond(200, r#"{"users":[{"id":"u1"},{"id":2}]}"#);
    let users = client.get_users("presence-room").unwrap().unwrap();
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["u1", "2"]);
}
