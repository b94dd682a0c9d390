#![allow(clippy::unwrap_used)]
// Integration tests for `GlinetClient` using wiremock.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use glinet_api::models::TailscaleConnection;
use glinet_api::{Error, GlinetClient, RouterApi};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GlinetClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = GlinetClient::with_client(reqwest::Client::new(), base_url).unwrap();
    (server, client)
}

async fn setup_logged_in() -> (MockServer, GlinetClient) {
    let (server, client) = setup().await;
    client.set_sid(Some(SecretString::from("sid-123".to_owned())));
    (server, client)
}

fn result(value: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": value,
    }))
}

fn rpc_error(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": { "code": code, "message": message },
    }))
}

async fn mount_call(server: &MockServer, module: &str, function: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({
            "method": "call",
            "params": ["sid-123", module, function],
        })))
        .respond_with(response)
        .mount(server)
        .await;
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_stores_sid() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "challenge" })))
        .respond_with(result(json!({ "alg": 1, "salt": "abcdefgh", "nonce": "n0nce" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({
            "method": "login",
            "params": { "username": "root" },
        })))
        .respond_with(result(json!({ "sid": "fresh-sid" })))
        .mount(&server)
        .await;

    let password = SecretString::from("goodlife".to_owned());
    let sid = client.login("root", &password).await.unwrap();

    assert_eq!(sid.expose_secret(), "fresh-sid");
    assert!(client.has_sid());
}

#[tokio::test]
async fn test_login_rejected_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "challenge" })))
        .respond_with(result(json!({ "alg": 1, "salt": "abcdefgh", "nonce": "n0nce" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "login" })))
        .respond_with(rpc_error(-32000, "Access denied"))
        .mount(&server)
        .await;

    let password = SecretString::from("wrong".to_owned());
    let result = client.login("root", &password).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.has_sid());
}

#[tokio::test]
async fn test_call_without_sid_is_not_logged_in() {
    let (_server, client) = setup().await;
    let result = client.router_info().await;
    assert!(matches!(result, Err(Error::NotLoggedIn)));
}

// ── Error classification ────────────────────────────────────────────

#[tokio::test]
async fn test_access_denied_is_token_rejected() {
    let (server, client) = setup_logged_in().await;
    mount_call(&server, "system", "get_status", rpc_error(-32000, "Access denied")).await;

    let err = client.system_status().await.unwrap_err();
    assert!(err.is_token_error(), "got: {err:?}");
}

#[tokio::test]
async fn test_other_error_code_is_non_zero() {
    let (server, client) = setup_logged_in().await;
    mount_call(&server, "system", "get_status", rpc_error(-32602, "Invalid params")).await;

    let err = client.system_status().await.unwrap_err();
    assert!(
        matches!(err, Error::NonZero { code: -32602, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_err_code_in_result_is_non_zero() {
    let (server, client) = setup_logged_in().await;
    mount_call(
        &server,
        "wifi",
        "set_config",
        result(json!({ "err_code": -5, "err_msg": "radio busy" })),
    )
    .await;

    let err = client.set_wifi_enabled("wlan0", false).await.unwrap_err();
    assert!(matches!(err, Error::NonZero { code: -5, .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_unauthorized_http_status_is_token_rejected() {
    let (server, client) = setup_logged_in().await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.connected_clients().await.unwrap_err();
    assert!(err.is_token_error(), "got: {err:?}");
}

#[tokio::test]
async fn test_server_error_is_http_status() {
    let (server, client) = setup_logged_in().await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.connected_clients().await.unwrap_err();
    assert!(matches!(err, Error::Http { status: 503 }), "got: {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup_logged_in().await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client.router_info().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_malformed_multibyte_body_is_deserialization_error() {
    let (server, client) = setup_logged_in().await;
    let body = format!("{}€ truncated", "x".repeat(199));
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let err = client.connected_clients().await.unwrap_err();
    let Error::Deserialization { message, body } = err else {
        panic!("expected deserialization error");
    };
    assert!(message.contains('€'), "preview should end on a char boundary: {message}");
    assert!(body.ends_with("€ truncated"));
}

// ── Endpoints ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_router_info() {
    let (server, client) = setup_logged_in().await;
    mount_call(
        &server,
        "system",
        "get_info",
        result(json!({
            "mac": "94:83:C4:12:34:56",
            "model": "mt3000",
            "firmware_version": "4.5.0",
            "sn": "ignored",
        })),
    )
    .await;

    let info = client.router_info().await.unwrap();
    assert_eq!(info.mac, "94:83:C4:12:34:56");
    assert_eq!(info.model, "mt3000");
    assert_eq!(info.firmware_version.as_deref(), Some("4.5.0"));
}

#[tokio::test]
async fn test_system_status() {
    let (server, client) = setup_logged_in().await;
    mount_call(
        &server,
        "system",
        "get_status",
        result(json!({
            "system": {
                "uptime": 3600,
                "load_average": [0.25, 0.5, 0.75],
                "cpu": { "temperature": 52.5 },
            },
            "wifi": [],
        })),
    )
    .await;

    let status = client.system_status().await.unwrap();
    assert_eq!(status.system.uptime, Some(3600));
    assert_eq!(status.system.load_average, vec![0.25, 0.5, 0.75]);
    assert_eq!(status.system.cpu.unwrap().temperature, Some(52.5));
}

#[tokio::test]
async fn test_connected_clients() {
    let (server, client) = setup_logged_in().await;
    mount_call(
        &server,
        "clients",
        "get_list",
        result(json!({
            "clients": [
                { "mac": "AA:BB:CC:DD:EE:01", "name": "laptop", "alias": "", "ip": "192.168.8.10", "online": true, "type": 1 },
                { "mac": "AA:BB:CC:DD:EE:02", "name": "*", "online": false },
            ]
        })),
    )
    .await;

    let clients = client.connected_clients().await.unwrap();
    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0].iface_type, Some(1));
    assert!(clients[0].online);
    assert_eq!(clients[1].ip, None);
    assert!(!clients[1].online);
}

#[tokio::test]
async fn test_wifi_interfaces_inherit_band() {
    let (server, client) = setup_logged_in().await;
    mount_call(
        &server,
        "wifi",
        "get_config",
        result(json!({
            "res": [
                { "device": "radio0", "band": "2g", "ifaces": [
                    { "name": "wlan0", "enabled": true, "ssid": "Home", "guest": false, "hidden": false, "encryption": "psk2" },
                    { "name": "wlan2", "enabled": false, "ssid": "Guest", "guest": true },
                ]},
                { "device": "radio1", "band": "5g", "ifaces": [
                    { "name": "wlan1", "enabled": true, "ssid": "Home-5G" },
                ]},
            ]
        })),
    )
    .await;

    let ifaces = client.wifi_interfaces().await.unwrap();
    let names: Vec<_> = ifaces.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["wlan0", "wlan2", "wlan1"]);
    assert_eq!(ifaces[1].band.as_deref(), Some("2g"));
    assert!(ifaces[1].guest);
    assert_eq!(ifaces[2].band.as_deref(), Some("5g"));
}

#[tokio::test]
async fn test_wireguard_clients_flatten_groups() {
    let (server, client) = setup_logged_in().await;
    mount_call(
        &server,
        "wg-client",
        "get_all_config_list",
        result(json!({
            "config_list": [
                { "group_id": 1, "group_name": "Work", "peers": [
                    { "peer_id": 2001, "name": "office" },
                    { "peer_id": 2002, "name": "lab" },
                ]},
                { "group_id": 7, "peers": [ { "peer_id": 3001, "name": "mullvad" } ] },
            ]
        })),
    )
    .await;

    let peers = client.wireguard_clients().await.unwrap();
    assert_eq!(peers.len(), 3);
    assert_eq!(peers[2].group_id, 7);
    assert_eq!(peers[2].peer_id, 3001);
}

#[tokio::test]
async fn test_wireguard_state() {
    let (server, client) = setup_logged_in().await;
    mount_call(
        &server,
        "wg-client",
        "get_status",
        result(json!({ "status": 1, "group_id": 1, "peer_id": 2001, "tunnel_id": 12 })),
    )
    .await;

    let state = client.wireguard_state().await.unwrap();
    assert!(state.is_connected());
    assert_eq!(state.peer_id, Some(2001));
    assert_eq!(state.tunnel_id, Some(12));
}

#[tokio::test]
async fn test_wireguard_start_uses_tunnel_id() {
    let (server, client) = setup_logged_in().await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({
            "params": ["sid-123", "vpn-client", "set_tunnel", { "tunnel_id": 12, "enabled": true }],
        })))
        .respond_with(result(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    RouterApi::wireguard_start(&client, 12).await.unwrap();
}

#[tokio::test]
async fn test_tailscale_config() {
    let (server, client) = setup_logged_in().await;
    mount_call(
        &server,
        "tailscale",
        "get_config",
        result(json!({ "enabled": false, "lan_enabled": true })),
    )
    .await;

    let config = client.tailscale_config().await.unwrap().unwrap();
    assert!(!config.enabled);
    assert_eq!(config.lan_enabled, Some(true));
}

#[tokio::test]
async fn test_tailscale_missing_package_is_not_configured() {
    let (server, client) = setup_logged_in().await;
    mount_call(
        &server,
        "tailscale",
        "get_config",
        rpc_error(-32601, "Method not found"),
    )
    .await;

    assert!(client.tailscale_config().await.unwrap().is_none());
}

#[tokio::test]
async fn test_tailscale_state() {
    let (server, client) = setup_logged_in().await;
    mount_call(&server, "tailscale", "get_status", result(json!({ "status": 3 }))).await;

    let state = client.tailscale_state().await.unwrap();
    assert_eq!(state, TailscaleConnection::Connected);
}

#[tokio::test]
async fn test_multiwan_state() {
    let (server, client) = setup_logged_in().await;
    mount_call(
        &server,
        "kmwan",
        "get_status",
        result(json!({
            "mode": 1,
            "interfaces": [
                { "interface": "wan", "enabled": true, "ipv4": { "online": true }, "weight": 3 },
                { "interface": "modem_0001", "enabled": true,
                  "ipv4": { "online": false }, "ipv6": { "online": true },
                  "modem": { "signal": { "strength": 4, "rsrp": -95.0 },
                             "cells": [ { "type": "servingcell", "mode": "LTE", "band": "B3" } ] } },
            ]
        })),
    )
    .await;

    let state = client.multiwan_state().await.unwrap();
    assert_eq!(state.mode, 1);
    assert_eq!(state.interfaces.len(), 2);
    let modem = state.interfaces[1].modem.as_ref().unwrap();
    assert_eq!(modem.cells[0].cell_type.as_deref(), Some("servingcell"));
    assert_eq!(modem.signal.as_ref().unwrap().strength, Some(4));
}
