//! Request factory tests.
//!
//! Descriptors are pinned with inline snapshots: a change in method, path,
//! query or body shape shows up as a snapshot diff.

use insta::assert_snapshot;
use proptest::prelude::*;
use roster_proto::{
    AccountAttributes, DeviceMessage, EnvelopeType, Method, PreKey, ProtoError, SignedPreKey,
    VerificationTransport, factory,
};

fn json(request: &roster_proto::Request) -> String {
    serde_json::to_string(request).expect("request serializes")
}

fn message_for(recipient: &str, device: u32) -> DeviceMessage {
    DeviceMessage {
        envelope_type: EnvelopeType::Ciphertext,
        destination: recipient.to_string(),
        destination_device_id: device,
        destination_registration_id: 9,
        content: vec![1, 2, 3],
        silent: false,
    }
}

#[test]
fn bodiless_requests() {
    assert_snapshot!(factory::disable_two_factor(), @"DELETE /v1/accounts/pin");
    assert_snapshot!(factory::get_devices(), @"GET /v1/devices/");
    assert_snapshot!(factory::get_messages(), @"GET /v1/messages");
    assert_snapshot!(factory::device_provisioning_code(), @"GET /v1/devices/provisioning/code");
    assert_snapshot!(factory::turn_server_info(), @"GET /v1/accounts/turn");
    assert_snapshot!(factory::allocate_attachment(), @"GET /v1/attachments/");
    assert_snapshot!(factory::attachment(8_123_456_789), @"GET /v1/attachments/8123456789");
    assert_snapshot!(factory::available_prekeys_count(), @"GET /v2/keys");
    assert_snapshot!(factory::current_signed_prekey(), @"GET /v2/keys/signed");
    assert_snapshot!(factory::profile_avatar_upload_form(), @"GET /v1/profile/form/avatar");
    assert_snapshot!(factory::unregister_account(), @"DELETE /v1/accounts/apn");
}

#[test]
fn recipient_addressed_requests() {
    let profile = factory::get_profile("+15551234567").unwrap();
    assert_snapshot!(profile, @"GET /v1/profile/+15551234567");

    let one = factory::recipient_prekey("+15551234567", Some(2)).unwrap();
    assert_snapshot!(one, @"GET /v2/keys/+15551234567/2");

    let all = factory::recipient_prekey("+15551234567", None).unwrap();
    assert_snapshot!(all, @"GET /v2/keys/+15551234567/*");

    let ack = factory::acknowledge_message_delivery("+15550001111", 1_514_764_800_000).unwrap();
    assert_snapshot!(ack, @"DELETE /v1/messages/+15550001111/1514764800000");

    let delete = factory::delete_device(3).unwrap();
    assert_snapshot!(delete, @"DELETE /v1/devices/3");
}

#[test]
fn verification_code_transports() {
    let sms =
        factory::request_verification_code("+15551234567", VerificationTransport::Sms).unwrap();
    assert_snapshot!(sms, @"GET /v1/accounts/sms/code/+15551234567?client=ios");

    let voice =
        factory::request_verification_code("+15551234567", VerificationTransport::Voice).unwrap();
    assert_snapshot!(voice, @"GET /v1/accounts/voice/code/+15551234567?client=ios");
}

#[test]
fn two_factor_body() {
    let request = factory::enable_two_factor("1234").unwrap();
    assert_eq!(request.method(), Method::Put);
    assert_snapshot!(json(&request), @r#"{"method":"PUT","path":"/v1/accounts/pin","body":{"pin":"1234"}}"#);
}

#[test]
fn push_registration_body() {
    let both = factory::register_for_push("apn-token", "voip-token").unwrap();
    assert_snapshot!(json(&both), @r#"{"method":"PUT","path":"/v1/accounts/apn","body":{"apnRegistrationId":"apn-token","voipRegistrationId":"voip-token"}}"#);

    let push_only = factory::register_for_push("apn-token", "").unwrap();
    assert_snapshot!(json(&push_only), @r#"{"method":"PUT","path":"/v1/accounts/apn","body":{"apnRegistrationId":"apn-token"}}"#);
}

#[test]
fn provisioning_message_is_base64() {
    let request = factory::device_provisioning(&[0xde, 0xad], "ephemeral-1").unwrap();
    assert_snapshot!(json(&request), @r#"{"method":"PUT","path":"/v1/provisioning/ephemeral-1","body":{"body":"3q0="}}"#);
}

#[test]
fn contacts_intersection_body() {
    let request = factory::contacts_intersection(&["aGFzaDE".to_string(), "aGFzaDI".to_string()]);
    assert_snapshot!(json(&request), @r#"{"method":"PUT","path":"/v1/directory/tokens","body":{"contacts":["aGFzaDE","aGFzaDI"]}}"#);
}

#[test]
fn submit_message_body() {
    let messages = [message_for("+15551234567", 1), message_for("+15551234567", 2)];
    let request = factory::submit_message("+15551234567", &messages, 1000).unwrap();
    assert_snapshot!(request, @"PUT /v1/messages/+15551234567");

    let body = request.body().unwrap();
    assert_eq!(body["timestamp"], 1000);
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert_eq!(body["messages"][1]["destinationDeviceId"], 2);
    assert_eq!(body["messages"][0]["content"], "AQID");
}

#[test]
fn submit_message_rejects_foreign_destination() {
    let messages = [message_for("+15559999999", 1)];
    let result = factory::submit_message("+15551234567", &messages, 1000);
    assert!(matches!(result, Err(ProtoError::DestinationMismatch { .. })));
}

#[test]
fn submit_message_rejects_empty_and_zero_device() {
    assert_eq!(
        factory::submit_message("+15551234567", &[], 1),
        Err(ProtoError::EmptyParameter { name: "messages" })
    );
    let messages = [message_for("+15551234567", 0)];
    assert_eq!(
        factory::submit_message("+15551234567", &messages, 1),
        Err(ProtoError::InvalidDeviceId { device_id: 0 })
    );
}

#[test]
fn prekey_registration_body() {
    let prekeys = [PreKey { key_id: 1, public_key: vec![1] }];
    let signed = SignedPreKey { key_id: 5, public_key: vec![2], signature: vec![3] };
    let last_resort = PreKey { key_id: 0xFF_FFFF, public_key: vec![4] };

    let request = factory::register_prekeys(&prekeys, &[5], &signed, &last_resort).unwrap();
    assert_snapshot!(json(&request), @r#"{"method":"PUT","path":"/v2/keys/","body":{"identityKey":"BQ==","lastResortKey":{"keyId":16777215,"publicKey":"BA=="},"preKeys":[{"keyId":1,"publicKey":"AQ=="}],"signedPreKey":{"keyId":5,"publicKey":"Ag==","signature":"Aw=="}}}"#);

    let rotate = factory::register_signed_prekey(&signed).unwrap();
    assert_snapshot!(json(&rotate), @r#"{"method":"PUT","path":"/v2/keys/signed","body":{"keyId":5,"publicKey":"Ag==","signature":"Aw=="}}"#);
}

#[test]
fn attributes_body() {
    let attributes = AccountAttributes {
        signaling_key: vec![0; 3],
        registration_id: 1234,
        fetches_messages: true,
        voice: true,
        video: false,
        pin: None,
    };
    let request = factory::update_attributes(&attributes).unwrap();
    assert_snapshot!(json(&request), @r#"{"method":"PUT","path":"/v1/accounts/attributes","body":{"fetchesMessages":true,"registrationId":1234,"signalingKey":"AAAA","video":false,"voice":true}}"#);
}

#[test]
fn malformed_parameters_rejected() {
    assert_eq!(factory::enable_two_factor(""), Err(ProtoError::EmptyParameter { name: "pin" }));
    assert_eq!(
        factory::get_profile(""),
        Err(ProtoError::EmptyParameter { name: "recipient_id" })
    );
    assert!(matches!(
        factory::get_profile("../accounts"),
        Err(ProtoError::InvalidPathSegment { .. })
    ));
    assert_eq!(factory::delete_device(0), Err(ProtoError::InvalidDeviceId { device_id: 0 }));
    assert_eq!(
        factory::recipient_prekey("+1555", Some(0)),
        Err(ProtoError::InvalidDeviceId { device_id: 0 })
    );
    assert_eq!(
        factory::device_provisioning(&[], "abc"),
        Err(ProtoError::EmptyParameter { name: "message_body" })
    );
    assert_eq!(
        factory::register_for_push("", "voip"),
        Err(ProtoError::EmptyParameter { name: "push_token" })
    );
}

proptest! {
    #[test]
    fn prop_profile_path_embeds_recipient(id in "[+0-9A-Za-z.-]{1,24}") {
        let request = factory::get_profile(&id).unwrap();
        prop_assert_eq!(request.path(), format!("/v1/profile/{id}"));
        prop_assert!(request.body().is_none());
    }

    #[test]
    fn prop_prekey_device_roundtrips(device in 1u32..=u32::MAX) {
        let request = factory::recipient_prekey("+15551234567", Some(device)).unwrap();
        let tail = request.path().rsplit('/').next().unwrap().parse::<u32>().unwrap();
        prop_assert_eq!(tail, device);
    }
}
