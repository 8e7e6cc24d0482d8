//! FFI Boundary Tests
//!
//! Tests the FFI boundary between Rust and mobile platforms.
//! Focuses on type conversions, error mapping, and the callback bridge
//! to a fake platform SDK.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pinwarden_mobile::{
    certificate_pin, enable_logging, MobileDecision, MobileError, MobileFailureKind,
    MobileFetchStatus, MobileHeader, MobileRequest, MobileSecretResult, MobileTokenResult,
    PinWardenMobile, PlatformAttestationOracle,
};

// ============================================================================
// Fake Platform SDK
// ============================================================================

#[derive(Default)]
struct SdkState {
    init_error: String,
    token_status: Option<MobileFetchStatus>,
    jwt: Option<MobileTokenResult>,
    secrets: HashMap<String, MobileSecretResult>,
    pins: Option<HashMap<String, Vec<String>>>,
    hashes: Vec<Vec<u8>>,
}

#[derive(Clone, Default)]
struct FakeSdk {
    state: Arc<Mutex<SdkState>>,
}

impl PlatformAttestationOracle for FakeSdk {
    fn initialize(&self, _config: String) -> String {
        self.state.lock().unwrap().init_error.clone()
    }

    fn fetch_token(&self, _url: String) -> MobileTokenResult {
        let status = self
            .state
            .lock()
            .unwrap()
            .token_status
            .clone()
            .unwrap_or(MobileFetchStatus::Success);
        let token = if status == MobileFetchStatus::Success {
            "sdk-token".to_string()
        } else {
            String::new()
        };
        MobileTokenResult {
            status,
            token,
            attestation_record: None,
            rejection_reasons: None,
        }
    }

    fn fetch_secret(&self, key: String, new_definition: Option<String>) -> MobileSecretResult {
        let mut state = self.state.lock().unwrap();
        if let Some(value) = new_definition {
            let defined = secret(&value);
            state.secrets.insert(key, defined.clone());
            return defined;
        }
        state.secrets.get(&key).cloned().unwrap_or(MobileSecretResult {
            status: MobileFetchStatus::UnknownKey,
            secret: None,
            attestation_record: None,
            rejection_reasons: None,
        })
    }

    fn fetch_custom_jwt(&self, _payload: String) -> MobileTokenResult {
        self.state
            .lock()
            .unwrap()
            .jwt
            .clone()
            .unwrap_or(MobileTokenResult {
                status: MobileFetchStatus::Success,
                token: "sdk-jwt".to_string(),
                attestation_record: None,
                rejection_reasons: None,
            })
    }

    fn message_signature(&self, _message: String) -> Option<String> {
        Some("sdk-signature".to_string())
    }

    fn current_pins(&self, _pin_type: String) -> Option<HashMap<String, Vec<String>>> {
        self.state.lock().unwrap().pins.clone()
    }

    fn set_data_hash(&self, hash: Vec<u8>) {
        self.state.lock().unwrap().hashes.push(hash);
    }

    fn device_id(&self) -> Option<String> {
        Some("sdk-device".to_string())
    }
}

fn secret(value: &str) -> MobileSecretResult {
    MobileSecretResult {
        status: MobileFetchStatus::Success,
        secret: Some(value.to_string()),
        attestation_record: None,
        rejection_reasons: None,
    }
}

fn initialized() -> (FakeSdk, Arc<PinWardenMobile>) {
    let sdk = FakeSdk::default();
    let instance = PinWardenMobile::new(Box::new(sdk.clone()));
    instance.initialize("sdk-config".to_string()).unwrap();
    (sdk, instance)
}

fn request(url: &str, headers: &[(&str, &str)]) -> MobileRequest {
    MobileRequest {
        url: url.to_string(),
        headers: headers
            .iter()
            .map(|(name, value)| MobileHeader {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect(),
    }
}

fn header<'a>(request: &'a MobileRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_initialize_error_string_maps_to_initialization() {
    let sdk = FakeSdk::default();
    sdk.state.lock().unwrap().init_error = "bad config".to_string();
    let instance = PinWardenMobile::new(Box::new(sdk));

    let err = instance.initialize("cfg".to_string()).unwrap_err();

    assert!(matches!(err, MobileError::Initialization(ref msg) if msg == "bad config"));
    assert!(!instance.is_initialized());
}

#[test]
fn test_with_config_json() {
    let config = r#"{"oracle_config": "cfg", "token_header": "Authorization", "token_prefix": "Bearer "}"#;
    let instance = PinWardenMobile::with_config(Box::new(FakeSdk::default()), config.to_string()).unwrap();

    let decision = instance
        .update_request(request("https://api.example.com/", &[]))
        .unwrap();

    match decision {
        MobileDecision::Proceed { request } => {
            assert_eq!(header(&request, "Authorization"), Some("Bearer sdk-token"));
        }
        other => panic!("expected Proceed, got {:?}", other),
    }
}

#[test]
fn test_with_config_rejects_bad_json() {
    let result = PinWardenMobile::with_config(Box::new(FakeSdk::default()), "{".to_string());
    assert!(matches!(result, Err(MobileError::Configuration(_))));
}

// ============================================================================
// Request Pipeline
// ============================================================================

#[test]
fn test_header_substitution_across_boundary() {
    let (sdk, instance) = initialized();
    sdk.state
        .lock()
        .unwrap()
        .secrets
        .insert("abc123".to_string(), secret("XYZ"));
    instance.add_substitution_header("Authorization".to_string(), Some("Bearer ".to_string()));

    let decision = instance
        .update_request(request(
            "https://api.example.com/",
            &[("Authorization", "Bearer abc123")],
        ))
        .unwrap();

    match decision {
        MobileDecision::Proceed { request } => {
            assert_eq!(header(&request, "Authorization"), Some("Bearer XYZ"));
        }
        other => panic!("expected Proceed, got {:?}", other),
    }
}

#[test]
fn test_no_network_is_retry() {
    let (sdk, instance) = initialized();
    sdk.state.lock().unwrap().token_status = Some(MobileFetchStatus::NoNetwork);

    let decision = instance
        .update_request(request("https://api.example.com/", &[]))
        .unwrap();

    match decision {
        MobileDecision::Retry { failure } => assert_eq!(failure.kind, MobileFailureKind::Networking),
        other => panic!("expected Retry, got {:?}", other),
    }
}

#[test]
fn test_rejection_details_cross_boundary() {
    let (sdk, instance) = initialized();
    sdk.state.lock().unwrap().secrets.insert(
        "k".to_string(),
        MobileSecretResult {
            status: MobileFetchStatus::Rejected,
            secret: None,
            attestation_record: Some("ARC".to_string()),
            rejection_reasons: Some("emulator".to_string()),
        },
    );
    instance.add_substitution_query_param("key".to_string());

    let decision = instance
        .update_request(request("https://api.example.com/?key=k", &[]))
        .unwrap();

    match decision {
        MobileDecision::Fail { failure } => {
            assert_eq!(failure.kind, MobileFailureKind::Rejection);
            assert_eq!(failure.attestation_record.as_deref(), Some("ARC"));
            assert_eq!(failure.rejection_reasons.as_deref(), Some("emulator"));
        }
        other => panic!("expected Fail, got {:?}", other),
    }
}

#[test]
fn test_repeated_headers_round_trip_unchanged() {
    let (_sdk, instance) = initialized();
    let original = request(
        "https://api.example.com/",
        &[("Accept", "a/b"), ("Cookie", "x=1"), ("Accept", "c/d")],
    );

    let decision = instance.update_request(original.clone()).unwrap();

    match decision {
        MobileDecision::Proceed { request } => {
            let accepts: Vec<&str> = request
                .headers
                .iter()
                .filter(|h| h.name == "Accept")
                .map(|h| h.value.as_str())
                .collect();
            assert_eq!(accepts, vec!["a/b", "c/d"]);
            assert_eq!(header(&request, "Cookie"), Some("x=1"));
        }
        other => panic!("expected Proceed, got {:?}", other),
    }
}

#[test]
fn test_repeated_headers_survive_ignore() {
    let (_sdk, instance) = initialized();
    instance
        .add_exclusion_url_regex(r"/static/".to_string())
        .unwrap();
    let original = request(
        "https://cdn.example.com/static/app.js",
        &[("Accept", "a/b"), ("Accept", "c/d")],
    );

    match instance.update_request(original.clone()).unwrap() {
        MobileDecision::Ignore { request } => assert_eq!(request, original),
        other => panic!("expected Ignore, got {:?}", other),
    }
}

#[test]
fn test_excluded_request_is_ignored() {
    let (_sdk, instance) = initialized();
    instance
        .add_exclusion_url_regex(r"\.png$".to_string())
        .unwrap();

    let original = request("https://cdn.example.com/logo.png", &[("Accept", "image/png")]);
    let decision = instance.update_request(original.clone()).unwrap();

    match decision {
        MobileDecision::Ignore { request } => assert_eq!(request, original),
        other => panic!("expected Ignore, got {:?}", other),
    }
}

#[test]
fn test_invalid_exclusion_pattern() {
    let (_sdk, instance) = initialized();
    let err = instance
        .add_exclusion_url_regex("(".to_string())
        .unwrap_err();
    assert!(matches!(err, MobileError::InvalidPattern { .. }));
}

#[test]
fn test_invalid_url_is_invalid_input() {
    let (_sdk, instance) = initialized();
    let err = instance.update_request(request("not a url", &[])).unwrap_err();
    assert!(matches!(err, MobileError::InvalidInput(_)));
}

#[test]
fn test_binding_header_hash_reaches_sdk() {
    let (sdk, instance) = initialized();
    instance.set_binding_header("X-User".to_string());

    instance
        .update_request(request("https://api.example.com/", &[("X-User", "u1")]))
        .unwrap();

    let hashes = sdk.state.lock().unwrap().hashes.clone();
    assert_eq!(hashes.len(), 1);
    assert_eq!(hashes[0].len(), 32);
}

// ============================================================================
// Pinning
// ============================================================================

#[test]
fn test_pins_flow_from_sdk() {
    let (sdk, instance) = initialized();
    let mut pins = HashMap::new();
    pins.insert("api.example.com".to_string(), vec!["pin-a".to_string()]);
    sdk.state.lock().unwrap().pins = Some(pins);

    assert!(instance.refresh_pins());
    assert!(instance.is_host_pinned("api.example.com".to_string()));
    assert_eq!(
        instance.pins_json().unwrap(),
        r#"{"api.example.com":["pin-a"]}"#
    );
}

#[test]
fn test_unpinned_host_chain_accepted() {
    let (_sdk, instance) = initialized();

    let check = instance.verify_certificate_chain("api.example.com".to_string(), vec![]);

    assert!(check.accepted);
    assert!(!check.pinned);
}

#[test]
fn test_pinned_host_with_garbage_chain_rejected() {
    let (sdk, instance) = initialized();
    let mut pins = HashMap::new();
    pins.insert("api.example.com".to_string(), vec!["pin-a".to_string()]);
    sdk.state.lock().unwrap().pins = Some(pins);
    instance.refresh_pins();

    let check = instance.verify_certificate_chain("api.example.com".to_string(), vec![vec![0x30, 0x00]]);

    assert!(!check.accepted);
    assert!(check.pinned);
    assert!(!check.error.is_empty());
}

#[test]
fn test_empty_pin_set_without_wildcard_reports_unpinned() {
    let (sdk, instance) = initialized();
    let mut pins = HashMap::new();
    pins.insert("api.example.com".to_string(), Vec::new());
    sdk.state.lock().unwrap().pins = Some(pins);
    instance.refresh_pins();

    let check = instance.verify_certificate_chain("api.example.com".to_string(), vec![]);

    assert!(check.accepted);
    assert!(!check.pinned);
}

#[test]
fn test_certificate_pin_rejects_garbage() {
    assert!(matches!(
        certificate_pin(vec![1, 2, 3]),
        Err(MobileError::Pinning(_))
    ));
}

// ============================================================================
// Direct Operations
// ============================================================================

#[test]
fn test_direct_operations() {
    let (_sdk, instance) = initialized();

    assert_eq!(instance.fetch_token("https://api.example.com/".to_string()).unwrap(), "sdk-token");
    assert_eq!(instance.fetch_custom_jwt("{}".to_string()).unwrap(), "sdk-jwt");
    assert_eq!(instance.get_device_id().as_deref(), Some("sdk-device"));
    assert_eq!(
        instance.get_message_signature("m".to_string()).as_deref(),
        Some("sdk-signature")
    );
    instance.precheck().unwrap();

    let defined = instance
        .fetch_secure_string("user".to_string(), Some("v1".to_string()))
        .unwrap();
    assert_eq!(defined.as_deref(), Some("v1"));
    assert_eq!(
        instance.fetch_secure_string("missing".to_string(), None).unwrap(),
        None
    );
}

#[test]
fn test_custom_jwt_rejection_details_cross_boundary() {
    let (sdk, instance) = initialized();
    sdk.state.lock().unwrap().jwt = Some(MobileTokenResult {
        status: MobileFetchStatus::Rejected,
        token: String::new(),
        attestation_record: Some("ARC".to_string()),
        rejection_reasons: Some("emulator".to_string()),
    });

    let err = instance.fetch_custom_jwt("{}".to_string()).unwrap_err();

    match err {
        MobileError::Rejection {
            attestation_record,
            rejection_reasons,
            ..
        } => {
            assert_eq!(attestation_record.as_deref(), Some("ARC"));
            assert_eq!(rejection_reasons.as_deref(), Some("emulator"));
        }
        other => panic!("expected Rejection, got {:?}", other),
    }
}

#[test]
fn test_enable_logging_rejects_bad_filter_then_accepts() {
    assert!(enable_logging("pinwarden_core=[".to_string()).is_err());
    enable_logging("pinwarden_core=debug".to_string()).unwrap();
    // Second call is a no-op
    enable_logging("pinwarden_core=info".to_string()).unwrap();
}
