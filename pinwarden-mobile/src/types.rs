//! Mobile-friendly data types.
//!
//! These types are wrappers around pinwarden-core types that are compatible
//! with UniFFI for cross-language bindings.

use pinwarden_core::{
    Decision, FetchStatus, OutgoingRequest, SecretFetchResult, ServiceError, TokenFetchResult,
};

use crate::error::MobileError;

/// Mobile-friendly oracle fetch status.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum MobileFetchStatus {
    Success,
    NoNetwork,
    PoorNetwork,
    MitmDetected,
    UnprotectedUrl,
    UnknownUrl,
    NoService,
    Rejected,
    UnknownKey,
    BadKey,
    BadPayload,
    Disabled,
    Other { name: String },
}

impl From<MobileFetchStatus> for FetchStatus {
    fn from(status: MobileFetchStatus) -> Self {
        match status {
            MobileFetchStatus::Success => FetchStatus::Success,
            MobileFetchStatus::NoNetwork => FetchStatus::NoNetwork,
            MobileFetchStatus::PoorNetwork => FetchStatus::PoorNetwork,
            MobileFetchStatus::MitmDetected => FetchStatus::MitmDetected,
            MobileFetchStatus::UnprotectedUrl => FetchStatus::UnprotectedUrl,
            MobileFetchStatus::UnknownUrl => FetchStatus::UnknownUrl,
            MobileFetchStatus::NoService => FetchStatus::NoService,
            MobileFetchStatus::Rejected => FetchStatus::Rejected,
            MobileFetchStatus::UnknownKey => FetchStatus::UnknownKey,
            MobileFetchStatus::BadKey => FetchStatus::BadKey,
            MobileFetchStatus::BadPayload => FetchStatus::BadPayload,
            MobileFetchStatus::Disabled => FetchStatus::Disabled,
            MobileFetchStatus::Other { name } => FetchStatus::Other(name),
        }
    }
}

/// Token fetch result reported by the platform SDK.
#[derive(Debug, Clone, uniffi::Record)]
pub struct MobileTokenResult {
    pub status: MobileFetchStatus,
    /// Empty unless status is Success
    pub token: String,
    pub attestation_record: Option<String>,
    pub rejection_reasons: Option<String>,
}

impl From<MobileTokenResult> for TokenFetchResult {
    fn from(result: MobileTokenResult) -> Self {
        TokenFetchResult {
            status: result.status.into(),
            token: result.token,
            attestation_record: result.attestation_record,
            rejection_reasons: result.rejection_reasons,
        }
    }
}

/// Secret fetch result reported by the platform SDK.
#[derive(Debug, Clone, uniffi::Record)]
pub struct MobileSecretResult {
    pub status: MobileFetchStatus,
    pub secret: Option<String>,
    pub attestation_record: Option<String>,
    pub rejection_reasons: Option<String>,
}

impl From<MobileSecretResult> for SecretFetchResult {
    fn from(result: MobileSecretResult) -> Self {
        SecretFetchResult {
            status: result.status.into(),
            secret: result.secret,
            attestation_record: result.attestation_record,
            rejection_reasons: result.rejection_reasons,
        }
    }
}

/// A single HTTP header.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct MobileHeader {
    pub name: String,
    pub value: String,
}

/// Mobile-friendly outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct MobileRequest {
    pub url: String,
    pub headers: Vec<MobileHeader>,
}

impl MobileRequest {
    /// Converts to the core request model. Fails on an unparsable URL.
    pub fn to_request(&self) -> Result<OutgoingRequest, MobileError> {
        let mut request = OutgoingRequest::parse(&self.url)
            .map_err(|e| MobileError::InvalidInput(e.to_string()))?;
        for header in &self.headers {
            request.append_header(header.name.as_str(), header.value.as_str());
        }
        Ok(request)
    }
}

impl From<&OutgoingRequest> for MobileRequest {
    fn from(request: &OutgoingRequest) -> Self {
        MobileRequest {
            url: request.url().to_string(),
            headers: request
                .headers()
                .iter()
                .map(|(name, value)| MobileHeader {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }
}

/// Failure category for a request that must not be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum MobileFailureKind {
    Initialization,
    Configuration,
    Pinning,
    Networking,
    Rejection,
    Permanent,
}

/// Why a request was stopped.
#[derive(Debug, Clone, uniffi::Record)]
pub struct MobileFailure {
    pub kind: MobileFailureKind,
    pub message: String,
    /// Set for rejections only
    pub attestation_record: Option<String>,
    /// Set for rejections only
    pub rejection_reasons: Option<String>,
}

impl From<ServiceError> for MobileFailure {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        let (kind, attestation_record, rejection_reasons) = match err {
            ServiceError::Initialization(_) => (MobileFailureKind::Initialization, None, None),
            ServiceError::Configuration(_) | ServiceError::InvalidPattern { .. } => {
                (MobileFailureKind::Configuration, None, None)
            }
            ServiceError::Pinning(_) => (MobileFailureKind::Pinning, None, None),
            ServiceError::Networking(_) => (MobileFailureKind::Networking, None, None),
            ServiceError::Rejection {
                attestation_record,
                rejection_reasons,
                ..
            } => (
                MobileFailureKind::Rejection,
                attestation_record,
                rejection_reasons,
            ),
            ServiceError::Permanent(_) => (MobileFailureKind::Permanent, None, None),
        };
        MobileFailure {
            kind,
            message,
            attestation_record,
            rejection_reasons,
        }
    }
}

/// Outcome of running a request through the pipeline.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum MobileDecision {
    /// Send this request
    Proceed { request: MobileRequest },
    /// Send the original request unchanged
    Ignore { request: MobileRequest },
    /// Oracle unreachable; retrying may succeed
    Retry { failure: MobileFailure },
    /// Do not send the request
    Fail { failure: MobileFailure },
}

impl From<Decision> for MobileDecision {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Proceed(request) => MobileDecision::Proceed {
                request: (&request).into(),
            },
            Decision::Ignore(request) => MobileDecision::Ignore {
                request: (&request).into(),
            },
            Decision::Retry(err) => MobileDecision::Retry {
                failure: err.into(),
            },
            Decision::Fail(err) => MobileDecision::Fail {
                failure: err.into(),
            },
        }
    }
}

/// Result of checking a certificate chain against the pins.
#[derive(Debug, Clone, uniffi::Record)]
pub struct MobilePinCheck {
    /// Whether the connection may proceed
    pub accepted: bool,
    /// Whether an active pin set applied to the host
    pub pinned: bool,
    /// Matching pin, if any
    pub matched_pin: Option<String>,
    /// Position of the matching certificate (0 = leaf)
    pub chain_index: Option<u32>,
    /// Error message if rejected
    pub error: String,
}
