// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Request Mutation Pipeline
//!
//! Every outgoing request runs through four steps, strictly in order:
//!
//! 1. **Exclusion check** - matching URLs are sent untouched ([`Decision::Ignore`]).
//! 2. **Token fetch** - the oracle issues a token for the URL, optionally
//!    bound to the hash of a binding header, and the token is attached.
//! 3. **Header substitution** - registered headers holding a placeholder
//!    (after their required prefix) get the oracle's secret instead.
//! 4. **Query substitution** - the first registered query parameter whose
//!    placeholder resolves is replaced, then scanning stops.
//!
//! Steps 3 and 4 only run after a successful token fetch or an explicitly
//! unprotected URL. Any failure ends the run immediately; the caller's
//! request is never modified in place.

use regex::Regex;
use ring::digest;
use url::Url;
use zeroize::Zeroizing;

use crate::context::AttestationContext;
use crate::error::{ServiceError, ServiceResult};
use crate::oracle::{FetchStatus, SecretFetchResult};
use crate::request::OutgoingRequest;

/// Outcome of running a request through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Send this (possibly mutated) request.
    Proceed(OutgoingRequest),
    /// Send the request unchanged; the URL is excluded.
    Ignore(OutgoingRequest),
    /// The oracle was unreachable; the user may retry.
    Retry(ServiceError),
    /// The request must not be sent.
    Fail(ServiceError),
}

impl Decision {
    /// The request to send, if any.
    pub fn request(&self) -> Option<&OutgoingRequest> {
        match self {
            Decision::Proceed(request) | Decision::Ignore(request) => Some(request),
            Decision::Retry(_) | Decision::Fail(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ServiceError> {
        match self {
            Decision::Retry(error) | Decision::Fail(error) => Some(error),
            Decision::Proceed(_) | Decision::Ignore(_) => None,
        }
    }

    /// Converts to the request to send or the error to report.
    pub fn into_result(self) -> ServiceResult<OutgoingRequest> {
        match self {
            Decision::Proceed(request) | Decision::Ignore(request) => Ok(request),
            Decision::Retry(error) | Decision::Fail(error) => Err(error),
        }
    }
}

enum Step<T> {
    Continue(T),
    Done(Decision),
}

/// SHA-256 of a binding value, as handed to the oracle.
pub fn binding_hash(value: &str) -> Vec<u8> {
    digest::digest(&digest::SHA256, value.as_bytes())
        .as_ref()
        .to_vec()
}

/// Runs requests through the pipeline against a context.
#[derive(Debug, Clone, Copy)]
pub struct RequestPipeline<'a> {
    ctx: &'a AttestationContext,
}

impl<'a> RequestPipeline<'a> {
    pub fn new(ctx: &'a AttestationContext) -> Self {
        RequestPipeline { ctx }
    }

    /// Produces exactly one decision for `request`. Blocks on oracle calls.
    pub fn run(&self, request: &OutgoingRequest) -> Decision {
        if self.ctx.is_excluded(request.url().as_str()) {
            tracing::debug!(host = request.host(), "request excluded");
            return Decision::Ignore(request.clone());
        }

        let (request, substitute) = match self.fetch_token(request.clone()) {
            Step::Continue(next) => next,
            Step::Done(decision) => return decision,
        };
        if !substitute || !self.ctx.is_initialized() {
            return Decision::Proceed(request);
        }

        let request = match self.substitute_headers(request) {
            Step::Continue(request) => request,
            Step::Done(decision) => return decision,
        };

        self.substitute_query(request)
    }

    fn fetch_token(&self, mut request: OutgoingRequest) -> Step<(OutgoingRequest, bool)> {
        let oracle = self.ctx.oracle();
        let settings = self.ctx.settings();

        if let Some(binding) = settings.binding_header() {
            if let Some(value) = request.header(&binding) {
                oracle.set_data_hash(&binding_hash(value));
            }
        }

        let result = oracle.fetch_token(request.url().as_str());
        tracing::info!(host = request.host(), status = %result.status, "token fetch");

        match result.status {
            FetchStatus::Success => {
                let header = settings.token_header();
                let token = Zeroizing::new(result.token);
                let mut value = Zeroizing::new(format!("{}{}", header.prefix, token.as_str()));
                request.set_secret_header(header.name, &mut value);
                self.ctx.refresh_pins();
                Step::Continue((request, true))
            }
            status if status.is_network_failure() => {
                if settings.proceed_on_network_failure() {
                    tracing::warn!(
                        host = request.host(),
                        %status,
                        "token fetch failed, proceeding without protection"
                    );
                    Step::Continue((request, false))
                } else {
                    Step::Done(Decision::Retry(ServiceError::Networking(status.to_string())))
                }
            }
            FetchStatus::UnprotectedUrl => Step::Continue((request, true)),
            FetchStatus::UnknownUrl | FetchStatus::NoService => Step::Continue((request, false)),
            status => Step::Done(Decision::Fail(ServiceError::Permanent(status.to_string()))),
        }
    }

    fn substitute_headers(&self, mut request: OutgoingRequest) -> Step<OutgoingRequest> {
        let proceed_on_failure = self.ctx.settings().proceed_on_network_failure();

        for (name, prefix) in self.ctx.substitutions().headers() {
            let value = match request.header(&name) {
                Some(value) => value.to_string(),
                None => continue,
            };
            let key = match value.strip_prefix(prefix.as_str()) {
                Some(key) if !key.is_empty() => key,
                _ => continue,
            };

            let result = self.ctx.oracle().fetch_secret(key, None);
            tracing::info!(header = %name, status = %result.status, "substituting header");

            let context = format!("header substitution for {}", name);
            match classify(result, &context, proceed_on_failure) {
                Substitution::Secret(secret) => {
                    let mut value = Zeroizing::new(format!("{}{}", prefix, secret.as_str()));
                    request.set_secret_header(name.as_str(), &mut value);
                }
                Substitution::Skip => continue,
                Substitution::Stop(error) => return Step::Done(Decision::Fail(error)),
            }
        }

        Step::Continue(request)
    }

    fn substitute_query(&self, mut request: OutgoingRequest) -> Decision {
        let proceed_on_failure = self.ctx.settings().proceed_on_network_failure();

        for name in self.ctx.substitutions().query_params() {
            let matcher = match query_matcher(&name) {
                Ok(matcher) => matcher,
                Err(e) => return Decision::Fail(e),
            };
            let url = request.url().as_str().to_string();

            for captures in matcher.captures_iter(&url) {
                let Some(placeholder) = captures.get(1) else {
                    continue;
                };

                let result = self.ctx.oracle().fetch_secret(placeholder.as_str(), None);
                tracing::info!(param = %name, status = %result.status, "substituting query parameter");

                let context = format!("query parameter substitution for {}", name);
                match classify(result, &context, proceed_on_failure) {
                    Substitution::Secret(secret) => {
                        let mut replaced = Zeroizing::new(String::with_capacity(url.len()));
                        replaced.push_str(&url[..placeholder.start()]);
                        replaced.push_str(secret.as_str());
                        replaced.push_str(&url[placeholder.end()..]);

                        return match Url::parse(replaced.as_str()) {
                            Ok(new_url) => {
                                request.set_url(new_url);
                                Decision::Proceed(request)
                            }
                            Err(e) => Decision::Fail(ServiceError::Permanent(format!(
                                "{}: malformed URL: {}",
                                context, e
                            ))),
                        };
                    }
                    Substitution::Skip => continue,
                    Substitution::Stop(error) => return Decision::Fail(error),
                }
            }
        }

        Decision::Proceed(request)
    }
}

/// Matches `name=value` in a query string, capturing the value.
fn query_matcher(name: &str) -> ServiceResult<Regex> {
    Regex::new(&format!(r"[?&]{}=([^&;]+)", regex::escape(name)))
        .map_err(|e| ServiceError::Permanent(format!("query matcher for {}: {}", name, e)))
}

enum Substitution {
    Secret(Zeroizing<String>),
    /// Leave this value unchanged and move on.
    Skip,
    Stop(ServiceError),
}

fn classify(result: SecretFetchResult, context: &str, proceed_on_failure: bool) -> Substitution {
    match result.status {
        FetchStatus::Success => match result.secret {
            Some(secret) => Substitution::Secret(Zeroizing::new(secret)),
            None => Substitution::Stop(ServiceError::Permanent(format!(
                "{}: key lookup error",
                context
            ))),
        },
        FetchStatus::Rejected => Substitution::Stop(ServiceError::Rejection {
            message: format!("{}: rejected", context),
            attestation_record: result.attestation_record,
            rejection_reasons: result.rejection_reasons,
        }),
        status if status.is_network_failure() => {
            if proceed_on_failure {
                tracing::warn!(%status, "{}: network issue, skipping", context);
                Substitution::Skip
            } else {
                Substitution::Stop(ServiceError::Networking(format!(
                    "{}: network issue, retry needed",
                    context
                )))
            }
        }
        FetchStatus::UnknownKey => Substitution::Skip,
        status => Substitution::Stop(ServiceError::Permanent(format!("{}: {}", context, status))),
    }
}
