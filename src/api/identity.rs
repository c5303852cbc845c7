// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the caller identity used by rate limiting.
//!
//! The identity is the first entry of `X-Forwarded-For`, or `"unknown"`
//! when the header is absent. The header is client-controlled and is not
//! validated, so a caller can choose its own rate-limit bucket. Deploy
//! behind a proxy that overwrites the header if that matters.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Identity reported when no forwarding header is present.
pub const UNKNOWN_IDENTITY: &str = "unknown";

pub struct ClientIdentity(pub String);

impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(UNKNOWN_IDENTITY);

        Ok(ClientIdentity(identity.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn identity_of(header: Option<&str>) -> String {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(FORWARDED_FOR_HEADER, value);
        }
        let (mut parts, _body) = builder.body(()).unwrap().into_parts();
        let ClientIdentity(identity) = ClientIdentity::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        identity
    }

    #[tokio::test]
    async fn uses_first_forwarded_entry() {
        assert_eq!(
            identity_of(Some("203.0.113.7, 10.0.0.1")).await,
            "203.0.113.7"
        );
    }

    #[tokio::test]
    async fn falls_back_to_unknown() {
        assert_eq!(identity_of(None).await, UNKNOWN_IDENTITY);
        assert_eq!(identity_of(Some("")).await, UNKNOWN_IDENTITY);
    }
}
