//! NTLM header construction for the three-leg challenge/response handshake.
//!
//! Message encoding and the challenge response itself are delegated to the
//! `ntlmclient` crate; this module only moves the messages in and out of
//! HTTP `Authorization` / `WWW-Authenticate` headers.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{HeaderMap, WWW_AUTHENTICATE};

use super::Credentials;
use crate::transfer::TransferError;

/// Workstation name reported in negotiate/authenticate messages.
const WORKSTATION: &str = "FILEFERRY";

/// Returns true when the server advertises NTLM in a 401 response.
pub(super) fn offers_ntlm(headers: &HeaderMap) -> bool {
    headers.get_all(WWW_AUTHENTICATE).iter().any(|value| {
        value
            .to_str()
            .map(|scheme| scheme.trim().starts_with("NTLM"))
            .unwrap_or(false)
    })
}

/// Extracts the base64-decoded challenge message from a 401 response, if the
/// server sent one.
pub(super) fn challenge_from_headers(headers: &HeaderMap) -> Option<Vec<u8>> {
    headers.get_all(WWW_AUTHENTICATE).iter().find_map(|value| {
        let payload = value.to_str().ok()?.trim().strip_prefix("NTLM ")?;
        BASE64.decode(payload.trim()).ok()
    })
}

/// Builds the `Authorization` header value for the negotiate (type 1) leg.
pub(super) fn negotiate_header() -> Result<String, TransferError> {
    let flags = ntlmclient::Flags::NEGOTIATE_UNICODE
        | ntlmclient::Flags::REQUEST_TARGET
        | ntlmclient::Flags::NEGOTIATE_NTLM
        | ntlmclient::Flags::NEGOTIATE_WORKSTATION_SUPPLIED;
    let message = ntlmclient::Message::Negotiate(ntlmclient::NegotiateMessage {
        flags,
        supplied_domain: String::new(),
        supplied_workstation: WORKSTATION.to_string(),
        os_version: Default::default(),
    });
    let bytes = message
        .to_bytes()
        .map_err(|error| TransferError::auth(format!("encoding negotiate message: {error:?}")))?;
    Ok(format!("NTLM {}", BASE64.encode(bytes)))
}

/// Builds the `Authorization` header value for the authenticate (type 3)
/// leg, answering the server's challenge with an NTLMv2 response.
pub(super) fn authenticate_header(
    credentials: &Credentials,
    challenge_bytes: &[u8],
) -> Result<String, TransferError> {
    let message = ntlmclient::Message::try_from(challenge_bytes)
        .map_err(|error| TransferError::auth(format!("decoding challenge message: {error:?}")))?;
    let ntlmclient::Message::Challenge(challenge) = message else {
        return Err(TransferError::auth(
            "server answered the negotiate leg with a non-challenge message",
        ));
    };
    let target_info: Vec<u8> = challenge
        .target_information
        .iter()
        .flat_map(|entry| entry.to_bytes())
        .collect();

    let creds = ntlmclient::Credentials {
        username: credentials.username.clone(),
        password: credentials.password.clone(),
        domain: credentials.domain.clone(),
    };
    let response = ntlmclient::respond_challenge_ntlm_v2(
        challenge.challenge,
        &target_info,
        ntlmclient::get_ntlm_time(),
        &creds,
    );

    let flags = ntlmclient::Flags::NEGOTIATE_UNICODE
        | ntlmclient::Flags::NEGOTIATE_NTLM
        | ntlmclient::Flags::NEGOTIATE_WORKSTATION_SUPPLIED;
    let bytes = response
        .to_message(&creds, WORKSTATION, flags)
        .to_bytes()
        .map_err(|error| {
            TransferError::auth(format!("encoding authenticate message: {error:?}"))
        })?;
    Ok(format!("NTLM {}", BASE64.encode(bytes)))
}
