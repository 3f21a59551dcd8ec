use crate::continuation::ContinuationState;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::marker::PhantomData;

/// Converts typed pagination state to and from an opaque, URL-safe string.
///
/// # Contract
/// - `encode(None)` is `None` (nothing left to fetch)
/// - `decode(None)` is `None` (first page)
/// - `decode(encode(Some(s)))` is `Some(s)`
/// - any string the encoder did not produce fails with [`ErrorKind::BadInput`]
///   and the error message echoes the offending string
pub trait ContinuationTokenEncoder<S: ContinuationState>: Send + Sync {
    fn encode(&self, state: Option<&S>) -> StoreResult<Option<String>>;

    fn decode(&self, token: Option<&str>) -> StoreResult<Option<S>>;
}

/// Reference encoder: compact JSON payload, base64url without padding.
///
/// The encoding is a pure function of the state, so tokens survive process
/// restarts. Decoding re-encodes the parsed state and requires the exact input
/// back, which rejects hand-built or tampered strings even when they happen to
/// parse.
pub struct Base64JsonEncoder<S> {
    _phantom: PhantomData<fn() -> S>,
}

impl<S> Base64JsonEncoder<S> {
    pub fn new() -> Self {
        Base64JsonEncoder {
            _phantom: PhantomData,
        }
    }
}

impl<S> Default for Base64JsonEncoder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for Base64JsonEncoder<S> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<S: ContinuationState> Base64JsonEncoder<S> {
    fn encode_state(&self, state: &S) -> StoreResult<String> {
        let payload = serde_json::to_vec(state)?;
        Ok(URL_SAFE_NO_PAD.encode(payload))
    }

    fn bad_token(token: &str, cause: Option<StoreError>) -> StoreError {
        let message = format!("Invalid continuation token '{}'", token);
        log::error!("{}", message);
        match cause {
            Some(cause) => StoreError::new_with_cause(&message, ErrorKind::BadInput, cause),
            None => StoreError::new(&message, ErrorKind::BadInput),
        }
    }
}

impl<S: ContinuationState> ContinuationTokenEncoder<S> for Base64JsonEncoder<S> {
    fn encode(&self, state: Option<&S>) -> StoreResult<Option<String>> {
        match state {
            Some(state) => self.encode_state(state).map(Some),
            None => Ok(None),
        }
    }

    fn decode(&self, token: Option<&str>) -> StoreResult<Option<S>> {
        let token = match token {
            Some(token) => token,
            None => return Ok(None),
        };

        let payload = URL_SAFE_NO_PAD
            .decode(token.as_bytes())
            .map_err(|e| Self::bad_token(token, Some(e.into())))?;
        let state: S = serde_json::from_slice(&payload)
            .map_err(|e| Self::bad_token(token, Some(e.into())))?;

        if !state.is_valid() {
            return Err(Self::bad_token(token, None));
        }
        if self.encode_state(&state)? != token {
            return Err(Self::bad_token(token, None));
        }
        Ok(Some(state))
    }
}
