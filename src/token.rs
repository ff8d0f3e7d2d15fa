use crate::payload::Payload;
use anyhow::{Context, Result, anyhow, bail};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Turns collected claims into a serialized token.
pub trait TokenEncoder {
    fn encode(&self, payload: &Payload) -> Result<String>;
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// JWT with `alg: none` and an empty signature segment.
///
/// Anyone can forge or alter these tokens. They are meant for local testing
/// against services configured to accept unsigned tokens, nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsecuredJwt;

impl UnsecuredJwt {
    /// Read the claims back out of an unsigned token.
    ///
    /// Only string claims are accepted, matching what the prompt can produce.
    pub fn decode(token: &str) -> Result<Payload> {
        let mut segments = token.trim().split('.');
        let (Some(header), Some(claims), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            bail!("token must have exactly three dot-separated segments");
        };
        if !signature.is_empty() {
            bail!("token carries a signature; only unsigned tokens can be decoded");
        }

        let header: Header = serde_json::from_slice(&decode_segment(header, "header")?)
            .context("header is not a JOSE header")?;
        if header.alg != "none" {
            bail!("unsupported algorithm {:?}, expected \"none\"", header.alg);
        }

        let claims: serde_json::Map<String, serde_json::Value> =
            serde_json::from_slice(&decode_segment(claims, "claims")?)
                .context("claims are not a JSON object")?;

        claims
            .into_iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => Ok((key, s)),
                other => Err(anyhow!("claim {key:?} is not a string: {other}")),
            })
            .collect::<Result<Vec<_>>>()
            .map(|pairs| pairs.into_iter().collect())
    }
}

impl TokenEncoder for UnsecuredJwt {
    fn encode(&self, payload: &Payload) -> Result<String> {
        let header = Header {
            alg: "none".to_string(),
            typ: Some("JWT".to_string()),
        };
        let header = serde_json::to_vec(&header).context("serializing JWT header")?;
        let claims = serde_json::to_vec(payload).context("serializing JWT claims")?;
        Ok(format!(
            "{}.{}.",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(claims)
        ))
    }
}

fn decode_segment(segment: &str, what: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .with_context(|| format!("{what} segment is not base64url"))
}
