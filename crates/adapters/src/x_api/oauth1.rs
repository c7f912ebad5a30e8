//! OAuth 1.0a request signing (HMAC-SHA1)
//!
//! Builds the `Authorization: OAuth ...` header for user-context requests.
//! Requests with a JSON body carry no body parameters in the signature base
//! string; only the oauth_* protocol parameters (and any query parameters)
//! are signed.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;
use rand::distr::Alphanumeric;
use secrecy::{ExposeSecret, SecretString};
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

// RFC 3986 unreserved characters stay literal, everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Signs requests with a consumer key pair and a user access token pair
pub struct OAuth1Signer {
    consumer_key: String,
    consumer_secret: SecretString,
    access_token: String,
    access_secret: SecretString,
}

impl OAuth1Signer {
    pub fn new(
        consumer_key: String,
        consumer_secret: SecretString,
        access_token: String,
        access_secret: SecretString,
    ) -> Self {
        Self {
            consumer_key,
            consumer_secret,
            access_token,
            access_secret,
        }
    }

    /// Build the `Authorization` header value for a request without signable
    /// body parameters (e.g. a JSON body)
    pub fn authorization_header(&self, http_method: &str, url: &str) -> String {
        let nonce: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
            .to_string();

        self.header_with(http_method, url, &nonce, &timestamp, &[])
    }

    fn header_with(
        &self,
        http_method: &str,
        url: &str,
        nonce: &str,
        timestamp: &str,
        extra_params: &[(&str, &str)],
    ) -> String {
        let oauth_params: Vec<(&str, &str)> = vec![
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let signature = self.sign(http_method, url, &oauth_params, extra_params);

        let mut header = String::from("OAuth ");
        for (i, (key, value)) in oauth_params
            .iter()
            .chain(std::iter::once(&("oauth_signature", signature.as_str())))
            .enumerate()
        {
            if i > 0 {
                header.push_str(", ");
            }
            header.push_str(&format!(
                "{}=\"{}\"",
                percent_encode(key),
                percent_encode(value)
            ));
        }
        header
    }

    fn sign(
        &self,
        http_method: &str,
        url: &str,
        oauth_params: &[(&str, &str)],
        extra_params: &[(&str, &str)],
    ) -> String {
        // Collect, encode, and sort every parameter by encoded key then value
        let mut pairs: Vec<(String, String)> = oauth_params
            .iter()
            .chain(extra_params.iter())
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .collect();
        pairs.sort();

        let parameter_string = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            http_method.to_uppercase(),
            percent_encode(url),
            percent_encode(&parameter_string)
        );

        let signing_key = format!(
            "{}&{}",
            percent_encode(self.consumer_secret.expose_secret()),
            percent_encode(self.access_secret.expose_secret())
        );

        let mut mac = Hmac::<Sha1>::new_from_slice(signing_key.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(base_string.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference signature from the X developer documentation on creating
    // OAuth 1.0a signatures.
    #[test]
    fn test_documented_signature_vector() {
        let signer = OAuth1Signer::new(
            "xvz1evFS4wEEPTGEFPHBog".to_string(),
            SecretString::new("kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".into()),
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
            SecretString::new("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".into()),
        );

        let oauth_params = [
            ("oauth_consumer_key", "xvz1evFS4wEEPTGEFPHBog"),
            ("oauth_nonce", "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "1318622958"),
            (
                "oauth_token",
                "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            ),
            ("oauth_version", "1.0"),
        ];
        let body_params = [
            ("include_entities", "true"),
            (
                "status",
                "Hello Ladies + Gentlemen, a signed OAuth request!",
            ),
        ];

        let signature = signer.sign(
            "POST",
            "https://api.twitter.com/1.1/statuses/update.json",
            &oauth_params,
            &body_params,
        );

        assert_eq!(signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn test_percent_encode_reserved() {
        assert_eq!(percent_encode("Hello Ladies + Gentlemen"), "Hello%20Ladies%20%2B%20Gentlemen");
        assert_eq!(percent_encode("a-b.c_d~e"), "a-b.c_d~e");
    }

    #[test]
    fn test_header_shape() {
        let signer = OAuth1Signer::new(
            "consumer-key".to_string(),
            SecretString::new("consumer-secret-value".into()),
            "access-token".to_string(),
            SecretString::new("access-secret-value".into()),
        );

        let header = signer.authorization_header("POST", "https://api.x.com/2/tweets");

        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_consumer_key=\"consumer-key\""));
        assert!(header.contains("oauth_token=\"access-token\""));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(header.contains("oauth_signature=\""));
        // Secrets never appear in the header
        assert!(!header.contains("consumer-secret-value"));
        assert!(!header.contains("access-secret-value"));
    }
}
