//! Fixed RSA keys and token signing, shared by the unit tests and the HTTP tests.
//!
//! The including module brings `Audience` and `Claims` into scope.
#![allow(dead_code)]

use std::collections::BTreeSet;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use super::{Audience, Claims};

pub const SIGNING_KEY_PEM: &str = include_str!("../fixtures/signing_key.pem");
pub const ROGUE_KEY_PEM: &str = include_str!("../fixtures/rogue_key.pem");
pub const JWKS_JSON: &str = include_str!("../fixtures/jwks.json");
pub const ROGUE_JWKS_JSON: &str = include_str!("../fixtures/rogue_jwks.json");

pub const KID: &str = "test-signing-key";
pub const ROGUE_KID: &str = "rogue-key";
pub const DOMAIN: &str = "coffee.test";
pub const AUDIENCE: &str = "coffee-shop";

pub fn claims(permissions: Option<&[&str]>) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        iss: format!("https://{DOMAIN}/"),
        aud: Audience::Single(AUDIENCE.to_string()),
        sub: "auth0|barista".to_string(),
        exp: now + 3600,
        iat: Some(now),
        permissions: permissions
            .map(|granted| granted.iter().map(|p| p.to_string()).collect::<BTreeSet<_>>()),
    }
}

pub fn sign_with(claims: &Claims, kid: Option<&str>, private_pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(private_pem.as_bytes()).expect("encoding key");
    encode(&header, claims, &key).expect("sign token")
}

pub fn sign(claims: &Claims) -> String {
    sign_with(claims, Some(KID), SIGNING_KEY_PEM)
}

pub fn token(permissions: &[&str]) -> String {
    sign(&claims(Some(permissions)))
}
