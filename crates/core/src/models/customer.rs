//! Customer service payloads.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{CustomerId, Email};

/// Body of `POST /customers/`.
///
/// The password is only exposed while serializing the request body; `Debug`
/// output redacts it.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewCustomer {
    pub email: Email,
    #[serde(
        serialize_with = "serialize_secret",
        deserialize_with = "deserialize_secret"
    )]
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub shipping_address: String,
}

/// Response of `POST /customers/` (HTTP 201).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCustomer {
    pub customer_id: CustomerId,
}

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn deserialize_secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}
