// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates service IDs and endpoint URLs while parsing.

use serde::Deserialize;

use crate::types::{ServiceEndpoint, ServiceId};

pub fn deserialize_service_id<'de, D>(deserializer: D) -> Result<ServiceId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ServiceId::parse(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_service_id_option<'de, D>(
    deserializer: D,
) -> Result<Option<ServiceId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| ServiceId::parse(&s).map_err(serde::de::Error::custom))
        .transpose()
}

pub fn deserialize_endpoint_option<'de, D>(
    deserializer: D,
) -> Result<Option<ServiceEndpoint>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| ServiceEndpoint::parse(&s).map_err(serde::de::Error::custom))
        .transpose()
}
