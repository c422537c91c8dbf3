//! Wire messages for `promocode.v1.Promocodes`
//!
//! Timestamps travel as RFC 3339 strings. Zero in an optional numeric
//! field means "not set".

use crate::models::Promocode;
use chrono::{DateTime, Utc};
use error_types::{ServiceError, ServiceResult};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PromocodeMessage {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(int64, tag = "4")]
    pub creator_id: i64,
    #[prost(double, tag = "5")]
    pub discount: f64,
    #[prost(string, tag = "6")]
    pub code: String,
    #[prost(string, tag = "7")]
    pub created_at: String,
    #[prost(string, tag = "8")]
    pub updated_at: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreatePromocodeRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(int64, tag = "3")]
    pub creator_id: i64,
    #[prost(double, tag = "4")]
    pub discount: f64,
    #[prost(string, tag = "5")]
    pub code: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetPromocodeRequest {
    #[prost(int64, tag = "1")]
    pub id: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdatePromocodeRequest {
    #[prost(int64, tag = "1")]
    pub id: i64,
    /// Identity taken from the caller's token, never from the request body
    #[prost(int64, tag = "2")]
    pub requester_id: i64,
    #[prost(string, tag = "3")]
    pub name: String,
    #[prost(string, tag = "4")]
    pub description: String,
    #[prost(double, tag = "5")]
    pub discount: f64,
    #[prost(string, tag = "6")]
    pub code: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeletePromocodeRequest {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(int64, tag = "2")]
    pub requester_id: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListPromocodesRequest {
    #[prost(int64, tag = "1")]
    pub page: i64,
    #[prost(int64, tag = "2")]
    pub per_page: i64,
}

/// Shared by create, get, update and delete. For delete it carries the
/// pre-deletion snapshot.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PromocodeResponse {
    #[prost(message, optional, tag = "1")]
    pub promocode: Option<PromocodeMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListPromocodesResponse {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<PromocodeMessage>,
    #[prost(int64, tag = "2")]
    pub total: i64,
    #[prost(int64, tag = "3")]
    pub page: i64,
    #[prost(int64, tag = "4")]
    pub per_page: i64,
}

impl From<Promocode> for PromocodeMessage {
    fn from(p: Promocode) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            creator_id: p.creator_id,
            discount: p.discount,
            code: p.code,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

impl From<Promocode> for PromocodeResponse {
    fn from(p: Promocode) -> Self {
        Self {
            promocode: Some(p.into()),
        }
    }
}

fn parse_timestamp(field: &str, raw: &str) -> ServiceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| ServiceError::internal(anyhow::anyhow!("bad {field} from rpc: {e}")))
}

impl TryFrom<PromocodeMessage> for Promocode {
    type Error = ServiceError;

    fn try_from(msg: PromocodeMessage) -> ServiceResult<Self> {
        Ok(Self {
            created_at: parse_timestamp("created_at", &msg.created_at)?,
            updated_at: parse_timestamp("updated_at", &msg.updated_at)?,
            id: msg.id,
            name: msg.name,
            description: msg.description,
            creator_id: msg.creator_id,
            discount: msg.discount,
            code: msg.code,
        })
    }
}

impl TryFrom<PromocodeResponse> for Promocode {
    type Error = ServiceError;

    fn try_from(resp: PromocodeResponse) -> ServiceResult<Self> {
        resp.promocode
            .ok_or_else(|| ServiceError::internal(anyhow::anyhow!("rpc response without promocode")))?
            .try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_timestamps_are_rfc3339() {
        let created_at = DateTime::parse_from_rfc3339("2024-03-01T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let promocode = Promocode {
            id: 1,
            name: "Promo".into(),
            description: String::new(),
            creator_id: 9,
            discount: 12.5,
            code: "CODE123".into(),
            created_at,
            updated_at: created_at,
        };

        let msg = PromocodeMessage::from(promocode.clone());
        assert_eq!(msg.created_at, "2024-03-01T12:30:00+00:00");

        let bytes = PromocodeResponse::from(promocode.clone()).encode_to_vec();
        let decoded = PromocodeResponse::decode(bytes.as_slice()).unwrap();
        assert_eq!(Promocode::try_from(decoded).unwrap(), promocode);
    }

    #[test]
    fn test_empty_response_is_internal() {
        let err = Promocode::try_from(PromocodeResponse { promocode: None }).unwrap_err();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_garbled_timestamp_is_internal() {
        let msg = PromocodeMessage {
            created_at: "yesterday".into(),
            ..Default::default()
        };
        assert!(Promocode::try_from(msg).is_err());
    }
}
