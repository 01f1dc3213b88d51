//! Kaspi QR API request and reply bodies.
//!
//! Replies carry `status: "success"` on success and a `message` otherwise.
//! Everything else is optional on the wire and checked when mapping to
//! port types.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::foundation::Timestamp;
use crate::domain::payment::{parse_gateway_time, PaymentStatus, QrCheckout};
use crate::ports::{CancellationAck, GatewayError, GatewayPaymentStatus};

pub(super) const SUCCESS: &str = "success";

/// Builds a request body: caller fields plus `merchant_id` and `timestamp`.
pub(super) fn request_body(
    merchant_id: &str,
    timestamp: Timestamp,
    fields: impl IntoIterator<Item = (&'static str, Value)>,
) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("merchant_id".to_string(), Value::from(merchant_id));
    for (key, value) in fields {
        body.insert(key.to_string(), value);
    }
    body.insert(
        "timestamp".to_string(),
        Value::from(timestamp.as_unix_millis()),
    );
    body
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct CreateReply {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub payment_id: Option<Value>,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub qr_image: Option<String>,
    #[serde(default)]
    pub deeplink: Option<String>,
    #[serde(default)]
    pub expires_at: Option<Value>,
}

impl CreateReply {
    pub fn into_checkout(self) -> Result<QrCheckout, GatewayError> {
        if self.status != SUCCESS {
            return Err(rejection(self.message, "Failed to create QR code"));
        }
        let gateway_payment_id = self
            .payment_id
            .as_ref()
            .and_then(id_string)
            .ok_or_else(|| GatewayError::invalid_response("Kaspi reply has no payment_id"))?;
        let qr_code = self
            .qr_code
            .filter(|q| !q.is_empty())
            .ok_or_else(|| GatewayError::invalid_response("Kaspi reply has no qr_code"))?;

        Ok(QrCheckout {
            gateway_payment_id,
            qr_code,
            qr_image: self.qr_image,
            deeplink: self.deeplink,
            expires_at: self.expires_at.as_ref().and_then(parse_gateway_time),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct StatusReply {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<Value>,
    #[serde(default)]
    pub paid_at: Option<Value>,
}

impl StatusReply {
    pub fn into_status(self) -> Result<GatewayPaymentStatus, GatewayError> {
        if self.status != SUCCESS {
            return Err(rejection(self.message, "Failed to check payment status"));
        }
        let raw = self
            .payment_status
            .ok_or_else(|| GatewayError::invalid_response("Kaspi reply has no payment_status"))?;
        let status: PaymentStatus = raw.parse().map_err(|_| {
            GatewayError::invalid_response(format!("Unknown payment status: {}", raw))
        })?;

        Ok(GatewayPaymentStatus {
            status,
            amount: self.amount.as_ref().and_then(amount),
            currency: self.currency,
            order_id: self.order_id,
            transaction_id: self.transaction_id.as_ref().and_then(id_string),
            paid_at: self.paid_at.as_ref().and_then(parse_gateway_time),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct CancelReply {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl CancelReply {
    pub fn into_ack(self) -> Result<CancellationAck, GatewayError> {
        if self.status != SUCCESS {
            return Err(rejection(self.message, "Failed to cancel payment"));
        }
        Ok(CancellationAck {
            message: self.message,
        })
    }
}

/// Body of a non-2xx reply, if Kaspi sent one.
#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct ErrorReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<Value>,
}

fn rejection(message: Option<String>, fallback: &str) -> GatewayError {
    let message = message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    GatewayError::rejected(message)
}

/// Ids arrive as strings or numbers.
pub(super) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn amount(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}
