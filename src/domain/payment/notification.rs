//! Status notification pushed by Kaspi to the webhook endpoint.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::foundation::Timestamp;

use super::status::UnknownPaymentStatus;
use super::PaymentStatus;

/// Body of a Kaspi webhook call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KaspiNotification {
    /// Gateway-side payment id (not ours).
    pub payment_id: String,
    pub status: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_gateway_time")]
    pub paid_at: Option<Timestamp>,
}

impl KaspiNotification {
    pub fn reported_status(&self) -> Result<PaymentStatus, UnknownPaymentStatus> {
        self.status.parse()
    }
}

/// Accepts either an RFC 3339 string or epoch milliseconds.
///
/// Anything else is treated as absent rather than failing the whole body.
pub fn deserialize_gateway_time<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_gateway_time))
}

pub fn parse_gateway_time(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => Timestamp::parse_rfc3339(s)
            .or_else(|| s.parse::<i64>().ok().and_then(Timestamp::from_unix_millis)),
        Value::Number(n) => n.as_i64().and_then(Timestamp::from_unix_millis),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_notification() {
        let body = json!({
            "payment_id": "kaspi-77",
            "status": "completed",
            "order_id": "order_1",
            "transaction_id": "txn-1",
            "paid_at": "2024-05-01T12:00:00Z",
            "signature": "abc"
        });

        let notification: KaspiNotification = serde_json::from_value(body).unwrap();

        assert_eq!(notification.payment_id, "kaspi-77");
        assert_eq!(notification.reported_status(), Ok(PaymentStatus::Completed));
        assert_eq!(notification.transaction_id.as_deref(), Some("txn-1"));
        assert_eq!(
            notification.paid_at,
            Timestamp::parse_rfc3339("2024-05-01T12:00:00Z")
        );
    }

    #[test]
    fn optional_fields_may_be_missing() {
        let body = json!({"payment_id": "kaspi-1", "status": "failed"});
        let notification: KaspiNotification = serde_json::from_value(body).unwrap();

        assert!(notification.order_id.is_none());
        assert!(notification.paid_at.is_none());
    }

    #[test]
    fn paid_at_accepts_epoch_millis() {
        let body = json!({"payment_id": "k", "status": "completed", "paid_at": 1714564800000i64});
        let notification: KaspiNotification = serde_json::from_value(body).unwrap();
        assert_eq!(
            notification.paid_at,
            Timestamp::parse_rfc3339("2024-05-01T12:00:00Z")
        );
    }

    #[test]
    fn unparseable_paid_at_is_dropped() {
        let body = json!({"payment_id": "k", "status": "completed", "paid_at": "soon"});
        let notification: KaspiNotification = serde_json::from_value(body).unwrap();
        assert!(notification.paid_at.is_none());
    }
}
