//! CreatePaymentHandler - Command handler for starting a Kaspi QR payment.

use std::sync::Arc;

use crate::domain::foundation::{ClientId, Email, OrderId, PaymentId, PhoneNumber, ValidationError};
use crate::domain::payment::{PackageCatalog, Payer, Payment, PaymentError};
use crate::ports::{CreateQrPaymentRequest, PaymentGateway, PaymentRepository};

/// Command to buy a training package.
#[derive(Debug, Clone, Default)]
pub struct CreatePaymentCommand {
    pub package_id: String,
    pub client_id: String,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub client_email: Option<String>,
}

impl CreatePaymentCommand {
    /// Checks the payer fields. Blank optional contacts count as absent.
    pub fn validate_payer(&self) -> Result<Payer, ValidationError> {
        if self.package_id.trim().is_empty() {
            return Err(ValidationError::empty_field("package_id"));
        }
        let client_id = ClientId::new(self.client_id.clone())?;
        let name = self.client_name.trim();
        if name.is_empty() {
            return Err(ValidationError::empty_field("client_name"));
        }
        let phone = non_blank(&self.client_phone)
            .map(PhoneNumber::parse)
            .transpose()?;
        let email = non_blank(&self.client_email).map(Email::parse).transpose()?;

        Ok(Payer {
            client_id,
            name: name.to_string(),
            phone,
            email,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Handler for creating payments.
///
/// The gateway is asked for a QR session first; the payment is stored only
/// once the gateway accepted it.
pub struct CreatePaymentHandler {
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    catalog: Arc<PackageCatalog>,
}

impl CreatePaymentHandler {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        catalog: Arc<PackageCatalog>,
    ) -> Self {
        Self {
            payments,
            gateway,
            catalog,
        }
    }

    pub async fn handle(&self, cmd: CreatePaymentCommand) -> Result<Payment, PaymentError> {
        // 1. Validate payer
        let payer = cmd.validate_payer()?;

        // 2. Resolve package
        let package = self
            .catalog
            .find(cmd.package_id.trim())
            .cloned()
            .ok_or_else(|| PaymentError::package_not_found(cmd.package_id.trim()))?;

        // 3. Ask Kaspi for a QR session
        let order_id = OrderId::generate();
        let checkout = self
            .gateway
            .create_qr_payment(CreateQrPaymentRequest {
                amount: package.price,
                currency: package.currency.clone(),
                order_id: order_id.clone(),
                description: package.payment_description(),
                client_id: payer.client_id.clone(),
            })
            .await
            .map_err(|e| PaymentError::gateway(e.message))?;

        // 4. Persist pending payment
        let payment = Payment::create_pending(PaymentId::new(), order_id, package, payer, checkout);
        self.payments.save(&payment).await?;

        tracing::info!(
            payment_id = %payment.id,
            order_id = %payment.order_id,
            package_id = %payment.package.id,
            client_id = %payment.payer.client_id,
            amount = payment.amount,
            "Payment created"
        );

        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::kaspi::MockPaymentGateway;
    use crate::adapters::memory::InMemoryPaymentRepository;
    use crate::domain::payment::PaymentStatus;
    use crate::ports::GatewayError;

    struct Fixture {
        payments: Arc<InMemoryPaymentRepository>,
        gateway: Arc<MockPaymentGateway>,
        handler: CreatePaymentHandler,
    }

    fn fixture() -> Fixture {
        let payments = Arc::new(InMemoryPaymentRepository::new());
        let gateway = Arc::new(MockPaymentGateway::new());
        let handler = CreatePaymentHandler::new(
            payments.clone(),
            gateway.clone(),
            Arc::new(PackageCatalog::standard().clone()),
        );
        Fixture {
            payments,
            gateway,
            handler,
        }
    }

    fn command(package_id: &str) -> CreatePaymentCommand {
        CreatePaymentCommand {
            package_id: package_id.to_string(),
            client_id: "client-1".to_string(),
            client_name: "Aigerim".to_string(),
            client_phone: Some("+7 701 234 56 78".to_string()),
            client_email: Some("aigerim@example.kz".to_string()),
        }
    }

    #[tokio::test]
    async fn creates_pending_payment_for_basic_package() {
        let f = fixture();

        let payment = f.handler.handle(command("basic")).await.unwrap();

        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.amount, 15_000);
        assert_eq!(payment.currency, "KZT");
        assert_eq!(payment.gateway_payment_id, "kaspi_1");
        assert!(payment.order_id.as_str().starts_with("order_"));
        assert_eq!(f.payments.find_by_id(&payment.id).await.unwrap(), Some(payment));
    }

    #[tokio::test]
    async fn gateway_receives_package_description_and_amount() {
        let f = fixture();

        let payment = f.handler.handle(command("premium")).await.unwrap();

        let requests = f.gateway.create_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount, 35_000);
        assert_eq!(requests[0].order_id, payment.order_id);
        assert_eq!(
            requests[0].description,
            "Payment: Premium package - 12 sessions per month + personal nutrition plan"
        );
    }

    #[tokio::test]
    async fn unknown_package_is_not_found() {
        let f = fixture();

        let err = f.handler.handle(command("gold")).await.unwrap_err();

        assert_eq!(err, PaymentError::package_not_found("gold"));
        assert!(!f.gateway.was_called("create_qr_payment"));
    }

    #[tokio::test]
    async fn gateway_failure_stores_nothing() {
        let f = fixture();
        f.gateway
            .set_method_error("create_qr_payment", GatewayError::rejected("Merchant blocked"));

        let err = f.handler.handle(command("basic")).await.unwrap_err();

        assert_eq!(err, PaymentError::gateway("Merchant blocked"));
        assert!(f.payments.is_empty().await);
    }

    #[tokio::test]
    async fn missing_client_name_is_rejected() {
        let f = fixture();
        let cmd = CreatePaymentCommand {
            client_name: "  ".to_string(),
            ..command("basic")
        };

        let err = f.handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, PaymentError::ValidationFailed { ref field, .. } if field == "client_name"));
    }

    #[tokio::test]
    async fn malformed_contacts_are_rejected() {
        let f = fixture();
        let bad_phone = CreatePaymentCommand {
            client_phone: Some("12-34".to_string()),
            ..command("basic")
        };
        let bad_email = CreatePaymentCommand {
            client_email: Some("not-an-email".to_string()),
            ..command("basic")
        };

        assert!(matches!(
            f.handler.handle(bad_phone).await,
            Err(PaymentError::ValidationFailed { .. })
        ));
        assert!(matches!(
            f.handler.handle(bad_email).await,
            Err(PaymentError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn blank_optional_contacts_are_absent() {
        let cmd = CreatePaymentCommand {
            client_phone: Some(String::new()),
            client_email: Some("   ".to_string()),
            ..command("basic")
        };

        let payer = cmd.validate_payer().unwrap();

        assert!(payer.phone.is_none());
        assert!(payer.email.is_none());
    }
}
