//! Checkout step state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Screen-level position of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Choosing between card and Kaspi.
    Method,

    /// Entering card details.
    Details,

    /// Choosing QR or app within Kaspi.
    Kaspi,

    /// QR shown, waiting for the payer to scan.
    Qr,

    /// Charge in flight or waiting for gateway confirmation.
    Processing,

    Success,

    Error,
}

impl CheckoutStep {
    /// Steps during which the gateway is polled and the countdown runs.
    pub fn is_awaiting_payment(&self) -> bool {
        matches!(self, CheckoutStep::Qr | CheckoutStep::Processing)
    }
}

impl StateMachine for CheckoutStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CheckoutStep::*;
        matches!(
            (self, target),
            (Method, Details)
                | (Method, Kaspi)
                | (Details, Processing)
                | (Details, Method) // Back
                | (Kaspi, Qr)
                | (Kaspi, Processing) // Pay in app
                | (Kaspi, Method)
                | (Kaspi, Error) // Payment could not be created
                | (Qr, Success)
                | (Qr, Error)
                | (Qr, Method) // Cancel
                | (Processing, Success)
                | (Processing, Error)
                | (Processing, Method)
                | (Error, Method) // Retry
                | (Error, Details)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CheckoutStep::*;
        match self {
            Method => vec![Details, Kaspi],
            Details => vec![Processing, Method],
            Kaspi => vec![Qr, Processing, Method, Error],
            Qr => vec![Success, Error, Method],
            Processing => vec![Success, Error, Method],
            Success => vec![],
            Error => vec![Method, Details],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CheckoutStep; 7] = [
        CheckoutStep::Method,
        CheckoutStep::Details,
        CheckoutStep::Kaspi,
        CheckoutStep::Qr,
        CheckoutStep::Processing,
        CheckoutStep::Success,
        CheckoutStep::Error,
    ];

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn success_is_the_only_terminal_step() {
        let terminal: Vec<_> = ALL.iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![&CheckoutStep::Success]);
    }

    #[test]
    fn method_cannot_jump_to_processing() {
        assert!(CheckoutStep::Method.transition_to(CheckoutStep::Processing).is_err());
    }

    #[test]
    fn only_qr_and_processing_await_payment() {
        let awaiting: Vec<_> = ALL.iter().filter(|s| s.is_awaiting_payment()).collect();
        assert_eq!(awaiting, vec![&CheckoutStep::Qr, &CheckoutStep::Processing]);
    }
}
