//! Checkout domain - the payer-facing side of a purchase.
//!
//! Method selection, detail capture, waiting for confirmation, outcome.

mod card;
mod flow;
mod receipt;
mod step;

pub use card::{passes_luhn, CardDetails, TEST_CARD_NUMBERS};
pub use flow::{CheckoutError, CheckoutFlow, KaspiMode, DEFAULT_FAILURE_MESSAGE, TIMEOUT_MESSAGE};
pub use receipt::{PaymentMethod, PaymentReceipt};
pub use step::CheckoutStep;
