//! Checkout state machine.
//!
//! ```text
//! Reviewing --begin (cart non-empty)--> EnteringAddress
//! EnteringAddress --back--> Reviewing
//! EnteringAddress --submit (valid)--> Submitting{attempt}
//! Submitting --resolve(attempt, Ok)--> Reviewing      (cart cleared)
//! Submitting --resolve(attempt, Err)--> EnteringAddress (draft kept)
//! ```
//!
//! `Submitting` carries the attempt number handed out in the
//! [`SubmissionTicket`]; a reply for any other attempt is reported as
//! [`SubmissionOutcome::Stale`] and ignored.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::address::{AddressError, AddressField, DeliveryAddress};
use crate::cart::{CartLine, CartState};
use crate::order::{OrderConfirmation, OrderError, OrderReceipt};

/// Coarse checkout stage, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    Reviewing,
    EnteringAddress,
    Submitting,
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reviewing => write!(f, "reviewing"),
            Self::EnteringAddress => write!(f, "entering_address"),
            Self::Submitting => write!(f, "submitting"),
        }
    }
}

/// Errors returned by checkout transitions.
///
/// None of these change state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),

    #[error("cart is empty")]
    EmptyCart,

    #[error("an order is already being submitted")]
    SubmissionInProgress,

    #[error("checkout is not collecting an address (stage: {0})")]
    NotEnteringAddress(CheckoutStage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum FlowState {
    #[default]
    Reviewing,
    EnteringAddress,
    Submitting {
        attempt: u64,
    },
}

/// Everything needed to place one order, captured when submission starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    attempt: u64,
    address: DeliveryAddress,
    lines: Vec<CartLine>,
}

impl SubmissionTicket {
    #[must_use]
    pub const fn attempt(&self) -> u64 {
        self.attempt
    }

    /// The validated, trimmed address.
    #[must_use]
    pub const fn address(&self) -> &DeliveryAddress {
        &self.address
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }
}

/// Result of feeding an order reply back into the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Order placed; the cart was cleared.
    Confirmed(OrderConfirmation),
    /// Order not placed; back to address entry with the draft intact.
    Failed(OrderError),
    /// Reply for an attempt that is no longer in flight. Nothing changed.
    Stale,
}

/// Checkout flow for one shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutFlow {
    state: FlowState,
    draft: DeliveryAddress,
    attempts: u64,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        match self.state {
            FlowState::Reviewing => CheckoutStage::Reviewing,
            FlowState::EnteringAddress => CheckoutStage::EnteringAddress,
            FlowState::Submitting { .. } => CheckoutStage::Submitting,
        }
    }

    /// Current address draft. Kept across back-navigation and orders.
    #[must_use]
    pub const fn draft(&self) -> &DeliveryAddress {
        &self.draft
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.state, FlowState::Submitting { .. })
    }

    /// Move from reviewing to address entry. Returns whether the stage changed.
    ///
    /// An empty cart, or any stage other than `Reviewing`, leaves the flow as is.
    pub fn begin(&mut self, cart: &CartState) -> bool {
        if self.state != FlowState::Reviewing || cart.is_empty() {
            return false;
        }
        self.state = FlowState::EnteringAddress;
        true
    }

    /// Replace one draft field.
    ///
    /// # Errors
    ///
    /// Fails unless the flow is entering an address.
    pub fn update_field(
        &mut self,
        field: AddressField,
        value: impl Into<String>,
    ) -> Result<(), CheckoutError> {
        self.ensure_entering_address()?;
        self.draft.set(field, value);
        Ok(())
    }

    /// Return to reviewing. Returns whether the stage changed.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::SubmissionInProgress`] while an order is in flight.
    pub fn back(&mut self) -> Result<bool, CheckoutError> {
        match self.state {
            FlowState::Reviewing => Ok(false),
            FlowState::EnteringAddress => {
                self.state = FlowState::Reviewing;
                Ok(true)
            }
            FlowState::Submitting { .. } => Err(CheckoutError::SubmissionInProgress),
        }
    }

    /// Validate the draft and start submitting.
    ///
    /// On success the flow is `Submitting` and the returned ticket carries the
    /// trimmed address and a snapshot of the cart lines.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::SubmissionInProgress`] if an order is already in flight
    /// - [`CheckoutError::NotEnteringAddress`] from `Reviewing`
    /// - [`CheckoutError::EmptyCart`] if there is nothing to order
    /// - [`CheckoutError::InvalidAddress`] if any field is blank
    pub fn submit(&mut self, cart: &CartState) -> Result<SubmissionTicket, CheckoutError> {
        self.ensure_entering_address()?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let address = self.draft.validate()?;

        self.attempts += 1;
        let attempt = self.attempts;
        self.state = FlowState::Submitting { attempt };

        Ok(SubmissionTicket {
            attempt,
            address,
            lines: cart.lines().to_vec(),
        })
    }

    /// Apply the order service's reply for `attempt`.
    ///
    /// Success clears `cart` and returns to reviewing; failure returns to
    /// address entry. A reply for an attempt that is not in flight is stale.
    pub fn resolve(
        &mut self,
        attempt: u64,
        reply: Result<OrderReceipt, OrderError>,
        cart: &mut CartState,
    ) -> SubmissionOutcome {
        if self.state != (FlowState::Submitting { attempt }) {
            return SubmissionOutcome::Stale;
        }

        match reply.and_then(OrderReceipt::into_confirmation) {
            Ok(confirmation) => {
                cart.clear();
                self.state = FlowState::Reviewing;
                SubmissionOutcome::Confirmed(confirmation)
            }
            Err(error) => {
                self.state = FlowState::EnteringAddress;
                SubmissionOutcome::Failed(error)
            }
        }
    }

    fn ensure_entering_address(&self) -> Result<(), CheckoutError> {
        match self.state {
            FlowState::EnteringAddress => Ok(()),
            FlowState::Submitting { .. } => Err(CheckoutError::SubmissionInProgress),
            FlowState::Reviewing => Err(CheckoutError::NotEnteringAddress(
                CheckoutStage::Reviewing,
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::catalog::Product;
    use crate::types::{OrderId, Price, ProductCategory, ProductId};

    fn cart_with_one_item() -> CartState {
        let mut cart = CartState::new();
        cart.add_item(Product {
            id: ProductId::new("1"),
            name: "Premium Garden Tools Set".to_owned(),
            description: String::new(),
            price: Price::from_cents(8999),
            image: String::new(),
            category: ProductCategory::Tools,
            stock: 50,
        });
        cart
    }

    fn fill(flow: &mut CheckoutFlow) {
        for field in AddressField::ALL {
            flow.update_field(field, format!("{} value", field.key()))
                .unwrap();
        }
    }

    fn ok_receipt() -> Result<OrderReceipt, OrderError> {
        Ok(OrderReceipt {
            success: true,
            order_id: OrderId::new("abc123"),
            message: "Order placed successfully!".to_owned(),
        })
    }

    #[test]
    fn test_begin_requires_items() {
        let mut flow = CheckoutFlow::new();
        assert!(!flow.begin(&CartState::new()));
        assert_eq!(flow.stage(), CheckoutStage::Reviewing);

        assert!(flow.begin(&cart_with_one_item()));
        assert_eq!(flow.stage(), CheckoutStage::EnteringAddress);
    }

    #[test]
    fn test_update_field_outside_address_entry_fails() {
        let mut flow = CheckoutFlow::new();
        assert_eq!(
            flow.update_field(AddressField::City, "x"),
            Err(CheckoutError::NotEnteringAddress(CheckoutStage::Reviewing))
        );
    }

    #[test]
    fn test_back_keeps_draft() {
        let cart = cart_with_one_item();
        let mut flow = CheckoutFlow::new();
        flow.begin(&cart);
        flow.update_field(AddressField::City, "Agritown").unwrap();

        assert!(flow.back().unwrap());
        assert_eq!(flow.stage(), CheckoutStage::Reviewing);

        flow.begin(&cart);
        assert_eq!(flow.draft().city, "Agritown");
    }

    #[test]
    fn test_submit_with_missing_fields_keeps_state() {
        let cart = cart_with_one_item();
        let mut flow = CheckoutFlow::new();
        flow.begin(&cart);
        flow.update_field(AddressField::FullName, "Asha").unwrap();

        let err = flow.submit(&cart).unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidAddress(_)));
        assert_eq!(flow.stage(), CheckoutStage::EnteringAddress);
    }

    #[test]
    fn test_submit_from_reviewing_fails() {
        let cart = cart_with_one_item();
        let mut flow = CheckoutFlow::new();
        assert!(matches!(
            flow.submit(&cart),
            Err(CheckoutError::NotEnteringAddress(_))
        ));
    }

    #[test]
    fn test_submit_is_single_flight() {
        let cart = cart_with_one_item();
        let mut flow = CheckoutFlow::new();
        flow.begin(&cart);
        fill(&mut flow);

        let ticket = flow.submit(&cart).unwrap();
        assert_eq!(ticket.attempt(), 1);
        assert_eq!(ticket.lines().len(), 1);
        assert_eq!(flow.stage(), CheckoutStage::Submitting);

        assert_eq!(flow.submit(&cart), Err(CheckoutError::SubmissionInProgress));
        assert_eq!(flow.back(), Err(CheckoutError::SubmissionInProgress));
        assert_eq!(
            flow.update_field(AddressField::City, "x"),
            Err(CheckoutError::SubmissionInProgress)
        );
    }

    #[test]
    fn test_success_clears_cart_and_returns_to_reviewing() {
        let mut cart = cart_with_one_item();
        let mut flow = CheckoutFlow::new();
        flow.begin(&cart);
        fill(&mut flow);
        let ticket = flow.submit(&cart).unwrap();

        let outcome = flow.resolve(ticket.attempt(), ok_receipt(), &mut cart);
        assert!(matches!(outcome, SubmissionOutcome::Confirmed(c) if c.order_id.as_str() == "abc123"));
        assert!(cart.is_empty());
        assert_eq!(flow.stage(), CheckoutStage::Reviewing);
    }

    #[test]
    fn test_failure_returns_to_address_entry_with_draft() {
        let mut cart = cart_with_one_item();
        let mut flow = CheckoutFlow::new();
        flow.begin(&cart);
        fill(&mut flow);
        let draft = flow.draft().clone();
        let ticket = flow.submit(&cart).unwrap();

        let outcome = flow.resolve(
            ticket.attempt(),
            Err(OrderError::TimedOut(Duration::from_secs(10))),
            &mut cart,
        );
        assert!(matches!(outcome, SubmissionOutcome::Failed(OrderError::TimedOut(_))));
        assert_eq!(flow.stage(), CheckoutStage::EnteringAddress);
        assert_eq!(flow.draft(), &draft);
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_rejected_receipt_is_failure() {
        let mut cart = cart_with_one_item();
        let mut flow = CheckoutFlow::new();
        flow.begin(&cart);
        fill(&mut flow);
        let ticket = flow.submit(&cart).unwrap();

        let reply = Ok(OrderReceipt {
            success: false,
            order_id: OrderId::new(""),
            message: "declined".to_owned(),
        });
        let outcome = flow.resolve(ticket.attempt(), reply, &mut cart);
        assert_eq!(
            outcome,
            SubmissionOutcome::Failed(OrderError::Rejected("declined".to_owned()))
        );
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_stale_reply_is_ignored() {
        let mut cart = cart_with_one_item();
        let mut flow = CheckoutFlow::new();
        flow.begin(&cart);
        fill(&mut flow);

        // First attempt fails, second is in flight.
        let first = flow.submit(&cart).unwrap();
        flow.resolve(first.attempt(), Err(OrderError::Unavailable("down".into())), &mut cart);
        let second = flow.submit(&cart).unwrap();

        // A late duplicate reply for the first attempt must not apply.
        let outcome = flow.resolve(first.attempt(), ok_receipt(), &mut cart);
        assert_eq!(outcome, SubmissionOutcome::Stale);
        assert_eq!(flow.stage(), CheckoutStage::Submitting);
        assert!(!cart.is_empty());

        assert!(matches!(
            flow.resolve(second.attempt(), ok_receipt(), &mut cart),
            SubmissionOutcome::Confirmed(_)
        ));
    }

    #[test]
    fn test_ticket_address_is_trimmed() {
        let cart = cart_with_one_item();
        let mut flow = CheckoutFlow::new();
        flow.begin(&cart);
        fill(&mut flow);
        flow.update_field(AddressField::FullName, "  Asha  ").unwrap();

        let ticket = flow.submit(&cart).unwrap();
        assert_eq!(ticket.address().full_name, "Asha");
    }
}
