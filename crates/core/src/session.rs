//! Per-visitor shopping session.
//!
//! Pairs one cart with one checkout flow and enforces the rules that span
//! both: the cart is frozen while an order is in flight, and emptying the
//! cart during address entry sends the flow back to reviewing.

use serde::Serialize;

use crate::address::AddressField;
use crate::cart::{CartCommand, CartState};
use crate::checkout::{CheckoutError, CheckoutFlow, CheckoutStage, SubmissionOutcome, SubmissionTicket};
use crate::order::{OrderError, OrderReceipt};

/// Cart and checkout state for one shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShoppingSession {
    cart: CartState,
    checkout: CheckoutFlow,
}

impl ShoppingSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn cart(&self) -> &CartState {
        &self.cart
    }

    #[must_use]
    pub const fn checkout(&self) -> &CheckoutFlow {
        &self.checkout
    }

    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        self.checkout.stage()
    }

    /// Apply a cart command. Returns whether the cart changed.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::SubmissionInProgress`] while an order is in
    /// flight; the pending order was priced from the current lines.
    pub fn apply(&mut self, command: CartCommand) -> Result<bool, CheckoutError> {
        if self.checkout.is_submitting() {
            return Err(CheckoutError::SubmissionInProgress);
        }
        let changed = self.cart.apply(command);
        if self.cart.is_empty() && self.checkout.stage() == CheckoutStage::EnteringAddress {
            self.checkout.back()?;
        }
        Ok(changed)
    }

    /// Start checkout. Returns whether the stage changed.
    pub fn begin_checkout(&mut self) -> bool {
        self.checkout.begin(&self.cart)
    }

    /// Replace one address field.
    ///
    /// # Errors
    ///
    /// Fails unless checkout is collecting an address.
    pub fn update_address(
        &mut self,
        field: AddressField,
        value: impl Into<String>,
    ) -> Result<(), CheckoutError> {
        self.checkout.update_field(field, value)
    }

    /// Return to the cart view.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::SubmissionInProgress`] while an order is in flight.
    pub fn back(&mut self) -> Result<bool, CheckoutError> {
        self.checkout.back()
    }

    /// Validate the draft and start submitting.
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::submit`].
    pub fn submit(&mut self) -> Result<SubmissionTicket, CheckoutError> {
        self.checkout.submit(&self.cart)
    }

    /// Feed an order reply back in.
    pub fn resolve(
        &mut self,
        attempt: u64,
        reply: Result<OrderReceipt, OrderError>,
    ) -> SubmissionOutcome {
        self.checkout.resolve(attempt, reply, &mut self.cart)
    }
}
