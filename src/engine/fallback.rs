/// Fallback coordination for a single checkout session.
///
/// Tracks the shopper's selected channel across health updates. When the
/// selected channel stops being online, the coordinator proposes the
/// best-scored online replacement and waits for the shopper to confirm or
/// decline. It never switches channels on its own.
use std::cell::RefCell;

use tracing::{debug, info, warn};

use crate::config::ScoringWeights;
use crate::engine::health::find_method;
use crate::engine::scoring::{calculate_fee, get_best_online_method};
use crate::errors::{CheckoutError, Result};
use crate::models::checkout::{CheckoutPhase, FallbackSuggestion, Toast, ToastKind};
use crate::models::payment::{PaymentCategory, PaymentMethod};

/// Sink for user-facing notifications.
pub trait Notifier {
    fn show_toast(&self, message: &str, kind: ToastKind);
}

impl<F: Fn(&str, ToastKind)> Notifier for F {
    fn show_toast(&self, message: &str, kind: ToastKind) {
        self(message, kind)
    }
}

/// Forwards toasts to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_toast(&self, message: &str, kind: ToastKind) {
        match kind {
            ToastKind::Success => info!(toast = message, "checkout notification"),
            ToastKind::Error => warn!(toast = message, "checkout notification"),
        }
    }
}

/// Keeps every toast so it can be returned to the caller.
#[derive(Debug, Default)]
pub struct ToastLog {
    toasts: RefCell<Vec<Toast>>,
}

impl ToastLog {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.borrow().clone()
    }

    pub fn into_toasts(self) -> Vec<Toast> {
        self.toasts.into_inner()
    }
}

impl Notifier for ToastLog {
    fn show_toast(&self, message: &str, kind: ToastKind) {
        TracingNotifier.show_toast(message, kind);
        self.toasts.borrow_mut().push(Toast {
            message: message.to_string(),
            kind,
        });
    }
}

/// Channel selection state machine for one checkout session.
///
/// The caller owns the category list and must call
/// [`on_candidates_changed`](Self::on_candidates_changed) after every health
/// update. The coordinator only reads the list.
pub struct FallbackCoordinator<N: Notifier> {
    weights: ScoringWeights,
    notifier: N,
    phase: CheckoutPhase,
    selected: Option<PaymentMethod>,
    suggestion: Option<FallbackSuggestion>,
    recommended: Option<PaymentMethod>,
    picker_open: bool,
}

impl<N: Notifier> FallbackCoordinator<N> {
    pub fn new(weights: ScoringWeights, notifier: N) -> Self {
        FallbackCoordinator {
            weights,
            notifier,
            phase: CheckoutPhase::Idle,
            selected: None,
            suggestion: None,
            recommended: None,
            picker_open: false,
        }
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Selected channel as of the last evaluation.
    pub fn selected(&self) -> Option<&PaymentMethod> {
        self.selected.as_ref()
    }

    pub fn suggestion(&self) -> Option<&FallbackSuggestion> {
        self.suggestion.as_ref()
    }

    /// Channel the picker marks as recommended while nothing is selected.
    pub fn recommended(&self) -> Option<&PaymentMethod> {
        self.recommended.as_ref()
    }

    /// True after a declined fallback, until the shopper picks a channel.
    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn into_notifier(self) -> N {
        self.notifier
    }

    /// The shopper picked a channel from the list.
    ///
    /// Only online channels can be picked. A pending suggestion is dropped.
    pub fn select_method(
        &mut self,
        method_id: &str,
        categories: &[PaymentCategory],
        subtotal: u64,
    ) -> Result<CheckoutPhase> {
        let method = find_method(categories, method_id)
            .ok_or_else(|| CheckoutError::UnknownMethod(method_id.to_string()))?;
        if !method.is_online() {
            return Err(CheckoutError::MethodUnavailable {
                method_id: method.id.clone(),
                status: method.status,
            });
        }

        debug!(method_id, "channel selected");
        self.selected = Some(method.clone());
        self.suggestion = None;
        self.picker_open = false;
        Ok(self.on_selection_changed(categories, subtotal))
    }

    /// Resume a session whose selection was made earlier, possibly while
    /// the channel was still online. Unlike [`select_method`](Self::select_method)
    /// the channel's current status is not checked before evaluating.
    pub fn restore_selection(
        &mut self,
        method_id: &str,
        categories: &[PaymentCategory],
        subtotal: u64,
    ) -> Result<CheckoutPhase> {
        let method = find_method(categories, method_id)
            .ok_or_else(|| CheckoutError::UnknownMethod(method_id.to_string()))?;
        self.selected = Some(method.clone());
        self.suggestion = None;
        self.picker_open = false;
        Ok(self.on_selection_changed(categories, subtotal))
    }

    /// Re-evaluate after the selection changed.
    pub fn on_selection_changed(
        &mut self,
        categories: &[PaymentCategory],
        subtotal: u64,
    ) -> CheckoutPhase {
        self.evaluate(categories, subtotal)
    }

    /// Re-evaluate after the channel list or a channel's status changed.
    pub fn on_candidates_changed(
        &mut self,
        categories: &[PaymentCategory],
        subtotal: u64,
    ) -> CheckoutPhase {
        self.evaluate(categories, subtotal)
    }

    fn evaluate(&mut self, categories: &[PaymentCategory], subtotal: u64) -> CheckoutPhase {
        let Some(selected) = self.selected.take() else {
            self.suggestion = None;
            self.recommended = get_best_online_method(categories, subtotal, &self.weights).cloned();
            // Stay in NoAlternative until a channel comes back.
            if self.recommended.is_some() || self.phase != CheckoutPhase::NoAlternative {
                self.phase = CheckoutPhase::Recommending;
            }
            return self.phase;
        };

        match find_method(categories, &selected.id) {
            Some(current) if current.is_online() => {
                if self.suggestion.take().is_some() {
                    info!(method_id = %current.id, "selected channel recovered, suggestion dropped");
                }
                self.selected = Some(current.clone());
                self.phase = CheckoutPhase::Idle;
            }
            current => {
                // A channel missing from the list keeps its last known snapshot.
                let degraded = current.cloned().unwrap_or(selected);
                warn!(
                    method_id = %degraded.id,
                    status = %degraded.status,
                    in_catalog = current.is_some(),
                    "selected channel is not online"
                );
                self.selected = Some(degraded.clone());
                self.phase = CheckoutPhase::DegradedDetected;
                self.suggest_replacement(degraded, categories, subtotal);
            }
        }
        self.phase
    }

    fn suggest_replacement(
        &mut self,
        degraded: PaymentMethod,
        categories: &[PaymentCategory],
        subtotal: u64,
    ) {
        match get_best_online_method(categories, subtotal, &self.weights) {
            None => self.no_alternative(&format!(
                "{} and no other payment method is online right now. {}",
                unavailable_notice(&degraded),
                retry_hint(&degraded)
            )),
            Some(best) if best.id == degraded.id => self.no_alternative(&format!(
                "{} and there is no other payment method to switch to. {}",
                unavailable_notice(&degraded),
                retry_hint(&degraded)
            )),
            Some(best) => {
                let suggestion = FallbackSuggestion {
                    from_fee: calculate_fee(&degraded, subtotal),
                    to_fee: calculate_fee(best, subtotal),
                    from: degraded,
                    to: best.clone(),
                };
                info!(
                    from = %suggestion.from.id,
                    to = %suggestion.to.id,
                    fee_delta = suggestion.fee_delta(),
                    "fallback suggested"
                );
                self.suggestion = Some(suggestion);
                self.phase = CheckoutPhase::Suggesting;
            }
        }
    }

    fn no_alternative(&mut self, message: &str) {
        self.selected = None;
        self.suggestion = None;
        self.recommended = None;
        self.phase = CheckoutPhase::NoAlternative;
        self.notifier.show_toast(message, ToastKind::Error);
    }

    /// Accept the pending suggestion; the replacement becomes the selection.
    pub fn confirm_fallback(&mut self) -> Result<PaymentMethod> {
        let suggestion = self.suggestion.take().ok_or(CheckoutError::NoPendingSuggestion)?;
        let message = format!(
            "Payment method switched from {} to {}. {}",
            suggestion.from.name,
            suggestion.to.name,
            describe_fee_delta(suggestion.fee_delta())
        );
        info!(from = %suggestion.from.id, to = %suggestion.to.id, "fallback accepted");

        self.selected = Some(suggestion.to.clone());
        self.picker_open = false;
        self.phase = CheckoutPhase::Idle;
        self.notifier.show_toast(&message, ToastKind::Success);
        Ok(suggestion.to)
    }

    /// Reject the pending suggestion; selection is cleared and the picker reopens.
    pub fn decline_fallback(&mut self) -> Result<()> {
        let suggestion = self.suggestion.take().ok_or(CheckoutError::NoPendingSuggestion)?;
        info!(from = %suggestion.from.id, to = %suggestion.to.id, "fallback declined");

        self.selected = None;
        self.picker_open = true;
        self.recommended = Some(suggestion.to);
        self.phase = CheckoutPhase::Recommending;
        self.notifier.show_toast(
            &format!(
                "{}. Please choose another payment method.",
                unavailable_notice(&suggestion.from)
            ),
            ToastKind::Error,
        );
        Ok(())
    }

    /// Final check before handing off to payment.
    ///
    /// Re-evaluates against the latest list and fails unless the selected
    /// channel is online at this moment.
    pub fn commit_payment(
        &mut self,
        categories: &[PaymentCategory],
        subtotal: u64,
    ) -> Result<PaymentMethod> {
        self.evaluate(categories, subtotal);
        let selected = self.selected.as_ref().ok_or(CheckoutError::NoMethodSelected)?;
        if self.phase == CheckoutPhase::Idle {
            info!(method_id = %selected.id, subtotal, "payment committed");
            return Ok(selected.clone());
        }
        match find_method(categories, &selected.id) {
            Some(current) => Err(CheckoutError::MethodUnavailable {
                method_id: current.id.clone(),
                status: current.status,
            }),
            None => Err(CheckoutError::UnknownMethod(selected.id.clone())),
        }
    }

    /// The shopper left checkout. Pending state is dropped.
    pub fn cancel(&mut self) {
        if self.suggestion.is_some() {
            debug!("pending fallback discarded on cancel");
        }
        self.selected = None;
        self.suggestion = None;
        self.recommended = None;
        self.picker_open = false;
        self.phase = CheckoutPhase::Idle;
    }
}

/// Opening of an outage toast, worded by whether the outage should clear on its own.
fn unavailable_notice(method: &PaymentMethod) -> String {
    if method.status.is_transient_outage() {
        format!("{} is temporarily unavailable ({})", method.name, method.status)
    } else {
        format!("{} is out of service", method.name)
    }
}

fn retry_hint(method: &PaymentMethod) -> &'static str {
    if method.status.is_hard_outage() {
        "Please try again later."
    } else {
        "Please try again in a few minutes."
    }
}

/// Human-readable fee change, e.g. "Fee +Rp1.500.".
pub fn describe_fee_delta(delta: i64) -> String {
    match delta {
        0 => "Fee unchanged.".to_string(),
        d if d > 0 => format!("Fee +{}.", format_rupiah(d.unsigned_abs())),
        d => format!("Fee -{}.", format_rupiah(d.unsigned_abs())),
    }
}

/// Format an amount with Indonesian thousands separators, e.g. "Rp1.500".
pub fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    out.push_str("Rp");
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
