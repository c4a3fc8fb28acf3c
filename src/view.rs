// src/view.rs
use serde::Serialize;
use std::fmt;

use crate::application::swap_service::ServiceSnapshot;
use crate::application::trading_panel::PanelState;
use crate::shared::types::Token;
use crate::shared::utils::{format_fixed_amount, FALLBACK_DECIMALS};

pub const PANEL_TITLE: &str = "🦍 KongSwap Trading";
pub const SWAP_LABEL: &str = "Swap Tokens";
pub const SWAPPING_LABEL: &str = "Swapping...";

/// What the trading panel shows right now
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelView {
    Loading,
    Error { message: String },
    Form(FormView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub title: String,
    pub banner: Option<Banner>,
    pub token_options: Vec<TokenOption>,
    pub token_in: Option<String>,
    pub amount_in: String,
    pub token_out: Option<String>,
    /// Empty until a quote is available
    pub estimated_output: String,
    pub quote_details: Option<QuoteDetails>,
    pub swap_button: SwapButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteDetails {
    pub price_impact: String,
    pub minimum_received: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapButton {
    pub label: String,
    pub enabled: bool,
}

/// Decimals used to display output amounts. A missing token or zero decimals falls back to 8.
fn output_decimals(token: Option<&Token>) -> u8 {
    match token {
        Some(token) if token.decimals != 0 => token.decimals,
        _ => FALLBACK_DECIMALS,
    }
}

impl PanelView {
    pub fn build(service: &ServiceSnapshot, panel: &PanelState) -> Self {
        if service.loading {
            return PanelView::Loading;
        }
        if let Some(message) = &service.error {
            return PanelView::Error {
                message: message.clone(),
            };
        }

        let banner = panel.swap_result.as_ref().map(|message| Banner {
            severity: if message.contains("successfully") {
                Severity::Success
            } else {
                Severity::Error
            },
            message: message.clone(),
        });

        let decimals = output_decimals(panel.token_out.as_ref());
        let symbol_out = panel
            .token_out
            .as_ref()
            .map(|token| token.symbol.as_str())
            .unwrap_or_default();

        let estimated_output = panel
            .quote
            .as_ref()
            .map(|quote| format_fixed_amount(&quote.amount_out, decimals))
            .unwrap_or_default();

        let quote_details = panel.quote.as_ref().map(|quote| QuoteDetails {
            price_impact: format!("{:.2}%", quote.price_impact),
            minimum_received: format!(
                "{} {}",
                format_fixed_amount(&quote.minimum_received, decimals),
                symbol_out
            )
            .trim_end()
            .to_string(),
        });

        let ready = panel.token_in.is_some()
            && panel.token_out.is_some()
            && !panel.amount_in.is_empty()
            && panel.quote.is_some();

        PanelView::Form(FormView {
            title: PANEL_TITLE.to_string(),
            banner,
            token_options: service
                .tokens
                .iter()
                .map(|token| TokenOption {
                    value: token.symbol.clone(),
                    label: token.label(),
                })
                .collect(),
            token_in: panel.token_in.as_ref().map(|token| token.symbol.clone()),
            amount_in: panel.amount_in.clone(),
            token_out: panel.token_out.as_ref().map(|token| token.symbol.clone()),
            estimated_output,
            quote_details,
            swap_button: SwapButton {
                label: if panel.swapping { SWAPPING_LABEL } else { SWAP_LABEL }.to_string(),
                enabled: ready && !panel.swapping,
            },
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for PanelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelView::Loading => writeln!(f, "Loading..."),
            PanelView::Error { message } => writeln!(f, "Error: {}", message),
            PanelView::Form(form) => {
                writeln!(f, "{}", form.title)?;
                if let Some(banner) = &form.banner {
                    let tag = match banner.severity {
                        Severity::Success => "✅",
                        Severity::Error => "❌",
                    };
                    writeln!(f, "{} {}", tag, banner.message)?;
                }
                let tokens: Vec<&str> = form.token_options.iter().map(|o| o.label.as_str()).collect();
                writeln!(f, "Tokens: {}", tokens.join(", "))?;
                writeln!(f, "From Token: {}", form.token_in.as_deref().unwrap_or("-"))?;
                writeln!(f, "Amount: {}", form.amount_in)?;
                writeln!(f, "To Token: {}", form.token_out.as_deref().unwrap_or("-"))?;
                writeln!(f, "You will receive (estimated): {}", form.estimated_output)?;
                if let Some(details) = &form.quote_details {
                    writeln!(f, "Price Impact: {}", details.price_impact)?;
                    writeln!(f, "Minimum Received: {}", details.minimum_received)?;
                }
                let state = if form.swap_button.enabled { "ready" } else { "disabled" };
                writeln!(f, "[{}] ({})", form.swap_button.label, state)
            }
        }
    }
}
