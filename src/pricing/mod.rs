//! Cost estimation for agent workflow executions.
//!
//! Costs are handled in microcents (1/10000 of a cent, so 1_000_000
//! microcents = $1) to avoid floating point inside the aggregation path.
//! Conversion to USD happens once, at the API boundary.

use std::collections::HashMap;

use crate::models::{DbModelPricing, Execution};

/// Fallback rate when no pricing row matches: $0.15 per 1M input tokens.
pub const DEFAULT_INPUT_PER_1M: i64 = 150_000;
/// Fallback rate when no pricing row matches: $0.60 per 1M output tokens.
pub const DEFAULT_OUTPUT_PER_1M: i64 = 600_000;

/// When an execution reports only a combined token count, this share is
/// attributed to input and the remainder to output. Chat workloads skew
/// heavily toward input, so 70/30 is a reasonable approximation; treat the
/// resulting estimate accordingly.
pub const TOTAL_TOKEN_INPUT_SHARE_PERCENT: i64 = 70;

/// Token rates for one model, in microcents per 1M tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRates {
    pub input_per_1m: i64,
    pub output_per_1m: i64,
}

impl TokenRates {
    const DEFAULT: TokenRates = TokenRates {
        input_per_1m: DEFAULT_INPUT_PER_1M,
        output_per_1m: DEFAULT_OUTPUT_PER_1M,
    };
}

/// Immutable snapshot of the pricing table, taken once per request.
///
/// Model lookup is case-insensitive. Executions whose model has no row fall
/// back to the configured default model's rates, then to the hardcoded
/// defaults.
#[derive(Debug, Clone)]
pub struct PricingTable {
    rates: HashMap<String, TokenRates>,
    default_rates: TokenRates,
}

impl PricingTable {
    pub fn new(rows: &[DbModelPricing], default_model: Option<&str>) -> Self {
        let rates: HashMap<String, TokenRates> = rows
            .iter()
            .map(|row| {
                (
                    row.model.to_lowercase(),
                    TokenRates {
                        input_per_1m: row.input_per_1m_tokens,
                        output_per_1m: row.output_per_1m_tokens,
                    },
                )
            })
            .collect();

        let default_rates = default_model
            .and_then(|m| rates.get(&m.to_lowercase()).copied())
            .unwrap_or(TokenRates::DEFAULT);

        PricingTable {
            rates,
            default_rates,
        }
    }

    fn resolve(&self, model: Option<&str>) -> TokenRates {
        model
            .and_then(|m| self.rates.get(&m.to_lowercase()).copied())
            .unwrap_or(self.default_rates)
    }

    /// Estimate the cost of one execution, in microcents.
    ///
    /// A recorded cost greater than zero is authoritative and returned
    /// unchanged. Otherwise the cost is computed from token counts; with no
    /// token data at all the estimate is zero. Never negative.
    pub fn estimate_cost(&self, execution: &Execution) -> i64 {
        if let Some(recorded) = execution.cost_microcents
            && recorded > 0
        {
            return recorded;
        }

        let rates = self.resolve(execution.model.as_deref());

        let (input, output) = match (execution.input_tokens, execution.output_tokens) {
            (Some(input), Some(output)) => (input, output),
            _ => match execution.total_tokens {
                Some(total) if total > 0 => {
                    let input = total * TOTAL_TOKEN_INPUT_SHARE_PERCENT / 100;
                    (input, total - input)
                }
                _ => return 0,
            },
        };

        compute_cost(input, output, rates)
    }
}

/// `tokens * rate / 1M` for both directions, with i128 intermediates so
/// large token counts cannot overflow. Clamped to non-negative.
fn compute_cost(input_tokens: i64, output_tokens: i64, rates: TokenRates) -> i64 {
    let input_cost = (input_tokens as i128) * (rates.input_per_1m as i128) / 1_000_000;
    let output_cost = (output_tokens as i128) * (rates.output_per_1m as i128) / 1_000_000;
    (input_cost + output_cost).clamp(0, i64::MAX as i128) as i64
}

/// Convert microcents to USD for API responses.
pub fn microcents_to_usd(microcents: i64) -> f64 {
    microcents as f64 / 1_000_000.0
}
