use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::ModelAssumptions;
use crate::depreciation::Country;
use crate::error::RealtyModelError;
use crate::fees::Fee;
use crate::input::{default_reporting_currency, PromoterData, ScenarioInput};
use crate::types::{Currency, Money, Percent, Rate, SourceMoney};
use crate::RealtyModelResult;

/// Deal terms as recorded for a property, before transaction costs are
/// folded into the acquisition cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealTerms {
    pub property_name: String,
    /// Contract price in the source currency
    pub purchase_price: Money,
    /// Transfer taxes, notary and agency fees as a percent of price
    #[serde(default)]
    pub transaction_fee_pct: Percent,
    /// Fixed closing costs in the source currency
    #[serde(default)]
    pub closing_costs: Money,
    #[serde(default)]
    pub country: Country,
    pub promoter_data: PromoterData,
    #[serde(default)]
    pub fees: Vec<Fee>,
    pub spot_exchange_rate: Rate,
    #[serde(default)]
    pub source_currency: Currency,
    #[serde(default = "default_reporting_currency")]
    pub reporting_currency: Currency,
    #[serde(default)]
    pub assumptions: ModelAssumptions,
}

impl DealTerms {
    /// `price × (1 + fee%) + closing costs`
    pub fn purchase_cost(&self) -> RealtyModelResult<SourceMoney> {
        (Decimal::ONE + self.transaction_fee_pct / dec!(100))
            .checked_mul(self.purchase_price)
            .and_then(|cost| cost.checked_add(self.closing_costs))
            .map(SourceMoney::new)
            .ok_or_else(|| RealtyModelError::overflow("purchase_price"))
    }

    pub fn into_scenario_input(self) -> RealtyModelResult<ScenarioInput> {
        if self.purchase_price < Decimal::ZERO {
            return Err(RealtyModelError::InvalidInput {
                field: "purchase_price".into(),
                reason: "Purchase price cannot be negative".into(),
            });
        }
        if self.transaction_fee_pct < Decimal::ZERO {
            return Err(RealtyModelError::InvalidInput {
                field: "transaction_fee_pct".into(),
                reason: "Transaction fees cannot be negative".into(),
            });
        }
        if self.closing_costs < Decimal::ZERO {
            return Err(RealtyModelError::InvalidInput {
                field: "closing_costs".into(),
                reason: "Closing costs cannot be negative".into(),
            });
        }

        let purchase_cost = self.purchase_cost()?.amount();
        log::debug!(
            "deal '{}': purchase cost {} {}",
            self.property_name,
            purchase_cost,
            self.source_currency
        );

        Ok(ScenarioInput {
            purchase_cost,
            country: self.country,
            promoter_data: self.promoter_data,
            recurring_fees: self.fees,
            spot_exchange_rate: self.spot_exchange_rate,
            source_currency: self.source_currency,
            reporting_currency: self.reporting_currency,
            assumptions: self.assumptions,
        })
    }
}
