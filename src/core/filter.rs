//! Valuation assumptions attached to a stock and the dialog that edits them

use super::stock::StockEntry;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, warn};

/// Per-stock valuation assumptions. The serialized keys are the ones already
/// found in stored data, misspellings included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterModel {
    #[serde(rename = "countryOfIncorpation")]
    pub country_of_incorporation: String,
    #[serde(rename = "industryUS")]
    pub industry_us: String,
    #[serde(rename = "industryGlobal")]
    pub industry_global: String,
    #[serde(rename = "rdExpanses")]
    pub rd_expenses: bool,
    #[serde(rename = "operatingLease")]
    pub operating_lease: bool,
    #[serde(rename = "nonOperatingAssets")]
    pub non_operating_assets: f64,
    #[serde(rename = "taxValue")]
    pub operating_margin: f64,
    #[serde(rename = "compoundRevenue")]
    pub revenue_growth: f64,
    #[serde(rename = "convergence")]
    pub convergence_year: f64,
    #[serde(rename = "employeeOutstanding")]
    pub employee_options: bool,
    #[serde(rename = "optionsOutstanding")]
    pub options_outstanding: f64,
    #[serde(rename = "strikePrice")]
    pub strike_price: f64,
    #[serde(rename = "maturityPrice")]
    pub average_maturity: f64,
    #[serde(rename = "standardDeviation")]
    pub standard_deviation: f64,
    #[serde(rename = "costOfCaptialAssumption")]
    pub override_cost_of_capital: bool,
    #[serde(rename = "costOfCaptialAfterTen")]
    pub cost_of_capital_after_ten: f64,
    #[serde(rename = "failureAssumption")]
    pub override_failure: bool,
    #[serde(rename = "probabilityFailure")]
    pub probability_of_failure: f64,
    #[serde(rename = "failureTie")]
    pub failure_tie: String,
    #[serde(rename = "fairValue")]
    pub distress_proceeds: f64,
    #[serde(rename = "taxRateAssumption")]
    pub override_tax_rate: bool,
    #[serde(rename = "nolAssumption")]
    pub override_nol: bool,
    #[serde(rename = "nolCarringValue")]
    pub nol_carryover: f64,
    #[serde(rename = "growthRateAssumption")]
    pub override_growth_rate: bool,
    #[serde(rename = "growthRatePerpetutity")]
    pub perpetual_growth_rate: f64,
    #[serde(rename = "trappedCashAssumption")]
    pub override_trapped_cash: bool,
    #[serde(rename = "trappedCashValue")]
    pub trapped_cash: f64,
    #[serde(rename = "taxRateTrappedValue")]
    pub trapped_cash_tax_rate: f64,
    pub comments: String,
}

impl Default for FilterModel {
    fn default() -> Self {
        FilterModel {
            country_of_incorporation: "US".to_string(),
            industry_us: String::new(),
            industry_global: String::new(),
            rd_expenses: false,
            operating_lease: false,
            non_operating_assets: 0.0,
            operating_margin: 0.0,
            revenue_growth: 0.0,
            convergence_year: 0.0,
            employee_options: false,
            options_outstanding: 0.0,
            strike_price: 0.0,
            average_maturity: 0.0,
            standard_deviation: 0.0,
            override_cost_of_capital: false,
            cost_of_capital_after_ten: 0.0,
            override_failure: false,
            probability_of_failure: 0.0,
            failure_tie: "V".to_string(),
            distress_proceeds: 0.0,
            override_tax_rate: false,
            override_nol: false,
            nol_carryover: 0.0,
            override_growth_rate: false,
            perpetual_growth_rate: 0.0,
            override_trapped_cash: false,
            trapped_cash: 0.0,
            trapped_cash_tax_rate: 0.0,
            comments: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Toggle,
    Currency,
    Percentage,
    Number,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Toggle(bool),
    Number(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    CountryOfIncorporation,
    IndustryUs,
    IndustryGlobal,
    RdExpenses,
    OperatingLease,
    NonOperatingAssets,
    RevenueGrowth,
    OperatingMargin,
    ConvergenceYear,
    EmployeeOptions,
    OptionsOutstanding,
    StrikePrice,
    AverageMaturity,
    StandardDeviation,
    OverrideCostOfCapital,
    CostOfCapitalAfterTen,
    OverrideFailure,
    ProbabilityOfFailure,
    FailureTie,
    DistressProceeds,
    OverrideTaxRate,
    OverrideNol,
    NolCarryover,
    OverrideGrowthRate,
    PerpetualGrowthRate,
    OverrideTrappedCash,
    TrappedCash,
    TrappedCashTaxRate,
    Comments,
}

impl FilterField {
    /// Every field in dialog order.
    pub const ALL: [FilterField; 29] = [
        FilterField::CountryOfIncorporation,
        FilterField::IndustryUs,
        FilterField::IndustryGlobal,
        FilterField::RdExpenses,
        FilterField::OperatingLease,
        FilterField::NonOperatingAssets,
        FilterField::RevenueGrowth,
        FilterField::OperatingMargin,
        FilterField::ConvergenceYear,
        FilterField::EmployeeOptions,
        FilterField::OptionsOutstanding,
        FilterField::StrikePrice,
        FilterField::AverageMaturity,
        FilterField::StandardDeviation,
        FilterField::OverrideCostOfCapital,
        FilterField::CostOfCapitalAfterTen,
        FilterField::OverrideFailure,
        FilterField::ProbabilityOfFailure,
        FilterField::FailureTie,
        FilterField::DistressProceeds,
        FilterField::OverrideTaxRate,
        FilterField::OverrideNol,
        FilterField::NolCarryover,
        FilterField::OverrideGrowthRate,
        FilterField::PerpetualGrowthRate,
        FilterField::OverrideTrappedCash,
        FilterField::TrappedCash,
        FilterField::TrappedCashTaxRate,
        FilterField::Comments,
    ];

    /// Storage key, also accepted on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            FilterField::CountryOfIncorporation => "countryOfIncorpation",
            FilterField::IndustryUs => "industryUS",
            FilterField::IndustryGlobal => "industryGlobal",
            FilterField::RdExpenses => "rdExpanses",
            FilterField::OperatingLease => "operatingLease",
            FilterField::NonOperatingAssets => "nonOperatingAssets",
            FilterField::RevenueGrowth => "compoundRevenue",
            FilterField::OperatingMargin => "taxValue",
            FilterField::ConvergenceYear => "convergence",
            FilterField::EmployeeOptions => "employeeOutstanding",
            FilterField::OptionsOutstanding => "optionsOutstanding",
            FilterField::StrikePrice => "strikePrice",
            FilterField::AverageMaturity => "maturityPrice",
            FilterField::StandardDeviation => "standardDeviation",
            FilterField::OverrideCostOfCapital => "costOfCaptialAssumption",
            FilterField::CostOfCapitalAfterTen => "costOfCaptialAfterTen",
            FilterField::OverrideFailure => "failureAssumption",
            FilterField::ProbabilityOfFailure => "probabilityFailure",
            FilterField::FailureTie => "failureTie",
            FilterField::DistressProceeds => "fairValue",
            FilterField::OverrideTaxRate => "taxRateAssumption",
            FilterField::OverrideNol => "nolAssumption",
            FilterField::NolCarryover => "nolCarringValue",
            FilterField::OverrideGrowthRate => "growthRateAssumption",
            FilterField::PerpetualGrowthRate => "growthRatePerpetutity",
            FilterField::OverrideTrappedCash => "trappedCashAssumption",
            FilterField::TrappedCash => "trappedCashValue",
            FilterField::TrappedCashTaxRate => "taxRateTrappedValue",
            FilterField::Comments => "comments",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::CountryOfIncorporation => "Country of incorporation",
            FilterField::IndustryUs => "Industry (US)",
            FilterField::IndustryGlobal => "Industry (Global)",
            FilterField::RdExpenses => "Do you have R&D expenses to capitalize?",
            FilterField::OperatingLease => "Do you have operating lease commitments?",
            FilterField::NonOperatingAssets => "Cross holdings and other non-operating assets",
            FilterField::RevenueGrowth => {
                "Compounded annual revenue growth rate over next 5 years"
            }
            FilterField::OperatingMargin => {
                "Target pre-tax operating margin (EBIT as % of sales in year 10)"
            }
            FilterField::ConvergenceYear => "Year of convergence",
            FilterField::EmployeeOptions => "Do you have employee options outstanding?",
            FilterField::OptionsOutstanding => "Number of options outstanding (in millions)",
            FilterField::StrikePrice => "Average strike price",
            FilterField::AverageMaturity => "Average maturity",
            FilterField::StandardDeviation => "Standard deviation on stock price",
            FilterField::OverrideCostOfCapital => {
                "Do you want to override cost of capital assumption?"
            }
            FilterField::CostOfCapitalAfterTen => "Cost of capital after year 10",
            FilterField::OverrideFailure => {
                "Do you want to override probability of failure assumption?"
            }
            FilterField::ProbabilityOfFailure => "Probability of failure",
            FilterField::FailureTie => "Tie proceeds to V or B",
            FilterField::DistressProceeds => {
                "Distress proceeds as percentage of book or fair value"
            }
            FilterField::OverrideTaxRate => {
                "Do you want to override effective tax rate assumption?"
            }
            FilterField::OverrideNol => "Do you want to override NOL assumption?",
            FilterField::NolCarryover => "NOL carrying over into year 1",
            FilterField::OverrideGrowthRate => "Do you want to override growth rate assumption?",
            FilterField::PerpetualGrowthRate => "Growth rate in perpetuity",
            FilterField::OverrideTrappedCash => {
                "Do you want to override trapped cash assumption?"
            }
            FilterField::TrappedCash => "Trapped cash value",
            FilterField::TrappedCashTaxRate => "Average tax rate of foreign markets",
            FilterField::Comments => "Comments",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FilterField::CountryOfIncorporation
            | FilterField::IndustryUs
            | FilterField::IndustryGlobal
            | FilterField::FailureTie
            | FilterField::Comments => FieldKind::Text,
            FilterField::RdExpenses
            | FilterField::OperatingLease
            | FilterField::EmployeeOptions
            | FilterField::OverrideCostOfCapital
            | FilterField::OverrideFailure
            | FilterField::OverrideTaxRate
            | FilterField::OverrideNol
            | FilterField::OverrideGrowthRate
            | FilterField::OverrideTrappedCash => FieldKind::Toggle,
            FilterField::NonOperatingAssets
            | FilterField::StrikePrice
            | FilterField::NolCarryover
            | FilterField::TrappedCash => FieldKind::Currency,
            FilterField::RevenueGrowth
            | FilterField::OperatingMargin
            | FilterField::StandardDeviation
            | FilterField::CostOfCapitalAfterTen
            | FilterField::ProbabilityOfFailure
            | FilterField::DistressProceeds
            | FilterField::PerpetualGrowthRate
            | FilterField::TrappedCashTaxRate => FieldKind::Percentage,
            FilterField::ConvergenceYear
            | FilterField::OptionsOutstanding
            | FilterField::AverageMaturity => FieldKind::Number,
        }
    }

    /// The toggle that has to be on for this field to be shown.
    pub fn depends_on(&self) -> Option<FilterField> {
        match self {
            FilterField::OptionsOutstanding
            | FilterField::StrikePrice
            | FilterField::AverageMaturity
            | FilterField::StandardDeviation => Some(FilterField::EmployeeOptions),
            FilterField::CostOfCapitalAfterTen => Some(FilterField::OverrideCostOfCapital),
            FilterField::ProbabilityOfFailure
            | FilterField::FailureTie
            | FilterField::DistressProceeds => Some(FilterField::OverrideFailure),
            FilterField::NolCarryover => Some(FilterField::OverrideNol),
            FilterField::PerpetualGrowthRate => Some(FilterField::OverrideGrowthRate),
            FilterField::TrappedCash | FilterField::TrappedCashTaxRate => {
                Some(FilterField::OverrideTrappedCash)
            }
            _ => None,
        }
    }
}

impl Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for FilterField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterField::ALL
            .iter()
            .find(|field| field.key().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Unknown filter field: {}", s))
    }
}

impl FilterModel {
    pub fn get(&self, field: FilterField) -> FilterValue {
        use FilterField as F;
        use FilterValue::{Number, Text, Toggle};
        match field {
            F::CountryOfIncorporation => Text(self.country_of_incorporation.clone()),
            F::IndustryUs => Text(self.industry_us.clone()),
            F::IndustryGlobal => Text(self.industry_global.clone()),
            F::RdExpenses => Toggle(self.rd_expenses),
            F::OperatingLease => Toggle(self.operating_lease),
            F::NonOperatingAssets => Number(self.non_operating_assets),
            F::RevenueGrowth => Number(self.revenue_growth),
            F::OperatingMargin => Number(self.operating_margin),
            F::ConvergenceYear => Number(self.convergence_year),
            F::EmployeeOptions => Toggle(self.employee_options),
            F::OptionsOutstanding => Number(self.options_outstanding),
            F::StrikePrice => Number(self.strike_price),
            F::AverageMaturity => Number(self.average_maturity),
            F::StandardDeviation => Number(self.standard_deviation),
            F::OverrideCostOfCapital => Toggle(self.override_cost_of_capital),
            F::CostOfCapitalAfterTen => Number(self.cost_of_capital_after_ten),
            F::OverrideFailure => Toggle(self.override_failure),
            F::ProbabilityOfFailure => Number(self.probability_of_failure),
            F::FailureTie => Text(self.failure_tie.clone()),
            F::DistressProceeds => Number(self.distress_proceeds),
            F::OverrideTaxRate => Toggle(self.override_tax_rate),
            F::OverrideNol => Toggle(self.override_nol),
            F::NolCarryover => Number(self.nol_carryover),
            F::OverrideGrowthRate => Toggle(self.override_growth_rate),
            F::PerpetualGrowthRate => Number(self.perpetual_growth_rate),
            F::OverrideTrappedCash => Toggle(self.override_trapped_cash),
            F::TrappedCash => Number(self.trapped_cash),
            F::TrappedCashTaxRate => Number(self.trapped_cash_tax_rate),
            F::Comments => Text(self.comments.clone()),
        }
    }

    /// Sets a field from user input. Numbers are parsed leniently: currency
    /// symbols, separators and percent signs are ignored and anything else
    /// unparseable becomes zero.
    pub fn set(&mut self, field: FilterField, input: &str) -> Result<()> {
        use FilterField as F;
        match field {
            F::CountryOfIncorporation => {
                let code = input.trim().to_uppercase();
                if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                    bail!("Country must be a two-letter code, got '{}'", input);
                }
                self.country_of_incorporation = code;
            }
            F::FailureTie => {
                let tie = input.trim().to_uppercase();
                if tie != "V" && tie != "B" {
                    bail!("Failure proceeds must be tied to V or B, got '{}'", input);
                }
                self.failure_tie = tie;
            }
            F::IndustryUs => self.industry_us = input.trim().to_string(),
            F::IndustryGlobal => self.industry_global = input.trim().to_string(),
            F::Comments => self.comments = input.to_string(),
            F::RdExpenses => self.rd_expenses = parse_toggle(input)?,
            F::OperatingLease => self.operating_lease = parse_toggle(input)?,
            F::EmployeeOptions => self.employee_options = parse_toggle(input)?,
            F::OverrideCostOfCapital => self.override_cost_of_capital = parse_toggle(input)?,
            F::OverrideFailure => self.override_failure = parse_toggle(input)?,
            F::OverrideTaxRate => self.override_tax_rate = parse_toggle(input)?,
            F::OverrideNol => self.override_nol = parse_toggle(input)?,
            F::OverrideGrowthRate => self.override_growth_rate = parse_toggle(input)?,
            F::OverrideTrappedCash => self.override_trapped_cash = parse_toggle(input)?,
            F::NonOperatingAssets => self.non_operating_assets = parse_number(input),
            F::RevenueGrowth => self.revenue_growth = parse_number(input),
            F::OperatingMargin => self.operating_margin = parse_number(input),
            F::ConvergenceYear => self.convergence_year = parse_number(input),
            F::OptionsOutstanding => self.options_outstanding = parse_number(input),
            F::StrikePrice => self.strike_price = parse_number(input),
            F::AverageMaturity => self.average_maturity = parse_number(input),
            F::StandardDeviation => self.standard_deviation = parse_number(input),
            F::CostOfCapitalAfterTen => self.cost_of_capital_after_ten = parse_number(input),
            F::ProbabilityOfFailure => self.probability_of_failure = parse_number(input),
            F::DistressProceeds => self.distress_proceeds = parse_number(input),
            F::NolCarryover => self.nol_carryover = parse_number(input),
            F::PerpetualGrowthRate => self.perpetual_growth_rate = parse_number(input),
            F::TrappedCash => self.trapped_cash = parse_number(input),
            F::TrappedCashTaxRate => self.trapped_cash_tax_rate = parse_number(input),
        }
        debug!(field = field.key(), "Filter field updated");
        Ok(())
    }

    /// Whether a field should be shown given the current toggles.
    pub fn is_visible(&self, field: FilterField) -> bool {
        match field.depends_on() {
            Some(toggle) => self.get(toggle) == FilterValue::Toggle(true),
            None => true,
        }
    }
}

fn parse_toggle(input: &str) -> Result<bool> {
    match input.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "on" => Ok(true),
        "no" | "n" | "false" | "0" | "off" => Ok(false),
        _ => bail!("Expected yes or no, got '{}'", input),
    }
}

pub fn parse_number(input: &str) -> f64 {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
        .collect();
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            if !cleaned.is_empty() {
                warn!(input, "Unparseable number, using 0");
            }
            0.0
        }
    }
}

/// Formats a value as US dollars with thousands separators, e.g. `$1,234.50`.
pub fn format_currency(value: f64) -> String {
    let cents = format!("{:.2}", value.abs());
    let (whole, fraction) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{fraction}")
}

pub fn format_percentage(value: f64) -> String {
    format!("{value:.2}%")
}

/// Editing state for one stock's filter. The model is the source of truth;
/// the draft text of the focused field only lives until it loses focus.
pub struct FilterDialog {
    stock_id: u32,
    stock_name: String,
    form: FilterModel,
    focused: Option<FilterField>,
    drafts: HashMap<FilterField, String>,
}

impl FilterDialog {
    pub fn open(entry: &StockEntry) -> Self {
        let form = entry.filter_data.clone().unwrap_or_default();
        debug!(stock_id = entry.id, existing = entry.filter_data.is_some(), "Filter dialog opened");
        Self {
            stock_id: entry.id,
            stock_name: entry.name.clone(),
            form,
            focused: None,
            drafts: HashMap::new(),
        }
    }

    pub fn stock_id(&self) -> u32 {
        self.stock_id
    }

    pub fn stock_name(&self) -> &str {
        &self.stock_name
    }

    pub fn form(&self) -> &FilterModel {
        &self.form
    }

    pub fn focused(&self) -> Option<FilterField> {
        self.focused
    }

    /// Focuses a field, dropping the draft of the previously focused one.
    pub fn focus(&mut self, field: FilterField) {
        self.blur();
        self.focused = Some(field);
    }

    pub fn blur(&mut self) {
        if let Some(field) = self.focused.take() {
            self.drafts.remove(&field);
        }
    }

    /// Applies user input to a field. Text typed into the focused field is
    /// kept verbatim for display until blur.
    pub fn input(&mut self, field: FilterField, text: &str) -> Result<()> {
        self.form.set(field, text)?;
        if self.focused == Some(field) {
            self.drafts.insert(field, text.to_string());
        }
        Ok(())
    }

    /// What the field shows right now: raw numbers while focused, formatted
    /// text otherwise.
    pub fn display(&self, field: FilterField) -> String {
        if let Some(draft) = self.drafts.get(&field) {
            return draft.clone();
        }
        let focused = self.focused == Some(field);
        match (self.form.get(field), field.kind()) {
            (FilterValue::Text(text), _) => text,
            (FilterValue::Toggle(true), _) => "Yes".to_string(),
            (FilterValue::Toggle(false), _) => "No".to_string(),
            (FilterValue::Number(n), _) if focused => n.to_string(),
            (FilterValue::Number(n), FieldKind::Currency) => format_currency(n),
            (FilterValue::Number(n), FieldKind::Percentage) => format_percentage(n),
            (FilterValue::Number(n), _) => n.to_string(),
        }
    }

    pub fn visible_fields(&self) -> Vec<FilterField> {
        FilterField::ALL
            .iter()
            .copied()
            .filter(|field| self.form.is_visible(*field))
            .collect()
    }

    /// Finishes editing and hands back the target stock and the saved model.
    pub fn submit(mut self) -> (u32, FilterModel) {
        self.blur();
        (self.stock_id, self.form)
    }
}
