//! Yahoo Finance adapter.
//!
//! Three public endpoints are used:
//! - fundamentals time series: annual statement line items;
//! - `quoteSummary`: market cap, book value, EPS, ROE, revenue;
//! - `chart`: daily open/close bars for the price column.
//!
//! `quoteSummary` requires a session cookie plus a matching "crumb". Both are
//! obtained once per provider and reused; the blocking client keeps the cookie.
//! Responses are otherwise treated as a black box: no retries and no rate-limit
//! handling.

use std::sync::Mutex;

use chrono::{Duration, Utc};
use log::{debug, info};
use quickeval_common::model::line_items;
use quickeval_common::model::{CompanyInfo, FinancialSnapshot, Period, PriceChange, Statement};
use quickeval_common::tickers::Symbol;
use quickeval_common::{EvalError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::MarketDataProvider;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const TIMESERIES_URL: &str =
    "https://query2.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";
const SUMMARY_MODULES: &str = "price,financialData,defaultKeyStatistics";

/// How far back annual statements are requested.
const STATEMENT_YEARS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementKind {
    Income,
    BalanceSheet,
    CashFlow,
}

/// Time-series keys and the line items they populate.
const SERIES: &[(StatementKind, &str, &str)] = &[
    (StatementKind::Income, "annualPretaxIncome", line_items::PRETAX_INCOME),
    (StatementKind::Income, "annualNetIncome", line_items::NET_INCOME),
    (StatementKind::BalanceSheet, "annualCashAndCashEquivalents", line_items::CASH_AND_EQUIVALENTS),
    (StatementKind::BalanceSheet, "annualTotalDebt", line_items::TOTAL_DEBT),
    (StatementKind::BalanceSheet, "annualCurrentDebt", line_items::CURRENT_DEBT),
    (StatementKind::BalanceSheet, "annualLongTermDebt", line_items::LONG_TERM_DEBT),
    (
        StatementKind::BalanceSheet,
        "annualOtherShortTermInvestments",
        line_items::OTHER_SHORT_TERM_INVESTMENTS,
    ),
    (StatementKind::CashFlow, "annualFreeCashFlow", line_items::FREE_CASH_FLOW),
];

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

fn raw(value: &Option<RawValue>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw)
}

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    timeseries: TimeseriesBody,
}

#[derive(Debug, Deserialize)]
struct TimeseriesBody {
    #[serde(default)]
    result: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportedPoint {
    as_of_date: String,
    #[serde(default)]
    reported_value: RawValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    #[serde(default)]
    result: Option<Vec<SummaryModules>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SummaryModules {
    price: Option<PriceModule>,
    financial_data: Option<FinancialDataModule>,
    default_key_statistics: Option<KeyStatisticsModule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PriceModule {
    long_name: Option<String>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FinancialDataModule {
    current_price: Option<RawValue>,
    return_on_equity: Option<RawValue>,
    total_revenue: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct KeyStatisticsModule {
    book_value: Option<RawValue>,
    shares_outstanding: Option<RawValue>,
    trailing_eps: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Bars>,
}

#[derive(Debug, Default, Deserialize)]
struct Bars {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn api_failure(symbol: &Symbol, error: Option<ApiError>) -> EvalError {
    match error {
        Some(e) => EvalError::Network(format!("{}: {} ({})", symbol, e.description, e.code)),
        None => EvalError::NoData(symbol.to_string()),
    }
}

fn network(err: reqwest::Error) -> EvalError {
    EvalError::Network(err.to_string())
}

/// Split a time-series response into the three statements.
fn statements_from_timeseries(
    results: &[serde_json::Value],
) -> Result<(Statement, Statement, Statement)> {
    let mut income = Vec::new();
    let mut balance = Vec::new();
    let mut cash_flow = Vec::new();

    for result in results {
        let Some(key) = result["meta"]["type"][0].as_str() else {
            continue;
        };
        let Some((kind, _, item)) = SERIES.iter().find(|(_, series, _)| *series == key) else {
            continue;
        };
        let Some(entries) = result.get(key) else {
            continue;
        };

        let points: Vec<Option<ReportedPoint>> = serde_json::from_value(entries.clone())?;
        let target = match kind {
            StatementKind::Income => &mut income,
            StatementKind::BalanceSheet => &mut balance,
            StatementKind::CashFlow => &mut cash_flow,
        };
        target.extend(
            points
                .into_iter()
                .flatten()
                .filter_map(|p| p.reported_value.raw.map(|v| (*item, p.as_of_date, v))),
        );
    }

    Ok((
        Statement::from_points(income),
        Statement::from_points(balance),
        Statement::from_points(cash_flow),
    ))
}

fn info_from_summary(modules: SummaryModules) -> CompanyInfo {
    let price = modules.price.unwrap_or_default();
    let financial = modules.financial_data.unwrap_or_default();
    let stats = modules.default_key_statistics.unwrap_or_default();

    CompanyInfo {
        long_name: price.long_name,
        market_cap: raw(&price.market_cap),
        book_value: raw(&stats.book_value),
        shares_outstanding: raw(&stats.shares_outstanding),
        current_price: raw(&financial.current_price),
        trailing_eps: raw(&stats.trailing_eps),
        return_on_equity: raw(&financial.return_on_equity),
        total_revenue: raw(&financial.total_revenue),
    }
}

/// Market-data provider backed by Yahoo Finance.
pub struct YahooProvider {
    client: Client,
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    /// Build the HTTP client. No request is sent until data is fetched.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(network)?;
        Ok(Self {
            client,
            crumb: Mutex::new(None),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send().map_err(network)?;
        let status = response.status();
        let body = response.text().map_err(network)?;
        // Error payloads still carry a JSON body describing the failure.
        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => {
                Err(EvalError::Network(format!("{} returned {}", url, status)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn crumb(&self) -> Result<String> {
        let mut crumb = self.crumb.lock()?;
        if let Some(existing) = crumb.as_ref() {
            return Ok(existing.clone());
        }

        // Only the session cookie matters; this endpoint answers 404.
        self.client.get(COOKIE_URL).send().map_err(network)?;
        let fetched = self
            .client
            .get(CRUMB_URL)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(network)?;
        let fetched = fetched.trim().to_string();
        if fetched.is_empty() || fetched.contains('<') {
            return Err(EvalError::Network("could not obtain Yahoo crumb".to_string()));
        }

        debug!("Obtained Yahoo crumb");
        *crumb = Some(fetched.clone());
        Ok(fetched)
    }

    fn fetch_statements(&self, symbol: &Symbol) -> Result<(Statement, Statement, Statement)> {
        let now = Utc::now();
        let start = now - Duration::days(365 * STATEMENT_YEARS);
        let types = SERIES
            .iter()
            .map(|(_, key, _)| *key)
            .collect::<Vec<_>>()
            .join(",");
        let query = [
            ("symbol", symbol.to_string()),
            ("type", types),
            ("period1", start.timestamp().to_string()),
            ("period2", now.timestamp().to_string()),
        ];

        let url = format!("{}/{}", TIMESERIES_URL, symbol);
        let response: TimeseriesResponse = self.get_json(&url, &query)?;
        match response.timeseries.result {
            Some(results) => statements_from_timeseries(&results),
            None => Err(api_failure(symbol, response.timeseries.error)),
        }
    }

    fn fetch_info(&self, symbol: &Symbol) -> Result<CompanyInfo> {
        let query = [
            ("modules", SUMMARY_MODULES.to_string()),
            ("crumb", self.crumb()?),
        ];
        let url = format!("{}/{}", SUMMARY_URL, symbol);
        let response: QuoteSummaryResponse = self.get_json(&url, &query)?;
        let body = response.quote_summary;
        match body.result.and_then(|r| r.into_iter().next()) {
            Some(modules) => Ok(info_from_summary(modules)),
            None => Err(api_failure(symbol, body.error)),
        }
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn fetch_snapshot(&self, symbol: &Symbol) -> Result<FinancialSnapshot> {
        let (income, balance_sheet, cash_flow) = self.fetch_statements(symbol)?;
        let info = self.fetch_info(symbol)?;
        let snapshot = FinancialSnapshot {
            symbol: symbol.clone(),
            income,
            balance_sheet,
            cash_flow,
            info,
        };
        if snapshot.is_empty() {
            return Err(EvalError::NoData(symbol.to_string()));
        }
        info!(
            "Fetched data for {} ({})",
            symbol,
            snapshot.info.long_name.as_deref().unwrap_or("unnamed")
        );
        Ok(snapshot)
    }

    fn fetch_price_change(&self, symbol: &Symbol, period: Period) -> Result<Option<PriceChange>> {
        let query = [
            ("range", period.to_string()),
            ("interval", "1d".to_string()),
        ];
        let url = format!("{}/{}", CHART_URL, symbol);
        let response: ChartResponse = self.get_json(&url, &query)?;
        let chart = response.chart;

        let Some(result) = chart.result.and_then(|r| r.into_iter().next()) else {
            return match chart.error {
                Some(e) => Err(api_failure(symbol, Some(e))),
                None => Ok(None),
            };
        };
        Ok(result
            .indicators
            .quote
            .first()
            .and_then(|bars| PriceChange::from_bars(symbol.clone(), &bars.open, &bars.close)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_timeseries_into_statements() {
        let results = vec![
            json!({
                "meta": { "symbol": ["AAPL"], "type": ["annualPretaxIncome"] },
                "timestamp": [1, 2],
                "annualPretaxIncome": [
                    { "asOfDate": "2022-09-30", "reportedValue": { "raw": 119.0, "fmt": "119" } },
                    null,
                    { "asOfDate": "2023-09-30", "reportedValue": { "raw": 113.0, "fmt": "113" } }
                ]
            }),
            json!({
                "meta": { "symbol": ["AAPL"], "type": ["annualFreeCashFlow"] },
                "annualFreeCashFlow": [
                    { "asOfDate": "2023-09-30", "reportedValue": { "raw": 99.5 } }
                ]
            }),
            json!({ "meta": { "symbol": ["AAPL"], "type": ["annualTotalDebt"] } }),
            json!({
                "meta": { "symbol": ["AAPL"], "type": ["annualSomethingElse"] },
                "annualSomethingElse": [ { "asOfDate": "2023-09-30", "reportedValue": { "raw": 1.0 } } ]
            }),
        ];

        let (income, balance, cash_flow) = statements_from_timeseries(&results).unwrap();
        assert_eq!(income.periods(), ["2023-09-30", "2022-09-30"]);
        assert_eq!(
            income.item(line_items::PRETAX_INCOME).unwrap(),
            [Some(113.0), Some(119.0)]
        );
        assert!(balance.is_empty());
        assert_eq!(cash_flow.latest(line_items::FREE_CASH_FLOW), Some(99.5));
    }

    #[test]
    fn maps_summary_modules_to_company_info() {
        let response: QuoteSummaryResponse = serde_json::from_value(json!({
            "quoteSummary": {
                "result": [{
                    "price": { "longName": "Apple Inc.", "marketCap": { "raw": 3.0e12, "fmt": "3T" } },
                    "financialData": {
                        "currentPrice": { "raw": 190.5 },
                        "returnOnEquity": { "raw": 1.47 },
                        "totalRevenue": {}
                    },
                    "defaultKeyStatistics": {
                        "bookValue": { "raw": 4.4 },
                        "sharesOutstanding": { "raw": 1.5e10 },
                        "trailingEps": { "raw": 6.4 }
                    }
                }],
                "error": null
            }
        }))
        .unwrap();

        let modules = response.quote_summary.result.unwrap().into_iter().next().unwrap();
        let info = info_from_summary(modules);
        assert_eq!(info.long_name.as_deref(), Some("Apple Inc."));
        assert_eq!(info.market_cap, Some(3.0e12));
        assert_eq!(info.current_price, Some(190.5));
        assert_eq!(info.total_revenue, None);
        assert_eq!(info.trailing_eps, Some(6.4));
    }

    #[test]
    fn chart_error_payload_parses() {
        let response: ChartResponse = serde_json::from_value(json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }))
        .unwrap();
        let symbol: Symbol = "ZZZZ".parse().unwrap();

        assert!(response.chart.result.is_none());
        let err = api_failure(&symbol, response.chart.error);
        assert_eq!(
            err.to_string(),
            "Network error: ZZZZ: No data found, symbol may be delisted (Not Found)"
        );
    }
}
