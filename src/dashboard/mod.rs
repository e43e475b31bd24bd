use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use crate::calc::format::{format_currency, format_percent, round_to};
use crate::calc::kelly::{edge, FORMULA};
use crate::calc::{
    compute_implied_probabilities, compute_wager, parse_input, KellyInput, MarketType,
    ValidationError, DECIMAL_PLACES,
};

#[derive(Clone)]
pub struct AppState {
    /// Kelly multiplier applied when a request omits `kelly_fraction`.
    pub default_multiplier: f64,
}

/// Build the Axum router for the calculator page and API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/kelly", post(kelly_handler))
        .route("/api/wager", post(wager_handler))
        .route("/api/implied-probability", post(implied_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

// ── Request payloads ─────────────────────────────────────────────────────────
//
// Form fields may arrive as JSON numbers or as the raw text of an input box.
// Anything that does not parse is carried as NaN so validation reports it.

fn nan() -> f64 {
    f64::NAN
}

fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_input(s),
        _ => f64::NAN,
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(value_to_f64(&Value::deserialize(deserializer)?))
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        v => Some(value_to_f64(&v)),
    })
}

fn lenient_vec_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().map(value_to_f64).collect(),
        Value::Null => Vec::new(),
        other => vec![value_to_f64(&other)],
    })
}

#[derive(Debug, Deserialize)]
pub struct KellyRequest {
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub probability: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub odds: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub kelly_fraction: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct WagerRequest {
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub bankroll: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub wager_percentage: f64,
}

#[derive(Debug, Deserialize)]
pub struct ImpliedRequest {
    #[serde(default, deserialize_with = "lenient_vec_f64")]
    pub odds: Vec<f64>,
}

// ── Responses ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct KellyResponse {
    pub bet: bool,
    /// Recommended fraction of bankroll (0 when there is no edge).
    pub fraction: f64,
    pub display: String,
    pub interpretation: String,
    pub edge: f64,
    pub formula: &'static str,
    /// Value a front end may copy into the wager form.
    pub wager_percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct WagerResponse {
    pub wager_amount: f64,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct OutcomeProbability {
    pub label: &'static str,
    pub probability: f64,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct ImpliedResponse {
    pub market: MarketType,
    pub outcomes: Vec<OutcomeProbability>,
    pub overround_percent: f64,
    pub overround_display: String,
    pub margin_percent: f64,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

fn rejection(endpoint: &str, err: ValidationError) -> (StatusCode, Json<ErrorBody>) {
    warn!(endpoint, error = ?err, "Rejected calculator input");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// Serve the calculator page.
async fn index_handler() -> impl IntoResponse {
    Html(CALCULATOR_HTML)
}

async fn health_handler() -> &'static str {
    "ok"
}

/// POST /api/kelly
async fn kelly_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<KellyRequest>,
) -> ApiResult<KellyResponse> {
    let input = KellyInput {
        win_probability: req.probability,
        decimal_odds: req.odds,
        kelly_multiplier: req.kelly_fraction.unwrap_or(state.default_multiplier),
    };
    let outcome = input.evaluate().map_err(|e| rejection("kelly", e))?;
    debug!(?input, ?outcome, "Kelly evaluated");

    Ok(Json(KellyResponse {
        bet: outcome.is_bet(),
        fraction: outcome.fraction(),
        display: outcome.display(),
        interpretation: outcome.interpretation(),
        edge: edge(input.win_probability, input.decimal_odds),
        formula: FORMULA,
        wager_percentage: outcome.suggested_wager_percentage(),
    }))
}

/// POST /api/wager
async fn wager_handler(Json(req): Json<WagerRequest>) -> ApiResult<WagerResponse> {
    let amount =
        compute_wager(req.bankroll, req.wager_percentage).map_err(|e| rejection("wager", e))?;
    debug!(amount, "Wager computed");

    Ok(Json(WagerResponse {
        wager_amount: round_to(amount, DECIMAL_PLACES),
        display: format_currency(amount),
    }))
}

/// POST /api/implied-probability
async fn implied_handler(Json(req): Json<ImpliedRequest>) -> ApiResult<ImpliedResponse> {
    let result =
        compute_implied_probabilities(&req.odds).map_err(|e| rejection("implied-probability", e))?;
    debug!(?result, "Implied probabilities computed");

    let outcomes = result
        .labelled()
        .into_iter()
        .map(|(label, p)| OutcomeProbability {
            label,
            probability: round_to(p, DECIMAL_PLACES),
            display: format_percent(p),
        })
        .collect();

    Ok(Json(ImpliedResponse {
        market: result.market,
        outcomes,
        overround_percent: round_to(result.overround_percent, DECIMAL_PLACES),
        overround_display: format_percent(result.overround_percent),
        margin_percent: round_to(result.margin_percent(), DECIMAL_PLACES),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn state() -> State<Arc<AppState>> {
        State(Arc::new(AppState {
            default_multiplier: 1.0,
        }))
    }

    #[tokio::test]
    async fn test_kelly_handler_accepts_strings_and_numbers() {
        let req: KellyRequest =
            serde_json::from_value(json!({ "probability": "0.55", "odds": 2.0 })).unwrap();
        let Json(resp) = kelly_handler(state(), Json(req)).await.unwrap();
        assert!(resp.bet);
        assert_eq!(resp.display, "10.00%");
        assert_relative_eq!(resp.wager_percentage, 10.0, epsilon = 1e-9);
        assert_relative_eq!(resp.edge, 0.1, epsilon = 1e-9);
    }

    #[tokio::test]
    async fn test_kelly_handler_uses_request_multiplier() {
        let req: KellyRequest = serde_json::from_value(
            json!({ "probability": 0.55, "odds": 2.0, "kelly_fraction": "0.5" }),
        )
        .unwrap();
        let Json(resp) = kelly_handler(state(), Json(req)).await.unwrap();
        assert_eq!(resp.display, "5.00%");
        assert!(resp.interpretation.contains("Half Kelly"));
    }

    #[tokio::test]
    async fn test_kelly_handler_rejects_empty_field() {
        let req: KellyRequest =
            serde_json::from_value(json!({ "probability": "", "odds": 2.0 })).unwrap();
        let (status, Json(body)) = kelly_handler(state(), Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error, "Please enter valid numbers for both fields.");
    }

    #[tokio::test]
    async fn test_kelly_handler_missing_field_is_non_numeric() {
        let req: KellyRequest = serde_json::from_value(json!({ "odds": 2.0 })).unwrap();
        assert!(req.probability.is_nan());
        assert!(kelly_handler(state(), Json(req)).await.is_err());
    }

    #[tokio::test]
    async fn test_wager_handler() {
        let req: WagerRequest =
            serde_json::from_value(json!({ "bankroll": 1000, "wager_percentage": "7.5" }))
                .unwrap();
        let Json(resp) = wager_handler(Json(req)).await.unwrap();
        assert_relative_eq!(resp.wager_amount, 75.0, epsilon = 1e-9);
        assert_eq!(resp.display, "$75.00");
    }

    #[tokio::test]
    async fn test_wager_handler_rejects_negative_bankroll() {
        let req: WagerRequest =
            serde_json::from_value(json!({ "bankroll": -10, "wager_percentage": 5 })).unwrap();
        let (status, Json(body)) = wager_handler(Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error, "Bankroll cannot be negative.");
    }

    #[tokio::test]
    async fn test_implied_handler_three_way() {
        let req: ImpliedRequest =
            serde_json::from_value(json!({ "odds": [1.5, "2.5", 4] })).unwrap();
        let Json(resp) = implied_handler(Json(req)).await.unwrap();
        assert_eq!(resp.market, MarketType::ThreeWay);
        let labels: Vec<&str> = resp.outcomes.iter().map(|o| o.label).collect();
        assert_eq!(labels, vec!["Home Win", "Draw", "Away Win"]);
        assert_eq!(resp.outcomes[0].display, "50.63%");
        assert_eq!(resp.overround_display, "131.67%");
    }

    #[tokio::test]
    async fn test_implied_handler_missing_odds_is_validation_error() {
        let req: ImpliedRequest = serde_json::from_value(json!({})).unwrap();
        let (status, Json(body)) = implied_handler(Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error, "A market must have 2 or 3 outcomes, got 0.");
    }

    #[tokio::test]
    async fn test_implied_handler_scalar_odds_is_validation_error() {
        let req: ImpliedRequest = serde_json::from_value(json!({ "odds": "abc" })).unwrap();
        assert!(req.odds[0].is_nan());
        let (status, _) = implied_handler(Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_wager_handler_tie_matches_display() {
        let req: WagerRequest =
            serde_json::from_value(json!({ "bankroll": 1, "wager_percentage": 12.5 })).unwrap();
        let Json(resp) = wager_handler(Json(req)).await.unwrap();
        assert_eq!(resp.wager_amount, 0.13);
        assert_eq!(resp.display, "$0.13");
    }

    #[tokio::test]
    async fn test_implied_handler_rejects_bad_entry() {
        let req: ImpliedRequest =
            serde_json::from_value(json!({ "odds": [2.0, null] })).unwrap();
        let (_, Json(body)) = implied_handler(Json(req)).await.unwrap_err();
        assert_eq!(body.error, "Please enter valid decimal odds for all outcomes.");
    }
}

/// Embedded single-file calculator page (HTML + CSS + JS)
const CALCULATOR_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Kelly Criterion Calculator</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fill, minmax(300px, 1fr)); }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; display: grid; gap: .8rem; align-content: start; }
  .panel h2 { font-size: 1rem; font-weight: 600; }
  label { color: var(--muted); font-size: .8rem; text-transform: uppercase; letter-spacing: .06em; display: block; margin-bottom: .3rem; }
  input, select { width: 100%; padding: .5rem; background: var(--bg); color: var(--text); border: 1px solid var(--border); border-radius: 6px; }
  button { padding: .6rem; background: var(--accent); color: #fff; border: none; border-radius: 6px; font-weight: 600; cursor: pointer; }
  .formula { font-family: monospace; color: var(--muted); }
  .result { font-size: 1.5rem; font-weight: 700; color: var(--green); }
  .note { color: var(--muted); font-size: .85rem; }
  .error { color: var(--red); font-size: .9rem; }
  .hidden { display: none; }
</style>
</head>
<body>
<header><h1>Kelly Criterion Calculator</h1></header>
<main>
  <section class="panel">
    <h2>Optimal bet size</h2>
    <div class="formula">f* = (bp - q) / b</div>
    <div><label for="probability">Probability of winning (0-1)</label><input id="probability" type="number" step="0.01" placeholder="e.g., 0.55"></div>
    <div><label for="odds">Decimal odds</label><input id="odds" type="number" step="0.01" placeholder="e.g., 2.00"></div>
    <div><label for="kelly_fraction">Strategy</label>
      <select id="kelly_fraction">
        <option value="1">Full Kelly (100%)</option>
        <option value="0.5">Half Kelly (50%)</option>
        <option value="0.25">Quarter Kelly (25%)</option>
      </select>
    </div>
    <button id="calculateBtn">Calculate</button>
    <div id="result" class="hidden"><div id="result-text" class="result"></div><p id="interpretation" class="note"></p></div>
    <div id="error" class="error hidden"></div>
  </section>

  <section class="panel">
    <h2>Wager amount</h2>
    <div><label for="bankroll">Bankroll</label><input id="bankroll" type="number" step="0.01" placeholder="e.g., 1000"></div>
    <div><label for="wager_percentage">Wager percentage</label><input id="wager_percentage" type="number" step="0.01" placeholder="e.g., 5"></div>
    <button id="calculateWagerBtn">Calculate wager</button>
    <div id="wager_result" class="result hidden"></div>
    <div id="wager_error" class="error hidden"></div>
  </section>

  <section class="panel">
    <h2>Implied probability</h2>
    <div><label for="market_type">Market</label>
      <select id="market_type">
        <option value="2">2 outcomes</option>
        <option value="3">3 outcomes (home / draw / away)</option>
      </select>
    </div>
    <div id="odds_container" style="display:grid;gap:.8rem"></div>
    <button id="calculateProbBtn">Calculate probabilities</button>
    <div id="prob_result" class="hidden"></div>
    <div id="prob_error" class="error hidden"></div>
  </section>
</main>
<script>
const $ = (id) => document.getElementById(id);
const LABELS = { 2: ['Outcome 1', 'Outcome 2'], 3: ['Home Win', 'Draw', 'Away Win'] };

async function call(path, body) {
  const res = await fetch(path, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(body) });
  const data = await res.json();
  if (!res.ok) throw new Error(data.error || 'Request failed');
  return data;
}

function show(resultId, errorId, err) {
  $(resultId).classList.toggle('hidden', !!err);
  $(errorId).classList.toggle('hidden', !err);
  if (err) $(errorId).textContent = err.message;
}

$('calculateBtn').addEventListener('click', async () => {
  try {
    const data = await call('/api/kelly', {
      probability: $('probability').value,
      odds: $('odds').value,
      kelly_fraction: $('kelly_fraction').value,
    });
    $('result-text').textContent = data.display;
    $('interpretation').textContent = data.interpretation;
    $('wager_percentage').value = data.wager_percentage;
    show('result', 'error');
  } catch (e) { show('result', 'error', e); }
});

$('calculateWagerBtn').addEventListener('click', async () => {
  try {
    const data = await call('/api/wager', {
      bankroll: $('bankroll').value,
      wager_percentage: $('wager_percentage').value,
    });
    $('wager_result').textContent = data.display;
    show('wager_result', 'wager_error');
  } catch (e) { show('wager_result', 'wager_error', e); }
});

function renderOddsInputs() {
  const labels = LABELS[$('market_type').value];
  $('odds_container').innerHTML = labels.map((label, i) =>
    `<div><label for="prob_odds_${i}">${label} odds</label><input id="prob_odds_${i}" type="number" step="0.01" placeholder="e.g., 1.80"></div>`
  ).join('');
}
$('market_type').addEventListener('change', renderOddsInputs);
renderOddsInputs();

$('calculateProbBtn').addEventListener('click', async () => {
  const count = parseInt($('market_type').value, 10);
  const odds = [];
  for (let i = 0; i < count; i++) odds.push($(`prob_odds_${i}`).value);
  try {
    const data = await call('/api/implied-probability', { odds });
    const items = data.outcomes.map(o => `<li><strong>${o.label}:</strong> ${o.display}</li>`).join('');
    $('prob_result').innerHTML = `<ul>${items}</ul><p class="note"><strong>Total (Overround):</strong> ${data.overround_display}</p>`;
    show('prob_result', 'prob_error');
  } catch (e) { show('prob_result', 'prob_error', e); }
});
</script>
</body>
</html>
"#;
