//! Full BotRunner cycles against fake collaborators.

mod common;

use common::{buy_closes, buy_date, calls, harness, no_signal_closes, series, Call};
use rsibot_core::data::FetchError;
use rsibot_runner::{BuyStatus, Outcome, RunError, Stage};

#[test]
fn buy_cycle_fetches_notifies_and_orders_in_order() {
    let h = harness(Ok(series("AAPL", &buy_closes())), false, false);

    let outcome = h.runner.run_once("AAPL");

    let calls = calls(&h.journal);
    assert_eq!(
        calls[0],
        Call::Fetch {
            symbol: "AAPL".into(),
            window_days: 100
        }
    );
    assert!(matches!(calls[1], Call::Notify(_)));
    assert!(matches!(calls[2], Call::Submit(_)));
    assert_eq!(calls.len(), 3);

    let Outcome::Buy(report) = &outcome else {
        panic!("expected Buy, got {outcome:?}");
    };
    assert_eq!(report.signal.date, buy_date());
    assert!((report.signal.rsi - 400.0 / 17.0).abs() < 1e-9);
    assert_eq!(report.signal.sma, 108.0);
    assert_eq!(report.status(), BuyStatus::Complete);
    assert_eq!(outcome.terminal_stage(), Stage::Done);

    let response = outcome.response();
    assert_eq!(response.status, 200);
    assert!(response.body.contains("ord-1"));
}

#[test]
fn no_signal_cycle_only_fetches() {
    let h = harness(Ok(series("AAPL", &no_signal_closes())), false, false);

    let outcome = h.runner.run_once("AAPL");

    assert_eq!(calls(&h.journal).len(), 1);
    match outcome {
        Outcome::NoSignal { rsi, sma, .. } => {
            assert!((rsi - 4400.0 / 57.0).abs() < 1e-9);
            assert_eq!(sma, 116.0);
        }
        other => panic!("expected NoSignal, got {other:?}"),
    }
}

#[test]
fn short_history_is_insufficient_not_failed() {
    let h = harness(Ok(series("AAPL", &[100.0; 10])), false, false);

    let outcome = h.runner.run_once("AAPL");

    assert_eq!(
        outcome,
        Outcome::InsufficientData {
            bars: 10,
            required: 20
        }
    );
    assert_eq!(outcome.response().status, 200);
}

#[test]
fn flat_history_is_not_ready() {
    let h = harness(Ok(series("AAPL", &[100.0; 30])), false, false);

    let outcome = h.runner.run_once("AAPL");

    assert_eq!(outcome.kind(), "indicators_not_ready");
    assert_eq!(calls(&h.journal).len(), 1);
}

#[test]
fn fetch_error_fails_with_500_and_no_dispatch() {
    let h = harness(Err(FetchError::NetworkUnreachable("dns".into())), false, false);

    let outcome = h.runner.run_once("AAPL");

    assert_eq!(calls(&h.journal).len(), 1);
    let Outcome::Failed(err) = &outcome else {
        panic!("expected Failed, got {outcome:?}");
    };
    assert_eq!(err.stage(), Stage::Fetching);
    assert_eq!(outcome.terminal_stage(), Stage::Failed);
    let response = outcome.response();
    assert_eq!(response.status, 500);
    assert!(response.body.starts_with("Error: "));
    assert!(response.body.contains("dns"));
}

#[test]
fn timeout_is_reported() {
    let h = harness(Err(FetchError::Timeout { after_secs: 30 }), false, false);

    let outcome = h.runner.run_once("AAPL");

    assert!(matches!(
        outcome,
        Outcome::Failed(RunError::Fetch {
            source: FetchError::Timeout { after_secs: 30 },
            ..
        })
    ));
}

#[test]
fn empty_series_is_a_fetch_failure() {
    let h = harness(Ok(series("AAPL", &[])), false, false);

    let outcome = h.runner.run_once("AAPL");

    assert!(matches!(
        outcome,
        Outcome::Failed(RunError::Fetch {
            source: FetchError::EmptySeries { .. },
            ..
        })
    ));
    assert_eq!(outcome.response().status, 500);
}

#[test]
fn wrong_symbol_from_provider_is_rejected() {
    let h = harness(Ok(series("MSFT", &buy_closes())), false, false);

    let outcome = h.runner.run_once("AAPL");

    assert!(matches!(
        outcome,
        Outcome::Failed(RunError::SymbolMismatch { .. })
    ));
    assert_eq!(calls(&h.journal).len(), 1);
}

#[test]
fn symbol_match_ignores_case() {
    let h = harness(Ok(series("aapl", &buy_closes())), false, false);
    assert!(matches!(h.runner.run_once("AAPL"), Outcome::Buy(_)));
}

#[test]
fn order_failure_surfaces_as_500() {
    let h = harness(Ok(series("AAPL", &buy_closes())), false, true);

    let outcome = h.runner.run_once("AAPL");

    assert_eq!(outcome.kind(), "alert_without_order");
    assert_eq!(outcome.response().status, 500);
    // The cycle itself completed; the failure is in the buy report.
    assert_eq!(outcome.terminal_stage(), Stage::Done);
}

#[test]
fn cycles_are_independent() {
    let h = harness(Ok(series("AAPL", &buy_closes())), false, false);

    let first = h.runner.run_once("AAPL");
    let second = h.runner.run_once("AAPL");

    assert_eq!(calls(&h.journal).len(), 6);
    let (Outcome::Buy(a), Outcome::Buy(b)) = (&first, &second) else {
        panic!("expected two buys");
    };
    // Same bar, same key: the broker can reject the duplicate.
    assert_eq!(a.order.client_order_id, b.order.client_order_id);
}

#[test]
fn indicators_view_skips_dispatch() {
    let h = harness(Ok(series("AAPL", &buy_closes())), false, false);

    let points = h.runner.indicators("AAPL").unwrap();

    assert_eq!(points.len(), 26);
    assert!(points.last().unwrap().is_ready());
    assert_eq!(calls(&h.journal).len(), 1);
}

#[test]
fn summary_serializes_buy_fields() {
    let h = harness(Ok(series("AAPL", &buy_closes())), true, false);

    let summary = h.runner.run_once("AAPL").summary();

    assert_eq!(summary.kind, "buy_without_alert");
    assert_eq!(summary.status, 200);
    assert_eq!(summary.order_id.as_deref(), Some("ord-1"));
    assert!(summary.notify_error.is_some());
    assert!(summary.order_error.is_none());

    let json = serde_json::to_value(&summary).unwrap();
    assert!(json.get("order_error").is_none());
    assert_eq!(json["date"], "2024-01-27");
}
