//! Integration tests for the `hostal` CLI binary.
//!
//! These use `assert_cmd` and `predicates` to exercise the analyze, check,
//! and respond subcommands through the actual binary, including stdin
//! piping, fixture-backed calendar feeds, and the consistency gate.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the feed.json fixture.
fn feed_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/feed.json")
}

/// Helper: path to the kb.json fixture.
fn kb_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/kb.json")
}

fn hostal() -> Command {
    Command::cargo_bin("hostal").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Analyze subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn analyze_extracts_dates_and_intents() {
    hostal()
        .args([
            "analyze",
            "esta disponible del 2/2 al 5/2? hay wifi?",
            "--today",
            "2026-01-05",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-02-02"))
        .stdout(predicate::str::contains("2026-02-05"))
        .stdout(predicate::str::contains("availability"))
        .stdout(predicate::str::contains("amenities"));
}

#[test]
fn analyze_reads_message_from_stdin() {
    hostal()
        .args(["analyze", "--today", "2026-01-05"])
        .write_stdin("hay wifi y estacionamiento?")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"has_dates\": false"))
        .stdout(predicate::str::contains("amenities"));
}

#[test]
fn analyze_without_dates_reports_empty_list() {
    hostal()
        .args(["analyze", "gracias por todo!", "--today", "2026-01-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dates\": []"))
        .stdout(predicate::str::contains("other"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Check subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_reports_conflict_against_fixture_feed() {
    hostal()
        .args([
            "check",
            "esta disponible del 2/2 al 5/2?",
            "--today",
            "2026-01-05",
            "--property",
            "RECOLETA-PATIO",
            "--calendar",
            feed_path(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("unavailable"))
        .stdout(predicate::str::contains(
            "NO DISPONIBLE. Hay una reserva del 2026-02-02 al 2026-02-06.",
        ));
}

#[test]
fn check_confirms_free_range() {
    hostal()
        .args([
            "check",
            "del 10 al 15 de enero",
            "--today",
            "2026-01-05",
            "--property",
            "RECOLETA-PATIO",
            "--calendar",
            feed_path(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "DISPONIBLE del 10/01/2026 al 15/01/2026 (5 noches).",
        ))
        .stdout(predicate::str::contains("[VERIFICADO_ICAL]"));
}

#[test]
fn check_detects_recurring_block() {
    // The fixture blocks Mondays from 2026-03-02 for four weeks.
    hostal()
        .args([
            "check",
            "esta libre el 9/3?",
            "--today",
            "2026-03-01",
            "--property",
            "RECOLETA-PATIO",
            "--calendar",
            feed_path(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "NO DISPONIBLE. Hay una reserva del 2026-03-09 al 2026-03-10.",
        ));
}

#[test]
fn check_without_dates_is_a_rejection() {
    hostal()
        .args([
            "check",
            "hola, como andan?",
            "--today",
            "2026-01-05",
            "--property",
            "RECOLETA-PATIO",
            "--calendar",
            feed_path(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Necesito fechas de check-in y check-out.",
        ));
}

#[test]
fn check_without_property_is_a_rejection() {
    hostal()
        .args([
            "check",
            "del 10 al 15 de enero",
            "--today",
            "2026-01-05",
            "--calendar",
            feed_path(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Necesito saber a que propiedad te referis.",
        ));
}

#[test]
fn check_with_unreadable_feed_reports_unknown() {
    hostal()
        .args([
            "check",
            "del 10 al 15 de enero",
            "--today",
            "2026-01-05",
            "--property",
            "RECOLETA-PATIO",
            "--calendar",
            "/nonexistent/feed.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown"))
        .stdout(predicate::str::contains("calendar fetch failed"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Respond subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn respond_produces_consistent_reply() {
    hostal()
        .args([
            "respond",
            "esta disponible del 2/2 al 5/2? hay wifi?",
            "--today",
            "2026-01-05",
            "--property",
            "RECOLETA-PATIO",
            "--calendar",
            feed_path(),
            "--kb",
            kb_path(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("NO DISPONIBLE"))
        .stdout(predicate::str::contains("wifi"))
        .stdout(predicate::str::contains("\"corrected\": false"));
}

#[test]
fn respond_defers_unanswerable_amenities() {
    // No knowledge base: the template generator cannot mention wifi, so
    // the consistency gate rewrites the reply with a deferral.
    hostal()
        .args([
            "respond",
            "esta disponible del 2/2 al 5/2? hay wifi?",
            "--today",
            "2026-01-05",
            "--property",
            "RECOLETA-PATIO",
            "--calendar",
            feed_path(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"corrected\": true"))
        .stdout(predicate::str::contains("comodidades del lugar"))
        .stdout(predicate::str::contains(
            "Respuesta corregida por inconsistencias detectadas",
        ));
}

#[test]
fn respond_honours_custom_signature() {
    hostal()
        .args([
            "respond",
            "hay wifi?",
            "--today",
            "2026-01-05",
            "--property",
            "RECOLETA-PATIO",
            "--kb",
            kb_path(),
            "--signature",
            "Maria",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saludos,\\nMaria"));
}
