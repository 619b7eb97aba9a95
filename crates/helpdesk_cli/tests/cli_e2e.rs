use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn bin(data_dir: &Path) -> Command {
    let path = assert_cmd::cargo::cargo_bin!("helpdesk");
    let mut cmd = Command::new(path);
    cmd.env_remove("HELPDESK_CONFIG")
        .env_remove("TIMEOUT_MINUTES")
        .env("RUST_LOG", "warn")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn run_json(data_dir: &Path, args: &[&str]) -> Value {
    let assert = bin(data_dir)
        .args(["--output", "json"])
        .args(args)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    serde_json::from_str(&stdout).unwrap()
}

#[test]
fn unknown_question_is_escalated_and_announced() {
    let dir = TempDir::new().unwrap();

    let outcome = run_json(
        dir.path(),
        &["ask", "--customer", "Asha", "--question", "Do you do bridal makeup?"],
    );
    assert_eq!(outcome["source"]["kind"], "escalated");
    assert_eq!(
        outcome["response"],
        "Let me check with my supervisor and get back to you."
    );
    let ticket_id = outcome["source"]["ticket_id"].as_str().unwrap().to_string();

    let pending = run_json(dir.path(), &["tickets", "list", "--status", "pending"]);
    assert_eq!(pending["total_items"], 1);
    assert_eq!(pending["items"][0]["id"], ticket_id.as_str());
    assert_eq!(pending["items"][0]["customer_name"], "Asha");

    let outbox = fs::read_to_string(dir.path().join("outbox.jsonl")).unwrap();
    let lines: Vec<&str> = outbox.lines().collect();
    assert_eq!(lines.len(), 1);
    let event: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(event["type"], "supervisor.help_needed");
    assert_eq!(event["payload"]["help_request_id"], ticket_id.as_str());
}

#[test]
fn resolved_answer_is_learned_and_reused() {
    let dir = TempDir::new().unwrap();
    let question = "Do you offer keratin treatment?";

    let first = run_json(dir.path(), &["ask", "--customer", "Ravi", "--question", question]);
    let ticket_id = first["source"]["ticket_id"].as_str().unwrap().to_string();

    let resolution = run_json(
        dir.path(),
        &[
            "tickets",
            "resolve",
            "--id",
            &ticket_id,
            "--answer",
            "Yes, keratin takes about two hours.",
            "--supervisor",
            "sup-1",
            "--save-to-kb",
        ],
    );
    assert_eq!(resolution["request"]["status"], "resolved");
    let learned = resolution["learned_entry_id"].as_str().unwrap().to_string();

    let second = run_json(dir.path(), &["ask", "--customer", "Meera", "--question", question]);
    assert_eq!(second["source"]["kind"], "knowledge");
    assert_eq!(second["source"]["entry_id"], learned.as_str());
    assert!(second["response"]
        .as_str()
        .unwrap()
        .contains("keratin takes about two hours"));

    let entry = run_json(dir.path(), &["kb", "show", "--id", &learned]);
    assert_eq!(entry["category"], "Learned");
    assert_eq!(entry["usage_count"], 1);

    let outbox = fs::read_to_string(dir.path().join("outbox.jsonl")).unwrap();
    assert!(outbox.contains("customer.follow_up"));
}

#[test]
fn kb_add_then_match_tolerates_typos() {
    let dir = TempDir::new().unwrap();

    let entry = run_json(
        dir.path(),
        &[
            "kb",
            "add",
            "--question",
            "How do I book an appointment?",
            "--answer",
            "Call us or book online.",
        ],
    );
    let id = entry["id"].as_str().unwrap().to_string();
    assert_eq!(entry["category"], "General");

    let hit = run_json(
        dir.path(),
        &["match", "--question", "How do I book an appointmnet?", "--top", "3"],
    );
    assert_eq!(hit["matched"], true);
    assert_eq!(hit["entry"]["id"], id.as_str());
    assert!(hit["score"].as_f64().unwrap() >= 0.6);
    assert_eq!(hit["candidates"].as_array().unwrap().len(), 1);

    let miss = run_json(dir.path(), &["match", "--question", "???"]);
    assert_eq!(miss["matched"], false);
    assert_eq!(miss["score"], 0.0);
    assert!(miss["entry"].is_null());

    bin(dir.path())
        .args([
            "kb",
            "add",
            "--question",
            "How do I book an appointment?",
            "--answer",
            "again",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn business_facts_answer_before_escalating() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("helpdesk.toml");
    fs::write(
        &config,
        r#"
[business]
name = "Bella's Hair Salon"
hours = "9 AM - 6 PM"
address = "123 Main Street"
phone = "(555) 123-4567"
services = ["Hair Cut", "Styling"]
"#,
    )
    .unwrap();

    bin(dir.path())
        .args(["--config", config.to_str().unwrap()])
        .args(["ask", "--customer", "Kim", "--question", "What are your hours?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("source=default_rule"))
        .stdout(predicate::str::contains("9 AM - 6 PM"));

    assert!(!dir.path().join("outbox.jsonl").exists());
}

#[test]
fn eval_fails_below_required_pass_rate() {
    let dir = TempDir::new().unwrap();
    run_json(
        dir.path(),
        &[
            "kb",
            "add",
            "--question",
            "What are your opening hours?",
            "--answer",
            "9 to 6.",
        ],
    );

    let cases = dir.path().join("cases.json");
    fs::write(
        &cases,
        r#"[
  {"case_id": "hours", "question": "What are your hours?", "expected_decision": "hit"},
  {"case_id": "empty", "question": "???", "expected_decision": "miss"},
  {"case_id": "wrong", "question": "Can I bring my dog?", "expected_decision": "hit"}
]"#,
    )
    .unwrap();

    let summary = run_json(
        dir.path(),
        &["eval", "--cases", cases.to_str().unwrap(), "--min-pass-rate", "0.6"],
    );
    assert_eq!(summary["total"], 3);
    assert_eq!(summary["passed"], 2);
    assert_eq!(summary["meets_threshold"], true);

    bin(dir.path())
        .args(["eval", "--cases", cases.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("below the required"));
}

#[test]
fn expire_marks_pending_tickets_unresolved() {
    let dir = TempDir::new().unwrap();
    run_json(
        dir.path(),
        &["ask", "--customer", "Lee", "--question", "Is there parking nearby?"],
    );

    let expired = run_json(dir.path(), &["tickets", "expire", "--timeout-minutes", "0"]);
    assert_eq!(expired["expired"], 1);

    let unresolved = run_json(dir.path(), &["tickets", "list", "--status", "unresolved"]);
    assert_eq!(unresolved["total_items"], 1);
    assert_eq!(unresolved["items"][0]["is_timeout_resolved"], true);

    let again = run_json(dir.path(), &["tickets", "expire", "--timeout-minutes", "0"]);
    assert_eq!(again["expired"], 0);
}

#[test]
fn threshold_override_must_be_a_non_negative_number() {
    let dir = TempDir::new().unwrap();

    for threshold in ["--threshold=NaN", "--threshold=-1", "--threshold=inf"] {
        bin(dir.path())
            .args(["match", "--question", "What are your hours?", threshold])
            .assert()
            .failure()
            .stderr(predicate::str::contains("accept_threshold"));
    }

    let cases = dir.path().join("cases.json");
    fs::write(&cases, "[]").unwrap();
    bin(dir.path())
        .args(["eval", "--cases", cases.to_str().unwrap(), "--threshold=NaN"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --threshold"));

    let ok = run_json(
        dir.path(),
        &["match", "--question", "What are your hours?", "--threshold", "0.9"],
    );
    assert_eq!(ok["matched"], false);
}

#[test]
fn huge_page_and_timeout_values_do_not_crash() {
    let dir = TempDir::new().unwrap();
    run_json(
        dir.path(),
        &["ask", "--customer", "Lee", "--question", "Is there parking nearby?"],
    );

    let page = run_json(
        dir.path(),
        &["tickets", "list", "--page", "18446744073709551615"],
    );
    assert_eq!(page["total_items"], 1);
    assert!(page["items"].as_array().unwrap().is_empty());

    let expired = run_json(
        dir.path(),
        &["tickets", "expire", "--timeout-minutes", "18446744073709551615"],
    );
    assert_eq!(expired["expired"], 0);
}
