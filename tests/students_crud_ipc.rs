use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_srmsd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn srmsd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({ "id": id, "method": method, "params": params });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn request_err_code(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> String {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "{} unexpectedly succeeded: {}",
        method,
        value
    );
    value["error"]["code"].as_str().expect("error code").to_string()
}

fn admin_sidecar(prefix: &str) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let workspace = temp_dir(prefix);
    let (child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "w",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "login",
        "auth.login",
        json!({ "role": "admin", "credentials": { "id": "90632", "pass": "180406" } }),
    );
    (child, stdin, reader)
}

fn add_params(roll: &str) -> serde_json::Value {
    json!({
        "name": format!("Student {roll}"), "roll": roll, "dob": "2003-05-01",
        "p_mobile": "9876543210", "branch": "CSE", "section": "A",
        "fees": "45000", "cgpa": "8.9"
    })
}

#[test]
fn add_fills_the_fixed_defaults() {
    let (_child, mut stdin, mut reader) = admin_sidecar("srms-add");
    let res = request_ok(&mut stdin, &mut reader, "add", "students.add", add_params("R1"));
    let s = &res["student"];
    assert_eq!(s["roll"], "R1");
    assert_eq!(s["sem"], "1");
    assert_eq!(s["mobile"], "0000000000");
    assert_eq!(s["degree"], "B.Tech");
    assert_eq!(s["club"], "None");
    assert_eq!(s["father"], "-");
    assert_eq!(s["mother"], "-");
    assert_eq!(s["fee_status"], "Pending");
    assert_eq!(s["attendance"], "85%");
}

#[test]
fn duplicate_roll_is_rejected_without_side_effects() {
    let (_child, mut stdin, mut reader) = admin_sidecar("srms-dup");
    let _ = request_ok(&mut stdin, &mut reader, "a1", "students.add", add_params("R1"));
    let code = request_err_code(&mut stdin, &mut reader, "a2", "students.add", add_params("R1"));
    assert_eq!(code, "duplicate_roll");

    let res = request_ok(&mut stdin, &mut reader, "l", "students.list", json!({}));
    assert_eq!(res["students"].as_array().expect("array").len(), 1);
}

#[test]
fn edit_changes_only_the_editable_fields() {
    let (_child, mut stdin, mut reader) = admin_sidecar("srms-edit");
    let before = request_ok(&mut stdin, &mut reader, "a", "students.add", add_params("R1"));
    let res = request_ok(
        &mut stdin,
        &mut reader,
        "e",
        "students.edit",
        json!({
            "roll": "R1",
            "patch": {
                "name": "Renamed", "dob": "2002-11-30", "p_mobile": "9111111111",
                "branch": "ECE", "section": "B", "fees": "50000", "cgpa": "9.1"
            }
        }),
    );
    let s = &res["student"];
    assert_eq!(s["name"], "Renamed");
    assert_eq!(s["dob"], "2002-11-30");
    assert_eq!(s["fees"], "50000");
    // Identity and non-editable fields are bit-identical to the added record.
    assert_eq!(s["roll"], before["student"]["roll"]);
    assert_eq!(s["mobile"], before["student"]["mobile"]);
    assert_eq!(s["fee_status"], before["student"]["fee_status"]);
    assert_eq!(s["sem"], before["student"]["sem"]);
    assert_eq!(s["degree"], before["student"]["degree"]);
    assert_eq!(s["attendance"], before["student"]["attendance"]);

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "ghost",
        "students.edit",
        json!({
            "roll": "ghost",
            "patch": {
                "name": "x", "dob": "x", "p_mobile": "x",
                "branch": "x", "section": "x", "fees": "x", "cgpa": "x"
            }
        }),
    );
    assert_eq!(code, "not_found");
}

#[test]
fn delete_removes_exactly_the_named_record() {
    let (_child, mut stdin, mut reader) = admin_sidecar("srms-del");
    let _ = request_ok(&mut stdin, &mut reader, "a1", "students.add", add_params("R1"));
    let _ = request_ok(&mut stdin, &mut reader, "a2", "students.add", add_params("R2"));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "d1",
        "students.delete",
        json!({ "roll": "R1" }),
    );
    let res = request_ok(&mut stdin, &mut reader, "l", "students.list", json!({}));
    let students = res["students"].as_array().expect("array");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["roll"], "R2");

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "d2",
        "students.delete",
        json!({ "roll": "R1" }),
    );
    assert_eq!(code, "not_found");
    let res = request_ok(&mut stdin, &mut reader, "l2", "students.list", json!({}));
    assert_eq!(res["students"].as_array().expect("array").len(), 1);
}

#[test]
fn student_session_sees_own_profile_and_updates_mobile() {
    let (_child, mut stdin, mut reader) = admin_sidecar("srms-me");
    let _ = request_ok(&mut stdin, &mut reader, "a", "students.add", add_params("R1"));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "in",
        "auth.login",
        json!({ "role": "student", "credentials": { "roll": "R1", "pass": "2003-05-01" } }),
    );

    let res = request_ok(&mut stdin, &mut reader, "me", "students.me", json!({}));
    assert_eq!(res["student"]["roll"], "R1");

    let res = request_ok(
        &mut stdin,
        &mut reader,
        "mob",
        "students.updateMobile",
        json!({ "mobile": "9999999999" }),
    );
    assert_eq!(res["student"]["mobile"], "9999999999");
    // Everything else untouched.
    assert_eq!(res["student"]["p_mobile"], "9876543210");
    assert_eq!(res["student"]["fee_status"], "Pending");

    let res = request_ok(&mut stdin, &mut reader, "me2", "students.me", json!({}));
    assert_eq!(res["student"]["mobile"], "9999999999");
}

#[test]
fn parent_session_sees_child_profile_but_cannot_update_mobile() {
    let (_child, mut stdin, mut reader) = admin_sidecar("srms-parent-me");
    let _ = request_ok(&mut stdin, &mut reader, "a", "students.add", add_params("R1"));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "in",
        "auth.login",
        json!({ "role": "parent", "credentials": { "mobile": "9876543210", "pass": "2003-05-01" } }),
    );

    let res = request_ok(&mut stdin, &mut reader, "me", "students.me", json!({}));
    assert_eq!(res["student"]["roll"], "R1");

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "mob",
        "students.updateMobile",
        json!({ "mobile": "9999999999" }),
    );
    assert_eq!(code, "forbidden");
}

#[test]
fn admin_session_has_no_linked_profile() {
    let (_child, mut stdin, mut reader) = admin_sidecar("srms-admin-me");
    let code = request_err_code(&mut stdin, &mut reader, "me", "students.me", json!({}));
    assert_eq!(code, "forbidden");
}
