use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run_script(dir: &Path, script: &str) -> Output {
    run_script_with(dir, script, &[])
}

fn run_script_with(dir: &Path, script: &str, env: &[(&str, &str)]) -> Output {
    let path = dir.join("script.icsh");
    fs::write(&path, script).expect("failed to write script");
    Command::new(env!("CARGO_BIN_EXE_icsh"))
        .arg(&path)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .envs(env.iter().copied())
        .output()
        .expect("failed to run icsh")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn echo_words() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "echo hello   world\necho\n");
    assert_eq!(stdout(&output), "hello world\n\n");
    assert!(output.status.success());
}

#[test]
fn status_of_last_foreground_command() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("wrap.sh"), "exit 257\n").unwrap();
    fs::write(dir.path().join("three.sh"), "exit 3\n").unwrap();

    let output = run_script(
        dir.path(),
        "false\necho $?\ntrue\necho $?\nsh three.sh\necho $?\nsh wrap.sh\necho $?\n",
    );
    assert_eq!(stdout(&output), "1\n0\n3\n1\n");
}

#[test]
fn builtins_leave_status_alone() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "false\necho x\njobs\necho $?\n");
    assert_eq!(stdout(&output), "x\n1\n");
}

#[test]
fn builtin_output_redirect_is_temporary() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "echo hi > out.txt\necho world\ncat < out.txt\n");
    assert_eq!(stdout(&output), "world\nhi\n");
    assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), "hi\n");
}

#[test]
fn builtin_redirect_failure_restores_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "echo hi > missing/dir/out.txt\necho after\n");
    assert_eq!(stdout(&output), "after\n");
    assert!(stderr(&output).contains("missing/dir/out.txt"));
}

#[test]
fn external_redirects() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in.txt"), "b\na\n").unwrap();
    let output = run_script(dir.path(), "sort < in.txt > sorted.txt\necho $?\n");
    assert_eq!(stdout(&output), "0\n");
    assert_eq!(
        fs::read_to_string(dir.path().join("sorted.txt")).unwrap(),
        "a\nb\n"
    );
}

#[test]
fn external_input_missing() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "cat < nope.txt\necho $?\n");
    assert_eq!(stdout(&output), "1\n");
    assert!(stderr(&output).contains("nope.txt"));
}

#[test]
fn background_redirect_failure_keeps_status() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "true\ncat < nope.txt &\necho $?\njobs\n");
    assert_eq!(stdout(&output), "0\n");
    assert!(stderr(&output).contains("nope.txt"));
}

#[test]
fn unknown_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "true\nno_such_command_icsh\necho $?\n");
    assert_eq!(stdout(&output), "1\n");
    assert!(stderr(&output).contains("command not found: no_such_command_icsh"));
}

#[test]
fn fg_without_jobs() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "true\nfg\nbg %4\necho $?\n");
    assert_eq!(stdout(&output), "0\n");
    let err = stderr(&output);
    assert!(err.contains("no current job"));
    assert!(err.contains("%4: no such job"));
}

#[test]
fn bang_bang_replays() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "!!\necho a\n!!\n");
    assert_eq!(stdout(&output), "a\necho a\na\n");
}

#[test]
fn exit_wraps_code() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "exit 300\necho unreachable\n");
    assert_eq!(stdout(&output), "bye\n");
    assert_eq!(output.status.code(), Some(44));

    let output = run_script(dir.path(), "exit\n");
    assert_eq!(output.status.code(), Some(0));

    let output = run_script(dir.path(), "exit 12abc\n");
    assert_eq!(output.status.code(), Some(12));
}

#[test]
fn end_of_script_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "false\n");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn background_job_listed() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "sleep 1 &\njobs\n");
    let out = stdout(&output);
    assert!(out.starts_with("[1] "), "unexpected output: {:?}", out);
    assert!(out.contains("[1]  Running     sleep 1 &\n"));
}

#[test]
fn done_reported_while_foreground_runs() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "sleep 0.2 &\nsleep 1\necho $?\njobs\n");
    let out = stdout(&output);
    assert!(out.contains("\r[1]  Done     sleep 0.2\n"), "unexpected output: {:?}", out);
    assert!(out.ends_with("0\n"), "unexpected output: {:?}", out);
}

#[test]
fn status_lines_skip_builtin_redirect() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "sleep 0.2 &\nsleep 1 &\nfg %2 > out.txt\n");
    let out = stdout(&output);
    assert!(out.contains("\r[1]  Done     sleep 0.2\n"), "unexpected output: {:?}", out);
    assert_eq!(
        fs::read_to_string(dir.path().join("out.txt")).unwrap(),
        "sleep 1\n"
    );
}

#[test]
fn job_ids_not_reused() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(dir.path(), "sleep 0.1 &\nsleep 0.6\nsleep 0.1 &\njobs\n");
    let out = stdout(&output);
    assert!(out.contains("[2]  Running     sleep 0.1 &\n"), "unexpected output: {:?}", out);
    assert!(!out.contains("[1]  Running"));
}

#[test]
fn table_full() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script_with(
        dir.path(),
        "sleep 1 &\nsleep 1 &\nsleep 1 &\njobs\n",
        &[("ICSH_MAX_JOBS", "2")],
    );
    let out = stdout(&output);
    assert!(stderr(&output).contains("job table full"));
    assert!(out.contains("[1]  Running     sleep 1 &\n"));
    assert!(out.contains("[2]  Running     sleep 1 &\n"));
    assert!(!out.contains("[3]"));
}

#[test]
fn help_and_bad_flags() {
    let output = Command::new(env!("CARGO_BIN_EXE_icsh"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage: icsh"));

    let output = Command::new(env!("CARGO_BIN_EXE_icsh"))
        .arg("--nope")
        .output()
        .unwrap();
    assert!(!output.status.success());
}
