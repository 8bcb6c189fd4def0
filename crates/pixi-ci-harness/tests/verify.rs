#![cfg(unix)]

use std::collections::HashMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use pixi_ci_harness::{Error, ExitCode, PixiTools, Verify, verify_cli_command};

#[test]
fn passes_through_env_and_sets_no_wrap() {
    let output = verify_cli_command(
        Verify::new("sh")
            .args(["-c", "echo \"$GREETING $PIXI_NO_WRAP\""])
            .env("GREETING", "hello")
            .stdout_contains("hello 1"),
    );
    assert_eq!(output.code, Some(0));
}

#[test]
fn exit_code_mismatch_is_an_error() {
    let err = Verify::new("sh")
        .args(["-c", "echo broken >&2; exit 3"])
        .run()
        .unwrap_err();
    match err {
        Error::ExitCode { actual, expected, stderr, .. } => {
            assert_eq!(actual, Some(3));
            assert_eq!(expected, ExitCode::Success);
            assert!(stderr.contains("broken"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn expected_failure_with_stripped_output() {
    verify_cli_command(
        Verify::new("sh")
            .args(["-c", "printf '\\033[31merror\\033[0m: nope' >&2; exit 1"])
            .strip_ansi()
            .expect(ExitCode::Failure)
            .stderr_contains("error: nope")
            .stdout_excludes("error"),
    );
}

#[test]
fn reset_env_drops_inherited_variables() {
    verify_cli_command(
        Verify::new("/bin/sh")
            .args(["-c", "echo \"[$HOME]\""])
            .reset_env()
            .stdout_contains("[]"),
    );
}

#[test]
#[should_panic(expected = "not found in stdout")]
fn verify_cli_command_panics_on_mismatch() {
    verify_cli_command(Verify::new("sh").args(["-c", "echo hi"]).stdout_contains("bye"));
}

#[test]
fn reports_the_command_line() {
    let output = verify_cli_command(Verify::new("sh").args(["-c", "true"]));
    assert_eq!(output.command, "sh -c true");
    assert_eq!(output.to_string(), "command: sh -c true");

    let err = Verify::new("sh").args(["-c", "exit 2"]).run().unwrap_err();
    assert!(err.to_string().starts_with("`sh -c exit 2` returned Some(2)"));
}

fn executable(path: &Path, script: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, script).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn located_pixi_runs_with_backend_override() {
    let root = tempfile::tempdir().unwrap();
    let artifacts = root.path().join("artifacts");
    executable(
        &artifacts.join("pixi/pixi"),
        "#!/bin/sh\necho \"override=$PIXI_BUILD_BACKEND_OVERRIDE\"\n",
    );
    for backend in ["pixi-build-cmake", "pixi-build-python", "pixi-build-rattler-build", "pixi-build-rust"] {
        executable(&artifacts.join(backend), "#!/bin/sh\n");
    }

    let tools = PixiTools::locate(&HashMap::new(), root.path()).unwrap();
    assert_eq!(tools.pixi, artifacts.join("pixi/pixi"));
    assert!(tools.channel.is_none());

    let rust = format!("pixi-build-rust={}", artifacts.join("pixi-build-rust").display());
    verify_cli_command(
        tools
            .pixi()
            .stdout_contains("override=pixi-build-cmake=")
            .stdout_contains(rust),
    );

    fs::create_dir_all(artifacts.join("pixi-build-backends/noarch")).unwrap();
    fs::write(artifacts.join("pixi-build-backends/noarch/repodata.json"), "{}").unwrap();
    let tools = PixiTools::from_env_files(root.path()).unwrap();
    let channel = tools.channel.expect("published channel is picked up");
    assert!(channel.as_str().starts_with("file://"));
}
