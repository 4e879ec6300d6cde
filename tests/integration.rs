use std::{env, fs, path::PathBuf, process::Command};

fn run_bin(args: &[&str]) -> (bool, String, String) {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_landscape-search"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    let stdout_str = String::from_utf8(output.stdout).expect("failed to convert stdout to string");
    let stderr_str = String::from_utf8(output.stderr).expect("failed to convert stderr to string");

    (output.status.success(), stdout_str, stderr_str)
}

#[test]
fn basic_workflow() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("basic_workflow");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + "seed = 42\n"
        + "\n"
        + "[landscape]\n"
        + "n = 200\n"
        + "smoothness = 3\n"
        + "\n"
        + "[heuristics]\n"
        + "k = 3\n"
        + "l = 8\n"
        + "\n"
        + "[teams]\n"
        + "n_agents = 6\n"
        + "\n"
        + "[search]\n"
        + "strategy = \"both\"\n";

    fs::write(&config_path, config_contents).expect("failed to write config file");

    let config_str = config_path
        .to_str()
        .expect("failed to convert config path to string");

    let (success, stdout_str, stderr_str) = run_bin(&["--config", config_str, "run"]);
    assert!(
        success,
        "failed to run binary\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );
    for key in [
        "relay_random",
        "relay_best",
        "tournament_random",
        "tournament_best",
        "optimal_solution",
        "team_average",
        "diversity",
    ] {
        assert!(stdout_str.contains(key), "missing {key} in\n{stdout_str}");
    }

    let (success, rerun_stdout_str, _) = run_bin(&["--config", config_str, "run"]);
    assert!(success);
    assert_eq!(stdout_str, rerun_stdout_str);

    let (success, check_stdout_str, stderr_str) = run_bin(&["--config", config_str, "check"]);
    assert!(
        success,
        "failed to check config\nstdout:\n{check_stdout_str}\nstderr:\n{stderr_str}\n"
    );
    assert!(check_stdout_str.contains("worst_agent"));
    assert!(!check_stdout_str.contains("relay_best"));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn invalid_config_fails() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("invalid_config_fails");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + "[landscape]\n"
        + "n = 20\n"
        + "\n"
        + "[heuristics]\n"
        + "k = 4\n"
        + "l = 3\n"
        + "\n"
        + "[teams]\n"
        + "n_agents = 2\n"
        + "\n"
        + "[search]\n"
        + "strategy = \"relay\"\n";

    fs::write(&config_path, config_contents).expect("failed to write config file");

    let config_str = config_path
        .to_str()
        .expect("failed to convert config path to string");

    let (success, _, stderr_str) = run_bin(&["--config", config_str, "run"]);
    assert!(!success);
    assert!(stderr_str.contains("invalid number of steps per heuristic"));

    fs::remove_dir_all(&test_dir).ok();
}
