mod helpers;

use helpers::cli_runner::CliRunner;

#[test]
fn help_lists_every_command() {
    let cli = CliRunner::new().expect("init");
    let res = cli.run(&["--help"]);
    assert_eq!(res.exit_code, 0);
    for cmd in ["play", "sim", "cfg"] {
        assert!(res.stdout.contains(cmd), "help should mention {cmd}");
    }
}

#[test]
fn unknown_command_prints_usage_to_stderr() {
    let cli = CliRunner::new().expect("init");
    let res = cli.run(&["deal"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stdout.is_empty());
    assert!(res.stderr.contains("Usage: monkeybet <command> [options]"));
    assert!(res.stderr.contains("For full help, run: monkeybet --help"));
}

#[test]
fn bad_mode_value_is_a_parse_error() {
    let cli = CliRunner::new().expect("init");
    let res = cli.run(&["play", "--mode", "four"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("four"));
}

#[test]
fn cfg_reads_the_child_environment() {
    let cli = CliRunner::new().expect("init");
    let res = cli.run_with_env(&["cfg"], &[("MONKEYBET_MODE", "two")]);
    assert_eq!(res.exit_code, 0);
    let json: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(json["mode"]["value"], "two");
    assert_eq!(json["mode"]["source"], "env");
}

#[test]
fn bot_flag_warns_when_no_seat_is_a_bot() {
    let cli = CliRunner::new().expect("init");
    let res = cli.run_with_input(&["play", "--mode", "three", "--bot", "baseline"], "q\n");
    assert_eq!(res.exit_code, 0);
    assert!(res.stderr.contains("WARNING: --bot has no effect"));
}
