//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const RICH_ENV: [&str; 9] = [
    "RICH_THEME",
    "RICH_WIDTH",
    "RICH_LINE_NUMBERS",
    "RICH_GUIDES",
    "RICH_HYPERLINKS",
    "RICH_FORCE_TERMINAL",
    "RICH_SOFT_WRAP",
    "RICH_PAGER",
    "RICH_CONFIG",
];

/// The binary with a predictable environment: no user config, no RICH_*
/// overrides and an 80 column console.
fn rich() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rich"));
    for var in RICH_ENV {
        cmd.env_remove(var);
    }
    cmd.env("XDG_CONFIG_HOME", "/nonexistent/rich-tests")
        .env("COLUMNS", "80")
        .env("TERM", "xterm-256color")
        .env_remove("COLORTERM")
        .env_remove("NO_COLOR")
        .env_remove("CLICOLOR")
        .env_remove("CLICOLOR_FORCE")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("run rich");
    assert!(output.status.success(), "rich failed: {}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout).expect("utf8 stdout")
}

#[test]
fn test_cli_version() {
    rich().arg("--version").assert().success().stdout(predicate::str::contains("rich"));
    rich().arg("-v").assert().success().stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_help() {
    rich()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--markdown"))
        .stdout(predicate::str::contains("--export-html"))
        .stdout(predicate::str::contains("--pager"));
}

#[test]
fn test_no_resource_prints_usage() {
    rich()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: rich [OPTIONS] <PATH,TEXT,URL, or '-'>"))
        .stdout(predicate::str::contains("See rich --help for options"));
}

#[test]
fn test_print_markup() {
    rich()
        .args(["-p", "[bold red]Hello[/bold red] World"])
        .assert()
        .success()
        .stdout("Hello World\n");
}

#[test]
fn test_print_from_stdin() {
    rich().args(["-p", "-"]).write_stdin("[italic]piped[/italic]").assert().success().stdout("piped\n");
}

#[test]
fn test_json_sniffed_matches_explicit_flag() {
    let dir = TempDir::new().expect("tmp");
    let path = dir.path().join("cats.json");
    fs::write(&path, r#"{"cats": ["tom", "felix"], "count": 2}"#).expect("write");

    let sniffed = stdout_of(rich().arg(&path));
    let explicit = stdout_of(rich().arg(&path).arg("--json"));
    assert_eq!(sniffed, explicit);
    assert!(sniffed.contains("\"count\": 2"));
    assert!(sniffed.contains("\"felix\""));
}

#[test]
fn test_explicit_mode_overrides_extension() {
    let dir = TempDir::new().expect("tmp");
    let path = dir.path().join("notes.json");
    fs::write(&path, "# Title\n\nnot json at all\n").expect("write");

    rich().arg(&path).assert().failure().code(1).stderr(predicate::str::contains("unable to parse json"));
    rich()
        .arg(&path)
        .arg("--markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("Title"))
        .stdout(predicate::str::contains("not json at all"));
}

#[test]
fn test_invalid_widths_are_usage_errors() {
    for width in ["-5", "0", "abc"] {
        rich().args(["-p", "x", "-w", width]).assert().failure().code(2).stdout("");
    }
}

#[test]
fn test_invalid_width_from_env() {
    rich().env("RICH_WIDTH", "not_a_number").args(["-p", "x"]).assert().failure().code(2);
}

#[test]
fn test_two_modes_are_a_usage_error() {
    rich().args(["--json", "--markdown", "x"]).assert().failure().code(2);
}

#[test]
fn test_invalid_padding() {
    rich()
        .args(["-p", "x", "-d", "1,2,3"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("padding should be 1, 2 or 4 integers separated by commas"));
}

#[test]
fn test_invalid_panel_lists_choices() {
    rich()
        .args(["-p", "x", "-a", "wobbly"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("rounded"));
}

#[test]
fn test_invalid_style() {
    rich()
        .args(["-p", "x", "-s", "bold nonsense"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unable to parse style"));
}

#[test]
fn test_missing_file() {
    rich()
        .arg("/no/such/file.py")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unable to read /no/such/file.py"));
}

#[test]
fn test_piped_output_has_no_escapes() {
    rich()
        .args(["-p", "[bold green]plain[/bold green]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b").not());
}

#[test]
fn test_force_terminal_writes_escapes() {
    rich()
        .args(["-p", "[bold green]colored[/bold green]", "--force-terminal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b["))
        .stdout(predicate::str::contains("colored"));
}

#[test]
fn test_color_environment() {
    rich()
        .env("CLICOLOR_FORCE", "1")
        .args(["-p", "[red]x[/red]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b["));
    rich()
        .env("NO_COLOR", "1")
        .args(["-p", "[red]x[/red]", "--force-terminal"])
        .assert()
        .success()
        .stdout("x\n");
}

#[test]
fn test_boolean_env_values() {
    for truthy in ["1", "true", "YES", "on"] {
        rich()
            .env("RICH_FORCE_TERMINAL", truthy)
            .args(["-p", "[red]x[/red]"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\x1b["));
    }
    for falsy in ["0", "false", "No", "off", ""] {
        rich()
            .env("RICH_FORCE_TERMINAL", falsy)
            .args(["-p", "[red]x[/red]"])
            .assert()
            .success()
            .stdout("x\n");
    }
}

#[test]
fn test_line_numbers_from_env() {
    let dir = TempDir::new().expect("tmp");
    let path = dir.path().join("hello.py");
    fs::write(&path, "print('hi')\n").expect("write");

    let numbered = stdout_of(rich().env("RICH_LINE_NUMBERS", "yes").arg(&path));
    assert!(numbered.contains(" 1 print('hi')"), "{numbered}");
    let plain = stdout_of(rich().env("RICH_LINE_NUMBERS", "0").arg(&path));
    assert!(plain.starts_with("print('hi')"), "{plain}");
}

#[test]
fn test_head_and_tail() {
    let dir = TempDir::new().expect("tmp");
    let path = dir.path().join("lines.txt");
    fs::write(&path, "one\ntwo\nthree\nfour\n").expect("write");

    let head = stdout_of(rich().arg(&path).args(["--head", "2"]));
    assert!(head.contains("two") && !head.contains("three"), "{head}");
    let tail = stdout_of(rich().arg(&path).args(["--tail", "1"]));
    assert!(tail.contains("four") && !tail.contains("three"), "{tail}");
    rich().arg(&path).args(["--head", "1", "--tail", "1"]).assert().failure().code(2);
}

#[test]
fn test_rule_with_custom_character() {
    let out = stdout_of(rich().args(["-u", "Title", "--rule-char", "=", "-w", "20"]));
    assert_eq!(out.trim_end(), "====== Title =======");
}

#[test]
fn test_panel_with_title() {
    let out = stdout_of(rich().args(["-p", "body", "-a", "square", "--title", "Head"]));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("┌") && lines[0].contains(" Head "));
    assert!(lines[1].starts_with("│ body"));
}

#[test]
fn test_csv_table() {
    let dir = TempDir::new().expect("tmp");
    let path = dir.path().join("pets.csv");
    fs::write(&path, "name,legs\ncat,4\nbird,2\n").expect("write");

    rich()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("name"))
        .stdout(predicate::str::contains("bird"))
        .stdout(predicate::str::contains("┃"));
}

#[test]
fn test_markdown_from_stdin() {
    rich()
        .args(["-m", "-"])
        .write_stdin("# Greeting\n\n* first\n* second\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Greeting"))
        .stdout(predicate::str::contains("• first"));
}

#[test]
fn test_export_html() {
    let dir = TempDir::new().expect("tmp");
    let path = dir.path().join("out.html");

    rich()
        .args(["-p", "[green]hello[/green] <world>", "-o"])
        .arg(&path)
        .assert()
        .success()
        .stdout("");

    let html = fs::read_to_string(&path).expect("html written");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<body>") && html.contains("</html>"));
    assert!(html.contains("hello"));
    assert!(html.contains("&lt;world&gt;"));
    assert!(!html.contains("\x1b"));
    assert!(!html.contains("[green]"));
}

#[test]
fn test_export_svg_with_preprocessed_ansi() {
    let dir = TempDir::new().expect("tmp");
    let path = dir.path().join("out.svg");

    rich()
        .args(["-p", "\x1b[31mhello\x1b[0m", "--preprocess-ansi", "--export-svg"])
        .arg(&path)
        .assert()
        .success();

    let svg = fs::read_to_string(&path).expect("svg written");
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains("hello"));
    assert!(!svg.contains("\x1b"));
}

#[test]
fn test_export_strips_escapes_from_print_input() {
    let dir = TempDir::new().expect("tmp");
    let html = dir.path().join("out.html");
    let svg = dir.path().join("out.svg");

    rich()
        .args(["-p", "\x1b[31mred\x1b[0m", "--export-html"])
        .arg(&html)
        .arg("--export-svg")
        .arg(&svg)
        .assert()
        .success()
        .stdout("");

    for path in [&html, &svg] {
        let exported = fs::read_to_string(path).expect("export written");
        assert!(exported.contains("red"));
        assert!(!exported.contains('\x1b'), "{exported}");
    }
}

#[test]
fn test_export_strips_escapes_from_markdown() {
    let dir = TempDir::new().expect("tmp");
    let path = dir.path().join("out.html");

    rich()
        .args(["-m", "-", "-o"])
        .arg(&path)
        .write_stdin("# \x1b[1mHeading\x1b[0m\r\n\r\nsome \x1b[32mgreen\x1b[0m text\r\n")
        .assert()
        .success();

    let html = fs::read_to_string(&path).expect("html written");
    assert!(html.contains("Heading"));
    assert!(html.contains("green"));
    assert!(!html.contains('\x1b'));
    assert!(!html.contains('\r'));
}

#[test]
fn test_crlf_input_keeps_panel_borders_aligned() {
    let out = stdout_of(rich().args(["-p", "-", "-a", "square"]).write_stdin("one\r\ntwo\r\n"));
    let widths: Vec<usize> = out.lines().map(|line| line.chars().count()).collect();
    assert!(!out.contains('\r'));
    assert!(widths.windows(2).all(|pair| pair[0] == pair[1]), "{out}");
}

#[test]
fn test_explicit_config_file() {
    let dir = TempDir::new().expect("tmp");
    let path = dir.path().join("rich.toml");
    fs::write(&path, "[rich]\nrule_char = \"~\"\n").expect("write");

    let out = stdout_of(rich().args(["-u", "T", "-w", "9", "--config"]).arg(&path));
    assert_eq!(out.trim_end(), "~~~ T ~~~");

    let out = stdout_of(rich().env("RICH_CONFIG", &path).args(["-u", "T", "-w", "9", "--rule-char", "-"]));
    assert_eq!(out.trim_end(), "--- T ---");
}

#[test]
fn test_broken_explicit_config_fails() {
    let dir = TempDir::new().expect("tmp");
    let path = dir.path().join("rich.toml");
    fs::write(&path, "theme = [\n").expect("write");

    rich()
        .args(["-p", "x", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load config"));
}
