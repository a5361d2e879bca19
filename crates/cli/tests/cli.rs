use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_config(root: &Path) {
    let config = r#"[general]
articles_dir = "./articles"
state_file = "./config/published-articles.json"
article_delay_ms = 0

[assets]
raw_base_url = "https://raw.githubusercontent.com/example/blog/main"
"#;
    fs::write(root.join("config.toml"), config).expect("write config");
}

fn write_article(root: &Path, name: &str, front: &str, body: &str) {
    let dir = root.join("articles");
    fs::create_dir_all(&dir).expect("create articles dir");
    fs::write(dir.join(name), format!("---\n{front}\n---\n\n{body}\n")).expect("write article");
}

#[test]
fn config_init_writes_example_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");

    let mut cmd = cargo_bin_cmd!("crosspub");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).expect("read config");
    assert!(content.contains("articles_dir"));
    assert!(content.contains("QIITA_API_TOKEN"));
}

#[test]
fn config_init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# existing").expect("write existing");

    let mut cmd = cargo_bin_cmd!("crosspub");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn convert_all_writes_platform_variants() {
    let dir = TempDir::new().expect("temp dir");
    write_config(dir.path());
    write_article(
        dir.path(),
        "hello-world.md",
        "title: Hello World\npublished: true\ntopics:\n  - rust",
        "Intro.\n\n![diagram](/images/diagram.png)",
    );

    let mut cmd = cargo_bin_cmd!("crosspub");
    cmd.current_dir(dir.path())
        .args(["--config", "config.toml", "convert", "--all"])
        .assert()
        .success();

    let qiita = fs::read_to_string(dir.path().join("qiita/public/hello-world.md"))
        .expect("qiita variant written");
    assert!(qiita.contains("title: \"Hello World\""));
    assert!(qiita.contains(
        "![diagram](https://raw.githubusercontent.com/example/blog/main/images/diagram.png)"
    ));

    let devto =
        fs::read_to_string(dir.path().join("dev-to/hello-world.md")).expect("devto variant");
    assert!(devto.contains("published: true"));
    assert!(devto.contains("tags: \"rust\""));
}

#[test]
fn convert_honors_platform_toggles() {
    let dir = TempDir::new().expect("temp dir");
    write_config(dir.path());
    write_article(
        dir.path(),
        "qiita-only.md",
        "title: Qiita Only\nplatforms:\n  qiita: true\n  devto: false",
        "Body",
    );

    let mut cmd = cargo_bin_cmd!("crosspub");
    cmd.current_dir(dir.path())
        .args(["--config", "config.toml", "convert", "--all"])
        .assert()
        .success();

    assert!(dir.path().join("qiita/public/qiita-only.md").exists());
    assert!(!dir.path().join("dev-to/qiita-only.md").exists());
}

#[test]
fn convert_skips_ineligible_articles() {
    let dir = TempDir::new().expect("temp dir");
    write_config(dir.path());
    write_article(dir.path(), "draft.md", "title: Draft\npublished: false", "Body");

    let mut cmd = cargo_bin_cmd!("crosspub");
    cmd.current_dir(dir.path())
        .args(["--config", "config.toml", "convert", "--all"])
        .assert()
        .success();

    assert!(!dir.path().join("qiita/public/draft.md").exists());
    assert!(!dir.path().join("dev-to/draft.md").exists());
}

#[test]
fn publish_without_tokens_succeeds_and_writes_state() {
    let dir = TempDir::new().expect("temp dir");
    write_config(dir.path());
    write_article(
        dir.path(),
        "hello-world.md",
        "title: Hello World\npublished: true",
        "Body",
    );

    let mut cmd = cargo_bin_cmd!("crosspub");
    cmd.current_dir(dir.path())
        .env_remove("QIITA_API_TOKEN")
        .env_remove("DEV_TO_API_KEY")
        .args(["--config", "config.toml", "publish"])
        .assert()
        .success();

    // Nothing published, but the state file is still written once at run end
    let state = fs::read_to_string(dir.path().join("config/published-articles.json"))
        .expect("state file written");
    assert_eq!(state.trim(), "{}");
}

#[test]
fn doctor_reports_missing_credentials_without_failing() {
    let dir = TempDir::new().expect("temp dir");
    write_config(dir.path());
    write_article(
        dir.path(),
        "hello-world.md",
        "title: Hello World\npublished: true",
        "Body",
    );

    let mut cmd = cargo_bin_cmd!("crosspub");
    cmd.current_dir(dir.path())
        .env_remove("QIITA_API_TOKEN")
        .env_remove("DEV_TO_API_KEY")
        .args(["--config", "config.toml", "doctor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 eligible"))
        .stdout(predicate::str::contains("QIITA_API_TOKEN not set"));
}

#[test]
fn doctor_fails_on_missing_articles_dir() {
    let dir = TempDir::new().expect("temp dir");
    write_config(dir.path());

    let mut cmd = cargo_bin_cmd!("crosspub");
    cmd.current_dir(dir.path())
        .args(["--config", "config.toml", "doctor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Doctor found problems"));
}
