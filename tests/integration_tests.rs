//! Integration tests for the snipbar CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd against
//! a store seeded through the library.

use assert_cmd::Command;
use chrono::{DateTime, TimeZone, Utc};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use snipbar::core::{Category, Item, ItemType, SnippetStore};

fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
}

/// Helper to get a snipbar command isolated from the user's config and env
fn snipbar(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("snipbar").unwrap();
    cmd.env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join("config"))
        .env("XDG_DATA_HOME", tmp.path().join("data"))
        .env_remove("SNIPBAR_DB")
        .env_remove("SNIPBAR_CACHE")
        .env_remove("SNIPBAR_CACHE_CAPACITY")
        .env_remove("SNIPBAR_LOG");
    cmd
}

fn category(name: &str, order_index: i64) -> Category {
    Category {
        id: 0,
        name: name.to_string(),
        icon: None,
        order_index,
        is_active: true,
        is_predefined: false,
        color: None,
        badge: None,
        item_count: 0,
        total_uses: 0,
        access_count: 0,
        is_pinned: false,
        pinned_order: 0,
        created_at: ts(1),
        updated_at: ts(1),
        last_accessed: None,
    }
}

fn item(category_id: i64, label: &str, content: &str) -> Item {
    Item {
        id: 0,
        category_id,
        label: label.to_string(),
        content: content.to_string(),
        item_type: ItemType::Text,
        is_favorite: false,
        is_sensitive: false,
        tags: vec![],
        use_count: 0,
        last_used: None,
        created_at: ts(1),
    }
}

/// Helper to create a seeded store in a temp directory
///
/// Categories (id: name): 1 Shell, 2 Docker (pinned 2nd), 3 SSH (pinned 1st),
/// 4 URLs, 5 Archive (inactive). Items 1-4 belong to Shell.
fn setup_store() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("snippets.db");
    seed(&path);
    (tmp, path)
}

fn seed(path: &Path) {
    let store = SnippetStore::open(path).unwrap();

    let mut shell = category("Shell", 0);
    shell.color = Some("#00ff00".into());
    shell.item_count = 12;
    shell.total_uses = 40;

    let mut docker = category("Docker", 1);
    docker.is_pinned = true;
    docker.pinned_order = 2;
    docker.item_count = 5;
    docker.last_accessed = Some(ts(10));

    let mut ssh = category("SSH", 2);
    ssh.is_pinned = true;
    ssh.pinned_order = 1;
    ssh.is_predefined = true;
    ssh.badge = Some("new".into());
    ssh.item_count = 3;

    let mut urls = category("URLs", 3);
    urls.color = Some("#0000ff".into());
    urls.item_count = 8;

    let mut archive = category("Archive", 4);
    archive.is_active = false;

    for cat in [shell, docker, ssh, urls, archive] {
        store.insert_category(&cat).unwrap();
    }

    let ls = item(1, "ls", "ls -la");

    let mut grep = item(1, "grep", "grep -rn");
    grep.is_favorite = true;
    grep.use_count = 6;
    grep.tags = vec!["git".into()];

    let mut token = item(1, "token", "s3cr3t-value");
    token.is_favorite = true;
    token.is_sensitive = true;
    token.use_count = 10;

    let mut ssh_cmd = item(1, "ssh", "ssh host");
    ssh_cmd.item_type = ItemType::Code;
    ssh_cmd.use_count = 5;
    ssh_cmd.last_used = Some(ts(9));

    for it in [ls, grep, token, ssh_cmd] {
        store.insert_item(&it).unwrap();
    }
}

fn db_arg(path: &Path) -> String {
    path.display().to_string()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    snipbar(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("categories"))
        .stdout(predicate::str::contains("items"))
        .stdout(predicate::str::contains("facets"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    snipbar(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("snipbar"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    snipbar(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("snipbar"));
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_store() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("fresh.db");

    snipbar(&tmp)
        .args(["init", &db_arg(&path)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized snippet store"));
    assert!(path.exists());

    snipbar(&tmp)
        .args(["init", &db_arg(&path)])
        .assert()
        .success()
        .stdout(predicate::str::contains("already present"));
}

#[test]
fn test_init_uses_db_flag() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("flag.db");

    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "init"])
        .assert()
        .success();
    assert!(path.exists());
}

// ============================================================================
// Category Tests
// ============================================================================

#[test]
fn test_categories_default_lists_active_in_order() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "categories", "-f", "id"])
        .assert()
        .success()
        .stdout("1\n2\n3\n4\n");
}

#[test]
fn test_categories_table_output() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "categories"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shell"))
        .stdout(predicate::str::contains("SSH [new]"))
        .stdout(predicate::str::contains("4 of 5 category(s) shown."))
        .stdout(predicate::str::contains("Archive").not());
}

#[test]
fn test_categories_pinned_first() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "categories", "--pinned-first", "-f", "id"])
        .assert()
        .success()
        .stdout("3\n2\n1\n4\n");
}

#[test]
fn test_categories_flags_and_spec() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "categories", "--search", "s", "-f", "id"])
        .assert()
        .success()
        .stdout("1\n3\n4\n");

    snipbar(&tmp)
        .args([
            "--db",
            &db_arg(&path),
            "categories",
            "--spec",
            r#"{"item_count": {"min": 4}, "order_by": "name", "order_direction": "desc"}"#,
            "-f",
            "id",
        ])
        .assert()
        .success()
        .stdout("4\n1\n2\n");

    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "categories", "--active", "false", "--count"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_categories_limit() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "categories", "-n", "2", "-f", "id"])
        .assert()
        .success()
        .stdout("1\n2\n");
}

#[test]
fn test_categories_unknown_order_by_never_reaches_sql() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args([
            "--db",
            &db_arg(&path),
            "categories",
            "--order-by",
            "name; DROP TABLE categories",
            "--show-sql",
            "-f",
            "id",
        ])
        .assert()
        .success()
        .stdout("1\n2\n3\n4\n")
        .stderr(predicate::str::contains("ORDER BY order_index ASC"))
        .stderr(predicate::str::contains("DROP").not());

    // Table survived
    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "categories", "--count"])
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn test_categories_repeat_hits_cache() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args([
            "--db",
            &db_arg(&path),
            "categories",
            "--repeat",
            "3",
            "--stats",
            "-f",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hits\": 2"))
        .stdout(predicate::str::contains("\"misses\": 1"))
        .stdout(predicate::str::contains("\"filtered_count\": 4"))
        .stdout(predicate::str::contains("\"execution_time_ms\""));
}

#[test]
fn test_categories_cache_disabled() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args([
            "--db",
            &db_arg(&path),
            "--no-cache",
            "categories",
            "--repeat",
            "2",
            "--stats",
            "-f",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"enabled\": false"))
        .stdout(predicate::str::contains("\"hits\": 0"));

    snipbar(&tmp)
        .env("SNIPBAR_CACHE", "off")
        .args(["--db", &db_arg(&path), "categories", "--stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache: disabled"));
}

#[test]
fn test_categories_invalid_spec_fails() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "categories", "--spec", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --spec JSON"));
}

// ============================================================================
// Item Tests
// ============================================================================

#[test]
fn test_items_favorite_not_sensitive() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args([
            "--db",
            &db_arg(&path),
            "items",
            "-c",
            "1",
            "--favorite",
            "true",
            "--sensitive",
            "false",
            "-f",
            "id",
        ])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_items_use_count_and_never_used() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "items", "-c", "1", "--uses", ">5", "-f", "id"])
        .assert()
        .success()
        .stdout("2\n3\n");

    snipbar(&tmp)
        .args([
            "--db",
            &db_arg(&path),
            "items",
            "-c",
            "1",
            "--last-used",
            "never",
            "-f",
            "id",
        ])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_items_sort_and_top() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args([
            "--db",
            &db_arg(&path),
            "items",
            "-c",
            "1",
            "--spec",
            r#"{"sort_by": "use_count_desc", "top_n": 2}"#,
            "-f",
            "id",
        ])
        .assert()
        .success()
        .stdout("3\n2\n");
}

#[test]
fn test_items_sensitive_content_masked() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "items", "-c", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("s3cr3t").not())
        .stdout(predicate::str::contains("4 of 4 item(s) in Shell shown."));

    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "items", "-c", "1", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cr3t"));
}

#[test]
fn test_items_structured_output_masks_sensitive_content() {
    let (tmp, path) = setup_store();
    for format in ["json", "yaml"] {
        snipbar(&tmp)
            .args(["--db", &db_arg(&path), "items", "-c", "1", "-f", format])
            .assert()
            .success()
            .stdout(predicate::str::contains("********"))
            .stdout(predicate::str::contains("s3cr3t").not())
            .stdout(predicate::str::contains("grep -rn"));
    }

    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "items", "-c", "1", "-f", "json", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cr3t-value"));
}

#[test]
fn test_categories_search_is_literal() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("snippets.db");
    {
        let store = SnippetStore::open(&path).unwrap();
        for (n, name) in ["my_scripts", "myXscripts", "100% done"].iter().enumerate() {
            store.insert_category(&category(name, n as i64)).unwrap();
        }
    }

    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "categories", "--search", "my_s", "-f", "id"])
        .assert()
        .success()
        .stdout("1\n");

    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "categories", "--search", "%", "-f", "id"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_categories_csv_quotes_color() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("snippets.db");
    {
        let store = SnippetStore::open(&path).unwrap();
        let mut cat = category("Shell", 0);
        cat.color = Some("rgb(0,128,0)".into());
        store.insert_category(&cat).unwrap();
    }

    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "categories", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(",\"rgb(0,128,0)\",,-\n"));
}

#[test]
fn test_huge_day_preset_does_not_crash() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args([
            "--db",
            &db_arg(&path),
            "categories",
            "--created",
            "last_999999999_days",
            "-f",
            "id",
        ])
        .assert()
        .success()
        .stdout("1\n2\n3\n4\n");

    snipbar(&tmp)
        .args([
            "--db",
            &db_arg(&path),
            "items",
            "-c",
            "1",
            "--last-used",
            "last_100000000_days",
            "-f",
            "id",
        ])
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn test_items_unknown_category_fails() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "items", "-c", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Category 99 not found"));
}

// ============================================================================
// Facets & Config Tests
// ============================================================================

#[test]
fn test_facets_colors() {
    let (tmp, path) = setup_store();
    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "facets", "--colors"])
        .assert()
        .success()
        .stdout("#0000ff\n#00ff00\n");

    snipbar(&tmp)
        .args(["--db", &db_arg(&path), "facets", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"popularity\""))
        .stdout(predicate::str::contains("\"max\": 12"));
}

#[test]
fn test_config_show_reflects_layers() {
    let tmp = TempDir::new().unwrap();
    snipbar(&tmp)
        .env("SNIPBAR_CACHE_CAPACITY", "7")
        .args(["config", "show", "cache_capacity"])
        .assert()
        .success()
        .stdout("7\n");

    snipbar(&tmp)
        .args(["--db", "/tmp/elsewhere.db", "config", "show", "database"])
        .assert()
        .success()
        .stdout("/tmp/elsewhere.db\n");

    snipbar(&tmp)
        .args(["config", "show", "nonsense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn test_global_config_file_is_read() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("config").join("snipbar");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.yaml"), "cache_enabled: false\n").unwrap();

    snipbar(&tmp)
        .args(["config", "show", "cache_enabled"])
        .assert()
        .success()
        .stdout("false\n");
}

#[test]
fn test_invalid_env_value_fails() {
    let tmp = TempDir::new().unwrap();
    snipbar(&tmp)
        .env("SNIPBAR_CACHE", "maybe")
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SNIPBAR_CACHE"));
}
