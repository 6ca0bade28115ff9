use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONTACTS_CSV: &str = "first_name,last_name,job_title,phone,url\r\n\
Jane,Doe,Chief Executive Officer,415-555-0100,https://acme.example/team\r\n\
Matti,Virtanen,CTO,,https://missing.example\r\n\
Ola,Nordmann,Sales Director,,https://firma.example/\r\n";

const ACME_PAGE: &str = r#"{
    "url": "https://acme.example/team",
    "primary_text": "Meet Jane Doe, Chief Executive Officer. Call +1 (415) 555-0100",
    "image_texts": []
}"#;

const FIRMA_PAGE: &str = r#"[{
    "url": "https://firma.example",
    "primary_text": "Ola Nordmann, Salgsdirektør",
    "translated_text": "Ola Nordmann, Sales Director"
}]"#;

fn command(temp: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("pagecheck");
    cmd.env("XDG_CONFIG_HOME", temp.path().join("config"))
        .env_remove("RUST_LOG")
        .args([
            "--db-path",
            temp.path()
                .join("pagecheck.sqlite3")
                .to_str()
                .expect("db path"),
        ]);
    cmd
}

fn run_cmd(temp: &TempDir, args: &[&str]) -> String {
    let output = command(temp).args(args).output().expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(temp: &TempDir, args: &[&str]) -> Value {
    let output = command(temp)
        .arg("--json")
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn exit_code(temp: &TempDir, args: &[&str]) -> Option<i32> {
    command(temp)
        .args(args)
        .output()
        .expect("run command")
        .status
        .code()
}

fn write_pages(dir: &Path) {
    fs::create_dir_all(dir).expect("pages dir");
    fs::write(dir.join("01_acme.json"), ACME_PAGE).expect("write page");
    fs::write(dir.join("02_firma.json"), FIRMA_PAGE).expect("write page");
}

#[test]
fn cli_import_run_export_flow() {
    let temp = TempDir::new().expect("temp dir");
    let csv_path = temp.path().join("contacts.csv");
    fs::write(&csv_path, CONTACTS_CSV).expect("write csv");
    let pages = temp.path().join("pages");
    write_pages(&pages);
    let csv_arg = csv_path.to_str().expect("csv path");

    let imported = run_cmd_json(&temp, &["import", csv_arg]);
    assert_eq!(imported["imported"], 3);
    assert_eq!(imported["duplicates"], 0);

    let again = run_cmd_json(&temp, &["import", csv_arg]);
    assert_eq!(again["imported"], 0);
    assert_eq!(again["duplicates"], 3);

    let report = run_cmd_json(
        &temp,
        &["run", "--pages", pages.to_str().expect("pages path")],
    );
    assert_eq!(report["processed"], 2);
    assert_eq!(report["errors"], 1);
    assert_eq!(report["name_found"], 2);
    assert_eq!(report["job_title_found"], 2);
    assert_eq!(report["phone_found"], 1);

    let processed = run_cmd_json(&temp, &["list", "--status", "processed"]);
    let items = processed.as_array().expect("array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["first_name"], "Jane");
    assert_eq!(items[0]["outcome"]["name_source"], "text");
    assert_eq!(
        items[0]["outcome"]["matched_phone_candidate"],
        "+1 (415) 555-0100"
    );
    assert_eq!(items[1]["outcome"]["job_title_source"], "translated");
    assert_eq!(items[1]["outcome"]["phone_found"], false);

    let failed = run_cmd_json(&temp, &["list", "--status", "error"]);
    let failed = failed.as_array().expect("array");
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["url"], "https://missing.example");
    assert_eq!(failed[0]["error"], "no page artifacts for url");

    let out = temp.path().join("out").join("report.csv");
    run_cmd(&temp, &["export", "--out", out.to_str().expect("out path")]);
    let exported = fs::read_to_string(&out).expect("read report");
    let lines: Vec<&str> = exported.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("first_name,last_name,job_title,phone,url,status"));
    assert!(lines[1].contains("processed,true,text,true,primary,true,+1 (415) 555-0100"));
    assert!(lines[2].ends_with("no page artifacts for url"));

    let reset = run_cmd_json(&temp, &["reset", "--include-errors"]);
    assert_eq!(reset["requeued"], 1);
    let status = run_cmd_json(&temp, &["status"]);
    assert_eq!(status["not_processed"], 1);
    assert_eq!(status["processed"], 2);
    assert_eq!(status["total"], 3);
}

#[test]
fn cli_run_respects_limit() {
    let temp = TempDir::new().expect("temp dir");
    let csv_path = temp.path().join("contacts.csv");
    fs::write(&csv_path, CONTACTS_CSV).expect("write csv");
    let pages = temp.path().join("pages");
    write_pages(&pages);

    run_cmd(&temp, &["import", csv_path.to_str().expect("csv path")]);
    let report = run_cmd_json(
        &temp,
        &[
            "run",
            "--pages",
            pages.to_str().expect("pages path"),
            "--limit",
            "1",
        ],
    );
    assert_eq!(report["processed"], 1);
    assert_eq!(report["errors"], 0);

    let status = run_cmd_json(&temp, &["status"]);
    assert_eq!(status["not_processed"], 2);
}

#[test]
fn cli_check_single_page() {
    let temp = TempDir::new().expect("temp dir");
    let page = temp.path().join("page.json");
    fs::write(&page, ACME_PAGE).expect("write page");

    let outcome = run_cmd_json(
        &temp,
        &[
            "check",
            "--page",
            page.to_str().expect("page path"),
            "--first-name",
            "jane",
            "--last-name",
            "DOE",
            "--job-title",
            "Chief Financial Officer",
            "--phone",
            "(415) 555 0100",
        ],
    );
    assert_eq!(outcome["url"], "https://acme.example/team");
    assert_eq!(outcome["name_found"], true);
    assert_eq!(outcome["name_source"], "text");
    assert_eq!(outcome["job_title_found"], false);
    assert_eq!(outcome["job_title_source"], "none");
    assert_eq!(outcome["phone_found"], true);

    let human = run_cmd(
        &temp,
        &[
            "check",
            "--page",
            page.to_str().expect("page path"),
            "--first-name",
            "Someone",
            "--last-name",
            "Else",
        ],
    );
    assert!(human.contains("name: no (none)"));
    assert!(human.contains("phone: no"));
}

#[test]
fn cli_check_uses_phone_policy_from_config() {
    let temp = TempDir::new().expect("temp dir");
    let config_dir = temp.path().join("config").join("pagecheck");
    fs::create_dir_all(&config_dir).expect("config dir");
    let config_path = config_dir.join("config.toml");
    fs::write(
        &config_path,
        "[phone]\ncountry_codes = [\"358\"]\nnational_length = 9\n",
    )
    .expect("write config");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&config_path).expect("metadata").permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&config_path, perms).expect("chmod");
    }

    let page = temp.path().join("page.json");
    fs::write(
        &page,
        r#"{"url": "https://yritys.example", "primary_text": "Puh. 40 123 4567"}"#,
    )
    .expect("write page");

    let outcome = run_cmd_json(
        &temp,
        &[
            "check",
            "--page",
            page.to_str().expect("page path"),
            "--phone",
            "+358 40 123 4567",
        ],
    );
    assert_eq!(outcome["phone_found"], true);
    assert_eq!(outcome["matched_phone_candidate"], "40 123 4567");
}

#[test]
fn cli_split_writes_numbered_parts() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("contacts.csv");
    let mut data = String::from("first_name,url\n");
    for index in 0..7 {
        data.push_str(&format!("Person{index},https://p{index}.example\n"));
    }
    fs::write(&input, data).expect("write csv");
    let out_dir = temp.path().join("parts");

    let report = run_cmd_json(
        &temp,
        &[
            "split",
            input.to_str().expect("input path"),
            "--out-dir",
            out_dir.to_str().expect("out dir"),
        ],
    );
    assert_eq!(report["files"].as_array().expect("files").len(), 3);

    let rows = |name: &str| {
        fs::read_to_string(out_dir.join(name))
            .expect("read part")
            .lines()
            .count()
    };
    assert_eq!(rows("01_contacts.csv"), 3);
    assert_eq!(rows("02_contacts.csv"), 3);
    assert_eq!(rows("03_contacts.csv"), 4);
}

#[test]
fn cli_exit_codes() {
    let temp = TempDir::new().expect("temp dir");
    assert_eq!(exit_code(&temp, &["show", "999"]), Some(2));
    assert_eq!(exit_code(&temp, &["show", "abc"]), Some(3));
    assert_eq!(exit_code(&temp, &["list", "--status", "bogus"]), Some(3));
    assert_eq!(exit_code(&temp, &["--json", "export"]), Some(3));

    let missing = temp.path().join("nope.csv");
    assert_eq!(
        exit_code(&temp, &["import", missing.to_str().expect("path")]),
        Some(1)
    );
}

#[test]
fn cli_completions_generate() {
    let temp = TempDir::new().expect("temp dir");
    let output = run_cmd(&temp, &["completions", "bash"]);
    assert!(output.contains("pagecheck"));
}
