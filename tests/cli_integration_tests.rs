use std::process::Command;
use tempfile::TempDir;

fn mcpx() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mcpx-cli"));
    cmd.env_remove("MCPX_BASE_URL")
        .env_remove("MCPX_CONFIG_PATH")
        .env_remove("MCPX_LOG");
    cmd
}

#[test]
fn test_cli_help_command() {
    let output = mcpx()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("mcpx-cli"));
    assert!(stdout.contains("publish"));
    assert!(stdout.contains("login"));
}

#[test]
fn test_cli_logout_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let creds = temp_dir.path().join("creds.json");
    std::fs::write(&creds, r#"{"method":"anonymous","token":"t","expires_at":0}"#).unwrap();

    for _ in 0..2 {
        let output = mcpx()
            .arg("logout")
            .env("MCPX_CONFIG_PATH", &creds)
            .output()
            .expect("Failed to execute command");
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("Logged out"));
    }
    assert!(!creds.exists());
}

#[test]
fn test_cli_rejects_unknown_login_method() {
    let temp_dir = TempDir::new().unwrap();

    let output = mcpx()
        .args(["login", "--method", "kerberos"])
        .env("MCPX_CONFIG_PATH", temp_dir.path().join("creds.json"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("kerberos"));
}

#[test]
fn test_cli_detailed_requires_json() {
    let output = mcpx()
        .args(["servers", "--detailed"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_cli_rejects_non_http_base_url() {
    let temp_dir = TempDir::new().unwrap();

    let output = mcpx()
        .args(["--base-url", "ftp://registry.example.com", "health"])
        .env("MCPX_CONFIG_PATH", temp_dir.path().join("creds.json"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("http://"));
}

#[test]
fn test_cli_domain_methods_require_domain() {
    let temp_dir = TempDir::new().unwrap();
    let creds = temp_dir.path().join("creds.json");

    let output = mcpx()
        .args(["login", "--method", "dns"])
        .env("MCPX_CONFIG_PATH", &creds)
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--domain"));

    let output = mcpx()
        .args(["login", "--method", "dns", "--domain", "example.com"])
        .env("MCPX_CONFIG_PATH", &creds)
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not supported"));
    assert!(!creds.exists());
}
