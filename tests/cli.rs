use assert_cmd::prelude::*;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

/// `lmb` with every well-known location redirected into `home`.
fn lmb(home: &TempDir) -> Command {
    let bin = assert_cmd::cargo::cargo_bin!("lmb");
    let mut cmd = Command::new(bin);
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("XDG_DATA_HOME", home.path().join(".local/share"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn dry_run_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    home.child(".zshrc").write_str("export EDITOR=vim")?;
    home.child(".gitconfig").write_str("[user]\n  name = dev")?;
    let out = home.child("backup");

    lmb(&home)
        .arg("--dry-run")
        .arg("--backup-dir")
        .arg(out.path())
        .arg("dotfiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("== dotfiles =="))
        .stdout(predicate::str::contains("[dry run] would archive 2 dotfile(s)"));
    out.assert(predicate::path::missing());

    lmb(&home)
        .args(["-n", "-b"])
        .arg(out.path())
        .arg("git")
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry run] would copy"));
    out.assert(predicate::path::missing());
    Ok(())
}

#[test]
fn git_config_is_copied() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    home.child(".gitconfig").write_str("[user]\n  name = dev\n")?;
    let out = home.child("backup");

    lmb(&home)
        .arg("-b")
        .arg(out.path())
        .arg("vcs-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("== git =="))
        .stdout(predicate::str::contains("created 1 file(s)"));
    out.child(".gitconfig")
        .assert(predicate::str::contains("name = dev"));
    Ok(())
}

#[test]
fn dotfiles_archive_is_created() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    home.child(".vimrc").write_str("set number")?;
    let out = home.child("backup");

    lmb(&home)
        .arg("-b")
        .arg(out.path())
        .arg("dotfiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("dotfiles_backup_"));
    let archives = std::fs::read_dir(out.path())?.count();
    assert_eq!(archives, 1);
    Ok(())
}

#[test]
fn missing_targets_are_not_errors() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let out = home.child("backup");

    lmb(&home)
        .arg("-b")
        .arg(out.path())
        .arg("cloud-cli")
        .assert()
        .success()
        .stdout(predicate::str::contains("not found: none of"));
    out.assert(predicate::path::missing());
    Ok(())
}

#[test]
fn ssh_lists_private_keys_only() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    home.child(".ssh/id_ed25519").write_str("private")?;
    home.child(".ssh/id_ed25519.pub").write_str("public")?;

    lmb(&home)
        .arg("ssh")
        .assert()
        .success()
        .stdout(predicate::str::contains("  id_ed25519\n"))
        .stdout(predicate::str::contains("id_ed25519.pub").not())
        .stdout(predicate::str::contains("No SSH config found."));
    Ok(())
}

#[test]
fn secrets_scan_reports_env_files() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    home.child("projects/api/.env").write_str("TOKEN=abc")?;
    home.child("projects/api/.venv/.env").write_str("decoy")?;

    lmb(&home)
        .arg("secrets")
        .arg("--secrets-root")
        .arg(home.child("projects").path())
        .assert()
        .success()
        .stdout(predicate::str::contains("9 bytes"))
        .stdout(predicate::str::contains(".venv").not());
    Ok(())
}

#[test]
fn unknown_action_is_usage_error() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    lmb(&home)
        .arg("printers")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
    Ok(())
}

#[test]
fn malformed_config_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    home.child(".config/lmbackup/config.toml")
        .write_str("[backup\ndir = ")?;

    lmb(&home)
        .arg("--dry-run")
        .arg("dotfiles")
        .assert()
        .code(78)
        .stderr(predicate::str::contains("invalid configuration file"));
    Ok(())
}

#[test]
fn configured_backup_dir_is_used() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    home.child(".config/lmbackup/config.toml")
        .write_str("[backup]\ndir = \"~/machine-backup\"\n")?;
    home.child(".local/share/atuin/history.db").write_str("db")?;

    lmb(&home).arg("embedded-db").assert().success();
    home.child("machine-backup/history.db")
        .assert(predicate::path::exists());
    Ok(())
}
