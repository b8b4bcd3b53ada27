//! Tests for os-release parsing and the supported-OS gate.

use stackup::preflight::{check_supported, OsRelease};
use stackup::ProvisionError;

const DEBIAN_12: &str = r#"
PRETTY_NAME="Debian GNU/Linux 12 (bookworm)"
NAME="Debian GNU/Linux"
VERSION_ID="12"
VERSION="12 (bookworm)"
VERSION_CODENAME=bookworm
ID=debian
HOME_URL="https://www.debian.org/"
"#;

const UBUNTU_22: &str = r#"
PRETTY_NAME="Ubuntu 22.04.4 LTS"
NAME="Ubuntu"
VERSION_ID="22.04"
VERSION_CODENAME=jammy
ID=ubuntu
ID_LIKE=debian
"#;

#[test]
fn parses_debian_os_release() {
    let os = OsRelease::parse(DEBIAN_12);
    assert_eq!(os.id, "debian");
    assert_eq!(os.version_id, "12");
    assert_eq!(os.version_codename, "bookworm");
    assert_eq!(os.pretty_name, "Debian GNU/Linux 12 (bookworm)");
}

#[test]
fn accepts_supported_debian_versions() {
    for (version, codename) in [("11", "bullseye"), ("12", "bookworm"), ("13", "trixie")] {
        let content = format!(
            "ID=debian\nVERSION_ID=\"{}\"\nVERSION_CODENAME={}\n",
            version, codename
        );
        let os = OsRelease::parse(&content);
        assert!(check_supported(&os).is_ok(), "debian {} should pass", version);
    }
}

#[test]
fn rejects_non_debian() {
    let os = OsRelease::parse(UBUNTU_22);
    let err = check_supported(&os).unwrap_err();
    assert!(matches!(err, ProvisionError::UnsupportedOs(_)));
    assert!(err.to_string().contains("ubuntu"));
}

#[test]
fn rejects_unsupported_debian_version() {
    let os = OsRelease::parse("ID=debian\nVERSION_ID=\"10\"\nVERSION_CODENAME=buster\n");
    assert!(matches!(
        check_supported(&os).unwrap_err(),
        ProvisionError::UnsupportedOs(_)
    ));
}

#[test]
fn rejects_empty_identity() {
    let os = OsRelease::parse("");
    assert!(check_supported(&os).is_err());
}

#[test]
fn codename_falls_back_on_version_table() {
    let os = OsRelease::parse("ID=debian\nVERSION_ID=\"12\"\n");
    assert_eq!(os.codename(), Some("bookworm"));
}

#[test]
fn codename_prefers_os_release_value() {
    let os = OsRelease::parse(DEBIAN_12);
    assert_eq!(os.codename(), Some("bookworm"));
}

#[test]
fn load_reads_identity_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("os-release");
    std::fs::write(&path, DEBIAN_12).unwrap();
    let os = OsRelease::load(&path).unwrap();
    assert_eq!(os.version_id, "12");
}

#[test]
fn load_fails_when_identity_file_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let err = OsRelease::load(&dir.path().join("missing")).unwrap_err();
    assert!(matches!(err, ProvisionError::UnsupportedOs(_)));
}
