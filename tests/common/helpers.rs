#![allow(dead_code)]

use flate2::{write::GzEncoder, Compression};
use jextract_store::{
    Algorithm, Architecture, DownloadResource, JextractStore, OperatingSystem, Platform,
    StoreBuilder,
};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Common test constants
pub const TEST_VERSION: u32 = 22;
pub const TEST_ARCHIVE: &str = "jextract-22_linux-x64_bin.tar.gz";
pub const ZERO_SHA256: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Installs a subscriber once so `RUST_LOG` works in tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Lower-case hex SHA-256 of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// The platform every store test downloads for
pub fn linux_x64() -> Platform {
    Platform::new(OperatingSystem::Linux, Architecture::X64)
}

/// A shell script that behaves like `jextract` of `version`: it reports its
/// version on stderr and echoes its arguments on stdout.
pub fn jextract_script(version: u32) -> String {
    format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"--version\" ]; then\n\
         \techo 'jextract {version}' >&2\n\
         \techo 'JDK version {version}+35-2369' >&2\n\
         \texit 0\n\
         fi\n\
         echo \"$@\"\n"
    )
}

/// A gzip-compressed tarball laid out like a jextract release.
pub fn jextract_archive(version: u32) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    let top = format!("jextract-{version}");
    append(
        &mut builder,
        &format!("{top}/bin/jextract"),
        jextract_script(version).as_bytes(),
        0o755,
    );
    append(&mut builder, &format!("{top}/conf/jextract.conf"), b"# conf\n", 0o644);
    append(&mut builder, &format!("{top}/lib/README"), b"jextract runtime image\n", 0o644);
    builder
        .into_inner()
        .expect("Failed to finish tar")
        .finish()
        .expect("Failed to finish gzip")
}

fn append<W: Write>(builder: &mut tar::Builder<W>, path: &str, data: &[u8], mode: u32) {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(mode);
    header.set_cksum();
    builder
        .append_data(&mut header, path, data)
        .expect("Failed to append tar entry");
}

/// Writes a distribution override pointing jextract 22 for linux/x64 at `server`.
pub fn write_distributions(dir: &Path, server: &MockServer, checksum: &str) -> PathBuf {
    let file = dir.join("jextract.properties");
    let content = format!(
        "# test distributions\n\
         jextract.{TEST_VERSION}.linux.x64.url={}/{TEST_ARCHIVE}\n\
         jextract.{TEST_VERSION}.linux.x64.sha-256={checksum}\n",
        server.uri()
    );
    fs::write(&file, content).expect("Failed to write distributions");
    file
}

/// A resource served by `server` under `/<name>`.
pub fn served_resource(server: &MockServer, name: &str, body: &[u8]) -> DownloadResource {
    DownloadResource::parse(
        &format!("{}/{}", server.uri(), name),
        sha256_hex(body),
        Algorithm::Sha256,
    )
    .expect("Failed to create resource")
}

/// Serve `body` at `/<name>`, expecting exactly `calls` requests.
pub async fn mount_file(server: &MockServer, name: &str, body: Vec<u8>, calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(calls)
        .mount(server)
        .await;
}

/// A store for linux/x64 caching below `cache` and reading `distributions`.
pub fn test_store(cache: &Path, distributions: &Path) -> JextractStore {
    StoreBuilder::new()
        .cache_dir(cache.to_path_buf())
        .distributions(distributions.to_path_buf())
        .platform(linux_x64())
        .build()
        .expect("Failed to build store")
}

/// Lays out a local installation `root/bin/jextract` reporting `version`.
#[cfg(unix)]
pub fn create_local_installation(root: &Path, version: u32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let bin = root.join("bin");
    fs::create_dir_all(&bin).expect("Failed to create bin");
    let executable = bin.join("jextract");
    fs::write(&executable, jextract_script(version)).expect("Failed to write script");
    fs::set_permissions(&executable, fs::Permissions::from_mode(0o755))
        .expect("Failed to set permissions");
    executable
}

/// Asserts that a file exists at the given path
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "File should exist at path: {:?}", path);
}

/// Asserts that nothing exists at the given path
pub fn assert_missing(path: &Path) {
    assert!(!path.exists(), "Nothing should exist at path: {:?}", path);
}
