//! Descriptor-lifecycle tests driving the public API against the
//! in-memory kernel.

use std::io::SeekFrom;
use std::sync::Arc;

use sysio::virtfs::InMemFs;
use sysio::{Error, IoCtx, OFlags};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ctx_with(files: &[(&str, &[u8])]) -> (Arc<InMemFs>, IoCtx) {
    let fs = Arc::new(InMemFs::new());
    for (path, contents) in files {
        fs.insert_file(path, contents);
    }
    let ctx = IoCtx::new(fs.clone());
    (fs, ctx)
}

#[test]
fn open_reads_existing_file() {
    init_logs();
    let (_fs, ctx) = ctx_with(&[("/data.bin", b"hello")]);
    let fd = ctx.open("/data.bin", OFlags::READ).unwrap();
    let mut buf = [0u8; 16];
    assert_eq!(ctx.read(fd, &mut buf).unwrap(), 5);
    assert_eq!(&buf[..5], b"hello");
    // The cursor advanced past what was read.
    assert_eq!(ctx.read(fd, &mut buf).unwrap(), 0);
    ctx.close(fd).unwrap();
}

#[test]
fn missing_file_without_create_fails() {
    let (_fs, ctx) = ctx_with(&[]);
    assert_eq!(ctx.open("/nope", OFlags::READ), Err(Error::Acces));
    assert_eq!(ctx.table().len(), 0);
}

#[test]
fn create_makes_missing_file() {
    let (fs, ctx) = ctx_with(&[]);
    let fd = ctx
        .open("/fresh", OFlags::WRITE | OFlags::CREATE)
        .unwrap();
    assert!(fs.contains("/fresh"));
    ctx.close(fd).unwrap();
}

#[test]
fn exclusive_create_on_existing_fails() {
    let (_fs, ctx) = ctx_with(&[("/taken", b"x")]);
    assert_eq!(
        ctx.open("/taken", OFlags::WRITE | OFlags::CREATE | OFlags::EXCLUSIVE),
        Err(Error::Exist)
    );
    assert_eq!(ctx.table().len(), 0);
}

#[test]
fn exclusive_create_on_missing_succeeds() {
    let (fs, ctx) = ctx_with(&[]);
    let fd = ctx
        .open("/fresh", OFlags::WRITE | OFlags::CREATE | OFlags::EXCLUSIVE)
        .unwrap();
    assert!(fs.contains("/fresh"));
    ctx.close(fd).unwrap();
}

#[test]
fn creation_failure_reports_access_error() {
    let (fs, ctx) = ctx_with(&[]);
    fs.set_read_only(true);
    assert_eq!(
        ctx.open("/fresh", OFlags::WRITE | OFlags::CREATE),
        Err(Error::Acces)
    );
    assert_eq!(ctx.table().len(), 0);
}

#[test]
fn table_exhaustion_then_reuse() {
    init_logs();
    let fs = Arc::new(InMemFs::new());
    for i in 0..4 {
        fs.insert_file(&format!("/f{i}"), b"x");
    }
    let ctx = IoCtx::with_max_fds(fs, 4);

    let fds: Vec<_> = (0..4)
        .map(|i| ctx.open(&format!("/f{i}"), OFlags::READ).unwrap())
        .collect();
    assert_eq!(ctx.open("/f0", OFlags::READ), Err(Error::Mfile));
    assert_eq!(ctx.table().len(), 4);

    ctx.close(fds[1]).unwrap();
    let reused = ctx.open("/f3", OFlags::READ).unwrap();
    assert_eq!(reused, fds[1], "freed slot is reused");
    assert_eq!(ctx.table().len(), 4);
}

#[test]
fn append_open_starts_at_file_size() {
    let (_fs, ctx) = ctx_with(&[("/log", b"abc")]);
    let fd = ctx.open("/log", OFlags::WRITE | OFlags::APPEND).unwrap();
    assert_eq!(ctx.table().get(fd).unwrap().offset(), 3);
}

#[test]
fn append_write_lands_at_end() {
    let (fs, ctx) = ctx_with(&[("/log", b"abc")]);
    let fd = ctx.open("/log", OFlags::WRITE | OFlags::APPEND).unwrap();
    assert_eq!(ctx.write(fd, b"def").unwrap(), 3);
    let check = ctx.open("/log", OFlags::READ).unwrap();
    let mut buf = [0u8; 16];
    assert_eq!(ctx.read(check, &mut buf).unwrap(), 6);
    assert_eq!(&buf[..6], b"abcdef");
    assert!(fs.contains("/log"));
}

#[test]
fn truncate_zeroes_existing_contents() {
    let (_fs, ctx) = ctx_with(&[("/data", b"abcdef")]);
    let fd = ctx
        .open("/data", OFlags::WRITE | OFlags::TRUNCATE | OFlags::APPEND)
        .unwrap();
    // Append offset reflects the truncated size, not the stale probe.
    assert_eq!(ctx.table().get(fd).unwrap().offset(), 0);
}

#[test]
fn truncate_failure_propagates() {
    let (fs, ctx) = ctx_with(&[("/data", b"abcdef")]);
    fs.set_read_only(true);
    assert_eq!(
        ctx.open("/data", OFlags::WRITE | OFlags::TRUNCATE),
        Err(Error::Acces)
    );
    assert_eq!(ctx.table().len(), 0);
}

#[test]
fn relative_paths_resolve_against_cwd() {
    let fs = Arc::new(InMemFs::with_cwd("/work/sub"));
    fs.insert_file("/work/data.bin", b"x");
    let ctx = IoCtx::new(fs);
    let fd = ctx.open("../data.bin", OFlags::READ).unwrap();
    assert_eq!(ctx.table().get(fd).unwrap().name(), "/work/data.bin");
}

#[test]
fn dot_laden_absolute_paths_normalize() {
    let (_fs, ctx) = ctx_with(&[("/a/c", b"x")]);
    let fd = ctx.open("/a/b/.././c", OFlags::READ).unwrap();
    assert_eq!(ctx.table().get(fd).unwrap().name(), "/a/c");
}

#[test]
fn write_then_read_roundtrip() {
    let (_fs, ctx) = ctx_with(&[]);
    let fd = ctx
        .open("/out", OFlags::READ | OFlags::WRITE | OFlags::CREATE)
        .unwrap();
    assert_eq!(ctx.write(fd, b"payload").unwrap(), 7);
    assert_eq!(ctx.seek(fd, SeekFrom::Start(0)).unwrap(), 0);
    let mut buf = [0u8; 16];
    assert_eq!(ctx.read(fd, &mut buf).unwrap(), 7);
    assert_eq!(&buf[..7], b"payload");
}

#[test]
fn access_mode_is_enforced() {
    let (_fs, ctx) = ctx_with(&[("/data", b"x")]);
    let wr = ctx.open("/data", OFlags::WRITE).unwrap();
    let mut buf = [0u8; 4];
    assert_eq!(ctx.read(wr, &mut buf), Err(Error::Badf));
    let rd = ctx.open("/data", OFlags::READ).unwrap();
    assert_eq!(ctx.write(rd, b"y"), Err(Error::Badf));
}

#[test]
fn seek_positions_the_cursor() {
    let (_fs, ctx) = ctx_with(&[("/data", b"abcdef")]);
    let fd = ctx.open("/data", OFlags::READ).unwrap();
    assert_eq!(ctx.seek(fd, SeekFrom::End(-2)).unwrap(), 4);
    let mut buf = [0u8; 4];
    assert_eq!(ctx.read(fd, &mut buf).unwrap(), 2);
    assert_eq!(&buf[..2], b"ef");
    assert_eq!(ctx.seek(fd, SeekFrom::Current(-100)), Err(Error::Inval));
}

#[test]
fn overlong_path_is_rejected() {
    let (_fs, ctx) = ctx_with(&[]);
    let long = format!("/{}", "x".repeat(2000));
    assert_eq!(
        ctx.open(&long, OFlags::WRITE | OFlags::CREATE),
        Err(Error::Nametoolong)
    );
    assert_eq!(ctx.table().len(), 0);
}

#[test]
fn close_unknown_fd_fails() {
    let (_fs, ctx) = ctx_with(&[]);
    assert_eq!(ctx.close(42), Err(Error::Badf));
}

#[test]
fn binary_is_the_default_transfer_mode() {
    use sysio::FileMode;
    let (_fs, ctx) = ctx_with(&[("/data", b"x")]);
    let plain = ctx.open("/data", OFlags::READ).unwrap();
    assert!(ctx.table().get(plain).unwrap().mode().contains(FileMode::BINARY));
    let text = ctx.open("/data", OFlags::READ | OFlags::TEXT).unwrap();
    assert!(!ctx.table().get(text).unwrap().mode().contains(FileMode::BINARY));
    let binary = ctx
        .open("/data", OFlags::READ | OFlags::BINARY | OFlags::TEXT)
        .unwrap();
    assert!(ctx.table().get(binary).unwrap().mode().contains(FileMode::BINARY));
}
