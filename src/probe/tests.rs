use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::{ProbeError, ProbeOptions, probe_with_resolver};
use crate::mx::MxRecord;
use crate::mx::tests::StubResolver;

/// Loopback SMTP server that walks the scripted handshake and answers
/// `RCPT TO` with `rcpt_reply`. Serves `conns` connections, then exits.
pub(crate) async fn spawn_stub_smtp(
    rcpt_reply: &'static str,
    conns: usize,
) -> (u16, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let port = listener.local_addr().expect("local addr").port();
    let handle = tokio::spawn(async move {
        for _ in 0..conns {
            let (stream, _) = listener.accept().await.expect("accept");
            let (read_half, mut write_half) = stream.into_split();
            let mut reader = BufReader::new(read_half);
            let mut line = String::new();

            write_half.write_all(b"220 stub ESMTP\r\n").await.expect("banner");

            // EHLO
            reader.read_line(&mut line).await.expect("read EHLO");
            write_half
                .write_all(b"250-stub.test\r\n250 OK\r\n")
                .await
                .expect("EHLO reply");

            // MAIL FROM
            line.clear();
            reader.read_line(&mut line).await.expect("read MAIL");
            write_half.write_all(b"250 OK\r\n").await.expect("MAIL reply");

            // RCPT TO
            line.clear();
            reader.read_line(&mut line).await.expect("read RCPT");
            write_half
                .write_all(rcpt_reply.as_bytes())
                .await
                .expect("RCPT reply");

            // QUIT; the client may also just hang up.
            line.clear();
            if reader.read_line(&mut line).await.unwrap_or(0) > 0 {
                let _ = write_half.write_all(b"221 bye\r\n").await;
            }
        }
    });
    (port, handle)
}

pub(crate) fn loopback_resolver() -> StubResolver {
    StubResolver::Records(vec![MxRecord::new(10, "127.0.0.1")])
}

pub(crate) fn options_for(port: u16) -> ProbeOptions {
    ProbeOptions {
        port,
        ..ProbeOptions::default()
    }
}

#[tokio::test]
async fn accepts_mailbox_on_250() {
    let (port, server) = spawn_stub_smtp("250 2.1.5 OK\r\n", 1).await;
    let exists = probe_with_resolver("user@good.test", &options_for(port), &loopback_resolver())
        .await
        .expect("probe succeeds");
    assert!(exists);
    server.await.expect("stub server");
}

#[tokio::test]
async fn rejects_mailbox_on_550() {
    let (port, server) = spawn_stub_smtp("550 5.1.1 no such user\r\n", 1).await;
    let exists = probe_with_resolver("user@good.test", &options_for(port), &loopback_resolver())
        .await
        .expect("probe succeeds");
    assert!(!exists);
    server.await.expect("stub server");
}

#[tokio::test]
async fn times_out_on_stalled_server_and_closes_session() {
    // Accepts the connection but never sends the banner.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let port = listener.local_addr().expect("local addr").port();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut sink = Vec::new();
        // Returns once the probe's socket is closed.
        stream.read_to_end(&mut sink).await.expect("read until close");
    });

    let started = Instant::now();
    let err = probe_with_resolver("user@good.test", &options_for(port), &loopback_resolver())
        .await
        .expect_err("probe must time out");
    let elapsed = started.elapsed();

    assert!(matches!(err, ProbeError::Timeout { budget_ms: 1_000 }));
    assert!(elapsed >= Duration::from_millis(900), "returned too early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "deadline not honored: {elapsed:?}");

    // The dropped session must have released the connection.
    tokio::time::timeout(Duration::from_secs(2), server)
        .await
        .expect("stub saw the session close")
        .expect("stub server");
}

#[tokio::test]
async fn fails_without_mail_hosts() {
    let err = probe_with_resolver("user@no-mx-domain.test", &ProbeOptions::default(), &StubResolver::Empty)
        .await
        .expect_err("no hosts to probe");
    assert!(matches!(err, ProbeError::NoMailHosts));
}

#[tokio::test]
async fn fails_without_domain_part() {
    let err = probe_with_resolver("not-an-email", &ProbeOptions::default(), &StubResolver::Panic)
        .await
        .expect_err("no domain to resolve");
    assert!(matches!(err, ProbeError::MissingDomain));
}

#[tokio::test]
async fn connection_refused_is_a_connect_error() {
    // Bind then drop to obtain a port nothing listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        listener.local_addr().expect("local addr").port()
    };
    let err = probe_with_resolver("user@good.test", &options_for(port), &loopback_resolver())
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, ProbeError::Connect { .. }));
}
