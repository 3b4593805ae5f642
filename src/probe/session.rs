use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::probe::error::ProbeError;

/// One SMTP reply: the status code plus the text of every line.
#[derive(Debug, Clone)]
pub(crate) struct SmtpReply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// Plain-TCP SMTP client session. The session owns the socket; dropping it
/// (including a drop forced by the probe deadline) closes the connection.
pub(crate) struct SmtpSession {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl SmtpSession {
    pub async fn connect(host: &str, port: u16) -> Result<Self, ProbeError> {
        let stream =
            TcpStream::connect((host, port))
                .await
                .map_err(|err| ProbeError::Connect {
                    host: host.to_string(),
                    port,
                    source: err,
                })?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        })
    }

    pub async fn read_reply(&mut self) -> Result<SmtpReply, ProbeError> {
        read_reply(&mut self.reader).await
    }

    pub async fn send_command(&mut self, command: &str) -> Result<SmtpReply, ProbeError> {
        let mut data = command.as_bytes().to_vec();
        data.extend_from_slice(b"\r\n");
        self.writer.write_all(&data).await.map_err(ProbeError::io)?;
        self.writer.flush().await.map_err(ProbeError::io)?;
        self.read_reply().await
    }

    /// Best-effort `QUIT`; failures are irrelevant once the verdict is known.
    pub async fn quit(&mut self) {
        if self.writer.write_all(b"QUIT\r\n").await.is_ok() {
            let _ = self.writer.flush().await;
            let _ = self.read_reply().await;
        }
    }
}

/// Parses one possibly multi-line SMTP reply (`250-...` continuations until
/// a `250 ...` terminator). All lines must carry the same code.
pub(crate) async fn read_reply<R>(reader: &mut R) -> Result<SmtpReply, ProbeError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = Vec::new();
    let mut code: Option<u16> = None;
    loop {
        let line = read_line(reader).await?;
        let code_str = line
            .get(..3)
            .ok_or_else(|| ProbeError::protocol(format!("invalid reply: {line}")))?;
        let parsed_code = code_str
            .parse::<u16>()
            .map_err(|_| ProbeError::protocol(format!("invalid code in line: {line}")))?;
        if let Some(existing) = code {
            if existing != parsed_code {
                return Err(ProbeError::protocol(format!(
                    "inconsistent reply codes: {existing} vs {parsed_code}"
                )));
            }
        } else {
            code = Some(parsed_code);
        }
        let is_last = !line.as_bytes().get(3).map(|b| *b == b'-').unwrap_or(false);
        let text = line.get(4..).unwrap_or("").to_string();
        lines.push(text);
        if is_last {
            break;
        }
    }
    Ok(SmtpReply {
        code: code.unwrap_or(0),
        lines,
    })
}

async fn read_line<R>(reader: &mut R) -> Result<String, ProbeError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = reader.read_line(&mut line).await.map_err(ProbeError::io)?;
    if read == 0 {
        return Err(ProbeError::io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed",
        )));
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}
