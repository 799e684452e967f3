//! Headless mode runner - NDJSON loop over stdin/stdout

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use devbridge_core::prelude::*;
use devbridge_core::logging::{self, ChannelMode};
use devbridge_core::MethodResponse;

use super::{HeadlessSession, MALFORMED_CALL};

/// Serve method calls from stdin until EOF
pub async fn run_headless(session: &HeadlessSession) -> Result<()> {
    let info = &session.bridge().host().info;
    logging::log_channel_start(ChannelMode::Stream, info.sdk_level, &info.package_name);

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    let handled = serve(session, stdin, stdout).await?;

    info!("Stdin closed after {} calls, exiting", handled);
    Ok(())
}

/// Answer every line from `reader` on `writer`, flushing after each
/// response. Returns the number of calls answered.
///
/// A line that is not valid UTF-8 is answered with a protocol error and the
/// loop carries on.
pub async fn serve<R, W>(session: &HeadlessSession, mut reader: R, mut writer: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut handled = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(trim_line_ending(&buf)) {
            Ok(line) => session.process_line(line),
            Err(e) => {
                warn!("Rejected non UTF-8 channel input: {}", e);
                Some(
                    MethodResponse::from_error(&Error::protocol(e.to_string()), MALFORMED_CALL)
                        .encode(None),
                )
            }
        };
        let Some(response) = response else {
            continue;
        };

        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        handled += 1;
    }

    Ok(handled)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
