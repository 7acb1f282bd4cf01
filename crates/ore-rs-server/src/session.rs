//! Per-socket reader and writer tasks.
//!
//! Sockets never touch inventory state. The reader turns bytes into frames
//! and forwards them to the connection handler as [`SessionEvent`]s; the
//! writer drains the session's outbound queue onto the socket. When the
//! handler drops the outbound sender the writer exits and the reader follows.

use std::net::SocketAddr;

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use ore_rs_proto::frame::{Frame, FrameDecoder};

const READ_BUF_SIZE: usize = 4096;

/// Events delivered from socket tasks to the connection handler.
#[derive(Debug)]
pub enum SessionEvent {
    /// A client connected. Frames queued on `outbound` are written to it.
    Connected {
        addr: SocketAddr,
        outbound: mpsc::UnboundedSender<Bytes>,
    },
    /// A complete frame arrived from a connected client.
    Packet { addr: SocketAddr, frame: Frame },
    /// The client went away or sent something unreadable.
    Disconnected { addr: SocketAddr },
}

/// Start the reader and writer tasks for an accepted socket.
pub fn spawn(
    stream: TcpStream,
    addr: SocketAddr,
    events: mpsc::Sender<SessionEvent>,
    shutdown: watch::Receiver<bool>,
) {
    let (reader, writer) = stream.into_split();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (writer_done_tx, writer_done_rx) = oneshot::channel();

    tokio::spawn(write_loop(writer, addr, outbound_rx, writer_done_tx));
    tokio::spawn(async move {
        if events
            .send(SessionEvent::Connected {
                addr,
                outbound: outbound_tx,
            })
            .await
            .is_err()
        {
            return;
        }
        read_loop(reader, addr, &events, shutdown, writer_done_rx).await;
        let _ = events.send(SessionEvent::Disconnected { addr }).await;
    });
}

async fn read_loop(
    mut reader: OwnedReadHalf,
    addr: SocketAddr,
    events: &mpsc::Sender<SessionEvent>,
    mut shutdown: watch::Receiver<bool>,
    mut writer_done: oneshot::Receiver<()>,
) {
    let mut decoder = FrameDecoder::default();
    let mut buf = [0u8; READ_BUF_SIZE];

    loop {
        tokio::select! {
            result = reader.read(&mut buf) => {
                let n = match result {
                    Ok(0) => {
                        match decoder.buffered() {
                            0 => debug!("{addr} closed the connection"),
                            n => debug!("{addr} closed the connection mid-frame ({n} bytes pending)"),
                        }
                        return;
                    }
                    Ok(n) => n,
                    Err(e) => {
                        warn!("Read error from {addr}: {e}");
                        return;
                    }
                };
                decoder.extend(&buf[..n]);
                loop {
                    match decoder.next_frame() {
                        Ok(Some(frame)) => {
                            if events.send(SessionEvent::Packet { addr, frame }).await.is_err() {
                                return;
                            }
                        }
                        Ok(None) => break,
                        Err(e) => {
                            warn!("Dropping {addr}: {e}");
                            return;
                        }
                    }
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    return;
                }
            }
            // Fires on send or drop, so any writer exit ends the session.
            _ = &mut writer_done => {
                debug!("Closing {addr}: outbound closed");
                return;
            }
        }
    }
}

async fn write_loop(
    mut writer: OwnedWriteHalf,
    addr: SocketAddr,
    mut outbound: mpsc::UnboundedReceiver<Bytes>,
    _done: oneshot::Sender<()>,
) {
    while let Some(frame) = outbound.recv().await {
        if let Err(e) = writer.write_all(&frame).await {
            warn!("Write error to {addr}: {e}");
            break;
        }
    }
    let _ = writer.shutdown().await;
}
