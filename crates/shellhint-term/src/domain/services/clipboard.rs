use std::sync::mpsc as std_mpsc;
use std::thread;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use tokio::sync::oneshot;

struct ClipboardRequest {
    text: String,
    reply: oneshot::Sender<Result<(), String>>,
}

/// Owns the system clipboard on a dedicated thread. Some platforms drop the
/// copied text as soon as the owning handle goes away, so the handle lives as
/// long as the service does.
#[derive(Clone)]
pub struct ClipboardService {
    requests: std_mpsc::Sender<ClipboardRequest>,
}

impl ClipboardService {
    pub fn start() -> ClipboardService {
        let (tx, rx) = std_mpsc::channel::<ClipboardRequest>();

        thread::spawn(move || {
            let mut clipboard = match arboard::Clipboard::new() {
                Ok(clipboard) => Some(clipboard),
                Err(err) => {
                    tracing::warn!(error = %err, "clipboard unavailable");
                    None
                }
            };

            for request in rx {
                let res = match clipboard.as_mut() {
                    Some(clipboard) => clipboard
                        .set_text(request.text)
                        .map_err(|err| err.to_string()),
                    None => Err("no clipboard is available on this system".to_string()),
                };
                let _ = request.reply.send(res);
            }
        });

        return ClipboardService { requests: tx };
    }

    pub async fn set(&self, text: String) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.requests
            .send(ClipboardRequest { text, reply })
            .map_err(|_| anyhow!("clipboard service stopped"))?;

        return match rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => bail!(err),
            Err(_) => bail!("clipboard service stopped"),
        };
    }
}
