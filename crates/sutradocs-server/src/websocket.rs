//! WebSocket-based live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages sent to browsers for live reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    /// Full page reload
    Reload,

    /// Content could not be reloaded; the page keeps showing the last good version
    Error {
        /// What went wrong
        message: String,
    },

    /// Connection established
    Connected,
}

/// Hub for broadcasting reload messages to all connected browsers.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
    /// Create a new reload hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected browsers.
    pub fn send(&self, msg: ReloadMessage) {
        // No receivers is fine: nobody has the site open.
        let _ = self.sender.send(msg);
    }

    /// Subscribe to reload messages.
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.sender.subscribe()
    }

    /// Get the number of connected browsers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the client-side live reload script.
pub fn reload_client_script(ws_url: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  let attempts = 0;
  const maxAttempts = 10;

  function connect() {{
    const ws = new WebSocket('{}');

    ws.onopen = function() {{
      if (attempts > 0) {{
        // The server restarted while we were away.
        location.reload();
        return;
      }}
      console.log('[sutradocs] Live reload connected');
    }};

    ws.onmessage = function(event) {{
      const msg = JSON.parse(event.data);

      switch (msg.type) {{
        case 'reload':
          location.reload();
          break;

        case 'error':
          console.error('[sutradocs] ' + msg.message);
          break;

        case 'connected':
          break;
      }}
    }};

    ws.onclose = function() {{
      if (attempts < maxAttempts) {{
        attempts++;
        setTimeout(connect, 1000 * attempts);
      }}
    }};
  }}

  connect();
}})();
"#,
        ws_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_broadcasts_messages() {
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        hub.send(ReloadMessage::Reload);

        assert_eq!(rx.try_recv().unwrap(), ReloadMessage::Reload);
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[test]
    fn send_without_subscribers_is_ignored() {
        let hub = ReloadHub::new();

        hub.send(ReloadMessage::Reload);

        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn serializes_messages() {
        let msg = ReloadMessage::Error {
            message: "sidebar.yml: duplicate path".to_string(),
        };

        let json = serde_json::to_string(&msg).unwrap();

        assert_eq!(
            json,
            r#"{"type":"error","message":"sidebar.yml: duplicate path"}"#
        );
    }

    #[test]
    fn script_embeds_socket_url() {
        let script = reload_client_script("ws://127.0.0.1:7777/__reload");

        assert!(script.contains("new WebSocket('ws://127.0.0.1:7777/__reload')"));
    }
}
