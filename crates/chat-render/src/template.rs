//! HTML page rendering for chat screenshots.
//!
//! Messages are laid out server-side: the page contains no script, only the
//! stylesheet and one bubble per message in the requested range.

use chatvid_project_model::{ChatConfig, ScreenshotKey};

/// Id of the element wrapping the bubbles.
pub const CONTAINER_ID: &str = "chatContainer";

/// Alpha separating the container from its surroundings in a capture. The
/// container background is 0.95 opaque (242); its drop shadow never exceeds
/// 0.15 (38), so cropping at this level keeps exactly the container box.
pub const CONTAINER_MIN_ALPHA: u8 = 128;

const IOS_THEME_CSS: &str = r#"
    * {
      margin: 0;
      padding: 0;
      box-sizing: border-box;
    }

    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif;
      background: transparent;
      padding: 20px;
      display: flex;
      justify-content: center;
      align-items: flex-start;
      min-height: 100vh;
    }

    .chat-container {
      background: rgba(255, 255, 255, 0.95);
      border-radius: 20px;
      padding: 20px;
      box-shadow: 0 4px 20px rgba(0, 0, 0, 0.15);
      max-width: 920px;
      width: 100%;
      min-height: 200px;
    }

    .message {
      margin-bottom: 12px;
      display: flex;
      flex-direction: column;
    }

    .message.left {
      align-items: flex-start;
    }

    .message.right {
      align-items: flex-end;
    }

    .message-bubble {
      max-width: 75%;
      padding: 12px 16px;
      border-radius: 18px;
      word-wrap: break-word;
      line-height: 1.4;
      font-size: 16px;
    }

    .message.left .message-bubble {
      background: #e5e5ea;
      color: #000;
      border-bottom-left-radius: 4px;
    }

    .message.right .message-bubble {
      background: #007aff;
      color: #fff;
      border-bottom-right-radius: 4px;
    }

    .message-sender {
      font-size: 12px;
      color: #666;
      margin-bottom: 4px;
      padding: 0 4px;
      text-align: left;
    }
"#;

/// Stylesheet for a theme id. Only `ios` exists; anything else falls back
/// to it.
pub fn stylesheet(theme: &str) -> &'static str {
    match theme {
        "ios" => IOS_THEME_CSS,
        other => {
            tracing::warn!(theme = other, "Unknown chat theme, falling back to ios");
            IOS_THEME_CSS
        }
    }
}

/// Build the full HTML page showing messages `key.start..=key.end`.
pub fn chat_html(chat: &ChatConfig, key: ScreenshotKey) -> String {
    let mut body = String::new();

    for message in chat.messages_for(key) {
        let side = if chat.is_local(message) {
            "right"
        } else {
            "left"
        };
        body.push_str(&format!("    <div class=\"message {side}\">\n"));
        if let Some(label) = chat.sender_label(message) {
            body.push_str(&format!(
                "      <div class=\"message-sender\">{}</div>\n",
                escape_html(label)
            ));
        }
        body.push_str(&format!(
            "      <div class=\"message-bubble\">{}</div>\n",
            escape_html(&message.text)
        ));
        body.push_str("    </div>\n");
    }

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <title>Chat Screenshot</title>\n\
         <style>{css}</style>\n\
         </head>\n\
         <body>\n\
         <div class=\"chat-container\" id=\"{container}\">\n\
         {body}\
         </div>\n\
         </body>\n\
         </html>\n",
        css = stylesheet(&chat.theme),
        container = CONTAINER_ID,
    )
}

/// Escape text for inclusion in HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
