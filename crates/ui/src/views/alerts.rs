use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;

use crate::context::AppContext;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Raises a desktop notification and a click sound for each new drop.
#[component]
pub fn DropAlerts() -> Element {
    let ctx = use_context::<AppContext>();
    let mailbox = ctx.mailbox();

    use_future(move || {
        let mailbox = mailbox.clone();
        async move {
            let mut seen = mailbox.drop_count();
            loop {
                tokio::time::sleep(POLL_INTERVAL).await;
                let fresh = fresh_drop(&mut seen, mailbox.drop_count(), mailbox.pending_topic());
                if let Some(topic) = fresh {
                    let _ = eval(&drop_alert_script(&topic));
                }
            }
        }
    });

    rsx! {}
}

/// Topic to announce when the drop counter moved past `seen`.
///
/// A drop already claimed before the poll is not announced.
fn fresh_drop(seen: &mut u64, drops: u64, pending_topic: Option<String>) -> Option<String> {
    if drops <= *seen {
        return None;
    }
    *seen = drops;
    pending_topic
}

/// Notification plus a short falling sine chirp (600 Hz to 100 Hz).
fn drop_alert_script(topic: &str) -> String {
    let title = "🧠 Quiz Master";
    let body = format!("New quiz ready: {topic}! Click to play now.");
    format!(
        r#"(function() {{
                    const show = () => {{
                        try {{ new Notification({title:?}, {{ body: {body:?} }}); }} catch (_) {{}}
                    }};
                    if (typeof Notification !== "undefined") {{
                        if (Notification.permission === "granted") {{
                            show();
                        }} else if (Notification.permission === "default") {{
                            Notification.requestPermission().then((p) => {{ if (p === "granted") show(); }});
                        }}
                    }}
                    try {{
                        const ctx = new (window.AudioContext || window.webkitAudioContext)();
                        const osc = ctx.createOscillator();
                        const gain = ctx.createGain();
                        osc.type = "sine";
                        osc.frequency.setValueAtTime(600, ctx.currentTime);
                        osc.frequency.exponentialRampToValueAtTime(100, ctx.currentTime + 0.15);
                        gain.gain.setValueAtTime(0.2, ctx.currentTime);
                        gain.gain.exponentialRampToValueAtTime(0.01, ctx.currentTime + 0.1);
                        osc.connect(gain);
                        gain.connect(ctx.destination);
                        osc.start();
                        osc.stop(ctx.currentTime + 0.15);
                    }} catch (_) {{}}
                }})();"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_new_drops_are_announced() {
        let mut seen = 2;
        assert_eq!(fresh_drop(&mut seen, 2, Some("Owls".into())), None);

        assert_eq!(
            fresh_drop(&mut seen, 3, Some("Owls".into())).as_deref(),
            Some("Owls")
        );
        assert_eq!(seen, 3);
        assert_eq!(fresh_drop(&mut seen, 3, Some("Owls".into())), None);

        assert_eq!(fresh_drop(&mut seen, 4, None), None);
        assert_eq!(seen, 4);
    }

    #[test]
    fn alert_script_quotes_the_topic() {
        let js = drop_alert_script("Rock \"n\" Roll");
        assert!(js.contains(r#"New quiz ready: Rock \"n\" Roll! Click to play now."#));
        assert!(js.contains("Notification.requestPermission"));
        assert!(js.contains("setValueAtTime(600"));
        assert!(js.contains("exponentialRampToValueAtTime(100"));
    }
}
