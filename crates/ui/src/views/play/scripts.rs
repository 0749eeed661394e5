/// Plays base64 16-bit mono PCM at 24 kHz through Web Audio.
///
/// A newer call stops whatever is still playing.
pub(super) fn pcm_playback_script(audio_b64: &str) -> String {
    format!(
        r#"(function() {{
                    const state = window.__quizSpeech || (window.__quizSpeech = {{ ctx: null, source: null }});
                    if (!state.ctx) {{
                        state.ctx = new (window.AudioContext || window.webkitAudioContext)({{ sampleRate: 24000 }});
                    }}
                    if (state.source) {{
                        try {{ state.source.stop(); }} catch (_) {{}}
                        state.source = null;
                    }}
                    const raw = atob({audio_b64:?});
                    const bytes = new Uint8Array(raw.length);
                    for (let i = 0; i < raw.length; i++) bytes[i] = raw.charCodeAt(i);
                    const samples = new Int16Array(bytes.buffer, 0, Math.floor(bytes.length / 2));
                    const buffer = state.ctx.createBuffer(1, samples.length, 24000);
                    const channel = buffer.getChannelData(0);
                    for (let i = 0; i < samples.length; i++) channel[i] = samples[i] / 32768;
                    const source = state.ctx.createBufferSource();
                    source.buffer = buffer;
                    source.connect(state.ctx.destination);
                    source.onended = () => {{
                        if (state.source === source) state.source = null;
                    }};
                    state.source = source;
                    source.start();
                }})();"#,
    )
}

pub(super) fn stop_playback_script() -> &'static str {
    r"(function() {
        const state = window.__quizSpeech;
        if (state && state.source) {
            try { state.source.stop(); } catch (_) {}
            state.source = null;
        }
    })();"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_is_embedded_as_a_js_string() {
        let js = pcm_playback_script("AAEC");
        assert!(js.contains("atob(\"AAEC\")"));
        assert!(js.contains("24000"));
    }
}
